// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Message definitions for Cardano transaction signing on hardware wallets
//!
//! This crate describes the messages exchanged with the device when signing a
//! transaction, in both the item-by-item streaming protocol and the older
//! single request (optionally chunked reply) protocol.
//!
//! Messages are plain data, field names follow the device protocol definitions
//! so a transport can map them onto its own framing. Byte fields carry raw
//! bytes, the host is responsible for hex decoding caller input.
//!
//! Each protocol state expects a closed set of responses, see [expect] for the
//! per-state response types used by the host driver.

pub mod types;

pub mod tx;

pub mod legacy;

pub mod message;
pub use message::{MessageType, Request, Response};

pub mod expect;
pub use expect::{AuxiliaryDataAck, Expect, SignedTxReply};

pub mod prelude;

/// Derivation path as transmitted to the device (hardened components carry `0x8000_0000`)
pub type AddressN = Vec<u32>;
