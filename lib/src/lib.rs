// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Cardano hardware wallet transaction signing library (and CLI)
//!
//! Caller requests are validated into [SignTxParams], checked against the
//! connected firmware by the [FeatureGate], then signed on the device using
//! either the streaming or the legacy protocol via a [DeviceHandle].
//!
//! Transports implement [Device], the device command channel.

/// Re-export `cardano-hw-proto` for consumers
pub use cardano_hw_proto::{self as proto};

mod error;
pub use error::{DeviceError, Error, ErrorKind};

mod device;
pub use device::Device;

mod handle;
pub use handle::DeviceHandle;

mod helpers;

pub mod path;
pub use path::DerivationPath;

pub mod params;
pub use params::SignTxParams;

pub mod witness;
pub use witness::WitnessPaths;

pub mod features;
pub use features::{DeviceFirmware, Feature, FeatureGate, FeatureTable, FirmwareVersion, Model};

pub mod aux_data;

pub mod tx;
pub use tx::{Outcome, ProtocolMode, SignedTx, Witness};
