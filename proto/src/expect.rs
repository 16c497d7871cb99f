// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Per-state expected responses
//!
//! Each protocol step expects a closed set of device responses. Types
//! implementing [Expect] declare that set (passed to the device channel) and
//! convert a received [Response] into a typed value, returning any other
//! response unchanged so the caller can report it.

use crate::{
    legacy::{CardanoSignedTx, CardanoSignedTxChunk},
    message::{MessageType, Response},
    tx::{
        CardanoSignTxFinished, CardanoTxAuxiliaryDataSupplement, CardanoTxBodyHash,
        CardanoTxItemAck, CardanoTxWitnessResponse,
    },
};

/// Typed view over the responses accepted in a given protocol state
pub trait Expect: Sized {
    /// Message types accepted in this state
    const EXPECTED: &'static [MessageType];

    /// Convert a response, handing back unexpected responses
    fn expect(resp: Response) -> Result<Self, Response>;
}

macro_rules! expect_single {
    ($msg:ty, $variant:ident, $kind:ident) => {
        impl Expect for $msg {
            const EXPECTED: &'static [MessageType] = &[MessageType::$kind];

            fn expect(resp: Response) -> Result<Self, Response> {
                match resp {
                    Response::$variant(m) => Ok(m),
                    r => Err(r),
                }
            }
        }
    };
}

expect_single!(CardanoTxItemAck, TxItemAck, CardanoTxItemAck);
expect_single!(CardanoTxWitnessResponse, TxWitnessResponse, CardanoTxWitnessResponse);
expect_single!(CardanoTxBodyHash, TxBodyHash, CardanoTxBodyHash);
expect_single!(CardanoSignTxFinished, SignTxFinished, CardanoSignTxFinished);

/// Response to auxiliary data, a supplement or a plain item ack
#[derive(Clone, PartialEq, Debug)]
pub enum AuxiliaryDataAck {
    Supplement(CardanoTxAuxiliaryDataSupplement),
    ItemAck(CardanoTxItemAck),
}

impl Expect for AuxiliaryDataAck {
    const EXPECTED: &'static [MessageType] = &[
        MessageType::CardanoTxAuxiliaryDataSupplement,
        MessageType::CardanoTxItemAck,
    ];

    fn expect(resp: Response) -> Result<Self, Response> {
        match resp {
            Response::TxAuxiliaryDataSupplement(s) => Ok(Self::Supplement(s)),
            Response::TxItemAck(a) => Ok(Self::ItemAck(a)),
            r => Err(r),
        }
    }
}

/// Legacy reply, the final signed transaction or a serialized fragment
#[derive(Clone, PartialEq, Debug)]
pub enum SignedTxReply {
    SignedTx(CardanoSignedTx),
    Chunk(CardanoSignedTxChunk),
}

impl Expect for SignedTxReply {
    const EXPECTED: &'static [MessageType] = &[
        MessageType::CardanoSignedTx,
        MessageType::CardanoSignedTxChunk,
    ];

    fn expect(resp: Response) -> Result<Self, Response> {
        match resp {
            Response::SignedTx(s) => Ok(Self::SignedTx(s)),
            Response::SignedTxChunk(c) => Ok(Self::Chunk(c)),
            r => Err(r),
        }
    }
}
