// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Message type identifiers and request / response envelopes

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

use crate::{legacy::*, tx::*};

/// Cardano message type identifiers
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumVariantNames,
    EnumIter,
    IntoPrimitive,
    TryFromPrimitive,
)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum MessageType {
    /// Legacy single request transaction
    CardanoSignTx = 303,

    /// Legacy final response
    CardanoSignedTx = 310,

    /// Legacy serialized transaction fragment
    CardanoSignedTxChunk = 311,

    /// Legacy request for the next fragment
    CardanoSignedTxChunkAck = 312,

    /// Streaming item acknowledgement
    CardanoTxItemAck = 313,

    /// Auxiliary data supplement
    CardanoTxAuxiliaryDataSupplement = 314,

    /// Witness request
    CardanoTxWitnessRequest = 315,

    /// Witness response
    CardanoTxWitnessResponse = 316,

    /// Host acknowledgement
    CardanoTxHostAck = 317,

    /// Transaction body hash
    CardanoTxBodyHash = 318,

    /// Signing complete
    CardanoSignTxFinished = 319,

    /// Streaming transaction initialisation
    CardanoSignTxInit = 320,

    CardanoTxInput = 321,
    CardanoTxOutput = 322,
    CardanoAssetGroup = 323,
    CardanoToken = 324,
    CardanoTxCertificate = 325,
    CardanoPoolOwner = 326,
    CardanoPoolRelayParameters = 327,
    CardanoTxWithdrawal = 328,
    CardanoTxAuxiliaryData = 329,
}

/// Host to device messages
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Request {
    SignTxInit(CardanoSignTxInit),
    TxInput(CardanoTxInput),
    TxOutput(CardanoTxOutput),
    AssetGroup(CardanoAssetGroup),
    Token(CardanoToken),
    TxCertificate(CardanoTxCertificate),
    PoolOwner(CardanoPoolOwner),
    PoolRelayParameters(CardanoPoolRelayParameters),
    TxWithdrawal(CardanoTxWithdrawal),
    TxAuxiliaryData(CardanoTxAuxiliaryData),
    TxWitnessRequest(CardanoTxWitnessRequest),
    TxHostAck(CardanoTxHostAck),
    SignTx(CardanoSignTx),
    SignedTxChunkAck(CardanoSignedTxChunkAck),
}

impl Request {
    /// Fetch the [MessageType] for a request
    pub fn message_type(&self) -> MessageType {
        match self {
            Request::SignTxInit(_) => MessageType::CardanoSignTxInit,
            Request::TxInput(_) => MessageType::CardanoTxInput,
            Request::TxOutput(_) => MessageType::CardanoTxOutput,
            Request::AssetGroup(_) => MessageType::CardanoAssetGroup,
            Request::Token(_) => MessageType::CardanoToken,
            Request::TxCertificate(_) => MessageType::CardanoTxCertificate,
            Request::PoolOwner(_) => MessageType::CardanoPoolOwner,
            Request::PoolRelayParameters(_) => MessageType::CardanoPoolRelayParameters,
            Request::TxWithdrawal(_) => MessageType::CardanoTxWithdrawal,
            Request::TxAuxiliaryData(_) => MessageType::CardanoTxAuxiliaryData,
            Request::TxWitnessRequest(_) => MessageType::CardanoTxWitnessRequest,
            Request::TxHostAck(_) => MessageType::CardanoTxHostAck,
            Request::SignTx(_) => MessageType::CardanoSignTx,
            Request::SignedTxChunkAck(_) => MessageType::CardanoSignedTxChunkAck,
        }
    }
}

/// Device to host messages
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Response {
    TxItemAck(CardanoTxItemAck),
    TxAuxiliaryDataSupplement(CardanoTxAuxiliaryDataSupplement),
    TxWitnessResponse(CardanoTxWitnessResponse),
    TxBodyHash(CardanoTxBodyHash),
    SignTxFinished(CardanoSignTxFinished),
    SignedTx(CardanoSignedTx),
    SignedTxChunk(CardanoSignedTxChunk),
}

impl Response {
    /// Fetch the [MessageType] for a response
    pub fn message_type(&self) -> MessageType {
        match self {
            Response::TxItemAck(_) => MessageType::CardanoTxItemAck,
            Response::TxAuxiliaryDataSupplement(_) => MessageType::CardanoTxAuxiliaryDataSupplement,
            Response::TxWitnessResponse(_) => MessageType::CardanoTxWitnessResponse,
            Response::TxBodyHash(_) => MessageType::CardanoTxBodyHash,
            Response::SignTxFinished(_) => MessageType::CardanoSignTxFinished,
            Response::SignedTx(_) => MessageType::CardanoSignedTx,
            Response::SignedTxChunk(_) => MessageType::CardanoSignedTxChunk,
        }
    }
}

macro_rules! impl_from_message {
    ($env:ident, $($variant:ident($msg:ty)),* $(,)?) => {
        $(
            impl From<$msg> for $env {
                fn from(m: $msg) -> Self {
                    $env::$variant(m)
                }
            }
        )*
    };
}

impl_from_message!(
    Request,
    SignTxInit(CardanoSignTxInit),
    TxInput(CardanoTxInput),
    TxOutput(CardanoTxOutput),
    AssetGroup(CardanoAssetGroup),
    Token(CardanoToken),
    TxCertificate(CardanoTxCertificate),
    PoolOwner(CardanoPoolOwner),
    PoolRelayParameters(CardanoPoolRelayParameters),
    TxWithdrawal(CardanoTxWithdrawal),
    TxAuxiliaryData(CardanoTxAuxiliaryData),
    TxWitnessRequest(CardanoTxWitnessRequest),
    TxHostAck(CardanoTxHostAck),
    SignTx(CardanoSignTx),
    SignedTxChunkAck(CardanoSignedTxChunkAck),
);

impl_from_message!(
    Response,
    TxItemAck(CardanoTxItemAck),
    TxAuxiliaryDataSupplement(CardanoTxAuxiliaryDataSupplement),
    TxWitnessResponse(CardanoTxWitnessResponse),
    TxBodyHash(CardanoTxBodyHash),
    SignTxFinished(CardanoSignTxFinished),
    SignedTx(CardanoSignedTx),
    SignedTxChunk(CardanoSignedTxChunk),
);
