// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Legacy transaction messages, for firmware without streaming support.
//!
//! The whole transaction is sent in a single [`CardanoSignTx`] request. The
//! device replies with zero or more [`CardanoSignedTxChunk`] messages (each
//! acknowledged with [`CardanoSignedTxChunkAck`]) followed by a final
//! [`CardanoSignedTx`]. Older firmware returns the serialized transaction
//! inline in the final message instead of chunking it.

use serde::{Deserialize, Serialize};

use crate::{
    tx::{
        CardanoAddressParametersType, CardanoTxAuxiliaryData, CardanoTxCertificate,
        CardanoTxWithdrawal,
    },
    AddressN,
};

/// Transaction input with optional derivation path
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxInputType {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_n: AddressN,
    pub prev_hash: Vec<u8>,
    pub prev_index: u32,
}

/// Token amount within an inline asset group
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTokenType {
    pub asset_name_bytes: Vec<u8>,
    pub amount: u64,
}

/// Inline asset group
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoAssetGroupType {
    pub policy_id: Vec<u8>,
    pub tokens: Vec<CardanoTokenType>,
}

/// Transaction output with inline token bundle
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxOutputType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_parameters: Option<CardanoAddressParametersType>,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub token_bundle: Vec<CardanoAssetGroupType>,
}

/// Single request legacy signing message
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoSignTx {
    pub inputs: Vec<CardanoTxInputType>,
    pub outputs: Vec<CardanoTxOutputType>,
    pub protocol_magic: u32,
    pub fee: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    pub network_id: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<CardanoTxCertificate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub withdrawals: Vec<CardanoTxWithdrawal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_data: Option<CardanoTxAuxiliaryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_interval_start: Option<u64>,
}

/// Serialized transaction fragment
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoSignedTxChunk {
    pub signed_tx_chunk: Vec<u8>,
}

/// Request the next serialized transaction fragment
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct CardanoSignedTxChunkAck {}

/// Final legacy response
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoSignedTx {
    pub tx_hash: Vec<u8>,
    /// Inline serialized transaction (firmware predating chunked replies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized_tx: Option<Vec<u8>>,
}
