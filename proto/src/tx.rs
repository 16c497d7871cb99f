// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Streaming transaction messages, used to send a transaction to the device
//! item by item.
//!
//! The host opens with [`CardanoSignTxInit`], then sends inputs, outputs (each
//! followed by asset groups and tokens), certificates (each followed by pool
//! owners and relays), withdrawals and auxiliary data, each acknowledged with a
//! [`CardanoTxItemAck`]. Witnesses are then requested per path, and the
//! exchange completes with [`CardanoTxHostAck`] / [`CardanoTxBodyHash`] /
//! [`CardanoSignTxFinished`].

use serde::{Deserialize, Serialize};

use crate::{
    types::{
        CardanoAddressType, CardanoCertificateType, CardanoPoolRelayType,
        CardanoTxAuxiliaryDataSupplementType, CardanoTxMetadataType, CardanoTxSigningMode,
        CardanoTxWitnessType,
    },
    AddressN,
};

/// Transaction initialisation, announces item counts and transaction level fields
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoSignTxInit {
    pub signing_mode: CardanoTxSigningMode,
    pub protocol_magic: u32,
    pub network_id: u32,
    pub inputs_count: u32,
    pub outputs_count: u32,
    pub fee: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    pub certificates_count: u32,
    pub withdrawals_count: u32,
    pub has_auxiliary_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_interval_start: Option<u64>,
    /// Number of [`CardanoTxWitnessRequest`] messages that will follow
    pub witness_requests_count: u32,
}

/// Generic acknowledgement for a transaction item
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct CardanoTxItemAck {}

/// Transaction input (paths are not sent when streaming, they are requested as witnesses)
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxInput {
    pub prev_hash: Vec<u8>,
    pub prev_index: u32,
}

/// Blockchain pointer for pointer addresses
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoBlockchainPointerType {
    pub block_index: u32,
    pub tx_index: u32,
    pub certificate_index: u32,
}

/// Parameters for an address derived on the device
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoAddressParametersType {
    pub address_type: CardanoAddressType,
    pub address_n: AddressN,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_n_staking: AddressN,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking_key_hash: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_pointer: Option<CardanoBlockchainPointerType>,
}

/// Transaction output, exactly one of `address` or `address_parameters` is set
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_parameters: Option<CardanoAddressParametersType>,
    pub amount: u64,
    /// Number of [`CardanoAssetGroup`] messages following this output
    pub asset_groups_count: u32,
}

/// Asset group header, sent after the owning output
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoAssetGroup {
    pub policy_id: Vec<u8>,
    /// Number of [`CardanoToken`] messages following this group
    pub tokens_count: u32,
}

/// Token amount within an asset group
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoToken {
    pub asset_name_bytes: Vec<u8>,
    pub amount: u64,
}

/// Stake pool metadata reference
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoPoolMetadataType {
    pub url: String,
    pub hash: Vec<u8>,
}

/// Stake pool registration parameters
///
/// When streaming, owners and relays are sent as separate messages following the
/// certificate and only their counts are set here. The legacy protocol carries
/// them inline in `owners` / `relays`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoPoolParametersType {
    pub pool_id: Vec<u8>,
    pub vrf_key_hash: Vec<u8>,
    pub pledge: u64,
    pub cost: u64,
    pub margin_numerator: u64,
    pub margin_denominator: u64,
    pub reward_account: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<CardanoPoolOwner>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relays: Vec<CardanoPoolRelayParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CardanoPoolMetadataType>,
    pub owners_count: u32,
    pub relays_count: u32,
}

/// Transaction certificate
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxCertificate {
    #[serde(rename = "type")]
    pub kind: CardanoCertificateType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: AddressN,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_parameters: Option<CardanoPoolParametersType>,
}

/// Stake pool owner, exactly one of `staking_key_path` or `staking_key_hash` is set
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoPoolOwner {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub staking_key_path: AddressN,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking_key_hash: Option<Vec<u8>>,
}

/// Stake pool relay
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoPoolRelayParameters {
    #[serde(rename = "type")]
    pub kind: CardanoPoolRelayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
}

/// Reward withdrawal
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxWithdrawal {
    pub path: AddressN,
    pub amount: u64,
}

/// Catalyst voting key registration parameters
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoCatalystRegistrationParametersType {
    pub voting_public_key: Vec<u8>,
    pub staking_path: AddressN,
    pub reward_address_parameters: CardanoAddressParametersType,
    pub nonce: u64,
}

/// Structured auxiliary data built on the device
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxMetadata {
    #[serde(rename = "type")]
    pub kind: CardanoTxMetadataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalyst_registration_parameters: Option<CardanoCatalystRegistrationParametersType>,
}

/// Auxiliary data, exactly one of `hash` or `metadata` is set
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxAuxiliaryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CardanoTxMetadata>,
}

/// Supplementary data returned in place of an item ack for some auxiliary data types
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxAuxiliaryDataSupplement {
    #[serde(rename = "type")]
    pub kind: CardanoTxAuxiliaryDataSupplementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_data_hash: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalyst_signature: Option<Vec<u8>>,
}

/// Request a witness for the provided path
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxWitnessRequest {
    pub path: AddressN,
}

/// Witness produced by the device
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxWitnessResponse {
    #[serde(rename = "type")]
    pub kind: CardanoTxWitnessType,
    pub pub_key: Vec<u8>,
    pub signature: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_code: Option<Vec<u8>>,
}

/// Host acknowledgement, used to request the body hash and to close the exchange
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct CardanoTxHostAck {}

/// Transaction body hash
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct CardanoTxBodyHash {
    pub tx_hash: Vec<u8>,
}

/// Signing complete
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct CardanoSignTxFinished {}
