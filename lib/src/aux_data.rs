// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Auxiliary data adapter
//!
//! Auxiliary data is either sent as a precomputed hash, or as a Catalyst voting
//! key registration from which the device builds (and signs) the metadata. In
//! the latter case the device returns a [CardanoTxAuxiliaryDataSupplement]
//! carrying the resulting hash and registration signature.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cardano_hw_proto::prelude::{
    AuxiliaryDataAck, CardanoAddressParametersType, CardanoCatalystRegistrationParametersType,
    CardanoTxAuxiliaryData, CardanoTxAuxiliaryDataSupplementType, CardanoTxMetadata,
    CardanoTxMetadataType, MessageType,
};

use crate::{
    helpers::{hex_bytes, hex_bytes_opt},
    params::{
        address_parameters, decode_hex, required, resolve_path, AddressParametersRequest, Amount,
    },
    path::{DerivationPath, PathInput, MIN_DEPTH_CATALYST_STAKING},
    Error,
};

/// Caller auxiliary data, exactly one of `hash` or `catalystRegistrationParameters`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuxiliaryDataRequest {
    pub hash: Option<String>,
    pub catalyst_registration_parameters: Option<CatalystRegistrationRequest>,

    /// Retired raw payload, always rejected
    pub blob: Option<Value>,
}

/// Caller Catalyst voting registration
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalystRegistrationRequest {
    pub voting_public_key: Option<String>,
    pub staking_path: Option<PathInput>,
    pub reward_address_parameters: Option<AddressParametersRequest>,
    pub nonce: Option<Amount>,
}

/// Catalyst voting key registration
#[derive(Clone, PartialEq, Debug)]
pub struct CatalystRegistration {
    pub voting_public_key: Vec<u8>,
    pub staking_path: DerivationPath,
    pub reward_address_parameters: CardanoAddressParametersType,
    pub nonce: u64,
}

/// Validated auxiliary data
#[derive(Clone, PartialEq, Debug)]
pub enum AuxiliaryData {
    /// Precomputed auxiliary data hash
    Hash(Vec<u8>),
    /// Catalyst registration, metadata built on the device
    CatalystRegistration(CatalystRegistration),
}

impl AuxiliaryData {
    pub fn is_hash(&self) -> bool {
        matches!(self, AuxiliaryData::Hash(_))
    }

    /// Build the device auxiliary data message
    pub fn message(&self) -> CardanoTxAuxiliaryData {
        match self {
            AuxiliaryData::Hash(h) => CardanoTxAuxiliaryData {
                hash: Some(h.clone()),
                metadata: None,
            },
            AuxiliaryData::CatalystRegistration(c) => CardanoTxAuxiliaryData {
                hash: None,
                metadata: Some(CardanoTxMetadata {
                    kind: CardanoTxMetadataType::CatalystRegistration,
                    catalyst_registration_parameters: Some(
                        CardanoCatalystRegistrationParametersType {
                            voting_public_key: c.voting_public_key.clone(),
                            staking_path: c.staking_path.as_slice().to_vec(),
                            reward_address_parameters: c.reward_address_parameters.clone(),
                            nonce: c.nonce,
                        },
                    ),
                }),
            },
        }
    }

    pub(crate) fn validate(field: &str, r: &AuxiliaryDataRequest) -> Result<Self, Error> {
        match (&r.hash, &r.catalyst_registration_parameters) {
            (Some(h), None) => Ok(AuxiliaryData::Hash(decode_hex(
                &format!("{field}.hash"),
                h,
                Some(32),
            )?)),
            (None, Some(c)) => Ok(AuxiliaryData::CatalystRegistration(catalyst(
                &format!("{field}.catalystRegistrationParameters"),
                c,
            )?)),
            _ => Err(Error::invalid(
                field,
                "exactly one of hash or catalystRegistrationParameters is required",
            )),
        }
    }
}

fn catalyst(field: &str, r: &CatalystRegistrationRequest) -> Result<CatalystRegistration, Error> {
    let f = |name: &str| format!("{field}.{name}");

    let voting_public_key = decode_hex(
        &f("votingPublicKey"),
        required(&f("votingPublicKey"), r.voting_public_key.as_deref())?,
        Some(32),
    )?;

    let staking_path = resolve_path(
        &f("stakingPath"),
        required(&f("stakingPath"), r.staking_path.as_ref())?,
        MIN_DEPTH_CATALYST_STAKING,
    )?;

    let reward_address_parameters = address_parameters(
        &f("rewardAddressParameters"),
        required(
            &f("rewardAddressParameters"),
            r.reward_address_parameters.as_ref(),
        )?,
    )?;

    let nonce = required(&f("nonce"), r.nonce.as_ref())?.value(&f("nonce"))?;

    Ok(CatalystRegistration {
        voting_public_key,
        staking_path,
        reward_address_parameters,
        nonce,
    })
}

/// Supplementary auxiliary data returned by the device
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuxiliaryDataSupplement {
    #[serde(rename = "type")]
    pub kind: CardanoTxAuxiliaryDataSupplementType,
    #[serde(with = "hex_bytes")]
    pub auxiliary_data_hash: Vec<u8>,
    #[serde(with = "hex_bytes_opt", skip_serializing_if = "Option::is_none")]
    pub catalyst_signature: Option<Vec<u8>>,
}

/// Interpret the device response to auxiliary data
///
/// A plain item ack contributes no supplement.
pub fn supplement(ack: AuxiliaryDataAck) -> Result<Option<AuxiliaryDataSupplement>, Error> {
    let s = match ack {
        AuxiliaryDataAck::ItemAck(_) => return Ok(None),
        AuxiliaryDataAck::Supplement(s) => s,
    };

    let auxiliary_data_hash = s.auxiliary_data_hash.ok_or(Error::MissingField {
        message: MessageType::CardanoTxAuxiliaryDataSupplement,
        field: "auxiliary_data_hash",
    })?;

    Ok(Some(AuxiliaryDataSupplement {
        kind: s.kind,
        auxiliary_data_hash,
        catalyst_signature: s.catalyst_signature,
    }))
}
