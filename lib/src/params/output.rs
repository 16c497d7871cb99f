// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction outputs, token bundles and address parameters

use serde::Deserialize;

use cardano_hw_proto::prelude::{
    CardanoAddressParametersType, CardanoAddressType, CardanoAssetGroup,
    CardanoBlockchainPointerType, CardanoToken, CardanoTxOutput,
};

use super::{decode_hex, required, resolve_path, Amount};
use crate::{path::MIN_DEPTH_ADDRESS, Error};

/// Caller transaction output
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRequest {
    pub address: Option<String>,
    pub address_parameters: Option<AddressParametersRequest>,
    pub amount: Option<Amount>,
    pub token_bundle: Option<Vec<TokenGroupRequest>>,
}

/// Caller token group
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGroupRequest {
    pub policy_id: Option<String>,
    pub token_amounts: Option<Vec<TokenAmountRequest>>,
}

/// Caller token amount
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAmountRequest {
    #[serde(alias = "rawAssetName")]
    pub asset_name_bytes: Option<String>,
    pub amount: Option<Amount>,
}

/// Caller address parameters
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressParametersRequest {
    pub address_type: Option<CardanoAddressType>,
    pub path: Option<crate::path::PathInput>,
    pub staking_path: Option<crate::path::PathInput>,
    pub staking_key_hash: Option<String>,
    pub certificate_pointer: Option<CertificatePointerRequest>,
}

/// Caller blockchain pointer
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePointerRequest {
    pub block_index: Option<u32>,
    pub tx_index: Option<u32>,
    pub certificate_index: Option<u32>,
}

/// Token group with tokens in request order
#[derive(Clone, PartialEq, Debug)]
pub struct TokenGroup {
    pub policy_id: Vec<u8>,
    pub tokens: Vec<CardanoToken>,
}

impl TokenGroup {
    /// Asset group header sent ahead of the tokens
    pub fn header(&self) -> CardanoAssetGroup {
        CardanoAssetGroup {
            policy_id: self.policy_id.clone(),
            tokens_count: self.tokens.len() as u32,
        }
    }
}

/// Normalised transaction output
#[derive(Clone, PartialEq, Debug)]
pub struct Output {
    /// Output message, `asset_groups_count` matches `token_bundle`
    pub output: CardanoTxOutput,
    pub token_bundle: Vec<TokenGroup>,
}

impl Output {
    pub(crate) fn validate(field: &str, r: &OutputRequest) -> Result<Self, Error> {
        let address_parameters = match (&r.address, &r.address_parameters) {
            (Some(_), None) => None,
            (None, Some(p)) => Some(address_parameters(
                &format!("{field}.addressParameters"),
                p,
            )?),
            _ => {
                return Err(Error::invalid(
                    field,
                    "exactly one of address or addressParameters is required",
                ))
            }
        };

        let amount =
            required(&format!("{field}.amount"), r.amount.as_ref())?.value(&format!("{field}.amount"))?;

        let token_bundle = r
            .token_bundle
            .as_deref()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, g)| token_group(&format!("{field}.tokenBundle[{i}]"), g))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            output: CardanoTxOutput {
                address: r.address.clone(),
                address_parameters,
                amount,
                asset_groups_count: token_bundle.len() as u32,
            },
            token_bundle,
        })
    }
}

fn token_group(field: &str, r: &TokenGroupRequest) -> Result<TokenGroup, Error> {
    let policy_id = required(&format!("{field}.policyId"), r.policy_id.as_deref())?;
    let policy_id = decode_hex(&format!("{field}.policyId"), policy_id, Some(28))?;

    let tokens = required(&format!("{field}.tokenAmounts"), r.token_amounts.as_ref())?
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let f = format!("{field}.tokenAmounts[{i}]");

            let name = required(&format!("{f}.assetNameBytes"), t.asset_name_bytes.as_deref())?;
            let asset_name_bytes = decode_hex(&format!("{f}.assetNameBytes"), name, None)?;

            let amount =
                required(&format!("{f}.amount"), t.amount.as_ref())?.value(&format!("{f}.amount"))?;

            Ok(CardanoToken {
                asset_name_bytes,
                amount,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(TokenGroup { policy_id, tokens })
}

/// Validate address parameters
pub(crate) fn address_parameters(
    field: &str,
    r: &AddressParametersRequest,
) -> Result<CardanoAddressParametersType, Error> {
    let address_type = required(&format!("{field}.addressType"), r.address_type)?;

    let path = required(&format!("{field}.path"), r.path.as_ref())?;
    let address_n = resolve_path(&format!("{field}.path"), path, MIN_DEPTH_ADDRESS)?;

    let address_n_staking = r
        .staking_path
        .as_ref()
        .map(|p| resolve_path(&format!("{field}.stakingPath"), p, MIN_DEPTH_ADDRESS))
        .transpose()?
        .map(Vec::from)
        .unwrap_or_default();

    let staking_key_hash = r
        .staking_key_hash
        .as_deref()
        .map(|h| decode_hex(&format!("{field}.stakingKeyHash"), h, Some(28)))
        .transpose()?;

    let certificate_pointer = match (&r.certificate_pointer, address_type.is_pointer()) {
        (Some(p), _) => {
            let f = format!("{field}.certificatePointer");
            Some(CardanoBlockchainPointerType {
                block_index: required(&format!("{f}.blockIndex"), p.block_index)?,
                tx_index: required(&format!("{f}.txIndex"), p.tx_index)?,
                certificate_index: required(&format!("{f}.certificateIndex"), p.certificate_index)?,
            })
        }
        (None, true) => {
            return Err(Error::invalid(
                format!("{field}.certificatePointer"),
                "required for pointer addresses",
            ))
        }
        (None, false) => None,
    };

    Ok(CardanoAddressParametersType {
        address_type,
        address_n: address_n.into(),
        address_n_staking,
        staking_key_hash,
        certificate_pointer,
    })
}
