// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Signing request validation and normalisation
//!
//! Caller requests arrive as loosely typed JSON ([SignTxRequest]), every field
//! optional so missing values can be reported by name. [SignTxParams] is the
//! validated, immutable form consumed by the feature gate and protocol drivers,
//! with device message shapes already built and witness paths resolved.

use serde::Deserialize;
use serde_json::Value;

use cardano_hw_proto::prelude::{
    CardanoCertificateType, CardanoTxInput, CardanoTxSigningMode, CardanoTxWithdrawal,
};

use crate::{
    aux_data::{AuxiliaryData, AuxiliaryDataRequest},
    path::{DerivationPath, PathInput, MIN_DEPTH_SIGNING},
    witness::WitnessPaths,
    Error,
};

mod certificate;
pub use certificate::*;

mod output;
pub use output::*;

/// Rejection message for the retired top-level `metadata` field
pub const METADATA_RETIRED: &str = "Metadata field has been replaced by auxiliaryData.";

/// Rejection message for the retired `auxiliaryData.blob` field
pub const AUX_BLOB_RETIRED: &str = "Auxiliary data can now only be sent as a hash.";

/// Caller transaction signing request
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignTxRequest {
    pub signing_mode: Option<CardanoTxSigningMode>,
    pub inputs: Option<Vec<InputRequest>>,
    pub outputs: Option<Vec<OutputRequest>>,
    pub fee: Option<Amount>,
    pub ttl: Option<Amount>,
    pub certificates: Option<Vec<CertificateRequest>>,
    pub withdrawals: Option<Vec<WithdrawalRequest>>,
    pub auxiliary_data: Option<AuxiliaryDataRequest>,
    pub validity_interval_start: Option<Amount>,
    pub protocol_magic: Option<u32>,
    pub network_id: Option<u32>,

    /// Retired free-form metadata, always rejected
    pub metadata: Option<Value>,
}

/// Caller transaction input
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InputRequest {
    pub prev_hash: Option<String>,
    pub prev_index: Option<u32>,
    pub path: Option<PathInput>,
}

/// Caller reward withdrawal
#[derive(Clone, Debug, Default, Deserialize)]
pub struct WithdrawalRequest {
    pub path: Option<PathInput>,
    pub amount: Option<Amount>,
}

/// Amount as a decimal string or a non-negative integer
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(untagged, expecting = "a non-negative integer or decimal string")]
pub enum Amount {
    Number(u64),
    Text(String),
}

impl Amount {
    /// Resolve to a u64, reporting errors against `field`
    pub fn value(&self, field: &str) -> Result<u64, Error> {
        match self {
            Amount::Number(n) => Ok(*n),
            Amount::Text(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s
                .parse::<u64>()
                .map_err(|_| Error::invalid(field, "amount exceeds u64")),
            Amount::Text(s) => Err(Error::invalid(field, format!("'{s}' is not an amount"))),
        }
    }
}

impl From<u64> for Amount {
    fn from(v: u64) -> Self {
        Amount::Number(v)
    }
}

/// Normalised transaction input
#[derive(Clone, PartialEq, Debug)]
pub struct Input {
    pub input: CardanoTxInput,
    /// Derivation path, present for device owned inputs
    pub path: Option<DerivationPath>,
}

/// Normalised reward withdrawal
#[derive(Clone, PartialEq, Debug)]
pub struct Withdrawal {
    pub path: DerivationPath,
    pub amount: u64,
}

impl Withdrawal {
    pub fn message(&self) -> CardanoTxWithdrawal {
        CardanoTxWithdrawal {
            path: self.path.as_slice().to_vec(),
            amount: self.amount,
        }
    }
}

/// Validated transaction signing parameters
#[derive(Clone, PartialEq, Debug)]
pub struct SignTxParams {
    pub signing_mode: CardanoTxSigningMode,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub fee: u64,
    pub ttl: Option<u64>,
    pub certificates: Vec<Certificate>,
    pub withdrawals: Vec<Withdrawal>,
    pub auxiliary_data: Option<AuxiliaryData>,
    pub validity_interval_start: Option<u64>,
    pub protocol_magic: u32,
    pub network_id: u32,
    /// Deduplicated witness paths, in request order
    pub witness_paths: WitnessPaths,
}

impl SignTxParams {
    /// Validate a raw JSON request
    ///
    /// Retired fields are rejected before any other field is inspected,
    /// type errors are reported against the path of the offending field.
    pub fn from_json(v: &Value) -> Result<Self, Error> {
        // Raw check so retired fields win over type errors elsewhere
        check_retired(v)?;

        let req: SignTxRequest = serde_path_to_error::deserialize(v).map_err(|e| {
            let field = match e.path().to_string() {
                p if p == "." => "request".to_string(),
                p => p,
            };
            Error::invalid(field, e.into_inner())
        })?;

        Self::try_from(req)
    }

    /// Validate a JSON request string
    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        let v: Value = serde_json::from_str(s)?;
        Self::from_json(&v)
    }
}

/// Reject retired input shapes on raw JSON, null values are ignored
fn check_retired(v: &Value) -> Result<(), Error> {
    let present = |f: Option<&Value>| f.map_or(false, |f| !f.is_null());

    if present(v.get("metadata")) {
        return Err(Error::invalid("metadata", METADATA_RETIRED));
    }

    if present(v.pointer("/auxiliaryData/blob")) {
        return Err(Error::invalid("auxiliaryData.blob", AUX_BLOB_RETIRED));
    }

    Ok(())
}

impl TryFrom<SignTxRequest> for SignTxParams {
    type Error = Error;

    fn try_from(req: SignTxRequest) -> Result<Self, Self::Error> {
        // Typed requests bypass `from_json`, null fields deserialize to `None`
        if req.metadata.is_some() {
            return Err(Error::invalid("metadata", METADATA_RETIRED));
        }
        if matches!(&req.auxiliary_data, Some(a) if a.blob.is_some()) {
            return Err(Error::invalid("auxiliaryData.blob", AUX_BLOB_RETIRED));
        }

        let signing_mode = required("signingMode", req.signing_mode)?;
        let fee = required("fee", req.fee.as_ref())?.value("fee")?;
        let protocol_magic = required("protocolMagic", req.protocol_magic)?;
        let network_id = required("networkId", req.network_id)?;

        let inputs = required("inputs", req.inputs.as_ref())?
            .iter()
            .enumerate()
            .map(|(i, r)| input(&format!("inputs[{i}]"), r))
            .collect::<Result<Vec<_>, _>>()?;

        let outputs = required("outputs", req.outputs.as_ref())?
            .iter()
            .enumerate()
            .map(|(i, r)| Output::validate(&format!("outputs[{i}]"), r))
            .collect::<Result<Vec<_>, _>>()?;

        let ttl = req.ttl.as_ref().map(|a| a.value("ttl")).transpose()?;
        let validity_interval_start = req
            .validity_interval_start
            .as_ref()
            .map(|a| a.value("validityIntervalStart"))
            .transpose()?;

        let certificates = req
            .certificates
            .as_deref()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, r)| Certificate::validate(&format!("certificates[{i}]"), r))
            .collect::<Result<Vec<_>, _>>()?;

        let withdrawals = req
            .withdrawals
            .as_deref()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, r)| withdrawal(&format!("withdrawals[{i}]"), r))
            .collect::<Result<Vec<_>, _>>()?;

        let auxiliary_data = req
            .auxiliary_data
            .as_ref()
            .map(|a| AuxiliaryData::validate("auxiliaryData", a))
            .transpose()?;

        let witness_paths = WitnessPaths::resolve(&inputs, &certificates, &withdrawals);

        Ok(Self {
            signing_mode,
            inputs,
            outputs,
            fee,
            ttl,
            certificates,
            withdrawals,
            auxiliary_data,
            validity_interval_start,
            protocol_magic,
            network_id,
            witness_paths,
        })
    }
}

impl SignTxParams {
    /// Whether any certificate registers a stake pool
    pub fn has_pool_registration(&self) -> bool {
        self.certificates
            .iter()
            .any(|c| c.certificate.kind == CardanoCertificateType::StakePoolRegistration)
    }

    /// Whether any output carries tokens
    pub fn has_multiasset_outputs(&self) -> bool {
        self.outputs.iter().any(|o| !o.token_bundle.is_empty())
    }
}

fn input(field: &str, r: &InputRequest) -> Result<Input, Error> {
    let prev_hash = required(
        &format!("{field}.prev_hash"),
        r.prev_hash.as_deref(),
    )?;
    let prev_hash = decode_hex(&format!("{field}.prev_hash"), prev_hash, Some(32))?;
    let prev_index = required(&format!("{field}.prev_index"), r.prev_index)?;

    let path = r
        .path
        .as_ref()
        .map(|p| resolve_path(&format!("{field}.path"), p, MIN_DEPTH_SIGNING))
        .transpose()?;

    Ok(Input {
        input: CardanoTxInput {
            prev_hash,
            prev_index,
        },
        path,
    })
}

fn withdrawal(field: &str, r: &WithdrawalRequest) -> Result<Withdrawal, Error> {
    let path = required(&format!("{field}.path"), r.path.as_ref())?;
    let path = resolve_path(&format!("{field}.path"), path, MIN_DEPTH_SIGNING)?;

    let amount = required(&format!("{field}.amount"), r.amount.as_ref())?
        .value(&format!("{field}.amount"))?;

    Ok(Withdrawal { path, amount })
}

/// Helper to require a field is present
pub(crate) fn required<T>(field: &str, v: Option<T>) -> Result<T, Error> {
    v.ok_or_else(|| Error::invalid(field, "missing required field"))
}

/// Helper to decode hex fields, optionally checking length
pub(crate) fn decode_hex(field: &str, s: &str, len: Option<usize>) -> Result<Vec<u8>, Error> {
    let b = hex::decode(s).map_err(|e| Error::invalid(field, e))?;

    match len {
        Some(n) if b.len() != n => Err(Error::invalid(
            field,
            format!("expected {n} bytes, found {}", b.len()),
        )),
        _ => Ok(b),
    }
}

/// Helper to resolve derivation paths, reporting errors against `field`
pub(crate) fn resolve_path(
    field: &str,
    p: &PathInput,
    min_depth: usize,
) -> Result<DerivationPath, Error> {
    p.resolve(min_depth).map_err(|e| Error::invalid(field, e))
}
