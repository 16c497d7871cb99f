// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Firmware feature gating
//!
//! A [FeatureTable] maps each [Feature] to the minimum firmware version per
//! device model line. The table is configuration, loadable from TOML, and
//! [FeatureGate] checks requests against it before any device exchange.

use std::{collections::BTreeMap, fmt::Display, path::Path, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString, EnumVariantNames};

use crate::{params::SignTxParams, tx::ProtocolMode, Error};

/// Transaction features requiring firmware support
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
    EnumVariantNames,
    EnumIter,
)]
pub enum Feature {
    SignStakePoolRegistrationAsOwner,
    ValidityIntervalStart,
    MultiassetOutputs,
    AuxiliaryData,
    TransactionStreaming,
    AuxiliaryDataHash,
}

/// Device model line
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
    EnumVariantNames,
    EnumIter,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Model {
    One,
    T,
}

/// Firmware version, ordered by (major, minor, patch)
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FirmwareVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

#[derive(Clone, PartialEq, Debug, thiserror::Error)]
#[error("invalid firmware version '{0}'")]
pub struct FirmwareVersionError(String);

impl FromStr for FirmwareVersion {
    type Err = FirmwareVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || FirmwareVersionError(s.to_string());

        let mut parts = s.trim().split('.').map(|p| p.parse::<u32>());
        let v = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) => {
                Self::new(major, minor, patch)
            }
            _ => return Err(err()),
        };

        Ok(v)
    }
}

impl TryFrom<String> for FirmwareVersion {
    type Error = FirmwareVersionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_str(&s)
    }
}

impl From<FirmwareVersion> for String {
    fn from(v: FirmwareVersion) -> Self {
        v.to_string()
    }
}

impl Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Connected device firmware
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DeviceFirmware {
    pub model: Model,
    pub version: FirmwareVersion,
}

impl Display for DeviceFirmware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "model {} firmware {}", self.model, self.version)
    }
}

/// Minimum versions for a feature, `None` where a model never supports it
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct MinVersions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one: Option<FirmwareVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<FirmwareVersion>,
}

impl MinVersions {
    /// Minimum version for the provided model
    pub fn for_model(&self, m: Model) -> Option<FirmwareVersion> {
        match m {
            Model::One => self.one,
            Model::T => self.t,
        }
    }
}

/// Feature to minimum firmware version table
///
/// ```toml
/// [TransactionStreaming]
/// t = "2.4.2"
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct FeatureTable(BTreeMap<Feature, MinVersions>);

impl Default for FeatureTable {
    fn default() -> Self {
        let t = |major, minor, patch| MinVersions {
            one: None,
            t: Some(FirmwareVersion::new(major, minor, patch)),
        };

        Self(BTreeMap::from([
            (Feature::SignStakePoolRegistrationAsOwner, t(2, 3, 5)),
            (Feature::ValidityIntervalStart, t(2, 3, 5)),
            (Feature::MultiassetOutputs, t(2, 3, 5)),
            (Feature::AuxiliaryData, t(2, 3, 7)),
            (Feature::TransactionStreaming, t(2, 4, 2)),
            (Feature::AuxiliaryDataHash, t(2, 4, 2)),
        ]))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeatureTableError {
    #[error("reading feature table: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing feature table: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown feature '{0}'")]
    UnknownFeature(String),
}

impl FeatureTable {
    /// Parse a TOML table, entries override the defaults
    pub fn from_toml(s: &str) -> Result<Self, FeatureTableError> {
        let overrides: BTreeMap<String, MinVersions> = toml::from_str(s)?;

        let mut t = Self::default();
        for (k, v) in overrides {
            let f = Feature::from_str(&k).map_err(|_| FeatureTableError::UnknownFeature(k))?;
            t.0.insert(f, v);
        }

        Ok(t)
    }

    /// Load a TOML table from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FeatureTableError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml(&s)
    }

    /// Render the table as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let m: BTreeMap<String, MinVersions> =
            self.0.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        toml::to_string(&m)
    }

    /// Minimum versions for a feature, if listed
    pub fn get(&self, f: Feature) -> Option<&MinVersions> {
        self.0.get(&f)
    }

    /// Set minimum versions for a feature
    pub fn set(&mut self, f: Feature, v: MinVersions) {
        self.0.insert(f, v);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Feature, &MinVersions)> {
        self.0.iter()
    }
}

/// Features required by a transaction, in check order
pub fn required_features(params: &SignTxParams) -> Vec<Feature> {
    let mut f = vec![];

    if params.has_pool_registration() {
        f.push(Feature::SignStakePoolRegistrationAsOwner);
    }
    if params.validity_interval_start.is_some() {
        f.push(Feature::ValidityIntervalStart);
    }
    if params.has_multiasset_outputs() {
        f.push(Feature::MultiassetOutputs);
    }
    if let Some(a) = &params.auxiliary_data {
        f.push(Feature::AuxiliaryData);
        if a.is_hash() {
            f.push(Feature::AuxiliaryDataHash);
        }
    }

    f
}

/// Checks transaction features against the connected firmware
#[derive(Clone, Debug)]
pub struct FeatureGate<'a> {
    table: &'a FeatureTable,
    firmware: DeviceFirmware,
}

impl<'a> FeatureGate<'a> {
    pub fn new(table: &'a FeatureTable, firmware: DeviceFirmware) -> Self {
        Self { table, firmware }
    }

    /// Check whether the firmware supports a feature
    ///
    /// Features missing from the table are unsupported.
    pub fn is_supported(&self, f: Feature) -> bool {
        match self
            .table
            .get(f)
            .and_then(|v| v.for_model(self.firmware.model))
        {
            Some(min) => self.firmware.version >= min,
            None => false,
        }
    }

    /// Fail on the first required feature the firmware does not support
    pub fn check(&self, params: &SignTxParams) -> Result<(), Error> {
        for f in required_features(params) {
            if !self.is_supported(f) {
                debug!("Feature {} unsupported by {}", f, self.firmware);
                return Err(Error::UnsupportedFeature(f));
            }
        }
        Ok(())
    }

    /// Protocol used with this firmware
    pub fn protocol_mode(&self) -> ProtocolMode {
        match self.is_supported(Feature::TransactionStreaming) {
            true => ProtocolMode::Streaming,
            false => ProtocolMode::Legacy,
        }
    }
}
