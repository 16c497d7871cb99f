// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Enumerations shared between streaming and legacy messages
//!
//! All enumerations encode as their numeric discriminant, matching the values
//! used by device firmware.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

/// Transaction signing mode, selects the validation rules applied by the device
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
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
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum CardanoTxSigningMode {
    OrdinaryTransaction = 0,
    PoolRegistrationAsOwner = 1,
}

/// Address type for device-derived addresses
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
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
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum CardanoAddressType {
    Base = 0,
    BaseScriptKey = 1,
    BaseKeyScript = 2,
    BaseScriptScript = 3,
    Pointer = 4,
    PointerScript = 5,
    Enterprise = 6,
    EnterpriseScript = 7,
    Byron = 8,
    Reward = 14,
    RewardScript = 15,
}

impl CardanoAddressType {
    /// Pointer addresses carry a certificate pointer in place of a staking credential
    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer | Self::PointerScript)
    }
}

/// Certificate type
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
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
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum CardanoCertificateType {
    StakeRegistration = 0,
    StakeDeregistration = 1,
    StakeDelegation = 2,
    StakePoolRegistration = 3,
}

/// Stake pool relay type
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
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
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum CardanoPoolRelayType {
    SingleHostIp = 0,
    SingleHostName = 1,
    MultipleHostName = 2,
}

/// Witness type returned by the device
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
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
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum CardanoTxWitnessType {
    /// Bootstrap witness, includes a chain code
    ByronWitness = 0,
    /// VKey witness
    ShelleyWitness = 1,
}

/// Auxiliary data supplement type
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
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
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum CardanoTxAuxiliaryDataSupplementType {
    None = 0,
    CatalystRegistrationSignature = 1,
}

/// Structured auxiliary data (metadata) type
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
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
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum CardanoTxMetadataType {
    CatalystRegistration = 0,
}
