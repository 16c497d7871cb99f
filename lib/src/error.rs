// Copyright (c) 2022-2023 The MobileCoin Foundation

use core::fmt::Display;

use cardano_hw_proto::MessageType;

use crate::features::Feature;

/// Cardano signing API Error Type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing, mistyped or retired request field
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    /// Feature not available on the connected firmware
    #[error("Feature {0} not supported by device firmware")]
    UnsupportedFeature(Feature),

    /// Device response outside the expected set
    #[error("Unexpected device response (request: {request}, response: {response})")]
    UnexpectedResponse {
        request: MessageType,
        response: MessageType,
    },

    /// Device response missing a required field
    #[error("Device response {message} missing field `{field}`")]
    MissingField {
        message: MessageType,
        field: &'static str,
    },

    /// Device command channel failure
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// Legacy serialized transaction could not be interpreted
    #[error("Invalid serialized transaction: {0}")]
    InvalidSerializedTx(&'static str),

    /// Legacy serialized transaction CBOR decode failed
    #[error("CBOR decode failed: {0}")]
    Cbor(#[from] serde_cbor::Error),

    /// Request encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse error classification, see [Error::kind]
#[derive(Copy, Clone, PartialEq, Eq, Debug, strum::Display)]
pub enum ErrorKind {
    /// Rejected before any device interaction
    InvalidParameter,
    /// Rejected by the feature gate, before any device interaction
    UnsupportedFeature,
    /// Failed during the device exchange
    Protocol,
}

impl Error {
    /// Build an [Error::InvalidParameter] for the named field
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Display) -> Self {
        Error::InvalidParameter {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Classify an error by the stage it was raised in
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter { .. } | Error::Json(_) => ErrorKind::InvalidParameter,
            Error::UnsupportedFeature(_) => ErrorKind::UnsupportedFeature,
            _ => ErrorKind::Protocol,
        }
    }
}

/// Device command channel error, reported by [Device][crate::Device] implementations
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Device disconnected mid-exchange
    #[error("Device disconnected")]
    Disconnected,

    /// User rejected the operation on the device
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Device reported a failure
    #[error("Device failure ({code}): {message}")]
    Failure { code: u32, message: String },

    /// Underlying transport error
    #[error("Transport error: {0}")]
    Transport(anyhow::Error),
}
