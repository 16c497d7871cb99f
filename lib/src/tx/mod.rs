// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing protocols
//!
//! Firmware supporting [Feature::TransactionStreaming][crate::features::Feature]
//! is driven with the item-by-item [StreamingProtocol], older firmware with the
//! single request [LegacyProtocol]. Both produce the same [SignedTx].

use log::trace;
use serde::Serialize;

use cardano_hw_proto::prelude::{
    CardanoTxWitnessResponse, CardanoTxWitnessType, Expect, MessageType, Request,
};

use crate::{
    aux_data::AuxiliaryDataSupplement,
    helpers::{hex_bytes, hex_bytes_opt},
    Device, Error,
};

mod legacy;
pub use legacy::{decode_signed_tx, LegacyProtocol};

mod streaming;
pub use streaming::StreamingProtocol;

/// Protocol used to converse with the device
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, strum::Display)]
pub enum ProtocolMode {
    /// Item by item streaming
    Streaming,
    /// Single request with optionally chunked reply
    Legacy,
}

/// Witness produced by the device
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Witness {
    #[serde(rename = "type")]
    pub kind: CardanoTxWitnessType,
    #[serde(with = "hex_bytes")]
    pub pub_key: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
    #[serde(with = "hex_bytes_opt", skip_serializing_if = "Option::is_none")]
    pub chain_code: Option<Vec<u8>>,
}

impl From<CardanoTxWitnessResponse> for Witness {
    fn from(r: CardanoTxWitnessResponse) -> Self {
        Self {
            kind: r.kind,
            pub_key: r.pub_key,
            signature: r.signature,
            chain_code: r.chain_code,
        }
    }
}

/// Signed transaction result
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTx {
    /// Transaction body hash
    #[serde(with = "hex_bytes")]
    pub hash: [u8; 32],
    pub witnesses: Vec<Witness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary_data_supplement: Option<AuxiliaryDataSupplement>,
}

/// Signing outcome, as reported to callers
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Success(SignedTx),
    Failure { error: String },
}

impl From<Result<SignedTx, Error>> for Outcome {
    fn from(r: Result<SignedTx, Error>) -> Self {
        match r {
            Ok(tx) => Outcome::Success(tx),
            Err(e) => Outcome::Failure {
                error: e.to_string(),
            },
        }
    }
}

/// Helper to convert a device supplied transaction hash
pub(crate) fn tx_hash(message: MessageType, h: &[u8]) -> Result<[u8; 32], Error> {
    h.try_into().map_err(|_| Error::MissingField {
        message,
        field: "tx_hash",
    })
}

/// Helper to exchange a request with the device, checking the response type
pub(crate) async fn exchange<T: Device + Send, R: Expect>(
    t: &mut T,
    req: impl Into<Request>,
) -> Result<R, Error> {
    let req = req.into();
    let request = req.message_type();

    trace!("Sending {}", request);

    let resp = t.exchange(req, R::EXPECTED).await?;

    trace!("Received {}", resp.message_type());

    R::expect(resp).map_err(|r| Error::UnexpectedResponse {
        request,
        response: r.message_type(),
    })
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn render_signed_tx() {
        let tx = SignedTx {
            hash: [0x73; 32],
            witnesses: vec![Witness {
                kind: CardanoTxWitnessType::ByronWitness,
                pub_key: vec![0x89; 32],
                signature: vec![0x45; 64],
                chain_code: Some(vec![0x11; 32]),
            }],
            auxiliary_data_supplement: None,
        };

        let v = serde_json::to_value(Outcome::from(Ok(tx))).unwrap();
        assert_eq!(v["hash"], json!(hex::encode([0x73; 32])));
        assert_eq!(v["witnesses"][0]["type"], json!(0));
        assert_eq!(v["witnesses"][0]["pubKey"], json!(hex::encode([0x89; 32])));
        assert_eq!(v["witnesses"][0]["chainCode"], json!(hex::encode([0x11; 32])));
        assert!(v.get("auxiliaryDataSupplement").is_none());
    }

    #[test]
    fn render_failure() {
        let v = serde_json::to_value(Outcome::from(Err(Error::invalid("fee", "missing")))).unwrap();
        assert_eq!(v, json!({ "error": "Invalid parameter `fee`: missing" }));
    }
}
