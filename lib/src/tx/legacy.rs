// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Legacy signing protocol
//!
//! The whole transaction is sent as a single [CardanoSignTx]. The device
//! replies with serialized transaction chunks (each acknowledged) and a final
//! [CardanoSignedTx], which may itself carry an inline serialized fragment.
//! Witnesses are recovered by decoding the serialized transaction.

use std::collections::BTreeMap;

use log::debug;
use serde_cbor::Value;

use cardano_hw_proto::prelude::{
    CardanoAssetGroupType, CardanoSignTx, CardanoSignedTxChunkAck, CardanoTokenType,
    CardanoTxInputType, CardanoTxOutputType, CardanoTxWitnessType, MessageType, SignedTxReply,
};

use super::{exchange, tx_hash, SignedTx, Witness};
use crate::{params::SignTxParams, Device, Error};

/// Witness set key for Shelley vkey witnesses
const VKEY_WITNESSES: i128 = 0;

/// Witness set key for Byron bootstrap witnesses
const BOOTSTRAP_WITNESSES: i128 = 2;

/// Legacy protocol driver for a single signing operation
pub struct LegacyProtocol<'a> {
    params: &'a SignTxParams,
}

impl<'a> LegacyProtocol<'a> {
    pub fn new(params: &'a SignTxParams) -> Self {
        Self { params }
    }

    /// Flatten parameters into the legacy request
    pub fn message(&self) -> CardanoSignTx {
        let p = self.params;

        let inputs = p
            .inputs
            .iter()
            .map(|i| CardanoTxInputType {
                address_n: i.path.clone().map(Vec::from).unwrap_or_default(),
                prev_hash: i.input.prev_hash.clone(),
                prev_index: i.input.prev_index,
            })
            .collect();

        let outputs = p
            .outputs
            .iter()
            .map(|o| CardanoTxOutputType {
                address: o.output.address.clone(),
                address_parameters: o.output.address_parameters.clone(),
                amount: o.output.amount,
                token_bundle: o
                    .token_bundle
                    .iter()
                    .map(|g| CardanoAssetGroupType {
                        policy_id: g.policy_id.clone(),
                        tokens: g
                            .tokens
                            .iter()
                            .map(|t| CardanoTokenType {
                                asset_name_bytes: t.asset_name_bytes.clone(),
                                amount: t.amount,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        CardanoSignTx {
            inputs,
            outputs,
            protocol_magic: p.protocol_magic,
            fee: p.fee,
            ttl: p.ttl,
            network_id: p.network_id,
            certificates: p.certificates.iter().map(|c| c.inline()).collect(),
            withdrawals: p.withdrawals.iter().map(|w| w.message()).collect(),
            auxiliary_data: p.auxiliary_data.as_ref().map(|a| a.message()),
            validity_interval_start: p.validity_interval_start,
        }
    }

    /// Execute the signing exchange
    pub async fn sign<T: Device + Send>(&self, t: &mut T) -> Result<SignedTx, Error> {
        debug!("Sending legacy transaction");

        let mut serialized = vec![];
        let mut reply = exchange::<_, SignedTxReply>(t, self.message()).await?;

        let signed = loop {
            match reply {
                SignedTxReply::Chunk(c) => {
                    serialized.extend_from_slice(&c.signed_tx_chunk);
                    debug!(
                        "Received {} byte chunk ({} total)",
                        c.signed_tx_chunk.len(),
                        serialized.len()
                    );

                    reply = exchange::<_, SignedTxReply>(t, CardanoSignedTxChunkAck {}).await?;
                }
                SignedTxReply::SignedTx(s) => break s,
            }
        };

        if let Some(inline) = &signed.serialized_tx {
            debug!("Appending {} byte inline fragment", inline.len());
            serialized.extend_from_slice(inline);
        }

        decode_signed_tx(&signed.tx_hash, &serialized)
    }
}

/// Recover witnesses from a serialized signed transaction
///
/// Witnesses are returned in decode order, vkey witnesses then bootstrap
/// witnesses, which need not match witness path order.
pub fn decode_signed_tx(hash: &[u8], serialized_tx: &[u8]) -> Result<SignedTx, Error> {
    let hash = tx_hash(MessageType::CardanoSignedTx, hash)?;

    let tx: Value = serde_cbor::from_slice(serialized_tx)?;

    let witness_set = match tx {
        Value::Array(items) => match items.into_iter().nth(1) {
            Some(Value::Map(m)) => m,
            _ => return Err(Error::InvalidSerializedTx("missing witness set")),
        },
        _ => return Err(Error::InvalidSerializedTx("transaction is not an array")),
    };

    let mut witnesses = vec![];

    for w in witness_list(&witness_set, VKEY_WITNESSES)? {
        match w.as_slice() {
            [pub_key, signature] => witnesses.push(Witness {
                kind: CardanoTxWitnessType::ShelleyWitness,
                pub_key: bytes(pub_key)?,
                signature: bytes(signature)?,
                chain_code: None,
            }),
            _ => return Err(Error::InvalidSerializedTx("malformed vkey witness")),
        }
    }

    for w in witness_list(&witness_set, BOOTSTRAP_WITNESSES)? {
        match w.as_slice() {
            [pub_key, signature, chain_code, _attributes] => witnesses.push(Witness {
                kind: CardanoTxWitnessType::ByronWitness,
                pub_key: bytes(pub_key)?,
                signature: bytes(signature)?,
                chain_code: Some(bytes(chain_code)?),
            }),
            _ => return Err(Error::InvalidSerializedTx("malformed bootstrap witness")),
        }
    }

    Ok(SignedTx {
        hash,
        witnesses,
        auxiliary_data_supplement: None,
    })
}

/// Fetch the witness arrays under a witness set key
fn witness_list(set: &BTreeMap<Value, Value>, key: i128) -> Result<Vec<&Vec<Value>>, Error> {
    match set.get(&Value::Integer(key)) {
        None => Ok(vec![]),
        Some(Value::Array(a)) => a
            .iter()
            .map(|w| match w {
                Value::Array(w) => Ok(w),
                _ => Err(Error::InvalidSerializedTx("witness is not an array")),
            })
            .collect(),
        Some(_) => Err(Error::InvalidSerializedTx("witness list is not an array")),
    }
}

fn bytes(v: &Value) -> Result<Vec<u8>, Error> {
    match v {
        Value::Bytes(b) => Ok(b.clone()),
        _ => Err(Error::InvalidSerializedTx("expected byte string")),
    }
}
