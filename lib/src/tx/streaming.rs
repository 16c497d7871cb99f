// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Streaming signing protocol
//!
//! Each message is acknowledged before the next is sent. Any unexpected
//! response aborts the exchange, witnesses collected so far are discarded.

use log::debug;

use cardano_hw_proto::prelude::{
    AuxiliaryDataAck, CardanoSignTxFinished, CardanoSignTxInit, CardanoTxBodyHash,
    CardanoTxHostAck, CardanoTxItemAck, CardanoTxWitnessRequest, CardanoTxWitnessResponse,
    MessageType,
};

use super::{exchange, tx_hash, SignedTx, Witness};
use crate::{aux_data, params::SignTxParams, Device, Error};

/// Streaming protocol driver for a single signing operation
pub struct StreamingProtocol<'a> {
    params: &'a SignTxParams,
}

impl<'a> StreamingProtocol<'a> {
    pub fn new(params: &'a SignTxParams) -> Self {
        Self { params }
    }

    /// Initialisation message announcing transaction fields and item counts
    pub fn init_message(&self) -> CardanoSignTxInit {
        let p = self.params;

        CardanoSignTxInit {
            signing_mode: p.signing_mode,
            protocol_magic: p.protocol_magic,
            network_id: p.network_id,
            inputs_count: p.inputs.len() as u32,
            outputs_count: p.outputs.len() as u32,
            fee: p.fee,
            ttl: p.ttl,
            certificates_count: p.certificates.len() as u32,
            withdrawals_count: p.withdrawals.len() as u32,
            has_auxiliary_data: p.auxiliary_data.is_some(),
            validity_interval_start: p.validity_interval_start,
            witness_requests_count: p.witness_paths.len() as u32,
        }
    }

    /// Execute the signing exchange
    pub async fn sign<T: Device + Send>(&self, t: &mut T) -> Result<SignedTx, Error> {
        let p = self.params;

        debug!("Streaming init");
        exchange::<_, CardanoTxItemAck>(t, self.init_message()).await?;

        debug!("Streaming {} inputs", p.inputs.len());
        for i in &p.inputs {
            exchange::<_, CardanoTxItemAck>(t, i.input.clone()).await?;
        }

        debug!("Streaming {} outputs", p.outputs.len());
        for o in &p.outputs {
            exchange::<_, CardanoTxItemAck>(t, o.output.clone()).await?;

            for g in &o.token_bundle {
                exchange::<_, CardanoTxItemAck>(t, g.header()).await?;

                for token in &g.tokens {
                    exchange::<_, CardanoTxItemAck>(t, token.clone()).await?;
                }
            }
        }

        debug!("Streaming {} certificates", p.certificates.len());
        for c in &p.certificates {
            exchange::<_, CardanoTxItemAck>(t, c.certificate.clone()).await?;

            for owner in &c.pool_owners {
                exchange::<_, CardanoTxItemAck>(t, owner.clone()).await?;
            }
            for relay in &c.pool_relays {
                exchange::<_, CardanoTxItemAck>(t, relay.clone()).await?;
            }
        }

        debug!("Streaming {} withdrawals", p.withdrawals.len());
        for w in &p.withdrawals {
            exchange::<_, CardanoTxItemAck>(t, w.message()).await?;
        }

        let mut auxiliary_data_supplement = None;
        if let Some(a) = &p.auxiliary_data {
            debug!("Streaming auxiliary data");
            let ack = exchange::<_, AuxiliaryDataAck>(t, a.message()).await?;
            auxiliary_data_supplement = aux_data::supplement(ack)?;
        }

        debug!("Requesting {} witnesses", p.witness_paths.len());
        let mut witnesses = Vec::with_capacity(p.witness_paths.len());
        for path in &p.witness_paths {
            let req = CardanoTxWitnessRequest {
                path: path.as_slice().to_vec(),
            };
            let w = exchange::<_, CardanoTxWitnessResponse>(t, req).await?;
            witnesses.push(Witness::from(w));
        }

        debug!("Requesting body hash");
        let h = exchange::<_, CardanoTxBodyHash>(t, CardanoTxHostAck {}).await?;
        let hash = tx_hash(MessageType::CardanoTxBodyHash, &h.tx_hash)?;

        exchange::<_, CardanoSignTxFinished>(t, CardanoTxHostAck {}).await?;

        debug!("Streaming complete");

        Ok(SignedTx {
            hash,
            witnesses,
            auxiliary_data_supplement,
        })
    }
}
