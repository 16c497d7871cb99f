// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Simulated firmware and request fixtures for signing tests

use std::{
    collections::{BTreeMap, VecDeque},
    str::FromStr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use log::{debug, LevelFilter};
use serde_cbor::Value;
use serde_json::json;
use simplelog::SimpleLogger;

use cardano_hw_signer::{
    path::HARDENED,
    proto::prelude::*,
    Device, DeviceError, DeviceFirmware, DeviceHandle, FirmwareVersion, Model,
};

/// Transaction body hash returned by the simulator
pub const TX_HASH: [u8; 32] = [0x73; 32];

/// Auxiliary data hash returned for Catalyst registrations
pub const CATALYST_AUX_HASH: [u8; 32] = [0xa9; 32];

/// Catalyst registration signature returned by the simulator
pub const CATALYST_SIGNATURE: [u8; 64] = [0x74; 64];

/// Mainnet protocol magic
pub const MAINNET_MAGIC: u32 = 764824073;

/// Fault injected by the simulator at a given request index
#[derive(Copy, Clone, PartialEq, Debug)]
#[allow(unused)]
pub enum Fault {
    /// Reply with a response outside the expected set
    WrongResponseAt(usize),
    /// Report user cancellation
    CancelAt(usize),
}

/// Simulated firmware implementing the device command channel
pub struct SimDevice {
    firmware: DeviceFirmware,
    log: Arc<Mutex<Vec<Request>>>,
    fault: Option<Fault>,

    /// Legacy serialized transaction chunk size, 0 to return inline
    chunk_size: usize,
    /// Trailing serialized bytes returned inline with the final legacy message
    inline_tail: usize,
    /// Emit legacy witnesses in reverse path order
    reverse_legacy_witnesses: bool,

    host_acks: usize,
    pending: VecDeque<Response>,
}

#[allow(unused)]
impl SimDevice {
    pub fn new(model: Model, version: &str) -> Self {
        Self {
            firmware: DeviceFirmware {
                model,
                version: FirmwareVersion::from_str(version).unwrap(),
            },
            log: Arc::new(Mutex::new(vec![])),
            fault: None,
            chunk_size: 16,
            inline_tail: 0,
            reverse_legacy_witnesses: false,
            host_acks: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn with_fault(mut self, f: Fault) -> Self {
        self.fault = Some(f);
        self
    }

    pub fn with_chunking(mut self, chunk_size: usize, inline_tail: usize) -> Self {
        self.chunk_size = chunk_size;
        self.inline_tail = inline_tail;
        self
    }

    pub fn with_reversed_legacy_witnesses(mut self) -> Self {
        self.reverse_legacy_witnesses = true;
        self
    }

    /// Shared log of received requests
    pub fn log(&self) -> RequestLog {
        RequestLog(self.log.clone())
    }

    fn respond(&mut self, req: &Request) -> Result<Response, DeviceError> {
        let r = match req {
            Request::SignTxInit(_)
            | Request::TxInput(_)
            | Request::TxOutput(_)
            | Request::AssetGroup(_)
            | Request::Token(_)
            | Request::TxCertificate(_)
            | Request::PoolOwner(_)
            | Request::PoolRelayParameters(_)
            | Request::TxWithdrawal(_) => CardanoTxItemAck {}.into(),
            Request::TxAuxiliaryData(a) if a.metadata.is_some() => {
                CardanoTxAuxiliaryDataSupplement {
                    kind: CardanoTxAuxiliaryDataSupplementType::CatalystRegistrationSignature,
                    auxiliary_data_hash: Some(CATALYST_AUX_HASH.to_vec()),
                    catalyst_signature: Some(CATALYST_SIGNATURE.to_vec()),
                }
                .into()
            }
            Request::TxAuxiliaryData(_) => CardanoTxItemAck {}.into(),
            Request::TxWitnessRequest(w) => witness(&w.path).into(),
            Request::TxHostAck(_) => {
                self.host_acks += 1;
                match self.host_acks {
                    1 => CardanoTxBodyHash {
                        tx_hash: TX_HASH.to_vec(),
                    }
                    .into(),
                    _ => CardanoSignTxFinished {}.into(),
                }
            }
            Request::SignTx(tx) => {
                self.pending = self.legacy_replies(tx);
                self.next_pending()?
            }
            Request::SignedTxChunkAck(_) => self.next_pending()?,
        };

        Ok(r)
    }

    fn next_pending(&mut self) -> Result<Response, DeviceError> {
        self.pending.pop_front().ok_or(DeviceError::Failure {
            code: 1,
            message: "no legacy transaction pending".to_string(),
        })
    }

    /// Build legacy replies for a transaction
    fn legacy_replies(&self, tx: &CardanoSignTx) -> VecDeque<Response> {
        let serialized = serialize_tx(tx, self.reverse_legacy_witnesses);

        let mut replies = VecDeque::new();

        if self.chunk_size == 0 {
            replies.push_back(
                CardanoSignedTx {
                    tx_hash: TX_HASH.to_vec(),
                    serialized_tx: Some(serialized),
                }
                .into(),
            );
            return replies;
        }

        let (chunked, tail) = serialized.split_at(serialized.len() - self.inline_tail);
        for c in chunked.chunks(self.chunk_size) {
            replies.push_back(
                CardanoSignedTxChunk {
                    signed_tx_chunk: c.to_vec(),
                }
                .into(),
            );
        }

        replies.push_back(
            CardanoSignedTx {
                tx_hash: TX_HASH.to_vec(),
                serialized_tx: (!tail.is_empty()).then(|| tail.to_vec()),
            }
            .into(),
        );

        replies
    }
}

#[async_trait]
impl Device for SimDevice {
    async fn exchange(
        &mut self,
        req: Request,
        expected: &[MessageType],
    ) -> Result<Response, DeviceError> {
        let n = {
            let mut log = self.log.lock().unwrap();
            log.push(req.clone());
            log.len() - 1
        };

        debug!("sim request {}: {}", n, req.message_type());

        match self.fault {
            Some(Fault::CancelAt(i)) if i == n => return Err(DeviceError::Cancelled),
            Some(Fault::WrongResponseAt(i)) if i == n => {
                return Ok(CardanoSignTxFinished {}.into());
            }
            _ => (),
        }

        let resp = self.respond(&req)?;

        // Host expected sets must cover every firmware reply
        assert!(
            expected.contains(&resp.message_type()),
            "{} not in expected set {:?}",
            resp.message_type(),
            expected
        );

        Ok(resp)
    }

    async fn firmware(&mut self) -> Result<DeviceFirmware, DeviceError> {
        Ok(self.firmware)
    }
}

/// Shared view of requests received by a [SimDevice]
#[derive(Clone)]
pub struct RequestLog(Arc<Mutex<Vec<Request>>>);

#[allow(unused)]
impl RequestLog {
    pub fn requests(&self) -> Vec<Request> {
        self.0.lock().unwrap().clone()
    }

    pub fn types(&self) -> Vec<MessageType> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.message_type())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn count(&self, t: MessageType) -> usize {
        self.types().iter().filter(|v| **v == t).count()
    }
}

/// Setup logging and a simulated device, returning a handle and request log
#[allow(unused)]
pub fn setup(sim: SimDevice) -> (DeviceHandle<SimDevice>, RequestLog) {
    // Setup logging
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };

    let _ = SimpleLogger::init(log_level, simplelog::Config::default());

    let log = sim.log();

    (DeviceHandle::from(sim), log)
}

fn is_byron(path: &[u32]) -> bool {
    path.first() == Some(&(44 | HARDENED))
}

/// Deterministic public key for a path
pub fn sim_pub_key(path: &[u32]) -> Vec<u8> {
    let seed = path
        .iter()
        .fold(17u32, |a, c| a.wrapping_mul(31).wrapping_add(*c));

    (0..32u32)
        .map(|i| (seed.wrapping_add(i).wrapping_mul(2654435761) >> 24) as u8)
        .collect()
}

/// Simulated witness for a path, Byron paths carry a chain code
fn witness(path: &[u32]) -> CardanoTxWitnessResponse {
    let pub_key = sim_pub_key(path);
    let signature = [pub_key.as_slice(), pub_key.as_slice()].concat();

    match is_byron(path) {
        true => CardanoTxWitnessResponse {
            kind: CardanoTxWitnessType::ByronWitness,
            pub_key: pub_key.clone(),
            signature,
            chain_code: Some(pub_key.iter().rev().cloned().collect()),
        },
        false => CardanoTxWitnessResponse {
            kind: CardanoTxWitnessType::ShelleyWitness,
            pub_key,
            signature,
            chain_code: None,
        },
    }
}

/// Witness paths as collected by legacy firmware
fn legacy_witness_paths(tx: &CardanoSignTx) -> Vec<Vec<u32>> {
    let mut paths: Vec<Vec<u32>> = vec![];
    let mut add = |p: &Vec<u32>| {
        if !p.is_empty() && !paths.contains(p) {
            paths.push(p.clone());
        }
    };

    tx.inputs.iter().for_each(|i| add(&i.address_n));

    for c in &tx.certificates {
        if matches!(
            c.kind,
            CardanoCertificateType::StakeDelegation | CardanoCertificateType::StakeDeregistration
        ) {
            add(&c.path);
        }
        if let Some(p) = &c.pool_parameters {
            p.owners.iter().for_each(|o| add(&o.staking_key_path));
        }
    }

    tx.withdrawals.iter().for_each(|w| add(&w.path));

    paths
}

/// Serialize a signed transaction as legacy firmware would
pub fn serialize_tx(tx: &CardanoSignTx, reverse: bool) -> Vec<u8> {
    let (mut vkeys, mut bootstrap) = (vec![], vec![]);

    for p in legacy_witness_paths(tx) {
        let w = witness(&p);
        match w.kind {
            CardanoTxWitnessType::ShelleyWitness => vkeys.push(Value::Array(vec![
                Value::Bytes(w.pub_key),
                Value::Bytes(w.signature),
            ])),
            CardanoTxWitnessType::ByronWitness => bootstrap.push(Value::Array(vec![
                Value::Bytes(w.pub_key),
                Value::Bytes(w.signature),
                Value::Bytes(w.chain_code.unwrap_or_default()),
                Value::Bytes(vec![0xa0]),
            ])),
        }
    }

    if reverse {
        vkeys.reverse();
        bootstrap.reverse();
    }

    let mut witness_set = BTreeMap::new();
    if !vkeys.is_empty() {
        witness_set.insert(Value::Integer(0), Value::Array(vkeys));
    }
    if !bootstrap.is_empty() {
        witness_set.insert(Value::Integer(2), Value::Array(bootstrap));
    }

    let body = BTreeMap::from([(Value::Integer(2), Value::Integer(tx.fee as i128))]);

    serde_cbor::to_vec(&Value::Array(vec![
        Value::Map(body),
        Value::Map(witness_set),
        Value::Null,
    ]))
    .unwrap()
}

/// Byron input spending to a Byron address on mainnet
#[allow(unused)]
pub fn byron_request() -> serde_json::Value {
    json!({
        "signingMode": 0,
        "inputs": [{
            "path": "m/44'/1815'/0'/0/1",
            "prev_hash": "1af8fa0b754ff99253d983894e63a2b09cbb56c833ba18c3384210163f63dcfc",
            "prev_index": 0,
        }],
        "outputs": [{
            "address": "Ae2tdPwUPEZCanmBz5g2GEwFqKTKpNJcGYPKfDxoNeKZ8bRHr8366kseiK2",
            "amount": "3003112",
        }],
        "fee": "42",
        "ttl": "10",
        "protocolMagic": MAINNET_MAGIC,
        "networkId": 1,
    })
}

/// Shelley input with a change output
#[allow(unused)]
pub fn shelley_request() -> serde_json::Value {
    json!({
        "signingMode": 0,
        "inputs": [{
            "path": "m/1852'/1815'/0'/0/0",
            "prev_hash": "3b40265111d8bb3c3c608d95b3a0bf83461ace32d79336579a1939b3aad1c0b7",
            "prev_index": 0,
        }],
        "outputs": [
            {
                "address": "addr1q84sh2j72ux0l03fxndjnhctdg7hcppsaejafsa84vh7lwgmcs5wgus8qt4atk45lvt4xfxpjtwfhdmvchdf2m3u3hlsd5tq5r",
                "amount": "1",
            },
            {
                "addressParameters": {
                    "addressType": 0,
                    "path": "m/1852'/1815'/0'/0/0",
                    "stakingPath": "m/1852'/1815'/0'/2/0",
                },
                "amount": "7120787",
            },
        ],
        "fee": "42",
        "ttl": "10",
        "protocolMagic": MAINNET_MAGIC,
        "networkId": 1,
    })
}

/// Catalyst voting key registration auxiliary data
#[allow(unused)]
pub fn catalyst_auxiliary_data() -> serde_json::Value {
    json!({
        "catalystRegistrationParameters": {
            "votingPublicKey": "1af8fa0b754ff99253d983894e63a2b09cbb56c833ba18c3384210163f63dcfc",
            "stakingPath": "m/1852'/1815'/0'/2/0",
            "rewardAddressParameters": {
                "addressType": 0,
                "path": "m/1852'/1815'/0'/0/0",
                "stakingPath": "m/1852'/1815'/0'/2/0",
            },
            "nonce": "22634813",
        },
    })
}

/// Stake pool registration certificate with two owners and two relays
#[allow(unused)]
pub fn pool_registration() -> serde_json::Value {
    json!({
        "type": 3,
        "poolParameters": {
            "poolId": "f61c42cbf7c8c53af3f520508212ad3e72f674f957fe23ff0acb4973",
            "vrfKeyHash": "198890ad6c92e80fbdab554dda02da9fb49d001bbd96181f3e07f7a6ab0d0640",
            "pledge": "500000000",
            "cost": "340000000",
            "margin": { "numerator": "1", "denominator": "2" },
            "rewardAccount": "stake1uya87zwnmax0v6nnn8ptqkl6ydx4522kpsc3l3wmf3yswygwx45el",
            "owners": [
                { "stakingKeyPath": "m/1852'/1815'/0'/2/0" },
                { "stakingKeyHash": "3a7f09d3df4cf66a7399c2b05bfa234d5a29560c311fc5db4c490711" },
            ],
            "relays": [
                { "type": 0, "ipv4Address": "192.168.0.1", "port": 1234 },
                { "type": 2, "hostName": "www.test2.test" },
            ],
        },
    })
}
