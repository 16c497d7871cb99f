// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Handle for connected hardware wallets
//!
//! This provides transaction signing for a connected device
//! and is generic over [Device] implementations

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use tokio::sync::Mutex;

use cardano_hw_proto::{MessageType, Request, Response};

use crate::{
    error::DeviceError,
    features::{DeviceFirmware, FeatureGate, FeatureTable},
    params::SignTxParams,
    tx::{LegacyProtocol, Outcome, ProtocolMode, SignedTx, StreamingProtocol},
    Device, Error,
};

/// Cardano signing handle for a connected [Device].
///
/// This is generic over [Device] types to support different
/// underlying transports
#[derive(Clone)]
pub struct DeviceHandle<T: Device> {
    /// Device handle for communication
    t: Arc<Mutex<T>>,
    /// Firmware feature table
    features: Arc<FeatureTable>,
}

/// Create a [DeviceHandle] wrapper from a type implementing [Device]
impl<T: Device> From<T> for DeviceHandle<T> {
    fn from(t: T) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
            features: Arc::new(FeatureTable::default()),
        }
    }
}

impl<T: Device + Send> DeviceHandle<T> {
    /// Replace the firmware feature table
    pub fn with_feature_table(mut self, table: FeatureTable) -> Self {
        self.features = Arc::new(table);
        self
    }

    /// Fetch the active feature table
    pub fn feature_table(&self) -> &FeatureTable {
        &self.features
    }

    /// Fetch connected device firmware
    pub async fn device_firmware(&self) -> Result<DeviceFirmware, Error> {
        let fw = self.t.lock().await.firmware().await?;
        Ok(fw)
    }

    /// Sign a validated transaction
    ///
    /// Required features are checked before any message is sent, the protocol
    /// is then selected once from the firmware version.
    pub async fn sign_transaction(&self, params: &SignTxParams) -> Result<SignedTx, Error> {
        let mut t = self.t.lock().await;

        let firmware = t.firmware().await?;
        debug!("Signing transaction with {}", firmware);

        let gate = FeatureGate::new(&self.features, firmware);
        gate.check(params)?;

        let mode = gate.protocol_mode();
        debug!("Using {} protocol", mode);

        match mode {
            ProtocolMode::Streaming => StreamingProtocol::new(params).sign(&mut *t).await,
            ProtocolMode::Legacy => LegacyProtocol::new(params).sign(&mut *t).await,
        }
    }

    /// Validate and sign a JSON request, returning a caller facing [Outcome]
    pub async fn sign_json(&self, req: &Value) -> Outcome {
        let r = match SignTxParams::from_json(req) {
            Ok(p) => self.sign_transaction(&p).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &r {
            debug!("Signing failed: {}", e);
        }

        Outcome::from(r)
    }
}

/// Re-export [Device] trait for [DeviceHandle]
#[async_trait]
impl<T: Device + Send> Device for DeviceHandle<T> {
    async fn exchange(
        &mut self,
        req: Request,
        expected: &[MessageType],
    ) -> Result<Response, DeviceError> {
        self.t.lock().await.exchange(req, expected).await
    }

    async fn firmware(&mut self) -> Result<DeviceFirmware, DeviceError> {
        self.t.lock().await.firmware().await
    }
}
