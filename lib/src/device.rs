// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Device command channel

use async_trait::async_trait;

use cardano_hw_proto::{MessageType, Request, Response};

use crate::{error::DeviceError, features::DeviceFirmware};

/// Device command channel, implemented by transports
///
/// Each call sends one request and waits for a single response, which should
/// be one of `expected`. Transports handle framing and any timeouts.
#[async_trait]
pub trait Device {
    /// Send a request and wait for the device response
    async fn exchange(
        &mut self,
        req: Request,
        expected: &[MessageType],
    ) -> Result<Response, DeviceError>;

    /// Fetch connected device model and firmware version
    async fn firmware(&mut self) -> Result<DeviceFirmware, DeviceError>;
}
