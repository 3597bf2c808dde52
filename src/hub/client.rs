//! TCP client for the telemetry hub
//!
//! The client authenticates once when the connection is opened (auth frame
//! out, ack frame back) and then writes telemetry frames without awaiting
//! acknowledgment.

use crate::hub::wire::{self, AuthAck, AuthRequest, Frame, FrameDecoder};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info};

/// Capability to push an encoded reading upstream.
///
/// `Ok` only means the payload was handed to the transport; telemetry is
/// not acknowledged by the hub.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn send(&self, device_id: &str, payload: Bytes) -> Result<()>;
}

/// Authenticated connection to the hub
#[derive(Debug)]
pub struct HubClient {
    stream: Mutex<TcpStream>,
}

impl HubClient {
    /// Connect to the hub and authenticate as `device_id`.
    ///
    /// Fails when the endpoint is unreachable, the handshake times out, or
    /// the credential is rejected. Callers are expected to treat this as a
    /// fatal startup error.
    pub async fn connect(
        addr: &str,
        device_id: &str,
        key: &str,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let mut stream = timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| anyhow!("Timed out connecting to hub at {}", addr))?
            .with_context(|| format!("Failed to connect to hub at {}", addr))?;

        let auth = Frame::Auth(AuthRequest {
            device_id: device_id.into(),
            key: key.into(),
        });
        let encoded = wire::encode(&auth)?;
        stream.write_all(&encoded).await?;

        let ack = timeout(connect_timeout, read_auth_ack(&mut stream))
            .await
            .map_err(|_| anyhow!("Timed out waiting for hub auth ack"))??;

        if !ack.accepted {
            return Err(anyhow!(
                "Hub rejected credentials for {}: {}",
                device_id,
                ack.reason
            ));
        }

        info!("Authenticated with hub as {}", device_id);
        Ok(Self {
            stream: Mutex::new(stream),
        })
    }
}

/// Read frames until the hub's auth verdict arrives
async fn read_auth_ack(stream: &mut TcpStream) -> Result<AuthAck> {
    let mut decoder = FrameDecoder::new();
    let mut read_buf = vec![0u8; 1024];

    loop {
        if let Some(frame) = decoder.decode_next()? {
            match frame {
                Frame::AuthAck(ack) => return Ok(ack),
                other => return Err(anyhow!("Unexpected frame during handshake: {:?}", other)),
            }
        }

        let n = stream.read(&mut read_buf).await?;
        if n == 0 {
            return Err(anyhow!("Hub closed connection during handshake"));
        }
        decoder.extend(&read_buf[..n]);
    }
}

#[async_trait]
impl Publisher for HubClient {
    async fn send(&self, device_id: &str, payload: Bytes) -> Result<()> {
        debug!("Publishing {} bytes for {}", payload.len(), device_id);
        let encoded = wire::encode(&Frame::Telemetry(payload))?;
        let mut stream = self.stream.lock().await;
        stream.write_all(&encoded).await?;
        Ok(())
    }
}
