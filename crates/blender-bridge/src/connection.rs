//! Cached TCP connection to the Blender addon
//!
//! The addon is a single-instance local application serving one command at
//! a time, so the bridge keeps exactly one connection and serializes every
//! dispatch through it. Any doubt about channel state clears the cached
//! connection; the next call reconnects from scratch.

use crate::config::BlenderConfig;
use crate::frame::read_frame;
use blender_mcp_core::{BlenderMcpError, Command, Response, Result};
use blender_mcp_server::CommandDispatcher;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Bridge to the Blender addon's socket server
pub struct BlenderBridge {
    /// TCP stream to the addon, None when disconnected
    stream: Mutex<Option<TcpStream>>,
    /// Connection configuration
    config: BlenderConfig,
    /// PolyHaven capability advertised by the addon at the last health check
    polyhaven_enabled: AtomicBool,
}

impl BlenderBridge {
    /// Create a bridge with default configuration
    pub fn new() -> Self {
        Self::with_config(BlenderConfig::default())
    }

    /// Create a bridge with custom configuration
    pub fn with_config(config: BlenderConfig) -> Self {
        Self {
            stream: Mutex::new(None),
            config,
            polyhaven_enabled: AtomicBool::new(false),
        }
    }

    /// Open the connection if none is cached
    ///
    /// Called once at startup so the first tool call does not pay the
    /// connect cost; dispatch reconnects lazily either way.
    pub async fn connect(&self) -> Result<()> {
        let mut guard = self.stream.lock().await;
        if guard.is_some() {
            return Ok(());
        }
        self.open_locked(&mut guard).await
    }

    /// Open a fresh stream into the locked slot
    async fn open_locked(&self, slot: &mut Option<TcpStream>) -> Result<()> {
        let addr = self.config.addr();
        info!("Connecting to Blender at {}", addr);

        let stream = tokio::time::timeout(self.config.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| {
                BlenderMcpError::ConnectionFailure(format!("connection timeout to {}", addr))
            })?
            .map_err(|e| {
                BlenderMcpError::ConnectionFailure(format!("failed to connect to {}: {}", addr, e))
            })?;

        stream.set_nodelay(true).map_err(|e| {
            BlenderMcpError::ConnectionFailure(format!("failed to set TCP_NODELAY: {}", e))
        })?;

        info!("Connected to Blender at {}", addr);
        *slot = Some(stream);
        Ok(())
    }

    /// Health-check a cached connection by running the lightweight
    /// PolyHaven status query through the full dispatch path
    ///
    /// Doubles as the capability check: the advertised flag is cached for
    /// the PolyHaven tools to consult without another round trip.
    async fn probe_locked(&self, slot: &mut Option<TcpStream>) -> Result<()> {
        let response = self
            .dispatch_locked(slot, "get_polyhaven_status", Value::Null)
            .await?;
        if response.is_error() {
            return Err(BlenderMcpError::ConnectionFailure(format!(
                "health check failed: {}",
                response.error_message()
            )));
        }

        let enabled = response.result()["enabled"].as_bool().unwrap_or(false);
        self.polyhaven_enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    /// One write-then-read exchange on the locked stream
    async fn dispatch_locked(
        &self,
        slot: &mut Option<TcpStream>,
        command_type: &str,
        params: Value,
    ) -> Result<Response> {
        let stream = slot
            .as_mut()
            .ok_or_else(|| BlenderMcpError::ConnectionFailure("not connected".to_string()))?;

        let command = Command::new(command_type, params);
        let bytes = command.to_bytes()?;

        let preview: String = String::from_utf8_lossy(&bytes).chars().take(200).collect();
        debug!("[MCP→Blender] len={} json={}", bytes.len(), preview);

        tokio::time::timeout(self.config.timeout, stream.write_all(&bytes))
            .await
            .map_err(|_| BlenderMcpError::ConnectionFailure("send timed out".to_string()))?
            .map_err(|e| BlenderMcpError::ConnectionFailure(format!("send failed: {}", e)))?;

        let frame = read_frame(stream, self.config.timeout).await?;
        let response = Response::from_slice(&frame)
            .map_err(|e| BlenderMcpError::MalformedResponse(e.to_string()))?;

        if response.is_error() {
            warn!("Blender error: {}", response.error_message());
        }
        Ok(response)
    }

    /// Close and clear the slot, swallowing close-time errors
    async fn teardown(slot: &mut Option<TcpStream>) {
        if let Some(mut stream) = slot.take() {
            let _ = stream.shutdown().await;
        }
    }
}

impl Default for BlenderBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CommandDispatcher for BlenderBridge {
    /// Send one command and wait for its reply
    ///
    /// The lock is held across health check, write, and receive, so at
    /// most one request is ever in flight. Every error path clears the
    /// cached connection; there are no retries here, and a timed-out
    /// command has an unknown outcome on the Blender side.
    async fn send_command(&self, command_type: &str, params: Value) -> Result<Response> {
        let mut guard = self.stream.lock().await;

        if guard.is_some() {
            if let Err(e) = self.probe_locked(&mut guard).await {
                warn!("Existing connection is no longer valid: {}", e);
                Self::teardown(&mut guard).await;
                self.open_locked(&mut guard).await?;
            }
        } else {
            self.open_locked(&mut guard).await?;
        }

        match self.dispatch_locked(&mut guard, command_type, params).await {
            Ok(response) => Ok(response),
            Err(e) => {
                Self::teardown(&mut guard).await;
                Err(e)
            }
        }
    }

    async fn disconnect(&self) {
        let mut guard = self.stream.lock().await;
        Self::teardown(&mut guard).await;
        info!("Disconnected from Blender");
    }

    fn polyhaven_enabled(&self) -> bool {
        self.polyhaven_enabled.load(Ordering::SeqCst)
    }
}
