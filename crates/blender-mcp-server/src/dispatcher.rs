//! Command dispatcher trait

use async_trait::async_trait;
use blender_mcp_core::{Response, Result};
use serde_json::Value;

/// Trait for sending commands to a running Blender instance
///
/// Implement this trait to expose a Blender transport to the tool catalog.
/// One call corresponds to one command/response exchange with the addon;
/// implementations own connection caching and recovery.
#[async_trait]
pub trait CommandDispatcher: Send + Sync + 'static {
    /// Send a command and wait for the matching response
    ///
    /// A returned `Response` may still carry an error status from Blender;
    /// callers decide how to surface it. `Err` means the exchange itself
    /// failed (connect, write, read or decode).
    async fn send_command(&self, command_type: &str, params: Value) -> Result<Response>;

    /// Tear down the connection to Blender, if any
    async fn disconnect(&self);

    /// Whether the addon reported PolyHaven integration enabled at the
    /// last health check
    fn polyhaven_enabled(&self) -> bool;
}
