//! # blender-mcp-server
//!
//! MCP server implementation for the BlenderMCP protocol.
//!
//! This crate provides:
//! - `CommandDispatcher` trait for routing commands to a Blender addon
//! - MCP JSON-RPC protocol handling on stdio
//! - Tool implementations (scene inspection, asset libraries, AI
//!   generation, direct control)
//! - The asset creation strategy prompt

pub mod dispatcher;
pub mod mcp;
pub mod prompts;
pub mod tools;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::CommandDispatcher;

use blender_mcp_core::Result;
use std::sync::Arc;

/// BlenderMCP server
pub struct BlenderMcpServer<D: CommandDispatcher> {
    /// Channel to the Blender addon
    dispatcher: Arc<D>,
}

impl<D: CommandDispatcher> BlenderMcpServer<D> {
    /// Create a new server around the given dispatcher
    pub fn new(dispatcher: D) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Run the server on stdio transport
    pub async fn run_stdio(self) -> Result<()> {
        transport::stdio::run(self).await
    }
}
