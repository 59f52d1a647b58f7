//! BlenderMCP Server
//!
//! MCP server that drives a running Blender instance through the
//! BlenderMCP addon's socket server (localhost:9876 by default).
//! Connection settings come from BLENDER_HOST and BLENDER_PORT.

use anyhow::Result;
use blender_bridge::{BlenderBridge, BlenderConfig};
use blender_mcp_server::BlenderMcpServer;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP stream, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("BlenderMCP server starting up");

    let config = BlenderConfig::from_env();
    let bridge = BlenderBridge::with_config(config);

    // Warm up the connection; tool calls reconnect on demand either way
    match bridge.connect().await {
        Ok(()) => info!("Successfully connected to Blender on startup"),
        Err(e) => {
            warn!("Could not connect to Blender on startup: {}", e);
            warn!(
                "Make sure the Blender addon is running before using Blender resources or tools"
            );
        }
    }

    let server = BlenderMcpServer::new(bridge);
    server.run_stdio().await?;

    Ok(())
}
