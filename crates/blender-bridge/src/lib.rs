//! TCP bridge between the MCP server and the Blender addon
//!
//! The addon runs a socket server inside Blender (localhost:9876 by
//! default) that takes one JSON command at a time and answers with one
//! JSON document. This crate provides:
//! - Connection caching with reconnect-on-failure
//! - The accumulate-and-decode framing the addon's protocol requires
//! - A `CommandDispatcher` implementation for the MCP server

pub mod config;
pub mod connection;
pub mod frame;

pub use config::BlenderConfig;
pub use connection::BlenderBridge;
