//! # blender-mcp-core
//!
//! Core types for BlenderMCP.
//!
//! This crate provides the types shared by the transport bridge and the MCP
//! server:
//! - Command and Response wire documents
//! - The error taxonomy for the Blender channel

pub mod command;
pub mod error;

pub use command::{Command, Response, Status};
pub use error::{BlenderMcpError, Result};
