//! MCP transports

pub mod stdio;
