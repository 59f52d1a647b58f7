//! Error types for BlenderMCP

use thiserror::Error;

/// Result type for BlenderMCP operations
pub type Result<T> = std::result::Result<T, BlenderMcpError>;

/// BlenderMCP error types
///
/// Transport errors only. A Blender-side failure arrives as a decoded
/// [`Response`](crate::Response) with error status and is passed through to
/// the caller, not mapped into this enum.
#[derive(Debug, Error)]
pub enum BlenderMcpError {
    /// Channel to the addon could not be opened or used
    #[error("Could not connect to Blender: {0}. Make sure the Blender addon is running")]
    ConnectionFailure(String),

    /// Peer closed the channel before any reply data arrived
    #[error("Connection to Blender closed before receiving any data")]
    ConnectionClosed,

    /// Gave up waiting without a complete JSON document
    #[error("Incomplete JSON response from Blender ({received} bytes received) - try simplifying your request")]
    IncompleteMessage {
        /// Bytes accumulated before giving up
        received: usize,
    },

    /// A complete document arrived but was not a valid response
    #[error("Invalid response from Blender: {0}")]
    MalformedResponse(String),

    /// JSON encoding or decoding failed locally
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Malformed or unsupported MCP request
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl From<serde_json::Error> for BlenderMcpError {
    fn from(err: serde_json::Error) -> Self {
        BlenderMcpError::Serialization(err.to_string())
    }
}
