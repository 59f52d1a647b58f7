//! Wire documents exchanged with the Blender addon
//!
//! One request, one reply, each a single JSON document with no framing
//! around it. Commands are {"type": "...", "params": {...}}; replies carry
//! a status plus either a result payload or an error message.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command document sent to the addon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Command name, e.g. "get_scene_info"
    #[serde(rename = "type")]
    pub command_type: String,
    /// Parameter object, `{}` when the command takes none
    #[serde(default = "empty_params")]
    pub params: Value,
}

fn empty_params() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Command {
    /// Build a command, normalizing absent params to `{}`
    pub fn new(command_type: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Null => empty_params(),
            other => other,
        };
        Self {
            command_type: command_type.into(),
            params,
        }
    }

    /// Serialize to the single JSON document the addon expects
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Reply status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Reply document from the addon
///
/// `result` accompanies success, `message` accompanies error. Extra fields
/// from newer addon versions are tolerated and dropped on decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    pub fn success(result: Value) -> Self {
        Self {
            status: Status::Success,
            result: Some(result),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            result: None,
            message: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    /// Result payload, `{}` when the addon sent none
    pub fn result(&self) -> Value {
        self.result.clone().unwrap_or_else(empty_params)
    }

    /// Error message, with the addon's historical fallback text
    pub fn error_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "Unknown error from Blender".to_string())
    }

    /// Decode a fully-received document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_wire_format() {
        // Exact JSON format expected by the addon
        let cmd = Command::new("get_scene_info", Value::Null);
        let bytes = cmd.to_bytes().unwrap();
        let json = String::from_utf8_lossy(&bytes);

        assert_eq!(json, r#"{"type":"get_scene_info","params":{}}"#);
    }

    #[test]
    fn test_command_roundtrip() {
        let cmd = Command::new(
            "set_texture",
            json!({"object_name": "Cube", "texture_id": "rocky_trail"}),
        );

        let bytes = cmd.to_bytes().unwrap();
        let decoded: Command = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(decoded.command_type, "set_texture");
        assert_eq!(decoded.params["texture_id"], "rocky_trail");
    }

    #[test]
    fn test_response_success_from_addon() {
        let json = r#"{"status":"success","result":{"name":"Scene","object_count":3}}"#;

        let resp = Response::from_slice(json.as_bytes()).unwrap();
        assert!(!resp.is_error());
        assert_eq!(resp.result()["object_count"], 3);
    }

    #[test]
    fn test_response_error_from_addon() {
        let json = r#"{"status":"error","message":"Object not found: Cube"}"#;

        let resp = Response::from_slice(json.as_bytes()).unwrap();
        assert!(resp.is_error());
        assert_eq!(resp.error_message(), "Object not found: Cube");
    }

    #[test]
    fn test_response_error_without_message() {
        let json = r#"{"status":"error"}"#;

        let resp = Response::from_slice(json.as_bytes()).unwrap();
        assert_eq!(resp.error_message(), "Unknown error from Blender");
    }

    #[test]
    fn test_response_tolerates_unknown_fields() {
        let json = r#"{"status":"success","result":{},"elapsed_ms":12}"#;

        let resp = Response::from_slice(json.as_bytes()).unwrap();
        assert!(!resp.is_error());
    }

    #[test]
    fn test_response_reencode_is_identity() {
        let json = r#"{"status":"success","result":{"objects":[{"name":"Cube"},{"name":"Light"}]}}"#;

        let first = Response::from_slice(json.as_bytes()).unwrap();
        let reencoded = serde_json::to_vec(&first).unwrap();
        let second = Response::from_slice(&reencoded).unwrap();

        assert_eq!(first.status, second.status);
        assert_eq!(first.result, second.result);
        assert_eq!(first.message, second.message);
    }
}
