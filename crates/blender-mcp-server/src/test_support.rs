//! Shared test double for tool handler tests

use crate::dispatcher::CommandDispatcher;
use async_trait::async_trait;
use blender_mcp_core::{BlenderMcpError, Response, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued replies in order and records every command sent.
///
/// An exhausted queue answers `ConnectionClosed`, so a handler that sends
/// more commands than its test scripted for fails loudly.
pub(crate) struct ScriptedDispatcher {
    replies: Mutex<VecDeque<Result<Response>>>,
    calls: Mutex<Vec<(String, Value)>>,
    polyhaven: bool,
}

impl ScriptedDispatcher {
    pub(crate) fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            polyhaven: true,
        }
    }

    pub(crate) fn with_polyhaven(mut self, enabled: bool) -> Self {
        self.polyhaven = enabled;
        self
    }

    pub(crate) fn reply(self, response: Response) -> Self {
        self.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    pub(crate) fn reply_err(self, error: BlenderMcpError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Commands sent so far, oldest first
    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandDispatcher for ScriptedDispatcher {
    async fn send_command(&self, command_type: &str, params: Value) -> Result<Response> {
        self.calls
            .lock()
            .unwrap()
            .push((command_type.to_string(), params));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BlenderMcpError::ConnectionClosed))
    }

    async fn disconnect(&self) {}

    fn polyhaven_enabled(&self) -> bool {
        self.polyhaven
    }
}
