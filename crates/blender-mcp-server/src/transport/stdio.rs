//! stdio transport for MCP JSON-RPC
//!
//! Newline-delimited requests in, newline-delimited responses out.
//! Notifications (requests without an id) are consumed without a reply.

use crate::BlenderMcpServer;
use crate::dispatcher::CommandDispatcher;
use crate::mcp::{
    InitializeParams, InitializeResult, PromptsCapability, Request, RequestId, Response,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::prompts::{handle_prompt_get, list_prompts};
use crate::tools::{handle_tool_call, list_tools};
use blender_mcp_core::{BlenderMcpError, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

/// Run the MCP server on stdio until the client hangs up
pub async fn run<D: CommandDispatcher>(server: BlenderMcpServer<D>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    info!("BlenderMCP server listening on stdio");

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| BlenderMcpError::Protocol(format!("Failed to read stdin: {}", e)))?;

        if bytes_read == 0 {
            // EOF - client disconnected
            info!("Client disconnected (EOF)");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        debug!("Received: {}", trimmed);

        let request: Request = match serde_json::from_str(trimmed) {
            Ok(r) => r,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                continue;
            }
        };

        let Some(response) = handle_request(&request, &server).await else {
            continue;
        };
        let response_json = serde_json::to_string(&response)?;

        debug!("Sending: {}", response_json);

        stdout
            .write_all(response_json.as_bytes())
            .await
            .map_err(|e| BlenderMcpError::Protocol(format!("Failed to write stdout: {}", e)))?;
        stdout
            .write_all(b"\n")
            .await
            .map_err(|e| BlenderMcpError::Protocol(format!("Failed to write newline: {}", e)))?;
        stdout
            .flush()
            .await
            .map_err(|e| BlenderMcpError::Protocol(format!("Failed to flush stdout: {}", e)))?;
    }

    server.dispatcher.disconnect().await;

    Ok(())
}

async fn handle_request<D: CommandDispatcher>(
    request: &Request,
    server: &BlenderMcpServer<D>,
) -> Option<Response> {
    let Some(id) = request.id.clone() else {
        // Notification. "initialized" is expected after the handshake;
        // anything else gets logged and dropped.
        if request.method != "initialized" && request.method != "notifications/initialized" {
            debug!("Ignoring notification: {}", request.method);
        }
        return None;
    };

    Some(match request.method.as_str() {
        "initialize" => handle_initialize(request, id),
        // Some clients send these with an id and expect an answer
        "initialized" | "notifications/initialized" | "ping" => {
            Response::success(id, serde_json::json!({}))
        }
        "tools/list" => handle_tools_list(id),
        "tools/call" => handle_tools_call(request, id, server).await,
        "prompts/list" => handle_prompts_list(id),
        "prompts/get" => handle_prompts_get(request, id),
        _ => Response::error(
            id,
            -32601,
            format!("Method not found: {}", request.method),
        ),
    })
}

fn handle_initialize(request: &Request, id: RequestId) -> Response {
    let params: InitializeParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(id, -32602, format!("Invalid initialize params: {}", e));
        }
    };

    info!(
        "Client connected: {} {}",
        params.client_info.name, params.client_info.version
    );

    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability {
                list_changed: false,
            },
            prompts: PromptsCapability {
                list_changed: false,
            },
            logging: serde_json::json!({}),
        },
        server_info: ServerInfo {
            name: "BlenderMCP".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    Response::success(id, serde_json::to_value(result).unwrap())
}

fn handle_tools_list(id: RequestId) -> Response {
    let tools = list_tools();
    Response::success(id, serde_json::json!({ "tools": tools }))
}

async fn handle_tools_call<D: CommandDispatcher>(
    request: &Request,
    id: RequestId,
    server: &BlenderMcpServer<D>,
) -> Response {
    #[derive(serde::Deserialize)]
    struct ToolCallParams {
        name: String,
        #[serde(default)]
        arguments: serde_json::Value,
    }

    let params: ToolCallParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(id, -32602, format!("Invalid tool call params: {}", e));
        }
    };

    handle_tool_call(
        server.dispatcher.as_ref(),
        &params.name,
        params.arguments,
        id,
    )
    .await
}

fn handle_prompts_list(id: RequestId) -> Response {
    Response::success(id, serde_json::json!({ "prompts": list_prompts() }))
}

fn handle_prompts_get(request: &Request, id: RequestId) -> Response {
    #[derive(serde::Deserialize)]
    struct PromptGetParams {
        name: String,
    }

    let params: PromptGetParams = match serde_json::from_value(request.params.clone()) {
        Ok(p) => p,
        Err(e) => {
            return Response::error(id, -32602, format!("Invalid prompt params: {}", e));
        }
    };

    handle_prompt_get(&params.name, id)
}
