//! Scene inspection, code execution and viewport capture tools

use super::{ToolDef, pretty, value_text};
use crate::dispatcher::CommandDispatcher;
use blender_mcp_core::Result;
use serde::Deserialize;
use serde_json::{Value, json};

pub fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "get_scene_info".into(),
            description: "Get detailed information about the current Blender scene".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDef {
            name: "get_object_info".into(),
            description: "Get detailed information about a specific object in the Blender scene"
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "object_name": {
                        "type": "string",
                        "description": "The name of the object to get information about"
                    }
                },
                "required": ["object_name"]
            }),
        },
        ToolDef {
            name: "get_viewport_screenshot".into(),
            description: "Capture a screenshot of the current Blender 3D viewport. The image is saved as a PNG under the system temp directory and its path is reported.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "max_size": {
                        "type": "integer",
                        "description": "Maximum size in pixels for the largest dimension (default 800)",
                        "default": 800
                    }
                }
            }),
        },
        ToolDef {
            name: "execute_blender_code".into(),
            description: "Execute arbitrary Python code in Blender. Make sure to do it step-by-step by breaking it into smaller chunks.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "code": {
                        "type": "string",
                        "description": "The Python code to execute"
                    }
                },
                "required": ["code"]
            }),
        },
    ]
}

pub async fn get_scene_info<D: CommandDispatcher>(dispatcher: &D) -> Result<String> {
    Ok(
        match dispatcher.send_command("get_scene_info", Value::Null).await {
            Ok(response) if response.is_error() => {
                format!("Error getting scene info: {}", response.error_message())
            }
            Ok(response) => pretty(&response.result()),
            Err(e) => format!("Error getting scene info: {}", e),
        },
    )
}

pub async fn get_object_info<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        object_name: String,
    }
    let p: Params = serde_json::from_value(params)?;

    Ok(
        match dispatcher
            .send_command("get_object_info", json!({ "name": p.object_name }))
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error getting object info: {}", response.error_message())
            }
            Ok(response) => pretty(&response.result()),
            Err(e) => format!("Error getting object info: {}", e),
        },
    )
}

pub async fn get_viewport_screenshot<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        #[serde(default = "default_max_size")]
        max_size: i64,
    }
    let p: Params = serde_json::from_value(params)?;

    // One capture file per server process, overwritten on each call
    let temp_path =
        std::env::temp_dir().join(format!("blender_screenshot_{}.png", std::process::id()));

    let response = match dispatcher
        .send_command(
            "get_viewport_screenshot",
            json!({
                "max_size": p.max_size,
                "filepath": temp_path.display().to_string(),
                "format": "png",
            }),
        )
        .await
    {
        Ok(response) => response,
        Err(e) => return Ok(format!("Screenshot failed: {}", e)),
    };
    if response.is_error() {
        return Ok(format!("Screenshot failed: {}", response.error_message()));
    }
    let result = response.result();
    if let Some(err) = result.get("error") {
        return Ok(format!("Screenshot failed: {}", value_text(err)));
    }

    match tokio::fs::metadata(&temp_path).await {
        Ok(meta) => Ok(format!(
            "Screenshot saved to {} ({} bytes)",
            temp_path.display(),
            meta.len()
        )),
        Err(_) => Ok("Screenshot failed: Screenshot file was not created".to_string()),
    }
}

fn default_max_size() -> i64 {
    800
}

pub async fn execute_blender_code<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        code: String,
    }
    let p: Params = serde_json::from_value(params)?;

    Ok(
        match dispatcher
            .send_command("execute_code", json!({ "code": p.code }))
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error executing code: {}", response.error_message())
            }
            Ok(response) => {
                let result = response.result();
                let output = result.get("result").map(value_text).unwrap_or_default();
                format!("Code executed successfully: {}", output)
            }
            Err(e) => format!("Error executing code: {}", e),
        },
    )
}
