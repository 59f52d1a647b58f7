//! MCP tool definitions and dispatch
//!
//! Tools are grouped by family and listed in a fixed order: scene
//! inspection, asset libraries, AI generation, direct control. Handlers
//! return `Ok` with display text for both success and Blender-reported
//! failure; `Err` is reserved for argument decoding problems.

mod assets;
mod control;
mod generation;
mod scene;

use crate::dispatcher::CommandDispatcher;
use crate::mcp::{RequestId, Response};
use blender_mcp_core::BlenderMcpError;
use serde::Serialize;
use serde_json::{Value, json};

/// Tool definition for tools/list
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// All available tools, in catalog order
pub fn list_tools() -> Vec<ToolDef> {
    let mut tools = scene::tool_defs();
    tools.extend(assets::tool_defs());
    tools.extend(generation::tool_defs());
    tools.extend(control::tool_defs());
    tools
}

/// Route a tools/call request to its handler
pub async fn handle_tool_call<D: CommandDispatcher>(
    dispatcher: &D,
    name: &str,
    arguments: Value,
    id: RequestId,
) -> Response {
    // Clients may omit "arguments" entirely for tools without required params
    let arguments = if arguments.is_null() { json!({}) } else { arguments };

    let result = match name {
        "get_scene_info" => scene::get_scene_info(dispatcher).await,
        "get_object_info" => scene::get_object_info(dispatcher, arguments).await,
        "get_viewport_screenshot" => scene::get_viewport_screenshot(dispatcher, arguments).await,
        "execute_blender_code" => scene::execute_blender_code(dispatcher, arguments).await,
        "get_polyhaven_status" => assets::get_polyhaven_status(dispatcher).await,
        "get_polyhaven_categories" => assets::get_polyhaven_categories(dispatcher, arguments).await,
        "search_polyhaven_assets" => assets::search_polyhaven_assets(dispatcher, arguments).await,
        "download_polyhaven_asset" => assets::download_polyhaven_asset(dispatcher, arguments).await,
        "set_texture" => assets::set_texture(dispatcher, arguments).await,
        "get_sketchfab_status" => assets::get_sketchfab_status(dispatcher).await,
        "search_sketchfab_models" => assets::search_sketchfab_models(dispatcher, arguments).await,
        "download_sketchfab_model" => assets::download_sketchfab_model(dispatcher, arguments).await,
        "get_hyper3d_status" => generation::get_hyper3d_status(dispatcher).await,
        "generate_hyper3d_model_via_text" => {
            generation::generate_hyper3d_model_via_text(dispatcher, arguments).await
        }
        "generate_hyper3d_model_via_images" => {
            generation::generate_hyper3d_model_via_images(dispatcher, arguments).await
        }
        "poll_rodin_job_status" => generation::poll_rodin_job_status(dispatcher, arguments).await,
        "import_generated_asset" => generation::import_generated_asset(dispatcher, arguments).await,
        "get_hunyuan3d_status" => generation::get_hunyuan3d_status(dispatcher).await,
        "generate_hunyuan3d_model" => {
            generation::generate_hunyuan3d_model(dispatcher, arguments).await
        }
        "poll_hunyuan_job_status" => {
            generation::poll_hunyuan_job_status(dispatcher, arguments).await
        }
        "import_generated_asset_hunyuan" => {
            generation::import_generated_asset_hunyuan(dispatcher, arguments).await
        }
        "get_full_context" => control::get_full_context(dispatcher).await,
        "get_viewport_state" => control::get_viewport_state(dispatcher).await,
        "switch_editor" => control::switch_editor(dispatcher, arguments).await,
        "set_viewport_shading" => control::set_viewport_shading(dispatcher, arguments).await,
        "set_view_angle" => control::set_view_angle(dispatcher, arguments).await,
        "create_material" => control::create_material(dispatcher, arguments).await,
        "get_node_tree" => control::get_node_tree(dispatcher, arguments).await,
        "add_node" => control::add_node(dispatcher, arguments).await,
        "remove_node" => control::remove_node(dispatcher, arguments).await,
        "set_node_value" => control::set_node_value(dispatcher, arguments).await,
        "connect_nodes" => control::connect_nodes(dispatcher, arguments).await,
        "disconnect_node" => control::disconnect_node(dispatcher, arguments).await,
        "get_modifier_stack" => control::get_modifier_stack(dispatcher, arguments).await,
        "add_modifier" => control::add_modifier(dispatcher, arguments).await,
        "remove_modifier" => control::remove_modifier(dispatcher, arguments).await,
        "apply_modifier" => control::apply_modifier(dispatcher, arguments).await,
        "set_modifier_settings" => control::set_modifier_settings(dispatcher, arguments).await,
        "select_object" => control::select_object(dispatcher, arguments).await,
        "set_mode" => control::set_mode(dispatcher, arguments).await,
        "add_primitive" => control::add_primitive(dispatcher, arguments).await,
        "transform_object" => control::transform_object(dispatcher, arguments).await,
        "delete_object" => control::delete_object(dispatcher, arguments).await,
        "set_frame" => control::set_frame(dispatcher, arguments).await,
        "set_frame_range" => control::set_frame_range(dispatcher, arguments).await,
        "insert_keyframe" => control::insert_keyframe(dispatcher, arguments).await,
        "delete_keyframe" => control::delete_keyframe(dispatcher, arguments).await,
        "execute_action_sequence" => {
            control::execute_action_sequence(dispatcher, arguments).await
        }
        _ => Err(BlenderMcpError::Protocol(format!("Unknown tool: {}", name))),
    };

    match result {
        Ok(text) => Response::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": text
                }]
            }),
        ),
        Err(BlenderMcpError::Protocol(message)) => Response::error(id, -32601, message),
        Err(BlenderMcpError::Serialization(message)) => Response::error(id, -32602, message),
        Err(e) => Response::error(id, -32603, e.to_string()), // Internal error
    }
}

/// Render a payload for display, indented
pub(crate) fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Render a single JSON value as plain text (strings lose their quotes)
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedDispatcher;
    use blender_mcp_core::Response as BlenderResponse;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_lists_forty_eight_tools() {
        assert_eq!(list_tools().len(), 48);
    }

    #[test]
    fn test_tool_names_are_unique() {
        let tools = list_tools();
        let names: HashSet<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_every_schema_is_an_object_schema() {
        for tool in list_tools() {
            assert_eq!(
                tool.input_schema["type"], "object",
                "schema for {} is not an object",
                tool.name
            );
            assert!(!tool.description.is_empty());
        }
    }

    #[test]
    fn test_tool_def_serializes_with_camel_case_schema_key() {
        let serialized = serde_json::to_value(&list_tools()[0]).unwrap();
        assert!(serialized.get("inputSchema").is_some());
        assert!(serialized.get("input_schema").is_none());
    }

    #[tokio::test]
    async fn test_unknown_tool_maps_to_method_not_found() {
        let dispatcher = ScriptedDispatcher::new();

        let response =
            handle_tool_call(&dispatcher, "no_such_tool", json!({}), RequestId::Number(7)).await;

        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert!(error.message.contains("no_such_tool"));
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_required_argument_maps_to_invalid_params() {
        let dispatcher = ScriptedDispatcher::new();

        let response =
            handle_tool_call(&dispatcher, "get_object_info", json!({}), RequestId::Number(8)).await;

        assert_eq!(response.error.unwrap().code, -32602);
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_call_wraps_text_content() {
        let dispatcher = ScriptedDispatcher::new()
            .reply(BlenderResponse::success(json!({"name": "Scene"})));

        let response =
            handle_tool_call(&dispatcher, "get_scene_info", json!({}), RequestId::Number(9)).await;

        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("\"name\": \"Scene\""));
    }

    #[tokio::test]
    async fn test_null_arguments_are_treated_as_empty() {
        let dispatcher = ScriptedDispatcher::new().reply(BlenderResponse::success(json!({})));

        let response = handle_tool_call(
            &dispatcher,
            "get_node_tree",
            Value::Null,
            RequestId::String("a".to_string()),
        )
        .await;

        assert!(response.error.is_none());
        assert_eq!(
            dispatcher.calls()[0].1,
            json!({"material_name": null, "tree_type": "shader"})
        );
    }

    #[test]
    fn test_value_text_unquotes_strings_only() {
        assert_eq!(value_text(&json!("plain")), "plain");
        assert_eq!(value_text(&json!(12)), "12");
        assert_eq!(value_text(&json!([1, 2])), "[1,2]");
    }
}
