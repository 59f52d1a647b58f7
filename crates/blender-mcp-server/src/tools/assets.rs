//! Asset library tools: PolyHaven and Sketchfab
//!
//! These tools carry the addon's legacy convention of reporting some
//! failures through an "error" key inside an otherwise successful result
//! payload, so both that key and the response status are checked.

use super::{ToolDef, value_text};
use crate::dispatcher::CommandDispatcher;
use blender_mcp_core::Result;
use serde::Deserialize;
use serde_json::{Value, json};

pub fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "get_polyhaven_status".into(),
            description: "Check if PolyHaven integration is enabled in Blender. Returns a message indicating whether PolyHaven features are available.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDef {
            name: "get_polyhaven_categories".into(),
            description: "Get a list of categories for a specific asset type on Polyhaven".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "asset_type": {
                        "type": "string",
                        "description": "The type of asset to get categories for (hdris, textures, models, all)",
                        "default": "hdris"
                    }
                }
            }),
        },
        ToolDef {
            name: "search_polyhaven_assets".into(),
            description: "Search for assets on Polyhaven with optional filtering. Returns a list of matching assets with basic information.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "asset_type": {
                        "type": "string",
                        "description": "Type of assets to search for (hdris, textures, models, all)",
                        "default": "all"
                    },
                    "categories": {
                        "type": "string",
                        "description": "Optional comma-separated list of categories to filter by"
                    }
                }
            }),
        },
        ToolDef {
            name: "download_polyhaven_asset".into(),
            description: "Download and import a Polyhaven asset into Blender".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "asset_id": {
                        "type": "string",
                        "description": "The ID of the asset to download"
                    },
                    "asset_type": {
                        "type": "string",
                        "description": "The type of asset (hdris, textures, models)"
                    },
                    "resolution": {
                        "type": "string",
                        "description": "The resolution to download (e.g., 1k, 2k, 4k)",
                        "default": "1k"
                    },
                    "file_format": {
                        "type": "string",
                        "description": "Optional file format (e.g., hdr, exr for HDRIs; jpg, png for textures; gltf, fbx for models)"
                    }
                },
                "required": ["asset_id", "asset_type"]
            }),
        },
        ToolDef {
            name: "set_texture".into(),
            description: "Apply a previously downloaded Polyhaven texture to an object".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object to apply the texture to"
                    },
                    "texture_id": {
                        "type": "string",
                        "description": "ID of the Polyhaven texture to apply (must be downloaded first)"
                    }
                },
                "required": ["object_name", "texture_id"]
            }),
        },
        ToolDef {
            name: "get_sketchfab_status".into(),
            description: "Check if Sketchfab integration is enabled in Blender. Returns a message indicating whether Sketchfab features are available.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDef {
            name: "search_sketchfab_models".into(),
            description: "Search for models on Sketchfab with optional filtering. Returns a formatted list of matching models.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Text to search for"
                    },
                    "categories": {
                        "type": "string",
                        "description": "Optional comma-separated list of categories"
                    },
                    "count": {
                        "type": "integer",
                        "description": "Maximum number of results to return (default 20)",
                        "default": 20
                    },
                    "downloadable": {
                        "type": "boolean",
                        "description": "Whether to include only downloadable models (default True)",
                        "default": true
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDef {
            name: "download_sketchfab_model".into(),
            description: "Download and import a Sketchfab model by its UID. The model must be downloadable and you must have proper access rights.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "uid": {
                        "type": "string",
                        "description": "The unique identifier of the Sketchfab model"
                    }
                },
                "required": ["uid"]
            }),
        },
    ]
}

pub async fn get_polyhaven_status<D: CommandDispatcher>(dispatcher: &D) -> Result<String> {
    Ok(
        match dispatcher
            .send_command("get_polyhaven_status", Value::Null)
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error checking PolyHaven status: {}", response.error_message())
            }
            Ok(response) => {
                let result = response.result();
                let mut message = result
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();
                if result["enabled"].as_bool().unwrap_or(false) {
                    message.push_str(
                        "PolyHaven is good at Textures, and has a wider variety of textures than Sketchfab.",
                    );
                }
                message
            }
            Err(e) => format!("Error checking PolyHaven status: {}", e),
        },
    )
}

pub async fn get_polyhaven_categories<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        #[serde(default = "default_hdris")]
        asset_type: String,
    }
    let p: Params = serde_json::from_value(params)?;

    if !dispatcher.polyhaven_enabled() {
        return Ok(
            "PolyHaven integration is disabled. Select it in the sidebar in BlenderMCP, then run it again."
                .to_string(),
        );
    }

    let response = match dispatcher
        .send_command(
            "get_polyhaven_categories",
            json!({ "asset_type": p.asset_type.clone() }),
        )
        .await
    {
        Ok(response) => response,
        Err(e) => return Ok(format!("Error getting Polyhaven categories: {}", e)),
    };
    if response.is_error() {
        return Ok(format!(
            "Error getting Polyhaven categories: {}",
            response.error_message()
        ));
    }
    let result = response.result();
    if let Some(err) = result.get("error") {
        return Ok(format!("Error: {}", value_text(err)));
    }

    let mut entries: Vec<(String, i64)> = result["categories"]
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(name, count)| (name.clone(), count.as_i64().unwrap_or(0)))
                .collect()
        })
        .unwrap_or_default();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    let mut output = format!("Categories for {}:\n\n", p.asset_type);
    for (category, count) in entries {
        output.push_str(&format!("- {}: {} assets\n", category, count));
    }
    Ok(output)
}

fn default_hdris() -> String {
    "hdris".to_string()
}

pub async fn search_polyhaven_assets<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        #[serde(default = "default_all")]
        asset_type: String,
        categories: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;

    let response = match dispatcher
        .send_command(
            "search_polyhaven_assets",
            json!({ "asset_type": p.asset_type, "categories": p.categories.clone() }),
        )
        .await
    {
        Ok(response) => response,
        Err(e) => return Ok(format!("Error searching Polyhaven assets: {}", e)),
    };
    if response.is_error() {
        return Ok(format!(
            "Error searching Polyhaven assets: {}",
            response.error_message()
        ));
    }
    let result = response.result();
    if let Some(err) = result.get("error") {
        return Ok(format!("Error: {}", value_text(err)));
    }

    let mut output = format!("Found {} assets", value_text(&result["total_count"]));
    if let Some(categories) = p.categories.as_deref().filter(|c| !c.is_empty()) {
        output.push_str(&format!(" in categories: {}", categories));
    }
    output.push_str(&format!(
        "\nShowing {} assets:\n\n",
        value_text(&result["returned_count"])
    ));

    // Most-downloaded first
    let mut entries: Vec<(&String, &Value)> = result["assets"]
        .as_object()
        .map(|map| map.iter().collect())
        .unwrap_or_default();
    entries.sort_by_key(|(_, data)| {
        std::cmp::Reverse(
            data.get("download_count")
                .and_then(Value::as_i64)
                .unwrap_or(0),
        )
    });

    for (asset_id, data) in entries {
        let name = data
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(asset_id.as_str());
        let type_idx = data.get("type").and_then(Value::as_u64).unwrap_or(0) as usize;
        let type_name = ["HDRI", "Texture", "Model"]
            .get(type_idx)
            .copied()
            .unwrap_or("Unknown");
        let categories = data
            .get("categories")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        let downloads = data
            .get("download_count")
            .map(value_text)
            .unwrap_or_else(|| "Unknown".to_string());

        output.push_str(&format!("- {} (ID: {})\n", name, asset_id));
        output.push_str(&format!("  Type: {}\n", type_name));
        output.push_str(&format!("  Categories: {}\n", categories));
        output.push_str(&format!("  Downloads: {}\n\n", downloads));
    }
    Ok(output)
}

fn default_all() -> String {
    "all".to_string()
}

pub async fn download_polyhaven_asset<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        asset_id: String,
        asset_type: String,
        #[serde(default = "default_resolution")]
        resolution: String,
        file_format: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;

    let response = match dispatcher
        .send_command(
            "download_polyhaven_asset",
            json!({
                "asset_id": p.asset_id,
                "asset_type": p.asset_type.clone(),
                "resolution": p.resolution,
                "file_format": p.file_format,
            }),
        )
        .await
    {
        Ok(response) => response,
        Err(e) => return Ok(format!("Error downloading Polyhaven asset: {}", e)),
    };
    if response.is_error() {
        return Ok(format!(
            "Error downloading Polyhaven asset: {}",
            response.error_message()
        ));
    }
    let result = response.result();
    if let Some(err) = result.get("error") {
        return Ok(format!("Error: {}", value_text(err)));
    }

    if result["success"].as_bool().unwrap_or(false) {
        let message = result
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Asset downloaded and imported successfully");
        Ok(match p.asset_type.as_str() {
            "hdris" => format!("{}. The HDRI has been set as the world environment.", message),
            "textures" => {
                let material_name = result.get("material").and_then(Value::as_str).unwrap_or("");
                let maps = join_str_array(result.get("maps"));
                format!(
                    "{}. Created material '{}' with maps: {}.",
                    message, material_name, maps
                )
            }
            "models" => format!(
                "{}. The model has been imported into the current scene.",
                message
            ),
            _ => message.to_string(),
        })
    } else {
        Ok(format!(
            "Failed to download asset: {}",
            result
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
        ))
    }
}

fn default_resolution() -> String {
    "1k".to_string()
}

pub async fn set_texture<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        object_name: String,
        texture_id: String,
    }
    let p: Params = serde_json::from_value(params)?;

    let response = match dispatcher
        .send_command(
            "set_texture",
            json!({ "object_name": p.object_name.clone(), "texture_id": p.texture_id.clone() }),
        )
        .await
    {
        Ok(response) => response,
        Err(e) => return Ok(format!("Error applying texture: {}", e)),
    };
    if response.is_error() {
        return Ok(format!("Error applying texture: {}", response.error_message()));
    }
    let result = response.result();
    if let Some(err) = result.get("error") {
        return Ok(format!("Error: {}", value_text(err)));
    }

    if result["success"].as_bool().unwrap_or(false) {
        let material_name = result.get("material").and_then(Value::as_str).unwrap_or("");
        let maps = join_str_array(result.get("maps"));

        let material_info = &result["material_info"];
        let node_count = material_info["node_count"].as_i64().unwrap_or(0);
        let has_nodes = material_info["has_nodes"].as_bool().unwrap_or(false);
        let texture_nodes = material_info["texture_nodes"].as_array().cloned().unwrap_or_default();

        let mut output = format!(
            "Successfully applied texture '{}' to {}.\n",
            p.texture_id, p.object_name
        );
        output.push_str(&format!(
            "Using material '{}' with maps: {}.\n\n",
            material_name, maps
        ));
        output.push_str(&format!("Material has nodes: {}\n", has_nodes));
        output.push_str(&format!("Total node count: {}\n\n", node_count));

        if texture_nodes.is_empty() {
            output.push_str("No texture nodes found in the material.\n");
        } else {
            output.push_str("Texture nodes:\n");
            for node in &texture_nodes {
                output.push_str(&format!(
                    "- {} using image: {}\n",
                    node.get("name").and_then(Value::as_str).unwrap_or(""),
                    node.get("image").and_then(Value::as_str).unwrap_or("")
                ));
                if let Some(connections) = node.get("connections").and_then(Value::as_array) {
                    if !connections.is_empty() {
                        output.push_str("  Connections:\n");
                        for connection in connections {
                            output.push_str(&format!("    {}\n", value_text(connection)));
                        }
                    }
                }
            }
        }
        Ok(output)
    } else {
        Ok(format!(
            "Failed to apply texture: {}",
            result
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
        ))
    }
}

pub async fn get_sketchfab_status<D: CommandDispatcher>(dispatcher: &D) -> Result<String> {
    Ok(
        match dispatcher
            .send_command("get_sketchfab_status", Value::Null)
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error checking Sketchfab status: {}", response.error_message())
            }
            Ok(response) => {
                let result = response.result();
                let mut message = result
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();
                if result["enabled"].as_bool().unwrap_or(false) {
                    message.push_str(
                        "Sketchfab is good at Realistic models, and has a wider variety of models than PolyHaven.",
                    );
                }
                message
            }
            Err(e) => format!("Error checking Sketchfab status: {}", e),
        },
    )
}

pub async fn search_sketchfab_models<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        query: String,
        categories: Option<String>,
        #[serde(default = "default_count")]
        count: i64,
        #[serde(default = "default_true")]
        downloadable: bool,
    }
    let p: Params = serde_json::from_value(params)?;

    let response = match dispatcher
        .send_command(
            "search_sketchfab_models",
            json!({
                "query": p.query.clone(),
                "categories": p.categories,
                "count": p.count,
                "downloadable": p.downloadable,
            }),
        )
        .await
    {
        Ok(response) => response,
        Err(e) => return Ok(format!("Error searching Sketchfab models: {}", e)),
    };
    if response.is_error() {
        return Ok(format!(
            "Error searching Sketchfab models: {}",
            response.error_message()
        ));
    }
    let result = response.result();
    if let Some(err) = result.get("error") {
        return Ok(format!("Error: {}", value_text(err)));
    }

    let models = result
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if models.is_empty() {
        return Ok(format!("No models found matching '{}'", p.query));
    }

    let mut output = format!("Found {} models matching '{}':\n\n", models.len(), p.query);
    for model in &models {
        if model.is_null() {
            continue;
        }
        let name = model
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unnamed model");
        let uid = model
            .get("uid")
            .and_then(Value::as_str)
            .unwrap_or("Unknown ID");
        let author = model
            .get("user")
            .and_then(Value::as_object)
            .and_then(|user| user.get("username"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown author");
        let license = model
            .get("license")
            .and_then(Value::as_object)
            .and_then(|license| license.get("label"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown");
        let face_count = model
            .get("faceCount")
            .map(value_text)
            .unwrap_or_else(|| "Unknown".to_string());
        let downloadable = if model.get("isDownloadable").and_then(Value::as_bool).unwrap_or(false)
        {
            "Yes"
        } else {
            "No"
        };

        output.push_str(&format!("- {} (UID: {})\n", name, uid));
        output.push_str(&format!("  Author: {}\n", author));
        output.push_str(&format!("  License: {}\n", license));
        output.push_str(&format!("  Face count: {}\n", face_count));
        output.push_str(&format!("  Downloadable: {}\n\n", downloadable));
    }
    Ok(output)
}

fn default_count() -> i64 {
    20
}

fn default_true() -> bool {
    true
}

pub async fn download_sketchfab_model<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        uid: String,
    }
    let p: Params = serde_json::from_value(params)?;

    let response = match dispatcher
        .send_command("download_sketchfab_model", json!({ "uid": p.uid }))
        .await
    {
        Ok(response) => response,
        Err(e) => return Ok(format!("Error downloading Sketchfab model: {}", e)),
    };
    if response.is_error() {
        return Ok(format!(
            "Error downloading Sketchfab model: {}",
            response.error_message()
        ));
    }
    let result = response.result();
    if let Some(err) = result.get("error") {
        return Ok(format!("Error: {}", value_text(err)));
    }

    if result["success"].as_bool().unwrap_or(false) {
        let imported = result
            .get("imported_objects")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        let object_names = if imported.is_empty() {
            "none".to_string()
        } else {
            imported
        };
        Ok(format!(
            "Successfully imported model. Created objects: {}",
            object_names
        ))
    } else {
        Ok(format!(
            "Failed to download model: {}",
            result
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
        ))
    }
}

fn join_str_array(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}
