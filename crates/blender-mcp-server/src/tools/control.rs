//! Direct-control tools: editors, nodes, modifiers, objects and animation
//!
//! These all follow one rule: forward the arguments field-for-field
//! (absent optionals go over the wire as null, the addon resolves them
//! against the active object or material) and pretty-print the result.

use super::{ToolDef, pretty};
use crate::dispatcher::CommandDispatcher;
use blender_mcp_core::Result;
use serde::Deserialize;
use serde_json::{Value, json};

pub fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "get_full_context".into(),
            description: "Get complete Blender context including active editor, viewport state, node editor state, selection, scene settings, objects, materials, and modifiers".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDef {
            name: "get_viewport_state".into(),
            description: "Get current viewport settings including shading mode, overlays, camera view, and 3D cursor position".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDef {
            name: "switch_editor".into(),
            description: "Switch the active editor type in Blender".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "editor_type": {
                        "type": "string",
                        "description": "Type of editor (VIEW_3D, NODE_EDITOR, PROPERTIES, OUTLINER, TIMELINE, etc.)"
                    }
                },
                "required": ["editor_type"]
            }),
        },
        ToolDef {
            name: "set_viewport_shading".into(),
            description: "Change viewport shading mode".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "shading_type": {
                        "type": "string",
                        "description": "Shading mode (WIREFRAME, SOLID, MATERIAL, RENDERED)"
                    }
                },
                "required": ["shading_type"]
            }),
        },
        ToolDef {
            name: "set_view_angle".into(),
            description: "Set the viewport camera angle".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "view": {
                        "type": "string",
                        "description": "View angle (TOP, BOTTOM, FRONT, BACK, LEFT, RIGHT, CAMERA)"
                    }
                },
                "required": ["view"]
            }),
        },
        ToolDef {
            name: "create_material".into(),
            description: "Create a new material with principled BSDF shader".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Name for the new material"
                    },
                    "assign_to_active": {
                        "type": "boolean",
                        "description": "Whether to assign to the active object (default: True)",
                        "default": true
                    }
                },
                "required": ["name"]
            }),
        },
        ToolDef {
            name: "get_node_tree".into(),
            description: "Get detailed node tree structure from a material or geometry nodes".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "material_name": {
                        "type": "string",
                        "description": "Name of the material (uses active material if not specified)"
                    },
                    "tree_type": {
                        "type": "string",
                        "description": "Type of node tree (shader, geometry, compositor)",
                        "default": "shader"
                    }
                }
            }),
        },
        ToolDef {
            name: "add_node".into(),
            description: "Add a node to a material's shader node tree".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "node_type": {
                        "type": "string",
                        "description": "Type of node (e.g., ShaderNodeMixRGB, ShaderNodeTexImage)"
                    },
                    "location": {
                        "type": "array",
                        "items": {"type": "number"},
                        "description": "X, Y location [x, y] (optional)"
                    },
                    "material_name": {
                        "type": "string",
                        "description": "Name of the material (uses active if not specified)"
                    }
                },
                "required": ["node_type"]
            }),
        },
        ToolDef {
            name: "remove_node".into(),
            description: "Remove a node from a material's shader node tree".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "node_name": {
                        "type": "string",
                        "description": "Name of the node to remove"
                    },
                    "material_name": {
                        "type": "string",
                        "description": "Name of the material (uses active if not specified)"
                    }
                },
                "required": ["node_name"]
            }),
        },
        ToolDef {
            name: "set_node_value".into(),
            description: "Set an input value on a shader node".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "node_name": {
                        "type": "string",
                        "description": "Name of the node"
                    },
                    "input_name": {
                        "type": "string",
                        "description": "Name of the input (e.g., 'Base Color', 'Roughness')"
                    },
                    "value": {
                        "description": "Value to set (number or array for colors/vectors)"
                    },
                    "material_name": {
                        "type": "string",
                        "description": "Name of the material (uses active if not specified)"
                    }
                },
                "required": ["node_name", "input_name", "value"]
            }),
        },
        ToolDef {
            name: "connect_nodes".into(),
            description: "Connect two nodes in a material's shader node tree".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "from_node": {
                        "type": "string",
                        "description": "Name of the source node"
                    },
                    "from_socket": {
                        "type": "string",
                        "description": "Name or index of the output socket"
                    },
                    "to_node": {
                        "type": "string",
                        "description": "Name of the destination node"
                    },
                    "to_socket": {
                        "type": "string",
                        "description": "Name or index of the input socket"
                    },
                    "material_name": {
                        "type": "string",
                        "description": "Name of the material (uses active if not specified)"
                    }
                },
                "required": ["from_node", "from_socket", "to_node", "to_socket"]
            }),
        },
        ToolDef {
            name: "disconnect_node".into(),
            description: "Disconnect a node's socket from its connections".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "node_name": {
                        "type": "string",
                        "description": "Name of the node"
                    },
                    "socket_name": {
                        "type": "string",
                        "description": "Name or index of the socket"
                    },
                    "socket_type": {
                        "type": "string",
                        "description": "'input' or 'output' (default: input)",
                        "default": "input"
                    },
                    "material_name": {
                        "type": "string",
                        "description": "Name of the material (uses active if not specified)"
                    }
                },
                "required": ["node_name", "socket_name"]
            }),
        },
        ToolDef {
            name: "get_modifier_stack".into(),
            description: "Get the complete modifier stack for an object with all settings".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object (uses active object if not specified)"
                    }
                }
            }),
        },
        ToolDef {
            name: "add_modifier".into(),
            description: "Add a modifier to an object".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "modifier_type": {
                        "type": "string",
                        "description": "Type of modifier (SUBSURF, BEVEL, ARRAY, MIRROR, SOLIDIFY, BOOLEAN)"
                    },
                    "name": {
                        "type": "string",
                        "description": "Custom name for the modifier (optional)"
                    },
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object (uses active if not specified)"
                    },
                    "settings": {
                        "type": "object",
                        "description": "Modifier settings dict (optional)"
                    }
                },
                "required": ["modifier_type"]
            }),
        },
        ToolDef {
            name: "remove_modifier".into(),
            description: "Remove a modifier from an object".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "modifier_name": {
                        "type": "string",
                        "description": "Name of the modifier to remove"
                    },
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object (uses active if not specified)"
                    }
                },
                "required": ["modifier_name"]
            }),
        },
        ToolDef {
            name: "apply_modifier".into(),
            description: "Apply a modifier to permanently bake its effect into the mesh".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "modifier_name": {
                        "type": "string",
                        "description": "Name of the modifier to apply"
                    },
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object (uses active if not specified)"
                    }
                },
                "required": ["modifier_name"]
            }),
        },
        ToolDef {
            name: "set_modifier_settings".into(),
            description: "Update settings on an existing modifier".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "modifier_name": {
                        "type": "string",
                        "description": "Name of the modifier"
                    },
                    "settings": {
                        "type": "object",
                        "description": "Settings dict to update"
                    },
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object (uses active if not specified)"
                    }
                },
                "required": ["modifier_name", "settings"]
            }),
        },
        ToolDef {
            name: "select_object".into(),
            description: "Select an object in the scene".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object to select"
                    },
                    "extend": {
                        "type": "boolean",
                        "description": "Whether to add to existing selection (default: False)",
                        "default": false
                    },
                    "active": {
                        "type": "boolean",
                        "description": "Whether to make this the active object (default: True)",
                        "default": true
                    }
                },
                "required": ["object_name"]
            }),
        },
        ToolDef {
            name: "set_mode".into(),
            description: "Set the interaction mode".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "mode": {
                        "type": "string",
                        "description": "Mode to switch to (OBJECT, EDIT, SCULPT, VERTEX_PAINT, WEIGHT_PAINT, TEXTURE_PAINT, POSE)"
                    },
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object (uses active if not specified)"
                    }
                },
                "required": ["mode"]
            }),
        },
        ToolDef {
            name: "add_primitive".into(),
            description: "Add a primitive mesh object".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "primitive_type": {
                        "type": "string",
                        "description": "Type of primitive (CUBE, SPHERE, CYLINDER, CONE, TORUS, PLANE, CIRCLE, MONKEY, EMPTY)"
                    },
                    "location": {
                        "type": "array",
                        "items": {"type": "number"},
                        "description": "Location [x, y, z] (optional)"
                    },
                    "size": {
                        "type": "number",
                        "description": "Size/scale of the primitive (optional)"
                    },
                    "name": {
                        "type": "string",
                        "description": "Custom name for the object (optional)"
                    }
                },
                "required": ["primitive_type"]
            }),
        },
        ToolDef {
            name: "transform_object".into(),
            description: "Transform an object's location, rotation, or scale".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object (uses active if not specified)"
                    },
                    "location": {
                        "type": "array",
                        "items": {"type": "number"},
                        "description": "New location [x, y, z] (optional)"
                    },
                    "rotation": {
                        "type": "array",
                        "items": {"type": "number"},
                        "description": "New rotation in degrees [x, y, z] (optional)"
                    },
                    "scale": {
                        "type": "array",
                        "items": {"type": "number"},
                        "description": "New scale [x, y, z] (optional)"
                    }
                }
            }),
        },
        ToolDef {
            name: "delete_object".into(),
            description: "Delete an object from the scene".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object to delete (uses active if not specified)"
                    }
                }
            }),
        },
        ToolDef {
            name: "set_frame".into(),
            description: "Set the current frame in the timeline".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "frame": {
                        "type": "integer",
                        "description": "Frame number to set"
                    }
                },
                "required": ["frame"]
            }),
        },
        ToolDef {
            name: "set_frame_range".into(),
            description: "Set the animation frame range".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "start": {
                        "type": "integer",
                        "description": "Start frame"
                    },
                    "end": {
                        "type": "integer",
                        "description": "End frame"
                    }
                },
                "required": ["start", "end"]
            }),
        },
        ToolDef {
            name: "insert_keyframe".into(),
            description: "Insert a keyframe for an object property".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "data_path": {
                        "type": "string",
                        "description": "Property path to keyframe (e.g., 'location', 'rotation_euler', 'scale')"
                    },
                    "frame": {
                        "type": "integer",
                        "description": "Frame number (uses current frame if not specified)"
                    },
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object (uses active if not specified)"
                    }
                },
                "required": ["data_path"]
            }),
        },
        ToolDef {
            name: "delete_keyframe".into(),
            description: "Delete a keyframe from an object property".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "data_path": {
                        "type": "string",
                        "description": "Property path of the keyframe"
                    },
                    "frame": {
                        "type": "integer",
                        "description": "Frame number (uses current frame if not specified)"
                    },
                    "object_name": {
                        "type": "string",
                        "description": "Name of the object (uses active if not specified)"
                    }
                },
                "required": ["data_path"]
            }),
        },
        ToolDef {
            name: "execute_action_sequence".into(),
            description: "Execute multiple actions in sequence atomically. Useful for multi-step operations.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "actions": {
                        "type": "array",
                        "items": {"type": "object"},
                        "description": "List of action dicts with 'action' and 'params' keys. Example: [{\"action\": \"add_primitive\", \"params\": {\"primitive_type\": \"CUBE\"}}]"
                    }
                },
                "required": ["actions"]
            }),
        },
    ]
}

/// Forward one command and format the reply with the family's uniform rule
async fn forward_pretty<D: CommandDispatcher>(
    dispatcher: &D,
    command_type: &str,
    command_params: Value,
    context: &str,
) -> String {
    match dispatcher.send_command(command_type, command_params).await {
        Ok(response) if response.is_error() => format!("Error: {}", response.error_message()),
        Ok(response) => pretty(&response.result()),
        Err(e) => format!("Error {}: {}", context, e),
    }
}

pub async fn get_full_context<D: CommandDispatcher>(dispatcher: &D) -> Result<String> {
    Ok(forward_pretty(dispatcher, "get_full_context", Value::Null, "getting full context").await)
}

pub async fn get_viewport_state<D: CommandDispatcher>(dispatcher: &D) -> Result<String> {
    Ok(forward_pretty(dispatcher, "get_viewport_state", Value::Null, "getting viewport state").await)
}

pub async fn switch_editor<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        editor_type: String,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "switch_editor",
        json!({ "editor_type": p.editor_type }),
        "switching editor",
    )
    .await)
}

pub async fn set_viewport_shading<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        shading_type: String,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "set_viewport_shading",
        json!({ "shading_type": p.shading_type }),
        "setting viewport shading",
    )
    .await)
}

pub async fn set_view_angle<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        view: String,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "set_view_angle",
        json!({ "view": p.view }),
        "setting view angle",
    )
    .await)
}

pub async fn create_material<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        name: String,
        #[serde(default = "default_true")]
        assign_to_active: bool,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "create_material",
        json!({ "name": p.name, "assign_to_active": p.assign_to_active }),
        "creating material",
    )
    .await)
}

pub async fn get_node_tree<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        material_name: Option<String>,
        #[serde(default = "default_tree_type")]
        tree_type: String,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "get_node_tree",
        json!({ "material_name": p.material_name, "tree_type": p.tree_type }),
        "getting node tree",
    )
    .await)
}

fn default_tree_type() -> String {
    "shader".to_string()
}

pub async fn add_node<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        node_type: String,
        location: Option<Vec<f64>>,
        material_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "add_node",
        json!({
            "node_type": p.node_type,
            "location": p.location,
            "material_name": p.material_name,
        }),
        "adding node",
    )
    .await)
}

pub async fn remove_node<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        node_name: String,
        material_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "remove_node",
        json!({ "node_name": p.node_name, "material_name": p.material_name }),
        "removing node",
    )
    .await)
}

pub async fn set_node_value<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        node_name: String,
        input_name: String,
        value: Value,
        material_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "set_node_value",
        json!({
            "node_name": p.node_name,
            "input_name": p.input_name,
            "value": p.value,
            "material_name": p.material_name,
        }),
        "setting node value",
    )
    .await)
}

pub async fn connect_nodes<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        from_node: String,
        from_socket: String,
        to_node: String,
        to_socket: String,
        material_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "connect_nodes",
        json!({
            "from_node": p.from_node,
            "from_socket": p.from_socket,
            "to_node": p.to_node,
            "to_socket": p.to_socket,
            "material_name": p.material_name,
        }),
        "connecting nodes",
    )
    .await)
}

pub async fn disconnect_node<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        node_name: String,
        socket_name: String,
        #[serde(default = "default_socket_type")]
        socket_type: String,
        material_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "disconnect_node",
        json!({
            "node_name": p.node_name,
            "socket_name": p.socket_name,
            "socket_type": p.socket_type,
            "material_name": p.material_name,
        }),
        "disconnecting node",
    )
    .await)
}

fn default_socket_type() -> String {
    "input".to_string()
}

pub async fn get_modifier_stack<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        object_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "get_modifier_stack",
        json!({ "object_name": p.object_name }),
        "getting modifier stack",
    )
    .await)
}

pub async fn add_modifier<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        modifier_type: String,
        name: Option<String>,
        object_name: Option<String>,
        settings: Option<Value>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "add_modifier",
        json!({
            "modifier_type": p.modifier_type,
            "name": p.name,
            "object_name": p.object_name,
            "settings": p.settings.unwrap_or_else(|| json!({})),
        }),
        "adding modifier",
    )
    .await)
}

pub async fn remove_modifier<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        modifier_name: String,
        object_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "remove_modifier",
        json!({ "modifier_name": p.modifier_name, "object_name": p.object_name }),
        "removing modifier",
    )
    .await)
}

pub async fn apply_modifier<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        modifier_name: String,
        object_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "apply_modifier",
        json!({ "modifier_name": p.modifier_name, "object_name": p.object_name }),
        "applying modifier",
    )
    .await)
}

pub async fn set_modifier_settings<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        modifier_name: String,
        settings: Value,
        object_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "set_modifier_settings",
        json!({
            "modifier_name": p.modifier_name,
            "settings": p.settings,
            "object_name": p.object_name,
        }),
        "setting modifier settings",
    )
    .await)
}

pub async fn select_object<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        object_name: String,
        #[serde(default)]
        extend: bool,
        #[serde(default = "default_true")]
        active: bool,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "select_object",
        json!({ "object_name": p.object_name, "extend": p.extend, "active": p.active }),
        "selecting object",
    )
    .await)
}

pub async fn set_mode<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        mode: String,
        object_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "set_mode",
        json!({ "mode": p.mode, "object_name": p.object_name }),
        "setting mode",
    )
    .await)
}

pub async fn add_primitive<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        primitive_type: String,
        location: Option<Vec<f64>>,
        size: Option<f64>,
        name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "add_primitive",
        json!({
            "primitive_type": p.primitive_type,
            "location": p.location,
            "size": p.size,
            "name": p.name,
        }),
        "adding primitive",
    )
    .await)
}

pub async fn transform_object<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        object_name: Option<String>,
        location: Option<Vec<f64>>,
        rotation: Option<Vec<f64>>,
        scale: Option<Vec<f64>>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "transform_object",
        json!({
            "object_name": p.object_name,
            "location": p.location,
            "rotation": p.rotation,
            "scale": p.scale,
        }),
        "transforming object",
    )
    .await)
}

pub async fn delete_object<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        object_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "delete_object",
        json!({ "object_name": p.object_name }),
        "deleting object",
    )
    .await)
}

pub async fn set_frame<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        frame: i64,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "set_frame",
        json!({ "frame": p.frame }),
        "setting frame",
    )
    .await)
}

pub async fn set_frame_range<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        start: i64,
        end: i64,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "set_frame_range",
        json!({ "start": p.start, "end": p.end }),
        "setting frame range",
    )
    .await)
}

pub async fn insert_keyframe<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        data_path: String,
        frame: Option<i64>,
        object_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "insert_keyframe",
        json!({
            "data_path": p.data_path,
            "frame": p.frame,
            "object_name": p.object_name,
        }),
        "inserting keyframe",
    )
    .await)
}

pub async fn delete_keyframe<D: CommandDispatcher>(dispatcher: &D, params: Value) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        data_path: String,
        frame: Option<i64>,
        object_name: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "delete_keyframe",
        json!({
            "data_path": p.data_path,
            "frame": p.frame,
            "object_name": p.object_name,
        }),
        "deleting keyframe",
    )
    .await)
}

pub async fn execute_action_sequence<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        actions: Vec<Value>,
    }
    let p: Params = serde_json::from_value(params)?;
    Ok(forward_pretty(
        dispatcher,
        "execute_action_sequence",
        json!({ "actions": p.actions }),
        "executing action sequence",
    )
    .await)
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedDispatcher;
    use blender_mcp_core::{BlenderMcpError, Response};

    #[tokio::test]
    async fn test_full_context_pretty_prints_result() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(
            json!({"active_editor": "VIEW_3D", "mode": "OBJECT"}),
        ));

        let text = get_full_context(&dispatcher).await.unwrap();
        assert!(text.contains("\"active_editor\": \"VIEW_3D\""));
    }

    #[tokio::test]
    async fn test_domain_error_uses_bare_error_prefix() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::error("Unknown editor type: X"));

        let text = switch_editor(&dispatcher, json!({"editor_type": "X"}))
            .await
            .unwrap();
        assert_eq!(text, "Error: Unknown editor type: X");
    }

    #[tokio::test]
    async fn test_transport_error_uses_context_phrase() {
        let dispatcher = ScriptedDispatcher::new().reply_err(BlenderMcpError::ConnectionClosed);

        let text = switch_editor(&dispatcher, json!({"editor_type": "VIEW_3D"}))
            .await
            .unwrap();
        assert!(text.starts_with("Error switching editor:"));
    }

    #[tokio::test]
    async fn test_node_tree_defaults_go_over_the_wire() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        get_node_tree(&dispatcher, json!({})).await.unwrap();

        assert_eq!(
            dispatcher.calls()[0].1,
            json!({"material_name": null, "tree_type": "shader"})
        );
    }

    #[tokio::test]
    async fn test_add_modifier_defaults_settings_to_empty_object() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        add_modifier(&dispatcher, json!({"modifier_type": "SUBSURF"}))
            .await
            .unwrap();

        let sent = &dispatcher.calls()[0].1;
        assert_eq!(sent["settings"], json!({}));
        assert!(sent["name"].is_null());
        assert!(sent["object_name"].is_null());
    }

    #[tokio::test]
    async fn test_select_object_boolean_defaults() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        select_object(&dispatcher, json!({"object_name": "Cube"}))
            .await
            .unwrap();

        assert_eq!(
            dispatcher.calls()[0].1,
            json!({"object_name": "Cube", "extend": false, "active": true})
        );
    }

    #[tokio::test]
    async fn test_transform_object_sends_null_for_untouched_channels() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        transform_object(&dispatcher, json!({"location": [1.0, 2.0, 3.0]}))
            .await
            .unwrap();

        let sent = &dispatcher.calls()[0].1;
        assert_eq!(sent["location"], json!([1.0, 2.0, 3.0]));
        assert!(sent["object_name"].is_null());
        assert!(sent["rotation"].is_null());
        assert!(sent["scale"].is_null());
    }

    #[tokio::test]
    async fn test_set_node_value_forwards_arbitrary_value() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        set_node_value(
            &dispatcher,
            json!({
                "node_name": "Principled BSDF",
                "input_name": "Base Color",
                "value": [0.8, 0.1, 0.1, 1.0]
            }),
        )
        .await
        .unwrap();

        assert_eq!(
            dispatcher.calls()[0].1["value"],
            json!([0.8, 0.1, 0.1, 1.0])
        );
    }

    #[tokio::test]
    async fn test_frame_range_requires_both_bounds() {
        let dispatcher = ScriptedDispatcher::new();
        assert!(set_frame_range(&dispatcher, json!({"start": 1})).await.is_err());
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_action_sequence_forwards_actions_verbatim() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(
            json!({"executed": 2, "results": []}),
        ));

        let actions = json!([
            {"action": "add_primitive", "params": {"primitive_type": "CUBE"}},
            {"action": "set_frame", "params": {"frame": 10}}
        ]);
        execute_action_sequence(&dispatcher, json!({"actions": actions.clone()}))
            .await
            .unwrap();

        assert_eq!(dispatcher.calls()[0].1, json!({"actions": actions}));
    }
}
