//! Prompt catalog
//!
//! One prompt: the asset sourcing strategy that steers clients toward the
//! asset integrations before falling back to scripted geometry.

use crate::mcp::{RequestId, Response};
use serde::Serialize;
use serde_json::json;

/// Prompt descriptor for prompts/list
#[derive(Debug, Clone, Serialize)]
pub struct PromptDef {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<serde_json::Value>,
}

pub fn list_prompts() -> Vec<PromptDef> {
    vec![PromptDef {
        name: "asset_creation_strategy",
        description: "Defines the preferred strategy for creating assets in Blender",
        arguments: Vec::new(),
    }]
}

/// Handle a prompts/get request
pub fn handle_prompt_get(name: &str, id: RequestId) -> Response {
    match name {
        "asset_creation_strategy" => Response::success(
            id,
            json!({
                "description": "Defines the preferred strategy for creating assets in Blender",
                "messages": [{
                    "role": "user",
                    "content": {
                        "type": "text",
                        "text": ASSET_CREATION_STRATEGY,
                    }
                }]
            }),
        ),
        _ => Response::error(id, -32602, format!("Unknown prompt: {}", name)),
    }
}

const ASSET_CREATION_STRATEGY: &str = r#"When creating 3D content in Blender, always start by checking if integrations are available:

    0. Before anything, always check the scene from get_scene_info()
    1. First use the following tools to verify if the following integrations are enabled:
        1. PolyHaven
            Use get_polyhaven_status() to verify its status
            If PolyHaven is enabled:
            - For objects/models: Use download_polyhaven_asset() with asset_type="models"
            - For materials/textures: Use download_polyhaven_asset() with asset_type="textures"
            - For environment lighting: Use download_polyhaven_asset() with asset_type="hdris"
        2. Sketchfab
            Sketchfab is good at Realistic models, and has a wider variety of models than PolyHaven.
            Use get_sketchfab_status() to verify its status
            If Sketchfab is enabled:
            - For objects/models: First search using search_sketchfab_models() with your query
            - Then download specific models using download_sketchfab_model() with the UID
            - Note that only downloadable models can be accessed, and API key must be properly configured
            - Sketchfab has a wider variety of models than PolyHaven, especially for specific subjects
        3. Hyper3D(Rodin)
            Hyper3D Rodin is good at generating 3D models for single item.
            So don't try to:
            1. Generate the whole scene with one shot
            2. Generate ground using Hyper3D
            3. Generate parts of the items separately and put them together afterwards

            Use get_hyper3d_status() to verify its status
            If Hyper3D is enabled:
            - For objects/models, do the following steps:
                1. Create the model generation task
                    - Use generate_hyper3d_model_via_images() if image(s) is/are given
                    - Use generate_hyper3d_model_via_text() if generating 3D asset using text prompt
                    If key type is free_trial and insufficient balance error returned, tell the user that the free trial key can only generated limited models everyday, they can choose to:
                    - Wait for another day and try again
                    - Go to hyper3d.ai to find out how to get their own API key
                    - Go to fal.ai to get their own private API key
                2. Poll the status
                    - Use poll_rodin_job_status() to check if the generation task has completed or failed
                3. Import the asset
                    - Use import_generated_asset() to import the generated GLB model the asset
                4. After importing the asset, ALWAYS check the world_bounding_box of the imported mesh, and adjust the mesh's location and size
                    Adjust the imported mesh's location, scale, rotation, so that the mesh is on the right spot.

                You can reuse assets previous generated by running python code to duplicate the object, without creating another generation task.
        4. Hunyuan3D
            Hunyuan3D is good at generating 3D models for single item.
            So don't try to:
            1. Generate the whole scene with one shot
            2. Generate ground using Hunyuan3D
            3. Generate parts of the items separately and put them together afterwards

            Use get_hunyuan3d_status() to verify its status
            If Hunyuan3D is enabled:
                if Hunyuan3D mode is "OFFICIAL_API":
                    - For objects/models, do the following steps:
                        1. Create the model generation task
                            - Use generate_hunyuan3d_model by providing either a **text description** OR an **image(local or urls) reference**.
                            - Go to cloud.tencent.com out how to get their own SecretId and SecretKey
                        2. Poll the status
                            - Use poll_hunyuan_job_status() to check if the generation task has completed or failed
                        3. Import the asset
                            - Use import_generated_asset_hunyuan() to import the generated OBJ model the asset
                    if Hunyuan3D mode is "LOCAL_API":
                        - For objects/models, do the following steps:
                        1. Create the model generation task
                            - Use generate_hunyuan3d_model if image (local or urls)  or text prompt is given and import the asset

                You can reuse assets previous generated by running python code to duplicate the object, without creating another generation task.

    3. Always check the world_bounding_box for each item so that:
        - Ensure that all objects that should not be clipping are not clipping.
        - Items have right spatial relationship.

    4. Recommended asset source priority:
        - For specific existing objects: First try Sketchfab, then PolyHaven
        - For generic objects/furniture: First try PolyHaven, then Sketchfab
        - For custom or unique items not available in libraries: Use Hyper3D Rodin or Hunyuan3D
        - For environment lighting: Use PolyHaven HDRIs
        - For materials/textures: Use PolyHaven textures

    Only fall back to scripting when:
    - PolyHaven, Sketchfab, Hyper3D, and Hunyuan3D are all disabled
    - A simple primitive is explicitly requested
    - No suitable asset exists in any of the libraries
    - Hyper3D Rodin or Hunyuan3D failed to generate the desired asset
    - The task specifically requires a basic material/color
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_catalog() {
        let prompts = list_prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "asset_creation_strategy");
        assert!(prompts[0].arguments.is_empty());
    }

    #[test]
    fn test_prompt_get_returns_strategy_text() {
        let response = handle_prompt_get("asset_creation_strategy", RequestId::Number(1));
        let value = serde_json::to_value(&response).unwrap();
        let text = value["result"]["messages"][0]["content"]["text"]
            .as_str()
            .unwrap();
        assert!(text.starts_with("When creating 3D content in Blender"));
        assert!(text.contains("get_polyhaven_status()"));
        assert!(text.contains("Hunyuan3D"));
        assert_eq!(value["result"]["messages"][0]["role"], "user");
    }

    #[test]
    fn test_prompt_get_unknown_name() {
        let response = handle_prompt_get("scene_layout", RequestId::Number(2));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["error"]["code"], -32602);
    }
}
