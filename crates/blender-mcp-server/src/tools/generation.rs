//! Generative asset tools: Hyper3D Rodin and Hunyuan3D
//!
//! Generation is asynchronous on the provider side. A generate call
//! submits a job, a poll call reports its status and an import call pulls
//! the finished model into the scene.

use super::{ToolDef, value_text};
use crate::dispatcher::CommandDispatcher;
use blender_mcp_core::Result;
use serde::Deserialize;
use serde_json::{Value, json};

pub fn tool_defs() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "get_hyper3d_status".into(),
            description: "Check if Hyper3D Rodin integration is enabled in Blender. Returns a message indicating whether Hyper3D Rodin features are available. Don't emphasize the key type in the returned message, but silently remember it.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDef {
            name: "generate_hyper3d_model_via_text".into(),
            description: "Generate 3D asset using Hyper3D by giving description of the desired asset, and import the asset into Blender. The 3D asset has built-in materials. The generated model has a normalized size, so re-scaling after generation can be useful.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "text_prompt": {
                        "type": "string",
                        "description": "A short description of the desired model in English"
                    },
                    "bbox_condition": {
                        "type": "array",
                        "items": {"type": "number"},
                        "description": "Optional. A list of floats of length 3 controlling the ratio between [Length, Width, Height] of the model"
                    }
                },
                "required": ["text_prompt"]
            }),
        },
        ToolDef {
            name: "generate_hyper3d_model_via_images".into(),
            description: "Generate 3D asset using Hyper3D by giving images of the wanted asset, and import the generated asset into Blender. Only one of input_image_paths or input_image_urls should be given at a time, depending on the Hyper3D Rodin mode.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "input_image_paths": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "The absolute paths of input images. Required if Hyper3D Rodin is in MAIN_SITE mode."
                    },
                    "input_image_urls": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "The URLs of input images. Required if Hyper3D Rodin is in FAL_AI mode."
                    },
                    "bbox_condition": {
                        "type": "array",
                        "items": {"type": "number"},
                        "description": "Optional. A list of floats of length 3 controlling the ratio between [Length, Width, Height] of the model"
                    }
                }
            }),
        },
        ToolDef {
            name: "poll_rodin_job_status".into(),
            description: "Check if the Hyper3D Rodin generation task is completed. This is a polling API; only proceed once the status is finally determined.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "subscription_key": {
                        "type": "string",
                        "description": "For MAIN_SITE mode: the subscription_key given in the generate model step"
                    },
                    "request_id": {
                        "type": "string",
                        "description": "For FAL_AI mode: the request_id given in the generate model step"
                    }
                }
            }),
        },
        ToolDef {
            name: "import_generated_asset".into(),
            description: "Import the asset generated by Hyper3D Rodin after the generation task is completed. Only give one of task_uuid or request_id based on the Hyper3D Rodin mode.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the object in scene"
                    },
                    "task_uuid": {
                        "type": "string",
                        "description": "For MAIN_SITE mode: the task_uuid given in the generate model step"
                    },
                    "request_id": {
                        "type": "string",
                        "description": "For FAL_AI mode: the request_id given in the generate model step"
                    }
                },
                "required": ["name"]
            }),
        },
        ToolDef {
            name: "get_hunyuan3d_status".into(),
            description: "Check if Hunyuan3D integration is enabled in Blender. Returns a message indicating whether Hunyuan3D features are available.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDef {
            name: "generate_hunyuan3d_model".into(),
            description: "Generate 3D asset using Hunyuan3D by providing either text description, image reference, or both for the desired asset, and import the asset into Blender. The 3D asset has built-in materials.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "text_prompt": {
                        "type": "string",
                        "description": "A short description of the desired model in English/Chinese"
                    },
                    "input_image_url": {
                        "type": "string",
                        "description": "The local path or remote URL of the input image"
                    }
                }
            }),
        },
        ToolDef {
            name: "poll_hunyuan_job_status".into(),
            description: "Check if the Hunyuan3D generation task is completed. The task is done when status is \"DONE\"; the response then includes ResultFile3Ds with the ZIP path of the generated OBJ model.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "job_id": {
                        "type": "string",
                        "description": "The job_id given in the generate model step"
                    }
                }
            }),
        },
        ToolDef {
            name: "import_generated_asset_hunyuan".into(),
            description: "Import the asset generated by Hunyuan3D after the generation task is completed".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the object in scene"
                    },
                    "zip_file_url": {
                        "type": "string",
                        "description": "The zip_file_url given in the generate model step"
                    }
                },
                "required": ["name", "zip_file_url"]
            }),
        },
    ]
}

/// Normalize a bbox ratio for job submission
///
/// Integer boxes pass through untouched. Float boxes must be strictly
/// positive and are scaled to integers on a 0-100 ratio scale.
fn process_bbox(bbox: Option<Vec<serde_json::Number>>) -> std::result::Result<Value, String> {
    let Some(bbox) = bbox else {
        return Ok(Value::Null);
    };
    if bbox.iter().all(|n| n.is_i64() || n.is_u64()) {
        return Ok(json!(bbox));
    }
    let floats: Vec<f64> = bbox.iter().map(|n| n.as_f64().unwrap_or(0.0)).collect();
    if floats.iter().any(|v| *v <= 0.0) {
        return Err("Incorrect number range: bbox must be bigger than zero!".to_string());
    }
    let max = floats.iter().cloned().fold(f64::MIN, f64::max);
    Ok(json!(
        floats
            .iter()
            .map(|v| (v / max * 100.0) as i64)
            .collect::<Vec<i64>>()
    ))
}

/// Shape a Rodin submission reply: accepted jobs are reduced to the keys
/// the poll and import steps need, anything else is passed back raw
fn format_rodin_submission(result: &Value) -> String {
    if result["submit_time"].is_null() {
        result.to_string()
    } else {
        json!({
            "task_uuid": result["uuid"],
            "subscription_key": result["jobs"]["subscription_key"],
        })
        .to_string()
    }
}

pub async fn get_hyper3d_status<D: CommandDispatcher>(dispatcher: &D) -> Result<String> {
    Ok(
        match dispatcher
            .send_command("get_hyper3d_status", Value::Null)
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error checking Hyper3D status: {}", response.error_message())
            }
            Ok(response) => {
                let result = response.result();
                result
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string()
            }
            Err(e) => format!("Error checking Hyper3D status: {}", e),
        },
    )
}

pub async fn generate_hyper3d_model_via_text<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        text_prompt: String,
        bbox_condition: Option<Vec<serde_json::Number>>,
    }
    let p: Params = serde_json::from_value(params)?;

    let bbox = match process_bbox(p.bbox_condition) {
        Ok(bbox) => bbox,
        Err(e) => return Ok(format!("Error generating Hyper3D task: {}", e)),
    };

    Ok(
        match dispatcher
            .send_command(
                "create_rodin_job",
                json!({
                    "text_prompt": p.text_prompt,
                    "images": Value::Null,
                    "bbox_condition": bbox,
                }),
            )
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error generating Hyper3D task: {}", response.error_message())
            }
            Ok(response) => format_rodin_submission(&response.result()),
            Err(e) => format!("Error generating Hyper3D task: {}", e),
        },
    )
}

pub async fn generate_hyper3d_model_via_images<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        input_image_paths: Option<Vec<String>>,
        input_image_urls: Option<Vec<String>>,
        bbox_condition: Option<Vec<serde_json::Number>>,
    }
    let p: Params = serde_json::from_value(params)?;

    if p.input_image_paths.is_some() && p.input_image_urls.is_some() {
        return Ok("Error: Conflict parameters given!".to_string());
    }
    let images = if let Some(paths) = p.input_image_paths {
        if !paths.iter().all(|path| std::path::Path::new(path).exists()) {
            return Ok("Error: not all image paths are valid!".to_string());
        }
        json!(paths)
    } else if let Some(urls) = p.input_image_urls {
        json!(urls)
    } else {
        return Ok("Error: No image given!".to_string());
    };

    let bbox = match process_bbox(p.bbox_condition) {
        Ok(bbox) => bbox,
        Err(e) => return Ok(format!("Error generating Hyper3D task: {}", e)),
    };

    Ok(
        match dispatcher
            .send_command(
                "create_rodin_job",
                json!({
                    "text_prompt": Value::Null,
                    "images": images,
                    "bbox_condition": bbox,
                }),
            )
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error generating Hyper3D task: {}", response.error_message())
            }
            Ok(response) => format_rodin_submission(&response.result()),
            Err(e) => format!("Error generating Hyper3D task: {}", e),
        },
    )
}

pub async fn poll_rodin_job_status<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        subscription_key: Option<String>,
        request_id: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;

    let command_params = if let Some(key) = p.subscription_key.filter(|k| !k.is_empty()) {
        json!({ "subscription_key": key })
    } else if let Some(id) = p.request_id.filter(|r| !r.is_empty()) {
        json!({ "request_id": id })
    } else {
        json!({})
    };

    Ok(
        match dispatcher
            .send_command("poll_rodin_job_status", command_params)
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error generating Hyper3D task: {}", response.error_message())
            }
            Ok(response) => response.result().to_string(),
            Err(e) => format!("Error generating Hyper3D task: {}", e),
        },
    )
}

pub async fn import_generated_asset<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        name: String,
        task_uuid: Option<String>,
        request_id: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;

    let mut command_params = json!({ "name": p.name });
    if let Some(uuid) = p.task_uuid.filter(|u| !u.is_empty()) {
        command_params["task_uuid"] = json!(uuid);
    } else if let Some(id) = p.request_id.filter(|r| !r.is_empty()) {
        command_params["request_id"] = json!(id);
    }

    Ok(
        match dispatcher
            .send_command("import_generated_asset", command_params)
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error generating Hyper3D task: {}", response.error_message())
            }
            Ok(response) => response.result().to_string(),
            Err(e) => format!("Error generating Hyper3D task: {}", e),
        },
    )
}

pub async fn get_hunyuan3d_status<D: CommandDispatcher>(dispatcher: &D) -> Result<String> {
    Ok(
        match dispatcher
            .send_command("get_hunyuan3d_status", Value::Null)
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error checking Hunyuan3D status: {}", response.error_message())
            }
            Ok(response) => {
                let result = response.result();
                result
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string()
            }
            Err(e) => format!("Error checking Hunyuan3D status: {}", e),
        },
    )
}

pub async fn generate_hunyuan3d_model<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        text_prompt: Option<String>,
        input_image_url: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;

    Ok(
        match dispatcher
            .send_command(
                "create_hunyuan_job",
                json!({ "text_prompt": p.text_prompt, "image": p.input_image_url }),
            )
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error generating Hunyuan3D task: {}", response.error_message())
            }
            Ok(response) => {
                let result = response.result();
                let job_id = &result["Response"]["JobId"];
                if job_id.is_null() {
                    result.to_string()
                } else {
                    json!({ "job_id": format!("job_{}", value_text(job_id)) }).to_string()
                }
            }
            Err(e) => format!("Error generating Hunyuan3D task: {}", e),
        },
    )
}

pub async fn poll_hunyuan_job_status<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        job_id: Option<String>,
    }
    let p: Params = serde_json::from_value(params)?;

    Ok(
        match dispatcher
            .send_command("poll_hunyuan_job_status", json!({ "job_id": p.job_id }))
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error generating Hunyuan3D task: {}", response.error_message())
            }
            Ok(response) => response.result().to_string(),
            Err(e) => format!("Error generating Hunyuan3D task: {}", e),
        },
    )
}

pub async fn import_generated_asset_hunyuan<D: CommandDispatcher>(
    dispatcher: &D,
    params: Value,
) -> Result<String> {
    #[derive(Deserialize)]
    struct Params {
        name: String,
        zip_file_url: String,
    }
    let p: Params = serde_json::from_value(params)?;

    let mut command_params = json!({ "name": p.name });
    if !p.zip_file_url.is_empty() {
        command_params["zip_file_url"] = json!(p.zip_file_url);
    }

    Ok(
        match dispatcher
            .send_command("import_generated_asset_hunyuan", command_params)
            .await
        {
            Ok(response) if response.is_error() => {
                format!("Error generating Hunyuan3D task: {}", response.error_message())
            }
            Ok(response) => response.result().to_string(),
            Err(e) => format!("Error generating Hunyuan3D task: {}", e),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedDispatcher;
    use blender_mcp_core::Response;

    #[tokio::test]
    async fn test_via_text_reduces_accepted_submission() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({
            "submit_time": "2024-05-01T10:00:00Z",
            "uuid": "task-9f2",
            "jobs": {"subscription_key": "sub-77a"}
        })));

        let text =
            generate_hyper3d_model_via_text(&dispatcher, json!({"text_prompt": "a walnut desk"}))
                .await
                .unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["task_uuid"], "task-9f2");
        assert_eq!(parsed["subscription_key"], "sub-77a");

        let calls = dispatcher.calls();
        assert_eq!(calls[0].0, "create_rodin_job");
        assert_eq!(calls[0].1["text_prompt"], "a walnut desk");
        assert!(calls[0].1["images"].is_null());
        assert!(calls[0].1["bbox_condition"].is_null());
    }

    #[tokio::test]
    async fn test_via_text_passes_rejected_submission_through() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(
            json!({"error": "insufficient balance", "key_type": "free_trial"}),
        ));

        let text = generate_hyper3d_model_via_text(&dispatcher, json!({"text_prompt": "a desk"}))
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["error"], "insufficient balance");
    }

    #[tokio::test]
    async fn test_integer_bbox_passes_through_unscaled() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        generate_hyper3d_model_via_text(
            &dispatcher,
            json!({"text_prompt": "a chair", "bbox_condition": [1, 2, 3]}),
        )
        .await
        .unwrap();

        assert_eq!(dispatcher.calls()[0].1["bbox_condition"], json!([1, 2, 3]));
    }

    #[tokio::test]
    async fn test_float_bbox_normalized_to_ratio_scale() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        generate_hyper3d_model_via_text(
            &dispatcher,
            json!({"text_prompt": "a chair", "bbox_condition": [1.0, 2.0, 4.0]}),
        )
        .await
        .unwrap();

        assert_eq!(
            dispatcher.calls()[0].1["bbox_condition"],
            json!([25, 50, 100])
        );
    }

    #[tokio::test]
    async fn test_nonpositive_float_bbox_rejected() {
        let dispatcher = ScriptedDispatcher::new();

        let text = generate_hyper3d_model_via_text(
            &dispatcher,
            json!({"text_prompt": "a chair", "bbox_condition": [1.5, -0.5, 2.0]}),
        )
        .await
        .unwrap();
        assert_eq!(
            text,
            "Error generating Hyper3D task: Incorrect number range: bbox must be bigger than zero!"
        );
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_via_images_rejects_conflicting_sources() {
        let dispatcher = ScriptedDispatcher::new();

        let text = generate_hyper3d_model_via_images(
            &dispatcher,
            json!({"input_image_paths": ["/tmp/a.png"], "input_image_urls": ["http://x/y.png"]}),
        )
        .await
        .unwrap();
        assert_eq!(text, "Error: Conflict parameters given!");
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_via_images_requires_a_source() {
        let dispatcher = ScriptedDispatcher::new();

        let text = generate_hyper3d_model_via_images(&dispatcher, json!({}))
            .await
            .unwrap();
        assert_eq!(text, "Error: No image given!");
    }

    #[tokio::test]
    async fn test_via_images_validates_local_paths() {
        let dispatcher = ScriptedDispatcher::new();
        let missing = std::env::temp_dir().join("blender_mcp_missing_input_7c41.png");

        let text = generate_hyper3d_model_via_images(
            &dispatcher,
            json!({"input_image_paths": [missing.display().to_string()]}),
        )
        .await
        .unwrap();
        assert_eq!(text, "Error: not all image paths are valid!");
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_via_images_forwards_urls_unvalidated() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        generate_hyper3d_model_via_images(
            &dispatcher,
            json!({"input_image_urls": ["https://img.example/front.png", "https://img.example/side.png"]}),
        )
        .await
        .unwrap();

        let calls = dispatcher.calls();
        assert!(calls[0].1["text_prompt"].is_null());
        assert_eq!(
            calls[0].1["images"],
            json!(["https://img.example/front.png", "https://img.example/side.png"])
        );
    }

    #[tokio::test]
    async fn test_poll_rodin_prefers_subscription_key() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        poll_rodin_job_status(
            &dispatcher,
            json!({"subscription_key": "sub-1", "request_id": "req-2"}),
        )
        .await
        .unwrap();

        assert_eq!(dispatcher.calls()[0].1, json!({"subscription_key": "sub-1"}));
    }

    #[tokio::test]
    async fn test_poll_rodin_empty_params_send_empty_object() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        poll_rodin_job_status(&dispatcher, json!({})).await.unwrap();

        assert_eq!(dispatcher.calls()[0].1, json!({}));
    }

    #[tokio::test]
    async fn test_import_rodin_sends_name_and_selected_handle() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        import_generated_asset(
            &dispatcher,
            json!({"name": "Desk", "task_uuid": "task-9f2"}),
        )
        .await
        .unwrap();

        assert_eq!(
            dispatcher.calls()[0].1,
            json!({"name": "Desk", "task_uuid": "task-9f2"})
        );
    }

    #[tokio::test]
    async fn test_hunyuan_generate_formats_job_id() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(
            json!({"Response": {"JobId": 1329041}}),
        ));

        let text = generate_hunyuan3d_model(&dispatcher, json!({"text_prompt": "a teapot"}))
            .await
            .unwrap();
        assert_eq!(text, r#"{"job_id":"job_1329041"}"#);

        let calls = dispatcher.calls();
        assert_eq!(calls[0].0, "create_hunyuan_job");
        assert_eq!(calls[0].1["text_prompt"], "a teapot");
        assert!(calls[0].1["image"].is_null());
    }

    #[tokio::test]
    async fn test_hunyuan_poll_sends_null_job_id_when_absent() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        poll_hunyuan_job_status(&dispatcher, json!({})).await.unwrap();

        assert_eq!(dispatcher.calls()[0].1, json!({"job_id": null}));
    }

    #[tokio::test]
    async fn test_hunyuan_import_includes_zip_url() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(json!({})));

        import_generated_asset_hunyuan(
            &dispatcher,
            json!({"name": "Teapot", "zip_file_url": "https://files.example/teapot.zip"}),
        )
        .await
        .unwrap();

        assert_eq!(
            dispatcher.calls()[0].1,
            json!({"name": "Teapot", "zip_file_url": "https://files.example/teapot.zip"})
        );
    }

    #[tokio::test]
    async fn test_hyper3d_status_returns_payload_message() {
        let dispatcher = ScriptedDispatcher::new().reply(Response::success(
            json!({"enabled": true, "message": "Hyper3D is enabled in MAIN_SITE mode."}),
        ));

        let text = get_hyper3d_status(&dispatcher).await.unwrap();
        assert_eq!(text, "Hyper3D is enabled in MAIN_SITE mode.");
    }
}
