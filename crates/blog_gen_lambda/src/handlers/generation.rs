use tracing::{debug, error, info};

use crate::adapters::model_invoker::ModelInvoker;
use crate::config::InferenceSettings;
use crate::error::GenerationError;
use crate::logging::error_chain;
use crate::runtime::contract::{
    decode_inference_response, encode_inference_request, InferenceRequest,
};
use crate::runtime::prompt::{build_prompt, clean_generation};

const COMPONENT: &str = "generation";

/// Generates a blog post for `topic`, returning an empty string when the
/// model fails or produces nothing. Failures are logged, never returned.
pub fn generate_blog(
    topic: &str,
    settings: &InferenceSettings,
    invoker: &impl ModelInvoker,
) -> String {
    match request_generation(topic, settings, invoker) {
        Ok(text) => text,
        Err(failure) => {
            error!(
                component = COMPONENT,
                event = "generation_failed",
                model_id = %settings.model_id,
                error = %error_chain(&failure),
                "Error generating blog"
            );
            String::new()
        }
    }
}

pub fn request_generation(
    topic: &str,
    settings: &InferenceSettings,
    invoker: &impl ModelInvoker,
) -> Result<String, GenerationError> {
    let request = InferenceRequest::new(build_prompt(topic), &settings.parameters);
    let body = encode_inference_request(&request).map_err(GenerationError::Encode)?;

    let raw = invoker
        .invoke_model(&settings.model_id, &body)
        .map_err(|message| GenerationError::Invoke {
            model_id: settings.model_id.clone(),
            message,
        })?;

    let response = decode_inference_response(&raw).map_err(GenerationError::Decode)?;
    debug!(
        component = COMPONENT,
        event = "raw_model_response",
        raw = %String::from_utf8_lossy(&raw),
        "Raw response from model"
    );
    info!(
        component = COMPONENT,
        event = "model_response_received",
        model_id = %settings.model_id,
        prompt_token_count = ?response.prompt_token_count,
        generation_token_count = ?response.generation_token_count,
        stop_reason = ?response.stop_reason,
        "Model response received"
    );

    Ok(clean_generation(response.generated_text()))
}
