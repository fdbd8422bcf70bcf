use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const BLOG_TOPIC_FIELD: &str = "blog_topic";
pub const COMPLETED_MESSAGE: &str = "Blog Generation is completed";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

pub const DEFAULT_MAX_GEN_LEN: u32 = 512;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 0.9;

/// Inbound request body, e.g. `{"blog_topic": "cats"}`. Numeric topics are
/// accepted and used in their JSON text form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    #[serde(deserialize_with = "topic_text")]
    pub blog_topic: String,
}

fn topic_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(D::Error::custom(format!(
            "`{BLOG_TOPIC_FIELD}` must be a string or number, found {other}"
        ))),
    }
}

/// Decoding parameters sent with every model invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenerationParameters {
    pub max_gen_len: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_gen_len: DEFAULT_MAX_GEN_LEN,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}

/// Request body for the Llama family of text-generation models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceRequest {
    pub prompt: String,
    pub max_gen_len: u32,
    pub temperature: f64,
    pub top_p: f64,
}

impl InferenceRequest {
    pub fn new(prompt: impl Into<String>, parameters: &GenerationParameters) -> Self {
        Self {
            prompt: prompt.into(),
            max_gen_len: parameters.max_gen_len,
            temperature: parameters.temperature,
            top_p: parameters.top_p,
        }
    }
}

/// Model reply. Every field is optional; a missing `generation` means the
/// model produced no text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InferenceResponse {
    #[serde(default)]
    pub generation: Option<String>,
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    #[serde(default)]
    pub generation_token_count: Option<u32>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl InferenceResponse {
    pub fn generated_text(&self) -> &str {
        self.generation.as_deref().unwrap_or_default()
    }
}

pub fn encode_inference_request(request: &InferenceRequest) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(request)
}

pub fn decode_inference_response(body: &[u8]) -> serde_json::Result<InferenceResponse> {
    serde_json::from_slice(body)
}
