use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::adapters::clock::Clock;
use crate::adapters::model_invoker::ModelInvoker;
use crate::adapters::object_store::ObjectStore;
use crate::config::BlogLambdaConfig;
use crate::error::HandlerError;
use crate::handlers::generation::generate_blog;
use crate::handlers::persistence::save_blog;
use crate::logging::error_chain;
use crate::runtime::contract::{GenerationRequest, COMPLETED_MESSAGE, INTERNAL_ERROR_MESSAGE};
use crate::runtime::storage_keys::{blog_object_key, TIME_COMPONENT_FORMAT};

const COMPONENT: &str = "entry_handler";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl ApiGatewayResponse {
    /// Envelope whose body is `message` encoded as a JSON string.
    pub fn message(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: Value::String(message.to_string()).to_string(),
        }
    }
}

/// Runs one invocation: topic → generation → persistence.
///
/// Returns 200 once the request was understood, whatever happened to the
/// generated text, and 500 when the event itself could not be used.
pub fn handle_blog_event(
    event: Value,
    config: &BlogLambdaConfig,
    invoker: &impl ModelInvoker,
    store: &impl ObjectStore,
    clock: &impl Clock,
) -> ApiGatewayResponse {
    info!(
        component = COMPONENT,
        event = "invocation_started",
        "Blog generation triggered"
    );

    match run_blog_pipeline(event, config, invoker, store, clock) {
        Ok(()) => ApiGatewayResponse::message(200, COMPLETED_MESSAGE),
        Err(failure) => {
            error!(
                component = COMPONENT,
                event = "invocation_failed",
                error = %error_chain(&failure),
                "Lambda handler error"
            );
            ApiGatewayResponse::message(500, INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn run_blog_pipeline(
    event: Value,
    config: &BlogLambdaConfig,
    invoker: &impl ModelInvoker,
    store: &impl ObjectStore,
    clock: &impl Clock,
) -> Result<(), HandlerError> {
    let payload = normalize_apigw_event(event)?;
    let request: GenerationRequest =
        serde_json::from_value(payload).map_err(HandlerError::InvalidRequest)?;
    info!(
        component = COMPONENT,
        event = "topic_received",
        topic = %request.blog_topic,
        "Topic received"
    );

    let blog = generate_blog(&request.blog_topic, &config.inference, invoker);
    if blog.is_empty() {
        warn!(
            component = COMPONENT,
            event = "no_blog_generated",
            "No blog was generated"
        );
        return Ok(());
    }

    let time_component = clock.local_time().format(TIME_COMPONENT_FORMAT).to_string();
    let key = blog_object_key(
        &config.storage.prefix,
        &time_component,
        config.storage.key_suffix,
        &blog,
    );
    save_blog(&key, &config.storage.bucket, &blog, store);
    Ok(())
}

/// Extracts the request payload from the event's `body`, which API Gateway
/// delivers as a JSON string and direct invocations may pass as an object.
fn normalize_apigw_event(event: Value) -> Result<Value, HandlerError> {
    let Value::Object(mut object) = event else {
        return Err(HandlerError::MissingBody);
    };

    match object.remove("body") {
        None => Err(HandlerError::MissingBody),
        Some(Value::String(text)) => {
            serde_json::from_str(&text).map_err(HandlerError::MalformedBody)
        }
        Some(body @ Value::Object(_)) => Ok(body),
        Some(Value::Null) => Err(HandlerError::UnsupportedBody("null")),
        Some(Value::Bool(_)) => Err(HandlerError::UnsupportedBody("a boolean")),
        Some(Value::Number(_)) => Err(HandlerError::UnsupportedBody("a number")),
        Some(Value::Array(_)) => Err(HandlerError::UnsupportedBody("an array")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveTime;
    use serde_json::json;

    use super::*;
    use crate::adapters::clock::SystemClock;
    use crate::runtime::storage_keys::KeySuffix;

    struct StubInvoker {
        reply: Result<String, String>,
        calls: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl StubInvoker {
        fn generating(text: &str) -> Self {
            Self::replying(json!({ "generation": text }).to_string())
        }

        fn replying(body: String) -> Self {
            Self {
                reply: Ok(body),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().expect("poisoned mutex").len()
        }

        fn sent_prompt(&self) -> String {
            let calls = self.calls.lock().expect("poisoned mutex");
            let body: Value =
                serde_json::from_slice(&calls[0].1).expect("request body should be JSON");
            body["prompt"]
                .as_str()
                .expect("prompt should be a string")
                .to_string()
        }
    }

    impl ModelInvoker for StubInvoker {
        fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>, String> {
            self.calls
                .lock()
                .expect("poisoned mutex")
                .push((model_id.to_string(), body.to_vec()));
            self.reply.clone().map(String::into_bytes)
        }
    }

    struct CapturingStore {
        writes: Mutex<Vec<(String, String, Vec<u8>)>>,
        failure: Option<&'static str>,
    }

    impl CapturingStore {
        fn new() -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                failure: None,
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                failure: Some(message),
            }
        }

        fn writes(&self) -> Vec<(String, String, Vec<u8>)> {
            self.writes.lock().expect("poisoned mutex").clone()
        }
    }

    impl ObjectStore for CapturingStore {
        fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), String> {
            self.writes.lock().expect("poisoned mutex").push((
                bucket.to_string(),
                key.to_string(),
                body.to_vec(),
            ));
            match self.failure {
                Some(message) => Err(message.to_string()),
                None => Ok(()),
            }
        }
    }

    struct FixedClock(NaiveTime);

    impl Clock for FixedClock {
        fn local_time(&self) -> NaiveTime {
            self.0
        }
    }

    fn afternoon() -> FixedClock {
        FixedClock(NaiveTime::from_hms_opt(14, 30, 5).expect("valid time"))
    }

    fn topic_event(topic: &str) -> Value {
        json!({ "body": json!({ "blog_topic": topic }).to_string() })
    }

    #[test]
    fn generates_and_saves_one_post() {
        let invoker = StubInvoker::generating("Cats are great pets...");
        let store = CapturingStore::new();

        let response = handle_blog_event(
            topic_event("cats"),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "\"Blog Generation is completed\"");
        assert_eq!(
            invoker.sent_prompt(),
            "<s>[INST] Write a 200-word blog on the topic: cats [/INST]"
        );

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "awsbedrockdemofirst");
        assert_eq!(writes[0].1, "blog-output/143005.txt");
        assert_eq!(writes[0].2, b"Cats are great pets...");
    }

    #[test]
    fn key_uses_current_wall_clock_time() {
        let invoker = StubInvoker::generating("Clocks tick.");
        let store = CapturingStore::new();

        handle_blog_event(
            topic_event("clocks"),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &SystemClock,
        );

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        let key = &writes[0].1;
        let digits = key
            .strip_prefix("blog-output/")
            .and_then(|rest| rest.strip_suffix(".txt"))
            .expect("key should follow blog-output/HHMMSS.txt");
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        NaiveTime::parse_from_str(digits, TIME_COMPONENT_FORMAT)
            .expect("digits should be a valid 24-hour time");
    }

    #[test]
    fn skips_persistence_when_generation_is_empty() {
        let invoker = StubInvoker::replying(json!({ "generation": "" }).to_string());
        let store = CapturingStore::new();

        let response = handle_blog_event(
            topic_event("nothing"),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 200);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn skips_persistence_when_generation_field_is_absent() {
        let invoker = StubInvoker::replying("{}".to_string());
        let store = CapturingStore::new();

        let response = handle_blog_event(
            topic_event("nothing"),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 200);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn skips_persistence_when_model_call_fails() {
        let invoker = StubInvoker::failing("ValidationException: model not enabled");
        let store = CapturingStore::new();

        let response = handle_blog_event(
            topic_event("cats"),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(invoker.call_count(), 1);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn reports_success_even_when_save_fails() {
        let invoker = StubInvoker::generating("Saved nowhere.");
        let store = CapturingStore::failing("AccessDenied");

        let response = handle_blog_event(
            topic_event("cats"),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(store.writes().len(), 1);
    }

    #[test]
    fn malformed_json_body_is_internal_error() {
        let invoker = StubInvoker::generating("unused");
        let store = CapturingStore::new();

        let response = handle_blog_event(
            json!({ "body": "{\"blog_topic\": " }),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "\"Internal Server Error\"");
        assert_eq!(invoker.call_count(), 0);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn missing_topic_is_internal_error() {
        let invoker = StubInvoker::generating("unused");
        let store = CapturingStore::new();

        let response = handle_blog_event(
            json!({ "body": "{\"topic\": \"cats\"}" }),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 500);
        assert_eq!(invoker.call_count(), 0);
    }

    #[test]
    fn numeric_topic_is_interpolated_into_prompt() {
        let invoker = StubInvoker::generating("The number 42 is ...");
        let store = CapturingStore::new();

        let response = handle_blog_event(
            json!({ "body": "{\"blog_topic\": 42}" }),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(
            invoker.sent_prompt(),
            "<s>[INST] Write a 200-word blog on the topic: 42 [/INST]"
        );
        assert_eq!(store.writes().len(), 1);
    }

    #[test]
    fn boolean_topic_is_internal_error() {
        let invoker = StubInvoker::generating("unused");
        let store = CapturingStore::new();

        let response = handle_blog_event(
            json!({ "body": "{\"blog_topic\": true}" }),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 500);
        assert_eq!(invoker.call_count(), 0);
    }

    #[test]
    fn missing_or_unusable_body_is_internal_error() {
        let invoker = StubInvoker::generating("unused");
        let store = CapturingStore::new();

        for event in [
            json!({ "blog_topic": "cats" }),
            json!({ "body": null }),
            json!({ "body": 42 }),
            json!(["not", "an", "object"]),
        ] {
            let response = handle_blog_event(
                event,
                &BlogLambdaConfig::default(),
                &invoker,
                &store,
                &afternoon(),
            );
            assert_eq!(response.status_code, 500);
        }
        assert_eq!(invoker.call_count(), 0);
    }

    #[test]
    fn accepts_object_body_from_direct_invocation() {
        let invoker = StubInvoker::generating("Direct.");
        let store = CapturingStore::new();

        let response = handle_blog_event(
            json!({ "body": { "blog_topic": "direct invoke" } }),
            &BlogLambdaConfig::default(),
            &invoker,
            &store,
            &afternoon(),
        );

        assert_eq!(response.status_code, 200);
        assert_eq!(store.writes().len(), 1);
    }

    #[test]
    fn honours_storage_settings() {
        let invoker = StubInvoker::generating("Configured.");
        let store = CapturingStore::new();
        let mut config = BlogLambdaConfig::default();
        config.storage.bucket = "team-blogs".to_string();
        config.storage.prefix = "drafts/".to_string();
        config.storage.key_suffix = KeySuffix::ContentDigest;

        handle_blog_event(topic_event("cats"), &config, &invoker, &store, &afternoon());

        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "team-blogs");
        assert!(writes[0].1.starts_with("drafts/143005-"));
        assert!(writes[0].1.ends_with(".txt"));
    }

    #[test]
    fn response_serializes_with_status_code_key() {
        let response = ApiGatewayResponse::message(200, COMPLETED_MESSAGE);
        assert_eq!(
            serde_json::to_value(&response).expect("response should serialize"),
            json!({
                "statusCode": 200,
                "body": "\"Blog Generation is completed\""
            })
        );
    }
}
