//! Bedrock runtime and S3 implementations of the adapter traits.
//!
//! The handlers are synchronous; each call blocks the current tokio worker
//! with `block_in_place`, so the binaries must run on the multi-threaded
//! runtime.

use std::time::Duration;

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_s3::primitives::ByteStream;

use crate::adapters::model_invoker::ModelInvoker;
use crate::adapters::object_store::ObjectStore;
use crate::config::InferenceSettings;

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub async fn load_sdk_config() -> SdkConfig {
    aws_config::load_defaults(BehaviorVersion::latest()).await
}

/// Bedrock client settings: inference region, read timeout and the SDK's
/// standard retry policy. The SDK counts the first call as an attempt, so
/// `max_retries` retries allow `max_retries + 1` attempts.
pub fn bedrock_config(
    sdk_config: &SdkConfig,
    settings: &InferenceSettings,
) -> aws_sdk_bedrockruntime::Config {
    aws_sdk_bedrockruntime::config::Builder::from(sdk_config)
        .region(Region::new(settings.region.clone()))
        .retry_config(RetryConfig::standard().with_max_attempts(settings.total_attempts()))
        .timeout_config(
            TimeoutConfig::builder()
                .read_timeout(Duration::from_secs(settings.read_timeout_secs))
                .build(),
        )
        .build()
}

#[derive(Debug, Clone)]
pub struct BedrockModelInvoker {
    client: aws_sdk_bedrockruntime::Client,
}

impl BedrockModelInvoker {
    pub fn new(client: aws_sdk_bedrockruntime::Client) -> Self {
        Self { client }
    }

    pub fn from_settings(sdk_config: &SdkConfig, settings: &InferenceSettings) -> Self {
        Self::new(aws_sdk_bedrockruntime::Client::from_conf(bedrock_config(
            sdk_config, settings,
        )))
    }
}

impl ModelInvoker for BedrockModelInvoker {
    fn invoke_model(&self, model_id: &str, body: &[u8]) -> Result<Vec<u8>, String> {
        let client = self.client.clone();
        let model_id = model_id.to_string();
        let request_body = body.to_vec();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .invoke_model()
                    .model_id(model_id)
                    .content_type(JSON_CONTENT_TYPE)
                    .accept(JSON_CONTENT_TYPE)
                    .body(Blob::new(request_body))
                    .send()
                    .await
                    .map(|output| output.body().as_ref().to_vec())
                    .map_err(|error| {
                        format!(
                            "failed to invoke bedrock model: {}",
                            DisplayErrorContext(&error)
                        )
                    })
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(aws_sdk_s3::Client::new(sdk_config))
    }
}

impl ObjectStore for S3ObjectStore {
    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), String> {
        let client = self.client.clone();
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let body_bytes = body.to_vec();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_object()
                    .bucket(bucket)
                    .key(object_key)
                    .content_type(TEXT_CONTENT_TYPE)
                    .body(ByteStream::from(body_bytes))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!(
                            "failed to write object to s3: {}",
                            aws_sdk_s3::error::DisplayErrorContext(&error)
                        )
                    })
            })
        })
    }
}
