//! Environment-driven configuration.
//!
//! Every setting has a default matching the hardcoded values the function
//! was first deployed with, so an unconfigured function behaves the same. Values
//! that are present but unparseable fail the cold start instead of silently
//! falling back.
//!
//! ## Environment Variables
//!
//! - `BLOG_OUTPUT_BUCKET`: destination bucket (default: `awsbedrockdemofirst`)
//! - `BLOG_OUTPUT_PREFIX`: key prefix (default: `blog-output`)
//! - `BLOG_KEY_SUFFIX`: `none` or `content-digest` (default: `none`)
//! - `BEDROCK_REGION`: inference region (default: `us-east-1`)
//! - `BEDROCK_MODEL_ID`: model identifier (default: `meta.llama3-8b-instruct-v1:0`)
//! - `BEDROCK_READ_TIMEOUT_SECS`: model read timeout (default: `300`)
//! - `BEDROCK_MAX_RETRIES`: SDK retries after the first attempt (default: `3`)
//! - `BLOG_MAX_GEN_LEN`, `BLOG_TEMPERATURE`, `BLOG_TOP_P`: decoding parameters
//!   (defaults: `512`, `0.7`, `0.9`)

use std::str::FromStr;

use crate::error::ConfigError;
use crate::runtime::contract::GenerationParameters;
use crate::runtime::storage_keys::{KeySuffix, DEFAULT_OUTPUT_PREFIX};

pub const DEFAULT_BUCKET: &str = "awsbedrockdemofirst";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "meta.llama3-8b-instruct-v1:0";
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct InferenceSettings {
    pub region: String,
    pub model_id: String,
    pub read_timeout_secs: u64,
    pub max_retries: u32,
    pub parameters: GenerationParameters,
}

impl InferenceSettings {
    /// Total transport attempts, counting the first call.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            parameters: GenerationParameters::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub bucket: String,
    pub prefix: String,
    pub key_suffix: KeySuffix,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            key_suffix: KeySuffix::None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogLambdaConfig {
    pub inference: InferenceSettings,
    pub storage: StorageSettings,
}

impl BlogLambdaConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let key_suffix = match read("BLOG_KEY_SUFFIX") {
            Some(value) => KeySuffix::parse(&value).ok_or_else(|| {
                ConfigError::new(
                    "BLOG_KEY_SUFFIX",
                    value,
                    "expected `none` or `content-digest`",
                )
            })?,
            None => defaults.storage.key_suffix,
        };

        let parameters = GenerationParameters {
            max_gen_len: parse_positive_or(
                "BLOG_MAX_GEN_LEN",
                read("BLOG_MAX_GEN_LEN"),
                defaults.inference.parameters.max_gen_len,
            )?,
            temperature: unit_interval(
                "BLOG_TEMPERATURE",
                parse_or(
                    "BLOG_TEMPERATURE",
                    read("BLOG_TEMPERATURE"),
                    defaults.inference.parameters.temperature,
                )?,
            )?,
            top_p: unit_interval(
                "BLOG_TOP_P",
                parse_or(
                    "BLOG_TOP_P",
                    read("BLOG_TOP_P"),
                    defaults.inference.parameters.top_p,
                )?,
            )?,
        };

        let max_retries = parse_or(
            "BEDROCK_MAX_RETRIES",
            read("BEDROCK_MAX_RETRIES"),
            defaults.inference.max_retries,
        )?;

        let read_timeout_secs = parse_positive_or(
            "BEDROCK_READ_TIMEOUT_SECS",
            read("BEDROCK_READ_TIMEOUT_SECS"),
            defaults.inference.read_timeout_secs,
        )?;

        Ok(Self {
            inference: InferenceSettings {
                region: read("BEDROCK_REGION").unwrap_or(defaults.inference.region),
                model_id: read("BEDROCK_MODEL_ID").unwrap_or(defaults.inference.model_id),
                read_timeout_secs,
                max_retries,
                parameters,
            },
            storage: StorageSettings {
                bucket: read("BLOG_OUTPUT_BUCKET").unwrap_or(defaults.storage.bucket),
                prefix: read("BLOG_OUTPUT_PREFIX").unwrap_or(defaults.storage.prefix),
                key_suffix,
            },
        })
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|error: T::Err| ConfigError::new(name, raw.clone(), error.to_string())),
        None => Ok(default),
    }
}

fn parse_positive_or<T>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: std::fmt::Display,
{
    let raw = value.clone();
    let parsed = parse_or(name, value, default)?;
    if parsed == T::default() {
        return Err(ConfigError::new(
            name,
            raw.unwrap_or_default(),
            "must be greater than zero",
        ));
    }
    Ok(parsed)
}

fn unit_interval(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::new(
            name,
            value.to_string(),
            "must be between 0.0 and 1.0",
        ))
    }
}
