//! AWS-oriented adapters and handlers for the blog generation Lambda.
//!
//! This crate owns runtime integration details (the Lambda entry handler,
//! Bedrock and S3 adapters, configuration and logging) and re-exports the
//! contract, prompt, and storage key primitives under `runtime`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;

pub mod runtime {
    pub use blog_gen_core::{contract, prompt, storage_keys};
}
