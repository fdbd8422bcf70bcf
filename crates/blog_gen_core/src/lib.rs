//! Shared blog generation domain primitives.
//!
//! This crate owns the request/response contracts, the prompt template and
//! the storage key layout. It does not depend on the AWS SDK or the Lambda
//! runtime; those live in `blog_gen_lambda`.

pub mod contract;
pub mod prompt;
pub mod storage_keys;
