use tracing::{error, info};

use crate::adapters::object_store::ObjectStore;

const COMPONENT: &str = "persistence";

/// Writes `content` to `bucket`/`key`. Best effort: a failed write is logged
/// and otherwise ignored, so callers cannot tell a saved post from a lost one.
pub fn save_blog(key: &str, bucket: &str, content: &str, store: &impl ObjectStore) {
    let location = format!("s3://{bucket}/{key}");
    match store.put_object(bucket, key, content.as_bytes()) {
        Ok(()) => info!(
            component = COMPONENT,
            event = "blog_saved",
            location = %location,
            bytes = content.len(),
            "Blog saved"
        ),
        Err(message) => error!(
            component = COMPONENT,
            event = "blog_save_failed",
            location = %location,
            error = %message,
            "Error saving blog"
        ),
    }
}
