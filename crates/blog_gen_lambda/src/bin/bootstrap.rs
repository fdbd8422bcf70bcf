use blog_gen_lambda::adapters::aws::{load_sdk_config, BedrockModelInvoker, S3ObjectStore};
use blog_gen_lambda::adapters::clock::SystemClock;
use blog_gen_lambda::config::BlogLambdaConfig;
use blog_gen_lambda::handlers::entry::{handle_blog_event, ApiGatewayResponse};
use blog_gen_lambda::logging::init_lambda_tracing;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_lambda_tracing();

    let config = BlogLambdaConfig::from_env()?;
    let sdk_config = load_sdk_config().await;
    let invoker = BedrockModelInvoker::from_settings(&sdk_config, &config.inference);
    let store = S3ObjectStore::from_sdk_config(&sdk_config);

    info!(
        model_id = %config.inference.model_id,
        region = %config.inference.region,
        bucket = %config.storage.bucket,
        prefix = %config.storage.prefix,
        key_suffix = config.storage.key_suffix.as_str(),
        "Blog generation Lambda starting"
    );

    let (config, invoker, store) = (&config, &invoker, &store);
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<ApiGatewayResponse, Error>(handle_blog_event(
            event.payload,
            config,
            invoker,
            store,
            &SystemClock,
        ))
    }))
    .await
}
