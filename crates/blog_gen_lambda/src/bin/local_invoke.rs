//! Runs the Lambda handler once from the command line against real AWS
//! services, using the same environment configuration as the deployed
//! function.
//!
//! ```text
//! cargo run -p blog_gen_lambda --bin local_invoke -- "machine learning in healthcare"
//! ```

use blog_gen_lambda::adapters::aws::{load_sdk_config, BedrockModelInvoker, S3ObjectStore};
use blog_gen_lambda::adapters::clock::SystemClock;
use blog_gen_lambda::config::BlogLambdaConfig;
use blog_gen_lambda::handlers::entry::handle_blog_event;
use blog_gen_lambda::logging::init_local_tracing;
use clap::Parser;
use lambda_runtime::Error;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(
    name = "local_invoke",
    about = "Generate one blog post with the Lambda handler"
)]
struct Cli {
    /// Topic to write about
    topic: String,

    /// Print the post instead of writing it to the bucket
    #[arg(long, env = "BLOG_DRY_RUN")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_local_tracing();
    let cli = Cli::parse();

    let config = BlogLambdaConfig::from_env()?;
    let sdk_config = load_sdk_config().await;
    let invoker = BedrockModelInvoker::from_settings(&sdk_config, &config.inference);
    let event = json!({ "body": json!({ "blog_topic": cli.topic }).to_string() });

    let response = if cli.dry_run {
        let print_store = |bucket: &str, key: &str, body: &[u8]| -> Result<(), String> {
            println!("--- s3://{bucket}/{key} (not written) ---");
            println!("{}", String::from_utf8_lossy(body));
            Ok(())
        };
        handle_blog_event(event, &config, &invoker, &print_store, &SystemClock)
    } else {
        let store = S3ObjectStore::from_sdk_config(&sdk_config);
        handle_blog_event(event, &config, &invoker, &store, &SystemClock)
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
