//! AWS Lambda entry point for the EC2 event reporter.
//!
//! Deploy with `cargo lambda build --release --features lambda` and route
//! EC2 state-change events from EventBridge to the function.
//!
//! ## Environment Variables
//!
//! - `REPORT_BUCKET`: target bucket (default: `ec2-invoke-logs`)
//! - `REPORT_KEY_PREFIX` / `REPORT_KEY_SUFFIX`: object key shape
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use ec2_event_reporter::config::ReporterConfig;
use ec2_event_reporter::lambda;
use ec2_event_reporter::reporter::EventReporter;
use ec2_event_reporter::storage::s3::S3Storage;
use lambda_runtime::{Error as LambdaError, service_fn};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = ReporterConfig::default().with_env_overrides();
    config.validate()?;

    info!("EC2 event reporter starting, bucket={}", config.bucket);

    let storage = S3Storage::from_config(&config).await;
    let reporter = EventReporter::new(config, storage);
    let reporter = &reporter;

    lambda_runtime::run(service_fn(move |event| async move {
        lambda::handler(reporter, event).await
    }))
    .await
}
