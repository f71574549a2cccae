//! EC2 event reporter CLI
//!
//! Local execution entry point for replaying saved events. For AWS Lambda,
//! use `ec2-reporter-lambda`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use ec2_event_reporter::{
    config::ReporterConfig,
    error::Result,
    reporter::EventReporter,
    storage::{LocalStorage, ObjectStore},
    utils::FixedClock,
};
use serde_json::Value;

#[cfg(feature = "s3")]
use ec2_event_reporter::storage::s3::S3Storage;

/// Store EC2 state-change events as text reports
#[derive(Parser, Debug)]
#[command(name = "ec2-reporter", version, about = "EC2 Event Reporter")]
struct Cli {
    /// Path to the reporter configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and store the report for a saved event
    Report {
        /// JSON file holding the event (bare record or EventBridge envelope)
        #[arg(short, long)]
        event: PathBuf,

        /// Directory standing in for the bucket
        #[arg(long, default_value = "reports")]
        storage_dir: PathBuf,

        /// Generation timestamp to use instead of now (RFC 3339)
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,

        /// Print the key and body without writing
        #[arg(long)]
        dry_run: bool,

        /// Write to the configured S3 bucket instead of the storage directory
        #[cfg(feature = "s3")]
        #[arg(long)]
        s3: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn load_event(path: &Path) -> Result<Value> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn run_report<S: ObjectStore>(
    reporter: EventReporter<S, FixedClock>,
    event: &Value,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        let report = reporter.prepare(event)?;
        println!("{}", report.key);
        println!();
        println!("{}", report.body);
        return Ok(());
    }

    let ack = reporter.handle(event).await?;
    println!("{}", serde_json::to_string(&ack)?);
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ReporterConfig::load_or_default(&cli.config);

    match cli.command {
        Command::Report {
            event,
            storage_dir,
            timestamp,
            dry_run,
            #[cfg(feature = "s3")]
            s3,
        } => {
            config.validate()?;
            let payload = load_event(&event)?;
            let clock = FixedClock(timestamp.unwrap_or_else(Utc::now));
            log::debug!("Loaded event from {}", event.display());

            #[cfg(feature = "s3")]
            {
                if s3 {
                    let storage = S3Storage::from_config(&config).await;
                    let reporter = EventReporter::with_clock(config, storage, clock);
                    return run_report(reporter, &payload, dry_run).await;
                }
            }

            log::info!("Writing reports under {}", storage_dir.display());
            let storage = LocalStorage::new(storage_dir);
            let reporter = EventReporter::with_clock(config, storage, clock);
            run_report(reporter, &payload, dry_run).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration {}...", cli.config.display());

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK (bucket: {}, keys: {}<event>_<timestamp>{})",
                config.bucket,
                config.key_prefix,
                config.key_suffix
            );
        }
    }

    Ok(())
}
