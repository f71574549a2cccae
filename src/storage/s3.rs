//! AWS S3 storage implementation.
//!
//! Reports are written as `s3://{bucket}/{key}` with a single `PutObject`.
//! No content type, metadata or ACL is set; bucket defaults apply.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use tracing::{info, instrument};

use crate::config::ReporterConfig;
use crate::error::{AppError, Result};
use crate::storage::{ObjectStore, WriteMetadata};

/// S3-backed object store for one bucket.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Create S3 storage for the configured bucket using the default
    /// AWS credential and region chain.
    pub async fn from_config(config: &ReporterConfig) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&sdk_config), &config.bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    #[instrument(skip(self, body), fields(bucket = %self.bucket))]
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<WriteMetadata> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| write_error(key, e))?;

        let location = format!("s3://{}/{}", self.bucket, key);
        info!("Wrote {} bytes to {}", size, location);

        Ok(WriteMetadata {
            location,
            size,
            timestamp: Utc::now(),
        })
    }
}

/// Storage error carrying the full source chain of an SDK failure.
fn write_error<E: std::error::Error>(key: &str, err: E) -> AppError {
    AppError::storage(key, DisplayErrorContext(err))
}
