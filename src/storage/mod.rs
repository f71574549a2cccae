//! Storage abstractions for report persistence.
//!
//! Every backend performs a blind create-or-overwrite: there is no
//! existence check, no conditional put and no retry. Two writes to the
//! same key leave the last body in place.
//!
//! - [`LocalStorage`]: objects as files under a root directory
//! - `S3Storage` (feature `s3`): objects in an S3 bucket

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a completed object write.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Human-readable location, e.g. `s3://bucket/key`
    pub location: String,
    /// Number of bytes written
    pub size: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Trait for object store backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` under `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<WriteMetadata>;
}
