//! Report object and invocation acknowledgment.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ReporterConfig;
use crate::models::InstanceEvent;
use crate::utils::render;

/// Filename-safe layout of the generation timestamp in object keys.
pub const KEY_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.6fZ";

/// Confirmation message returned after a successful write.
pub const ACK_MESSAGE: &str = "Event details stored to S3";

/// A text report ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Object key, e.g. `EC2_RunInstances_2024-01-01T00-00-00.000000Z.txt`
    pub key: String,

    /// Plain-text body
    pub body: String,
}

impl Report {
    /// Build the report for an event generated at `generated_at`.
    pub fn build(
        config: &ReporterConfig,
        event: &InstanceEvent<'_>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: object_key(config, event.event_name, generated_at),
            body: format_body(event),
        }
    }

    /// UTF-8 encoded body.
    pub fn into_bytes(self) -> Vec<u8> {
        self.body.into_bytes()
    }
}

/// `{prefix}{event_name}_{timestamp}{suffix}`
pub fn object_key(config: &ReporterConfig, event_name: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}{}_{}{}",
        config.key_prefix,
        event_name,
        at.format(KEY_TIMESTAMP_FORMAT),
        config.key_suffix
    )
}

fn format_body(event: &InstanceEvent<'_>) -> String {
    format!(
        "Instance Action : {}\nInstance Details : {}\n\nUser Details : {}\n\nEvent Time : {}",
        event.event_name,
        render(event.instances),
        render(event.user_identity),
        event.event_time
    )
}

/// Result handed back to the invoking environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgment {
    pub status_code: u16,
    pub body: String,
}

impl Acknowledgment {
    /// The fixed success acknowledgment.
    pub fn stored() -> Self {
        Self {
            status_code: 200,
            body: ACK_MESSAGE.to_string(),
        }
    }
}
