//! Incoming EC2 state-change event.

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::utils::render;

/// Fields of an EC2 state-change record needed for a report.
///
/// Borrowed from the incoming payload. Records arrive either bare or
/// wrapped in an EventBridge envelope under `detail`; both are accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceEvent<'a> {
    /// Action name, e.g. `RunInstances` or `StopInstances`
    pub event_name: &'a str,

    /// When the source action occurred, as sent by the event source
    pub event_time: String,

    /// `responseElements.instancesSet`, kept opaque
    pub instances: &'a Value,

    /// `userIdentity`, kept opaque
    pub user_identity: &'a Value,
}

impl<'a> InstanceEvent<'a> {
    /// Extract the report fields from a raw event payload.
    pub fn from_value(event: &'a Value) -> Result<Self> {
        let (record, base) = match event.get("detail") {
            Some(detail) if detail.is_object() => (detail, "detail."),
            _ => (event, ""),
        };

        let event_name = field(record, base, &["eventName"])?
            .as_str()
            .ok_or_else(|| AppError::invalid_field(format!("{base}eventName"), "string"))?;
        let instances = field(record, base, &["responseElements", "instancesSet"])?;
        let user_identity = field(record, base, &["userIdentity"])?;
        let event_time = render(field(record, base, &["eventTime"])?);

        Ok(Self {
            event_name,
            event_time,
            instances,
            user_identity,
        })
    }
}

/// Walk a field path, reporting the full dotted path when absent.
fn field<'a>(record: &'a Value, base: &str, path: &[&str]) -> Result<&'a Value> {
    path.iter()
        .try_fold(record, |value, segment| value.get(*segment))
        .ok_or_else(|| AppError::missing_field(format!("{base}{}", path.join("."))))
}
