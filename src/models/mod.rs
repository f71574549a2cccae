// src/models/mod.rs

//! Domain models for the event reporter.

mod event;
mod report;

pub use event::InstanceEvent;
pub use report::{ACK_MESSAGE, Acknowledgment, KEY_TIMESTAMP_FORMAT, Report, object_key};
