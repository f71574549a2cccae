// src/reporter.rs

//! The event reporter.
//!
//! One invocation turns one EC2 state-change event into one text object:
//! fields are extracted, the body and key are built, the object is written
//! and a fixed acknowledgment is returned. Any failure aborts the
//! invocation; nothing is written unless every field was extracted.

use serde_json::Value;

use crate::config::ReporterConfig;
use crate::error::Result;
use crate::models::{Acknowledgment, InstanceEvent, Report};
use crate::storage::ObjectStore;
use crate::utils::{Clock, SystemClock};

/// Writes a text report for each event it handles.
pub struct EventReporter<S, C = SystemClock> {
    config: ReporterConfig,
    storage: S,
    clock: C,
}

impl<S: ObjectStore> EventReporter<S> {
    /// Create a reporter that stamps keys with the system clock.
    pub fn new(config: ReporterConfig, storage: S) -> Self {
        Self::with_clock(config, storage, SystemClock)
    }
}

impl<S: ObjectStore, C: Clock> EventReporter<S, C> {
    /// Create a reporter with an explicit generation-timestamp source.
    pub fn with_clock(config: ReporterConfig, storage: S, clock: C) -> Self {
        Self {
            config,
            storage,
            clock,
        }
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Build the report for an event without writing it.
    pub fn prepare(&self, event: &Value) -> Result<Report> {
        let event = InstanceEvent::from_value(event)?;
        Ok(Report::build(&self.config, &event, self.clock.now()))
    }

    /// Handle one event: build its report and store it.
    pub async fn handle(&self, event: &Value) -> Result<Acknowledgment> {
        let report = self.prepare(event)?;
        log::info!("Storing report {} in bucket {}", report.key, self.config.bucket);

        let key = report.key.clone();
        let meta = self.storage.put_object(&key, report.into_bytes()).await?;
        log::debug!("Stored {} bytes at {}", meta.size, meta.location);

        Ok(Acknowledgment::stored())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use tempfile::TempDir;

    use crate::error::AppError;
    use crate::storage::{LocalStorage, WriteMetadata};
    use crate::utils::{FixedClock, render};

    /// Records every write instead of persisting it.
    #[derive(Default)]
    struct RecordingStore {
        writes: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl RecordingStore {
        fn writes(&self) -> Vec<(String, Vec<u8>)> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<WriteMetadata> {
            let size = body.len();
            self.writes.lock().unwrap().push((key.to_string(), body));
            Ok(WriteMetadata {
                location: format!("memory://{key}"),
                size,
                timestamp: Utc::now(),
            })
        }
    }

    /// Rejects every write.
    struct FailingStore;

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn put_object(&self, key: &str, _body: Vec<u8>) -> Result<WriteMetadata> {
            Err(AppError::storage(key, "AccessDenied"))
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 5).unwrap()
    }

    fn sample_event(name: &str) -> Value {
        json!({
            "version": "0",
            "source": "aws.ec2",
            "detail-type": "AWS API Call via CloudTrail",
            "detail": {
                "eventName": name,
                "eventTime": "2024-01-01T00:00:00Z",
                "userIdentity": {"type": "IAMUser", "arn": "arn:aws:iam::123:user/alice"},
                "responseElements": {"instancesSet": {"items": [{"instanceId": "i-abc123"}]}}
            }
        })
    }

    #[tokio::test]
    async fn test_handle_writes_one_report() {
        let reporter = EventReporter::with_clock(
            ReporterConfig::default(),
            RecordingStore::default(),
            FixedClock(generated_at()),
        );

        let ack = reporter.handle(&sample_event("RunInstances")).await.unwrap();
        assert_eq!(ack, Acknowledgment::stored());
        assert_eq!(ack.status_code, 200);
        assert_eq!(ack.body, "Event details stored to S3");

        let writes = reporter.storage().writes();
        assert_eq!(writes.len(), 1);
        let (key, body) = &writes[0];
        assert_eq!(key, "EC2_RunInstances_2024-01-01T00-00-05.000000Z.txt");

        let body = String::from_utf8(body.clone()).unwrap();
        assert_eq!(
            body,
            "Instance Action : RunInstances\n\
             Instance Details : {\"items\": [{\"instanceId\": \"i-abc123\"}]}\n\
             \n\
             User Details : {\"type\": \"IAMUser\", \"arn\": \"arn:aws:iam::123:user/alice\"}\n\
             \n\
             Event Time : 2024-01-01T00:00:00Z"
        );
    }

    #[tokio::test]
    async fn test_body_carries_rendered_structures_verbatim() {
        let reporter = EventReporter::with_clock(
            ReporterConfig::default(),
            RecordingStore::default(),
            FixedClock(generated_at()),
        );
        let event = sample_event("StopInstances");

        reporter.handle(&event).await.unwrap();

        let writes = reporter.storage().writes();
        let body = String::from_utf8(writes[0].1.clone()).unwrap();
        let instances = render(&event["detail"]["responseElements"]["instancesSet"]);
        let user = render(&event["detail"]["userIdentity"]);

        let sections: Vec<&str> = body.split("\n\n").collect();
        assert_eq!(sections.len(), 3);
        assert_eq!(
            sections[0],
            format!("Instance Action : StopInstances\nInstance Details : {instances}")
        );
        assert_eq!(sections[1], format!("User Details : {user}"));
        assert_eq!(sections[2], "Event Time : 2024-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_missing_event_name_writes_nothing() {
        let reporter = EventReporter::new(ReporterConfig::default(), RecordingStore::default());

        let mut event = sample_event("RunInstances");
        event["detail"]
            .as_object_mut()
            .unwrap()
            .remove("eventName");

        let err = reporter.handle(&event).await.unwrap_err();
        assert!(matches!(err, AppError::MissingField { ref path } if path == "detail.eventName"));
        assert!(reporter.storage().writes().is_empty());
    }

    #[tokio::test]
    async fn test_missing_user_identity_writes_nothing() {
        let reporter = EventReporter::new(ReporterConfig::default(), RecordingStore::default());

        let mut event = sample_event("RunInstances");
        event["detail"]
            .as_object_mut()
            .unwrap()
            .remove("userIdentity");

        assert!(reporter.handle(&event).await.is_err());
        assert!(reporter.storage().writes().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let reporter = EventReporter::with_clock(
            ReporterConfig::default(),
            FailingStore,
            FixedClock(generated_at()),
        );

        let err = reporter
            .handle(&sample_event("RunInstances"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Storage { ref key, .. } if key == "EC2_RunInstances_2024-01-01T00-00-05.000000Z.txt"
        ));
    }

    #[tokio::test]
    async fn test_distinct_names_get_distinct_keys() {
        let reporter = EventReporter::with_clock(
            ReporterConfig::default(),
            RecordingStore::default(),
            FixedClock(generated_at()),
        );

        reporter.handle(&sample_event("RunInstances")).await.unwrap();
        reporter.handle(&sample_event("StopInstances")).await.unwrap();

        let keys: Vec<String> = reporter
            .storage()
            .writes()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(
            keys,
            vec![
                "EC2_RunInstances_2024-01-01T00-00-05.000000Z.txt".to_string(),
                "EC2_StopInstances_2024-01-01T00-00-05.000000Z.txt".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_key_uses_generation_time_not_event_time() {
        let later = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();
        let reporter = EventReporter::with_clock(
            ReporterConfig::default(),
            RecordingStore::default(),
            FixedClock(later),
        );

        reporter.handle(&sample_event("RunInstances")).await.unwrap();

        let writes = reporter.storage().writes();
        assert_eq!(writes[0].0, "EC2_RunInstances_2025-06-30T12-00-00.000000Z.txt");
    }

    #[tokio::test]
    async fn test_colliding_keys_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let reporter =
            EventReporter::with_clock(ReporterConfig::default(), storage, FixedClock(generated_at()));

        let first = sample_event("RunInstances");
        let mut second = sample_event("RunInstances");
        second["detail"]["eventTime"] = json!("2024-01-01T00:00:03Z");

        reporter.handle(&first).await.unwrap();
        reporter.handle(&second).await.unwrap();

        let files: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);

        let key = "EC2_RunInstances_2024-01-01T00-00-05.000000Z.txt";
        let body = std::fs::read_to_string(tmp.path().join(key)).unwrap();
        assert!(body.ends_with("Event Time : 2024-01-01T00:00:03Z"));
    }

    #[test]
    fn test_prepare_does_not_write() {
        let reporter = EventReporter::with_clock(
            ReporterConfig::default(),
            RecordingStore::default(),
            FixedClock(generated_at()),
        );

        let report = reporter.prepare(&sample_event("RunInstances")).unwrap();
        assert_eq!(report.key, "EC2_RunInstances_2024-01-01T00-00-05.000000Z.txt");
        assert!(report.body.starts_with("Instance Action : RunInstances\n"));
        assert!(reporter.storage().writes().is_empty());
    }

    #[tokio::test]
    async fn test_bundled_sample_event() {
        let event: Value =
            serde_json::from_str(include_str!("../data/events/run_instances.json")).unwrap();
        let reporter = EventReporter::with_clock(
            ReporterConfig::default(),
            RecordingStore::default(),
            FixedClock(generated_at()),
        );

        reporter.handle(&event).await.unwrap();

        let writes = reporter.storage().writes();
        let body = String::from_utf8(writes[0].1.clone()).unwrap();
        assert!(body.contains("\"instanceState\": {\"code\": 0, \"name\": \"pending\"}"));
        assert!(body.contains("\"userName\": \"alice\""));
    }

    #[tokio::test]
    async fn test_event_name_cannot_escape_local_root() {
        let tmp = TempDir::new().unwrap();
        let reporter = EventReporter::with_clock(
            ReporterConfig::default(),
            LocalStorage::new(tmp.path().join("reports")),
            FixedClock(generated_at()),
        );

        let err = reporter
            .handle(&sample_event("/../../escaped"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage { .. }));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
