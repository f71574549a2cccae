// src/lambda/mod.rs

//! AWS Lambda handler for the event reporter.
//!
//! The payload is the raw EventBridge event. A successful invocation
//! returns `{"statusCode": 200, "body": "Event details stored to S3"}`;
//! any failure is returned to the runtime so the invocation is reported
//! as failed.

use lambda_runtime::{Error as LambdaError, LambdaEvent};

use serde_json::Value;
use tracing::{error, info, instrument};

use crate::models::Acknowledgment;
use crate::reporter::EventReporter;
use crate::storage::ObjectStore;
use crate::utils::Clock;

/// Main Lambda handler function.
#[instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn handler<S, C>(
    reporter: &EventReporter<S, C>,
    event: LambdaEvent<Value>,
) -> std::result::Result<Acknowledgment, LambdaError>
where
    S: ObjectStore,
    C: Clock,
{
    let (payload, _context) = event.into_parts();

    match reporter.handle(&payload).await {
        Ok(ack) => {
            info!("Event report stored in {}", reporter.config().bucket);
            Ok(ack)
        }
        Err(e) => {
            error!("Event report failed: {}", e);
            Err(e.into())
        }
    }
}
