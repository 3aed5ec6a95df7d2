use crate::domain::model::{BindingEntry, CosCredentials, TriggerEvent};
use crate::utils::error::{ImportError, Result};
use std::collections::HashMap;

pub const WRITE_OPERATION: &str = "Object:Write";
pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const COS_SERVICE: &str = "cloud-object-storage";

/// Checks the triggering event payload and the service bindings, both passed
/// through as the raw JSON the platform injects into the jobrun. Performs no
/// I/O; a rejection here means no network call is ever made.
pub fn validate_trigger(
    event_payload: Option<&str>,
    service_bindings: Option<&str>,
) -> Result<(TriggerEvent, CosCredentials)> {
    let raw_event = event_payload.ok_or_else(|| ImportError::EventError {
        message: "job does not contain any event data".to_string(),
    })?;
    let event: TriggerEvent = serde_json::from_str(raw_event)?;

    if event.operation != WRITE_OPERATION {
        return Err(ImportError::EventError {
            message: format!(
                "operation '{}' does not match expected '{}'",
                event.operation, WRITE_OPERATION
            ),
        });
    }
    if event.notification.content_type != CSV_CONTENT_TYPE {
        return Err(ImportError::EventError {
            message: format!(
                "update did happen on file '{}' which is of type '{}' (expected type '{}')",
                event.key, event.notification.content_type, CSV_CONTENT_TYPE
            ),
        });
    }
    tracing::info!(
        "received an update event for CSV file '{}' in bucket '{}'",
        event.key,
        event.bucket
    );

    let raw_bindings = service_bindings.ok_or_else(|| ImportError::EventError {
        message: "job is not bound to any service".to_string(),
    })?;
    let bindings: HashMap<String, serde_json::Value> = serde_json::from_str(raw_bindings)?;
    let entries = bindings
        .get(COS_SERVICE)
        .ok_or_else(|| ImportError::MissingBindingError {
            service: COS_SERVICE.to_string(),
        })?;
    let entries: Vec<BindingEntry> = serde_json::from_value(entries.clone())?;
    let binding = entries
        .into_iter()
        .next()
        .ok_or_else(|| ImportError::MissingBindingError {
            service: COS_SERVICE.to_string(),
        })?;

    Ok((event, binding.credentials))
}
