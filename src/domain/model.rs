use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata payload describing the object-store write that triggered this run.
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerEvent {
    pub operation: String,
    pub bucket: String,
    pub key: String,
    pub notification: Notification,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub content_type: String,
}

/// Credentials of the bound cloud-object-storage instance.
#[derive(Debug, Clone, Deserialize)]
pub struct CosCredentials {
    pub apikey: String,
    pub resource_instance_id: String,
}

/// One entry of a service binding; `CE_SERVICES` maps a service name to an
/// array of these.
#[derive(Debug, Clone, Deserialize)]
pub struct BindingEntry {
    pub credentials: CosCredentials,
}

/// One decoded CSV row, header name -> cell value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub fields: HashMap<String, String>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Outcome of the batch insert. Per-row outcomes are logged independently;
/// this only carries the counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchReport {
    pub total: usize,
    pub inserted: usize,
    pub failed: usize,
}
