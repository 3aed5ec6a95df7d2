use crate::domain::model::Record;
use crate::utils::error::Result;
use std::collections::HashMap;

/// Decodes CSV text into records, first line = header. The whole file is
/// materialized before any database work starts.
pub fn decode_records(content: &str) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut fields = HashMap::new();
        for (name, value) in headers.iter().zip(row.iter()) {
            fields.insert(name.to_string(), value.to_string());
        }
        records.push(Record { fields });
    }

    tracing::debug!("decoded {} CSV records", records.len());
    Ok(records)
}
