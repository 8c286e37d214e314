//! JSON file price source.
//!
//! The document must be an array of price records. Each element is decoded
//! on its own so one malformed entry never sinks the rest of the file.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::error::RecordError;
use crate::domain::PriceRecord;
use crate::error::{Error, Result};
use crate::port::{PriceSource, SourceBatch};

/// Reads price records from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<SourceBatch> {
        let content = std::fs::read_to_string(&self.path)?;
        let batch = parse_records(&content)?;
        debug!(
            path = %self.path.display(),
            records = batch.entries.len(),
            rejected = batch.report.total_dropped(),
            "Loaded price records"
        );
        Ok(batch)
    }
}

/// Decode a JSON array of price records.
///
/// # Errors
///
/// Returns [`Error::Json`] for text that is not JSON at all and
/// [`Error::Input`] for a JSON document that is not an array. Elements that
/// fail to decode are recorded as invalid records instead.
pub fn parse_records(content: &str) -> Result<SourceBatch> {
    let document: Value = serde_json::from_str(content)?;
    let Value::Array(elements) = document else {
        return Err(Error::Input(format!(
            "expected a JSON array of price records, found {}",
            kind(&document)
        )));
    };

    let mut batch = SourceBatch::default();
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<PriceRecord>(element) {
            Ok(record) => batch.entries.push((index, record)),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed price record");
                batch.report.record(index, RecordError::invalid(e.to_string()));
            }
        }
    }
    Ok(batch)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
