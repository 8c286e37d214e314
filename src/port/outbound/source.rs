//! Price data source port.

use crate::domain::{DataQualityReport, PriceRecord};
use crate::error::Result;

/// Records read from a source, with their positions in the source document.
///
/// Elements the source could not even deserialize are already counted in
/// `report`; positions of both kinds share one index space.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub entries: Vec<(usize, PriceRecord)>,
    pub report: DataQualityReport,
}

impl SourceBatch {
    /// Batch with every record in order and nothing rejected.
    #[must_use]
    pub fn from_records(records: Vec<PriceRecord>) -> Self {
        Self {
            entries: records.into_iter().enumerate().collect(),
            report: DataQualityReport::new(),
        }
    }

    /// Elements in the source document, accepted or not.
    #[must_use]
    pub fn records_seen(&self) -> usize {
        self.entries.len() + self.report.total_dropped()
    }

    pub fn records(&self) -> impl Iterator<Item = &PriceRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Supplies price records.
///
/// Implementations reject structurally invalid input (a document that is
/// not a collection of records) as an error, and isolate per-element
/// problems in [`SourceBatch::report`].
pub trait PriceSource: Send + Sync {
    /// Short description for logs, e.g. the file path.
    fn describe(&self) -> String;

    /// Load all records.
    fn load(&self) -> Result<SourceBatch>;
}
