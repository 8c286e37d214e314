//! Data-quality accounting for dropped records.

use serde::Serialize;

use super::error::RecordError;

/// One record that was excluded, with its position in the source input.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordIssue {
    /// Zero-based position of the record in the input collection.
    pub index: usize,
    /// Why it was excluded.
    pub error: RecordError,
}

/// Warning totals for records excluded from aggregation.
///
/// Never fatal: the caller decides whether to surface the counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataQualityReport {
    unknown_models: usize,
    invalid_records: usize,
    issues: Vec<RecordIssue>,
}

impl DataQualityReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an excluded record.
    pub fn record(&mut self, index: usize, error: RecordError) {
        if error.is_unknown_model() {
            self.unknown_models += 1;
        } else {
            self.invalid_records += 1;
        }
        self.issues.push(RecordIssue { index, error });
    }

    /// Fold another report into this one, keeping issues ordered by index.
    pub fn merge(&mut self, other: DataQualityReport) {
        self.unknown_models += other.unknown_models;
        self.invalid_records += other.invalid_records;
        self.issues.extend(other.issues);
        self.issues.sort_by_key(|issue| issue.index);
    }

    /// Records dropped because their GPU model was not in the spec table.
    #[must_use]
    pub fn unknown_models(&self) -> usize {
        self.unknown_models
    }

    /// Records dropped for invalid or malformed values.
    #[must_use]
    pub fn invalid_records(&self) -> usize {
        self.invalid_records
    }

    #[must_use]
    pub fn total_dropped(&self) -> usize {
        self.unknown_models + self.invalid_records
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub fn issues(&self) -> &[RecordIssue] {
        &self.issues
    }
}

/// Serializable summary of a [`DataQualityReport`].
#[derive(Debug, Serialize)]
pub struct QualitySummary {
    pub unknown_models: usize,
    pub invalid_records: usize,
    pub total_dropped: usize,
}

impl From<&DataQualityReport> for QualitySummary {
    fn from(report: &DataQualityReport) -> Self {
        Self {
            unknown_models: report.unknown_models(),
            invalid_records: report.invalid_records(),
            total_dropped: report.total_dropped(),
        }
    }
}
