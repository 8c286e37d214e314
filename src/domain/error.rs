//! Domain validation errors.
//!
//! [`RecordError`] covers per-record data-quality problems. They are isolated
//! to the offending record: the record is dropped, counted in a
//! [`DataQualityReport`](super::DataQualityReport), and the batch carries on.
//!
//! [`DomainError`] covers invalid caller-supplied parameters such as a usage
//! scenario outside its allowed ranges.
//!
//! # Examples
//!
//! ```
//! use gpuarb::domain::error::RecordError;
//! use gpuarb::domain::spec::SpecTable;
//!
//! let table = SpecTable::builtin();
//! let result = table.lookup("B200");
//!
//! assert!(matches!(result, Err(RecordError::UnknownGpuModel { .. })));
//! ```

use thiserror::Error;

/// Why a single price record was excluded from aggregation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// The GPU model has no entry (or alias) in the spec table.
    #[error("unknown GPU model '{model}'")]
    UnknownGpuModel {
        /// The model name as supplied by the data source.
        model: String,
    },

    /// The record is structurally present but carries unusable values.
    #[error("invalid price record: {reason}")]
    InvalidPriceRecord {
        /// Human-readable description of the violated rule.
        reason: String,
    },
}

impl RecordError {
    /// Shorthand for an [`RecordError::InvalidPriceRecord`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidPriceRecord {
            reason: reason.into(),
        }
    }

    /// True for spec-table misses.
    #[must_use]
    pub fn is_unknown_model(&self) -> bool {
        matches!(self, Self::UnknownGpuModel { .. })
    }
}

/// Errors raised when caller-supplied domain parameters are invalid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A usage scenario field is out of range.
    #[error("invalid usage scenario: {field} {reason}")]
    InvalidUsage {
        /// The offending field.
        field: &'static str,
        /// What the field must satisfy.
        reason: String,
    },

    /// A spec-table entry is unusable.
    #[error("invalid GPU spec for '{model}': {reason}")]
    InvalidSpec {
        /// The model the entry describes.
        model: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An alias points at a model that is not in the table.
    #[error("alias '{alias}' targets unknown GPU model '{target}'")]
    DanglingAlias {
        /// The alias key.
        alias: String,
        /// The missing target model.
        target: String,
    },
}
