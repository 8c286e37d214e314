//! Price normalization against the GPU spec table.
//!
//! Turns raw [`PriceRecord`]s into [`NormalizedPrice`]s. Records that cannot
//! be scored are dropped and counted, never defaulted: a fabricated
//! throughput figure would corrupt every opportunity for that model.

use tracing::{debug, warn};

use crate::domain::error::RecordError;
use crate::domain::{DataQualityReport, NormalizedPrice, Precision, PriceRecord, SpecTable};

/// Output of a batch normalization.
#[derive(Debug, Clone, Default)]
pub struct Normalization {
    /// Successfully scored records, in input order.
    pub prices: Vec<NormalizedPrice>,
    /// Records that were excluded and why.
    pub report: DataQualityReport,
}

/// Scores price records against a [`SpecTable`].
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    table: &'a SpecTable,
    precision: Precision,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer scoring at `precision`.
    #[must_use]
    pub const fn new(table: &'a SpecTable, precision: Precision) -> Self {
        Self { table, precision }
    }

    /// Precision whose throughput figure every score is computed from.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Normalize a single record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidPriceRecord`] for blank identifiers,
    /// prices that are not positive or exceed the hourly ceiling, and
    /// out-of-range availability. Returns [`RecordError::UnknownGpuModel`]
    /// when the spec table has no match.
    pub fn normalize(&self, record: &PriceRecord) -> Result<NormalizedPrice, RecordError> {
        record.validate()?;
        let spec = self.table.lookup(record.gpu_model.as_str())?;
        Ok(NormalizedPrice::new(record, spec, self.precision))
    }

    /// Normalize every record in `records`, isolating per-record failures.
    #[must_use]
    pub fn normalize_batch(&self, records: &[PriceRecord]) -> Normalization {
        self.normalize_indexed(records.iter().enumerate())
    }

    /// Like [`normalize_batch`](Self::normalize_batch), but with caller-supplied
    /// input positions so issues point back at the original document.
    pub fn normalize_indexed<'r, I>(&self, records: I) -> Normalization
    where
        I: IntoIterator<Item = (usize, &'r PriceRecord)>,
    {
        let mut normalization = Normalization::default();

        for (index, record) in records {
            match self.normalize(record) {
                Ok(price) => normalization.prices.push(price),
                Err(error) => {
                    warn!(
                        index,
                        provider = %record.provider,
                        gpu_model = %record.gpu_model,
                        error = %error,
                        "Dropping price record"
                    );
                    normalization.report.record(index, error);
                }
            }
        }

        debug!(
            normalized = normalization.prices.len(),
            dropped = normalization.report.total_dropped(),
            precision = %self.precision,
            "Normalization complete"
        );

        normalization
    }
}
