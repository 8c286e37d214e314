//! Price records enriched with cost-performance metrics.

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::id::{ModelId, ProviderId};
use super::money::Price;
use super::record::PriceRecord;
use super::spec::{GpuSpec, Precision};

/// A [`PriceRecord`] with its GPU model resolved and scored.
///
/// `gpu_model` is rewritten to the canonical spec-table name so that every
/// spelling of the same GPU lands in one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPrice {
    record: PriceRecord,
    precision: Precision,
    throughput_rating: f64,
    cost_performance_score: f64,
    cost_per_tflop: f64,
}

impl NormalizedPrice {
    /// Score a record against its spec entry.
    ///
    /// `cost_performance_score = (throughput / price) * availability`; higher is
    /// better value. Callers must have validated the record (positive price).
    #[must_use]
    pub fn new(record: &PriceRecord, spec: &GpuSpec, precision: Precision) -> Self {
        let throughput_rating = spec.throughput_rating(precision);
        let price = record.price_per_hour.to_f64().unwrap_or(f64::INFINITY);

        let cost_performance_score = (throughput_rating / price) * record.availability;

        let mut record = record.clone();
        record.gpu_model = ModelId::new(spec.model());

        Self {
            record,
            precision,
            throughput_rating,
            cost_performance_score,
            cost_per_tflop: price / throughput_rating,
        }
    }

    /// The source record (with the canonical model name).
    #[must_use]
    pub fn record(&self) -> &PriceRecord {
        &self.record
    }

    #[must_use]
    pub fn provider(&self) -> &ProviderId {
        &self.record.provider
    }

    #[must_use]
    pub fn gpu_model(&self) -> &ModelId {
        &self.record.gpu_model
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.record.region
    }

    #[must_use]
    pub fn price_per_hour(&self) -> Price {
        self.record.price_per_hour
    }

    #[must_use]
    pub fn availability(&self) -> f64 {
        self.record.availability
    }

    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Throughput in TFLOPs at the scoring precision.
    #[must_use]
    pub fn throughput_rating(&self) -> f64 {
        self.throughput_rating
    }

    /// Availability-weighted TFLOPs per dollar-hour.
    #[must_use]
    pub fn cost_performance_score(&self) -> f64 {
        self.cost_performance_score
    }

    /// Dollars per hour per TFLOP (lower is better).
    #[must_use]
    pub fn cost_per_tflop(&self) -> f64 {
        self.cost_per_tflop
    }
}
