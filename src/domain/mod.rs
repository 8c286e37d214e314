//! Provider-agnostic domain types for GPU price arbitrage.

mod assessment;
mod id;
mod money;
mod normalized;
mod opportunity;
mod quality;
mod record;
mod recommendation;
mod reliability;
mod usage;

pub mod error;
pub mod spec;

// Core domain types
pub use id::{ModelId, ProviderId};
pub use money::{
    Hours, Price, HOURS_PER_DAY, HOURS_PER_MONTH, HOURS_PER_YEAR, MAX_PRICE_PER_HOUR,
};
pub use record::PriceRecord;

// Derived values
pub use assessment::{ConfidenceAssessment, RiskTier};
pub use normalized::NormalizedPrice;
pub use opportunity::{ArbitrageOpportunity, OpportunityBuildError, OpportunityBuilder};
pub use recommendation::{Projection, Recommendation};

// Reference data and parameters
pub use reliability::{ReliabilityPriors, DEFAULT_RELIABILITY};
pub use spec::{GpuSpec, PerformanceTier, Precision, SpecTable, Throughput};
pub use usage::UsageScenario;

// Data-quality accounting
pub use quality::{DataQualityReport, QualitySummary, RecordIssue};
