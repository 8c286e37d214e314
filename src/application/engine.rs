//! End-to-end arbitrage pipeline.
//!
//! records → normalize → detect → classify → compose → rank
//!
//! The engine owns only immutable reference data and parameters. Every call
//! recomputes from its input, so one engine can serve concurrent callers
//! with different snapshots.

use tracing::{debug, info};

use super::classifier::{ConfidenceWeights, RiskClassifier};
use super::composer::{rank, RecommendationComposer, SortMode};
use super::detector::{ArbitrageDetector, DetectorConfig};
use super::normalizer::{Normalization, Normalizer};
use crate::domain::error::RecordError;
use crate::domain::{
    ArbitrageOpportunity, DataQualityReport, ModelId, NormalizedPrice, Precision, PriceRecord,
    Recommendation, ReliabilityPriors, SpecTable, UsageScenario,
};
use crate::port::SourceBatch;

/// Tunable parameters of the pipeline.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub precision: Precision,
    pub detector: DetectorConfig,
    pub weights: ConfidenceWeights,
    pub scenario: UsageScenario,
    pub sort: SortMode,
    /// Keep only the first `top` recommendations after ranking.
    pub top: Option<usize>,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Ranked recommendations.
    pub recommendations: Vec<Recommendation>,
    /// Records excluded from aggregation.
    pub report: DataQualityReport,
    pub records_seen: usize,
    pub records_normalized: usize,
}

impl Analysis {
    #[must_use]
    pub fn opportunities(&self) -> impl Iterator<Item = &ArbitrageOpportunity> {
        self.recommendations.iter().map(Recommendation::opportunity)
    }
}

/// The arbitrage engine.
#[derive(Debug, Clone)]
pub struct Engine {
    table: SpecTable,
    config: EngineConfig,
    detector: ArbitrageDetector,
    classifier: RiskClassifier,
    composer: RecommendationComposer,
}

impl Engine {
    #[must_use]
    pub fn new(table: SpecTable, priors: ReliabilityPriors, config: EngineConfig) -> Self {
        Self {
            detector: ArbitrageDetector::new(config.detector.clone()),
            classifier: RiskClassifier::new(priors, config.weights),
            composer: RecommendationComposer::new(config.scenario),
            table,
            config,
        }
    }

    /// Engine with the built-in spec table, priors and default parameters.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            SpecTable::builtin(),
            ReliabilityPriors::builtin(),
            EngineConfig::default(),
        )
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn spec_table(&self) -> &SpecTable {
        &self.table
    }

    #[must_use]
    pub fn priors(&self) -> &ReliabilityPriors {
        self.classifier.priors()
    }

    #[must_use]
    pub fn normalizer(&self) -> Normalizer<'_> {
        Normalizer::new(&self.table, self.config.precision)
    }

    /// Normalize records at the configured precision.
    #[must_use]
    pub fn normalize(&self, records: &[PriceRecord]) -> Normalization {
        self.normalizer().normalize_batch(records)
    }

    /// Unranked, unfiltered-by-`top` detector output for already normalized prices.
    #[must_use]
    pub fn opportunities(&self, prices: &[NormalizedPrice]) -> Vec<ArbitrageOpportunity> {
        self.detector.detect(prices).collect()
    }

    /// Canonical name for any spelling or alias the spec table knows.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownGpuModel`] when the table has no match.
    pub fn canonical_model(&self, gpu_model: &str) -> Result<ModelId, RecordError> {
        self.table.lookup(gpu_model).map(|spec| ModelId::new(spec.model()))
    }

    /// The opportunity for one GPU model, if its spread qualifies.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownGpuModel`] when the table has no match.
    pub fn opportunity_for(
        &self,
        prices: &[NormalizedPrice],
        gpu_model: &str,
    ) -> Result<Option<ArbitrageOpportunity>, RecordError> {
        let model = self.canonical_model(gpu_model)?;
        Ok(self
            .detector
            .detect(prices)
            .find(|opportunity| opportunity.gpu_model() == &model))
    }

    /// Run the full pipeline over in-memory records.
    #[must_use]
    pub fn analyze(&self, records: &[PriceRecord]) -> Analysis {
        let normalization = self.normalize(records);
        self.finish(records.len(), normalization, None)
    }

    /// Run the full pipeline over a source batch, merging the source's own
    /// rejections into the data-quality report.
    #[must_use]
    pub fn analyze_batch(&self, batch: &SourceBatch) -> Analysis {
        self.finish(batch.records_seen(), self.normalize_source(batch), None)
    }

    /// Like [`Engine::analyze_batch`], restricted to one GPU model before
    /// ranking and `top` apply.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownGpuModel`] when the table has no match.
    pub fn analyze_model(
        &self,
        batch: &SourceBatch,
        gpu_model: &str,
    ) -> Result<Analysis, RecordError> {
        let model = self.canonical_model(gpu_model)?;
        Ok(self.finish(
            batch.records_seen(),
            self.normalize_source(batch),
            Some(&model),
        ))
    }

    /// Normalize a source batch; the report covers both the source's and the
    /// normalizer's rejections, ordered by input position.
    #[must_use]
    pub fn normalize_source(&self, batch: &SourceBatch) -> Normalization {
        let mut normalization = self
            .normalizer()
            .normalize_indexed(batch.entries.iter().map(|(index, record)| (*index, record)));
        let mut report = batch.report.clone();
        report.merge(normalization.report);
        normalization.report = report;
        normalization
    }

    /// Classify, compose and rank already detected opportunities.
    #[must_use]
    pub fn recommend<I>(&self, opportunities: I) -> Vec<Recommendation>
    where
        I: IntoIterator<Item = ArbitrageOpportunity>,
    {
        let mut recommendations: Vec<_> = opportunities
            .into_iter()
            .map(|opportunity| {
                let assessment = self.classifier.classify(&opportunity);
                self.composer.compose(opportunity, assessment)
            })
            .collect();

        rank(&mut recommendations, self.config.sort);
        if let Some(top) = self.config.top {
            recommendations.truncate(top);
        }
        recommendations
    }

    fn finish(
        &self,
        records_seen: usize,
        normalization: Normalization,
        model: Option<&ModelId>,
    ) -> Analysis {
        let Normalization { prices, report } = normalization;
        let recommendations = self.recommend(
            self.detector
                .detect(&prices)
                .filter(|opportunity| model.map_or(true, |m| opportunity.gpu_model() == m)),
        );

        if !report.is_clean() {
            info!(
                unknown_models = report.unknown_models(),
                invalid_records = report.invalid_records(),
                "Some price records were excluded"
            );
        }
        debug!(
            records_seen,
            records_normalized = prices.len(),
            recommendations = recommendations.len(),
            sort = %self.config.sort,
            "Analysis complete"
        );

        Analysis {
            recommendations,
            report,
            records_seen,
            records_normalized: prices.len(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
