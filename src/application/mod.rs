//! Application services (use cases).
//!
//! The pipeline stages, leaves first: normalize, detect, classify, compose.
//! [`Engine`] wires them together; [`analytics`] offers extra read-only views.

pub mod analytics;
pub mod classifier;
pub mod composer;
pub mod detector;
pub mod engine;
pub mod normalizer;

pub use classifier::{ConfidenceWeights, RiskClassifier};
pub use composer::{rank, RecommendationComposer, SortMode};
pub use detector::{ArbitrageDetector, DetectorConfig};
pub use engine::{Analysis, Engine, EngineConfig};
pub use normalizer::{Normalization, Normalizer};
