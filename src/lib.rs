//! gpuarb - GPU rental cost-arbitrage detection and recommendations.
//!
//! Given hourly rental prices for the same GPU model from several cloud
//! providers, the crate finds where the same compute is materially cheaper,
//! attaches a confidence score and risk tier to each finding, and projects
//! savings over a usage scenario.
//!
//! # Architecture
//!
//! records → normalize → detect → classify → compose → rank
//!
//! - [`domain`] - Provider-agnostic value types and the GPU spec table
//! - [`application`] - Normalizer, detector, classifier, composer, the
//!   [`Engine`](application::Engine) that chains them, and supplementary analytics
//! - [`port`] - Traits for price sources and report exporters
//! - [`adapter`] - JSON file source, CSV exporter and the CLI
//! - [`infrastructure`] - TOML configuration and logging setup
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use gpuarb::application::Engine;
//! use gpuarb::domain::PriceRecord;
//! use rust_decimal_macros::dec;
//!
//! let records = vec![
//!     PriceRecord::new("AWS", "A100", "us-east-1", dec!(32.77), 0.92),
//!     PriceRecord::new("LambdaLabs", "A100", "us-west-1", dec!(1.10), 0.55),
//! ];
//!
//! let analysis = Engine::with_defaults().analyze(&records);
//! let best = &analysis.recommendations[0];
//! assert_eq!(best.opportunity().cheapest().provider().as_str(), "LambdaLabs");
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
