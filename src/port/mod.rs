//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the pure engine and the outside world:
//! where price records come from and where finished reports go.
//!
//! ```text
//!   ┌─────────────┐      ┌─────────────────────┐      ┌──────────────┐
//!   │ PriceSource │ ───▶ │ Engine (application)│ ───▶ │ReportExporter│
//!   └─────────────┘      └─────────────────────┘      └──────────────┘
//! ```

pub mod outbound;

pub use outbound::export::ReportExporter;
pub use outbound::source::{PriceSource, SourceBatch};
