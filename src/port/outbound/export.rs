//! Report export port.

use std::io::Write;

use crate::domain::Recommendation;
use crate::error::Result;

/// Writes recommendations to a flat, tabular destination.
pub trait ReportExporter {
    /// Write a header and one row per recommendation to `writer`.
    fn export(&self, recommendations: &[Recommendation], writer: &mut dyn Write) -> Result<()>;

    /// Render into a string.
    fn export_to_string(&self, recommendations: &[Recommendation]) -> Result<String> {
        let mut buffer = Vec::new();
        self.export(recommendations, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
