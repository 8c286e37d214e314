//! Flat CSV export of recommendations.

use std::io::Write;

use crate::domain::Recommendation;
use crate::error::Result;
use crate::port::ReportExporter;

const HEADER: &str = "gpu_model,cheapest_provider,cheapest_region,cheapest_price_per_hour,\
most_expensive_provider,most_expensive_region,most_expensive_price_per_hour,\
price_difference_usd_per_hour,percentage_savings,annual_savings_usd,monthly_savings_usd,\
providers_offering,confidence,risk_tier,total_hours,total_cost,total_savings";

/// Writes one CSV row per recommendation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportExporter for CsvExporter {
    fn export(&self, recommendations: &[Recommendation], writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{HEADER}")?;
        for rec in recommendations {
            let opp = rec.opportunity();
            let cheap = opp.cheapest();
            let dear = opp.most_expensive();
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{:.2},{:.2},{:.2},{},{:.4},{},{},{:.2},{:.2}",
                escape(opp.gpu_model().as_str()),
                escape(cheap.provider().as_str()),
                escape(cheap.region()),
                cheap.price_per_hour(),
                escape(dear.provider().as_str()),
                escape(dear.region()),
                dear.price_per_hour(),
                opp.price_difference_per_hour(),
                opp.percentage_savings(),
                opp.annual_savings_usd(),
                opp.monthly_savings_usd(),
                opp.providers_offering(),
                rec.assessment().confidence(),
                rec.assessment().risk_tier(),
                rec.total_hours(),
                rec.total_cost(),
                rec.total_savings(),
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Quote a field if it contains a delimiter, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
