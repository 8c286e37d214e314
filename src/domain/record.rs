//! Raw price records as supplied by a data source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::RecordError;
use super::id::{ModelId, ProviderId};
use super::money::{Price, MAX_PRICE_PER_HOUR};

/// One provider's hourly rental offer for a GPU model in a region.
///
/// Immutable once read; normalization produces a new value rather than
/// editing this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Provider offering the instance.
    pub provider: ProviderId,
    /// GPU model name as the provider spells it.
    pub gpu_model: ModelId,
    /// Provider region or zone.
    #[serde(default)]
    pub region: String,
    /// Hourly price in USD.
    pub price_per_hour: Price,
    /// Fraction of time the offer is actually obtainable (0.0 to 1.0).
    pub availability: f64,
    /// When the data source observed the price, if it says.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PriceRecord {
    /// Create a record without a timestamp.
    pub fn new(
        provider: impl Into<ProviderId>,
        gpu_model: impl Into<ModelId>,
        region: impl Into<String>,
        price_per_hour: Price,
        availability: f64,
    ) -> Self {
        Self {
            provider: provider.into(),
            gpu_model: gpu_model.into(),
            region: region.into(),
            price_per_hour,
            availability,
            timestamp: None,
        }
    }

    /// Attach an observation timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Check the record-level rules that do not need the spec table.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidPriceRecord`] when the provider or model
    /// is blank, the price is not positive or above [`MAX_PRICE_PER_HOUR`], or
    /// availability is outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.provider.as_str().trim().is_empty() {
            return Err(RecordError::invalid("provider is empty"));
        }
        if self.gpu_model.as_str().trim().is_empty() {
            return Err(RecordError::invalid(format!(
                "gpu_model is empty for provider {}",
                self.provider
            )));
        }
        if self.price_per_hour <= Price::ZERO {
            return Err(RecordError::invalid(format!(
                "price_per_hour must be positive, got {} for {} {}",
                self.price_per_hour, self.provider, self.gpu_model
            )));
        }
        if self.price_per_hour > MAX_PRICE_PER_HOUR {
            return Err(RecordError::invalid(format!(
                "price_per_hour exceeds {MAX_PRICE_PER_HOUR}, got {} for {} {}",
                self.price_per_hour, self.provider, self.gpu_model
            )));
        }
        if !(0.0..=1.0).contains(&self.availability) {
            return Err(RecordError::invalid(format!(
                "availability must be within [0, 1], got {} for {} {}",
                self.availability, self.provider, self.gpu_model
            )));
        }
        Ok(())
    }
}
