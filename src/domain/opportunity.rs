//! Arbitrage opportunity type with builder pattern.
//!
//! This module provides the `ArbitrageOpportunity` struct representing a
//! price spread for one GPU model, along with `OpportunityBuilder` for safe
//! construction. The builder derives every monetary figure from the two
//! endpoint prices so callers cannot hand in inconsistent numbers.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::id::ModelId;
use super::money::{Price, HOURS_PER_MONTH, HOURS_PER_YEAR};
use super::normalized::NormalizedPrice;

/// Error returned when building an ArbitrageOpportunity fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpportunityBuildError {
    /// Cheapest offer is required but was not provided.
    MissingCheapest,
    /// Most expensive offer is required but was not provided.
    MissingMostExpensive,
    /// The two offers describe different GPU models.
    ModelMismatch,
    /// The "cheapest" offer costs more than the "most expensive" one.
    InvertedSpread,
    /// The most expensive price is zero, so no percentage exists.
    NonPositivePrice,
    /// A derived figure does not fit in a `Decimal`.
    Overflow,
}

impl fmt::Display for OpportunityBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCheapest => write!(f, "cheapest offer is required"),
            Self::MissingMostExpensive => write!(f, "most expensive offer is required"),
            Self::ModelMismatch => write!(f, "offers must be for the same GPU model"),
            Self::InvertedSpread => write!(f, "cheapest price exceeds most expensive price"),
            Self::NonPositivePrice => write!(f, "most expensive price must be positive"),
            Self::Overflow => write!(f, "savings figures overflow"),
        }
    }
}

impl std::error::Error for OpportunityBuildError {}

/// A detected price spread for one GPU model.
///
/// Use `ArbitrageOpportunity::builder()` to construct instances.
/// The builder calculates derived fields (price difference, percentage
/// savings, annual and monthly savings) automatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrageOpportunity {
    gpu_model: ModelId,
    cheapest: NormalizedPrice,
    most_expensive: NormalizedPrice,
    providers_offering: usize,
    distinct_providers: usize,
    price_difference_per_hour: Price,
    percentage_savings: Decimal,
    annual_savings_usd: Price,
    monthly_savings_usd: Price,
}

impl ArbitrageOpportunity {
    /// Create a new builder for constructing an ArbitrageOpportunity.
    pub fn builder() -> OpportunityBuilder {
        OpportunityBuilder::new()
    }

    /// Get the canonical GPU model.
    pub fn gpu_model(&self) -> &ModelId {
        &self.gpu_model
    }

    /// Get the lowest-priced offer.
    pub fn cheapest(&self) -> &NormalizedPrice {
        &self.cheapest
    }

    /// Get the highest-priced offer.
    pub fn most_expensive(&self) -> &NormalizedPrice {
        &self.most_expensive
    }

    /// Number of records in the model's partition.
    pub fn providers_offering(&self) -> usize {
        self.providers_offering
    }

    /// Number of distinct provider names in the model's partition.
    pub fn distinct_providers(&self) -> usize {
        self.distinct_providers
    }

    /// Get the hourly spread (most expensive - cheapest).
    pub fn price_difference_per_hour(&self) -> Price {
        self.price_difference_per_hour
    }

    /// Get the spread as a percentage of the most expensive price, in `[0, 100)`.
    pub fn percentage_savings(&self) -> Decimal {
        self.percentage_savings
    }

    /// Get the spread over a year of continuous use (x 8760 hours).
    pub fn annual_savings_usd(&self) -> Price {
        self.annual_savings_usd
    }

    /// Get the spread over an average month of continuous use (x 730 hours).
    pub fn monthly_savings_usd(&self) -> Price {
        self.monthly_savings_usd
    }
}

/// Builder for constructing `ArbitrageOpportunity` instances.
///
/// # Example
///
/// ```ignore
/// let opportunity = ArbitrageOpportunity::builder()
///     .cheapest(lambda)
///     .most_expensive(aws)
///     .providers_offering(2)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct OpportunityBuilder {
    cheapest: Option<NormalizedPrice>,
    most_expensive: Option<NormalizedPrice>,
    providers_offering: Option<usize>,
    distinct_providers: Option<usize>,
}

impl OpportunityBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cheapest offer.
    pub fn cheapest(mut self, offer: NormalizedPrice) -> Self {
        self.cheapest = Some(offer);
        self
    }

    /// Set the most expensive offer.
    pub fn most_expensive(mut self, offer: NormalizedPrice) -> Self {
        self.most_expensive = Some(offer);
        self
    }

    /// Set the partition size. Defaults to 2 (the two endpoints).
    pub fn providers_offering(mut self, count: usize) -> Self {
        self.providers_offering = Some(count);
        self
    }

    /// Set the distinct provider count. Defaults to `providers_offering`.
    pub fn distinct_providers(mut self, count: usize) -> Self {
        self.distinct_providers = Some(count);
        self
    }

    /// Build the ArbitrageOpportunity, calculating derived fields.
    ///
    /// # Errors
    ///
    /// Returns `OpportunityBuildError` if an endpoint is missing, the
    /// endpoints disagree on the model, the spread is inverted, or a savings
    /// figure overflows.
    pub fn build(self) -> Result<ArbitrageOpportunity, OpportunityBuildError> {
        let cheapest = self.cheapest.ok_or(OpportunityBuildError::MissingCheapest)?;
        let most_expensive = self
            .most_expensive
            .ok_or(OpportunityBuildError::MissingMostExpensive)?;

        if cheapest.gpu_model() != most_expensive.gpu_model() {
            return Err(OpportunityBuildError::ModelMismatch);
        }
        if most_expensive.price_per_hour() <= Decimal::ZERO {
            return Err(OpportunityBuildError::NonPositivePrice);
        }
        if cheapest.price_per_hour() > most_expensive.price_per_hour() {
            return Err(OpportunityBuildError::InvertedSpread);
        }

        let providers_offering = self.providers_offering.unwrap_or(2);
        let distinct_providers = self.distinct_providers.unwrap_or(providers_offering);

        // Calculate derived fields
        let price_difference_per_hour = most_expensive.price_per_hour() - cheapest.price_per_hour();
        let percentage_savings = price_difference_per_hour
            .checked_div(most_expensive.price_per_hour())
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or(OpportunityBuildError::Overflow)?;
        let annual_savings_usd = price_difference_per_hour
            .checked_mul(HOURS_PER_YEAR)
            .ok_or(OpportunityBuildError::Overflow)?;
        let monthly_savings_usd = price_difference_per_hour
            .checked_mul(HOURS_PER_MONTH)
            .ok_or(OpportunityBuildError::Overflow)?;

        Ok(ArbitrageOpportunity {
            gpu_model: cheapest.gpu_model().clone(),
            cheapest,
            most_expensive,
            providers_offering,
            distinct_providers,
            price_difference_per_hour,
            percentage_savings,
            annual_savings_usd,
            monthly_savings_usd,
        })
    }
}
