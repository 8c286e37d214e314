use rust_decimal::Decimal;

use gpuarb::domain::ArbitrageOpportunity;

pub fn assert_decimal_near(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

/// Cheapest never above most expensive, both in the opportunity's partition.
pub fn assert_well_formed(opportunity: &ArbitrageOpportunity) {
    let cheap = opportunity.cheapest();
    let dear = opportunity.most_expensive();
    assert!(
        cheap.price_per_hour() <= dear.price_per_hour(),
        "cheapest {} above most expensive {}",
        cheap.price_per_hour(),
        dear.price_per_hour()
    );
    assert_eq!(cheap.gpu_model(), opportunity.gpu_model());
    assert_eq!(dear.gpu_model(), opportunity.gpu_model());
    assert!(opportunity.percentage_savings() >= Decimal::ZERO);
    assert!(opportunity.percentage_savings() < Decimal::ONE_HUNDRED);
}
