//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};

/// VAT assumed when an order carries no explicit tax, as a fraction.
pub const DEFAULT_VAT_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Decimal places derived VAT is rounded to.
pub const DEFAULT_VAT_SCALE: u32 = 2;

/// Rates and rounding used when deriving missing figures.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    vat_rate: Decimal,
    vat_scale: u32,
}

impl PricingPolicy {
    /// Creates a new policy with the given VAT rate (as a fraction) and rounding scale.
    pub fn new(vat_rate: Decimal, vat_scale: u32) -> Self {
        Self {
            vat_rate,
            vat_scale,
        }
    }

    /// VAT rate as a percentage.
    pub fn vat_rate(&self) -> Percentage {
        Percentage::from(self.vat_rate)
    }

    /// Decimal places derived VAT is rounded to.
    pub fn vat_scale(&self) -> u32 {
        self.vat_scale
    }

    /// VAT on `amount`, rounded half away from zero.
    pub fn vat_on(&self, amount: Decimal) -> Decimal {
        (self.vat_rate() * amount)
            .round_dp_with_strategy(self.vat_scale, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_VAT_RATE, DEFAULT_VAT_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_is_five_percent() {
        assert_eq!(DEFAULT_VAT_RATE, Decimal::new(5, 2));
        assert_eq!(PricingPolicy::default().vat_scale(), 2);
    }

    #[test]
    fn vat_on_whole_amount() {
        let policy = PricingPolicy::default();

        assert_eq!(policy.vat_on(Decimal::from(200)), Decimal::from(10));
    }

    #[test]
    fn vat_rounds_half_away_from_zero() {
        let policy = PricingPolicy::default();

        // 0.05 * 0.9 = 0.045
        assert_eq!(policy.vat_on(Decimal::new(9, 1)), Decimal::new(5, 2));
        // 0.05 * 33.33 = 1.6665
        assert_eq!(policy.vat_on(Decimal::new(3333, 2)), Decimal::new(167, 2));
    }

    #[test]
    fn custom_rate_and_scale() {
        let policy = PricingPolicy::new(Decimal::new(15, 2), 0);

        // 0.15 * 99 = 14.85
        assert_eq!(policy.vat_on(Decimal::from(99)), Decimal::from(15));
    }
}
