//! Discounts

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{coerce::amount_or_zero, orders::Order};

/// Where an order's discount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountSource {
    /// Discount tied to an entered promo code.
    Coupon,

    /// Discount amount recorded without any promo code.
    Manual,

    /// No discount applies.
    None,
}

/// Coupon fields read from an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponResolution {
    /// Trimmed coupon code, empty when none was entered.
    pub code: String,

    /// Discount deducted from the total.
    pub discount: Decimal,

    /// Whether a discount is actually being applied.
    pub applied: bool,

    /// Where the discount came from.
    pub source: DiscountSource,
}

impl CouponResolution {
    /// Read the coupon code and discount amount from an order.
    ///
    /// A coupon counts as present when a code was entered or a positive
    /// amount was recorded. An amount without a code is honoured as a manual
    /// discount. A code with a zero amount is present but not applied.
    pub fn from_order(order: &Order) -> Self {
        let code = order
            .coupon_code
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let amount = amount_or_zero(order.discount_amount);
        let present = !code.is_empty() || amount > Decimal::ZERO;
        let discount = if present { amount } else { Decimal::ZERO };
        let applied = present && discount > Decimal::ZERO;

        let source = match (applied, code.is_empty()) {
            (false, _) => DiscountSource::None,
            (true, false) => DiscountSource::Coupon,
            (true, true) => DiscountSource::Manual,
        };

        Self {
            code,
            discount,
            applied,
            source,
        }
    }
}

/// The positive difference between a base subtotal and an offer subtotal.
///
/// A base subtotal below the offer subtotal means the reference prices are
/// missing or inconsistent, so the result is floored at zero.
pub fn derive_base_discount(base_subtotal: Decimal, offer_subtotal: Decimal) -> Decimal {
    (amount_or_zero(Some(base_subtotal)) - amount_or_zero(Some(offer_subtotal))).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(code: Option<&str>, amount: Option<i64>) -> Order {
        Order {
            coupon_code: code.map(str::to_string),
            discount_amount: amount.map(Decimal::from),
            ..Order::default()
        }
    }

    #[test]
    fn base_discount_is_difference() {
        assert_eq!(
            derive_base_discount(Decimal::from(100), Decimal::from(80)),
            Decimal::from(20)
        );
    }

    #[test]
    fn base_discount_is_never_negative() {
        assert_eq!(
            derive_base_discount(Decimal::from(80), Decimal::from(100)),
            Decimal::ZERO
        );

        let samples = [-250, -1, 0, 1, 7, 99, 1_000];

        for a in samples {
            for b in samples {
                let discount = derive_base_discount(Decimal::from(a), Decimal::from(b));

                assert!(discount >= Decimal::ZERO, "negative discount for {a} - {b}");
            }
        }
    }

    #[test]
    fn negative_inputs_are_treated_as_zero() {
        assert_eq!(
            derive_base_discount(Decimal::from(50), Decimal::from(-10)),
            Decimal::from(50)
        );
    }

    #[test]
    fn no_coupon() {
        let coupon = CouponResolution::from_order(&order(Some(""), Some(0)));

        assert!(!coupon.applied);
        assert_eq!(coupon.discount, Decimal::ZERO);
        assert_eq!(coupon.source, DiscountSource::None);
    }

    #[test]
    fn code_with_zero_amount_is_not_applied() {
        let coupon = CouponResolution::from_order(&order(Some("SAVE10"), Some(0)));

        assert_eq!(coupon.code, "SAVE10");
        assert!(!coupon.applied);
        assert_eq!(coupon.discount, Decimal::ZERO);
        assert_eq!(coupon.source, DiscountSource::None);
    }

    #[test]
    fn code_with_amount_is_coupon() {
        let coupon = CouponResolution::from_order(&order(Some("  SAVE10 "), Some(10)));

        assert_eq!(coupon.code, "SAVE10");
        assert!(coupon.applied);
        assert_eq!(coupon.discount, Decimal::from(10));
        assert_eq!(coupon.source, DiscountSource::Coupon);
    }

    #[test]
    fn amount_without_code_is_manual() {
        let coupon = CouponResolution::from_order(&order(None, Some(25)));

        assert_eq!(coupon.code, "");
        assert!(coupon.applied);
        assert_eq!(coupon.discount, Decimal::from(25));
        assert_eq!(coupon.source, DiscountSource::Manual);
    }
}
