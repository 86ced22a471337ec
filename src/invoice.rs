//! Invoice breakdown
//!
//! Stored order aggregates are written at checkout and are not always updated
//! when line items are edited afterwards, so they tend to under-report. The
//! breakdown treats them as a floor: figures recomputed from line items win
//! when they are higher, and the stored figure wins otherwise.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::{
    coerce::amount_or_zero,
    discounts::{CouponResolution, DiscountSource, derive_base_discount},
    items::{compute_base_subtotal, compute_offer_subtotal},
    orders::{Order, OrderItem},
    pricing::PricingPolicy,
};

/// Reconciled price breakdown for a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceBreakdown {
    /// Items subtotal
    pub subtotal: Decimal,

    /// Shipping charge
    pub shipping: Decimal,

    /// VAT, stored or derived
    pub tax: Decimal,

    /// Grand total
    pub total: Decimal,

    /// Discount not tied to a coupon code; always zero, see [`Self::discount_source`]
    pub manual_discount: Decimal,

    /// Discount deducted from the total
    pub coupon_discount: Decimal,

    /// Trimmed coupon code, empty when none was entered
    pub coupon_code: String,

    /// Whether a discount is being deducted
    pub has_coupon: bool,

    /// Where the deducted discount came from
    pub discount_source: DiscountSource,

    /// Same as `subtotal`
    pub display_subtotal: Decimal,

    /// Same as `total`
    pub display_total: Decimal,
}

impl InvoiceBreakdown {
    /// Reconcile an order's stored aggregates against its line items.
    pub fn from_order(order: &Order, policy: &PricingPolicy) -> Self {
        let subtotal = reconcile_subtotal(order);
        let shipping = amount_or_zero(order.shipping_price);
        let stored_tax = amount_or_zero(order.tax_price);
        let coupon = CouponResolution::from_order(order);

        let tax = if stored_tax > Decimal::ZERO {
            stored_tax
        } else {
            policy.vat_on(subtotal)
        };

        let calculated_total = subtotal
            .saturating_add(shipping)
            .saturating_sub(coupon.discount);
        let stored_total = amount_or_zero(order.total_price);

        if stored_total > calculated_total {
            debug!(
                order = order.label(),
                %stored_total,
                %calculated_total,
                "stored total exceeds recalculated total; keeping stored total"
            );
        }

        let total = calculated_total.max(stored_total);

        Self {
            subtotal,
            shipping,
            tax,
            total,
            manual_discount: Decimal::ZERO,
            coupon_discount: coupon.discount,
            coupon_code: coupon.code,
            has_coupon: coupon.applied,
            discount_source: coupon.source,
            display_subtotal: subtotal,
            display_total: total,
        }
    }
}

/// Reconcile an order with the default pricing policy.
pub fn invoice_breakdown(order: &Order) -> InvoiceBreakdown {
    InvoiceBreakdown::from_order(order, &PricingPolicy::default())
}

fn reconcile_subtotal(order: &Order) -> Decimal {
    let stored = amount_or_zero(order.items_price);

    if order.order_items.is_empty() {
        return stored;
    }

    let calculated = compute_offer_subtotal(&order.order_items);

    if calculated > stored {
        debug!(
            order = order.label(),
            %stored,
            %calculated,
            "stored subtotal is below line items; using recalculated subtotal"
        );

        return calculated;
    }

    stored
}

/// What a customer saved against the base prices of their items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSavings {
    /// Subtotal at base prices
    pub base_subtotal: Decimal,

    /// Subtotal at sale prices
    pub offer_subtotal: Decimal,

    /// Difference between the two, never negative
    pub base_discount: Decimal,
}

impl OrderSavings {
    /// Compute savings for a set of line items.
    pub fn from_items(items: &[OrderItem]) -> Self {
        let base_subtotal = compute_base_subtotal(items);
        let offer_subtotal = compute_offer_subtotal(items);

        Self {
            base_subtotal,
            offer_subtotal,
            base_discount: derive_base_discount(base_subtotal, offer_subtotal),
        }
    }

    /// Whether there is anything to show.
    pub fn is_empty(&self) -> bool {
        self.base_discount.is_zero()
    }
}
