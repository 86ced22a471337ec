//! Items

use rust_decimal::Decimal;

use crate::{coerce::amount_or_zero, orders::OrderItem};

/// Returns the best available pre-discount unit price for an order line.
///
/// Candidates are checked in a fixed priority order, from the line's own
/// reference prices through the product snapshot down to the sale price
/// itself. The first candidate strictly greater than zero wins; zero means
/// "unknown".
pub fn resolve_order_item_base_price(item: &OrderItem) -> Decimal {
    let product = item.product.as_ref();

    [
        item.base_price,
        item.original_price,
        product.and_then(|p| p.base_price),
        product.and_then(|p| p.original_price),
        product.and_then(|p| p.old_price),
        product.and_then(|p| p.price),
        product.and_then(|p| p.offer_price),
        item.price,
    ]
    .into_iter()
    .flatten()
    .find(|price| *price > Decimal::ZERO)
    .unwrap_or(Decimal::ZERO)
}

/// Unit sale price of a line, zero when missing or invalid.
pub fn sale_price(item: &OrderItem) -> Decimal {
    amount_or_zero(item.price)
}

/// Quantity of a line, zero when missing or invalid.
pub fn quantity(item: &OrderItem) -> Decimal {
    amount_or_zero(item.quantity)
}

/// Sale price multiplied by quantity, saturating at [`Decimal::MAX`].
pub fn line_total(item: &OrderItem) -> Decimal {
    sale_price(item).saturating_mul(quantity(item))
}

/// Sum of base price multiplied by quantity over every line.
///
/// No rounding is applied. Products and the running sum saturate at
/// [`Decimal::MAX`] instead of overflowing.
pub fn compute_base_subtotal(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| resolve_order_item_base_price(item).saturating_mul(quantity(item)))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum of sale price multiplied by quantity over every line, saturating at
/// [`Decimal::MAX`].
pub fn compute_offer_subtotal(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .map(line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
