//! Orders

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::coerce::{lenient_number, lenient_object, lenient_seq, lenient_text};

/// An order document as exported by the admin API.
///
/// Stored aggregates (`items_price`, `total_price`, ...) are read-only inputs
/// and may disagree with the line items.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    /// Document id
    #[serde(rename = "_id", deserialize_with = "lenient_text")]
    pub id: Option<String>,

    /// Stored subtotal, possibly stale
    #[serde(deserialize_with = "lenient_number")]
    pub items_price: Option<Decimal>,

    /// Stored shipping charge
    #[serde(deserialize_with = "lenient_number")]
    pub shipping_price: Option<Decimal>,

    /// Stored tax charge
    #[serde(deserialize_with = "lenient_number")]
    pub tax_price: Option<Decimal>,

    /// Stored grand total, possibly under-reported
    #[serde(deserialize_with = "lenient_number")]
    pub total_price: Option<Decimal>,

    /// Line items
    #[serde(deserialize_with = "lenient_seq")]
    pub order_items: Vec<OrderItem>,

    /// Coupon code entered at checkout
    #[serde(deserialize_with = "lenient_text")]
    pub coupon_code: Option<String>,

    /// Discount amount applied at checkout
    #[serde(deserialize_with = "lenient_number")]
    pub discount_amount: Option<Decimal>,
}

impl Order {
    /// Identifier used in logs and receipt headings.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<unsaved>")
    }
}

/// A single order line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItem {
    /// Line item name
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,

    /// Unit sale price actually charged
    #[serde(deserialize_with = "lenient_number")]
    pub price: Option<Decimal>,

    /// Number of units
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: Option<Decimal>,

    /// Pre-discount unit price recorded on the line
    #[serde(deserialize_with = "lenient_number")]
    pub base_price: Option<Decimal>,

    /// Legacy name for `base_price`
    #[serde(deserialize_with = "lenient_number")]
    pub original_price: Option<Decimal>,

    /// Populated product snapshot, absent when only a reference id was stored
    #[serde(deserialize_with = "lenient_object")]
    pub product: Option<ProductSnapshot>,
}

impl OrderItem {
    /// Display name, preferring the line's own name over the product's.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or_else(|| self.product.as_ref().and_then(|p| p.name.as_deref()))
    }
}

/// Product fields copied onto an order line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSnapshot {
    /// Product name
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,

    /// Pre-discount price
    #[serde(deserialize_with = "lenient_number")]
    pub base_price: Option<Decimal>,

    /// Legacy name for `base_price`
    #[serde(deserialize_with = "lenient_number")]
    pub original_price: Option<Decimal>,

    /// Previous list price
    #[serde(deserialize_with = "lenient_number")]
    pub old_price: Option<Decimal>,

    /// Current list price
    #[serde(deserialize_with = "lenient_number")]
    pub price: Option<Decimal>,

    /// Current promotional price
    #[serde(deserialize_with = "lenient_number")]
    pub offer_price: Option<Decimal>,
}
