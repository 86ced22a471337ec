//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    coerce::coerce_non_negative_number,
    config::{ConfigError, TallyConfig},
    discounts::{CouponResolution, DiscountSource, derive_base_discount},
    invoice::{InvoiceBreakdown, OrderSavings, invoice_breakdown},
    items::{compute_base_subtotal, compute_offer_subtotal, resolve_order_item_base_price},
    loader::{DocumentFormat, LoadError, load_orders, parse_orders},
    orders::{Order, OrderItem, ProductSnapshot},
    pricing::PricingPolicy,
    receipt::{InvoiceReceipt, ReceiptError},
};
