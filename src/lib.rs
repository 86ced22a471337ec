//! Tally
//!
//! Tally reconciles e-commerce order documents into trustworthy invoice
//! breakdowns. Stored order aggregates are treated as a floor rather than
//! ground truth, line items are authoritative, and malformed fields degrade to
//! zero instead of failing.

pub mod coerce;
pub mod config;
pub mod discounts;
pub mod invoice;
pub mod items;
pub mod loader;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod receipt;
