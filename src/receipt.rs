//! Receipt

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    invoice::{InvoiceBreakdown, OrderSavings},
    items::{line_total, quantity, resolve_order_item_base_price, sale_price},
    orders::Order,
    pricing::PricingPolicy,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A single rendered order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Item name
    pub name: String,

    /// Pre-discount unit price
    pub base_price: Decimal,

    /// Unit price charged
    pub unit_price: Decimal,

    /// Units
    pub quantity: Decimal,

    /// Unit price multiplied by units
    pub line_total: Decimal,
}

/// Printable invoice for a single order.
#[derive(Debug, Clone)]
pub struct InvoiceReceipt {
    order_label: String,
    lines: SmallVec<[ReceiptLine; 10]>,
    breakdown: InvoiceBreakdown,
    savings: OrderSavings,
    currency: &'static Currency,
}

impl InvoiceReceipt {
    /// Reconcile an order and collect everything needed to print it.
    pub fn new(order: &Order, policy: &PricingPolicy, currency: &'static Currency) -> Self {
        let lines = order
            .order_items
            .iter()
            .enumerate()
            .map(|(idx, item)| ReceiptLine {
                name: item
                    .display_name()
                    .map_or_else(|| format!("Item {}", idx + 1), str::to_string),
                base_price: resolve_order_item_base_price(item),
                unit_price: sale_price(item),
                quantity: quantity(item),
                line_total: line_total(item),
            })
            .collect();

        Self {
            order_label: order.label().to_string(),
            lines,
            breakdown: InvoiceBreakdown::from_order(order, policy),
            savings: OrderSavings::from_items(&order.order_items),
            currency,
        }
    }

    /// Reconciled breakdown
    pub fn breakdown(&self) -> &InvoiceBreakdown {
        &self.breakdown
    }

    /// Savings against base prices
    pub fn savings(&self) -> &OrderSavings {
        &self.savings
    }

    /// Rendered order lines
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        writeln!(out, "\nOrder {}", self.order_label)?;

        if !self.lines.is_empty() {
            self.write_lines_table(&mut out)?;
        }

        self.write_summary(&mut out)?;

        Ok(())
    }

    fn money(&self, amount: Decimal) -> String {
        format!("{}", Money::from_decimal(amount, self.currency))
    }

    fn write_lines_table(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Base Price", "Unit Price", "Qty", "Line Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            let base_price = if line.base_price > line.unit_price {
                self.money(line.base_price)
            } else {
                String::new()
            };

            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                base_price,
                self.money(line.unit_price),
                line.quantity.normalize().to_string(),
                self.money(line.line_total),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..6), Alignment::right());

        writeln!(out, "{table}")?;

        Ok(())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let breakdown = &self.breakdown;
        let mut rows: SmallVec<[(String, String); 8]> = SmallVec::new();

        rows.push(("Subtotal:".to_string(), self.money(breakdown.subtotal)));
        rows.push(("Shipping:".to_string(), self.money(breakdown.shipping)));
        rows.push(("VAT:".to_string(), self.money(breakdown.tax)));

        if breakdown.has_coupon {
            let label = if breakdown.coupon_code.is_empty() {
                "Discount:".to_string()
            } else {
                format!("Discount ({}):", breakdown.coupon_code)
            };

            rows.push((label, format!("-{}", self.money(breakdown.coupon_discount))));
        }

        if !self.savings.is_empty() {
            rows.push(("You saved:".to_string(), self.money(self.savings.base_discount)));
        }

        rows.push(("Total:".to_string(), self.money(breakdown.display_total)));

        let label_width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        let value_width = rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, " {label:<label_width$}  {value:>value_width$}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::orders::{OrderItem, ProductSnapshot};

    use super::*;

    fn order() -> Order {
        Order {
            id: Some("65f0aa".to_string()),
            items_price: Some(Decimal::from(100)),
            shipping_price: Some(Decimal::from(10)),
            coupon_code: Some("SAVE10".to_string()),
            discount_amount: Some(Decimal::from(10)),
            order_items: vec![
                OrderItem {
                    name: Some("Desk lamp".to_string()),
                    price: Some(Decimal::from(40)),
                    quantity: Some(Decimal::from(2)),
                    base_price: Some(Decimal::from(50)),
                    ..OrderItem::default()
                },
                OrderItem {
                    price: Some(Decimal::from(30)),
                    quantity: Some(Decimal::ONE),
                    product: Some(ProductSnapshot {
                        name: Some("Mug".to_string()),
                        ..ProductSnapshot::default()
                    }),
                    ..OrderItem::default()
                },
                OrderItem {
                    price: Some(Decimal::from(5)),
                    quantity: Some(Decimal::ONE),
                    ..OrderItem::default()
                },
            ],
            ..Order::default()
        }
    }

    fn render(receipt: &InvoiceReceipt) -> Result<String, ReceiptError> {
        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    #[test]
    fn collects_lines_and_breakdown() {
        let receipt = InvoiceReceipt::new(&order(), &PricingPolicy::default(), iso::USD);

        let names: Vec<&str> = receipt.lines().iter().map(|l| l.name.as_str()).collect();

        assert_eq!(names, ["Desk lamp", "Mug", "Item 3"]);
        assert_eq!(receipt.breakdown().subtotal, Decimal::from(115));
        assert_eq!(receipt.breakdown().total, Decimal::from(115));
        assert_eq!(receipt.savings().base_discount, Decimal::from(20));
        assert_eq!(receipt.currency(), iso::USD);
    }

    #[test]
    fn writes_items_and_summary() -> TestResult {
        let receipt = InvoiceReceipt::new(&order(), &PricingPolicy::default(), iso::USD);

        let text = render(&receipt)?;

        assert!(text.contains("Order 65f0aa"), "missing heading: {text}");
        assert!(text.contains("Desk lamp"), "missing item: {text}");
        assert!(text.contains("Item 3"), "missing fallback name: {text}");
        assert!(text.contains("Discount (SAVE10):"), "missing coupon: {text}");
        assert!(text.contains("You saved:"), "missing savings: {text}");
        assert!(text.contains("Total:"), "missing total: {text}");

        Ok(())
    }

    #[test]
    fn omits_discount_and_savings_when_absent() -> TestResult {
        let order = Order {
            items_price: Some(Decimal::from(20)),
            ..Order::default()
        };

        let receipt = InvoiceReceipt::new(&order, &PricingPolicy::default(), iso::AED);
        let text = render(&receipt)?;

        assert!(!text.contains("Discount"), "unexpected discount: {text}");
        assert!(!text.contains("You saved"), "unexpected savings: {text}");
        assert!(text.contains("Order <unsaved>"), "missing heading: {text}");

        Ok(())
    }

    #[test]
    fn summary_aligns_non_ascii_text() -> TestResult {
        let order = Order {
            items_price: Some(Decimal::from(20)),
            coupon_code: Some("ÉTÉ".to_string()),
            discount_amount: Some(Decimal::from(5)),
            ..Order::default()
        };

        let receipt = InvoiceReceipt::new(&order, &PricingPolicy::default(), iso::AED);
        let text = render(&receipt)?;

        let widths: Vec<usize> = text
            .lines()
            .filter(|line| line.starts_with(' '))
            .map(|line| line.chars().count())
            .collect();

        assert_eq!(widths.len(), 5, "unexpected summary: {text}");
        assert!(
            widths.iter().all(|width| Some(width) == widths.first()),
            "misaligned summary: {text}"
        );

        Ok(())
    }
}
