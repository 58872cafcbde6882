//! Money arithmetic shared by the cart view and the checkout receipt.
//!
//! Prices are stored as integer cents and exposed as two-decimal amounts. Tax is only
//! ever computed here so the cart summary and the receipt always agree.

use rust_decimal::{Decimal, RoundingStrategy};

/// 8%.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

pub fn price_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn line_subtotal(price: Decimal, quantity: i32) -> Decimal {
    round_money(price * Decimal::from(quantity))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

impl Totals {
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            grand_total: Decimal::ZERO,
        }
    }

    /// Sums `(unit price, quantity)` pairs and applies `tax_rate` to the rounded subtotal.
    pub fn from_lines<I>(lines: I, tax_rate: Decimal) -> Self
    where
        I: IntoIterator<Item = (Decimal, i32)>,
    {
        let subtotal = round_money(
            lines
                .into_iter()
                .map(|(price, quantity)| price * Decimal::from(quantity))
                .sum(),
        );
        let tax = round_money(subtotal * tax_rate);
        Self {
            subtotal,
            tax,
            grand_total: subtotal + tax,
        }
    }
}
