//! Money calculation utilities using rust_decimal for precision
//!
//! Line prices and group totals are computed with `Decimal` and kept
//! unrounded. Rounding to cents happens only when an invoice payload is
//! built.

use rust_decimal::prelude::*;

/// Invoice amounts carry two decimal places, rounded half away from zero
const DECIMAL_PLACES: u32 = 2;

/// Convert an f64 to Decimal. Non-finite input is treated as zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round a Decimal to cents
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Convert Decimal back to f64 without rounding
#[inline]
pub fn to_f64_exact(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Price of a package line: `weight × plan_rate`, unrounded
pub fn line_price(weight: f64, plan_rate: f64) -> f64 {
    to_f64_exact(to_decimal(weight) * to_decimal(plan_rate))
}

/// Exact sum of a set of prices
pub fn exact_sum<I>(prices: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64_exact(prices.into_iter().map(to_decimal).sum())
}

/// Sum a set of prices, rounding the result (not the parts) to cents
pub fn sum_prices<I>(prices: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64(prices.into_iter().map(to_decimal).sum())
}
