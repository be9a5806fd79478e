//! # Money Module
//!
//! Prices and costs as whole cents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request: "19.99" | 19.999 | "0.5"                                     │
//! │       │                                                                 │
//! │       ▼  rust_decimal parse (validation.rs)                             │
//! │  Decimal ──► bounds check ──► Money::from_decimal (round half to even, │
//! │                               2 places)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Money(i64 cents) ──► products.price_cents / cost_cents (INTEGER)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Analytics sum `price × stock` over whole catalogs; integer cents keep
//! those sums exact.
//!
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let stock_value = Money::from_cents(1099) * 3_i64;
//! assert_eq!(stock_value.to_string(), "32.97");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// A signed amount of cents. Margins and losses may be negative.
///
/// Serializes as the bare integer, which is why API fields carrying it are
/// named `*_cents`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Rounds to 2 fractional digits, midpoints to the even cent.
    ///
    /// `None` when the result does not fit in `i64` cents.
    ///
    /// ```rust
    /// use std::str::FromStr;
    /// use rust_decimal::Decimal;
    /// use stockroom_core::money::Money;
    ///
    /// let price = Money::from_decimal(Decimal::from_str("19.995").unwrap()).unwrap();
    /// assert_eq!(price.cents(), 2000);
    /// ```
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let mut quantized = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        quantized.rescale(2);
        i64::try_from(quantized.mantissa()).ok().map(Money)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

/// `10.99`, `-0.05`; no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Price or cost times a stock count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_from_decimal_quantizes() {
        assert_eq!(Money::from_decimal(dec("19.99")).unwrap().cents(), 1999);
        assert_eq!(Money::from_decimal(dec("19.994")).unwrap().cents(), 1999);
        assert_eq!(Money::from_decimal(dec("19.995")).unwrap().cents(), 2000);
        assert_eq!(Money::from_decimal(dec("7")).unwrap().cents(), 700);
        assert_eq!(Money::from_decimal(dec("0.5")).unwrap().cents(), 50);
        assert_eq!(Money::from_decimal(dec("-2.345")).unwrap().cents(), -234);
        assert_eq!(Money::from_decimal(dec("0.125")).unwrap().cents(), 12);
        assert_eq!(Money::from_decimal(dec("0.135")).unwrap().cents(), 14);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(99_999_999).to_decimal(), dec("999999.99"));
        assert_eq!(Money::from_cents(-550).to_decimal(), dec("-5.50"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_margin_arithmetic() {
        let price = Money::from_cents(1000);
        let cost = Money::from_cents(1250);

        let margin = price - cost;
        assert_eq!(margin.cents(), -250);
        assert!(!margin.is_positive());
        assert_eq!((price * 3_i64).cents(), 3000);

        let mut total = Money::default();
        total += price;
        assert_eq!(total, price);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, -50].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 300);
        assert!(std::iter::empty::<Money>().sum::<Money>().is_zero());
    }
}
