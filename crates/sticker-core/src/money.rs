//! # Money Module
//!
//! Provides the `Money` type for handling prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  0.1 + 0.2 = 0.30000000000000004                                        │
//! │                                                                         │
//! │  A 500-sticker order at $0.93 each must total exactly $465.00,          │
//! │  and the savings shown next to it must add up to the cent.             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (cents)                              │
//! │    Tier prices, totals and savings are all i64 cents.                  │
//! │    Floats only appear in shape scaling, and the result is rounded      │
//! │    back to cents exactly once (see `Money::scale`).                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sticker_core::money::Money;
//!
//! let unit = Money::from_cents(90);
//! let total = unit.checked_multiply_quantity(10).unwrap();
//! assert_eq!(total.cents(), 900);
//!
//! // Overflow is reported, never wrapped
//! assert!(Money::from_cents(i64::MAX / 2).checked_multiply_quantity(3).is_none());
//! ```
//!
//! There are no arithmetic operators on `Money`. Every operation that can
//! leave the i64 range returns `Option`, and callers turn `None` into
//! [`CoreError::PriceOutOfRange`](crate::CoreError::PriceOutOfRange).

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// Serializes as a bare integer, so `{"pricePerUnit": 90}` means 90 cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, type = "number")]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies money by a quantity, or `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, or `None` if any partial sum overflows.
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::money::Money;
    ///
    /// let lines = [Money::from_cents(900), Money::from_cents(1350)];
    /// assert_eq!(Money::checked_sum(lines).unwrap().cents(), 2250);
    /// assert!(Money::checked_sum([Money::from_cents(i64::MAX), Money::from_cents(1)]).is_none());
    /// ```
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// Returns `self - other`, or zero if that would be negative.
    ///
    /// Used for savings: a discount is never reported as negative.
    #[inline]
    pub fn saturating_difference(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }

    /// Multiplies by a floating factor and rounds half away from zero.
    ///
    /// This is the single place where shape scaling re-enters integer money.
    /// Returns `None` when the result is not finite or does not fit in i64,
    /// instead of saturating.
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(100).scale(1.6).unwrap().cents(), 160);
    /// assert_eq!(Money::from_cents(100).scale(0.424).unwrap().cents(), 42);
    /// assert!(Money::from_cents(100).scale(1e18).is_none());
    /// ```
    pub fn scale(&self, factor: f64) -> Option<Money> {
        let scaled = (self.0 as f64 * factor).round();
        // i64::MAX as f64 is exactly 2^63, the first value that does not fit.
        if scaled.is_finite() && scaled.abs() < i64::MAX as f64 {
            Some(Money(scaled as i64))
        } else {
            None
        }
    }

    /// Computes `self × numerator / denominator` with half-up rounding.
    ///
    /// Integer-only; used to rebase tier tables proportionally. With
    /// `numerator <= denominator` the result never exceeds `self`.
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::money::Money;
    ///
    /// // 90/100 of $1.61 = $1.449 → $1.45
    /// let rebased = Money::from_cents(161).proportion(90, 100);
    /// assert_eq!(rebased.cents(), 145);
    /// ```
    pub fn proportion(&self, numerator: i64, denominator: i64) -> Money {
        debug_assert!(denominator > 0);
        let scaled = self.0 as i128 * numerator as i128;
        let rounded = (scaled * 2 + denominator as i128) / (denominator as i128 * 2);
        Money(rounded as i64)
    }

    /// Returns the larger of two amounts.
    #[inline]
    pub fn at_least(self, floor: Money) -> Money {
        if self.0 < floor.0 {
            floor
        } else {
            self
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Currency display formatting belongs to
/// the storefront.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(50)), "$0.50");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(a.checked_multiply_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(a.checked_multiply_quantity(250).unwrap().cents(), 250_000);
    }

    #[test]
    fn test_overflow_is_none() {
        let huge = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(huge.checked_multiply_quantity(2), None);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(
            Money::from_cents(100_000_000_000).checked_multiply_quantity(crate::MAX_ORDER_QUANTITY),
            Some(Money::from_cents(1_000_000_000_000_000_000))
        );
    }

    #[test]
    fn test_saturating_difference_never_overflows() {
        let low = Money::from_cents(i64::MIN);
        let high = Money::from_cents(i64::MAX);
        assert_eq!(high.saturating_difference(low).cents(), i64::MAX);
        assert_eq!(low.saturating_difference(high), Money::zero());
    }

    #[test]
    fn test_saturating_difference() {
        let list = Money::from_cents(1000);
        let paid = Money::from_cents(900);
        assert_eq!(list.saturating_difference(paid).cents(), 100);
        assert_eq!(paid.saturating_difference(list), Money::zero());
    }

    #[test]
    fn test_scale_rounds_half_away_from_zero() {
        assert_eq!(Money::from_cents(100).scale(1.0).unwrap().cents(), 100);
        assert_eq!(Money::from_cents(10).scale(0.25).unwrap().cents(), 3);
        assert_eq!(Money::from_cents(100).scale(2.2854).unwrap().cents(), 229);
    }

    #[test]
    fn test_scale_rejects_results_outside_i64() {
        assert_eq!(Money::from_cents(100).scale(f64::INFINITY), None);
        assert_eq!(Money::from_cents(100).scale(f64::NAN), None);
        assert_eq!(Money::from_cents(i64::MAX).scale(1.0), None);
        assert_eq!(Money::from_cents(100).scale(1e17), None);
        assert!(Money::from_cents(100).scale(1e15).is_some());
    }

    #[test]
    fn test_proportion() {
        assert_eq!(Money::from_cents(100).proportion(50, 100).cents(), 50);
        assert_eq!(Money::from_cents(229).proportion(90, 100).cents(), 206);
        assert_eq!(Money::from_cents(3).proportion(1, 2).cents(), 2);
    }

    #[test]
    fn test_checked_sum() {
        let lines = [Money::from_cents(900), Money::from_cents(1350)];
        assert_eq!(Money::checked_sum(lines), Some(Money::from_cents(2250)));
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));

        let near_max = Money::from_cents(i64::MAX - 10);
        assert_eq!(Money::checked_sum([near_max, Money::from_cents(11)]), None);
    }
}
