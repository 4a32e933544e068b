//! # Money Module
//!
//! Provides the `Money` type for handling rupiah values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Storing decimal columns and round-tripping them through floats        │
//! │  lets tax amounts drift by fractions of a sen on every read.           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Sen                                              │
//! │    Every amount is an i64 count of sen (1 rupiah = 100 sen).           │
//! │    Arithmetic is exact; rounding happens in exactly one place.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nota_core::money::Money;
//!
//! // Create from sen (preferred)
//! let price = Money::from_cents(1_500_000); // Rp 15.000,00
//!
//! // Or from whole rupiah
//! let same = Money::from_rupiah(15_000);
//! assert_eq!(price, same);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in sen, the smallest unit of the rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: line subtotals may go negative when a flat discount
///   exceeds the gross amount; the engine does not clamp
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
///
/// ## Where Money flows
/// ```text
/// TransactionItem.unit_price ──► line subtotal ──► Transaction.subtotal
///                                                        │
///                           PPN / PPh22 / PPh23 ◄────────┤
///                                                        ▼
///                                          Transaction.total_amount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from sen (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole rupiah.
    ///
    /// ## Example
    /// ```rust
    /// use nota_core::money::Money;
    ///
    /// let threshold = Money::from_rupiah(5_000_000);
    /// assert_eq!(threshold.cents(), 500_000_000);
    /// ```
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah * 100)
    }

    /// Returns the value in sen.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupiah portion (truncated toward zero).
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the sen portion (always 0-99).
    #[inline]
    pub const fn sen_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates a tax amount at the given rate, rounded to whole rupiah.
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  WHOLE-RUPIAH, HALF AWAY FROM ZERO                                  │
    /// │                                                                     │
    /// │  The rupiah has no subunit in common usage, so each tax amount is  │
    /// │  rounded to a whole rupiah independently, before the grand total   │
    /// │  is summed. The total itself is never re-rounded.                  │
    /// │                                                                     │
    /// │  Rp 149.500 × 1,5% = Rp 2.242,50 → Rp 2.243                        │
    /// │  Negative bases round symmetrically: -2.242,50 → -2.243            │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Implementation
    /// Integer math in i128 to prevent overflow:
    /// `sen * bps` has denominator 10_000 (bps) × 100 (sen per rupiah).
    ///
    /// ## Example
    /// ```rust
    /// use nota_core::money::Money;
    /// use nota_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_rupiah(149_500);
    /// let pph22 = subtotal.calculate_tax(TaxRate::PPH22); // 1.5%
    /// assert_eq!(pph22.rupiah(), 2_243);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        const DENOM: i128 = 10_000 * 100;
        let numer = self.0 as i128 * rate.bps() as i128;
        let rupiah = if numer >= 0 {
            (numer + DENOM / 2) / DENOM
        } else {
            -((-numer + DENOM / 2) / DENOM)
        };
        Money::from_rupiah(rupiah as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use nota_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(15_000);
    /// let gross = unit_price.multiply_quantity(10);
    /// assert_eq!(gross.rupiah(), 150_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging. Document templates use
/// [`format_rupiah`](crate::documents::format::format_rupiah) for the
/// id-ID presentation with thousand separators.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp{},{:02}", sign, self.rupiah().abs(), self.sen_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line subtotals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_and_rupiah() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.rupiah(), 10);
        assert_eq!(money.sen_part(), 99);

        assert_eq!(Money::from_rupiah(5_000_000).cents(), 500_000_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "Rp10,99");
        assert_eq!(format!("{}", Money::from_rupiah(500)), "Rp500,00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-Rp5,50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_sum() {
        let lines = vec![
            Money::from_rupiah(100),
            Money::from_rupiah(-30),
            Money::from_rupiah(5),
        ];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total.rupiah(), 75);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_ppn_exact() {
        // Rp 149.500 × 11% = Rp 16.445 exactly
        let subtotal = Money::from_rupiah(149_500);
        let ppn = subtotal.calculate_tax(TaxRate::PPN);
        assert_eq!(ppn, Money::from_rupiah(16_445));
    }

    #[test]
    fn test_pph22_rounds_half_away() {
        // Rp 149.500 × 1,5% = Rp 2.242,50 → Rp 2.243
        let subtotal = Money::from_rupiah(149_500);
        let pph22 = subtotal.calculate_tax(TaxRate::PPH22);
        assert_eq!(pph22, Money::from_rupiah(2_243));
    }

    #[test]
    fn test_pph23_from_service_value() {
        // Rp 1.000.000 × 2% = Rp 20.000
        let service = Money::from_rupiah(1_000_000);
        let pph23 = service.calculate_tax(TaxRate::PPH23);
        assert_eq!(pph23, Money::from_rupiah(20_000));
    }

    #[test]
    fn test_negative_base_rounds_symmetrically() {
        let negative = Money::from_rupiah(-149_500);
        let pph22 = negative.calculate_tax(TaxRate::PPH22);
        assert_eq!(pph22, Money::from_rupiah(-2_243));
    }

    #[test]
    fn test_zero_rate_and_zero_base() {
        assert!(Money::zero().calculate_tax(TaxRate::PPN).is_zero());
        assert!(Money::from_rupiah(999).calculate_tax(TaxRate::zero()).is_zero());
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_rupiah(15_000);
        assert_eq!(unit_price.multiply_quantity(10).rupiah(), 150_000);
    }
}
