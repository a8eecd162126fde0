//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹1694.92 is stored as 169492 paise (i64)                             │
//! │    Every rounding step is explicit round-half-up integer math           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kirana_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(100_000); // ₹1000.00
//!
//! // Arithmetic operations
//! let line_total = price * 2;                    // ₹2000.00
//! let total = line_total + Money::from_paise(50); // ₹2000.50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for refunds and adjustments
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let price = Money::from_paise(169_492); // ₹1694.92
    /// assert_eq!(price.paise(), 169_492);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// For negative amounts only the rupee part should be negative:
    /// `from_rupees_paise(-5, 50)` is -₹5.50, not -₹4.50.
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
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

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(100_000); // ₹1000.00
    /// assert_eq!(unit_price.multiply_quantity(2).paise(), 200_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Subtracts `other`, flooring the result at zero.
    ///
    /// Used for flat discounts: a discount larger than the bill yields a
    /// free bill, never a negative one.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let subtotal = Money::from_paise(500);
    /// let discount = Money::from_paise(800);
    /// assert_eq!(subtotal.sub_floor_zero(discount), Money::zero());
    /// ```
    #[inline]
    pub const fn sub_floor_zero(&self, other: Money) -> Money {
        let diff = self.0 - other.0;
        if diff < 0 {
            Money(0)
        } else {
            Money(diff)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable format for logs and debugging.
/// API responses carry raw paise; display formatting belongs to clients.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
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

/// Multiplication by integer quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(169_492);
        assert_eq!(money.paise(), 169_492);
        assert_eq!(money.rupees(), 1694);
        assert_eq!(money.paise_part(), 92);
    }

    #[test]
    fn test_from_rupees_paise() {
        assert_eq!(Money::from_rupees_paise(10, 99).paise(), 1099);
        assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(1099)), "₹10.99");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        let tripled: Money = a * 3i64;
        assert_eq!(tripled.paise(), 3000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_paise(100_000);
        assert_eq!(unit_price.multiply_quantity(2).paise(), 200_000);
    }

    #[test]
    fn test_sub_floor_zero() {
        let subtotal = Money::from_paise(1_000_000);
        let discount = Money::from_paise(100_000);
        assert_eq!(subtotal.sub_floor_zero(discount).paise(), 900_000);

        // Discount exceeding the bill floors at zero
        let oversized = Money::from_paise(2_000_000);
        assert_eq!(subtotal.sub_floor_zero(oversized), Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_paise(100).is_positive());
        assert!(Money::from_paise(-100).is_negative());
    }
}
