//! # Gold Module
//!
//! Provides the `Gold` type, the shop's only currency.
//!
//! ## Why a Newtype?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GOLD vs ML vs QUANTITY                                                 │
//! │                                                                         │
//! │  Every count in the shop is an integer:                                 │
//! │    gold = 100, red_ml = 2500, quantity = 3                              │
//! │                                                                         │
//! │  Mixing them up compiles fine with bare i64:                            │
//! │    gold -= red_ml   ❌ nonsense, but type-checks                        │
//! │                                                                         │
//! │  OUR SOLUTION: Gold(i64)                                                │
//! │    gold -= barrel.price()        ✓                                      │
//! │    gold -= state.red_ml          ✗ compile error                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use potion_core::gold::Gold;
//!
//! let purse = Gold::new(250);
//! let price = Gold::new(100);
//!
//! assert!(purse.can_afford(price));
//! assert_eq!((purse - price * 2).amount(), 50);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Gold Type
// =============================================================================

/// An amount of gold.
///
/// ## Design Decisions
/// - **i64 (signed)**: a debit can be computed before it is checked
/// - **Single field tuple struct**: serializes as a bare integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Gold(i64);

impl Gold {
    /// Creates a Gold value.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Gold(amount)
    }

    /// Returns the raw amount.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Zero gold.
    #[inline]
    pub const fn zero() -> Self {
        Gold(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns true when `price` can be paid out of this amount.
    ///
    /// ## Example
    /// ```rust
    /// use potion_core::gold::Gold;
    ///
    /// assert!(Gold::new(100).can_afford(Gold::new(100)));
    /// assert!(!Gold::new(50).can_afford(Gold::new(100)));
    /// ```
    #[inline]
    pub const fn can_afford(&self, price: Gold) -> bool {
        price.0 <= self.0
    }

    /// Multiplies a unit price by a quantity.
    #[inline]
    pub const fn times(&self, qty: i64) -> Self {
        Gold(self.0 * qty)
    }

    /// Subtracts `price`, returning `None` if the result would be negative.
    pub fn checked_spend(&self, price: Gold) -> Option<Gold> {
        if self.can_afford(price) {
            Some(Gold(self.0 - price.0))
        } else {
            None
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Gold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gold", self.0)
    }
}

impl Default for Gold {
    fn default() -> Self {
        Gold::zero()
    }
}

impl From<i64> for Gold {
    fn from(amount: i64) -> Self {
        Gold(amount)
    }
}

impl Add for Gold {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Gold(self.0 + other.0)
    }
}

impl AddAssign for Gold {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Gold {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Gold(self.0 - other.0)
    }
}

impl SubAssign for Gold {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Gold {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Gold(self.0 * qty)
    }
}

impl Sum for Gold {
    fn sum<I: Iterator<Item = Gold>>(iter: I) -> Self {
        iter.fold(Gold::zero(), |acc, g| acc + g)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Gold::new(100).to_string(), "100 gold");
        assert_eq!(Gold::zero().to_string(), "0 gold");
    }

    #[test]
    fn test_arithmetic() {
        let a = Gold::new(1000);
        let b = Gold::new(150);

        assert_eq!((a + b).amount(), 1150);
        assert_eq!((a - b).amount(), 850);
        assert_eq!((b * 3).amount(), 450);
        assert_eq!(b.times(5).amount(), 750);
    }

    #[test]
    fn test_checked_spend() {
        let purse = Gold::new(100);
        assert_eq!(purse.checked_spend(Gold::new(100)), Some(Gold::zero()));
        assert_eq!(purse.checked_spend(Gold::new(101)), None);
    }

    #[test]
    fn test_sum() {
        let total: Gold = [Gold::new(100), Gold::new(150), Gold::new(500)]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), 750);
    }

    #[test]
    fn test_serializes_as_integer() {
        let json = serde_json::to_string(&Gold::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
