//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `SurchargeRate` applied when a seating settles.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    250 × 1.17 = 292.49999999999997  (IEEE 754)                          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    25000 × 1700 / 10000 = 4250 → 25000 + 4250 = 29250 (292.50)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sushi_core::money::Money;
//!
//! let price = Money::from_cents(12_000); // 120.00
//! let line = price * 2i64;               // 240.00
//! assert_eq!(line.to_string(), "240.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::DEFAULT_SURCHARGE_BPS;

// =============================================================================
// Surcharge Rate
// =============================================================================

/// Surcharge rate in basis points (1 bps = 0.01%).
///
/// The restaurant adds a flat 17% (VAT plus service charge) on top of the
/// served subtotal. 1700 bps is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurchargeRate(u32);

impl SurchargeRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        SurchargeRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for SurchargeRate {
    fn default() -> Self {
        SurchargeRate(DEFAULT_SURCHARGE_BPS)
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (satang / cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use sushi_core::money::Money;
    ///
    /// let price = Money::from_cents(4_550); // 45.50
    /// assert_eq!(price.cents(), 4_550);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units and minor units.
    ///
    /// For negative amounts only the major part carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
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

    /// Multiplies a unit price by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates the surcharge on this amount, rounding half away from zero.
    ///
    /// ## Implementation
    /// Integer math on i128: `(amount × bps ± 5000) / 10000`. The ±5000 is
    /// half of the divisor, so a result ending in exactly .5 of a minor unit
    /// rounds away from zero (standard half-adjust, as on a till receipt).
    ///
    /// ```rust
    /// use sushi_core::money::{Money, SurchargeRate};
    ///
    /// let subtotal = Money::from_cents(25_000);
    /// let surcharge = subtotal.surcharge(SurchargeRate::from_bps(1700));
    /// assert_eq!(surcharge.cents(), 4_250);
    ///
    /// // 0.03 × 17% = 0.0051 → rounds to 0.01
    /// assert_eq!(Money::from_cents(3).surcharge(SurchargeRate::from_bps(1700)).cents(), 1);
    /// ```
    pub fn surcharge(&self, rate: SurchargeRate) -> Money {
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        Money::from_cents(rounded as i64)
    }

    /// Returns this amount with the surcharge added: `round2(amount × (1 + rate))`.
    #[inline]
    pub fn with_surcharge(&self, rate: SurchargeRate) -> Money {
        *self + self.surcharge(rate)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money with two decimals and no currency symbol; the UI localizes.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

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

// =============================================================================
// Unit Tests
// =============================================================================
