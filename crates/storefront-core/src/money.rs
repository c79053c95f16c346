//! # Money Module
//!
//! Provides the `Money` type for base-currency ledger values.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Order totals are persisted verbatim into the order-creation call and   │
//! │  later shown on the admin order-detail view. Floats drift:              │
//! │    0.1 + 0.2 = 0.30000000000000004                                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (kobo for NGN)                       │
//! │    ₦10,000 = 1_000_000 minor units                                      │
//! │    2% service fee = (1_000_000 × 200 + 5000) / 10000 = 20_000           │
//! │                                                                         │
//! │  Floats only appear at the edges: form input (clamped on entry) and     │
//! │  display-currency conversion (never stored).                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_major(2500);            // ₦2,500
//! let line = price.multiply_quantity(2);          // ₦5,000
//! let total = line + Money::from_minor(50);       // ₦5,000.50
//! assert_eq!(total.minor(), 500_050);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

/// Minor units per major unit of the base currency.
pub const MINOR_PER_MAJOR: i64 = 100;

/// Largest amount (major units) accepted from form input.
///
/// With `MAX_ITEM_QUANTITY` and `MAX_CART_ITEMS` lines at this price the
/// order total still fits in `i64` minor units.
pub const MAX_FORM_AMOUNT_MAJOR: f64 = 10_000_000_000.0;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest unit of the base currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative intermediate values (refund previews)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Base currency only**: display-currency values are `CurrencyAmount`
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.unit_price ──► LineItem.line_total ──► subtotal               │
/// │                                                                         │
/// │  subtotal ──► service fee, tax, discount ──► OrderTotals.total         │
/// │                                                                         │
/// │  OrderTotals ──► order-creation call (persisted as-is)                 │
/// │             └──► CurrencyConverter::to_display (presentation only)     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let fee = Money::from_minor(20_000); // ₦200.00
    /// assert_eq!(fee.major(), 200);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Converts a form value in major units into `Money`.
    ///
    /// Form state is user-editable, so NaN, infinities and negative values
    /// clamp to zero instead of failing. Fractions are rounded to the nearest
    /// minor unit.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_lossy(1250.5).minor(), 125_050);
    /// assert_eq!(Money::from_major_lossy(f64::NAN), Money::zero());
    /// assert_eq!(Money::from_major_lossy(-40.0), Money::zero());
    /// assert_eq!(Money::from_major_lossy(1e17), Money::from_major(10_000_000_000));
    /// ```
    pub fn from_major_lossy(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Money::zero();
        }
        let major = value.min(MAX_FORM_AMOUNT_MAJOR);
        Money((major * MINOR_PER_MAJOR as f64).round() as i64)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns the value in major units as a float.
    ///
    /// For display conversion only; never feed the result back into a ledger.
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
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

    /// Clamps negative values to zero.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Calculates a percentage of this amount, rounding half away from zero.
    ///
    /// ## Implementation
    /// Integer math on the magnitude: `(|amount| × bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5). i128 prevents
    /// overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::Rate;
    ///
    /// let subtotal = Money::from_major(10_000);
    /// let vat = subtotal.percentage(Rate::from_bps(750)); // 7.5%
    /// assert_eq!(vat, Money::from_major(750));
    ///
    /// // 0.5 minor units rounds up
    /// assert_eq!(Money::from_minor(25).percentage(Rate::from_bps(200)).minor(), 1);
    /// ```
    pub fn percentage(&self, rate: Rate) -> Money {
        let magnitude = (self.0.unsigned_abs() as i128 * rate.bps() as i128 + 5000) / 10000;
        let signed = if self.0 < 0 { -magnitude } else { magnitude };
        Money(signed as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_major(4_500);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_major(13_500));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

// Arithmetic saturates at the i64 bounds.

/// Shows the amount in major units with two decimals (no symbol).
///
/// ## Note
/// For logs and debugging. Use `CurrencyConverter::format` for UI text.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
