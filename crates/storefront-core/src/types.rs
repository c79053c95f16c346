//! # Domain Types
//!
//! Core domain types shared by the checkout screens and admin order views.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │   OrderTotals   │   │   PromoCode     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  subtotal       │   │  code           │       │
//! │  │  unit_price     │   │  service_fee    │   │  discount_rate  │       │
//! │  │  quantity       │   │  delivery_fee   │   │  max_discount   │       │
//! │  │  size, color    │   │  tax, discount  │   │  usage_limit    │       │
//! │  └─────────────────┘   │  total          │   │  expires_at     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │ CurrencyAmount  │   │  LedgerAmount   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  value (f64)    │   │  base_amount    │       │
//! │  │  750 = 7.5%     │   │  currency       │   │  original       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ledger vs Display
//! Every `Money` is in the base currency. `CurrencyAmount` is a display
//! value and is never persisted as the source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::delivery::DeliveryTier;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// Used for the service fee, the VAT rate and promo discount fractions.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 750 bps = 7.5% VAT, 200 bps = 2% service fee, 10000 bps = 100%
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// The whole amount (100%).
    pub const FULL: Rate = Rate(10_000);

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a fraction (`0.1` = 10%).
    ///
    /// The value comes from promo records and admin forms, so it is clamped
    /// to `[0, 1]` and NaN becomes zero.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() || fraction <= 0.0 {
            return Rate::zero();
        }
        Rate((fraction.min(1.0) * 10_000.0).round() as u32)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Rate::from_fraction(pct / 100.0)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// Raw cart line as it comes from form state.
///
/// Numbers are whatever the UI holds (possibly NaN or negative); convert with
/// [`LineItem::from_form`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemForm {
    pub product_id: String,
    /// Unit price in base-currency major units.
    pub unit_price: f64,
    pub quantity: f64,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A product line in an order.
///
/// Immutable once added: the price is frozen at the moment the product was
/// put in the cart and there are no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    product_id: String,
    unit_price: Money,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
}

impl LineItem {
    /// Creates a line item. Negative prices clamp to zero and the quantity is
    /// capped at [`MAX_ITEM_QUANTITY`].
    pub fn new(
        product_id: impl Into<String>,
        unit_price: Money,
        quantity: u32,
        size: Option<String>,
        color: Option<String>,
    ) -> Self {
        LineItem {
            product_id: product_id.into(),
            unit_price: unit_price.clamp_non_negative(),
            quantity: quantity.min(MAX_ITEM_QUANTITY),
            size,
            color,
        }
    }

    /// Builds a line item from raw form values, clamping malformed numbers.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::types::{LineItem, LineItemForm};
    ///
    /// let form = LineItemForm {
    ///     product_id: "p-1".into(),
    ///     unit_price: f64::NAN,
    ///     quantity: 2.7,
    ///     size: Some("M".into()),
    ///     color: None,
    /// };
    /// let item = LineItem::from_form(&form);
    /// assert!(item.unit_price().is_zero());
    /// assert_eq!(item.quantity(), 2);
    /// ```
    pub fn from_form(form: &LineItemForm) -> Self {
        LineItem::new(
            form.product_id.trim(),
            Money::from_major_lossy(form.unit_price),
            clamp_quantity(form.quantity),
            non_blank(form.size.as_deref()),
            non_blank(form.color.as_deref()),
        )
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

fn clamp_quantity(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    (raw.floor() as u32).min(MAX_ITEM_QUANTITY)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Order Totals
// =============================================================================

/// Fee breakdown for an order, all in the base currency.
///
/// Derived: recomputed whenever the cart or address changes and frozen when
/// the order is created.
///
/// ## Invariant
/// `total == subtotal - discount_amount + service_fee + delivery_fee + tax`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub service_fee: Money,
    pub delivery_fee: Money,
    pub tax: Money,
    pub discount_amount: Money,
    pub total: Money,
    /// Tier the delivery fee was looked up from (`None` before an address).
    pub delivery_tier: Option<DeliveryTier>,
    /// Code of the promo that produced `discount_amount`, if any.
    pub applied_promo: Option<String>,
    /// True when no delivery address was supplied yet.
    pub provisional: bool,
}

impl OrderTotals {
    /// Checks the totals invariant.
    pub fn is_balanced(&self) -> bool {
        self.total
            == self.subtotal - self.discount_amount
                + self.service_fee
                + self.delivery_fee
                + self.tax
    }

    /// Returns the totals if they may be committed to an order.
    ///
    /// Provisional (pre-address) totals must be re-derived first.
    pub fn ensure_final(&self) -> CoreResult<&Self> {
        if self.provisional {
            return Err(CoreError::ProvisionalTotals);
        }
        Ok(self)
    }
}

// =============================================================================
// Promo Code
// =============================================================================

/// A discount voucher with eligibility constraints.
///
/// Lifecycle helpers (`record_use`, `deactivate`, `expire_if_due`) and the
/// eligibility check live in [`crate::promo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PromoCode {
    pub id: String,
    /// Code as typed by customers (stored upper-case).
    pub code: String,
    /// Discount fraction of the subtotal.
    pub discount_rate: Rate,
    /// Maximum discount amount (`None` = uncapped).
    pub max_discount: Option<Money>,
    /// Minimum subtotal required (`None` = no minimum).
    pub min_order_amount: Option<Money>,
    /// Maximum number of redemptions (`None` = unlimited).
    pub usage_limit: Option<u32>,
    /// Redemptions so far.
    pub usage_count: u32,
    pub is_active: bool,
    /// Only customers without a prior paid order may redeem.
    pub first_time_only: bool,
    /// When the promo stops being redeemable (`None` = never).
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Currency Types
// =============================================================================

/// ISO 4217 currency code, normalised to upper case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(from = "String", into = "String")]
#[ts(export)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Self {
        CurrencyCode(code.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        CurrencyCode::new(&code)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        CurrencyCode::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A display value in some currency, in that currency's major units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CurrencyAmount {
    pub value: f64,
    pub currency: CurrencyCode,
}

impl CurrencyAmount {
    pub fn new(value: f64, currency: impl Into<CurrencyCode>) -> Self {
        CurrencyAmount {
            value,
            currency: currency.into(),
        }
    }
}

/// A persisted monetary value (wallet balance, order total, transaction).
///
/// The ledger value is always base currency. When the user transacted in a
/// different currency the original amount is kept alongside for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LedgerAmount {
    pub base_amount: Money,
    pub base_currency: CurrencyCode,
    pub original: Option<CurrencyAmount>,
}

// =============================================================================
// Unit Tests
// =============================================================================
