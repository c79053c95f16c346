//! # Promo Codes
//!
//! Eligibility check, discount computation and lifecycle helpers for promo
//! codes.
//!
//! ## Eligibility (fails closed)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer enters "WELCOME10" at checkout                                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  check(promo, subtotal, prior_paid_order, usage_count, now)             │
//! │        │                                                                │
//! │        ├── no promo record?          → Missing                          │
//! │        ├── is_active == false?       → Inactive                         │
//! │        ├── expires_at <= now?        → Expired                          │
//! │        ├── usage_count >= limit?     → UsageLimitReached                │
//! │        ├── first-time only + prior?  → FirstTimeOnly                    │
//! │        ├── subtotal < minimum?       → BelowMinimum                     │
//! │        │                                                                │
//! │        └── Ok ──► discount = min(subtotal × rate, cap, subtotal)        │
//! │                                                                         │
//! │  Any failure: discount = 0. No partial application.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ineligibility is a normal outcome, not an error; the reason is returned
//! so the checkout screen can tell the customer why.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PromoCode, Rate};
use crate::validation::{
    validate_discount_fraction, validate_form_amount, validate_promo_code, validate_uuid,
    ValidationResult,
};

// =============================================================================
// Ineligibility
// =============================================================================

/// Why a promo code was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[ts(export)]
pub enum Ineligibility {
    /// No promo record was found for the entered code.
    Missing,
    /// Deactivated by an admin.
    Inactive,
    Expired,
    UsageLimitReached,
    /// Restricted to customers with no prior paid order.
    FirstTimeOnly,
    BelowMinimum { minimum: Money },
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::Missing => f.write_str("promo code not found"),
            Ineligibility::Inactive => f.write_str("promo code is not active"),
            Ineligibility::Expired => f.write_str("promo code has expired"),
            Ineligibility::UsageLimitReached => {
                f.write_str("promo code has reached its usage limit")
            }
            Ineligibility::FirstTimeOnly => {
                f.write_str("promo code is only valid on a first order")
            }
            Ineligibility::BelowMinimum { minimum } => {
                write!(f, "order must be at least {} to use this promo code", minimum)
            }
        }
    }
}

// =============================================================================
// Eligibility Check
// =============================================================================

/// Checks whether a promo may be applied, returning the first failed rule.
///
/// `usage_count` is passed separately from `promo.usage_count` because the
/// caller usually has a fresher count from the backend than the cached
/// promo record.
pub fn check(
    promo: Option<&PromoCode>,
    subtotal: Money,
    customer_has_prior_paid_order: bool,
    usage_count: u32,
    now: DateTime<Utc>,
) -> Result<(), Ineligibility> {
    let promo = promo.ok_or(Ineligibility::Missing)?;

    if !promo.is_active {
        return Err(Ineligibility::Inactive);
    }

    if promo.is_expired(now) {
        return Err(Ineligibility::Expired);
    }

    if let Some(limit) = promo.usage_limit {
        if usage_count >= limit {
            return Err(Ineligibility::UsageLimitReached);
        }
    }

    if promo.first_time_only && customer_has_prior_paid_order {
        return Err(Ineligibility::FirstTimeOnly);
    }

    if let Some(minimum) = promo.min_order_amount {
        if subtotal < minimum {
            return Err(Ineligibility::BelowMinimum { minimum });
        }
    }

    Ok(())
}

/// Boolean form of [`check`].
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use storefront_core::money::Money;
/// use storefront_core::promo::is_eligible;
/// use storefront_core::types::{PromoCode, Rate};
///
/// let now = Utc::now();
/// let promo = PromoCode {
///     id: "9b2f4c8e-52d4-4a7e-9d55-0f0c1a7e3b11".into(),
///     code: "WELCOME10".into(),
///     discount_rate: Rate::from_bps(1000),
///     max_discount: Some(Money::from_major(800)),
///     min_order_amount: None,
///     usage_limit: Some(100),
///     usage_count: 3,
///     is_active: true,
///     first_time_only: true,
///     expires_at: Some(now + Duration::days(7)),
///     created_at: now,
/// };
///
/// assert!(is_eligible(Some(&promo), Money::from_major(10_000), false, 3, now));
/// assert!(!is_eligible(Some(&promo), Money::from_major(10_000), true, 3, now));
/// assert!(!is_eligible(None, Money::from_major(10_000), false, 0, now));
/// ```
pub fn is_eligible(
    promo: Option<&PromoCode>,
    subtotal: Money,
    customer_has_prior_paid_order: bool,
    usage_count: u32,
    now: DateTime<Utc>,
) -> bool {
    check(promo, subtotal, customer_has_prior_paid_order, usage_count, now).is_ok()
}

/// Discount an eligible promo gives on `subtotal`.
///
/// `subtotal × rate`, capped at `max_discount` when set and never more than
/// the subtotal itself. Does NOT check eligibility.
pub fn discount_for(promo: &PromoCode, subtotal: Money) -> Money {
    let subtotal = subtotal.clamp_non_negative();
    let mut discount = subtotal.percentage(promo.discount_rate);

    if let Some(cap) = promo.max_discount {
        discount = discount.min(cap.clamp_non_negative());
    }

    discount.min(subtotal)
}

// =============================================================================
// Promo Context
// =============================================================================

/// The promo state a quote is computed against.
///
/// Passed explicitly into the fee calculator; there is no ambient
/// "applied promo".
#[derive(Debug, Clone, Copy)]
pub struct PromoContext<'a> {
    pub promo: Option<&'a PromoCode>,
    pub customer_has_prior_paid_order: bool,
    pub usage_count: u32,
    pub now: DateTime<Utc>,
}

/// Result of evaluating a [`PromoContext`] against a subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoOutcome {
    pub discount: Money,
    /// Code that was applied (`None` when nothing was).
    pub applied: Option<String>,
    /// Why the promo was rejected (`None` when applied or none entered).
    pub rejected: Option<Ineligibility>,
}

impl<'a> PromoContext<'a> {
    /// No promo entered.
    pub fn none() -> Self {
        PromoContext {
            promo: None,
            customer_has_prior_paid_order: false,
            usage_count: 0,
            now: DateTime::<Utc>::MIN_UTC,
        }
    }

    /// A promo evaluated at `now`, using the record's own usage count.
    pub fn new(promo: &'a PromoCode, now: DateTime<Utc>) -> Self {
        PromoContext {
            promo: Some(promo),
            customer_has_prior_paid_order: false,
            usage_count: promo.usage_count,
            now,
        }
    }

    pub fn with_prior_paid_order(mut self, has_prior: bool) -> Self {
        self.customer_has_prior_paid_order = has_prior;
        self
    }

    pub fn with_usage_count(mut self, usage_count: u32) -> Self {
        self.usage_count = usage_count;
        self
    }

    /// Evaluates eligibility and the resulting discount.
    pub fn evaluate(&self, subtotal: Money) -> PromoOutcome {
        let Some(promo) = self.promo else {
            return PromoOutcome {
                discount: Money::zero(),
                applied: None,
                rejected: None,
            };
        };

        match check(
            Some(promo),
            subtotal,
            self.customer_has_prior_paid_order,
            self.usage_count,
            self.now,
        ) {
            Ok(()) => PromoOutcome {
                discount: discount_for(promo, subtotal),
                applied: Some(promo.code.clone()),
                rejected: None,
            },
            Err(reason) => PromoOutcome {
                discount: Money::zero(),
                applied: None,
                rejected: Some(reason),
            },
        }
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

impl PromoCode {
    /// Checks whether the promo has passed its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }

    /// Records one redemption (once per order).
    ///
    /// ## Errors
    /// `PromoExhausted` when the usage limit has already been reached.
    pub fn record_use(&mut self) -> CoreResult<()> {
        self.record_use_from(self.usage_count)
    }

    /// Records one redemption on top of `observed`, a usage count the
    /// caller read elsewhere. The higher of `observed` and the record's own
    /// count is the starting point. Nothing changes on error.
    ///
    /// ## Example
    /// ```rust
    /// # use chrono::Utc;
    /// # use storefront_core::{PromoCode, Rate};
    /// let mut promo = PromoCode {
    ///     id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
    ///     code: "WELCOME10".to_string(),
    ///     discount_rate: Rate::from_bps(1000),
    ///     max_discount: None,
    ///     min_order_amount: None,
    ///     usage_limit: Some(10),
    ///     usage_count: 1,
    ///     is_active: true,
    ///     first_time_only: false,
    ///     expires_at: None,
    ///     created_at: Utc::now(),
    /// };
    /// promo.record_use_from(7).unwrap();
    /// assert_eq!(promo.usage_count, 8);
    /// ```
    pub fn record_use_from(&mut self, observed: u32) -> CoreResult<()> {
        let current = self.usage_count.max(observed);
        if let Some(limit) = self.usage_limit {
            if current >= limit {
                return Err(CoreError::PromoExhausted {
                    code: self.code.clone(),
                    limit,
                });
            }
        }
        self.usage_count = current.saturating_add(1);
        Ok(())
    }

    /// Manual admin toggle.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// Deactivates the promo if it has expired. Returns true if it changed.
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_active && self.is_expired(now) {
            self.is_active = false;
            return true;
        }
        false
    }
}

/// Admin form input for creating a promo code.
///
/// Unlike checkout form state, admin input is validated and rejected rather
/// than clamped.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewPromoCode {
    pub code: String,
    /// Fraction of the subtotal (0 < f <= 1).
    pub discount_fraction: f64,
    /// Cap in base-currency major units.
    pub max_discount: Option<f64>,
    /// Minimum subtotal in base-currency major units.
    pub min_order_amount: Option<f64>,
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub first_time_only: bool,
    #[ts(as = "Option<String>")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewPromoCode {
    /// Validates the form and builds an active promo with zero usage.
    pub fn into_promo(self, id: &str, now: DateTime<Utc>) -> ValidationResult<PromoCode> {
        validate_uuid(id)?;
        let code = validate_promo_code(&self.code)?;
        validate_discount_fraction(self.discount_fraction)?;

        let max_discount = self
            .max_discount
            .map(|v| validate_form_amount("max_discount", v))
            .transpose()?;
        let min_order_amount = self
            .min_order_amount
            .map(|v| validate_form_amount("min_order_amount", v))
            .transpose()?;

        if let Some(expires_at) = self.expires_at {
            if expires_at <= now {
                return Err(ValidationError::InvalidFormat {
                    field: "expires_at".to_string(),
                    reason: "must be in the future".to_string(),
                });
            }
        }

        Ok(PromoCode {
            id: id.to_string(),
            code,
            discount_rate: Rate::from_fraction(self.discount_fraction),
            max_discount,
            min_order_amount,
            usage_limit: self.usage_limit,
            usage_count: 0,
            is_active: true,
            first_time_only: self.first_time_only,
            expires_at: self.expires_at,
            created_at: now,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const PROMO_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn ten_percent_capped() -> PromoCode {
        PromoCode {
            id: PROMO_ID.to_string(),
            code: "SAVE10".to_string(),
            discount_rate: Rate::from_bps(1000),
            max_discount: Some(Money::from_major(800)),
            min_order_amount: Some(Money::from_major(2_000)),
            usage_limit: Some(50),
            usage_count: 10,
            is_active: true,
            first_time_only: false,
            expires_at: Some(now() + Duration::days(30)),
            created_at: now() - Duration::days(1),
        }
    }

    #[test]
    fn test_eligible_promo() {
        let promo = ten_percent_capped();
        assert_eq!(check(Some(&promo), Money::from_major(10_000), false, 10, now()), Ok(()));
    }

    #[test]
    fn test_missing_promo_is_ineligible() {
        assert_eq!(
            check(None, Money::from_major(10_000), false, 0, now()),
            Err(Ineligibility::Missing)
        );
    }

    #[test]
    fn test_inactive_promo() {
        let mut promo = ten_percent_capped();
        promo.deactivate();
        assert_eq!(
            check(Some(&promo), Money::from_major(10_000), false, 0, now()),
            Err(Ineligibility::Inactive)
        );
    }

    #[test]
    fn test_expired_promo_ineligible_regardless_of_other_fields() {
        let mut promo = ten_percent_capped();
        promo.expires_at = Some(now() - Duration::seconds(1));
        promo.usage_limit = None;
        promo.min_order_amount = None;
        promo.max_discount = None;
        assert_eq!(
            check(Some(&promo), Money::from_major(1_000_000), false, 0, now()),
            Err(Ineligibility::Expired)
        );
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let mut promo = ten_percent_capped();
        promo.expires_at = Some(now());
        assert!(!is_eligible(Some(&promo), Money::from_major(10_000), false, 0, now()));
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let mut promo = ten_percent_capped();
        promo.expires_at = None;
        assert!(!promo.is_expired(now() + Duration::days(10_000)));
    }

    #[test]
    fn test_usage_at_cap_is_ineligible() {
        let promo = ten_percent_capped();
        assert_eq!(
            check(Some(&promo), Money::from_major(10_000), false, 50, now()),
            Err(Ineligibility::UsageLimitReached)
        );
        assert!(is_eligible(Some(&promo), Money::from_major(10_000), false, 49, now()));
    }

    #[test]
    fn test_first_time_only_with_prior_paid_order() {
        let mut promo = ten_percent_capped();
        promo.first_time_only = true;
        assert_eq!(
            check(Some(&promo), Money::from_major(10_000), true, 0, now()),
            Err(Ineligibility::FirstTimeOnly)
        );
        assert!(is_eligible(Some(&promo), Money::from_major(10_000), false, 0, now()));
    }

    #[test]
    fn test_below_minimum() {
        let promo = ten_percent_capped();
        assert_eq!(
            check(Some(&promo), Money::from_major(1_999), false, 0, now()),
            Err(Ineligibility::BelowMinimum {
                minimum: Money::from_major(2_000)
            })
        );
        assert!(is_eligible(Some(&promo), Money::from_major(2_000), false, 0, now()));
    }

    #[test]
    fn test_discount_capped() {
        let promo = ten_percent_capped();
        assert_eq!(discount_for(&promo, Money::from_major(10_000)), Money::from_major(800));
        assert_eq!(discount_for(&promo, Money::from_major(5_000)), Money::from_major(500));
    }

    #[test]
    fn test_discount_never_exceeds_subtotal() {
        let mut promo = ten_percent_capped();
        promo.discount_rate = Rate::FULL;
        promo.max_discount = None;
        assert_eq!(discount_for(&promo, Money::from_major(300)), Money::from_major(300));
    }

    #[test]
    fn test_context_outcomes() {
        let promo = ten_percent_capped();

        let applied = PromoContext::new(&promo, now()).evaluate(Money::from_major(10_000));
        assert_eq!(applied.discount, Money::from_major(800));
        assert_eq!(applied.applied.as_deref(), Some("SAVE10"));
        assert_eq!(applied.rejected, None);

        let rejected = PromoContext::new(&promo, now())
            .with_usage_count(50)
            .evaluate(Money::from_major(10_000));
        assert!(rejected.discount.is_zero());
        assert_eq!(rejected.rejected, Some(Ineligibility::UsageLimitReached));

        let nothing = PromoContext::none().evaluate(Money::from_major(10_000));
        assert!(nothing.discount.is_zero());
        assert_eq!(nothing.applied, None);
        assert_eq!(nothing.rejected, None);
    }

    #[test]
    fn test_record_use_respects_limit() {
        let mut promo = ten_percent_capped();
        promo.usage_limit = Some(11);
        promo.record_use().unwrap();
        assert_eq!(promo.usage_count, 11);

        let err = promo.record_use().unwrap_err();
        assert!(matches!(err, CoreError::PromoExhausted { limit: 11, .. }));
        assert_eq!(promo.usage_count, 11);
    }

    #[test]
    fn test_record_use_from_fresher_count() {
        let mut promo = ten_percent_capped();
        promo.usage_limit = Some(10);
        promo.usage_count = 1;

        promo.record_use_from(7).unwrap();
        assert_eq!(promo.usage_count, 8);

        // A stale count never rolls the record back.
        promo.record_use_from(2).unwrap();
        assert_eq!(promo.usage_count, 9);

        let err = promo.record_use_from(10).unwrap_err();
        assert!(matches!(err, CoreError::PromoExhausted { limit: 10, .. }));
        assert_eq!(promo.usage_count, 9);
    }

    #[test]
    fn test_expire_if_due() {
        let mut promo = ten_percent_capped();
        assert!(!promo.expire_if_due(now()));
        assert!(promo.expire_if_due(now() + Duration::days(31)));
        assert!(!promo.is_active);
        assert!(!promo.expire_if_due(now() + Duration::days(32)));
    }

    #[test]
    fn test_new_promo_code() {
        let form = NewPromoCode {
            code: " welcome10 ".to_string(),
            discount_fraction: 0.1,
            max_discount: Some(800.0),
            min_order_amount: None,
            usage_limit: Some(100),
            first_time_only: true,
            expires_at: Some(now() + Duration::days(14)),
        };
        let promo = form.into_promo(PROMO_ID, now()).unwrap();
        assert_eq!(promo.code, "WELCOME10");
        assert_eq!(promo.discount_rate.bps(), 1000);
        assert_eq!(promo.max_discount, Some(Money::from_major(800)));
        assert_eq!(promo.usage_count, 0);
        assert!(promo.is_active);
    }

    #[test]
    fn test_new_promo_code_rejects_bad_input() {
        let base = NewPromoCode {
            code: "OK-CODE".to_string(),
            discount_fraction: 0.2,
            max_discount: None,
            min_order_amount: None,
            usage_limit: None,
            first_time_only: false,
            expires_at: None,
        };

        let mut bad_rate = base.clone();
        bad_rate.discount_fraction = 1.5;
        assert!(bad_rate.into_promo(PROMO_ID, now()).is_err());

        let mut bad_cap = base.clone();
        bad_cap.max_discount = Some(-5.0);
        assert!(bad_cap.into_promo(PROMO_ID, now()).is_err());

        let mut past = base.clone();
        past.expires_at = Some(now() - Duration::days(1));
        assert!(past.into_promo(PROMO_ID, now()).is_err());

        assert!(base.clone().into_promo("not-a-uuid", now()).is_err());
        assert!(base.into_promo(PROMO_ID, now()).is_ok());
    }

    #[test]
    fn test_ineligibility_messages() {
        assert_eq!(Ineligibility::Expired.to_string(), "promo code has expired");
        assert_eq!(
            Ineligibility::BelowMinimum {
                minimum: Money::from_major(2_000)
            }
            .to_string(),
            "order must be at least 2000.00 to use this promo code"
        );
    }
}
