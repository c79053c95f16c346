//! # Order Commands
//!
//! Freezes the checkout session into an order record.
//!
//! ## Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Cart must not be empty                  ──► AppError::EmptyCart     │
//! │  2. Re-derive totals at commit time                                     │
//! │  3. Totals must be final (address known)    ──► ProvisionalTotals       │
//! │  4. Applied promo counts one redemption     ──► PromoExhausted          │
//! │  5. Record totals in base currency, keep the display amount for audit   │
//! │  6. Session resets for the next checkout                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_core::{LedgerAmount, LineItem, OrderTotals, PromoCode};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::CheckoutState;

/// An order as handed to the order-creation call.
///
/// Totals are frozen here; nothing recomputes them afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub items: Vec<LineItem>,
    pub destination: String,
    pub totals: OrderTotals,
    /// Total in base currency, with the amount the customer saw.
    pub total_ledger: LedgerAmount,
    /// Promo record with the redemption counted, for persisting back.
    pub promo: Option<PromoCode>,
    pub created_at: DateTime<Utc>,
}

/// Commits the session at `now`.
///
/// Nothing in the session changes when a step fails.
pub fn place_order(state: &CheckoutState, now: DateTime<Utc>) -> AppResult<OrderRecord> {
    let pricing = state.pricing();

    state.with_session_mut(|session| -> AppResult<OrderRecord> {
        if session.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let quote = session.price(pricing.calculator(), now);
        quote.totals.ensure_final()?;

        let promo = match (&quote.totals.applied_promo, session.promo()) {
            (Some(_), Some(applied)) => {
                let mut redeemed = applied.clone();
                match session.promo_usage_count() {
                    Some(observed) => redeemed.record_use_from(observed)?,
                    None => redeemed.record_use()?,
                }
                Some(redeemed)
            }
            _ => None,
        };

        let currency = session
            .display_currency()
            .cloned()
            .unwrap_or_else(|| pricing.display_currency(None));
        let total_ledger = pricing.converter().ledger_from_base(quote.totals.total, &currency);

        let record = OrderRecord {
            id: Uuid::new_v4().to_string(),
            items: session.items().to_vec(),
            destination: session.destination().unwrap_or_default().to_string(),
            totals: quote.totals,
            total_ledger,
            promo,
            created_at: now,
        };

        session.clear();

        info!(
            order_id = %record.id,
            total = %record.totals.total,
            promo = ?record.totals.applied_promo,
            "Order committed"
        );

        Ok(record)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PricingState;
    use chrono::{Duration, TimeZone};
    use storefront_core::{CoreError, Money, Rate};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 18, 45, 0).unwrap()
    }

    fn line(price_major: i64) -> LineItem {
        LineItem::new("bag-09", Money::from_major(price_major), 1, None, Some("Tan".into()))
    }

    fn promo(limit: Option<u32>, used: u32) -> PromoCode {
        PromoCode {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            code: "BAG10".to_string(),
            discount_rate: Rate::from_bps(1000),
            max_discount: None,
            min_order_amount: None,
            usage_limit: limit,
            usage_count: used,
            is_active: true,
            first_time_only: false,
            expires_at: None,
            created_at: now() - Duration::days(3),
        }
    }

    fn state_with(price_major: i64, address: Option<&str>) -> CheckoutState {
        let state = CheckoutState::new(PricingState::default(), now());
        state.update(now(), |s| {
            s.add_item(line(price_major)).unwrap();
            s.set_destination(address.map(String::from));
        });
        state
    }

    #[test]
    fn test_place_order_freezes_totals() {
        let state = state_with(10_000, Some("Ikeja, Lagos"));
        state.update(now(), |s| s.set_display_currency(Some("GBP".into())));

        let order = place_order(&state, now()).unwrap();
        assert!(uuid::Uuid::parse_str(&order.id).is_ok());
        assert_eq!(order.totals.total, Money::from_major(11_450));
        assert_eq!(order.destination, "Ikeja, Lagos");
        assert_eq!(order.total_ledger.base_amount, Money::from_major(11_450));
        let original = order.total_ledger.original.unwrap();
        assert_eq!(original.currency.as_str(), "GBP");
        assert!((original.value - 5.954).abs() < 1e-9);

        assert!(state.with_session(|s| s.is_empty()));
    }

    #[test]
    fn test_provisional_totals_block_commit() {
        let state = state_with(10_000, None);
        let err = place_order(&state, now()).unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::ProvisionalTotals)));
        assert!(!state.with_session(|s| s.is_empty()));
    }

    #[test]
    fn test_empty_cart_rejected() {
        let state = CheckoutState::new(PricingState::default(), now());
        state.update(now(), |s| s.set_destination(Some("Lagos".into())));
        assert!(matches!(place_order(&state, now()), Err(AppError::EmptyCart)));
    }

    #[test]
    fn test_applied_promo_counts_redemption() {
        let state = state_with(10_000, Some("Lagos"));
        state.update(now(), |s| s.apply_promo(promo(Some(5), 4)));

        let order = place_order(&state, now()).unwrap();
        assert_eq!(order.totals.discount_amount, Money::from_major(1_000));
        assert_eq!(order.promo.unwrap().usage_count, 5);
        assert!(order.total_ledger.original.is_none());
    }

    #[test]
    fn test_rejected_promo_is_not_redeemed() {
        let state = state_with(10_000, Some("Lagos"));
        state.update(now(), |s| {
            s.apply_promo(promo(Some(5), 0));
            s.set_promo_usage_count(Some(5));
        });

        let order = place_order(&state, now()).unwrap();
        assert!(order.totals.discount_amount.is_zero());
        assert!(order.promo.is_none());
    }

    #[test]
    fn test_redemption_builds_on_request_usage_count() {
        let state = state_with(10_000, Some("Lagos"));
        state.update(now(), |s| {
            s.apply_promo(promo(Some(10), 1));
            s.set_promo_usage_count(Some(7));
        });

        let order = place_order(&state, now()).unwrap();
        assert_eq!(order.totals.discount_amount, Money::from_major(1_000));
        assert_eq!(order.promo.unwrap().usage_count, 8);
    }

    #[test]
    fn test_last_redemption_reaches_limit() {
        // Quote and redemption read the same count.
        let state = state_with(10_000, Some("Lagos"));
        state.update(now(), |s| {
            s.apply_promo(promo(Some(10), 1));
            s.set_promo_usage_count(Some(9));
        });

        let order = place_order(&state, now()).unwrap();
        assert_eq!(order.promo.unwrap().usage_count, 10);
    }

    #[test]
    fn test_exhausted_record_blocks_commit() {
        // Backend count says one use left; the record itself is already full.
        let state = state_with(10_000, Some("Lagos"));
        state.update(now(), |s| {
            s.apply_promo(promo(Some(3), 3));
            s.set_promo_usage_count(Some(2));
        });

        let err = place_order(&state, now()).unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::PromoExhausted { limit: 3, .. })));
        assert!(state.with_session(|s| s.promo().is_some()));
    }
}
