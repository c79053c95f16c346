//! # Promo Admin Commands
//!
//! Creating promo codes from admin input and deactivating expired ones.

use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_core::promo::NewPromoCode;
use storefront_core::PromoCode;
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;

/// Result of an expiry sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Codes deactivated by this sweep.
    pub deactivated: Vec<String>,
    pub promos: Vec<PromoCode>,
}

/// Validates `form` and builds an active promo with a fresh ID.
pub fn create_promo(form: NewPromoCode, now: DateTime<Utc>) -> AppResult<PromoCode> {
    let id = Uuid::new_v4().to_string();
    let promo = form.into_promo(&id, now)?;

    info!(
        code = %promo.code,
        rate_bps = promo.discount_rate.bps(),
        expires_at = ?promo.expires_at,
        "Promo code created"
    );

    Ok(promo)
}

/// Deactivates every active promo whose expiry has passed at `now`.
pub fn sweep_expired(mut promos: Vec<PromoCode>, now: DateTime<Utc>) -> SweepReport {
    let deactivated: Vec<String> = promos
        .iter_mut()
        .filter_map(|promo| promo.expire_if_due(now).then(|| promo.code.clone()))
        .collect();

    if !deactivated.is_empty() {
        info!(count = deactivated.len(), codes = ?deactivated, "Expired promo codes deactivated");
    }

    SweepReport { deactivated, promos }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::{Duration, TimeZone};
    use storefront_core::Money;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap()
    }

    fn form(code: &str, fraction: f64) -> NewPromoCode {
        NewPromoCode {
            code: code.to_string(),
            discount_fraction: fraction,
            max_discount: Some(800.0),
            min_order_amount: None,
            usage_limit: Some(100),
            first_time_only: true,
            expires_at: Some(now() + Duration::days(14)),
        }
    }

    #[test]
    fn test_create_promo() {
        let promo = create_promo(form("welcome-10", 0.1), now()).unwrap();
        assert!(Uuid::parse_str(&promo.id).is_ok());
        assert_eq!(promo.code, "WELCOME-10");
        assert_eq!(promo.discount_rate.bps(), 1000);
        assert_eq!(promo.max_discount, Some(Money::from_major(800)));
        assert_eq!(promo.usage_count, 0);
        assert!(promo.is_active);
    }

    #[test]
    fn test_create_promo_rejects_bad_rate() {
        let err = create_promo(form("WELCOME", 1.5), now()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_sweep_deactivates_only_expired() {
        let live = create_promo(form("LIVE", 0.1), now()).unwrap();
        let mut stale = create_promo(form("STALE", 0.2), now()).unwrap();
        stale.expires_at = Some(now() - Duration::hours(1));

        let report = sweep_expired(vec![live, stale], now());
        assert_eq!(report.deactivated, vec!["STALE".to_string()]);
        assert!(report.promos[0].is_active);
        assert!(!report.promos[1].is_active);

        let again = sweep_expired(report.promos, now());
        assert!(again.deactivated.is_empty());
    }
}
