//! # Checkout State
//!
//! The cart, delivery address and applied promo of one checkout, plus the
//! quote derived from them.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>`: several callers may read or
//! change it, and only one may change it at a time.
//!
//! ## Recompute Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Session Operations                          │
//! │                                                                         │
//! │  Action                  CheckoutState::update()     Session Change     │
//! │  ──────                  ───────────────────────     ──────────────     │
//! │                                                                         │
//! │  Add product ──────────► add_item() ───────────────► items.push(line)   │
//! │  Enter address ────────► set_destination() ────────► destination = a    │
//! │  Enter promo ──────────► apply_promo() ────────────► promo = p          │
//! │  Pick currency ────────► set_display_currency() ───► display = c        │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                          recompute(now) ───────────► quote replaced     │
//! │                                                                         │
//! │  NOTE: The latest quote always supersedes the previous one; nothing     │
//! │        reads a stale total after a mutation returns.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use storefront_core::validation::validate_cart_size;
use storefront_core::{
    CoreError, CoreResult, CurrencyCode, FeeCalculator, Ineligibility, LineItem, PromoCode,
    PromoContext, Quote, MAX_CART_ITEMS,
};

use super::PricingState;

/// One customer's in-progress checkout.
///
/// ## Invariants
/// - At most [`MAX_CART_ITEMS`] lines
/// - `quote` reflects the last mutation made through [`CheckoutState::update`]
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    items: Vec<LineItem>,
    destination: Option<String>,
    promo: Option<PromoCode>,
    /// Code the customer typed that matched no promo record.
    unmatched_code: Option<String>,
    customer_has_prior_paid_order: bool,
    /// Overrides the promo record's own usage count when set.
    promo_usage_count: Option<u32>,
    display_currency: Option<CurrencyCode>,
    quote: Option<Quote>,
    started_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new(now: DateTime<Utc>) -> Self {
        CheckoutSession {
            items: Vec::new(),
            destination: None,
            promo: None,
            unmatched_code: None,
            customer_has_prior_paid_order: false,
            promo_usage_count: None,
            display_currency: None,
            quote: None,
            started_at: now,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn promo(&self) -> Option<&PromoCode> {
        self.promo.as_ref()
    }

    pub fn display_currency(&self) -> Option<&CurrencyCode> {
        self.display_currency.as_ref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The quote from the last recompute, if any.
    pub fn latest_quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a line.
    ///
    /// ## Returns
    /// - `Err(CoreError::CartTooLarge)` when the cart already has
    ///   [`MAX_CART_ITEMS`] lines
    pub fn add_item(&mut self, item: LineItem) -> CoreResult<()> {
        validate_cart_size(self.items.len() + 1)
            .map_err(|_| CoreError::CartTooLarge { max: MAX_CART_ITEMS })?;
        self.items.push(item);
        Ok(())
    }

    /// Removes every line for `product_id`. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id() != product_id);
        self.items.len() != initial_len
    }

    /// Empties the cart and forgets the promo; address and currency stay.
    pub fn clear(&mut self) {
        self.items.clear();
        self.remove_promo();
        self.quote = None;
    }

    /// Sets the delivery address. Blank input clears it.
    pub fn set_destination(&mut self, destination: Option<String>) {
        self.destination = destination
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
    }

    pub fn apply_promo(&mut self, promo: PromoCode) {
        self.unmatched_code = None;
        self.promo = Some(promo);
    }

    /// Records a typed code that has no promo record behind it.
    pub fn enter_unknown_promo(&mut self, code: &str) {
        self.promo = None;
        self.unmatched_code = Some(code.trim().to_uppercase());
    }

    pub fn remove_promo(&mut self) {
        self.promo = None;
        self.unmatched_code = None;
        self.promo_usage_count = None;
    }

    /// Why the entered promo did not apply to `quote`, if one was entered.
    pub fn promo_rejection(&self, quote: &Quote) -> Option<Ineligibility> {
        quote.promo.rejected.clone().or_else(|| {
            self.unmatched_code
                .as_ref()
                .map(|_| Ineligibility::Missing)
        })
    }

    pub fn set_customer_has_prior_paid_order(&mut self, has_prior: bool) {
        self.customer_has_prior_paid_order = has_prior;
    }

    /// Usage count supplied with the request, if fresher than the record.
    pub fn promo_usage_count(&self) -> Option<u32> {
        self.promo_usage_count
    }

    pub fn set_promo_usage_count(&mut self, usage_count: Option<u32>) {
        self.promo_usage_count = usage_count;
    }

    pub fn set_display_currency(&mut self, code: Option<CurrencyCode>) {
        self.display_currency = code;
    }

    /// The promo context for a quote at `now`.
    pub fn promo_context(&self, now: DateTime<Utc>) -> PromoContext<'_> {
        match &self.promo {
            Some(promo) => {
                let ctx = PromoContext::new(promo, now)
                    .with_prior_paid_order(self.customer_has_prior_paid_order);
                match self.promo_usage_count {
                    Some(count) => ctx.with_usage_count(count),
                    None => ctx,
                }
            }
            None => PromoContext::none(),
        }
    }

    /// Prices the session at `now` without storing the result.
    pub fn price(&self, calculator: &FeeCalculator, now: DateTime<Utc>) -> Quote {
        calculator.quote_with_outcome(
            calculator.subtotal(&self.items),
            self.destination(),
            &self.promo_context(now),
        )
    }

    /// Prices the session and stores the result as the latest quote.
    pub fn recompute(&mut self, calculator: &FeeCalculator, now: DateTime<Utc>) -> &Quote {
        let quote = self.price(calculator, now);
        self.quote.insert(quote)
    }

    /// Counts one redemption of the applied promo, if there is one.
    pub fn record_promo_use(&mut self) -> CoreResult<()> {
        if let Some(promo) = self.promo.as_mut() {
            promo.record_use()?;
        }
        Ok(())
    }
}

/// Shared checkout session plus the pricing it is quoted with.
#[derive(Debug, Clone)]
pub struct CheckoutState {
    session: Arc<Mutex<CheckoutSession>>,
    pricing: Arc<PricingState>,
}

impl CheckoutState {
    pub fn new(pricing: PricingState, now: DateTime<Utc>) -> Self {
        CheckoutState {
            session: Arc::new(Mutex::new(CheckoutSession::new(now))),
            pricing: Arc::new(pricing),
        }
    }

    pub fn pricing(&self) -> &PricingState {
        &self.pricing
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CheckoutSession) -> R,
    {
        let session = self.lock();
        f(&session)
    }

    /// Executes a function with write access to the session, then re-quotes.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.update(now, |s| s.set_destination(Some("Ikeja, Lagos".into())));
    /// let total = state.with_session(|s| s.latest_quote().map(|q| q.totals.total));
    /// ```
    pub fn update<F, R>(&self, now: DateTime<Utc>, f: F) -> R
    where
        F: FnOnce(&mut CheckoutSession) -> R,
    {
        let mut session = self.lock();
        let result = f(&mut session);
        session.recompute(self.pricing.calculator(), now);
        result
    }

    /// Executes a function with write access and no re-quote.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CheckoutSession) -> R,
    {
        let mut session = self.lock();
        f(&mut session)
    }

    // Every mutation leaves the session whole, so a poisoned lock still
    // holds usable state.
    fn lock(&self) -> MutexGuard<'_, CheckoutSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use storefront_core::{Money, Rate};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap()
    }

    fn line(id: &str, price_major: i64, qty: u32) -> LineItem {
        LineItem::new(id, Money::from_major(price_major), qty, None, None)
    }

    fn welcome_promo() -> PromoCode {
        PromoCode {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            code: "WELCOME".to_string(),
            discount_rate: Rate::from_bps(1000),
            max_discount: Some(Money::from_major(800)),
            min_order_amount: None,
            usage_limit: Some(2),
            usage_count: 1,
            is_active: true,
            first_time_only: true,
            expires_at: Some(now() + Duration::days(30)),
            created_at: now() - Duration::days(1),
        }
    }

    #[test]
    fn test_update_recomputes_quote() {
        let state = CheckoutState::new(PricingState::default(), now());

        state.update(now(), |s| s.add_item(line("shirt", 5_000, 2))).unwrap();
        let provisional = state.with_session(|s| s.latest_quote().cloned()).unwrap();
        assert!(provisional.totals.provisional);
        assert_eq!(provisional.totals.total, Money::from_major(10_950));

        state.update(now(), |s| s.set_destination(Some("Surulere, Lagos".into())));
        let quote = state.with_session(|s| s.latest_quote().cloned()).unwrap();
        assert!(!quote.totals.provisional);
        assert_eq!(quote.totals.total, Money::from_major(11_450));
    }

    #[test]
    fn test_promo_context_uses_session_flags() {
        let mut session = CheckoutSession::new(now());
        session.add_item(line("shirt", 10_000, 1)).unwrap();
        session.set_destination(Some("Lagos".into()));
        session.apply_promo(welcome_promo());

        let quote = session.recompute(&FeeCalculator::default(), now()).clone();
        assert_eq!(quote.totals.discount_amount, Money::from_major(800));
        assert_eq!(quote.totals.total, Money::from_major(10_650));

        session.set_customer_has_prior_paid_order(true);
        let quote = session.recompute(&FeeCalculator::default(), now()).clone();
        assert!(quote.totals.discount_amount.is_zero());
        assert!(quote.promo.rejected.is_some());
    }

    #[test]
    fn test_usage_override() {
        let mut session = CheckoutSession::new(now());
        session.add_item(line("shirt", 10_000, 1)).unwrap();
        session.apply_promo(welcome_promo());
        session.set_promo_usage_count(Some(2));

        let quote = session.price(&FeeCalculator::default(), now());
        assert!(quote.totals.discount_amount.is_zero());
    }

    #[test]
    fn test_cart_size_limit() {
        let mut session = CheckoutSession::new(now());
        for i in 0..MAX_CART_ITEMS {
            session.add_item(line(&format!("p-{i}"), 10, 1)).unwrap();
        }
        let err = session.add_item(line("one-too-many", 10, 1)).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { max: 100 }));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut session = CheckoutSession::new(now());
        session.add_item(line("a", 100, 1)).unwrap();
        session.add_item(line("b", 100, 1)).unwrap();
        session.set_destination(Some("Abuja".into()));
        session.apply_promo(welcome_promo());

        assert!(session.remove_item("a"));
        assert!(!session.remove_item("a"));
        assert_eq!(session.items().len(), 1);

        session.clear();
        assert!(session.is_empty());
        assert!(session.promo().is_none());
        assert_eq!(session.destination(), Some("Abuja"));
    }

    #[test]
    fn test_unknown_code_is_missing() {
        let mut session = CheckoutSession::new(now());
        session.add_item(line("a", 1_000, 1)).unwrap();
        session.enter_unknown_promo("nope10");

        let quote = session.price(&FeeCalculator::default(), now());
        assert!(quote.totals.discount_amount.is_zero());
        assert_eq!(session.promo_rejection(&quote), Some(Ineligibility::Missing));

        session.remove_promo();
        assert_eq!(session.promo_rejection(&quote), None);
    }

    #[test]
    fn test_blank_destination_clears() {
        let mut session = CheckoutSession::new(now());
        session.set_destination(Some("   ".into()));
        assert_eq!(session.destination(), None);
    }

    #[test]
    fn test_record_promo_use_respects_limit() {
        let mut session = CheckoutSession::new(now());
        session.apply_promo(welcome_promo());

        session.record_promo_use().unwrap();
        assert_eq!(session.promo().unwrap().usage_count, 2);
        assert!(matches!(
            session.record_promo_use(),
            Err(CoreError::PromoExhausted { limit: 2, .. })
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let state = CheckoutState::new(PricingState::default(), now());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let state = state.clone();
                std::thread::spawn(move || {
                    state
                        .update(now(), |s| s.add_item(line(&format!("p-{i}"), 1_000, 1)))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let subtotal = state.with_session(|s| s.latest_quote().map(|q| q.totals.subtotal));
        assert_eq!(subtotal, Some(Money::from_major(4_000)));
    }
}
