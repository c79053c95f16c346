//! # Quote Commands
//!
//! Load a checkout request into the session and return the totals with
//! display strings.
//!
//! ## Request / Response
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutRequest                        QuoteResponse                   │
//! │  ───────────────                        ─────────────                   │
//! │  items: [LineItemForm]   ──┐        ┌─► totals: OrderTotals (base)      │
//! │  address?                  │        ├─► display: DisplayTotals (text)   │
//! │  promo? / promoCode?       ├─ load ─┤                                   │
//! │  customerHasPriorPaidOrder │ quote  └─► promoRejected?: Ineligibility   │
//! │  promoUsageCount?          │                                            │
//! │  currency?               ──┘                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::validation::validate_product_ref;
use storefront_core::{
    CurrencyCode, CurrencyConverter, Ineligibility, LineItem, LineItemForm, Money, OrderTotals,
    PromoCode,
};
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::state::CheckoutState;

/// A whole checkout as sent by the front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<LineItemForm>,

    #[serde(default)]
    pub address: Option<String>,

    /// Promo record looked up for the entered code.
    #[serde(default)]
    pub promo: Option<PromoCode>,

    /// Code as typed; with no `promo` record it is reported as missing.
    #[serde(default)]
    pub promo_code: Option<String>,

    #[serde(default)]
    pub customer_has_prior_paid_order: bool,

    /// Fresher usage count than the one on the promo record.
    #[serde(default)]
    pub promo_usage_count: Option<u32>,

    /// Display currency code (defaults to the configured one).
    #[serde(default)]
    pub currency: Option<String>,

    /// Pricing instant; the CLI uses the current time when absent.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

/// Every total component rendered in the display currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTotals {
    pub currency: CurrencyCode,
    pub subtotal: String,
    pub service_fee: String,
    pub delivery_fee: String,
    pub tax: String,
    pub discount: String,
    pub total: String,
    /// The requested currency was unknown and base currency is shown.
    pub fallback: bool,
}

impl DisplayTotals {
    pub fn build(converter: &CurrencyConverter, totals: &OrderTotals, code: &CurrencyCode) -> Self {
        let render = |amount: Money| converter.format_in(amount, code);
        let total = render(totals.total);

        DisplayTotals {
            currency: total.amount.currency.clone(),
            subtotal: render(totals.subtotal).text,
            service_fee: render(totals.service_fee).text,
            delivery_fee: render(totals.delivery_fee).text,
            tax: render(totals.tax).text,
            discount: render(totals.discount_amount).text,
            total: total.text,
            fallback: total.fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    /// Base-currency totals; the values handed to order creation.
    pub totals: OrderTotals,
    pub display: DisplayTotals,
    pub promo_rejected: Option<Ineligibility>,
    /// Human-readable form of `promo_rejected`.
    pub promo_message: Option<String>,
}

/// Replaces the session contents with `request` and re-quotes at `now`.
///
/// Line-item numbers are clamped; only blank or oversized product
/// references are rejected.
pub fn load_request(
    state: &CheckoutState,
    request: &CheckoutRequest,
    now: DateTime<Utc>,
) -> AppResult<()> {
    for form in &request.items {
        validate_product_ref(&form.product_id)?;
    }

    let currency = state.pricing().display_currency(request.currency.as_deref());

    state.update(now, |session| -> AppResult<()> {
        session.clear();
        for form in &request.items {
            session.add_item(LineItem::from_form(form))?;
        }
        session.set_destination(request.address.clone());

        match (&request.promo, request.promo_code.as_deref()) {
            (Some(promo), _) => session.apply_promo(promo.clone()),
            (None, Some(code)) if !code.trim().is_empty() => session.enter_unknown_promo(code),
            _ => {}
        }
        session.set_customer_has_prior_paid_order(request.customer_has_prior_paid_order);
        session.set_promo_usage_count(request.promo_usage_count);
        session.set_display_currency(Some(currency));
        Ok(())
    })
}

/// Quotes the current session at `now`.
pub fn get_quote(state: &CheckoutState, now: DateTime<Utc>) -> QuoteResponse {
    let pricing = state.pricing();

    let (quote, rejected, currency) = state.with_session(|session| {
        let quote = session.price(pricing.calculator(), now);
        let rejected = session.promo_rejection(&quote);
        let currency = session
            .display_currency()
            .cloned()
            .unwrap_or_else(|| pricing.display_currency(None));
        (quote, rejected, currency)
    });

    debug!(
        subtotal = %quote.totals.subtotal,
        total = %quote.totals.total,
        tier = ?quote.totals.delivery_tier,
        provisional = quote.totals.provisional,
        "Quote computed"
    );

    if let Some(reason) = &rejected {
        info!(reason = %reason, "Promo not applied");
    }

    let shown = DisplayTotals::build(pricing.converter(), &quote.totals, &currency);
    if shown.fallback {
        let shown_currency = &shown.currency;
        warn!(
            requested = %currency,
            shown = %shown_currency,
            "Unknown display currency, showing base currency"
        );
    }

    QuoteResponse {
        totals: quote.totals,
        display: shown,
        promo_message: rejected.as_ref().map(ToString::to_string),
        promo_rejected: rejected,
    }
}

/// Loads `request` and quotes it.
pub fn quote_request(
    state: &CheckoutState,
    request: &CheckoutRequest,
    now: DateTime<Utc>,
) -> AppResult<QuoteResponse> {
    load_request(state, request, now)?;
    Ok(get_quote(state, now))
}
