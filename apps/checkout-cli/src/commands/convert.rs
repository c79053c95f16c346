//! # Currency Commands
//!
//! Conversion between the ledger currency and display currencies, ledger
//! records for amounts entered in a display currency, and the rate table.

use serde::Serialize;
use storefront_core::{CurrencyAmount, CurrencyCode, LedgerAmount, Money};
use tracing::{debug, warn};

use crate::state::PricingState;

/// Which way an amount is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Base major units to the display currency.
    ToDisplay,
    /// Display-currency units to base.
    ToBase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub from: CurrencyAmount,
    pub to: CurrencyAmount,
    pub rate: f64,
    pub formatted: String,
    pub fallback: bool,
}

/// One row of the rate table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    pub code: CurrencyCode,
    /// Display units per one base unit.
    pub rate: f64,
    pub symbol: String,
    pub is_base: bool,
    /// 1,000 base units rendered in this currency.
    pub sample: String,
}

/// Converts `amount` in the direction given.
///
/// Malformed amounts (NaN, negative) clamp to zero.
pub fn convert(
    pricing: &PricingState,
    amount: f64,
    code: &str,
    direction: Direction,
) -> ConversionResponse {
    let converter = pricing.converter();
    let base = converter.base_currency().clone();
    let code = CurrencyCode::new(code);

    let response = match direction {
        Direction::ToDisplay => {
            let base_amount = Money::from_major_lossy(amount);
            let shown = converter.to_display(base_amount, &code);
            ConversionResponse {
                from: CurrencyAmount::new(base_amount.to_major_f64(), base),
                formatted: converter.format(&shown.amount),
                to: shown.amount,
                rate: shown.rate,
                fallback: shown.fallback,
            }
        }
        Direction::ToBase => {
            let converted = converter.to_base(amount, &code);
            ConversionResponse {
                from: CurrencyAmount::new(amount, code.clone()),
                to: CurrencyAmount::new(converted.amount.to_major_f64(), base.clone()),
                rate: converted.rate,
                formatted: converter.format_in(converted.amount, &base).text,
                fallback: converted.fallback,
            }
        }
    };

    if response.fallback {
        warn!(currency = %code, "Unknown currency, converted at rate 1");
    }
    debug!(?direction, rate = response.rate, formatted = %response.formatted, "Converted amount");

    response
}

/// Ledger record for an amount the customer entered in `code`.
pub fn ledger(pricing: &PricingState, amount: f64, code: &str) -> LedgerAmount {
    let code = CurrencyCode::new(code);
    let converter = pricing.converter();
    if !converter.supports(&code) {
        warn!(currency = %code, "Unknown currency, recording amount as base");
    }
    converter.record_ledger(amount, &code)
}

/// The base currency followed by each configured display currency.
pub fn list_rates(pricing: &PricingState) -> Vec<RateEntry> {
    let config = pricing.currency_config();
    let converter = pricing.converter();
    let sample = Money::from_major(1_000);

    let base = RateEntry {
        code: config.base_currency.clone(),
        rate: 1.0,
        symbol: config.base_format.symbol.clone(),
        is_base: true,
        sample: converter.format_in(sample, &config.base_currency).text,
    };

    std::iter::once(base)
        .chain(config.currencies.iter().map(|(code, spec)| RateEntry {
            code: code.clone(),
            rate: spec.rate,
            symbol: spec.format.symbol.clone(),
            is_base: false,
            sample: converter.format_in(sample, code).text,
        }))
        .collect()
}
