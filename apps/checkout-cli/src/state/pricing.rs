//! # Pricing State
//!
//! Read-only pricing services built once from [`AppConfig`].

use storefront_core::currency::CurrencyConfig;
use storefront_core::{CurrencyCode, CurrencyConverter, FeeCalculator};

use crate::config::AppConfig;

/// Fee calculator, currency converter and the default display currency.
#[derive(Debug, Clone)]
pub struct PricingState {
    calculator: FeeCalculator,
    converter: CurrencyConverter,
    default_currency: CurrencyCode,
}

impl PricingState {
    pub fn from_config(config: &AppConfig) -> Self {
        PricingState {
            calculator: FeeCalculator::new(config.pricing.clone()),
            converter: CurrencyConverter::from_config(&config.pricing.currency),
            default_currency: config.display_currency.clone(),
        }
    }

    pub fn calculator(&self) -> &FeeCalculator {
        &self.calculator
    }

    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    pub fn currency_config(&self) -> &CurrencyConfig {
        &self.calculator.config().currency
    }

    /// The requested currency, or the configured default when blank.
    pub fn display_currency(&self, requested: Option<&str>) -> CurrencyCode {
        match requested.map(str::trim) {
            Some(code) if !code.is_empty() => CurrencyCode::new(code),
            _ => self.default_currency.clone(),
        }
    }
}

impl Default for PricingState {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
