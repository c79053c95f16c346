//! # Pricing Configuration
//!
//! Rates and tables the fee calculator and currency converter are built
//! from. The core only defines and validates the shape; loading from files
//! or the environment happens in the app layer.
//!
//! ## Defaults
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  service_fee_bps   200   (2%)                                          │
//! │  tax_rate_bps      750   (7.5% VAT)                                    │
//! │  delivery          local ₦500 · national ₦1,500 · international ₦5,000 │
//! │                    baseline ₦1,000                                      │
//! │  currency          base NGN; USD, GBP, EUR, GHS, KES display rates     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::currency::CurrencyConfig;
use crate::delivery::DeliveryZones;
use crate::error::ValidationError;
use crate::types::Rate;
use crate::validation::{validate_rate_bps, ValidationResult};

/// Default service fee (2%).
pub const DEFAULT_SERVICE_FEE_BPS: u32 = 200;

/// Default flat VAT rate (7.5%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 750;

/// Everything needed to price an order and display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub service_fee_bps: u32,
    pub tax_rate_bps: u32,
    pub delivery: DeliveryZones,
    pub currency: CurrencyConfig,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            service_fee_bps: DEFAULT_SERVICE_FEE_BPS,
            tax_rate_bps: DEFAULT_TAX_RATE_BPS,
            delivery: DeliveryZones::default(),
            currency: CurrencyConfig::default(),
        }
    }
}

impl PricingConfig {
    #[inline]
    pub fn service_fee_rate(&self) -> Rate {
        Rate::from_bps(self.service_fee_bps)
    }

    #[inline]
    pub fn tax_rate(&self) -> Rate {
        Rate::from_bps(self.tax_rate_bps)
    }

    /// Validates rates, fees and the currency table.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_rate_bps("service_fee_bps", self.service_fee_bps)?;
        validate_rate_bps("tax_rate_bps", self.tax_rate_bps)?;

        let fees = [
            ("delivery.local.fee", self.delivery.local.fee),
            ("delivery.national.fee", self.delivery.national.fee),
            ("delivery.international.fee", self.delivery.international.fee),
            ("delivery.baseline_fee", self.delivery.baseline_fee),
        ];
        for (field, fee) in fees {
            if fee < 0 {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    min: 0,
                    max: i64::MAX,
                });
            }
        }

        self.currency.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.service_fee_rate().bps(), 200);
        assert_eq!(config.tax_rate().bps(), 750);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_rate_over_100_percent() {
        let config = PricingConfig {
            tax_rate_bps: 12_000,
            ..PricingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_delivery_fee() {
        let mut config = PricingConfig::default();
        config.delivery.national.fee = -1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("delivery.national.fee"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: PricingConfig = serde_json::from_str(r#"{"tax_rate_bps": 500}"#).unwrap();
        assert_eq!(config.tax_rate_bps, 500);
        assert_eq!(config.service_fee_bps, DEFAULT_SERVICE_FEE_BPS);
        assert_eq!(config.delivery, DeliveryZones::default());
    }
}
