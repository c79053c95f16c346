//! # Application Configuration
//!
//! Loads [`AppConfig`] from layered sources using the `config` crate.
//!
//! ## Layering (later wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Built-in defaults          AppConfig::default() via #[serde(default)]│
//! │  2. TOML file                  --config <path>, or the platform dir:     │
//! │                                  Linux  ~/.config/storefront/            │
//! │                                  macOS  ~/Library/Application Support/   │
//! │                                         com.storefront.storefront/       │
//! │                                  Windows %APPDATA%\storefront\           │
//! │  3. Environment                STOREFRONT_<SECTION>__<KEY>               │
//! │                                  e.g. STOREFRONT_PRICING__TAX_RATE_BPS   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An explicit `--config` path must exist; the platform file is optional.
//!
//! ## Example File
//! ```toml
//! display_currency = "USD"
//!
//! [pricing]
//! service_fee_bps = 200
//! tax_rate_bps = 750
//!
//! [pricing.delivery.local]
//! fee = 600
//! keywords = ["lagos", "ikeja"]
//!
//! [pricing.currency.currencies.USD]
//! rate = 0.00065
//! symbol = "$"
//! ```

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use storefront_core::validation::validate_currency_code;
use storefront_core::{CurrencyCode, PricingConfig, DEFAULT_BASE_CURRENCY};

use crate::error::{AppError, AppResult};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "STOREFRONT";

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Checkout app configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fee rates, delivery zones and the currency table.
    pub pricing: PricingConfig,

    /// Currency shown when a request does not pick one.
    pub display_currency: CurrencyCode,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            pricing: PricingConfig::default(),
            display_currency: CurrencyCode::new(DEFAULT_BASE_CURRENCY),
        }
    }
}

impl AppConfig {
    /// Loads configuration from an explicit file (if given) or the platform
    /// config directory, then `STOREFRONT_*` environment variables.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        match explicit {
            Some(path) => Self::load_from(Some(path), true, ENV_PREFIX),
            None => {
                let default_path = default_config_path();
                Self::load_from(default_path.as_deref(), false, ENV_PREFIX)
            }
        }
    }

    /// Builds the layered configuration from the given sources.
    pub fn load_from(file: Option<&Path>, required: bool, env_prefix: &str) -> AppResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            file = ?file,
            display_currency = %config.display_currency,
            "Configuration sources merged"
        );

        Ok(config)
    }

    /// Rejects rates over 100%, negative fees and malformed currency codes.
    pub fn validate(&self) -> AppResult<()> {
        self.pricing.validate().map_err(AppError::InvalidConfig)?;
        validate_currency_code(self.display_currency.as_str()).map_err(AppError::InvalidConfig)?;
        Ok(())
    }
}

/// `<platform config dir>/storefront.toml`, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "storefront", "storefront")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use storefront_core::Money;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = AppConfig::load_from(None, false, "STOREFRONT_TEST_EMPTY").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.display_currency.as_str(), "NGN");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_toml(
            r#"
display_currency = "usd"

[pricing]
tax_rate_bps = 500

[pricing.delivery]
baseline_fee = 1200
"#,
        );

        let config = AppConfig::load_from(Some(file.path()), true, "STOREFRONT_TEST_FILE").unwrap();
        assert_eq!(config.display_currency.as_str(), "USD");
        assert_eq!(config.pricing.tax_rate_bps, 500);
        assert_eq!(config.pricing.service_fee_bps, 200);
        assert_eq!(config.pricing.delivery.baseline_fee, 1200);
        assert_eq!(config.pricing.delivery.fee_for(storefront_core::DeliveryTier::Local), Money::from_major(500));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_toml("[pricing]\ntax_rate_bps = 500\n");
        std::env::set_var("STOREFRONT_TEST_ENV_PRICING__TAX_RATE_BPS", "800");

        let config = AppConfig::load_from(Some(file.path()), true, "STOREFRONT_TEST_ENV").unwrap();
        std::env::remove_var("STOREFRONT_TEST_ENV_PRICING__TAX_RATE_BPS");

        assert_eq!(config.pricing.tax_rate_bps, 800);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = AppConfig::load_from(Some(&missing), true, "STOREFRONT_TEST_MISSING").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("storefront.toml");
        let config = AppConfig::load_from(Some(&missing), false, "STOREFRONT_TEST_OPTIONAL").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let file = write_toml("[pricing]\nservice_fee_bps = 20000\n");
        let err = AppConfig::load_from(Some(file.path()), true, "STOREFRONT_TEST_INVALID").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_display_currency_rejected() {
        let file = write_toml("display_currency = \"DOLLARS\"\n");
        let err = AppConfig::load_from(Some(file.path()), true, "STOREFRONT_TEST_CODE").unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }
}
