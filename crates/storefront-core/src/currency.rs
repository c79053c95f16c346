//! # Currency Conversion & Formatting
//!
//! Converts base-currency ledger amounts into a user's display currency and
//! back, and renders display strings.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Ledger ──► Display (one way)                          │
//! │                                                                         │
//! │  OrderTotals.total (Money, NGN) ──► to_display(total, "USD")            │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                           CurrencyAmount { 7.44, USD }                  │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                                 format() ──► "$7.44"                    │
//! │                                                                         │
//! │  Display values are NEVER stored. Money entered in a display currency   │
//! │  (wallet top-up) goes through to_base() / record_ledger() first.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rate Sources
//! Rates come from a [`RateSource`]. [`RateTable`] is the static table
//! loaded from configuration; a live-rate provider can implement the same
//! trait without changing the converter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CurrencyAmount, CurrencyCode, LedgerAmount};
use crate::validation::{validate_currency_code, validate_exchange_rate, ValidationResult};
use crate::DEFAULT_BASE_CURRENCY;

// =============================================================================
// Rate Source
// =============================================================================

/// Supplies exchange rates relative to the base currency.
///
/// A rate is "display units per one base unit": with base NGN, a USD rate of
/// `0.00065` means ₦1 = $0.00065.
pub trait RateSource {
    /// The ledger currency.
    fn base_currency(&self) -> &CurrencyCode;

    /// Rate for `code`, or `None` if the currency is unknown.
    fn rate(&self, code: &CurrencyCode) -> Option<f64>;
}

/// Static rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
}

impl RateTable {
    pub fn new(base: CurrencyCode, rates: BTreeMap<CurrencyCode, f64>) -> Self {
        RateTable { base, rates }
    }
}

impl RateSource for RateTable {
    fn base_currency(&self) -> &CurrencyCode {
        &self.base
    }

    fn rate(&self, code: &CurrencyCode) -> Option<f64> {
        if *code == self.base {
            return Some(1.0);
        }
        self.rates
            .get(code)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }
}

// =============================================================================
// Display Formats
// =============================================================================

/// Where the currency symbol goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    /// `₦1,000`
    #[default]
    Prefix,
    /// `1.000,00 €`
    Suffix,
}

/// Locale formatting for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    #[serde(default)]
    pub symbol_position: SymbolPosition,
    #[serde(default = "default_grouping")]
    pub grouping_separator: String,
    #[serde(default = "default_decimal")]
    pub decimal_separator: String,
}

fn default_grouping() -> String {
    ",".to_string()
}

fn default_decimal() -> String {
    ".".to_string()
}

impl CurrencyFormat {
    /// Symbol-prefixed format with `,` grouping and `.` decimals.
    pub fn prefixed(symbol: &str) -> Self {
        CurrencyFormat {
            symbol: symbol.to_string(),
            symbol_position: SymbolPosition::Prefix,
            grouping_separator: default_grouping(),
            decimal_separator: default_decimal(),
        }
    }
}

/// Rate and format for one display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySpec {
    /// Display units per one base unit.
    pub rate: f64,
    #[serde(flatten)]
    pub format: CurrencyFormat,
}

/// The configured currency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub base_currency: CurrencyCode,
    /// Format of the base currency itself.
    pub base_format: CurrencyFormat,
    /// Supported display currencies (excluding base).
    pub currencies: BTreeMap<CurrencyCode, CurrencySpec>,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        let mut currencies = BTreeMap::new();
        currencies.insert(
            CurrencyCode::new("USD"),
            CurrencySpec {
                rate: 0.00065,
                format: CurrencyFormat::prefixed("$"),
            },
        );
        currencies.insert(
            CurrencyCode::new("GBP"),
            CurrencySpec {
                rate: 0.00052,
                format: CurrencyFormat::prefixed("£"),
            },
        );
        currencies.insert(
            CurrencyCode::new("EUR"),
            CurrencySpec {
                rate: 0.0006,
                format: CurrencyFormat {
                    symbol: "€".to_string(),
                    symbol_position: SymbolPosition::Suffix,
                    grouping_separator: ".".to_string(),
                    decimal_separator: ",".to_string(),
                },
            },
        );
        currencies.insert(
            CurrencyCode::new("GHS"),
            CurrencySpec {
                rate: 0.0098,
                format: CurrencyFormat::prefixed("GH₵"),
            },
        );
        currencies.insert(
            CurrencyCode::new("KES"),
            CurrencySpec {
                rate: 0.084,
                format: CurrencyFormat::prefixed("KSh"),
            },
        );

        CurrencyConfig {
            base_currency: CurrencyCode::new(DEFAULT_BASE_CURRENCY),
            base_format: CurrencyFormat::prefixed("₦"),
            currencies,
        }
    }
}

impl CurrencyConfig {
    /// Checks codes and rates.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_currency_code(self.base_currency.as_str())?;
        for (code, spec) in &self.currencies {
            validate_currency_code(code.as_str())?;
            validate_exchange_rate(code.as_str(), spec.rate)?;
            if spec.format.symbol.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: format!("symbol for {}", code),
                });
            }
        }
        Ok(())
    }

    /// The static rate table described by this configuration.
    pub fn rate_table(&self) -> RateTable {
        RateTable::new(
            self.base_currency.clone(),
            self.currencies
                .iter()
                .map(|(code, spec)| (code.clone(), spec.rate))
                .collect(),
        )
    }

    fn formats(&self) -> BTreeMap<CurrencyCode, CurrencyFormat> {
        let mut formats: BTreeMap<_, _> = self
            .currencies
            .iter()
            .map(|(code, spec)| (code.clone(), spec.format.clone()))
            .collect();
        formats.insert(self.base_currency.clone(), self.base_format.clone());
        formats
    }
}

// =============================================================================
// Conversion Results
// =============================================================================

/// Result of converting a base amount for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DisplayConversion {
    pub amount: CurrencyAmount,
    pub rate: f64,
    /// The requested currency was unknown; `amount` is in base currency.
    pub fallback: bool,
}

/// Result of converting a display-currency amount into the ledger currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BaseConversion {
    pub amount: Money,
    pub rate: f64,
    /// The source currency was unknown; the value was taken as base.
    pub fallback: bool,
}

/// A display string plus the value it was rendered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FormattedAmount {
    pub text: String,
    pub amount: CurrencyAmount,
    pub fallback: bool,
}

// =============================================================================
// Converter
// =============================================================================

/// Converts and formats amounts using a [`RateSource`].
///
/// ## Example
/// ```rust
/// use storefront_core::currency::{CurrencyConfig, CurrencyConverter};
/// use storefront_core::money::Money;
///
/// let converter = CurrencyConverter::from_config(&CurrencyConfig::default());
///
/// let naira = converter.format_in(Money::from_major(11_450), &"NGN".into());
/// assert_eq!(naira.text, "₦11,450");
///
/// let dollars = converter.format_in(Money::from_major(11_450), &"USD".into());
/// assert_eq!(dollars.text, "$7.44");
/// ```
#[derive(Debug, Clone)]
pub struct CurrencyConverter<R: RateSource = RateTable> {
    rates: R,
    formats: BTreeMap<CurrencyCode, CurrencyFormat>,
}

impl CurrencyConverter<RateTable> {
    /// Converter backed by the static table in `config`.
    pub fn from_config(config: &CurrencyConfig) -> Self {
        CurrencyConverter {
            rates: config.rate_table(),
            formats: config.formats(),
        }
    }
}

impl<R: RateSource> CurrencyConverter<R> {
    /// Converter backed by any rate source, using `config` for formats only.
    pub fn with_source(rates: R, config: &CurrencyConfig) -> Self {
        CurrencyConverter {
            rates,
            formats: config.formats(),
        }
    }

    pub fn base_currency(&self) -> &CurrencyCode {
        self.rates.base_currency()
    }

    pub fn is_base(&self, code: &CurrencyCode) -> bool {
        code == self.rates.base_currency()
    }

    /// Checks whether `code` can be converted without falling back.
    pub fn supports(&self, code: &CurrencyCode) -> bool {
        self.rates.rate(code).is_some()
    }

    /// `amount × rate[code]`; identity for the base currency.
    ///
    /// Unknown codes fall back to rate 1 and report the amount in base
    /// currency with `fallback = true`.
    pub fn to_display(&self, amount: Money, code: &CurrencyCode) -> DisplayConversion {
        let major = amount.to_major_f64();

        match self.rates.rate(code) {
            Some(rate) => DisplayConversion {
                amount: CurrencyAmount::new(major * rate, code.clone()),
                rate,
                fallback: false,
            },
            None => DisplayConversion {
                amount: CurrencyAmount::new(major, self.base_currency().clone()),
                rate: 1.0,
                fallback: true,
            },
        }
    }

    /// `amount ÷ rate[code]`, rounded to base minor units; identity for the
    /// base currency.
    ///
    /// The display value is user input, so NaN or negative values clamp to
    /// zero. Unknown codes are taken as base with `fallback = true`.
    pub fn to_base(&self, amount_display: f64, code: &CurrencyCode) -> BaseConversion {
        match self.rates.rate(code) {
            Some(rate) => BaseConversion {
                amount: Money::from_major_lossy(amount_display / rate),
                rate,
                fallback: false,
            },
            None => BaseConversion {
                amount: Money::from_major_lossy(amount_display),
                rate: 1.0,
                fallback: true,
            },
        }
    }

    /// Builds the persisted record for an amount the user entered in `code`.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::currency::{CurrencyConfig, CurrencyConverter};
    /// use storefront_core::money::Money;
    ///
    /// let converter = CurrencyConverter::from_config(&CurrencyConfig::default());
    /// let topup = converter.record_ledger(13.0, &"USD".into());
    /// assert_eq!(topup.base_amount, Money::from_major(20_000));
    /// assert_eq!(topup.original.unwrap().value, 13.0);
    ///
    /// let naira = converter.record_ledger(5_000.0, &"NGN".into());
    /// assert!(naira.original.is_none());
    /// ```
    pub fn record_ledger(&self, amount_display: f64, code: &CurrencyCode) -> LedgerAmount {
        let converted = self.to_base(amount_display, code);
        let original = if self.is_base(code) {
            None
        } else {
            Some(CurrencyAmount::new(amount_display, code.clone()))
        };

        LedgerAmount {
            base_amount: converted.amount,
            base_currency: self.base_currency().clone(),
            original,
        }
    }

    /// Builds the persisted record for a base amount the user is shown in
    /// `code` (order total at commit time).
    ///
    /// The original amount is only kept when `code` is a known non-base
    /// currency.
    pub fn ledger_from_base(&self, amount: Money, code: &CurrencyCode) -> LedgerAmount {
        let converted = self.to_display(amount, code);
        let original = if converted.fallback || self.is_base(code) {
            None
        } else {
            Some(converted.amount)
        };

        LedgerAmount {
            base_amount: amount,
            base_currency: self.base_currency().clone(),
            original,
        }
    }

    /// Renders a display amount: zero decimals for the base currency, two
    /// for others, with the currency's symbol and separators.
    ///
    /// Currencies without a configured format render as `"XYZ 1,234.00"`.
    pub fn format(&self, amount: &CurrencyAmount) -> String {
        let decimals = if self.is_base(&amount.currency) { 0 } else { 2 };

        match self.formats.get(&amount.currency) {
            Some(format) => render(amount.value, decimals, format),
            None => {
                let fallback = CurrencyFormat::prefixed(&format!("{} ", amount.currency));
                render(amount.value, decimals, &fallback)
            }
        }
    }

    /// Converts a base amount and renders it in one step.
    pub fn format_in(&self, amount: Money, code: &CurrencyCode) -> FormattedAmount {
        let converted = self.to_display(amount, code);
        FormattedAmount {
            text: self.format(&converted.amount),
            amount: converted.amount,
            fallback: converted.fallback,
        }
    }
}

/// Rounds `value` to `decimals` and lays it out per `format`.
fn render(value: f64, decimals: u32, format: &CurrencyFormat) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let scale = 10_u64.pow(decimals);
    // `as` saturates on overflow
    let scaled = (value.abs() * scale as f64).round() as u64;
    let whole = scaled / scale;
    let fraction = scaled % scale;

    let mut number = group_digits(whole, &format.grouping_separator);
    if decimals > 0 {
        number.push_str(&format.decimal_separator);
        number.push_str(&format!("{:0width$}", fraction, width = decimals as usize));
    }

    let sign = if value < 0.0 && scaled > 0 { "-" } else { "" };
    match format.symbol_position {
        SymbolPosition::Prefix => format!("{}{}{}", sign, format.symbol, number),
        SymbolPosition::Suffix => format!("{}{} {}", sign, number, format.symbol),
    }
}

fn group_digits(whole: u64, separator: &str) -> String {
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> CurrencyConverter {
        CurrencyConverter::from_config(&CurrencyConfig::default())
    }

    #[test]
    fn test_base_currency_is_identity() {
        let c = converter();
        let ngn = CurrencyCode::new("NGN");
        let shown = c.to_display(Money::from_minor(123_456), &ngn);
        assert_eq!(shown.amount.value, 1234.56);
        assert_eq!(shown.rate, 1.0);
        assert!(!shown.fallback);

        assert_eq!(c.to_base(1234.56, &ngn).amount, Money::from_minor(123_456));
    }

    #[test]
    fn test_to_display_applies_rate() {
        let c = converter();
        let shown = c.to_display(Money::from_major(10_000), &"USD".into());
        assert!((shown.amount.value - 6.5).abs() < 1e-9);
        assert_eq!(shown.amount.currency.as_str(), "USD");
    }

    #[test]
    fn test_to_base_divides_by_rate() {
        let c = converter();
        let base = c.to_base(6.5, &"USD".into());
        assert_eq!(base.amount, Money::from_major(10_000));
        assert!(!base.fallback);
    }

    #[test]
    fn test_unknown_currency_falls_back_to_base() {
        let c = converter();
        let xyz = CurrencyCode::new("XYZ");

        let shown = c.to_display(Money::from_major(500), &xyz);
        assert!(shown.fallback);
        assert_eq!(shown.rate, 1.0);
        assert_eq!(shown.amount.value, 500.0);
        assert_eq!(shown.amount.currency.as_str(), "NGN");

        let base = c.to_base(500.0, &xyz);
        assert!(base.fallback);
        assert_eq!(base.amount, Money::from_major(500));

        assert!(!c.supports(&xyz));
    }

    #[test]
    fn test_non_positive_rate_is_unknown() {
        let mut config = CurrencyConfig::default();
        config.currencies.get_mut(&CurrencyCode::new("USD")).unwrap().rate = 0.0;
        let c = CurrencyConverter::from_config(&config);
        assert!(c.to_display(Money::from_major(1), &"USD".into()).fallback);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_base_clamps_bad_input() {
        let c = converter();
        assert!(c.to_base(f64::NAN, &"USD".into()).amount.is_zero());
        assert!(c.to_base(-3.0, &"USD".into()).amount.is_zero());
    }

    #[test]
    fn test_ledger_from_base() {
        let c = converter();
        let record = c.ledger_from_base(Money::from_major(10_000), &"USD".into());
        assert_eq!(record.base_amount, Money::from_major(10_000));
        assert_eq!(record.base_currency.as_str(), "NGN");
        let original = record.original.unwrap();
        assert_eq!(original.currency.as_str(), "USD");
        assert!((original.value - 6.5).abs() < 1e-9);

        assert!(c.ledger_from_base(Money::from_major(1), &"NGN".into()).original.is_none());
        assert!(c.ledger_from_base(Money::from_major(1), &"XYZ".into()).original.is_none());
    }

    #[test]
    fn test_format_base_has_no_decimals() {
        let c = converter();
        assert_eq!(c.format(&CurrencyAmount::new(11_450.0, "NGN")), "₦11,450");
        assert_eq!(c.format(&CurrencyAmount::new(1_234_567.6, "NGN")), "₦1,234,568");
        assert_eq!(c.format(&CurrencyAmount::new(0.0, "NGN")), "₦0");
    }

    #[test]
    fn test_format_display_currency_two_decimals() {
        let c = converter();
        assert_eq!(c.format(&CurrencyAmount::new(7.4425, "USD")), "$7.44");
        assert_eq!(c.format(&CurrencyAmount::new(1234.5, "GBP")), "£1,234.50");
        assert_eq!(c.format(&CurrencyAmount::new(1234.5, "EUR")), "1.234,50 €");
        assert_eq!(c.format(&CurrencyAmount::new(-2.5, "USD")), "-$2.50");
    }

    #[test]
    fn test_format_unknown_currency_uses_code() {
        let c = converter();
        assert_eq!(c.format(&CurrencyAmount::new(1500.0, "XYZ")), "XYZ 1,500.00");
    }

    #[test]
    fn test_format_nan_renders_zero() {
        let c = converter();
        assert_eq!(c.format(&CurrencyAmount::new(f64::NAN, "USD")), "$0.00");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0, ","), "0");
        assert_eq!(group_digits(999, ","), "999");
        assert_eq!(group_digits(1000, ","), "1,000");
        assert_eq!(group_digits(1234567, " "), "1 234 567");
    }

    #[test]
    fn test_custom_rate_source() {
        struct Fixed(CurrencyCode);
        impl RateSource for Fixed {
            fn base_currency(&self) -> &CurrencyCode {
                &self.0
            }
            fn rate(&self, code: &CurrencyCode) -> Option<f64> {
                (code.as_str() == "USD").then_some(0.001).or_else(|| {
                    (*code == self.0).then_some(1.0)
                })
            }
        }

        let c = CurrencyConverter::with_source(Fixed("NGN".into()), &CurrencyConfig::default());
        let shown = c.format_in(Money::from_major(10_000), &"USD".into());
        assert_eq!(shown.text, "$10.00");
        assert!(c.format_in(Money::from_major(1), &"GBP".into()).fallback);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(CurrencyConfig::default().validate().is_ok());
    }
}
