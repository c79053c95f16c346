//! # storefront-core: Pure Pricing Logic for the Storefront
//!
//! This crate computes what an order costs and how that cost is shown to a
//! customer. It contains only pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile App (customer / admin)                │   │
//! │  │    Cart ──► Checkout ──► Payment ──► Order detail (admin)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ cart, address, promo, currency         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐         │   │
//! │  │   │ pricing  │ │ delivery │ │  promo   │ │ currency │         │   │
//! │  │   │  Fee     │ │  Tiers   │ │ Eligible │ │ Convert  │         │   │
//! │  │   │  Calc    │ │  Zones   │ │ Discount │ │ Format   │         │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘         │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO BACKEND • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderTotals, display strings           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           Order-creation call / UI text (external)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, OrderTotals, PromoCode, currency values)
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Fee calculator
//! - [`delivery`] - Delivery tier resolution
//! - [`promo`] - Promo eligibility, discount, lifecycle
//! - [`currency`] - Display-currency conversion and formatting
//! - [`config`] - Pricing configuration
//! - [`error`] - Domain error types
//! - [`validation`] - Admin input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output; callers pass `now`
//! 2. **Integer Money**: ledger values are minor units (i64)
//! 3. **Clamp, don't throw**: checkout form numbers clamp to zero
//! 4. **Explicit promo**: the applied promo is an argument, never ambient state
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::config::PricingConfig;
//! use storefront_core::currency::CurrencyConverter;
//! use storefront_core::money::Money;
//! use storefront_core::pricing::FeeCalculator;
//! use storefront_core::promo::PromoContext;
//!
//! let config = PricingConfig::default();
//! let calculator = FeeCalculator::new(config.clone());
//! let converter = CurrencyConverter::from_config(&config.currency);
//!
//! let totals = calculator.quote(Money::from_major(10_000), Some("Ikeja, Lagos"), &PromoContext::none());
//! assert_eq!(totals.total, Money::from_major(11_450));
//!
//! let shown = converter.format_in(totals.total, &"NGN".into());
//! assert_eq!(shown.text, "₦11,450");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod currency;
pub mod delivery;
pub mod error;
pub mod money;
pub mod pricing;
pub mod promo;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::PricingConfig;
pub use currency::{CurrencyConverter, RateSource, RateTable};
pub use delivery::{DeliveryTier, DeliveryZones};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{FeeCalculator, Quote};
pub use promo::{Ineligibility, PromoContext, PromoOutcome};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Ledger currency used when configuration does not say otherwise.
pub const DEFAULT_BASE_CURRENCY: &str = "NGN";

/// Maximum lines allowed in a single cart
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: u32 = 999;
