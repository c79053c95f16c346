//! # Fee Calculator
//!
//! Turns a cart, a delivery destination and a promo context into an
//! [`OrderTotals`] breakdown.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──► subtotal = Σ unit_price × quantity                           │
//! │                 │                                                       │
//! │                 ├──► service_fee  = subtotal × 2%      (always)          │
//! │                 ├──► tax          = subtotal × 7.5%    (flat VAT)        │
//! │                 ├──► discount     = promo outcome      (0 if ineligible) │
//! │                 │                                                       │
//! │  destination ──► delivery_fee = tier fee  (0 + provisional if absent)   │
//! │                                                                         │
//! │  total = subtotal − discount + service_fee + delivery_fee + tax         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call returns a fresh value; there is no cached "current" quote.
//! Percentages round half-up to the nearest minor unit, each component on
//! its own, so the total is the exact sum of the displayed parts.

use crate::config::PricingConfig;
use crate::delivery::DeliveryTier;
use crate::money::Money;
use crate::promo::{PromoContext, PromoOutcome};
use crate::types::{LineItem, OrderTotals};

/// Totals plus the promo evaluation that produced the discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub totals: OrderTotals,
    pub promo: PromoOutcome,
}

/// Computes order totals from a [`PricingConfig`].
///
/// ## Example
/// ```rust
/// use storefront_core::config::PricingConfig;
/// use storefront_core::money::Money;
/// use storefront_core::pricing::FeeCalculator;
/// use storefront_core::promo::PromoContext;
///
/// let calculator = FeeCalculator::new(PricingConfig::default());
/// let totals = calculator.quote(
///     Money::from_major(10_000),
///     Some("Lekki Phase 1, Lagos"),
///     &PromoContext::none(),
/// );
///
/// assert_eq!(totals.service_fee, Money::from_major(200));
/// assert_eq!(totals.delivery_fee, Money::from_major(500));
/// assert_eq!(totals.tax, Money::from_major(750));
/// assert_eq!(totals.total, Money::from_major(11_450));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeeCalculator {
    config: PricingConfig,
}

impl FeeCalculator {
    pub fn new(config: PricingConfig) -> Self {
        FeeCalculator { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Sum of line totals.
    pub fn subtotal(&self, items: &[LineItem]) -> Money {
        items.iter().map(LineItem::line_total).sum()
    }

    /// Service fee on `subtotal`.
    pub fn service_fee(&self, subtotal: Money) -> Money {
        subtotal
            .clamp_non_negative()
            .percentage(self.config.service_fee_rate())
    }

    /// VAT on `subtotal`.
    pub fn tax(&self, subtotal: Money) -> Money {
        subtotal.clamp_non_negative().percentage(self.config.tax_rate())
    }

    /// Tier and flat fee for `destination`.
    ///
    /// No address yet gives `(None, 0)`.
    pub fn delivery_fee(&self, destination: Option<&str>) -> (Option<DeliveryTier>, Money) {
        match self.config.delivery.resolve(destination) {
            Some(tier) => (Some(tier), self.config.delivery.fee_for(tier)),
            None => (None, Money::zero()),
        }
    }

    /// Totals for a base-currency subtotal.
    pub fn quote(
        &self,
        subtotal: Money,
        destination: Option<&str>,
        promo: &PromoContext<'_>,
    ) -> OrderTotals {
        self.quote_with_outcome(subtotal, destination, promo).totals
    }

    /// Totals for a list of line items.
    pub fn quote_items(
        &self,
        items: &[LineItem],
        destination: Option<&str>,
        promo: &PromoContext<'_>,
    ) -> OrderTotals {
        self.quote(self.subtotal(items), destination, promo)
    }

    /// Totals plus why the promo was (not) applied.
    pub fn quote_with_outcome(
        &self,
        subtotal: Money,
        destination: Option<&str>,
        promo: &PromoContext<'_>,
    ) -> Quote {
        let subtotal = subtotal.clamp_non_negative();
        let service_fee = self.service_fee(subtotal);
        let tax = self.tax(subtotal);
        let (delivery_tier, delivery_fee) = self.delivery_fee(destination);
        let outcome = promo.evaluate(subtotal);

        let total = subtotal - outcome.discount + service_fee + delivery_fee + tax;

        Quote {
            totals: OrderTotals {
                subtotal,
                service_fee,
                delivery_fee,
                tax,
                discount_amount: outcome.discount,
                total,
                delivery_tier,
                applied_promo: outcome.applied.clone(),
                provisional: delivery_tier.is_none(),
            },
            promo: outcome,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
