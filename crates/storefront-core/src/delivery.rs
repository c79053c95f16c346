//! # Delivery Tiers
//!
//! Resolves a free-text delivery address to a coarse tier and looks up the
//! flat fee for that tier.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "12 Admiralty Way, Lekki, Lagos"                                       │
//! │        │                                                                │
//! │        ▼  normalise: lowercase, punctuation → spaces                    │
//! │  " 12 admiralty way lekki lagos "                                       │
//! │        │                                                                │
//! │        ▼  whole-word keyword match, in order                            │
//! │  Local ──► National ──► International ──► (no match) Default            │
//! │                                                                         │
//! │  No address yet (None / blank) ──► no tier, fee = 0, provisional        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Coarse delivery bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DeliveryTier {
    /// Same city as the warehouse.
    Local,
    /// Elsewhere in the country.
    National,
    /// Outside the country.
    International,
    /// Address given but not recognised; baseline fee applies.
    Default,
}

/// Keywords and fee for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRule {
    /// Flat fee for this tier in base-currency major units.
    pub fee: i64,
    /// Lower-case words or phrases; any whole-word match selects the tier.
    pub keywords: Vec<String>,
}

impl TierRule {
    pub fn new(fee: i64, keywords: &[&str]) -> Self {
        TierRule {
            fee,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn matches(&self, normalised: &str) -> bool {
        self.keywords.iter().any(|keyword| {
            let keyword = normalise(keyword);
            !keyword.trim().is_empty() && normalised.contains(keyword.as_str())
        })
    }
}

/// Delivery fee table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryZones {
    pub local: TierRule,
    pub national: TierRule,
    pub international: TierRule,
    /// Fee when the address matches no tier, in major units.
    pub baseline_fee: i64,
}

impl Default for DeliveryZones {
    fn default() -> Self {
        DeliveryZones {
            local: TierRule::new(500, &["lagos", "ikeja", "lekki", "yaba", "surulere", "ajah"]),
            national: TierRule::new(
                1_500,
                &[
                    "nigeria",
                    "abuja",
                    "fct",
                    "ibadan",
                    "port harcourt",
                    "kano",
                    "enugu",
                    "benin city",
                    "kaduna",
                    "abeokuta",
                ],
            ),
            international: TierRule::new(
                5_000,
                &[
                    "ghana",
                    "kenya",
                    "south africa",
                    "united kingdom",
                    "uk",
                    "united states",
                    "usa",
                    "canada",
                ],
            ),
            baseline_fee: 1_000,
        }
    }
}

impl DeliveryZones {
    /// Resolves a destination to a tier.
    ///
    /// Returns `None` when no address has been entered yet.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::delivery::{DeliveryTier, DeliveryZones};
    ///
    /// let zones = DeliveryZones::default();
    /// assert_eq!(zones.resolve(Some("Ikeja, Lagos")), Some(DeliveryTier::Local));
    /// assert_eq!(zones.resolve(Some("Wuse 2, Abuja")), Some(DeliveryTier::National));
    /// assert_eq!(zones.resolve(Some("Accra, Ghana")), Some(DeliveryTier::International));
    /// assert_eq!(zones.resolve(Some("Somewhere")), Some(DeliveryTier::Default));
    /// assert_eq!(zones.resolve(Some("   ")), None);
    /// ```
    pub fn resolve(&self, destination: Option<&str>) -> Option<DeliveryTier> {
        let destination = destination.map(str::trim).filter(|d| !d.is_empty())?;
        let normalised = normalise(destination);

        let tier = if self.local.matches(&normalised) {
            DeliveryTier::Local
        } else if self.national.matches(&normalised) {
            DeliveryTier::National
        } else if self.international.matches(&normalised) {
            DeliveryTier::International
        } else {
            DeliveryTier::Default
        };
        Some(tier)
    }

    /// Flat fee for a tier.
    pub fn fee_for(&self, tier: DeliveryTier) -> Money {
        let major = match tier {
            DeliveryTier::Local => self.local.fee,
            DeliveryTier::National => self.national.fee,
            DeliveryTier::International => self.international.fee,
            DeliveryTier::Default => self.baseline_fee,
        };
        Money::from_major(major).clamp_non_negative()
    }
}

/// Lowercases, maps every non-alphanumeric run to one space and pads both
/// ends so `" word "` matches whole words only.
fn normalise(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    if !out.ends_with(' ') {
        out.push(' ');
    }
    out
}
