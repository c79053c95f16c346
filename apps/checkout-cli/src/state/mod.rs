//! # State Module
//!
//! State shared by checkout commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │   CheckoutState              │  │   PricingState               │    │
//! │  │                              │  │                              │    │
//! │  │  Arc<Mutex<                  │  │  FeeCalculator               │    │
//! │  │    CheckoutSession           │  │  CurrencyConverter           │    │
//! │  │  >>                          │  │  default display currency    │    │
//! │  │  items, address, promo       │  │                              │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CheckoutState: Protected by Arc<Mutex<T>> for exclusive access      │
//! │  • PricingState: Read-only after initialization                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod checkout;
mod pricing;

pub use checkout::{CheckoutSession, CheckoutState};
pub use pricing::PricingState;
