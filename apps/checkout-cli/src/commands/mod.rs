//! # Checkout Commands
//!
//! Operations exposed to checkout and admin consumers, and wired to the
//! `storefront-quote` CLI.
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── quote.rs    ◄─── Load a checkout request, quote it with display strings
//! ├── order.rs    ◄─── Commit the session as a frozen order record
//! ├── convert.rs  ◄─── Currency conversion, ledger records, rate listing
//! └── promo.rs    ◄─── Admin promo creation and expiry sweep
//! ```
//!
//! Commands take the state they need by reference and an explicit `now`;
//! only the CLI reads the clock.

pub mod convert;
pub mod order;
pub mod promo;
pub mod quote;
