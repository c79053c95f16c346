//! # Storefront Checkout Library
//!
//! Orchestration around `storefront-core`: configuration, logging, checkout
//! session state and the commands behind the `storefront-quote` binary.
//!
//! ## Module Organization
//! ```text
//! storefront_checkout/
//! ├── lib.rs          ◄─── You are here (tracing setup)
//! ├── cli.rs          ◄─── Argument parsing and dispatch
//! ├── config.rs       ◄─── Layered AppConfig loading
//! ├── error.rs        ◄─── AppError / ApiError
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── checkout.rs ◄─── Checkout session (Arc<Mutex<T>>)
//! │   └── pricing.rs  ◄─── Calculator + converter
//! └── commands/
//!     ├── mod.rs      ◄─── Command exports
//!     ├── quote.rs    ◄─── Quote a checkout request
//!     ├── order.rs    ◄─── Commit an order
//!     ├── convert.rs  ◄─── Currency conversion and rates
//!     └── promo.rs    ◄─── Promo admin
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays valid JSON.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show quote computations
/// - `RUST_LOG=storefront_checkout=trace` - Trace this crate only
/// - Default: INFO level
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
