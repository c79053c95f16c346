//! # `storefront-quote` Command Line
//!
//! ```text
//! storefront-quote [--config <file>] quote   <request.json | ->
//! storefront-quote [--config <file>] order   <request.json | ->
//! storefront-quote [--config <file>] convert <amount> <code> [--to-base]
//! storefront-quote [--config <file>] ledger  <amount> <code>
//! storefront-quote [--config <file>] rates
//! storefront-quote [--config <file>] promo create <form.json | ->
//! storefront-quote [--config <file>] promo sweep  <promos.json | ->
//! ```
//!
//! Every command prints one JSON document on stdout.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use storefront_core::promo::NewPromoCode;
use storefront_core::PromoCode;
use tracing::info;

use crate::commands::convert::{self, Direction};
use crate::commands::{order, promo, quote};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::{CheckoutState, PricingState};

#[derive(Debug, Parser)]
#[command(name = "storefront-quote", version, about = "Order pricing and currency display")]
pub struct Cli {
    /// TOML configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quote a checkout request
    Quote {
        /// Request JSON file, or `-` for stdin
        input: String,
    },
    /// Commit a checkout request as an order record
    Order {
        /// Request JSON file, or `-` for stdin
        input: String,
    },
    /// Convert an amount between base and a display currency
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        code: String,
        /// Treat `amount` as display currency and convert to base
        #[arg(long)]
        to_base: bool,
    },
    /// Ledger record for an amount entered in a display currency
    Ledger {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        code: String,
    },
    /// List configured currencies and rates
    Rates,
    /// Promo code administration
    Promo {
        #[command(subcommand)]
        action: PromoAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum PromoAction {
    /// Validate a new promo form and print the promo record
    Create { input: String },
    /// Deactivate expired promos in a JSON array
    Sweep { input: String },
}

/// Runs one CLI command.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    info!(
        base_currency = %config.pricing.currency.base_currency,
        display_currency = %config.display_currency,
        "Configuration loaded"
    );

    let pricing = PricingState::from_config(&config);
    let now = Utc::now();

    match cli.command {
        Command::Quote { input } => {
            let request: quote::CheckoutRequest = read_json(&input)?;
            let at = request.now.unwrap_or(now);
            let state = CheckoutState::new(pricing, at);
            print_json(&quote::quote_request(&state, &request, at)?)
        }
        Command::Order { input } => {
            let request: quote::CheckoutRequest = read_json(&input)?;
            let at = request.now.unwrap_or(now);
            let state = CheckoutState::new(pricing, at);
            quote::load_request(&state, &request, at)?;
            print_json(&order::place_order(&state, at)?)
        }
        Command::Convert {
            amount,
            code,
            to_base,
        } => {
            let direction = if to_base {
                Direction::ToBase
            } else {
                Direction::ToDisplay
            };
            print_json(&convert::convert(&pricing, amount, &code, direction))
        }
        Command::Ledger { amount, code } => print_json(&convert::ledger(&pricing, amount, &code)),
        Command::Rates => print_json(&convert::list_rates(&pricing)),
        Command::Promo { action } => match action {
            PromoAction::Create { input } => {
                let form: NewPromoCode = read_json(&input)?;
                print_json(&promo::create_promo(form, now)?)
            }
            PromoAction::Sweep { input } => {
                let promos: Vec<PromoCode> = read_json(&input)?;
                print_json(&promo::sweep_expired(promos, now))
            }
        },
    }
}

/// Reads `input` (a path, or `-` for stdin) as JSON.
fn read_json<T: serde::de::DeserializeOwned>(input: &str) -> anyhow::Result<T> {
    let raw = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(AppError::from)
            .context("reading request from stdin")?;
        buf
    } else {
        read_file(Path::new(input))?
    };

    Ok(serde_json::from_str(&raw).map_err(AppError::from)?)
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .map_err(AppError::from)
        .with_context(|| format!("reading {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
