//! `storefront-quote` entry point.
//!
//! Failures print an [`ApiError`] body on stdout and exit non-zero, so
//! callers always get JSON back.

use std::process::ExitCode;

use clap::Parser;
use storefront_checkout::cli::{self, Cli};
use storefront_checkout::error::ApiError;

fn main() -> ExitCode {
    let args = Cli::parse();
    storefront_checkout::init_tracing();

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            if let Ok(body) = serde_json::to_string_pretty(&ApiError::from(&err)) {
                println!("{}", body);
            }
            ExitCode::FAILURE
        }
    }
}
