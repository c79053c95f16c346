//! # App Error Type
//!
//! Unified error type for checkout commands and the CLI.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  config file / env ──► config::ConfigError ──┐                          │
//! │  request file      ──► io::Error ────────────┤                          │
//! │  request JSON      ──► serde_json::Error ────┼──► AppError ──► ApiError │
//! │  storefront-core   ──► CoreError ────────────┤        (code + message)  │
//! │  admin input       ──► ValidationError ──────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Promo ineligibility never shows up here: it is a normal quote outcome.

use serde::Serialize;
use storefront_core::{CoreError, ValidationError};
use thiserror::Error;

/// Errors raised by the checkout layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cannot place an order with an empty cart")]
    EmptyCart,
}

/// Result alias used by commands.
pub type AppResult<T> = Result<T, AppError>;

/// Error body printed by the CLI and handed to front-end callers.
///
/// ```json
/// {
///   "code": "PROVISIONAL_TOTALS",
///   "message": "Order totals are provisional: re-quote with a delivery address before committing"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ConfigError,
    InvalidInput,
    ValidationError,
    ProvisionalTotals,
    PromoExhausted,
    CartError,
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        let code = match err {
            AppError::Config(_) | AppError::InvalidConfig(_) => ErrorCode::ConfigError,
            AppError::Json(_) => ErrorCode::InvalidInput,
            AppError::Io(e) => {
                tracing::error!("I/O failure: {}", e);
                ErrorCode::Internal
            }
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::EmptyCart => ErrorCode::CartError,
            AppError::Core(core) => match core {
                CoreError::ProvisionalTotals => ErrorCode::ProvisionalTotals,
                CoreError::PromoExhausted { .. } => ErrorCode::PromoExhausted,
                CoreError::CartTooLarge { .. } => ErrorCode::CartError,
                CoreError::Validation(_) => ErrorCode::ValidationError,
            },
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError::from(&err)
    }
}

/// Body for any CLI failure: `AppError`s keep their code, anything else is
/// `INTERNAL` with the full context chain as the message.
impl From<&anyhow::Error> for ApiError {
    fn from(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<AppError>() {
            Some(app_err) => ApiError::from(app_err),
            None => ApiError::new(ErrorCode::Internal, format!("{:#}", err)),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_codes() {
        let api = ApiError::from(AppError::Core(CoreError::ProvisionalTotals));
        assert_eq!(api.code, ErrorCode::ProvisionalTotals);

        let api = ApiError::from(AppError::Core(CoreError::PromoExhausted {
            code: "WELCOME".to_string(),
            limit: 3,
        }));
        assert_eq!(api.code, ErrorCode::PromoExhausted);
        assert!(api.message.contains("WELCOME"));
    }

    #[test]
    fn test_api_error_serializes_screaming_code() {
        let api = ApiError::from(AppError::EmptyCart);
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "CART_ERROR");
        assert_eq!(json["message"], "Cannot place an order with an empty cart");
    }

    #[test]
    fn test_anyhow_error_keeps_app_code() {
        let err = anyhow::Error::from(AppError::EmptyCart).context("placing order");
        assert_eq!(ApiError::from(&err).code, ErrorCode::CartError);
    }

    #[test]
    fn test_foreign_error_is_internal() {
        let err = anyhow::anyhow!("stdout closed").context("printing response");
        let api = ApiError::from(&err);
        assert_eq!(api.code, ErrorCode::Internal);
        assert_eq!(api.message, "printing response: stdout closed");
    }

    #[test]
    fn test_bad_json_is_invalid_input() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ApiError::from(AppError::from(err)).code, ErrorCode::InvalidInput);
    }
}
