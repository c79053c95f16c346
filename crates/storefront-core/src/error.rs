//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Order commit / promo lifecycle violations      │
//! │  └── ValidationError  - Admin input validation failures                │
//! │                                                                         │
//! │  checkout-cli errors (separate crate)                                  │
//! │  └── AppError         - Config, IO, JSON, wraps CoreError              │
//! │                                                                         │
//! │  NOT errors:                                                            │
//! │  • Malformed checkout numbers  → clamped to zero                        │
//! │  • Unknown currency code       → rate 1, flagged `fallback`             │
//! │  • Promo ineligibility         → `promo::Ineligibility`, discount 0     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, limit, field)
//! 3. Pricing itself never fails

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Totals were computed before a delivery address was known.
    ///
    /// ## When This Occurs
    /// ```text
    /// Cart screen (no address) ──► quote: provisional = true
    ///      │
    ///      ▼
    /// Place order tapped without re-quoting
    ///      │
    ///      ▼
    /// ensure_final() ──► ProvisionalTotals
    /// ```
    #[error("Order totals are provisional: re-quote with a delivery address before committing")]
    ProvisionalTotals,

    /// Promo redemption would exceed its usage limit.
    #[error("Promo code {code} has reached its usage limit of {limit}")]
    PromoExhausted { code: String, limit: u32 },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for admin input (promo creation, configuration), never for the
/// checkout form state that pricing clamps.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
