//! # Validation Module
//!
//! Input validation for admin forms and configuration.
//!
//! ## Validate vs Clamp
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two Input Policies                                 │
//! │                                                                         │
//! │  Checkout form state (cart, quantities, prices)                         │
//! │  ├── Edited on every keystroke                                          │
//! │  └── CLAMPED to zero, never rejected (see money / types)                │
//! │                                                                         │
//! │  Admin input (promo creation) and pricing configuration                 │
//! │  ├── Submitted once                                                     │
//! │  └── THIS MODULE: rejected with a ValidationError                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_promo_code, validate_currency_code};
//!
//! assert_eq!(validate_promo_code(" welcome10 ").unwrap(), "WELCOME10");
//! assert_eq!(validate_currency_code("usd").unwrap().as_str(), "USD");
//! ```

use crate::error::ValidationError;
use crate::money::{Money, MAX_FORM_AMOUNT_MAJOR};
use crate::types::CurrencyCode;
use crate::MAX_CART_ITEMS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a promo code and returns it upper-cased.
///
/// ## Rules
/// - Must not be empty
/// - Between 3 and 32 characters
/// - Only letters, digits, hyphens, underscores
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_promo_code;
///
/// assert!(validate_promo_code("BLACK-FRIDAY").is_ok());
/// assert!(validate_promo_code("").is_err());
/// assert!(validate_promo_code("10 OFF").is_err());
/// ```
pub fn validate_promo_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "code".to_string(),
            min: 3,
        });
    }

    if code.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 32,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

/// Validates an ISO 4217 currency code (three ASCII letters).
pub fn validate_currency_code(code: &str) -> ValidationResult<CurrencyCode> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be a three-letter ISO 4217 code".to_string(),
        });
    }

    Ok(CurrencyCode::new(code))
}

/// Validates a product reference.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
pub fn validate_product_ref(product_id: &str) -> ValidationResult<()> {
    let product_id = product_id.trim();

    if product_id.is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    if product_id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "product_id".to_string(),
            max: 64,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a promo discount fraction.
///
/// ## Rules
/// - Finite
/// - Greater than 0 and at most 1 (100%)
pub fn validate_discount_fraction(fraction: f64) -> ValidationResult<()> {
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err(ValidationError::OutOfRange {
            field: "discount_fraction".to_string(),
            min: 0,
            max: 1,
        });
    }

    Ok(())
}

/// Validates an admin-entered amount in major units and converts it.
///
/// ## Rules
/// - Finite and non-negative
/// - At most `MAX_FORM_AMOUNT_MAJOR`
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::validation::validate_form_amount;
///
/// assert_eq!(validate_form_amount("cap", 800.0).unwrap(), Money::from_major(800));
/// assert!(validate_form_amount("cap", -1.0).is_err());
/// assert!(validate_form_amount("cap", f64::NAN).is_err());
/// assert!(validate_form_amount("cap", 1e11).is_err());
/// ```
pub fn validate_form_amount(field: &str, amount: f64) -> ValidationResult<Money> {
    if !amount.is_finite() || !(0.0..=MAX_FORM_AMOUNT_MAJOR).contains(&amount) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_FORM_AMOUNT_MAJOR as i64,
        });
    }

    Ok(Money::from_major_lossy(amount))
}

/// Validates a rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_rate_bps(field: &str, bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates an exchange rate (units of display currency per base unit).
pub fn validate_exchange_rate(code: &str, rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: format!("rate for {}", code),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of lines).
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS (100)
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
