//! # Validation Module
//!
//! Input validation for cart operations, catalog search and the sign-in /
//! sign-up forms.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Mobile UI                                                     │
//! │  ├── Disables "-" at quantity 1, disables Checkout while running       │
//! │  └── Immediate feedback                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Same rules, enforced where the state actually changes             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use storefront_core::validation::{validate_credentials, validate_quantity};
//!
//! assert!(validate_quantity(1).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_quantity(1_000).is_err());
//! assert!(validate_credentials("john@localhost", "x").is_ok());
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest search query accepted.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

/// Largest quantity a single cart line may hold.
pub const MAX_ITEM_QUANTITY: i64 = 999;

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a quantity passed to `add_item`, or the quantity a line would
/// end up holding.
///
/// Adding zero or a negative amount is a caller bug, not a removal; removal
/// goes through `update_quantity` or `remove_item`.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Search Validators
// =============================================================================

/// Validates a search query and returns it trimmed.
///
/// An empty query is fine: it means "show everything".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Account Validators
// =============================================================================

fn require(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates sign-in input.
///
/// The auth service is a mock, so any non-empty pair is accepted.
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult<()> {
    require("email", email)?;
    require("password", password)
}

/// The sign-up form as the UI submits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accepted_terms: bool,
}

/// Validates the sign-up form.
///
/// ## Rules (checked in this order)
/// 1. Every text field filled in
/// 2. Password and confirmation identical
/// 3. Terms accepted
pub fn validate_registration(form: &RegistrationForm) -> ValidationResult<()> {
    require("name", &form.name)?;
    require("email", &form.email)?;
    require("password", &form.password)?;
    require("confirm password", &form.confirm_password)?;

    if form.password != form.confirm_password {
        return Err(ValidationError::Mismatch {
            field: "confirm password".to_string(),
            other: "password".to_string(),
        });
    }

    if !form.accepted_terms {
        return Err(ValidationError::NotAccepted {
            field: "terms and conditions".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> RegistrationForm {
        RegistrationForm {
            name: "Jane Roe".to_string(),
            email: "jane@example.com".to_string(),
            password: "hunter22".to_string(),
            confirm_password: "hunter22".to_string(),
            accepted_terms: true,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(250).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert_eq!(
            validate_quantity(MAX_ITEM_QUANTITY + 1),
            Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_ITEM_QUANTITY,
            })
        );
        assert!(validate_quantity(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(129_900).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  sony ").unwrap(), "sony");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
        assert!(validate_search_query(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("a@b.co", "secret").is_ok());
        assert!(validate_credentials("john@localhost", "secret").is_ok());
        assert!(validate_credentials("not-an-email", "secret").is_ok());
        assert_eq!(
            validate_credentials("", "secret"),
            Err(ValidationError::Required {
                field: "email".to_string()
            })
        );
        assert_eq!(
            validate_credentials("a@b.co", "   "),
            Err(ValidationError::Required {
                field: "password".to_string()
            })
        );
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration(&filled_form()).is_ok());

        let mut form = filled_form();
        form.name.clear();
        assert_eq!(
            validate_registration(&form),
            Err(ValidationError::Required {
                field: "name".to_string()
            })
        );

        let mut form = filled_form();
        form.email = "jane".to_string();
        assert!(validate_registration(&form).is_ok());

        let mut form = filled_form();
        form.confirm_password = "hunter23".to_string();
        assert!(matches!(
            validate_registration(&form),
            Err(ValidationError::Mismatch { .. })
        ));

        let mut form = filled_form();
        form.accepted_terms = false;
        assert!(matches!(
            validate_registration(&form),
            Err(ValidationError::NotAccepted { .. })
        ));
    }
}
