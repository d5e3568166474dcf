//! # API Error Type
//!
//! What the shell prints when a command fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  > checkout                                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  session.begin_checkout()                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  SessionError::Core(CoreError::EmptyCart)                               │
//! │         │  From<SessionError>                                           │
//! │         ▼                                                               │
//! │  {"code":"EMPTY_CART","message":"Cart is empty. Add some products..."} │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use storefront_core::CoreError;
use storefront_session::SessionError;

/// Error returned from shell commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable message for the alert
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown product id
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Checkout attempted with an empty cart
    EmptyCart,

    /// Checkout already running, or control sent with none running
    CheckoutConflict,

    /// Checkout ended without an outcome
    CheckoutAborted,

    /// Unparsable command line
    InvalidCommand,

    /// Config could not be loaded or saved
    ConfigError,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if !err.is_user_facing() {
            tracing::warn!("Command rejected: {}", err);
        }

        match err {
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, err.to_string()),
            CoreError::CheckoutInProgress | CoreError::NoCheckoutInProgress => {
                ApiError::new(ErrorCode::CheckoutConflict, err.to_string())
            }
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Core(e) => ApiError::from(e),
            SessionError::CheckoutAborted => {
                ApiError::new(ErrorCode::CheckoutAborted, err.to_string())
            }
            e if e.is_config_error() => ApiError::new(ErrorCode::ConfigError, e.to_string()),
            e => {
                tracing::error!("Session error: {}", e);
                ApiError::internal(e.to_string())
            }
        }
    }
}

/// Keeps the first line of clap's report; usage and tips are left for `help`.
impl From<clap::Error> for ApiError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.to_string();
        let first_line = rendered.lines().next().unwrap_or_default();
        let message = first_line.strip_prefix("error: ").unwrap_or(first_line);
        ApiError::new(ErrorCode::InvalidCommand, message.trim())
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
    use storefront_core::error::EMPTY_CART_MESSAGE;

    #[test]
    fn test_empty_cart_serialization() {
        let err = ApiError::from(SessionError::Core(CoreError::EmptyCart));
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "EMPTY_CART");
        assert_eq!(json["message"], EMPTY_CART_MESSAGE);
    }

    #[test]
    fn test_not_found_mapping() {
        let err = ApiError::from(CoreError::ProductNotFound(42));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: 42");
    }

    #[test]
    fn test_clap_error_mapping() {
        let err = crate::parse::Command::parse("teleport").unwrap_err();
        let api = ApiError::from(err);

        assert_eq!(api.code, ErrorCode::InvalidCommand);
        assert!(api.message.contains("teleport"));
        assert!(!api.message.contains('\n'));
    }

    #[test]
    fn test_quantity_bound_is_a_validation_error() {
        let err = ApiError::from(CoreError::Validation(
            storefront_core::ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: 999,
            },
        ));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "quantity must be between 1 and 999");
    }

    #[test]
    fn test_session_error_mapping() {
        assert_eq!(
            ApiError::from(SessionError::CheckoutAborted).code,
            ErrorCode::CheckoutAborted
        );
        assert_eq!(
            ApiError::from(SessionError::InvalidConfig("x".into())).code,
            ErrorCode::ConfigError
        );
        assert_eq!(
            ApiError::from(SessionError::ChannelError("closed".into())).code,
            ErrorCode::Internal
        );
    }
}
