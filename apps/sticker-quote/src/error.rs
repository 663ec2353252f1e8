//! # API Error Type
//!
//! What the caller sees when a quote fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ──► CoreError ──┐                                     │
//! │                                  ├──► ApiError { code, message }       │
//! │  ConfigError ────────────────────┘            │                        │
//! │                                               ▼                        │
//! │  { "code": "MOQ_NOT_MET",                                              │
//! │    "message": "Minimum order quantity is 500, requested 20" }          │
//! │                                                                         │
//! │  Configuration faults are logged with the real cause and reported      │
//! │  as CONFIGURATION_ERROR with a generic message.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use sticker_config::ConfigError;
use sticker_core::{CoreError, ValidationError};
use ts_rs::TS;

/// API error returned for any failed request.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_SHAPE",
///   "message": "Invalid circle shape: diameter must be a positive number, got 0"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Quantity is not a positive whole number, or out of range
    InvalidQuantity,

    /// Quantity below the product line's minimum order quantity
    MoqNotMet,

    /// Shape unknown, or a dimension missing or not positive
    InvalidShape,

    /// No configuration for the variant
    UnknownVariant,

    /// Variant is not classified as a sticker
    NotASticker,

    /// Too many cart lines
    CartTooLarge,

    /// The order is too large to price; a total would overflow
    PriceOutOfRange,

    /// Tier or scaling data is broken; not the caller's fault
    ConfigurationError,

    /// Malformed request body
    InvalidRequest,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, message)
    }

    pub fn not_a_sticker(variant_id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotASticker,
            format!("{} is not a sticker product", variant_id),
        )
    }

    fn configuration() -> Self {
        ApiError::new(
            ErrorCode::ConfigurationError,
            "Pricing is unavailable due to a configuration error",
        )
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            ValidationError::OutOfRange { field, .. } if field == "quantity" => {
                ErrorCode::InvalidQuantity
            }
            ValidationError::BelowMinimumOrderQuantity { .. } => ErrorCode::MoqNotMet,
            ValidationError::InvalidShape { .. } => ErrorCode::InvalidShape,
            ValidationError::Required { .. }
            | ValidationError::TooLong { .. }
            | ValidationError::OutOfRange { .. }
            | ValidationError::InvalidFormat { .. } => ErrorCode::InvalidRequest,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_configuration_fault() {
            tracing::error!(error = %err, "Pricing configuration fault");
            return ApiError::configuration();
        }

        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::UnknownVariant(id) => ApiError::new(
                ErrorCode::UnknownVariant,
                format!("No pricing configured for variant {}", id),
            ),
            CoreError::PriceOutOfRange { reason } => ApiError::new(
                ErrorCode::PriceOutOfRange,
                format!("Order is too large to price: {}", reason),
            ),
            CoreError::CartTooLarge { max } => ApiError::new(
                ErrorCode::CartTooLarge,
                format!("Cart cannot have more than {} items", max),
            ),
            CoreError::CartLine { variant_id, source } => {
                let inner = ApiError::from(*source);
                ApiError::new(inner.code, format!("{}: {}", variant_id, inner.message))
            }
            // Configuration faults were handled above.
            CoreError::NoTierMatched { .. }
            | CoreError::MalformedTierTable { .. }
            | CoreError::InvalidScaling { .. } => ApiError::configuration(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Core(e) => e.into(),
            other => {
                tracing::error!(error = %other, "Failed to load pricing configuration");
                ApiError::configuration()
            }
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

    fn code_of(err: impl Into<ApiError>) -> ErrorCode {
        err.into().code
    }

    #[test]
    fn test_validation_codes() {
        assert_eq!(
            code_of(ValidationError::invalid_quantity(0)),
            ErrorCode::InvalidQuantity
        );
        assert_eq!(
            code_of(ValidationError::OutOfRange {
                field: "quantity".into(),
                min: 1,
                max: 10
            }),
            ErrorCode::InvalidQuantity
        );
        assert_eq!(
            code_of(ValidationError::BelowMinimumOrderQuantity {
                quantity: 20,
                minimum: 500
            }),
            ErrorCode::MoqNotMet
        );
        assert_eq!(
            code_of(ValidationError::invalid_shape("circle", "missing diameter")),
            ErrorCode::InvalidShape
        );
        assert_eq!(
            code_of(ValidationError::Required {
                field: "variantId".into()
            }),
            ErrorCode::InvalidRequest
        );
    }

    #[test]
    fn test_core_codes() {
        assert_eq!(
            code_of(CoreError::UnknownVariant("X".into())),
            ErrorCode::UnknownVariant
        );
        assert_eq!(
            code_of(CoreError::CartTooLarge { max: 100 }),
            ErrorCode::CartTooLarge
        );
        assert_eq!(
            code_of(CoreError::NoTierMatched { quantity: 3 }),
            ErrorCode::ConfigurationError
        );
    }

    #[test]
    fn test_price_out_of_range_has_its_own_code() {
        let err = CoreError::for_line(
            "STICKER-LUX",
            CoreError::PriceOutOfRange {
                reason: "cart total exceeds the money range".into(),
            },
        );
        let api = ApiError::from(err);
        assert_eq!(api.code, ErrorCode::PriceOutOfRange);
        assert!(api.message.starts_with("STICKER-LUX: Order is too large to price"));

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "PRICE_OUT_OF_RANGE");
    }

    #[test]
    fn test_cart_line_keeps_inner_code_and_names_variant() {
        let err = CoreError::for_line(
            "STICKER-B",
            ValidationError::BelowMinimumOrderQuantity {
                quantity: 20,
                minimum: 500,
            },
        );
        let api = ApiError::from(err);
        assert_eq!(api.code, ErrorCode::MoqNotMet);
        assert_eq!(
            api.message,
            "STICKER-B: Minimum order quantity is 500, requested 20"
        );
    }

    #[test]
    fn test_configuration_fault_hides_details() {
        let err = CoreError::for_line(
            "STICKER-B",
            CoreError::InvalidScaling {
                reason: "factor NaN".into(),
            },
        );
        let api = ApiError::from(err);
        assert_eq!(api.code, ErrorCode::ConfigurationError);
        assert!(!api.message.contains("NaN"));
    }

    #[test]
    fn test_serializes_screaming_snake_case() {
        let json = serde_json::to_value(ApiError::not_a_sticker("MUG-01")).unwrap();
        assert_eq!(json["code"], "NOT_A_STICKER");
        assert_eq!(json["message"], "MUG-01 is not a sticker product");
    }
}
