//! # Error Types
//!
//! Domain-specific error types for sticker-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sticker-core errors (this file)                                       │
//! │  ├── CoreError        - Pricing and configuration-integrity failures   │
//! │  └── ValidationError  - Input validation failures (quantity, shape)    │
//! │                                                                         │
//! │  sticker-config errors (separate crate)                                │
//! │  └── ConfigError      - Settings file / catalog loading failures       │
//! │                                                                         │
//! │  sticker-quote errors (request boundary)                               │
//! │  └── ApiError         - What the caller sees (code + message)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ConfigError/ApiError → Caller     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Kinds of Failure
//! - **Recoverable**: the customer fixes the input (quantity, shape) and retries.
//! - **Configuration faults**: tier data or scaling parameters are broken.
//!   Retrying never helps; the caller should log and alert.
//!   See [`CoreError::is_configuration_fault`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing engine errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No tier covers the requested quantity.
    ///
    /// ## When This Occurs
    /// - The tier table starts above 1 and a smaller quantity was requested
    /// - Should never happen for a table that starts at 1 and ends open-ended
    ///
    /// Always a configuration fault, never a user error.
    #[error("No pricing tier covers quantity {quantity}")]
    NoTierMatched { quantity: i64 },

    /// No configuration exists for the variant and no default table applies.
    #[error("Unknown sticker variant: {0}")]
    UnknownVariant(String),

    /// Tier data violates the table invariants (gaps, overlaps, ordering).
    #[error("Malformed tier table: {reason}")]
    MalformedTierTable { reason: String },

    /// Shape scaling parameters are unusable.
    #[error("Invalid scaling parameters: {reason}")]
    InvalidScaling { reason: String },

    /// A price or total does not fit in the money range.
    ///
    /// ## When This Occurs
    /// - A huge custom area scales the base price past i64 cents
    /// - Unit price × quantity, or a cart total, overflows
    ///
    /// Not a configuration fault; the caller can retry with a smaller order.
    #[error("Price out of range: {reason}")]
    PriceOutOfRange { reason: String },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// A cart line failed; carries the offending variant.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: [STICKER-A × 600, STICKER-B × 20, MUG × 1]
    ///      │
    ///      ▼
    /// validate STICKER-A ✓ → validate STICKER-B ✗ (MOQ 500)
    ///      │
    ///      ▼
    /// CartLine { variant_id: "STICKER-B", source: BelowMinimumOrderQuantity }
    ///      │
    ///      ▼
    /// UI shows: "STICKER-B: Minimum order quantity is 500, requested 20"
    /// ```
    #[error("{variant_id}: {source}")]
    CartLine {
        variant_id: String,
        #[source]
        source: Box<CoreError>,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Wraps an error with the cart line it came from.
    pub fn for_line(variant_id: impl Into<String>, source: impl Into<CoreError>) -> Self {
        CoreError::CartLine {
            variant_id: variant_id.into(),
            source: Box::new(source.into()),
        }
    }

    /// Returns true when the error points at broken configuration rather
    /// than bad customer input.
    pub fn is_configuration_fault(&self) -> bool {
        match self {
            CoreError::NoTierMatched { .. }
            | CoreError::MalformedTierTable { .. }
            | CoreError::InvalidScaling { .. } => true,
            CoreError::CartLine { source, .. } => source.is_configuration_fault(),
            _ => false,
        }
    }

    pub(crate) fn price_out_of_range(reason: impl Into<String>) -> Self {
        CoreError::PriceOutOfRange {
            reason: reason.into(),
        }
    }

    /// Strips any `CartLine` wrappers and returns the underlying error.
    pub fn root(&self) -> &CoreError {
        match self {
            CoreError::CartLine { source, .. } => source.root(),
            other => other,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These run before any pricing is computed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Quantity is not a positive whole number.
    #[error("Quantity must be a positive whole number, got {value}")]
    InvalidQuantity { value: String },

    /// Quantity is below the product line's minimum order quantity.
    #[error("Minimum order quantity is {minimum}, requested {quantity}")]
    BelowMinimumOrderQuantity { quantity: i64, minimum: i64 },

    /// A shape dimension is missing, non-positive or not a finite number.
    #[error("Invalid {shape} shape: {reason}")]
    InvalidShape { shape: String, reason: String },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., illegal characters in an identifier).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an InvalidQuantity error from any displayable value.
    pub fn invalid_quantity(value: impl ToString) -> Self {
        ValidationError::InvalidQuantity {
            value: value.to_string(),
        }
    }

    /// Creates an InvalidShape error.
    pub fn invalid_shape(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidShape {
            shape: shape.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
