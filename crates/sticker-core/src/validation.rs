//! # Validation Module
//!
//! Quantity and identifier validation, run before any pricing.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request boundary (sticker-quote)                             │
//! │  ├── JSON shape, integral quantities                                   │
//! │  └── Free-form dimensions → closed Shape                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── quantity > 0 and ≤ MAX_ORDER_QUANTITY                             │
//! │  └── quantity ≥ MOQ of the product line                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Resolvers (pricing.rs, shape.rs)                             │
//! │  └── Re-check positivity; never trust unvalidated input                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sticker_core::validation::QuantityValidator;
//!
//! let validator = QuantityValidator::default(); // MOQ 500
//! assert!(validator.validate(500).is_ok());
//! assert!(validator.validate(499).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::CartLine;
use crate::{DEFAULT_MINIMUM_ORDER_QUANTITY, MAX_ORDER_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Quantity Validator
// =============================================================================

/// Enforces positivity and a minimum order quantity.
///
/// The MOQ is a value, not a global: each product line can carry its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityValidator {
    minimum_order_quantity: i64,
}

impl QuantityValidator {
    /// Creates a validator with the given MOQ. Values below 1 are raised to 1.
    pub fn new(minimum_order_quantity: i64) -> Self {
        QuantityValidator {
            minimum_order_quantity: minimum_order_quantity.max(1),
        }
    }

    /// Returns the minimum order quantity.
    #[inline]
    pub fn minimum_order_quantity(&self) -> i64 {
        self.minimum_order_quantity
    }

    /// Validates an order quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  Product page: quantity input                                          │
    /// │                                                                         │
    /// │  Customer enters: 250                                                   │
    /// │       │                                                                 │
    /// │       ▼                                                                 │
    /// │  validate(250) ← THIS FUNCTION                                         │
    /// │       │                                                                 │
    /// │       ├── qty <= 0?   → InvalidQuantity                                │
    /// │       ├── qty > 10M?  → OutOfRange                                     │
    /// │       ├── qty < MOQ?  → BelowMinimumOrderQuantity (MOQ_NOT_MET)        │
    /// │       │                                                                 │
    /// │       └── OK → price it                                                │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn validate(&self, quantity: i64) -> ValidationResult<()> {
        validate_quantity(quantity)?;

        if quantity < self.minimum_order_quantity {
            return Err(ValidationError::BelowMinimumOrderQuantity {
                quantity,
                minimum: self.minimum_order_quantity,
            });
        }

        Ok(())
    }

    /// Validates every line against this validator's MOQ.
    ///
    /// See [`validate_cart_quantities`] for per-line MOQ.
    pub fn validate_cart_quantities<'a, I>(&self, lines: I) -> CoreResult<()>
    where
        I: IntoIterator<Item = &'a CartLine>,
    {
        validate_cart_quantities(lines, |_| *self)
    }
}

impl Default for QuantityValidator {
    fn default() -> Self {
        QuantityValidator::new(DEFAULT_MINIMUM_ORDER_QUANTITY)
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Checks that a quantity is a usable whole number, ignoring MOQ.
///
/// The resolvers call this themselves so they stay safe even when invoked
/// without a validator in front of them.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::invalid_quantity(quantity));
    }

    if quantity > MAX_ORDER_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ORDER_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart lines in order, stopping at the first failure.
///
/// `validator_for` supplies the validator for each variant, so lines from
/// different product lines can carry different MOQs. The error names the
/// offending variant.
///
/// ## Example
/// ```rust
/// use sticker_core::types::CartLine;
/// use sticker_core::validation::{validate_cart_quantities, QuantityValidator};
///
/// let lines = vec![CartLine::new("A", 600), CartLine::new("B", 20)];
/// let err = validate_cart_quantities(&lines, |_| QuantityValidator::new(500)).unwrap_err();
/// assert!(err.to_string().starts_with("B:"));
/// ```
pub fn validate_cart_quantities<'a, I, F>(lines: I, validator_for: F) -> CoreResult<()>
where
    I: IntoIterator<Item = &'a CartLine>,
    F: Fn(&str) -> QuantityValidator,
{
    for line in lines {
        validator_for(&line.variant_id)
            .validate(line.quantity)
            .map_err(|e| CoreError::for_line(line.variant_id.as_str(), e))?;
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Maximum length of a variant identifier.
pub const MAX_VARIANT_ID_LEN: usize = 255;

/// Validates a variant identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 255 characters
/// - Letters, digits and `-` `_` `:` `/` `.` only, so commerce GIDs such as
///   `gid://shop/ProductVariant/42` are accepted
///
/// ## Example
/// ```rust
/// use sticker_core::validation::validate_variant_id;
///
/// assert!(validate_variant_id("STICKER-DIECUT").is_ok());
/// assert!(validate_variant_id("gid://shop/ProductVariant/42").is_ok());
/// assert!(validate_variant_id("").is_err());
/// assert!(validate_variant_id("has space").is_err());
/// ```
pub fn validate_variant_id(variant_id: &str) -> ValidationResult<()> {
    let variant_id = variant_id.trim();

    if variant_id.is_empty() {
        return Err(ValidationError::Required {
            field: "variantId".to_string(),
        });
    }

    if variant_id.len() > MAX_VARIANT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "variantId".to_string(),
            max: MAX_VARIANT_ID_LEN,
        });
    }

    if !variant_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '/' | '.'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "variantId".to_string(),
            reason: "must contain only letters, numbers and - _ : / .".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
