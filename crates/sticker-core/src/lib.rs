//! # sticker-core: Pure Pricing Logic for Sticker Orders
//!
//! This crate is the **heart** of the sticker pricing engine. It contains all
//! pricing rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Sticker Pricing Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                apps/sticker-quote (boundary + CLI)              │   │
//! │  │    JSON request ──► QuoteHandler ──► JSON response / error      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sticker-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   tiers   │  │  pricing  │  │   shape   │  │  engine   │  │   │
//! │  │   │ TierTable │  │ base tier │  │ area ×    │  │ cart +    │  │   │
//! │  │   │           │  │ resolver  │  │ scaling   │  │ classify  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO GLOBAL STATE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────▲───────────────────────────────────┘   │
//! │                                │ ConfigProvider                         │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │              sticker-config (settings + catalog store)          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`tiers`] - Validated quantity tier tables
//! - [`validation`] - Quantity and MOQ checks
//! - [`pricing`] - Base pricing resolver
//! - [`scaling`] - Area scaling strategies
//! - [`shape`] - Shapes and the shape pricing resolver
//! - [`classifier`] - Sticker / non-sticker classification
//! - [`provider`] - Read-only configuration access
//! - [`engine`] - Single-item quotes and cart aggregation
//! - [`types`] - Configuration and result types
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, bit for bit
//! 2. **No I/O**: configuration arrives through [`provider::ConfigProvider`]
//! 3. **Integer Money**: prices are cents (i64); floats only for area and
//!    the scaling factor, rounded once
//! 4. **Explicit Errors**: never a zero price on failure
//!
//! ## Example Usage
//!
//! ```rust
//! use sticker_core::pricing::calculate_pricing;
//! use sticker_core::tiers::TierTable;
//! use sticker_core::validation::QuantityValidator;
//!
//! QuantityValidator::default().validate(500).unwrap();
//!
//! let result = calculate_pricing(500, &TierTable::reference()).unwrap();
//! assert_eq!(result.unit_price.cents(), 50);
//! assert_eq!(result.total_price.cents(), 25_000);
//! assert_eq!(result.savings.cents(), 25_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classifier;
pub mod engine;
pub mod error;
pub mod money;
pub mod pricing;
pub mod provider;
pub mod scaling;
pub mod shape;
pub mod tiers;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use classifier::{ProviderClassifier, VariantClassifier, VariantSet};
pub use engine::{PricingEngine, PricingPolicy};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use provider::ConfigProvider;
pub use scaling::{ScalingConfig, ScalingModel, ScalingParams, ScalingStrategy};
pub use shape::{Shape, ShapeKind};
pub use tiers::{PricingTier, TierTable};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum order quantity for product lines that do not set their own.
pub const DEFAULT_MINIMUM_ORDER_QUANTITY: i64 = 500;

/// Largest quantity accepted for a single line.
///
/// ## Business Reason
/// Catches typos (an extra zero or two) and keeps `unit × quantity` far
/// from i64 overflow.
pub const MAX_ORDER_QUANTITY: i64 = 10_000_000;

/// Maximum lines in a single cart.
pub const MAX_CART_LINES: usize = 100;
