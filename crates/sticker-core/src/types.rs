//! # Domain Types
//!
//! Configuration input and pricing output types.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT (read-only, from the config store)                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  StickerConfig  │──►│   TierTable     │──►│  PricingTier    │       │
//! │  │  variant_id     │   │  (tiers.rs)     │   │  min / max      │       │
//! │  │  base_price     │   └─────────────────┘   │  price_per_unit │       │
//! │  │  is_active      │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  REQUEST              OUTPUT (ephemeral, never persisted)              │
//! │  ┌─────────────────┐  ┌─────────────────┐   ┌─────────────────────┐    │
//! │  │    CartLine     │  │  PricingResult  │   │  CartPricingResult  │    │
//! │  │  variant_id     │  │  unit / total   │   │  sticker_items[]    │    │
//! │  │  quantity       │  │  original       │   │  total_sticker_price│    │
//! │  │  shape?         │  │  savings        │   │  total_savings      │    │
//! │  └─────────────────┘  └─────────────────┘   └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::shape::Shape;
use crate::tiers::{PricingTier, TierTable};

// =============================================================================
// Sticker Config
// =============================================================================

/// Pricing configuration for one sticker variant.
///
/// Owned by the external configuration store; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StickerConfig {
    /// Commerce variant identifier (unique).
    pub variant_id: String,

    /// Base unit price in cents before shape scaling.
    pub base_price: Money,

    /// Inactive configs are ignored by the engine.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Variant-specific tiers. `None` falls back to the default table.
    #[serde(default)]
    #[ts(as = "Option<Vec<PricingTier>>")]
    pub tiers: Option<TierTable>,

    /// Minimum order quantity for this product line. `None` uses the
    /// engine-wide policy.
    #[serde(default)]
    pub minimum_order_quantity: Option<i64>,

    /// When the store last committed this config.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl StickerConfig {
    /// Creates an active config with no variant-specific tiers.
    pub fn new(variant_id: impl Into<String>, base_price: Money) -> Self {
        StickerConfig {
            variant_id: variant_id.into(),
            base_price,
            is_active: true,
            tiers: None,
            minimum_order_quantity: None,
            updated_at: None,
        }
    }

    /// Sets variant-specific tiers.
    pub fn with_tiers(mut self, tiers: TierTable) -> Self {
        self.tiers = Some(tiers);
        self
    }

    /// Sets a product-line minimum order quantity.
    pub fn with_minimum_order_quantity(mut self, moq: i64) -> Self {
        self.minimum_order_quantity = Some(moq);
        self
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// Price breakdown for one quantity against one tier table.
///
/// ## Invariants
/// - `total_price == unit_price × quantity`
/// - `original_price == first tier price × quantity`
/// - `savings == original_price - total_price`, never negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
    pub applied_tier: PricingTier,
    /// What the order would cost at the list (first-tier) price.
    pub original_price: Money,
    pub savings: Money,
}

// =============================================================================
// Shape Pricing Result
// =============================================================================

/// Price breakdown for a custom-shape order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShapePricingResult {
    #[serde(flatten)]
    pub pricing: PricingResult,

    pub shape: Shape,

    /// Printable area in cm².
    pub area_cm2: f64,

    /// Multiplier applied to the base price.
    pub scaling_factor: f64,

    /// Base price before scaling.
    pub base_price: Money,

    /// Base price after scaling; the new list price of the tier table.
    pub adjusted_base_price: Money,

    /// e.g. "Circle • 10cm diameter • 78.5 cm²"
    pub description: String,
}

// =============================================================================
// Cart Types
// =============================================================================

/// One line of a cart as submitted for pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub variant_id: String,
    pub quantity: i64,
    /// Custom shape, when the customer sized the sticker themselves.
    #[serde(default)]
    pub shape: Option<Shape>,
}

impl CartLine {
    /// Creates a line without shape metadata.
    pub fn new(variant_id: impl Into<String>, quantity: i64) -> Self {
        CartLine {
            variant_id: variant_id.into(),
            quantity,
            shape: None,
        }
    }

    /// Attaches a custom shape.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Priced sticker line in a cart breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StickerLineResult {
    pub variant_id: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
    pub applied_tier: PricingTier,
    pub savings: Money,
    /// Human-readable shape description for shaped lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_description: Option<String>,
}

impl StickerLineResult {
    pub(crate) fn from_pricing(variant_id: &str, pricing: PricingResult) -> Self {
        StickerLineResult {
            variant_id: variant_id.to_string(),
            quantity: pricing.quantity,
            unit_price: pricing.unit_price,
            total_price: pricing.total_price,
            applied_tier: pricing.applied_tier,
            savings: pricing.savings,
            shape_description: None,
        }
    }

    pub(crate) fn from_shape_pricing(variant_id: &str, result: ShapePricingResult) -> Self {
        StickerLineResult {
            shape_description: Some(result.description),
            ..StickerLineResult::from_pricing(variant_id, result.pricing)
        }
    }
}

/// Sticker pricing across a whole cart.
///
/// Non-sticker lines are not priced here; they are only counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartPricingResult {
    /// Sticker lines in input order.
    pub sticker_items: Vec<StickerLineResult>,
    pub total_sticker_price: Money,
    pub total_savings: Money,
    /// Number of non-sticker lines left untouched.
    pub passthrough_items: usize,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticker_config_defaults_from_json() {
        let json = r#"{"variantId":"STICKER-DIECUT","basePrice":100}"#;
        let config: StickerConfig = serde_json::from_str(json).unwrap();
        assert!(config.is_active);
        assert!(config.tiers.is_none());
        assert!(config.minimum_order_quantity.is_none());
        assert_eq!(config.base_price.cents(), 100);
    }

    #[test]
    fn test_sticker_config_rejects_malformed_tiers() {
        let json = r#"{"variantId":"S","basePrice":100,
                       "tiers":[{"minQuantity":1,"maxQuantity":9,"pricePerUnit":100}]}"#;
        assert!(serde_json::from_str::<StickerConfig>(json).is_err());
    }

    #[test]
    fn test_pricing_result_serializes_camel_case() {
        let result = PricingResult {
            quantity: 10,
            unit_price: Money::from_cents(90),
            total_price: Money::from_cents(900),
            applied_tier: PricingTier::bounded(10, 49, 90),
            original_price: Money::from_cents(1000),
            savings: Money::from_cents(100),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["unitPrice"], 90);
        assert_eq!(value["appliedTier"]["maxQuantity"], 49);
        assert_eq!(value["savings"], 100);
    }

    #[test]
    fn test_cart_line_shape_is_optional() {
        let line: CartLine =
            serde_json::from_str(r#"{"variantId":"MUG-01","quantity":2}"#).unwrap();
        assert_eq!(line, CartLine::new("MUG-01", 2));
    }
}
