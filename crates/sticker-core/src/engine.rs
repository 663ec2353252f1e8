//! # Pricing Engine
//!
//! Ties the resolvers to a configuration provider and a classifier.
//!
//! ## Cart Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  calculate_cart_pricing([STICKER-A × 600, MUG × 1, STICKER-B × 750])   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Size check          > MAX_CART_LINES?        → CartTooLarge        │
//! │  2. Classify            MUG is not a sticker     → passthrough (1)     │
//! │  3. Validate each line  MOQ, then shape          → first failure aborts│
//! │  4. Price each line     shape? → shape resolver  : base resolver       │
//! │  5. Sum (checked)       total_sticker_price, total_savings             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A cart is priced in full or not at all. Every error raised for a line is
//! wrapped in [`CoreError::CartLine`] naming the variant.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::classifier::{ProviderClassifier, VariantClassifier};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::calculate_pricing;
use crate::provider::ConfigProvider;
use crate::scaling::ScalingConfig;
use crate::shape::{calculate_shape_pricing, Shape};
use crate::tiers::TierTable;
use crate::types::{CartLine, CartPricingResult, PricingResult, ShapePricingResult, StickerLineResult};
use crate::validation::{QuantityValidator, ValidationResult};
use crate::{DEFAULT_MINIMUM_ORDER_QUANTITY, MAX_CART_LINES};

// =============================================================================
// Policy
// =============================================================================

/// Engine-wide pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// MOQ for product lines that do not set their own.
    #[serde(default = "default_moq")]
    pub minimum_order_quantity: i64,

    #[serde(default)]
    pub scaling: ScalingConfig,
}

fn default_moq() -> i64 {
    DEFAULT_MINIMUM_ORDER_QUANTITY
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            minimum_order_quantity: DEFAULT_MINIMUM_ORDER_QUANTITY,
            scaling: ScalingConfig::default(),
        }
    }
}

impl PricingPolicy {
    pub fn validate(&self) -> CoreResult<()> {
        if self.minimum_order_quantity < 1 {
            return Err(ValidationError::OutOfRange {
                field: "minimumOrderQuantity".to_string(),
                min: 1,
                max: crate::MAX_ORDER_QUANTITY,
            }
            .into());
        }
        self.scaling.validate()
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Stateless pricing over a provider `P` and a classifier `C`.
///
/// The engine holds no mutable state; share it behind an `Arc` and call it
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct PricingEngine<P, C> {
    provider: P,
    classifier: C,
    policy: PricingPolicy,
}

impl<P, C> PricingEngine<P, C>
where
    P: ConfigProvider,
    C: VariantClassifier,
{
    /// Creates an engine after validating `policy`.
    pub fn new(provider: P, classifier: C, policy: PricingPolicy) -> CoreResult<Self> {
        policy.validate()?;
        Ok(PricingEngine {
            provider,
            classifier,
            policy,
        })
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_sticker_variant(&self, variant_id: &str) -> bool {
        self.classifier.is_sticker_variant(variant_id)
    }

    /// Validator carrying the variant's product-line MOQ.
    pub fn validator_for(&self, variant_id: &str) -> QuantityValidator {
        let moq = self
            .provider
            .active_config(variant_id)
            .and_then(|config| config.minimum_order_quantity)
            .unwrap_or(self.policy.minimum_order_quantity);
        QuantityValidator::new(moq)
    }

    /// Effective tier table for a variant.
    pub fn tiers_for_variant(&self, variant_id: &str) -> CoreResult<TierTable> {
        self.provider.tiers_for_variant(variant_id)
    }

    // -------------------------------------------------------------------------
    // Single Items
    // -------------------------------------------------------------------------

    /// Prices a plain (unshaped) order for one variant.
    ///
    /// The quantity is validated before the variant is looked up.
    pub fn quote_variant(&self, variant_id: &str, quantity: i64) -> CoreResult<PricingResult> {
        self.validator_for(variant_id).validate(quantity)?;
        let tiers = self.tiers_for_variant(variant_id)?;
        calculate_pricing(quantity, &tiers)
    }

    /// Prices a custom-shape order.
    ///
    /// Without a variant the default tier table and engine MOQ apply, and
    /// the table's list price serves as base price. Quantity and shape are
    /// validated before any configuration is read.
    pub fn quote_shape(
        &self,
        variant_id: Option<&str>,
        quantity: i64,
        shape: &Shape,
    ) -> CoreResult<ShapePricingResult> {
        let validator = match variant_id {
            Some(id) => self.validator_for(id),
            None => QuantityValidator::new(self.policy.minimum_order_quantity),
        };
        validator.validate(quantity)?;
        shape.validate()?;

        let (tiers, base_price) = match variant_id {
            Some(id) => {
                let tiers = self.tiers_for_variant(id)?;
                let base_price = self.base_price_for(id, &tiers);
                (tiers, base_price)
            }
            None => {
                let tiers = self.provider.default_tiers().ok_or_else(|| {
                    CoreError::MalformedTierTable {
                        reason: "no default tier table is configured".to_string(),
                    }
                })?;
                let base_price = tiers.list_price();
                (tiers, base_price)
            }
        };

        calculate_shape_pricing(quantity, shape, base_price, &tiers, &self.policy.scaling)
    }

    // -------------------------------------------------------------------------
    // Carts
    // -------------------------------------------------------------------------

    /// Validates sticker lines in input order, stopping at the first failure.
    ///
    /// Each line is checked against its product line's MOQ, then its shape.
    /// Non-sticker lines are skipped.
    pub fn validate_cart_quantities(&self, lines: &[CartLine]) -> CoreResult<()> {
        for line in self.sticker_lines(lines) {
            self.validate_line(line)
                .map_err(|e| CoreError::for_line(line.variant_id.as_str(), e))?;
        }
        Ok(())
    }

    /// Prices every sticker line in a cart.
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::{CartLine, PricingEngine, PricingPolicy, StickerConfig, Money};
    /// use sticker_core::provider::StaticProvider;
    /// use sticker_core::tiers::TierTable;
    ///
    /// let provider = StaticProvider::new()
    ///     .with_config(StickerConfig::new("STICKER-STD", Money::from_cents(100)))
    ///     .with_default_tiers(TierTable::reference());
    /// let engine = PricingEngine::with_provider(provider, PricingPolicy::default()).unwrap();
    ///
    /// let cart = vec![CartLine::new("STICKER-STD", 500), CartLine::new("MUG-01", 2)];
    /// let result = engine.calculate_cart_pricing(&cart).unwrap();
    /// assert_eq!(result.sticker_items.len(), 1);
    /// assert_eq!(result.total_sticker_price.cents(), 25_000);
    /// assert_eq!(result.passthrough_items, 1);
    /// ```
    pub fn calculate_cart_pricing(&self, lines: &[CartLine]) -> CoreResult<CartPricingResult> {
        if lines.len() > MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.validate_cart_quantities(lines)?;

        let sticker_items = self
            .sticker_lines(lines)
            .map(|line| {
                self.price_line(line)
                    .map_err(|e| CoreError::for_line(line.variant_id.as_str(), e))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let total_sticker_price =
            Money::checked_sum(sticker_items.iter().map(|item| item.total_price)).ok_or_else(
                || CoreError::price_out_of_range("cart total exceeds the money range"),
            )?;
        let total_savings = Money::checked_sum(sticker_items.iter().map(|item| item.savings))
            .ok_or_else(|| CoreError::price_out_of_range("cart savings exceed the money range"))?;

        Ok(CartPricingResult {
            passthrough_items: lines.len() - sticker_items.len(),
            sticker_items,
            total_sticker_price,
            total_savings,
        })
    }

    fn sticker_lines<'a>(&'a self, lines: &'a [CartLine]) -> impl Iterator<Item = &'a CartLine> + 'a {
        lines
            .iter()
            .filter(move |line| self.classifier.is_sticker_variant(&line.variant_id))
    }

    fn validate_line(&self, line: &CartLine) -> ValidationResult<()> {
        self.validator_for(&line.variant_id).validate(line.quantity)?;
        if let Some(shape) = &line.shape {
            shape.validate()?;
        }
        Ok(())
    }

    fn price_line(&self, line: &CartLine) -> CoreResult<StickerLineResult> {
        let tiers = self.tiers_for_variant(&line.variant_id)?;

        match &line.shape {
            Some(shape) => {
                let base_price = self.base_price_for(&line.variant_id, &tiers);
                let result = calculate_shape_pricing(
                    line.quantity,
                    shape,
                    base_price,
                    &tiers,
                    &self.policy.scaling,
                )?;
                Ok(StickerLineResult::from_shape_pricing(&line.variant_id, result))
            }
            None => {
                let result = calculate_pricing(line.quantity, &tiers)?;
                Ok(StickerLineResult::from_pricing(&line.variant_id, result))
            }
        }
    }

    fn base_price_for(&self, variant_id: &str, tiers: &TierTable) -> Money {
        self.provider
            .active_config(variant_id)
            .map(|config| config.base_price)
            .unwrap_or_else(|| tiers.list_price())
    }
}

impl<P> PricingEngine<P, ProviderClassifier<P>>
where
    P: ConfigProvider + Clone,
{
    /// Engine that treats every active configured variant as a sticker.
    pub fn with_provider(provider: P, policy: PricingPolicy) -> CoreResult<Self> {
        let classifier = ProviderClassifier::new(provider.clone());
        PricingEngine::new(provider, classifier, policy)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
