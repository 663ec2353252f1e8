//! # Shape Pricing Resolver
//!
//! Prices stickers the customer sized themselves.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Circle { diameter: 10 }, quantity 500, base price 100¢                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  area     = π × 5²            = 78.54 cm²                              │
//! │  factor   = f(78.54)          = 2.285    (ScalingStrategy)             │
//! │  adjusted = round(100 × 2.285) = 228¢                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tier table rebased so the first tier costs 228¢                        │
//! │  (every tier keeps its discount ratio: 200+ is 50% → 114¢)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  calculate_pricing(500, rebased)  → unit 114¢, total 570.00            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Size moves the list price; quantity still moves the tier. The two
//! discounts compose multiplicatively and the result carries the usual
//! pricing invariants.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::calculate_pricing;
use crate::scaling::ScalingStrategy;
use crate::tiers::TierTable;
use crate::types::ShapePricingResult;
use crate::validation::{validate_quantity, ValidationResult};

// =============================================================================
// Shape
// =============================================================================

/// A sticker outline with its dimensions in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Rectangle { width: f64, height: f64 },
    Circle { diameter: f64 },
    /// Irregular die-cut outline; the caller supplies the area directly.
    Custom { area: f64 },
}

/// The shape family without dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Custom,
}

impl ShapeKind {
    /// Dimension keys this kind needs, in display order.
    pub fn dimension_keys(&self) -> &'static [&'static str] {
        match self {
            ShapeKind::Rectangle => &["width", "height"],
            ShapeKind::Circle => &["diameter"],
            ShapeKind::Custom => &["area"],
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Rectangle => write!(f, "rectangle"),
            ShapeKind::Circle => write!(f, "circle"),
            ShapeKind::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for ShapeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rectangle" | "square" => Ok(ShapeKind::Rectangle),
            "circle" => Ok(ShapeKind::Circle),
            "custom" => Ok(ShapeKind::Custom),
            other => Err(ValidationError::invalid_shape(
                other,
                "unknown shape. Valid options: rectangle, circle, custom",
            )),
        }
    }
}

impl Shape {
    /// Builds a shape from a kind and a free-form dimension map.
    ///
    /// Unknown keys are ignored. A missing key is an invalid shape.
    ///
    /// ## Example
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use sticker_core::shape::{Shape, ShapeKind};
    ///
    /// let dims = BTreeMap::from([("diameter".to_string(), 10.0)]);
    /// let shape = Shape::from_dimensions(ShapeKind::Circle, &dims).unwrap();
    /// assert_eq!(shape, Shape::Circle { diameter: 10.0 });
    /// ```
    pub fn from_dimensions(
        kind: ShapeKind,
        dimensions: &BTreeMap<String, f64>,
    ) -> ValidationResult<Shape> {
        let get = |key: &str| {
            dimensions.get(key).copied().ok_or_else(|| {
                ValidationError::invalid_shape(kind.to_string(), format!("missing {}", key))
            })
        };

        let shape = match kind {
            ShapeKind::Rectangle => Shape::Rectangle {
                width: get("width")?,
                height: get("height")?,
            },
            ShapeKind::Circle => Shape::Circle {
                diameter: get("diameter")?,
            },
            ShapeKind::Custom => Shape::Custom { area: get("area")? },
        };

        shape.validate()?;
        Ok(shape)
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Custom { .. } => ShapeKind::Custom,
        }
    }

    /// Checks that every dimension is a finite, strictly positive number.
    pub fn validate(&self) -> ValidationResult<()> {
        let dimensions = match *self {
            Shape::Rectangle { width, height } => vec![("width", width), ("height", height)],
            Shape::Circle { diameter } => vec![("diameter", diameter)],
            Shape::Custom { area } => vec![("area", area)],
        };

        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::invalid_shape(
                    self.kind().to_string(),
                    format!("{} must be a positive number, got {}", name, value),
                ));
            }
        }

        Ok(())
    }

    /// Printable area in cm².
    ///
    /// ## Errors
    /// [`ValidationError::InvalidShape`] if a dimension is not positive.
    pub fn area(&self) -> ValidationResult<f64> {
        self.validate()?;

        let area = match *self {
            Shape::Rectangle { width, height } => width * height,
            Shape::Circle { diameter } => PI * (diameter / 2.0).powi(2),
            Shape::Custom { area } => area,
        };

        // Products of tiny dimensions can underflow.
        if area <= 0.0 || !area.is_finite() {
            return Err(ValidationError::invalid_shape(
                self.kind().to_string(),
                "area is out of range",
            ));
        }

        Ok(area)
    }

    /// Human-readable label, e.g. `Circle • 10cm diameter • 78.5 cm²`.
    pub fn describe(&self, area_cm2: f64) -> String {
        match *self {
            Shape::Rectangle { width, height } => {
                format!("Rectangle • {}cm × {}cm • {:.1} cm²", width, height, area_cm2)
            }
            Shape::Circle { diameter } => {
                format!("Circle • {}cm diameter • {:.1} cm²", diameter, area_cm2)
            }
            Shape::Custom { .. } => format!("Custom • {:.1} cm²", area_cm2),
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Prices `quantity` stickers of `shape`.
///
/// `base_price` is the variant's unit price at the reference area and
/// `tiers` its quantity table. MOQ is not checked here.
///
/// ## Errors
/// - `InvalidQuantity` for `quantity <= 0`
/// - `InvalidShape` for non-positive or non-finite dimensions
/// - `InvalidScaling` if the strategy yields NaN or a non-positive factor
/// - `PriceOutOfRange` if the scaled base price or a total leaves i64 cents
/// - `NoTierMatched` if the table has no tier for `quantity`
pub fn calculate_shape_pricing(
    quantity: i64,
    shape: &Shape,
    base_price: Money,
    tiers: &TierTable,
    scaling: &dyn ScalingStrategy,
) -> CoreResult<ShapePricingResult> {
    validate_quantity(quantity)?;
    let area_cm2 = shape.area()?;

    let scaling_factor = scaling.scaling_factor(area_cm2);
    if scaling_factor.is_nan() || scaling_factor <= 0.0 {
        return Err(CoreError::InvalidScaling {
            reason: format!("factor {} for area {:.2} cm²", scaling_factor, area_cm2),
        });
    }

    let adjusted_base_price = base_price
        .scale(scaling_factor)
        .ok_or_else(|| {
            CoreError::price_out_of_range(format!(
                "{} scaled by {} for {:.1} cm²",
                base_price, scaling_factor, area_cm2
            ))
        })?
        .at_least(Money::from_cents(1));
    let pricing = calculate_pricing(quantity, &tiers.rebased(adjusted_base_price))?;

    Ok(ShapePricingResult {
        pricing,
        shape: *shape,
        area_cm2,
        scaling_factor,
        base_price,
        adjusted_base_price,
        description: shape.describe(area_cm2),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
