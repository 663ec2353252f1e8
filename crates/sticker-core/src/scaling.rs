//! # Area Scaling
//!
//! Continuous price scaling for custom-sized stickers.
//!
//! ## Why Continuous?
//! Quantity tiers are stepwise on purpose. Size is not: a 5.1cm sticker
//! should cost a little more than a 5.0cm one, not jump a bracket. So size
//! is priced with a smooth factor on top of the tier table.
//!
//! ## The Two Models
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  F = fixed_cost   k = area_coefficient   δ = reference_area   e = exp  │
//! │                                                                         │
//! │  AFFINE (default)                                                       │
//! │          F + k·A                                                        │
//! │  f(A) = ─────────      linear in area: ink and vinyl scale with size   │
//! │          F + k·δ                                                        │
//! │                                                                         │
//! │  POWER                                                                  │
//! │          F + k·δ·(A/δ)^e                                                │
//! │  f(A) = ────────────────   e < 1 flattens the curve for large sizes    │
//! │            F + k·δ                                                      │
//! │                                                                         │
//! │  Both: f(δ) = 1, continuous, non-decreasing, clamped at min_factor     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The model is chosen by configuration; callers only see
//! [`ScalingStrategy`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Strategy Trait
// =============================================================================

/// Maps a printable area (cm²) to a price multiplier.
///
/// Implementations must be non-decreasing in area and return a finite,
/// strictly positive factor for any positive area.
pub trait ScalingStrategy {
    /// Returns the multiplier for `area_cm2`.
    fn scaling_factor(&self, area_cm2: f64) -> f64;
}

impl<T: ScalingStrategy + ?Sized> ScalingStrategy for &T {
    fn scaling_factor(&self, area_cm2: f64) -> f64 {
        (**self).scaling_factor(area_cm2)
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// Shared parameters for the built-in scaling models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScalingParams {
    /// Area-independent share of the unit cost (F_S).
    #[serde(default = "default_fixed_cost")]
    pub fixed_cost: f64,

    /// Cost per cm² (k_S).
    #[serde(default = "default_area_coefficient")]
    pub area_coefficient: f64,

    /// Area at which the factor is exactly 1 (delta), in cm².
    #[serde(default = "default_reference_area")]
    pub reference_area: f64,

    /// Exponent of the power model. Ignored by the affine model.
    #[serde(default = "default_exponent")]
    pub exponent: f64,

    /// Lower clamp for the factor.
    #[serde(default = "default_min_factor")]
    pub min_factor: f64,
}

fn default_fixed_cost() -> f64 {
    0.4
}

fn default_area_coefficient() -> f64 {
    0.024
}

fn default_reference_area() -> f64 {
    25.0 // 5cm × 5cm
}

fn default_exponent() -> f64 {
    0.5
}

fn default_min_factor() -> f64 {
    0.25
}

impl Default for ScalingParams {
    fn default() -> Self {
        ScalingParams {
            fixed_cost: default_fixed_cost(),
            area_coefficient: default_area_coefficient(),
            reference_area: default_reference_area(),
            exponent: default_exponent(),
            min_factor: default_min_factor(),
        }
    }
}

impl ScalingParams {
    /// Checks that the parameters produce a positive, non-decreasing factor.
    pub fn validate(&self) -> CoreResult<()> {
        let fields = [
            ("fixed_cost", self.fixed_cost),
            ("area_coefficient", self.area_coefficient),
            ("reference_area", self.reference_area),
            ("exponent", self.exponent),
            ("min_factor", self.min_factor),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{} must be a finite number", name)));
        }

        if self.fixed_cost < 0.0 {
            return Err(invalid("fixed_cost must not be negative"));
        }
        if self.area_coefficient < 0.0 {
            return Err(invalid("area_coefficient must not be negative"));
        }
        if self.fixed_cost + self.area_coefficient <= 0.0 {
            return Err(invalid("fixed_cost and area_coefficient cannot both be zero"));
        }
        if self.reference_area <= 0.0 {
            return Err(invalid("reference_area must be positive"));
        }
        if self.exponent <= 0.0 {
            return Err(invalid("exponent must be positive"));
        }
        if self.min_factor <= 0.0 {
            return Err(invalid("min_factor must be positive"));
        }

        Ok(())
    }

    /// Cost at the reference area; the normaliser of both models.
    #[inline]
    fn reference_cost(&self) -> f64 {
        self.fixed_cost + self.area_coefficient * self.reference_area
    }

    #[inline]
    fn clamp(&self, factor: f64) -> f64 {
        factor.max(self.min_factor)
    }
}

fn invalid(reason: impl Into<String>) -> CoreError {
    CoreError::InvalidScaling {
        reason: reason.into(),
    }
}

// =============================================================================
// Built-in Models
// =============================================================================

/// `f(A) = (F + k·A) / (F + k·δ)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineScaling {
    params: ScalingParams,
}

impl AffineScaling {
    pub fn new(params: ScalingParams) -> CoreResult<Self> {
        params.validate()?;
        Ok(AffineScaling { params })
    }
}

impl ScalingStrategy for AffineScaling {
    fn scaling_factor(&self, area_cm2: f64) -> f64 {
        affine_factor(&self.params, area_cm2)
    }
}

/// `f(A) = (F + k·δ·(A/δ)^e) / (F + k·δ)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerScaling {
    params: ScalingParams,
}

impl PowerScaling {
    pub fn new(params: ScalingParams) -> CoreResult<Self> {
        params.validate()?;
        Ok(PowerScaling { params })
    }
}

impl ScalingStrategy for PowerScaling {
    fn scaling_factor(&self, area_cm2: f64) -> f64 {
        power_factor(&self.params, area_cm2)
    }
}

fn affine_factor(p: &ScalingParams, area: f64) -> f64 {
    let cost = p.fixed_cost + p.area_coefficient * area;
    p.clamp(cost / p.reference_cost())
}

fn power_factor(p: &ScalingParams, area: f64) -> f64 {
    let relative = (area / p.reference_area).powf(p.exponent);
    let cost = p.fixed_cost + p.area_coefficient * p.reference_area * relative;
    p.clamp(cost / p.reference_cost())
}

// =============================================================================
// Configured Model
// =============================================================================

/// Which scaling model to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ScalingModel {
    #[default]
    Affine,
    Power,
}

impl std::fmt::Display for ScalingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalingModel::Affine => write!(f, "affine"),
            ScalingModel::Power => write!(f, "power"),
        }
    }
}

impl std::str::FromStr for ScalingModel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "affine" | "linear" => Ok(ScalingModel::Affine),
            "power" | "power_law" => Ok(ScalingModel::Power),
            other => Err(invalid(format!(
                "Unknown scaling model: '{}'. Valid options: affine, power",
                other
            ))),
        }
    }
}

/// Model selection plus parameters, as read from configuration.
///
/// ## Example
/// ```rust
/// use sticker_core::scaling::{ScalingConfig, ScalingStrategy};
///
/// let scaling = ScalingConfig::default();
/// assert_eq!(scaling.scaling_factor(25.0), 1.0);
/// assert!(scaling.scaling_factor(50.0) > scaling.scaling_factor(25.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScalingConfig {
    #[serde(default)]
    pub model: ScalingModel,

    #[serde(flatten)]
    pub params: ScalingParams,
}

impl ScalingConfig {
    pub fn validate(&self) -> CoreResult<()> {
        self.params.validate()
    }
}

impl ScalingStrategy for ScalingConfig {
    fn scaling_factor(&self, area_cm2: f64) -> f64 {
        match self.model {
            ScalingModel::Affine => affine_factor(&self.params, area_cm2),
            ScalingModel::Power => power_factor(&self.params, area_cm2),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_params_are_valid() {
        assert!(ScalingParams::default().validate().is_ok());
    }

    #[test]
    fn test_factor_is_one_at_reference_area() {
        let params = ScalingParams::default();
        let affine = AffineScaling::new(params).unwrap();
        let power = PowerScaling::new(params).unwrap();
        assert!(close(affine.scaling_factor(25.0), 1.0));
        assert!(close(power.scaling_factor(25.0), 1.0));
    }

    #[test]
    fn test_affine_values() {
        let affine = AffineScaling::new(ScalingParams::default()).unwrap();
        assert!(close(affine.scaling_factor(50.0), 1.6));
        assert!(close(affine.scaling_factor(0.0), 0.4));
    }

    #[test]
    fn test_power_with_unit_exponent_matches_affine() {
        let params = ScalingParams {
            exponent: 1.0,
            ..ScalingParams::default()
        };
        let affine = AffineScaling::new(params).unwrap();
        let power = PowerScaling::new(params).unwrap();
        for area in [1.0, 12.5, 25.0, 78.5, 400.0] {
            assert!(close(affine.scaling_factor(area), power.scaling_factor(area)));
        }
    }

    #[test]
    fn test_factor_is_non_decreasing_and_floored() {
        for model in [ScalingModel::Affine, ScalingModel::Power] {
            let config = ScalingConfig {
                model,
                params: ScalingParams {
                    fixed_cost: 0.0,
                    min_factor: 0.3,
                    ..ScalingParams::default()
                },
            };
            let mut previous = 0.0;
            for step in 1..=2_000 {
                let area = step as f64 * 0.25;
                let factor = config.scaling_factor(area);
                assert!(factor >= previous, "{model} decreased at {area}");
                assert!(factor >= 0.3);
                previous = factor;
            }
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        let cases = [
            ScalingParams { fixed_cost: -0.1, ..ScalingParams::default() },
            ScalingParams { area_coefficient: -1.0, ..ScalingParams::default() },
            ScalingParams { fixed_cost: 0.0, area_coefficient: 0.0, ..ScalingParams::default() },
            ScalingParams { reference_area: 0.0, ..ScalingParams::default() },
            ScalingParams { exponent: 0.0, ..ScalingParams::default() },
            ScalingParams { min_factor: 0.0, ..ScalingParams::default() },
            ScalingParams { fixed_cost: f64::NAN, ..ScalingParams::default() },
        ];
        for params in cases {
            assert!(
                matches!(params.validate(), Err(CoreError::InvalidScaling { .. })),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_model_parsing() {
        assert_eq!("affine".parse::<ScalingModel>().unwrap(), ScalingModel::Affine);
        assert_eq!("POWER".parse::<ScalingModel>().unwrap(), ScalingModel::Power);
        assert!("cubic".parse::<ScalingModel>().is_err());
    }

    #[test]
    fn test_config_deserializes_flat() {
        let json = r#"{"model":"power","exponent":0.75}"#;
        let config: ScalingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.model, ScalingModel::Power);
        assert!(close(config.params.exponent, 0.75));
        assert!(close(config.params.fixed_cost, 0.4));
    }
}
