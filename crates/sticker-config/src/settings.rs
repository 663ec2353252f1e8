//! # Pricing Settings
//!
//! Engine policy and the sticker catalog, loaded at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STICKER_MOQ=250                                                    │
//! │     STICKER_VARIANT_IDS=STICKER-DIECUT,STICKER-ROUND                   │
//! │     STICKER_SCALING_MODEL=power                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/sticker-pricing/pricing.toml (Linux)                     │
//! │     ~/Library/Application Support/com.sticker.pricing/pricing.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     MOQ 500, affine scaling, reference tier table, empty catalog       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! [pricing]
//! minimum_order_quantity = 500
//!
//! [scaling]
//! model = "affine"          # affine | power
//! fixed_cost = 0.4
//! area_coefficient = 0.024
//! reference_area = 25.0
//!
//! [classifier]
//! variant_ids = []          # empty = every active product below
//!
//! [[default_tiers]]
//! minQuantity = 1
//! maxQuantity = 9
//! pricePerUnit = 100
//! # ...
//!
//! [[products]]
//! variantId = "STICKER-DIECUT"
//! basePrice = 100
//! minimumOrderQuantity = 50
//! ```
//!
//! Product and tier entries use the same camelCase keys as the JSON API.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sticker_core::validation::validate_variant_id;
use sticker_core::{PricingPolicy, ScalingConfig, ScalingModel, StickerConfig, TierTable};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "pricing.toml";

// =============================================================================
// Sections
// =============================================================================

/// Engine-wide order rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSettings {
    /// MOQ for products that do not set their own.
    #[serde(default = "default_moq")]
    pub minimum_order_quantity: i64,
}

fn default_moq() -> i64 {
    sticker_core::DEFAULT_MINIMUM_ORDER_QUANTITY
}

impl Default for OrderSettings {
    fn default() -> Self {
        OrderSettings {
            minimum_order_quantity: default_moq(),
        }
    }
}

/// Which variants count as stickers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Explicit sticker variants. Empty means "every active product".
    #[serde(default)]
    pub variant_ids: Vec<String>,
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    #[serde(default)]
    pub pricing: OrderSettings,

    #[serde(default)]
    pub scaling: ScalingConfig,

    #[serde(default)]
    pub classifier: ClassifierSettings,

    /// Tier table for products without their own.
    #[serde(default = "TierTable::reference")]
    pub default_tiers: TierTable,

    #[serde(default)]
    pub products: Vec<StickerConfig>,
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            pricing: OrderSettings::default(),
            scaling: ScalingConfig::default(),
            classifier: ClassifierSettings::default(),
            default_tiers: TierTable::reference(),
            products: Vec::new(),
        }
    }
}

impl PricingSettings {
    /// Loads settings from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Settings file (`pricing.toml`)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// file at the default location is not.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut settings = match config_path {
            Some(path) => Self::read_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::read_file(&path)?,
                Some(path) => {
                    debug!(?path, "Settings file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        settings.apply_env_overrides();
        settings.validate()?;

        info!(
            products = settings.products.len(),
            moq = settings.pricing.minimum_order_quantity,
            scaling = %settings.scaling.model,
            "Pricing settings loaded"
        );
        Ok(settings)
    }

    /// Loads settings or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing settings: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses settings from TOML text without touching the environment.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Saves settings as pretty TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::Invalid("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Pricing settings saved");
        Ok(path)
    }

    /// Checks the rules serde cannot express.
    ///
    /// Tier tables are already valid by construction; this covers the
    /// policy, identifiers and per-product values.
    pub fn validate(&self) -> ConfigResult<()> {
        self.policy().validate()?;

        let mut seen = HashSet::new();
        for product in &self.products {
            validate_variant_id(&product.variant_id)?;

            if !seen.insert(product.variant_id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate product: {}",
                    product.variant_id
                )));
            }

            if !product.base_price.is_positive() {
                return Err(ConfigError::Invalid(format!(
                    "{}: basePrice must be positive",
                    product.variant_id
                )));
            }

            if let Some(moq) = product.minimum_order_quantity {
                if moq < 1 {
                    return Err(ConfigError::Invalid(format!(
                        "{}: minimumOrderQuantity must be at least 1, got {}",
                        product.variant_id, moq
                    )));
                }
            }
        }

        for id in &self.classifier.variant_ids {
            validate_variant_id(id)?;
        }

        Ok(())
    }

    /// Engine policy derived from these settings.
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy {
            minimum_order_quantity: self.pricing.minimum_order_quantity,
            scaling: self.scaling,
        }
    }

    /// Returns the default settings file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sticker", "pricing")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    }

    fn read_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading pricing settings from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `STICKER_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(moq) = lookup("STICKER_MOQ") {
            match moq.trim().parse::<i64>() {
                Ok(value) => {
                    debug!(moq = value, "Overriding MOQ from environment");
                    self.pricing.minimum_order_quantity = value;
                }
                Err(_) => warn!(value = %moq, "Ignoring non-numeric STICKER_MOQ"),
            }
        }

        if let Some(ids) = lookup("STICKER_VARIANT_IDS") {
            self.classifier.variant_ids = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
            debug!(
                count = self.classifier.variant_ids.len(),
                "Overriding sticker variants from environment"
            );
        }

        if let Some(model) = lookup("STICKER_SCALING_MODEL") {
            match model.parse::<ScalingModel>() {
                Ok(parsed) => {
                    debug!(model = %parsed, "Overriding scaling model from environment");
                    self.scaling.model = parsed;
                }
                Err(e) => warn!(error = %e, "Ignoring STICKER_SCALING_MODEL"),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use sticker_core::Money;

    const SAMPLE: &str = r#"
[pricing]
minimum_order_quantity = 250

[scaling]
model = "power"
exponent = 0.75

[[default_tiers]]
minQuantity = 1
maxQuantity = 99
pricePerUnit = 120

[[default_tiers]]
minQuantity = 100
pricePerUnit = 90

[[products]]
variantId = "STICKER-DIECUT"
basePrice = 110
minimumOrderQuantity = 50

[[products]]
variantId = "STICKER-HOLO"
basePrice = 180
isActive = false
"#;

    #[test]
    fn test_default_settings() {
        let settings = PricingSettings::default();
        assert_eq!(settings.pricing.minimum_order_quantity, 500);
        assert_eq!(settings.scaling.model, ScalingModel::Affine);
        assert_eq!(settings.default_tiers, TierTable::reference());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_sample() {
        let settings = PricingSettings::from_toml_str(SAMPLE).unwrap();
        assert_eq!(settings.pricing.minimum_order_quantity, 250);
        assert_eq!(settings.scaling.model, ScalingModel::Power);
        assert_eq!(settings.scaling.params.exponent, 0.75);
        assert_eq!(settings.scaling.params.reference_area, 25.0);
        assert_eq!(settings.default_tiers.list_price(), Money::from_cents(120));
        assert_eq!(settings.products.len(), 2);
        assert_eq!(settings.products[0].minimum_order_quantity, Some(50));
        assert!(!settings.products[1].is_active);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let settings = PricingSettings::from_toml_str("").unwrap();
        assert_eq!(settings, PricingSettings::default());
    }

    #[test]
    fn test_malformed_tiers_fail_to_parse() {
        let gapped = r#"
[[default_tiers]]
minQuantity = 1
maxQuantity = 9
pricePerUnit = 100

[[default_tiers]]
minQuantity = 20
pricePerUnit = 80
"#;
        assert!(matches!(
            PricingSettings::from_toml_str(gapped),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_rules() {
        let mut settings = PricingSettings::default();
        settings.products = vec![
            StickerConfig::new("STICKER-A", Money::from_cents(100)),
            StickerConfig::new("STICKER-A", Money::from_cents(90)),
        ];
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        settings.products = vec![StickerConfig::new("STICKER-A", Money::zero())];
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        settings.products = vec![
            StickerConfig::new("STICKER-A", Money::from_cents(100)).with_minimum_order_quantity(0),
        ];
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        settings.products = vec![StickerConfig::new("bad id", Money::from_cents(100))];
        assert!(matches!(settings.validate(), Err(ConfigError::Core(_))));

        settings.products.clear();
        settings.scaling.params.reference_area = 0.0;
        assert!(matches!(settings.validate(), Err(ConfigError::Core(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env = HashMap::from([
            ("STICKER_MOQ", "100"),
            ("STICKER_VARIANT_IDS", "STICKER-A, STICKER-B,,"),
            ("STICKER_SCALING_MODEL", "power"),
        ]);
        let mut settings = PricingSettings::default();
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.pricing.minimum_order_quantity, 100);
        assert_eq!(settings.classifier.variant_ids, ["STICKER-A", "STICKER-B"]);
        assert_eq!(settings.scaling.model, ScalingModel::Power);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let env = HashMap::from([("STICKER_MOQ", "lots"), ("STICKER_SCALING_MODEL", "cubic")]);
        let mut settings = PricingSettings::default();
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.pricing.minimum_order_quantity, 500);
        assert_eq!(settings.scaling.model, ScalingModel::Affine);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "sticker-settings-{}-{}.toml",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let original = PricingSettings::from_toml_str(SAMPLE).unwrap();

        original.save(Some(path.clone())).unwrap();
        let loaded = PricingSettings::read_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("sticker-settings-does-not-exist.toml");
        assert!(matches!(
            PricingSettings::load(Some(path)),
            Err(ConfigError::Io(_))
        ));
    }
}
