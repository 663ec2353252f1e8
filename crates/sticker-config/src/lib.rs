//! # sticker-config: Settings and Catalog Store
//!
//! Loads pricing settings and serves sticker configuration to the engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pricing.toml + STICKER_* env                                          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  PricingSettings ──► CatalogStore (ConfigProvider) ──┐                  │
//! │        │                                             ▼                  │
//! │        └── policy, classifier ──────────────► PricingEngine            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use sticker_config::{build_engine, PricingSettings};
//! use sticker_core::{Money, StickerConfig};
//!
//! let mut settings = PricingSettings::default();
//! settings.products.push(StickerConfig::new("STICKER-DIECUT", Money::from_cents(100)));
//!
//! let (_store, engine) = build_engine(&settings).unwrap();
//! let result = engine.quote_variant("STICKER-DIECUT", 500).unwrap();
//! assert_eq!(result.total_price.cents(), 25_000);
//! ```

pub mod error;
pub mod settings;
pub mod store;

use std::sync::Arc;

use sticker_core::{PricingEngine, ProviderClassifier, VariantClassifier, VariantSet};
use tracing::debug;

pub use error::{ConfigError, ConfigResult};
pub use settings::PricingSettings;
pub use store::CatalogStore;

/// Classifier chosen by settings.
#[derive(Debug, Clone)]
pub enum CatalogClassifier {
    /// Only the listed variants are stickers.
    Listed(VariantSet),
    /// Every active product in the store is a sticker.
    Active(ProviderClassifier<Arc<CatalogStore>>),
}

impl VariantClassifier for CatalogClassifier {
    fn is_sticker_variant(&self, variant_id: &str) -> bool {
        match self {
            CatalogClassifier::Listed(set) => set.is_sticker_variant(variant_id),
            CatalogClassifier::Active(provider) => provider.is_sticker_variant(variant_id),
        }
    }
}

/// Engine wired to a [`CatalogStore`].
pub type CatalogEngine = PricingEngine<Arc<CatalogStore>, CatalogClassifier>;

/// Builds the store and engine described by `settings`.
///
/// The store is returned too, so callers can update prices while the
/// engine keeps serving.
pub fn build_engine(settings: &PricingSettings) -> ConfigResult<(Arc<CatalogStore>, CatalogEngine)> {
    let store = Arc::new(CatalogStore::from_settings(settings)?);

    let classifier = if settings.classifier.variant_ids.is_empty() {
        debug!("Classifying stickers by active catalog entries");
        CatalogClassifier::Active(ProviderClassifier::new(Arc::clone(&store)))
    } else {
        debug!(
            count = settings.classifier.variant_ids.len(),
            "Classifying stickers by configured variant list"
        );
        CatalogClassifier::Listed(settings.classifier.variant_ids.iter().cloned().collect())
    };

    let engine = PricingEngine::new(Arc::clone(&store), classifier, settings.policy())?;
    Ok((store, engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sticker_core::{CartLine, Money, StickerConfig};

    #[test]
    fn test_listed_classifier_overrides_catalog() {
        let mut settings = PricingSettings::default();
        settings.products = vec![
            StickerConfig::new("STICKER-A", Money::from_cents(100)),
            StickerConfig::new("STICKER-B", Money::from_cents(100)),
        ];
        settings.classifier.variant_ids = vec!["STICKER-A".to_string()];

        let (_store, engine) = build_engine(&settings).unwrap();
        assert!(engine.is_sticker_variant("STICKER-A"));
        assert!(!engine.is_sticker_variant("STICKER-B"));
    }

    #[test]
    fn test_store_updates_reach_the_engine() {
        let (store, engine) = build_engine(&PricingSettings::default()).unwrap();
        let cart = vec![CartLine::new("STICKER-NEW", 500)];
        assert_eq!(engine.calculate_cart_pricing(&cart).unwrap().passthrough_items, 1);

        store
            .replace_config(StickerConfig::new("STICKER-NEW", Money::from_cents(100)))
            .unwrap();
        let result = engine.calculate_cart_pricing(&cart).unwrap();
        assert_eq!(result.sticker_items.len(), 1);
        assert_eq!(result.total_sticker_price.cents(), 25_000);
    }
}
