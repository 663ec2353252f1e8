//! # Catalog Store
//!
//! In-memory sticker catalog shared between the engine and whoever edits
//! prices.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         CatalogStore                                    │
//! │                                                                         │
//! │   RwLock<Catalog>                                                       │
//! │   ├── configs:       HashMap<variant_id, Arc<StickerConfig>>           │
//! │   └── default_tiers: Option<TierTable>                                 │
//! │                                                                         │
//! │   READ  (engine, many threads)                                         │
//! │   lock → clone Arc / table → unlock → price outside the lock          │
//! │                                                                         │
//! │   WRITE (admin)                                                        │
//! │   build new entry → lock → swap whole entry → unlock                   │
//! │                                                                         │
//! │   A reader sees the old entry or the new one, never a mix.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use sticker_core::validation::validate_variant_id;
use sticker_core::{ConfigProvider, StickerConfig, TierTable};
use tracing::{debug, info};

use crate::error::ConfigResult;
use crate::settings::PricingSettings;

#[derive(Debug, Default)]
struct Catalog {
    configs: HashMap<String, Arc<StickerConfig>>,
    default_tiers: Option<TierTable>,
}

/// Thread-safe sticker catalog implementing [`ConfigProvider`].
#[derive(Debug, Default)]
pub struct CatalogStore {
    catalog: RwLock<Catalog>,
}

impl CatalogStore {
    /// Creates an empty store with no default tiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from loaded settings.
    pub fn from_settings(settings: &PricingSettings) -> ConfigResult<Self> {
        let store = CatalogStore::new();
        store.set_default_tiers(settings.default_tiers.clone());
        store.replace_all(settings.products.iter().cloned())?;
        Ok(store)
    }

    /// Inserts or replaces one config and stamps `updated_at`.
    ///
    /// Returns the previous config, if any.
    pub fn replace_config(
        &self,
        mut config: StickerConfig,
    ) -> ConfigResult<Option<Arc<StickerConfig>>> {
        validate_variant_id(&config.variant_id)?;
        config.updated_at = Some(Utc::now());

        let variant_id = config.variant_id.clone();
        let previous = self
            .write()
            .configs
            .insert(variant_id.clone(), Arc::new(config));

        info!(
            variant_id = %variant_id,
            replaced = previous.is_some(),
            "Sticker config committed"
        );
        Ok(previous)
    }

    /// Replaces the whole catalog in one step.
    ///
    /// All configs are validated before the lock is taken; on error the
    /// store is left untouched.
    pub fn replace_all<I>(&self, configs: I) -> ConfigResult<usize>
    where
        I: IntoIterator<Item = StickerConfig>,
    {
        let now = Utc::now();
        let mut next = HashMap::new();
        for mut config in configs {
            validate_variant_id(&config.variant_id)?;
            config.updated_at = Some(now);
            next.insert(config.variant_id.clone(), Arc::new(config));
        }

        let count = next.len();
        self.write().configs = next;

        info!(count, "Sticker catalog replaced");
        Ok(count)
    }

    pub fn remove_config(&self, variant_id: &str) -> Option<Arc<StickerConfig>> {
        let removed = self.write().configs.remove(variant_id);
        if removed.is_some() {
            info!(variant_id = %variant_id, "Sticker config removed");
        }
        removed
    }

    /// Swaps the default tier table.
    pub fn set_default_tiers(&self, tiers: TierTable) {
        debug!(tiers = tiers.tiers().len(), "Default tier table replaced");
        self.write().default_tiers = Some(tiers);
    }

    pub fn clear_default_tiers(&self) {
        self.write().default_tiers = None;
    }

    /// Number of configs, active or not.
    pub fn len(&self) -> usize {
        self.read().configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().configs.is_empty()
    }

    /// Variant ids in sorted order.
    pub fn variant_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().configs.keys().cloned().collect();
        ids.sort();
        ids
    }

    // Writes are single inserts or assignments, so a poisoned catalog is
    // still consistent.
    fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConfigProvider for CatalogStore {
    fn sticker_config(&self, variant_id: &str) -> Option<Arc<StickerConfig>> {
        self.read().configs.get(variant_id).cloned()
    }

    fn default_tiers(&self) -> Option<TierTable> {
        self.read().default_tiers.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use sticker_core::{Money, PricingTier};

    fn doubled() -> TierTable {
        TierTable::reference().rebased(Money::from_cents(200))
    }

    #[test]
    fn test_replace_config_stamps_and_returns_previous() {
        let store = CatalogStore::new();
        assert!(store
            .replace_config(StickerConfig::new("STICKER-A", Money::from_cents(100)))
            .unwrap()
            .is_none());

        let previous = store
            .replace_config(StickerConfig::new("STICKER-A", Money::from_cents(120)))
            .unwrap()
            .unwrap();
        assert_eq!(previous.base_price.cents(), 100);

        let current = store.sticker_config("STICKER-A").unwrap();
        assert_eq!(current.base_price.cents(), 120);
        assert!(current.updated_at.is_some());
    }

    #[test]
    fn test_replace_all_is_all_or_nothing() {
        let store = CatalogStore::new();
        store
            .replace_config(StickerConfig::new("KEEP", Money::from_cents(100)))
            .unwrap();

        let result = store.replace_all(vec![
            StickerConfig::new("NEW-A", Money::from_cents(100)),
            StickerConfig::new("bad id", Money::from_cents(100)),
        ]);
        assert!(matches!(result, Err(ConfigError::Core(_))));
        assert_eq!(store.variant_ids(), ["KEEP"]);
    }

    #[test]
    fn test_from_settings_uses_default_tiers() {
        let mut settings = PricingSettings::default();
        settings.products = vec![StickerConfig::new("STICKER-A", Money::from_cents(100))];
        let store = CatalogStore::from_settings(&settings).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.tiers_for_variant("STICKER-A").unwrap(),
            TierTable::reference()
        );
    }

    #[test]
    fn test_remove_and_clear() {
        let store = CatalogStore::new();
        store
            .replace_config(StickerConfig::new("STICKER-A", Money::from_cents(100)))
            .unwrap();
        store.set_default_tiers(TierTable::reference());

        assert!(store.remove_config("STICKER-A").is_some());
        assert!(store.remove_config("STICKER-A").is_none());
        assert!(store.is_empty());

        store.clear_default_tiers();
        assert!(store.tiers_for_variant("STICKER-A").is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_partial_tables() {
        let store = Arc::new(CatalogStore::new());
        store.set_default_tiers(TierTable::reference());
        let variant_tiers = TierTable::new(vec![
            PricingTier::bounded(1, 99, 300),
            PricingTier::open_ended(100, 250),
        ])
        .unwrap();

        let writer = {
            let store = Arc::clone(&store);
            let variant_tiers = variant_tiers.clone();
            tokio::spawn(async move {
                for round in 0..500 {
                    if round % 2 == 0 {
                        store.set_default_tiers(doubled());
                        store
                            .replace_config(
                                StickerConfig::new("STICKER-A", Money::from_cents(300))
                                    .with_tiers(variant_tiers.clone()),
                            )
                            .unwrap();
                    } else {
                        store.set_default_tiers(TierTable::reference());
                        store
                            .replace_config(StickerConfig::new("STICKER-A", Money::from_cents(100)))
                            .unwrap();
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let variant_tiers = variant_tiers.clone();
                tokio::spawn(async move {
                    for _ in 0..1_000 {
                        let default = store.default_tiers().unwrap();
                        assert!(default == TierTable::reference() || default == doubled());

                        let effective = store.tiers_for_variant("STICKER-A").unwrap();
                        assert!(
                            effective == variant_tiers
                                || effective == TierTable::reference()
                                || effective == doubled()
                        );
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
