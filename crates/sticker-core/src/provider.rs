//! # Configuration Provider
//!
//! The engine's read-only view of sticker configuration.
//!
//! ```text
//! ┌──────────────────┐   sticker_config(id)   ┌──────────────────────────┐
//! │  PricingEngine   │ ─────────────────────► │  ConfigProvider          │
//! │  (sticker-core)  │   default_tiers()      │  CatalogStore (config    │
//! │                  │ ◄───────────────────── │  crate), StaticProvider  │
//! └──────────────────┘   Arc snapshots        └──────────────────────────┘
//! ```
//!
//! Implementations hand out owned snapshots, so a concurrent replacement in
//! the store never changes a table mid-calculation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::tiers::TierTable;
use crate::types::StickerConfig;

/// Source of sticker configs and the default tier table.
pub trait ConfigProvider {
    /// Config for a variant, active or not.
    fn sticker_config(&self, variant_id: &str) -> Option<Arc<StickerConfig>>;

    /// Table used by variants without their own tiers.
    fn default_tiers(&self) -> Option<TierTable>;

    /// Config for a variant, if it exists and is active.
    fn active_config(&self, variant_id: &str) -> Option<Arc<StickerConfig>> {
        self.sticker_config(variant_id).filter(|config| config.is_active)
    }

    /// Effective tier table for a variant.
    ///
    /// ## Resolution Order
    /// 1. The active config's own tiers
    /// 2. The default table
    /// 3. [`CoreError::UnknownVariant`]
    fn tiers_for_variant(&self, variant_id: &str) -> CoreResult<TierTable> {
        if let Some(tiers) = self
            .active_config(variant_id)
            .and_then(|config| config.tiers.clone())
        {
            return Ok(tiers);
        }

        self.default_tiers()
            .ok_or_else(|| CoreError::UnknownVariant(variant_id.to_string()))
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for &T {
    fn sticker_config(&self, variant_id: &str) -> Option<Arc<StickerConfig>> {
        (**self).sticker_config(variant_id)
    }

    fn default_tiers(&self) -> Option<TierTable> {
        (**self).default_tiers()
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for Arc<T> {
    fn sticker_config(&self, variant_id: &str) -> Option<Arc<StickerConfig>> {
        (**self).sticker_config(variant_id)
    }

    fn default_tiers(&self) -> Option<TierTable> {
        (**self).default_tiers()
    }
}

// =============================================================================
// Static Provider
// =============================================================================

/// An immutable, in-memory provider.
///
/// Handy for tests and for embedding a fixed catalog. For a catalog that
/// changes at runtime use `sticker_config::CatalogStore`.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    configs: HashMap<String, Arc<StickerConfig>>,
    default_tiers: Option<TierTable>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a config, keyed by its variant id.
    pub fn with_config(mut self, config: StickerConfig) -> Self {
        self.configs
            .insert(config.variant_id.clone(), Arc::new(config));
        self
    }

    pub fn with_default_tiers(mut self, tiers: TierTable) -> Self {
        self.default_tiers = Some(tiers);
        self
    }
}

impl ConfigProvider for StaticProvider {
    fn sticker_config(&self, variant_id: &str) -> Option<Arc<StickerConfig>> {
        self.configs.get(variant_id).cloned()
    }

    fn default_tiers(&self) -> Option<TierTable> {
        self.default_tiers.clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
