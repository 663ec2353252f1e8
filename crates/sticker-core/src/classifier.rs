//! # Variant Classifier
//!
//! Decides which cart lines are stickers.
//!
//! Classification is a plain predicate over the variant identifier. The
//! engine takes any [`VariantClassifier`], so a test can pass a closure, a
//! deployment can pass a fixed [`VariantSet`], and the default wiring asks
//! the configuration store through [`ProviderClassifier`].

use std::collections::HashSet;

use crate::provider::ConfigProvider;

/// Answers "is this variant a sticker?".
pub trait VariantClassifier {
    fn is_sticker_variant(&self, variant_id: &str) -> bool;
}

impl<F> VariantClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_sticker_variant(&self, variant_id: &str) -> bool {
        self(variant_id)
    }
}

// =============================================================================
// Variant Set
// =============================================================================

/// A fixed set of sticker variant identifiers.
///
/// ## Example
/// ```rust
/// use sticker_core::classifier::{VariantClassifier, VariantSet};
///
/// let stickers: VariantSet = ["STICKER-DIECUT", "STICKER-ROUND"].into_iter().collect();
/// assert!(stickers.is_sticker_variant("STICKER-ROUND"));
/// assert!(!stickers.is_sticker_variant("MUG-01"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSet {
    ids: HashSet<String>,
}

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, variant_id: impl Into<String>) -> bool {
        self.ids.insert(variant_id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for VariantSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        VariantSet {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl VariantClassifier for VariantSet {
    fn is_sticker_variant(&self, variant_id: &str) -> bool {
        self.ids.contains(variant_id)
    }
}

// =============================================================================
// Provider Classifier
// =============================================================================

/// A variant is a sticker when the provider holds an active config for it.
#[derive(Debug, Clone)]
pub struct ProviderClassifier<P> {
    provider: P,
}

impl<P: ConfigProvider> ProviderClassifier<P> {
    pub fn new(provider: P) -> Self {
        ProviderClassifier { provider }
    }
}

impl<P: ConfigProvider> VariantClassifier for ProviderClassifier<P> {
    fn is_sticker_variant(&self, variant_id: &str) -> bool {
        self.provider.active_config(variant_id).is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::provider::StaticProvider;
    use crate::types::StickerConfig;

    #[test]
    fn test_closure_classifier() {
        let by_prefix = |id: &str| id.starts_with("STICKER-");
        assert!(by_prefix.is_sticker_variant("STICKER-HOLO"));
        assert!(!by_prefix.is_sticker_variant("POSTER-A2"));
    }

    #[test]
    fn test_variant_set_is_exact_match() {
        let mut set = VariantSet::new();
        assert!(set.insert("STICKER-A"));
        assert!(!set.insert("STICKER-A"));
        assert_eq!(set.len(), 1);
        assert!(!set.is_sticker_variant("sticker-a"));
    }

    #[test]
    fn test_provider_classifier_ignores_inactive() {
        let mut retired = StickerConfig::new("STICKER-OLD", Money::from_cents(80));
        retired.is_active = false;
        let provider = StaticProvider::new()
            .with_config(StickerConfig::new("STICKER-NEW", Money::from_cents(100)))
            .with_config(retired);

        let classifier = ProviderClassifier::new(&provider);
        assert!(classifier.is_sticker_variant("STICKER-NEW"));
        assert!(!classifier.is_sticker_variant("STICKER-OLD"));
        assert!(!classifier.is_sticker_variant("MUG-01"));
    }
}
