//! # Tier Table
//!
//! Quantity tiers for bulk sticker pricing.
//!
//! ## Table Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reference Tier Table (cents)                         │
//! │                                                                         │
//! │   quantity   1 ──── 9 │ 10 ─── 49 │ 50 ── 99 │ 100-149 │ 150-199 │ 200+ │
//! │   per unit      100   │    90     │    80    │   70    │   60    │  50  │
//! │                                                                         │
//! │   • sorted ascending by min_quantity                                   │
//! │   • contiguous: tier[i].max + 1 == tier[i+1].min                       │
//! │   • exactly one open-ended tier, and it is last                        │
//! │   • prices never increase as quantity grows                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`TierTable`] can only be built through [`TierTable::new`] (or serde,
//! which goes through the same checks), so every table in the system already
//! satisfies these invariants. Tables are immutable; changing prices means
//! building and storing a whole new table.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Pricing Tier
// =============================================================================

/// One quantity range and its unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    /// Smallest quantity in this tier (inclusive, ≥ 1).
    pub min_quantity: i64,

    /// Largest quantity in this tier (inclusive). `None` = open-ended.
    #[serde(default)]
    pub max_quantity: Option<i64>,

    /// Price per sticker in cents.
    pub price_per_unit: Money,
}

impl PricingTier {
    /// Creates a bounded tier.
    pub const fn bounded(min_quantity: i64, max_quantity: i64, price_cents: i64) -> Self {
        PricingTier {
            min_quantity,
            max_quantity: Some(max_quantity),
            price_per_unit: Money::from_cents(price_cents),
        }
    }

    /// Creates the open-ended final tier.
    pub const fn open_ended(min_quantity: i64, price_cents: i64) -> Self {
        PricingTier {
            min_quantity,
            max_quantity: None,
            price_per_unit: Money::from_cents(price_cents),
        }
    }

    /// Checks whether the quantity falls inside this tier (both ends inclusive).
    #[inline]
    pub fn contains(&self, quantity: i64) -> bool {
        quantity >= self.min_quantity && self.max_quantity.map_or(true, |max| quantity <= max)
    }
}

// =============================================================================
// Tier Table
// =============================================================================

/// A validated, ordered list of pricing tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricingTier>", into = "Vec<PricingTier>")]
pub struct TierTable(Vec<PricingTier>);

impl TierTable {
    /// Builds a table, checking every invariant.
    ///
    /// ## Errors
    /// [`CoreError::MalformedTierTable`] describing the first violation found.
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::tiers::{PricingTier, TierTable};
    ///
    /// let table = TierTable::new(vec![
    ///     PricingTier::bounded(1, 99, 120),
    ///     PricingTier::open_ended(100, 95),
    /// ]);
    /// assert!(table.is_ok());
    ///
    /// // Gap between 99 and 150
    /// let gapped = TierTable::new(vec![
    ///     PricingTier::bounded(1, 99, 120),
    ///     PricingTier::open_ended(150, 95),
    /// ]);
    /// assert!(gapped.is_err());
    /// ```
    pub fn new(tiers: Vec<PricingTier>) -> CoreResult<Self> {
        let first = tiers.first().ok_or_else(|| malformed("table has no tiers"))?;

        if first.min_quantity < 1 {
            return Err(malformed(format!(
                "first tier starts at {}, must start at 1 or above",
                first.min_quantity
            )));
        }

        for (index, tier) in tiers.iter().enumerate() {
            if !tier.price_per_unit.is_positive() {
                return Err(malformed(format!(
                    "tier {} has non-positive price {}",
                    index,
                    tier.price_per_unit.cents()
                )));
            }

            let is_last = index + 1 == tiers.len();
            match (tier.max_quantity, is_last) {
                (None, false) => {
                    return Err(malformed(format!(
                        "tier {} is open-ended but is not the last tier",
                        index
                    )));
                }
                (Some(max), true) => {
                    return Err(malformed(format!(
                        "last tier ends at {}, it must be open-ended",
                        max
                    )));
                }
                (Some(max), false) if max < tier.min_quantity => {
                    return Err(malformed(format!(
                        "tier {} ends at {} before it starts at {}",
                        index, max, tier.min_quantity
                    )));
                }
                _ => {}
            }
        }

        for (index, pair) in tiers.windows(2).enumerate() {
            let (current, next) = (&pair[0], &pair[1]);
            // Bounded-ness of `current` was checked above.
            let expected_next = current.max_quantity.and_then(|max| max.checked_add(1));
            if expected_next != Some(next.min_quantity) {
                return Err(malformed(format!(
                    "tier {} starts at {}, expected {} (tiers must be contiguous)",
                    index + 1,
                    next.min_quantity,
                    expected_next.unwrap_or_default()
                )));
            }
            if next.price_per_unit > current.price_per_unit {
                return Err(malformed(format!(
                    "tier {} costs more per unit than tier {}",
                    index + 1,
                    index
                )));
            }
        }

        Ok(TierTable(tiers))
    }

    /// The default 6-tier table.
    ///
    /// Prices are configuration data; this table exists for defaults and
    /// conformance tests.
    pub fn reference() -> Self {
        TierTable(vec![
            PricingTier::bounded(1, 9, 100),
            PricingTier::bounded(10, 49, 90),
            PricingTier::bounded(50, 99, 80),
            PricingTier::bounded(100, 149, 70),
            PricingTier::bounded(150, 199, 60),
            PricingTier::open_ended(200, 50),
        ])
    }

    /// Returns the tiers in ascending order.
    #[inline]
    pub fn tiers(&self) -> &[PricingTier] {
        &self.0
    }

    /// Returns the lowest-quantity tier.
    #[inline]
    pub fn first(&self) -> &PricingTier {
        // Non-empty by construction.
        &self.0[0]
    }

    /// The first tier's unit price, which all savings are measured against.
    #[inline]
    pub fn list_price(&self) -> Money {
        self.first().price_per_unit
    }

    /// Finds the tier covering a quantity.
    pub fn find(&self, quantity: i64) -> Option<&PricingTier> {
        self.0.iter().find(|tier| tier.contains(quantity))
    }

    /// Returns a copy scaled so the first tier costs `list_price`.
    ///
    /// Every tier keeps its price ratio to the first tier, rounded half up
    /// and never below one cent. Rounding is monotonic, so the result is
    /// still non-increasing.
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::money::Money;
    /// use sticker_core::tiers::TierTable;
    ///
    /// let rebased = TierTable::reference().rebased(Money::from_cents(160));
    /// assert_eq!(rebased.list_price().cents(), 160);
    /// assert_eq!(rebased.tiers()[1].price_per_unit.cents(), 144); // 90%
    /// assert_eq!(rebased.tiers()[5].price_per_unit.cents(), 80);  // 50%
    /// ```
    pub fn rebased(&self, list_price: Money) -> TierTable {
        let list_price = list_price.at_least(Money::from_cents(1));
        let original = self.list_price().cents();

        let tiers = self
            .0
            .iter()
            .map(|tier| PricingTier {
                price_per_unit: list_price
                    .proportion(tier.price_per_unit.cents(), original)
                    .at_least(Money::from_cents(1)),
                ..*tier
            })
            .collect();

        TierTable(tiers)
    }
}

impl TryFrom<Vec<PricingTier>> for TierTable {
    type Error = CoreError;

    fn try_from(tiers: Vec<PricingTier>) -> Result<Self, Self::Error> {
        TierTable::new(tiers)
    }
}

impl From<TierTable> for Vec<PricingTier> {
    fn from(table: TierTable) -> Self {
        table.0
    }
}

fn malformed(reason: impl Into<String>) -> CoreError {
    CoreError::MalformedTierTable {
        reason: reason.into(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_table_is_well_formed() {
        let reference = TierTable::reference();
        let rebuilt = TierTable::new(reference.tiers().to_vec()).unwrap();
        assert_eq!(rebuilt, reference);
        assert_eq!(reference.tiers().len(), 6);
        assert_eq!(reference.list_price().cents(), 100);
    }

    #[test]
    fn test_find_is_inclusive_on_both_ends() {
        let table = TierTable::reference();
        assert_eq!(table.find(9).unwrap().price_per_unit.cents(), 100);
        assert_eq!(table.find(10).unwrap().price_per_unit.cents(), 90);
        assert_eq!(table.find(49).unwrap().price_per_unit.cents(), 90);
        assert_eq!(table.find(50).unwrap().price_per_unit.cents(), 80);
        assert_eq!(table.find(1_000_000).unwrap().price_per_unit.cents(), 50);
        assert!(table.find(0).is_none());
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            TierTable::new(vec![]),
            Err(CoreError::MalformedTierTable { .. })
        ));
    }

    #[test]
    fn test_rejects_overlap_and_gap() {
        let overlap = TierTable::new(vec![
            PricingTier::bounded(1, 10, 100),
            PricingTier::open_ended(10, 90),
        ]);
        assert!(overlap.is_err());

        let gap = TierTable::new(vec![
            PricingTier::bounded(1, 9, 100),
            PricingTier::open_ended(11, 90),
        ]);
        assert!(gap.is_err());
    }

    #[test]
    fn test_rejects_misplaced_open_end() {
        let open_middle = TierTable::new(vec![
            PricingTier::open_ended(1, 100),
            PricingTier::open_ended(10, 90),
        ]);
        assert!(open_middle.is_err());

        let closed_last = TierTable::new(vec![
            PricingTier::bounded(1, 9, 100),
            PricingTier::bounded(10, 49, 90),
        ]);
        assert!(closed_last.is_err());
    }

    #[test]
    fn test_rejects_bad_prices_and_bounds() {
        let free = TierTable::new(vec![PricingTier::open_ended(1, 0)]);
        assert!(free.is_err());

        let inverted = TierTable::new(vec![
            PricingTier::bounded(5, 2, 100),
            PricingTier::open_ended(3, 90),
        ]);
        assert!(inverted.is_err());

        let zero_start = TierTable::new(vec![PricingTier::open_ended(0, 100)]);
        assert!(zero_start.is_err());
    }

    #[test]
    fn test_rejects_price_increase() {
        let penalizing = TierTable::new(vec![
            PricingTier::bounded(1, 9, 90),
            PricingTier::open_ended(10, 100),
        ]);
        let err = penalizing.unwrap_err();
        assert!(err.to_string().contains("costs more per unit"));
    }

    #[test]
    fn test_table_may_start_above_one() {
        let wholesale = TierTable::new(vec![
            PricingTier::bounded(500, 999, 40),
            PricingTier::open_ended(1000, 30),
        ])
        .unwrap();
        assert!(wholesale.find(100).is_none());
        assert_eq!(wholesale.find(500).unwrap().price_per_unit.cents(), 40);
    }

    #[test]
    fn test_rebased_keeps_ratios_and_floor() {
        let rebased = TierTable::reference().rebased(Money::from_cents(229));
        let prices: Vec<i64> = rebased
            .tiers()
            .iter()
            .map(|t| t.price_per_unit.cents())
            .collect();
        assert_eq!(prices, vec![229, 206, 183, 160, 137, 115]);

        let tiny = TierTable::reference().rebased(Money::from_cents(1));
        assert!(tiny.tiers().iter().all(|t| t.price_per_unit.cents() >= 1));
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let json = r#"[{"minQuantity":1,"maxQuantity":9,"pricePerUnit":100},
                       {"minQuantity":10,"pricePerUnit":90}]"#;
        let table: TierTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.tiers().len(), 2);

        let gapped = r#"[{"minQuantity":1,"maxQuantity":9,"pricePerUnit":100},
                         {"minQuantity":12,"pricePerUnit":90}]"#;
        assert!(serde_json::from_str::<TierTable>(gapped).is_err());
    }
}
