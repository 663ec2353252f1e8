//! # Base Pricing Resolver
//!
//! Turns a quantity and a tier table into a [`PricingResult`].
//!
//! ## How a Price Is Resolved
//! ```text
//! quantity = 10, reference table
//!      │
//!      ▼
//! scan tiers ascending: [1-9] ✗  [10-49] ✓
//!      │
//!      ▼
//! unit     = 90
//! total    = 90 × 10  = 900
//! original = 100 × 10 = 1000   (first tier = list price)
//! savings  = 1000 - 900 = 100
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::tiers::TierTable;
use crate::types::PricingResult;
use crate::validation::validate_quantity;

/// Prices `quantity` stickers against `tiers`.
///
/// MOQ is not checked here; run a
/// [`QuantityValidator`](crate::validation::QuantityValidator) first.
///
/// ## Errors
/// - [`ValidationError::InvalidQuantity`](crate::ValidationError::InvalidQuantity)
///   for `quantity <= 0`
/// - [`CoreError::NoTierMatched`] when no tier covers the quantity
/// - [`CoreError::PriceOutOfRange`] when the total does not fit in i64 cents
///
/// ## Example
/// ```rust
/// use sticker_core::pricing::calculate_pricing;
/// use sticker_core::tiers::TierTable;
///
/// let result = calculate_pricing(250, &TierTable::reference()).unwrap();
/// assert_eq!(result.unit_price.cents(), 50);
/// assert_eq!(result.total_price.cents(), 12_500);
/// assert_eq!(result.savings.cents(), 12_500);
/// ```
pub fn calculate_pricing(quantity: i64, tiers: &TierTable) -> CoreResult<PricingResult> {
    validate_quantity(quantity)?;

    let applied_tier = *tiers
        .find(quantity)
        .ok_or(CoreError::NoTierMatched { quantity })?;

    let unit_price = applied_tier.price_per_unit;
    let line_total = |price: Money| {
        price.checked_multiply_quantity(quantity).ok_or_else(|| {
            CoreError::price_out_of_range(format!("{} stickers at {} each", quantity, price))
        })
    };
    let total_price = line_total(unit_price)?;
    let original_price = line_total(tiers.list_price())?;
    let savings = original_price.saturating_difference(total_price);

    Ok(PricingResult {
        quantity,
        unit_price,
        total_price,
        applied_tier,
        original_price,
        savings,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
