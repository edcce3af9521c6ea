//! # Validation Module
//!
//! Boundary validation for everything the planners and delivery handlers
//! consume.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  └── Shape: 4-element color vectors, integer fields                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Barrel proportions sum to 1.0 (± 1e-6)                            │
//! │  ├── Potion proportions sum to exactly 100                             │
//! │  └── Quantity / price / ml bounds                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite CHECK constraints)                           │
//! │  └── ml, gold and stock never negative                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Planners assume their input passed through here; they never fail.
//!
//! ## Usage
//! ```rust
//! use potion_core::types::{Barrel, PotionMix};
//! use potion_core::validation::{validate_barrel, validate_potion_mix};
//!
//! let barrel = Barrel::new("SMALL_RED_BARREL", 1000, [1.0, 0.0, 0.0, 0.0], 100, 10);
//! assert!(validate_barrel(&barrel).is_ok());
//!
//! let mix = PotionMix::new([50, 50, 0, 0], 3);
//! assert!(validate_potion_mix(&mix).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{
    Barrel, BottlingState, CapacityPlan, CatalogItem, Customer, InventoryState, PotionMix,
};
use crate::{
    MAX_CAPACITY_UNITS, MAX_CATALOG_PRICE, MAX_MIX_QUANTITY, MIN_CATALOG_PRICE,
    POTION_PROPORTION_TOTAL, PROPORTION_TOLERANCE,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest SKU the customer catalog accepts.
const MAX_CATALOG_SKU_LEN: usize = 20;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a supplier barrel SKU.
///
/// ## Rules
/// - Must not be empty (after trimming)
pub fn validate_barrel_sku(sku: &str) -> ValidationResult<()> {
    if sku.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    Ok(())
}

/// Validates a customer catalog SKU.
///
/// ## Rules
/// - 1 to 20 characters
/// - ASCII letters, digits and underscores only
///
/// ## Example
/// ```rust
/// use potion_core::validation::validate_catalog_sku;
///
/// assert!(validate_catalog_sku("RED_POTION_0").is_ok());
/// assert!(validate_catalog_sku("").is_err());
/// assert!(validate_catalog_sku("RED-POTION").is_err());
/// ```
pub fn validate_catalog_sku(sku: &str) -> ValidationResult<()> {
    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_CATALOG_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_CATALOG_SKU_LEN,
        });
    }

    if !sku.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Barrel Validators
// =============================================================================

/// Validates barrel color fractions.
///
/// ## Rules
/// - Every fraction is finite and >= 0
/// - Fractions sum to 1.0 within [`PROPORTION_TOLERANCE`]
pub fn validate_barrel_proportions(potion_type: &[f64; 4]) -> ValidationResult<()> {
    if potion_type.iter().any(|p| !p.is_finite() || *p < 0.0) {
        return Err(ValidationError::MustNotBeNegative {
            field: "potion_type".to_string(),
        });
    }

    let total: f64 = potion_type.iter().sum();
    if (total - 1.0).abs() >= PROPORTION_TOLERANCE {
        return Err(ValidationError::InvalidProportions {
            field: "potion_type".to_string(),
            expected: "1.0".to_string(),
            actual: total.to_string(),
        });
    }

    Ok(())
}

/// Validates a barrel catalog entry or delivered barrel.
///
/// ## Rules
/// - `sku` non-empty
/// - `ml_per_barrel > 0`
/// - `price >= 0`, `quantity >= 0`
/// - `potion_type` sums to 1.0
pub fn validate_barrel(barrel: &Barrel) -> ValidationResult<()> {
    validate_barrel_sku(&barrel.sku)?;

    if barrel.ml_per_barrel <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "ml_per_barrel".to_string(),
        });
    }

    if barrel.price < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    if barrel.quantity < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
        });
    }

    validate_barrel_proportions(&barrel.potion_type)
}

/// Validates every barrel in a catalog or delivery.
pub fn validate_barrels(barrels: &[Barrel]) -> ValidationResult<()> {
    barrels.iter().try_for_each(validate_barrel)
}

// =============================================================================
// Potion Validators
// =============================================================================

/// Validates integer potion proportions.
///
/// ## Rules
/// - Every component >= 0
/// - Components sum to exactly 100
pub fn validate_potion_proportions(potion_type: &[i64; 4]) -> ValidationResult<()> {
    if potion_type.iter().any(|p| *p < 0) {
        return Err(ValidationError::MustNotBeNegative {
            field: "potion_type".to_string(),
        });
    }

    let total: i64 = potion_type.iter().sum();
    if total != POTION_PROPORTION_TOTAL {
        return Err(ValidationError::InvalidProportions {
            field: "potion_type".to_string(),
            expected: POTION_PROPORTION_TOTAL.to_string(),
            actual: total.to_string(),
        });
    }

    Ok(())
}

/// Validates a potion mix.
///
/// ## Rules
/// - `potion_type` sums to 100
/// - `quantity` in `[1, 10000]`
///
/// ## Example
/// ```rust
/// use potion_core::types::PotionMix;
/// use potion_core::validation::validate_potion_mix;
///
/// assert!(validate_potion_mix(&PotionMix::new([100, 0, 0, 0], 5)).is_ok());
/// assert!(validate_potion_mix(&PotionMix::new([90, 0, 0, 0], 5)).is_err());
/// assert!(validate_potion_mix(&PotionMix::new([100, 0, 0, 0], 0)).is_err());
/// ```
pub fn validate_potion_mix(mix: &PotionMix) -> ValidationResult<()> {
    validate_potion_proportions(&mix.potion_type)?;
    validate_mix_quantity(mix.quantity)
}

/// Validates every mix in a plan or delivery.
pub fn validate_potion_mixes(mixes: &[PotionMix]) -> ValidationResult<()> {
    mixes.iter().try_for_each(validate_potion_mix)
}

/// Validates a potion mix quantity (1 to 10000).
pub fn validate_mix_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_MIX_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_MIX_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Snapshot Validators
// =============================================================================

fn validate_ml_pool(pool: [i64; 4]) -> ValidationResult<()> {
    if pool.iter().any(|ml| *ml < 0) {
        return Err(ValidationError::MustNotBeNegative {
            field: "ml".to_string(),
        });
    }
    Ok(())
}

/// Validates a barrel planning snapshot.
pub fn validate_inventory_state(state: &InventoryState) -> ValidationResult<()> {
    if state.gold.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "gold".to_string(),
        });
    }

    validate_ml_pool(state.ml_pool())?;

    if state.max_barrel_capacity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "max_barrel_capacity".to_string(),
        });
    }

    Ok(())
}

/// Validates a bottling snapshot.
///
/// Stocked entries need valid proportions and a positive count. Stock is
/// not bounded by the per-delivery quantity limit.
pub fn validate_bottling_state(state: &BottlingState) -> ValidationResult<()> {
    validate_ml_pool([state.red_ml, state.green_ml, state.blue_ml, state.dark_ml])?;

    if state.maximum_potion_capacity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "maximum_potion_capacity".to_string(),
        });
    }

    state.current_potion_inventory.iter().try_for_each(|mix| {
        validate_potion_proportions(&mix.potion_type)?;
        if mix.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }
        Ok(())
    })
}

// =============================================================================
// Catalog, Cart and Capacity Validators
// =============================================================================

/// Validates a catalog listing.
pub fn validate_catalog_item(item: &CatalogItem) -> ValidationResult<()> {
    validate_catalog_sku(&item.sku)?;
    validate_mix_quantity(item.quantity)?;
    validate_catalog_price(item.price)?;
    validate_potion_proportions(&item.potion_type)
}

/// Validates a catalog price (1 to 500 gold).
pub fn validate_catalog_price(price: i64) -> ValidationResult<()> {
    if !(MIN_CATALOG_PRICE..=MAX_CATALOG_PRICE).contains(&price) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: MIN_CATALOG_PRICE,
            max: MAX_CATALOG_PRICE,
        });
    }

    Ok(())
}

/// Validates the quantity of a cart line.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_cart_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a visiting customer.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    if customer.customer_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer_name".to_string(),
        });
    }

    if !(1..=20).contains(&customer.level) {
        return Err(ValidationError::OutOfRange {
            field: "level".to_string(),
            min: 1,
            max: 20,
        });
    }

    Ok(())
}

/// Validates a capacity purchase plan (each kind 0 to 10 units).
pub fn validate_capacity_plan(plan: &CapacityPlan) -> ValidationResult<()> {
    for (field, units) in [
        ("potion_capacity", plan.potion_capacity),
        ("ml_capacity", plan.ml_capacity),
    ] {
        if !(0..=MAX_CAPACITY_UNITS).contains(&units) {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                min: 0,
                max: MAX_CAPACITY_UNITS,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gold::Gold;

    fn red_barrel() -> Barrel {
        Barrel::new("SMALL_RED_BARREL", 1000, [1.0, 0.0, 0.0, 0.0], 100, 10)
    }

    #[test]
    fn test_validate_barrel() {
        assert!(validate_barrel(&red_barrel()).is_ok());

        let mut free = red_barrel();
        free.price = 0;
        free.quantity = 0;
        assert!(validate_barrel(&free).is_ok());

        let mut empty_sku = red_barrel();
        empty_sku.sku = "  ".to_string();
        assert!(validate_barrel(&empty_sku).is_err());

        let mut no_ml = red_barrel();
        no_ml.ml_per_barrel = 0;
        assert_eq!(
            validate_barrel(&no_ml),
            Err(ValidationError::MustBePositive {
                field: "ml_per_barrel".to_string()
            })
        );

        let mut negative_price = red_barrel();
        negative_price.price = -1;
        assert!(validate_barrel(&negative_price).is_err());
    }

    #[test]
    fn test_barrel_proportion_tolerance() {
        assert!(validate_barrel_proportions(&[0.5, 0.5, 0.0, 0.0]).is_ok());
        // Thirds don't add to exactly 1.0 in floating point
        assert!(validate_barrel_proportions(&[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 0.0]).is_ok());
        assert!(validate_barrel_proportions(&[0.5, 0.5, 0.0000005, 0.0]).is_ok());

        assert!(validate_barrel_proportions(&[0.5, 0.4, 0.0, 0.0]).is_err());
        assert!(validate_barrel_proportions(&[1.0, 0.00001, 0.0, 0.0]).is_err());
        assert!(validate_barrel_proportions(&[1.5, -0.5, 0.0, 0.0]).is_err());
        assert!(validate_barrel_proportions(&[f64::NAN, 1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_validate_potion_mix() {
        assert!(validate_potion_mix(&PotionMix::new([100, 0, 0, 0], 1)).is_ok());
        assert!(validate_potion_mix(&PotionMix::new([25, 25, 25, 25], 10_000)).is_ok());

        assert!(validate_potion_mix(&PotionMix::new([50, 0, 0, 0], 1)).is_err());
        assert!(validate_potion_mix(&PotionMix::new([150, -50, 0, 0], 1)).is_err());
        assert!(validate_potion_mix(&PotionMix::new([100, 0, 0, 0], 0)).is_err());
        assert!(validate_potion_mix(&PotionMix::new([100, 0, 0, 0], 10_001)).is_err());
    }

    #[test]
    fn test_validate_catalog_sku() {
        assert!(validate_catalog_sku("RED_POTION_0").is_ok());
        assert!(validate_catalog_sku("abc123").is_ok());

        assert!(validate_catalog_sku("").is_err());
        assert!(validate_catalog_sku("has space").is_err());
        assert!(validate_catalog_sku(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_states() {
        let state = InventoryState::new(Gold::new(100), 10_000);
        assert!(validate_inventory_state(&state).is_ok());
        assert!(validate_inventory_state(&InventoryState::new(Gold::new(-1), 10_000)).is_err());
        assert!(validate_inventory_state(&InventoryState::new(Gold::new(100), 0)).is_err());

        let bottling = BottlingState::new(50);
        assert!(validate_bottling_state(&bottling).is_ok());
        assert!(validate_bottling_state(&BottlingState::new(0)).is_err());
        let bad_stock =
            BottlingState::new(50).with_inventory(vec![PotionMix::new([10, 0, 0, 0], 1)]);
        assert!(validate_bottling_state(&bad_stock).is_err());
        let deep_stock =
            BottlingState::new(50).with_inventory(vec![PotionMix::new([100, 0, 0, 0], 20_000)]);
        assert!(validate_bottling_state(&deep_stock).is_ok());
        let empty_stock =
            BottlingState::new(50).with_inventory(vec![PotionMix::new([100, 0, 0, 0], 0)]);
        assert!(validate_bottling_state(&empty_stock).is_err());
    }

    #[test]
    fn test_validate_capacity_plan() {
        assert!(validate_capacity_plan(&CapacityPlan::default()).is_ok());
        assert!(validate_capacity_plan(&CapacityPlan {
            potion_capacity: 10,
            ml_capacity: 10
        })
        .is_ok());
        assert!(validate_capacity_plan(&CapacityPlan {
            potion_capacity: 11,
            ml_capacity: 0
        })
        .is_err());
    }

    #[test]
    fn test_validate_customer() {
        let mut customer = Customer {
            customer_id: "c-1".to_string(),
            customer_name: "Ada".to_string(),
            character_class: "Wizard".to_string(),
            level: 7,
        };
        assert!(validate_customer(&customer).is_ok());

        customer.level = 21;
        assert!(validate_customer(&customer).is_err());
    }

    #[test]
    fn test_validate_cart_quantity() {
        assert!(validate_cart_quantity(1).is_ok());
        assert!(validate_cart_quantity(0).is_err());
    }
}
