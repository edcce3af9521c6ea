//! # Customer Catalog
//!
//! Turns finished-goods inventory into the list of potions offered to
//! customers.
//!
//! ## Rules
//! - At most [`MAX_CATALOG_SKUS`] entries
//! - Sold-out recipes are not listed
//! - Pure red, green, blue first, then every other recipe by SKU
//! - One price for every potion

use crate::error::CoreResult;
use crate::types::{CatalogItem, Color, PotionStock};
use crate::validation::validate_catalog_price;
use crate::{MAX_CATALOG_SKUS, MAX_MIX_QUANTITY};

/// SKU under which a recipe is stocked and sold.
///
/// ## Example
/// ```rust
/// use potion_core::catalog::sku_for_recipe;
///
/// assert_eq!(sku_for_recipe(&[100, 0, 0, 0]), "RED_POTION_0");
/// assert_eq!(sku_for_recipe(&[50, 0, 0, 50]), "MIX_50_0_0_50");
/// ```
pub fn sku_for_recipe(recipe: &[i64; 4]) -> String {
    match pure_color(recipe) {
        Some(color) => format!("{}_POTION_0", color.name().to_uppercase()),
        None => format!(
            "MIX_{}_{}_{}_{}",
            recipe[0], recipe[1], recipe[2], recipe[3]
        ),
    }
}

/// Display name of a recipe ("red potion", "mixed potion").
pub fn name_for_recipe(recipe: &[i64; 4]) -> String {
    match pure_color(recipe) {
        Some(color) => format!("{color} potion"),
        None => "mixed potion".to_string(),
    }
}

fn pure_color(recipe: &[i64; 4]) -> Option<Color> {
    Color::ALL.into_iter().find(|c| *recipe == c.pure_recipe())
}

/// Listing priority: pure red, green, blue, then everything else.
fn listing_rank(stock: &PotionStock) -> usize {
    match pure_color(&stock.potion_type) {
        Some(Color::Red) => 0,
        Some(Color::Green) => 1,
        Some(Color::Blue) => 2,
        _ => 3,
    }
}

/// Builds the customer catalog from potion stock.
///
/// Fails only when `price` is outside the allowed catalog range.
pub fn build_catalog(stock: &[PotionStock], price: i64) -> CoreResult<Vec<CatalogItem>> {
    validate_catalog_price(price)?;

    let mut listed: Vec<&PotionStock> = stock.iter().filter(|s| s.quantity > 0).collect();
    listed.sort_by(|a, b| {
        listing_rank(a)
            .cmp(&listing_rank(b))
            .then_with(|| a.sku.cmp(&b.sku))
    });

    Ok(listed
        .into_iter()
        .take(MAX_CATALOG_SKUS)
        .map(|s| CatalogItem {
            sku: s.sku.clone(),
            name: name_for_recipe(&s.potion_type),
            quantity: s.quantity.min(MAX_MIX_QUANTITY),
            price,
            potion_type: s.potion_type,
        })
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_catalog_item;

    fn stock(recipe: [i64; 4], quantity: i64) -> PotionStock {
        PotionStock {
            sku: sku_for_recipe(&recipe),
            potion_type: recipe,
            quantity,
        }
    }

    #[test]
    fn lists_pure_colors_first() {
        let items = build_catalog(
            &[
                stock([0, 0, 100, 0], 3),
                stock([50, 50, 0, 0], 1),
                stock([100, 0, 0, 0], 10),
                stock([0, 100, 0, 0], 7),
            ],
            50,
        )
        .unwrap();

        let skus: Vec<&str> = items.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(
            skus,
            vec!["RED_POTION_0", "GREEN_POTION_0", "BLUE_POTION_0", "MIX_50_50_0_0"]
        );
        assert_eq!(items[0].name, "red potion");
        assert_eq!(items[3].name, "mixed potion");
        assert!(items.iter().all(|i| validate_catalog_item(i).is_ok()));
    }

    #[test]
    fn skips_sold_out_recipes() {
        let items = build_catalog(
            &[stock([100, 0, 0, 0], 0), stock([0, 100, 0, 0], 2)],
            50,
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sku, "GREEN_POTION_0");
    }

    #[test]
    fn caps_listing_at_six_skus() {
        let recipes = [
            [100, 0, 0, 0],
            [0, 100, 0, 0],
            [0, 0, 100, 0],
            [0, 0, 0, 100],
            [50, 50, 0, 0],
            [50, 0, 50, 0],
            [0, 50, 50, 0],
        ];
        let rows: Vec<PotionStock> = recipes.iter().map(|r| stock(*r, 1)).collect();
        let items = build_catalog(&rows, 50).unwrap();
        assert_eq!(items.len(), MAX_CATALOG_SKUS);
    }

    #[test]
    fn clamps_large_quantities() {
        let items = build_catalog(&[stock([100, 0, 0, 0], 25_000)], 50).unwrap();
        assert_eq!(items[0].quantity, MAX_MIX_QUANTITY);
    }

    #[test]
    fn rejects_out_of_range_price() {
        assert!(build_catalog(&[], 0).is_err());
        assert!(build_catalog(&[], 501).is_err());
    }

    #[test]
    fn recipe_skus() {
        assert_eq!(sku_for_recipe(&[0, 0, 0, 100]), "DARK_POTION_0");
        assert_eq!(sku_for_recipe(&[25, 25, 25, 25]), "MIX_25_25_25_25");
    }
}
