//! # Barrel Planner
//!
//! Decides which wholesale barrels to buy from a supplier catalog.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Greedy Barrel Purchasing                             │
//! │                                                                         │
//! │  gold, storage_used, ml[r,g,b,d] ◄── InventoryState                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──► scarce = argmin(ml)      (ties → red, green, blue, dark)         │
//! │  │        │                                                             │
//! │  │        ▼                                                             │
//! │  │   rank barrels by ml[scarce] per gold, best first                   │
//! │  │        │                                                             │
//! │  │        ▼                                                             │
//! │  │   first barrel that is in stock, affordable, and fits storage       │
//! │  │        │                                                             │
//! │  │        ├── none? ──► stop, return orders                             │
//! │  │        │                                                             │
//! │  │        ▼                                                             │
//! │  │   buy one: gold -= price, storage += ml, ml[c] += ml × fraction     │
//! │  └────────┘                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fixing the scarcest color each round keeps the colors balanced instead of
//! spending all gold on one. Every purchase consumes a unit of supplier
//! stock and `ml_per_barrel > 0` of storage, so the loop always terminates.

use std::cmp::Ordering;

use tracing::debug;

use crate::gold::Gold;
use crate::types::{Barrel, BarrelOrder, Color, InventoryState};

// =============================================================================
// Planner
// =============================================================================

/// Produces a barrel purchase plan for the given snapshot and catalog.
///
/// Input is expected to have passed
/// [`validate_barrels`](crate::validation::validate_barrels). The catalog is
/// not modified; supplier stock is tracked on a local copy.
///
/// Orders are aggregated per SKU, in the order each SKU was first bought.
///
/// ## Example
/// ```rust
/// use potion_core::barrel::plan_barrels;
/// use potion_core::gold::Gold;
/// use potion_core::types::{Barrel, InventoryState};
///
/// let catalog = vec![Barrel::new("SMALL_RED_BARREL", 1000, [1.0, 0.0, 0.0, 0.0], 100, 10)];
///
/// // Can't afford anything
/// let broke = InventoryState::new(Gold::new(50), 10_000);
/// assert!(plan_barrels(&broke, &catalog).is_empty());
/// ```
pub fn plan_barrels(state: &InventoryState, catalog: &[Barrel]) -> Vec<BarrelOrder> {
    let mut gold = state.gold;
    let mut current_ml = state.ml_pool();
    let mut storage_used = state.total_ml();
    let mut remaining: Vec<i64> = catalog.iter().map(|b| b.quantity).collect();
    let mut orders: Vec<BarrelOrder> = Vec::new();

    loop {
        let scarce = scarcest_color(&current_ml);

        let ranked = rank_by_density(catalog, &remaining, scarce);
        let pick = ranked.into_iter().find(|&i| {
            let barrel = &catalog[i];
            remaining[i] > 0
                && gold.can_afford(barrel.cost())
                && barrel.ml_per_barrel <= state.max_barrel_capacity.saturating_sub(storage_used)
        });

        let Some(i) = pick else {
            break;
        };
        let barrel = &catalog[i];

        gold -= barrel.cost();
        storage_used = storage_used.saturating_add(barrel.ml_per_barrel);
        for color in Color::ALL {
            let pool = &mut current_ml[color.index()];
            *pool = pool.saturating_add(barrel.ml_of(color) as i64);
        }
        remaining[i] -= 1;

        debug!(
            sku = %barrel.sku,
            scarce = %scarce,
            gold_left = gold.amount(),
            storage_used,
            "Planned barrel purchase"
        );

        add_to_orders(&mut orders, &barrel.sku);
    }

    orders
}

/// Sum of `price × quantity` across a plan, resolved against its catalog.
///
/// SKUs that aren't in the catalog contribute nothing.
pub fn plan_cost(orders: &[BarrelOrder], catalog: &[Barrel]) -> Gold {
    orders
        .iter()
        .filter_map(|o| {
            catalog
                .iter()
                .find(|b| b.sku == o.sku)
                .map(|b| b.cost().times(o.quantity))
        })
        .sum()
}

/// Sum of `ml_per_barrel × quantity` across a plan.
pub fn plan_ml(orders: &[BarrelOrder], catalog: &[Barrel]) -> i64 {
    orders
        .iter()
        .filter_map(|o| {
            catalog
                .iter()
                .find(|b| b.sku == o.sku)
                .map(|b| b.ml_per_barrel.saturating_mul(o.quantity))
        })
        .fold(0, i64::saturating_add)
}

// =============================================================================
// Helpers
// =============================================================================

/// Color with the least ml. The first minimum wins, so ties go to red,
/// then green, then blue, then dark.
pub fn scarcest_color(ml: &[i64; 4]) -> Color {
    let mut scarce = Color::Red;
    for color in Color::ALL {
        if ml[color.index()] < ml[scarce.index()] {
            scarce = color;
        }
    }
    scarce
}

/// ml of `color` obtained per gold spent on one barrel.
///
/// Free barrels that carry the color rank above everything else. A free
/// barrel without the color has density 0.
pub fn value_density(barrel: &Barrel, color: Color) -> f64 {
    let ml = barrel.ml_of(color);
    if barrel.price == 0 {
        if ml > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        ml / barrel.price as f64
    }
}

/// Indices of barrels still in stock, best density first.
///
/// The sort is stable: equal densities keep catalog order.
fn rank_by_density(catalog: &[Barrel], remaining: &[i64], color: Color) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = catalog
        .iter()
        .enumerate()
        .filter(|(i, _)| remaining[*i] > 0)
        .map(|(i, b)| (i, value_density(b, color)))
        .collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.into_iter().map(|(i, _)| i).collect()
}

fn add_to_orders(orders: &mut Vec<BarrelOrder>, sku: &str) {
    match orders.iter_mut().find(|o| o.sku == sku) {
        Some(order) => order.quantity += 1,
        None => orders.push(BarrelOrder {
            sku: sku.to_string(),
            quantity: 1,
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
