//! # Domain Types
//!
//! Core domain types used throughout the potion shop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Barrel      │   │ InventoryState  │   │   BarrelOrder   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku            │──►│  gold           │──►│  sku            │       │
//! │  │  ml_per_barrel  │   │  red/green/...  │   │  quantity       │       │
//! │  │  potion_type f64│   │  max capacity   │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  BottlingState  │──►│   PotionMix     │   │  PotionStock    │       │
//! │  │  ml pools       │   │  potion_type i64│   │  sku + mix +    │       │
//! │  │  max capacity   │   │  quantity       │   │  quantity       │       │
//! │  │  current stock  │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Color Vectors
//! Every recipe is a `[red, green, blue, dark]` array. Barrels carry `f64`
//! fractions summing to 1.0; potions carry integer percentages summing to 100.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gold::Gold;

// =============================================================================
// Color
// =============================================================================

/// One of the four raw liquid colors, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Green,
    Blue,
    Dark,
}

impl Color {
    /// All colors in `[red, green, blue, dark]` order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Dark];

    /// Position of this color in a color vector.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
            Color::Dark => 3,
        }
    }

    /// Lowercase name, as used in column names (`red_ml`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Dark => "dark",
        }
    }

    /// The pure potion recipe for this color (`[100, 0, 0, 0]` for red).
    pub fn pure_recipe(self) -> [i64; 4] {
        let mut recipe = [0; 4];
        recipe[self.index()] = crate::POTION_PROPORTION_TOTAL;
        recipe
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Barrel
// =============================================================================

/// A wholesale barrel offered in the supplier catalog, or delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrel {
    /// Supplier SKU (e.g. `SMALL_RED_BARREL`).
    pub sku: String,

    /// ml of liquid in one barrel. Must be > 0.
    pub ml_per_barrel: i64,

    /// Color fractions `[r, g, b, d]` summing to 1.0.
    pub potion_type: [f64; 4],

    /// Price of one barrel in gold. Must be >= 0.
    pub price: i64,

    /// Barrels available from the supplier (catalog) or delivered (delivery).
    pub quantity: i64,
}

impl Barrel {
    /// Creates a barrel entry.
    pub fn new(
        sku: impl Into<String>,
        ml_per_barrel: i64,
        potion_type: [f64; 4],
        price: i64,
        quantity: i64,
    ) -> Self {
        Barrel {
            sku: sku.into(),
            ml_per_barrel,
            potion_type,
            price,
            quantity,
        }
    }

    /// Returns the price as Gold.
    #[inline]
    pub fn cost(&self) -> Gold {
        Gold::new(self.price)
    }

    /// ml of `color` in a single barrel, before truncation.
    #[inline]
    pub fn ml_of(&self, color: Color) -> f64 {
        self.ml_per_barrel as f64 * self.potion_type[color.index()]
    }
}

// =============================================================================
// Barrel Order
// =============================================================================

/// One line of a barrel purchase plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrelOrder {
    pub sku: String,
    /// Always > 0.
    pub quantity: i64,
}

// =============================================================================
// Inventory State
// =============================================================================

/// Snapshot consumed by the barrel planner.
///
/// Read fresh at the start of each planning call and never mutated by the
/// planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryState {
    pub gold: Gold,
    pub red_ml: i64,
    pub green_ml: i64,
    pub blue_ml: i64,
    pub dark_ml: i64,
    /// Total ml the shop can store. Must be > 0.
    pub max_barrel_capacity: i64,
}

impl InventoryState {
    /// Creates a snapshot with empty ml pools.
    pub fn new(gold: Gold, max_barrel_capacity: i64) -> Self {
        InventoryState {
            gold,
            red_ml: 0,
            green_ml: 0,
            blue_ml: 0,
            dark_ml: 0,
            max_barrel_capacity,
        }
    }

    /// Sets the ml pool for one color.
    pub fn with_ml(mut self, color: Color, ml: i64) -> Self {
        match color {
            Color::Red => self.red_ml = ml,
            Color::Green => self.green_ml = ml,
            Color::Blue => self.blue_ml = ml,
            Color::Dark => self.dark_ml = ml,
        }
        self
    }

    /// ml pools as a `[r, g, b, d]` vector.
    #[inline]
    pub fn ml_pool(&self) -> [i64; 4] {
        [self.red_ml, self.green_ml, self.blue_ml, self.dark_ml]
    }

    /// Total ml currently in storage, saturating at `i64::MAX`.
    pub fn total_ml(&self) -> i64 {
        self.ml_pool().into_iter().fold(0, i64::saturating_add)
    }
}

// =============================================================================
// Potion Mix
// =============================================================================

/// A bottled product recipe and a count of units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PotionMix {
    /// Integer percentages `[r, g, b, d]` summing to 100.
    pub potion_type: [i64; 4],
    /// Between 1 and 10000.
    pub quantity: i64,
}

impl PotionMix {
    /// Creates a mix.
    pub fn new(potion_type: [i64; 4], quantity: i64) -> Self {
        PotionMix {
            potion_type,
            quantity,
        }
    }

    /// A mix of a single pure color.
    pub fn pure(color: Color, quantity: i64) -> Self {
        PotionMix::new(color.pure_recipe(), quantity)
    }

    /// Returns the color if this recipe is 100% of one color.
    pub fn pure_color(&self) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|c| self.potion_type == c.pure_recipe())
    }

    /// ml of `color` consumed by bottling this whole line.
    #[inline]
    pub fn ml_required(&self, color: Color) -> i64 {
        self.potion_type[color.index()] * self.quantity
    }
}

// =============================================================================
// Bottling State
// =============================================================================

/// Snapshot consumed by the bottle planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottlingState {
    pub red_ml: i64,
    pub green_ml: i64,
    pub blue_ml: i64,
    pub dark_ml: i64,
    /// Total potions the shop can hold. Must be > 0.
    pub maximum_potion_capacity: i64,
    /// Potions already bottled, one entry per recipe.
    pub current_potion_inventory: Vec<PotionMix>,
}

impl BottlingState {
    /// Creates a state with empty ml pools and no potions.
    pub fn new(maximum_potion_capacity: i64) -> Self {
        BottlingState {
            red_ml: 0,
            green_ml: 0,
            blue_ml: 0,
            dark_ml: 0,
            maximum_potion_capacity,
            current_potion_inventory: Vec::new(),
        }
    }

    /// Sets the ml pool for one color.
    pub fn with_ml(mut self, color: Color, ml: i64) -> Self {
        match color {
            Color::Red => self.red_ml = ml,
            Color::Green => self.green_ml = ml,
            Color::Blue => self.blue_ml = ml,
            Color::Dark => self.dark_ml = ml,
        }
        self
    }

    /// Sets the potions already in stock.
    pub fn with_inventory(mut self, inventory: Vec<PotionMix>) -> Self {
        self.current_potion_inventory = inventory;
        self
    }

    /// ml of one color.
    pub fn ml(&self, color: Color) -> i64 {
        match color {
            Color::Red => self.red_ml,
            Color::Green => self.green_ml,
            Color::Blue => self.blue_ml,
            Color::Dark => self.dark_ml,
        }
    }

    /// Number of potions already bottled.
    pub fn potions_in_stock(&self) -> i64 {
        self.current_potion_inventory
            .iter()
            .map(|m| m.quantity)
            .sum()
    }
}

// =============================================================================
// Potion Stock / Catalog
// =============================================================================

/// A row of finished-goods inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionStock {
    pub sku: String,
    pub potion_type: [i64; 4],
    /// May be zero when the recipe is sold out.
    pub quantity: i64,
}

/// An item listed in the customer-facing catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Matches `^[a-zA-Z0-9_]{1,20}$`.
    pub sku: String,
    pub name: String,
    /// Between 1 and 10000.
    pub quantity: i64,
    /// Between 1 and 500.
    pub price: i64,
    pub potion_type: [i64; 4],
}

// =============================================================================
// Audit and Capacity
// =============================================================================

/// Summary reported to the exchange for reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAudit {
    pub number_of_potions: i64,
    pub ml_in_barrels: i64,
    pub gold: Gold,
}

/// Extra capacity units to buy this tick (each between 0 and 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapacityPlan {
    pub potion_capacity: i64,
    pub ml_capacity: i64,
}

impl CapacityPlan {
    /// Gold cost of this plan.
    pub fn cost(&self) -> Gold {
        Gold::new(crate::CAPACITY_UNIT_PRICE).times(self.potion_capacity + self.ml_capacity)
    }
}

// =============================================================================
// Customers
// =============================================================================

/// A customer visiting the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
    pub character_class: String,
    /// Between 1 and 20.
    pub level: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
