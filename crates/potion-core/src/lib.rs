//! # potion-core: Pure Business Logic for the Potion Shop
//!
//! This crate holds the decision logic of the potion shop as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Potion Shop Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Caller (game tick / HTTP layer, external)          │   │
//! │  │   barrel plan ──► barrel delivery ──► bottle plan ──► checkout  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ potion-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  barrel   │  │  bottler  │  │  catalog  │  │ validation│  │   │
//! │  │   │  planner  │  │  planner  │  │   cart    │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  potion-db (Persistence Layer)                  │   │
//! │  │        SQLite inventory, delivery ledger, carts, orders         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Barrel, PotionMix, InventoryState, ...)
//! - [`gold`] - Gold type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation of barrels and potion mixes
//! - [`barrel`] - Wholesale barrel purchase planner
//! - [`bottler`] - Potion bottling planner
//! - [`delivery`] - Effects of confirmed barrel and bottle deliveries
//! - [`catalog`] - Customer-facing catalog built from potion stock
//! - [`cart`] - Checkout totals and order line search
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same snapshot in, same plan out
//! 2. **No I/O**: the caller reads inventory and persists effects
//! 3. **Integer Gold and ml**: only barrel proportions are floating point
//! 4. **Validate at the Boundary**: planners are total over valid input
//!
//! ## Example Usage
//!
//! ```rust
//! use potion_core::barrel::plan_barrels;
//! use potion_core::gold::Gold;
//! use potion_core::types::{Barrel, InventoryState};
//!
//! let state = InventoryState::new(Gold::new(100), 10_000);
//! let catalog = vec![Barrel::new("SMALL_RED_BARREL", 1000, [1.0, 0.0, 0.0, 0.0], 100, 10)];
//!
//! let plan = plan_barrels(&state, &catalog);
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan[0].sku, "SMALL_RED_BARREL");
//! assert_eq!(plan[0].quantity, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barrel;
pub mod bottler;
pub mod cart;
pub mod catalog;
pub mod delivery;
pub mod error;
pub mod gold;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barrel::plan_barrels;
pub use bottler::plan_bottles;
pub use error::{CoreError, CoreResult, ValidationError};
pub use gold::Gold;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Milliliters of liquid in one bottled potion.
pub const ML_PER_POTION: i64 = 100;

/// Integer proportions of a potion mix must sum to this value.
pub const POTION_PROPORTION_TOTAL: i64 = 100;

/// Tolerance used when checking that barrel proportions sum to 1.0.
pub const PROPORTION_TOLERANCE: f64 = 1e-6;

/// Largest quantity a single potion mix line may carry.
pub const MAX_MIX_QUANTITY: i64 = 10_000;

/// At most this many potion SKUs may be offered in the catalog at once.
pub const MAX_CATALOG_SKUS: usize = 6;

/// Catalog prices must fall in `[MIN_CATALOG_PRICE, MAX_CATALOG_PRICE]`.
pub const MIN_CATALOG_PRICE: i64 = 1;

/// See [`MIN_CATALOG_PRICE`].
pub const MAX_CATALOG_PRICE: i64 = 500;

/// Capacity purchase plans buy between 0 and this many units per kind.
pub const MAX_CAPACITY_UNITS: i64 = 10;

/// ml storage granted by one capacity unit.
pub const ML_PER_CAPACITY_UNIT: i64 = 10_000;

/// Potion storage granted by one capacity unit.
pub const POTIONS_PER_CAPACITY_UNIT: i64 = 50;

/// Gold cost of one additional capacity unit.
pub const CAPACITY_UNIT_PRICE: i64 = 1_000;

/// Gold the shop holds after an administrative reset.
pub const DEFAULT_STARTING_GOLD: i64 = 100;

/// Listed price of every potion in the catalog.
pub const DEFAULT_POTION_PRICE: i64 = 50;

/// Order line search returns pages of this many results.
pub const SEARCH_PAGE_SIZE: usize = 5;
