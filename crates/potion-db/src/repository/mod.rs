//! # Repository Module
//!
//! Database repository implementations for the potion shop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shop service                                                           │
//! │       │                                                                 │
//! │       │  db.deliveries().apply_barrels(order_id, &barrels)             │
//! │       ▼                                                                 │
//! │  DeliveryRepository                                                     │
//! │  ├── apply_barrels(&self, order_id, barrels)                           │
//! │  ├── apply_bottles(&self, order_id, mixes)                             │
//! │  └── history(&self, kind)                                              │
//! │       │                                                                 │
//! │       │  SQL (one transaction per delivery)                             │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`](inventory::InventoryRepository) - Gold, ml, audit, reset
//! - [`PotionRepository`](potion::PotionRepository) - Finished potion stock
//! - [`DeliveryRepository`](delivery::DeliveryRepository) - Delivery ledger
//! - [`CartRepository`](cart::CartRepository) - Carts, checkout, order search

pub mod cart;
pub mod delivery;
pub mod inventory;
pub mod potion;
