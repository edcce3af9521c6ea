//! # potion-db: Database Layer for the Potion Shop
//!
//! Storage, configuration and the [`Shop`] service that feeds the pure
//! planners in `potion-core`. SQLite for local storage, sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Potion Shop Data Flow                              │
//! │                                                                         │
//! │  Caller (tick handler, seed binary)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   potion-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────────┐  │   │
//! │  │   │     Shop     │──►│  Repositories │──►│    Database      │  │   │
//! │  │   │  (shop.rs)   │   │ inventory     │   │   (pool.rs)      │  │   │
//! │  │   │              │   │ potion        │   │                  │  │   │
//! │  │   │ plan/deliver │   │ delivery      │   │ SqlitePool       │  │   │
//! │  │   │ catalog/cart │   │ cart          │   │ + migrations     │  │   │
//! │  │   └──────┬───────┘   └───────────────┘   └──────────────────┘  │   │
//! │  │          │                                                      │   │
//! │  │          ▼                                                      │   │
//! │  │   potion-core planners (pure)                                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (POTION_DB_PATH, default ./potion_shop.db)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Environment configuration
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`shop`] - The shop service
//!
//! ## Usage
//!
//! ```rust,ignore
//! use potion_db::{Shop, ShopConfig};
//!
//! let shop = Shop::open(ShopConfig::load()?).await?;
//!
//! let orders = shop.barrel_plan(&supplier_catalog).await?;
//! shop.deliver_barrels(order_id, &delivered).await?;
//!
//! let mixes = shop.bottle_plan().await?;
//! shop.deliver_bottles(order_id, &mixes).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod shop;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, ShopConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use shop::Shop;

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::delivery::{DeliveryKind, DeliveryRepository};
pub use repository::inventory::InventoryRepository;
pub use repository::potion::PotionRepository;
