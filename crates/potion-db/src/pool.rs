//! # Shop Ledger Pool
//!
//! One SQLite file holds gold, ml, potion stock, carts and the delivery
//! ledger. [`Database`] owns the pool and hands out a repository per table
//! group.
//!
//! ```text
//!   planner snapshots ──read──┐
//!                             ▼
//!   Database (SqlitePool, WAL) ──► inventory() potions() deliveries() carts()
//!                             ▲
//!   deliveries, checkout ─────┘ one write transaction at a time
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::cart::CartRepository;
use crate::repository::delivery::DeliveryRepository;
use crate::repository::inventory::InventoryRepository;
use crate::repository::potion::PotionRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the shop's ledger lives and how many connections may touch it.
///
/// Planning only reads, so a couple of connections is plenty: one for the
/// delivery or checkout transaction that currently holds the write lock,
/// the rest for snapshots taken while it runs.
///
/// ```rust,ignore
/// let config = DbConfig::new(&shop_config.database_path).max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,

    /// Default 5.
    pub max_connections: u32,

    /// How long a snapshot or delivery waits for a free connection before
    /// failing with `ConnectionFailed`. Default 30s.
    pub acquire_timeout: Duration,

    /// Apply the embedded schema on open. Default true.
    pub run_migrations: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// A throwaway shop ledger for tests. Each in-memory database belongs
    /// to one connection, so the pool is pinned to one.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the shop ledger. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the ledger and brings its schema up to date.
    ///
    /// WAL keeps planner snapshots readable while a delivery commits.
    /// Foreign keys are switched on so cart lines can't outlive their cart.
    /// A fresh file gets the single `global_inventory` row from the first
    /// migration.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening shop ledger"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Ledger pool ready");

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies any pending schema migrations. Safe to call again.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        info!("Shop schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Gold and raw ml.
    pub fn inventory(&self) -> InventoryRepository {
        InventoryRepository::new(self.pool.clone())
    }

    /// Bottled potion stock.
    pub fn potions(&self) -> PotionRepository {
        PotionRepository::new(self.pool.clone())
    }

    /// Which barrel and bottle orders were already applied.
    pub fn deliveries(&self) -> DeliveryRepository {
        DeliveryRepository::new(self.pool.clone())
    }

    /// Carts, checkouts and the order history behind search.
    pub fn carts(&self) -> CartRepository {
        CartRepository::new(self.pool.clone())
    }

    /// Waits for in-flight deliveries to finish, then closes the pool.
    /// Later repository calls fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// `true` when the ledger answers a trivial query.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
