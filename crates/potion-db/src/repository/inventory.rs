//! # Inventory Repository
//!
//! Gold and raw ml, stored in the single `global_inventory` row.
//!
//! ## Key Operations
//! - Snapshot for the barrel planner
//! - Audit totals for reconciliation
//! - Full reset of the shop

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use potion_core::{Gold, InventoryAudit, InventoryState};

/// The `global_inventory` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct InventoryRecord {
    pub gold: i64,
    pub red_ml: i64,
    pub green_ml: i64,
    pub blue_ml: i64,
    pub dark_ml: i64,
}

impl InventoryRecord {
    /// ml per color, in `[red, green, blue, dark]` order.
    pub fn ml_pool(&self) -> [i64; 4] {
        [self.red_ml, self.green_ml, self.blue_ml, self.dark_ml]
    }

    /// Converts into a planner snapshot.
    pub fn into_state(self, max_barrel_capacity: i64) -> InventoryState {
        InventoryState {
            gold: Gold::new(self.gold),
            red_ml: self.red_ml,
            green_ml: self.green_ml,
            blue_ml: self.blue_ml,
            dark_ml: self.dark_ml,
            max_barrel_capacity,
        }
    }
}

pub(crate) const SELECT_INVENTORY: &str = r#"
    SELECT gold, red_ml, green_ml, blue_ml, dark_ml
    FROM global_inventory
    WHERE id = 1
"#;

/// Repository for gold and raw ml.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Reads the inventory row.
    pub async fn get(&self) -> DbResult<InventoryRecord> {
        let record = sqlx::query_as::<_, InventoryRecord>(SELECT_INVENTORY)
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    /// Snapshot of gold and ml for the barrel planner.
    pub async fn snapshot(&self, max_barrel_capacity: i64) -> DbResult<InventoryState> {
        Ok(self.get().await?.into_state(max_barrel_capacity))
    }

    /// Gold on hand.
    pub async fn gold(&self) -> DbResult<Gold> {
        Ok(Gold::new(self.get().await?.gold))
    }

    /// Total finished potions across every recipe.
    pub async fn potion_counts(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM potion_inventory")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Totals reported for reconciliation.
    pub async fn audit(&self) -> DbResult<InventoryAudit> {
        let record = self.get().await?;
        let number_of_potions = self.potion_counts().await?;

        let audit = InventoryAudit {
            number_of_potions,
            ml_in_barrels: record.ml_pool().iter().sum(),
            gold: Gold::new(record.gold),
        };

        debug!(
            potions = audit.number_of_potions,
            ml = audit.ml_in_barrels,
            gold = audit.gold.amount(),
            "Inventory audit"
        );

        Ok(audit)
    }

    /// Wipes the shop back to its opening state.
    ///
    /// Gold becomes `starting_gold`, every ml pool zero. Potions, carts,
    /// orders and the delivery ledger are cleared. Runs in one transaction.
    pub async fn reset(&self, starting_gold: Gold) -> DbResult<()> {
        info!(gold = starting_gold.amount(), "Resetting shop inventory");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE global_inventory SET
                gold = ?1,
                red_ml = 0,
                green_ml = 0,
                blue_ml = 0,
                dark_ml = 0
            WHERE id = 1
            "#,
        )
        .bind(starting_gold.amount())
        .execute(&mut *tx)
        .await?;

        // Children before parents
        for statement in [
            "DELETE FROM order_items",
            "DELETE FROM orders",
            "DELETE FROM cart_items",
            "DELETE FROM carts",
            "DELETE FROM potion_inventory",
            "DELETE FROM processed_deliveries",
        ] {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
