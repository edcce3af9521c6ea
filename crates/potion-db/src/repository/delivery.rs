//! # Delivery Repository
//!
//! Applies confirmed deliveries to inventory, exactly once per order id.
//!
//! ## Delivery Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   ├── INSERT OR IGNORE processed_deliveries (kind, order_id)           │
//! │   │      └── 0 rows? → already applied, ROLLBACK, return false         │
//! │   ├── read global_inventory                                            │
//! │   ├── check gold (barrels) or ml (bottles)                             │
//! │   ├── barrels: gold -= paid, ml[c] += gained                           │
//! │   │   bottles: ml[c] -= used, potion_inventory upsert per recipe       │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed check rolls back the ledger row too, so the same order id can be
//! retried once the shop can cover it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::inventory::{InventoryRecord, SELECT_INVENTORY};
use potion_core::catalog::sku_for_recipe;
use potion_core::delivery::{BarrelDelivery, BottlingUsage};
use potion_core::{Barrel, Gold, PotionMix};

/// Which kind of delivery a ledger row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Barrels,
    Bottles,
}

impl DeliveryKind {
    /// Value stored in the `kind` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            DeliveryKind::Barrels => "barrels",
            DeliveryKind::Bottles => "bottles",
        }
    }
}

/// A `processed_deliveries` row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DeliveryRecord {
    pub kind: String,
    pub order_id: i64,
    /// JSON of the delivered barrels or mixes.
    pub payload: String,
    pub processed_at: DateTime<Utc>,
}

/// Repository for the delivery ledger.
#[derive(Debug, Clone)]
pub struct DeliveryRepository {
    pool: SqlitePool,
}

impl DeliveryRepository {
    /// Creates a new DeliveryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DeliveryRepository { pool }
    }

    /// Applies a barrel delivery: debits gold, credits ml.
    ///
    /// ## Returns
    /// * `Ok(true)` - Delivery applied
    /// * `Ok(false)` - `order_id` was already applied; nothing changed
    /// * `Err(DbError::Domain(InsufficientGold))` - Gold can't cover it
    pub async fn apply_barrels(&self, order_id: i64, barrels: &[Barrel]) -> DbResult<bool> {
        let summary = BarrelDelivery::from_barrels(barrels);
        let payload = serde_json::to_string(barrels)?;

        let mut tx = self.pool.begin().await?;

        if !claim(&mut tx, DeliveryKind::Barrels, order_id, &payload).await? {
            info!(order_id, "Barrel delivery already applied");
            return Ok(false);
        }

        let inventory = sqlx::query_as::<_, InventoryRecord>(SELECT_INVENTORY)
            .fetch_one(&mut *tx)
            .await?;
        summary.ensure_affordable(Gold::new(inventory.gold))?;

        let [red, green, blue, dark] = summary.ml;
        sqlx::query(
            r#"
            UPDATE global_inventory SET
                gold = gold - ?1,
                red_ml = red_ml + ?2,
                green_ml = green_ml + ?3,
                blue_ml = blue_ml + ?4,
                dark_ml = dark_ml + ?5
            WHERE id = 1
            "#,
        )
        .bind(summary.gold_paid.amount())
        .bind(red)
        .bind(green)
        .bind(blue)
        .bind(dark)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            order_id,
            gold_paid = summary.gold_paid.amount(),
            ml_gained = summary.total_ml(),
            "Barrel delivery applied"
        );

        Ok(true)
    }

    /// Applies a bottling delivery: debits ml, credits potions.
    ///
    /// ## Returns
    /// * `Ok(true)` - Delivery applied
    /// * `Ok(false)` - `order_id` was already applied; nothing changed
    /// * `Err(DbError::Domain(InsufficientMl))` - Some color ran short
    pub async fn apply_bottles(&self, order_id: i64, mixes: &[PotionMix]) -> DbResult<bool> {
        let usage = BottlingUsage::from_mixes(mixes);
        let payload = serde_json::to_string(mixes)?;

        let mut tx = self.pool.begin().await?;

        if !claim(&mut tx, DeliveryKind::Bottles, order_id, &payload).await? {
            info!(order_id, "Bottle delivery already applied");
            return Ok(false);
        }

        let inventory = sqlx::query_as::<_, InventoryRecord>(SELECT_INVENTORY)
            .fetch_one(&mut *tx)
            .await?;
        usage.ensure_available(inventory.ml_pool())?;

        let [red, green, blue, dark] = usage.ml_used;
        sqlx::query(
            r#"
            UPDATE global_inventory SET
                red_ml = red_ml - ?1,
                green_ml = green_ml - ?2,
                blue_ml = blue_ml - ?3,
                dark_ml = dark_ml - ?4
            WHERE id = 1
            "#,
        )
        .bind(red)
        .bind(green)
        .bind(blue)
        .bind(dark)
        .execute(&mut *tx)
        .await?;

        for mix in mixes {
            let sku = sku_for_recipe(&mix.potion_type);
            let [r, g, b, d] = mix.potion_type;
            debug!(sku = %sku, quantity = mix.quantity, "Stocking potions");

            sqlx::query(
                r#"
                INSERT INTO potion_inventory (sku, red, green, blue, dark, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT (sku) DO UPDATE SET
                    quantity = quantity + excluded.quantity
                "#,
            )
            .bind(&sku)
            .bind(r)
            .bind(g)
            .bind(b)
            .bind(d)
            .bind(mix.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            order_id,
            potions = usage.potions,
            "Bottle delivery applied"
        );

        Ok(true)
    }

    /// Whether a delivery has already been applied.
    pub async fn is_processed(&self, kind: DeliveryKind, order_id: i64) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM processed_deliveries WHERE kind = ?1 AND order_id = ?2",
        )
        .bind(kind.as_str())
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Applied deliveries of one kind, oldest first.
    pub async fn history(&self, kind: DeliveryKind) -> DbResult<Vec<DeliveryRecord>> {
        let records = sqlx::query_as::<_, DeliveryRecord>(
            r#"
            SELECT kind, order_id, payload, processed_at
            FROM processed_deliveries
            WHERE kind = ?1
            ORDER BY processed_at ASC, order_id ASC
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

/// Inserts the ledger row. `false` when the order id was already claimed.
async fn claim(
    tx: &mut Transaction<'_, Sqlite>,
    kind: DeliveryKind,
    order_id: i64,
    payload: &str,
) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO processed_deliveries (kind, order_id, payload, processed_at)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(kind.as_str())
    .bind(order_id)
    .bind(payload)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::DbError;
    use potion_core::{Color, CoreError};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn small_red(quantity: i64) -> Barrel {
        Barrel::new("SMALL_RED_BARREL", 500, [1.0, 0.0, 0.0, 0.0], 100, quantity)
    }

    #[tokio::test]
    async fn barrel_delivery_moves_gold_into_ml() {
        let db = db().await;
        let applied = db.deliveries().apply_barrels(1, &[small_red(1)]).await.unwrap();
        assert!(applied);

        let inventory = db.inventory().get().await.unwrap();
        assert_eq!(inventory.gold, 0);
        assert_eq!(inventory.ml_pool(), [500, 0, 0, 0]);
        assert!(db
            .deliveries()
            .is_processed(DeliveryKind::Barrels, 1)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn replayed_barrel_delivery_is_a_no_op() {
        let db = db().await;
        sqlx::query("UPDATE global_inventory SET gold = 1000")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(db.deliveries().apply_barrels(7, &[small_red(2)]).await.unwrap());
        assert!(!db.deliveries().apply_barrels(7, &[small_red(2)]).await.unwrap());

        let inventory = db.inventory().get().await.unwrap();
        assert_eq!(inventory.gold, 800);
        assert_eq!(inventory.red_ml, 1000);
        assert_eq!(db.deliveries().history(DeliveryKind::Barrels).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unaffordable_delivery_rolls_back() {
        let db = db().await;
        let err = db
            .deliveries()
            .apply_barrels(3, &[small_red(2)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientGold {
                required: 200,
                available: 100
            })
        ));

        // Nothing recorded, so the order can be retried.
        assert!(!db
            .deliveries()
            .is_processed(DeliveryKind::Barrels, 3)
            .await
            .unwrap());
        assert_eq!(db.inventory().get().await.unwrap().gold, 100);
    }

    #[tokio::test]
    async fn bottle_delivery_moves_ml_into_potions() {
        let db = db().await;
        sqlx::query("UPDATE global_inventory SET red_ml = 500, dark_ml = 100")
            .execute(db.pool())
            .await
            .unwrap();

        let mixes = vec![
            PotionMix::pure(Color::Red, 3),
            PotionMix::new([50, 0, 0, 50], 2),
        ];
        assert!(db.deliveries().apply_bottles(11, &mixes).await.unwrap());
        // Same recipe again under a new order id accumulates.
        assert!(db
            .deliveries()
            .apply_bottles(12, &[PotionMix::pure(Color::Red, 1)])
            .await
            .unwrap());

        let inventory = db.inventory().get().await.unwrap();
        assert_eq!(inventory.ml_pool(), [0, 0, 0, 0]);

        let red = db.potions().get_by_sku("RED_POTION_0").await.unwrap().unwrap();
        assert_eq!(red.quantity, 4);
        let mixed = db.potions().get_by_sku("MIX_50_0_0_50").await.unwrap().unwrap();
        assert_eq!(mixed.quantity, 2);
    }

    #[tokio::test]
    async fn bottle_delivery_needs_enough_ml() {
        let db = db().await;
        sqlx::query("UPDATE global_inventory SET green_ml = 250")
            .execute(db.pool())
            .await
            .unwrap();

        let err = db
            .deliveries()
            .apply_bottles(1, &[PotionMix::pure(Color::Green, 3)])
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_domain(),
            Some(CoreError::InsufficientMl {
                color: Color::Green,
                required: 300,
                available: 250
            })
        ));
        assert!(db.potions().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replayed_bottle_delivery_is_a_no_op() {
        let db = db().await;
        sqlx::query("UPDATE global_inventory SET blue_ml = 1000")
            .execute(db.pool())
            .await
            .unwrap();

        let mixes = [PotionMix::pure(Color::Blue, 4)];
        assert!(db.deliveries().apply_bottles(5, &mixes).await.unwrap());
        assert!(!db.deliveries().apply_bottles(5, &mixes).await.unwrap());

        assert_eq!(db.inventory().get().await.unwrap().blue_ml, 600);
        let history = db.deliveries().history(DeliveryKind::Bottles).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].order_id, 5);
        let stored: Vec<PotionMix> = serde_json::from_str(&history[0].payload).unwrap();
        assert_eq!(stored, mixes.to_vec());
    }
}
