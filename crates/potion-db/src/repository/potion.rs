//! # Potion Repository
//!
//! Finished potions, one `potion_inventory` row per recipe.

use sqlx::SqlitePool;

use crate::error::DbResult;
use potion_core::{PotionMix, PotionStock};

/// A `potion_inventory` row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PotionRecord {
    pub sku: String,
    pub red: i64,
    pub green: i64,
    pub blue: i64,
    pub dark: i64,
    pub quantity: i64,
}

impl PotionRecord {
    /// Recipe in `[red, green, blue, dark]` order.
    pub fn potion_type(&self) -> [i64; 4] {
        [self.red, self.green, self.blue, self.dark]
    }
}

impl From<PotionRecord> for PotionStock {
    fn from(record: PotionRecord) -> Self {
        PotionStock {
            potion_type: record.potion_type(),
            sku: record.sku,
            quantity: record.quantity,
        }
    }
}

/// Repository for finished potions.
#[derive(Debug, Clone)]
pub struct PotionRepository {
    pool: SqlitePool,
}

impl PotionRepository {
    /// Creates a new PotionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PotionRepository { pool }
    }

    /// Every stocked recipe, including sold-out ones, by SKU.
    pub async fn list(&self) -> DbResult<Vec<PotionStock>> {
        let records = sqlx::query_as::<_, PotionRecord>(
            r#"
            SELECT sku, red, green, blue, dark, quantity
            FROM potion_inventory
            ORDER BY sku ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(PotionStock::from).collect())
    }

    /// Looks up one recipe by SKU.
    ///
    /// ## Returns
    /// * `Ok(Some(stock))` - Recipe has been bottled at least once
    /// * `Ok(None)` - Unknown SKU
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<PotionStock>> {
        let record = sqlx::query_as::<_, PotionRecord>(
            r#"
            SELECT sku, red, green, blue, dark, quantity
            FROM potion_inventory
            WHERE sku = ?1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(PotionStock::from))
    }

    /// Potions on hand as mixes, for the bottle planner's capacity check.
    pub async fn current_mixes(&self) -> DbResult<Vec<PotionMix>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|s| s.quantity > 0)
            .map(|s| PotionMix::new(s.potion_type, s.quantity))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use potion_core::PotionMix;

    async fn stocked_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query(
            "INSERT INTO potion_inventory (sku, red, green, blue, dark, quantity) VALUES
             ('RED_POTION_0', 100, 0, 0, 0, 3),
             ('MIX_50_0_0_50', 50, 0, 0, 50, 0)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn lists_every_recipe() {
        let db = stocked_db().await;
        let stock = db.potions().list().await.unwrap();
        let skus: Vec<&str> = stock.iter().map(|s| s.sku.as_str()).collect();
        assert_eq!(skus, vec!["MIX_50_0_0_50", "RED_POTION_0"]);
        assert_eq!(stock[0].potion_type, [50, 0, 0, 50]);
    }

    #[tokio::test]
    async fn looks_up_by_sku() {
        let db = stocked_db().await;
        let red = db.potions().get_by_sku("RED_POTION_0").await.unwrap().unwrap();
        assert_eq!(red.quantity, 3);
        assert!(db.potions().get_by_sku("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn current_mixes_skip_sold_out() {
        let db = stocked_db().await;
        let mixes = db.potions().current_mixes().await.unwrap();
        assert_eq!(mixes, vec![PotionMix::new([100, 0, 0, 0], 3)]);
    }
}
