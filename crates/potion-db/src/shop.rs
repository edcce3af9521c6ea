//! # Shop Service
//!
//! Wires the pure planners in `potion-core` to the SQLite store.
//!
//! ## One Tick
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  supplier catalog ──► barrel_plan()      ──► orders sent to supplier   │
//! │  supplier confirms ──► deliver_barrels() ──► gold ↓  ml ↑              │
//! │                        bottle_plan()     ──► mixes sent to bottler     │
//! │  bottler confirms  ──► deliver_bottles() ──► ml ↓  potions ↑           │
//! │                        catalog()         ──► listing for customers     │
//! │  customers         ──► carts + checkout  ──► potions ↓  gold ↑         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Planning reads a snapshot and never writes. Deliveries are the only
//! writes to gold and ml, and each applies at most once per order id.

use tracing::{debug, info};

use crate::config::ShopConfig;
use crate::error::DbResult;
use crate::pool::{Database, DbConfig};
use potion_core::cart::{CheckoutSummary, SearchPage, SearchQuery};
use potion_core::catalog::build_catalog;
use potion_core::validation::{
    validate_barrels, validate_bottling_state, validate_cart_quantity, validate_catalog_sku,
    validate_customer, validate_inventory_state, validate_potion_mixes,
};
use potion_core::{
    plan_barrels, plan_bottles, Barrel, BarrelOrder, BottlingState, CapacityPlan, CatalogItem,
    Customer, Gold, InventoryAudit, PotionMix,
};

/// The potion shop: configuration plus storage.
#[derive(Debug, Clone)]
pub struct Shop {
    db: Database,
    config: ShopConfig,
}

impl Shop {
    /// Wraps an open database.
    pub fn new(db: Database, config: ShopConfig) -> Self {
        Shop { db, config }
    }

    /// Opens (and migrates) the database named in `config`.
    pub async fn open(config: ShopConfig) -> DbResult<Self> {
        let db = Database::new(DbConfig::new(config.database_path.clone())).await?;
        Ok(Shop::new(db, config))
    }

    /// The underlying database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Active configuration.
    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    // =========================================================================
    // Barrels
    // =========================================================================

    /// Plans barrel purchases against the supplier's `catalog`.
    ///
    /// ## Errors
    /// `InvalidInput` when any barrel fails validation. Nothing is read from
    /// the database in that case. A snapshot that fails validation is
    /// rejected the same way.
    pub async fn barrel_plan(&self, catalog: &[Barrel]) -> DbResult<Vec<BarrelOrder>> {
        validate_barrels(catalog)?;

        let state = self
            .db
            .inventory()
            .snapshot(self.config.max_barrel_capacity)
            .await?;
        validate_inventory_state(&state)?;
        let plan = plan_barrels(&state, catalog);

        info!(
            offered = catalog.len(),
            ordered = plan.len(),
            gold = state.gold.amount(),
            "Barrel plan ready"
        );

        Ok(plan)
    }

    /// Applies delivered barrels. `false` means `order_id` was already
    /// applied.
    pub async fn deliver_barrels(&self, order_id: i64, barrels: &[Barrel]) -> DbResult<bool> {
        validate_barrels(barrels)?;
        self.db.deliveries().apply_barrels(order_id, barrels).await
    }

    // =========================================================================
    // Bottling
    // =========================================================================

    /// Snapshot of ml and stocked potions for the bottle planner.
    pub async fn bottling_state(&self) -> DbResult<BottlingState> {
        let inventory = self.db.inventory().get().await?;
        let mixes = self.db.potions().current_mixes().await?;

        Ok(BottlingState {
            red_ml: inventory.red_ml,
            green_ml: inventory.green_ml,
            blue_ml: inventory.blue_ml,
            dark_ml: inventory.dark_ml,
            maximum_potion_capacity: self.config.max_potion_capacity,
            current_potion_inventory: mixes,
        })
    }

    /// Plans which potions to bottle from the ml on hand.
    pub async fn bottle_plan(&self) -> DbResult<Vec<PotionMix>> {
        let state = self.bottling_state().await?;
        validate_bottling_state(&state)?;
        let plan = plan_bottles(&state);

        info!(
            mixes = plan.len(),
            potions = plan.iter().map(|m| m.quantity).sum::<i64>(),
            in_stock = state.potions_in_stock(),
            "Bottle plan ready"
        );

        Ok(plan)
    }

    /// Applies delivered potions. `false` means `order_id` was already
    /// applied.
    pub async fn deliver_bottles(&self, order_id: i64, mixes: &[PotionMix]) -> DbResult<bool> {
        validate_potion_mixes(mixes)?;
        self.db.deliveries().apply_bottles(order_id, mixes).await
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Potions offered to customers.
    pub async fn catalog(&self) -> DbResult<Vec<CatalogItem>> {
        let stock = self.db.potions().list().await?;
        Ok(build_catalog(&stock, self.config.potion_price)?)
    }

    /// Totals for reconciliation.
    pub async fn audit(&self) -> DbResult<InventoryAudit> {
        self.db.inventory().audit().await
    }

    /// Capacity units to buy. The shop never expands, so this is always
    /// zero of each.
    pub fn capacity_plan(&self) -> CapacityPlan {
        CapacityPlan::default()
    }

    /// Restores the opening state: starting gold, no ml, no potions, no
    /// carts, empty delivery ledger.
    pub async fn reset(&self) -> DbResult<()> {
        self.db
            .inventory()
            .reset(Gold::new(self.config.starting_gold))
            .await
    }

    // =========================================================================
    // Carts
    // =========================================================================

    /// Opens a cart for a visiting customer.
    pub async fn create_cart(&self, customer: &Customer) -> DbResult<i64> {
        validate_customer(customer)?;
        self.db.carts().create_cart(customer).await
    }

    /// Sets how many of `sku` a cart holds.
    pub async fn set_item_quantity(&self, cart_id: i64, sku: &str, quantity: i64) -> DbResult<()> {
        validate_catalog_sku(sku)?;
        validate_cart_quantity(quantity)?;
        self.db.carts().set_item_quantity(cart_id, sku, quantity).await
    }

    /// Sells a cart at the configured potion price.
    pub async fn checkout(&self, cart_id: i64) -> DbResult<CheckoutSummary> {
        debug!(cart_id, price = self.config.potion_price, "Checking out");
        self.db
            .carts()
            .checkout(cart_id, Gold::new(self.config.potion_price))
            .await
    }

    /// Searches sold order lines.
    pub async fn search_orders(&self, query: &SearchQuery) -> DbResult<SearchPage> {
        self.db.carts().search_line_items(query).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;
    use potion_core::{Color, CoreError};

    async fn shop() -> Shop {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        Shop::new(db, ShopConfig::default())
    }

    fn supplier_catalog() -> Vec<Barrel> {
        vec![
            Barrel::new("SMALL_RED_BARREL", 500, [1.0, 0.0, 0.0, 0.0], 100, 10),
            Barrel::new("SMALL_GREEN_BARREL", 500, [0.0, 1.0, 0.0, 0.0], 100, 10),
        ]
    }

    fn customer() -> Customer {
        Customer {
            customer_id: "c-1".to_string(),
            customer_name: "Ada".to_string(),
            character_class: "Wizard".to_string(),
            level: 3,
        }
    }

    #[tokio::test]
    async fn full_tick_from_barrels_to_checkout() {
        let shop = shop().await;

        // 100 gold buys one barrel of the scarcest color (tie → red).
        let plan = shop.barrel_plan(&supplier_catalog()).await.unwrap();
        assert_eq!(
            plan,
            vec![BarrelOrder {
                sku: "SMALL_RED_BARREL".to_string(),
                quantity: 1
            }]
        );

        let delivered = vec![Barrel::new("SMALL_RED_BARREL", 500, [1.0, 0.0, 0.0, 0.0], 100, 1)];
        assert!(shop.deliver_barrels(1, &delivered).await.unwrap());

        let bottles = shop.bottle_plan().await.unwrap();
        assert_eq!(bottles, vec![PotionMix::pure(Color::Red, 5)]);
        assert!(shop.deliver_bottles(1, &bottles).await.unwrap());

        let catalog = shop.catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].sku, "RED_POTION_0");
        assert_eq!(catalog[0].quantity, 5);
        assert_eq!(catalog[0].price, 50);

        let cart = shop.create_cart(&customer()).await.unwrap();
        shop.set_item_quantity(cart, "RED_POTION_0", 2).await.unwrap();
        let summary = shop.checkout(cart).await.unwrap();
        assert_eq!(summary.total_potions_bought, 2);
        assert_eq!(summary.total_gold_paid, Gold::new(100));

        let audit = shop.audit().await.unwrap();
        assert_eq!(audit.number_of_potions, 3);
        assert_eq!(audit.ml_in_barrels, 0);
        assert_eq!(audit.gold, Gold::new(100));

        let orders = shop.search_orders(&SearchQuery::default()).await.unwrap();
        assert_eq!(orders.results.len(), 1);
        assert_eq!(orders.results[0].customer_name, "Ada");
    }

    #[tokio::test]
    async fn planning_does_not_touch_inventory() {
        let shop = shop().await;
        shop.barrel_plan(&supplier_catalog()).await.unwrap();
        shop.bottle_plan().await.unwrap();

        let audit = shop.audit().await.unwrap();
        assert_eq!(audit.gold, Gold::new(100));
        assert_eq!(audit.ml_in_barrels, 0);
    }

    #[tokio::test]
    async fn invalid_catalog_is_rejected() {
        let shop = shop().await;
        let bad = vec![Barrel::new("LOPSIDED", 500, [0.6, 0.6, 0.0, 0.0], 100, 1)];
        let err = shop.barrel_plan(&bad).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn invalid_mix_is_rejected_before_storage() {
        let shop = shop().await;
        let err = shop
            .deliver_bottles(1, &[PotionMix::new([50, 40, 0, 0], 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidInput(_))));
        assert!(!shop
            .db()
            .deliveries()
            .is_processed(crate::repository::delivery::DeliveryKind::Bottles, 1)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn misconfigured_capacity_fails_snapshot_validation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ShopConfig {
            max_barrel_capacity: 0,
            max_potion_capacity: 0,
            ..ShopConfig::default()
        };
        let shop = Shop::new(db, config);

        let err = shop.barrel_plan(&supplier_catalog()).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidInput(_))));
        let err = shop.bottle_plan().await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn full_potion_storage_plans_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let shop = Shop::new(db, ShopConfig::default().max_potion_capacity(2));
        sqlx::query("UPDATE global_inventory SET red_ml = 400")
            .execute(shop.db().pool())
            .await
            .unwrap();

        let first = shop.bottle_plan().await.unwrap();
        assert_eq!(first, vec![PotionMix::pure(Color::Red, 2)]);
        shop.deliver_bottles(1, &first).await.unwrap();

        assert!(shop.bottle_plan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn capacity_plan_is_always_empty() {
        let shop = shop().await;
        assert_eq!(shop.capacity_plan(), CapacityPlan::default());
        assert_eq!(shop.capacity_plan().cost(), Gold::zero());
    }

    #[tokio::test]
    async fn reset_uses_configured_gold() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ShopConfig {
            starting_gold: 250,
            ..ShopConfig::default()
        };
        let shop = Shop::new(db, config);

        shop.deliver_barrels(
            1,
            &[Barrel::new("SMALL_RED_BARREL", 500, [1.0, 0.0, 0.0, 0.0], 100, 1)],
        )
        .await
        .unwrap();
        shop.reset().await.unwrap();

        let audit = shop.audit().await.unwrap();
        assert_eq!(audit.gold, Gold::new(250));
        assert_eq!(audit.ml_in_barrels, 0);
        // Ledger cleared, so order 1 applies again.
        assert!(shop
            .deliver_barrels(
                1,
                &[Barrel::new("SMALL_RED_BARREL", 500, [1.0, 0.0, 0.0, 0.0], 100, 1)],
            )
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn cart_rejects_bad_quantities_and_customers() {
        let shop = shop().await;
        let mut nobody = customer();
        nobody.customer_name = "  ".to_string();
        assert!(shop.create_cart(&nobody).await.is_err());

        let cart = shop.create_cart(&customer()).await.unwrap();
        let err = shop
            .set_item_quantity(cart, "RED_POTION_0", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidInput(_))));
    }
}
