//! # Cart Repository
//!
//! Customer carts, checkout and the order ledger.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_cart(customer) ──► cart id (open)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  set_item_quantity(cart, sku, qty)   (repeatable, last write wins)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  checkout(cart) ── one transaction ──────────────────────────────────  │
//! │   ├── stock check per SKU                                              │
//! │   ├── potion_inventory -= qty                                          │
//! │   ├── orders + order_items rows                                        │
//! │   ├── gold += qty × price                                              │
//! │   └── cart closed                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart ids come from SQLite, so two processes sharing a database never
//! hand out the same id.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use potion_core::cart::{
    ensure_in_stock, line_total, search_line_items, CartLine, CheckoutSummary, LineItem,
    SearchPage, SearchQuery,
};
use potion_core::{CoreError, Customer, Gold};

/// A `carts` row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CartRecord {
    pub id: i64,
    pub customer_id: String,
    pub customer_name: String,
    pub character_class: String,
    pub level: i64,
    pub checked_out: bool,
    pub created_at: DateTime<Utc>,
}

impl CartRecord {
    /// The customer who owns this cart.
    pub fn customer(&self) -> Customer {
        Customer {
            customer_id: self.customer_id.clone(),
            customer_name: self.customer_name.clone(),
            character_class: self.character_class.clone(),
            level: self.level,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartItemRecord {
    sku: String,
    quantity: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRecord {
    line_item_id: i64,
    item_sku: String,
    customer_name: String,
    line_item_total: i64,
    timestamp: DateTime<Utc>,
}

impl From<LineItemRecord> for LineItem {
    fn from(r: LineItemRecord) -> Self {
        LineItem {
            line_item_id: r.line_item_id,
            item_sku: r.item_sku,
            customer_name: r.customer_name,
            line_item_total: r.line_item_total,
            timestamp: r.timestamp,
        }
    }
}

/// Repository for carts and orders.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Opens a cart for a customer and returns its id.
    pub async fn create_cart(&self, customer: &Customer) -> DbResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO carts (customer_id, customer_name, character_class, level, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&customer.customer_id)
        .bind(&customer.customer_name)
        .bind(&customer.character_class)
        .bind(customer.level)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let cart_id = result.last_insert_rowid();
        debug!(cart_id, customer = %customer.customer_name, "Cart created");

        Ok(cart_id)
    }

    /// Gets a cart by id.
    pub async fn get_cart(&self, cart_id: i64) -> DbResult<Option<CartRecord>> {
        let record = sqlx::query_as::<_, CartRecord>(
            r#"
            SELECT id, customer_id, customer_name, character_class, level,
                   checked_out, created_at
            FROM carts
            WHERE id = ?1
            "#,
        )
        .bind(cart_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Sets how many of `sku` the cart holds.
    ///
    /// ## Errors
    /// * `CartNotFound` / `CartClosed` - Cart missing or already checked out
    /// * `UnknownSku` - The shop has never stocked this SKU
    pub async fn set_item_quantity(&self, cart_id: i64, sku: &str, quantity: i64) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        ensure_open(&mut conn, cart_id).await?;

        let known: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM potion_inventory WHERE sku = ?1")
            .bind(sku)
            .fetch_one(&mut *conn)
            .await?;
        if known == 0 {
            return Err(CoreError::UnknownSku(sku.to_string()).into());
        }

        sqlx::query(
            r#"
            INSERT INTO cart_items (cart_id, sku, quantity)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (cart_id, sku) DO UPDATE SET
                quantity = excluded.quantity
            "#,
        )
        .bind(cart_id)
        .bind(sku)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

        debug!(cart_id, sku = %sku, quantity, "Cart item set");

        Ok(())
    }

    /// Items in a cart, by SKU.
    pub async fn get_items(&self, cart_id: i64) -> DbResult<Vec<CartLine>> {
        let mut conn = self.pool.acquire().await?;
        load_items(&mut conn, cart_id).await
    }

    /// Sells everything in the cart at `unit_price` each.
    ///
    /// All or nothing: a shortage on any line leaves stock, gold and the
    /// cart untouched.
    pub async fn checkout(&self, cart_id: i64, unit_price: Gold) -> DbResult<CheckoutSummary> {
        let mut tx = self.pool.begin().await?;

        ensure_open(&mut tx, cart_id).await?;
        let items = load_items(&mut tx, cart_id).await?;
        let now = Utc::now();

        let order_id = sqlx::query("INSERT INTO orders (cart_id, created_at) VALUES (?1, ?2)")
            .bind(cart_id)
            .bind(now)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        let mut total_potions_bought = 0;
        let mut total_gold_paid = Gold::zero();

        for line in &items {
            let available: Option<i64> =
                sqlx::query_scalar("SELECT quantity FROM potion_inventory WHERE sku = ?1")
                    .bind(&line.sku)
                    .fetch_optional(&mut *tx)
                    .await?;
            let available = available.ok_or_else(|| CoreError::UnknownSku(line.sku.clone()))?;
            ensure_in_stock(&line.sku, line.quantity, available)?;

            sqlx::query("UPDATE potion_inventory SET quantity = quantity - ?1 WHERE sku = ?2")
                .bind(line.quantity)
                .bind(&line.sku)
                .execute(&mut *tx)
                .await?;

            let total = line_total(line.quantity, unit_price);
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, sku, quantity, line_item_total, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(order_id)
            .bind(&line.sku)
            .bind(line.quantity)
            .bind(total.amount())
            .bind(now)
            .execute(&mut *tx)
            .await?;

            total_potions_bought += line.quantity;
            total_gold_paid += total;
        }

        sqlx::query("UPDATE orders SET total_potions = ?1, total_gold_paid = ?2 WHERE id = ?3")
            .bind(total_potions_bought)
            .bind(total_gold_paid.amount())
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE global_inventory SET gold = gold + ?1 WHERE id = 1")
            .bind(total_gold_paid.amount())
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE carts SET checked_out = 1 WHERE id = ?1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            cart_id,
            order_id,
            potions = total_potions_bought,
            gold = total_gold_paid.amount(),
            "Cart checked out"
        );

        Ok(CheckoutSummary {
            order_id,
            total_potions_bought,
            total_gold_paid,
        })
    }

    /// Every sold order line with its customer.
    pub async fn line_items(&self) -> DbResult<Vec<LineItem>> {
        let records = sqlx::query_as::<_, LineItemRecord>(
            r#"
            SELECT
                oi.id AS line_item_id,
                oi.sku AS item_sku,
                c.customer_name AS customer_name,
                oi.line_item_total AS line_item_total,
                oi.created_at AS timestamp
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN carts c ON c.id = o.cart_id
            ORDER BY oi.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(LineItem::from).collect())
    }

    /// Filtered, sorted, paged view of sold order lines.
    pub async fn search_line_items(&self, query: &SearchQuery) -> DbResult<SearchPage> {
        Ok(search_line_items(self.line_items().await?, query))
    }
}

/// Fails unless the cart exists and is still open.
async fn ensure_open(conn: &mut SqliteConnection, cart_id: i64) -> DbResult<()> {
    let checked_out: Option<bool> = sqlx::query_scalar("SELECT checked_out FROM carts WHERE id = ?1")
        .bind(cart_id)
        .fetch_optional(&mut *conn)
        .await?;

    match checked_out {
        None => Err(CoreError::CartNotFound(cart_id).into()),
        Some(true) => Err(CoreError::CartClosed(cart_id).into()),
        Some(false) => Ok(()),
    }
}

async fn load_items(conn: &mut SqliteConnection, cart_id: i64) -> DbResult<Vec<CartLine>> {
    let records = sqlx::query_as::<_, CartItemRecord>(
        "SELECT sku, quantity FROM cart_items WHERE cart_id = ?1 ORDER BY sku ASC",
    )
    .bind(cart_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(records
        .into_iter()
        .map(|r| CartLine {
            sku: r.sku,
            quantity: r.quantity,
        })
        .collect())
}
