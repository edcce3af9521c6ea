//! # Cart Math and Order Search
//!
//! Pure helpers behind the cart store: line totals, stock checks, and the
//! paginated search over past order lines.
//!
//! ## Search Paging
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  filter (customer, sku) ──► sort (column, order) ──► page of 5         │
//! │                                                                         │
//! │  search_page = "5"   → results[5..10]                                  │
//! │                      → previous = "0", next = "10" (if more remain)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::gold::Gold;
use crate::SEARCH_PAGE_SIZE;

// =============================================================================
// Checkout
// =============================================================================

/// One SKU and quantity in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub sku: String,
    pub quantity: i64,
}

/// Result of a completed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub order_id: i64,
    pub total_potions_bought: i64,
    pub total_gold_paid: Gold,
}

/// Gold owed for `quantity` potions at `unit_price`.
#[inline]
pub fn line_total(quantity: i64, unit_price: Gold) -> Gold {
    unit_price.times(quantity)
}

/// Fails with [`CoreError::InsufficientStock`] if `requested` exceeds
/// `available`.
pub fn ensure_in_stock(sku: &str, requested: i64, available: i64) -> CoreResult<()> {
    if requested > available {
        return Err(CoreError::InsufficientStock {
            sku: sku.to_string(),
            available,
            requested,
        });
    }
    Ok(())
}

// =============================================================================
// Order Line Search
// =============================================================================

/// A sold order line, as shown in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub line_item_id: i64,
    pub item_sku: String,
    pub customer_name: String,
    pub line_item_total: i64,
    pub timestamp: DateTime<Utc>,
}

/// Column to sort search results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSortColumn {
    CustomerName,
    ItemSku,
    LineItemTotal,
    #[default]
    Timestamp,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Search parameters. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub customer_name: String,
    pub potion_sku: String,
    /// Offset token from a previous page; anything non-numeric means 0.
    pub search_page: String,
    pub sort_col: SearchSortColumn,
    pub sort_order: SortOrder,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub results: Vec<LineItem>,
}

/// Filters, sorts and pages order lines.
///
/// Filters are case-insensitive substring matches.
pub fn search_line_items(mut items: Vec<LineItem>, query: &SearchQuery) -> SearchPage {
    let customer = query.customer_name.to_lowercase();
    let sku = query.potion_sku.to_lowercase();
    items.retain(|i| {
        i.customer_name.to_lowercase().contains(&customer)
            && i.item_sku.to_lowercase().contains(&sku)
    });

    items.sort_by(|a, b| {
        let ord = match query.sort_col {
            SearchSortColumn::CustomerName => a.customer_name.cmp(&b.customer_name),
            SearchSortColumn::ItemSku => a.item_sku.cmp(&b.item_sku),
            SearchSortColumn::LineItemTotal => a.line_item_total.cmp(&b.line_item_total),
            SearchSortColumn::Timestamp => a.timestamp.cmp(&b.timestamp),
        };
        match query.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    let start = query.search_page.parse::<usize>().unwrap_or(0);
    let end = start.saturating_add(SEARCH_PAGE_SIZE);

    let previous = (start > 0).then(|| start.saturating_sub(SEARCH_PAGE_SIZE).to_string());
    let next = (end < items.len()).then(|| end.to_string());

    let results = items
        .into_iter()
        .skip(start)
        .take(SEARCH_PAGE_SIZE)
        .collect();

    SearchPage {
        previous,
        next,
        results,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
