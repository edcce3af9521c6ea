//! # Seed Data Generator
//!
//! Resets a development database and runs one full shop tick against a
//! sample supplier catalog, so the catalog and audit have something to show.
//!
//! ## Usage
//! ```bash
//! # Use POTION_DB_PATH (default ./potion_shop.db)
//! cargo run -p potion-db --bin seed
//!
//! # Specify database path
//! cargo run -p potion-db --bin seed -- --db ./data/shop.db
//!
//! # Keep existing inventory, only run the tick
//! cargo run -p potion-db --bin seed -- --no-reset
//! ```
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show every planner decision
//! - Default: `info,potion=debug,sqlx=warn`

use std::env;

use potion_core::Barrel;
use potion_db::{Shop, ShopConfig};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Order ids used for the seeded deliveries.
const SEED_ORDER_ID: i64 = 1;

/// Supplier offerings for the seeded tick.
fn sample_catalog() -> Vec<Barrel> {
    vec![
        Barrel::new("SMALL_RED_BARREL", 500, [1.0, 0.0, 0.0, 0.0], 100, 10),
        Barrel::new("SMALL_GREEN_BARREL", 500, [0.0, 1.0, 0.0, 0.0], 100, 10),
        Barrel::new("SMALL_BLUE_BARREL", 500, [0.0, 0.0, 1.0, 0.0], 120, 10),
        Barrel::new("MINI_RED_BARREL", 200, [1.0, 0.0, 0.0, 0.0], 60, 1),
        Barrel::new("MINI_GREEN_BARREL", 200, [0.0, 1.0, 0.0, 0.0], 60, 1),
        Barrel::new("LARGE_DARK_BARREL", 10_000, [0.0, 0.0, 0.0, 1.0], 750, 10),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = ShopConfig::load()?;
    let mut reset = true;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config = config.database_path(args[i + 1].clone());
                    i += 1;
                }
            }
            "--no-reset" => reset = false,
            "--help" | "-h" => {
                println!("Potion Shop Seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $POTION_DB_PATH)");
                println!("      --no-reset     Keep existing inventory");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = %config.database_path.display(), "Opening shop");
    let shop = Shop::open(config).await?;

    if reset {
        shop.reset().await?;
        info!("Shop reset");
    }

    // Barrels: plan, then deliver exactly what was planned.
    let catalog = sample_catalog();
    let plan = shop.barrel_plan(&catalog).await?;
    let delivered: Vec<Barrel> = plan
        .iter()
        .filter_map(|order| {
            catalog.iter().find(|b| b.sku == order.sku).map(|b| Barrel {
                quantity: order.quantity,
                ..b.clone()
            })
        })
        .collect();
    if !shop.deliver_barrels(SEED_ORDER_ID, &delivered).await? {
        warn!(order_id = SEED_ORDER_ID, "Barrels already delivered");
    }

    // Bottling: plan from the new ml and deliver it.
    let mixes = shop.bottle_plan().await?;
    if !shop.deliver_bottles(SEED_ORDER_ID, &mixes).await? {
        warn!(order_id = SEED_ORDER_ID, "Bottles already delivered");
    }

    println!();
    println!("Catalog");
    println!("=======");
    for item in shop.catalog().await? {
        println!(
            "  {:<16} {:>4} × {:>3} gold  {:?}",
            item.sku, item.quantity, item.price, item.potion_type
        );
    }

    let audit = shop.audit().await?;
    println!();
    println!("Audit");
    println!("=====");
    println!("  potions: {}", audit.number_of_potions);
    println!("  ml:      {}", audit.ml_in_barrels);
    println!("  gold:    {}", audit.gold);

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,potion=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}
