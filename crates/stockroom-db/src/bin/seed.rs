//! # Seed Data Generator
//!
//! Populates the database with a demo account and products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 120 products (default, one per item/variant pair)
//! cargo run -p stockroom-db --bin seed
//!
//! # Generate fewer
//! cargo run -p stockroom-db --bin seed -- --count 40
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! - One account: `demo@stockroom.dev` / `Demo!pass1`
//! - Products named `{item} {variant}` across a few categories, at most one
//!   per name (120 in total; larger counts are capped), each with:
//!   - Price: 1.99 - 9.99 plus a variant addon
//!   - Cost: 60% - 119% of price, so some products sell at a loss
//!   - Unknown cost on every seventh product
//!   - Stock: 0 - 100

use chrono::Utc;
use std::env;
use stockroom_core::analytics::{profit_report, stock_summary};
use stockroom_core::{Money, NewProduct};
use stockroom_db::password::hash_password;
use stockroom_db::{Database, DbConfig};

const DEMO_EMAIL: &str = "demo@stockroom.dev";
const DEMO_PASSWORD: &str = "Demo!pass1";

/// Item names per category. Letters, digits and spaces only.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Home",
        &[
            "Desk Lamp",
            "Floor Lamp",
            "Candle Set",
            "Wall Clock",
            "Photo Frame",
            "Throw Pillow",
            "Door Mat",
            "Plant Pot",
        ],
    ),
    (
        "Kitchen",
        &[
            "Chef Knife",
            "Cutting Board",
            "Coffee Mug",
            "Tea Kettle",
            "Spice Rack",
            "Salad Bowl",
            "Cast Iron Pan",
            "Measuring Cups",
        ],
    ),
    (
        "Crafts",
        &[
            "Knitting Yarn",
            "Sketchbook",
            "Watercolor Set",
            "Clay Block",
            "Embroidery Kit",
            "Bead Box",
            "Brush Set",
            "Glue Gun",
        ],
    ),
];

/// Variants and their price addon in cents.
const VARIANTS: &[(&str, i64)] = &[
    ("Mini", 0),
    ("Classic", 150),
    ("Large", 300),
    ("Deluxe", 700),
    ("Pack of 3", 900),
];

const PLATFORMS: &[&str] = &["Etsy", "Shopify", "Amazon", "Local Market"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = name_capacity();
    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -c, --count <N>    Number of products to generate (default and max: {})",
                    name_capacity()
                );
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    if count > name_capacity() {
        println!("⚠ Only {} unique product names, capping --count", name_capacity());
        count = name_capacity();
    }

    println!("🌱 Stockroom Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let owner = if db.users().email_taken(DEMO_EMAIL).await? {
        println!("⚠ {} already exists, refusing to seed over it", DEMO_EMAIL);
        return Ok(());
    } else {
        let hash = hash_password(DEMO_PASSWORD)?;
        db.users().insert(DEMO_EMAIL, &hash, Utc::now()).await?
    };
    db.users().record_login(owner.id, Utc::now()).await?;
    println!("✓ Created {} (password: {})", owner.email, DEMO_PASSWORD);

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    for (seed, (item, (variant, price_addon))) in product_names().take(count).enumerate() {
        let product = generate_product(item, variant, price_addon, seed);

        if let Err(e) = db.products().insert(owner.id, &product, Utc::now()).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
            continue;
        }

        generated += 1;
        if generated % 50 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Quick sanity check through the analytics folds
    let products = db.products().all_for_owner(owner.id).await?;
    let summary = stock_summary(&products);
    let report = profit_report(&products);
    println!();
    println!("  Units available: {}", summary.available_stock);
    println!("  Stock value:     {}", summary.total_price);
    println!("  Losing products: {}", report.losing_products.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
/// Every `(item, variant)` pair, in a fixed order.
fn product_names() -> impl Iterator<Item = (&'static str, (&'static str, i64))> {
    CATEGORIES.iter().flat_map(|(_, items)| {
        items
            .iter()
            .flat_map(|item| VARIANTS.iter().map(move |variant| (*item, *variant)))
    })
}

/// How many distinct products the seed can create.
fn name_capacity() -> usize {
    CATEGORIES.iter().map(|(_, items)| items.len()).sum::<usize>() * VARIANTS.len()
}

/// Generates a single product with deterministic pseudo-random numbers.
fn generate_product(item: &str, variant: &str, price_addon: i64, seed: usize) -> NewProduct {
    let seed_i = seed as i64;

    // Base 1.99 - 9.99 plus the variant addon
    let price_cents = 199 + (seed_i * 17) % 800 + price_addon;

    // 60% - 119% of price; every seventh product has no known cost
    let cost = (seed % 7 != 6).then(|| {
        let cost_pct = 60 + (seed_i * 13) % 60;
        Money::from_cents(price_cents * cost_pct / 100)
    });

    NewProduct {
        name: format!("{} {}", item, variant),
        description: Some(format!("{} in the {} variant", item, variant.to_lowercase())),
        available_stock: (seed_i * 37) % 101,
        price: Money::from_cents(price_cents),
        cost,
        platform: Some(PLATFORMS[seed % PLATFORMS.len()].to_string()),
        img_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<String> = product_names()
            .map(|(item, (variant, _))| format!("{} {}", item, variant))
            .collect();
        assert_eq!(names.len(), name_capacity());
        assert_eq!(name_capacity(), 120);
    }

    #[test]
    fn test_generated_products_are_deterministic() {
        let first = generate_product("Desk Lamp", "Mini", 0, 6);
        assert_eq!(first, generate_product("Desk Lamp", "Mini", 0, 6));
        assert_eq!(first.name, "Desk Lamp Mini");
        assert!(first.cost.is_none());
        assert!((0..=100).contains(&first.available_stock));
    }
}
