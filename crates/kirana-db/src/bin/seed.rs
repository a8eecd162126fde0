//! # Seed Data Generator
//!
//! Populates the database with a realistic mobile-shop catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p kirana-db --bin seed
//!
//! # Specify database path
//! cargo run -p kirana-db --bin seed -- --db ./data/kirana.db
//! ```
//!
//! Phones get the Mobile Phone category (HSN 85171200) and accessories
//! everything else; all items carry the standard 18% GST rate.

use chrono::Utc;
use std::env;
use uuid::Uuid;

use kirana_core::Product;
use kirana_db::{Database, DbConfig};

/// (name, brand, model, category, price in paise, quantity, barcode)
const CATALOG: &[(&str, &str, &str, &str, i64, i64, Option<&str>)] = &[
    (
        "Galaxy M34 5G",
        "Samsung",
        "SM-M346B",
        "Mobile Phone",
        1_699_900,
        8,
        Some("8806094913639"),
    ),
    (
        "Galaxy A15",
        "Samsung",
        "SM-A155F",
        "Mobile Phone",
        1_449_900,
        6,
        Some("8806095306902"),
    ),
    (
        "Redmi 13C",
        "Xiaomi",
        "23100RN82L",
        "Mobile Phone",
        899_900,
        12,
        Some("6941812754931"),
    ),
    (
        "Redmi Note 13",
        "Xiaomi",
        "2312DRA50I",
        "Mobile Phone",
        1_699_900,
        5,
        None,
    ),
    (
        "iPhone 13",
        "Apple",
        "A2633",
        "Mobile Phone",
        5_299_900,
        2,
        Some("194252707890"),
    ),
    (
        "Narzo N55",
        "Realme",
        "RMX3710",
        "Mobile Phone",
        1_099_900,
        7,
        None,
    ),
    (
        "25W USB-C Charger",
        "Samsung",
        "EP-TA800",
        "Charger",
        129_900,
        30,
        Some("8806090773365"),
    ),
    (
        "33W SonicCharge Adapter",
        "Xiaomi",
        "MDY-11-EZ",
        "Charger",
        69_900,
        25,
        None,
    ),
    (
        "Type-C Braided Cable 1m",
        "boAt",
        "A400",
        "Cable",
        29_900,
        50,
        Some("8904354800215"),
    ),
    (
        "Tempered Glass Galaxy M34",
        "Spigen",
        "AGL06985",
        "Tempered Glass",
        49_900,
        40,
        None,
    ),
    (
        "Silicone Case Redmi 13C",
        "Generic",
        "RD13C-SIL",
        "Cover",
        19_900,
        60,
        None,
    ),
    (
        "Airdopes 141",
        "boAt",
        "AIRDOPES141",
        "Earphones",
        149_900,
        15,
        Some("8904354800864"),
    ),
    (
        "64GB microSD Card",
        "SanDisk",
        "SDSQUNR-064G",
        "Memory Card",
        54_900,
        20,
        Some("619659185602"),
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./data/kirana.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kirana POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./data/kirana.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Kirana POS Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("Connected, migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("Database already has {} products", existing);
        println!("Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!("Inserting catalog...");

    let now = Utc::now();
    let mut inserted = 0;

    for (name, brand, model, category, price_paise, quantity, barcode) in CATALOG {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            category: category.to_string(),
            price_paise: *price_paise,
            gst_rate_bps: 1800,
            quantity: *quantity,
            low_stock_threshold: 3,
            barcode: barcode.map(str::to_string),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
            continue;
        }
        inserted += 1;
    }

    println!("Inserted {} products", inserted);

    // Verify search
    let filter = kirana_db::ProductSearchFilter {
        query: Some("galaxy".to_string()),
        ..Default::default()
    };
    let results = db.products().search(&filter).await?;
    println!("Search 'galaxy': {} results", results.len());

    println!();
    println!("Seed complete");

    Ok(())
}
