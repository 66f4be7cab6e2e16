//! # Demo Service Generator
//!
//! Runs a few tables through a whole service against a file database:
//! orders, kitchen updates, payment choices and settlements.
//!
//! ## Usage
//! ```bash
//! # Five tables into ./sushi_dev.db
//! cargo run -p sushi-engine --bin seed
//!
//! # More tables, another file
//! cargo run -p sushi-engine --bin seed -- --tables 12 --db ./data/sushi.db
//!
//! # Use sushi.toml / SUSHI_* settings instead of the flags' defaults
//! cargo run -p sushi-engine --bin seed -- --config ./sushi.toml
//! ```
//!
//! ## What Each Table Does
//! - orders three to five dishes, some twice
//! - the kitchen marks everything done except one cancelled plate
//! - odd tables pay by QR code straight away
//! - even tables pick cash and are settled at the counter, except the
//!   last one, which stays open so the cashier board has something on it

use std::env;
use std::path::PathBuf;

use sushi_engine::{init_tracing, EngineConfig, OrderEngine};

/// Menu used for the demo: (item id, name, price in satang)
const MENU: &[(&str, &str, i64)] = &[
    ("salmon", "Salmon Nigiri", 4_000),
    ("tuna", "Tuna Nigiri", 5_000),
    ("ebi", "Ebi Nigiri", 3_500),
    ("tamago", "Tamago", 2_000),
    ("unagi", "Unagi", 6_000),
    ("ikura", "Ikura Gunkan", 7_000),
    ("california", "California Roll", 12_000),
    ("miso", "Miso Soup", 3_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut tables: usize = 5;
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tables" | "-t" => {
                if i + 1 < args.len() {
                    tables = args[i + 1].parse().unwrap_or(5);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Sushi POS Demo Service");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -t, --tables <N>     Number of tables to seat (default: 5)");
                println!("  -d, --db <PATH>      Database file path (default: ./sushi_dev.db)");
                println!("  -c, --config <PATH>  Load settings from this sushi.toml");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(path) => EngineConfig::load(Some(path))?,
        None => EngineConfig {
            database_path: PathBuf::from("./sushi_dev.db"),
            ..EngineConfig::default()
        },
    };
    if let Some(path) = db_path {
        config.database_path = path;
    }
    config.validate()?;

    init_tracing(&config.log_filter);

    println!("🍣 Sushi POS Demo Service");
    println!("=========================");
    println!("Database: {}", config.database_path.display());
    println!("Tables:   {}", tables);
    println!(
        "Rules:    {} dishes per cart, {}% surcharge",
        config.distinct_item_cap,
        config.surcharge_rate().percentage()
    );
    println!();

    let engine = OrderEngine::new(&config).await?;
    println!("✓ Connected to database");

    let start = std::time::Instant::now();

    for n in 1..=tables {
        let table = n.to_string();
        engine.ensure_partitions(&table).await?;

        // Order a rotating slice of the menu, doubling the first dish
        let dishes = (3 + n % 3).min(config.distinct_item_cap);
        for k in 0..dishes {
            let (id, name, price) = MENU[(n + k) % MENU.len()];
            engine.add_item(&table, id, name, price).await?;
            if k == 0 {
                engine.add_item(&table, id, name, price).await?;
            }
        }

        // One dish over the cap shows the guest-facing message
        if dishes >= config.distinct_item_cap {
            let (id, name, price) = MENU[(n + dishes) % MENU.len()];
            if let Err(e) = engine.add_item(&table, id, name, price).await {
                println!("  Table {}: {}", table, e);
            }
        }

        let tickets = engine.confirm_order(&table).await?;
        for (k, ticket) in tickets.iter().enumerate() {
            let status = if k == 1 { "cancelled" } else { "done" };
            engine.update_status(ticket.id, "plating").await?;
            engine.update_status(ticket.id, status).await?;
        }

        let bill = engine.preview_bill(&table).await?;
        let last = n == tables;
        if n % 2 == 1 {
            engine.select_method(&table, "qr_code").await?;
            let sale = engine.settle(&table, "qr_code").await?;
            println!(
                "  Table {:>3}: {} lines  {:>10}  paid by QR  ({})",
                table,
                bill.lines.len(),
                sale.total().to_string(),
                sale.receipt_number
            );
        } else if !last {
            engine.select_method(&table, "cash").await?;
            let sale = engine.settle_at_counter(&table).await?;
            println!(
                "  Table {:>3}: {} lines  {:>10}  paid in cash ({})",
                table,
                bill.lines.len(),
                sale.total().to_string(),
                sale.receipt_number
            );
        } else {
            engine.select_method(&table, "cash").await?;
            println!(
                "  Table {:>3}: {} lines  {:>10}  waiting for the cashier",
                table,
                bill.lines.len(),
                bill.quote.total.to_string()
            );
        }
    }

    println!();
    println!("✓ Service simulated in {:?}", start.elapsed());

    println!();
    println!("Cashier board:");
    for entry in engine.cashier_board().await? {
        let method = entry
            .method
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  Table {:>3}: {:?} ({})", entry.table_id.as_str(), entry.state, method);
    }

    let sales = engine.list_sales().await?;
    let takings: i64 = sales.iter().map(|s| s.total_cents).sum();
    println!();
    println!(
        "✓ {} sales recorded, {} taken",
        sales.len(),
        sushi_engine::sushi_core::Money::from_cents(takings)
    );

    engine.database().close().await;
    Ok(())
}
