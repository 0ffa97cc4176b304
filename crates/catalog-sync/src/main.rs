use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};

use database::{product, system, Database, NewProduct};

/// Config key under which each sync leaves its summary.
const LAST_SYNC_KEY: &str = "last_product_sync";

#[derive(Debug, Parser)]
#[command(name = "catalog-sync")]
#[command(about = "Sync the product catalog from a CSV export")]
struct Args {
    /// CSV file with columns: name, color, warranty, category, selling_price
    #[arg(long, conflicts_with = "seed")]
    file: Option<PathBuf>,

    /// Load the built-in demo catalog instead of a file
    #[arg(long)]
    seed: bool,

    /// Database URL. Falls back to DATABASE_URL env.
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let url = args
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:invoices.db?mode=rwc".to_string());

    let db = Database::connect(&url).await?;
    db.migrate().await?;

    let import = if args.seed {
        CsvImport {
            rows: demo_catalog(),
            errors: 0,
        }
    } else if let Some(path) = args.file.as_ref() {
        read_csv(path)?
    } else {
        return Err("nothing to do: pass --file <csv> or --seed".into());
    };

    let outcome = sync_products(&db, &import.rows).await?;
    record_sync(&db, &outcome).await?;

    info!(
        added = outcome.added,
        updated = outcome.updated,
        unchanged = outcome.unchanged,
        errors = import.errors,
        "Catalog sync complete"
    );
    Ok(())
}

/// One row of the catalog export. Optional columns default to empty.
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    warranty: String,
    #[serde(default)]
    category: String,
    selling_price: f64,
}

/// Per-sync counters, also written to the system config store.
#[derive(Debug, Default)]
struct SyncOutcome {
    added: u32,
    updated: u32,
    unchanged: u32,
}

/// Rows that survived validation, plus a count of those that did not.
#[derive(Debug)]
struct CsvImport {
    rows: Vec<NewProduct>,
    errors: u32,
}

fn read_csv(path: &Path) -> Result<CsvImport, io::Error> {
    Ok(parse_csv(fs::File::open(path)?))
}

/// Read catalog rows, dropping the ones that fail validation. A bad row
/// never aborts the import; it is counted and the rest proceed.
fn parse_csv<R: io::Read>(input: R) -> CsvImport {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut rows = Vec::new();
    let mut errors = 0;
    for record in reader.deserialize() {
        let row: CsvRow = match record {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable row: {}", e);
                errors += 1;
                continue;
            }
        };
        if row.name.is_empty() {
            warn!("Skipping row with empty product name");
            continue;
        }
        if row.selling_price < 0.0 {
            warn!("Skipping {}: negative selling price", row.name);
            errors += 1;
            continue;
        }
        rows.push(NewProduct {
            name: row.name,
            color: row.color,
            warranty: row.warranty,
            category: row.category,
            selling_price: row.selling_price,
        });
    }

    CsvImport { rows, errors }
}

/// Upsert each row by name, writing only when something changed so
/// `last_updated` reflects real edits.
async fn sync_products(db: &Database, rows: &[NewProduct]) -> database::Result<SyncOutcome> {
    let mut outcome = SyncOutcome::default();

    for row in rows {
        match product::get_by_name(db.pool(), &row.name).await? {
            Some(existing) => {
                let same = existing.color == row.color
                    && existing.warranty == row.warranty
                    && existing.category == row.category
                    && existing.selling_price == row.selling_price;
                if same {
                    outcome.unchanged += 1;
                } else {
                    product::update(db.pool(), existing.id, row).await?;
                    outcome.updated += 1;
                }
            }
            None => {
                product::insert(db.pool(), row).await?;
                outcome.added += 1;
            }
        }
    }

    Ok(outcome)
}

async fn record_sync(db: &Database, outcome: &SyncOutcome) -> database::Result<()> {
    let value = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "productsAdded": outcome.added,
        "productsUpdated": outcome.updated,
    });
    system::set_config(db.pool(), LAST_SYNC_KEY, &value).await
}

/// Demo products for a fresh install, matching the shop's usual lineup.
fn demo_catalog() -> Vec<NewProduct> {
    let rows = [
        ("iPhone 15 Pro", "Space Black", "Smartphones", 129900.0),
        ("Samsung Galaxy S24 Ultra", "Titanium Gray", "Smartphones", 145000.0),
        ("AirPods Pro (2nd Gen)", "White", "Audio", 24900.0),
        ("MacBook Air M3", "Midnight", "Laptops", 175000.0),
        ("iPad Pro 12.9", "Silver", "Tablets", 95000.0),
    ];

    rows.into_iter()
        .map(|(name, color, category, selling_price)| NewProduct {
            name: name.to_string(),
            color: color.to_string(),
            warranty: "1 Year".to_string(),
            category: category.to_string(),
            selling_price,
        })
        .collect()
}
