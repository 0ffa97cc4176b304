//! SQLite persistence layer for the invoice bot.
//!
//! This crate provides async database operations for conversation state,
//! the product catalog, issued invoices, and system config using SQLx
//! with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{product, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:invoices.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Look up catalog products for a chat query
//!     let hits = product::search(db.pool(), "iphone").await?;
//!     for p in hits {
//!         println!("{} — {}", p.name, p.selling_price);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod conversation;
pub mod error;
pub mod invoice;
pub mod models;
pub mod product;
pub mod system;

pub use conversation::ConversationState;
pub use error::{DatabaseError, Result};
pub use invoice::{NewInvoice, NewInvoiceItem};
pub use models::{Conversation, Invoice, InvoiceItem, Product, SystemConfig};
pub use product::NewProduct;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Enough for the bot loop, background jobs, and the admin pages at once.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/invoices.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use invoice_core::{InvoiceDraft, Stage};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    /// Issuing an invoice must not disturb unrelated state: the catalog
    /// keeps its prices and the conversation row survives untouched.
    #[tokio::test]
    async fn test_issue_leaves_catalog_and_conversations_alone() {
        let db = test_db().await;

        let product_id = product::insert(
            db.pool(),
            &NewProduct {
                name: "iPhone 15 Pro".to_string(),
                color: "Space Black".to_string(),
                warranty: "1 Year".to_string(),
                category: "Smartphones".to_string(),
                selling_price: 129900.0,
            },
        )
        .await
        .unwrap();

        conversation::set_state(db.pool(), 99, Stage::AwaitingConfirmation, &InvoiceDraft::default())
            .await
            .unwrap();

        let now = chrono::Utc.with_ymd_and_hms(2025, 8, 15, 10, 0, 0).unwrap();
        let invoice = invoice::create_invoice(
            db.pool(),
            now,
            &NewInvoice {
                customer_name: "Karim".to_string(),
                customer_address: "Uttara, Dhaka".to_string(),
                customer_phone: "01812345678".to_string(),
                items: vec![NewInvoiceItem {
                    product_id,
                    product_name: "iPhone 15 Pro".to_string(),
                    color: "Space Black".to_string(),
                    warranty: "1 Year".to_string(),
                    quantity: 1,
                    // Chat-side price edit: charged below catalog price.
                    unit_price: 120000.0,
                    discount_percent: 0.0,
                    amount: 120000.0,
                }],
                subtotal: 120000.0,
                discount_net: 0.0,
                delivery_charge: 60.0,
                total: 120060.0,
            },
        )
        .await
        .unwrap();

        assert_eq!(invoice.invoice_number, "202508001");

        let catalog = product::search(db.pool(), "iphone").await.unwrap();
        assert_eq!(catalog[0].selling_price, 129900.0);

        let state = conversation::get_state(db.pool(), 99).await.unwrap().unwrap();
        assert_eq!(state.stage, Stage::AwaitingConfirmation);
    }
}
