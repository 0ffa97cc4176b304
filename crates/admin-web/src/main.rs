//! Admin web interface for the invoice bot.
//!
//! Read-only dashboard over the product catalog and issued invoices.
//! Serves a server-rendered HTML page plus a small JSON API.

mod config;
mod error;
mod routes;
mod state;

use database::Database;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let state = AppState::new(db);
    let app = routes::router().with_state(state);

    info!("Admin web server listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
