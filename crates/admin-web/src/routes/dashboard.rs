//! Dashboard routes.

use askama::Template;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use invoice_core::currency::format_taka;

use crate::error::Result;
use crate::state::AppState;

/// How many invoices the dashboard table shows.
const RECENT_ROWS: i64 = 10;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub stats: Stats,
    pub recent: Vec<RecentInvoice>,
}

/// Dashboard statistics.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub product_count: i64,
    pub invoice_count: i64,
    /// Numbering period the sequence below belongs to (`YYYYMM`).
    pub month: String,
    /// Invoices issued so far in the current period.
    pub month_sequence: i64,
    pub last_sync: Option<LastSync>,
}

/// Summary of the most recent catalog sync, as recorded by the sync job.
#[derive(Debug, Clone, Serialize)]
pub struct LastSync {
    pub timestamp: String,
    pub products_added: i64,
    pub products_updated: i64,
}

/// One row of the recent invoices table, preformatted for display.
pub struct RecentInvoice {
    pub invoice_number: String,
    pub date: String,
    pub customer_name: String,
    pub total: String,
}

/// Dashboard page handler.
pub async fn dashboard_page(State(state): State<AppState>) -> Result<DashboardTemplate> {
    let stats = get_stats(&state).await?;
    let recent = get_recent(&state).await?;
    Ok(DashboardTemplate { stats, recent })
}

/// Stats API endpoint.
pub async fn stats_api(State(state): State<AppState>) -> Result<Json<Stats>> {
    let stats = get_stats(&state).await?;
    Ok(Json(stats))
}

async fn get_stats(state: &AppState) -> Result<Stats> {
    let pool = state.db.pool();

    let product_count = database::product::count(pool).await?;
    let invoice_count = database::invoice::count(pool).await?;

    let month = Utc::now().format("%Y%m").to_string();
    let month_sequence = database::invoice::current_sequence(pool, &month).await?;

    let last_sync = match database::system::get_config(pool, "last_product_sync").await? {
        Some(entry) => decode_last_sync(&entry.value),
        None => None,
    };

    Ok(Stats {
        product_count,
        invoice_count,
        month,
        month_sequence,
        last_sync,
    })
}

async fn get_recent(state: &AppState) -> Result<Vec<RecentInvoice>> {
    let invoices = database::invoice::list_recent(state.db.pool(), RECENT_ROWS).await?;

    Ok(invoices
        .into_iter()
        .map(|invoice| RecentInvoice {
            invoice_number: invoice.invoice_number,
            date: invoice.date,
            customer_name: invoice.customer_name,
            total: format_taka(invoice.total),
        })
        .collect())
}

/// Decode the sync summary written by the catalog sync job. An unreadable
/// value renders as "no sync recorded" instead of failing the page.
fn decode_last_sync(raw: &str) -> Option<LastSync> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    Some(LastSync {
        timestamp: value.get("timestamp")?.as_str()?.to_string(),
        products_added: value
            .get("productsAdded")
            .and_then(|v| v.as_i64())
            .unwrap_or(0),
        products_updated: value
            .get("productsUpdated")
            .and_then(|v| v.as_i64())
            .unwrap_or(0),
    })
}
