//! Invoice browsing routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use database::{Invoice, InvoiceItem};

use crate::error::Result;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 200;

/// Query parameters for the invoice listing.
#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

/// An invoice together with its line items.
#[derive(Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

/// List the most recently issued invoices.
pub async fn list_api(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Invoice>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let invoices = database::invoice::list_recent(state.db.pool(), limit).await?;
    Ok(Json(invoices))
}

/// Look up one invoice by its assigned number, items included.
pub async fn detail_api(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<InvoiceDetail>> {
    let pool = state.db.pool();

    let invoice = database::invoice::get_by_number(pool, &number).await?;
    let items = database::invoice::get_items(pool, invoice.id).await?;

    Ok(Json(InvoiceDetail { invoice, items }))
}
