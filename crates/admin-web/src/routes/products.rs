//! Catalog browsing routes.

use axum::extract::State;
use axum::Json;

use database::Product;

use crate::error::Result;
use crate::state::AppState;

/// List the full product catalog.
pub async fn list_api(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = database::product::list(state.db.pool()).await?;
    Ok(Json(products))
}
