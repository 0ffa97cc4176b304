//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row in the per-operator conversation state store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// Telegram user id of the operator.
    pub user_id: i64,
    /// Stage tag (stable string encoding of [`invoice_core::Stage`]).
    pub stage: String,
    /// Draft invoice as a JSON document.
    pub data: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// A catalog product, synced from the shop spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Product name, unique case-insensitively.
    pub name: String,
    /// Color variant, if any.
    pub color: String,
    /// Warranty description (e.g., "1 Year").
    pub warranty: String,
    /// Category used for search (e.g., "Smartphones").
    pub category: String,
    /// Unit selling price in taka.
    pub selling_price: f64,
    /// When the row was last written by a sync.
    pub last_updated: String,
}

/// A finalized invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Assigned number, `YYYYMM` plus zero-padded sequence.
    pub invoice_number: String,
    /// Issue timestamp.
    pub date: String,
    /// Customer name.
    pub customer_name: String,
    /// Customer address.
    pub customer_address: String,
    /// Customer phone, normalized.
    pub customer_phone: String,
    /// Sum of line item amounts after per-row discounts.
    pub subtotal: f64,
    /// Tax rate, zero under the current pricing policy.
    pub tax_rate: f64,
    /// Tax amount, zero under the current pricing policy.
    pub tax_amount: f64,
    /// Flat discount applied to the whole invoice.
    pub discount_net: f64,
    /// Delivery charge.
    pub delivery_charge: f64,
    /// Grand total.
    pub total: f64,
    /// Telegram file id of the delivered PDF, once uploaded.
    pub pdf_file_id: Option<String>,
}

/// A line item on a finalized invoice.
///
/// Fields are a snapshot of the product at sale time; catalog syncs do
/// not touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct InvoiceItem {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning invoice.
    pub invoice_id: i64,
    /// 1-based position on the invoice.
    pub sl_no: i64,
    /// Catalog id of the product sold.
    pub product_id: i64,
    /// Product name at sale time.
    pub product_name: String,
    /// Color at sale time.
    pub color: String,
    /// Warranty at sale time.
    pub warranty: String,
    /// Units sold.
    pub quantity: i64,
    /// Unit price charged, after any chat-side price edit.
    pub unit_price: f64,
    /// Per-row discount percentage.
    pub discount_percent: f64,
    /// Net amount for the row.
    pub amount: f64,
}

/// A key/value entry in the system config store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SystemConfig {
    /// Config key (e.g., "last_product_sync").
    pub key: String,
    /// JSON value as text.
    pub value: String,
    /// Last update timestamp.
    pub updated_at: String,
}
