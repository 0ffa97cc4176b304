//! Invoice persistence and monthly sequence numbering.
//!
//! Numbers are `YYYYMM` plus a zero-padded per-month sequence. The
//! counter row for each month stores the last issued sequence; issuing
//! bumps it and the bump, invoice insert, and item inserts all commit
//! in one transaction.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Invoice, InvoiceItem};

/// Customer, line items, and totals for an invoice about to be issued.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub customer_name: String,
    pub customer_address: String,
    pub customer_phone: String,
    pub items: Vec<NewInvoiceItem>,
    pub subtotal: f64,
    pub discount_net: f64,
    pub delivery_charge: f64,
    pub total: f64,
}

/// One line item, snapshotting the product at sale time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoiceItem {
    pub product_id: i64,
    pub product_name: String,
    pub color: String,
    pub warranty: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub amount: f64,
}

/// Issue a number and persist the invoice with its items.
///
/// The caller supplies `now` so the month bucket is testable. If the
/// drawn number already belongs to an invoice (counter and ledger got
/// out of step, e.g. after a partial restore), the counter bump is kept
/// and the call fails with a retryable [`DatabaseError::AlreadyExists`];
/// the next attempt draws the following number instead of colliding
/// forever. Any other failure rolls the whole transaction back.
pub async fn create_invoice(
    pool: &SqlitePool,
    now: DateTime<Utc>,
    new: &NewInvoice,
) -> Result<Invoice> {
    let year_month = now.format("%Y%m").to_string();
    let date = now.format("%Y-%m-%d %H:%M:%S").to_string();

    let mut tx = pool.begin().await?;

    let sequence = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO invoice_counters (year_month, counter)
        VALUES (?, 1)
        ON CONFLICT(year_month) DO UPDATE SET counter = counter + 1
        RETURNING counter
        "#,
    )
    .bind(&year_month)
    .fetch_one(&mut *tx)
    .await?;

    let invoice_number = format!("{year_month}{sequence:03}");

    let existing = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM invoices WHERE invoice_number = ?
        "#,
    )
    .bind(&invoice_number)
    .fetch_optional(&mut *tx)
    .await?;

    if existing.is_some() {
        // Keep the bump so a retry moves past the orphaned number.
        tx.commit().await?;
        return Err(DatabaseError::AlreadyExists {
            entity: "Invoice",
            id: invoice_number,
        });
    }

    let invoice_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO invoices (
            invoice_number, date,
            customer_name, customer_address, customer_phone,
            subtotal, tax_rate, tax_amount, discount_net, delivery_charge, total
        )
        VALUES (?, ?, ?, ?, ?, ?, 0, 0, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&invoice_number)
    .bind(&date)
    .bind(&new.customer_name)
    .bind(&new.customer_address)
    .bind(&new.customer_phone)
    .bind(new.subtotal)
    .bind(new.discount_net)
    .bind(new.delivery_charge)
    .bind(new.total)
    .fetch_one(&mut *tx)
    .await?;

    for (position, item) in new.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (
                invoice_id, sl_no, product_id, product_name, color, warranty,
                quantity, unit_price, discount_percent, amount
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invoice_id)
        .bind((position + 1) as i64)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(&item.color)
        .bind(&item.warranty)
        .bind(i64::from(item.quantity))
        .bind(item.unit_price)
        .bind(item.discount_percent)
        .bind(item.amount)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Invoice {
        id: invoice_id,
        invoice_number,
        date,
        customer_name: new.customer_name.clone(),
        customer_address: new.customer_address.clone(),
        customer_phone: new.customer_phone.clone(),
        subtotal: new.subtotal,
        tax_rate: 0.0,
        tax_amount: 0.0,
        discount_net: new.discount_net,
        delivery_charge: new.delivery_charge,
        total: new.total,
        pdf_file_id: None,
    })
}

/// Get an invoice by its assigned number.
pub async fn get_by_number(pool: &SqlitePool, invoice_number: &str) -> Result<Invoice> {
    sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, invoice_number, date,
               customer_name, customer_address, customer_phone,
               subtotal, tax_rate, tax_amount, discount_net, delivery_charge,
               total, pdf_file_id
        FROM invoices
        WHERE invoice_number = ?
        "#,
    )
    .bind(invoice_number)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Invoice",
        id: invoice_number.to_string(),
    })
}

/// List the line items of an invoice in serial order.
pub async fn get_items(pool: &SqlitePool, invoice_id: i64) -> Result<Vec<InvoiceItem>> {
    let items = sqlx::query_as::<_, InvoiceItem>(
        r#"
        SELECT id, invoice_id, sl_no, product_id, product_name, color, warranty,
               quantity, unit_price, discount_percent, amount
        FROM invoice_items
        WHERE invoice_id = ?
        ORDER BY sl_no
        "#,
    )
    .bind(invoice_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// List the most recently issued invoices.
pub async fn list_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Invoice>> {
    let invoices = sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, invoice_number, date,
               customer_name, customer_address, customer_phone,
               subtotal, tax_rate, tax_amount, discount_net, delivery_charge,
               total, pdf_file_id
        FROM invoices
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(invoices)
}

/// Record the Telegram file id of the delivered PDF.
pub async fn set_pdf_reference(pool: &SqlitePool, invoice_id: i64, file_id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE invoices
        SET pdf_file_id = ?
        WHERE id = ?
        "#,
    )
    .bind(file_id)
    .bind(invoice_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Invoice",
            id: invoice_id.to_string(),
        });
    }

    Ok(())
}

/// Count all issued invoices.
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM invoices
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Last issued sequence for a month bucket, 0 if none yet.
pub async fn current_sequence(pool: &SqlitePool, year_month: &str) -> Result<i64> {
    let counter = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT counter FROM invoice_counters WHERE year_month = ?
        "#,
    )
    .bind(year_month)
    .fetch_optional(pool)
    .await?;

    Ok(counter.unwrap_or(0))
}
