//! Product catalog operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Product;

/// Fields for a product insert or update, as read from the sync source.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub color: String,
    pub warranty: String,
    pub category: String,
    pub selling_price: f64,
}

/// Escape `%`, `_`, and `\` so user text matches literally under LIKE.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Search products by substring over name, category, and color.
///
/// Matching is case-insensitive. An empty query returns the whole
/// catalog. Results come back in storage order.
pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<Product>> {
    let query = query.trim();
    if query.is_empty() {
        return list_in_storage_order(pool).await;
    }

    let pattern = like_pattern(query);
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, color, warranty, category, selling_price, last_updated
        FROM products
        WHERE name LIKE ? ESCAPE '\'
           OR category LIKE ? ESCAPE '\'
           OR color LIKE ? ESCAPE '\'
        ORDER BY id
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

async fn list_in_storage_order(pool: &SqlitePool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, color, warranty, category, selling_price, last_updated
        FROM products
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Get a product by name, matched case-insensitively.
pub async fn get_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, color, warranty, category, selling_price, last_updated
        FROM products
        WHERE name = ? COLLATE NOCASE
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// Insert a new product, returning its id.
pub async fn insert(pool: &SqlitePool, product: &NewProduct) -> Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO products (name, color, warranty, category, selling_price)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&product.name)
    .bind(&product.color)
    .bind(&product.warranty)
    .bind(&product.category)
    .bind(product.selling_price)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Product",
                    id: product.name.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(id)
}

/// Update an existing product and bump its sync timestamp.
pub async fn update(pool: &SqlitePool, id: i64, product: &NewProduct) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET name = ?, color = ?, warranty = ?, category = ?, selling_price = ?,
            last_updated = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&product.name)
    .bind(&product.color)
    .bind(&product.warranty)
    .bind(&product.category)
    .bind(product.selling_price)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Product",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List the whole catalog ordered by name.
pub async fn list(pool: &SqlitePool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, name, color, warranty, category, selling_price, last_updated
        FROM products
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Count catalog products.
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM products
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
