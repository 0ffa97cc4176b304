//! System config store for job bookkeeping.

use sqlx::SqlitePool;

use crate::models::SystemConfig;
use crate::Result;

/// Create or update a config entry. Values are stored as JSON text.
pub async fn set_config(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let value = serde_json::to_string(value)?;

    sqlx::query(
        r#"
        INSERT INTO system_config (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
    )
    .bind(key)
    .bind(&value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a config entry by key.
pub async fn get_config(pool: &SqlitePool, key: &str) -> Result<Option<SystemConfig>> {
    let record = sqlx::query_as::<_, SystemConfig>(
        r#"
        SELECT key, value, updated_at
        FROM system_config
        WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use serde_json::json;

    #[tokio::test]
    async fn test_config_upsert_round_trip() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        assert!(get_config(db.pool(), "last_product_sync").await.unwrap().is_none());

        set_config(
            db.pool(),
            "last_product_sync",
            &json!({"productsAdded": 5, "productsUpdated": 0}),
        )
        .await
        .unwrap();

        set_config(
            db.pool(),
            "last_product_sync",
            &json!({"productsAdded": 0, "productsUpdated": 2}),
        )
        .await
        .unwrap();

        let entry = get_config(db.pool(), "last_product_sync")
            .await
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&entry.value).unwrap();
        assert_eq!(value["productsUpdated"], 2);
    }
}
