use serde_json::Value;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{Setting, UpsertSettingRequest};

pub async fn fetch_all(db: &SqlitePool) -> Result<Vec<Setting>, sqlx::Error> {
    sqlx::query_as::<_, Setting>("SELECT * FROM settings ORDER BY category ASC, key ASC")
        .fetch_all(db)
        .await
}

pub async fn find(db: &SqlitePool, key: &str) -> Result<Option<Setting>, sqlx::Error> {
    sqlx::query_as::<_, Setting>("SELECT * FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
}

/// Writes by key. Category and description keep their stored values when
/// the request leaves them out.
pub async fn upsert(
    conn: &mut SqliteConnection,
    key: &str,
    req: &UpsertSettingRequest,
    updated_by: &str,
) -> Result<Setting, sqlx::Error> {
    sqlx::query_as::<_, Setting>(
        r#"
        INSERT INTO settings (id, key, value, category, description, updated_by, updated_at)
        VALUES (?1, ?2, ?3, COALESCE(?4, 'general'), ?5, ?6, ?7)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            category = COALESCE(?4, settings.category),
            description = COALESCE(?5, settings.description),
            updated_by = excluded.updated_by,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(super::new_id())
    .bind(key)
    .bind(Json(&req.value))
    .bind(&req.category)
    .bind(&req.description)
    .bind(updated_by)
    .bind(super::now())
    .fetch_one(conn)
    .await
}

/// All-or-nothing bulk write from the settings screen.
pub async fn upsert_many(
    db: &SqlitePool,
    entries: Vec<(String, UpsertSettingRequest)>,
    updated_by: &str,
) -> Result<Vec<Setting>, sqlx::Error> {
    let mut tx = db.begin().await?;
    let mut saved = Vec::with_capacity(entries.len());
    for (key, req) in &entries {
        saved.push(upsert(&mut tx, key, req, updated_by).await?);
    }
    tx.commit().await?;
    Ok(saved)
}

/// Convenience read of a single value.
pub async fn value(db: &SqlitePool, key: &str) -> Result<Option<Value>, sqlx::Error> {
    Ok(find(db, key).await?.map(|s| s.value.0))
}
