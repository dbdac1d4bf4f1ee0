use std::collections::HashMap;

use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::models::curriculum::clean_topics;
use crate::models::{CurriculumModule, ModuleWithTopics, NewModuleRequest, UpdateModuleRequest};

#[derive(Debug, FromRow)]
struct TopicRow {
    module_id: String,
    topic: String,
}

async fn replace_topics(conn: &mut SqliteConnection, module_id: &str, topics: &[String]) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM curriculum_topics WHERE module_id = ?")
        .bind(module_id)
        .execute(&mut *conn)
        .await?;

    for (order, topic) in clean_topics(topics).iter().enumerate() {
        sqlx::query("INSERT INTO curriculum_topics (module_id, topic, display_order) VALUES (?1, ?2, ?3)")
            .bind(module_id)
            .bind(topic)
            .bind(order as i64)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn fetch_by_program(db: &SqlitePool, program_id: &str) -> Result<Vec<ModuleWithTopics>, sqlx::Error> {
    let modules = sqlx::query_as::<_, CurriculumModule>(
        "SELECT * FROM curriculum_modules WHERE program_id = ? ORDER BY display_order ASC, created_at ASC",
    )
    .bind(program_id)
    .fetch_all(db)
    .await?;

    let topics = sqlx::query_as::<_, TopicRow>(
        r#"
        SELECT t.module_id, t.topic
        FROM curriculum_topics t
        JOIN curriculum_modules m ON m.id = t.module_id
        WHERE m.program_id = ?
        ORDER BY t.display_order ASC, t.id ASC
        "#,
    )
    .bind(program_id)
    .fetch_all(db)
    .await?;

    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for row in topics {
        grouped.entry(row.module_id).or_default().push(row.topic);
    }

    Ok(modules
        .into_iter()
        .map(|module| ModuleWithTopics {
            topics: grouped.remove(&module.id).unwrap_or_default(),
            module,
        })
        .collect())
}

pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<CurriculumModule>, sqlx::Error> {
    sqlx::query_as::<_, CurriculumModule>("SELECT * FROM curriculum_modules WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

async fn find_with_topics(db: &SqlitePool, id: &str) -> Result<Option<ModuleWithTopics>, sqlx::Error> {
    let module = match find_by_id(db, id).await? {
        Some(m) => m,
        None => return Ok(None),
    };

    let topics: Vec<String> = sqlx::query_scalar(
        "SELECT topic FROM curriculum_topics WHERE module_id = ? ORDER BY display_order ASC, id ASC",
    )
    .bind(id)
    .fetch_all(db)
    .await?;

    Ok(Some(ModuleWithTopics { module, topics }))
}

pub async fn insert(db: &SqlitePool, req: NewModuleRequest) -> Result<ModuleWithTopics, sqlx::Error> {
    let id = super::new_id();
    let now = super::now();
    let mut tx = db.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO curriculum_modules
            (id, program_id, title, weeks, outcome, display_order, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&id)
    .bind(&req.program_id)
    .bind(&req.title)
    .bind(&req.weeks)
    .bind(&req.outcome)
    .bind(req.display_order.unwrap_or(0))
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    replace_topics(&mut tx, &id, &req.topics).await?;
    tx.commit().await?;

    find_with_topics(db, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn update(
    db: &SqlitePool,
    id: &str,
    req: UpdateModuleRequest,
) -> Result<Option<ModuleWithTopics>, sqlx::Error> {
    let mut current = match find_by_id(db, id).await? {
        Some(m) => m,
        None => return Ok(None),
    };

    if let Some(v) = req.title {
        current.title = v;
    }
    if let Some(v) = req.weeks {
        current.weeks = v;
    }
    if let Some(v) = req.outcome {
        current.outcome = v;
    }
    if let Some(v) = req.display_order {
        current.display_order = v;
    }

    let mut tx = db.begin().await?;
    sqlx::query(
        "UPDATE curriculum_modules SET title = ?1, weeks = ?2, outcome = ?3, display_order = ?4 WHERE id = ?5",
    )
    .bind(&current.title)
    .bind(&current.weeks)
    .bind(&current.outcome)
    .bind(current.display_order)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(topics) = &req.topics {
        replace_topics(&mut tx, id, topics).await?;
    }
    tx.commit().await?;

    find_with_topics(db, id).await
}

pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM curriculum_modules WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
