use std::collections::HashMap;

use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::models::{ListFilter, NewProgramRequest, Program, ProgramDetail, ProgramRef, UpdateProgramRequest};

#[derive(Debug, Clone, Copy)]
enum ChildList {
    Highlights,
    Outcomes,
    Projects,
}

impl ChildList {
    fn table(self) -> &'static str {
        match self {
            ChildList::Highlights => "program_highlights",
            ChildList::Outcomes => "program_outcomes",
            ChildList::Projects => "program_projects",
        }
    }

    fn column(self) -> &'static str {
        match self {
            ChildList::Highlights => "highlight",
            ChildList::Outcomes => "outcome",
            ChildList::Projects => "project",
        }
    }
}

#[derive(Debug, FromRow)]
struct ChildRow {
    program_id: String,
    text: String,
}

async fn fetch_children(db: &SqlitePool, list: ChildList) -> Result<HashMap<String, Vec<String>>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ChildRow>(&format!(
        "SELECT program_id, {} AS text FROM {} ORDER BY program_id, display_order, id",
        list.column(),
        list.table()
    ))
    .fetch_all(db)
    .await?;

    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        grouped.entry(row.program_id).or_default().push(row.text);
    }
    Ok(grouped)
}

async fn replace_children(
    conn: &mut SqliteConnection,
    program_id: &str,
    list: ChildList,
    items: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("DELETE FROM {} WHERE program_id = ?", list.table()))
        .bind(program_id)
        .execute(&mut *conn)
        .await?;

    for (order, item) in items.iter().enumerate() {
        sqlx::query(&format!(
            "INSERT INTO {} (program_id, {}, display_order) VALUES (?1, ?2, ?3)",
            list.table(),
            list.column()
        ))
        .bind(program_id)
        .bind(item)
        .bind(order as i64)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn attach_details(db: &SqlitePool, programs: Vec<Program>) -> Result<Vec<ProgramDetail>, sqlx::Error> {
    let (mut highlights, mut outcomes, mut projects) = tokio::try_join!(
        fetch_children(db, ChildList::Highlights),
        fetch_children(db, ChildList::Outcomes),
        fetch_children(db, ChildList::Projects),
    )?;

    Ok(programs
        .into_iter()
        .map(|program| ProgramDetail {
            highlights: highlights.remove(&program.id).unwrap_or_default(),
            outcomes: outcomes.remove(&program.id).unwrap_or_default(),
            projects: projects.remove(&program.id).unwrap_or_default(),
            program,
        })
        .collect())
}

/// Published programs for the public site.
pub async fn fetch_active(db: &SqlitePool) -> Result<Vec<ProgramDetail>, sqlx::Error> {
    let programs = sqlx::query_as::<_, Program>(
        "SELECT * FROM programs WHERE is_active = 1 ORDER BY display_order ASC, title ASC",
    )
    .fetch_all(db)
    .await?;

    attach_details(db, programs).await
}

pub async fn fetch_all(db: &SqlitePool, filter: &ListFilter) -> Result<Vec<ProgramDetail>, sqlx::Error> {
    let programs = sqlx::query_as::<_, Program>(
        r#"
        SELECT * FROM programs
        WHERE (?1 IS NULL OR lower(title) LIKE ?1 ESCAPE '\' OR lower(ages) LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL OR is_active = ?2)
        ORDER BY display_order ASC, title ASC
        "#,
    )
    .bind(filter.search_pattern())
    .bind(filter.active_flag())
    .fetch_all(db)
    .await?;

    attach_details(db, programs).await
}

pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Program>, sqlx::Error> {
    sqlx::query_as::<_, Program>("SELECT * FROM programs WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_detail(db: &SqlitePool, id: &str) -> Result<Option<ProgramDetail>, sqlx::Error> {
    let program = match find_by_id(db, id).await? {
        Some(p) => p,
        None => return Ok(None),
    };

    Ok(attach_details(db, vec![program]).await?.pop())
}

pub async fn fetch_refs(db: &SqlitePool) -> Result<HashMap<String, String>, sqlx::Error> {
    let refs = sqlx::query_as::<_, ProgramRef>("SELECT id, title FROM programs")
        .fetch_all(db)
        .await?;

    Ok(refs.into_iter().map(|r| (r.id, r.title)).collect())
}

pub async fn insert(db: &SqlitePool, req: NewProgramRequest) -> Result<ProgramDetail, sqlx::Error> {
    let id = req.id.trim().to_string();
    let now = super::now();
    let mut tx = db.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO programs
            (id, title, ages, duration, class_size, description, icon_name,
            color, display_order, is_active, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10)
        "#,
    )
    .bind(&id)
    .bind(&req.title)
    .bind(&req.ages)
    .bind(&req.duration)
    .bind(&req.class_size)
    .bind(&req.description)
    .bind(&req.icon_name)
    .bind(&req.color)
    .bind(req.display_order.unwrap_or(0))
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    replace_children(&mut tx, &id, ChildList::Highlights, &req.highlights).await?;
    replace_children(&mut tx, &id, ChildList::Outcomes, &req.outcomes).await?;
    replace_children(&mut tx, &id, ChildList::Projects, &req.projects).await?;
    tx.commit().await?;

    find_detail(db, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn update(
    db: &SqlitePool,
    id: &str,
    req: UpdateProgramRequest,
) -> Result<Option<ProgramDetail>, sqlx::Error> {
    let mut current = match find_by_id(db, id).await? {
        Some(p) => p,
        None => return Ok(None),
    };

    if let Some(v) = req.title {
        current.title = v;
    }
    if let Some(v) = req.ages {
        current.ages = v;
    }
    if let Some(v) = req.duration {
        current.duration = v;
    }
    if let Some(v) = req.class_size {
        current.class_size = v;
    }
    if let Some(v) = req.description {
        current.description = v;
    }
    if let Some(v) = req.icon_name {
        current.icon_name = Some(v);
    }
    if let Some(v) = req.color {
        current.color = v;
    }
    if let Some(v) = req.is_active {
        current.is_active = v;
    }
    if let Some(v) = req.display_order {
        current.display_order = v;
    }

    let mut tx = db.begin().await?;
    sqlx::query(
        r#"
        UPDATE programs
        SET title = ?1,
            ages = ?2,
            duration = ?3,
            class_size = ?4,
            description = ?5,
            icon_name = ?6,
            color = ?7,
            is_active = ?8,
            display_order = ?9
        WHERE id = ?10
        "#,
    )
    .bind(&current.title)
    .bind(&current.ages)
    .bind(&current.duration)
    .bind(&current.class_size)
    .bind(&current.description)
    .bind(&current.icon_name)
    .bind(&current.color)
    .bind(current.is_active)
    .bind(current.display_order)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(items) = &req.highlights {
        replace_children(&mut tx, id, ChildList::Highlights, items).await?;
    }
    if let Some(items) = &req.outcomes {
        replace_children(&mut tx, id, ChildList::Outcomes, items).await?;
    }
    if let Some(items) = &req.projects {
        replace_children(&mut tx, id, ChildList::Projects, items).await?;
    }
    tx.commit().await?;

    find_detail(db, id).await
}

pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM programs WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
