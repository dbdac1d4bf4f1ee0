use sqlx::SqlitePool;

use crate::models::{Application, ApplicationStats, ListFilter, NewApplicationRequest, UpdateApplicationStatusRequest};

const APPLICATION_SELECT: &str = r#"
    SELECT a.*, p.title AS program_title
    FROM applications a
    LEFT JOIN programs p ON p.id = a.program_id
"#;

pub async fn fetch_applications(db: &SqlitePool, filter: &ListFilter) -> Result<Vec<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>(&format!(
        r#"{}
        WHERE (?1 IS NULL
               OR lower(a.student_name) LIKE ?1 ESCAPE '\'
               OR lower(a.parent_name) LIKE ?1 ESCAPE '\'
               OR lower(a.parent_email) LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL OR a.status = ?2)
        ORDER BY a.created_at DESC
        "#,
        APPLICATION_SELECT
    ))
    .bind(filter.search_pattern())
    .bind(filter.status())
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>(&format!("{} WHERE a.id = ?", APPLICATION_SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn application_stats(db: &SqlitePool) -> Result<ApplicationStats, sqlx::Error> {
    let (pending, approved, rejected): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status = 'approved' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status = 'rejected' THEN 1 ELSE 0 END), 0)
        FROM applications
        "#,
    )
    .fetch_one(db)
    .await?;

    Ok(ApplicationStats { pending, approved, rejected })
}

pub async fn insert(db: &SqlitePool, req: NewApplicationRequest) -> Result<Application, sqlx::Error> {
    let id = super::new_id();

    sqlx::query(
        r#"
        INSERT INTO applications
            (id, parent_name, parent_email, parent_phone, student_name, student_age,
            student_grade, school_name, program_id, branch, application_type, notes,
            status, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 'pending', ?13)
        "#,
    )
    .bind(&id)
    .bind(req.parent_name.trim())
    .bind(req.parent_email.trim())
    .bind(req.parent_phone.trim())
    .bind(req.student_name.trim())
    .bind(req.student_age)
    .bind(&req.student_grade)
    .bind(&req.school_name)
    .bind(req.program_id.filter(|p| !p.is_empty()))
    .bind(&req.branch)
    .bind(req.application_type.unwrap_or_else(|| "trial".to_string()))
    .bind(&req.notes)
    .bind(super::now())
    .execute(db)
    .await?;

    find_by_id(db, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Stamps the reviewer and review time alongside the new status.
pub async fn update_status(
    db: &SqlitePool,
    id: &str,
    reviewer_id: &str,
    req: &UpdateApplicationStatusRequest,
) -> Result<Option<Application>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE applications
        SET status = ?1,
            reviewed_by = ?2,
            reviewed_at = ?3,
            review_notes = COALESCE(?4, review_notes)
        WHERE id = ?5
        "#,
    )
    .bind(&req.status)
    .bind(reviewer_id)
    .bind(super::now())
    .bind(&req.review_notes)
    .bind(id)
    .execute(db)
    .await?
    .rows_affected();

    if result == 0 {
        return Ok(None);
    }
    find_by_id(db, id).await
}
