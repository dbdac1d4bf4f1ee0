use std::collections::HashMap;

use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::models::{Instructor, InstructorListItem, InstructorStats, ListFilter, ProgramRef};
use crate::models::instructor::InstructorRow;

const INSTRUCTOR_ROW_SELECT: &str = r#"
    SELECT i.*, p.full_name AS full_name, p.email AS email
    FROM instructors i
    LEFT JOIN profiles p ON p.id = i.profile_id
"#;

#[derive(Debug, FromRow)]
struct AssignmentRow {
    instructor_id: String,
    program_id: String,
    title: Option<String>,
}

#[derive(Debug, FromRow)]
struct CourseCountRow {
    instructor_id: String,
    count: i64,
}

/// Everything the instructors screen shows, with program assignments and
/// course counts folded in.
pub async fn fetch_instructors(db: &SqlitePool, filter: &ListFilter) -> Result<Vec<InstructorListItem>, sqlx::Error> {
    let rows = sqlx::query_as::<_, InstructorRow>(&format!(
        r#"{}
        WHERE (?1 IS NULL OR lower(p.full_name) LIKE ?1 ESCAPE '\' OR lower(p.email) LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL OR i.status = ?2)
        ORDER BY i.created_at DESC
        "#,
        INSTRUCTOR_ROW_SELECT
    ))
    .bind(filter.search_pattern())
    .bind(filter.status())
    .fetch_all(db)
    .await?;

    assemble(db, rows).await
}

pub async fn find_item(db: &SqlitePool, id: &str) -> Result<Option<InstructorListItem>, sqlx::Error> {
    let row = match find_row(db, id).await? {
        Some(row) => row,
        None => return Ok(None),
    };

    Ok(assemble(db, vec![row]).await?.pop())
}

async fn assemble(db: &SqlitePool, rows: Vec<InstructorRow>) -> Result<Vec<InstructorListItem>, sqlx::Error> {
    let assignments = sqlx::query_as::<_, AssignmentRow>(
        r#"
        SELECT a.instructor_id, a.program_id, p.title
        FROM instructor_assignments a
        LEFT JOIN programs p ON p.id = a.program_id
        ORDER BY p.display_order, p.title
        "#,
    )
    .fetch_all(db)
    .await?;

    let counts = sqlx::query_as::<_, CourseCountRow>(
        r#"
        SELECT instructor_id, COUNT(*) AS count
        FROM courses
        WHERE instructor_id IS NOT NULL
        GROUP BY instructor_id
        "#,
    )
    .fetch_all(db)
    .await?;

    let mut programs: HashMap<String, Vec<ProgramRef>> = HashMap::new();
    for row in assignments {
        programs.entry(row.instructor_id).or_default().push(ProgramRef {
            title: row.title.unwrap_or_else(|| row.program_id.clone()),
            id: row.program_id,
        });
    }
    let counts: HashMap<String, i64> = counts.into_iter().map(|c| (c.instructor_id, c.count)).collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = row.instructor.id.clone();
            InstructorListItem {
                programs: programs.remove(&id).unwrap_or_default(),
                courses_count: counts.get(&id).copied().unwrap_or(0) as usize,
                instructor: row.instructor,
                full_name: row.full_name,
                email: row.email,
            }
        })
        .collect())
}

pub async fn find_row(db: &SqlitePool, id: &str) -> Result<Option<InstructorRow>, sqlx::Error> {
    sqlx::query_as::<_, InstructorRow>(&format!("{} WHERE i.id = ?", INSTRUCTOR_ROW_SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Instructor>, sqlx::Error> {
    sqlx::query_as::<_, Instructor>("SELECT * FROM instructors WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_profile(db: &SqlitePool, profile_id: &str) -> Result<Option<Instructor>, sqlx::Error> {
    sqlx::query_as::<_, Instructor>("SELECT * FROM instructors WHERE profile_id = ?")
        .bind(profile_id)
        .fetch_optional(db)
        .await
}

pub async fn instructor_stats(db: &SqlitePool) -> Result<InstructorStats, sqlx::Error> {
    let (total, active, inactive): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status != 'active' THEN 1 ELSE 0 END), 0)
        FROM instructors
        "#,
    )
    .fetch_one(db)
    .await?;

    let total_courses: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE instructor_id IS NOT NULL")
            .fetch_one(db)
            .await?;

    Ok(InstructorStats { total, active, inactive, total_courses })
}

pub async fn insert(conn: &mut SqliteConnection, instructor: &Instructor) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO instructors
            (id, profile_id, title, phone, specializations, status, join_date, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&instructor.id)
    .bind(&instructor.profile_id)
    .bind(&instructor.title)
    .bind(&instructor.phone)
    .bind(&instructor.specializations)
    .bind(&instructor.status)
    .bind(&instructor.join_date)
    .bind(&instructor.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update(conn: &mut SqliteConnection, instructor: &Instructor) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE instructors
        SET title = ?1,
            phone = ?2,
            specializations = ?3,
            status = ?4
        WHERE id = ?5
        "#,
    )
    .bind(&instructor.title)
    .bind(&instructor.phone)
    .bind(&instructor.specializations)
    .bind(&instructor.status)
    .bind(&instructor.id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Replaces the instructor's program assignments with `program_ids`.
pub async fn replace_assignments(
    conn: &mut SqliteConnection,
    instructor_id: &str,
    program_ids: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM instructor_assignments WHERE instructor_id = ?")
        .bind(instructor_id)
        .execute(&mut *conn)
        .await?;

    for program_id in program_ids.iter().filter(|p| !p.is_empty()) {
        sqlx::query("INSERT INTO instructor_assignments (id, instructor_id, program_id) VALUES (?1, ?2, ?3)")
            .bind(super::new_id())
            .bind(instructor_id)
            .bind(program_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM instructors WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();

    Ok(result > 0)
}
