use std::collections::HashMap;

use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{ListFilter, Profile, ProgramEnrollment, Role, StudentListItem, StudentStats};

pub async fn fetch_students(db: &SqlitePool, filter: &ListFilter) -> Result<Vec<StudentListItem>, sqlx::Error> {
    let profiles = sqlx::query_as::<_, Profile>(
        r#"
        SELECT * FROM profiles
        WHERE lower(trim(role)) = 'student'
          AND (?1 IS NULL OR lower(full_name) LIKE ?1 ESCAPE '\' OR lower(email) LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL OR status = ?2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(filter.search_pattern())
    .bind(filter.status())
    .fetch_all(db)
    .await?;

    let enrollments = super::enrollments::fetch_program_enrollments(db).await?;
    Ok(attach_enrollments(profiles, enrollments))
}

pub async fn find_student(db: &SqlitePool, id: &str) -> Result<Option<StudentListItem>, sqlx::Error> {
    let profile = match super::profiles::find_by_id(db, id).await? {
        Some(p) if p.role() == Role::Student => p,
        _ => return Ok(None),
    };

    let enrollments = super::enrollments::program_enrollments_for_student(db, id).await?;
    Ok(attach_enrollments(vec![profile], enrollments).pop())
}

fn attach_enrollments(profiles: Vec<Profile>, enrollments: Vec<ProgramEnrollment>) -> Vec<StudentListItem> {
    let mut by_student: HashMap<String, Vec<ProgramEnrollment>> = HashMap::new();
    for enrollment in enrollments {
        by_student.entry(enrollment.student_id.clone()).or_default().push(enrollment);
    }

    profiles
        .into_iter()
        .map(|profile| {
            let enrollments = by_student.remove(&profile.id).unwrap_or_default();
            let programs = enrollments
                .iter()
                .map(|e| e.program_title.clone().unwrap_or_else(|| e.program_id.clone()))
                .collect();
            StudentListItem { profile, programs, enrollments }
        })
        .collect()
}

pub async fn student_stats(db: &SqlitePool) -> Result<StudentStats, sqlx::Error> {
    let (total, active, inactive, graduated): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status = 'inactive' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status = 'graduated' THEN 1 ELSE 0 END), 0)
        FROM profiles
        WHERE lower(trim(role)) = 'student'
        "#,
    )
    .fetch_one(db)
    .await?;

    Ok(StudentStats { total, active, inactive, graduated })
}

/// Replaces the student's program enrollments with one active row per id.
pub async fn replace_program_enrollments(
    conn: &mut SqliteConnection,
    student_id: &str,
    program_ids: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM student_enrollments WHERE student_id = ?")
        .bind(student_id)
        .execute(&mut *conn)
        .await?;

    let now = super::now();
    for program_id in program_ids.iter().filter(|p| !p.is_empty()) {
        sqlx::query(
            r#"
            INSERT INTO student_enrollments (id, student_id, program_id, status, enrolled_at)
            VALUES (?1, ?2, ?3, 'active', ?4)
            "#,
        )
        .bind(super::new_id())
        .bind(student_id)
        .bind(program_id)
        .bind(&now)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
