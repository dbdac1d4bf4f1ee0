use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{CourseEnrollment, ProgramEnrollment};

const PROGRAM_ENROLLMENT_SELECT: &str = r#"
    SELECT e.id, e.student_id, e.program_id, e.status, e.enrolled_at,
        p.title AS program_title, p.description AS program_description
    FROM student_enrollments e
    LEFT JOIN programs p ON p.id = e.program_id
"#;

const COURSE_ENROLLMENT_SELECT: &str = r#"
    SELECT e.id, e.student_id, e.course_id, e.status, e.enrolled_at,
        c.name AS course_name, c.level AS course_level, c.description AS course_description,
        s.full_name AS student_name
    FROM course_enrollments e
    LEFT JOIN courses c ON c.id = e.course_id
    LEFT JOIN profiles s ON s.id = e.student_id
"#;

pub async fn fetch_program_enrollments(db: &SqlitePool) -> Result<Vec<ProgramEnrollment>, sqlx::Error> {
    sqlx::query_as::<_, ProgramEnrollment>(&format!("{} ORDER BY e.enrolled_at", PROGRAM_ENROLLMENT_SELECT))
        .fetch_all(db)
        .await
}

pub async fn program_enrollments_for_student(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Vec<ProgramEnrollment>, sqlx::Error> {
    sqlx::query_as::<_, ProgramEnrollment>(&format!(
        "{} WHERE e.student_id = ? ORDER BY e.enrolled_at",
        PROGRAM_ENROLLMENT_SELECT
    ))
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn course_enrollments_for_student(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Vec<CourseEnrollment>, sqlx::Error> {
    sqlx::query_as::<_, CourseEnrollment>(&format!(
        "{} WHERE e.student_id = ? ORDER BY e.enrolled_at DESC",
        COURSE_ENROLLMENT_SELECT
    ))
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn course_enrollments_for_course(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Vec<CourseEnrollment>, sqlx::Error> {
    sqlx::query_as::<_, CourseEnrollment>(&format!(
        "{} WHERE e.course_id = ? ORDER BY s.full_name",
        COURSE_ENROLLMENT_SELECT
    ))
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn find_course_enrollment(db: &SqlitePool, id: &str) -> Result<Option<CourseEnrollment>, sqlx::Error> {
    sqlx::query_as::<_, CourseEnrollment>(&format!("{} WHERE e.id = ?", COURSE_ENROLLMENT_SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn active_course_ids(conn: &mut SqliteConnection, student_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT course_id FROM course_enrollments WHERE student_id = ? AND status = 'active'",
    )
    .bind(student_id)
    .fetch_all(conn)
    .await
}

pub async fn insert_course_enrollment(
    conn: &mut SqliteConnection,
    student_id: &str,
    course_id: &str,
) -> Result<String, sqlx::Error> {
    let id = super::new_id();

    sqlx::query(
        r#"
        INSERT INTO course_enrollments (id, student_id, course_id, status, enrolled_at)
        VALUES (?1, ?2, ?3, 'active', ?4)
        "#,
    )
    .bind(&id)
    .bind(student_id)
    .bind(course_id)
    .bind(super::now())
    .execute(&mut *conn)
    .await?;

    super::courses::refresh_current_students(conn, course_id).await?;
    Ok(id)
}

/// Returns the course id of the updated enrollment, if it existed.
pub async fn update_course_enrollment_status(
    conn: &mut SqliteConnection,
    id: &str,
    status: &str,
) -> Result<Option<String>, sqlx::Error> {
    let course_id: Option<String> =
        sqlx::query_scalar("UPDATE course_enrollments SET status = ?1 WHERE id = ?2 RETURNING course_id")
            .bind(status)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    if let Some(course_id) = &course_id {
        super::courses::refresh_current_students(conn, course_id).await?;
    }
    Ok(course_id)
}

pub async fn delete_course_enrollment(conn: &mut SqliteConnection, id: &str) -> Result<bool, sqlx::Error> {
    let course_id: Option<String> =
        sqlx::query_scalar("DELETE FROM course_enrollments WHERE id = ? RETURNING course_id")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

    match course_id {
        Some(course_id) => {
            super::courses::refresh_current_students(conn, &course_id).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub async fn fetch_course_enrollments(db: &SqlitePool) -> Result<Vec<CourseEnrollment>, sqlx::Error> {
    sqlx::query_as::<_, CourseEnrollment>(&format!("{} ORDER BY e.enrolled_at DESC", COURSE_ENROLLMENT_SELECT))
        .fetch_all(db)
        .await
}
