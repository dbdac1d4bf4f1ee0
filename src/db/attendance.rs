use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{AttendanceDetail, AttendanceRecord, RecordAttendanceRequest};

const ATTENDANCE_DETAIL_SELECT: &str = r#"
    SELECT a.*, c.name AS course_name, p.full_name AS student_name,
        s.day_of_week AS day_of_week, s.start_time AS start_time, s.end_time AS end_time
    FROM session_attendance a
    LEFT JOIN sessions s ON s.id = a.session_id
    LEFT JOIN courses c ON c.id = s.course_id
    LEFT JOIN profiles p ON p.id = a.student_id
"#;

/// Records one mark per (session, student, date), overwriting an earlier
/// mark for the same day, then refreshes the session's head count for that
/// date.
pub async fn record(
    db: &SqlitePool,
    session_id: &str,
    req: &RecordAttendanceRequest,
) -> Result<AttendanceRecord, sqlx::Error> {
    let mut tx = db.begin().await?;

    let record = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        INSERT INTO session_attendance (id, session_id, student_id, date, status, notes, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(session_id, student_id, date) DO UPDATE SET
            status = excluded.status,
            notes = excluded.notes
        RETURNING *
        "#,
    )
    .bind(super::new_id())
    .bind(session_id)
    .bind(&req.student_id)
    .bind(&req.date)
    .bind(&req.status)
    .bind(&req.notes)
    .bind(super::now())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE sessions
        SET current_attendance = (
            SELECT COUNT(*) FROM session_attendance
            WHERE session_id = ?1 AND date = ?2 AND status IN ('present', 'late')
        )
        WHERE id = ?1
        "#,
    )
    .bind(session_id)
    .bind(&req.date)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(record)
}

pub async fn for_session(
    db: &SqlitePool,
    session_id: &str,
    date: Option<&str>,
) -> Result<Vec<AttendanceDetail>, sqlx::Error> {
    match date {
        Some(date) => {
            sqlx::query_as::<_, AttendanceDetail>(&format!(
                "{} WHERE a.session_id = ? AND a.date = ? ORDER BY p.full_name",
                ATTENDANCE_DETAIL_SELECT
            ))
            .bind(session_id)
            .bind(date)
            .fetch_all(db)
            .await
        }
        None => {
            sqlx::query_as::<_, AttendanceDetail>(&format!(
                "{} WHERE a.session_id = ? ORDER BY a.date DESC, p.full_name",
                ATTENDANCE_DETAIL_SELECT
            ))
            .bind(session_id)
            .fetch_all(db)
            .await
        }
    }
}

pub async fn fetch_all(db: &SqlitePool) -> Result<Vec<AttendanceDetail>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceDetail>(&format!("{} ORDER BY a.date DESC", ATTENDANCE_DETAIL_SELECT))
        .fetch_all(db)
        .await
}

pub async fn session_ids_for_student(conn: &mut SqliteConnection, student_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT DISTINCT session_id FROM session_attendance WHERE student_id = ?")
        .bind(student_id)
        .fetch_all(conn)
        .await
}

pub async fn statuses_for_student(db: &SqlitePool, student_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT status FROM session_attendance WHERE student_id = ?")
        .bind(student_id)
        .fetch_all(db)
        .await
}

/// Most recent marks first.
pub async fn recent_for_student(
    db: &SqlitePool,
    student_id: &str,
    limit: i64,
) -> Result<Vec<AttendanceDetail>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceDetail>(&format!(
        "{} WHERE a.student_id = ? ORDER BY a.date DESC, a.created_at DESC LIMIT ?",
        ATTENDANCE_DETAIL_SELECT
    ))
    .bind(student_id)
    .bind(limit)
    .fetch_all(db)
    .await
}
