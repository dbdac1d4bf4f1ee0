use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{ListFilter, NewSessionRequest, Session, SessionListItem, SessionStats};

const SESSION_ITEM_SELECT: &str = r#"
    SELECT s.*, c.name AS course_name, c.level AS course_level, ip.full_name AS instructor_name
    FROM sessions s
    LEFT JOIN courses c ON c.id = s.course_id
    LEFT JOIN instructors i ON i.id = s.instructor_id
    LEFT JOIN profiles ip ON ip.id = i.profile_id
"#;

pub async fn fetch_sessions(db: &SqlitePool, filter: &ListFilter) -> Result<Vec<SessionListItem>, sqlx::Error> {
    sqlx::query_as::<_, SessionListItem>(&format!(
        r#"{}
        WHERE (?1 IS NULL
               OR lower(c.name) LIKE ?1 ESCAPE '\'
               OR lower(ip.full_name) LIKE ?1 ESCAPE '\'
               OR lower(s.room) LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL OR s.day_of_week = ?2)
        ORDER BY s.day_of_week ASC, s.start_time ASC
        "#,
        SESSION_ITEM_SELECT
    ))
    .bind(filter.search_pattern())
    .bind(filter.day_of_week)
    .fetch_all(db)
    .await
}

pub async fn find_session_item(db: &SqlitePool, id: &str) -> Result<Option<SessionListItem>, sqlx::Error> {
    sqlx::query_as::<_, SessionListItem>(&format!("{} WHERE s.id = ?", SESSION_ITEM_SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_session_by_id(db: &SqlitePool, id: &str) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Recurring sessions of every course the student is actively enrolled in.
pub async fn recurring_sessions_for_student(
    db: &SqlitePool,
    student_id: &str,
) -> Result<Vec<SessionListItem>, sqlx::Error> {
    sqlx::query_as::<_, SessionListItem>(&format!(
        r#"{}
        WHERE s.is_recurring = 1
          AND s.course_id IN (
            SELECT course_id FROM course_enrollments
            WHERE student_id = ? AND status = 'active'
          )
        ORDER BY s.day_of_week ASC, s.start_time ASC
        "#,
        SESSION_ITEM_SELECT
    ))
    .bind(student_id)
    .fetch_all(db)
    .await
}

pub async fn session_stats(db: &SqlitePool) -> Result<SessionStats, sqlx::Error> {
    let (weekly_sessions, active_instructors, rooms, total_attendance): (i64, i64, i64, i64) =
        sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(DISTINCT instructor_id),
                COUNT(DISTINCT NULLIF(room, '')),
                COALESCE(SUM(current_attendance), 0)
            FROM sessions
            "#,
        )
        .fetch_one(db)
        .await?;

    Ok(SessionStats { weekly_sessions, active_instructors, rooms, total_attendance })
}

pub async fn insert_session(db: &SqlitePool, req: NewSessionRequest) -> Result<Session, sqlx::Error> {
    let session = Session {
        id: super::new_id(),
        course_id: req.course_id,
        instructor_id: req.instructor_id.filter(|i| !i.is_empty()),
        day_of_week: req.day_of_week,
        start_time: req.start_time,
        end_time: req.end_time,
        room: req.room.filter(|r| !r.is_empty()),
        max_capacity: req.max_capacity.unwrap_or(20),
        current_attendance: 0,
        is_recurring: req.is_recurring.unwrap_or(true),
        start_date: req.start_date.filter(|d| !d.is_empty()),
        end_date: req.end_date.filter(|d| !d.is_empty()),
        created_at: super::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO sessions
            (id, course_id, instructor_id, day_of_week, start_time, end_time, room,
            max_capacity, current_attendance, is_recurring, start_date, end_date, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&session.id)
    .bind(&session.course_id)
    .bind(&session.instructor_id)
    .bind(session.day_of_week)
    .bind(&session.start_time)
    .bind(&session.end_time)
    .bind(&session.room)
    .bind(session.max_capacity)
    .bind(session.is_recurring)
    .bind(&session.start_date)
    .bind(&session.end_date)
    .bind(&session.created_at)
    .execute(db)
    .await?;

    Ok(session)
}

pub async fn update_session(db: &SqlitePool, session: &Session) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE sessions
        SET course_id = ?1,
            instructor_id = ?2,
            day_of_week = ?3,
            start_time = ?4,
            end_time = ?5,
            room = ?6,
            max_capacity = ?7,
            is_recurring = ?8,
            start_date = ?9,
            end_date = ?10
        WHERE id = ?11
        "#,
    )
    .bind(&session.course_id)
    .bind(&session.instructor_id)
    .bind(session.day_of_week)
    .bind(&session.start_time)
    .bind(&session.end_time)
    .bind(&session.room)
    .bind(session.max_capacity)
    .bind(session.is_recurring)
    .bind(&session.start_date)
    .bind(&session.end_date)
    .bind(&session.id)
    .execute(db)
    .await?;

    Ok(())
}

/// Recounts present and late marks for the latest date the session has
/// attendance on. Zero once no marks remain.
pub async fn refresh_current_attendance(conn: &mut SqliteConnection, session_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE sessions
        SET current_attendance = (
            SELECT COUNT(*) FROM session_attendance
            WHERE session_id = ?1
              AND status IN ('present', 'late')
              AND date = (SELECT MAX(date) FROM session_attendance WHERE session_id = ?1)
        )
        WHERE id = ?1
        "#,
    )
    .bind(session_id)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn delete_session(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
