use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{Course, CourseListItem, CourseStats, ListFilter, NewCourseRequest};

const COURSE_ITEM_SELECT: &str = r#"
    SELECT c.*, p.title AS program_title, ip.full_name AS instructor_name
    FROM courses c
    LEFT JOIN programs p ON p.id = c.program_id
    LEFT JOIN instructors i ON i.id = c.instructor_id
    LEFT JOIN profiles ip ON ip.id = i.profile_id
"#;

pub async fn fetch_courses(db: &SqlitePool, filter: &ListFilter) -> Result<Vec<CourseListItem>, sqlx::Error> {
    sqlx::query_as::<_, CourseListItem>(&format!(
        r#"{}
        WHERE (?1 IS NULL OR lower(c.name) LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL OR c.status = ?2)
        ORDER BY c.created_at DESC
        "#,
        COURSE_ITEM_SELECT
    ))
    .bind(filter.search_pattern())
    .bind(filter.status())
    .fetch_all(db)
    .await
}

pub async fn find_course_item(db: &SqlitePool, id: &str) -> Result<Option<CourseListItem>, sqlx::Error> {
    sqlx::query_as::<_, CourseListItem>(&format!("{} WHERE c.id = ?", COURSE_ITEM_SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn course_stats(db: &SqlitePool) -> Result<CourseStats, sqlx::Error> {
    let (total, active, draft, total_enrollments): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*),
            COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status = 'draft' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(current_students), 0)
        FROM courses
        "#,
    )
    .fetch_one(db)
    .await?;

    Ok(CourseStats { total, active, draft, total_enrollments })
}

pub async fn insert_course(db: &SqlitePool, req: NewCourseRequest) -> Result<Course, sqlx::Error> {
    let id = super::new_id();
    let now = super::now();
    let course = Course {
        id,
        name: req.name,
        program_id: req.program_id.filter(|p| !p.is_empty()),
        level: req.level,
        age_range_min: req.age_range_min,
        age_range_max: req.age_range_max,
        duration_months: req.duration_months,
        price_per_month: req.price_per_month,
        instructor_id: req.instructor_id.filter(|i| !i.is_empty()),
        max_students: req.max_students.unwrap_or(20),
        current_students: 0,
        status: req.status.unwrap_or_else(|| "draft".to_string()),
        description: req.description.filter(|d| !d.is_empty()),
        created_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO courses
            (id, name, program_id, level, age_range_min, age_range_max, duration_months,
            price_per_month, instructor_id, max_students, current_students, status,
            description, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, ?12, ?13)
        "#,
    )
    .bind(&course.id)
    .bind(&course.name)
    .bind(&course.program_id)
    .bind(&course.level)
    .bind(course.age_range_min)
    .bind(course.age_range_max)
    .bind(course.duration_months)
    .bind(course.price_per_month)
    .bind(&course.instructor_id)
    .bind(course.max_students)
    .bind(&course.status)
    .bind(&course.description)
    .bind(&course.created_at)
    .execute(db)
    .await?;

    Ok(course)
}

pub async fn update_course(db: &SqlitePool, course: &Course) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE courses
        SET name = ?1,
            program_id = ?2,
            level = ?3,
            age_range_min = ?4,
            age_range_max = ?5,
            duration_months = ?6,
            price_per_month = ?7,
            instructor_id = ?8,
            max_students = ?9,
            status = ?10,
            description = ?11
        WHERE id = ?12
        "#,
    )
    .bind(&course.name)
    .bind(&course.program_id)
    .bind(&course.level)
    .bind(course.age_range_min)
    .bind(course.age_range_max)
    .bind(course.duration_months)
    .bind(course.price_per_month)
    .bind(&course.instructor_id)
    .bind(course.max_students)
    .bind(&course.status)
    .bind(&course.description)
    .bind(&course.id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn delete_course(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Keeps `current_students` equal to the number of active enrollments.
pub async fn refresh_current_students(conn: &mut SqliteConnection, course_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE courses
        SET current_students = (
            SELECT COUNT(*) FROM course_enrollments
            WHERE course_id = ?1 AND status = 'active'
        )
        WHERE id = ?1
        "#,
    )
    .bind(course_id)
    .execute(conn)
    .await?;

    Ok(())
}
