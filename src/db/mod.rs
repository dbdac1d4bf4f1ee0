pub mod applications;
pub mod attendance;
pub mod courses;
pub mod curriculum;
pub mod enrollments;
pub mod gallery;
pub mod instructors;
pub mod payments;
pub mod profiles;
pub mod programs;
pub mod reports;
pub mod sessions;
pub mod settings;
pub mod students;

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use crate::error::AppError;

pub(crate) fn now() -> String {
    Utc::now().to_rfc3339()
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Opens the pool and brings the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
