use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use crate::error::AppError;
use crate::models::program::ProgramRef;

pub const INSTRUCTOR_STATUSES: &[&str] = &["active", "inactive", "on_leave"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Instructor {
    pub id: String,
    pub profile_id: String,
    pub title: String,
    pub phone: Option<String>,
    pub specializations: Json<Vec<String>>,
    pub status: String,
    pub join_date: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InstructorRow {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub instructor: Instructor,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructorListItem {
    #[serde(flatten)]
    pub instructor: Instructor,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub programs: Vec<ProgramRef>,
    pub courses_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructorStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub total_courses: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInstructorRequest {
    pub email: String,
    pub full_name: String,
    pub title: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub program_ids: Vec<String>,
    pub status: Option<String>,
    pub join_date: Option<String>,
    pub password: Option<String>,
}

impl NewInstructorRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        crate::models::validate_email(&self.email)?;
        if self.full_name.trim().is_empty() {
            return Err(AppError::BadRequest("full_name is required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        if let Some(status) = &self.status {
            validate_status(status)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInstructorRequest {
    pub title: Option<String>,
    pub phone: Option<String>,
    pub specializations: Option<Vec<String>>,
    pub status: Option<String>,
    pub program_ids: Option<Vec<String>>,
}

pub fn validate_status(status: &str) -> Result<(), AppError> {
    if INSTRUCTOR_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("unknown instructor status: {}", status)))
    }
}
