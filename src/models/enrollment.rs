use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

pub const ENROLLMENT_STATUSES: &[&str] = &["active", "completed", "dropped", "paused"];

/// Student to program.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramEnrollment {
    pub id: String,
    pub student_id: String,
    pub program_id: String,
    pub status: String,
    pub enrolled_at: String,
    pub program_title: Option<String>,
    pub program_description: Option<String>,
}

/// Student to course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseEnrollment {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub status: String,
    pub enrolled_at: String,
    pub course_name: Option<String>,
    pub course_level: Option<String>,
    pub course_description: Option<String>,
    pub student_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseEnrollmentRequest {
    pub student_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEnrollmentRequest {
    pub status: String,
}

pub fn validate_status(status: &str) -> Result<(), AppError> {
    if ENROLLMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("unknown enrollment status: {}", status)))
    }
}
