use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

pub const COURSE_STATUSES: &[&str] = &["draft", "active", "archived"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub program_id: Option<String>,
    pub level: String,
    pub age_range_min: i64,
    pub age_range_max: i64,
    pub duration_months: i64,
    pub price_per_month: f64,
    pub instructor_id: Option<String>,
    pub max_students: i64,
    pub current_students: i64,
    pub status: String,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseListItem {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub course: Course,
    pub program_title: Option<String>,
    pub instructor_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseStats {
    pub total: i64,
    pub active: i64,
    pub draft: i64,
    pub total_enrollments: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub name: String,
    pub program_id: Option<String>,
    pub level: String,
    pub age_range_min: i64,
    pub age_range_max: i64,
    pub duration_months: i64,
    pub price_per_month: f64,
    pub instructor_id: Option<String>,
    pub max_students: Option<i64>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl NewCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        if self.level.trim().is_empty() {
            return Err(AppError::BadRequest("level is required".to_string()));
        }
        validate_numbers(
            self.age_range_min,
            self.age_range_max,
            self.duration_months,
            self.price_per_month,
            self.max_students,
        )?;
        if let Some(status) = &self.status {
            validate_status(status)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub program_id: Option<String>,
    pub level: Option<String>,
    pub age_range_min: Option<i64>,
    pub age_range_max: Option<i64>,
    pub duration_months: Option<i64>,
    pub price_per_month: Option<f64>,
    pub instructor_id: Option<String>,
    pub max_students: Option<i64>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl UpdateCourseRequest {
    /// Applies the present fields onto `current` and re-checks the result.
    pub fn apply(self, current: &mut Course) -> Result<(), AppError> {
        if let Some(name) = self.name {
            current.name = name;
        }
        if let Some(program_id) = self.program_id {
            current.program_id = Some(program_id).filter(|p| !p.is_empty());
        }
        if let Some(level) = self.level {
            current.level = level;
        }
        if let Some(v) = self.age_range_min {
            current.age_range_min = v;
        }
        if let Some(v) = self.age_range_max {
            current.age_range_max = v;
        }
        if let Some(v) = self.duration_months {
            current.duration_months = v;
        }
        if let Some(v) = self.price_per_month {
            current.price_per_month = v;
        }
        if let Some(instructor_id) = self.instructor_id {
            current.instructor_id = Some(instructor_id).filter(|i| !i.is_empty());
        }
        if let Some(v) = self.max_students {
            current.max_students = v;
        }
        if let Some(status) = self.status {
            validate_status(&status)?;
            current.status = status;
        }
        if let Some(description) = self.description {
            current.description = Some(description);
        }

        validate_numbers(
            current.age_range_min,
            current.age_range_max,
            current.duration_months,
            current.price_per_month,
            Some(current.max_students),
        )
    }
}

fn validate_status(status: &str) -> Result<(), AppError> {
    if COURSE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("unknown course status: {}", status)))
    }
}

fn validate_numbers(
    age_min: i64,
    age_max: i64,
    duration_months: i64,
    price: f64,
    max_students: Option<i64>,
) -> Result<(), AppError> {
    if age_min < 0 || age_max < age_min {
        return Err(AppError::BadRequest(
            "age range must satisfy 0 <= age_range_min <= age_range_max".to_string(),
        ));
    }
    if duration_months < 1 {
        return Err(AppError::BadRequest("duration_months must be at least 1".to_string()));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest("price_per_month must not be negative".to_string()));
    }
    if matches!(max_students, Some(n) if n < 1) {
        return Err(AppError::BadRequest("max_students must be at least 1".to_string()));
    }
    Ok(())
}
