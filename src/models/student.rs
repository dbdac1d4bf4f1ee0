use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::enrollment::ProgramEnrollment;
use crate::models::profile::Profile;

pub const STUDENT_STATUSES: &[&str] = &["active", "inactive", "graduated"];

#[derive(Debug, Clone, Serialize)]
pub struct StudentListItem {
    #[serde(flatten)]
    pub profile: Profile,
    /// Program titles, falling back to the program id when the title is gone.
    pub programs: Vec<String>,
    pub enrollments: Vec<ProgramEnrollment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub graduated: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStudentRequest {
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    #[serde(default)]
    pub program_ids: Vec<String>,
    pub status: Option<String>,
    pub join_date: Option<String>,
    pub notes: Option<String>,
    pub password: Option<String>,
}

impl NewStudentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        crate::models::validate_email(&self.email)?;
        if self.full_name.trim().is_empty() {
            return Err(AppError::BadRequest("full_name is required".to_string()));
        }
        if matches!(self.age, Some(age) if !(1..=99).contains(&age)) {
            return Err(AppError::BadRequest("age must be between 1 and 99".to_string()));
        }
        if let Some(status) = &self.status {
            validate_status(status)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub program_ids: Option<Vec<String>>,
}

impl UpdateStudentRequest {
    pub fn apply(&self, current: &mut Profile) -> Result<(), AppError> {
        if let Some(name) = &self.full_name {
            current.full_name = name.clone();
        }
        if let Some(phone) = &self.phone {
            current.phone = Some(phone.clone());
        }
        if let Some(age) = self.age {
            if !(1..=99).contains(&age) {
                return Err(AppError::BadRequest("age must be between 1 and 99".to_string()));
            }
            current.age = Some(age);
        }
        if let Some(email) = &self.parent_email {
            current.parent_email = Some(email.clone());
        }
        if let Some(phone) = &self.parent_phone {
            current.parent_phone = Some(phone.clone());
        }
        if let Some(status) = &self.status {
            validate_status(status)?;
            current.status = status.clone();
        }
        if let Some(notes) = &self.notes {
            current.notes = Some(notes.clone());
        }
        Ok(())
    }
}

fn validate_status(status: &str) -> Result<(), AppError> {
    if STUDENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("unknown student status: {}", status)))
    }
}
