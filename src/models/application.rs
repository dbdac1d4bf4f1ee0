use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

pub const APPLICATION_STATUSES: &[&str] = &["pending", "approved", "rejected", "cancelled"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: String,
    pub parent_name: String,
    pub parent_email: String,
    pub parent_phone: String,
    pub student_name: String,
    pub student_age: i64,
    pub student_grade: Option<String>,
    pub school_name: Option<String>,
    pub program_id: Option<String>,
    pub branch: Option<String>,
    pub application_type: String,
    pub notes: Option<String>,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<String>,
    pub review_notes: Option<String>,
    pub created_at: String,
    pub program_title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationStats {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApplicationRequest {
    pub parent_name: String,
    pub parent_email: String,
    pub parent_phone: String,
    pub student_name: String,
    pub student_age: i64,
    pub student_grade: Option<String>,
    pub school_name: Option<String>,
    pub program_id: Option<String>,
    pub branch: Option<String>,
    pub application_type: Option<String>,
    pub notes: Option<String>,
}

impl NewApplicationRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("parent_name", &self.parent_name),
            ("parent_phone", &self.parent_phone),
            ("student_name", &self.student_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::BadRequest(format!("{} is required", field)));
            }
        }
        crate::models::validate_email(&self.parent_email)?;
        if !(1..=99).contains(&self.student_age) {
            return Err(AppError::BadRequest("student_age must be between 1 and 99".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateApplicationStatusRequest {
    pub status: String,
    pub review_notes: Option<String>,
}

impl UpdateApplicationStatusRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if APPLICATION_STATUSES.contains(&self.status.as_str()) {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!("unknown application status: {}", self.status)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewApplicationRequest {
        NewApplicationRequest {
            parent_name: "Mona".to_string(),
            parent_email: "mona@example.com".to_string(),
            parent_phone: "+20 100 000 0000".to_string(),
            student_name: "Omar".to_string(),
            student_age: 9,
            student_grade: None,
            school_name: None,
            program_id: None,
            branch: None,
            application_type: None,
            notes: None,
        }
    }

    #[test]
    fn complete_application_is_valid() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn missing_parent_phone_is_rejected() {
        let mut req = request();
        req.parent_phone = "  ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn student_age_must_be_plausible() {
        let mut req = request();
        req.student_age = 0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn review_status_must_be_known() {
        let update = UpdateApplicationStatusRequest { status: "maybe".to_string(), review_notes: None };
        assert!(update.validate().is_err());
    }
}
