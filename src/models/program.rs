use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Program {
    pub id: String,
    pub title: String,
    pub ages: String,
    pub duration: String,
    pub class_size: String,
    pub description: String,
    pub icon_name: Option<String>,
    pub color: String,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: String,
}

/// A program with its ordered child lists attached.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramDetail {
    #[serde(flatten)]
    pub program: Program,
    pub highlights: Vec<String>,
    pub outcomes: Vec<String>,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgramRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgramRequest {
    /// Admin-chosen slug, e.g. `robotics-juniors`.
    pub id: String,
    pub title: String,
    pub ages: String,
    pub duration: String,
    pub class_size: String,
    pub description: String,
    pub icon_name: Option<String>,
    pub color: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub outcomes: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    pub display_order: Option<i64>,
}

impl NewProgramRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("id is required".to_string()));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(AppError::BadRequest(
                "id may only contain letters, digits, '-' and '_'".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        if self.color.trim().is_empty() {
            return Err(AppError::BadRequest("color is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProgramRequest {
    pub title: Option<String>,
    pub ages: Option<String>,
    pub duration: Option<String>,
    pub class_size: Option<String>,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    pub color: Option<String>,
    pub highlights: Option<Vec<String>>,
    pub outcomes: Option<Vec<String>>,
    pub projects: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub display_order: Option<i64>,
}
