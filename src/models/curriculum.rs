use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CurriculumModule {
    pub id: String,
    pub program_id: String,
    pub title: String,
    pub weeks: String,
    pub outcome: String,
    pub display_order: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleWithTopics {
    #[serde(flatten)]
    pub module: CurriculumModule,
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewModuleRequest {
    pub program_id: String,
    pub title: String,
    pub weeks: String,
    pub outcome: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub display_order: Option<i64>,
}

impl NewModuleRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.program_id.trim().is_empty() {
            return Err(AppError::BadRequest("program_id is required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateModuleRequest {
    pub title: Option<String>,
    pub weeks: Option<String>,
    pub outcome: Option<String>,
    pub topics: Option<Vec<String>>,
    pub display_order: Option<i64>,
}

/// Blank topics are dropped, the rest trimmed, order kept.
pub fn clean_topics(topics: &[String]) -> Vec<String> {
    topics
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
