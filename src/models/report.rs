use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub report_type: String,
    pub generated_by: Option<String>,
    pub parameters: Option<Json<serde_json::Value>>,
    pub file_format: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Enrollment,
    Financial,
    Attendance,
    Performance,
    Instructor,
}

impl ReportType {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "enrollment" => Ok(Self::Enrollment),
            "financial" => Ok(Self::Financial),
            "attendance" => Ok(Self::Attendance),
            "performance" => Ok(Self::Performance),
            "instructor" => Ok(Self::Instructor),
            other => Err(AppError::BadRequest(format!("Unknown report type: {}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enrollment => "enrollment",
            Self::Financial => "financial",
            Self::Attendance => "attendance",
            Self::Performance => "performance",
            Self::Instructor => "instructor",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReportRequest {
    pub title: String,
    pub description: Option<String>,
    pub report_type: String,
    pub parameters: Option<serde_json::Value>,
}

/// Column names plus stringified rows, ready for CSV.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
