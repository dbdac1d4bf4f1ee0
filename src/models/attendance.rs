use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

pub const ATTENDANCE_STATUSES: &[&str] = &["present", "absent", "late"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: String,
    pub session_id: String,
    pub student_id: String,
    pub date: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub record: AttendanceRecord,
    pub course_name: Option<String>,
    pub student_name: Option<String>,
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub attendance_rate: u32,
}

impl AttendanceStats {
    pub fn from_statuses<S: AsRef<str>>(statuses: &[S]) -> Self {
        let total = statuses.len();
        let count = |wanted: &str| statuses.iter().filter(|s| s.as_ref() == wanted).count();
        let present = count("present");
        let attendance_rate = if total > 0 {
            ((present as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };

        Self {
            total,
            present,
            absent: count("absent"),
            late: count("late"),
            attendance_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAttendanceRequest {
    pub student_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub status: String,
    pub notes: Option<String>,
}

impl RecordAttendanceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.student_id.trim().is_empty() {
            return Err(AppError::BadRequest("student_id is required".to_string()));
        }
        chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest("date must be YYYY-MM-DD".to_string()))?;
        if !ATTENDANCE_STATUSES.contains(&self.status.as_str()) {
            return Err(AppError::BadRequest(format!("unknown attendance status: {}", self.status)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_history_has_zero_rate() {
        let stats = AttendanceStats::from_statuses::<&str>(&[]);
        assert_eq!(stats, AttendanceStats::default());
    }

    #[test]
    fn rate_is_rounded_percentage_of_present() {
        let stats = AttendanceStats::from_statuses(&["present", "present", "absent"]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.present, 2);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.late, 0);
        assert_eq!(stats.attendance_rate, 67);
    }

    #[test]
    fn late_does_not_count_as_present() {
        let stats = AttendanceStats::from_statuses(&["late", "present"]);
        assert_eq!(stats.late, 1);
        assert_eq!(stats.attendance_rate, 50);
    }
}
