use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: String,
    pub course_id: String,
    pub instructor_id: Option<String>,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub max_capacity: i64,
    pub current_attendance: i64,
    pub is_recurring: bool,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: String,
}

/// A session joined with the display names of its course and instructor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionListItem {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub session: Session,
    pub course_name: Option<String>,
    pub course_level: Option<String>,
    pub instructor_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub weekly_sessions: i64,
    pub active_instructors: i64,
    pub rooms: i64,
    pub total_attendance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionRequest {
    pub course_id: String,
    pub instructor_id: Option<String>,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub room: Option<String>,
    pub max_capacity: Option<i64>,
    pub is_recurring: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl NewSessionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.course_id.trim().is_empty() {
            return Err(AppError::BadRequest("course_id is required".to_string()));
        }
        validate_slot(self.day_of_week, &self.start_time, &self.end_time)?;
        if matches!(self.max_capacity, Some(n) if n < 1) {
            return Err(AppError::BadRequest("max_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    pub course_id: Option<String>,
    pub instructor_id: Option<String>,
    pub day_of_week: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
    pub max_capacity: Option<i64>,
    pub is_recurring: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl UpdateSessionRequest {
    pub fn apply(self, current: &mut Session) -> Result<(), AppError> {
        if let Some(course_id) = self.course_id {
            current.course_id = course_id;
        }
        if let Some(instructor_id) = self.instructor_id {
            current.instructor_id = Some(instructor_id).filter(|i| !i.is_empty());
        }
        if let Some(day) = self.day_of_week {
            current.day_of_week = day;
        }
        if let Some(start) = self.start_time {
            current.start_time = start;
        }
        if let Some(end) = self.end_time {
            current.end_time = end;
        }
        if let Some(room) = self.room {
            current.room = Some(room).filter(|r| !r.is_empty());
        }
        if let Some(cap) = self.max_capacity {
            if cap < 1 {
                return Err(AppError::BadRequest("max_capacity must be at least 1".to_string()));
            }
            current.max_capacity = cap;
        }
        if let Some(recurring) = self.is_recurring {
            current.is_recurring = recurring;
        }
        if let Some(start_date) = self.start_date {
            current.start_date = Some(start_date).filter(|d| !d.is_empty());
        }
        if let Some(end_date) = self.end_date {
            current.end_date = Some(end_date).filter(|d| !d.is_empty());
        }
        validate_slot(current.day_of_week, &current.start_time, &current.end_time)
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

fn validate_slot(day_of_week: i64, start: &str, end: &str) -> Result<(), AppError> {
    if !(0..=6).contains(&day_of_week) {
        return Err(AppError::BadRequest("day_of_week must be between 0 and 6".to_string()));
    }
    let start = parse_time_of_day(start)
        .ok_or_else(|| AppError::BadRequest("start_time must be HH:MM or HH:MM:SS".to_string()))?;
    let end = parse_time_of_day(end)
        .ok_or_else(|| AppError::BadRequest("end_time must be HH:MM or HH:MM:SS".to_string()))?;
    if start >= end {
        return Err(AppError::BadRequest("start_time must be before end_time".to_string()));
    }
    Ok(())
}
