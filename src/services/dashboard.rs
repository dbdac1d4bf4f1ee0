use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::models::{
    ApplicationStats, AttendanceStats, CourseEnrollment, CourseStats, PaymentStats, Profile, SessionStats,
    StudentStats,
};
use crate::services::schedule::{self, NextSessionView};

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub students: StudentStats,
    pub courses: CourseStats,
    pub applications: ApplicationStats,
    pub payments: PaymentStats,
    pub sessions: SessionStats,
}

#[derive(Debug, Serialize)]
pub struct PortalDashboard {
    pub profile: Profile,
    pub next_session: Option<NextSessionView>,
    pub attendance: AttendanceStats,
    pub enrollments: Vec<CourseEnrollment>,
}

/// First day of the month containing `day`, and of the month after it.
fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = day.with_day(1).unwrap_or(day);
    let next = start.checked_add_months(Months::new(1)).unwrap_or(start);
    (start, next)
}

/// Revenue for the month containing `today` against the month before it.
pub async fn payment_stats(db: &SqlitePool, today: NaiveDate) -> Result<PaymentStats, sqlx::Error> {
    let (this_start, next_start) = month_bounds(today);
    let last_start = this_start.checked_sub_months(Months::new(1)).unwrap_or(this_start);
    let fmt = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
    let (this_s, next_s, last_s) = (fmt(this_start), fmt(next_start), fmt(last_start));

    let (this_month, last_month, pending, overdue) = tokio::try_join!(
        db::payments::paid_total_between(db, &this_s, &next_s),
        db::payments::paid_total_between(db, &last_s, &this_s),
        db::payments::count_by_status(db, "pending"),
        db::payments::count_by_status(db, "overdue"),
    )?;

    Ok(PaymentStats::new(this_month, last_month, pending, overdue))
}

pub async fn admin_dashboard(db: &SqlitePool, today: NaiveDate) -> Result<AdminDashboard, sqlx::Error> {
    let (students, courses, applications, payments, sessions) = tokio::try_join!(
        db::students::student_stats(db),
        db::courses::course_stats(db),
        db::applications::application_stats(db),
        payment_stats(db, today),
        db::sessions::session_stats(db),
    )?;

    Ok(AdminDashboard { students, courses, applications, payments, sessions })
}

pub async fn attendance_stats(db: &SqlitePool, student_id: &str) -> Result<AttendanceStats, sqlx::Error> {
    let statuses = db::attendance::statuses_for_student(db, student_id).await?;
    Ok(AttendanceStats::from_statuses(&statuses))
}

pub async fn portal_dashboard(
    db: &SqlitePool,
    profile: Profile,
    today: Weekday,
) -> Result<PortalDashboard, sqlx::Error> {
    let (next_session, attendance, enrollments) = tokio::try_join!(
        schedule::next_session_for_student(db, &profile.id, today),
        attendance_stats(db, &profile.id),
        db::enrollments::course_enrollments_for_student(db, &profile.id),
    )?;

    Ok(PortalDashboard { profile, next_session, attendance, enrollments })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_span_one_calendar_month() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 17).unwrap();
        let (start, next) = month_bounds(day);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
