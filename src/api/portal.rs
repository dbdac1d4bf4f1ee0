use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router, extract::State};
use serde::{Deserialize, Serialize};

use crate::caller::Caller;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::dashboard::{self, PortalDashboard};
use crate::services::schedule::{self, NextSessionView, WeekdayGroup};
use crate::state::AppState;

const DEFAULT_ATTENDANCE_LIMIT: i64 = 10;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/next-session", get(next_session))
        .route("/courses", get(list_courses))
        .route("/programs", get(list_programs))
        .route("/schedule", get(weekly_schedule))
        .route("/attendance", get(attendance))
        .route("/certificates", get(certificates))
        .route("/assignments", get(assignments))
}

/// Portal routes read the caller's own records unless an admin names a
/// student explicitly.
#[derive(Deserialize)]
struct StudentQueryParams {
    student_id: Option<String>,
}

#[derive(Deserialize)]
struct AttendanceQueryParams {
    student_id: Option<String>,
    limit: Option<i64>,
}

#[derive(Serialize)]
struct AttendanceOverview {
    stats: AttendanceStats,
    recent: Vec<AttendanceDetail>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum CertificateStatus {
    Earned,
    InProgress,
}

#[derive(Debug, Serialize)]
struct Certificate {
    enrollment_id: String,
    course_id: String,
    course_name: String,
    level: String,
    status: CertificateStatus,
    credential_id: Option<String>,
    issued_at: Option<String>,
}

fn target_student(caller: &Caller, requested: Option<String>) -> Result<String, AppError> {
    let student_id = requested
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| caller.user_id.clone());
    caller.require_self_or_admin(&student_id)?;
    Ok(student_id)
}

/// `NB-` followed by the first eight characters of the enrollment id.
fn credential_id(enrollment_id: &str) -> String {
    let prefix: String = enrollment_id.chars().take(8).collect();
    format!("NB-{}", prefix.to_uppercase())
}

fn to_certificates(enrollments: Vec<CourseEnrollment>) -> Vec<Certificate> {
    enrollments
        .into_iter()
        .filter_map(|e| {
            let status = match e.status.as_str() {
                "completed" => CertificateStatus::Earned,
                "active" => CertificateStatus::InProgress,
                _ => return None,
            };
            let earned = status == CertificateStatus::Earned;
            Some(Certificate {
                credential_id: earned.then(|| credential_id(&e.id)),
                issued_at: earned.then(|| e.enrolled_at.clone()),
                course_name: e.course_name.unwrap_or_else(|| "Course".to_string()),
                level: e.course_level.unwrap_or_default(),
                enrollment_id: e.id,
                course_id: e.course_id,
                status,
            })
        })
        .collect()
}

async fn get_dashboard(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<PortalDashboard>, AppError> {
    let student_id = target_student(&caller, params.student_id)?;
    let profile = db::profiles::find_by_id(&state.db, &student_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let dashboard = dashboard::portal_dashboard(&state.db, profile, schedule::local_today()).await?;
    Ok(Json(dashboard))
}

async fn next_session(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<Option<NextSessionView>>, AppError> {
    let student_id = target_student(&caller, params.student_id)?;
    let next = schedule::next_session_for_student(&state.db, &student_id, schedule::local_today()).await?;
    Ok(Json(next))
}

async fn list_courses(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<Vec<CourseEnrollment>>, AppError> {
    let student_id = target_student(&caller, params.student_id)?;
    let enrollments = db::enrollments::course_enrollments_for_student(&state.db, &student_id).await?;
    Ok(Json(enrollments))
}

async fn list_programs(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<Vec<ProgramEnrollment>>, AppError> {
    let student_id = target_student(&caller, params.student_id)?;
    let enrollments = db::enrollments::program_enrollments_for_student(&state.db, &student_id).await?;
    Ok(Json(enrollments))
}

async fn weekly_schedule(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<Vec<WeekdayGroup<NextSessionView>>>, AppError> {
    let student_id = target_student(&caller, params.student_id)?;
    let week = schedule::weekly_schedule_for_student(&state.db, &student_id).await?;
    Ok(Json(week))
}

async fn attendance(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<AttendanceQueryParams>,
) -> Result<Json<AttendanceOverview>, AppError> {
    let student_id = target_student(&caller, params.student_id)?;
    let limit = params.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_ATTENDANCE_LIMIT);

    let (stats, recent) = tokio::try_join!(
        dashboard::attendance_stats(&state.db, &student_id),
        db::attendance::recent_for_student(&state.db, &student_id, limit),
    )?;
    Ok(Json(AttendanceOverview { stats, recent }))
}

async fn certificates(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<Vec<Certificate>>, AppError> {
    let student_id = target_student(&caller, params.student_id)?;
    let enrollments = db::enrollments::course_enrollments_for_student(&state.db, &student_id).await?;
    Ok(Json(to_certificates(enrollments)))
}

/// There is nothing behind assignments yet; the screen always gets an
/// empty list.
async fn assignments(caller: Caller) -> Json<Vec<serde_json::Value>> {
    tracing::debug!("assignments requested by {}", caller.user_id);
    Json(Vec::new())
}
