use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router, extract::State};
use serde::Deserialize;

use super::deleted;
use crate::caller::AdminCaller;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::schedule::{WeekdayGroup, group_by_weekday};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/weekly", get(weekly_sessions))
        .route("/sessions/stats", get(session_stats))
        .route("/sessions/{id}", get(get_session).patch(update_session).delete(delete_session))
        .route("/sessions/{id}/attendance", get(list_attendance).post(record_attendance))
}

#[derive(Deserialize)]
struct AttendanceQueryParams {
    date: Option<String>,
}

async fn list_sessions(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<SessionListItem>>, AppError> {
    let sessions = db::sessions::fetch_sessions(&state.db, &filter).await?;
    Ok(Json(sessions))
}

async fn weekly_sessions(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<WeekdayGroup<SessionListItem>>>, AppError> {
    let sessions = db::sessions::fetch_sessions(&state.db, &filter).await?;
    Ok(Json(group_by_weekday(sessions, |s| s.session.day_of_week)))
}

async fn session_stats(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<SessionStats>, AppError> {
    let stats = db::sessions::session_stats(&state.db).await?;
    Ok(Json(stats))
}

async fn get_session(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<SessionListItem>, AppError> {
    let session = db::sessions::find_session_item(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(session))
}

async fn create_session(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Json(req): Json<NewSessionRequest>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    req.validate()?;
    db::courses::find_course_by_id(&state.db, &req.course_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown course: {}", req.course_id)))?;

    let session = db::sessions::insert_session(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn update_session(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Json<Session>, AppError> {
    let mut session = db::sessions::find_session_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    req.apply(&mut session)?;

    db::sessions::update_session(&state.db, &session).await?;
    Ok(Json(session))
}

async fn delete_session(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(db::sessions::delete_session(&state.db, &id).await?)
}

async fn list_attendance(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Query(params): Query<AttendanceQueryParams>,
) -> Result<Json<Vec<AttendanceDetail>>, AppError> {
    let records = db::attendance::for_session(&state.db, &id, params.date.as_deref()).await?;
    Ok(Json(records))
}

async fn record_attendance(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<RecordAttendanceRequest>,
) -> Result<Json<AttendanceRecord>, AppError> {
    req.validate()?;
    db::sessions::find_session_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let record = db::attendance::record(&state.db, &id, &req).await?;
    Ok(Json(record))
}
