use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router, extract::State};

use crate::caller::AdminCaller;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students).post(create_student))
        .route("/students/stats", get(student_stats))
        .route("/students/{id}", get(get_student).patch(update_student).delete(delete_student))
}

async fn list_students(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<StudentListItem>>, AppError> {
    let students = db::students::fetch_students(&state.db, &filter).await?;
    Ok(Json(students))
}

async fn student_stats(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<StudentStats>, AppError> {
    let stats = db::students::student_stats(&state.db).await?;
    Ok(Json(stats))
}

async fn get_student(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<StudentListItem>, AppError> {
    let student = db::students::find_student(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(student))
}

async fn create_student(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Json(req): Json<NewStudentRequest>,
) -> Result<(StatusCode, Json<StudentListItem>), AppError> {
    let student = state.accounts().create_student(req).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

async fn update_student(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdateStudentRequest>,
) -> Result<Json<StudentListItem>, AppError> {
    let student = state.accounts().update_student(&id, req).await?;
    Ok(Json(student))
}

async fn delete_student(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.accounts().delete_student(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
