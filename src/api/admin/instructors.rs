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
        .route("/instructors", get(list_instructors).post(create_instructor))
        .route("/instructors/stats", get(instructor_stats))
        .route(
            "/instructors/{id}",
            get(get_instructor).patch(update_instructor).delete(delete_instructor),
        )
}

async fn list_instructors(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<InstructorListItem>>, AppError> {
    let instructors = db::instructors::fetch_instructors(&state.db, &filter).await?;
    Ok(Json(instructors))
}

async fn instructor_stats(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<InstructorStats>, AppError> {
    let stats = db::instructors::instructor_stats(&state.db).await?;
    Ok(Json(stats))
}

async fn get_instructor(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<InstructorListItem>, AppError> {
    let instructor = db::instructors::find_item(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(instructor))
}

async fn create_instructor(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Json(req): Json<NewInstructorRequest>,
) -> Result<(StatusCode, Json<InstructorListItem>), AppError> {
    let instructor = state.accounts().create_instructor(req).await?;
    Ok((StatusCode::CREATED, Json(instructor)))
}

async fn update_instructor(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdateInstructorRequest>,
) -> Result<Json<InstructorListItem>, AppError> {
    let instructor = state.accounts().update_instructor(&id, req).await?;
    Ok(Json(instructor))
}

async fn delete_instructor(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.accounts().delete_instructor(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
