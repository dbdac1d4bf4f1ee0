use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router, extract::State};
use tracing::info;

use super::deleted;
use crate::caller::AdminCaller;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/programs", get(list_programs).post(create_program))
        .route("/programs/{id}", get(get_program).patch(update_program).delete(delete_program))
        .route("/programs/{id}/curriculum", get(list_modules))
        .route("/curriculum", post(create_module))
        .route("/curriculum/{id}", patch(update_module).delete(delete_module))
}

async fn list_programs(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<ProgramDetail>>, AppError> {
    let programs = db::programs::fetch_all(&state.db, &filter).await?;
    Ok(Json(programs))
}

async fn get_program(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<ProgramDetail>, AppError> {
    let program = db::programs::find_detail(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(program))
}

async fn create_program(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Json(req): Json<NewProgramRequest>,
) -> Result<(StatusCode, Json<ProgramDetail>), AppError> {
    req.validate()?;
    if db::programs::find_by_id(&state.db, req.id.trim()).await?.is_some() {
        return Err(AppError::Conflict(format!("A program with id '{}' already exists", req.id.trim())));
    }

    let program = db::programs::insert(&state.db, req).await?;
    info!("program {} created by {}", program.program.id, admin.user_id);
    Ok((StatusCode::CREATED, Json(program)))
}

async fn update_program(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdateProgramRequest>,
) -> Result<Json<ProgramDetail>, AppError> {
    let program = db::programs::update(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(program))
}

async fn delete_program(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(db::programs::delete(&state.db, &id).await?)
}

async fn list_modules(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<Vec<ModuleWithTopics>>, AppError> {
    let modules = db::curriculum::fetch_by_program(&state.db, &id).await?;
    Ok(Json(modules))
}

async fn create_module(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Json(req): Json<NewModuleRequest>,
) -> Result<(StatusCode, Json<ModuleWithTopics>), AppError> {
    req.validate()?;
    db::programs::find_by_id(&state.db, &req.program_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown program: {}", req.program_id)))?;

    let module = db::curriculum::insert(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

async fn update_module(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdateModuleRequest>,
) -> Result<Json<ModuleWithTopics>, AppError> {
    let module = db::curriculum::update(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(module))
}

async fn delete_module(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(db::curriculum::delete(&state.db, &id).await?)
}
