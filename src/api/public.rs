use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use tracing::info;

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::contact;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/programs", get(list_programs))
        .route("/programs/{id}", get(get_program))
        .route("/curriculum/{program_id}", get(list_curriculum))
        .route("/gallery", get(list_gallery))
        .route("/contact", get(get_contact))
        .route("/applications", post(submit_application))
}

async fn list_programs(State(state): State<AppState>) -> Result<Json<Vec<ProgramDetail>>, AppError> {
    let programs = db::programs::fetch_active(&state.db).await?;
    Ok(Json(programs))
}

async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProgramDetail>, AppError> {
    let program = db::programs::find_detail(&state.db, &id)
        .await?
        .filter(|p| p.program.is_active)
        .ok_or(AppError::NotFound)?;
    Ok(Json(program))
}

async fn list_curriculum(
    State(state): State<AppState>,
    Path(program_id): Path<String>,
) -> Result<Json<Vec<ModuleWithTopics>>, AppError> {
    let modules = db::curriculum::fetch_by_program(&state.db, &program_id).await?;
    Ok(Json(modules))
}

async fn list_gallery(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    let items = db::gallery::fetch_items(&state.db, &filter).await?;
    Ok(Json(items))
}

async fn get_contact(State(state): State<AppState>) -> Result<Json<ContactInfo>, AppError> {
    let info = contact::load_contact_info(&state.db).await?;
    Ok(Json(info))
}

async fn submit_application(
    State(state): State<AppState>,
    Json(req): Json<NewApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    req.validate()?;
    let application = db::applications::insert(&state.db, req).await?;
    info!("received {} application {}", application.application_type, application.id);
    Ok((StatusCode::CREATED, Json(application)))
}
