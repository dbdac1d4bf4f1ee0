use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Json, Router, extract::State};
use tracing::info;

use crate::caller::AdminCaller;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/applications", get(list_applications))
        .route("/applications/stats", get(application_stats))
        .route("/applications/{id}", get(get_application).patch(review_application))
}

async fn list_applications(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<Application>>, AppError> {
    let applications = db::applications::fetch_applications(&state.db, &filter).await?;
    Ok(Json(applications))
}

async fn application_stats(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<ApplicationStats>, AppError> {
    let stats = db::applications::application_stats(&state.db).await?;
    Ok(Json(stats))
}

async fn get_application(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<Application>, AppError> {
    let application = db::applications::find_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(application))
}

async fn review_application(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdateApplicationStatusRequest>,
) -> Result<Json<Application>, AppError> {
    req.validate()?;
    let application = db::applications::update_status(&state.db, &id, &admin.user_id, &req)
        .await?
        .ok_or(AppError::NotFound)?;

    info!("application {} marked {} by {}", id, application.status, admin.user_id);
    Ok(Json(application))
}
