use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router, extract::State};

use super::deleted;
use crate::caller::AdminCaller;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/gallery", get(list_items).post(create_item))
        .route("/gallery/{id}", patch(update_item).delete(delete_item))
}

async fn list_items(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    let items = db::gallery::fetch_items(&state.db, &filter).await?;
    Ok(Json(items))
}

async fn create_item(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Json(req): Json<NewGalleryItemRequest>,
) -> Result<(StatusCode, Json<GalleryItem>), AppError> {
    req.validate()?;
    let item = db::gallery::insert(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdateGalleryItemRequest>,
) -> Result<Json<GalleryItem>, AppError> {
    let mut item = db::gallery::find_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    req.apply(&mut item);

    db::gallery::update(&state.db, &item).await?;
    Ok(Json(item))
}

async fn delete_item(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(db::gallery::delete(&state.db, &id).await?)
}
