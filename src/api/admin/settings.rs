use std::collections::BTreeMap;

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router, extract::State};

use crate::caller::AdminCaller;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list_settings).put(save_settings))
        .route("/settings/{key}", get(get_setting).put(save_setting))
}

fn to_map(settings: Vec<Setting>) -> SettingsMap {
    settings
        .into_iter()
        .map(|s| (s.key.clone(), SettingEntry::from(s)))
        .collect()
}

fn check_key(key: &str) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::BadRequest("setting key must not be empty".to_string()));
    }
    Ok(())
}

async fn list_settings(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<SettingsMap>, AppError> {
    let settings = db::settings::fetch_all(&state.db).await?;
    Ok(Json(to_map(settings)))
}

async fn get_setting(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(key): Path<String>,
) -> Result<Json<Setting>, AppError> {
    let setting = db::settings::find(&state.db, &key)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(setting))
}

async fn save_setting(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Path(key): Path<String>,
    Json(req): Json<UpsertSettingRequest>,
) -> Result<Json<Setting>, AppError> {
    check_key(&key)?;
    let mut conn = state.db.acquire().await?;
    let setting = db::settings::upsert(&mut conn, &key, &req, &admin.user_id).await?;
    Ok(Json(setting))
}

/// Saves several keys at once; either all are written or none.
async fn save_settings(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Json(entries): Json<BTreeMap<String, UpsertSettingRequest>>,
) -> Result<Json<SettingsMap>, AppError> {
    for key in entries.keys() {
        check_key(key)?;
    }

    let saved = db::settings::upsert_many(&state.db, entries.into_iter().collect(), &admin.user_id).await?;
    Ok(Json(to_map(saved)))
}
