use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, extract::State};
use serde::Serialize;

use crate::caller::Caller;
use crate::db;
use crate::error::AppError;
use crate::models::Profile;
use crate::services::{LoginOutcome, LoginRequest, SignUpRequest};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(login))
        .route("/admin-login", post(admin_login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[derive(Serialize)]
struct MeResponse {
    #[serde(flatten)]
    caller: Caller,
    profile: Profile,
}

async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let profile = state.accounts().sign_up(req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginOutcome>, AppError> {
    let outcome = state.accounts().login(req).await?;
    Ok(Json(outcome))
}

async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginOutcome>, AppError> {
    let outcome = state.accounts().admin_login(req).await?;
    Ok(Json(outcome))
}

async fn logout(State(state): State<AppState>, caller: Caller) -> Result<StatusCode, AppError> {
    state.accounts().logout(&caller.access_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me(State(state): State<AppState>, caller: Caller) -> Result<Json<MeResponse>, AppError> {
    let profile = db::profiles::find_by_id(&state.db, &caller.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(MeResponse { caller, profile }))
}
