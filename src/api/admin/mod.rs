mod applications;
mod courses;
mod gallery;
mod instructors;
mod payments;
mod programs;
mod reports;
mod schedule;
mod settings;
mod students;

use axum::http::StatusCode;
use axum::{Json, Router, extract::State, routing::get};

use crate::caller::AdminCaller;
use crate::error::AppError;
use crate::services::dashboard::{self, AdminDashboard};
use crate::state::AppState;

/// Every route under here takes an [`AdminCaller`], so non-admins are turned
/// away before any handler body runs.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .merge(programs::routes())
        .merge(courses::routes())
        .merge(instructors::routes())
        .merge(students::routes())
        .merge(schedule::routes())
        .merge(applications::routes())
        .merge(payments::routes())
        .merge(gallery::routes())
        .merge(settings::routes())
        .merge(reports::routes())
}

async fn get_dashboard(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<AdminDashboard>, AppError> {
    let today = chrono::Local::now().date_naive();
    let stats = dashboard::admin_dashboard(&state.db, today).await?;
    Ok(Json(stats))
}

/// `204` when something was deleted, `404` otherwise.
fn deleted(found: bool) -> Result<StatusCode, AppError> {
    if found {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
