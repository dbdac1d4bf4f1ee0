use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router, extract::State};
use tracing::info;

use crate::api::csv_download;
use crate::caller::AdminCaller;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::{export, reports};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(list_reports).post(generate_report))
        .route("/reports/data/{report_type}", get(report_data))
        .route("/reports/data/{report_type}/csv", get(report_csv))
}

async fn list_reports(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<Vec<Report>>, AppError> {
    let reports = db::reports::fetch_latest(&state.db).await?;
    Ok(Json(reports))
}

async fn generate_report(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Json(req): Json<GenerateReportRequest>,
) -> Result<(StatusCode, Json<Report>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".to_string()));
    }
    let report_type = ReportType::parse(&req.report_type)?;

    let report = db::reports::insert(&state.db, req, report_type, &admin.user_id).await?;
    info!("{} report {} generated by {}", report.report_type, report.id, admin.user_id);
    Ok((StatusCode::CREATED, Json(report)))
}

async fn report_data(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(report_type): Path<String>,
) -> Result<Json<ReportTable>, AppError> {
    let report_type = ReportType::parse(&report_type)?;
    let table = reports::report_data(&state.db, report_type).await?;
    Ok(Json(table))
}

async fn report_csv(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(report_type): Path<String>,
) -> Result<Response, AppError> {
    let report_type = ReportType::parse(&report_type)?;
    let table = reports::report_data(&state.db, report_type).await?;
    let filename = format!(
        "{}-report-{}.csv",
        report_type.as_str(),
        chrono::Local::now().format("%Y-%m-%d")
    );
    Ok(csv_download(&filename, export::to_csv(&table)))
}
