use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router, extract::State};
use tracing::info;

use super::deleted;
use crate::api::csv_download;
use crate::caller::AdminCaller;
use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::services::{dashboard, export};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route("/payments/stats", get(payment_stats))
        .route("/payments/export", get(export_payments))
        .route("/payments/{id}", get(get_payment).patch(update_payment).delete(delete_payment))
}

async fn list_payments(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<PaymentListItem>>, AppError> {
    let payments = db::payments::fetch_payments(&state.db, &filter).await?;
    Ok(Json(payments))
}

async fn payment_stats(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<PaymentStats>, AppError> {
    let today = chrono::Local::now().date_naive();
    let stats = dashboard::payment_stats(&state.db, today).await?;
    Ok(Json(stats))
}

async fn get_payment(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<PaymentListItem>, AppError> {
    let payment = db::payments::find_item(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(payment))
}

async fn create_payment(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Json(req): Json<NewPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    req.validate()?;
    db::profiles::find_by_id(&state.db, &req.student_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown student: {}", req.student_id)))?;

    let payment = db::payments::insert(&state.db, req, &state.config.default_currency).await?;
    info!("payment {} recorded by {}", payment.invoice_id, admin.user_id);
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn update_payment(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdatePaymentRequest>,
) -> Result<Json<Payment>, AppError> {
    let mut payment = db::payments::find_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    req.apply(&mut payment)?;

    db::payments::update(&state.db, &payment).await?;
    Ok(Json(payment))
}

async fn delete_payment(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let found = db::payments::delete(&state.db, &id).await?;
    if found {
        info!("payment {} deleted by {}", id, admin.user_id);
    }
    deleted(found)
}

async fn export_payments(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Response, AppError> {
    let payments = db::payments::fetch_payments(&state.db, &filter).await?;
    let body = export::to_csv(&export::payments_table(&payments));
    let filename = format!("payments-{}.csv", chrono::Local::now().format("%Y-%m-%d"));
    Ok(csv_download(&filename, body))
}
