use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router, extract::State};
use tracing::info;

use super::deleted;
use crate::caller::AdminCaller;
use crate::db;
use crate::error::AppError;
use crate::models::enrollment::validate_status as validate_enrollment_status;
use crate::models::*;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/stats", get(course_stats))
        .route("/courses/{id}", get(get_course).patch(update_course).delete(delete_course))
        .route("/courses/{id}/enrollments", get(list_enrollments).post(enroll_student))
        .route("/enrollments/{id}", patch(update_enrollment).delete(remove_enrollment))
}

async fn list_courses(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Vec<CourseListItem>>, AppError> {
    let courses = db::courses::fetch_courses(&state.db, &filter).await?;
    Ok(Json(courses))
}

async fn course_stats(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
) -> Result<Json<CourseStats>, AppError> {
    let stats = db::courses::course_stats(&state.db).await?;
    Ok(Json(stats))
}

async fn get_course(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<CourseListItem>, AppError> {
    let course = db::courses::find_course_item(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

async fn create_course(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    req.validate()?;
    let course = db::courses::insert_course(&state.db, req).await?;
    info!("course {} created by {}", course.id, admin.user_id);
    Ok((StatusCode::CREATED, Json(course)))
}

async fn update_course(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let mut course = db::courses::find_course_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    req.apply(&mut course)?;

    db::courses::update_course(&state.db, &course).await?;
    Ok(Json(course))
}

async fn delete_course(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(db::courses::delete_course(&state.db, &id).await?)
}

async fn list_enrollments(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<Json<Vec<CourseEnrollment>>, AppError> {
    let enrollments = db::enrollments::course_enrollments_for_course(&state.db, &id).await?;
    Ok(Json(enrollments))
}

async fn enroll_student(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<NewCourseEnrollmentRequest>,
) -> Result<(StatusCode, Json<CourseEnrollment>), AppError> {
    db::courses::find_course_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    db::students::find_student(&state.db, &req.student_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown student: {}", req.student_id)))?;

    let mut tx = state.db.begin().await?;
    let enrollment_id = db::enrollments::insert_course_enrollment(&mut tx, &req.student_id, &id).await?;
    tx.commit().await?;

    let enrollment = db::enrollments::find_course_enrollment(&state.db, &enrollment_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

async fn update_enrollment(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
    Json(req): Json<UpdateEnrollmentRequest>,
) -> Result<Json<CourseEnrollment>, AppError> {
    validate_enrollment_status(&req.status)?;

    let mut tx = state.db.begin().await?;
    db::enrollments::update_course_enrollment_status(&mut tx, &id, &req.status)
        .await?
        .ok_or(AppError::NotFound)?;
    tx.commit().await?;

    let enrollment = db::enrollments::find_course_enrollment(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(enrollment))
}

async fn remove_enrollment(
    State(state): State<AppState>,
    AdminCaller(_admin): AdminCaller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;
    let found = db::enrollments::delete_course_enrollment(&mut tx, &id).await?;
    tx.commit().await?;
    deleted(found)
}
