use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rejection coming back from the auth service, already made readable.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    InternalServerError,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Upstream(msg) => {
                warn!("upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "Not Found".to_string())
            }
            AppError::Database(sqlx::Error::Database(e)) if e.is_unique_violation() => (
                StatusCode::CONFLICT,
                "A record with the same key already exists".to_string(),
            ),
            AppError::Database(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => (
                StatusCode::BAD_REQUEST,
                "A referenced record does not exist".to_string(),
            ),
            AppError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::Migration(e) => {
                error!("migration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                )
            }
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}

/// Turns raw auth-service wording into something a person can act on.
/// Messages that match nothing are returned unchanged.
pub fn friendly_auth_message(raw: &str) -> String {
    let lower = raw.to_lowercase();

    if lower.contains("invalid api key") || lower.contains("api key") {
        return "Configuration error: the auth service key is missing or invalid.".to_string();
    }
    if lower.contains("invalid login credentials") || lower.contains("invalid email or password") {
        return "Invalid email or password. Please check your credentials and try again.".to_string();
    }
    if lower.contains("email not confirmed") || lower.contains("email_not_confirmed") {
        return "Please verify your email address before signing in. Check your inbox for the confirmation link.".to_string();
    }
    if lower.contains("too many requests") || lower.contains("rate limit") {
        return "Too many login attempts. Please wait a few minutes and try again.".to_string();
    }
    if lower.contains("network") || lower.contains("fetch") {
        return "Network error. Please check your internet connection and try again.".to_string();
    }
    if lower.contains("user not found") {
        return "No account found with this email address. Please sign up first.".to_string();
    }
    if lower.contains("already registered") || lower.contains("already exists") {
        return "An account with this email already exists. Please use a different email or update the existing user.".to_string();
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_invalid_credentials() {
        let msg = friendly_auth_message("Invalid login credentials");
        assert!(msg.starts_with("Invalid email or password"));
    }

    #[test]
    fn maps_unconfirmed_email_case_insensitively() {
        let msg = friendly_auth_message("EMAIL NOT CONFIRMED");
        assert!(msg.contains("verify your email"));
    }

    #[test]
    fn maps_existing_account() {
        let msg = friendly_auth_message("User already registered");
        assert!(msg.contains("already exists"));
    }

    #[test]
    fn passes_through_unknown_messages() {
        assert_eq!(friendly_auth_message("something odd"), "something odd");
    }

    #[test]
    fn mentioning_email_and_password_is_not_a_credentials_error() {
        assert_eq!(
            friendly_auth_message("Password reset email sent"),
            "Password reset email sent"
        );
    }

    #[test]
    fn row_not_found_renders_404() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_renders_403() {
        let response = AppError::Forbidden("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
