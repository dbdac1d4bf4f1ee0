pub mod dto;
pub mod memory;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{AppError, friendly_auth_message};

pub use memory::MemoryAuthProvider;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

impl From<dto::UserResponse> for AuthUser {
    fn from(user: dto::UserResponse) -> Self {
        Self { id: user.id, email: user.email }
    }
}

impl From<dto::TokenResponse> for AuthSession {
    fn from(token: dto::TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
            user: token.user.into(),
        }
    }
}

/// Credential handling lives in a hosted auth service; this is the seam.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError>;
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AppError>;
    async fn sign_out(&self, access_token: &str) -> Result<(), AppError>;

    /// Creates a pre-confirmed user. Needs the privileged key.
    async fn admin_create_user(&self, email: &str, password: &str) -> Result<AuthUser, AppError>;
    async fn admin_delete_user(&self, user_id: &str) -> Result<(), AppError>;

    fn has_privileged_access(&self) -> bool;
}

pub(crate) fn privileged_key_missing() -> AppError {
    AppError::ServiceUnavailable(
        "Service role key not configured. Set AUTH_SERVICE_ROLE_KEY to manage accounts from the back-office."
            .to_string(),
    )
}

pub struct HttpAuthProvider {
    client: Client,
    config: AuthConfig,
}

impl HttpAuthProvider {
    pub fn new(config: AuthConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.config.url, path)
    }

    fn service_key(&self) -> Result<&str, AppError> {
        self.config
            .service_role_key
            .as_deref()
            .ok_or_else(privileged_key_missing)
    }

    fn send_failed(err: reqwest::Error) -> AppError {
        tracing::warn!("auth service request failed: {}", err);
        AppError::Upstream(friendly_auth_message("network request failed"))
    }

    /// Maps a non-success response onto the error the caller should see.
    async fn rejection(response: Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: dto::ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let raw = parsed.text().unwrap_or(body.as_str()).to_string();
        tracing::debug!("auth service rejected request: {} - {}", status, raw);

        let friendly = friendly_auth_message(&raw);
        let lower = raw.to_lowercase();
        if lower.contains("already registered") || lower.contains("already exists") {
            return AppError::Conflict(friendly);
        }

        match status {
            StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::UNPROCESSABLE_ENTITY
            | StatusCode::TOO_MANY_REQUESTS => AppError::Auth(friendly),
            StatusCode::NOT_FOUND => AppError::NotFound,
            _ => AppError::Upstream(format!("Auth service error {}: {}", status, raw)),
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let response = self.client
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.config.anon_key)
            .json(&dto::PasswordGrantRequest { email, password })
            .send()
            .await
            .map_err(Self::send_failed)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let token: dto::TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse auth response: {}", e)))?;
        Ok(token.into())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let response = self.client
            .post(self.endpoint("signup"))
            .header("apikey", &self.config.anon_key)
            .json(&dto::PasswordGrantRequest { email, password })
            .send()
            .await
            .map_err(Self::send_failed)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let parsed: dto::SignUpResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse auth response: {}", e)))?;
        Ok(match parsed {
            dto::SignUpResponse::Session(token) => token.user.into(),
            dto::SignUpResponse::User(user) => user.into(),
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AppError> {
        let response = self.client
            .get(self.endpoint("user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(Self::send_failed)?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized("Session is invalid or has expired".to_string()));
        }

        let user: dto::UserResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse auth response: {}", e)))?;
        Ok(user.into())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let response = self.client
            .post(self.endpoint("logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(Self::send_failed)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }

    async fn admin_create_user(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let key = self.service_key()?;
        let response = self.client
            .post(self.endpoint("admin/users"))
            .header("apikey", key)
            .bearer_auth(key)
            .json(&dto::AdminCreateUserRequest { email, password, email_confirm: true })
            .send()
            .await
            .map_err(Self::send_failed)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let user: dto::UserResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse auth response: {}", e)))?;
        Ok(user.into())
    }

    async fn admin_delete_user(&self, user_id: &str) -> Result<(), AppError> {
        let key = self.service_key()?;
        let response = self.client
            .delete(self.endpoint(&format!("admin/users/{}", user_id)))
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await
            .map_err(Self::send_failed)?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        Ok(())
    }

    fn has_privileged_access(&self) -> bool {
        self.config.service_role_key.is_some()
    }
}
