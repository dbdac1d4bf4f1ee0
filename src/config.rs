use std::env;
use std::net::SocketAddr;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: Option<String>,
}

impl AuthConfig {
    /// Returns `None` when the hosted auth service is not configured.
    pub fn new_from_env() -> Option<Self> {
        let url = non_empty_var("AUTH_URL")?;
        let anon_key = non_empty_var("AUTH_ANON_KEY")?;
        let service_role_key = non_empty_var("AUTH_SERVICE_ROLE_KEY");

        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
            service_role_key,
        })
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub auth: Option<AuthConfig>,
    pub default_currency: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://academy.db?mode=rwc".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::BadRequest(format!("BIND_ADDR is invalid: {}", e)))?;

        let default_currency = non_empty_var("DEFAULT_CURRENCY").unwrap_or_else(|| "EGP".to_string());

        Ok(Self {
            database_url,
            bind_addr,
            auth: AuthConfig::new_from_env(),
            default_currency,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            auth: None,
            default_currency: "EGP".to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
