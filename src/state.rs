use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::AuthProvider;
use crate::config::AppConfig;
use crate::services::AccountService;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth: Arc<dyn AuthProvider>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: SqlitePool, auth: Arc<dyn AuthProvider>, config: AppConfig) -> Self {
        Self { db, auth, config: Arc::new(config) }
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.db.clone(), self.auth.clone())
    }
}
