#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::util::ServiceExt;

use academy::auth::{AuthProvider, MemoryAuthProvider};
use academy::config::AppConfig;
use academy::models::{NewProfile, Role};
use academy::{AppState, db, router};

pub const ADMIN_EMAIL: &str = "admin@academy.test";
pub const ADMIN_PASSWORD: &str = "admin-secret";

pub struct TestApp {
    pub db: SqlitePool,
    pub auth: Arc<MemoryAuthProvider>,
    pub router: Router,
}

/// A single connection keeps the in-memory database alive and shared.
pub async fn spawn_app() -> TestApp {
    spawn_with(MemoryAuthProvider::new()).await
}

pub async fn spawn_with(provider: MemoryAuthProvider) -> TestApp {
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create database");
    let auth = Arc::new(provider);
    let dyn_auth: Arc<dyn AuthProvider> = auth.clone();
    let state = AppState::new(pool.clone(), dyn_auth, AppConfig::default());

    TestApp { db: pool, auth, router: router(state) }
}

impl TestApp {
    /// Registers an auth user and writes its profile with the given role.
    pub async fn seed_user(&self, email: &str, password: &str, full_name: &str, role: Role) -> String {
        let user = self.auth.sign_up(email, password).await.expect("Failed to create auth user");
        let mut conn = self.db.acquire().await.expect("Failed to acquire connection");
        db::profiles::upsert(&mut conn, &NewProfile::basic(&user.id, email, full_name, role))
            .await
            .expect("Failed to write profile");
        user.id
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["session"]["access_token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.seed_user(ADMIN_EMAIL, ADMIN_PASSWORD, "Admin", Role::Admin).await;
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(method, uri, token, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self.router.clone().oneshot(request).await.expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        (status, bytes.to_vec())
    }
}

pub fn course_body(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "level": "Beginner",
        "age_range_min": 7,
        "age_range_max": 10,
        "duration_months": 3,
        "price_per_month": 450.0,
        "status": "active"
    })
}
