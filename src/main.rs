use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use academy::auth::{AuthProvider, HttpAuthProvider, MemoryAuthProvider};
use academy::config::AppConfig;
use academy::{AppState, db, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "academy=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config.database_url, 5).await?;

    let auth: Arc<dyn AuthProvider> = match config.auth.clone() {
        Some(auth_config) => {
            if auth_config.service_role_key.is_none() {
                warn!("AUTH_SERVICE_ROLE_KEY is not set; back-office account management is disabled");
            }
            Arc::new(HttpAuthProvider::new(auth_config)?)
        }
        None => {
            warn!("AUTH_URL is not set; using the in-memory auth provider");
            Arc::new(MemoryAuthProvider::new())
        }
    };

    let addr = config.bind_addr;
    let state = AppState::new(pool, auth, config);
    let app = router(state);

    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
