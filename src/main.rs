use std::net::SocketAddr;
use std::sync::Arc;

use simple_validation_app::app::{app_router, build_state};
use simple_validation_app::core::config::Config;
use simple_validation_app::core::db::{
    DbConfig, DbError, MemoryUserStore, UserRepository, UserStore, create_pool_with_migrations,
};
use tracing_subscriber::EnvFilter;

/// Signing secret used by debug builds when `SECRET_KEY` is unset
const DEV_SECRET_KEY: &str = "simple-validation-app-development-secret";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    // Log config status (without revealing secrets)
    tracing::info!(
        "Config loaded: database={}, secret_key={}, port={}, session_ttl={}m, reset_users={}",
        config.has_database(),
        config.has_secret_key(),
        config.port,
        config.session_ttl_minutes,
        config.reset_users
    );

    let secret = match config.secret_key.clone() {
        Some(secret) => secret,
        None if cfg!(debug_assertions) => {
            tracing::warn!("SECRET_KEY is not set, using the development secret");
            DEV_SECRET_KEY.to_string()
        }
        None => return Err("SECRET_KEY must be set in release builds".into()),
    };

    let store: Arc<dyn UserStore> = match DbConfig::from_config(&config) {
        Ok(db_config) => {
            let pool = create_pool_with_migrations(&db_config).await?;
            let repository = UserRepository::new(pool);
            tracing::info!("Connected to PostgreSQL, {} users registered", repository.count().await?);
            Arc::new(repository)
        }
        Err(DbError::MissingDatabaseUrl) => {
            tracing::warn!("No database configured, users are kept in memory and lost on restart");
            Arc::new(MemoryUserStore::new())
        }
        Err(e) => return Err(e.into()),
    };

    let state = build_state(&secret, config.session_ttl_minutes, store);

    if config.reset_users {
        let deleted = state.auth_service.reset_users().await?;
        tracing::warn!("RESET_USERS is set, deleted {} users", deleted);
    }

    let app = app_router(state, &config.public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}
