//! PostgreSQL connection pool
//!
//! The user store is the only consumer, so the pool stays small. Migrations
//! are embedded from `migrations/` and applied on startup.

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::time::Duration;

use crate::core::config::{Config, DatabaseParts, DatabaseTarget};

/// Default pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default time to wait for a free connection
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pool settings
#[derive(Clone)]
pub struct DbConfig {
    /// Parsed connection parameters
    pub connect_options: PgConnectOptions,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// How long a request waits for a connection before failing
    pub acquire_timeout: Duration,
}

impl DbConfig {
    fn with_options(connect_options: PgConnectOptions) -> Self {
        Self {
            connect_options,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// Settings for a full connection URL
    pub fn from_url(database_url: &str) -> Result<Self, DbError> {
        let options = database_url
            .parse::<PgConnectOptions>()
            .map_err(DbError::InvalidUrl)?;

        Ok(Self::with_options(options))
    }

    /// Settings for separately given connection values
    pub fn from_parts(parts: &DatabaseParts) -> Self {
        let mut options = PgConnectOptions::new()
            .host(&parts.host)
            .port(parts.port)
            .database(&parts.name);

        if let Some(user) = &parts.user {
            options = options.username(user);
        }
        if let Some(password) = &parts.password {
            options = options.password(password);
        }

        Self::with_options(options)
    }

    /// Pool settings for the configured database
    pub fn from_config(config: &Config) -> Result<Self, DbError> {
        match &config.database {
            Some(DatabaseTarget::Url(url)) => Self::from_url(url),
            Some(DatabaseTarget::Parts(parts)) => Ok(Self::from_parts(parts)),
            None => Err(DbError::MissingDatabaseUrl),
        }
    }

    /// Connection target without credentials, safe to log
    pub fn redacted_url(&self) -> String {
        let options = &self.connect_options;

        format!(
            "postgres://{}@{}:{}/{}",
            options.get_username(),
            options.get_host(),
            options.get_port(),
            options.get_database().unwrap_or_default()
        )
    }
}

// PgConnectOptions' own Debug prints the password
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("connect_options", &self.redacted_url())
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Database errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("No database configured (set DATABASE_URL or DB_HOST and DB_NAME)")]
    MissingDatabaseUrl,

    #[error("Invalid DATABASE_URL: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    #[error("Failed to connect to database: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Failed to run migrations: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// Open a connection pool
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, DbError> {
    tracing::info!("Connecting to {}", config.redacted_url());

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(config.connect_options.clone())
        .await?;

    Ok(pool)
}

/// Open a pool and bring the schema up to date
pub async fn create_pool_with_migrations(config: &DbConfig) -> Result<PgPool, DbError> {
    let pool = create_pool(config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed successfully");
    Ok(pool)
}
