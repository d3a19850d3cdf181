//! Connection setup for the configured storage backend.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};

use super::{PgClickRepository, PgUrlRepository, SqliteClickRepository, SqliteUrlRepository};
use crate::config::{Config, DatabaseBackend, mask_connection_string};
use crate::domain::repositories::{ClickRepository, UrlRepository};

/// Repositories bound to one connection pool.
#[derive(Clone)]
pub struct Repositories {
    pub urls: Arc<dyn UrlRepository>,
    pub clicks: Arc<dyn ClickRepository>,
}

impl Repositories {
    /// Wraps an existing PostgreSQL pool.
    pub fn postgres(pool: PgPool) -> Self {
        let pool = Arc::new(pool);
        Self {
            urls: Arc::new(PgUrlRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool)),
        }
    }

    /// Wraps an existing SQLite pool.
    pub fn sqlite(pool: SqlitePool) -> Self {
        let pool = Arc::new(pool);
        Self {
            urls: Arc::new(SqliteUrlRepository::new(pool.clone())),
            clicks: Arc::new(SqliteClickRepository::new(pool)),
        }
    }
}

/// Connects to the database named by `config.database_url`, applies the
/// embedded migrations for that backend, and returns the repositories.
///
/// # Errors
///
/// Returns an error if the URL scheme is unsupported, the connection fails,
/// or a migration cannot be applied.
pub async fn connect(config: &Config) -> Result<Repositories> {
    let backend = config.backend().with_context(|| {
        format!(
            "Unsupported DATABASE_URL: {}",
            mask_connection_string(&config.database_url)
        )
    })?;

    match backend {
        DatabaseBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(&config.database_url)
                .await
                .context("Failed to connect to PostgreSQL")?;

            sqlx::migrate!("./migrations/postgres")
                .run(&pool)
                .await
                .context("Failed to apply PostgreSQL migrations")?;

            tracing::info!("Connected to PostgreSQL");
            Ok(Repositories::postgres(pool))
        }
        DatabaseBackend::Sqlite => {
            let options = SqliteConnectOptions::from_str(&config.database_url)
                .context("Invalid SQLite DATABASE_URL")?
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5));

            let pool = SqlitePoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect_with(options)
                .await
                .context("Failed to open SQLite database")?;

            sqlx::migrate!("./migrations/sqlite")
                .run(&pool)
                .await
                .context("Failed to apply SQLite migrations")?;

            tracing::info!("Connected to SQLite");
            Ok(Repositories::sqlite(pool))
        }
    }
}
