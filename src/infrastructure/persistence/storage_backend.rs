//! Runtime selection between the storage backends.
//!
//! | Variant | Selected when | Durability |
//! |---------|---------------|------------|
//! | [`StorageBackend::Postgres`] | `DATABASE_DSN` is set | database |
//! | [`StorageBackend::File`] | `FILE_STORAGE_PATH` is set | JSON file |
//! | [`StorageBackend::Memory`] | otherwise | none |

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use super::{FileLinkRepository, MemoryLinkRepository, PgLinkRepository};
use crate::config::{Config, StorageKind};
use crate::domain::entities::{DeletionRequest, HistoryEntry, StorageStats};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Storage backend chosen once at startup.
pub enum StorageBackend {
    Memory(MemoryLinkRepository),
    File(FileLinkRepository),
    Postgres(PgLinkRepository),
}

impl StorageBackend {
    /// Builds the backend selected by `config`.
    ///
    /// For PostgreSQL this connects the pool (retrying with exponential
    /// backoff up to `db_connect_attempts` times) and applies migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file cannot be loaded, the database
    /// cannot be reached or migrations fail.
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.storage_kind() {
            StorageKind::Database(dsn) => {
                let pool = connect_pool(&dsn, config).await?;
                tracing::info!("Connected to database");

                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run database migrations")?;

                Ok(Self::Postgres(PgLinkRepository::new(Arc::new(pool))))
            }
            StorageKind::File(path) => {
                let repo = FileLinkRepository::open(&path)
                    .await
                    .with_context(|| format!("Failed to open storage file {}", path.display()))?;
                Ok(Self::File(repo))
            }
            StorageKind::Memory => Ok(Self::memory()),
        }
    }

    pub fn memory() -> Self {
        Self::Memory(MemoryLinkRepository::new())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "file",
            Self::Postgres(_) => "postgres",
        }
    }
}

async fn connect_pool(dsn: &str, config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout));

    let retries = ExponentialBackoff::from_millis(10)
        .factor(50)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(config.db_connect_attempts.saturating_sub(1));

    let mut attempt = 0;
    Retry::spawn(retries, || {
        attempt += 1;
        let options = options.clone();
        async move {
            options.connect(dsn).await.inspect_err(|e| {
                tracing::warn!(attempt, error = %e, "Database connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

#[async_trait]
impl LinkRepository for StorageBackend {
    async fn get(&self, code: &str, owner_id: i64) -> Result<String, AppError> {
        match self {
            Self::Memory(b) => b.get(code, owner_id).await,
            Self::File(b) => b.get(code, owner_id).await,
            Self::Postgres(b) => b.get(code, owner_id).await,
        }
    }

    async fn set(&self, uri: &str, owner_id: i64) -> Result<String, AppError> {
        match self {
            Self::Memory(b) => b.set(uri, owner_id).await,
            Self::File(b) => b.set(uri, owner_id).await,
            Self::Postgres(b) => b.set(uri, owner_id).await,
        }
    }

    async fn get_by_user(&self, owner_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
        match self {
            Self::Memory(b) => b.get_by_user(owner_id).await,
            Self::File(b) => b.get_by_user(owner_id).await,
            Self::Postgres(b) => b.get_by_user(owner_id).await,
        }
    }

    async fn soft_delete(&self, requests: &[DeletionRequest]) -> Result<(), AppError> {
        match self {
            Self::Memory(b) => b.soft_delete(requests).await,
            Self::File(b) => b.soft_delete(requests).await,
            Self::Postgres(b) => b.soft_delete(requests).await,
        }
    }

    async fn health_check(&self) -> Result<(), AppError> {
        match self {
            Self::Memory(b) => b.health_check().await,
            Self::File(b) => b.health_check().await,
            Self::Postgres(b) => b.health_check().await,
        }
    }

    async fn stats(&self) -> Result<StorageStats, AppError> {
        match self {
            Self::Memory(b) => b.stats().await,
            Self::File(b) => b.stats().await,
            Self::Postgres(b) => b.stats().await,
        }
    }
}
