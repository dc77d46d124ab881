//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{DeletionRequest, HistoryEntry, StorageStats};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{MAX_CODE_ATTEMPTS, generate_code};
use crate::utils::db_error::is_unique_violation_on;

const CODE_CONSTRAINT: &str = "urls_code_key";
const URI_CONSTRAINT: &str = "urls_uri_key";

/// PostgreSQL repository backed by the `urls` table.
///
/// Uniqueness of codes and URIs is enforced by the table constraints; a
/// violation on the URI constraint is reported as [`AppError::Conflict`]
/// carrying the code already stored for that URI.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn existing_code(&self, uri: &str) -> Result<String, AppError> {
        let code: String = sqlx::query_scalar("SELECT code FROM urls WHERE uri = $1")
            .bind(uri)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(code)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn get(&self, code: &str, _owner_id: i64) -> Result<String, AppError> {
        let row: Option<(String, bool)> =
            sqlx::query_as("SELECT uri, is_deleted FROM urls WHERE code = $1")
                .bind(code)
                .fetch_optional(self.pool.as_ref())
                .await?;

        match row {
            None => Err(AppError::not_found(code)),
            Some((_, true)) => Err(AppError::row_deleted(code)),
            Some((uri, false)) => Ok(uri),
        }
    }

    async fn set(&self, uri: &str, owner_id: i64) -> Result<String, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code();

            let result = sqlx::query("INSERT INTO urls (code, uri, user_id) VALUES ($1, $2, $3)")
                .bind(&code)
                .bind(uri)
                .bind(owner_id)
                .execute(self.pool.as_ref())
                .await;

            match result {
                Ok(_) => return Ok(code),
                Err(e) if is_unique_violation_on(&e, URI_CONSTRAINT) => {
                    let existing = self.existing_code(uri).await?;
                    return Err(AppError::conflict(existing));
                }
                Err(e) if is_unique_violation_on(&e, CODE_CONSTRAINT) => {
                    tracing::warn!(attempt, "code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::unavailable(format!(
            "failed to generate a unique code after {MAX_CODE_ATTEMPTS} attempts"
        )))
    }

    async fn get_by_user(&self, owner_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT code, uri
            FROM urls
            WHERE user_id = $1 AND NOT is_deleted
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(code, original_uri)| HistoryEntry { code, original_uri })
            .collect())
    }

    async fn soft_delete(&self, requests: &[DeletionRequest]) -> Result<(), AppError> {
        if requests.is_empty() {
            return Ok(());
        }

        let (codes, owners): (Vec<String>, Vec<i64>) = requests
            .iter()
            .map(|r| (r.code.clone(), r.owner_id))
            .unzip();

        let result = sqlx::query(
            r#"
            UPDATE urls
            SET is_deleted = TRUE
            WHERE (code, user_id) IN (SELECT * FROM UNNEST($1::text[], $2::bigint[]))
            "#,
        )
        .bind(codes)
        .bind(owners)
        .execute(self.pool.as_ref())
        .await?;

        tracing::debug!(
            requested = requests.len(),
            deleted = result.rows_affected(),
            "soft delete applied"
        );
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }

    async fn stats(&self) -> Result<StorageStats, AppError> {
        let (urls, users): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COUNT(DISTINCT user_id) FROM urls")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(StorageStats {
            urls: urls as u64,
            users: users as u64,
        })
    }
}
