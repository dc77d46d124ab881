//! Translation between original URIs and short codes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::config::Config;
use crate::domain::deletion_worker::{DeletionWorkerConfig, run_deletion_worker};
use crate::domain::entities::{DeletionRequest, HistoryEntry, StorageStats};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::uri::validate_uri;

/// Tunables of a [`Coder`].
#[derive(Debug, Clone, Copy)]
pub struct CoderSettings {
    /// Capacity of the deletion queue; producers wait when it is full.
    pub queue_capacity: usize,
    /// Period between two deletion flushes.
    pub flush_interval: Duration,
    /// Upper bound for one storage call made on behalf of a request.
    pub request_timeout: Duration,
    /// Upper bound for a storage health check.
    pub health_check_timeout: Duration,
}

impl Default for CoderSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            flush_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(3),
            health_check_timeout: Duration::from_secs(1),
        }
    }
}

impl From<&Config> for CoderSettings {
    fn from(config: &Config) -> Self {
        Self {
            queue_capacity: config.delete_queue_capacity,
            flush_interval: Duration::from_secs(config.delete_flush_interval_secs),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            health_check_timeout: Duration::from_millis(config.health_check_timeout_ms),
        }
    }
}

/// Validates URIs and translates them to codes and back through the injected storage.
///
/// Owns the deletion queue and the worker that drains it. The worker is
/// spawned by [`Coder::new`] and stops when the coder is dropped or
/// [`Coder::shutdown`] is called, flushing whatever it still holds.
///
/// Errors from storage are passed through unchanged, so an
/// [`AppError::Conflict`] from [`Coder::to_code`] still carries the code the
/// URI was stored under earlier.
pub struct Coder<S: LinkRepository + 'static> {
    storage: Arc<S>,
    deletion_tx: mpsc::Sender<DeletionRequest>,
    shutdown_tx: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
    settings: CoderSettings,
}

impl<S: LinkRepository + 'static> Coder<S> {
    /// Creates a coder over `storage` and spawns its deletion worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(storage: Arc<S>, settings: CoderSettings) -> Self {
        let (deletion_tx, deletion_rx) = mpsc::channel(settings.queue_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = tokio::spawn(run_deletion_worker(
            deletion_rx,
            storage.clone(),
            DeletionWorkerConfig {
                flush_interval: settings.flush_interval,
                flush_timeout: settings.request_timeout,
            },
            shutdown_rx,
        ));
        tracing::info!(
            queue_capacity = settings.queue_capacity,
            flush_interval = ?settings.flush_interval,
            "Deletion worker started"
        );

        Self {
            storage,
            deletion_tx,
            shutdown_tx,
            worker: Mutex::new(Some(worker)),
            settings,
        }
    }

    pub fn settings(&self) -> &CoderSettings {
        &self.settings
    }

    /// Shortens `uri` on behalf of `owner_id` and returns its code.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUri`] if `uri` is not an absolute URI; nothing is stored
    /// - [`AppError::Conflict`] with the existing code if `uri` was shortened before
    /// - [`AppError::StorageUnavailable`] on backend failure or timeout
    pub async fn to_code(&self, uri: &str, owner_id: i64) -> Result<String, AppError> {
        validate_uri(uri)?;

        let code = self
            .with_timeout("set", self.settings.request_timeout, self.storage.set(uri, owner_id))
            .await?;

        tracing::debug!(code = %code, owner_id, "URI shortened");
        Ok(code)
    }

    /// Resolves `code` to the original URI.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code was never stored
    /// - [`AppError::RowDeleted`] if the link was deleted
    /// - [`AppError::StorageUnavailable`] on backend failure or timeout
    pub async fn to_uri(&self, code: &str, owner_id: i64) -> Result<String, AppError> {
        let uri = self
            .with_timeout("get", self.settings.request_timeout, self.storage.get(code, owner_id))
            .await?;

        if uri.is_empty() {
            return Err(AppError::not_found(code));
        }

        Ok(uri)
    }

    /// Lists the live links owned by `owner_id`.
    pub async fn get_history(&self, owner_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
        self.with_timeout(
            "get_by_user",
            self.settings.request_timeout,
            self.storage.get_by_user(owner_id),
        )
        .await
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.with_timeout(
            "health_check",
            self.settings.health_check_timeout,
            self.storage.health_check(),
        )
        .await
    }

    pub async fn get_stats(&self) -> Result<StorageStats, AppError> {
        self.with_timeout("stats", self.settings.request_timeout, self.storage.stats())
            .await
    }

    /// Queues `codes` for deletion on behalf of `owner_id` and returns.
    ///
    /// The rows are marked deleted by the worker on its next flush. Codes that
    /// do not belong to `owner_id` are ignored at that point. Waits only when
    /// the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] if the worker has stopped.
    pub async fn delete_urls(&self, codes: Vec<String>, owner_id: i64) -> Result<(), AppError> {
        let count = codes.len();
        for code in codes {
            self.deletion_tx
                .send(DeletionRequest::new(owner_id, code))
                .await
                .map_err(|_| AppError::unavailable("deletion queue is closed"))?;
        }

        tracing::debug!(owner_id, count, "Deletion requests queued");
        Ok(())
    }

    /// Shortens every `(correlation_id, uri)` pair in order.
    ///
    /// Returns `(correlation_id, code)` pairs in input order. A URI that was
    /// already shortened yields its existing code.
    ///
    /// # Errors
    ///
    /// Stops at the first invalid URI with [`AppError::InvalidUri`], or at the
    /// first storage failure. Items before it stay stored.
    pub async fn encode_batch(
        &self,
        items: Vec<(String, String)>,
        owner_id: i64,
    ) -> Result<Vec<(String, String)>, AppError> {
        let mut encoded = Vec::with_capacity(items.len());

        for (correlation_id, uri) in items {
            let code = match self.to_code(&uri, owner_id).await {
                Ok(code) => code,
                Err(AppError::Conflict { code }) => code,
                Err(e) => {
                    tracing::warn!(correlation_id = %correlation_id, error = %e, "Batch encoding aborted");
                    return Err(e);
                }
            };
            encoded.push((correlation_id, code));
        }

        Ok(encoded)
    }

    /// Stops the deletion worker after it flushes the requests it holds.
    ///
    /// Later calls to [`Coder::delete_urls`] fail. Calling this twice is a no-op.
    pub async fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);

        let worker = self.worker.lock().take();
        if let Some(worker) = worker
            && let Err(e) = worker.await
        {
            tracing::error!(error = %e, "Deletion worker terminated abnormally");
        }
    }

    async fn with_timeout<T>(
        &self,
        operation: &'static str,
        limit: Duration,
        fut: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        match timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, timeout = ?limit, "Storage call timed out");
                Err(AppError::unavailable(format!(
                    "{operation} timed out after {}ms",
                    limit.as_millis()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::persistence::MemoryLinkRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory_coder() -> Coder<MemoryLinkRepository> {
        Coder::new(Arc::new(MemoryLinkRepository::new()), CoderSettings::default())
    }

    /// Storage whose calls never complete within the test timeouts.
    struct StalledRepository;

    #[async_trait]
    impl LinkRepository for StalledRepository {
        async fn get(&self, _code: &str, _owner_id: i64) -> Result<String, AppError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("https://late.example".to_string())
        }

        async fn set(&self, _uri: &str, _owner_id: i64) -> Result<String, AppError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("late0001".to_string())
        }

        async fn get_by_user(&self, _owner_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
            Ok(Vec::new())
        }

        async fn soft_delete(&self, _requests: &[DeletionRequest]) -> Result<(), AppError> {
            Ok(())
        }

        async fn health_check(&self) -> Result<(), AppError> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        }

        async fn stats(&self) -> Result<StorageStats, AppError> {
            Ok(StorageStats::default())
        }
    }

    /// Storage whose `soft_delete` stalls, counting how often it is entered.
    #[derive(Default)]
    struct SlowDeleteRepository {
        flushes: AtomicUsize,
    }

    impl SlowDeleteRepository {
        fn flushes(&self) -> usize {
            self.flushes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LinkRepository for SlowDeleteRepository {
        async fn get(&self, code: &str, _owner_id: i64) -> Result<String, AppError> {
            Err(AppError::not_found(code))
        }

        async fn set(&self, _uri: &str, _owner_id: i64) -> Result<String, AppError> {
            Ok("unused01".to_string())
        }

        async fn get_by_user(&self, _owner_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
            Ok(Vec::new())
        }

        async fn soft_delete(&self, _requests: &[DeletionRequest]) -> Result<(), AppError> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn health_check(&self) -> Result<(), AppError> {
            Ok(())
        }

        async fn stats(&self) -> Result<StorageStats, AppError> {
            Ok(StorageStats::default())
        }
    }

    #[tokio::test]
    async fn test_to_code_then_to_uri_round_trips() {
        let coder = memory_coder();

        let code = coder.to_code("https://google.com", 0).await.unwrap();

        assert_eq!(code.len(), 8);
        assert_eq!(coder.to_uri(&code, 0).await.unwrap(), "https://google.com");
    }

    #[tokio::test]
    async fn test_to_code_again_returns_existing_code_as_conflict() {
        let coder = memory_coder();
        let code = coder.to_code("https://google.com", 0).await.unwrap();

        let err = coder.to_code("https://google.com", 0).await.unwrap_err();

        assert_eq!(err.existing_code(), Some(code.as_str()));
    }

    #[tokio::test]
    async fn test_to_code_rejects_malformed_uri_without_storing() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_set().times(0);
        let coder = Coder::new(Arc::new(mock_repo), CoderSettings::default());

        for input in ["", "incorrect", " https://google.com"] {
            let result = coder.to_code(input, 0).await;
            assert!(
                matches!(result, Err(AppError::InvalidUri(_))),
                "{input:?} was accepted"
            );
        }
    }

    #[tokio::test]
    async fn test_to_uri_unknown_code_is_not_found() {
        let coder = memory_coder();

        assert!(matches!(
            coder.to_uri("nothere1", 0).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_to_uri_empty_result_becomes_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_get()
            .times(1)
            .returning(|_, _| Ok(String::new()));
        let coder = Coder::new(Arc::new(mock_repo), CoderSettings::default());

        let result = coder.to_uri("abcd1234", 0).await;

        assert!(matches!(result, Err(AppError::NotFound { code }) if code == "abcd1234"));
    }

    #[tokio::test]
    async fn test_storage_errors_pass_through() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_get()
            .times(1)
            .returning(|code, _| Err(AppError::row_deleted(code)));
        mock_repo
            .expect_stats()
            .times(1)
            .returning(|| Err(AppError::unavailable("connection refused")));
        let coder = Coder::new(Arc::new(mock_repo), CoderSettings::default());

        assert!(matches!(
            coder.to_uri("gone0001", 0).await,
            Err(AppError::RowDeleted { .. })
        ));
        assert!(matches!(
            coder.get_stats().await,
            Err(AppError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_history_contains_only_owned_links() {
        let coder = memory_coder();
        let code = coder.to_code("https://mine.example", 5).await.unwrap();
        coder.to_code("https://theirs.example", 6).await.unwrap();

        let history = coder.get_history(5).await.unwrap();

        assert_eq!(
            history,
            vec![HistoryEntry {
                code,
                original_uri: "https://mine.example".to_string()
            }]
        );
        assert!(coder.get_history(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_counts_urls_and_owners() {
        let coder = memory_coder();
        coder.to_code("https://one.example", 1).await.unwrap();
        coder.to_code("https://two.example", 1).await.unwrap();
        coder.to_code("https://three.example", 2).await.unwrap();

        assert_eq!(
            coder.get_stats().await.unwrap(),
            StorageStats { urls: 3, users: 2 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleted_urls_report_row_deleted_after_flush() {
        let coder = memory_coder();
        let first = coder.to_code("https://first.example", 3).await.unwrap();
        let second = coder.to_code("https://second.example", 3).await.unwrap();

        coder
            .delete_urls(vec![first.clone(), second.clone()], 3)
            .await
            .unwrap();
        assert!(coder.to_uri(&first, 3).await.is_ok());

        tokio::time::sleep(Duration::from_secs(11)).await;

        for code in [&first, &second] {
            assert!(matches!(
                coder.to_uri(code, 3).await,
                Err(AppError::RowDeleted { .. })
            ));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_by_other_owner_is_ignored() {
        let coder = memory_coder();
        let code = coder.to_code("https://kept.example", 1).await.unwrap();

        coder.delete_urls(vec![code.clone()], 2).await.unwrap();
        tokio::time::sleep(Duration::from_secs(11)).await;

        assert_eq!(coder.to_uri(&code, 1).await.unwrap(), "https://kept.example");
    }

    #[tokio::test]
    async fn test_shutdown_flushes_queued_deletions() {
        let coder = memory_coder();
        let code = coder.to_code("https://example.com", 4).await.unwrap();
        coder.delete_urls(vec![code.clone()], 4).await.unwrap();

        coder.shutdown().await;

        assert!(matches!(
            coder.to_uri(&code, 4).await,
            Err(AppError::RowDeleted { .. })
        ));
        assert!(matches!(
            coder.delete_urls(vec![code], 4).await,
            Err(AppError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_encode_batch_keeps_order_and_reuses_existing_codes() {
        let coder = memory_coder();
        let existing = coder.to_code("https://old.example", 0).await.unwrap();

        let encoded = coder
            .encode_batch(
                vec![
                    ("a".to_string(), "https://new.example".to_string()),
                    ("b".to_string(), "https://old.example".to_string()),
                ],
                0,
            )
            .await
            .unwrap();

        assert_eq!(encoded.len(), 2);
        assert_eq!(encoded[0].0, "a");
        assert_eq!(
            coder.to_uri(&encoded[0].1, 0).await.unwrap(),
            "https://new.example"
        );
        assert_eq!(encoded[1], ("b".to_string(), existing));
    }

    #[tokio::test]
    async fn test_encode_batch_aborts_on_invalid_uri() {
        let coder = memory_coder();

        let result = coder
            .encode_batch(
                vec![
                    ("1".to_string(), "https://ok.example".to_string()),
                    ("2".to_string(), "not a uri".to_string()),
                    ("3".to_string(), "https://never.example".to_string()),
                ],
                0,
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidUri(_))));
        assert_eq!(coder.get_stats().await.unwrap().urls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_storage_times_out_as_unavailable() {
        let coder = Coder::new(Arc::new(StalledRepository), CoderSettings::default());

        assert!(matches!(
            coder.to_code("https://example.com", 0).await,
            Err(AppError::StorageUnavailable(_))
        ));
        assert!(matches!(
            coder.to_uri("late0001", 0).await,
            Err(AppError::StorageUnavailable(_))
        ));
        assert!(matches!(
            coder.health_check().await,
            Err(AppError::StorageUnavailable(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_deletion_queue_blocks_until_worker_drains_it() {
        let storage = Arc::new(SlowDeleteRepository::default());
        let coder = Coder::new(
            storage.clone(),
            CoderSettings {
                queue_capacity: 1,
                ..CoderSettings::default()
            },
        );

        coder.delete_urls(vec!["code0001".to_string()], 1).await.unwrap();
        assert_eq!(storage.flushes(), 0);

        // First tick at 10s starts a flush that stalls until the 3s flush timeout.
        tokio::time::sleep(Duration::from_millis(10_100)).await;
        assert_eq!(storage.flushes(), 1);

        coder.delete_urls(vec!["code0002".to_string()], 1).await.unwrap();

        let blocked = coder.delete_urls(vec!["code0003".to_string()], 1);
        tokio::pin!(blocked);
        assert!(
            tokio::time::timeout(Duration::from_secs(1), &mut blocked)
                .await
                .is_err()
        );

        let unblocked = tokio::time::timeout(Duration::from_secs(5), &mut blocked).await;
        assert!(matches!(unblocked, Ok(Ok(()))));
        assert_eq!(storage.flushes(), 1);
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config {
            request_timeout_ms: 500,
            delete_flush_interval_secs: 2,
            ..Config::default()
        };

        let settings = CoderSettings::from(&config);

        assert_eq!(settings.request_timeout, Duration::from_millis(500));
        assert_eq!(settings.flush_interval, Duration::from_secs(2));
        assert_eq!(settings.queue_capacity, 1024);
        assert_eq!(settings.health_check_timeout, Duration::from_secs(1));
    }
}
