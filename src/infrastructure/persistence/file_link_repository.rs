//! File-backed implementation of the link repository.
//!
//! The whole table lives in memory and is written to a single JSON object keyed
//! by code after every mutation:
//!
//! ```json
//! {
//!   "Ab3dE6gH": { "uri": "https://google.com", "user_id": 0, "is_deleted": false }
//! }
//! ```
//!
//! Files in the older `code -> uri` layout load as anonymous, live links.

use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::link_table::LinkTable;
use crate::domain::entities::{DeletionRequest, HistoryEntry, ShortLink, StorageStats};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
struct StoredLink {
    uri: String,
    #[serde(default)]
    user_id: i64,
    #[serde(default)]
    is_deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Record(StoredLink),
    Legacy(String),
}

/// Link storage persisted as a JSON file.
///
/// Every mutation rewrites the full file while holding the table lock, so
/// concurrent writers are serialized and the file always holds a consistent
/// snapshot. The snapshot is written to a sibling temporary file and renamed
/// over the target.
///
/// Mutations run on their own task: a caller that stops waiting (for example
/// on timeout) cannot leave a row in the table that never reached the file.
pub struct FileLinkRepository {
    path: Arc<Path>,
    table: Arc<Mutex<LinkTable>>,
}

impl FileLinkRepository {
    /// Opens the storage file, loading existing links.
    ///
    /// A missing or empty file yields empty storage; the file is created on the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::StorageUnavailable`] if the file cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path: PathBuf = path.into();
        let links = load_links(&path).await?;
        let table = LinkTable::from_links(links);

        info!(path = %path.display(), links = table.len(), "File storage loaded");

        Ok(Self {
            path: path.into(),
            table: Arc::new(Mutex::new(table)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn persist(path: &Path, table: &LinkTable) -> Result<(), AppError> {
    let snapshot: HashMap<&str, StoredLink> = table
        .links()
        .map(|link| {
            (
                link.code.as_str(),
                StoredLink {
                    uri: link.original_uri.clone(),
                    user_id: link.owner_id,
                    is_deleted: link.deleted,
                },
            )
        })
        .collect();
    let data = serde_json::to_vec(&snapshot)?;

    let tmp_path = path.with_extension("tmp");
    tokio::fs::write(&tmp_path, data).await?;
    tokio::fs::rename(&tmp_path, path).await?;

    debug!(path = %path.display(), links = table.len(), "File storage saved");
    Ok(())
}

/// Runs `mutation` to completion on a separate task and waits for its result.
async fn run_detached<T, F>(mutation: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, AppError>> + Send + 'static,
{
    tokio::spawn(mutation)
        .await
        .map_err(|e| AppError::unavailable(format!("file storage task failed: {e}")))?
}

async fn load_links(path: &Path) -> Result<Vec<ShortLink>, AppError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "Storage file does not exist yet, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let stored: HashMap<String, StoredValue> = serde_json::from_str(&content)?;

    Ok(stored
        .into_iter()
        .map(|(code, value)| match value {
            StoredValue::Record(record) => ShortLink {
                code,
                original_uri: record.uri,
                owner_id: record.user_id,
                deleted: record.is_deleted,
            },
            StoredValue::Legacy(uri) => ShortLink::new(code, uri, 0),
        })
        .collect())
}

#[async_trait]
impl LinkRepository for FileLinkRepository {
    async fn get(&self, code: &str, _owner_id: i64) -> Result<String, AppError> {
        self.table.lock().await.get(code)
    }

    async fn set(&self, uri: &str, owner_id: i64) -> Result<String, AppError> {
        let path = Arc::clone(&self.path);
        let table = Arc::clone(&self.table);
        let uri = uri.to_owned();

        run_detached(async move {
            let mut table = table.lock().await;
            let code = table.insert(&uri, owner_id)?;

            if let Err(e) = persist(&path, &table).await {
                warn!(error = %e, "Failed to save storage file, rolling back insert");
                table.remove(&code);
                return Err(e);
            }

            Ok(code)
        })
        .await
    }

    async fn get_by_user(&self, owner_id: i64) -> Result<Vec<HistoryEntry>, AppError> {
        Ok(self.table.lock().await.by_owner(owner_id))
    }

    async fn soft_delete(&self, requests: &[DeletionRequest]) -> Result<(), AppError> {
        let path = Arc::clone(&self.path);
        let table = Arc::clone(&self.table);
        let requests = requests.to_vec();

        run_detached(async move {
            let mut table = table.lock().await;
            let changed = table.soft_delete(&requests);
            if changed.is_empty() {
                return Ok(());
            }

            if let Err(e) = persist(&path, &table).await {
                warn!(error = %e, "Failed to save storage file, rolling back soft delete");
                table.undelete(&changed);
                return Err(e);
            }

            debug!(
                requested = requests.len(),
                deleted = changed.len(),
                "soft delete applied"
            );
            Ok(())
        })
        .await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let metadata = tokio::fs::metadata(dir).await?;
        if !metadata.is_dir() {
            return Err(AppError::unavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }

        Ok(())
    }

    async fn stats(&self) -> Result<StorageStats, AppError> {
        Ok(self.table.lock().await.stats())
    }
}
