//! In-process link table shared by the memory and file backends.
//!
//! Holds every [`ShortLink`] keyed by code plus a URI index, so both backends
//! give the same guarantees as the database table: unique codes, unique URIs
//! and per-row soft deletion. Callers provide the locking.

use std::collections::{HashMap, HashSet};

use crate::domain::entities::{DeletionRequest, HistoryEntry, ShortLink, StorageStats};
use crate::error::AppError;
use crate::utils::code_generator::{MAX_CODE_ATTEMPTS, generate_code};

#[derive(Debug, Default)]
pub(crate) struct LinkTable {
    links: HashMap<String, ShortLink>,
    codes_by_uri: HashMap<String, String>,
}

impl LinkTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Builds a table from previously stored links.
    ///
    /// When several links share a URI the first one seen owns the URI index entry.
    pub(crate) fn from_links(links: impl IntoIterator<Item = ShortLink>) -> Self {
        let mut table = Self::new();
        for link in links {
            table
                .codes_by_uri
                .entry(link.original_uri.clone())
                .or_insert_with(|| link.code.clone());
            table.links.insert(link.code.clone(), link);
        }
        table
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    pub(crate) fn links(&self) -> impl Iterator<Item = &ShortLink> {
        self.links.values()
    }

    pub(crate) fn get(&self, code: &str) -> Result<String, AppError> {
        match self.links.get(code) {
            None => Err(AppError::not_found(code)),
            Some(link) if link.deleted => Err(AppError::row_deleted(code)),
            Some(link) => Ok(link.original_uri.clone()),
        }
    }

    pub(crate) fn insert(&mut self, uri: &str, owner_id: i64) -> Result<String, AppError> {
        self.insert_with(uri, owner_id, generate_code)
    }

    /// Stores `uri` under the first code from `next_code` that is not taken yet.
    pub(crate) fn insert_with(
        &mut self,
        uri: &str,
        owner_id: i64,
        mut next_code: impl FnMut() -> String,
    ) -> Result<String, AppError> {
        if let Some(existing) = self.codes_by_uri.get(uri) {
            return Err(AppError::conflict(existing.clone()));
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = next_code();
            if self.links.contains_key(&code) {
                tracing::warn!(attempt, "code collision, retrying");
                continue;
            }

            self.codes_by_uri.insert(uri.to_string(), code.clone());
            self.links.insert(
                code.clone(),
                ShortLink::new(code.clone(), uri.to_string(), owner_id),
            );
            return Ok(code);
        }

        Err(AppError::unavailable(format!(
            "failed to generate a unique code after {MAX_CODE_ATTEMPTS} attempts"
        )))
    }

    /// Removes a link added by [`Self::insert`]; used to roll back a failed write.
    pub(crate) fn remove(&mut self, code: &str) {
        if let Some(link) = self.links.remove(code)
            && self.codes_by_uri.get(&link.original_uri).map(String::as_str) == Some(code)
        {
            self.codes_by_uri.remove(&link.original_uri);
        }
    }

    pub(crate) fn by_owner(&self, owner_id: i64) -> Vec<HistoryEntry> {
        self.links
            .values()
            .filter(|link| link.is_visible_to(owner_id))
            .map(HistoryEntry::from)
            .collect()
    }

    /// Marks matching live rows as deleted and returns the codes that changed.
    pub(crate) fn soft_delete(&mut self, requests: &[DeletionRequest]) -> Vec<String> {
        let mut changed = Vec::new();
        for request in requests {
            if let Some(link) = self.links.get_mut(&request.code)
                && link.owner_id == request.owner_id
                && !link.deleted
            {
                link.deleted = true;
                changed.push(link.code.clone());
            }
        }
        changed
    }

    /// Reverts [`Self::soft_delete`] for `codes`.
    pub(crate) fn undelete(&mut self, codes: &[String]) {
        for code in codes {
            if let Some(link) = self.links.get_mut(code) {
                link.deleted = false;
            }
        }
    }

    pub(crate) fn stats(&self) -> StorageStats {
        let users: HashSet<i64> = self.links.values().map(|link| link.owner_id).collect();
        StorageStats {
            urls: self.links.len() as u64,
            users: users.len() as u64,
        }
    }
}
