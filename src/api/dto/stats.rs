//! DTO for service statistics.

use serde::Serialize;

use crate::domain::entities::StorageStats;

/// Response body of `GET /api/internal/stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub urls: u64,
    pub users: u64,
}

impl From<StorageStats> for StatsResponse {
    fn from(stats: StorageStats) -> Self {
        Self {
            urls: stats.urls,
            users: stats.users,
        }
    }
}
