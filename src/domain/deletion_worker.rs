//! Background worker that batches deletion requests and flushes them to storage.
//!
//! The worker accumulates [`DeletionRequest`]s as they arrive and sends the whole
//! batch to [`LinkRepository::soft_delete`] on every tick of a fixed interval.
//! Delivery is at-most-once: a batch whose flush fails is logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, error, info};

use crate::domain::entities::DeletionRequest;
use crate::domain::repositories::LinkRepository;

/// Timing parameters of the deletion worker.
#[derive(Debug, Clone, Copy)]
pub struct DeletionWorkerConfig {
    /// Time between two flushes.
    pub flush_interval: Duration,
    /// Upper bound for a single `soft_delete` call.
    pub flush_timeout: Duration,
}

/// Runs until the queue closes or `shutdown` fires, then flushes what it holds and returns.
///
/// An empty batch at tick time is a no-op. Producers are never blocked by a
/// flush beyond the queue's own capacity.
pub async fn run_deletion_worker<S>(
    mut rx: mpsc::Receiver<DeletionRequest>,
    storage: Arc<S>,
    config: DeletionWorkerConfig,
    mut shutdown: watch::Receiver<bool>,
) where
    S: LinkRepository + ?Sized,
{
    let mut ticker = interval(config.flush_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately.
    ticker.tick().await;

    let mut pending: Vec<DeletionRequest> = Vec::new();

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(request) => pending.push(request),
                None => {
                    debug!("Deletion queue closed");
                    break;
                }
            },
            _ = ticker.tick() => {
                flush(storage.as_ref(), &mut pending, config.flush_timeout).await;
            }
            _ = shutdown.changed() => {
                while let Ok(request) = rx.try_recv() {
                    pending.push(request);
                }
                debug!("Deletion worker received shutdown signal");
                break;
            }
        }
    }

    flush(storage.as_ref(), &mut pending, config.flush_timeout).await;
    info!("Deletion worker stopped");
}

async fn flush<S>(storage: &S, pending: &mut Vec<DeletionRequest>, flush_timeout: Duration)
where
    S: LinkRepository + ?Sized,
{
    if pending.is_empty() {
        return;
    }

    let batch = std::mem::take(pending);
    let batch_size = batch.len();

    let outcome = match timeout(flush_timeout, storage.soft_delete(&batch)).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err("flush timed out".to_string()),
    };

    match outcome {
        Ok(()) => {
            debug!(batch_size, "Flushed deletion batch");
            metrics::counter!("deletion_requests_flushed_total").increment(batch_size as u64);
        }
        Err(e) => {
            error!(error = %e, batch_size, "Failed to flush deletion batch, dropping it");
            metrics::counter!("deletion_flush_failures_total").increment(1);
        }
    }
}
