//! TTL Reaper Task
//!
//! Background task that periodically removes expired cache entries, so entries
//! that are written and never read again still release their bytes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

// == Reaper Handle ==
/// Controls a running reaper task.
///
/// Dropping the handle also stops the task at its next wake-up.
#[derive(Debug)]
pub struct ReaperHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            if !e.is_cancelled() {
                warn!("TTL reaper task ended abnormally: {}", e);
            }
        }
    }

    /// Stops the task immediately without waiting.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Returns true once the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a background task that purges expired entries every `interval`.
///
/// Each tick takes the store lock once and sweeps every entry. Ticks that fall
/// behind are delayed rather than bursted. Must be called from within a tokio
/// runtime.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheStore::<String>::new());
/// let reaper = spawn_reaper(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// reaper.shutdown().await;
/// ```
pub fn spawn_reaper<V>(cache: Arc<CacheStore<V>>, interval: Duration) -> ReaperHandle
where
    V: Send + 'static,
{
    let interval = interval.max(MIN_INTERVAL);
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        info!("Starting TTL reaper with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so sweeps start one
        // interval after spawning.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = cache.purge_expired();
                    if removed > 0 {
                        info!("TTL reaper: removed {} expired entries", removed);
                    } else {
                        debug!("TTL reaper: no expired entries found");
                    }
                }
                // Fires on an explicit signal and when the handle is dropped.
                _ = &mut shutdown_rx => {
                    info!("TTL reaper stopped");
                    break;
                }
            }
        }
    });

    ReaperHandle {
        shutdown_tx: Some(shutdown_tx),
        handle,
    }
}
