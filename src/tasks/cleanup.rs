//! TTL Cleanup Task
//!
//! Background task that periodically drops expired cache entries. Reads
//! already ignore expired entries; the sweep only bounds memory held by keys
//! that are never requested again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns the sweep loop, returning its handle so shutdown can abort it.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheStore::default()));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<RwLock<CacheStore>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting cache cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining) = {
                let mut cache_guard = cache.write().await;
                let removed = cache_guard.cleanup_expired();
                (removed, cache_guard.len())
            };

            if removed > 0 {
                info!(removed, remaining, "Cache cleanup removed expired entries");
            } else {
                debug!(remaining, "Cache cleanup found no expired entries");
            }
        }
    })
}
