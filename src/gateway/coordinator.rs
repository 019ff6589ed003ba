//! Request Coordinator
//!
//! Runs one fetch-or-serve request through
//! cache check, quota check, fetch, store and seal.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::CacheStats;
use crate::envelope::EncryptedEnvelope;
use crate::error::{GatewayError, Result};
use crate::gateway::{CacheKey, Fetcher, GatewayState};
use crate::quota::{BucketHandle, QuotaDecision, QuotaSnapshot};

// == Request Coordinator ==
/// The only component that calls into upstream fetchers.
#[derive(Debug, Clone)]
pub struct RequestCoordinator {
    state: GatewayState,
}

impl RequestCoordinator {
    pub fn new(state: GatewayState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GatewayState {
        &self.state
    }

    // == Serve ==
    /// Serves `key` from cache or fetches it within `bucket`'s budget.
    ///
    /// A cache hit never touches the quota. A failed fetch is not cached and
    /// keeps the single quota unit it was charged. No lock is held while the
    /// fetcher runs.
    pub async fn serve(
        &self,
        bucket: &BucketHandle,
        key: &CacheKey,
        ttl: Duration,
        fetcher: &dyn Fetcher,
    ) -> Result<EncryptedEnvelope> {
        let cached = self.state.cache.write().await.get(key.as_str());
        if let Some(payload) = cached {
            debug!(%key, "cache hit");
            return Ok(self.state.cipher.seal(&payload));
        }

        if let QuotaDecision::Denied { seconds_remaining } = bucket.try_acquire() {
            warn!(bucket = bucket.name(), %key, seconds_remaining, "quota exhausted");
            return Err(GatewayError::QuotaExceeded { seconds_remaining });
        }

        info!(bucket = bucket.name(), %key, "fetching from upstream");
        let payload = fetcher.fetch().await.map_err(|err| {
            let detail = format!("{:#}", err);
            warn!(bucket = bucket.name(), %key, error = %detail, "upstream fetch failed");
            GatewayError::UpstreamFailure(detail)
        })?;

        let payload = Arc::new(payload);
        self.state
            .cache
            .write()
            .await
            .set(key.as_str(), Arc::clone(&payload), Some(ttl));

        Ok(self.state.cipher.seal(&payload))
    }

    // == Diagnostics ==
    /// Quota snapshots for the named buckets.
    pub fn diagnostics<S: AsRef<str>>(&self, names: &[S]) -> Result<BTreeMap<String, QuotaSnapshot>> {
        self.state.quota.diagnostics(names)
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.state.cache.read().await.stats()
    }
}
