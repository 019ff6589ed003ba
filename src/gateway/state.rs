//! Process-wide gateway state, constructed once and shared by reference.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::envelope::EnvelopeCipher;
use crate::error::Result;
use crate::quota::QuotaTracker;

// == Gateway State ==
/// Shared cache, quota and cipher for every in-flight request.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Payload cache, shared with the background cleanup task
    pub cache: Arc<RwLock<CacheStore>>,
    pub quota: Arc<QuotaTracker>,
    pub cipher: Arc<EnvelopeCipher>,
}

impl GatewayState {
    pub fn new(cache: CacheStore, quota: QuotaTracker, cipher: EnvelopeCipher) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            quota: Arc::new(quota),
            cipher: Arc::new(cipher),
        }
    }

    /// Builds the state from configuration, registering every configured bucket.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut quota = QuotaTracker::new();
        for bucket in &config.buckets {
            quota.register(bucket.name.clone(), bucket.limit, bucket.window)?;
        }

        Ok(Self::new(
            CacheStore::new(config.default_ttl),
            quota,
            config.cipher.clone(),
        ))
    }
}
