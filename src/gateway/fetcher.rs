//! Fetcher seam between the coordinator and upstream providers.

use async_trait::async_trait;
use serde_json::Value;

// == Fetcher Trait ==
/// Retrieves the raw payload for one request from an upstream provider.
///
/// Implementations own their retry and timeout policy; the coordinator calls
/// `fetch` at most once per cache miss and never retries.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Value>;
}
