//! Quota Tracker Module
//!
//! Registry of named quota buckets shared by every in-flight request.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::error::{GatewayError, Result};
use crate::quota::{QuotaBucket, QuotaDecision, QuotaSnapshot};

// == Bucket Handle ==
/// Shared, cheaply clonable reference to one registered bucket.
///
/// Handles are resolved once while wiring routes, so the request path never
/// looks a bucket up by name.
#[derive(Debug, Clone)]
pub struct BucketHandle {
    inner: Arc<NamedBucket>,
}

#[derive(Debug)]
struct NamedBucket {
    name: String,
    bucket: Mutex<QuotaBucket>,
}

impl BucketHandle {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    // == Try Acquire ==
    /// Atomically expires, checks and charges the bucket.
    ///
    /// The whole sequence runs under the bucket's lock, so two callers can
    /// never both pass the gate on the last unit of budget.
    pub fn try_acquire(&self) -> QuotaDecision {
        let decision = self.lock().try_acquire(Instant::now());
        debug!(bucket = %self.inner.name, ?decision, "quota check");
        decision
    }

    pub fn snapshot(&self) -> QuotaSnapshot {
        self.lock().snapshot(Instant::now())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QuotaBucket> {
        // Bucket state is two plain fields, always consistent between statements
        self.inner
            .bucket
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// == Quota Tracker ==
/// Holds every bucket known to the gateway.
///
/// The set of buckets is fixed once wiring is done; only the per-bucket
/// counters change afterwards.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    buckets: HashMap<String, BucketHandle>,
}

impl QuotaTracker {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Adds an idle bucket.
    ///
    /// Rejects empty names, duplicate names, a zero limit and a zero window.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        limit: u32,
        window: Duration,
    ) -> Result<BucketHandle> {
        let name = name.into();

        if name.is_empty() {
            return Err(GatewayError::Configuration(
                "Quota bucket name cannot be empty".to_string(),
            ));
        }
        if self.buckets.contains_key(&name) {
            return Err(GatewayError::Configuration(format!(
                "Quota bucket '{}' is defined twice",
                name
            )));
        }
        if limit == 0 {
            return Err(GatewayError::Configuration(format!(
                "Quota bucket '{}' must allow at least one call per window",
                name
            )));
        }
        if window.is_zero() {
            return Err(GatewayError::Configuration(format!(
                "Quota bucket '{}' must have a non-zero window",
                name
            )));
        }

        let handle = BucketHandle {
            inner: Arc::new(NamedBucket {
                name: name.clone(),
                bucket: Mutex::new(QuotaBucket::new(limit, window)),
            }),
        };
        self.buckets.insert(name, handle.clone());
        Ok(handle)
    }

    // == Bucket Lookup ==
    /// Resolves a bucket by name; unknown names are a configuration error.
    pub fn bucket(&self, name: &str) -> Result<BucketHandle> {
        self.buckets.get(name).cloned().ok_or_else(|| {
            GatewayError::Configuration(format!("Unknown quota bucket '{}'", name))
        })
    }

    pub fn try_acquire(&self, bucket: &BucketHandle) -> QuotaDecision {
        bucket.try_acquire()
    }

    pub fn snapshot(&self, name: &str) -> Option<QuotaSnapshot> {
        self.buckets.get(name).map(BucketHandle::snapshot)
    }

    // == Diagnostics ==
    /// Snapshots the named buckets, keyed by name.
    pub fn diagnostics<S: AsRef<str>>(&self, names: &[S]) -> Result<BTreeMap<String, QuotaSnapshot>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Ok((name.to_string(), self.bucket(name)?.snapshot()))
            })
            .collect()
    }

    /// Registered bucket names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.buckets.keys().cloned().collect();
        names.sort();
        names
    }
}
