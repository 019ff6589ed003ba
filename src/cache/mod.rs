//! Cache Module
//!
//! Time-bounded in-memory storage for upstream JSON payloads.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

use std::time::Duration;

// == Public Constants ==
/// Default time-to-live for cached payloads (12 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(43_200);
