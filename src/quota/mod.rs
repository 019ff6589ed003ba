//! Quota Module
//!
//! Fixed-window call budgets for upstream sources, one bucket per source class.

mod bucket;
mod tracker;

pub use bucket::{QuotaBucket, QuotaDecision, QuotaSnapshot};
pub use tracker::{BucketHandle, QuotaTracker};

use std::time::Duration;

// == Public Constants ==
/// Default calls allowed per window
pub const DEFAULT_LIMIT: u32 = 30;

/// Default window length (15 minutes)
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);
