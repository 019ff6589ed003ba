//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: Sweeps expired cache entries at the configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
