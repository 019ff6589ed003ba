//! News Gateway - caching, quota-enforcing and encrypting front for news providers
//!
//! Serves upstream payloads from a TTL cache when possible, spends a bounded
//! per-source call budget otherwise, and seals every response in an
//! AES-256-CBC envelope.

pub mod api;
pub mod cache;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod models;
pub mod quota;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use gateway::{GatewayState, RequestCoordinator};
pub use tasks::spawn_cleanup_task;
