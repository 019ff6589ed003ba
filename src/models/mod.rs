//! Request and Response models for the gateway HTTP API
//!
//! DTOs for query strings and JSON bodies of the routing layer.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CategoryParams, NewsParams, SearchParams};
pub use responses::{HealthResponse, StatsResponse};
