//! API Module
//!
//! HTTP handlers and routing for the gateway.
//!
//! # Endpoints
//! - `GET /telugu/news`, `GET /telugutwo/news`, `GET /english/news` - Latest news per language
//! - `GET /search` - Free-text news search
//! - `GET /latestnewstelugu` - Andhra Jyothy category feed
//! - `GET /latestnewsenglish` - Combined top stories
//! - `GET /rate-limit` - Quota usage per bucket
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
