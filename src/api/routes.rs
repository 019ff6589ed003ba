//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    english_news_handler, health_handler, latest_english_handler, latest_telugu_handler,
    rate_limit_handler, search_handler, stats_handler, telugu_news_handler,
    telugu_two_news_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, clients are browser apps on other hosts
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/telugu/news", get(telugu_news_handler))
        .route("/telugutwo/news", get(telugu_two_news_handler))
        .route("/english/news", get(english_news_handler))
        .route("/search", get(search_handler))
        .route("/latestnewstelugu", get(latest_telugu_handler))
        .route("/latestnewsenglish", get(latest_english_handler))
        .route("/rate-limit", get(rate_limit_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
