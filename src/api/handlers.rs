//! API Handlers
//!
//! HTTP request handlers mapping each route to a fetcher, cache key and
//! quota bucket.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::config::{Config, UpstreamConfig, BUCKET_NAMES};
use crate::envelope::EncryptedEnvelope;
use crate::error::{GatewayError, Result};
use crate::gateway::{CacheKey, Fetcher, GatewayState, RequestCoordinator, RequestIdentity};
use crate::models::{CategoryParams, HealthResponse, NewsParams, SearchParams, StatsResponse};
use crate::quota::{BucketHandle, QuotaSnapshot};
use crate::upstream::{CategoryFetch, NewsDataFetch, TopStoriesFetch, UpstreamClients};

/// Locale requested from thenewsapi.com
const TOP_STORIES_LOCALE: &str = "in";

// == Route Policy ==
/// Quota bucket and cache lifetime applied to one route.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    pub bucket: BucketHandle,
    pub ttl: Duration,
}

impl RoutePolicy {
    fn resolve(state: &GatewayState, config: &Config, name: &str) -> Result<Self> {
        let ttl = config
            .bucket(name)
            .map(|bucket| bucket.cache_ttl)
            .unwrap_or(config.default_ttl);

        Ok(Self {
            bucket: state.quota.bucket(name)?,
            ttl,
        })
    }
}

// == Sources ==
/// Upstream clients, credentials and per-route policies.
#[derive(Debug)]
pub struct Sources {
    pub clients: UpstreamClients,
    pub credentials: UpstreamConfig,
    pub telugu: RoutePolicy,
    pub english: RoutePolicy,
    pub search: RoutePolicy,
    pub andhrajyothy: RoutePolicy,
    pub thenewsapi: RoutePolicy,
}

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: RequestCoordinator,
    pub sources: Arc<Sources>,
}

impl AppState {
    /// Wires the gateway and every route from configuration.
    ///
    /// Fails if a route names a bucket the quota tracker doesn't know.
    pub fn from_config(config: &Config) -> Result<Self> {
        let state = GatewayState::from_config(config)?;

        let sources = Sources {
            clients: UpstreamClients::from_config(&config.upstream)?,
            credentials: config.upstream.clone(),
            telugu: RoutePolicy::resolve(&state, config, "telugu")?,
            english: RoutePolicy::resolve(&state, config, "english")?,
            search: RoutePolicy::resolve(&state, config, "search")?,
            andhrajyothy: RoutePolicy::resolve(&state, config, "andhrajyothy")?,
            thenewsapi: RoutePolicy::resolve(&state, config, "thenewsapi")?,
        };

        Ok(Self {
            gateway: RequestCoordinator::new(state),
            sources: Arc::new(sources),
        })
    }

    async fn serve(
        &self,
        policy: &RoutePolicy,
        identity: RequestIdentity,
        fetcher: &dyn Fetcher,
    ) -> Result<Json<EncryptedEnvelope>> {
        let key = CacheKey::from(identity);
        let envelope = self
            .gateway
            .serve(&policy.bucket, &key, policy.ttl, fetcher)
            .await?;
        Ok(Json(envelope))
    }

    async fn serve_latest_news(
        &self,
        route: &'static str,
        api_key: &Option<String>,
        policy: &RoutePolicy,
        language: &str,
        params: &NewsParams,
    ) -> Result<Json<EncryptedEnvelope>> {
        let identity = RequestIdentity::new(route)
            .language(language)
            .page(params.page());
        let fetcher = NewsDataFetch {
            client: self.sources.clients.newsdata.clone(),
            route,
            api_key: api_key.clone(),
            language: language.to_string(),
            query: None,
            category: None,
            page: params.page().map(str::to_string),
        };

        self.serve(policy, identity, &fetcher).await
    }
}

/// Handler for GET /telugu/news
pub async fn telugu_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<EncryptedEnvelope>> {
    let sources = Arc::clone(&state.sources);
    state
        .serve_latest_news("telugu", &sources.credentials.telugu_key, &sources.telugu, "te", &params)
        .await
}

/// Handler for GET /telugutwo/news
///
/// Second Telugu key, charged to the same bucket as `/telugu/news`.
pub async fn telugu_two_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<EncryptedEnvelope>> {
    let sources = Arc::clone(&state.sources);
    state
        .serve_latest_news(
            "telugutwo",
            &sources.credentials.telugu_two_key,
            &sources.telugu,
            "te",
            &params,
        )
        .await
}

/// Handler for GET /english/news
pub async fn english_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<EncryptedEnvelope>> {
    let sources = Arc::clone(&state.sources);
    state
        .serve_latest_news("english", &sources.credentials.english_key, &sources.english, "en", &params)
        .await
}

/// Handler for GET /search
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<EncryptedEnvelope>> {
    if let Some(error_msg) = params.validate() {
        return Err(GatewayError::InvalidRequest(error_msg));
    }

    let sources = &state.sources;
    let identity = RequestIdentity::new("search")
        .language(params.language())
        .query(params.query())
        .category(params.category())
        .page(params.page());
    let fetcher = NewsDataFetch {
        client: sources.clients.newsdata.clone(),
        route: "search",
        api_key: sources.credentials.search_key.clone(),
        language: params.language().to_string(),
        query: params.query().map(str::to_string),
        category: params.category().map(str::to_string),
        page: params.page().map(str::to_string),
    };

    state.serve(&sources.search, identity, &fetcher).await
}

/// Handler for GET /latestnewstelugu
pub async fn latest_telugu_handler(
    State(state): State<AppState>,
    Query(params): Query<CategoryParams>,
) -> Result<Json<EncryptedEnvelope>> {
    let sources = &state.sources;
    let category_id = params.category_id();
    let identity =
        RequestIdentity::new("latestnewstelugu").category(Some(category_id.to_string()));
    let fetcher = CategoryFetch {
        client: sources.clients.andhrajyothy.clone(),
        category_id,
    };

    state.serve(&sources.andhrajyothy, identity, &fetcher).await
}

/// Handler for GET /latestnewsenglish
pub async fn latest_english_handler(
    State(state): State<AppState>,
) -> Result<Json<EncryptedEnvelope>> {
    let sources = &state.sources;
    let identity = RequestIdentity::new("latestnewsenglish").language(TOP_STORIES_LOCALE);
    let fetcher = TopStoriesFetch {
        client: sources.clients.thenewsapi.clone(),
        token: sources.credentials.thenewsapi_token.clone(),
        locale: TOP_STORIES_LOCALE.to_string(),
    };

    state.serve(&sources.thenewsapi, identity, &fetcher).await
}

/// Handler for GET /rate-limit
///
/// Quota usage of every bucket.
pub async fn rate_limit_handler(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, QuotaSnapshot>>> {
    Ok(Json(state.gateway.diagnostics(&BUCKET_NAMES)?))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.gateway.cache_stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
