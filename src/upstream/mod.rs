//! Upstream Module
//!
//! HTTP clients for the news providers behind the gateway. Each request type
//! implements [`Fetcher`](crate::gateway::Fetcher) so the coordinator can
//! invoke it on a cache miss.

mod andhrajyothy;
mod newsdata;
mod thenewsapi;

pub use andhrajyothy::{AndhraJyothyClient, CategoryFetch};
pub use newsdata::{NewsDataClient, NewsDataFetch};
pub use thenewsapi::{TheNewsApiClient, TopStoriesFetch};

use anyhow::Context;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::error::{GatewayError, Result};

// == Upstream Clients ==
/// One client per provider, all sharing a single connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClients {
    pub newsdata: NewsDataClient,
    pub thenewsapi: TheNewsApiClient,
    pub andhrajyothy: AndhraJyothyClient,
}

impl UpstreamClients {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("news_gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| {
                GatewayError::Configuration(format!("Failed to build HTTP client: {}", err))
            })?;

        Ok(Self {
            newsdata: NewsDataClient::new(
                http.clone(),
                &config.newsdata_base_url,
                &config.country,
            ),
            thenewsapi: TheNewsApiClient::new(http.clone(), &config.thenewsapi_base_url),
            andhrajyothy: AndhraJyothyClient::new(http, &config.andhrajyothy_base_url),
        })
    }
}

/// Sends the request and decodes a JSON body, treating non-2xx as an error.
async fn get_json(request: reqwest::RequestBuilder, source: &str) -> anyhow::Result<Value> {
    let response = request
        .send()
        .await
        .with_context(|| format!("{} request failed", source))?
        .error_for_status()
        .with_context(|| format!("{} returned an error status", source))?;

    response
        .json::<Value>()
        .await
        .with_context(|| format!("{} returned a non-JSON body", source))
}

fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
