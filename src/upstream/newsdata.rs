//! newsdata.io "latest news" client.

use async_trait::async_trait;
use serde_json::Value;

use super::{get_json, trim_base_url};
use crate::gateway::Fetcher;

#[derive(Debug, Clone)]
pub struct NewsDataClient {
    http: reqwest::Client,
    base_url: String,
    country: String,
}

impl NewsDataClient {
    pub fn new(http: reqwest::Client, base_url: &str, country: &str) -> Self {
        Self {
            http,
            base_url: trim_base_url(base_url),
            country: country.to_string(),
        }
    }

    /// Fetches `/api/1/latest` with duplicate removal enabled.
    ///
    /// `page` is newsdata's opaque next-page token.
    pub async fn latest(
        &self,
        api_key: &str,
        language: &str,
        query: Option<&str>,
        category: Option<&str>,
        page: Option<&str>,
    ) -> anyhow::Result<Value> {
        let mut params: Vec<(&str, &str)> = vec![
            ("apikey", api_key),
            ("language", language),
            ("country", self.country.as_str()),
            ("removeduplicate", "1"),
        ];
        params.extend(
            [("q", query), ("category", category), ("page", page)]
                .into_iter()
                .filter_map(|(name, value)| value.map(|value| (name, value))),
        );

        let request = self
            .http
            .get(format!("{}/api/1/latest", self.base_url))
            .query(&params);
        get_json(request, "newsdata.io").await
    }
}

// == Fetch Request ==
/// One newsdata.io request bound to the API key of its route.
#[derive(Debug, Clone)]
pub struct NewsDataFetch {
    pub client: NewsDataClient,
    /// Route the key belongs to, for error messages
    pub route: &'static str,
    pub api_key: Option<String>,
    pub language: String,
    pub query: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

#[async_trait]
impl Fetcher for NewsDataFetch {
    async fn fetch(&self) -> anyhow::Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no newsdata.io API key configured for {}", self.route))?;

        self.client
            .latest(
                api_key,
                &self.language,
                self.query.as_deref(),
                self.category.as_deref(),
                self.page.as_deref(),
            )
            .await
    }
}
