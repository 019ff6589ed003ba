//! thenewsapi.com top stories client.

use async_trait::async_trait;
use futures::future::try_join_all;
use serde_json::Value;

use super::{get_json, trim_base_url};
use crate::gateway::Fetcher;

/// Pages combined into one response
const TOP_STORY_PAGES: [u32; 3] = [1, 2, 3];

/// Articles requested per page
const ARTICLES_PER_PAGE: u32 = 3;

#[derive(Debug, Clone)]
pub struct TheNewsApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl TheNewsApiClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base_url(base_url),
        }
    }

    /// Returns the `data` array of one `/v1/news/top` page.
    pub async fn top_page(&self, token: &str, locale: &str, page: u32) -> anyhow::Result<Vec<Value>> {
        let request = self
            .http
            .get(format!("{}/v1/news/top", self.base_url))
            .query(&[
                ("api_token", token.to_string()),
                ("locale", locale.to_string()),
                ("limit", ARTICLES_PER_PAGE.to_string()),
                ("page", page.to_string()),
            ]);

        match get_json(request, "thenewsapi.com").await? {
            Value::Object(mut body) => match body.remove("data") {
                Some(Value::Array(articles)) => Ok(articles),
                _ => anyhow::bail!("thenewsapi.com page {} has no data array", page),
            },
            _ => anyhow::bail!("thenewsapi.com page {} is not a JSON object", page),
        }
    }

    /// Fetches the first pages concurrently and concatenates their articles.
    pub async fn top_stories(&self, token: &str, locale: &str) -> anyhow::Result<Value> {
        let pages = try_join_all(
            TOP_STORY_PAGES
                .iter()
                .map(|page| self.top_page(token, locale, *page)),
        )
        .await?;

        Ok(Value::Array(pages.into_iter().flatten().collect()))
    }
}

// == Fetch Request ==
#[derive(Debug, Clone)]
pub struct TopStoriesFetch {
    pub client: TheNewsApiClient,
    pub token: Option<String>,
    pub locale: String,
}

#[async_trait]
impl Fetcher for TopStoriesFetch {
    async fn fetch(&self) -> anyhow::Result<Value> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no thenewsapi.com token configured"))?;

        self.client.top_stories(token, &self.locale).await
    }
}
