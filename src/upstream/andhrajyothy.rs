//! Andhra Jyothy category feed client.

use async_trait::async_trait;
use serde_json::Value;

use super::{get_json, trim_base_url};
use crate::gateway::Fetcher;

#[derive(Debug, Clone)]
pub struct AndhraJyothyClient {
    http: reqwest::Client,
    base_url: String,
}

impl AndhraJyothyClient {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: trim_base_url(base_url),
        }
    }

    /// Fetches the article list of one CMS category.
    pub async fn category(&self, category_id: u32) -> anyhow::Result<Value> {
        let request = self
            .http
            .get(format!("{}/cms/articles/category/{}", self.base_url, category_id));
        get_json(request, "andhrajyothy.com").await
    }
}

#[derive(Debug, Clone)]
pub struct CategoryFetch {
    pub client: AndhraJyothyClient,
    pub category_id: u32,
}

#[async_trait]
impl Fetcher for CategoryFetch {
    async fn fetch(&self) -> anyhow::Result<Value> {
        self.client.category(self.category_id).await
    }
}
