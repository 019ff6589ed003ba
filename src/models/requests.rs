//! Request DTOs for the gateway API
//!
//! Query string parameters of the news routes.

use serde::Deserialize;

/// Default language for `/search`
pub const DEFAULT_SEARCH_LANGUAGE: &str = "te";

/// Default Andhra Jyothy category
pub const DEFAULT_CATEGORY_ID: u32 = 1;

/// Query for the per-language news routes (`GET /<source>/news`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsParams {
    /// Upstream next-page token
    #[serde(default)]
    pub page: Option<String>,
}

impl NewsParams {
    pub fn page(&self) -> Option<&str> {
        non_empty(&self.page)
    }
}

/// Query for `GET /search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text search terms (required)
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

impl SearchParams {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.query().is_none() {
            return Some("Query parameter 'q' is required".to_string());
        }
        None
    }

    pub fn query(&self) -> Option<&str> {
        non_empty(&self.q)
    }

    pub fn language(&self) -> &str {
        non_empty(&self.language).unwrap_or(DEFAULT_SEARCH_LANGUAGE)
    }

    pub fn category(&self) -> Option<&str> {
        non_empty(&self.category)
    }

    pub fn page(&self) -> Option<&str> {
        non_empty(&self.page)
    }
}

/// Query for `GET /latestnewstelugu`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryParams {
    #[serde(default, rename = "categoryId")]
    pub category_id: Option<u32>,
}

impl CategoryParams {
    pub fn category_id(&self) -> u32 {
        self.category_id.unwrap_or(DEFAULT_CATEGORY_ID)
    }
}

/// Empty or blank parameters count as absent.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
