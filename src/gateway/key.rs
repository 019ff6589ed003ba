//! Cache key construction from a request's semantic identity.

use std::fmt;

// == Request Identity ==
/// The parameters that make two requests interchangeable for caching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RequestIdentity {
    /// Source route, e.g. `telugu` or `search`
    pub route: String,
    pub language: Option<String>,
    pub query: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

impl RequestIdentity {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            ..Self::default()
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn query(mut self, query: Option<impl Into<String>>) -> Self {
        self.query = query.map(Into::into);
        self
    }

    pub fn category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = category.map(Into::into);
        self
    }

    pub fn page(mut self, page: Option<impl Into<String>>) -> Self {
        self.page = page.map(Into::into);
        self
    }
}

// == Cache Key ==
/// Injective string encoding of a [`RequestIdentity`].
///
/// Format: `route=<r>[|lang=<l>][|q=<q>][|cat=<c>][|page=<p>]`. Absent
/// fields are omitted and `%`/`|` inside values are percent-escaped, so every
/// distinct identity maps to a distinct key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&RequestIdentity> for CacheKey {
    fn from(identity: &RequestIdentity) -> Self {
        let mut key = format!("route={}", escape(&identity.route));

        let optional = [
            ("lang", &identity.language),
            ("q", &identity.query),
            ("cat", &identity.category),
            ("page", &identity.page),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                key.push('|');
                key.push_str(name);
                key.push('=');
                key.push_str(&escape(value));
            }
        }

        CacheKey(key)
    }
}

impl From<RequestIdentity> for CacheKey {
    fn from(identity: RequestIdentity) -> Self {
        CacheKey::from(&identity)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(value: &str) -> String {
    value.replace('%', "%25").replace('|', "%7C")
}
