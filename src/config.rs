//! Configuration Module
//!
//! Loads gateway configuration from environment variables once at startup.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_TTL;
use crate::envelope::EnvelopeCipher;
use crate::error::{GatewayError, Result};
use crate::quota::{DEFAULT_LIMIT, DEFAULT_WINDOW};

/// Quota buckets, one per upstream source class.
pub const BUCKET_NAMES: [&str; 5] = ["telugu", "english", "search", "andhrajyothy", "thenewsapi"];

// == Bucket Config ==
/// Limits and cache lifetime for one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    pub name: String,
    /// Calls allowed per window
    pub limit: u32,
    /// Window length
    pub window: Duration,
    /// TTL for payloads fetched through this bucket
    pub cache_ttl: Duration,
}

// == Upstream Config ==
/// Credentials and endpoints of the news providers.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub telugu_key: Option<String>,
    pub telugu_two_key: Option<String>,
    pub english_key: Option<String>,
    pub search_key: Option<String>,
    pub thenewsapi_token: Option<String>,
    /// Country filter passed to newsdata.io
    pub country: String,
    pub newsdata_base_url: String,
    pub thenewsapi_base_url: String,
    pub andhrajyothy_base_url: String,
    /// Per-request timeout for upstream calls
    pub timeout: Duration,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let present = |key: &Option<String>| if key.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("UpstreamConfig")
            .field("telugu_key", &present(&self.telugu_key))
            .field("telugu_two_key", &present(&self.telugu_two_key))
            .field("english_key", &present(&self.english_key))
            .field("search_key", &present(&self.search_key))
            .field("thenewsapi_token", &present(&self.thenewsapi_token))
            .field("country", &self.country)
            .field("newsdata_base_url", &self.newsdata_base_url)
            .field("thenewsapi_base_url", &self.thenewsapi_base_url)
            .field("andhrajyothy_base_url", &self.andhrajyothy_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            telugu_key: None,
            telugu_two_key: None,
            english_key: None,
            search_key: None,
            thenewsapi_token: None,
            country: "in".to_string(),
            newsdata_base_url: "https://newsdata.io".to_string(),
            thenewsapi_base_url: "https://api.thenewsapi.com".to_string(),
            andhrajyothy_base_url: "https://www.andhrajyothy.com".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Gateway configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Envelope cipher built from `SECRET_KEY`
    pub cipher: EnvelopeCipher,
    /// HTTP server port
    pub server_port: u16,
    /// TTL for cache writes that don't come through a bucket
    pub default_ttl: Duration,
    /// Background cleanup interval
    pub cleanup_interval: Duration,
    /// One entry per name in [`BUCKET_NAMES`]
    pub buckets: Vec<BucketConfig>,
    pub upstream: UpstreamConfig,
}

impl Config {
    /// Creates a Config by reading process environment variables.
    ///
    /// # Environment Variables
    /// - `SECRET_KEY` - 32-byte envelope key, hex or base64 (required)
    /// - `SERVER_PORT` - HTTP server port (default: 3031)
    /// - `CACHE_TTL` - Default cache TTL in seconds (default: 43200)
    /// - `QUOTA_LIMIT` / `QUOTA_WINDOW` - Default calls per window and window seconds (30 / 900)
    /// - `QUOTA_LIMIT_<BUCKET>`, `QUOTA_WINDOW_<BUCKET>`, `CACHE_TTL_<BUCKET>` - Per-bucket overrides
    /// - `CLEANUP_INTERVAL` - Expired entry sweep frequency in seconds (default: 60)
    /// - `TELUGU`, `TELUGUTWO`, `ENGLISH`, `SEARCH` - newsdata.io API keys
    /// - `THENEWSAPI` - thenewsapi.com token
    /// - `NEWS_COUNTRY` - newsdata.io country filter (default: in)
    /// - `UPSTREAM_TIMEOUT` - Upstream request timeout in seconds (default: 15)
    /// - `NEWSDATA_BASE_URL`, `THENEWSAPI_BASE_URL`, `ANDHRAJYOTHY_BASE_URL` - Provider endpoints
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Creates a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let secret = var("SECRET_KEY").ok_or_else(|| {
            GatewayError::Configuration("SECRET_KEY must be set".to_string())
        })?;
        let cipher = EnvelopeCipher::from_encoded(&secret)?;

        let default_ttl = parse_var(&var, "CACHE_TTL")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);
        let default_limit = parse_var(&var, "QUOTA_LIMIT")?.unwrap_or(DEFAULT_LIMIT);
        let default_window = parse_var(&var, "QUOTA_WINDOW")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_WINDOW);

        let buckets = BUCKET_NAMES
            .iter()
            .map(|name| -> Result<BucketConfig> {
                let suffix = name.to_uppercase();
                Ok(BucketConfig {
                    name: name.to_string(),
                    limit: parse_var(&var, &format!("QUOTA_LIMIT_{}", suffix))?
                        .unwrap_or(default_limit),
                    window: parse_var(&var, &format!("QUOTA_WINDOW_{}", suffix))?
                        .map(Duration::from_secs)
                        .unwrap_or(default_window),
                    cache_ttl: parse_var(&var, &format!("CACHE_TTL_{}", suffix))?
                        .map(Duration::from_secs)
                        .unwrap_or(default_ttl),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let defaults = UpstreamConfig::default();
        let upstream = UpstreamConfig {
            telugu_key: var("TELUGU"),
            telugu_two_key: var("TELUGUTWO"),
            english_key: var("ENGLISH"),
            search_key: var("SEARCH"),
            thenewsapi_token: var("THENEWSAPI"),
            country: var("NEWS_COUNTRY").unwrap_or(defaults.country),
            newsdata_base_url: var("NEWSDATA_BASE_URL").unwrap_or(defaults.newsdata_base_url),
            thenewsapi_base_url: var("THENEWSAPI_BASE_URL")
                .unwrap_or(defaults.thenewsapi_base_url),
            andhrajyothy_base_url: var("ANDHRAJYOTHY_BASE_URL")
                .unwrap_or(defaults.andhrajyothy_base_url),
            timeout: parse_var(&var, "UPSTREAM_TIMEOUT")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        };

        let cleanup_interval = parse_var(&var, "CLEANUP_INTERVAL")?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));
        if cleanup_interval.is_zero() {
            return Err(GatewayError::Configuration(
                "CLEANUP_INTERVAL must be at least 1 second".to_string(),
            ));
        }

        Ok(Self {
            cipher,
            server_port: parse_var(&var, "SERVER_PORT")?.unwrap_or(3031),
            default_ttl,
            cleanup_interval,
            buckets,
            upstream,
        })
    }

    /// Bucket configuration by name.
    pub fn bucket(&self, name: &str) -> Option<&BucketConfig> {
        self.buckets.iter().find(|bucket| bucket.name == name)
    }
}

/// Parses an optional variable, treating an unparsable value as fatal.
fn parse_var<T, F>(var: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            GatewayError::Configuration(format!("{} has invalid value '{}'", name, raw))
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const HEX_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[("SECRET_KEY", HEX_KEY)]).unwrap();

        assert_eq!(config.server_port, 3031);
        assert_eq!(config.default_ttl, Duration::from_secs(43_200));
        assert_eq!(config.cleanup_interval, Duration::from_secs(60));
        assert_eq!(config.buckets.len(), BUCKET_NAMES.len());

        let search = config.bucket("search").unwrap();
        assert_eq!(search.limit, 30);
        assert_eq!(search.window, Duration::from_secs(900));
        assert_eq!(search.cache_ttl, Duration::from_secs(43_200));

        assert_eq!(config.upstream.country, "in");
        assert!(config.upstream.telugu_key.is_none());
    }

    #[test]
    fn test_missing_secret_key_is_fatal() {
        assert!(matches!(
            config_from(&[]),
            Err(GatewayError::Configuration(_))
        ));
        assert!(matches!(
            config_from(&[("SECRET_KEY", "  ")]),
            Err(GatewayError::Configuration(_))
        ));
    }

    #[test]
    fn test_malformed_secret_key_is_fatal() {
        assert!(matches!(
            config_from(&[("SECRET_KEY", "not-a-key")]),
            Err(GatewayError::Configuration(_))
        ));
    }

    #[test]
    fn test_per_bucket_overrides() {
        let config = config_from(&[
            ("SECRET_KEY", HEX_KEY),
            ("QUOTA_LIMIT", "10"),
            ("QUOTA_LIMIT_SEARCH", "5"),
            ("QUOTA_WINDOW_SEARCH", "60"),
            ("CACHE_TTL_THENEWSAPI", "600"),
        ])
        .unwrap();

        let search = config.bucket("search").unwrap();
        assert_eq!(search.limit, 5);
        assert_eq!(search.window, Duration::from_secs(60));

        assert_eq!(config.bucket("telugu").unwrap().limit, 10);
        assert_eq!(
            config.bucket("thenewsapi").unwrap().cache_ttl,
            Duration::from_secs(600)
        );
    }

    #[test]
    fn test_unparsable_number_is_fatal() {
        let result = config_from(&[("SECRET_KEY", HEX_KEY), ("QUOTA_LIMIT", "lots")]);
        assert!(matches!(result, Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_zero_cleanup_interval_is_fatal() {
        let result = config_from(&[("SECRET_KEY", HEX_KEY), ("CLEANUP_INTERVAL", "0")]);
        assert!(matches!(result, Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = config_from(&[("SECRET_KEY", HEX_KEY), ("TELUGU", "pub_abc123")]).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("pub_abc123"));
        assert!(!debug.contains(HEX_KEY));
    }
}
