use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3/";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RESULTS: u32 = 12;

/// Límite de `maxResults` que acepta `search`
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// YouTube Data API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Both values the fetcher needs, validated once.
///
/// Build with [`YouTubeCredentials::from_parts`]; there is no way to get one
/// with an empty key or channel id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YouTubeCredentials {
    api_key: ApiKey,
    channel_id: String,
}

impl YouTubeCredentials {
    /// Trims both values; returns `None` if either is missing or blank.
    pub fn from_parts(api_key: Option<String>, channel_id: Option<String>) -> Option<Self> {
        let api_key = non_blank(api_key)?;
        let channel_id = non_blank(channel_id)?;

        Some(Self {
            api_key: ApiKey(api_key),
            channel_id,
        })
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct Config {
    // YouTube
    pub youtube_api_key: Option<ApiKey>,
    pub youtube_channel_id: Option<String>,
    pub api_base_url: String,

    // Caché
    pub cache_dir: PathBuf,
    pub cache_ttl: Duration,

    // Red
    pub http_timeout: Duration,
    pub max_results: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            // YouTube
            youtube_api_key: lookup("YOUTUBE_API_KEY").map(ApiKey),
            youtube_channel_id: lookup("YOUTUBE_CHANNEL_ID"),
            api_base_url: lookup("YOUTUBE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),

            // Caché
            cache_dir: lookup("CACHE_DIR")
                .unwrap_or_else(|| "./cache".to_string())
                .into(),
            cache_ttl: match lookup("CACHE_TTL") {
                Some(val) if !val.trim().is_empty() => humantime::parse_duration(val.trim())
                    .with_context(|| format!("CACHE_TTL inválido: {}", val))?,
                _ => DEFAULT_CACHE_TTL,
            },

            // Red
            http_timeout: match lookup("HTTP_TIMEOUT") {
                Some(val) if !val.trim().is_empty() => humantime::parse_duration(val.trim())
                    .with_context(|| format!("HTTP_TIMEOUT inválido: {}", val))?,
                _ => DEFAULT_HTTP_TIMEOUT,
            },
            max_results: match lookup("MAX_RESULTS") {
                Some(val) if !val.trim().is_empty() => val
                    .trim()
                    .parse()
                    .with_context(|| format!("MAX_RESULTS inválido: {}", val))?,
                _ => DEFAULT_MAX_RESULTS,
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validates configuration values for correctness.
    ///
    /// # Validation Rules
    ///
    /// - Cache TTL and HTTP timeout must be greater than zero
    /// - `max_results` must be within `1..=50`
    /// - The API base must be an absolute http(s) URL
    ///
    /// Missing credentials are not an error: the fetcher runs unconfigured
    /// and every fetch reports "unavailable".
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl.is_zero() {
            anyhow::bail!("Cache TTL must be greater than 0");
        }

        if self.http_timeout.is_zero() {
            anyhow::bail!("HTTP timeout must be greater than 0");
        }

        if self.max_results == 0 || self.max_results > MAX_RESULTS_LIMIT {
            anyhow::bail!(
                "Max results must be between 1 and {}, got: {}",
                MAX_RESULTS_LIMIT,
                self.max_results
            );
        }

        self.api_base()?;

        Ok(())
    }

    /// API root as a URL that resources can be joined onto.
    pub fn api_base(&self) -> Result<Url> {
        let mut raw = self.api_base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }

        let url = Url::parse(&raw).with_context(|| format!("Invalid API base URL: {}", raw))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("API base URL must be http(s), got: {}", url.scheme());
        }

        Ok(url)
    }

    pub fn credentials(&self) -> Option<YouTubeCredentials> {
        YouTubeCredentials::from_parts(
            self.youtube_api_key.as_ref().map(|key| key.as_str().to_string()),
            self.youtube_channel_id.clone(),
        )
    }

    /// Returns a summary of the current configuration for logging.
    ///
    /// The API key is never included, only whether it is set.
    pub fn summary(&self) -> String {
        format!(
            "Config Summary:\n  \
            YouTube: channel {} (credentials: {})\n  \
            API: {}\n  \
            Cache: {} (TTL {})\n  \
            Network: timeout {}, {} results per page",
            self.youtube_channel_id.as_deref().unwrap_or("<unset>"),
            if self.credentials().is_some() { "set" } else { "missing or incomplete" },
            self.api_base_url,
            self.cache_dir.display(),
            humantime::format_duration(self.cache_ttl),
            humantime::format_duration(self.http_timeout),
            self.max_results,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            youtube_channel_id: None,
            api_base_url: DEFAULT_API_BASE.to_string(),
            cache_dir: "./cache".into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}
