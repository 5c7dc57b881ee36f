//! Client configuration

use std::time::Duration;

/// Default backend URL
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Client configuration for connecting to the WorkExpress backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORKEXPRESS_API_URL | http://localhost:3001 | backend base URL |
/// | WORKEXPRESS_TIMEOUT_SECS | 30 | per-request timeout |
/// | WORKEXPRESS_TOKEN | (unset) | bearer token |
/// | WORKEXPRESS_SEARCH_DEBOUNCE_MS | 200 | client filter debounce |
/// | WORKEXPRESS_RECENT_SEARCHES | 5 | recent-search capacity |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "https://api.workexpress.example")
    pub base_url: String,

    /// Bearer token for authenticated calls
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Debounce for client-directory filtering
    pub search_debounce: Duration,

    /// How many recent searches to keep
    pub recent_searches: usize,
}

impl ClientConfig {
    /// Create a configuration with defaults, without reading the environment
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            search_debounce: Duration::from_millis(200),
            recent_searches: 5,
        }
    }

    /// Load configuration from the environment (and `.env` if present)
    pub fn from_env() -> Self {
        if dotenv::dotenv().is_err() {
            tracing::debug!("No .env file found, using process environment");
        }

        let defaults = Self::new(DEFAULT_API_URL);
        Self {
            base_url: std::env::var("WORKEXPRESS_API_URL").unwrap_or(defaults.base_url),
            token: std::env::var("WORKEXPRESS_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            timeout: parse_env("WORKEXPRESS_TIMEOUT_SECS").unwrap_or(defaults.timeout),
            search_debounce: parse_env("WORKEXPRESS_SEARCH_DEBOUNCE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce),
            recent_searches: parse_env("WORKEXPRESS_RECENT_SEARCHES")
                .unwrap_or(defaults.recent_searches),
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the client-directory filter debounce
    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    /// Set the recent-search capacity
    pub fn with_recent_searches(mut self, capacity: usize) -> Self {
        self.recent_searches = capacity;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable environment value");
            None
        }
    }
}
