use chrono::Duration as TtlDuration;
use eyre::{Result, eyre};
use std::env;
use std::time::Duration;
use uuid::Uuid;

/// Settings for talking to the Catalyst API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash
    pub api_url: String,
    /// Sent as `X-User-Id` on every request
    pub user_id: Uuid,
    pub request_timeout_seconds: u64,
    pub cache_ttl_seconds: i64,
}

impl ClientConfig {
    /// Defaults: 30 second requests, five minute cache.
    pub fn new(api_url: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            user_id,
            request_timeout_seconds: 30,
            cache_ttl_seconds: 300,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("CATALYST_API_URL")
            .map_err(|_| eyre!("CATALYST_API_URL environment variable not set"))?;

        let user_id = env::var("CATALYST_USER_ID")
            .map_err(|_| eyre!("CATALYST_USER_ID environment variable not set"))?
            .parse::<Uuid>()
            .map_err(|_| eyre!("CATALYST_USER_ID must be a valid UUID"))?;

        let mut config = Self::new(api_url, user_id);

        if let Some(timeout) = env::var("CATALYST_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.request_timeout_seconds = timeout;
        }

        if let Some(ttl) = env::var("CATALYST_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
        {
            config.cache_ttl_seconds = ttl;
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn cache_ttl(&self) -> TtlDuration {
        TtlDuration::seconds(self.cache_ttl_seconds)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}
