//! Configuration loading from environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use mailbox_types::PostCatalog;

/// Largest accepted rate-limit window: one day.
pub const MAX_RATE_LIMIT_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub nextauth_secret: String,
    pub access_token_secret: String,
    pub session_cookie_name: String,
    pub service_api_url: String,
    pub service_api_key: Option<String>,
    pub service_api_timeout: Duration,
    pub rate_limit_requests: u32,
    pub rate_limit_window: Duration,
    pub blog_data_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, treating empty values as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = get("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid port number")?;

        let nextauth_secret = get("NEXTAUTH_SECRET")
            .ok_or_else(|| anyhow::anyhow!("NEXTAUTH_SECRET environment variable is required"))?;
        let access_token_secret =
            get("ACCESS_TOKEN_SECRET").unwrap_or_else(|| nextauth_secret.clone());
        let session_cookie_name = get("SESSION_COOKIE_NAME")
            .unwrap_or_else(|| mailbox_auth::DEFAULT_SESSION_COOKIE.to_string());

        let service_api_url = get("SERVICE_API_URL")
            .ok_or_else(|| anyhow::anyhow!("SERVICE_API_URL environment variable is required"))?;
        let service_api_key = get("SERVICE_API_KEY");
        let service_api_timeout = match get("SERVICE_API_TIMEOUT_SECS") {
            Some(v) => {
                let secs: u64 = v
                    .parse()
                    .context("SERVICE_API_TIMEOUT_SECS must be a whole number of seconds")?;
                if secs == 0 {
                    anyhow::bail!("SERVICE_API_TIMEOUT_SECS must be at least 1");
                }
                Duration::from_secs(secs)
            }
            None => mailbox_upstream::DEFAULT_TIMEOUT,
        };

        let rate_limit_requests: u32 = get("RATE_LIMIT_REQUESTS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("RATE_LIMIT_REQUESTS must be a positive integer")?;
        if rate_limit_requests == 0 {
            anyhow::bail!("RATE_LIMIT_REQUESTS must be at least 1");
        }
        let window_secs: u64 = get("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .context("RATE_LIMIT_WINDOW_SECS must be a positive integer")?;
        if !(1..=MAX_RATE_LIMIT_WINDOW_SECS).contains(&window_secs) {
            anyhow::bail!(
                "RATE_LIMIT_WINDOW_SECS must be between 1 and {}",
                MAX_RATE_LIMIT_WINDOW_SECS
            );
        }

        Ok(Self {
            port,
            nextauth_secret,
            access_token_secret,
            session_cookie_name,
            service_api_url,
            service_api_key,
            service_api_timeout,
            rate_limit_requests,
            rate_limit_window: Duration::from_secs(window_secs),
            blog_data_path: get("BLOG_DATA_PATH").map(PathBuf::from),
        })
    }

    /// Reads the blog manifest once. No path means an empty catalog.
    pub fn load_posts(&self) -> anyhow::Result<PostCatalog> {
        let Some(path) = &self.blog_data_path else {
            return Ok(PostCatalog::default());
        };
        let manifest = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read blog data from {}", path.display()))?;
        PostCatalog::from_json(&manifest)
            .with_context(|| format!("invalid blog manifest at {}", path.display()))
    }
}
