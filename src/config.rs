use std::env;

use chrono::Duration;
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api";

#[derive(Clone, Debug)]
pub struct Config {
    pub backend_url: String,
    pub bind_addr: String,
    pub secure_cookies: bool,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let backend_url = var("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        // Fail at startup rather than on the first request.
        Url::parse(&backend_url)?;

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let secure_cookies = var("SECURE_COOKIES")
            .and_then(|s| s.parse::<bool>().ok())
            .unwrap_or(false);
        let session_ttl_hours = var("SESSION_TTL_HOURS")
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(24);

        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            bind_addr,
            secure_cookies,
            session_ttl_hours,
        })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }
}
