use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;

/// Application configuration with environment variable overrides
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream stats API
    /// Env: API_URL (default: "https://api.depscian.tech/v2")
    pub api_url: String,

    /// Upstream API key
    /// Env: API_KEY (optional; without it player lookups are rejected with
    /// a "not configured" message instead of going out unauthenticated)
    pub api_key: Option<String>,

    /// Upstream request timeout in seconds
    /// Env: REQUEST_TIMEOUT (default: 10)
    pub request_timeout: Duration,

    /// Minimum spacing between upstream requests in milliseconds
    /// Env: REQUEST_DELAY_MS (default: 500)
    pub request_delay: Duration,

    /// Keepalive endpoint port
    /// Env: PORT (default: 5000)
    pub port: u16,

    /// Discord bot token
    /// Env: DISCORD_TOKEN (required, checked at startup)
    pub discord_token: Option<String>,

    /// Telegram bot token
    /// Env: TELEGRAM_TOKEN (required, checked at startup)
    pub telegram_token: Option<String>,

    /// Discord command prefix
    /// Env: DISCORD_COMMAND_PREFIX (default: "!")
    pub discord_command_prefix: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let _ = dotenv(); //for debugging mostly
        Self {
            api_url: env_or_default_string("API_URL", "https://api.depscian.tech/v2"),
            api_key: var("API_KEY").ok().filter(|key| !key.is_empty()),
            request_timeout: Duration::from_secs(env_or_default("REQUEST_TIMEOUT", 10)),
            request_delay: Duration::from_millis(env_or_default("REQUEST_DELAY_MS", 500)),
            port: env_or_default("PORT", 5000),
            discord_token: var("DISCORD_TOKEN").ok().filter(|token| !token.is_empty()),
            telegram_token: var("TELEGRAM_TOKEN").ok().filter(|token| !token.is_empty()),
            discord_command_prefix: env_or_default_string("DISCORD_COMMAND_PREFIX", "!"),
        }
    }

    /// Create configuration with all default values
    pub fn default() -> Self {
        Self {
            api_url: "https://api.depscian.tech/v2".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            request_delay: Duration::from_millis(500),
            port: 5000,
            discord_token: None,
            telegram_token: None,
            discord_command_prefix: "!".to_string(),
        }
    }

    /// Client settings for the API crate.
    pub fn client_config(&self) -> saguaro_api::ClientConfig {
        saguaro_api::ClientConfig {
            base_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.request_timeout,
            request_delay: self.request_delay,
        }
    }
}

/// Parse environment variable or return default value
fn env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    var(key)
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or(default)
}

/// Parse environment variable string or return default value
fn env_or_default_string(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://api.depscian.tech/v2");
        assert!(config.api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.request_delay, Duration::from_millis(500));
        assert_eq!(config.port, 5000);
        assert!(config.discord_token.is_none());
        assert!(config.telegram_token.is_none());
        assert_eq!(config.discord_command_prefix, "!");
    }

    #[test]
    fn test_client_config_mirrors_fields() {
        let mut config = Config::default();
        config.api_url = "http://localhost:1234".to_string();
        config.api_key = Some("secret".to_string());
        config.request_timeout = Duration::from_secs(3);

        let client_config = config.client_config();
        assert_eq!(client_config.base_url, "http://localhost:1234");
        assert_eq!(client_config.api_key.as_deref(), Some("secret"));
        assert_eq!(client_config.timeout, Duration::from_secs(3));
        assert_eq!(client_config.request_delay, Duration::from_millis(500));
    }
}
