use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the backend serving `/movies` and `/predict_custom`
    #[serde(default = "default_predictor_url")]
    pub predictor_url: String,

    /// Upper bound on a single predictor round trip, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Minimum number of rated movies before a prediction is allowed
    #[serde(default = "default_min_ratings")]
    pub min_ratings: usize,

    /// Maximum number of autocomplete suggestions returned
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_predictor_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_min_ratings() -> usize {
    3
}

fn default_suggestion_limit() -> usize {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            predictor_url: default_predictor_url(),
            request_timeout_secs: default_request_timeout_secs(),
            min_ratings: default_min_ratings(),
            suggestion_limit: default_suggestion_limit(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
