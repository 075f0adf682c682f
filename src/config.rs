use serde::Deserialize;
use std::time::Duration;

use crate::services::retry::RetryPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// OpenAI API key, used for both embeddings and explanations
    pub openai_api_key: String,

    /// Chroma Cloud token
    pub chroma_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// OpenAI API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Chroma API base URL
    #[serde(default = "default_chroma_url")]
    pub chroma_url: String,

    #[serde(default = "default_chroma_tenant")]
    pub chroma_tenant: String,

    #[serde(default = "default_chroma_database")]
    pub chroma_database: String,

    #[serde(default = "default_chroma_collection")]
    pub chroma_collection: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout for outbound HTTP calls
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: usize,

    #[serde(default = "default_retry_multiplier_ms")]
    pub retry_multiplier_ms: u64,

    #[serde(default = "default_retry_min_delay_ms")]
    pub retry_min_delay_ms: u64,

    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    /// The seeder runs unattended, so it retries harder than the server
    #[serde(default = "default_seed_max_attempts")]
    pub seed_max_attempts: usize,

    #[serde(default = "default_seed_multiplier_ms")]
    pub seed_multiplier_ms: u64,

    #[serde(default = "default_seed_max_delay_ms")]
    pub seed_max_delay_ms: u64,

    /// Pause between titles while seeding
    #[serde(default = "default_seed_pause_ms")]
    pub seed_pause_ms: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_chroma_url() -> String {
    "https://api.trychroma.com".to_string()
}

fn default_chroma_tenant() -> String {
    "5931c629-c2af-42da-b3c9-589bc968cc0a".to_string()
}

fn default_chroma_database() -> String {
    "movie".to_string()
}

fn default_chroma_collection() -> String {
    "movies".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_retry_max_attempts() -> usize {
    3
}

fn default_retry_multiplier_ms() -> u64 {
    1_000
}

fn default_retry_min_delay_ms() -> u64 {
    4_000
}

fn default_retry_max_delay_ms() -> u64 {
    10_000
}

fn default_seed_max_attempts() -> usize {
    7
}

fn default_seed_multiplier_ms() -> u64 {
    2_000
}

fn default_seed_max_delay_ms() -> u64 {
    30_000
}

fn default_seed_pause_ms() -> u64 {
    2_000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects blank API keys, which envy happily accepts
    pub fn validate(&self) -> anyhow::Result<()> {
        let keys = [
            ("TMDB_API_KEY", &self.tmdb_api_key),
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("CHROMA_API_KEY", &self.chroma_api_key),
        ];

        let missing: Vec<&str> = keys
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Retry policy for calls made while serving requests
    pub fn request_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_multiplier_ms),
            Duration::from_millis(self.retry_min_delay_ms),
            Duration::from_millis(self.retry_max_delay_ms),
        )
    }

    /// Retry policy for the batch seeder
    pub fn seed_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.seed_max_attempts,
            Duration::from_millis(self.seed_multiplier_ms),
            Duration::from_millis(self.retry_min_delay_ms),
            Duration::from_millis(self.seed_max_delay_ms),
        )
    }
}
