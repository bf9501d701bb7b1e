//! Configuration module for the MindWell backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default OpenAI-compatible endpoint of the completion provider.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default chat model requested from the provider.
pub const DEFAULT_LLM_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Seed new users with generated sample data
    pub seed_sample_data: bool,
    /// Upstream completion API settings
    pub llm: LlmConfig,
}

/// Settings for the upstream chat completion API.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5174);

        let host = env::var("MINDWELL_BIND_HOST")
            .ok()
            .and_then(|h| h.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        let db_path = env::var("MINDWELL_DB_PATH")
            .unwrap_or_else(|_| "./data/mindwell.sqlite".to_string())
            .into();

        let log_level = env::var("MINDWELL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let seed_sample_data = env::var("MINDWELL_SEED_SAMPLE_DATA")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let llm = LlmConfig {
            api_key: env::var("GROQ_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            base_url: env::var("MINDWELL_LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            model: env::var("MINDWELL_LLM_MODEL")
                .unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
        };

        Self {
            bind_addr: SocketAddr::new(host, port),
            db_path,
            log_level,
            seed_sample_data,
            llm,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("PORT");
        env::remove_var("MINDWELL_BIND_HOST");
        env::remove_var("MINDWELL_DB_PATH");
        env::remove_var("MINDWELL_LOG_LEVEL");
        env::remove_var("MINDWELL_SEED_SAMPLE_DATA");
        env::remove_var("MINDWELL_LLM_BASE_URL");
        env::remove_var("MINDWELL_LLM_MODEL");

        let config = Config::from_env();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5174");
        assert_eq!(config.db_path, PathBuf::from("./data/mindwell.sqlite"));
        assert_eq!(config.log_level, "info");
        assert!(config.seed_sample_data);
        assert_eq!(config.llm.base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.llm.model, DEFAULT_LLM_MODEL);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
        assert!(!parse_flag("0"));
    }
}
