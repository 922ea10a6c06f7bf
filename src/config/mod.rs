use std::env;

use anyhow::{Context, Result};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub max_concurrent_requests: usize,
    pub request_timeout_seconds: u64,
    pub ollama_url: String,
    pub summarizer_model: String,
    pub matcher_model: String,
    pub audit_log_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Config {
            server_host: Self::string_env_var("SERVER_HOST", "0.0.0.0"),
            server_port: Self::parse_env_var("SERVER_PORT", 8080)
                .context("Failed to parse SERVER_PORT")?,
            max_file_size_mb: Self::parse_env_var("MAX_FILE_SIZE_MB", 10)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            max_concurrent_requests: Self::parse_env_var("MAX_CONCURRENT_REQUESTS", 100)
                .context("Failed to parse MAX_CONCURRENT_REQUESTS")?,
            request_timeout_seconds: Self::parse_env_var("REQUEST_TIMEOUT_SECONDS", 120)
                .context("Failed to parse REQUEST_TIMEOUT_SECONDS")?,
            ollama_url: Self::string_env_var("OLLAMA_URL", "http://127.0.0.1:11434"),
            summarizer_model: Self::string_env_var("SUMMARIZER_MODEL", "llama3.2:3b"),
            matcher_model: Self::string_env_var("MATCHER_MODEL", "gemma2:2b"),
            audit_log_path: Self::string_env_var("AUDIT_LOG_PATH", "logs/usage_logs.jsonl"),
        };

        config.validate()?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn string_env_var(var_name: &str, default: &str) -> String {
        env::var(var_name).unwrap_or_else(|_| {
            info!("{} not set, using default: {}", var_name, default);
            default.to_string()
        })
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!(
                        "Failed to parse {}: {} (using default: {:?})",
                        var_name, e, default
                    );
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_REQUESTS must be greater than 0"
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!(
                "REQUEST_TIMEOUT_SECONDS must be greater than 0"
            ));
        }
        if self.ollama_url.is_empty() {
            return Err(anyhow::anyhow!("OLLAMA_URL must not be empty"));
        }
        if self.summarizer_model.is_empty() || self.matcher_model.is_empty() {
            return Err(anyhow::anyhow!(
                "SUMMARIZER_MODEL and MATCHER_MODEL must not be empty"
            ));
        }
        if self.audit_log_path.is_empty() {
            return Err(anyhow::anyhow!("AUDIT_LOG_PATH must not be empty"));
        }
        Ok(())
    }
}
