use serde::Deserialize;
use std::env;

use crate::constants::{DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_TIMEOUT_SECS};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Generative model
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_url: String,
    pub gemini_timeout_secs: u64,

    // Price history feed
    pub price_api_url: String,

    // Balance lookup
    pub ethereum_rpc_url: Option<String>,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            gemini_api_key: env::var("FLASH_API_KEY")
                .map_err(|_| anyhow::anyhow!("FLASH_API_KEY not set"))?,
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_url: env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),
            gemini_timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_GEMINI_TIMEOUT_SECS.to_string())
                .parse()?,

            price_api_url: env::var("PRICE_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000/api".to_string()),

            ethereum_rpc_url: env::var("ETHEREUM_RPC_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.gemini_api_key.trim().is_empty() {
            anyhow::bail!("FLASH_API_KEY is empty");
        }
        if self.gemini_model.trim().is_empty() {
            anyhow::bail!("GEMINI_MODEL is empty");
        }
        if self.gemini_api_url.trim().is_empty() {
            anyhow::bail!("GEMINI_API_URL is empty");
        }
        if self.gemini_timeout_secs == 0 {
            anyhow::bail!("GEMINI_TIMEOUT_SECS must be > 0");
        }
        if self.price_api_url.trim().is_empty() {
            anyhow::bail!("PRICE_API_URL is empty");
        }

        if self.ethereum_rpc_url.is_none() {
            tracing::warn!("ETHEREUM_RPC_URL not set; balance checks are disabled");
        }

        let cors = self.cors_allowed_origins.trim();
        if cors.is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        } else if cors == "*" && self.is_production() {
            tracing::warn!("Permissive CORS enabled in production");
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.trim().to_ascii_lowercase().as_str(),
            "production" | "prod" | "mainnet"
        )
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        environment: "test".to_string(),
        gemini_api_key: "test-key".to_string(),
        gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
        gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
        gemini_timeout_secs: DEFAULT_GEMINI_TIMEOUT_SECS,
        price_api_url: "http://localhost:3000/api".to_string(),
        ethereum_rpc_url: None,
        cors_allowed_origins: "*".to_string(),
    }
}
