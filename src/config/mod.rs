use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const ENV_PREFIX: &str = "DLVERY";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_ms: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: 15_000,
            retry_attempts: 1,
            retry_delay_ms: 1_000,
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Load defaults, then `.env`, then `DLVERY_*` environment variables.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        let defaults = ClientConfig::default();
        let settings = config::Config::builder()
            .set_default("api_url", defaults.api_url)
            .and_then(|b| b.set_default("timeout_ms", defaults.timeout_ms))
            .and_then(|b| b.set_default("retry_attempts", defaults.retry_attempts as u64))
            .and_then(|b| b.set_default("retry_delay_ms", defaults.retry_delay_ms))
            .map_err(|e| ClientError::Config(e.to_string()))?
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let cfg: ClientConfig = settings
            .try_deserialize()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "api_url must be an http(s) URL, got {}",
                self.api_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::Config("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Explicit `session_file`, else `<data dir>/dlvery/session.json`.
    pub fn session_path(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("dlvery")
                .join("session.json")
        })
    }
}
