use crate::error::AppError;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Backend root. Both `/scan` and the liveness route hang off it.
    pub base_url: String,
    pub data_dir: Option<PathBuf>,
    pub probe_interval_ms: u64,
    pub scan_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: None,
            probe_interval_ms: 5000,
            scan_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then `FarmLens.toml` if present, then `FARMLENS_*` variables.
    pub fn load() -> Result<AppConfig, AppError> {
        let defaults = AppConfig::default();
        let settings = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("probe_interval_ms", defaults.probe_interval_ms as i64)?
            .add_source(ConfigFile::with_name("FarmLens").required(false))
            .add_source(Environment::with_prefix("FARMLENS"))
            .build()?;

        let config = settings.try_deserialize::<AppConfig>()?;
        config.validated()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, AppError> {
        self.base_url = base_url.into();
        self.validated()
    }

    fn validated(mut self) -> Result<Self, AppError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AppError::Config(format!("invalid base_url {:?}: {}", self.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();

        if self.probe_interval_ms == 0 {
            return Err(AppError::Config("probe_interval_ms must be positive".into()));
        }
        Ok(self)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("farm-lens")
        })
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scan_timeout_secs.map(Duration::from_secs)
    }
}
