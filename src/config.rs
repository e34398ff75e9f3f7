use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::Level;

use crate::error::AppError;

const CONFIG_FILE: &str = "seasonal-color";
const ENV_PREFIX: &str = "SEASONAL";

/// Runtime settings for the service.
///
/// Values are layered: built-in defaults, then an optional
/// `seasonal-color.toml` in the working directory, then `SEASONAL_*`
/// environment variables, then a plain `PORT` variable.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_body_bytes: usize,
    pub palette_size: usize,
    pub analysis_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_concurrent_analyses: usize,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            max_body_bytes: 20 * 1024 * 1024,
            palette_size: 5,
            analysis_timeout_secs: 30,
            request_timeout_secs: 60,
            max_concurrent_analyses: 8,
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    pub fn load() -> Result<Self, AppError> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", defaults.port as i64)?
            .set_default("upload_dir", defaults.upload_dir.to_string_lossy().to_string())?
            .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
            .set_default("palette_size", defaults.palette_size as i64)?
            .set_default("analysis_timeout_secs", defaults.analysis_timeout_secs as i64)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("max_concurrent_analyses", defaults.max_concurrent_analyses as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("port", std::env::var("PORT").ok())?
            .build()?;

        let configuration: Configuration = settings.try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), AppError> {
        let zero_fields = [
            ("max_body_bytes", self.max_body_bytes),
            ("palette_size", self.palette_size),
            ("max_concurrent_analyses", self.max_concurrent_analyses),
        ];
        if let Some((name, _)) = zero_fields.iter().find(|(_, value)| *value == 0) {
            return Err(AppError::InvalidConfiguration(format!(
                "{name} must be greater than zero"
            )));
        }
        let zero_timeouts = [
            ("analysis_timeout_secs", self.analysis_timeout_secs),
            ("request_timeout_secs", self.request_timeout_secs),
        ];
        if let Some((name, _)) = zero_timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(AppError::InvalidConfiguration(format!(
                "{name} must be greater than zero"
            )));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }

    /// Upper bound on a whole request, body upload included.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_level(&self) -> Result<Level, AppError> {
        Level::from_str(&self.log_level).map_err(|_| {
            AppError::InvalidConfiguration(format!("unknown log level '{}'", self.log_level))
        })
    }
}
