//! Configuration loading from a TOML file with environment variable overrides.
//!
//! Looks for `thermocheck.toml` in the working directory, or the file named
//! by `THERMOCHECK_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thermocheck_adapter_virtual::VirtualConfig;
use thermocheck_app::services::sequencer::{FailurePolicy, SequencerSettings};
use thermocheck_domain::connection::ConnectionSettings;
use thermocheck_domain::expectation::Tolerance;

const DEFAULT_PATH: &str = "thermocheck.toml";

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wait for Enter before exiting.
    pub pause_on_exit: bool,
    /// Controller address and credentials.
    pub controller: ControllerConfig,
    /// Sequencer tunables.
    pub verification: VerificationConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// JSON report output.
    pub report: ReportConfig,
    /// Simulated device database.
    #[serde(rename = "virtual")]
    pub virtual_controller: VirtualConfig,
}

/// Controller address, integration credentials and database cache.
#[derive(Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    /// Local copy of the controller's device database.
    pub cache_path: PathBuf,
}

/// Verification sequencer settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Pause between a change and its read-back, in milliseconds.
    pub settle_delay_ms: u64,
    /// Absolute setpoint tolerance, in degrees.
    pub tolerance: Tolerance,
    pub failure_policy: FailurePolicy,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Where to write the JSON survey report, if anywhere.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `thermocheck.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("THERMOCHECK_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("THERMOCHECK_HOST") {
            self.controller.host = val;
        }
        if let Ok(val) = std::env::var("THERMOCHECK_USER") {
            self.controller.user = val;
        }
        if let Ok(val) = std::env::var("THERMOCHECK_PASSWORD") {
            self.controller.password = val;
        }
        if let Ok(val) = std::env::var("THERMOCHECK_CACHE_PATH") {
            self.controller.cache_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("THERMOCHECK_SETTLE_MS") {
            if let Ok(ms) = val.parse() {
                self.verification.settle_delay_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("THERMOCHECK_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.controller.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "controller host must not be empty".to_string(),
            ));
        }
        if self.controller.user.trim().is_empty() {
            return Err(ConfigError::Validation(
                "controller user must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Connection settings handed to the controller adapter.
    #[must_use]
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.controller.host.clone(),
            user: self.controller.user.clone(),
            password: self.controller.password.clone(),
        }
    }

    #[must_use]
    pub fn sequencer_settings(&self) -> SequencerSettings {
        SequencerSettings {
            settle_delay: Duration::from_millis(self.verification.settle_delay_ms),
            tolerance: self.verification.tolerance,
            policy: self.verification.failure_policy,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pause_on_exit: true,
            controller: ControllerConfig::default(),
            verification: VerificationConfig::default(),
            logging: LoggingConfig::default(),
            report: ReportConfig::default(),
            virtual_controller: VirtualConfig::default(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.160".to_string(),
            user: "lutron".to_string(),
            password: "integration".to_string(),
            cache_path: PathBuf::from("lutron_db.xml"),
        }
    }
}

impl std::fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("cache_path", &self.cache_path)
            .finish()
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1000,
            tolerance: Tolerance::DEFAULT,
            failure_policy: FailurePolicy::Continue,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "thermocheck=info,thermocheck_app=info,thermocheck_adapter_virtual=info"
                .to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
