//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod types;

pub use types::{LoggingConfig, VideoConfig};

use crate::indicator::IndicatorConfig;
use crate::provision::ProvisioningConfig;
use crate::tracking::{SessionConfig, TrackingConfig};

/// Config file name under the user config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tracking loop configuration
    #[serde(default)]
    pub tracking: TrackingConfig,
    /// Model provisioning configuration
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
    /// Pointer marker configuration
    #[serde(default)]
    pub indicator: IndicatorConfig,
    /// Replay video geometry
    #[serde(default)]
    pub video: VideoConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else the default location if it exists,
    /// else built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.provisioning.max_attempts == 0 {
            anyhow::bail!("provisioning.max_attempts must be at least 1");
        }

        if self.provisioning.detector.max_hands != 1 {
            anyhow::bail!(
                "Invalid max_hands: {} (only single-hand tracking is supported)",
                self.provisioning.detector.max_hands
            );
        }

        let threshold = self.tracking.pinch_threshold_px;
        if !threshold.is_finite() || threshold <= 0.0 {
            anyhow::bail!("Invalid pinch_threshold_px: {}", threshold);
        }

        if self.tracking.frame_rate == 0 {
            anyhow::bail!("tracking.frame_rate must be at least 1");
        }

        let render = &self.video.render;
        if render.width < 0.0 || render.height < 0.0 {
            anyhow::bail!(
                "Invalid render rectangle size: {}x{}",
                render.width,
                render.height
            );
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, mirror: Option<bool>, log_dir: Option<PathBuf>) -> Self {
        if let Some(mirror) = mirror {
            self.tracking.mirror = mirror;
        }
        if log_dir.is_some() {
            self.logging.log_dir = log_dir;
        }
        self
    }

    /// Session configuration derived from this config
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            tracking: self.tracking.clone(),
            provisioning: self.provisioning.clone(),
            indicator: self.indicator.clone(),
        }
    }
}

/// Default config file location (`$XDG_CONFIG_HOME/hand-pointer/config.toml`)
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::ClickPolicy;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.tracking.mirror);
        assert_eq!(config.tracking.click_policy, ClickPolicy::OnPinchStart);
        assert_eq!(config.tracking.pinch_threshold_px, 20.0);
        assert_eq!(config.provisioning.max_attempts, 3);
        assert_eq!(config.provisioning.retry_backoff_ms, 1000);
        assert_eq!(config.indicator.flash_duration_ms, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tracking.frame_rate, 60);
        assert_eq!(config.video.width, 640);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[tracking]
mirror = false
click_policy = "every_frame"

[provisioning]
max_attempts = 5

[provisioning.detector]
model_type = "full"

[video]
width = 1280
height = 720
render = {{ left = 10.0, top = 20.0, width = 640.0, height = 360.0 }}
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(!config.tracking.mirror);
        assert_eq!(config.tracking.click_policy, ClickPolicy::EveryFrame);
        assert_eq!(config.provisioning.max_attempts, 5);
        assert_eq!(config.provisioning.retry_backoff_ms, 1000);
        assert_eq!(config.video.geometry().scale().unwrap(), (0.5, 0.5));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/hand-pointer.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[provisioning]\nmax_attempts = 0").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_config_validation_threshold() {
        let mut config = Config::default();
        config.tracking.pinch_threshold_px = 0.0;
        assert!(config.validate().is_err());

        config.tracking.pinch_threshold_px = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_max_hands() {
        let mut config = Config::default();
        config.provisioning.detector.max_hands = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_frame_rate() {
        let mut config = Config::default();
        config.tracking.frame_rate = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some(false), Some(PathBuf::from("/tmp/logs")));
        assert!(!config.tracking.mirror);
        assert_eq!(config.logging.log_dir, Some(PathBuf::from("/tmp/logs")));

        let config = config.with_overrides(None, None);
        assert!(!config.tracking.mirror);
        assert!(config.logging.log_dir.is_some());
    }

    #[test]
    fn test_session_config() {
        let mut config = Config::default();
        config.tracking.pinch_threshold_px = 15.0;
        let session = config.session_config();
        assert_eq!(session.tracking.pinch_threshold_px, 15.0);
        assert_eq!(session.provisioning.max_attempts, 3);
    }
}
