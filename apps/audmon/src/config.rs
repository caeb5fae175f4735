use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use audmon_audio::CaptureConfig;
use audmon_meter::MeterConfig;
use audmon_ui::{DisplayConfig, MeterTheme, Orientation};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub meter: MeterConfig,
    pub capture: CaptureConfig,
    pub display: DisplayConfig,
    pub log_file: Option<PathBuf>,
}

/// Command-line settings that win over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub horizontal: bool,
    pub device: Option<String>,
    pub log_file: Option<PathBuf>,
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("audmon").join("config.yaml"))
}

impl AppConfig {
    /// Reads `explicit` if given, else the per-user file if it exists, else
    /// falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read config file {:?}", path))?;
        let config =
            Self::from_yaml(&text).with_context(|| format!("load config file {:?}", path))?;
        debug!(?path, "loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.meter.validate()?;
        self.capture.validate()?;
        MeterTheme::from_config(&self.display)?;
        Ok(())
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if overrides.horizontal {
            self.display.orientation = Orientation::Horizontal;
        }
        if overrides.device.is_some() {
            self.capture.device = overrides.device;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
    }
}
