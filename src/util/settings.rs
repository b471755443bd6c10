use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "ShipmentEstimator";
const APP_NAME: &str = "ShipmentEstimator";
const ENV_PREFIX: &str = "SHIPMENT_ESTIMATOR_";

/// Runtime configuration. Every field is optional in the JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Remote pricing oracle; the local rate table is used when absent.
    pub pricing_url: Option<String>,
    pub weather_url: String,
    /// Without a key the air-quality panel reports a provider error.
    pub weather_api_key: Option<String>,
    /// Replaces the embedded port directory.
    pub ports_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pricing_url: None,
            weather_url: crate::infra::weather::DEFAULT_BASE_URL.to_string(),
            weather_api_key: None,
            ports_file: None,
            request_timeout_secs: 15,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Settings file, then environment overrides.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match settings_file() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        settings.apply_env(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok());
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Override fields from a key lookup (keys without the prefix).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PRICING_URL") {
            self.pricing_url = Some(url);
        }
        if let Some(url) = lookup("WEATHER_URL") {
            self.weather_url = url;
        }
        if let Some(key) = lookup("WEATHER_KEY") {
            self.weather_api_key = Some(key);
        }
        if let Some(path) = lookup("PORTS_FILE") {
            self.ports_file = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
