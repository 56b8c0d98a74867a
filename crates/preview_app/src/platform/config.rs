use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use preview_core::Features;
use preview_engine::ClientSettings;
use preview_logging::LogDestination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(crate) const DEFAULT_CONFIG_PATH: &str = "./preview_app.ron";
pub(crate) const LOG_FILENAME: &str = "./preview_app.log";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Parser)]
#[command(
    name = "preview_app",
    about = "Submit prompts to a sandbox generation server and preview the result"
)]
pub(crate) struct Args {
    /// Path to the RON config file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub(crate) config: PathBuf,
    /// Overrides `base_url` from the config file.
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    #[arg(long)]
    pub(crate) no_progress: bool,
    #[arg(long)]
    pub(crate) no_error_reporting: bool,
    #[arg(long)]
    pub(crate) no_share_link: bool,
    /// Log at debug level.
    #[arg(long, short)]
    pub(crate) verbose: bool,
}

impl Args {
    pub(crate) fn apply_to(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if self.no_progress {
            config.features.progress_simulation = false;
        }
        if self.no_error_reporting {
            config.features.error_reporting = false;
        }
        if self.no_share_link {
            config.features.share_link = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct FeatureConfig {
    pub(crate) progress_simulation: bool,
    pub(crate) error_reporting: bool,
    pub(crate) share_link: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        let features = Features::default();
        Self {
            progress_simulation: features.progress_simulation,
            error_reporting: features.error_reporting,
            share_link: features.share_link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) base_url: String,
    pub(crate) features: FeatureConfig,
    pub(crate) progress_interval_ms: u64,
    pub(crate) connect_timeout_ms: u64,
    pub(crate) request_timeout_ms: Option<u64>,
    pub(crate) log_destination: LogTarget,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            features: FeatureConfig::default(),
            progress_interval_ms: preview_core::DEFAULT_STEP_INTERVAL.as_millis() as u64,
            connect_timeout_ms: client.connect_timeout.as_millis() as u64,
            request_timeout_ms: client.request_timeout.map(|t| t.as_millis() as u64),
            log_destination: LogTarget::File,
        }
    }
}

impl AppConfig {
    pub(crate) fn features(&self) -> Features {
        Features {
            progress_simulation: self.features.progress_simulation,
            error_reporting: self.features.error_reporting,
            share_link: self.features.share_link,
        }
    }

    pub(crate) fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub(crate) fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        }
    }
}

/// Reads the config file; a missing file yields the defaults.
pub(crate) fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => return Err(err.into()),
    };
    Ok(ron::from_str(&content)?)
}
