use crate::error::{CfError, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use termtext::{ColorPolicy, UiConfig};

const CONFIG_FILENAME: &str = "config.json";
const CONFIG_DIRNAME: &str = ".cf";

/// Overrides the `ColorEnabled` setting when set.
pub const COLOR_ENV: &str = "CF_COLOR";
/// Directory holding `.cf/`, instead of the user's home directory.
pub const HOME_ENV: &str = "CF_HOME";

/// CLI configuration, stored in `$CF_HOME/.cf/config.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Config {
    /// URL of the targeted Cloud Controller, empty when none is targeted
    pub target: String,

    #[serde(rename = "APIVersion")]
    pub api_version: String,

    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub loggregator_endpoint: String,
    pub doppler_endpoint: String,

    #[serde(rename = "SkipSSLValidation")]
    pub skip_ssl_validation: bool,

    /// `"true"`, `"false"`, or empty for terminal detection
    pub color_enabled: String,

    /// Locale for translated output, empty for the default
    pub locale: String,
}

impl Config {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| {
            CfError::Config(format!("{}: {}", config_path.display(), e))
        })?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        tracing::debug!(path = %config_path.display(), "config saved");
        Ok(())
    }

    pub fn is_targeted(&self) -> bool {
        !self.target.is_empty()
    }

    /// Wipes everything learned from the targeted API.
    pub fn clear_target(&mut self) {
        self.target.clear();
        self.api_version.clear();
        self.authorization_endpoint.clear();
        self.token_endpoint.clear();
        self.loggregator_endpoint.clear();
        self.doppler_endpoint.clear();
        self.skip_ssl_validation = false;
    }
}

impl UiConfig for Config {
    fn color_enabled(&self) -> ColorPolicy {
        let env = std::env::var(COLOR_ENV).ok();
        color_policy(env.as_deref(), &self.color_enabled)
    }

    fn locale(&self) -> String {
        self.locale.clone()
    }
}

/// The environment value wins over the stored setting. Unparseable values
/// fall back to terminal detection.
pub fn color_policy(env: Option<&str>, setting: &str) -> ColorPolicy {
    let raw = match env {
        Some(value) if !value.trim().is_empty() => value,
        _ => setting,
    };
    raw.trim().parse().unwrap_or_else(|err| {
        tracing::warn!(value = raw, "{}", err);
        ColorPolicy::Auto
    })
}

/// Resolves `.cf/` under `CF_HOME`, or under the home directory when unset.
pub fn config_dir() -> Result<PathBuf> {
    let home = match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => BaseDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .ok_or_else(|| CfError::Config("could not determine home directory".into()))?,
    };
    Ok(home.join(CONFIG_DIRNAME))
}
