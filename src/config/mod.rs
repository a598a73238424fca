//! config
//!
//! Configuration discovery and loading.
//!
//! # Precedence
//!
//! Later overrides earlier:
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (applied with [`Config::override_base_url`])
//!
//! # Locations
//!
//! `$AUTOPLAYLIST_CONFIG`, when set, is the only candidate and must exist.
//! Otherwise the first existing file wins:
//! 1. `$XDG_CONFIG_HOME/autoplaylist/config.toml`
//! 2. `~/.autoplaylist/config.toml`
//!
//! Finding none of these is not an error.
//!
//! # Example
//!
//! ```no_run
//! use autoplaylist::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("backend: {}", config.base_url());
//! ```

pub mod schema;

pub use schema::{ConfigFile, GeneratorDefaults, SecretsConfig};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::gateway::RefreshPolicy;
use crate::secrets;
use crate::session::{EnabledGenerators, GeneratorSettings};

/// Backend address used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8888";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "AUTOPLAYLIST_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Effective configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    file: ConfigFile,
    path: Option<PathBuf>,
    base_url_override: Option<String>,
}

impl Config {
    /// Load from the standard locations.
    ///
    /// # Errors
    ///
    /// Fails if a config file exists but cannot be read, parsed or validated.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::discover(|key| std::env::var(key).ok(), dirs::home_dir()) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;
        debug!(path = %path.display(), "loaded config");

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
            base_url_override: None,
        })
    }

    /// Config file to load, given an environment lookup and home dir.
    ///
    /// An explicit `$AUTOPLAYLIST_CONFIG` is returned even if it does not
    /// exist, so loading it reports the error.
    pub fn discover(
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Option<PathBuf> {
        if let Some(explicit) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(explicit));
        }
        let candidates = [
            env("XDG_CONFIG_HOME").map(|xdg| PathBuf::from(xdg).join("autoplaylist/config.toml")),
            home.map(|h| h.join(".autoplaylist/config.toml")),
        ];
        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Replace the configured base URL (the `--base-url` flag).
    pub fn override_base_url(mut self, url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = &url {
            schema::validate_base_url(url)?;
        }
        if url.is_some() {
            self.base_url_override = url;
        }
        Ok(self)
    }

    /// Path of the loaded file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn base_url(&self) -> &str {
        self.base_url_override
            .as_deref()
            .or(self.file.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.file.refresh.unwrap_or_default()
    }

    pub fn secrets_provider(&self) -> &str {
        self.file
            .secrets
            .as_ref()
            .and_then(|s| s.provider.as_deref())
            .unwrap_or(secrets::DEFAULT_PROVIDER)
    }

    pub fn enabled_generators(&self) -> EnabledGenerators {
        self.file.generator.unwrap_or_default().enabled()
    }

    pub fn generator_settings(&self) -> GeneratorSettings {
        self.file.generator.unwrap_or_default().settings()
    }
}
