//! config::schema
//!
//! On-disk configuration schema.
//!
//! ```toml
//! base_url = "https://autoplaylist.example.com"
//! refresh = "single_flight"
//!
//! [secrets]
//! provider = "file"
//!
//! [generator]
//! language = false
//! artist_min_appearances = 4
//! max_genres = 5
//! ```

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::gateway::RefreshPolicy;
use crate::secrets;
use crate::session::{EnabledGenerators, GeneratorSettings, SettingsPatch};

/// Top-level config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Backend base URL
    pub base_url: Option<String>,

    /// How concurrent refreshes are handled
    pub refresh: Option<RefreshPolicy>,

    /// Secret storage settings
    pub secrets: Option<SecretsConfig>,

    /// Generator preferences applied to every new session
    pub generator: Option<GeneratorDefaults>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.base_url {
            validate_base_url(url)?;
        }
        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }
        Ok(())
    }
}

/// Check that `url` is an absolute http(s) URL.
pub fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ConfigError::InvalidValue(format!("invalid base_url '{}': {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue(format!(
            "invalid base_url '{}': scheme must be http or https, not {}",
            url, other
        ))),
    }
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    pub provider: Option<String>,
}

impl SecretsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            if !secrets::PROVIDERS.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid secrets provider '{}', must be one of: {}",
                    provider,
                    secrets::PROVIDERS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Generator preferences. Unset keys keep the built-in defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorDefaults {
    pub genre: Option<bool>,
    pub language: Option<bool>,
    pub artist: Option<bool>,
    pub allow_duplicates: Option<bool>,
    pub artist_min_appearances: Option<u32>,
    pub max_genres: Option<u32>,
    pub max_languages: Option<u32>,
    pub max_artists: Option<u32>,
}

impl GeneratorDefaults {
    pub fn enabled(&self) -> EnabledGenerators {
        let base = EnabledGenerators::default();
        EnabledGenerators {
            genre: self.genre.unwrap_or(base.genre),
            language: self.language.unwrap_or(base.language),
            artist: self.artist.unwrap_or(base.artist),
        }
    }

    /// Built-in settings with these overrides applied (clamping included).
    pub fn settings(&self) -> GeneratorSettings {
        let mut settings = GeneratorSettings::default();
        settings.apply(SettingsPatch {
            allow_duplicates: self.allow_duplicates,
            artist_min_appearances: self.artist_min_appearances,
            max_languages: self.max_languages,
            max_genres: self.max_genres,
            max_artists: self.max_artists,
        });
        settings
    }
}
