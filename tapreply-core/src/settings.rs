//! Persisted user settings and the stores that hold them.
//!
//! The orchestrator receives a [`SettingsStore`] explicitly and reads it once
//! per request. Nothing here ever logs or displays the API key.

use crate::error::{ConfigError, CoreError};
use crate::types::{ApiProvider, ReplyLength, Tone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    /// Kept as free text so an unknown provider surfaces as an unsupported
    /// provider error at call time rather than a parse failure on load.
    pub api_provider: String,
    pub reply_length: ReplyLength,
    pub user_knowledge: String,
    pub all_lowercase: bool,
    pub preferred_tone: Tone,
    pub auto_detect_platform: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_provider: ApiProvider::OpenAi.as_str().to_string(),
            reply_length: ReplyLength::Short,
            user_knowledge: String::new(),
            all_lowercase: false,
            preferred_tone: Tone::Analytical,
            auto_detect_platform: true,
        }
    }
}

impl Settings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            provider: self.api_provider.clone(),
            api_key: self.api_key.clone(),
        }
    }

    /// The options page "reset to defaults". Differs from the install
    /// defaults in tone and length, and keeps the lowercase flag.
    pub fn reset_defaults(&self) -> Self {
        Self {
            preferred_tone: Tone::Supportive,
            reply_length: ReplyLength::Medium,
            all_lowercase: self.all_lowercase,
            ..Self::default()
        }
    }

    /// Normalizes the settings for an explicit save. An empty key is rejected.
    pub fn validate_for_save(mut self) -> Result<Self, CoreError> {
        self.api_key = self.api_key.trim().to_string();
        self.user_knowledge = self.user_knowledge.trim().to_string();

        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }

        // Key shape is only a hint; a key that looks wrong is still saved.
        match self.api_provider.parse::<ApiProvider>() {
            Ok(provider) => {
                if let Some(hint) = provider.validate_key(&self.api_key) {
                    warn!("{}", hint);
                }
            }
            Err(_) => {
                return Err(ConfigError::InvalidValue {
                    field: "apiProvider".to_string(),
                    value: self.api_provider.clone(),
                }
                .into())
            }
        }

        Ok(self)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &redact(&self.api_key))
            .field("api_provider", &self.api_provider)
            .field("reply_length", &self.reply_length)
            .field("user_knowledge", &self.user_knowledge)
            .field("all_lowercase", &self.all_lowercase)
            .field("preferred_tone", &self.preferred_tone)
            .field("auto_detect_platform", &self.auto_detect_platform)
            .finish()
    }
}

/// Provider selection plus the secret used to call it.
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    pub provider: String,
    pub api_key: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

pub fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings, CoreError>;
    fn save(&self, settings: &Settings) -> Result<(), CoreError>;
}

/// Settings kept in memory only.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RwLock<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, CoreError> {
        self.settings
            .read()
            .map(|s| s.clone())
            .map_err(|_| CoreError::Internal {
                message: "settings lock poisoned".to_string(),
            })
    }

    fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        let mut guard = self.settings.write().map_err(|_| CoreError::Internal {
            message: "settings lock poisoned".to_string(),
        })?;
        *guard = settings.clone();
        Ok(())
    }
}

/// Settings persisted as a TOML file. A missing file reads as defaults.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings, CoreError> {
        if !self.path.exists() {
            debug!("No settings file at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let settings: Settings = toml::from_str(&raw).map_err(ConfigError::from)?;
        debug!("Loaded settings from {}", self.path.display());
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let encoded = toml::to_string_pretty(settings).map_err(ConfigError::from)?;
        std::fs::write(&self.path, encoded)?;
        info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
