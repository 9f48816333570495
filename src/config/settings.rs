//! Settings structures for media-searcher configuration

use crate::error::ConfigurationError;
use crate::providers::ProviderId;
use crate::search::SearchMode;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// A strictly positive, finite duration in seconds
pub(crate) fn positive_duration(seconds: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(seconds)
        .ok()
        .filter(|d| !d.is_zero())
}

/// Main settings structure, loadable from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        self.merge_vars(|name| std::env::var(name).ok());
    }

    /// Merge values from an environment-like lookup
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("MEDIA_SEARCHER_MODE") {
            match val.parse() {
                Ok(mode) => self.search.default_mode = mode,
                Err(e) => warn!("Ignoring MEDIA_SEARCHER_MODE: {}", e),
            }
        }
        if let Some(val) = lookup("MEDIA_SEARCHER_TIMEOUT") {
            match val.trim().parse::<f64>() {
                Ok(timeout) if positive_duration(timeout).is_some() => {
                    self.search.provider_timeout = timeout
                }
                _ => warn!("Ignoring MEDIA_SEARCHER_TIMEOUT: not a positive number: {}", val),
            }
        }

        for provider in ProviderId::ALL {
            let Some(key) = lookup(provider.key_env_var()).filter(|k| !k.trim().is_empty()) else {
                continue;
            };
            match self.providers.iter_mut().find(|p| p.provider == provider) {
                Some(config) => {
                    if config.key.trim().is_empty() {
                        config.key = key;
                    }
                }
                None => self.providers.push(ProviderConfig::new(provider, key)),
            }
        }
    }

    /// Get provider config by identifier
    pub fn get_provider(&self, provider: ProviderId) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.provider == provider)
    }

    /// Get all enabled providers
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Mode used when the caller does not pick one
    pub default_mode: SearchMode,
    /// Per-provider timeout in seconds
    pub provider_timeout: f64,
    /// Upper bound for any per-provider timeout
    pub max_provider_timeout: f64,
}

impl SearchSettings {
    /// Timeout for providers without their own
    pub fn default_timeout(&self) -> Result<Duration, ConfigurationError> {
        positive_duration(self.provider_timeout)
            .ok_or(ConfigurationError::InvalidSettingTimeout("search.provider_timeout"))
    }

    /// Upper bound applied to every provider timeout
    pub fn max_timeout(&self) -> Result<Duration, ConfigurationError> {
        positive_duration(self.max_provider_timeout)
            .ok_or(ConfigurationError::InvalidSettingTimeout("search.max_provider_timeout"))
    }

    /// Check both timeouts
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.default_timeout()?;
        self.max_timeout()?;
        Ok(())
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_mode: SearchMode::Hybrid,
            provider_timeout: crate::DEFAULT_TIMEOUT as f64,
            max_provider_timeout: crate::MAX_TIMEOUT as f64,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// User agent string (none = media-searcher/<version>)
    pub user_agent: Option<String>,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy for all requests
    pub proxy: Option<String>,
}

impl OutgoingSettings {
    /// Whole-request timeout for the HTTP client
    pub fn request_timeout(&self) -> Result<Duration, ConfigurationError> {
        positive_duration(self.request_timeout)
            .ok_or(ConfigurationError::InvalidSettingTimeout("outgoing.request_timeout"))
    }
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 20,
            user_agent: None,
            verify_ssl: true,
            proxy: None,
        }
    }
}

/// Individual provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier
    pub provider: ProviderId,
    /// API key
    #[serde(default)]
    pub key: String,
    /// Whether provider is disabled
    #[serde(default)]
    pub disabled: bool,
    /// Custom timeout for this provider in seconds
    #[serde(default)]
    pub timeout: Option<f64>,
    /// Override for the provider's API base URL
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderId, key: impl Into<String>) -> Self {
        Self {
            provider,
            key: key.into(),
            disabled: false,
            timeout: None,
            base_url: None,
        }
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}
