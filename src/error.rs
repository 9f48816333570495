//! Error taxonomy
//!
//! Two families of errors exist. `ConfigurationError` is about the request
//! itself and is returned to the caller. `ProviderError` is about one
//! provider's execution and is folded into a per-provider status by the
//! strategy layer, so it never escapes a search call.

use crate::providers::ProviderId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid client construction or search invocation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("missing API key for provider {0}")]
    MissingCredentials(ProviderId),

    #[error("invalid base URL for provider {provider}: {reason}")]
    InvalidBaseUrl { provider: ProviderId, reason: String },

    #[error("invalid timeout for provider {0}")]
    InvalidTimeout(ProviderId),

    #[error("invalid timeout in setting {0}")]
    InvalidSettingTimeout(&'static str),

    #[error("invalid field mapping for provider {provider}: {reason}")]
    InvalidFieldMapping { provider: ProviderId, reason: String },

    #[error("no providers configured")]
    NoProviders,

    #[error("provider {0} is configured more than once")]
    DuplicateProvider(ProviderId),

    #[error("provider {0} is not configured on this client")]
    ProviderNotConfigured(ProviderId),

    #[error("invalid search mode: {0}")]
    InvalidMode(String),

    #[error("{mode} mode requires exactly one provider, got {count}")]
    ProviderCount { mode: String, count: usize },
}

/// Classification of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    Auth,
    RateLimit,
    Network,
    Timeout,
    MalformedResponse,
    Unknown,
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth => write!(f, "authentication failed"),
            Self::RateLimit => write!(f, "rate limited"),
            Self::Network => write!(f, "network error"),
            Self::Timeout => write!(f, "timed out"),
            Self::MalformedResponse => write!(f, "malformed response"),
            Self::Unknown => write!(f, "unknown error"),
        }
    }
}

/// Failure of a single provider call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{provider}: {kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub provider: ProviderId,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: ProviderId, kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            provider,
            message: message.into(),
        }
    }

    /// Classify a non-2xx HTTP status
    pub fn from_status(provider: ProviderId, status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ProviderErrorKind::Auth,
            429 => ProviderErrorKind::RateLimit,
            _ => ProviderErrorKind::Unknown,
        };
        let snippet: String = body.chars().take(200).collect();
        Self::new(provider, kind, format!("HTTP {}: {}", status, snippet.trim()))
    }
}

/// Errors returned from the search entry points
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("blocking runtime unavailable: {0}")]
    Runtime(#[from] std::io::Error),
}

impl SearchError {
    /// The configuration error, if this is one
    pub fn as_configuration(&self) -> Option<&ConfigurationError> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Http(_) | Self::Runtime(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let auth = ProviderError::from_status(ProviderId::Pexels, 401, "");
        assert_eq!(auth.kind, ProviderErrorKind::Auth);

        let forbidden = ProviderError::from_status(ProviderId::Pexels, 403, "");
        assert_eq!(forbidden.kind, ProviderErrorKind::Auth);

        let limited = ProviderError::from_status(ProviderId::Unsplash, 429, "slow down");
        assert_eq!(limited.kind, ProviderErrorKind::RateLimit);
        assert!(limited.message.contains("slow down"));

        let other = ProviderError::from_status(ProviderId::Pixabay, 500, "");
        assert_eq!(other.kind, ProviderErrorKind::Unknown);
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::new(ProviderId::Pixabay, ProviderErrorKind::Network, "refused");
        assert_eq!(err.to_string(), "pixabay: network error: refused");

        let err = ConfigurationError::ProviderCount {
            mode: "single".to_string(),
            count: 2,
        };
        assert_eq!(err.to_string(), "single mode requires exactly one provider, got 2");
    }
}
