//! Provider traits and types

use super::fields::FieldMapping;
use crate::error::{ConfigurationError, ProviderError};
use crate::search::{MediaKind, Query};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Known media providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Pixabay,
    Unsplash,
    Pexels,
}

impl ProviderId {
    /// All built-in providers
    pub const ALL: [ProviderId; 3] = [Self::Pixabay, Self::Unsplash, Self::Pexels];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pixabay => "pixabay",
            Self::Unsplash => "unsplash",
            Self::Pexels => "pexels",
        }
    }

    /// Environment variable holding the API key
    pub fn key_env_var(&self) -> &'static str {
        match self {
            Self::Pixabay => "PIXABAY_KEY",
            Self::Unsplash => "UNSPLASH_KEY",
            Self::Pexels => "PEXELS_KEY",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| ConfigurationError::UnknownProvider(s.to_string()))
    }
}

/// Provider-native response payload
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult(pub serde_json::Value);

impl RawResult {
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}

/// HTTP request to be made by an adapter
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Query parameters, sent in order
    pub params: Vec<(String, String)>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter, replacing an earlier one with the same key
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.params.retain(|(k, _)| *k != key);
        self.params.push((key, value.into()));
        self
    }

    /// Add an optional query parameter
    pub fn param_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(key, v.to_string()),
            None => self,
        }
    }

    /// Add pass-through parameters
    pub fn params(self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        params.into_iter().fold(self, |req, (k, v)| req.param(k, v))
    }

    /// Look up a query parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a header
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ProviderResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Provider metadata
#[derive(Debug, Clone, Default)]
pub struct ProviderAbout {
    /// Website URL
    pub website: Option<String>,
    /// Whether it uses the official API
    pub use_official_api: bool,
    /// Whether an API key is required
    pub require_api_key: bool,
}

impl ProviderAbout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn website(mut self, url: impl Into<String>) -> Self {
        self.website = Some(url.into());
        self
    }

    pub fn official_api(mut self, uses: bool) -> Self {
        self.use_official_api = uses;
        self
    }

    pub fn api_key_required(mut self, required: bool) -> Self {
        self.require_api_key = required;
        self
    }
}

/// Wraps one external API behind a uniform fetch capability
///
/// Adapters hold credentials but no per-call state, so one instance is shared
/// across concurrent searches.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider identifier
    fn id(&self) -> ProviderId;

    /// Short description of the provider
    fn about(&self) -> ProviderAbout {
        ProviderAbout::default()
    }

    /// Whether the provider can search this media kind
    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Image
    }

    /// Raw-to-normalized field table for a supported media kind
    fn field_mapping(&self, kind: MediaKind) -> FieldMapping;

    /// Run the query against the provider for one supported media kind.
    ///
    /// An empty result list is a success, not an error.
    async fn fetch(&self, query: &Query, kind: MediaKind) -> Result<RawResult, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_parsing() {
        assert_eq!("Pixabay".parse::<ProviderId>().unwrap(), ProviderId::Pixabay);
        assert_eq!(" pexels".parse::<ProviderId>().unwrap(), ProviderId::Pexels);
        assert_eq!(
            "flickr".parse::<ProviderId>(),
            Err(ConfigurationError::UnknownProvider("flickr".to_string()))
        );
    }

    #[test]
    fn test_request_builder() {
        let request = ProviderRequest::get("https://api.example/search")
            .header("Authorization", "Client-ID abc")
            .param("query", "cat")
            .param_opt("page", Some(2))
            .param_opt::<u32>("per_page", None)
            .params(vec![("query".to_string(), "dog".to_string())]);

        assert_eq!(request.get_param("query"), Some("dog"));
        assert_eq!(request.get_param("page"), Some("2"));
        assert_eq!(request.get_param("per_page"), None);
        assert_eq!(request.get_header("authorization"), Some("Client-ID abc"));
    }
}
