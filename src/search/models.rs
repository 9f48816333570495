//! Search query and related data models

use crate::error::ConfigurationError;
use crate::providers::ProviderId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// How a search is dispatched across providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Exactly one provider
    Single,
    /// One or more providers, results merged in declaration order
    #[default]
    Hybrid,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(ConfigurationError::InvalidMode(s.to_string())),
        }
    }
}

/// Kind of media requested from providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Media kinds requested by one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSelection {
    #[default]
    Image,
    Video,
    /// Images and videos in one call
    All,
}

impl MediaSelection {
    /// Kinds to fetch, images first
    pub fn kinds(&self) -> &'static [MediaKind] {
        match self {
            Self::Image => &[MediaKind::Image],
            Self::Video => &[MediaKind::Video],
            Self::All => &[MediaKind::Image, MediaKind::Video],
        }
    }

    pub fn contains(&self, kind: MediaKind) -> bool {
        self.kinds().contains(&kind)
    }
}

impl From<MediaKind> for MediaSelection {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Self::Image,
            MediaKind::Video => Self::Video,
        }
    }
}

impl std::fmt::Display for MediaSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
            Self::All => write!(f, "all"),
        }
    }
}

impl FromStr for MediaSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" | "images" | "photo" | "photos" => Ok(Self::Image),
            "video" | "videos" => Ok(Self::Video),
            "all" | "both" => Ok(Self::All),
            other => Err(format!("unknown media selection: {}", other)),
        }
    }
}

/// Provider-agnostic orientation filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "landscape" | "horizontal" => Ok(Self::Landscape),
            "portrait" | "vertical" => Ok(Self::Portrait),
            "square" | "squarish" => Ok(Self::Square),
            other => Err(format!("unknown orientation: {}", other)),
        }
    }
}

/// A single search request
///
/// Built once per call and shared by reference with every strategy.
/// Pass-through parameters are sent to providers untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    /// Free-text search term
    pub term: String,
    /// Providers to search, in declaration order
    #[serde(default)]
    pub providers: Vec<ProviderId>,
    /// Requested media kinds
    #[serde(default)]
    pub media: MediaSelection,
    /// Page number (1-indexed)
    pub page: Option<u32>,
    /// Results per page
    pub per_page: Option<u32>,
    /// Orientation filter
    pub orientation: Option<Orientation>,
    /// Parameters sent to every provider
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    /// Parameters sent to a single provider
    #[serde(default)]
    pub provider_params: HashMap<ProviderId, BTreeMap<String, String>>,
}

impl Query {
    /// Create a query for a search term
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// Add a provider to search
    pub fn provider(mut self, provider: ProviderId) -> Self {
        self.providers.push(provider);
        self
    }

    /// Replace the provider list
    pub fn with_providers(mut self, providers: impl IntoIterator<Item = ProviderId>) -> Self {
        self.providers = providers.into_iter().collect();
        self
    }

    /// Set the media kinds; a single `MediaKind` converts
    pub fn with_media(mut self, media: impl Into<MediaSelection>) -> Self {
        self.media = media.into();
        self
    }

    /// Set page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page.max(1));
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Add a parameter sent to every provider
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a parameter sent only to `provider`
    pub fn with_provider_param(
        mut self,
        provider: ProviderId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.provider_params
            .entry(provider)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Pass-through parameters for one provider, provider-scoped keys last
    pub fn params_for(&self, provider: ProviderId) -> Vec<(String, String)> {
        let mut merged = self.params.clone();
        if let Some(scoped) = self.provider_params.get(&provider) {
            merged.extend(scoped.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged.into_iter().collect()
    }

    /// Providers with duplicates removed, first occurrence wins
    pub fn distinct_providers(&self) -> Vec<ProviderId> {
        let mut seen = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            if !seen.contains(provider) {
                seen.push(*provider);
            }
        }
        seen
    }

    /// Check if query is empty
    pub fn is_empty(&self) -> bool {
        self.term.trim().is_empty()
    }
}
