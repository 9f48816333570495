//! Result type definitions

use crate::error::{ProviderError, ProviderErrorKind};
use crate::providers::ProviderId;
use crate::search::MediaKind;
use serde::{Deserialize, Serialize};

/// A single media item in provider-neutral form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMediaItem {
    /// Provider that returned this item
    pub provider: ProviderId,
    /// Provider-native identifier, always stringified
    pub id: String,
    /// Image or video
    pub media_type: MediaKind,
    /// Small preview / thumbnail URL
    pub preview_url: String,
    /// Full resolution or download URL
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Attribution metadata
    pub attribution: Attribution,
}

/// Attribution metadata for a media item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Author / photographer name
    pub author: Option<String>,
    /// Author profile URL
    pub author_url: Option<String>,
    /// Item page on the provider's website
    pub page_url: Option<String>,
    /// Description, alt text or tags
    pub description: Option<String>,
}

/// Why a provider contributed no items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum FailureReason {
    /// The provider call failed
    Provider {
        kind: ProviderErrorKind,
        message: String,
    },
    /// The search was cancelled before the provider answered
    Cancelled,
}

impl From<ProviderError> for FailureReason {
    fn from(error: ProviderError) -> Self {
        Self::Provider {
            kind: error.kind,
            message: error.message,
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider { kind, message } => write!(f, "{}: {}", kind, message),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Outcome of one provider within a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ProviderStatus {
    Success,
    /// Items were returned but some are missing: `skipped` raw items lacked
    /// required fields, and the media kinds in `failed` could not be fetched
    Partial {
        skipped: usize,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        failed: Vec<MediaKind>,
    },
    Failed(FailureReason),
}

impl ProviderStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Failed(FailureReason::Cancelled))
    }

    /// Failure kind, if the provider call itself failed
    pub fn error_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            Self::Failed(FailureReason::Provider { kind, .. }) => Some(*kind),
            _ => None,
        }
    }
}

/// Normalized results from a single provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResultSet {
    pub provider: ProviderId,
    /// Items in the provider's native order
    pub items: Vec<NormalizedMediaItem>,
    pub status: ProviderStatus,
    /// Time spent on the provider call
    pub elapsed_ms: u64,
}

impl NormalizedResultSet {
    pub fn success(provider: ProviderId, items: Vec<NormalizedMediaItem>) -> Self {
        Self {
            provider,
            items,
            status: ProviderStatus::Success,
            elapsed_ms: 0,
        }
    }

    /// A result set with no items; failed providers never carry items
    pub fn failed(provider: ProviderId, reason: impl Into<FailureReason>) -> Self {
        Self {
            provider,
            items: Vec::new(),
            status: ProviderStatus::Failed(reason.into()),
            elapsed_ms: 0,
        }
    }

    pub fn cancelled(provider: ProviderId) -> Self {
        Self::failed(provider, FailureReason::Cancelled)
    }

    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
