//! Field mapping tables
//!
//! Each provider describes where the normalized fields live in its raw JSON
//! as RFC 6901 JSON pointers. Tables are validated when the registry builds a
//! strategy, so a broken table fails at startup instead of dropping data at
//! query time.

use super::traits::{ProviderId, RawResult};
use crate::error::{ConfigurationError, ProviderError, ProviderErrorKind};
use crate::results::{Attribution, NormalizedMediaItem};
use crate::search::MediaKind;
use serde_json::Value;

/// Raw JSON pointer to normalized field table for one provider and media kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub media_type: MediaKind,
    /// Pointer to the item array in the response
    pub items: String,
    pub id: String,
    pub preview_url: String,
    pub url: String,
    pub width: Option<String>,
    pub height: Option<String>,
    pub author: Option<String>,
    pub author_url: Option<String>,
    pub page_url: Option<String>,
    pub description: Option<String>,
}

impl FieldMapping {
    /// Create a mapping with the required pointers
    pub fn new(
        media_type: MediaKind,
        items: impl Into<String>,
        id: impl Into<String>,
        preview_url: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            media_type,
            items: items.into(),
            id: id.into(),
            preview_url: preview_url.into(),
            url: url.into(),
            width: None,
            height: None,
            author: None,
            author_url: None,
            page_url: None,
            description: None,
        }
    }

    pub fn size(mut self, width: &str, height: &str) -> Self {
        self.width = Some(width.to_string());
        self.height = Some(height.to_string());
        self
    }

    pub fn author(mut self, name: &str, url: Option<&str>) -> Self {
        self.author = Some(name.to_string());
        self.author_url = url.map(str::to_string);
        self
    }

    pub fn page_url(mut self, pointer: &str) -> Self {
        self.page_url = Some(pointer.to_string());
        self
    }

    pub fn description(mut self, pointer: &str) -> Self {
        self.description = Some(pointer.to_string());
        self
    }

    /// Check that every pointer is well-formed and required ones are set
    pub fn validate(&self, provider: ProviderId) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidFieldMapping { provider, reason };

        let required = [
            ("items", &self.items),
            ("id", &self.id),
            ("preview_url", &self.preview_url),
            ("url", &self.url),
        ];
        for (field, pointer) in required {
            if pointer.is_empty() {
                return Err(invalid(format!("required field '{}' has no pointer", field)));
            }
        }

        let optional = [
            ("width", &self.width),
            ("height", &self.height),
            ("author", &self.author),
            ("author_url", &self.author_url),
            ("page_url", &self.page_url),
            ("description", &self.description),
        ];
        let pointers = required
            .into_iter()
            .chain(optional.into_iter().filter_map(|(f, p)| p.as_ref().map(|p| (f, p))));

        for (field, pointer) in pointers {
            if !pointer.starts_with('/') {
                return Err(invalid(format!(
                    "pointer '{}' for field '{}' must start with '/'",
                    pointer, field
                )));
            }
        }

        Ok(())
    }

    /// Map a raw response to normalized items.
    ///
    /// Returns the items and the number of raw entries skipped for missing
    /// required fields. A response without the item array is malformed.
    pub fn normalize(
        &self,
        provider: ProviderId,
        raw: &RawResult,
    ) -> Result<(Vec<NormalizedMediaItem>, usize), ProviderError> {
        let entries = raw
            .as_json()
            .pointer(&self.items)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ProviderError::new(
                    provider,
                    ProviderErrorKind::MalformedResponse,
                    format!("missing item array at '{}'", self.items),
                )
            })?;

        let mut items = Vec::with_capacity(entries.len());
        let mut skipped = 0;

        for entry in entries {
            match self.normalize_item(provider, entry) {
                Some(item) => items.push(item),
                None => skipped += 1,
            }
        }

        Ok((items, skipped))
    }

    fn normalize_item(&self, provider: ProviderId, entry: &Value) -> Option<NormalizedMediaItem> {
        let id = match entry.pointer(&self.id)? {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        Some(NormalizedMediaItem {
            provider,
            id,
            media_type: self.media_type,
            preview_url: text_at(entry, &self.preview_url)?,
            url: text_at(entry, &self.url)?,
            width: self.width.as_deref().and_then(|p| dimension_at(entry, p)),
            height: self.height.as_deref().and_then(|p| dimension_at(entry, p)),
            attribution: Attribution {
                author: self.author.as_deref().and_then(|p| text_at(entry, p)),
                author_url: self.author_url.as_deref().and_then(|p| text_at(entry, p)),
                page_url: self.page_url.as_deref().and_then(|p| text_at(entry, p)),
                description: self.description.as_deref().and_then(|p| text_at(entry, p)),
            },
        })
    }
}

fn text_at(entry: &Value, pointer: &str) -> Option<String> {
    entry
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn dimension_at(entry: &Value, pointer: &str) -> Option<u32> {
    entry
        .pointer(pointer)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}
