//! Mock adapter implementation for testing.

use super::fields::FieldMapping;
use super::traits::*;
use crate::error::{ProviderError, ProviderErrorKind};
use crate::search::{MediaKind, Query};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behavior {
    Items { count: usize, incomplete: usize },
    Fail(ProviderErrorKind),
    Hang,
}

/// In-memory adapter with scripted responses
#[derive(Debug)]
pub struct MockAdapter {
    id: ProviderId,
    behavior: Behavior,
    delay: Option<Duration>,
    images_only: bool,
    broken_mapping: bool,
    fail_kind: Option<(MediaKind, ProviderErrorKind)>,
    calls: AtomicUsize,
}

impl MockAdapter {
    fn new(id: ProviderId, behavior: Behavior) -> Self {
        Self {
            id,
            behavior,
            delay: None,
            images_only: false,
            broken_mapping: false,
            fail_kind: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Responds with `count` complete items
    pub fn with_items(id: ProviderId, count: usize) -> Self {
        Self::new(
            id,
            Behavior::Items {
                count,
                incomplete: 0,
            },
        )
    }

    /// Fails every call with `kind`
    pub fn failing(id: ProviderId, kind: ProviderErrorKind) -> Self {
        Self::new(id, Behavior::Fail(kind))
    }

    /// Never completes
    pub fn hanging(id: ProviderId) -> Self {
        Self::new(id, Behavior::Hang)
    }

    /// Append items missing their full-size URL
    pub fn with_incomplete(mut self, incomplete: usize) -> Self {
        if let Behavior::Items { count, .. } = self.behavior {
            self.behavior = Behavior::Items { count, incomplete };
        }
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn images_only(mut self) -> Self {
        self.images_only = true;
        self
    }

    /// Fail only searches for `media`
    pub fn failing_for(mut self, media: MediaKind, kind: ProviderErrorKind) -> Self {
        self.fail_kind = Some((media, kind));
        self
    }

    pub fn with_broken_mapping(mut self) -> Self {
        self.broken_mapping = true;
        self
    }

    /// Number of fetch calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn body(
        &self,
        query: &Query,
        kind: MediaKind,
        count: usize,
        incomplete: usize,
    ) -> serde_json::Value {
        let prefix = match kind {
            MediaKind::Image => String::new(),
            MediaKind::Video => "video-".to_string(),
        };
        let complete = (0..count).map(|i| {
            json!({
                "ref": format!("{}{}-{}", prefix, self.id, i),
                "thumb": format!("https://mock.{}/{}/{}/thumb", self.id, query.term, i),
                "full": format!("https://mock.{}/{}/{}/full", self.id, query.term, i),
                "w": 640 + i,
                "h": 480,
                "by": "mock",
            })
        });
        let partial = (count..count + incomplete).map(|i| {
            json!({
                "ref": format!("{}{}-{}", prefix, self.id, i),
                "thumb": format!("https://mock.{}/{}/{}/thumb", self.id, query.term, i),
            })
        });

        json!({ "data": complete.chain(partial).collect::<Vec<_>>() })
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn supports(&self, kind: MediaKind) -> bool {
        !self.images_only || kind == MediaKind::Image
    }

    fn field_mapping(&self, kind: MediaKind) -> FieldMapping {
        let id = if self.broken_mapping { "" } else { "/ref" };
        FieldMapping::new(kind, "/data", id, "/thumb", "/full")
            .size("/w", "/h")
            .author("/by", None)
    }

    async fn fetch(&self, query: &Query, kind: MediaKind) -> Result<RawResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some((media, error)) = self.fail_kind.filter(|(media, _)| *media == kind) {
            return Err(ProviderError::new(
                self.id,
                error,
                format!("scripted {} failure", media),
            ));
        }

        match &self.behavior {
            Behavior::Items { count, incomplete } => {
                Ok(RawResult(self.body(query, kind, *count, *incomplete)))
            }
            Behavior::Fail(kind) => Err(ProviderError::new(self.id, *kind, "scripted failure")),
            Behavior::Hang => std::future::pending().await,
        }
    }
}
