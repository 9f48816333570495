//! Search strategies
//!
//! A strategy turns one provider's raw response into a normalized result set
//! and absorbs that provider's errors into a status.

use super::fields::FieldMapping;
use super::traits::{ProviderAbout, ProviderAdapter, ProviderId};
use crate::error::ConfigurationError;
use crate::results::{NormalizedResultSet, ProviderStatus};
use crate::search::{MediaKind, Query};
use async_trait::async_trait;
use futures::future;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Per-provider search behavior behind a uniform interface
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    /// Provider this strategy searches
    fn provider(&self) -> ProviderId;

    /// Provider metadata
    fn about(&self) -> ProviderAbout;

    /// Search the provider and normalize its response.
    ///
    /// Never fails: provider errors become a `Failed` status with no items.
    async fn fetch_media(&self, query: &Query) -> NormalizedResultSet;
}

/// Strategy that delegates to an adapter and normalizes through field tables
pub struct AdapterStrategy {
    adapter: Arc<dyn ProviderAdapter>,
    mappings: HashMap<MediaKind, FieldMapping>,
}

impl AdapterStrategy {
    /// Wrap an adapter, validating the field mapping of every supported kind
    pub fn new(adapter: Arc<dyn ProviderAdapter>) -> Result<Self, ConfigurationError> {
        let provider = adapter.id();
        let mut mappings = HashMap::new();

        for kind in [MediaKind::Image, MediaKind::Video] {
            if !adapter.supports(kind) {
                continue;
            }
            let mapping = adapter.field_mapping(kind);
            mapping.validate(provider)?;
            if mapping.media_type != kind {
                return Err(ConfigurationError::InvalidFieldMapping {
                    provider,
                    reason: format!("{} mapping declares media type {}", kind, mapping.media_type),
                });
            }
            mappings.insert(kind, mapping);
        }

        Ok(Self { adapter, mappings })
    }

    pub fn adapter(&self) -> &Arc<dyn ProviderAdapter> {
        &self.adapter
    }
}

#[async_trait]
impl SearchStrategy for AdapterStrategy {
    fn provider(&self) -> ProviderId {
        self.adapter.id()
    }

    fn about(&self) -> ProviderAbout {
        self.adapter.about()
    }

    async fn fetch_media(&self, query: &Query) -> NormalizedResultSet {
        let provider = self.provider();

        let selected: Vec<(MediaKind, &FieldMapping)> = query
            .media
            .kinds()
            .iter()
            .filter_map(|kind| match self.mappings.get(kind) {
                Some(mapping) => Some((*kind, mapping)),
                None => {
                    debug!("{} does not support {} search", provider, kind);
                    None
                }
            })
            .collect();

        if selected.is_empty() {
            return NormalizedResultSet::success(provider, Vec::new());
        }

        // Kinds are fetched together and kept in selection order
        let start = Instant::now();
        let outcomes = future::join_all(selected.iter().map(|(kind, mapping)| async move {
            let outcome = self
                .adapter
                .fetch(query, *kind)
                .await
                .and_then(|raw| mapping.normalize(provider, &raw));
            (*kind, outcome)
        }))
        .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let fetched = outcomes.len();
        let mut items = Vec::new();
        let mut skipped = 0;
        let mut failed = Vec::new();
        let mut first_error = None;

        for (kind, outcome) in outcomes {
            match outcome {
                Ok((kind_items, kind_skipped)) => {
                    items.extend(kind_items);
                    skipped += kind_skipped;
                }
                Err(e) => {
                    warn!("Provider {} failed for {} search: {}", provider, kind, e);
                    failed.push(kind);
                    first_error.get_or_insert(e);
                }
            }
        }

        if failed.len() == fetched {
            if let Some(error) = first_error {
                return NormalizedResultSet::failed(provider, error).with_elapsed(elapsed_ms);
            }
        }

        if skipped > 0 {
            warn!(
                "{} returned {} items without required fields",
                provider, skipped
            );
        }
        debug!(
            "{} returned {} results in {}ms",
            provider,
            items.len(),
            elapsed_ms
        );

        let mut set = NormalizedResultSet::success(provider, items).with_elapsed(elapsed_ms);
        if skipped > 0 || !failed.is_empty() {
            set.status = ProviderStatus::Partial { skipped, failed };
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use crate::providers::mock::MockAdapter;
    use crate::results::FailureReason;
    use crate::search::MediaSelection;

    #[tokio::test]
    async fn test_success_normalizes_items() {
        let adapter = Arc::new(MockAdapter::with_items(ProviderId::Pixabay, 4));
        let strategy = AdapterStrategy::new(adapter).unwrap();

        let set = strategy.fetch_media(&Query::new("cat")).await;
        assert_eq!(set.status, ProviderStatus::Success);
        assert_eq!(set.len(), 4);
        assert_eq!(set.items[0].id, "pixabay-0");
        assert_eq!(set.items[3].id, "pixabay-3");
    }

    #[tokio::test]
    async fn test_error_becomes_failed_status() {
        let adapter = Arc::new(MockAdapter::failing(
            ProviderId::Unsplash,
            ProviderErrorKind::Auth,
        ));
        let strategy = AdapterStrategy::new(adapter.clone()).unwrap();

        let set = strategy.fetch_media(&Query::new("cat")).await;
        assert!(set.is_empty());
        assert!(matches!(
            set.status,
            ProviderStatus::Failed(FailureReason::Provider {
                kind: ProviderErrorKind::Auth,
                ..
            })
        ));
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_items_mark_partial() {
        let adapter = Arc::new(MockAdapter::with_items(ProviderId::Pexels, 3).with_incomplete(2));
        let strategy = AdapterStrategy::new(adapter).unwrap();

        let set = strategy.fetch_media(&Query::new("cat")).await;
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.status,
            ProviderStatus::Partial {
                skipped: 2,
                failed: Vec::new()
            }
        );
    }

    #[tokio::test]
    async fn test_unsupported_kind_skips_fetch() {
        let adapter = Arc::new(MockAdapter::with_items(ProviderId::Unsplash, 2).images_only());
        let strategy = AdapterStrategy::new(adapter.clone()).unwrap();

        let query = Query::new("cat").with_media(MediaKind::Video);
        let set = strategy.fetch_media(&query).await;
        assert!(set.is_empty());
        assert_eq!(set.status, ProviderStatus::Success);
        assert_eq!(adapter.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_media_fetches_each_kind() {
        let adapter = Arc::new(MockAdapter::with_items(ProviderId::Pexels, 2));
        let strategy = AdapterStrategy::new(adapter.clone()).unwrap();

        let query = Query::new("sea").with_media(MediaSelection::All);
        let set = strategy.fetch_media(&query).await;

        let ids: Vec<_> = set.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["pexels-0", "pexels-1", "video-pexels-0", "video-pexels-1"]);
        assert_eq!(set.items[0].media_type, MediaKind::Image);
        assert_eq!(set.items[3].media_type, MediaKind::Video);
        assert_eq!(set.status, ProviderStatus::Success);
        assert_eq!(adapter.calls(), 2);
    }

    #[tokio::test]
    async fn test_all_media_on_images_only_provider() {
        let adapter = Arc::new(MockAdapter::with_items(ProviderId::Unsplash, 3).images_only());
        let strategy = AdapterStrategy::new(adapter.clone()).unwrap();

        let query = Query::new("sea").with_media(MediaSelection::All);
        let set = strategy.fetch_media(&query).await;

        assert_eq!(set.len(), 3);
        assert_eq!(set.status, ProviderStatus::Success);
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn test_one_failed_kind_keeps_the_other() {
        let adapter = Arc::new(
            MockAdapter::with_items(ProviderId::Pixabay, 2)
                .failing_for(MediaKind::Video, ProviderErrorKind::RateLimit),
        );
        let strategy = AdapterStrategy::new(adapter).unwrap();

        let query = Query::new("sea").with_media(MediaSelection::All);
        let set = strategy.fetch_media(&query).await;

        assert_eq!(set.len(), 2);
        assert!(set.items.iter().all(|i| i.media_type == MediaKind::Image));
        assert_eq!(
            set.status,
            ProviderStatus::Partial {
                skipped: 0,
                failed: vec![MediaKind::Video]
            }
        );
    }

    #[tokio::test]
    async fn test_every_kind_failing_is_failed() {
        let adapter = Arc::new(MockAdapter::failing(
            ProviderId::Pexels,
            ProviderErrorKind::Network,
        ));
        let strategy = AdapterStrategy::new(adapter).unwrap();

        let query = Query::new("sea").with_media(MediaSelection::All);
        let set = strategy.fetch_media(&query).await;

        assert!(set.is_empty());
        assert_eq!(set.status.error_kind(), Some(ProviderErrorKind::Network));
    }

    #[test]
    fn test_invalid_mapping_rejected() {
        let adapter = Arc::new(MockAdapter::with_items(ProviderId::Pixabay, 1).with_broken_mapping());
        let err = AdapterStrategy::new(adapter).err();
        assert!(matches!(
            err,
            Some(ConfigurationError::InvalidFieldMapping {
                provider: ProviderId::Pixabay,
                ..
            })
        ));
    }
}
