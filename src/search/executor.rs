//! Search execution and orchestration

use super::models::{Query, SearchMode};
use crate::config::{positive_duration, ProviderConfig, SearchSettings, Settings};
use crate::error::{ConfigurationError, ProviderError, ProviderErrorKind, SearchError};
use crate::network::HttpClient;
use crate::providers::{ProviderAbout, ProviderId, ProviderRegistry, SearchStrategy};
use crate::results::{AggregatedResult, NormalizedResultSet};
use futures::future;
use futures::stream::{self, BoxStream, FuturesUnordered, StreamExt};
use once_cell::sync::OnceCell;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

/// How strategies are driven within one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    /// One after another, in declaration order
    Sequential,
    /// All at once, joined before merging
    Concurrent,
}

/// A configured provider with its resolved strategy
struct ConfiguredProvider {
    id: ProviderId,
    strategy: Arc<dyn SearchStrategy>,
    timeout: Duration,
}

impl ConfiguredProvider {
    /// Run the strategy under the provider's timeout
    async fn search(&self, index: usize, query: &Query) -> (usize, NormalizedResultSet) {
        debug!("Searching provider {} with timeout {:?}", self.id, self.timeout);

        let set = match tokio::time::timeout(self.timeout, self.strategy.fetch_media(query)).await
        {
            Ok(set) => set,
            Err(_) => {
                warn!("Timeout for provider {}", self.id);
                let error = ProviderError::new(
                    self.id,
                    ProviderErrorKind::Timeout,
                    format!("no response within {:?}", self.timeout),
                );
                NormalizedResultSet::failed(self.id, error)
                    .with_elapsed(self.timeout.as_millis() as u64)
            }
        };

        (index, set)
    }
}

/// Runtime used by the blocking entry point, created on first use
#[derive(Default)]
struct BlockingRuntime(OnceCell<Runtime>);

impl BlockingRuntime {
    fn get(&self) -> std::io::Result<&Runtime> {
        // A worker thread keeps pooled connections serviced between calls
        self.0.get_or_try_init(|| {
            Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("media-searcher-blocking")
                .enable_all()
                .build()
        })
    }
}

impl Drop for BlockingRuntime {
    fn drop(&mut self) {
        // Dropping a runtime inside an async context panics; this does not
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}

/// Client that searches one or many providers and merges their results
pub struct SearchClient {
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Providers in declaration order
    providers: Vec<ConfiguredProvider>,
    /// Search settings
    settings: SearchSettings,
    blocking: BlockingRuntime,
}

impl SearchClient {
    /// Create a client for the given provider configs with default settings
    pub fn new(configs: Vec<ProviderConfig>) -> Result<Self, SearchError> {
        let registry = Arc::new(ProviderRegistry::new(HttpClient::new()?));
        Ok(Self::with_registry(registry, &configs, SearchSettings::default())?)
    }

    /// Create a client from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self, SearchError> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let registry = Arc::new(ProviderRegistry::new(client));
        Ok(Self::with_registry(
            registry,
            &settings.providers,
            settings.search.clone(),
        )?)
    }

    /// Create a client resolving strategies through `registry`
    pub fn with_registry(
        registry: Arc<ProviderRegistry>,
        configs: &[ProviderConfig],
        settings: SearchSettings,
    ) -> Result<Self, ConfigurationError> {
        settings.validate()?;
        let mut providers: Vec<ConfiguredProvider> = Vec::with_capacity(configs.len());

        for config in configs {
            if config.disabled {
                info!("Skipping disabled provider: {}", config.provider);
                continue;
            }
            if providers.iter().any(|p| p.id == config.provider) {
                return Err(ConfigurationError::DuplicateProvider(config.provider));
            }

            let timeout = Self::provider_timeout(config, &settings)?;
            let strategy = registry.create(config)?;
            info!("Loaded provider: {}", config.provider);

            providers.push(ConfiguredProvider {
                id: config.provider,
                strategy,
                timeout,
            });
        }

        if providers.is_empty() {
            return Err(ConfigurationError::NoProviders);
        }

        Ok(Self {
            registry,
            providers,
            settings,
            blocking: BlockingRuntime::default(),
        })
    }

    /// Effective timeout for a provider, capped at the configured maximum
    fn provider_timeout(
        config: &ProviderConfig,
        settings: &SearchSettings,
    ) -> Result<Duration, ConfigurationError> {
        let requested = match config.timeout {
            Some(seconds) => positive_duration(seconds)
                .ok_or(ConfigurationError::InvalidTimeout(config.provider))?,
            None => settings.default_timeout()?,
        };
        let max = settings.max_timeout()?;

        if requested > max {
            debug!(
                "Capping timeout for {} from {:?} to {:?}",
                config.provider, requested, max
            );
        }
        Ok(requested.min(max))
    }

    /// Configured providers in declaration order
    pub fn providers(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| p.id).collect()
    }

    /// Metadata of each configured provider, in declaration order
    pub fn describe(&self) -> Vec<(ProviderId, ProviderAbout)> {
        self.providers
            .iter()
            .map(|p| (p.id, p.strategy.about()))
            .collect()
    }

    /// Mode from settings, for callers that do not choose one
    pub fn default_mode(&self) -> SearchMode {
        self.settings.default_mode
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Search on the calling thread, one provider after another.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`search_async`](Self::search_async) there.
    pub fn search(&self, query: &Query, mode: SearchMode) -> Result<AggregatedResult, SearchError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(SearchError::Runtime(std::io::Error::new(
                std::io::ErrorKind::Other,
                "blocking search called from inside an async runtime",
            )));
        }

        let runtime = self.blocking.get()?;
        let result = runtime.block_on(self.run(
            query,
            mode,
            Dispatch::Sequential,
            future::pending::<()>(),
        ))?;
        Ok(result)
    }

    /// Search all selected providers concurrently
    pub async fn search_async(
        &self,
        query: &Query,
        mode: SearchMode,
    ) -> Result<AggregatedResult, SearchError> {
        self.search_async_until(query, mode, future::pending::<()>())
            .await
    }

    /// Search concurrently, abandoning providers still pending after `deadline`
    pub async fn search_async_with_deadline(
        &self,
        query: &Query,
        mode: SearchMode,
        deadline: Duration,
    ) -> Result<AggregatedResult, SearchError> {
        self.search_async_until(query, mode, tokio::time::sleep(deadline))
            .await
    }

    /// Search concurrently until `cancel` resolves.
    ///
    /// Providers that finished before cancellation keep their results; the
    /// rest are reported as cancelled.
    pub async fn search_async_until<C>(
        &self,
        query: &Query,
        mode: SearchMode,
        cancel: C,
    ) -> Result<AggregatedResult, SearchError>
    where
        C: Future<Output = ()> + Send,
    {
        Ok(self.run(query, mode, Dispatch::Concurrent, cancel).await?)
    }

    /// Resolve the providers a search will dispatch to, in order
    fn plan(
        &self,
        query: &Query,
        mode: SearchMode,
    ) -> Result<Vec<&ConfiguredProvider>, ConfigurationError> {
        let requested = query.distinct_providers();

        let ids = match mode {
            SearchMode::Single => {
                if requested.len() != 1 {
                    return Err(ConfigurationError::ProviderCount {
                        mode: mode.to_string(),
                        count: requested.len(),
                    });
                }
                requested
            }
            SearchMode::Hybrid if requested.is_empty() => self.providers(),
            SearchMode::Hybrid => requested,
        };

        ids.into_iter()
            .map(|id| {
                self.providers
                    .iter()
                    .find(|p| p.id == id)
                    .ok_or(ConfigurationError::ProviderNotConfigured(id))
            })
            .collect()
    }

    /// Dispatch, wait for every provider (or cancellation), then merge
    async fn run<C>(
        &self,
        query: &Query,
        mode: SearchMode,
        dispatch: Dispatch,
        cancel: C,
    ) -> Result<AggregatedResult, ConfigurationError>
    where
        C: Future<Output = ()> + Send,
    {
        let plan = self.plan(query, mode)?;

        info!(
            "Executing search '{}' in {} mode on {} providers",
            query.term,
            mode,
            plan.len()
        );

        let mut outcomes: BoxStream<'_, (usize, NormalizedResultSet)> = match dispatch {
            Dispatch::Sequential => stream::iter(plan.iter().enumerate())
                .then(|(index, provider)| provider.search(index, query))
                .boxed(),
            Dispatch::Concurrent => plan
                .iter()
                .enumerate()
                .map(|(index, provider)| provider.search(index, query))
                .collect::<FuturesUnordered<_>>()
                .boxed(),
        };

        // Each provider writes only its own slot; merging waits until all settle
        let mut slots: Vec<Option<NormalizedResultSet>> = plan.iter().map(|_| None).collect();

        tokio::pin!(cancel);
        loop {
            tokio::select! {
                biased;
                next = outcomes.next() => match next {
                    Some((index, set)) => slots[index] = Some(set),
                    None => break,
                },
                _ = &mut cancel => {
                    let pending = slots.iter().filter(|s| s.is_none()).count();
                    warn!("Search '{}' cancelled with {} providers pending", query.term, pending);
                    break;
                }
            }
        }
        drop(outcomes);

        let result = AggregatedResult::merge(
            plan.iter()
                .zip(slots)
                .map(|(provider, slot)| {
                    slot.unwrap_or_else(|| NormalizedResultSet::cancelled(provider.id))
                }),
        );

        info!(
            "Search '{}' returned {} results, {} of {} providers failed",
            query.term,
            result.len(),
            result.failed().len(),
            result.providers.len()
        );

        Ok(result)
    }
}
