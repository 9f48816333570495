//! Provider registry for constructing and caching search strategies

use super::strategy::{AdapterStrategy, SearchStrategy};
use super::traits::{ProviderAdapter, ProviderId};
use super::{pexels, pixabay, unsplash};
use crate::config::ProviderConfig;
use crate::error::ConfigurationError;
use crate::network::HttpClient;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Builds an adapter from a validated provider config
pub type ProviderConstructor =
    Arc<dyn Fn(&ProviderConfig, &HttpClient) -> Arc<dyn ProviderAdapter> + Send + Sync>;

/// Identity of a cached strategy. Timeouts are applied by the client, not the
/// strategy, so they are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StrategyKey {
    provider: ProviderId,
    key: String,
    base_url: Option<String>,
}

impl From<&ProviderConfig> for StrategyKey {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            provider: config.provider,
            key: config.key.clone(),
            base_url: config.base_url.clone(),
        }
    }
}

/// Registry of provider constructors
///
/// Adding a provider means registering one more constructor; existing
/// entries are untouched. Strategies are cached per distinct config so
/// repeated lookups share one validated instance.
pub struct ProviderRegistry {
    /// HTTP client handed to every constructor
    client: HttpClient,
    /// Constructors by provider
    constructors: HashMap<ProviderId, ProviderConstructor>,
    /// Strategies built so far
    strategies: RwLock<HashMap<StrategyKey, Arc<dyn SearchStrategy>>>,
}

impl ProviderRegistry {
    /// Create a registry with the built-in providers
    pub fn new(client: HttpClient) -> Self {
        let mut registry = Self::empty(client);

        registry.register(ProviderId::Pixabay, |config, client| {
            Arc::new(match &config.base_url {
                Some(url) => pixabay::Pixabay::with_base_url(&config.key, client.clone(), url),
                None => pixabay::Pixabay::new(&config.key, client.clone()),
            })
        });
        registry.register(ProviderId::Unsplash, |config, client| {
            Arc::new(match &config.base_url {
                Some(url) => unsplash::Unsplash::with_base_url(&config.key, client.clone(), url),
                None => unsplash::Unsplash::new(&config.key, client.clone()),
            })
        });
        registry.register(ProviderId::Pexels, |config, client| {
            Arc::new(match &config.base_url {
                Some(url) => pexels::Pexels::with_base_url(&config.key, client.clone(), url),
                None => pexels::Pexels::new(&config.key, client.clone()),
            })
        });

        registry
    }

    /// Create a registry with no providers
    pub fn empty(client: HttpClient) -> Self {
        Self {
            client,
            constructors: HashMap::new(),
            strategies: RwLock::new(HashMap::new()),
        }
    }

    /// Register a constructor, replacing any previous one for `provider`
    pub fn register<F>(&mut self, provider: ProviderId, constructor: F)
    where
        F: Fn(&ProviderConfig, &HttpClient) -> Arc<dyn ProviderAdapter> + Send + Sync + 'static,
    {
        self.constructors.insert(provider, Arc::new(constructor));

        // Drop strategies built by a replaced constructor
        self.strategies
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|key, _| key.provider != provider);
    }

    /// Get a validated strategy for a provider config.
    ///
    /// Equal configs return the same shared instance.
    pub fn create(
        &self,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn SearchStrategy>, ConfigurationError> {
        let provider = config.provider;

        if config.key.trim().is_empty() {
            return Err(ConfigurationError::MissingCredentials(provider));
        }
        if let Some(ref base_url) = config.base_url {
            url::Url::parse(base_url).map_err(|e| ConfigurationError::InvalidBaseUrl {
                provider,
                reason: e.to_string(),
            })?;
        }

        let key = StrategyKey::from(config);
        if let Some(strategy) = self
            .strategies
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            return Ok(strategy.clone());
        }

        let constructor = self
            .constructors
            .get(&provider)
            .ok_or_else(|| ConfigurationError::UnknownProvider(provider.to_string()))?;

        let adapter = constructor(config, &self.client);
        let about = adapter.about();
        let strategy: Arc<dyn SearchStrategy> = Arc::new(AdapterStrategy::new(adapter)?);

        let mut strategies = self.strategies.write().unwrap_or_else(|e| e.into_inner());
        let strategy = strategies.entry(key).or_insert(strategy).clone();
        info!(
            "Created strategy for provider {} ({}, official API: {})",
            provider,
            about.website.as_deref().unwrap_or("no website"),
            about.use_official_api
        );

        Ok(strategy)
    }

    /// Providers with a registered constructor
    pub fn providers(&self) -> Vec<ProviderId> {
        let mut providers: Vec<_> = self.constructors.keys().copied().collect();
        providers.sort();
        providers
    }

    /// Check if a provider has a constructor
    pub fn contains(&self, provider: ProviderId) -> bool {
        self.constructors.contains_key(&provider)
    }

    /// Number of strategies built so far
    pub fn cached(&self) -> usize {
        self.strategies.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Get the shared HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::MockAdapter;
    use crate::search::Query;

    fn registry() -> ProviderRegistry {
        ProviderRegistry::new(HttpClient::new().unwrap())
    }

    #[test]
    fn test_registry() {
        let registry = registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains(ProviderId::Unsplash));
        assert_eq!(
            registry.providers(),
            vec![ProviderId::Pixabay, ProviderId::Unsplash, ProviderId::Pexels]
        );
    }

    #[test]
    fn test_create_builtin() {
        let registry = registry();
        let strategy = registry
            .create(&ProviderConfig::new(ProviderId::Pexels, "px"))
            .unwrap();
        assert_eq!(strategy.provider(), ProviderId::Pexels);
    }

    #[test]
    fn test_missing_credentials() {
        let registry = registry();
        let err = registry
            .create(&ProviderConfig::new(ProviderId::Pixabay, "   "))
            .err();
        assert_eq!(err, Some(ConfigurationError::MissingCredentials(ProviderId::Pixabay)));
    }

    #[test]
    fn test_unregistered_provider() {
        let registry = ProviderRegistry::empty(HttpClient::new().unwrap());
        let err = registry
            .create(&ProviderConfig::new(ProviderId::Unsplash, "key"))
            .err();
        assert_eq!(
            err,
            Some(ConfigurationError::UnknownProvider("unsplash".to_string()))
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let registry = registry();
        let config = ProviderConfig::new(ProviderId::Pixabay, "key").with_base_url("not a url");
        assert!(matches!(
            registry.create(&config),
            Err(ConfigurationError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_same_config_same_instance() {
        let registry = registry();
        let config = ProviderConfig::new(ProviderId::Unsplash, "us");

        let first = registry.create(&config).unwrap();
        let second = registry.create(&config.clone().with_timeout(1.0)).unwrap();
        let other = registry
            .create(&ProviderConfig::new(ProviderId::Unsplash, "other"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(registry.cached(), 2);
    }

    #[tokio::test]
    async fn test_equal_configs_behave_the_same() {
        let mut registry = ProviderRegistry::empty(HttpClient::new().unwrap());
        registry.register(ProviderId::Pixabay, |_, _| {
            Arc::new(MockAdapter::with_items(ProviderId::Pixabay, 3))
        });

        let config = ProviderConfig::new(ProviderId::Pixabay, "pk");
        let query = Query::new("cat");

        let first = registry.create(&config).unwrap().fetch_media(&query).await;
        let second = registry.create(&config).unwrap().fetch_media(&query).await;
        assert_eq!(first.items, second.items);
        assert_eq!(first.status, second.status);
    }

    #[test]
    fn test_register_replaces_cached_strategies() {
        let mut registry = registry();
        let config = ProviderConfig::new(ProviderId::Pexels, "px");
        registry.create(&config).unwrap();
        assert_eq!(registry.cached(), 1);

        registry.register(ProviderId::Pexels, |_, _| {
            Arc::new(MockAdapter::with_items(ProviderId::Pexels, 1))
        });
        assert_eq!(registry.cached(), 0);
    }

    #[test]
    fn test_broken_mapping_fails_fast() {
        let mut registry = registry();
        registry.register(ProviderId::Pixabay, |_, _| {
            Arc::new(MockAdapter::with_items(ProviderId::Pixabay, 1).with_broken_mapping())
        });
        assert!(matches!(
            registry.create(&ProviderConfig::new(ProviderId::Pixabay, "pk")),
            Err(ConfigurationError::InvalidFieldMapping { .. })
        ));
    }
}
