//! Merged output of a search call

use super::types::*;
use crate::providers::ProviderId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-provider summary within an aggregated result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReport {
    pub provider: ProviderId,
    pub status: ProviderStatus,
    /// Number of items this provider contributed
    pub result_count: usize,
    /// Time spent on the provider call in milliseconds
    pub elapsed_ms: u64,
}

/// Result of a search call, merged across providers
///
/// Items keep provider declaration order first and each provider's native
/// order within its block. No cross-provider deduplication or re-ranking is
/// applied: identifiers from different providers are not comparable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub items: Vec<NormalizedMediaItem>,
    /// One report per dispatched provider, in declaration order
    pub providers: Vec<ProviderReport>,
}

impl AggregatedResult {
    /// Concatenate per-provider result sets in the order given
    pub fn merge(sets: impl IntoIterator<Item = NormalizedResultSet>) -> Self {
        let mut aggregated = Self::default();

        for set in sets {
            aggregated.providers.push(ProviderReport {
                provider: set.provider,
                status: set.status,
                result_count: set.items.len(),
                elapsed_ms: set.elapsed_ms,
            });
            aggregated.items.extend(set.items);
        }

        aggregated
    }

    /// Status of one provider, if it was part of this search
    pub fn status(&self, provider: ProviderId) -> Option<&ProviderStatus> {
        self.providers
            .iter()
            .find(|r| r.provider == provider)
            .map(|r| &r.status)
    }

    /// Status of every dispatched provider
    pub fn statuses(&self) -> HashMap<ProviderId, ProviderStatus> {
        self.providers
            .iter()
            .map(|r| (r.provider, r.status.clone()))
            .collect()
    }

    /// Items contributed by one provider
    pub fn items_from(&self, provider: ProviderId) -> impl Iterator<Item = &NormalizedMediaItem> {
        self.items.iter().filter(move |i| i.provider == provider)
    }

    /// Providers that did not fail
    pub fn succeeded(&self) -> Vec<ProviderId> {
        self.providers
            .iter()
            .filter(|r| !r.status.is_failed())
            .map(|r| r.provider)
            .collect()
    }

    /// Providers that failed
    pub fn failed(&self) -> Vec<ProviderId> {
        self.providers
            .iter()
            .filter(|r| r.status.is_failed())
            .map(|r| r.provider)
            .collect()
    }

    pub fn all_failed(&self) -> bool {
        !self.providers.is_empty() && self.providers.iter().all(|r| r.status.is_failed())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
