//! media-searcher: unified search across stock media providers
//!
//! Queries Pixabay, Unsplash and Pexels through one interface, normalizes
//! their responses, and merges results from several providers in hybrid mode.
//! A failing provider is reported in the result instead of failing the search.

pub mod config;
pub mod error;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;

pub use config::{ProviderConfig, Settings};
pub use error::{ConfigurationError, ProviderError, ProviderErrorKind, SearchError};
pub use providers::{ProviderId, ProviderRegistry, SearchStrategy};
pub use results::{AggregatedResult, NormalizedMediaItem, NormalizedResultSet, ProviderStatus};
pub use search::{MediaKind, MediaSelection, Orientation, Query, SearchClient, SearchMode};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default per-provider timeout in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum per-provider timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
