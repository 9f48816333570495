//! Normalized result types and aggregation
//!
//! Every provider's response is reduced to the same shape here, so callers
//! never see provider-specific key names.

mod aggregated;
mod types;

pub use aggregated::{AggregatedResult, ProviderReport};
pub use types::*;
