//! Search orchestration module
//!
//! Resolves providers for a query, dispatches them sequentially or
//! concurrently, and merges their results.

mod executor;
mod models;

pub use executor::SearchClient;
pub use models::*;
