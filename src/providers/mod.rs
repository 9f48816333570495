//! Media provider module
//!
//! Defines the adapter and strategy traits and a registry for all providers.

mod fields;
mod registry;
mod strategy;
mod traits;

#[cfg(test)]
pub(crate) mod mock;

// Provider implementations
pub mod pexels;
pub mod pixabay;
pub mod unsplash;

pub use fields::FieldMapping;
pub use registry::{ProviderConstructor, ProviderRegistry};
pub use strategy::{AdapterStrategy, SearchStrategy};
pub use traits::*;
