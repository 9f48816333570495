//! HTTP networking module
//!
//! Provides the shared HTTP client used by provider adapters.

mod client;

pub use client::HttpClient;
