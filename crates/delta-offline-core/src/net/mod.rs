//! Network access for the cache manager.
//!
//! This module provides the `Network` seam and `HttpNetwork`, the shipped
//! implementation on top of `reqwest`. The network layer never caches and
//! never retries: one call is one attempt.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::{Request, Response};

pub use client::HttpNetwork;
pub use error::NetworkError;

/// Forwards a request to the origin.
///
/// Any HTTP status is a successful fetch. Only transport failures
/// (offline, DNS, timeout) are errors.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError>;
}
