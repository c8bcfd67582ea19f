use async_trait::async_trait;

use super::CacheError;
use crate::models::{Request, Response};

/// Host-provided storage of named cache generations.
///
/// Reads are expected to be safe to run concurrently. Concurrent writes to
/// the same key are last-write-wins.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open the generation `name`, creating it empty if absent.
    async fn open(&self, name: &str) -> Result<(), CacheError>;

    /// Store `response` for `request` in generation `name`, creating the
    /// generation if needed. Non-GET requests are rejected.
    async fn put(&self, name: &str, request: &Request, response: Response)
        -> Result<(), CacheError>;

    /// Look `request` up in one generation.
    async fn lookup(&self, name: &str, request: &Request) -> Result<Option<Response>, CacheError>;

    /// Look `request` up across all generations in creation order; first hit wins.
    async fn match_any(&self, request: &Request) -> Result<Option<Response>, CacheError>;

    /// Names of all generations in creation order.
    async fn keys(&self) -> Result<Vec<String>, CacheError>;

    /// Delete a generation. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;
}
