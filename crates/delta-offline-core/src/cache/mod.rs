//! Named cache generations for offline responses.
//!
//! This module provides the `CacheStorage` seam and the shipped `CacheStore`
//! implementation. A store holds any number of named generations; each
//! generation maps a request key to the response captured for it. Entries
//! never expire: a generation is dropped whole when the worker activates
//! under a different name.
//!
//! Generations can be persisted as one JSON file each, so a host process
//! can pick up where the previous one left off.

pub mod entry;
pub mod error;
pub mod storage;
pub mod store;

pub use entry::CachedData;
pub use error::CacheError;
pub use storage::CacheStorage;
pub use store::CacheStore;
