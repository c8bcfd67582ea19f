use thiserror::Error;

use super::WorkerState;
use crate::cache::CacheError;
use crate::net::NetworkError;
use crate::notify::HostError;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Cannot {event} while worker is {state}")]
    InvalidTransition {
        event: &'static str,
        state: WorkerState,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Request for {url} failed and no cached copy exists: {source}")]
    Offline {
        url: String,
        #[source]
        source: NetworkError,
    },

    #[error("Failed to delete stale cache generations: {}", .0.join(", "))]
    Eviction(Vec<String>),

    #[error("Invalid URL {path}: {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Host(#[from] HostError),
}
