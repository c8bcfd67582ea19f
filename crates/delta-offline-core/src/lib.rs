//! Offline cache manager for the DELTA Lighting Lab website.
//!
//! The manager mirrors the lifecycle of an installable web app's cache
//! worker: precache a fixed manifest on install, serve cache-first on fetch,
//! and drop stale cache generations on activation. Every host capability
//! (cache storage, network, window clients) sits behind a trait so a browser
//! bridge, the command-line host or a test harness can drive transitions.

pub mod cache;
pub mod config;
pub mod models;
pub mod net;
pub mod notify;
pub mod preferences;
pub mod worker;

pub use cache::{CacheError, CacheStorage, CacheStore};
pub use config::{WorkerConfig, CACHE_NAME, PRECACHE_URLS, SYNC_ENDPOINT, SYNC_TAG};
pub use models::{Request, RequestKey, Response};
pub use net::{HttpNetwork, Network, NetworkError};
pub use notify::{
    ClickAction, ClientHost, HostError, Notification, NotificationClick, WindowClient,
    DEFAULT_PUSH_BODY,
};
pub use preferences::{Language, Preferences, Theme};
pub use worker::{
    ActivateReport, ClickOutcome, InstallReport, OfflineCacheManager, Registration,
    RegistrationStore, SyncOutcome, WorkerError, WorkerState,
};
