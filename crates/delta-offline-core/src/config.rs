//! Worker configuration.
//!
//! Defaults reproduce the site's built-in worker: generation
//! `delta-lighting-v1`, the eleven-page precache manifest and the
//! `sync-test-requests` background sync. A JSON file at
//! `~/.config/delta-offline/config.json` may override any field; bumping
//! `cache_name` is how a new generation gets rolled out.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "delta-offline";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Current cache generation
pub const CACHE_NAME: &str = "delta-lighting-v1";

/// Same-origin paths precached on install, in order
pub const PRECACHE_URLS: &[&str] = &[
    "/",
    "/index.html",
    "/styles.css",
    "/script.js",
    "/manifest.json",
    "/about.html",
    "/tests/thermal.html",
    "/tests/ip.html",
    "/tests/photometric.html",
    "/tests/electrical.html",
    "/tests/color.html",
];

/// Background sync tag that triggers a submission flush
pub const SYNC_TAG: &str = "sync-test-requests";

/// Endpoint called by background sync
pub const SYNC_ENDPOINT: &str = "/api/submit-requests";

/// Origin used when nothing else is configured
const DEFAULT_ORIGIN: &str = "http://localhost:8080/";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub origin: Url,
    pub cache_name: String,
    pub precache: Vec<String>,
    pub sync_tag: String,
    pub sync_endpoint: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            cache_name: CACHE_NAME.to_string(),
            precache: PRECACHE_URLS.iter().map(|p| p.to_string()).collect(),
            sync_tag: SYNC_TAG.to_string(),
            sync_endpoint: SYNC_ENDPOINT.to_string(),
        }
    }
}

impl WorkerConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    pub fn with_precache<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.precache = paths.into_iter().map(Into::into).collect();
        self
    }

    /// The origin's root page, the target of notification clicks
    pub fn root_url(&self) -> Url {
        let mut root = self.origin.clone();
        root.set_path("/");
        root.set_query(None);
        root.set_fragment(None);
        root
    }

    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        self.origin.join(path)
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join(CONFIG_FILE))
    }

    /// Default directory for persisted cache generations and registration
    pub fn default_cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

/// `~/.config/delta-offline` or the platform equivalent
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
    Ok(config_dir.join(APP_NAME))
}
