//! Lifecycle handlers for the offline cache manager.
//!
//! The host delivers each lifecycle event by awaiting the matching `on_*`
//! method. Install and activate take `&mut self`, so they can never overlap;
//! fetch, sync, push and click handlers take `&self` and may run
//! concurrently, sharing only the cache storage.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{WorkerError, WorkerState};
use crate::cache::CacheStorage;
use crate::config::WorkerConfig;
use crate::models::{Request, Response};
use crate::net::{Network, NetworkError};
use crate::notify::{ClientHost, Notification, NotificationClick};

/// Maximum concurrent network requests while precaching the manifest.
const MAX_CONCURRENT_PRECACHE: usize = 6;

/// Outcome of an install: which manifest entries made it into the cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    pub cache_name: String,
    pub cached: Vec<String>,
    pub failed: Vec<FailedEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedEntry {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivateReport {
    pub retained: String,
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Tag not handled by this worker
    Ignored,
    Completed { status: u16 },
    /// Network call failed; left to the host's sync retry policy
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClickOutcome {
    Focused { client_id: String },
    Opened { url: String },
    /// No window showed the site and the host cannot open one
    NoWindow,
    Dismissed,
}

/// Cache-first offline manager for one origin.
pub struct OfflineCacheManager<S, N, H> {
    config: WorkerConfig,
    cache: S,
    network: N,
    host: H,
    state: WorkerState,
}

impl<S, N, H> OfflineCacheManager<S, N, H>
where
    S: CacheStorage,
    N: Network,
    H: ClientHost,
{
    pub fn new(config: WorkerConfig, cache: S, network: N, host: H) -> Self {
        Self {
            config,
            cache,
            network,
            host,
            state: WorkerState::Uninstalled,
        }
    }

    /// Resume from a state recorded by a previous host process
    pub fn with_state(mut self, state: WorkerState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn cache(&self) -> &S {
        &self.cache
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    // ===== Install =====

    /// Open the current generation and precache every manifest entry.
    ///
    /// Entry failures are recorded in the report and otherwise ignored.
    /// Only a failure to open the generation itself fails the install.
    pub async fn on_install(&mut self) -> Result<InstallReport, WorkerError> {
        if !self.state.can_install() {
            return Err(WorkerError::InvalidTransition {
                event: "install",
                state: self.state,
            });
        }
        let previous = self.state;
        self.state = WorkerState::Installing;
        debug!(cache = %self.config.cache_name, "Installing");

        let cache_name = self.config.cache_name.clone();
        if let Err(e) = self.cache.open(&cache_name).await {
            self.state = previous;
            return Err(e.into());
        }

        let this = &*self;
        let name = cache_name.as_str();
        let results: Vec<(String, Result<(), WorkerError>)> = stream::iter(&this.config.precache)
            .map(|path| async move { (path.clone(), this.precache_one(name, path).await) })
            .buffered(MAX_CONCURRENT_PRECACHE)
            .collect()
            .await;

        let mut report = InstallReport {
            cache_name: cache_name.clone(),
            ..InstallReport::default()
        };
        for (path, result) in results {
            match result {
                Ok(()) => report.cached.push(path),
                Err(e) => {
                    warn!(cache = %cache_name, path = %path, error = %e, "Failed to precache entry");
                    report.failed.push(FailedEntry {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.state = WorkerState::Installed;
        info!(
            cache = %cache_name,
            cached = report.cached.len(),
            failed = report.failed.len(),
            "Install complete"
        );
        Ok(report)
    }

    async fn precache_one(&self, cache_name: &str, path: &str) -> Result<(), WorkerError> {
        let url = self
            .config
            .resolve(path)
            .map_err(|source| WorkerError::InvalidUrl {
                path: path.to_string(),
                source,
            })?;
        let request = Request::get(url);
        let response = self.network.fetch(&request).await?;
        if !response.is_success() {
            return Err(NetworkError::from_status(
                request.url().as_str(),
                response.status,
                &response.text(),
            )
            .into());
        }
        self.cache.put(cache_name, &request, response).await?;
        Ok(())
    }

    // ===== Activate =====

    /// Delete every generation except the current one.
    ///
    /// If any deletion fails, activation does not complete: the worker goes
    /// back to `Installed` and the failed names are returned so the host can
    /// retry.
    pub async fn on_activate(&mut self) -> Result<ActivateReport, WorkerError> {
        if !self.state.can_activate() {
            return Err(WorkerError::InvalidTransition {
                event: "activate",
                state: self.state,
            });
        }
        self.state = WorkerState::Activating;
        let current = self.config.cache_name.clone();

        let names = match self.cache.keys().await {
            Ok(names) => names,
            Err(e) => {
                self.state = WorkerState::Installed;
                return Err(e.into());
            }
        };
        let stale: Vec<String> = names.into_iter().filter(|name| *name != current).collect();

        let cache = &self.cache;
        let results = futures::future::join_all(stale.iter().map(|name| cache.delete(name))).await;

        let mut deleted = Vec::new();
        let mut failed = Vec::new();
        for (name, result) in stale.into_iter().zip(results) {
            match result {
                Ok(_) => deleted.push(name),
                Err(e) => {
                    warn!(cache = %name, error = %e, "Failed to delete stale cache generation");
                    failed.push(name);
                }
            }
        }

        if !failed.is_empty() {
            self.state = WorkerState::Installed;
            return Err(WorkerError::Eviction(failed));
        }

        self.state = WorkerState::Active;
        info!(cache = %current, deleted = deleted.len(), "Activation complete");
        Ok(ActivateReport {
            retained: current,
            deleted,
        })
    }

    // ===== Fetch =====

    /// Answer a request: cache, then network, then cache again.
    ///
    /// Network responses are returned as-is and never stored.
    pub async fn on_fetch(&self, request: &Request) -> Result<Response, WorkerError> {
        match self.cache.match_any(request).await {
            Ok(Some(response)) => {
                debug!(request = %request, "Cache hit");
                return Ok(response);
            }
            Ok(None) => debug!(request = %request, "Cache miss"),
            Err(e) => warn!(request = %request, error = %e, "Cache lookup failed, treating as miss"),
        }

        let network_error = match self.network.fetch(request).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };
        debug!(request = %request, error = %network_error, "Network failed, retrying cache");

        match self.cache.match_any(request).await {
            Ok(Some(response)) => return Ok(response),
            Ok(None) => {}
            Err(e) => warn!(request = %request, error = %e, "Fallback cache lookup failed"),
        }

        Err(WorkerError::Offline {
            url: request.url().to_string(),
            source: network_error,
        })
    }

    // ===== Background sync =====

    /// Flush pending submissions on the configured sync tag.
    ///
    /// Failures are logged and left to the host's sync retry policy.
    pub async fn on_sync(&self, tag: &str) -> SyncOutcome {
        if tag != self.config.sync_tag {
            debug!(tag = tag, "Ignoring unknown sync tag");
            return SyncOutcome::Ignored;
        }

        let url = match self.config.resolve(&self.config.sync_endpoint) {
            Ok(url) => url,
            Err(e) => {
                warn!(endpoint = %self.config.sync_endpoint, error = %e, "Background sync failed");
                return SyncOutcome::Failed;
            }
        };

        match self.network.fetch(&Request::get(url)).await {
            Ok(response) => {
                debug!(status = response.status, "Background sync delivered");
                SyncOutcome::Completed {
                    status: response.status,
                }
            }
            Err(e) => {
                warn!(error = %e, "Background sync failed");
                SyncOutcome::Failed
            }
        }
    }

    // ===== Push =====

    /// Show exactly one notification for a push payload.
    pub async fn on_push(&self, payload: Option<&str>) -> Result<Notification, WorkerError> {
        let notification = Notification::for_push(payload);
        self.host.show_notification(&notification).await?;
        Ok(notification)
    }

    // ===== Notification click =====

    /// Close the notification, then focus or open the site's root page.
    pub async fn on_notification_click(
        &self,
        click: &NotificationClick,
    ) -> Result<ClickOutcome, WorkerError> {
        self.host.close_notification(&click.notification_id).await?;

        if !click.action.opens_site() {
            return Ok(ClickOutcome::Dismissed);
        }

        let root = self.config.root_url();
        let windows = self.host.match_windows().await?;
        if let Some(client) = windows.iter().find(|w| w.url == root && w.focusable) {
            self.host.focus(client).await?;
            return Ok(ClickOutcome::Focused {
                client_id: client.id.clone(),
            });
        }

        if self.host.can_open_window() {
            self.host.open_window(&root).await?;
            return Ok(ClickOutcome::Opened {
                url: root.to_string(),
            });
        }

        Ok(ClickOutcome::NoWindow)
    }

    // ===== Maintenance =====

    /// Manifest paths with no entry in the current generation, in manifest order
    pub async fn missing_precache(&self) -> Result<Vec<String>, WorkerError> {
        let mut missing = Vec::new();
        for path in &self.config.precache {
            let url = self
                .config
                .resolve(path)
                .map_err(|source| WorkerError::InvalidUrl {
                    path: path.clone(),
                    source,
                })?;
            let hit = self
                .cache
                .lookup(&self.config.cache_name, &Request::get(url))
                .await?;
            if hit.is_none() {
                missing.push(path.clone());
            }
        }
        Ok(missing)
    }

    /// Drop every generation and return to `Uninstalled`.
    ///
    /// Stops at the first deletion error; the state is left untouched then.
    pub async fn unregister(&mut self) -> Result<Vec<String>, WorkerError> {
        let mut removed = Vec::new();
        for name in self.cache.keys().await? {
            if self.cache.delete(&name).await? {
                removed.push(name);
            }
        }
        self.state = WorkerState::Uninstalled;
        info!(removed = removed.len(), "Worker unregistered");
        Ok(removed)
    }
}
