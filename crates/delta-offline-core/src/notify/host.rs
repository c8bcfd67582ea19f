use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::Notification;

#[derive(Error, Debug)]
#[error("Host operation failed: {0}")]
pub struct HostError(pub String);

/// An open application window as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowClient {
    pub id: String,
    pub url: Url,
    /// Whether the host can bring this window to the foreground
    #[serde(default = "default_focusable")]
    pub focusable: bool,
}

fn default_focusable() -> bool {
    true
}

impl WindowClient {
    pub fn new(id: impl Into<String>, url: Url) -> Self {
        Self {
            id: id.into(),
            url,
            focusable: true,
        }
    }
}

/// Host capabilities used by push and notification-click handling.
#[async_trait]
pub trait ClientHost: Send + Sync {
    async fn show_notification(&self, notification: &Notification) -> Result<(), HostError>;

    /// Dismiss the notification with the given tag
    async fn close_notification(&self, tag: &str) -> Result<(), HostError>;

    /// Open windows controlled by this origin
    async fn match_windows(&self) -> Result<Vec<WindowClient>, HostError>;

    async fn focus(&self, client: &WindowClient) -> Result<(), HostError>;

    async fn open_window(&self, url: &Url) -> Result<(), HostError>;

    fn can_open_window(&self) -> bool {
        true
    }
}
