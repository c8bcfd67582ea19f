//! Console window host for the command line.
//!
//! Notifications are printed as JSON; window focus and open requests are
//! reported on stdout. Open windows are whatever `--window` listed.

use async_trait::async_trait;
use delta_offline_core::{ClientHost, HostError, Notification, WindowClient};
use tracing::debug;
use url::Url;

pub struct ConsoleHost {
    windows: Vec<WindowClient>,
}

impl ConsoleHost {
    pub fn new(windows: Vec<WindowClient>) -> Self {
        Self { windows }
    }

    /// Parse `--window` URLs, numbering clients in the order given
    pub fn from_urls(urls: &[String]) -> anyhow::Result<Self> {
        let windows = urls
            .iter()
            .enumerate()
            .map(|(i, url)| {
                let url = Url::parse(url)
                    .map_err(|e| anyhow::anyhow!("Invalid window URL '{}': {}", url, e))?;
                Ok(WindowClient::new(format!("window-{}", i + 1), url))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self::new(windows))
    }
}

#[async_trait]
impl ClientHost for ConsoleHost {
    async fn show_notification(&self, notification: &Notification) -> Result<(), HostError> {
        let json = serde_json::to_string_pretty(notification)
            .map_err(|e| HostError(format!("Failed to render notification: {}", e)))?;
        println!("{}", json);
        Ok(())
    }

    async fn close_notification(&self, id: &str) -> Result<(), HostError> {
        debug!(notification = id, "Notification closed");
        Ok(())
    }

    async fn match_windows(&self) -> Result<Vec<WindowClient>, HostError> {
        Ok(self.windows.clone())
    }

    async fn focus(&self, client: &WindowClient) -> Result<(), HostError> {
        println!("Focus {} ({})", client.id, client.url);
        Ok(())
    }

    async fn open_window(&self, url: &Url) -> Result<(), HostError> {
        println!("Open window {}", url);
        Ok(())
    }
}
