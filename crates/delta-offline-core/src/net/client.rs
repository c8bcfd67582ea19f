//! HTTP implementation of the `Network` seam.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{Network, NetworkError};
use crate::models::{Request, Response};

/// HTTP request timeout in seconds.
/// A page waiting on an intercepted fetch should fail over to cache quickly.
const REQUEST_TIMEOUT_SECS: u64 = 15;

const USER_AGENT: &str = concat!("delta-offline/", env!("CARGO_PKG_VERSION"));

/// Network access over HTTP.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpNetwork {
    client: Client,
    offline: bool,
}

impl HttpNetwork {
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            offline: false,
        })
    }

    /// Refuse every fetch without touching the network, as a disconnected
    /// browser would
    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, NetworkError> {
        if self.offline {
            return Err(NetworkError::Unavailable(format!("offline mode, {}", request)));
        }
        let response = self
            .client
            .request(request.method().clone(), request.url().clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;
        debug!(request = %request, status, bytes = body.len(), "Network fetch complete");

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
