use std::fmt;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

/// An intercepted request: method plus absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    url: Url,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Resolve `path` against `origin` and build a GET request for it.
    pub fn get_path(origin: &Url, path: &str) -> Result<Self, url::ParseError> {
        Ok(Self::get(origin.join(path)?))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Key used to store and match this request in a cache generation.
    ///
    /// Only GET requests have a key; everything else bypasses the cache.
    pub fn cache_key(&self) -> Option<RequestKey> {
        if self.method != Method::GET {
            return None;
        }
        let mut url = self.url.clone();
        url.set_fragment(None);
        Some(RequestKey(url.to_string()))
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Cache identity of a request: its URL without fragment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
