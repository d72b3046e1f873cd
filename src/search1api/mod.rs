mod client;

pub use client::ApiClient;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Remote paths exposed by the Search1API service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    News,
    Crawl,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Search => "/search",
            Endpoint::News => "/news",
            Endpoint::Crawl => "/crawl",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Sends one JSON payload to an endpoint and returns the decoded response body.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn send(&self, endpoint: Endpoint, payload: Value) -> Result<Value>;
}
