pub mod crawl;
pub mod news;
pub mod search;

pub use crawl::{CrawlParameters, CrawlTool};
pub use news::NewsTool;
pub use search::{SearchParameters, SearchTool};

use crate::error::Result;
use crate::search1api::{Dispatch, Endpoint};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Named keyword overrides supplied alongside the primary query.
pub type Overrides = serde_json::Map<String, Value>;

/// A Search1API capability as seen by an agent framework: a stable name and
/// description plus one string-in, string-out entry point.
#[async_trait]
pub trait Search1ApiTool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn endpoint(&self) -> Endpoint;

    /// Frameworks should pass one primary argument rather than a structured call.
    fn is_single_input(&self) -> bool {
        true
    }

    /// Validates the input, performs one request and returns the response as
    /// 2-space indented JSON.
    async fn run(&self, query: &str, overrides: Overrides) -> Result<String>;
}

#[async_trait]
impl<T: Dispatch + ?Sized> Dispatch for Arc<T> {
    async fn send(&self, endpoint: Endpoint, payload: Value) -> Result<Value> {
        (**self).send(endpoint, payload).await
    }
}

async fn dispatch_and_render<D: Dispatch + ?Sized>(dispatcher: &D, endpoint: Endpoint, payload: Value) -> Result<String> {
    let body = dispatcher.send(endpoint, payload).await?;
    Ok(serde_json::to_string_pretty(&body)?)
}
