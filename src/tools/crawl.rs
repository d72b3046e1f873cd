use super::{dispatch_and_render, Overrides, Search1ApiTool};
use crate::config::Config;
use crate::error::{Result, Search1ApiError};
use crate::search1api::{ApiClient, Dispatch, Endpoint};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const NAME: &str = "search1api_crawl";
const DESCRIPTION: &str = "Useful for crawling a specific webpage using the search1api service. \
    Input is the URL of the page to crawl.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CrawlParameters {
    /// The URL to crawl
    pub url: String,
}

impl CrawlParameters {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Search1ApiError::Validation("URL cannot be empty".into()));
        }
        Ok(())
    }

    pub fn to_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Page crawl via `POST /crawl`; the tool input is the target URL.
#[derive(Debug, Clone)]
pub struct CrawlTool<D = ApiClient> {
    dispatcher: D,
}

impl CrawlTool {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::from_config(&Config::resolve(api_key)?)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_dispatcher(ApiClient::new(config)?))
    }
}

impl<D: Dispatch> CrawlTool<D> {
    pub fn with_dispatcher(dispatcher: D) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl<D: Dispatch> Search1ApiTool for CrawlTool<D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Crawl
    }

    async fn run(&self, query: &str, overrides: Overrides) -> Result<String> {
        if let Some(key) = overrides.keys().next() {
            return Err(Search1ApiError::Validation(format!("{NAME} accepts no overrides, got `{key}`")));
        }

        let params = CrawlParameters::new(query);
        params.validate()?;
        let payload = params.to_payload()?;
        debug!("{} dispatching {}", NAME, payload);
        dispatch_and_render(&self.dispatcher, Endpoint::Crawl, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::RecordingDispatcher;
    use serde_json::json;

    #[tokio::test]
    async fn query_is_sent_as_url() {
        let spy = RecordingDispatcher::responding(json!({"results": {"title": "Test Crawl"}}));
        let tool = CrawlTool::with_dispatcher(spy.clone());

        let out = tool.run("https://example.com", Overrides::new()).await.unwrap();

        assert_eq!(out, "{\n  \"results\": {\n    \"title\": \"Test Crawl\"\n  }\n}");
        assert_eq!(spy.calls(), vec![(Endpoint::Crawl, json!({"url": "https://example.com"}))]);
    }

    #[tokio::test]
    async fn overrides_and_blank_urls_are_rejected() {
        let spy = RecordingDispatcher::responding(json!({}));
        let tool = CrawlTool::with_dispatcher(spy.clone());

        let mut overrides = Overrides::new();
        overrides.insert("max_results".into(), json!(3));
        let err = tool.run("https://example.com", overrides).await.unwrap_err();
        assert!(matches!(err, Search1ApiError::Validation(_)));

        let err = tool.run("  ", Overrides::new()).await.unwrap_err();
        assert!(matches!(err, Search1ApiError::Validation(_)));

        assert!(spy.calls().is_empty());
    }

    #[test]
    fn parameters_reject_unknown_fields() {
        let err = serde_json::from_value::<CrawlParameters>(json!({"url": "https://a.b", "depth": 2}));
        assert!(err.is_err());
    }
}
