use super::{dispatch_and_render, Overrides, Search1ApiTool};
use crate::config::Config;
use crate::error::{Result, Search1ApiError};
use crate::search1api::{ApiClient, Dispatch, Endpoint};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const NAME: &str = "search1api_search";
const DESCRIPTION: &str = "Useful for performing web searches using the search1api service. \
    Input is the search query. Optional overrides: search_service (google, bing, duckduckgo), \
    max_results (1-100, default 5), crawl_results (0-10, default 0), image (default false), \
    gl (country), hl (language).";

/// Parameters shared by web and news searches.
///
/// A field set to `None` is left out of the request entirely, which is how an
/// explicit `null` override differs from the field's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchParameters {
    /// The query you want to ask
    pub query: String,

    /// The search service you want to choose (google, bing, duckduckgo)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_service: Option<String>,

    /// The number of results you want to have (1-100)
    #[serde(default = "default_max_results", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i64>,

    /// The number of results you want to crawl (0-10)
    #[serde(default = "default_crawl_results", skip_serializing_if = "Option::is_none")]
    pub crawl_results: Option<i64>,

    /// Search including image URLs
    #[serde(default = "default_image", skip_serializing_if = "Option::is_none")]
    pub image: Option<bool>,

    /// The country you want to search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gl: Option<String>,

    /// The language you want to search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hl: Option<String>,
}

fn default_max_results() -> Option<i64> { Some(5) }
fn default_crawl_results() -> Option<i64> { Some(0) }
fn default_image() -> Option<bool> { Some(false) }

impl SearchParameters {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_service: None,
            max_results: default_max_results(),
            crawl_results: default_crawl_results(),
            image: default_image(),
            gl: None,
            hl: None,
        }
    }

    /// Builds parameters from the primary query plus keyword overrides.
    pub fn from_query(query: &str, overrides: Overrides) -> Result<Self> {
        if overrides.contains_key("query") {
            return Err(Search1ApiError::Validation(
                "query is the tool input and cannot also be given as an override".into(),
            ));
        }

        let mut fields = overrides;
        fields.insert("query".into(), Value::String(query.to_string()));

        let params: Self = serde_json::from_value(Value::Object(fields))
            .map_err(|e| Search1ApiError::Validation(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Search1ApiError::Validation("Query cannot be empty".into()));
        }
        Ok(())
    }

    pub fn to_payload(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Web search via `POST /search`.
#[derive(Debug, Clone)]
pub struct SearchTool<D = ApiClient> {
    dispatcher: D,
}

impl SearchTool {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::from_config(&Config::resolve(api_key)?)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_dispatcher(ApiClient::new(config)?))
    }
}

impl<D: Dispatch> SearchTool<D> {
    pub fn with_dispatcher(dispatcher: D) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl<D: Dispatch> Search1ApiTool for SearchTool<D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Search
    }

    async fn run(&self, query: &str, overrides: Overrides) -> Result<String> {
        let payload = SearchParameters::from_query(query, overrides)?.to_payload()?;
        debug!("{} dispatching {}", NAME, payload);
        dispatch_and_render(&self.dispatcher, Endpoint::Search, payload).await
    }
}
