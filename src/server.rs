use crate::config::Config;
use crate::error::Search1ApiError;
use crate::search1api::ApiClient;
use crate::tools::{CrawlParameters, CrawlTool, NewsTool, Overrides, Search1ApiTool, SearchParameters, SearchTool};

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::Deserialize;
use std::borrow::Cow;

/// Input for the search and news tools.
///
/// Overrides stay an untyped map so a missing field and an explicit `null`
/// remain distinct until `SearchParameters` validates them.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchInput {
    pub query: String,

    #[serde(flatten)]
    pub overrides: Overrides,
}

impl JsonSchema for SearchInput {
    fn schema_name() -> Cow<'static, str> {
        "SearchInput".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        SearchParameters::json_schema(generator)
    }
}

#[derive(Clone)]
pub struct Search1ApiServer {
    search: SearchTool,
    news: NewsTool,
    crawl: CrawlTool,
}

impl Search1ApiServer {
    pub fn new(config: &Config) -> crate::error::Result<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self {
            search: SearchTool::with_dispatcher(client.clone()),
            news: NewsTool::with_dispatcher(client.clone()),
            crawl: CrawlTool::with_dispatcher(client),
        })
    }

    pub fn tools(&self) -> [&dyn Search1ApiTool; 3] {
        [&self.search, &self.news, &self.crawl]
    }
}

#[tool_router]
impl Search1ApiServer {
    #[tool(name = "search1api_search", description = r#"
    Useful for performing web searches using the search1api service.

    The `query` is the search query. Optional fields:
    - `search_service`: google, bing or duckduckgo
    - `max_results`: number of results (1-100, default 5)
    - `crawl_results`: number of results to crawl for full content (0-10, default 0)
    - `image`: include image URLs (default false)
    - `gl` / `hl`: country / language of the search

    Returns the service response as indented JSON.
    "#)]
    pub async fn search1api_search(&self, Parameters(input): Parameters<SearchInput>) -> std::result::Result<String, McpError> {
        self.search.run(&input.query, input.overrides).await.map_err(to_mcp_error)
    }

    #[tool(name = "search1api_news", description = r#"
    Useful for performing news searches using the search1api service.

    Accepts the same fields as `search1api_search` and returns the news results
    as indented JSON.
    "#)]
    pub async fn search1api_news(&self, Parameters(input): Parameters<SearchInput>) -> std::result::Result<String, McpError> {
        self.news.run(&input.query, input.overrides).await.map_err(to_mcp_error)
    }

    #[tool(name = "search1api_crawl", description = r#"
    Useful for crawling a specific webpage using the search1api service.

    The `url` is the page to fetch. Returns the crawled content as indented JSON.
    "#)]
    pub async fn search1api_crawl(&self, Parameters(params): Parameters<CrawlParameters>) -> std::result::Result<String, McpError> {
        self.crawl.run(&params.url, Overrides::new()).await.map_err(to_mcp_error)
    }
}

#[tool_handler(router = Self::tool_router())]
impl ServerHandler for Search1ApiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "search1api".into(),
                title: None,
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn to_mcp_error(e: Search1ApiError) -> McpError {
    match e {
        Search1ApiError::Validation(msg) => McpError::invalid_params(msg, None),
        other => McpError::internal_error(other.to_string(), None),
    }
}
