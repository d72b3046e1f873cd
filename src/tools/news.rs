use super::{dispatch_and_render, Overrides, Search1ApiTool, SearchParameters};
use crate::config::Config;
use crate::error::Result;
use crate::search1api::{ApiClient, Dispatch, Endpoint};
use async_trait::async_trait;
use tracing::debug;

const NAME: &str = "search1api_news";
const DESCRIPTION: &str = "Useful for performing news searches using the search1api service. \
    Input is the search query. Accepts the same overrides as search1api_search.";

/// News search via `POST /news`, sharing the web search parameters.
#[derive(Debug, Clone)]
pub struct NewsTool<D = ApiClient> {
    dispatcher: D,
}

impl NewsTool {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::from_config(&Config::resolve(api_key)?)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_dispatcher(ApiClient::new(config)?))
    }
}

impl<D: Dispatch> NewsTool<D> {
    pub fn with_dispatcher(dispatcher: D) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl<D: Dispatch> Search1ApiTool for NewsTool<D> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::News
    }

    async fn run(&self, query: &str, overrides: Overrides) -> Result<String> {
        let payload = SearchParameters::from_query(query, overrides)?.to_payload()?;
        debug!("{} dispatching {}", NAME, payload);
        dispatch_and_render(&self.dispatcher, Endpoint::News, payload).await
    }
}
