//! Search1API tools for agent frameworks.
//!
//! Three tools share one authenticated client:
//! - [`SearchTool`]: web search (`/search`)
//! - [`NewsTool`]: news search (`/news`)
//! - [`CrawlTool`]: single page crawl (`/crawl`)
//!
//! Each takes one primary string input plus optional overrides and returns the
//! service's JSON response pretty-printed. [`server::Search1ApiServer`] hosts
//! them as MCP tools.

pub mod config;
pub mod error;
pub mod search1api;
pub mod server;
pub mod tools;

pub use config::Config;
pub use error::{Result, Search1ApiError};
pub use search1api::{ApiClient, Dispatch, Endpoint};
pub use tools::{CrawlParameters, CrawlTool, NewsTool, Overrides, Search1ApiTool, SearchParameters, SearchTool};
