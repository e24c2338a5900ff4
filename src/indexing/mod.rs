pub mod google;
pub mod token;

pub use google::GoogleIndexingClient;
pub use token::{AccessToken, TokenProvider, INDEXING_SCOPE};

use async_trait::async_trait;

use crate::error::Result;

/// Sends one "URL updated" notification to a search engine.
///
/// `Ok` carries the raw response body, `Err` the reason the call failed.
#[async_trait]
pub trait UrlSubmitter: Send + Sync {
    async fn submit(&self, url: &str) -> Result<String>;
}
