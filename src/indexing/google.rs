use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::token::{TokenProvider, INDEXING_SCOPE};
use super::UrlSubmitter;
use crate::credentials::ServiceAccountKey;
use crate::error::{Result, SparkIndexError};

/// Publish request body for the Indexing API
#[derive(Serialize)]
struct NotificationRequest<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    notification_type: &'a str,
}

/// Google Indexing API client
///
/// One publish call per URL, authenticated as the service account. There is
/// no retry: a failed call is reported to the caller as-is.
pub struct GoogleIndexingClient {
    client: Client,
    tokens: TokenProvider,
    endpoint: String,
}

impl GoogleIndexingClient {
    pub fn new(key: ServiceAccountKey, endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SparkIndexError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let tokens = TokenProvider::new(client.clone(), key, INDEXING_SCOPE)?;

        Ok(Self {
            client,
            tokens,
            endpoint: endpoint.to_string(),
        })
    }

    /// Obtain an access token up front so bad credentials fail the run
    /// before any URL is attempted.
    pub async fn authorize(&self) -> Result<()> {
        self.tokens.access_token().await?;
        log::info!("Authorized as {}", self.tokens.client_email());
        Ok(())
    }
}

#[async_trait]
impl UrlSubmitter for GoogleIndexingClient {
    async fn submit(&self, url: &str) -> Result<String> {
        let token = self.tokens.access_token().await?;

        let request = NotificationRequest {
            url,
            notification_type: "URL_UPDATED",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| SparkIndexError::Indexing(format!("Network error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if !status.is_success() {
            return Err(SparkIndexError::Indexing(format!("{}: {}", status, body)));
        }

        Ok(body)
    }
}
