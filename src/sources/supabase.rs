use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;

use super::RecordSource;
use crate::config::{SupabaseConfig, SupabaseCredentials, TableConfig};
use crate::error::{Result, SparkIndexError};

/// Read-only PostgREST client for the listings and locations tables
pub struct SupabaseSource {
    client: Client,
    base_url: String,
    service_key: String,
    page_size: usize,
    listings: TableConfig,
    locations: TableConfig,
}

impl SupabaseSource {
    pub fn new(credentials: SupabaseCredentials, config: &SupabaseConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SparkIndexError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: credentials.url.trim_end_matches('/').to_string(),
            service_key: credentials.service_key,
            page_size: config.page_size.max(1),
            listings: config.listings.clone(),
            locations: config.locations.clone(),
        })
    }

    /// Read one text column of a table, page by page.
    ///
    /// Keeps requesting until a page comes back shorter than `page_size`, so
    /// large tables are never silently truncated at the server's row cap.
    /// Rows whose column is null or blank are skipped.
    pub async fn fetch_column(&self, table: &TableConfig) -> Result<Vec<String>> {
        let endpoint = format!("{}/rest/v1/{}", self.base_url, table.table);
        let filter = match &table.filter {
            Some(f) => Some(f.split_once('=').ok_or_else(|| {
                SparkIndexError::Config(format!(
                    "Filter for table {} must look like column=op.value, got {:?}",
                    table.table, f
                ))
            })?),
            None => None,
        };

        let mut values = Vec::new();
        let mut skipped = 0usize;
        let mut offset = 0usize;

        loop {
            let mut query: Vec<(&str, String)> = vec![
                ("select", table.column.clone()),
                ("order", format!("{}.asc", table.order_by)),
                ("offset", offset.to_string()),
                ("limit", self.page_size.to_string()),
            ];
            if let Some((column, condition)) = filter {
                query.push((column, condition.to_string()));
            }

            let response = self
                .client
                .get(&endpoint)
                .header("apikey", &self.service_key)
                .bearer_auth(&self.service_key)
                .query(&query)
                .send()
                .await
                .map_err(|e| {
                    SparkIndexError::DataSource(format!("Network error reading {}: {}", table.table, e))
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                return Err(SparkIndexError::DataSource(format!(
                    "Supabase error {} reading {}: {}",
                    status, table.table, body
                )));
            }

            let rows: Vec<Map<String, Value>> = response.json().await.map_err(|e| {
                SparkIndexError::DataSource(format!("Failed to parse {} rows: {}", table.table, e))
            })?;
            let page_len = rows.len();

            for row in rows {
                match row.get(&table.column) {
                    Some(Value::String(s)) if !s.trim().is_empty() => values.push(s.trim().to_string()),
                    _ => skipped += 1,
                }
            }

            log::debug!("{}: fetched {} rows at offset {}", table.table, page_len, offset);

            if page_len < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        if skipped > 0 {
            log::warn!("{}: skipped {} rows without a {}", table.table, skipped, table.column);
        }
        log::info!("Fetched {} {} from {}", values.len(), table.column, table.table);
        Ok(values)
    }
}

#[async_trait]
impl RecordSource for SupabaseSource {
    async fn listing_slugs(&self) -> Result<Vec<String>> {
        self.fetch_column(&self.listings).await
    }

    async fn location_slugs(&self) -> Result<Vec<String>> {
        self.fetch_column(&self.locations).await
    }
}
