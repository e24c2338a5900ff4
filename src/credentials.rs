//! Google service-account credentials for the Indexing API.

use serde::Deserialize;
use std::path::Path;

use crate::config::IndexingConfig;
use crate::error::{Result, SparkIndexError};

/// Subset of a service-account key file used for the JWT bearer flow
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    /// Parse raw key JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let key: ServiceAccountKey = serde_json::from_str(json).map_err(|e| {
            SparkIndexError::Credentials(format!("Service account JSON is invalid: {}", e))
        })?;

        if key.client_email.trim().is_empty() || key.private_key.trim().is_empty() {
            return Err(SparkIndexError::Credentials(
                "Service account JSON has an empty client_email or private_key".to_string(),
            ));
        }

        Ok(key)
    }

    /// Read and parse a key file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SparkIndexError::Credentials(format!(
                "Failed to read service account file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}

/// Pick credentials from raw JSON or a key-file path; first non-empty wins.
pub fn resolve_credentials(raw_json: Option<&str>, key_path: Option<&str>) -> Result<ServiceAccountKey> {
    if let Some(json) = raw_json.filter(|s| !s.trim().is_empty()) {
        log::debug!("Using service account JSON from environment");
        return ServiceAccountKey::from_json(json);
    }

    if let Some(path) = key_path.filter(|s| !s.trim().is_empty()) {
        log::debug!("Using service account key file {}", path);
        return ServiceAccountKey::from_file(Path::new(path.trim()));
    }

    Err(SparkIndexError::Credentials(
        "No Indexing API credentials found".to_string(),
    ))
}

/// Resolve credentials from the env vars named in the indexing config.
pub fn credentials_from_env(config: &IndexingConfig) -> Result<ServiceAccountKey> {
    let raw = std::env::var(&config.credentials_json_env).ok();
    let path = std::env::var(&config.credentials_path_env).ok();

    resolve_credentials(raw.as_deref(), path.as_deref()).map_err(|e| match e {
        SparkIndexError::Credentials(msg) => SparkIndexError::Credentials(format!(
            "{}. Set {} to the service account JSON, or {} to the path of the key file. \
             The service account must be an Owner of the site in Search Console.",
            msg, config.credentials_json_env, config.credentials_path_env
        )),
        other => other,
    })
}
