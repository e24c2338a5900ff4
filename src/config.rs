use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::driver::DriverSettings;

/// PostgREST `max-rows` on hosted Supabase
pub const SUPABASE_MAX_ROWS: usize = 1000;

/// Default config file looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "sparkindex.toml";

/// Main configuration structure
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// production defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub indexing: IndexingConfig,
    pub supabase: SupabaseConfig,
    pub content: ContentConfig,
}

/// Public site layout: base URL and the path prefix of every page family
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub listing_prefix: String,
    pub location_prefix: String,
    pub state_prefix: String,
    pub guide_prefix: String,
    pub blog_prefix: String,
    /// Fixed pages appended after all generated pages. `""` is the home page.
    pub static_pages: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sparklocal.co".to_string(),
            listing_prefix: "/listing".to_string(),
            location_prefix: "/local".to_string(),
            state_prefix: "/state".to_string(),
            guide_prefix: "/start-a-business".to_string(),
            blog_prefix: "/blog".to_string(),
            static_pages: default_static_pages(),
        }
    }
}

fn default_static_pages() -> Vec<String> {
    ["", "/about", "/blog", "/resources", "/start-a-business", "/contact", "/privacy", "/terms"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// Indexing job configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Maximum URLs submitted per run
    pub daily_quota: usize,
    /// Persist the checkpoint after this many URLs
    pub flush_every: usize,
    /// Pause between two publish calls
    pub delay_ms: u64,
    /// URLs printed by `--dry-run` before summarising the rest
    pub preview_limit: usize,
    pub checkpoint_path: PathBuf,
    pub publish_endpoint: String,
    /// Env var holding the raw service-account JSON
    pub credentials_json_env: String,
    /// Env var holding a path to the service-account JSON file
    pub credentials_path_env: String,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            daily_quota: 200,
            flush_every: 10,
            delay_ms: 100,
            preview_limit: 20,
            checkpoint_path: PathBuf::from("indexing-history.json"),
            publish_endpoint: "https://indexing.googleapis.com/v3/urlNotifications:publish".to_string(),
            credentials_json_env: "GOOGLE_SERVICE_ACCOUNT_JSON".to_string(),
            credentials_path_env: "GOOGLE_SERVICE_ACCOUNT_KEY_PATH".to_string(),
        }
    }
}

/// Supabase (PostgREST) data source configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupabaseConfig {
    pub url_env: String,
    pub service_key_env: String,
    /// Rows per request. Must not exceed the server's PostgREST `max-rows`
    /// (1000 on Supabase): a capped page looks short and ends pagination early.
    pub page_size: usize,
    pub listings: TableConfig,
    pub locations: TableConfig,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url_env: "NEXT_PUBLIC_SUPABASE_URL".to_string(),
            service_key_env: "SUPABASE_SERVICE_ROLE_KEY".to_string(),
            page_size: SUPABASE_MAX_ROWS,
            listings: TableConfig::new("listings"),
            locations: TableConfig::new("locations"),
        }
    }
}

/// One table read during URL enumeration
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    pub table: String,
    #[serde(default = "default_slug_column")]
    pub column: String,
    #[serde(default = "default_order_by")]
    pub order_by: String,
    /// Optional PostgREST filter, e.g. `is_active=eq.true`
    #[serde(default)]
    pub filter: Option<String>,
}

impl TableConfig {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            column: default_slug_column(),
            order_by: default_order_by(),
            filter: None,
        }
    }
}

fn default_slug_column() -> String {
    "slug".to_string()
}

fn default_order_by() -> String {
    "id".to_string()
}

/// Generated content configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub blog_dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            blog_dir: PathBuf::from("content/blog"),
        }
    }
}

/// Resolved Supabase connection settings
#[derive(Debug, Clone)]
pub struct SupabaseCredentials {
    pub url: String,
    pub service_key: String,
}

impl Config {
    /// Load configuration
    ///
    /// Loads environment variables from .env file (if present) first.
    /// Looks for the config file in this order:
    /// 1. Path specified in SPARKINDEX_CONFIG environment variable (must exist)
    /// 2. ./sparkindex.toml in current directory (optional)
    ///
    /// With no file at all, the built-in defaults are used.
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config = match std::env::var("SPARKINDEX_CONFIG") {
            Ok(path) => Self::from_path(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_path(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => {
                log::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Config::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file without touching the environment
    pub fn from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.site.base_url)
            .with_context(|| format!("site.base_url is not a valid URL: {}", self.site.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("site.base_url must be http(s): {}", self.site.base_url);
        }

        for (name, prefix) in [
            ("listing_prefix", &self.site.listing_prefix),
            ("location_prefix", &self.site.location_prefix),
            ("state_prefix", &self.site.state_prefix),
            ("guide_prefix", &self.site.guide_prefix),
            ("blog_prefix", &self.site.blog_prefix),
        ] {
            if !prefix.starts_with('/') {
                anyhow::bail!("site.{} must start with '/': {:?}", name, prefix);
            }
        }

        if let Some(page) = self
            .site
            .static_pages
            .iter()
            .find(|p| !p.is_empty() && !p.starts_with('/'))
        {
            anyhow::bail!("site.static_pages entries must be empty or start with '/': {:?}", page);
        }

        if self.indexing.daily_quota == 0 {
            anyhow::bail!("indexing.daily_quota must be greater than 0");
        }

        if self.indexing.flush_every == 0 {
            anyhow::bail!("indexing.flush_every must be greater than 0");
        }

        if self.supabase.page_size == 0 {
            anyhow::bail!("supabase.page_size must be greater than 0");
        }

        if self.supabase.page_size > SUPABASE_MAX_ROWS {
            anyhow::bail!(
                "supabase.page_size must not exceed {} (the server caps each page at that many rows)",
                SUPABASE_MAX_ROWS
            );
        }

        Ok(())
    }

    /// Site base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }

    pub fn checkpoint_path(&self) -> &Path {
        &self.indexing.checkpoint_path
    }

    pub fn blog_dir(&self) -> &Path {
        &self.content.blog_dir
    }

    /// Driver context derived from the indexing section
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            daily_quota: self.indexing.daily_quota,
            flush_every: self.indexing.flush_every,
            delay: Duration::from_millis(self.indexing.delay_ms),
            preview_limit: self.indexing.preview_limit,
        }
    }

    /// Read the Supabase URL and service-role key from the environment.
    pub fn supabase_credentials(&self) -> Result<SupabaseCredentials> {
        let url = non_empty_env(&self.supabase.url_env).with_context(|| {
            format!(
                "Environment variable {} not set. Set it in your .env file to your Supabase project URL.",
                self.supabase.url_env
            )
        })?;
        let service_key = non_empty_env(&self.supabase.service_key_env).with_context(|| {
            format!(
                "Environment variable {} not set. Set it in your .env file to the service-role key (Project Settings > API).",
                self.supabase.service_key_env
            )
        })?;

        Ok(SupabaseCredentials { url, service_key })
    }
}

fn non_empty_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => anyhow::bail!("{} is missing or empty", name),
    }
}
