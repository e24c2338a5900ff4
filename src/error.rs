use thiserror::Error;

/// Main error type for SparkIndex
#[derive(Error, Debug)]
pub enum SparkIndexError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or invalid indexing-API credentials
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Failure reading a URL source (database, content directory)
    #[error("Data source error: {0}")]
    DataSource(String),

    /// Indexing API errors (token exchange or publish call)
    #[error("Indexing API error: {0}")]
    Indexing(String),

    /// Checkpoint persistence errors
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// Report layout or rendering errors
    #[error("Report error: {0}")]
    Report(String),

    /// Parse errors (frontmatter, sitemap output)
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenient Result type using SparkIndexError
pub type Result<T> = std::result::Result<T, SparkIndexError>;
