//! Submission checkpoint: which URLs were already sent to the indexing API.
//!
//! The history is a single JSON document, overwritten wholesale on every
//! save. It is loaded leniently: a missing or corrupt file yields an empty
//! history so a damaged checkpoint never blocks the daily run.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, SparkIndexError};

/// Outcome of one publish call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Success,
    Error,
}

/// One submitted URL. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub url: String,
    pub submitted_at: String,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl SubmissionRecord {
    pub fn success(url: &str, response: String) -> Self {
        Self {
            url: url.to_string(),
            submitted_at: now_iso8601(),
            status: SubmissionStatus::Success,
            response: Some(response),
        }
    }

    pub fn error(url: &str, message: String) -> Self {
        Self {
            url: url.to_string(),
            submitted_at: now_iso8601(),
            status: SubmissionStatus::Error,
            response: Some(message),
        }
    }
}

/// Persisted state of the submission job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionHistory {
    /// ISO-8601 time of the last completed submit run, `""` if never run
    #[serde(default)]
    pub last_run: String,
    /// Submissions attempted across all runs, failures included
    #[serde(default)]
    pub total_submitted: u64,
    #[serde(default)]
    pub submissions: BTreeMap<String, SubmissionRecord>,
}

impl SubmissionHistory {
    /// True if the URL has a record, whatever its outcome.
    ///
    /// Failed URLs count as handled and are not resubmitted on later runs.
    pub fn contains(&self, url: &str) -> bool {
        self.submissions.contains_key(url)
    }

    /// Store a record and count the attempt
    pub fn record(&mut self, record: SubmissionRecord) {
        self.total_submitted += 1;
        self.submissions.insert(record.url.clone(), record);
    }

    pub fn success_count(&self) -> usize {
        self.count(SubmissionStatus::Success)
    }

    pub fn error_count(&self) -> usize {
        self.count(SubmissionStatus::Error)
    }

    fn count(&self, status: SubmissionStatus) -> usize {
        self.submissions.values().filter(|r| r.status == status).count()
    }

    pub fn stamp_last_run(&mut self) {
        self.last_run = now_iso8601();
    }

    /// `lastRun` for display, `Never` when empty
    pub fn last_run_display(&self) -> &str {
        if self.last_run.is_empty() {
            "Never"
        } else {
            &self.last_run
        }
    }
}

/// UTC timestamp with millisecond precision, e.g. `2026-10-19T06:00:00.000Z`
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Load/save seam for the submission history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load the stored history; never fails, falls back to empty
    async fn load(&self) -> SubmissionHistory;

    /// Replace the stored history with `history`
    async fn save(&self, history: &SubmissionHistory) -> Result<()>;
}

/// Checkpoint kept in a pretty-printed JSON file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl HistoryStore for JsonFileStore {
    async fn load(&self) -> SubmissionHistory {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No checkpoint at {}, starting fresh", self.path.display());
                return SubmissionHistory::default();
            }
            Err(e) => {
                log::warn!("Failed to read checkpoint {}: {}. Starting fresh.", self.path.display(), e);
                return SubmissionHistory::default();
            }
        };

        match serde_json::from_str::<SubmissionHistory>(&content) {
            Ok(history) => {
                log::info!(
                    "Loaded checkpoint: {} URLs tracked, last run {}",
                    history.submissions.len(),
                    history.last_run_display()
                );
                history
            }
            Err(e) => {
                log::warn!("Failed to parse checkpoint {}: {}. Starting fresh.", self.path.display(), e);
                SubmissionHistory::default()
            }
        }
    }

    async fn save(&self, history: &SubmissionHistory) -> Result<()> {
        let json = serde_json::to_string_pretty(history)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                SparkIndexError::Checkpoint(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            SparkIndexError::Checkpoint(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        log::debug!("Checkpoint saved to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and previews
#[derive(Default)]
pub struct MemoryStore {
    history: Mutex<SubmissionHistory>,
    saves: Mutex<Vec<SubmissionHistory>>,
}

impl MemoryStore {
    pub fn new(history: SubmissionHistory) -> Self {
        Self {
            history: Mutex::new(history),
            saves: Mutex::new(Vec::new()),
        }
    }

    /// Current stored snapshot
    pub fn snapshot(&self) -> SubmissionHistory {
        self.history.lock().unwrap().clone()
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    /// Every history passed to `save`, oldest first
    pub fn saved(&self) -> Vec<SubmissionHistory> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn load(&self) -> SubmissionHistory {
        self.snapshot()
    }

    async fn save(&self, history: &SubmissionHistory) -> Result<()> {
        *self.history.lock().unwrap() = history.clone();
        self.saves.lock().unwrap().push(history.clone());
        Ok(())
    }
}
