//! Submission driver: decides which URLs go out today and sends them.
//!
//! `pending = candidates - already recorded`, `batch = first daily_quota of
//! pending`. Submissions are strictly sequential, in batch order, with a
//! fixed pause between calls.

use std::fmt;
use std::time::Duration;

use crate::checkpoint::{HistoryStore, SubmissionHistory, SubmissionRecord};
use crate::error::Result;
use crate::indexing::UrlSubmitter;
use crate::progress::ProgressBar;
use crate::sources::CandidateSource;

/// Run parameters handed to the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverSettings {
    pub daily_quota: usize,
    pub flush_every: usize,
    pub delay: Duration,
    pub preview_limit: usize,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            daily_quota: 200,
            flush_every: 10,
            delay: Duration::from_millis(100),
            preview_limit: 20,
        }
    }
}

/// Candidates without a record in `history`, in candidate order
pub fn pending_urls(candidates: &[String], history: &SubmissionHistory) -> Vec<String> {
    candidates
        .iter()
        .filter(|url| !history.contains(url))
        .cloned()
        .collect()
}

/// The first `quota` pending URLs
pub fn select_batch(mut pending: Vec<String>, quota: usize) -> Vec<String> {
    pending.truncate(quota);
    pending
}

/// Iterator adapter that waits `delay` before every item except the first
pub struct Paced<I> {
    inner: I,
    delay: Duration,
    started: bool,
}

impl<I: Iterator> Paced<I> {
    pub fn new(inner: I, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            started: false,
        }
    }

    pub async fn next(&mut self) -> Option<I::Item> {
        let item = self.inner.next()?;
        if self.started {
            tokio::time::sleep(self.delay).await;
        } else {
            self.started = true;
        }
        Some(item)
    }
}

/// Counts shown by `--status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub last_run: String,
    pub total_submitted: u64,
    pub successes: usize,
    pub errors: usize,
    pub tracked: usize,
}

impl StatusReport {
    pub fn from_history(history: &SubmissionHistory) -> Self {
        Self {
            last_run: history.last_run_display().to_string(),
            total_submitted: history.total_submitted,
            successes: history.success_count(),
            errors: history.error_count(),
            tracked: history.submissions.len(),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Indexing Submission Status ===")?;
        writeln!(f, "Last run:        {}", self.last_run)?;
        writeln!(f, "Total submitted: {}", self.total_submitted)?;
        writeln!(f, "Successful:      {}", self.successes)?;
        writeln!(f, "Errors:          {}", self.errors)?;
        write!(f, "URLs tracked:    {}", self.tracked)?;
        if self.errors > 0 {
            write!(
                f,
                "\n\nNote: URLs that failed stay recorded and are not resubmitted. Run with --reset to start over."
            )?;
        }
        Ok(())
    }
}

/// What a submit run would send, shown by `--dry-run`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunReport {
    pub candidates: usize,
    pub already_submitted: usize,
    pub pending: usize,
    pub batch: Vec<String>,
    pub preview_limit: usize,
}

impl fmt::Display for DryRunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Dry Run ===")?;
        writeln!(f, "Candidate URLs:    {}", self.candidates)?;
        writeln!(f, "Already submitted: {}", self.already_submitted)?;
        writeln!(f, "Pending:           {}", self.pending)?;
        write!(f, "Would submit:      {}", self.batch.len())?;

        for url in self.batch.iter().take(self.preview_limit) {
            write!(f, "\n  {}", url)?;
        }
        if self.batch.len() > self.preview_limit {
            write!(f, "\n  ... and {} more", self.batch.len() - self.preview_limit)?;
        }
        Ok(())
    }
}

/// Outcome of a submit run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Pending URLs left for later runs
    pub remaining: usize,
}

impl RunSummary {
    /// Any failed submission fails the process
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Runs the job modes against an injected checkpoint store
pub struct SubmissionDriver<St: HistoryStore> {
    settings: DriverSettings,
    store: St,
}

impl<St: HistoryStore> SubmissionDriver<St> {
    pub fn new(settings: DriverSettings, store: St) -> Self {
        Self { settings, store }
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Counts from the stored history. Reads only.
    pub async fn status(&self) -> StatusReport {
        StatusReport::from_history(&self.store.load().await)
    }

    /// Replace the stored history with an empty one
    pub async fn reset(&self) -> Result<()> {
        self.store.save(&SubmissionHistory::default()).await?;
        log::info!("Submission history cleared");
        Ok(())
    }

    /// Compute today's batch without submitting or saving anything
    pub async fn dry_run<C>(&self, candidates: &C) -> Result<DryRunReport>
    where
        C: CandidateSource + ?Sized,
    {
        let history = self.store.load().await;
        let candidates = candidates.candidate_urls().await?;
        let pending = pending_urls(&candidates, &history);
        let pending_len = pending.len();
        let batch = select_batch(pending, self.settings.daily_quota);

        Ok(DryRunReport {
            candidates: candidates.len(),
            already_submitted: candidates.len() - pending_len,
            pending: pending_len,
            batch,
            preview_limit: self.settings.preview_limit,
        })
    }

    /// Submit today's batch, one URL at a time.
    ///
    /// Per-URL failures are recorded and do not stop the batch. The history is
    /// saved every `flush_every` URLs and once more at the end.
    pub async fn submit<C, U>(&self, candidates: &C, submitter: &U) -> Result<RunSummary>
    where
        C: CandidateSource + ?Sized,
        U: UrlSubmitter + ?Sized,
    {
        let mut history = self.store.load().await;
        let candidates = candidates.candidate_urls().await?;
        let pending = pending_urls(&candidates, &history);
        let pending_len = pending.len();
        let batch = select_batch(pending, self.settings.daily_quota);

        let mut summary = RunSummary {
            remaining: pending_len - batch.len(),
            ..RunSummary::default()
        };

        if batch.is_empty() {
            log::info!("All {} candidate URLs already submitted. Nothing to do.", candidates.len());
            return Ok(summary);
        }

        log::info!(
            "Submitting {} of {} pending URLs (quota {})",
            batch.len(),
            pending_len,
            self.settings.daily_quota
        );

        let total = batch.len() as u64;
        let mut urls = Paced::new(batch.into_iter(), self.settings.delay);

        while let Some(url) = urls.next().await {
            let record = match submitter.submit(&url).await {
                Ok(response) => {
                    summary.succeeded += 1;
                    log::info!("✓ {}", url);
                    SubmissionRecord::success(&url, response)
                }
                Err(e) => {
                    summary.failed += 1;
                    log::error!("✗ {}: {}", url, e);
                    SubmissionRecord::error(&url, e.to_string())
                }
            };
            history.record(record);
            summary.attempted += 1;

            if summary.attempted % self.settings.flush_every == 0 {
                self.store.save(&history).await?;
                log::info!(
                    "{}",
                    ProgressBar::new(summary.attempted as u64, total).with_label("Progress")
                );
            }
        }

        history.stamp_last_run();
        self.store.save(&history).await?;

        log::info!("=== Submission Complete ===");
        log::info!("Submitted: {} (success: {}, errors: {})", summary.attempted, summary.succeeded, summary.failed);
        log::info!("Remaining for future runs: {}", summary.remaining);
        log::info!("Total submitted all time: {}", history.total_submitted);

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::{JsonFileStore, MemoryStore, SubmissionStatus};
    use crate::error::SparkIndexError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records calls; fails for URLs listed in `failing`
    #[derive(Default)]
    struct SpySubmitter {
        calls: AtomicUsize,
        order: Mutex<Vec<String>>,
        failing: Vec<String>,
    }

    #[async_trait]
    impl UrlSubmitter for SpySubmitter {
        async fn submit(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.order.lock().unwrap().push(url.to_string());
            if self.failing.iter().any(|f| f == url) {
                return Err(SparkIndexError::Indexing("403 Forbidden: Permission denied".to_string()));
            }
            Ok(r#"{"urlNotificationMetadata":{}}"#.to_string())
        }
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://sparklocal.co/listing/{}", i)).collect()
    }

    fn settings(quota: usize) -> DriverSettings {
        DriverSettings {
            daily_quota: quota,
            flush_every: 10,
            delay: Duration::ZERO,
            preview_limit: 20,
        }
    }

    fn history_with_successes(urls: &[String]) -> SubmissionHistory {
        let mut history = SubmissionHistory::default();
        for url in urls {
            history.record(SubmissionRecord::success(url, "{}".to_string()));
        }
        history
    }

    #[test]
    fn test_quota_boundary() {
        let pending = urls(5);
        assert_eq!(select_batch(pending.clone(), 5), pending);
        assert_eq!(select_batch(pending.clone(), 200), pending);

        let batch = select_batch(pending.clone(), 3);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch, pending[..3].to_vec());
    }

    #[test]
    fn test_pending_keeps_order_and_skips_errors() {
        let candidates = urls(4);
        let mut history = SubmissionHistory::default();
        history.record(SubmissionRecord::success(&candidates[1], "{}".to_string()));
        history.record(SubmissionRecord::error(&candidates[2], "boom".to_string()));

        let pending = pending_urls(&candidates, &history);
        assert_eq!(pending, vec![candidates[0].clone(), candidates[3].clone()]);
    }

    #[tokio::test]
    async fn test_status_on_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let driver = SubmissionDriver::new(settings(200), JsonFileStore::new(temp_dir.path().join("h.json")));

        let report = driver.status().await;
        assert_eq!(report.last_run, "Never");
        assert_eq!(report.total_submitted, 0);
        assert_eq!(report.successes, 0);
        assert_eq!(report.errors, 0);
        assert!(!temp_dir.path().join("h.json").exists());
        assert!(report.to_string().contains("Last run:        Never"));
    }

    #[tokio::test]
    async fn test_status_does_not_touch_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("h.json");
        let store = JsonFileStore::new(&path);
        store.save(&history_with_successes(&urls(3))).await.unwrap();
        let before = std::fs::read(&path).unwrap();
        let mtime = std::fs::metadata(&path).unwrap().modified().unwrap();

        let driver = SubmissionDriver::new(settings(200), store);
        let report = driver.status().await;

        assert_eq!(report.successes, 3);
        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), mtime);
    }

    #[tokio::test]
    async fn test_reset_persists_empty_history() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("h.json");
        let store = JsonFileStore::new(&path);
        let mut history = history_with_successes(&urls(4));
        history.stamp_last_run();
        store.save(&history).await.unwrap();

        let driver = SubmissionDriver::new(settings(200), store);
        driver.reset().await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["totalSubmitted"], 0);
        assert_eq!(value["lastRun"], "");
        assert_eq!(value["submissions"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_dry_run_lists_only_new_urls() {
        let candidates = urls(8);
        let store = MemoryStore::new(history_with_successes(&candidates[..5]));
        let driver = SubmissionDriver::new(settings(200), store);

        let report = driver.dry_run(&candidates).await.unwrap();
        assert_eq!(report.pending, 3);
        assert_eq!(report.already_submitted, 5);
        assert_eq!(report.batch, candidates[5..].to_vec());

        let text = report.to_string();
        for url in &candidates[5..] {
            assert!(text.contains(url.as_str()));
        }
        assert!(!text.contains("more"));
        assert_eq!(driver.store().save_count(), 0);
    }

    #[tokio::test]
    async fn test_dry_run_preview_truncates() {
        let candidates = urls(30);
        let driver = SubmissionDriver::new(settings(25), MemoryStore::default());

        let report = driver.dry_run(&candidates).await.unwrap();
        assert_eq!(report.batch.len(), 25);
        let text = report.to_string();
        assert!(text.contains(&candidates[19]));
        assert!(!text.contains(&format!("{}\n", candidates[20])));
        assert!(text.ends_with("... and 5 more"));
    }

    #[tokio::test]
    async fn test_dry_run_leaves_file_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("h.json");
        let candidates = urls(6);
        let store = JsonFileStore::new(&path);
        store.save(&history_with_successes(&candidates[..2])).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        let driver = SubmissionDriver::new(settings(200), store);
        driver.dry_run(&candidates).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_one_failure_among_three() {
        let candidates = urls(3);
        let submitter = SpySubmitter {
            failing: vec![candidates[1].clone()],
            ..SpySubmitter::default()
        };
        let driver = SubmissionDriver::new(settings(200), MemoryStore::default());

        let summary = driver.submit(&candidates, &submitter).await.unwrap();
        assert!(summary.has_failures());
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let history = driver.store().snapshot();
        assert_eq!(history.total_submitted, 3);
        assert!(!history.last_run.is_empty());
        let failed = &history.submissions[&candidates[1]];
        assert_eq!(failed.status, SubmissionStatus::Error);
        assert!(failed.response.as_deref().unwrap().contains("Permission denied"));
        assert_eq!(history.submissions[&candidates[0]].status, SubmissionStatus::Success);
        assert_eq!(history.submissions[&candidates[2]].status, SubmissionStatus::Success);
    }

    #[tokio::test]
    async fn test_submit_respects_quota_and_order() {
        let candidates = urls(7);
        let submitter = SpySubmitter::default();
        let driver = SubmissionDriver::new(settings(4), MemoryStore::default());

        let summary = driver.submit(&candidates, &submitter).await.unwrap();
        assert!(!summary.has_failures());
        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.remaining, 3);
        assert_eq!(*submitter.order.lock().unwrap(), candidates[..4].to_vec());

        // Next run picks up where the last one stopped
        let submitter = SpySubmitter::default();
        let summary = driver.submit(&candidates, &submitter).await.unwrap();
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.remaining, 0);
        assert_eq!(*submitter.order.lock().unwrap(), candidates[4..].to_vec());
        assert_eq!(driver.store().snapshot().total_submitted, 7);
    }

    #[tokio::test]
    async fn test_failed_urls_are_not_retried() {
        let candidates = urls(2);
        let submitter = SpySubmitter {
            failing: vec![candidates[0].clone()],
            ..SpySubmitter::default()
        };
        let driver = SubmissionDriver::new(settings(200), MemoryStore::default());
        driver.submit(&candidates, &submitter).await.unwrap();

        let second = SpySubmitter::default();
        let summary = driver.submit(&candidates, &second).await.unwrap();
        assert_eq!(summary, RunSummary::default());
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_periodic_flush() {
        let candidates = urls(25);
        let submitter = SpySubmitter::default();
        let driver = SubmissionDriver::new(settings(200), MemoryStore::default());

        driver.submit(&candidates, &submitter).await.unwrap();
        // after 10, after 20, final
        assert_eq!(driver.store().save_count(), 3);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 25);

        let saved = driver.store().saved();
        assert_eq!(saved[0].submissions.len(), 10);
        assert!(candidates[..10].iter().all(|url| saved[0].contains(url)));
        assert!(!saved[0].contains(&candidates[10]));
        assert_eq!(saved[0].total_submitted, 10);
        assert_eq!(saved[1].submissions.len(), 20);
        assert_eq!(saved[2].submissions.len(), 25);
    }

    #[tokio::test]
    async fn test_empty_batch_does_not_save() {
        let candidates = urls(2);
        let driver = SubmissionDriver::new(settings(200), MemoryStore::new(history_with_successes(&candidates)));
        let submitter = SpySubmitter::default();

        let summary = driver.submit(&candidates, &submitter).await.unwrap();
        assert_eq!(summary.attempted, 0);
        assert_eq!(driver.store().save_count(), 0);
        assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_paced_waits_between_items() {
        let delay = Duration::from_millis(20);
        let mut paced = Paced::new(vec![1, 2, 3].into_iter(), delay);

        let start = std::time::Instant::now();
        assert_eq!(paced.next().await, Some(1));
        assert!(start.elapsed() < delay);
        assert_eq!(paced.next().await, Some(2));
        assert_eq!(paced.next().await, Some(3));
        assert!(start.elapsed() >= delay * 2);
        assert_eq!(paced.next().await, None);
    }
}
