pub mod checkpoint;
pub mod config;
pub mod credentials;
pub mod driver;
pub mod error;
pub mod guides;
pub mod indexing;
pub mod progress;
pub mod report;
pub mod sources;

pub use checkpoint::{HistoryStore, JsonFileStore, SubmissionHistory, SubmissionRecord, SubmissionStatus};
pub use config::Config;
pub use driver::{DriverSettings, RunSummary, SubmissionDriver};
pub use error::{Result, SparkIndexError};
pub use indexing::{GoogleIndexingClient, UrlSubmitter};
pub use sources::{CandidateSource, RecordSource, SupabaseSource, UrlEnumerator};
