//! Types for the restore run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RestoreConfig;
use crate::scanner::LocalCandidate;

/// Errors that end a restore run.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// Tracker error.
    #[error("tracker error: {0}")]
    Tracker(#[from] crate::tracker::TrackerError),

    /// Torrent client error.
    #[error("torrent client error: {0}")]
    TorrentClient(#[from] crate::torrent_client::TorrentClientError),

    /// Data directory error.
    #[error("scan error: {0}")]
    Scan(#[from] crate::scanner::ScanError),
}

/// Options of a restore run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Skip ambiguous search results instead of asking.
    pub batch_mode: bool,
    /// Substring of a file name that marks a finished download.
    pub marker: String,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self::from(&RestoreConfig::default())
    }
}

impl From<&RestoreConfig> for RestoreOptions {
    fn from(config: &RestoreConfig) -> Self {
        Self {
            batch_mode: config.batch_mode,
            marker: config.marker.clone(),
        }
    }
}

/// A torrent added back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoredTorrent {
    /// Local directory the torrent was matched to.
    pub candidate: LocalCandidate,
    /// Download URL found on the tracker.
    pub url: String,
    /// Client id of the torrent.
    pub torrent_id: i64,
    /// The client already had this torrent.
    pub duplicate: bool,
    /// Download directory given to the client.
    pub download_dir: PathBuf,
    /// Indices of the files marked unwanted.
    pub unwanted: Vec<usize>,
    /// Files left selected after pruning.
    pub selected_files: Vec<String>,
}

/// A candidate that could not be matched on the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unavailable {
    pub candidate: LocalCandidate,
    pub reason: String,
}

/// Outcome of a restore run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreReport {
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub restored: Vec<RestoredTorrent>,
    pub unavailable: Vec<Unavailable>,
}

impl RestoreReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            restored: Vec::new(),
            unavailable: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Names of the candidates that could not be restored.
    pub fn unavailable_names(&self) -> Vec<&str> {
        self.unavailable
            .iter()
            .map(|u| u.candidate.torrent_name.as_str())
            .collect()
    }
}

impl Default for RestoreReport {
    fn default() -> Self {
        Self::new()
    }
}
