//! The restore loop.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::scanner::{find_untracked_candidates, resolve_data_dir, LocalCandidate};
use crate::torrent_client::{AddTorrentRequest, TorrentClient};
use crate::tracker::{Resolution, TorrentLocator, TrackerSession};

use super::selection::{plan_unwanted_files, selected_file_names};
use super::{RestoreError, RestoreOptions, RestoreReport, RestoredTorrent, Unavailable};

/// Adds untracked local downloads back to the torrent client.
///
/// Candidates are handled one at a time. Torrent client errors end the run;
/// torrents added before the error stay added.
pub struct Restorer {
    client: Arc<dyn TorrentClient>,
    options: RestoreOptions,
}

impl Restorer {
    pub fn new(client: Arc<dyn TorrentClient>, options: RestoreOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &RestoreOptions {
        &self.options
    }

    /// Untracked candidates under `data_dir`, which must already be resolved.
    pub async fn scan(&self, data_dir: &Path) -> Result<Vec<LocalCandidate>, RestoreError> {
        let existing = self.client.list_torrents().await?;
        info!(
            client = %self.client.name(),
            count = existing.len(),
            "Loaded existing torrents"
        );

        let candidates = find_untracked_candidates(data_dir, &existing, &self.options.marker);
        info!(
            data_dir = %data_dir.display(),
            count = candidates.len(),
            "Found untracked downloads"
        );

        Ok(candidates)
    }

    /// Look up every candidate on the tracker and restore the ones found.
    pub async fn restore_candidates(
        &self,
        locator: &mut dyn TorrentLocator,
        candidates: Vec<LocalCandidate>,
    ) -> Result<RestoreReport, RestoreError> {
        let mut report = RestoreReport::new();

        for candidate in candidates {
            info!(candidate = %candidate.torrent_name, "Looking up candidate");

            let resolution = locator
                .locate(&candidate.torrent_name, self.options.batch_mode)
                .await?;

            match resolution {
                Resolution::Found(url) => {
                    let restored = self.restore_one(url, candidate).await?;
                    report.restored.push(restored);
                }
                other => {
                    let reason = other.reason().unwrap_or("unavailable").to_string();
                    warn!(
                        candidate = %candidate.torrent_name,
                        reason = %reason,
                        "Candidate unavailable"
                    );
                    report.unavailable.push(Unavailable { candidate, reason });
                }
            }
        }

        report.finish();
        Ok(report)
    }

    /// Add `url` for `candidate` and deselect the files not already on disk.
    ///
    /// When the client already holds the torrent nothing is deselected.
    pub async fn restore_one(
        &self,
        url: String,
        candidate: LocalCandidate,
    ) -> Result<RestoredTorrent, RestoreError> {
        let download_dir = candidate.parent_dir().to_path_buf();

        let request = AddTorrentRequest::new(url.clone())
            .with_download_path(download_dir.to_string_lossy());
        let added = self.client.add_torrent(request).await?;

        let mut files = self.client.torrent_files(added.id).await?;

        // A duplicate keeps its data wherever the client already has it, so
        // its file selection is left alone.
        let unwanted = if added.duplicate {
            warn!(
                candidate = %candidate.torrent_name,
                id = added.id,
                "Torrent was already in the client, keeping its file selection"
            );
            Vec::new()
        } else {
            info!(candidate = %candidate.torrent_name, id = added.id, "Added torrent");
            plan_unwanted_files(&download_dir, &files)
        };

        if !unwanted.is_empty() {
            info!(
                id = added.id,
                count = unwanted.len(),
                "Deselecting files missing on disk"
            );
            self.client.set_unwanted_files(added.id, &unwanted).await?;
            files = self.client.torrent_files(added.id).await?;
        }

        let selected_files = selected_file_names(&files);
        for name in &selected_files {
            info!(id = added.id, file = %name, "Selected");
        }

        Ok(RestoredTorrent {
            candidate,
            url,
            torrent_id: added.id,
            duplicate: added.duplicate,
            download_dir,
            unwanted,
            selected_files,
        })
    }

    /// Scan `data_dir` and restore what the tracker has.
    pub async fn run(
        &self,
        locator: &mut dyn TorrentLocator,
        data_dir: &Path,
    ) -> Result<RestoreReport, RestoreError> {
        let started_at = chrono::Utc::now();
        let data_dir = resolve_data_dir(data_dir)?;

        let candidates = self.scan(&data_dir).await?;
        let mut report = self.restore_candidates(locator, candidates).await?;
        report.started_at = started_at;

        info!(
            restored = report.restored.len(),
            unavailable = report.unavailable.len(),
            "Restore finished"
        );
        Ok(report)
    }
}

/// Log in, run, and always log out again.
pub async fn run_session(
    tracker: &mut TrackerSession,
    restorer: &Restorer,
    data_dir: &Path,
) -> Result<RestoreReport, RestoreError> {
    tracker.enter().await?;
    let result = restorer.run(&mut *tracker, data_dir).await;
    tracker.exit().await;
    result
}
