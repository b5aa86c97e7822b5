//! Local directory scanner.
//!
//! Walks the data directory and finds finished downloads the torrent client
//! does not know about. A directory counts as finished when it directly
//! holds a file whose name contains the release marker (`.nfo` by default).

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::torrent_client::TorrentInfo;

/// Errors from checking the data directory.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Data directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A local directory that looks like a finished but untracked download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCandidate {
    /// Directory basename, searched for on the tracker.
    pub torrent_name: String,
    /// Absolute path of the directory.
    pub absolute_path: PathBuf,
}

impl LocalCandidate {
    pub fn new(torrent_name: impl Into<String>, absolute_path: impl Into<PathBuf>) -> Self {
        Self {
            torrent_name: torrent_name.into(),
            absolute_path: absolute_path.into(),
        }
    }

    /// Directory the torrent is added to, so the client finds the data under
    /// its own name.
    pub fn parent_dir(&self) -> &Path {
        self.absolute_path
            .parent()
            .unwrap_or(self.absolute_path.as_path())
    }
}

/// Canonical form of `path`, which must be an existing readable directory.
pub fn resolve_data_dir(path: impl AsRef<Path>) -> Result<PathBuf, ScanError> {
    let path = path.as_ref();

    let canonical = fs::canonicalize(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
        _ => ScanError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if !canonical.is_dir() {
        return Err(ScanError::NotADirectory(canonical));
    }

    fs::read_dir(&canonical).map_err(|e| ScanError::Unreadable {
        path: canonical.clone(),
        source: e,
    })?;

    Ok(canonical)
}

/// Find directories under `root` that hold a finished download the client
/// does not track.
///
/// Directories named like an existing torrent are not descended into. A
/// candidate is not descended into either. Entries are visited oldest first
/// at every level. Problems reading single entries are logged and skipped.
pub fn find_untracked_candidates(
    root: &Path,
    existing: &[TorrentInfo],
    marker: &str,
) -> Vec<LocalCandidate> {
    let tracked: HashSet<String> = existing.iter().map(|t| t.name.clone()).collect();
    let pruned = tracked.clone();

    let mut walker = WalkDir::new(root)
        .sort_by_key(modified)
        .into_iter()
        .filter_entry(move |entry| {
            !(entry.depth() > 0
                && entry.file_type().is_dir()
                && pruned.contains(&*entry_name(entry)))
        });

    let mut candidates = Vec::new();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry_name(&entry).into_owned();
        if tracked.contains(&name) {
            continue;
        }

        if has_marker_file(entry.path(), marker) {
            debug!(path = %entry.path().display(), "Found untracked download");
            candidates.push(LocalCandidate::new(name, entry.path()));
            walker.skip_current_dir();
        }
    }

    warn_duplicate_names(&candidates);
    candidates
}

fn modified(entry: &DirEntry) -> Option<std::time::SystemTime> {
    entry.metadata().ok().and_then(|m| m.modified().ok())
}

fn entry_name(entry: &DirEntry) -> std::borrow::Cow<'_, str> {
    match entry.path().file_name() {
        Some(name) => name.to_string_lossy(),
        None => entry.path().to_string_lossy(),
    }
}

/// Whether `dir` directly holds a non-directory entry whose name contains
/// `marker`.
fn has_marker_file(dir: &Path, marker: &str) -> bool {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Failed to list directory");
            return false;
        }
    };

    entries.filter_map(|e| e.ok()).any(|e| {
        let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
        !is_dir && e.file_name().to_string_lossy().contains(marker)
    })
}

fn warn_duplicate_names(candidates: &[LocalCandidate]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for candidate in candidates {
        *counts.entry(candidate.torrent_name.as_str()).or_default() += 1;
    }

    for (name, count) in counts.into_iter().filter(|(_, count)| *count > 1) {
        warn!(name = %name, count, "Several untracked directories share a name");
    }
}
