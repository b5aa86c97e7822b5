//! Types for torrent client operations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during torrent client operations.
#[derive(Debug, Error)]
pub enum TorrentClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Torrent not found: {0}")]
    TorrentNotFound(i64),

    #[error("Torrent rejected by client: {0}")]
    Rejected(String),
}

/// A torrent the client already manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentInfo {
    /// Client-assigned id.
    pub id: i64,
    /// Torrent name, which is also the top-level name of its data on disk.
    pub name: String,
}

impl TorrentInfo {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Request to add a torrent by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTorrentRequest {
    /// URL the client fetches the .torrent file from.
    pub url: String,
    /// Directory the torrent's data lives in.
    pub download_path: Option<String>,
}

impl AddTorrentRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            download_path: None,
        }
    }

    /// Set the download path.
    pub fn with_download_path(mut self, path: impl Into<String>) -> Self {
        self.download_path = Some(path.into());
        self
    }
}

/// Result of adding a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTorrentResult {
    /// Id of the added torrent.
    pub id: i64,
    /// Name of the torrent, when the client reported one.
    pub name: Option<String>,
    /// The client already had this torrent.
    pub duplicate: bool,
}

/// One file inside a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentFile {
    /// Position in the torrent's file list.
    pub index: usize,
    /// Path relative to the download directory, starting with the torrent name.
    pub name: String,
    /// Size in bytes.
    pub length: u64,
    /// Whether the client will download this file.
    pub wanted: bool,
}

/// Trait for torrent client backends.
#[async_trait]
pub trait TorrentClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// List all torrents.
    async fn list_torrents(&self) -> Result<Vec<TorrentInfo>, TorrentClientError>;

    /// Add a torrent.
    async fn add_torrent(
        &self,
        request: AddTorrentRequest,
    ) -> Result<AddTorrentResult, TorrentClientError>;

    /// Files of a torrent, in torrent order.
    async fn torrent_files(&self, id: i64) -> Result<Vec<TorrentFile>, TorrentClientError>;

    /// Mark the files at `indices` as not wanted.
    async fn set_unwanted_files(
        &self,
        id: i64,
        indices: &[usize],
    ) -> Result<(), TorrentClientError>;
}
