//! Mock torrent client for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::torrent_client::{
    AddTorrentRequest, AddTorrentResult, TorrentClient, TorrentClientError, TorrentFile,
    TorrentInfo,
};

#[derive(Debug, Default)]
struct State {
    existing: Vec<TorrentInfo>,
    files_by_url: HashMap<String, Vec<TorrentFile>>,
    files_by_id: HashMap<i64, Vec<TorrentFile>>,
    ids_by_url: HashMap<String, i64>,
    added: Vec<AddTorrentRequest>,
    unwanted_updates: Vec<(i64, Vec<usize>)>,
    next_id: i64,
    fail_add: bool,
    fail_list: bool,
}

/// Mock implementation of the TorrentClient trait.
///
/// Provides controllable behavior for testing:
/// - Existing torrents returned by `list_torrents`
/// - File lists handed out per added URL
/// - Recorded adds and unwanted-file updates
/// - Injected failures
///
/// # Example
///
/// ```rust,ignore
/// let client = MockTorrentClient::new();
/// client.add_existing(1, "Already.Seeding");
/// client.set_next_id(7);
/// client.set_files_for(url, fixtures::torrent_files(&["Movie/movie.mkv"]));
///
/// // ... run a restore ...
///
/// assert_eq!(client.unwanted_updates(), vec![(7, vec![2])]);
/// ```
#[derive(Debug)]
pub struct MockTorrentClient {
    state: Mutex<State>,
}

impl Default for MockTorrentClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTorrentClient {
    /// Create a new mock torrent client. Ids of added torrents start at 1.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a torrent the client already manages.
    pub fn add_existing(&self, id: i64, name: impl Into<String>) {
        self.state().existing.push(TorrentInfo::new(id, name));
    }

    /// Id given to the next added torrent.
    pub fn set_next_id(&self, id: i64) {
        self.state().next_id = id;
    }

    /// Files of the torrent behind `url`, once it is added.
    pub fn set_files_for(&self, url: impl Into<String>, files: Vec<TorrentFile>) {
        self.state().files_by_url.insert(url.into(), files);
    }

    /// Make `add_torrent` reject every request.
    pub fn fail_add(&self, fail: bool) {
        self.state().fail_add = fail;
    }

    /// Make `list_torrents` fail with a connection error.
    pub fn fail_list(&self, fail: bool) {
        self.state().fail_list = fail;
    }

    /// Recorded add requests, in call order.
    pub fn added(&self) -> Vec<AddTorrentRequest> {
        self.state().added.clone()
    }

    /// Recorded `set_unwanted_files` calls, in call order.
    pub fn unwanted_updates(&self) -> Vec<(i64, Vec<usize>)> {
        self.state().unwanted_updates.clone()
    }
}

#[async_trait]
impl TorrentClient for MockTorrentClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_torrents(&self) -> Result<Vec<TorrentInfo>, TorrentClientError> {
        let state = self.state();
        if state.fail_list {
            return Err(TorrentClientError::ConnectionFailed(
                "mock connection refused".to_string(),
            ));
        }
        Ok(state.existing.clone())
    }

    async fn add_torrent(
        &self,
        request: AddTorrentRequest,
    ) -> Result<AddTorrentResult, TorrentClientError> {
        let mut state = self.state();
        if state.fail_add {
            return Err(TorrentClientError::Rejected(request.url));
        }

        state.added.push(request.clone());

        if let Some(&id) = state.ids_by_url.get(&request.url) {
            return Ok(AddTorrentResult {
                id,
                name: None,
                duplicate: true,
            });
        }

        let id = state.next_id;
        state.next_id += 1;
        state.ids_by_url.insert(request.url.clone(), id);

        let files = state
            .files_by_url
            .get(&request.url)
            .cloned()
            .unwrap_or_default();
        let name = files
            .first()
            .and_then(|f| f.name.split('/').next())
            .map(|n| n.to_string());
        state.files_by_id.insert(id, files);

        Ok(AddTorrentResult {
            id,
            name,
            duplicate: false,
        })
    }

    async fn torrent_files(&self, id: i64) -> Result<Vec<TorrentFile>, TorrentClientError> {
        self.state()
            .files_by_id
            .get(&id)
            .cloned()
            .ok_or(TorrentClientError::TorrentNotFound(id))
    }

    async fn set_unwanted_files(
        &self,
        id: i64,
        indices: &[usize],
    ) -> Result<(), TorrentClientError> {
        let mut state = self.state();
        let files = state
            .files_by_id
            .get_mut(&id)
            .ok_or(TorrentClientError::TorrentNotFound(id))?;

        for file in files.iter_mut() {
            if indices.contains(&file.index) {
                file.wanted = false;
            }
        }

        state.unwanted_updates.push((id, indices.to_vec()));
        Ok(())
    }
}
