//! Restore lifecycle integration tests.
//!
//! A full run against the fake tracker and the mock torrent client: scan,
//! search, add, prune the file selection, log out.

mod common;

use std::sync::Arc;

use tempfile::TempDir;

use common::{FakeTracker, TrackerServer};
use restorrent_core::prompt::NoPrompt;
use restorrent_core::restore::{run_session, RestoreOptions, Restorer};
use restorrent_core::scanner::resolve_data_dir;
use restorrent_core::testing::{fixtures, MockTorrentClient};
use restorrent_core::tracker::{SessionState, TrackerCredentials, TrackerSession};

struct TestHarness {
    server: TrackerServer,
    client: Arc<MockTorrentClient>,
    data: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        Self {
            server: TrackerServer::start().await,
            client: Arc::new(MockTorrentClient::new()),
            data: TempDir::new().expect("Failed to create data dir"),
        }
    }

    fn tracker(&self) -> TrackerSession {
        TrackerSession::new(
            &self.server.config(),
            TrackerCredentials::new("alice", "hunter2"),
            Box::new(NoPrompt),
        )
    }

    fn restorer(&self, batch_mode: bool) -> Restorer {
        Restorer::new(
            self.client.clone(),
            RestoreOptions {
                batch_mode,
                ..Default::default()
            },
        )
    }
}

#[tokio::test]
async fn test_restores_movie_and_excludes_missing_sample() {
    let h = TestHarness::new().await;
    fixtures::write_files(
        h.data.path(),
        &["Movie.2020/movie.mkv", "Movie.2020/movie.nfo"],
    );
    h.server
        .tracker
        .set_results("Movie.2020", &[("Movie.2020.1080p.BluRay", 4242)]);

    let url = h.server.download_url(4242);
    h.client.set_next_id(7);
    h.client.set_files_for(
        url.clone(),
        fixtures::torrent_files(&[
            "Movie.2020/movie.mkv",
            "Movie.2020/movie.nfo",
            "Movie.2020/sample.mkv",
        ]),
    );

    let mut tracker = h.tracker();
    let report = run_session(&mut tracker, &h.restorer(true), h.data.path())
        .await
        .unwrap();

    assert!(report.unavailable.is_empty());
    assert_eq!(report.restored.len(), 1);

    let restored = &report.restored[0];
    assert_eq!(restored.torrent_id, 7);
    assert_eq!(restored.url, url);
    assert_eq!(restored.unwanted, vec![2]);
    assert_eq!(
        restored.selected_files,
        vec!["Movie.2020/movie.mkv", "Movie.2020/movie.nfo"]
    );

    let root = resolve_data_dir(h.data.path()).unwrap();
    let added = h.client.added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].url, url);
    assert_eq!(
        added[0].download_path.as_deref(),
        Some(&*root.to_string_lossy())
    );
    assert_eq!(h.client.unwanted_updates(), vec![(7, vec![2])]);

    assert_eq!(tracker.state(), SessionState::Closed);
    assert_eq!(FakeTracker::count(&h.server.tracker.logouts), 1);
}

#[tokio::test]
async fn test_tracked_and_unmatched_directories() {
    let h = TestHarness::new().await;
    fixtures::write_files(
        h.data.path(),
        &[
            "Seeding.Already/info.nfo",
            "Not.On.Tracker/info.nfo",
            "Ambiguous.Name/info.nfo",
            "no-marker/video.mkv",
        ],
    );
    h.client.add_existing(1, "Seeding.Already");
    h.server.tracker.set_results(
        "Ambiguous.Name",
        &[("Ambiguous.Name.A", 1), ("Ambiguous.Name.B", 2)],
    );

    let mut tracker = h.tracker();
    let report = run_session(&mut tracker, &h.restorer(true), h.data.path())
        .await
        .unwrap();

    assert!(report.restored.is_empty());
    let mut names = report.unavailable_names();
    names.sort();
    assert_eq!(names, vec!["Ambiguous.Name", "Not.On.Tracker"]);
    assert_eq!(FakeTracker::count(&h.server.tracker.searches), 2);
    assert!(h.client.added().is_empty());
    assert_eq!(FakeTracker::count(&h.server.tracker.logouts), 1);
}

#[tokio::test]
async fn test_client_failure_still_logs_out() {
    let h = TestHarness::new().await;
    fixtures::write_files(h.data.path(), &["Movie.2020/movie.nfo"]);
    h.client.fail_list(true);

    let mut tracker = h.tracker();
    let result = run_session(&mut tracker, &h.restorer(true), h.data.path()).await;

    assert!(result.is_err());
    assert_eq!(FakeTracker::count(&h.server.tracker.searches), 0);
    assert_eq!(FakeTracker::count(&h.server.tracker.logouts), 1);
}
