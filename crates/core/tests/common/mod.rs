//! Fake tracker website for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};

use restorrent_core::config::TrackerConfig;
use restorrent_core::testing::fixtures;

pub const LOGOUT_LINK: &str = "exit.php?q=5f3a9c";

/// Behaviour and counters of the fake tracker.
#[derive(Default)]
pub struct FakeTracker {
    results: Mutex<HashMap<String, Vec<(String, u64)>>>,
    pub fail_login: AtomicBool,
    pub hide_logout_link: AtomicBool,
    pub fail_search: AtomicBool,
    pub fail_logout: AtomicBool,
    /// Result links carry no `id=` parameter.
    pub omit_id: AtomicBool,
    /// Detail fragments carry no download anchor.
    pub empty_detail: AtomicBool,
    /// Detail fragments link to an absolute download URL.
    pub absolute_download: AtomicBool,
    pub fail_detail: AtomicBool,
    pub logins: AtomicUsize,
    pub searches: AtomicUsize,
    pub details: AtomicUsize,
    pub logouts: AtomicUsize,
    last_login: Mutex<Option<HashMap<String, String>>>,
    last_search: Mutex<Option<HashMap<String, String>>>,
}

impl FakeTracker {
    /// Search results for `pattern`.
    pub fn set_results(&self, pattern: &str, hits: &[(&str, u64)]) {
        self.results.lock().unwrap().insert(
            pattern.to_string(),
            hits.iter().map(|(t, id)| (t.to_string(), *id)).collect(),
        );
    }

    pub fn last_login(&self) -> Option<HashMap<String, String>> {
        self.last_login.lock().unwrap().clone()
    }

    pub fn last_search(&self) -> Option<HashMap<String, String>> {
        self.last_search.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Link the fake tracker hands out for torrent `id`.
pub fn download_link(id: u64) -> String {
    format!("torrents.php?action=download&id={}&key=k3y", id)
}

/// Absolute download URL handed out when `absolute_download` is set.
pub fn absolute_download_url(id: u64) -> String {
    format!("https://cdn.example/{}.torrent", id)
}

pub struct TrackerServer {
    pub url: String,
    pub tracker: Arc<FakeTracker>,
}

impl TrackerServer {
    pub async fn start() -> Self {
        let tracker = Arc::new(FakeTracker::default());

        let app = Router::new()
            .route("/login.php", post(login))
            .route("/torrents.php", post(search))
            .route("/ajax.php", get(detail))
            .route("/exit.php", get(logout))
            .with_state(Arc::clone(&tracker));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            tracker,
        }
    }

    pub fn config(&self) -> TrackerConfig {
        TrackerConfig {
            url: self.url.clone(),
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Absolute URL of the download link for torrent `id`.
    pub fn download_url(&self, id: u64) -> String {
        format!("{}/{}", self.url, download_link(id))
    }
}

type Shared = State<Arc<FakeTracker>>;

async fn login(State(tracker): Shared, Form(form): Form<HashMap<String, String>>) -> Response {
    tracker.logins.fetch_add(1, Ordering::SeqCst);
    *tracker.last_login.lock().unwrap() = Some(form);

    if tracker.fail_login.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if tracker.hide_logout_link.load(Ordering::SeqCst) {
        return Html("<html><body><a href=\"login.php\">Login</a></body></html>".to_string())
            .into_response();
    }
    Html(fixtures::logged_in_page(LOGOUT_LINK)).into_response()
}

async fn search(State(tracker): Shared, Form(form): Form<HashMap<String, String>>) -> Response {
    tracker.searches.fetch_add(1, Ordering::SeqCst);
    let pattern = form.get("mire").cloned().unwrap_or_default();
    *tracker.last_search.lock().unwrap() = Some(form);

    if tracker.fail_search.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let hits = tracker
        .results
        .lock()
        .unwrap()
        .get(&pattern)
        .cloned()
        .unwrap_or_default();
    let hits: Vec<(&str, u64)> = hits.iter().map(|(t, id)| (t.as_str(), *id)).collect();
    let mut page = fixtures::search_page(&hits);
    if tracker.omit_id.load(Ordering::SeqCst) {
        page = page.replace("&amp;id=", "&amp;hash=");
    }
    Html(page).into_response()
}

async fn detail(State(tracker): Shared, Query(query): Query<HashMap<String, String>>) -> Response {
    tracker.details.fetch_add(1, Ordering::SeqCst);

    if tracker.fail_detail.load(Ordering::SeqCst) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let id = match (query.get("action").map(String::as_str), query.get("id")) {
        (Some("torrent_drop"), Some(id)) => match id.parse::<u64>() {
            Ok(id) => id,
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        },
        _ => return StatusCode::BAD_REQUEST.into_response(),
    };

    if tracker.empty_detail.load(Ordering::SeqCst) {
        return Html("<div class=\"torrent_drop\">Nincs adat</div>".to_string()).into_response();
    }
    let link = if tracker.absolute_download.load(Ordering::SeqCst) {
        absolute_download_url(id)
    } else {
        download_link(id)
    };
    Html(fixtures::detail_fragment(&link)).into_response()
}

async fn logout(State(tracker): Shared) -> Response {
    tracker.logouts.fetch_add(1, Ordering::SeqCst);
    if tracker.fail_logout.load(Ordering::SeqCst) {
        return StatusCode::BAD_GATEWAY.into_response();
    }
    Html("<html><body>bye</body></html>".to_string()).into_response()
}
