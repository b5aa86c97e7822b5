//! Types for the tracker session.

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the HTTP session wrapper.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP session has not been started")]
    NotStarted,

    #[error("HTTP {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Errors that can occur while talking to the tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The post-login page no longer carries a logout link; staying logged in
    /// without a way out is not safe.
    #[error("Logout link was not found")]
    LogoutLinkNotFound,

    #[error("Tracker session is {0}, expected {1}")]
    InvalidState(SessionState, SessionState),
}

/// Lifecycle of a tracker session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Inactive,
    LoggingIn,
    LoggedIn,
    LoggingOut,
    Closed,
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Inactive => "inactive",
            SessionState::LoggingIn => "logging_in",
            SessionState::LoggedIn => "logged_in",
            SessionState::LoggingOut => "logging_out",
            SessionState::Closed => "closed",
            SessionState::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracker login. Only used while logging in.
#[derive(Clone)]
pub struct TrackerCredentials {
    pub name: String,
    pub password: String,
}

impl TrackerCredentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for TrackerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerCredentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One entry of a tracker result list, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Display title.
    pub title: String,
    /// Raw link of the result, if the entry had one.
    pub link: Option<String>,
}

/// Outcome of looking a name up on the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum Resolution {
    /// Absolute URL of the .torrent file.
    Found(String),
    /// The search returned nothing.
    NoResults,
    /// Several results and nobody to ask.
    Ambiguous,
    /// Several results and the user declined to choose.
    Skipped,
    /// The chosen result carried no torrent id.
    MissingId,
    /// The torrent detail fragment had no download link.
    DetailUnavailable,
}

impl Resolution {
    pub fn into_url(self) -> Option<String> {
        match self {
            Resolution::Found(url) => Some(url),
            _ => None,
        }
    }

    /// Short reason for reports; `None` when the torrent was found.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Resolution::Found(_) => None,
            Resolution::NoResults => Some("no result"),
            Resolution::Ambiguous => Some("multiple results in batch mode"),
            Resolution::Skipped => Some("skipped"),
            Resolution::MissingId => Some("no torrent id in result link"),
            Resolution::DetailUnavailable => Some("download link not available"),
        }
    }
}

/// Login form, built fresh for every login.
#[derive(Debug, Clone, Copy)]
pub struct LoginForm<'a> {
    pub name: &'a str,
    pub password: &'a str,
}

impl<'a> LoginForm<'a> {
    pub const NAME_FIELD: &'static str = "nev";
    pub const PASSWORD_FIELD: &'static str = "pass";

    pub fn new(credentials: &'a TrackerCredentials) -> Self {
        Self {
            name: &credentials.name,
            password: &credentials.password,
        }
    }

    pub fn fields(&self) -> Vec<(&'a str, &'a str)> {
        vec![
            ("set_lang", "hu"),
            ("submitted", "1"),
            (Self::NAME_FIELD, self.name),
            (Self::PASSWORD_FIELD, self.password),
        ]
    }
}

/// Search form, built fresh for every search.
#[derive(Debug, Clone, Copy)]
pub struct SearchForm<'a> {
    pub pattern: &'a str,
}

impl<'a> SearchForm<'a> {
    pub const PATTERN_FIELD: &'static str = "mire";

    pub fn new(pattern: &'a str) -> Self {
        Self { pattern }
    }

    /// Search in names, across every type the account may download.
    pub fn fields(&self) -> Vec<(&'a str, &'a str)> {
        vec![
            ("miben", "name"),
            ("tipus", "all_own"),
            ("submit.x", "34"),
            ("submit.y", "7"),
            ("tags", ""),
            (Self::PATTERN_FIELD, self.pattern),
        ]
    }
}

/// Anything that can turn a release name into a download URL.
#[async_trait]
pub trait TorrentLocator: Send {
    /// Look `pattern` up. Unresolvable names are a [`Resolution`], not an
    /// error; errors are transport failures.
    async fn locate(&mut self, pattern: &str, batch_mode: bool)
        -> Result<Resolution, TrackerError>;
}
