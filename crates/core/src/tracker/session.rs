//! Logged-in session on the tracker website.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::config::TrackerConfig;
use crate::prompt::{choose_index, Prompt};

use super::http::HttpSession;
use super::parser::{
    extract_torrent_id, parse_download_link, parse_logout_link, parse_search_results,
};
use super::{
    LoginForm, Resolution, SearchForm, SearchHit, SessionState, TorrentLocator,
    TrackerCredentials, TrackerError,
};

pub const LOGIN_LINK: &str = "login.php";
pub const LOGOUT_MARKER: &str = "exit.php";
pub const SEARCH_LINK: &str = "torrents.php";

/// Link of the fragment that carries the download anchor of a torrent.
pub fn torrent_detail_link(torrent_id: u64) -> String {
    format!("ajax.php?action=torrent_drop&id={}", torrent_id)
}

/// Tracker session.
///
/// `Inactive -> LoggingIn -> LoggedIn -> LoggingOut -> Closed`, with `Failed`
/// when logging in does not work out. Use [`TrackerSession::enter`] before
/// searching and always finish with [`TrackerSession::exit`]; `enter` tears
/// the session down itself when it fails.
pub struct TrackerSession {
    http: HttpSession,
    credentials: TrackerCredentials,
    prompt: Box<dyn Prompt>,
    state: SessionState,
    logout_link: Option<String>,
    torn_down: bool,
}

impl TrackerSession {
    pub fn new(
        config: &TrackerConfig,
        credentials: TrackerCredentials,
        prompt: Box<dyn Prompt>,
    ) -> Self {
        let http = HttpSession::new(
            &config.url,
            config.user_agent.clone(),
            Duration::from_secs(config.timeout_secs as u64),
        );

        Self {
            http,
            credentials,
            prompt,
            state: SessionState::Inactive,
            logout_link: None,
            torn_down: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Logout link discovered on the post-login page, until it is used.
    pub fn logout_link(&self) -> Option<&str> {
        self.logout_link.as_deref()
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Log in and remember the logout link.
    ///
    /// On failure the session is torn down, left in `Failed`, and the error
    /// is returned.
    pub async fn enter(&mut self) -> Result<(), TrackerError> {
        if self.state != SessionState::Inactive {
            return Err(TrackerError::InvalidState(
                self.state,
                SessionState::Inactive,
            ));
        }

        self.state = SessionState::LoggingIn;
        info!(tracker = %self.http.base_url(), user = %self.credentials.name, "Logging in");

        match self.login().await {
            Ok(logout_link) => {
                debug!(logout_link = %logout_link, "Found logout link");
                self.logout_link = Some(logout_link);
                self.state = SessionState::LoggedIn;
                info!("Logged in to tracker");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Tracker login failed");
                self.state = SessionState::Failed;
                self.exit().await;
                Err(e)
            }
        }
    }

    async fn login(&mut self) -> Result<String, TrackerError> {
        self.http.start()?;

        let form = LoginForm::new(&self.credentials);
        let page = self.http.post_form(Some(LOGIN_LINK), &form.fields()).await?;

        parse_logout_link(&page.body, LOGOUT_MARKER).ok_or(TrackerError::LogoutLinkNotFound)
    }

    /// Log out if logged in and release the connection.
    ///
    /// Runs once; later calls do nothing. A failed logout is logged and
    /// otherwise ignored so it never hides the error that ended the run.
    pub async fn exit(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if self.state == SessionState::LoggedIn {
            if let Some(link) = self.logout_link.take() {
                self.state = SessionState::LoggingOut;
                match self.http.get(Some(&link)).await {
                    Ok(_) => info!("Logged out from tracker"),
                    Err(e) => warn!(error = %e, "Tracker logout failed"),
                }
            }
        }

        self.http.close();

        if self.state != SessionState::Failed {
            self.state = SessionState::Closed;
        }
    }

    /// Find a single download URL for `pattern`.
    pub async fn find(
        &mut self,
        pattern: &str,
        batch_mode: bool,
    ) -> Result<Option<String>, TrackerError> {
        Ok(self.locate(pattern, batch_mode).await?.into_url())
    }

    /// Search for `pattern`, settle on one result and resolve its download
    /// URL.
    ///
    /// Several results are skipped in batch mode; otherwise the user picks
    /// one and may decline.
    pub async fn locate(
        &mut self,
        pattern: &str,
        batch_mode: bool,
    ) -> Result<Resolution, TrackerError> {
        if self.state != SessionState::LoggedIn {
            return Err(TrackerError::InvalidState(
                self.state,
                SessionState::LoggedIn,
            ));
        }

        info!(pattern = %pattern, "Searching tracker");
        let form = SearchForm::new(pattern);
        let page = self.http.post_form(Some(SEARCH_LINK), &form.fields()).await?;
        let hits = parse_search_results(&page.body);

        let hit = match hits.len() {
            0 => {
                info!(pattern = %pattern, "No result");
                return Ok(Resolution::NoResults);
            }
            1 => {
                info!(title = %hits[0].title, "Single result");
                &hits[0]
            }
            count => {
                for (index, hit) in hits.iter().enumerate() {
                    debug!(index, title = %hit.title, "Search result");
                }

                if batch_mode {
                    info!(pattern = %pattern, count, "Multiple results, skipped in batch mode");
                    return Ok(Resolution::Ambiguous);
                }

                self.prompt.notify("multiple results:");
                for (index, hit) in hits.iter().enumerate() {
                    self.prompt.notify(&format!("{}. {}", index, hit.title));
                }

                match choose_index(self.prompt.as_mut(), "index", count).await {
                    Some(index) => &hits[index],
                    None => {
                        info!(pattern = %pattern, "Skipped by user");
                        return Ok(Resolution::Skipped);
                    }
                }
            }
        };

        self.resolve(hit).await
    }

    /// Turn a chosen result into an absolute download URL.
    async fn resolve(&mut self, hit: &SearchHit) -> Result<Resolution, TrackerError> {
        let Some(torrent_id) = hit.link.as_deref().and_then(extract_torrent_id) else {
            warn!(link = ?hit.link, "Failed to find a torrent id in result link");
            return Ok(Resolution::MissingId);
        };

        let page = self
            .http
            .get(Some(&torrent_detail_link(torrent_id)))
            .await?;

        match parse_download_link(&page.body) {
            Some(link) if link.starts_with("http://") || link.starts_with("https://") => {
                Ok(Resolution::Found(link))
            }
            Some(link) => Ok(Resolution::Found(self.http.url(Some(&link)))),
            None => {
                warn!(torrent_id, "Torrent detail has no download link");
                Ok(Resolution::DetailUnavailable)
            }
        }
    }
}

#[async_trait]
impl TorrentLocator for TrackerSession {
    async fn locate(
        &mut self,
        pattern: &str,
        batch_mode: bool,
    ) -> Result<Resolution, TrackerError> {
        TrackerSession::locate(self, pattern, batch_mode).await
    }
}

impl Drop for TrackerSession {
    fn drop(&mut self) {
        if self.state == SessionState::LoggedIn {
            warn!("Tracker session dropped while logged in; logout was not attempted");
        }
    }
}
