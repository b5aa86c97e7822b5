//! Cookie-bearing HTTP session to the tracker host.

use std::time::Duration;

use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use tracing::debug;

use super::HttpError;

/// A fetched page.
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// Final URL after redirects.
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// One persistent, cookie-aware connection to a single host.
///
/// The session is inactive until [`HttpSession::start`] is called. Requests
/// are sent exactly once; retrying is up to the caller.
pub struct HttpSession {
    base_url: String,
    user_agent: String,
    timeout: Duration,
    client: Option<Client>,
}

impl HttpSession {
    pub fn new(base_url: &str, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            timeout,
            client: None,
        }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_started(&self) -> bool {
        self.client.is_some()
    }

    /// Open the connection. Calling it on a started session keeps the
    /// existing cookies.
    pub fn start(&mut self) -> Result<(), HttpError> {
        if self.client.is_some() {
            return Ok(());
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .cookie_store(true)
            .build()?;
        self.client = Some(client);
        debug!(base_url = %self.base_url, "HTTP session started");
        Ok(())
    }

    /// Release the connection and its cookies. Safe to call at any time.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            debug!(base_url = %self.base_url, "HTTP session closed");
        }
    }

    /// Build the absolute URL for `link`: the base URL itself for `None`,
    /// otherwise `base/link`.
    pub fn url(&self, link: Option<&str>) -> String {
        match link {
            None => self.base_url.clone(),
            Some(link) => format!("{}/{}", self.base_url, link.trim_start_matches('/')),
        }
    }

    /// Send one request and fail on any non-2xx status.
    pub async fn request(
        &self,
        link: Option<&str>,
        method: Method,
        form: Option<&[(&str, &str)]>,
    ) -> Result<PageResponse, HttpError> {
        let client = self.client.as_ref().ok_or(HttpError::NotStarted)?;
        let url = self.url(link);

        debug!(method = %method, url = %url, "Tracker request");

        let mut request = client
            .request(method, &url)
            .header(USER_AGENT, self.user_agent.as_str());
        if let Some(form) = form {
            request = request.form(form);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status { status, url });
        }

        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(PageResponse {
            url,
            status,
            headers,
            body,
        })
    }

    pub async fn get(&self, link: Option<&str>) -> Result<PageResponse, HttpError> {
        self.request(link, Method::GET, None).await
    }

    pub async fn post_form(
        &self,
        link: Option<&str>,
        form: &[(&str, &str)],
    ) -> Result<PageResponse, HttpError> {
        self.request(link, Method::POST, Some(form)).await
    }
}
