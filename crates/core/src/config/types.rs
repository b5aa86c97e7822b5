use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub transmission: TransmissionConfig,
    #[serde(default)]
    pub restore: RestoreConfig,
}

/// Tracker website configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Base URL of the tracker site, without a trailing path.
    #[serde(default = "default_tracker_url")]
    pub url: String,
    /// Login name. Usually supplied on the command line or via env.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// User-Agent sent with every tracker request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            url: default_tracker_url(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_tracker_url() -> String {
    "https://ncore.cc".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/51.0.2704.103 Safari/537.36"
        .to_string()
}

/// Transmission RPC configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransmissionConfig {
    /// RPC endpoint (e.g., "http://localhost:9091/transmission/rpc")
    #[serde(default = "default_transmission_url")]
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for TransmissionConfig {
    fn default() -> Self {
        Self {
            url: default_transmission_url(),
            username: None,
            password: None,
        }
    }
}

fn default_transmission_url() -> String {
    "http://localhost:9091/transmission/rpc".to_string()
}

/// Reconciliation behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestoreConfig {
    /// Skip ambiguous search results instead of asking.
    #[serde(default)]
    pub batch_mode: bool,
    /// File name fragment marking a directory as a finished release.
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            batch_mode: false,
            marker: default_marker(),
        }
    }
}

fn default_marker() -> String {
    ".nfo".to_string()
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub tracker: SanitizedTrackerConfig,
    pub transmission: SanitizedTransmissionConfig,
    pub restore: RestoreConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTrackerConfig {
    pub url: String,
    pub username: String,
    pub password_configured: bool,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTransmissionConfig {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            tracker: SanitizedTrackerConfig {
                url: config.tracker.url.clone(),
                username: config.tracker.username.clone(),
                password_configured: !config.tracker.password.is_empty(),
                timeout_secs: config.tracker.timeout_secs,
            },
            transmission: SanitizedTransmissionConfig {
                url: config.transmission.url.clone(),
                username: config.transmission.username.clone(),
                password_configured: config
                    .transmission
                    .password
                    .as_ref()
                    .is_some_and(|p| !p.is_empty()),
            },
            restore: config.restore.clone(),
        }
    }
}
