pub mod config;
pub mod prompt;
pub mod restore;
pub mod scanner;
pub mod testing;
pub mod torrent_client;
pub mod tracker;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use prompt::{NoPrompt, Prompt, PromptInput, PromptInterrupts, TerminalPrompt};
pub use restore::{run_session, RestoreError, RestoreOptions, RestoreReport, Restorer};
pub use scanner::{find_untracked_candidates, resolve_data_dir, LocalCandidate, ScanError};
pub use torrent_client::{TorrentClient, TorrentClientError, TransmissionClient};
pub use tracker::{
    Resolution, SessionState, TorrentLocator, TrackerCredentials, TrackerError, TrackerSession,
};
