//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

use restorrent_core::Config;

#[derive(Parser, Debug)]
#[command(
    name = "restorrent",
    version,
    about = "Add untracked downloads back to Transmission from the tracker"
)]
pub struct Args {
    /// Directory holding the downloaded data
    #[arg(short = 'd', long, env = "RESTORRENT_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Tracker user name
    #[arg(short = 'u', long, env = "RESTORRENT_TRACKER_USER")]
    pub tracker_user: Option<String>,

    /// Tracker password
    #[arg(short = 'p', long, env = "RESTORRENT_TRACKER_PASSWORD", hide_env_values = true)]
    pub tracker_password: Option<String>,

    /// Transmission RPC user name
    #[arg(short = 't', long, env = "RESTORRENT_TRANSMISSION_USER")]
    pub transmission_user: Option<String>,

    /// Transmission RPC password
    #[arg(
        short = 'y',
        long,
        env = "RESTORRENT_TRANSMISSION_PASSWORD",
        hide_env_values = true
    )]
    pub transmission_password: Option<String>,

    /// Skip ambiguous search results instead of asking
    #[arg(short = 'b', long)]
    pub batch_mode: bool,

    /// Config file (TOML)
    #[arg(short = 'c', long, env = "RESTORRENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Let flags override values from the config file and environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(user) = &self.tracker_user {
            config.tracker.username = user.clone();
        }
        if let Some(password) = &self.tracker_password {
            config.tracker.password = password.clone();
        }
        if let Some(user) = &self.transmission_user {
            config.transmission.username = Some(user.clone());
        }
        if let Some(password) = &self.transmission_password {
            config.transmission.password = Some(password.clone());
        }
        if self.batch_mode {
            config.restore.batch_mode = true;
        }
    }
}
