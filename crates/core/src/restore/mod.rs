//! Restore untracked downloads.
//!
//! Scans the data directory, finds each untracked download on the tracker,
//! adds it to the torrent client next to its existing data, and keeps only
//! the files already on disk selected.

mod runner;
mod selection;
mod types;

pub use runner::{run_session, Restorer};
pub use selection::{plan_unwanted_files, selected_file_names};
pub use types::*;
