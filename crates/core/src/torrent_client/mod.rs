//! Torrent client abstraction.
//!
//! This module provides a `TorrentClient` trait covering what a restore run
//! needs from a download client, with a Transmission backend.

mod transmission;
mod types;

pub use transmission::TransmissionClient;
pub use types::*;
