//! Tracker website session.
//!
//! This module wraps one cookie-bearing HTTP connection to the tracker with
//! the login/logout lifecycle and exposes search-and-resolve as a
//! `TorrentLocator`.

mod http;
pub mod parser;
mod session;
mod types;

pub use http::{HttpSession, PageResponse};
pub use session::{torrent_detail_link, TrackerSession, LOGIN_LINK, LOGOUT_MARKER, SEARCH_LINK};
pub use types::*;
