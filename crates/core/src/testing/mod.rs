//! Testing utilities and mock implementations.
//!
//! This module provides stand-ins for the torrent client, the tracker lookup
//! and the interactive prompt, so restore runs can be tested without a
//! running Transmission or a tracker account.
//!
//! # Example
//!
//! ```rust,ignore
//! use restorrent_core::testing::{fixtures, MockLocator, MockTorrentClient};
//! use restorrent_core::tracker::Resolution;
//!
//! let client = Arc::new(MockTorrentClient::new());
//! let mut locator = MockLocator::new();
//! locator.push(Resolution::Found("https://tracker/dl?id=7".into()));
//!
//! let report = Restorer::new(client.clone(), options).run(&mut locator, dir).await?;
//! ```

mod mock_locator;
mod mock_torrent_client;
mod scripted_prompt;

pub use mock_locator::MockLocator;
pub use mock_torrent_client::MockTorrentClient;
pub use scripted_prompt::ScriptedPrompt;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::fs;
    use std::path::Path;

    use crate::torrent_client::TorrentFile;

    /// Torrent file list in the given order, everything wanted.
    pub fn torrent_files(names: &[&str]) -> Vec<TorrentFile> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| TorrentFile {
                index,
                name: name.to_string(),
                length: 1024 * 1024,
                wanted: true,
            })
            .collect()
    }

    /// Create each relative path under `root` as a small file, with parents.
    pub fn write_files(root: &Path, paths: &[&str]) {
        for rel in paths {
            let path = root.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create fixture directory");
            }
            fs::write(&path, rel.as_bytes()).expect("write fixture file");
        }
    }

    /// Search results page listing `(title, torrent id)` entries.
    pub fn search_page(hits: &[(&str, u64)]) -> String {
        let entries: String = hits
            .iter()
            .map(|(title, id)| {
                format!(
                    r#"<div class="box_torrent"><div class="torrent_txt"><a href="torrents.php?action=details&amp;id={id}" title="{title}"><nobr>{title}</nobr></a></div></div>"#
                )
            })
            .collect();
        format!("<html><body><div class=\"box_torrent_all\">{entries}</div></body></html>")
    }

    /// Page shown after logging in, with a logout link.
    pub fn logged_in_page(logout_link: &str) -> String {
        let logout_link = logout_link.replace('&', "&amp;");
        format!(
            r#"<html><body><div id="menu"><a href="index.php">Index</a><a href="{logout_link}">Exit</a></div></body></html>"#
        )
    }

    /// Torrent detail fragment with a download link.
    pub fn detail_fragment(download_link: &str) -> String {
        let download_link = download_link.replace('&', "&amp;");
        format!(
            r#"<div class="torrent_drop"><a href="{download_link}"><img src="download.png"></a></div>"#
        )
    }
}
