//! File selection of a restored torrent.

use std::path::Path;

use crate::torrent_client::TorrentFile;

/// Indices of the files that are not already on disk under `download_dir`.
///
/// Only regular files count as present; a directory or a missing path at a
/// file's location makes that file unwanted.
pub fn plan_unwanted_files(download_dir: &Path, files: &[TorrentFile]) -> Vec<usize> {
    files
        .iter()
        .filter(|file| !download_dir.join(&file.name).is_file())
        .map(|file| file.index)
        .collect()
}

/// Names of the files the client will download.
pub fn selected_file_names(files: &[TorrentFile]) -> Vec<String> {
    files
        .iter()
        .filter(|file| file.wanted)
        .map(|file| file.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file(index: usize, name: &str) -> TorrentFile {
        TorrentFile {
            index,
            name: name.to_string(),
            length: 100,
            wanted: true,
        }
    }

    #[test]
    fn test_only_missing_files_are_unwanted() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("Release");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.mkv"), b"a").unwrap();
        fs::write(dir.join("b.nfo"), b"b").unwrap();

        let files = vec![
            file(0, "Release/a.mkv"),
            file(1, "Release/b.nfo"),
            file(2, "Release/sample.mkv"),
        ];

        assert_eq!(plan_unwanted_files(tmp.path(), &files), vec![2]);
    }

    #[test]
    fn test_directory_in_place_of_file_is_unwanted() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Release/extras.mkv")).unwrap();

        let files = vec![file(0, "Release/extras.mkv")];

        assert_eq!(plan_unwanted_files(tmp.path(), &files), vec![0]);
    }

    #[test]
    fn test_everything_present_means_nothing_unwanted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("single.iso"), b"x").unwrap();

        assert!(plan_unwanted_files(tmp.path(), &[file(0, "single.iso")]).is_empty());
        assert!(plan_unwanted_files(tmp.path(), &[]).is_empty());
    }

    #[test]
    fn test_selected_file_names() {
        let mut files = vec![file(0, "R/a.mkv"), file(1, "R/sample.mkv")];
        files[1].wanted = false;

        assert_eq!(selected_file_names(&files), vec!["R/a.mkv".to_string()]);
    }
}
