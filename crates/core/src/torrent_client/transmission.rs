//! Transmission torrent client implementation.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use transmission_rpc::types::{
    BasicAuth, Id, Torrent, TorrentAddArgs, TorrentAddedOrDuplicate, TorrentGetField,
    TorrentSetArgs,
};
use transmission_rpc::TransClient;
use url::Url;

use crate::config::TransmissionConfig;

use super::{
    AddTorrentRequest, AddTorrentResult, TorrentClient, TorrentClientError, TorrentFile,
    TorrentInfo,
};

/// Transmission client implementation.
pub struct TransmissionClient {
    client: Mutex<TransClient>,
    url: String,
}

impl TransmissionClient {
    /// Create a new Transmission client. No request is made until first use.
    pub fn new(config: &TransmissionConfig) -> Result<Self, TorrentClientError> {
        let url = Url::parse(&config.url).map_err(|e| {
            TorrentClientError::ConnectionFailed(format!("Invalid URL '{}': {}", config.url, e))
        })?;

        let client = match (&config.username, &config.password) {
            (Some(user), Some(password)) => TransClient::with_auth(
                url,
                BasicAuth {
                    user: user.clone(),
                    password: password.clone(),
                },
            ),
            _ => TransClient::new(url),
        };

        Ok(Self {
            client: Mutex::new(client),
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get_torrent(
        &self,
        id: i64,
        fields: Vec<TorrentGetField>,
    ) -> Result<Torrent, TorrentClientError> {
        let mut client = self.client.lock().await;
        let response = client
            .torrent_get(Some(fields), Some(vec![Id::Id(id)]))
            .await
            .map_err(map_rpc_err)?;

        response
            .arguments
            .torrents
            .into_iter()
            .next()
            .ok_or(TorrentClientError::TorrentNotFound(id))
    }
}

fn map_rpc_err(e: Box<dyn std::error::Error + Send + Sync>) -> TorrentClientError {
    TorrentClientError::Rpc(e.to_string())
}

fn torrent_info(torrent: Torrent) -> Option<TorrentInfo> {
    Some(TorrentInfo {
        id: torrent.id?,
        name: torrent.name?,
    })
}

/// Pair up the file list with its wanted flags.
///
/// Files without a stats entry count as wanted, which is what Transmission
/// assumes for new torrents.
fn file_list(torrent: Torrent) -> Vec<TorrentFile> {
    let stats = torrent.file_stats.unwrap_or_default();

    torrent
        .files
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, file)| TorrentFile {
            index,
            name: file.name,
            length: file.length.max(0) as u64,
            wanted: stats.get(index).map(|s| s.wanted).unwrap_or(true),
        })
        .collect()
}

fn added_result(
    added: TorrentAddedOrDuplicate,
    url: &str,
) -> Result<AddTorrentResult, TorrentClientError> {
    let (torrent, duplicate) = match added {
        TorrentAddedOrDuplicate::TorrentAdded(torrent) => (torrent, false),
        TorrentAddedOrDuplicate::TorrentDuplicate(torrent) => (torrent, true),
        TorrentAddedOrDuplicate::Error => {
            return Err(TorrentClientError::Rejected(url.to_string()));
        }
    };

    let id = torrent
        .id
        .ok_or_else(|| TorrentClientError::Rpc(format!("No torrent id returned for {}", url)))?;

    Ok(AddTorrentResult {
        id,
        name: torrent.name,
        duplicate,
    })
}

#[async_trait]
impl TorrentClient for TransmissionClient {
    fn name(&self) -> &str {
        "transmission"
    }

    async fn list_torrents(&self) -> Result<Vec<TorrentInfo>, TorrentClientError> {
        let mut client = self.client.lock().await;
        let response = client
            .torrent_get(
                Some(vec![TorrentGetField::Id, TorrentGetField::Name]),
                None,
            )
            .await
            .map_err(map_rpc_err)?;

        let torrents: Vec<TorrentInfo> = response
            .arguments
            .torrents
            .into_iter()
            .filter_map(torrent_info)
            .collect();

        debug!(count = torrents.len(), "Listed torrents");
        Ok(torrents)
    }

    async fn add_torrent(
        &self,
        request: AddTorrentRequest,
    ) -> Result<AddTorrentResult, TorrentClientError> {
        let args = TorrentAddArgs {
            filename: Some(request.url.clone()),
            download_dir: request.download_path,
            ..Default::default()
        };

        let mut client = self.client.lock().await;
        let response = client.torrent_add(args).await.map_err(map_rpc_err)?;

        let result = added_result(response.arguments, &request.url)?;
        debug!(id = result.id, duplicate = result.duplicate, "Added torrent");
        Ok(result)
    }

    async fn torrent_files(&self, id: i64) -> Result<Vec<TorrentFile>, TorrentClientError> {
        let torrent = self
            .get_torrent(
                id,
                vec![
                    TorrentGetField::Id,
                    TorrentGetField::Files,
                    TorrentGetField::FileStats,
                ],
            )
            .await?;

        Ok(file_list(torrent))
    }

    async fn set_unwanted_files(
        &self,
        id: i64,
        indices: &[usize],
    ) -> Result<(), TorrentClientError> {
        let args = TorrentSetArgs {
            files_unwanted: Some(indices.iter().map(|&i| i as i32).collect()),
            ..Default::default()
        };

        let mut client = self.client.lock().await;
        client
            .torrent_set(args, Some(vec![Id::Id(id)]))
            .await
            .map_err(map_rpc_err)?;

        debug!(id, count = indices.len(), "Marked files unwanted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let config = TransmissionConfig {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            TransmissionClient::new(&config),
            Err(TorrentClientError::ConnectionFailed(_))
        ));
    }

    #[test]
    fn test_new_with_auth() {
        let config = TransmissionConfig {
            url: "http://localhost:9091/transmission/rpc".to_string(),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
        };
        let client = TransmissionClient::new(&config).unwrap();
        assert_eq!(client.name(), "transmission");
        assert_eq!(client.url(), "http://localhost:9091/transmission/rpc");
    }

    #[test]
    fn test_added_result_error_is_rejected() {
        let result = added_result(TorrentAddedOrDuplicate::Error, "https://t/dl?id=7");
        assert!(matches!(result, Err(TorrentClientError::Rejected(url)) if url == "https://t/dl?id=7"));
    }
}
