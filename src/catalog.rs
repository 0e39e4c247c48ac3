//! Catalog loader: one HTTP fetch of the song list, plus fetching the
//! audio bytes a song's source reference points at.

use reqwest::{Client, Url};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::model::Song;

/// Errors that can occur while talking to the catalog server.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Where a song's audio lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SongSource {
    Remote(Url),
    Local(PathBuf),
}

#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    endpoint: Url,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = Url::parse(&config.catalog_url)
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", config.catalog_url, e)))?;
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch the full catalog, preserving server order.
    pub async fn fetch_songs(&self) -> Result<Vec<Song>> {
        debug!(url = %self.endpoint, "Fetching catalog");

        let response = self.http.get(self.endpoint.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let songs: Vec<Song> = serde_json::from_str(&body)?;

        debug!(songs = songs.len(), "Fetched catalog");
        Ok(songs)
    }

    /// Resolve a song's source reference.
    ///
    /// `http(s)://` URLs are used as-is, `file://` names a local file and
    /// everything else is a path on the catalog server's origin.
    pub fn resolve_source(&self, src: &str) -> Result<SongSource> {
        let src = src.trim();
        if src.starts_with("http://") || src.starts_with("https://") {
            let url = Url::parse(src).map_err(|e| CatalogError::InvalidUrl(format!("{src}: {e}")))?;
            return Ok(SongSource::Remote(url));
        }
        if src.starts_with("file://") {
            let path = Url::parse(src)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .ok_or_else(|| CatalogError::InvalidUrl(src.to_string()))?;
            return Ok(SongSource::Local(path));
        }

        let path = if src.starts_with('/') {
            src.to_string()
        } else {
            format!("/{src}")
        };
        let url = self
            .endpoint
            .join(&path)
            .map_err(|e| CatalogError::InvalidUrl(format!("{src}: {e}")))?;
        Ok(SongSource::Remote(url))
    }

    /// Download (or read) the encoded audio of a song.
    pub async fn fetch_audio(&self, song: &Song) -> Result<Vec<u8>> {
        match self.resolve_source(&song.src)? {
            SongSource::Remote(url) => {
                debug!(song_id = %song.id, url = %url, "Fetching audio");
                let response = self.http.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status {
                        status: status.as_u16(),
                        body: String::new(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
            SongSource::Local(path) => {
                debug!(song_id = %song.id, path = %path.display(), "Reading audio file");
                Ok(tokio::fs::read(&path).await?)
            }
        }
    }
}
