// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Single asynchronous load of the post dataset
//!
//! The location is either an HTTP(S) URL or a local file path. There is no
//! timeout and no retry: a failed load is final.

use crate::error::{LoadError, TransportFailure};
use crate::posts::Dataset;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

/// Where the JSON document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, anything else a path
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::Path(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => f.write_str(url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Provenance of a loaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub location: String,
    /// SHA-256 of the raw document, hex encoded
    pub sha256: String,
    pub size_bytes: usize,
}

/// A successfully loaded dataset
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dataset: Dataset,
    pub source: SourceInfo,
}

/// Fetch and parse the dataset at `source`
pub async fn load(source: &DataSource) -> Result<LoadedData, LoadError> {
    let location = source.to_string();
    tracing::info!("Loading posts from {}", location);

    let bytes = fetch(source).await.map_err(|failure| LoadError::Transport {
        location: location.clone(),
        failure,
    })?;

    let dataset = Dataset::from_json_slice(&bytes).map_err(|source| LoadError::Parse {
        location: location.clone(),
        source,
    })?;

    tracing::info!("Loaded {} posts ({} bytes) from {}", dataset.len(), bytes.len(), location);

    Ok(LoadedData {
        dataset,
        source: SourceInfo {
            location,
            sha256: hex::encode(Sha256::digest(&bytes)),
            size_bytes: bytes.len(),
        },
    })
}

async fn fetch(source: &DataSource) -> Result<Vec<u8>, TransportFailure> {
    match source {
        DataSource::Url(url) => {
            let response = reqwest::get(url.as_str()).await?;
            let status = response.status();
            if !status.is_success() {
                return Err(TransportFailure::Status(status.as_u16()));
            }
            Ok(response.bytes().await?.to_vec())
        }
        DataSource::Path(path) => Ok(tokio::fs::read(path).await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single HTTP request with `status` and `body`, return its URL
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/posts.json", addr)
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            DataSource::parse("https://example.org/posts.json"),
            DataSource::Url("https://example.org/posts.json".to_string())
        );
        assert_eq!(
            DataSource::parse("HTTP://example.org/posts.json"),
            DataSource::Url("HTTP://example.org/posts.json".to_string())
        );
        assert_eq!(
            DataSource::parse("data/csvjson.json"),
            DataSource::Path(PathBuf::from("data/csvjson.json"))
        );
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"Platform": "X", "Misinformation_Flag": "True"}}, {{"Platform": "Y"}}]"#
        )
        .unwrap();

        let source = DataSource::Path(file.path().to_path_buf());
        let loaded = load(&source).await.unwrap();

        assert_eq!(loaded.dataset.len(), 2);
        assert_eq!(loaded.source.sha256.len(), 64);
        assert!(loaded.source.size_bytes > 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::Path(dir.path().join("absent.json"));

        let err = load(&source).await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Transport {
                failure: TransportFailure::Io(_),
                ..
            }
        ));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_http_error_status_is_transport_error() {
        let url = serve_once("404 Not Found", "not here").await;

        let err = load(&DataSource::parse(&url)).await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Transport {
                failure: TransportFailure::Status(404),
                ..
            }
        ));
        assert_eq!(err.status(), Some(404));
        assert!(err.user_message().contains(&url));
    }

    #[tokio::test]
    async fn test_load_over_http() {
        let url = serve_once("200 OK", r#"[{"Platform": "X", "Misinformation_Flag": "True"}]"#).await;

        let loaded = load(&DataSource::parse(&url)).await.unwrap();
        assert_eq!(loaded.dataset.len(), 1);
        assert!(loaded.dataset.posts()[0].is_flagged());
        assert_eq!(loaded.source.location, url);
    }

    #[tokio::test]
    async fn test_non_array_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"posts": []}}"#).unwrap();

        let err = load(&DataSource::Path(file.path().to_path_buf())).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
