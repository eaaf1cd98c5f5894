// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Error types at the library boundary

use std::path::PathBuf;
use thiserror::Error;

/// Why a dataset could not be loaded.
///
/// Both kinds are terminal for the session: nothing is rendered.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not fetch {location}: {failure}")]
    Transport {
        location: String,
        #[source]
        failure: TransportFailure,
    },
    #[error("could not parse posts from {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum TransportFailure {
    #[error("HTTP error, status {0}")]
    Status(u16),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// HTTP status of a non-success response, if that is what failed
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::Transport {
                failure: TransportFailure::Status(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }

    /// Message shown to the user in the failure notification
    pub fn user_message(&self) -> String {
        let location = match self {
            LoadError::Transport { location, .. } | LoadError::Parse { location, .. } => location,
        };
        format!(
            "Could not load data. Please ensure the file exists at '{}' and is a JSON array of posts. ({})",
            location, self
        )
    }
}

/// Failure while writing an exported labeled split
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_transport_status() {
        let err = LoadError::Transport {
            location: "data/posts.json".to_string(),
            failure: TransportFailure::Status(404),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("404"));
        assert!(err.user_message().contains("data/posts.json"));

        let parse = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = LoadError::Parse {
            location: "data/posts.json".to_string(),
            source: parse,
        };
        assert_eq!(err.status(), None);
    }
}
