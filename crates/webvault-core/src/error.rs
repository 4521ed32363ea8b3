//! Error types for the fetch and persist stages.
//!
//! Both are caught at the task boundary in the coordinator and logged; they
//! never abort other tasks.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while fetching a URL into its destination file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Destination could not be opened, or a write to it failed mid-transfer.
    #[error("file error on {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// DNS, connect, TLS or protocol failure reported by libcurl.
    #[error("transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
}

impl FetchError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::File {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn transport(url: &str, source: curl::Error) -> Self {
        FetchError::Transport {
            url: url.to_string(),
            source,
        }
    }

    /// True for network/protocol failures (as opposed to local file errors).
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }
}

/// Failure while creating the schema or persisting a record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The fetched file is missing or unreadable.
    #[error("file error on {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection, schema or statement failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
