use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the remote recipe service. Every variant carries the
/// request URL; `Status` additionally carries the HTTP status code.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Failures in the local store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("recipe {id} not found")]
    NotFound { id: i64 },

    #[error("failed to open database {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("database connection poisoned")]
    Lock,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid recipe document: {0}")]
    Data(#[from] serde_json::Error),
}

/// What a sync run can fail with: either side of the pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
