// Store error types
// Startup errors (Missing, Corrupt) are fatal; insert errors map to HTTP responses.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file does not exist (persistent mode refuses to start without it)
    #[error("store file '{path}' not found; create it or run with store.mode = \"mock\"")]
    Missing { path: PathBuf },

    /// The store file exists but could not be read or parsed
    #[error("store file '{path}' is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Insert rejected because the id is already present
    #[error("record with id {0} already exists")]
    AlreadyExists(i64),

    /// The in-memory insert succeeded but the flush to disk failed;
    /// the insert has been rolled back
    #[error("failed to persist store to '{path}': {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
