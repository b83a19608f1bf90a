//! Error types for the store module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening the credential file or the journal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The credential file could not be read.
    #[error("cannot open user database file {}: {source}", .path.display())]
    CredentialFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither the journal path nor its fallback could be opened.
    #[error("cannot open log file {} or fallback {}: {source}", .path.display(), .fallback.display())]
    JournalUnavailable {
        path: PathBuf,
        fallback: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
