//! File-backed collaborators: the credential file loader and the journal.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use chrono::Local;
use tokio::sync::mpsc;

use crate::error::{Result, StoreError};
use crate::memory::MemoryCredentials;
use crate::traits::{format_event, EventSink, Severity};

/// Where the journal goes when the configured path cannot be opened.
pub const FALLBACK_LOG_PATH: &str = "./server_fallback.log";

/// Read and parse a credential file.
///
/// See [`MemoryCredentials::parse`] for the line rules.
pub fn load_credentials(path: impl AsRef<Path>) -> Result<MemoryCredentials> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| StoreError::CredentialFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(MemoryCredentials::parse(&text))
}

/// Append-only journal file shared by all sessions.
///
/// Recording only queues the formatted line; a single writer thread owns
/// the file and appends lines in the order they were queued, so sessions
/// never block on disk and lines never interleave. Dropping the journal
/// waits for the queue to drain. Every event is also mirrored to `tracing`.
#[derive(Debug)]
pub struct FileJournal {
    path: PathBuf,
    lines: Option<mpsc::UnboundedSender<String>>,
    writer: Option<JoinHandle<()>>,
}

impl FileJournal {
    /// Open `path` for appending, falling back to [`FALLBACK_LOG_PATH`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_fallback(path, FALLBACK_LOG_PATH)
    }

    /// Open `path` for appending, falling back to `fallback`.
    pub fn open_with_fallback(path: impl AsRef<Path>, fallback: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match Self::open_exact(path) {
            Ok(journal) => Ok(journal),
            Err(err) => {
                let fallback = fallback.as_ref();
                tracing::warn!(
                    "cannot open log file {}: {}; trying fallback {}",
                    path.display(),
                    err,
                    fallback.display()
                );
                Self::open_exact(fallback).map_err(|source| StoreError::JournalUnavailable {
                    path: path.to_path_buf(),
                    fallback: fallback.to_path_buf(),
                    source,
                })
            }
        }
    }

    fn open_exact(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (lines, queue) = mpsc::unbounded_channel();
        let writer_path = path.to_path_buf();
        let writer = std::thread::Builder::new()
            .name("scale-journal".into())
            .spawn(move || write_lines(file, &writer_path, queue))?;

        Ok(Self {
            path: path.to_path_buf(),
            lines: Some(lines),
            writer: Some(writer),
        })
    }

    /// The path actually being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for FileJournal {
    fn record(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Critical => tracing::error!("{}", message),
            Severity::NonCritical => tracing::info!("{}", message),
        }

        let line = format_event(&Local::now(), severity, message);
        let queued = self
            .lines
            .as_ref()
            .is_some_and(|lines| lines.send(line).is_ok());
        if !queued {
            tracing::warn!("journal writer for {} is gone", self.path.display());
        }
    }
}

impl Drop for FileJournal {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain and exit.
        self.lines.take();
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                tracing::warn!("journal writer for {} panicked", self.path.display());
            }
        }
    }
}

fn write_lines(mut file: File, path: &Path, mut queue: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = queue.blocking_recv() {
        if let Err(e) = writeln!(file, "{}", line).and_then(|_| file.flush()) {
            tracing::warn!("failed to write journal {}: {}", path.display(), e);
        }
    }
}
