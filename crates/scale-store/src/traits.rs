//! Collaborator traits: credential lookup and event recording.
//!
//! Both are shared by every session, so implementations must be
//! `Send + Sync`. Credential stores are immutable after construction and
//! need no locking; event sinks serialize concurrent writers internally.

use std::fmt;

use chrono::{DateTime, Local};

/// Severity of a journal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Setup failures that keep the service from serving.
    Critical,
    /// Everything else, including rejected peers and dropped sessions.
    NonCritical,
}

impl Severity {
    /// The label written to the journal.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::NonCritical => "NON-CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only mapping from identifier to secret.
pub trait CredentialStore: Send + Sync {
    /// Look up the secret for `identifier`.
    fn lookup(&self, identifier: &str) -> Option<&str>;

    /// Number of loaded credentials.
    fn len(&self) -> usize;

    /// Whether the store holds no credentials.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append-only sink for human-readable events.
///
/// `record` never fails from the caller's point of view: a sink that cannot
/// write reports the problem through `tracing` and drops the event.
pub trait EventSink: Send + Sync {
    /// Record one event.
    fn record(&self, severity: Severity, message: &str);

    /// Record a critical event.
    fn critical(&self, message: &str) {
        self.record(Severity::Critical, message);
    }

    /// Record a non-critical event.
    fn non_critical(&self, message: &str) {
        self.record(Severity::NonCritical, message);
    }
}

/// Format one journal line: `YYYY-MM-DD HH:MM:SS | SEVERITY | message`.
pub fn format_event(at: &DateTime<Local>, severity: Severity, message: &str) -> String {
    format!(
        "{} | {} | {}",
        at.format("%Y-%m-%d %H:%M:%S"),
        severity.as_str(),
        message
    )
}
