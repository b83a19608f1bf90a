//! In-memory implementations of the collaborator traits.
//!
//! [`MemoryCredentials`] is what the server actually serves from: the
//! credential file is parsed once into it and it is never mutated again.
//! [`MemoryJournal`] is primarily for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use scale_core::Credential;

use crate::traits::{CredentialStore, EventSink, Severity};

/// Immutable identifier to secret map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentials {
    users: HashMap<String, String>,
}

impl MemoryCredentials {
    /// Create an empty store. Every identifier is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse credential-file text.
    ///
    /// Each line is trimmed of a trailing `\r` and then parsed with
    /// [`Credential::parse_line`]; malformed lines are dropped. A later
    /// line for the same identifier replaces an earlier one.
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter_map(Credential::parse_line)
            .collect()
    }
}

impl FromIterator<Credential> for MemoryCredentials {
    fn from_iter<I: IntoIterator<Item = Credential>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().map(Credential::into_parts).collect(),
        }
    }
}

impl<I: Into<String>, S: Into<String>> FromIterator<(I, S)> for MemoryCredentials {
    fn from_iter<T: IntoIterator<Item = (I, S)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(identifier, secret)| Credential::new(identifier, secret))
            .collect()
    }
}

impl CredentialStore for MemoryCredentials {
    fn lookup(&self, identifier: &str) -> Option<&str> {
        self.users.get(identifier).map(String::as_str)
    }

    fn len(&self) -> usize {
        self.users.len()
    }
}

/// Event sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    events: Mutex<Vec<(Severity, String)>>,
}

impl MemoryJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, oldest first.
    pub fn events(&self) -> Vec<(Severity, String)> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Snapshot of the recorded messages only.
    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|(_, message)| message).collect()
    }

    /// Whether any recorded message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.events().iter().any(|(_, message)| message.contains(needle))
    }
}

impl EventSink for MemoryJournal {
    fn record(&self, severity: Severity, message: &str) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((severity, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_malformed_lines() {
        let text = "user1:pass1\nuser2pass2\n:pass3\nuser4:\nuser5:pass5\n";
        let store = MemoryCredentials::parse(text);

        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("user1"), Some("pass1"));
        assert_eq!(store.lookup("user5"), Some("pass5"));
        assert_eq!(store.lookup("user2pass2"), None);
        assert_eq!(store.lookup("user4"), None);
    }

    #[test]
    fn test_parse_empty_text() {
        let store = MemoryCredentials::parse("");
        assert!(store.is_empty());
        assert_eq!(store.lookup("anyone"), None);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let store = MemoryCredentials::parse("alice:secret\r\nbob:pw\r\n");
        assert_eq!(store.lookup("alice"), Some("secret"));
        assert_eq!(store.lookup("bob"), Some("pw"));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let store = MemoryCredentials::parse("alice:one\nalice:two\n");
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("alice"), Some("two"));
    }

    #[test]
    fn test_lookup_is_exact() {
        let store: MemoryCredentials = [("alice", "pw")].into_iter().collect();
        assert_eq!(store.lookup("alice"), Some("pw"));
        assert_eq!(store.lookup("Alice"), None);
        assert_eq!(store.lookup("alice\n"), None);
    }

    #[test]
    fn test_memory_journal_records_in_order() {
        let journal = MemoryJournal::new();
        journal.non_critical("first");
        journal.critical("second");

        assert_eq!(
            journal.events(),
            vec![
                (Severity::NonCritical, "first".to_string()),
                (Severity::Critical, "second".to_string()),
            ]
        );
        assert!(journal.contains("sec"));
        assert!(!journal.contains("third"));
    }
}
