//! # Scale Store
//!
//! The two collaborators every session leans on: the credential store that
//! maps identifiers to secrets, and the event journal that records what
//! happened.
//!
//! ## Key Types
//!
//! - [`CredentialStore`] - Read-only identifier to secret lookup
//! - [`EventSink`] - Append-only `(timestamp, severity, message)` log
//! - [`MemoryCredentials`] - Immutable in-memory credential map
//! - [`FileJournal`] - Line-per-event log file shared by all sessions
//! - [`MemoryJournal`] - In-memory event sink for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scale_store::{load_credentials, CredentialStore, EventSink, FileJournal, Severity};
//!
//! let journal = FileJournal::open("/log/scale.log").unwrap();
//! let users = load_credentials("/scale.conf").unwrap();
//! journal.record(
//!     Severity::NonCritical,
//!     &format!("User database loaded, users: {}", users.len()),
//! );
//! ```
//!
//! ## Credential File Format
//!
//! One `identifier:secret` record per line. Lines without a colon, with an
//! empty identifier or with an empty secret are skipped silently.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::{load_credentials, FileJournal, FALLBACK_LOG_PATH};
pub use memory::{MemoryCredentials, MemoryJournal};
pub use traits::{format_event, CredentialStore, EventSink, Severity};
