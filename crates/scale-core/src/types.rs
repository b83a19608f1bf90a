//! Strong type definitions for the scale service.

use std::fmt;

/// An identifier and the secret it authenticates with.
///
/// Loaded once before serving starts and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential {
    identifier: String,
    secret: String,
}

impl Credential {
    /// Create a credential.
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Parse one `identifier:secret` line.
    ///
    /// The split happens at the first colon, so a secret may itself contain
    /// colons. Returns `None` when there is no colon or either side is empty.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (identifier, secret) = line.split_once(':')?;
        if identifier.is_empty() || secret.is_empty() {
            return None;
        }
        Some(Self::new(identifier, secret))
    }

    /// The identifier the peer presents.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The shared secret.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Split into `(identifier, secret)`.
    pub fn into_parts(self) -> (String, String) {
        (self.identifier, self.secret)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}
