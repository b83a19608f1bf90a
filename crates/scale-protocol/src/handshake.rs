//! Challenge-response authentication.
//!
//! ```text
//! Client                                Server
//!   |-------- identifier -------------->|
//!   |<------- ERR ----------------------|  unknown identifier, done
//!   |<------- salt (16 hex) ------------|  known identifier
//!   |-------- SHA224(salt||secret) ---->|
//!   |<------- ERR ----------------------|  mismatch, done
//!   |<------- OK -----------------------|  match, vector phase follows
//! ```
//!
//! Identifier and digest have no length prefix: each is whatever a single
//! read returns, bounded by `max_token_len`. A peer that fragments either
//! token across several writes will be rejected.

use scale_core::{DigestToken, Salt, TOKEN_ERR, TOKEN_OK};
use scale_store::{CredentialStore, EventSink};

use crate::error::ProtocolError;
use crate::session::ProtocolConfig;
use crate::transport::Transport;

/// Why a handshake ended without authenticating the peer.
#[derive(Debug)]
pub enum RejectReason {
    /// Nothing arrived where the identifier was expected.
    NoIdentifier(ProtocolError),
    /// The identifier is not in the credential store.
    UnknownIdentifier(String),
    /// The salt could not be sent.
    SaltNotSent(ProtocolError),
    /// Nothing arrived where the digest was expected.
    NoDigest(ProtocolError),
    /// The digest did not match.
    DigestMismatch(String),
    /// The digest matched but `OK` could not be sent.
    AcceptNotSent(ProtocolError),
}

/// Result of a handshake.
#[derive(Debug)]
pub enum HandshakeOutcome {
    /// The peer proved knowledge of the secret for this identifier.
    Accepted(String),
    /// The connection must be closed.
    Rejected(RejectReason),
}

impl HandshakeOutcome {
    /// Whether the peer was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, HandshakeOutcome::Accepted(_))
    }
}

/// Cut a received token at its first NUL byte.
///
/// Peers written against C APIs may send the terminator along with the
/// token; everything from it on is ignored.
pub fn trim_token(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Runs the handshake for one connection.
pub struct AuthenticationHandshake<'a> {
    credentials: &'a dyn CredentialStore,
    journal: &'a dyn EventSink,
    max_token_len: usize,
}

impl<'a> AuthenticationHandshake<'a> {
    /// Create a handshake over the shared collaborators.
    pub fn new(
        credentials: &'a dyn CredentialStore,
        journal: &'a dyn EventSink,
        config: &ProtocolConfig,
    ) -> Self {
        Self {
            credentials,
            journal,
            max_token_len: config.max_token_len,
        }
    }

    /// Run the handshake to completion.
    ///
    /// Never fails: every transport problem becomes a [`RejectReason`] and
    /// is recorded in the journal.
    pub async fn run<T: Transport + ?Sized>(&self, transport: &mut T) -> HandshakeOutcome {
        // Phase 1: identification
        let raw = match transport.recv_token(self.max_token_len).await {
            Ok(raw) => raw,
            Err(e) => {
                self.journal
                    .non_critical("No data received from client for login");
                return HandshakeOutcome::Rejected(RejectReason::NoIdentifier(e));
            }
        };
        let identifier = String::from_utf8_lossy(trim_token(&raw)).into_owned();

        let Some(secret) = self.credentials.lookup(&identifier) else {
            if let Err(e) = transport.send(TOKEN_ERR).await {
                tracing::debug!("failed to send ERR to {}: {}", transport.peer(), e);
            }
            self.journal
                .non_critical(&format!("Identification failed for login: {}", identifier));
            return HandshakeOutcome::Rejected(RejectReason::UnknownIdentifier(identifier));
        };

        // Phase 2: challenge
        let salt = Salt::generate();
        if let Err(e) = transport.send(&salt.to_wire()).await {
            self.journal.non_critical("Failed to send salt to client");
            return HandshakeOutcome::Rejected(RejectReason::SaltNotSent(e));
        }
        tracing::debug!("sent salt {} to {}", salt, transport.peer());

        // Phase 3: response
        let received = match transport.recv_token(self.max_token_len).await {
            Ok(received) => received,
            Err(e) => {
                self.journal.non_critical("No hash received from client");
                return HandshakeOutcome::Rejected(RejectReason::NoDigest(e));
            }
        };

        // Phase 4: verification
        let expected = DigestToken::compute(&salt, secret);
        if !expected.matches(trim_token(&received)) {
            if let Err(e) = transport.send(TOKEN_ERR).await {
                tracing::debug!("failed to send ERR to {}: {}", transport.peer(), e);
            }
            self.journal
                .non_critical(&format!("Authentication failed for login: {}", identifier));
            return HandshakeOutcome::Rejected(RejectReason::DigestMismatch(identifier));
        }

        if let Err(e) = transport.send(TOKEN_OK).await {
            self.journal.non_critical("Failed to send OK to client");
            return HandshakeOutcome::Rejected(RejectReason::AcceptNotSent(e));
        }
        self.journal
            .non_critical(&format!("Authentication successful for login: {}", identifier));
        HandshakeOutcome::Accepted(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory;
    use scale_core::SALT_HEX_LEN;
    use scale_store::{MemoryCredentials, MemoryJournal};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn credentials() -> MemoryCredentials {
        [("alice", "wonderland"), ("bob", "builder")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_trim_token() {
        assert_eq!(trim_token(b"alice\0junk"), b"alice");
        assert_eq!(trim_token(b"alice"), b"alice");
        assert_eq!(trim_token(b"\0"), b"");
        assert_eq!(trim_token(b"alice\n"), b"alice\n");
    }

    #[tokio::test]
    async fn test_unknown_identifier_gets_err_only() {
        let creds = credentials();
        let journal = MemoryJournal::new();
        let config = ProtocolConfig::default();
        let (mut server, mut client) = memory::pair();

        client.write_all(b"mallory").await.unwrap();
        let outcome = AuthenticationHandshake::new(&creds, &journal, &config)
            .run(&mut server)
            .await;
        drop(server);

        assert!(matches!(
            outcome,
            HandshakeOutcome::Rejected(RejectReason::UnknownIdentifier(ref id)) if id == "mallory"
        ));

        let mut received = Vec::new();
        client.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"ERR");
        assert!(journal.contains("Identification failed for login: mallory"));
    }

    #[tokio::test]
    async fn test_correct_digest_is_accepted() {
        let creds = credentials();
        let journal = MemoryJournal::new();
        let config = ProtocolConfig::default();
        let (mut server, mut client) = memory::pair();

        let peer = tokio::spawn(async move {
            client.write_all(b"alice").await.unwrap();
            let mut salt = [0u8; SALT_HEX_LEN];
            client.read_exact(&mut salt).await.unwrap();
            let salt = Salt::from_hex(std::str::from_utf8(&salt).unwrap()).unwrap();

            let digest = DigestToken::compute(&salt, "wonderland");
            client.write_all(digest.to_hex().as_bytes()).await.unwrap();

            let mut reply = [0u8; 2];
            client.read_exact(&mut reply).await.unwrap();
            reply
        });

        let outcome = AuthenticationHandshake::new(&creds, &journal, &config)
            .run(&mut server)
            .await;

        assert!(matches!(outcome, HandshakeOutcome::Accepted(ref id) if id == "alice"));
        assert_eq!(&peer.await.unwrap(), b"OK");
        assert!(journal.contains("Authentication successful for login: alice"));
    }

    #[tokio::test]
    async fn test_lowercase_digest_is_accepted() {
        let creds = credentials();
        let journal = MemoryJournal::new();
        let config = ProtocolConfig::default();
        let (mut server, mut client) = memory::pair();

        let peer = tokio::spawn(async move {
            client.write_all(b"bob").await.unwrap();
            let mut salt = [0u8; SALT_HEX_LEN];
            client.read_exact(&mut salt).await.unwrap();
            let salt = Salt::from_hex(std::str::from_utf8(&salt).unwrap()).unwrap();

            let digest = DigestToken::compute(&salt, "builder").to_hex().to_lowercase();
            client.write_all(digest.as_bytes()).await.unwrap();

            let mut reply = [0u8; 2];
            client.read_exact(&mut reply).await.unwrap();
            reply
        });

        let outcome = AuthenticationHandshake::new(&creds, &journal, &config)
            .run(&mut server)
            .await;

        assert!(outcome.is_accepted());
        assert_eq!(&peer.await.unwrap(), b"OK");
    }

    #[tokio::test]
    async fn test_wrong_digest_gets_salt_then_err() {
        let creds = credentials();
        let journal = MemoryJournal::new();
        let config = ProtocolConfig::default();
        let (mut server, mut client) = memory::pair();

        let peer = tokio::spawn(async move {
            client.write_all(b"alice").await.unwrap();
            let mut salt = [0u8; SALT_HEX_LEN];
            client.read_exact(&mut salt).await.unwrap();
            let salt = Salt::from_hex(std::str::from_utf8(&salt).unwrap()).unwrap();

            let digest = DigestToken::compute(&salt, "not-the-secret");
            client.write_all(digest.to_hex().as_bytes()).await.unwrap();

            let mut rest = Vec::new();
            client.read_to_end(&mut rest).await.unwrap();
            rest
        });

        let outcome = AuthenticationHandshake::new(&creds, &journal, &config)
            .run(&mut server)
            .await;
        drop(server);

        assert!(matches!(
            outcome,
            HandshakeOutcome::Rejected(RejectReason::DigestMismatch(_))
        ));
        assert_eq!(peer.await.unwrap(), b"ERR");
        assert!(journal.contains("Authentication failed for login: alice"));
    }

    #[tokio::test]
    async fn test_digest_for_stale_salt_is_rejected() {
        let creds = credentials();
        let journal = MemoryJournal::new();
        let config = ProtocolConfig::default();
        let (mut server, mut client) = memory::pair();

        let peer = tokio::spawn(async move {
            client.write_all(b"alice").await.unwrap();
            let mut salt = [0u8; SALT_HEX_LEN];
            client.read_exact(&mut salt).await.unwrap();

            // Replay an answer computed for some other challenge.
            let replayed = DigestToken::compute(&Salt::from_u64(7), "wonderland");
            client.write_all(replayed.to_hex().as_bytes()).await.unwrap();
            client
        });

        let outcome = AuthenticationHandshake::new(&creds, &journal, &config)
            .run(&mut server)
            .await;

        assert!(!outcome.is_accepted());
        peer.await.unwrap();
    }

    #[tokio::test]
    async fn test_silent_peer_is_rejected() {
        let creds = credentials();
        let journal = MemoryJournal::new();
        let config = ProtocolConfig::default();
        let (mut server, client) = memory::pair();
        drop(client);

        let outcome = AuthenticationHandshake::new(&creds, &journal, &config)
            .run(&mut server)
            .await;

        assert!(matches!(
            outcome,
            HandshakeOutcome::Rejected(RejectReason::NoIdentifier(ProtocolError::PeerClosed))
        ));
        assert!(journal.contains("No data received from client for login"));
    }

    #[tokio::test]
    async fn test_salt_send_failure() {
        let creds = credentials();
        let journal = MemoryJournal::new();
        let config = ProtocolConfig::default();
        let (mut server, mut client) = memory::pair();

        client.write_all(b"alice").await.unwrap();
        drop(client);

        let outcome = AuthenticationHandshake::new(&creds, &journal, &config)
            .run(&mut server)
            .await;

        assert!(matches!(
            outcome,
            HandshakeOutcome::Rejected(RejectReason::SaltNotSent(ref e)) if e.is_disconnect()
        ));
        assert_eq!(journal.messages(), vec!["Failed to send salt to client".to_string()]);
    }

    #[tokio::test]
    async fn test_peer_leaves_after_salt() {
        let creds = credentials();
        let journal = MemoryJournal::new();
        let config = ProtocolConfig::default();
        let (mut server, mut client) = memory::pair();

        let peer = tokio::spawn(async move {
            client.write_all(b"alice").await.unwrap();
            let mut salt = [0u8; SALT_HEX_LEN];
            client.read_exact(&mut salt).await.unwrap();
            // Hang up without answering.
        });

        let outcome = AuthenticationHandshake::new(&creds, &journal, &config)
            .run(&mut server)
            .await;
        peer.await.unwrap();

        assert!(matches!(
            outcome,
            HandshakeOutcome::Rejected(RejectReason::NoDigest(_))
        ));
        assert!(journal.contains("No hash received from client"));
    }

    #[tokio::test]
    async fn test_nul_terminated_identifier() {
        let creds = credentials();
        let journal = MemoryJournal::new();
        let config = ProtocolConfig::default();
        let (mut server, mut client) = memory::pair();

        let peer = tokio::spawn(async move {
            client.write_all(b"alice\0").await.unwrap();
            let mut salt = [0u8; SALT_HEX_LEN];
            client.read_exact(&mut salt).await.unwrap();
            let salt = Salt::from_hex(std::str::from_utf8(&salt).unwrap()).unwrap();

            let mut digest = DigestToken::compute(&salt, "wonderland").to_hex().into_bytes();
            digest.push(0);
            client.write_all(&digest).await.unwrap();

            let mut reply = [0u8; 2];
            client.read_exact(&mut reply).await.unwrap();
            reply
        });

        let outcome = AuthenticationHandshake::new(&creds, &journal, &config)
            .run(&mut server)
            .await;

        assert!(outcome.is_accepted());
        assert_eq!(&peer.await.unwrap(), b"OK");
    }
}
