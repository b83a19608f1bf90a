//! Per-connection session: handshake, then vector exchange, then close.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use scale_core::WireEndian;
use scale_store::{CredentialStore, EventSink};

use crate::exchange::{ExchangeReport, VectorExchange};
use crate::handshake::{AuthenticationHandshake, HandshakeOutcome, RejectReason};
use crate::transport::Transport;

/// Protocol limits and wire settings shared by every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Largest identifier or digest token accepted in one read.
    pub max_token_len: usize,
    /// Largest element count accepted for one vector.
    pub max_vector_len: u32,
    /// Deadline for every read and write. `None` waits forever.
    pub io_timeout: Option<Duration>,
    /// Byte order of counts, lengths, elements and results.
    pub endian: WireEndian,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_token_len: 255,
            max_vector_len: 1 << 24,
            io_timeout: Some(Duration::from_secs(60)),
            endian: WireEndian::Little,
        }
    }
}

/// What happened on one connection.
#[derive(Debug)]
pub struct SessionReport {
    /// Peer address label.
    pub peer: String,
    /// Identifier the peer authenticated as.
    pub identifier: Option<String>,
    /// Why the handshake failed, if it did.
    pub rejection: Option<RejectReason>,
    /// Vector phase outcome, present only after authentication.
    pub exchange: Option<ExchangeReport>,
}

impl SessionReport {
    /// Whether the peer authenticated.
    pub fn authenticated(&self) -> bool {
        self.identifier.is_some()
    }
}

/// Serves connections against shared collaborators.
///
/// Cloning is cheap; the server hands one clone to every connection task.
#[derive(Clone)]
pub struct ConnectionSession {
    credentials: Arc<dyn CredentialStore>,
    journal: Arc<dyn EventSink>,
    config: ProtocolConfig,
}

impl ConnectionSession {
    /// Create a session factory.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        journal: Arc<dyn EventSink>,
        config: ProtocolConfig,
    ) -> Self {
        Self {
            credentials,
            journal,
            config,
        }
    }

    /// Protocol settings in use.
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Serve one connection to completion and close it.
    pub async fn serve<T: Transport + ?Sized>(&self, transport: &mut T) -> SessionReport {
        let peer = transport.peer().to_string();
        self.journal
            .non_critical(&format!("New client connection established: {}", peer));

        let mut report = SessionReport {
            peer,
            identifier: None,
            rejection: None,
            exchange: None,
        };

        let handshake = AuthenticationHandshake::new(
            self.credentials.as_ref(),
            self.journal.as_ref(),
            &self.config,
        );
        match handshake.run(transport).await {
            HandshakeOutcome::Accepted(identifier) => {
                self.journal.non_critical("Client authenticated successfully");
                report.identifier = Some(identifier);

                let exchange = VectorExchange::new(self.journal.as_ref(), &self.config);
                report.exchange = Some(exchange.run(transport).await);
            }
            HandshakeOutcome::Rejected(reason) => {
                self.journal
                    .non_critical("Authentication failed, closing connection");
                report.rejection = Some(reason);
            }
        }

        transport.close().await;
        self.journal.non_critical("Client connection closed");
        tracing::debug!("session with {} finished: {:?}", report.peer, report.identifier);
        report
    }
}

impl std::fmt::Debug for ConnectionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSession")
            .field("users", &self.credentials.len())
            .field("config", &self.config)
            .finish()
    }
}
