//! The listening server: startup sequence and accept loop.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use scale_protocol::{ConnectionSession, StreamTransport};
use scale_store::{load_credentials, CredentialStore, EventSink, FileJournal, MemoryCredentials};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// A bound server, ready to accept connections.
///
/// Every accepted connection is served on its own tokio task; the
/// credential store and the journal are shared between them.
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    session: ConnectionSession,
    journal: Arc<dyn EventSink>,
}

impl Server {
    /// Open the journal at `config.log_path`, then run the startup sequence.
    pub async fn start(config: ServerConfig) -> Result<Self> {
        let journal = FileJournal::open(&config.log_path)?;
        tracing::info!("journal: {}", journal.path().display());
        Self::start_with_journal(config, Arc::new(journal)).await
    }

    /// Run the startup sequence against an already open journal.
    ///
    /// A missing credential file is recorded as critical but does not stop
    /// startup: the server runs with no users and rejects every identifier.
    /// Failing to bind does stop it.
    pub async fn start_with_journal(
        config: ServerConfig,
        journal: Arc<dyn EventSink>,
    ) -> Result<Self> {
        journal.non_critical("=== Server starting ===");

        let credentials = match load_credentials(&config.credentials_path) {
            Ok(credentials) => credentials,
            Err(e) => {
                tracing::debug!("{}", e);
                journal.critical(&format!(
                    "Cannot open user database file: {}",
                    config.credentials_path.display()
                ));
                MemoryCredentials::new()
            }
        };
        journal.non_critical(&format!("User database loaded, users: {}", credentials.len()));

        let addr = SocketAddr::new(config.bind_addr, config.port);
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(source) => {
                journal.critical(&format!("Cannot bind socket to port {}", config.port));
                return Err(ServerError::Bind { addr, source });
            }
        };
        let local_addr = listener.local_addr()?;
        journal.non_critical(&format!(
            "Server started successfully on port {}",
            local_addr.port()
        ));

        let session = ConnectionSession::new(
            Arc::new(credentials),
            Arc::clone(&journal),
            config.protocol,
        );

        Ok(Self {
            listener,
            local_addr,
            session,
            journal,
        })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections forever.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accept connections until `shutdown` completes.
    ///
    /// Sessions already running are left to finish on their own.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    self.journal.non_critical("Server stopping");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.spawn_session(stream, peer),
                    Err(e) => {
                        tracing::warn!("accept failed: {}", e);
                        self.journal.non_critical("Cannot accept client connection");
                    }
                },
            }
        }
    }

    fn spawn_session(&self, stream: tokio::net::TcpStream, peer: SocketAddr) {
        tracing::debug!("client connected from {}", peer);
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!("set_nodelay for {} failed: {}", peer, e);
        }

        let session = self.session.clone();
        let mut transport =
            StreamTransport::from_tcp(stream).with_timeout(session.config().io_timeout);
        tokio::spawn(async move {
            let report = session.serve(&mut transport).await;
            if let Some(exchange) = &report.exchange {
                tracing::debug!(
                    "{} processed {} vectors",
                    report.peer,
                    exchange.vectors_processed
                );
            }
        });
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("local_addr", &self.local_addr)
            .field("session", &self.session)
            .finish()
    }
}
