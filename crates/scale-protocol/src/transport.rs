//! Transport abstraction for the protocol engine.
//!
//! The handshake and the vector exchange only need three receive/send
//! disciplines, so that is all a transport has to provide:
//!
//! - `recv_token`: one underlying read of at most `max_len` bytes
//! - `recv_exact`: accumulate partial reads until exactly `len` bytes arrived
//! - `send`: write the whole buffer or fail
//!
//! [`StreamTransport`] implements them over any tokio byte stream, which is a
//! `TcpStream` in production and an in-memory duplex pipe in tests.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{ProtocolError, Result};

/// Byte transport for a single connection.
///
/// Implementations must be `Send` so sessions can run on any worker thread.
#[async_trait]
pub trait Transport: Send {
    /// Receive whatever one underlying read returns, up to `max_len` bytes.
    ///
    /// Returns `PeerClosed` if the read returns zero bytes.
    async fn recv_token(&mut self, max_len: usize) -> Result<Bytes>;

    /// Receive exactly `len` bytes, accumulating partial reads.
    ///
    /// Returns `PeerClosed` if the stream ends first. `len == 0` returns an
    /// empty buffer without touching the stream.
    async fn recv_exact(&mut self, len: usize) -> Result<Bytes>;

    /// Send all of `data`.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Shut down the write side. Errors are not interesting at this point.
    async fn close(&mut self);

    /// Human-readable peer address for the journal.
    fn peer(&self) -> &str;
}

/// [`Transport`] over any tokio byte stream.
#[derive(Debug)]
pub struct StreamTransport<S> {
    stream: S,
    peer: String,
    io_timeout: Option<Duration>,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a stream. No deadline is applied until [`with_timeout`](Self::with_timeout).
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            io_timeout: None,
        }
    }

    /// Apply a deadline to every read and write. `None` blocks indefinitely.
    pub fn with_timeout(mut self, io_timeout: Option<Duration>) -> Self {
        self.io_timeout = io_timeout;
        self
    }
}

impl StreamTransport<TcpStream> {
    /// Wrap an accepted TCP connection, labelling it with the peer address.
    pub fn from_tcp(stream: TcpStream) -> Self {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".into());
        Self::new(stream, peer)
    }
}

/// Run `op` under an optional deadline.
async fn with_deadline<T, F>(io_timeout: Option<Duration>, op: F) -> Result<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    match io_timeout {
        Some(limit) => match tokio::time::timeout(limit, op).await {
            Ok(result) => result.map_err(ProtocolError::from),
            Err(_) => Err(ProtocolError::Timeout(limit)),
        },
        None => op.await.map_err(ProtocolError::from),
    }
}

fn eof_as_closed(err: ProtocolError) -> ProtocolError {
    match err {
        ProtocolError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            ProtocolError::PeerClosed
        }
        other => other,
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn recv_token(&mut self, max_len: usize) -> Result<Bytes> {
        let mut buf = vec![0u8; max_len.max(1)];
        let n = with_deadline(self.io_timeout, self.stream.read(&mut buf)).await?;
        if n == 0 {
            return Err(ProtocolError::PeerClosed);
        }
        buf.truncate(n);
        Ok(Bytes::from(buf))
    }

    async fn recv_exact(&mut self, len: usize) -> Result<Bytes> {
        if len == 0 {
            return Ok(Bytes::new());
        }
        let mut buf = vec![0u8; len];
        with_deadline(self.io_timeout, self.stream.read_exact(&mut buf))
            .await
            .map_err(eof_as_closed)?;
        Ok(Bytes::from(buf))
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = &mut self.stream;
        with_deadline(self.io_timeout, async move {
            stream.write_all(data).await?;
            stream.flush().await?;
            Ok::<_, std::io::Error>(())
        })
        .await
    }

    async fn close(&mut self) {
        if let Err(e) = with_deadline(self.io_timeout, self.stream.shutdown()).await {
            tracing::debug!("shutdown of {} failed: {}", self.peer, e);
        }
    }

    fn peer(&self) -> &str {
        &self.peer
    }
}

/// In-memory transport for tests.
///
/// Uses a tokio duplex pipe: the server side gets a [`StreamTransport`],
/// the test drives the raw client end.
pub mod memory {
    use super::StreamTransport;
    use tokio::io::DuplexStream;

    /// Capacity of each direction of the pipe.
    pub const PIPE_CAPACITY: usize = 64 * 1024;

    /// Create a connected `(server, client)` pair.
    pub fn pair() -> (StreamTransport<DuplexStream>, DuplexStream) {
        let (server, client) = tokio::io::duplex(PIPE_CAPACITY);
        (StreamTransport::new(server, "memory"), client)
    }
}
