//! # Scale Protocol
//!
//! Per-connection protocol engine for the scale service.
//!
//! ## Overview
//!
//! A connection first runs a challenge-response handshake. The peer names
//! an identifier, receives a fresh salt, and answers with
//! `SHA224(salt_hex || secret)`. Only an authenticated peer reaches the
//! vector exchange, where each length-prefixed vector of `i16` elements is
//! answered with its saturated sum of squares.
//!
//! Nothing here touches a listening socket: sessions run over any
//! [`Transport`], so the whole flow is testable over in-memory pipes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scale_protocol::{ConnectionSession, ProtocolConfig, StreamTransport};
//! use scale_store::{MemoryCredentials, MemoryJournal};
//!
//! async fn example(stream: tokio::net::TcpStream) {
//!     let users = Arc::new(MemoryCredentials::parse("alice:wonderland\n"));
//!     let journal = Arc::new(MemoryJournal::new());
//!     let session = ConnectionSession::new(users, journal, ProtocolConfig::default());
//!
//!     let mut transport = StreamTransport::from_tcp(stream)
//!         .with_timeout(session.config().io_timeout);
//!     let report = session.serve(&mut transport).await;
//!     println!("authenticated: {}", report.authenticated());
//! }
//! ```
//!
//! ## Message Flow
//!
//! ```text
//! Client                                Server
//!   |-------- identifier -------------->|
//!   |<------- salt (16 hex) ------------|
//!   |-------- digest (56 hex) --------->|
//!   |<------- OK -----------------------|
//!   |-------- N (u32) ----------------->|
//!   |-------- L1 (u32), L1 x i16 ------>|
//!   |<------- result (i16) -------------|
//!   |            ... N times ...        |
//! ```

pub mod error;
pub mod exchange;
pub mod handshake;
pub mod session;
pub mod transport;

pub use error::{ProtocolError, Result};
pub use exchange::{ExchangeReport, VectorExchange};
pub use handshake::{trim_token, AuthenticationHandshake, HandshakeOutcome, RejectReason};
pub use session::{ConnectionSession, ProtocolConfig, SessionReport};
pub use transport::{memory, StreamTransport, Transport};
