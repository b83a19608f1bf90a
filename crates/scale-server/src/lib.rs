//! # Scale Server
//!
//! A TCP service that authenticates clients with a salted SHA-224
//! challenge-response and then answers vectors of `i16` with their
//! saturated sum of squares.
//!
//! ## Overview
//!
//! - **Credentials**: `identifier:secret` lines loaded once at startup
//! - **Journal**: every significant event appended to a log file with a
//!   timestamp and a severity
//! - **Sessions**: one tokio task per connection; a failing session never
//!   affects the listener or other sessions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scale_server::{Server, ServerConfig};
//!
//! async fn example() -> scale_server::Result<()> {
//!     let config = ServerConfig {
//!         port: 33333,
//!         credentials_path: "scale.conf".into(),
//!         log_path: "scale.log".into(),
//!         ..ServerConfig::default()
//!     };
//!     let server = Server::start(config).await?;
//!     println!("listening on {}", server.local_addr());
//!     server.run().await
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `scale_server::core` - Salts, digests, wire encoding, sum of squares
//! - `scale_server::store` - Credential store and event journal
//! - `scale_server::protocol` - Transport, handshake, vector exchange, sessions

pub mod config;
pub mod error;
pub mod logging;
pub mod server;

// Re-export component crates
pub use scale_core as core;
pub use scale_protocol as protocol;
pub use scale_store as store;

pub use config::{
    ServerArgs, ServerConfig, DEFAULT_CREDENTIALS_PATH, DEFAULT_LOG_PATH, DEFAULT_PORT,
};
pub use error::{Result, ServerError};
pub use server::Server;

pub use scale_protocol::ProtocolConfig;
