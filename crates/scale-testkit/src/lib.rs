//! # Scale Testkit
//!
//! Testing utilities for the scale service.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known salt/secret/digest triples and sum-of-squares cases
//! - **Generators**: Proptest strategies for identifiers, secrets, salts and vectors
//! - **Fixtures**: Credential stores, credential files and a protocol client
//!
//! ## Golden Vectors
//!
//! ```rust
//! use scale_testkit::vectors::{all_digest_vectors, verify_all_digest_vectors};
//!
//! assert!(!all_digest_vectors().is_empty());
//! verify_all_digest_vectors().unwrap();
//! ```
//!
//! ## Protocol Client
//!
//! Drive a running server the way a real client would:
//!
//! ```rust,no_run
//! use scale_testkit::fixtures::ProtocolClient;
//!
//! async fn example(addr: std::net::SocketAddr) -> std::io::Result<()> {
//!     let mut client = ProtocolClient::connect(addr).await?;
//!     assert!(client.authenticate("alice", "wonderland").await?);
//!     let results = client.submit(&[vec![1, 2, 3, 4]]).await?;
//!     assert_eq!(results, vec![30]);
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{credential_file, test_credentials, ProtocolClient, TEST_USERS};
pub use vectors::{
    all_digest_vectors, all_sum_vectors, verify_all_digest_vectors, DigestVector, SumVector,
};
