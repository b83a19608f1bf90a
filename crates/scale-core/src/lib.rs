//! # Scale Core
//!
//! Pure primitives for the scale service: challenge salts, digest tokens,
//! wire encoding, and the saturating sum-of-squares.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over the values that cross the wire.
//!
//! ## Key Types
//!
//! - [`Salt`] - Per-attempt 64-bit challenge, sent as 16 uppercase hex chars
//! - [`DigestToken`] - SHA-224 over `salt_hex || secret`, 56 uppercase hex chars
//! - [`Credential`] - An identifier/secret pair
//! - [`WireEndian`] - Byte order of counts, elements and results
//!
//! ## Arithmetic
//!
//! [`sum_of_squares`] accumulates in 64-bit and saturates at the bounds of
//! a signed 16-bit result, stopping at the first element that crosses one.

pub mod compute;
pub mod crypto;
pub mod error;
pub mod types;
pub mod wire;

pub use compute::{sum_of_squares, SquareSum, RESULT_MAX, RESULT_MIN};
pub use crypto::{DigestToken, Salt};
pub use error::{CoreError, Result};
pub use types::Credential;
pub use wire::{
    WireEndian, COUNT_LEN, DIGEST_HEX_LEN, ELEMENT_LEN, RESULT_LEN, SALT_HEX_LEN, TOKEN_ERR,
    TOKEN_OK,
};
