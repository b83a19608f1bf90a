//! Cryptographic primitives for the challenge-response handshake.
//!
//! The server hands out a fresh [`Salt`] per attempt; the peer proves it
//! knows the secret by returning `SHA-224(salt_hex || secret)` as
//! uppercase hex, which the server checks against its own [`DigestToken`].

use rand::Rng;
use sha2::{Digest, Sha224};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::error::{CoreError, Result};
use crate::wire::{DIGEST_HEX_LEN, SALT_HEX_LEN};

/// A 64-bit challenge value.
///
/// Rendered on the wire as exactly 16 uppercase hex characters (zero-padded,
/// most significant nibble first). Consumed by a single verification.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Salt(u64);

impl Salt {
    /// Draw a new salt from the thread-local CSPRNG.
    pub fn generate() -> Self {
        Self(rand::thread_rng().gen())
    }

    /// Create from a known value.
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Render as 16 uppercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0.to_be_bytes())
    }

    /// The exact bytes sent to the peer.
    pub fn to_wire(&self) -> [u8; SALT_HEX_LEN] {
        let mut out = [0u8; SALT_HEX_LEN];
        out.copy_from_slice(self.to_hex().as_bytes());
        out
    }

    /// Parse the 16-character wire form (either case).
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != SALT_HEX_LEN {
            return Err(CoreError::InvalidLength {
                expected: SALT_HEX_LEN,
                got: s.len(),
            });
        }
        let mut arr = [0u8; 8];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(u64::from_be_bytes(arr)))
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({})", self.to_hex())
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A 28-byte SHA-224 digest of `salt_hex || secret`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigestToken(pub [u8; 28]);

impl DigestToken {
    /// Compute the token a peer holding `secret` must answer `salt` with.
    pub fn compute(salt: &Salt, secret: &str) -> Self {
        let mut hasher = Sha224::new();
        hasher.update(salt.to_hex().as_bytes());
        hasher.update(secret.as_bytes());
        Self(hasher.finalize().into())
    }

    /// SHA-224 of arbitrary bytes.
    pub fn hash(data: &[u8]) -> Self {
        Self(Sha224::digest(data).into())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 28] {
        &self.0
    }

    /// Render as 56 uppercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Parse from hex (either case).
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(CoreError::InvalidLength {
                expected: DIGEST_HEX_LEN,
                got: s.len(),
            });
        }
        let mut arr = [0u8; 28];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }

    /// Check a token received from the peer against this one.
    ///
    /// The received bytes are ASCII-uppercased before comparison, so the
    /// peer may answer in either case. The comparison runs in constant time
    /// for inputs of equal length; any other length never matches.
    pub fn matches(&self, received: &[u8]) -> bool {
        let received = received.to_ascii_uppercase();
        let expected = self.to_hex();
        expected.as_bytes().ct_eq(received.as_slice()).into()
    }
}

impl fmt::Debug for DigestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA224({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for DigestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for DigestToken {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
