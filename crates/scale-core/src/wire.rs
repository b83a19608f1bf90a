//! Wire tokens, field sizes and byte order.
//!
//! The handshake exchanges bare ASCII tokens with no framing. The vector
//! phase exchanges fixed-width integers:
//!
//! ```text
//! client -> server   u32 N
//! per vector:
//!   client -> server u32 L
//!   client -> server L x i16
//!   server -> client i16 result
//! ```
//!
//! No byte-order conversion is part of the protocol itself: both sides are
//! expected to agree. [`WireEndian`] names the order the server assumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Sent after a matching digest.
pub const TOKEN_OK: &[u8] = b"OK";

/// Sent on an unknown identifier or a digest mismatch.
pub const TOKEN_ERR: &[u8] = b"ERR";

/// Length of the salt as sent on the wire (hex characters).
pub const SALT_HEX_LEN: usize = 16;

/// Length of a digest token in hex characters.
pub const DIGEST_HEX_LEN: usize = 56;

/// Size of the vector count and element count fields.
pub const COUNT_LEN: usize = 4;

/// Size of one vector element.
pub const ELEMENT_LEN: usize = 2;

/// Size of one result.
pub const RESULT_LEN: usize = 2;

/// Byte order of every integer in the vector phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireEndian {
    /// Little-endian, what x86 and ARM clients emit natively.
    #[default]
    Little,
    /// Big-endian.
    Big,
    /// Whatever this host uses.
    Native,
}

impl WireEndian {
    /// Decode a count field.
    pub fn decode_u32(self, bytes: [u8; COUNT_LEN]) -> u32 {
        match self {
            WireEndian::Little => u32::from_le_bytes(bytes),
            WireEndian::Big => u32::from_be_bytes(bytes),
            WireEndian::Native => u32::from_ne_bytes(bytes),
        }
    }

    /// Encode a count field.
    pub fn encode_u32(self, value: u32) -> [u8; COUNT_LEN] {
        match self {
            WireEndian::Little => value.to_le_bytes(),
            WireEndian::Big => value.to_be_bytes(),
            WireEndian::Native => value.to_ne_bytes(),
        }
    }

    /// Decode a single element or result.
    pub fn decode_i16(self, bytes: [u8; ELEMENT_LEN]) -> i16 {
        match self {
            WireEndian::Little => i16::from_le_bytes(bytes),
            WireEndian::Big => i16::from_be_bytes(bytes),
            WireEndian::Native => i16::from_ne_bytes(bytes),
        }
    }

    /// Encode a single element or result.
    pub fn encode_i16(self, value: i16) -> [u8; ELEMENT_LEN] {
        match self {
            WireEndian::Little => value.to_le_bytes(),
            WireEndian::Big => value.to_be_bytes(),
            WireEndian::Native => value.to_ne_bytes(),
        }
    }

    /// Decode a packed run of elements.
    pub fn decode_elements(self, bytes: &[u8]) -> Result<Vec<i16>> {
        if bytes.len() % ELEMENT_LEN != 0 {
            return Err(CoreError::OddElementData(bytes.len()));
        }
        Ok(bytes
            .chunks_exact(ELEMENT_LEN)
            .map(|pair| self.decode_i16([pair[0], pair[1]]))
            .collect())
    }

    /// Encode elements into a packed run.
    pub fn encode_elements(self, values: &[i16]) -> Vec<u8> {
        let mut out = Vec::with_capacity(values.len() * ELEMENT_LEN);
        for &value in values {
            out.extend_from_slice(&self.encode_i16(value));
        }
        out
    }
}

impl fmt::Display for WireEndian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireEndian::Little => "little",
            WireEndian::Big => "big",
            WireEndian::Native => "native",
        };
        f.write_str(name)
    }
}

impl FromStr for WireEndian {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(WireEndian::Little),
            "big" | "be" => Ok(WireEndian::Big),
            "native" | "ne" => Ok(WireEndian::Native),
            other => Err(CoreError::UnknownEndian(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_count() {
        assert_eq!(WireEndian::Little.decode_u32([4, 0, 0, 0]), 4);
        assert_eq!(WireEndian::Big.decode_u32([0, 0, 0, 4]), 4);
    }

    #[test]
    fn test_result_encoding() {
        assert_eq!(WireEndian::Little.encode_i16(30), [30, 0]);
        assert_eq!(WireEndian::Big.encode_i16(30), [0, 30]);
        assert_eq!(WireEndian::Little.encode_i16(-2), [0xFE, 0xFF]);
    }

    #[test]
    fn test_elements() {
        let bytes = WireEndian::Little.encode_elements(&[1, -1, 300]);
        assert_eq!(bytes, vec![1, 0, 0xFF, 0xFF, 0x2C, 0x01]);
        assert_eq!(
            WireEndian::Little.decode_elements(&bytes).unwrap(),
            vec![1, -1, 300]
        );
        assert_eq!(
            WireEndian::Little.decode_elements(&[1, 2, 3]),
            Err(CoreError::OddElementData(3))
        );
        assert!(WireEndian::Big.decode_elements(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_native_matches_host() {
        let native = WireEndian::Native.encode_u32(0x0102_0304);
        assert_eq!(native, 0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("little".parse::<WireEndian>().unwrap(), WireEndian::Little);
        assert_eq!("BE".parse::<WireEndian>().unwrap(), WireEndian::Big);
        assert_eq!(WireEndian::Native.to_string(), "native");
        assert!("middle".parse::<WireEndian>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&WireEndian::Big).unwrap();
        assert_eq!(json, "\"big\"");
        let parsed: WireEndian = serde_json::from_str("\"little\"").unwrap();
        assert_eq!(parsed, WireEndian::Little);
    }
}
