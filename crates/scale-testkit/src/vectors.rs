//! Golden test vectors for deterministic verification.
//!
//! Digests were computed independently as
//! `upper(hex(SHA-224(format!("{:016X}", salt) + secret)))`, so any client
//! implementation can check itself against the same table.

use scale_core::{sum_of_squares, DigestToken, Salt, RESULT_MAX, RESULT_MIN};

/// A golden digest vector.
#[derive(Debug, Clone)]
pub struct DigestVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Salt value.
    pub salt: u64,
    /// Salt as it appears on the wire.
    pub salt_hex: &'static str,
    /// Shared secret.
    pub secret: &'static str,
    /// Expected digest (56 uppercase hex chars).
    pub expected_digest: &'static str,
}

/// A golden sum-of-squares vector.
#[derive(Debug, Clone)]
pub struct SumVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Vector elements.
    pub elements: &'static [i16],
    /// Expected saturated result.
    pub expected: i16,
}

/// Get all golden digest vectors.
pub fn all_digest_vectors() -> Vec<DigestVector> {
    vec![
        DigestVector {
            name: "zero salt",
            salt: 0,
            salt_hex: "0000000000000000",
            secret: "P@ssW0rd",
            expected_digest: "11EF33D18C7DEFB353CDA7BAC040751CBC00893334B674054102763B",
        },
        DigestVector {
            name: "mixed salt",
            salt: 0x0123_4567_89AB_CDEF,
            salt_hex: "0123456789ABCDEF",
            secret: "wonderland",
            expected_digest: "22528C940FB05E7CC7990DE6AF253983BCAD6712997431FD17D1EABC",
        },
        DigestVector {
            name: "max salt, empty secret",
            salt: u64::MAX,
            salt_hex: "FFFFFFFFFFFFFFFF",
            secret: "",
            expected_digest: "A592FE30A9058296D9479274A4D4CDBBA3357DC72678EC29E3BCF372",
        },
        DigestVector {
            name: "secret with colons",
            salt: 0xDEAD_BEEF,
            salt_hex: "00000000DEADBEEF",
            secret: "pass:with:colons",
            expected_digest: "A4571BF607ECA6503A88FB67D4C35866AA7BECB4297AD260E1A8B741",
        },
        DigestVector {
            name: "small salt is zero padded",
            salt: 42,
            salt_hex: "000000000000002A",
            secret: "builder",
            expected_digest: "98FBD21B55A3BF4E066B8A1147221D8A6535868A1047238A662CED86",
        },
    ]
}

/// Get all golden sum-of-squares vectors.
pub fn all_sum_vectors() -> Vec<SumVector> {
    vec![
        SumVector {
            name: "basic",
            elements: &[1, 2, 3, 4],
            expected: 30,
        },
        SumVector {
            name: "empty",
            elements: &[],
            expected: 0,
        },
        SumVector {
            name: "negatives square positive",
            elements: &[-3, -4],
            expected: 25,
        },
        SumVector {
            name: "exactly at bound",
            elements: &[181, 2, 1, 1],
            expected: RESULT_MAX,
        },
        SumVector {
            name: "one over bound",
            elements: &[181, 2, 1, 1, 1],
            expected: RESULT_MAX,
        },
        SumVector {
            name: "single extreme element",
            elements: &[RESULT_MIN],
            expected: RESULT_MAX,
        },
    ]
}

/// Verify every golden vector, returning the name of the first mismatch.
pub fn verify_all_digest_vectors() -> Result<(), String> {
    for vector in all_digest_vectors() {
        let salt = Salt::from_u64(vector.salt);
        if salt.to_hex() != vector.salt_hex {
            return Err(format!("{}: salt renders as {}", vector.name, salt.to_hex()));
        }
        let digest = DigestToken::compute(&salt, vector.secret);
        if digest.to_hex() != vector.expected_digest {
            return Err(format!("{}: digest is {}", vector.name, digest.to_hex()));
        }
    }
    for vector in all_sum_vectors() {
        let got = sum_of_squares(vector.elements);
        if got != vector.expected {
            return Err(format!("{}: sum is {}", vector.name, got));
        }
    }
    Ok(())
}
