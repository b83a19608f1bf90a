//! Proptest generators for property-based testing.

use proptest::prelude::*;

use scale_core::{Credential, Salt};

/// Generate an identifier: non-empty, no colon, no NUL, no line breaks.
pub fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.@-]{1,32}"
}

/// Generate a secret. Colons are allowed; line breaks are not.
pub fn secret() -> impl Strategy<Value = String> {
    "[ -~]{1,48}"
}

/// Generate a credential record.
pub fn credential() -> impl Strategy<Value = Credential> {
    (identifier(), secret()).prop_map(|(identifier, secret)| Credential::new(identifier, secret))
}

/// Generate a salt.
pub fn salt() -> impl Strategy<Value = Salt> {
    any::<u64>().prop_map(Salt::from_u64)
}

/// Generate a vector whose sum of squares stays below the saturation bound.
pub fn small_vector(max_len: usize) -> impl Strategy<Value = Vec<i16>> {
    prop::collection::vec(-40i16..=40, 0..=max_len.min(20))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scale_core::{sum_of_squares, DigestToken, RESULT_MAX};

    proptest! {
        #[test]
        fn credential_lines_parse_back(cred in credential()) {
            let line = format!("{}:{}", cred.identifier(), cred.secret());
            let parsed = Credential::parse_line(&line).unwrap();
            prop_assert_eq!(parsed.identifier(), cred.identifier());
            prop_assert_eq!(parsed.secret(), cred.secret());
        }

        #[test]
        fn small_vectors_do_not_saturate(v in small_vector(64)) {
            let exact: i64 = v.iter().map(|&x| i64::from(x) * i64::from(x)).sum();
            prop_assert!(exact <= i64::from(RESULT_MAX));
            prop_assert_eq!(i64::from(sum_of_squares(&v)), exact);
        }

        #[test]
        fn digest_depends_on_salt(a in salt(), b in salt(), s in secret()) {
            prop_assume!(a != b);
            prop_assert_ne!(DigestToken::compute(&a, &s), DigestToken::compute(&b, &s));
        }
    }
}
