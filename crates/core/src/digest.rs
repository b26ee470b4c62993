//! One-way digest of refresh tokens.
//!
//! Only the SHA-512 hex digest of a refresh token is stored on its session, so
//! a leaked database snapshot cannot be replayed as a refresh credential.

use sha2::{Digest, Sha512};

/// Compute the SHA-512 hex digest (128 chars) of a refresh token.
pub fn hash_refresh_token(token: &str) -> String {
    let hash = Sha512::digest(token.as_bytes());
    format!("{hash:x}")
}

/// Compare a presented refresh token against a stored digest.
///
/// The comparison runs over the full length of both digests regardless of
/// where they first differ.
pub fn refresh_token_matches(token: &str, stored_hash: &str) -> bool {
    let computed = hash_refresh_token(token);
    let (a, b) = (computed.as_bytes(), stored_hash.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        assert_eq!(
            hash_refresh_token(""),
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce\
             47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"
        );
    }

    #[test]
    fn digest_is_stable_and_hex_encoded() {
        let hash = hash_refresh_token("some.refresh.token");
        assert_eq!(hash, hash_refresh_token("some.refresh.token"));
        assert_eq!(hash.len(), 128);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn matching_token_is_accepted() {
        let stored = hash_refresh_token("token-one");
        assert!(refresh_token_matches("token-one", &stored));
    }

    #[test]
    fn different_token_is_rejected() {
        let stored = hash_refresh_token("token-one");
        assert!(!refresh_token_matches("token-two", &stored));
        assert!(!refresh_token_matches("token-one", ""));
        assert!(!refresh_token_matches("token-one", &stored[..64]));
    }
}
