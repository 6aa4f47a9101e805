//! Fast-path credential fingerprint.
//!
//! SHA-256 of the raw password rendered as lowercase hex. Only used by the
//! credential cache to recognise the password of the last successful
//! verification; never used to authenticate against the durable store.
use sha2::{Digest, Sha256};

/// Length of a rendered digest in hex characters
pub const DIGEST_HEX_LEN: usize = 64;

/// Fingerprint a raw password
pub fn credential_digest(raw_password: &str) -> String {
    hex::encode(Sha256::digest(raw_password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_known_vector() {
        assert_eq!(
            credential_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_digest_is_deterministic_and_distinct() {
        let passwords = ["Password1!", "Password2!", "password1!", "Changed9#", ""];
        for p in passwords {
            assert_eq!(credential_digest(p), credential_digest(p));
            assert_eq!(credential_digest(p).len(), DIGEST_HEX_LEN);
        }

        let mut digests: Vec<String> = passwords.iter().map(|p| credential_digest(p)).collect();
        digests.sort();
        digests.dedup();
        assert_eq!(digests.len(), passwords.len());
    }

    #[test]
    fn test_digest_is_not_the_password() {
        let digest = credential_digest("Password1!");
        assert_ne!(digest, "Password1!");
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
