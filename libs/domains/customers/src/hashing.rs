//! Credential hashing.
//!
//! Passwords are stored as the lower-case hex SHA-256 digest of their UTF-8
//! bytes. The digest is unsalted so the same plaintext always maps to the
//! same stored value.

use sha2::{Digest, Sha256};

/// Length of a hex encoded SHA-256 digest
pub const DIGEST_LEN: usize = 64;

/// Hash a plaintext password.
pub fn hash_password(plaintext: &str) -> String {
    const_hex::encode(Sha256::digest(plaintext.as_bytes()))
}
