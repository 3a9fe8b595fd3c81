//! Content hashing collaborator and identifier generation.

use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Bytes of randomness behind an identifier; hex doubles it to 16 characters.
const IDENTIFIER_BYTES: usize = 8;

/// `hash(bytes) -> digest`, rendered as a string for storage and comparison.
pub trait ContentHasher {
    fn hash(&self, bytes: &[u8]) -> String;
}

/// Lowercase hex SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn hash(&self, bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hex::encode(hasher.finalize())
    }
}

/// Random 16-character lowercase hex identifier.
///
/// Sized to fill the structured header's identifier field exactly.
pub fn generate_identifier() -> String {
    let mut bytes = [0u8; IDENTIFIER_BYTES];
    rand::RngCore::fill_bytes(&mut OsRng, &mut bytes);
    hex::encode(bytes)
}
