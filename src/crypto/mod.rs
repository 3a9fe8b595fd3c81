//! Cryptographic collaborators used by the workflows.
//!
//! This module provides:
//! - Content hashing (SHA-256) for image authentication
//! - Per-message symmetric encryption (ChaCha20Poly1305) for signatures
//! - Random identifiers sized for the structured header

pub mod cipher;
pub mod digest;

pub use cipher::{ChaChaCipher, Cipher, CipherError, Sealed};
pub use digest::{generate_identifier, ContentHasher, Sha256Hasher};
