//! Symmetric encryption collaborator.
//!
//! Each call to [`Cipher::encrypt`] produces a fresh random key, returned to the
//! caller alongside the ciphertext. [`Cipher::decrypt`] reports failure as
//! `None` rather than an error.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::rngs::OsRng;
use thiserror::Error;

/// Key size for ChaCha20Poly1305.
pub const KEY_SIZE: usize = 32;

/// Nonce size for ChaCha20Poly1305.
const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size.
const TAG_SIZE: usize = 16;

/// Errors that can occur during encryption.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Ciphertext and the key that opens it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub key: Vec<u8>,
}

/// `encrypt(text) -> (cipher, key)` / `decrypt(cipher, key) -> text?`.
pub trait Cipher {
    fn encrypt(&self, plaintext: &str) -> Result<Sealed, CipherError>;

    fn decrypt(&self, ciphertext: &[u8], key: &[u8]) -> Option<String>;
}

/// ChaCha20-Poly1305 with a random key per message.
///
/// Ciphertext format: nonce (12 bytes) || ciphertext (includes auth tag)
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaChaCipher;

impl Cipher for ChaChaCipher {
    fn encrypt(&self, plaintext: &str) -> Result<Sealed, CipherError> {
        let mut key = [0u8; KEY_SIZE];
        rand::RngCore::fill_bytes(&mut OsRng, &mut key);

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::RngCore::fill_bytes(&mut OsRng, &mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = ChaCha20Poly1305::new_from_slice(&key)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        let encrypted = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut ciphertext = Vec::with_capacity(NONCE_SIZE + encrypted.len());
        ciphertext.extend_from_slice(&nonce_bytes);
        ciphertext.extend_from_slice(&encrypted);

        Ok(Sealed {
            ciphertext,
            key: key.to_vec(),
        })
    }

    fn decrypt(&self, ciphertext: &[u8], key: &[u8]) -> Option<String> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return None;
        }
        let (nonce_bytes, body) = ciphertext.split_at(NONCE_SIZE);
        let cipher = ChaCha20Poly1305::new_from_slice(key).ok()?;
        let plaintext = cipher.decrypt(Nonce::from_slice(nonce_bytes), body).ok()?;
        String::from_utf8(plaintext).ok()
    }
}
