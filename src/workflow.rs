//! End-to-end operations combining codecs, carriers and collaborators.
//!
//! Collaborators are passed in explicitly: no workflow holds a store, hasher or
//! cipher of its own. An authentication mismatch is reported as
//! [`AuthOutcome::NotAuthenticated`]; only structural failures are errors.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::crypto::{generate_identifier, Cipher, CipherError, ContentHasher};
use crate::error::StegoError;
use crate::stego::audio::AudioCarrier;
use crate::stego::image::{ImageCarrier, ImageCarrierError};
use crate::stego::lsb_text;
use crate::stego::spectral::{self, SpectralParams};
use crate::stego::structured::{self, SecretImage};
use crate::store::{DocumentRecord, ImageRecord, MetadataStore, Record, StoreError};

/// Errors that can occur while running a workflow.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Codec(#[from] StegoError),

    #[error(transparent)]
    Image(#[from] ImageCarrierError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("No record found for identifier {0:?}")]
    RecordNotFound(String),

    #[error("Record {0:?} does not describe this kind of payload")]
    RecordKindMismatch(String),
}

/// Result of comparing an extracted payload with its stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated,
    NotAuthenticated,
}

impl AuthOutcome {
    pub fn is_authenticated(self) -> bool {
        self == AuthOutcome::Authenticated
    }

    fn from_match(matches: bool) -> Self {
        if matches {
            AuthOutcome::Authenticated
        } else {
            AuthOutcome::NotAuthenticated
        }
    }
}

impl fmt::Display for AuthOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthOutcome::Authenticated => f.write_str("Document Authenticated"),
            AuthOutcome::NotAuthenticated => f.write_str("Document Not Authenticated"),
        }
    }
}

/// Output of [`seal_image`].
#[derive(Debug, Clone)]
pub struct SealedImage {
    pub identifier: String,
    pub carrier: ImageCarrier,
}

/// Output of [`verify_image`].
#[derive(Debug, Clone)]
pub struct ImageVerification {
    pub identifier: String,
    pub image: SecretImage,
    pub outcome: AuthOutcome,
}

/// Output of [`sign_document`].
#[derive(Debug, Clone)]
pub struct SignedDocument {
    pub identifier: String,
    pub carrier: ImageCarrier,
}

/// Output of [`verify_document`].
#[derive(Debug, Clone)]
pub struct DocumentVerification {
    pub identifier: String,
    pub outcome: AuthOutcome,
    /// Decrypted signature, present only when authenticated and decryptable.
    pub signature: Option<String>,
}

/// Hides `text` in the spectrum of an audio carrier.
pub fn embed_audio_text(
    carrier: &AudioCarrier,
    text: &str,
    params: &SpectralParams,
) -> Result<AudioCarrier, WorkflowError> {
    let samples = spectral::embed(carrier.samples(), text, params)?;
    info!(chars = text.chars().count(), "text embedded in audio");
    Ok(carrier.with_samples(samples))
}

/// Recovers text hidden by [`embed_audio_text`].
pub fn extract_audio_text(
    carrier: &AudioCarrier,
    params: &SpectralParams,
) -> Result<String, WorkflowError> {
    let text = spectral::extract(carrier.samples(), params)?;
    info!(chars = text.chars().count(), "text extracted from audio");
    Ok(text)
}

/// Hides `secret` in `carrier` under a fresh identifier and records its hash.
///
/// The record is written only after embedding succeeds.
pub fn seal_image(
    carrier: &ImageCarrier,
    secret: &SecretImage,
    hasher: &dyn ContentHasher,
    store: &mut dyn MetadataStore,
) -> Result<SealedImage, WorkflowError> {
    let identifier = generate_identifier();
    let stego = carrier.with_pixels(structured::embed(carrier.pixels(), secret, &identifier)?)?;

    store.insert(Record::Image(ImageRecord {
        identifier: identifier.clone(),
        secret_hash: hasher.hash(secret.pixels()),
        secret_size: format!("{}x{}", secret.height(), secret.width()),
    }))?;
    info!(identifier = %identifier, "secret image sealed");

    Ok(SealedImage {
        identifier,
        carrier: stego,
    })
}

/// Extracts a sealed image and compares its hash with the stored record.
pub fn verify_image(
    carrier: &ImageCarrier,
    hasher: &dyn ContentHasher,
    store: &dyn MetadataStore,
) -> Result<ImageVerification, WorkflowError> {
    let extracted = structured::extract(carrier.pixels())?;
    let identifier = extracted.identifier;

    let record = match store.find(&identifier)? {
        Some(Record::Image(record)) => record,
        Some(_) => return Err(WorkflowError::RecordKindMismatch(identifier)),
        None => return Err(WorkflowError::RecordNotFound(identifier)),
    };

    let digest = hasher.hash(extracted.image.pixels());
    debug!(identifier = %identifier, digest = %digest, "hashed extracted image");
    let outcome = AuthOutcome::from_match(digest == record.secret_hash);
    info!(identifier = %identifier, %outcome, "image verified");

    Ok(ImageVerification {
        identifier,
        image: extracted.image,
        outcome,
    })
}

/// Encrypts `signature`, hides the ciphertext in `carrier` and records the key.
pub fn sign_document(
    carrier: &ImageCarrier,
    signature: &str,
    original_filename: Option<&str>,
    cipher: &dyn Cipher,
    store: &mut dyn MetadataStore,
) -> Result<SignedDocument, WorkflowError> {
    let identifier = generate_identifier();
    let sealed = cipher.encrypt(signature)?;
    let encrypted_signature = BASE64.encode(&sealed.ciphertext);

    let pixels = lsb_text::embed(carrier.pixels(), &identifier, &encrypted_signature)?;
    let stego = carrier.with_pixels(pixels)?;

    store.insert(Record::Document(DocumentRecord {
        identifier: identifier.clone(),
        encrypted_signature,
        key: BASE64.encode(&sealed.key),
        original_filename: original_filename.map(str::to_string),
    }))?;
    info!(identifier = %identifier, "document signed");

    Ok(SignedDocument {
        identifier,
        carrier: stego,
    })
}

/// Extracts an embedded signature and compares it with the stored ciphertext.
pub fn verify_document(
    carrier: &ImageCarrier,
    cipher: &dyn Cipher,
    store: &dyn MetadataStore,
) -> Result<DocumentVerification, WorkflowError> {
    let message = lsb_text::extract(carrier.pixels())?;
    let identifier = message.identifier;

    let record = match store.find(&identifier)? {
        Some(Record::Document(record)) => record,
        Some(_) => return Err(WorkflowError::RecordKindMismatch(identifier)),
        None => return Err(WorkflowError::RecordNotFound(identifier)),
    };

    let outcome = AuthOutcome::from_match(message.text == record.encrypted_signature);
    let signature = if outcome.is_authenticated() {
        open_signature(&record, cipher)
    } else {
        None
    };
    info!(identifier = %identifier, %outcome, "document verified");

    Ok(DocumentVerification {
        identifier,
        outcome,
        signature,
    })
}

fn open_signature(record: &DocumentRecord, cipher: &dyn Cipher) -> Option<String> {
    let ciphertext = BASE64.decode(&record.encrypted_signature).ok()?;
    let key = BASE64.decode(&record.key).ok()?;
    cipher.decrypt(&ciphertext, &key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{ChaChaCipher, Sha256Hasher};
    use crate::store::MemoryStore;

    fn carrier(height: usize, width: usize) -> ImageCarrier {
        let pixels = (0..height * width * 3).map(|i| (i % 97) as u8 & 0xFE).collect();
        ImageCarrier::from_pixels(height, width, 3, pixels).unwrap()
    }

    fn secret() -> SecretImage {
        SecretImage::new(4, 4, (0..16).map(|i| i * 15).collect()).unwrap()
    }

    #[test]
    fn test_seal_and_verify_image() {
        let mut store = MemoryStore::new();
        let sealed = seal_image(&carrier(32, 32), &secret(), &Sha256Hasher, &mut store).unwrap();
        assert_eq!(sealed.identifier.len(), 16);

        let verified = verify_image(&sealed.carrier, &Sha256Hasher, &store).unwrap();
        assert_eq!(verified.identifier, sealed.identifier);
        assert_eq!(verified.image, secret());
        assert_eq!(verified.outcome, AuthOutcome::Authenticated);
    }

    #[test]
    fn test_tampered_image_not_authenticated() {
        let mut store = MemoryStore::new();
        let sealed = seal_image(&carrier(32, 32), &secret(), &Sha256Hasher, &mut store).unwrap();

        let mut pixels = sealed.carrier.pixels().to_vec();
        // flip the LSB of the first secret pixel's last bit
        pixels[structured::HEADER_BITS + 7] ^= 1;
        let tampered = sealed.carrier.with_pixels(pixels).unwrap();

        let verified = verify_image(&tampered, &Sha256Hasher, &store).unwrap();
        assert_eq!(verified.outcome, AuthOutcome::NotAuthenticated);
    }

    #[test]
    fn test_capacity_failure_stores_nothing() {
        let mut store = MemoryStore::new();
        let result = seal_image(&carrier(4, 4), &secret(), &Sha256Hasher, &mut store);
        assert!(matches!(
            result,
            Err(WorkflowError::Codec(StegoError::CapacityExceeded { .. }))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_identifier() {
        let mut store = MemoryStore::new();
        let sealed = seal_image(&carrier(32, 32), &secret(), &Sha256Hasher, &mut store).unwrap();
        let empty = MemoryStore::new();
        assert!(matches!(
            verify_image(&sealed.carrier, &Sha256Hasher, &empty),
            Err(WorkflowError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_sign_and_verify_document() {
        let mut store = MemoryStore::new();
        let signed = sign_document(
            &carrier(40, 40),
            "Jordan Example",
            Some("contract.png"),
            &ChaChaCipher,
            &mut store,
        )
        .unwrap();

        let verified = verify_document(&signed.carrier, &ChaChaCipher, &store).unwrap();
        assert_eq!(verified.identifier, signed.identifier);
        assert_eq!(verified.outcome, AuthOutcome::Authenticated);
        assert_eq!(verified.signature.as_deref(), Some("Jordan Example"));
    }

    #[test]
    fn test_document_record_kind_mismatch() {
        let mut store = MemoryStore::new();
        let signed =
            sign_document(&carrier(40, 40), "sig", None, &ChaChaCipher, &mut store).unwrap();

        let mut wrong = MemoryStore::new();
        wrong
            .insert(Record::Image(ImageRecord {
                identifier: signed.identifier.clone(),
                secret_hash: String::new(),
                secret_size: "1x1".into(),
            }))
            .unwrap();
        assert!(matches!(
            verify_document(&signed.carrier, &ChaChaCipher, &wrong),
            Err(WorkflowError::RecordKindMismatch(_))
        ));
    }

    #[test]
    fn test_audio_text_roundtrip() {
        let params = SpectralParams::default();
        let samples = (0..2048)
            .map(|i| {
                let t = i as f64 / 2048.0;
                (8000.0 * (std::f64::consts::TAU * 10.0 * t).sin()).round() as i16
            })
            .collect();
        let audio = AudioCarrier::from_samples(16000, samples);
        let stego = embed_audio_text(&audio, "meet at dawn", &params).unwrap();
        assert_eq!(stego.sample_rate(), 16000);
        assert_eq!(extract_audio_text(&stego, &params).unwrap(), "meet at dawn");
    }
}
