//! # stegocore - bit-exact steganographic codecs
//!
//! Hides text or a grayscale image inside an audio or image carrier so that it
//! can be recovered later without the original carrier.
//!
//! ## Codecs
//!
//! - **Spectral text** ([`stego::spectral`]): text plus an 8-bit end marker,
//!   one bit per DFT coefficient of an audio carrier.
//! - **LSB text** ([`stego::lsb_text`]): `base64("<identifier>:<text>")`,
//!   one bit per pixel byte.
//! - **LSB structured** ([`stego::structured`]): a 160-bit header (identifier,
//!   height, width) followed by grayscale pixel bytes, one bit per pixel byte.
//!
//! Every codec checks capacity before writing, never modifies its input and
//! returns a new carrier buffer. Embed and extract must use matching
//! parameters; there is no format detection.
//!
//! ## Example
//!
//! ```rust
//! use stegocore::stego::structured::{self, SecretImage};
//!
//! let carrier = vec![0x80u8; 256];
//! let secret = SecretImage::new(2, 2, vec![10, 20, 30, 40]).unwrap();
//!
//! let stego = structured::embed(&carrier, &secret, "abcd1234").unwrap();
//! let extracted = structured::extract(&stego).unwrap();
//!
//! assert_eq!(extracted.identifier, "abcd1234");
//! assert_eq!(extracted.image.pixels(), &[10, 20, 30, 40]);
//! ```
//!
//! ## Modules
//!
//! - [`bits`]: bit-sequence utility
//! - [`capacity`]: shared capacity validation
//! - [`stego`]: codecs and WAV/PNG carrier adapters
//! - [`payload`]: text/image payload dispatch
//! - [`crypto`], [`store`]: hashing, encryption and metadata collaborators
//! - [`workflow`]: seal/verify and sign/verify operations
//! - [`config`], [`logging`]: runtime configuration and log setup

pub mod bits;
pub mod capacity;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod payload;
pub mod stego;
pub mod store;
pub mod workflow;

pub use bits::{from_bits, to_bits, BitSequence};
pub use capacity::ensure_capacity;
pub use config::StegoConfig;
pub use error::StegoError;
pub use payload::{embed_payload, extract_payload, Payload, PayloadKind};
pub use stego::{
    AudioCarrier, ExtractedImage, ImageCarrier, SecretImage, SpectralParams, TextMessage,
};
pub use workflow::{AuthOutcome, WorkflowError};
