//! Steganographic codecs and the carrier adapters that feed them.
//!
//! Codecs:
//! - [`spectral`]: marker-delimited text in the DFT of audio samples
//! - [`lsb_text`]: base64-framed identifier and text in pixel LSBs
//! - [`structured`]: header plus grayscale image in pixel LSBs
//!
//! Adapters:
//! - [`audio`]: 16-bit PCM WAV (first channel only)
//! - [`image`]: PNG/BMP carriers normalized to RGB, grayscale secrets

pub mod audio;
pub mod image;
pub mod lsb;
pub mod lsb_text;
pub mod spectral;
pub mod structured;

pub use self::audio::{AudioCarrier, AudioCarrierError};
pub use self::image::{ImageCarrier, ImageCarrierError};
pub use self::lsb_text::TextMessage;
pub use self::spectral::SpectralParams;
pub use self::structured::{ExtractedImage, SecretImage};
