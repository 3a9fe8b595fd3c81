//! Error taxonomy shared by all codecs.
//!
//! Every codec failure is reported synchronously as a [`StegoError`]. None of
//! these are retried: the codecs are deterministic, so the same input always
//! reproduces the same failure.

use thiserror::Error;

/// Errors produced by the bit utility, the capacity validator and the codecs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    #[error("Payload does not fit carrier: need {required} units, have {available}")]
    CapacityExceeded { required: usize, available: usize },

    #[error("End marker not found in the scanned coefficient window")]
    MarkerNotFound,

    #[error("Bit sequence length {0} is not a multiple of 8")]
    MalformedBitLength(usize),

    #[error("Malformed structured header: {0}")]
    MalformedHeader(String),

    #[error("Malformed framing: no identifier separator found")]
    MalformedFraming,

    #[error("Decode format error: {0}")]
    DecodeFormatError(String),

    #[error("Embedded payload did not survive 16-bit quantization: {0} bits lost")]
    PayloadNotRecovered(usize),

    #[error("Character {0:?} cannot be encoded as a single byte")]
    UnencodableText(char),
}

/// Convenience alias used throughout the codec modules.
pub type Result<T> = std::result::Result<T, StegoError>;
