//! Payload variants dispatched to the matching image codec.
//!
//! Text and image payloads never share a code path: the caller states which
//! one it expects, since the LSB plane itself carries no type tag.

use crate::error::Result;
use crate::stego::lsb_text::{self, TextMessage};
use crate::stego::structured::{self, ExtractedImage};

/// What a carrier image hides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Identifier and text, base64-framed.
    Text(TextMessage),
    /// Identifier and grayscale image behind a 160-bit header.
    Image(ExtractedImage),
}

/// Which codec to run on extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Image,
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Text(_) => PayloadKind::Text,
            Payload::Image(_) => PayloadKind::Image,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Payload::Text(message) => &message.identifier,
            Payload::Image(extracted) => &extracted.identifier,
        }
    }
}

/// Embeds `payload` with the codec its variant names.
pub fn embed_payload(pixels: &[u8], payload: &Payload) -> Result<Vec<u8>> {
    match payload {
        Payload::Text(message) => lsb_text::embed(pixels, &message.identifier, &message.text),
        Payload::Image(extracted) => {
            structured::embed(pixels, &extracted.image, &extracted.identifier)
        }
    }
}

/// Extracts a payload of the given kind.
pub fn extract_payload(pixels: &[u8], kind: PayloadKind) -> Result<Payload> {
    match kind {
        PayloadKind::Text => lsb_text::extract(pixels).map(Payload::Text),
        PayloadKind::Image => structured::extract(pixels).map(Payload::Image),
    }
}
