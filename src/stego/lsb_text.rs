//! Spatial LSB text codec.
//!
//! Format: `base64("<identifier>:<text>")`, one bit per pixel byte LSB, in
//! flattened row-major order.
//!
//! The frame carries no length field and no terminator. Extraction reads the
//! whole LSB plane and keeps the leading run of base64 characters (up to and
//! including any `=` padding). Whatever follows the payload in the carrier
//! must therefore not continue the base64 run, or decoding fails.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use crate::bits::BitSequence;
use crate::capacity::ensure_capacity;
use crate::error::{Result, StegoError};
use crate::stego::lsb::{read_lsb, write_lsb};

/// Separator between the identifier and the text inside the frame.
pub const SEPARATOR: char = ':';

/// Identifier and text recovered from a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub identifier: String,
    pub text: String,
}

/// Longest `"<identifier>:<text>"` composite, in bytes, that fits in `units` pixel bytes.
pub fn max_composite_bytes(units: usize) -> usize {
    // every 3 bytes become 4 base64 characters of 8 bits each
    units / 32 * 3
}

/// Hides `identifier` and `text` in the LSBs of `pixels`, returning a new buffer.
///
/// # Errors
/// - [`StegoError::MalformedFraming`] if the identifier contains the separator.
/// - [`StegoError::CapacityExceeded`] if the framed bits exceed the pixel byte count.
pub fn embed(pixels: &[u8], identifier: &str, text: &str) -> Result<Vec<u8>> {
    if identifier.contains(SEPARATOR) {
        return Err(StegoError::MalformedFraming);
    }

    let composite = format!("{}{}{}", identifier, SEPARATOR, text);
    let framed = BASE64.encode(composite.as_bytes());
    let bits = BitSequence::from_bytes(framed.as_bytes());

    ensure_capacity(bits.len(), pixels.len())?;
    debug!(bits = bits.len(), units = pixels.len(), "embedding text frame");

    Ok(write_lsb(pixels, &bits))
}

/// Recovers the identifier and text hidden by [`embed`].
///
/// # Errors
/// - [`StegoError::DecodeFormatError`] if the LSB plane does not start with valid
///   base64 or the decoded bytes are not UTF-8.
/// - [`StegoError::MalformedFraming`] if the decoded text has no separator.
pub fn extract(pixels: &[u8]) -> Result<TextMessage> {
    let whole_bytes = pixels.len() / 8;
    let plane = read_lsb(pixels, 0, whole_bytes * 8).to_bytes()?;

    let framed = leading_base64(&plane);
    if framed.is_empty() {
        return Err(StegoError::DecodeFormatError(
            "no base64 data in LSB plane".to_string(),
        ));
    }
    debug!(framed = framed.len(), plane = plane.len(), "decoding text frame");

    let decoded = BASE64
        .decode(framed)
        .map_err(|e| StegoError::DecodeFormatError(e.to_string()))?;
    let composite =
        String::from_utf8(decoded).map_err(|e| StegoError::DecodeFormatError(e.to_string()))?;

    let (identifier, text) = composite
        .split_once(SEPARATOR)
        .ok_or(StegoError::MalformedFraming)?;

    Ok(TextMessage {
        identifier: identifier.to_string(),
        text: text.to_string(),
    })
}

fn is_base64_body(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'/'
}

/// Leading base64 run: alphabet characters followed by only as many `=` as
/// the body length calls for.
fn leading_base64(bytes: &[u8]) -> &[u8] {
    let body = bytes.iter().take_while(|&&b| is_base64_body(b)).count();
    let needed = (4 - body % 4) % 4;
    let padding = bytes[body..]
        .iter()
        .take(needed)
        .take_while(|&&b| b == b'=')
        .count();
    &bytes[..body + padding]
}
