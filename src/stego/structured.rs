//! Spatial LSB structured codec: a grayscale image hidden inside a carrier image.
//!
//! Layout of the LSB plane, MSB-first throughout:
//!
//! ```text
//! units   0..128   identifier, 16 one-byte characters, NUL-padded on the right
//! units 128..144   secret height
//! units 144..160   secret width
//! units 160..      height * width grayscale bytes, row-major
//! ```

use tracing::debug;

use crate::bits::BitSequence;
use crate::capacity::ensure_capacity;
use crate::error::{Result, StegoError};
use crate::stego::lsb::{read_lsb, write_lsb};

/// Characters kept from the identifier.
pub const IDENTIFIER_CHARS: usize = 16;

/// Bits reserved for the identifier field.
pub const IDENTIFIER_BITS: usize = IDENTIFIER_CHARS * 8;

/// Bits per dimension field.
pub const DIMENSION_BITS: usize = 16;

/// Total header width.
pub const HEADER_BITS: usize = IDENTIFIER_BITS + 2 * DIMENSION_BITS;

/// A grayscale secondary image, one byte per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretImage {
    height: u16,
    width: u16,
    pixels: Vec<u8>,
}

impl SecretImage {
    /// Validates the shape against the pixel buffer and the 16-bit header fields.
    ///
    /// # Errors
    /// [`StegoError::MalformedHeader`] if a dimension is zero or above 65535, or
    /// if `pixels.len() != height * width`.
    pub fn new(height: usize, width: usize, pixels: Vec<u8>) -> Result<Self> {
        let h = u16::try_from(height)
            .map_err(|_| StegoError::MalformedHeader(format!("height {height} exceeds 16 bits")))?;
        let w = u16::try_from(width)
            .map_err(|_| StegoError::MalformedHeader(format!("width {width} exceeds 16 bits")))?;
        if h == 0 || w == 0 {
            return Err(StegoError::MalformedHeader(format!(
                "zero dimension {height}x{width}"
            )));
        }
        if pixels.len() != height * width {
            return Err(StegoError::MalformedHeader(format!(
                "{} pixel bytes do not match {height}x{width}",
                pixels.len()
            )));
        }
        Ok(Self {
            height: h,
            width: w,
            pixels,
        })
    }

    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Bits needed to hide this image, header included.
    pub fn required_bits(&self) -> usize {
        HEADER_BITS + self.pixels.len() * 8
    }
}

/// Result of [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    pub identifier: String,
    pub image: SecretImage,
}

/// Largest secret image, in pixels, that fits in `units` carrier bytes.
pub fn max_secret_pixels(units: usize) -> usize {
    units.saturating_sub(HEADER_BITS) / 8
}

/// Truncates to 16 characters, encodes one byte each, pads with NUL.
fn identifier_field(identifier: &str) -> Result<[u8; IDENTIFIER_CHARS]> {
    let mut field = [0u8; IDENTIFIER_CHARS];
    for (slot, ch) in field.iter_mut().zip(identifier.chars()) {
        *slot = u8::try_from(u32::from(ch)).map_err(|_| StegoError::UnencodableText(ch))?;
    }
    Ok(field)
}

/// Hides `secret` behind a 160-bit header in the LSBs of `pixels`.
///
/// Identifiers longer than 16 characters are truncated.
///
/// # Errors
/// - [`StegoError::UnencodableText`] if one of the kept identifier characters is above U+00FF.
/// - [`StegoError::CapacityExceeded`] if header plus pixels exceed the carrier.
pub fn embed(pixels: &[u8], secret: &SecretImage, identifier: &str) -> Result<Vec<u8>> {
    let field = identifier_field(identifier)?;
    if identifier.chars().count() > IDENTIFIER_CHARS {
        debug!(identifier_chars = identifier.chars().count(), "identifier truncated");
    }

    let mut bits = BitSequence::with_capacity(secret.required_bits());
    bits.push_bytes(&field);
    bits.push_uint(u64::from(secret.height), DIMENSION_BITS);
    bits.push_uint(u64::from(secret.width), DIMENSION_BITS);
    bits.push_bytes(&secret.pixels);

    ensure_capacity(bits.len(), pixels.len())?;
    debug!(
        height = secret.height,
        width = secret.width,
        bits = bits.len(),
        units = pixels.len(),
        "embedding structured image"
    );

    Ok(write_lsb(pixels, &bits))
}

/// Recovers the identifier and secret image hidden by [`embed`].
///
/// # Errors
/// [`StegoError::MalformedHeader`] if the carrier is shorter than the header,
/// a dimension is zero, or the dimensions imply more bits than the carrier holds.
pub fn extract(pixels: &[u8]) -> Result<ExtractedImage> {
    if pixels.len() < HEADER_BITS {
        return Err(StegoError::MalformedHeader(format!(
            "carrier has {} units, header needs {}",
            pixels.len(),
            HEADER_BITS
        )));
    }

    let header = read_lsb(pixels, 0, HEADER_BITS);
    let field = header.slice(0, IDENTIFIER_BITS).to_bytes()?;
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let identifier: String = field[..end].iter().map(|&b| char::from(b)).collect();

    let height = header
        .read_uint(IDENTIFIER_BITS, DIMENSION_BITS)
        .unwrap_or_default() as usize;
    let width = header
        .read_uint(IDENTIFIER_BITS + DIMENSION_BITS, DIMENSION_BITS)
        .unwrap_or_default() as usize;

    if height == 0 || width == 0 {
        return Err(StegoError::MalformedHeader(format!(
            "zero dimension {height}x{width}"
        )));
    }

    let payload_bits = height * width * 8;
    if HEADER_BITS + payload_bits > pixels.len() {
        return Err(StegoError::MalformedHeader(format!(
            "{height}x{width} needs {payload_bits} bits, carrier has {} after header",
            pixels.len() - HEADER_BITS
        )));
    }

    let data = read_lsb(pixels, HEADER_BITS, payload_bits).to_bytes()?;
    debug!(height, width, "extracted structured image");

    Ok(ExtractedImage {
        identifier,
        image: SecretImage::new(height, width, data)?,
    })
}
