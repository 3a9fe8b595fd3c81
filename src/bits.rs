//! Bit-sequence utility.
//!
//! Every codec in this crate works on a [`BitSequence`]: an ordered list of
//! bits where each source byte expands to 8 bits, most significant bit first.
//!
//! ```
//! use stegocore::bits::BitSequence;
//!
//! let bits = BitSequence::from_bytes(b"H");
//! assert_eq!(bits.to_string(), "01001000");
//! assert_eq!(bits.to_bytes().unwrap(), b"H");
//! ```

use std::fmt;

use crate::error::{Result, StegoError};

/// An ordered sequence of bits, MSB-first per source byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence {
    bits: Vec<bool>,
}

impl BitSequence {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Creates an empty sequence able to hold `capacity` bits without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    /// Expands each byte into 8 bits, most significant first.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut seq = Self::with_capacity(bytes.len() * 8);
        seq.push_bytes(bytes);
        seq
    }

    /// Encodes text where every character must fit in one byte (U+0000..=U+00FF).
    ///
    /// # Errors
    /// Returns [`StegoError::UnencodableText`] for the first character above U+00FF.
    pub fn from_latin1(text: &str) -> Result<Self> {
        let mut seq = Self::with_capacity(text.len() * 8);
        for ch in text.chars() {
            let byte = u8::try_from(u32::from(ch)).map_err(|_| StegoError::UnencodableText(ch))?;
            seq.push_uint(u64::from(byte), 8);
        }
        Ok(seq)
    }

    /// Appends all bits of `bytes`.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push_uint(u64::from(byte), 8);
        }
    }

    /// Appends the lowest `width` bits of `value`, most significant first.
    pub fn push_uint(&mut self, value: u64, width: usize) {
        debug_assert!(width <= 64);
        for shift in (0..width).rev() {
            self.bits.push((value >> shift) & 1 == 1);
        }
    }

    /// Appends a single bit.
    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Appends every bit of `other`.
    pub fn extend_from(&mut self, other: &BitSequence) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Reads `width` bits starting at `offset` as an unsigned big-endian integer.
    ///
    /// Returns `None` if the range runs past the end of the sequence.
    pub fn read_uint(&self, offset: usize, width: usize) -> Option<u64> {
        let end = offset.checked_add(width)?;
        let slice = self.bits.get(offset..end)?;
        Some(slice.iter().fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit)))
    }

    /// Packs the sequence back into bytes.
    ///
    /// # Errors
    /// Returns [`StegoError::MalformedBitLength`] if the length is not a multiple of 8.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.bits.len() % 8 != 0 {
            return Err(StegoError::MalformedBitLength(self.bits.len()));
        }
        Ok(self.bits.chunks_exact(8).map(pack_byte).collect())
    }

    /// Decodes the sequence as one-byte-per-character text.
    pub fn to_latin1(&self) -> Result<String> {
        Ok(self.to_bytes()?.into_iter().map(char::from).collect())
    }

    /// Finds the first occurrence of `pattern` that starts on a byte boundary.
    pub fn find_aligned(&self, pattern: &BitSequence) -> Option<usize> {
        if pattern.is_empty() || pattern.len() > self.len() {
            return None;
        }
        (0..=self.len() - pattern.len())
            .step_by(8)
            .find(|&start| self.bits[start..start + pattern.len()] == pattern.bits[..])
    }

    /// Returns a new sequence holding bits `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> BitSequence {
        Self {
            bits: self.bits[start..end].to_vec(),
        }
    }

    /// Returns the bit at `index`.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if there are no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Iterates the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

fn pack_byte(chunk: &[bool]) -> u8 {
    chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit))
}

/// Expands bytes into bits. See [`BitSequence::from_bytes`].
pub fn to_bits(bytes: &[u8]) -> BitSequence {
    BitSequence::from_bytes(bytes)
}

/// Packs bits into bytes. See [`BitSequence::to_bytes`].
pub fn from_bits(bits: &BitSequence) -> Result<Vec<u8>> {
    bits.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_expansion() {
        let bits = to_bits(&[0b1000_0001, 0x49]);
        assert_eq!(bits.to_string(), "1000000101001001");
    }

    #[test]
    fn test_from_bits_roundtrip() {
        let data: Vec<u8> = (0..=255).collect();
        let bits = to_bits(&data);
        assert_eq!(bits.len(), 256 * 8);
        assert_eq!(from_bits(&bits).unwrap(), data);
    }

    #[test]
    fn test_malformed_length() {
        let bits: BitSequence = [true, false, true].into_iter().collect();
        assert_eq!(from_bits(&bits), Err(StegoError::MalformedBitLength(3)));
    }

    #[test]
    fn test_latin1_rejects_wide_chars() {
        assert!(BitSequence::from_latin1("caf\u{e9}").is_ok());
        assert_eq!(
            BitSequence::from_latin1("\u{20ac}"),
            Err(StegoError::UnencodableText('\u{20ac}'))
        );
    }

    #[test]
    fn test_uint_packing() {
        let mut bits = BitSequence::new();
        bits.push_uint(2, 16);
        bits.push_uint(0xBEEF, 16);
        assert_eq!(bits.read_uint(0, 16), Some(2));
        assert_eq!(bits.read_uint(16, 16), Some(0xBEEF));
        assert_eq!(bits.read_uint(24, 16), None);
    }

    #[test]
    fn test_find_aligned_skips_unaligned_matches() {
        // "0101 0101 1..." contains 10101011 at bit 1 but not on a byte boundary.
        let mut bits = to_bits(&[0b0101_0101, 0b1000_0000]);
        let marker = to_bits(&[0b1010_1011]);
        assert_eq!(bits.find_aligned(&marker), None);

        bits.push_bytes(&[0b1010_1011]);
        assert_eq!(bits.find_aligned(&marker), Some(16));
    }
}
