//! Least-significant-bit plane access over flattened pixel bytes.

use crate::bits::BitSequence;

/// Returns a copy of `units` with bit 0 of the first `bits.len()` units
/// replaced by the sequence. Bits 1-7 are left untouched.
///
/// The caller checks capacity first; `bits` must not be longer than `units`.
pub fn write_lsb(units: &[u8], bits: &BitSequence) -> Vec<u8> {
    debug_assert!(bits.len() <= units.len());
    let mut output = units.to_vec();
    for (unit, bit) in output.iter_mut().zip(bits.iter()) {
        // Clear LSB and set new bit
        *unit = (*unit & 0xFE) | u8::from(bit);
    }
    output
}

/// Reads bit 0 of `count` units starting at `start`.
pub fn read_lsb(units: &[u8], start: usize, count: usize) -> BitSequence {
    units
        .iter()
        .skip(start)
        .take(count)
        .map(|unit| unit & 1 == 1)
        .collect()
}
