//! Marker-delimited text codec in the frequency domain.
//!
//! Text is encoded one byte per character, followed by the 8-bit end marker
//! `10101011`. Each bit then shifts the real part of one DFT coefficient of the
//! carrier by `+delta` (bit 1) or `-delta` (bit 0), starting at `base_index`.
//! The shift is scaled with the carrier length so it survives rounding back
//! to 16-bit samples; `embed` re-reads its own output and fails rather than
//! return a carrier whose bits were lost.
//!
//! Only the first half of the spectrum is addressable: a real signal has a
//! conjugate-symmetric spectrum, so every perturbed bin `k` is mirrored onto
//! bin `N - k` to keep the inverse transform real.
//!
//! There is no length field. The embedder and the extractor must agree on the
//! same [`SpectralParams`]; the marker is the only delimiter.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bits::BitSequence;
use crate::capacity::ensure_capacity;
use crate::error::{Result, StegoError};

/// End-of-text marker appended after the payload bits.
pub const MARKER: u8 = 0b1010_1011;

/// Default first coefficient used for embedding.
pub const DEFAULT_BASE_INDEX: usize = 100;

/// Default per-bit shift, in sample amplitude units.
pub const DEFAULT_DELTA: f64 = 32.0;

/// Default number of coefficients scanned on extraction.
pub const DEFAULT_WINDOW_BITS: usize = 1024;

/// Shared embed/extract contract for the spectral codec.
///
/// `delta` and `threshold` are expressed per sample: a shift of `delta` on one
/// coefficient (and its mirror) adds a cosine of amplitude `delta` to the
/// samples, whatever the carrier length. Internally they are scaled by `N / 2`
/// to unnormalized DFT units.
///
/// Both sides must use identical values; nothing in the carrier describes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralParams {
    /// Index of the first perturbed coefficient.
    pub base_index: usize,
    /// Amplitude added to or subtracted from each coefficient's real part.
    pub delta: f64,
    /// A coefficient whose normalized real part exceeds this value reads back as bit 1.
    pub threshold: f64,
    /// Number of coefficients scanned for the marker, starting at `base_index`.
    pub window_bits: usize,
}

impl Default for SpectralParams {
    fn default() -> Self {
        Self {
            base_index: DEFAULT_BASE_INDEX,
            delta: DEFAULT_DELTA,
            threshold: DEFAULT_DELTA / 2.0,
            window_bits: DEFAULT_WINDOW_BITS,
        }
    }
}

impl SpectralParams {
    /// Number of bits (payload plus marker) a carrier of `sample_count` samples can host.
    ///
    /// Bounded by the usable half-spectrum and by the extraction window.
    pub fn capacity_bits(&self, sample_count: usize) -> usize {
        (sample_count / 2)
            .saturating_sub(self.base_index)
            .min(self.window_bits)
    }

    /// Longest text, in characters, that fits alongside the marker.
    pub fn max_text_chars(&self, sample_count: usize) -> usize {
        self.capacity_bits(sample_count).saturating_sub(8) / 8
    }
}

/// Unnormalized DFT units per sample amplitude unit for an `n`-sample carrier.
fn bin_scale(n: usize) -> f64 {
    n as f64 / 2.0
}

fn marker_bits() -> BitSequence {
    BitSequence::from_bytes(&[MARKER])
}

fn forward(samples: &[i16]) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .map(|&s| Complex::new(f64::from(s), 0.0))
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(buffer.len()).process(&mut buffer);
    buffer
}

fn inverse(mut spectrum: Vec<Complex<f64>>) -> Vec<i16> {
    let n = spectrum.len();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_inverse(n).process(&mut spectrum);
    let scale = n as f64;
    // float-to-int `as` casts saturate at the i16 range
    spectrum
        .into_iter()
        .map(|c| (c.re / scale).round() as i16)
        .collect()
}

/// Classifies coefficients `start..end` against the threshold.
fn read_bits(
    spectrum: &[Complex<f64>],
    start: usize,
    end: usize,
    params: &SpectralParams,
) -> BitSequence {
    let threshold = params.threshold * bin_scale(spectrum.len());
    spectrum[start..end].iter().map(|c| c.re > threshold).collect()
}

/// Hides `text` in the spectrum of `samples` and returns a new sample buffer.
///
/// The input slice is never modified.
///
/// # Errors
/// - [`StegoError::UnencodableText`] if a character is above U+00FF.
/// - [`StegoError::CapacityExceeded`] if `base_index + bits` exceeds half the
///   sample count, or the bits exceed the extraction window.
/// - [`StegoError::PayloadNotRecovered`] if rounding or clipping to 16-bit
///   samples flips any embedded bit.
pub fn embed(samples: &[i16], text: &str, params: &SpectralParams) -> Result<Vec<i16>> {
    let mut bits = BitSequence::from_latin1(text)?;
    if text.chars().any(|c| u32::from(c) == u32::from(MARKER)) {
        warn!("text contains the end marker byte; extraction will stop early");
    }
    bits.push_uint(u64::from(MARKER), 8);

    ensure_capacity(
        params.base_index + bits.len(),
        params.base_index + params.capacity_bits(samples.len()),
    )?;

    let n = samples.len();
    let delta = params.delta * bin_scale(n);
    let mut spectrum = forward(samples);

    for (i, bit) in bits.iter().enumerate() {
        let k = params.base_index + i;
        let shift = if bit { delta } else { -delta };
        spectrum[k].re += shift;
        let mirror = (n - k) % n;
        if mirror != k {
            spectrum[mirror].re += shift;
        }
    }

    debug!(
        bits = bits.len(),
        samples = n,
        base_index = params.base_index,
        "embedded text in spectrum"
    );

    let stego = inverse(spectrum);
    let end = params.base_index + bits.len();
    let lost = read_bits(&forward(&stego), params.base_index, end, params)
        .iter()
        .zip(bits.iter())
        .filter(|(read, written)| read != written)
        .count();
    if lost > 0 {
        return Err(StegoError::PayloadNotRecovered(lost));
    }

    Ok(stego)
}

/// Recovers the text hidden by [`embed`] with the same `params`.
///
/// # Errors
/// [`StegoError::MarkerNotFound`] if no byte-aligned marker occurs in the scanned window.
pub fn extract(samples: &[i16], params: &SpectralParams) -> Result<String> {
    let end = (params.base_index + params.window_bits).min(samples.len() / 2);
    if params.base_index >= end {
        return Err(StegoError::MarkerNotFound);
    }

    let bits = read_bits(&forward(samples), params.base_index, end, params);

    let stop = bits
        .find_aligned(&marker_bits())
        .ok_or(StegoError::MarkerNotFound)?;
    debug!(scanned = bits.len(), marker_at = stop, "found end marker");

    bits.slice(0, stop).to_latin1()
}
