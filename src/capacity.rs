//! Capacity validation shared by all codecs.
//!
//! A carrier exposes a number of addressable units: frequency bins for the
//! spectral codec, pixel bytes for the LSB codecs. Each unit hosts one bit.
//! The check runs before any mutation so a failing embed never writes.

use tracing::debug;

use crate::error::{Result, StegoError};

/// Fails with [`StegoError::CapacityExceeded`] if `required` bits do not fit in
/// `available` units.
pub fn ensure_capacity(required: usize, available: usize) -> Result<()> {
    if required > available {
        debug!(required, available, "capacity check failed");
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }
    Ok(())
}
