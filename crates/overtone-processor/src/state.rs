//! Binary parameter record.
//!
//! A fixed-order, 13-byte layout:
//!
//! | Offset | Size | Field                      | Encoding                |
//! |--------|------|----------------------------|-------------------------|
//! | 0      | 4    | second-harmonic amount     | f32, little-endian      |
//! | 4      | 4    | third-harmonic amount      | f32, little-endian      |
//! | 8      | 4    | wet/dry mix                | f32, little-endian      |
//! | 12     | 1    | oversampling enabled       | nonzero = true          |
//!
//! Decoding is all-or-nothing: a short buffer or a non-finite float yields a
//! [`StateError`] and nothing is written. Finite values outside [0, 1] are
//! clamped. Bytes past the record are ignored.

use crate::error::StateError;
use crate::params::{HarmonicParams, ParamSnapshot, ParamSource};

/// Length of the encoded record in bytes.
pub const STATE_LEN: usize = 13;

const FIELDS: [&str; 3] = ["secondHarmonic", "thirdHarmonic", "wetDryMix"];

impl ParamSnapshot {
    /// Encodes the snapshot as a 13-byte record.
    ///
    /// # Example
    ///
    /// ```rust
    /// use overtone_processor::ParamSnapshot;
    ///
    /// let snap = ParamSnapshot { second_harmonic: 0.3, third_harmonic: 0.6, mix: 0.8, oversampling: true };
    /// let bytes = snap.to_bytes();
    /// assert_eq!(bytes[12], 1);
    /// assert_eq!(ParamSnapshot::from_bytes(&bytes), Ok(snap));
    /// ```
    pub fn to_bytes(&self) -> [u8; STATE_LEN] {
        let mut out = [0u8; STATE_LEN];
        for (chunk, value) in out[..12]
            .chunks_exact_mut(4)
            .zip([self.second_harmonic, self.third_harmonic, self.mix])
        {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out[12] = u8::from(self.oversampling);
        out
    }

    /// Decodes a record.
    ///
    /// # Errors
    /// [`StateError::Truncated`] if `bytes` is shorter than [`STATE_LEN`],
    /// [`StateError::NonFinite`] if a float field is NaN or infinite.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        let Some(record) = bytes.get(..STATE_LEN) else {
            return Err(StateError::Truncated {
                expected: STATE_LEN,
                got: bytes.len(),
            });
        };

        let mut floats = [0.0f32; 3];
        for ((value, chunk), field) in floats.iter_mut().zip(record.chunks_exact(4)).zip(FIELDS) {
            let decoded = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if !decoded.is_finite() {
                return Err(StateError::NonFinite { field });
            }
            *value = decoded;
        }

        Ok(Self {
            second_harmonic: floats[0],
            third_harmonic: floats[1],
            mix: floats[2],
            oversampling: record[12] != 0,
        }
        .sanitized())
    }
}

impl HarmonicParams {
    /// Encodes the current values.
    pub fn save_state(&self) -> [u8; STATE_LEN] {
        self.snapshot().to_bytes()
    }

    /// Replaces all four values from an encoded record.
    ///
    /// On error the store keeps its previous values.
    pub fn restore_state(&self, bytes: &[u8]) -> Result<ParamSnapshot, StateError> {
        match ParamSnapshot::from_bytes(bytes) {
            Ok(snapshot) => {
                self.apply(&snapshot);
                tracing::debug!("restored parameter state: {snapshot:?}");
                Ok(snapshot)
            }
            Err(err) => {
                tracing::warn!("ignoring parameter state: {err}");
                Err(err)
            }
        }
    }
}
