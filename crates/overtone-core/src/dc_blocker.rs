//! DC blocking filter for removing offset introduced by the waveshaper.
//!
//! The even-order term of the harmonic shaper is not zero-mean, so every
//! processed block carries a small positive bias. [`DcBlocker`] removes it with
//! a fixed high-pass at ~10 Hz.
//!
//! The filter keeps **two** coefficient sets: one designed for the base sample
//! rate and one for the oversampled rate. The set in use follows the current
//! processing path ([`ProcessingRate`]), so the cutoff stays at the same
//! absolute frequency whether or not oversampling is enabled. Both sets drive
//! the same delay registers, so switching paths never resets history.
//!
//! ## Transfer Functions
//!
//! ```text
//! FirstOrder:  H(z) = b0 (1 - z^-1) / (1 + a1 z^-1)          (bilinear, prewarped)
//! SecondOrder: RBJ high-pass, Q = 1/sqrt(2)                  (Butterworth)
//! ```

use core::f64::consts::FRAC_1_SQRT_2;

use crate::biquad::{
    BiquadCoefficients, BiquadState, first_order_highpass_coefficients, highpass_coefficients,
};
use crate::oversample::{OVERSAMPLE_FACTOR, ProcessingRate};

/// Filter order of the DC blocker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DcSlope {
    /// 6 dB/octave first-order high-pass (default).
    #[default]
    FirstOrder,
    /// 12 dB/octave Butterworth high-pass.
    SecondOrder,
}

/// Per-channel DC blocking filter.
///
/// ## Example
///
/// ```rust
/// use overtone_core::{DcBlocker, ProcessingRate};
///
/// let mut blocker = DcBlocker::new(48000.0);
///
/// // Signal with a 0.1 DC offset
/// let output = blocker.process(0.5 + 0.1, ProcessingRate::Base);
/// assert!(output.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct DcBlocker {
    /// Cutoff frequency in Hz
    cutoff_hz: f64,
    /// Filter order
    slope: DcSlope,
    /// Coefficients at the base sample rate
    base: BiquadCoefficients,
    /// Coefficients at `OVERSAMPLE_FACTOR` × base rate
    oversampled: BiquadCoefficients,
    /// Delay registers shared by both coefficient sets
    state: BiquadState,
}

impl DcBlocker {
    /// Default cutoff frequency in Hz.
    pub const DEFAULT_CUTOFF_HZ: f64 = 10.0;

    /// Create a DC blocker with the default 10 Hz first-order response.
    ///
    /// # Arguments
    /// * `sample_rate` - Base (non-oversampled) sample rate in Hz
    pub fn new(sample_rate: f64) -> Self {
        Self::with_settings(sample_rate, Self::DEFAULT_CUTOFF_HZ, DcSlope::default())
    }

    /// Create a DC blocker with an explicit cutoff and slope.
    ///
    /// The cutoff is clamped to `[0.1, 0.45 × sample_rate]`.
    pub fn with_settings(sample_rate: f64, cutoff_hz: f64, slope: DcSlope) -> Self {
        let mut blocker = Self {
            cutoff_hz,
            slope,
            base: BiquadCoefficients::PASSTHROUGH,
            oversampled: BiquadCoefficients::PASSTHROUGH,
            state: BiquadState::new(),
        };
        blocker.set_sample_rate(sample_rate);
        blocker
    }

    /// Recompute both coefficient sets for a new base sample rate.
    ///
    /// Delay registers are left untouched; call [`reset`](Self::reset) on
    /// stream restart.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        let cutoff = self.cutoff_hz.clamp(0.1, 0.45 * sample_rate);
        self.base = self.design(cutoff, sample_rate);
        self.oversampled = self.design(cutoff, sample_rate * OVERSAMPLE_FACTOR as f64);
    }

    fn design(&self, cutoff: f64, sample_rate: f64) -> BiquadCoefficients {
        match self.slope {
            DcSlope::FirstOrder => first_order_highpass_coefficients(cutoff, sample_rate),
            DcSlope::SecondOrder => highpass_coefficients(cutoff, FRAC_1_SQRT_2, sample_rate),
        }
    }

    /// Process a single sample at the given rate.
    #[inline]
    pub fn process(&mut self, input: f32, rate: ProcessingRate) -> f32 {
        let coeffs = match rate {
            ProcessingRate::Base => &self.base,
            ProcessingRate::Oversampled => &self.oversampled,
        };
        self.state.process(coeffs, input)
    }

    /// Filter a buffer in place at the given rate.
    pub fn process_block(&mut self, buffer: &mut [f32], rate: ProcessingRate) {
        let coeffs = match rate {
            ProcessingRate::Base => self.base,
            ProcessingRate::Oversampled => self.oversampled,
        };
        for sample in buffer.iter_mut() {
            *sample = self.state.process(&coeffs, *sample);
        }
    }

    /// Reset the delay registers to zero.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Flush subnormal register values to zero.
    pub fn flush_denormals(&mut self) {
        self.state.flush_denormals();
    }

    /// Returns `true` if the delay registers are cleared.
    pub fn is_reset(&self) -> bool {
        self.state.is_cleared()
    }

    /// Coefficients used for the given rate.
    pub fn coefficients(&self, rate: ProcessingRate) -> &BiquadCoefficients {
        match rate {
            ProcessingRate::Base => &self.base,
            ProcessingRate::Oversampled => &self.oversampled,
        }
    }

    /// Cutoff frequency in Hz.
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    /// Filter order.
    pub fn slope(&self) -> DcSlope {
        self.slope
    }
}
