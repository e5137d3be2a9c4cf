//! Biquad (bi-quadratic) filter structure.
//!
//! Coefficients and delay registers are kept apart: a [`BiquadCoefficients`]
//! value is derived from a sample rate and cutoff, while [`BiquadState`]
//! carries the per-channel history. One state can be driven by different
//! coefficient sets (e.g. base rate vs oversampled rate) without losing
//! continuity.
//!
//! High-pass designs use the RBJ Audio EQ Cookbook formulas and the bilinear
//! transform. Coefficients and registers are `f64`: at 10 Hz and 4x
//! oversampled rates the poles sit within 1e-4 of the unit circle, and `f32`
//! coefficient quantization can push a second-order section unstable.

use core::f64::consts::PI;
use libm::{cos, sin, tan};

/// Normalized biquad coefficients (`a0 == 1`).
///
/// Implements the Direct Form I difference equation:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// First-order sections are expressed with `b2 == a2 == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for x[n]
    pub b0: f64,
    /// Feedforward coefficient for x[n-1]
    pub b1: f64,
    /// Feedforward coefficient for x[n-2]
    pub b2: f64,
    /// Feedback coefficient for y[n-1]
    pub a1: f64,
    /// Feedback coefficient for y[n-2]
    pub a2: f64,
}

impl BiquadCoefficients {
    /// Identity filter: `y[n] = x[n]`.
    pub const PASSTHROUGH: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Builds coefficients from raw cookbook values, normalizing by `a0`.
    pub fn from_raw(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Returns `true` if the section is first order (`b2 == a2 == 0`).
    pub fn is_first_order(&self) -> bool {
        self.b2 == 0.0 && self.a2 == 0.0
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::PASSTHROUGH
    }
}

/// Direct Form I delay registers for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    /// Input delay line: x[n-1], x[n-2]
    x1: f64,
    x2: f64,
    /// Output delay line: y[n-1], y[n-2]
    y1: f64,
    y2: f64,
}

impl BiquadState {
    /// Creates a cleared state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a single sample with the given coefficients.
    #[inline]
    pub fn process(&mut self, c: &BiquadCoefficients, input: f32) -> f32 {
        let input = f64::from(input);
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output as f32
    }

    /// Clears the delay registers.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Flushes subnormal register values to zero.
    pub fn flush_denormals(&mut self) {
        for v in [&mut self.x1, &mut self.x2, &mut self.y1, &mut self.y2] {
            if v.abs() < 1e-20 {
                *v = 0.0;
            }
        }
    }

    /// Returns `true` if every register is exactly zero.
    pub fn is_cleared(&self) -> bool {
        self.x1 == 0.0 && self.x2 == 0.0 && self.y1 == 0.0 && self.y2 == 0.0
    }
}

/// Calculates second-order high-pass coefficients (RBJ cookbook).
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (`FRAC_1_SQRT_2` for Butterworth response)
/// * `sample_rate` - Sample rate in Hz
pub fn highpass_coefficients(frequency: f64, q: f64, sample_rate: f64) -> BiquadCoefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cos(omega);
    let sin_omega = sin(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    BiquadCoefficients::from_raw(b0, b1, b2, a0, a1, a2)
}

/// Calculates first-order high-pass coefficients via the bilinear transform.
///
/// ```text
/// K  = tan(pi * fc / fs)
/// H(z) = (1 - z^-1) / ((1 + K) + (K - 1) z^-1)
/// ```
///
/// The -3 dB point lands exactly on `frequency` (prewarped).
pub fn first_order_highpass_coefficients(frequency: f64, sample_rate: f64) -> BiquadCoefficients {
    let k = tan(PI * frequency / sample_rate);
    BiquadCoefficients::from_raw(1.0, -1.0, 0.0, 1.0 + k, k - 1.0, 0.0)
}
