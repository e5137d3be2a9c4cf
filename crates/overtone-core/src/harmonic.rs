//! Envelope-gated harmonic waveshaper.
//!
//! Adds bounded 2nd- and 3rd-order harmonic content to each sample:
//!
//! ```text
//! second = tanh(x + 0.3·x²) − tanh(x)     asymmetric, even-harmonic dominant
//! third  = x³                             odd-symmetric, 3rd-harmonic dominant
//! y      = clamp(x + g2·second + g3·third, −1, 1)
//! ```
//!
//! A one-pole follower on `|x|` gates the shaper: while the envelope sits at or
//! below [`SILENCE_THRESHOLD`], samples pass through untouched so the noise
//! floor is not modulated into harmonic buzz. The envelope is updated on every
//! sample regardless of the gate decision and persists across blocks.
//!
//! The follower uses a fixed per-sample coefficient. At the oversampled rate
//! the same coefficient applies, so its time constant in seconds scales with
//! the processing rate.

use libm::tanhf;

use crate::MAX_CHANNELS;

/// Envelope follower smoothing coefficient (per sample).
pub const ENVELOPE_ATTACK: f32 = 0.005;

/// Envelope level at or below which samples bypass the shaper.
pub const SILENCE_THRESHOLD: f32 = 1.0e-4;

/// Scale from the second-harmonic amount parameter to its gain.
pub const SECOND_GAIN_SCALE: f32 = 0.25;

/// Scale from the third-harmonic amount parameter to its gain.
pub const THIRD_GAIN_SCALE: f32 = 1.5;

/// Quadratic bias inside the second-order term.
const SECOND_ORDER_BIAS: f32 = 0.3;

/// Input magnitude above which the curve is saturated at ±1.
///
/// `x³` stays finite here, so no term can reach infinity (and `0 · inf`
/// cannot turn into NaN) for any finite input.
pub const SHAPE_INPUT_LIMIT: f32 = 1.0e4;

/// Harmonic gains derived from the user-facing amounts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HarmonicGains {
    /// Gain applied to the second-order term.
    pub second: f32,
    /// Gain applied to the third-order term.
    pub third: f32,
}

impl HarmonicGains {
    /// Converts amounts in [0, 1] to gains.
    pub fn from_amounts(second_amount: f32, third_amount: f32) -> Self {
        Self {
            second: second_amount * SECOND_GAIN_SCALE,
            third: third_amount * THIRD_GAIN_SCALE,
        }
    }

    /// Returns `true` if both gains are zero.
    pub fn is_zero(&self) -> bool {
        self.second == 0.0 && self.third == 0.0
    }
}

/// The memoryless transfer curve (no gate).
///
/// Input is limited to ±[`SHAPE_INPUT_LIMIT`] first. Beyond that the
/// linear and cubic terms share the sign of `x` and the bounded second-order
/// term cannot pull the sum back inside [-1, 1], so the output is the same
/// ±1 it would be without the limit.
///
/// # Example
///
/// ```rust
/// use overtone_core::{HarmonicGains, shape};
///
/// let gains = HarmonicGains::from_amounts(1.0, 0.0);
/// assert!(shape(0.5, gains) > 0.5);
/// assert_eq!(shape(2.0, gains), 1.0);
/// ```
#[inline]
pub fn shape(x: f32, gains: HarmonicGains) -> f32 {
    let x = x.clamp(-SHAPE_INPUT_LIMIT, SHAPE_INPUT_LIMIT);
    let second = tanhf(x + SECOND_ORDER_BIAS * x * x) - tanhf(x);
    let third = x * x * x;
    (x + gains.second * second + gains.third * third).clamp(-1.0, 1.0)
}

/// Envelope follower state for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelEnvelope {
    level: f32,
}

impl ChannelEnvelope {
    /// Advances the follower by one sample and returns the new level.
    #[inline]
    pub fn update(&mut self, x: f32) -> f32 {
        self.level = (1.0 - ENVELOPE_ATTACK) * self.level + ENVELOPE_ATTACK * x.abs();
        self.level
    }

    /// Current envelope level.
    pub fn level(&self) -> f32 {
        self.level
    }
}

/// Stereo envelope-gated harmonic generator.
///
/// Channel state is indexed by channel number and never shared.
///
/// ## Example
///
/// ```rust
/// use overtone_core::{HarmonicGains, HarmonicShaper};
///
/// let mut shaper = HarmonicShaper::new();
/// let gains = HarmonicGains::from_amounts(0.5, 0.2);
///
/// let mut block = [0.3f32; 512];
/// shaper.process_block(0, &mut block, gains);
/// assert!(block.iter().all(|s| (-1.0..=1.0).contains(s)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HarmonicShaper {
    envelopes: [ChannelEnvelope; MAX_CHANNELS],
}

impl HarmonicShaper {
    /// Creates a shaper with both envelopes at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one sample on `channel`.
    ///
    /// # Panics
    /// Panics if `channel >= MAX_CHANNELS`.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, x: f32, gains: HarmonicGains) -> f32 {
        let envelope = self.envelopes[channel].update(x);
        if envelope <= SILENCE_THRESHOLD {
            x
        } else {
            shape(x, gains)
        }
    }

    /// Processes a buffer in place on `channel`.
    ///
    /// # Panics
    /// Panics if `channel >= MAX_CHANNELS`.
    pub fn process_block(&mut self, channel: usize, buffer: &mut [f32], gains: HarmonicGains) {
        let env = &mut self.envelopes[channel];
        for sample in buffer.iter_mut() {
            let x = *sample;
            if env.update(x) > SILENCE_THRESHOLD {
                *sample = shape(x, gains);
            }
        }
    }

    /// Envelope level of `channel`.
    pub fn envelope(&self, channel: usize) -> f32 {
        self.envelopes[channel].level()
    }

    /// Resets both envelopes to zero.
    pub fn reset(&mut self) {
        self.envelopes = [ChannelEnvelope::default(); MAX_CHANNELS];
    }

    /// Flushes subnormal envelope levels to zero.
    pub fn flush_denormals(&mut self) {
        for env in &mut self.envelopes {
            env.level = crate::flush_denormal(env.level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huge_finite_input_saturates() {
        for gains in [
            HarmonicGains::from_amounts(1.0, 0.0),
            HarmonicGains::from_amounts(0.0, 1.0),
            HarmonicGains::from_amounts(0.5, 0.5),
            HarmonicGains::default(),
        ] {
            for x in [1.0e13, f32::MAX, 2.0e4] {
                assert_eq!(shape(x, gains), 1.0, "shape({x}, {gains:?})");
                assert_eq!(shape(-x, gains), -1.0, "shape({}, {gains:?})", -x);
            }
        }
    }

    #[test]
    fn test_huge_sample_leaves_envelope_finite() {
        let mut shaper = HarmonicShaper::new();
        let gains = HarmonicGains::from_amounts(0.5, 0.0);
        let mut block = [f32::MAX, 0.1, 0.1, 0.1];
        shaper.process_block(0, &mut block, gains);
        assert!(block.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert!(shaper.envelope(0).is_finite());
    }

    #[test]
    fn test_gate_bypasses_quiet_input() {
        let mut shaper = HarmonicShaper::new();
        let gains = HarmonicGains::from_amounts(1.0, 1.0);

        let input: [f32; 8] = [1e-4, -1e-4, 5e-5, 0.0, -3e-5, 1e-4, 1e-4, -1e-4];
        let mut block = input;
        shaper.process_block(0, &mut block, gains);

        assert_eq!(block, input);
        assert!(shaper.envelope(0) <= SILENCE_THRESHOLD);
    }

    #[test]
    fn test_envelope_follows_abs_value() {
        let mut env = ChannelEnvelope::default();
        assert!((env.update(-1.0) - 0.005).abs() < 1e-9);
        assert!((env.update(1.0) - (0.995 * 0.005 + 0.005)).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_persists_across_blocks() {
        let mut shaper = HarmonicShaper::new();
        let gains = HarmonicGains::from_amounts(1.0, 0.0);

        let mut first = [0.5f32; 64];
        shaper.process_block(0, &mut first, gains);
        let level = shaper.envelope(0);
        assert!(level > SILENCE_THRESHOLD);

        // A quiet block right after loud material is still above the gate.
        let mut second = [0.001f32; 4];
        shaper.process_block(0, &mut second, gains);
        assert_ne!(second[0], 0.001);
    }

    #[test]
    fn test_zero_gains_is_identity() {
        let mut shaper = HarmonicShaper::new();
        let gains = HarmonicGains::from_amounts(0.0, 0.0);
        assert!(gains.is_zero());

        for i in 0..1000 {
            let x = libm::sinf(i as f32 * 0.05) * 0.9;
            assert_eq!(shaper.process_sample(1, x, gains), x);
        }
    }

    #[test]
    fn test_second_order_term_is_asymmetric() {
        let gains = HarmonicGains::from_amounts(1.0, 0.0);
        let pos = shape(0.5, gains) - 0.5;
        let neg = shape(-0.5, gains) + 0.5;
        // Even-order content pushes both polarities the same direction.
        assert!(pos > 0.0);
        assert!(neg > 0.0);
    }

    #[test]
    fn test_third_order_term() {
        let gains = HarmonicGains::from_amounts(0.0, 1.0);
        let y = shape(0.4, gains);
        assert!((y - (0.4 + 1.5 * 0.064)).abs() < 1e-6);
        assert_eq!(shape(-0.4, gains), -y);
    }

    #[test]
    fn test_output_is_clamped() {
        let gains = HarmonicGains::from_amounts(1.0, 1.0);
        assert_eq!(shape(0.9, gains), 1.0);
        assert_eq!(shape(-0.9, gains), -1.0);
        assert_eq!(shape(100.0, gains), 1.0);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut shaper = HarmonicShaper::new();
        let gains = HarmonicGains::from_amounts(1.0, 1.0);
        let mut left = [0.8f32; 32];
        shaper.process_block(0, &mut left, gains);

        assert!(shaper.envelope(0) > 0.0);
        assert_eq!(shaper.envelope(1), 0.0);
    }

    #[test]
    fn test_reset_and_flush() {
        let mut shaper = HarmonicShaper::new();
        shaper.process_sample(0, 0.5, HarmonicGains::default());
        shaper.reset();
        assert_eq!(shaper.envelope(0), 0.0);

        shaper.process_sample(1, 1e-30, HarmonicGains::default());
        assert!(shaper.envelope(1) > 0.0);
        shaper.flush_denormals();
        assert_eq!(shaper.envelope(1), 0.0);
    }
}
