//! Mathematical utility functions for DSP.
//!
//! Small, allocation-free helpers shared by the harmonic pipeline. Everything
//! here is `no_std` and safe to call from the audio thread.
//!
//! # Level Conversions
//!
//! - [`linear_to_db`] - Convert linear gain to decibels
//!
//! # Signal Helpers
//!
//! - [`hard_clip`] - Symmetric limiting to ±threshold
//! - [`flush_denormal`] - Squash subnormal values to zero
//! - [`wet_dry_mix`] - Linear crossfade with exact endpoints

use libm::logf;

/// Convert linear gain to decibels.
///
/// # Arguments
/// * `linear` - Linear gain value (values below 1e-10 are floored)
///
/// # Returns
/// Value in decibels
///
/// # Example
/// ```rust
/// use overtone_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Hard clip to ±threshold range.
///
/// # Arguments
/// * `x` - Input sample
/// * `threshold` - Clipping threshold
///
/// # Returns
/// Hard-clipped output in range [-threshold, threshold]
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal arithmetic is dramatically slower on most architectures. This
/// function replaces values below 1e-20 with zero, leaving margin before the
/// IEEE 754 subnormal range begins.
///
/// Applied at block entry to every persistent filter and envelope register.
///
/// Reference: IEEE 754-2008, Section 3.4 (Subnormal numbers)
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// Computes `wet * mix + dry * (1 - mix)`. Unlike the one-multiply form
/// `dry + (wet - dry) * mix`, both endpoints are exact: `mix == 0.0` returns
/// `dry` bit-for-bit and `mix == 1.0` returns `wet` bit-for-bit.
///
/// # Arguments
///
/// * `dry` - Unprocessed signal
/// * `wet` - Processed signal
/// * `mix` - Blend factor in \[0.0, 1.0\]: 0.0 = all dry, 1.0 = all wet
///
/// # Example
/// ```rust
/// use overtone_core::wet_dry_mix;
///
/// assert_eq!(wet_dry_mix(0.3, 0.9, 0.0), 0.3);
/// assert_eq!(wet_dry_mix(0.3, 0.9, 1.0), 0.9);
/// ```
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    wet * mix + dry * (1.0 - mix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_db_reference_points() {
        assert!(linear_to_db(1.0).abs() < 1e-5);
        assert!((linear_to_db(0.1) + 20.0).abs() < 1e-3);
        assert!((linear_to_db(0.0) + 200.0).abs() < 1e-3, "floored at 1e-10");
    }

    #[test]
    fn test_hard_clip() {
        assert_eq!(hard_clip(1.5, 1.0), 1.0);
        assert_eq!(hard_clip(-1.5, 1.0), -1.0);
        assert_eq!(hard_clip(0.25, 1.0), 0.25);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-30), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(f32::MIN_POSITIVE / 2.0), 0.0);
        assert_eq!(flush_denormal(1e-10), 1e-10);
        assert_eq!(flush_denormal(-0.5), -0.5);
    }

    #[test]
    fn test_wet_dry_mix_endpoints_are_exact() {
        let dry = 0.123_456_7;
        let wet = -0.987_654_3;
        assert_eq!(wet_dry_mix(dry, wet, 0.0).to_bits(), dry.to_bits());
        assert_eq!(wet_dry_mix(dry, wet, 1.0).to_bits(), wet.to_bits());
    }

    #[test]
    fn test_wet_dry_mix_midpoint() {
        let out = wet_dry_mix(0.0, 1.0, 0.5);
        assert!((out - 0.5).abs() < 1e-7);
    }

    #[test]
    fn test_wet_dry_mix_stays_bounded() {
        // Convex combination of values in [-1, 1] must not round past 1.0.
        for i in 0..=1000 {
            let mix = i as f32 / 1000.0;
            assert!(wet_dry_mix(1.0, 1.0, mix) <= 1.0, "mix={mix}");
            assert!(wet_dry_mix(-1.0, -1.0, mix) >= -1.0, "mix={mix}");
        }
    }
}
