//! Property-based tests for overtone-core DSP primitives.
//!
//! Tests the gate bypass, shaper boundedness, DC filter stability and the
//! oversampler's silence round trip using proptest for randomized input.

use proptest::prelude::*;
use overtone_core::{
    DcBlocker, DcSlope, HarmonicGains, HarmonicShaper, Oversampler, ProcessingRate,
    SILENCE_THRESHOLD, shape,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Input that never exceeds the silence threshold leaves a fresh shaper
    /// untouched, bit for bit, whatever the gains.
    #[test]
    fn gate_bypasses_sub_threshold_input(
        second in 0.0f32..=1.0,
        third in 0.0f32..=1.0,
        input in prop::collection::vec(-SILENCE_THRESHOLD..=SILENCE_THRESHOLD, 1..512),
    ) {
        let mut shaper = HarmonicShaper::new();
        let mut block = input.clone();
        shaper.process_block(0, &mut block, HarmonicGains::from_amounts(second, third));
        prop_assert_eq!(block, input);
    }

    /// The transfer curve stays in [-1, 1] for any finite input.
    #[test]
    fn shape_is_bounded(
        x in prop_oneof![
            -1.0e6f32..1.0e6,
            prop::num::f32::NORMAL | prop::num::f32::SUBNORMAL | prop::num::f32::ZERO,
        ],
        second in 0.0f32..=1.0,
        third in 0.0f32..=1.0,
    ) {
        let y = shape(x, HarmonicGains::from_amounts(second, third));
        prop_assert!((-1.0..=1.0).contains(&y), "shape({}) = {}", x, y);
    }

    /// Zero harmonic amounts leave in-range samples unchanged.
    #[test]
    fn zero_amounts_are_identity(
        input in prop::collection::vec(-1.0f32..=1.0, 1..512),
    ) {
        let mut shaper = HarmonicShaper::new();
        let mut block = input.clone();
        shaper.process_block(1, &mut block, HarmonicGains::default());
        prop_assert_eq!(block, input);
    }

    /// The DC blocker stays finite for full-scale random input at either rate.
    #[test]
    fn dc_blocker_stability(
        sample_rate in 8000.0f64..384_000.0,
        second_order in any::<bool>(),
        oversampled in any::<bool>(),
        input in prop::array::uniform32(-1.0f32..=1.0),
    ) {
        let slope = if second_order { DcSlope::SecondOrder } else { DcSlope::FirstOrder };
        let rate = if oversampled { ProcessingRate::Oversampled } else { ProcessingRate::Base };
        let mut blocker = DcBlocker::with_settings(sample_rate, 10.0, slope);

        for _ in 0..32 {
            for &sample in &input {
                let out = blocker.process(sample, rate);
                prop_assert!(out.is_finite() && out.abs() < 4.0, "unstable output {}", out);
            }
        }
    }

    /// Up then down on silence yields silence regardless of block size.
    #[test]
    fn oversampler_silence_round_trip(block in 1usize..=512, blocks in 1usize..8) {
        let mut os = Oversampler::new();
        os.prepare(512);

        let mut left = vec![0.0f32; block];
        let mut right = vec![0.0f32; block];
        for _ in 0..blocks {
            let up = os.process_up(&left, &right).unwrap();
            up.process_down(&mut left, &mut right);
        }
        prop_assert!(left.iter().chain(right.iter()).all(|&s| s == 0.0));
    }

    /// Oversampled output of bounded input stays finite and below the
    /// cascade's L1 gain (about 4.9).
    #[test]
    fn oversampler_output_is_finite(
        input in prop::collection::vec(-1.0f32..=1.0, 1..256),
    ) {
        let mut os = Oversampler::new();
        os.prepare(256);

        let mut left = input.clone();
        let mut right = input;
        let up = os.process_up(&left, &right).unwrap();
        up.process_down(&mut left, &mut right);

        for &s in left.iter().chain(right.iter()) {
            prop_assert!(s.is_finite() && s.abs() < 5.0, "sample {}", s);
        }
    }
}
