//! The stereo harmonic generator pipeline.
//!
//! Per block, in order:
//!
//! 1. Validate the call (state, channel count, lengths, capacity).
//! 2. Snapshot parameters once.
//! 3. Flush subnormal filter/envelope state.
//! 4. Copy the dry input, then limit the wet input to ±[`SHAPE_INPUT_LIMIT`].
//! 5. If oversampling: upsample → shape → DC filter (4× coefficients) → downsample.
//!    Otherwise: shape → DC filter (base coefficients).
//! 6. Clamp the wet path to [-1, 1].
//! 7. Crossfade with the dry copy.
//!
//! ## Lifecycle
//!
//! ```text
//!               prepare                 process_block
//! Unprepared ───────────► Prepared ───────────────────► Processing
//!      ▲                     ▲  │ prepare                  │
//!      │      release        │  └──────────────────────────┤ prepare
//!      └─────────────────────┴─────────────────────────────┘ release
//! ```
//!
//! `prepare` and `release` allocate; `process_block` never does.

use std::sync::Arc;

use overtone_core::{
    DcBlocker, HarmonicShaper, MAX_CHANNELS, Oversampler, ProcessingRate, SHAPE_INPUT_LIMIT,
    hard_clip,
};

use crate::config::ProcessorConfig;
use crate::error::ProcessorError;
use crate::layout::{BusLayout, CHANNELS};
use crate::mixer::DrySnapshot;
use crate::params::{HarmonicParams, ParamSource};

/// Lifecycle state of a [`HarmonicProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// No buffers allocated; `process_block` is rejected.
    Unprepared,
    /// Buffers allocated and state cleared; no block processed yet.
    Prepared,
    /// At least one block processed since the last `prepare`.
    Processing,
}

/// Stereo harmonic generator.
///
/// Generic over the parameter source so hosts can plug in their own store;
/// the default is the atomic [`HarmonicParams`].
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use overtone_processor::{HarmonicParams, HarmonicProcessor};
///
/// let params = Arc::new(HarmonicParams::new());
/// params.set_second_harmonic(0.5);
///
/// let mut processor = HarmonicProcessor::new(Arc::clone(&params));
/// processor.prepare(48000.0, 256)?;
///
/// let mut left = vec![0.25f32; 256];
/// let mut right = vec![0.25f32; 256];
/// processor.process_block(&mut [&mut left, &mut right])?;
/// # Ok::<(), overtone_processor::ProcessorError>(())
/// ```
#[derive(Debug)]
pub struct HarmonicProcessor<P: ParamSource = HarmonicParams> {
    params: Arc<P>,
    config: ProcessorConfig,
    state: ProcessorState,
    sample_rate: f64,
    max_block: usize,
    shaper: HarmonicShaper,
    dc: [DcBlocker; MAX_CHANNELS],
    oversampler: Oversampler,
    dry: DrySnapshot,
    /// Oversampling switch as seen by the previous block.
    was_oversampling: bool,
}

impl<P: ParamSource> HarmonicProcessor<P> {
    /// Creates an unprepared processor with the default DC filter.
    pub fn new(params: Arc<P>) -> Self {
        Self::with_config(params, ProcessorConfig::default())
    }

    /// Creates an unprepared processor with explicit settings.
    pub fn with_config(params: Arc<P>, config: ProcessorConfig) -> Self {
        let sample_rate = 48000.0;
        let dc = DcBlocker::with_settings(sample_rate, config.dc_cutoff_hz, config.dc_slope);
        Self {
            params,
            config,
            state: ProcessorState::Unprepared,
            sample_rate,
            max_block: 0,
            shaper: HarmonicShaper::new(),
            dc: [dc.clone(), dc],
            oversampler: Oversampler::new(),
            dry: DrySnapshot::new(),
            was_oversampling: true,
        }
    }

    /// Checks a host-offered bus layout. Only stereo in / stereo out passes.
    pub fn negotiate_layout(&self, layout: BusLayout) -> Result<BusLayout, ProcessorError> {
        layout.negotiate()
    }

    /// Allocates buffers for blocks of up to `max_block` samples, computes
    /// filter coefficients for `sample_rate` and clears all state.
    ///
    /// Valid from any state; the processor ends up `Prepared`.
    ///
    /// # Errors
    /// [`ProcessorError::InvalidSampleRate`] if `sample_rate` is not finite
    /// and positive. The processor is left unchanged in that case.
    pub fn prepare(&mut self, sample_rate: f64, max_block: usize) -> Result<(), ProcessorError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            tracing::warn!("rejecting sample rate {sample_rate}");
            return Err(ProcessorError::InvalidSampleRate(sample_rate));
        }

        self.sample_rate = sample_rate;
        self.max_block = max_block;
        let ProcessorConfig {
            dc_cutoff_hz,
            dc_slope,
        } = self.config;
        for dc in &mut self.dc {
            *dc = DcBlocker::with_settings(sample_rate, dc_cutoff_hz, dc_slope);
        }
        self.shaper.reset();
        self.oversampler.prepare(max_block);
        self.dry.prepare(max_block);
        self.was_oversampling = self.params.oversampling_enabled();
        self.state = ProcessorState::Prepared;

        tracing::info!(
            sample_rate,
            max_block,
            latency = self.latency_samples(),
            "harmonic processor prepared"
        );
        Ok(())
    }

    /// Drops the processing buffers and returns to `Unprepared`.
    pub fn release(&mut self) {
        self.oversampler.release();
        self.dry.release();
        self.max_block = 0;
        self.state = ProcessorState::Unprepared;
        tracing::debug!("harmonic processor released");
    }

    /// Clears envelope and filter state without touching allocations.
    pub fn reset(&mut self) {
        self.shaper.reset();
        for dc in &mut self.dc {
            dc.reset();
        }
        self.oversampler.reset();
        tracing::debug!("harmonic processor reset");
    }

    /// Processes one stereo block in place.
    ///
    /// `channels` must hold exactly two slices of equal length, no longer
    /// than the `max_block` given to [`prepare`](Self::prepare).
    ///
    /// # Errors
    /// - [`ProcessorError::NotPrepared`] before `prepare` / after `release`
    /// - [`ProcessorError::ChannelMismatch`] if not exactly two channels
    /// - [`ProcessorError::ChannelLengthMismatch`] if the channels differ in length
    /// - [`ProcessorError::BlockTooLarge`] if the block exceeds capacity
    ///
    /// Buffers are untouched when an error is returned.
    pub fn process_block(&mut self, channels: &mut [&mut [f32]]) -> Result<(), ProcessorError> {
        let got = channels.len();
        let [left, right] = channels else {
            return Err(ProcessorError::ChannelMismatch {
                expected: CHANNELS,
                got,
            });
        };
        self.process_stereo(left, right)
    }

    /// Processes one stereo block given as two slices.
    ///
    /// Same contract as [`process_block`](Self::process_block).
    pub fn process_stereo(
        &mut self,
        left: &mut [f32],
        right: &mut [f32],
    ) -> Result<(), ProcessorError> {
        if self.state == ProcessorState::Unprepared {
            return Err(ProcessorError::NotPrepared);
        }
        if left.len() != right.len() {
            return Err(ProcessorError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        if left.len() > self.max_block {
            return Err(ProcessorError::BlockTooLarge {
                requested: left.len(),
                capacity: self.max_block,
            });
        }
        self.state = ProcessorState::Processing;

        let params = self.params.snapshot().sanitized();
        let gains = params.gains();

        self.shaper.flush_denormals();
        for dc in &mut self.dc {
            dc.flush_denormals();
        }
        self.oversampler.flush_denormals();

        self.dry.capture(left, right);

        // Past this magnitude the shaper saturates anyway; the limit keeps
        // the half-band and envelope state finite for any finite input.
        for sample in left.iter_mut().chain(right.iter_mut()) {
            *sample = hard_clip(*sample, SHAPE_INPUT_LIMIT);
        }

        if params.oversampling {
            if !self.was_oversampling {
                self.oversampler.reset();
            }
            let mut block = self.oversampler.process_up(left, right)?;
            let (up_left, up_right) = block.channels_mut();
            for (ch, buffer) in [up_left, up_right].into_iter().enumerate() {
                self.shaper.process_block(ch, buffer, gains);
                self.dc[ch].process_block(buffer, ProcessingRate::Oversampled);
            }
            block.process_down(left, right);
        } else {
            for (ch, buffer) in [&mut *left, &mut *right].into_iter().enumerate() {
                self.shaper.process_block(ch, buffer, gains);
                self.dc[ch].process_block(buffer, ProcessingRate::Base);
            }
        }
        self.was_oversampling = params.oversampling;

        for sample in left.iter_mut().chain(right.iter_mut()) {
            *sample = hard_clip(*sample, 1.0);
        }

        self.dry.mix_into(left, right, params.mix);
        Ok(())
    }

    /// Latency of the oversampled path in base-rate samples.
    ///
    /// This is the group delay of the half-band cascade. The base-rate path
    /// (oversampling off) adds no delay; the figure does not follow the
    /// switch, so host delay compensation never changes mid-stream but is
    /// only exact while oversampling is on.
    pub fn latency_samples(&self) -> f32 {
        self.oversampler.latency_samples()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// Sample rate given to the last successful `prepare`.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Maximum block size given to the last `prepare` (0 when unprepared).
    pub fn max_block_size(&self) -> usize {
        self.max_block
    }

    /// Processor settings.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Shared parameter source.
    pub fn params(&self) -> &Arc<P> {
        &self.params
    }

    /// Envelope level of `channel`, for metering and tests.
    pub fn envelope(&self, channel: usize) -> f32 {
        self.shaper.envelope(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSnapshot;

    fn processor(snapshot: ParamSnapshot) -> HarmonicProcessor<ParamSnapshot> {
        let mut p = HarmonicProcessor::new(Arc::new(snapshot));
        p.prepare(44100.0, 64).unwrap();
        p
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut p = HarmonicProcessor::new(Arc::new(HarmonicParams::new()));
        assert_eq!(p.state(), ProcessorState::Unprepared);

        let mut l = [0.0f32; 16];
        let mut r = [0.0f32; 16];
        assert_eq!(
            p.process_block(&mut [&mut l, &mut r]),
            Err(ProcessorError::NotPrepared)
        );

        p.prepare(48000.0, 16).unwrap();
        assert_eq!(p.state(), ProcessorState::Prepared);

        p.process_block(&mut [&mut l, &mut r]).unwrap();
        assert_eq!(p.state(), ProcessorState::Processing);

        p.prepare(96000.0, 32).unwrap();
        assert_eq!(p.state(), ProcessorState::Prepared);

        p.release();
        assert_eq!(p.state(), ProcessorState::Unprepared);
        assert_eq!(
            p.process_block(&mut [&mut l, &mut r]),
            Err(ProcessorError::NotPrepared)
        );
    }

    #[test]
    fn test_invalid_sample_rate_rejected() {
        let mut p = HarmonicProcessor::new(Arc::new(HarmonicParams::new()));
        for rate in [0.0, -44100.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                p.prepare(rate, 64),
                Err(ProcessorError::InvalidSampleRate(_))
            ));
        }
        assert_eq!(p.state(), ProcessorState::Unprepared);
    }

    #[test]
    fn test_block_larger_than_capacity_is_rejected() {
        let mut p = processor(ParamSnapshot::default());
        let mut l = vec![0.5f32; 65];
        let mut r = vec![0.5f32; 65];
        assert_eq!(
            p.process_block(&mut [&mut l, &mut r]),
            Err(ProcessorError::BlockTooLarge {
                requested: 65,
                capacity: 64
            })
        );
        assert!(l.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_wrong_channel_shapes_are_rejected() {
        let mut p = processor(ParamSnapshot::default());
        let mut a = [0.0f32; 8];
        let mut b = [0.0f32; 8];
        let mut c = [0.0f32; 8];
        assert_eq!(
            p.process_block(&mut [&mut a]),
            Err(ProcessorError::ChannelMismatch {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            p.process_block(&mut [&mut a, &mut b, &mut c]),
            Err(ProcessorError::ChannelMismatch {
                expected: 2,
                got: 3
            })
        );
        let mut short = [0.0f32; 4];
        assert_eq!(
            p.process_block(&mut [&mut a, &mut short]),
            Err(ProcessorError::ChannelLengthMismatch { left: 8, right: 4 })
        );
    }

    #[test]
    fn test_smaller_blocks_are_fine() {
        let mut p = processor(ParamSnapshot::default());
        for len in [0, 1, 7, 63, 64] {
            let mut l = vec![0.1f32; len];
            let mut r = vec![0.1f32; len];
            p.process_block(&mut [&mut l, &mut r]).unwrap();
        }
    }

    #[test]
    fn test_latency_is_constant_across_switch() {
        let params = Arc::new(HarmonicParams::new());
        let mut p = HarmonicProcessor::new(Arc::clone(&params));
        p.prepare(44100.0, 32).unwrap();
        let on = p.latency_samples();

        params.set_oversampling(false);
        let mut l = [0.2f32; 32];
        let mut r = [0.2f32; 32];
        p.process_block(&mut [&mut l, &mut r]).unwrap();
        assert_eq!(p.latency_samples(), on);
        assert!(on > 0.0);
    }

    #[test]
    fn test_base_rate_path_has_no_delay() {
        let peak_index = |oversampling: bool| {
            let mut p = processor(ParamSnapshot {
                oversampling,
                ..ParamSnapshot::default()
            });
            let mut l = [0.0f32; 64];
            l[0] = 0.5;
            let mut r = l;
            p.process_block(&mut [&mut l, &mut r]).unwrap();
            l.iter()
                .enumerate()
                .fold((0, 0.0f32), |best, (i, s)| {
                    if s.abs() > best.1 { (i, s.abs()) } else { best }
                })
                .0
        };
        assert_eq!(peak_index(false), 0);
        assert!(peak_index(true) > 0);
    }

    #[test]
    fn test_huge_sample_does_not_poison_state() {
        for oversampling in [false, true] {
            let mut p = processor(ParamSnapshot {
                second_harmonic: 0.5,
                third_harmonic: 0.0,
                mix: 1.0,
                oversampling,
            });
            let mut l = [0.1f32; 64];
            let mut r = [0.1f32; 64];
            l[0] = 1.0e13;
            r[0] = f32::MAX;
            l[1] = -f32::MAX;
            p.process_block(&mut [&mut l, &mut r]).unwrap();
            assert!(l.iter().chain(&r).all(|s| (-1.0..=1.0).contains(s)));

            for _ in 0..100 {
                let mut l = [0.1f32; 64];
                let mut r = [0.1f32; 64];
                p.process_block(&mut [&mut l, &mut r]).unwrap();
                assert!(
                    l.iter().chain(&r).all(|s| s.is_finite() && s.abs() <= 1.0),
                    "oversampling {oversampling}: {l:?}"
                );
            }
            assert!(p.envelope(0).is_finite() && p.envelope(1).is_finite());
        }
    }

    #[test]
    fn test_reset_clears_envelopes() {
        let mut p = processor(ParamSnapshot {
            second_harmonic: 1.0,
            ..ParamSnapshot::default()
        });
        let mut l = [0.5f32; 64];
        let mut r = [0.5f32; 64];
        p.process_block(&mut [&mut l, &mut r]).unwrap();
        assert!(p.envelope(0) > 0.0);

        p.reset();
        assert_eq!(p.envelope(0), 0.0);
        assert_eq!(p.envelope(1), 0.0);
        assert_eq!(p.state(), ProcessorState::Processing);
    }

    #[test]
    fn test_toggling_oversampling_mid_stream() {
        let params = Arc::new(HarmonicParams::new());
        params.set_second_harmonic(0.5);
        let mut p = HarmonicProcessor::new(Arc::clone(&params));
        p.prepare(48000.0, 128).unwrap();

        for i in 0..20 {
            params.set_oversampling(i % 3 != 0);
            let mut l: Vec<f32> = (0..128)
                .map(|n| ((n + i * 128) as f32 * 0.05).sin() * 0.8)
                .collect();
            let mut r = l.clone();
            p.process_block(&mut [&mut l, &mut r]).unwrap();
            assert!(l.iter().chain(&r).all(|s| s.is_finite() && s.abs() <= 1.0));
        }
    }
}
