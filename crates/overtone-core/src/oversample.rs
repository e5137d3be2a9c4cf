//! 4× stereo oversampler built from two cascaded half-band stages.
//!
//! Nonlinear processing generates harmonics that can exceed Nyquist and alias
//! back into the audible range. [`Oversampler`] raises the rate by 4 before the
//! nonlinearity and returns to the base rate afterwards:
//!
//! ```text
//! base ─► stage 1 up (2×) ─► stage 2 up (4×) ─► [process] ─► stage 2 down ─► stage 1 down ─► base
//! ```
//!
//! Stage 1 sees the full base band and carries the steeper filter
//! (8 coefficients, transition 0.05, ~-106 dB). Stage 2 only has to reject
//! images above 2× Nyquist, so it uses 4 coefficients (transition 0.10, ~-70 dB).
//!
//! ## Usage
//!
//! ```rust
//! use overtone_core::Oversampler;
//!
//! let mut os = Oversampler::new();
//! os.prepare(64);
//!
//! let mut left = [0.25f32; 64];
//! let mut right = [0.25f32; 64];
//!
//! let mut block = os.process_up(&left, &right)?;
//! let (l, r) = block.channels_mut();
//! assert_eq!(l.len(), 256);
//! for s in l.iter_mut().chain(r.iter_mut()) {
//!     *s *= 0.5;
//! }
//! block.process_down(&mut left, &mut right);
//! # Ok::<(), overtone_core::CapacityError>(())
//! ```
//!
//! The up/down pair is enforced by [`UpsampledBlock`]: the oversampler stays
//! borrowed until `process_down` consumes the guard.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::MAX_CHANNELS;
use crate::halfband::HalfBandStage;

/// Total oversampling factor.
pub const OVERSAMPLE_FACTOR: usize = 4;

/// Coefficient count of the first (base → 2×) stage.
pub const STAGE1_COEFFICIENTS: usize = 8;

/// Coefficient count of the second (2× → 4×) stage.
pub const STAGE2_COEFFICIENTS: usize = 4;

const STAGE1_TRANSITION: f64 = 0.05;
const STAGE2_TRANSITION: f64 = 0.10;

/// Which sample rate a processing path runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingRate {
    /// The host sample rate.
    #[default]
    Base,
    /// `OVERSAMPLE_FACTOR` × the host sample rate.
    Oversampled,
}

impl ProcessingRate {
    /// Multiplier relative to the base rate.
    pub const fn factor(self) -> usize {
        match self {
            Self::Base => 1,
            Self::Oversampled => OVERSAMPLE_FACTOR,
        }
    }
}

/// A block exceeded the capacity given to `prepare`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityError {
    /// Samples per channel in the rejected block.
    pub requested: usize,
    /// Prepared capacity in samples per channel.
    pub capacity: usize,
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block of {} samples exceeds prepared capacity of {}",
            self.requested, self.capacity
        )
    }
}

impl core::error::Error for CapacityError {}

#[derive(Debug, Clone)]
struct ChannelStages {
    first: HalfBandStage<STAGE1_COEFFICIENTS>,
    second: HalfBandStage<STAGE2_COEFFICIENTS>,
}

impl ChannelStages {
    fn new() -> Self {
        Self {
            first: HalfBandStage::new(STAGE1_TRANSITION),
            second: HalfBandStage::new(STAGE2_TRANSITION),
        }
    }
}

/// Stereo 4× polyphase IIR oversampler.
///
/// Filter state is per channel. Scratch buffers are allocated in
/// [`prepare`](Self::prepare) and never resized by the processing calls.
#[derive(Debug, Clone)]
pub struct Oversampler {
    stages: [ChannelStages; MAX_CHANNELS],
    /// 2× intermediate, shared by both channels.
    intermediate: Vec<f32>,
    /// 4× buffers handed out through [`UpsampledBlock`].
    oversampled: [Vec<f32>; MAX_CHANNELS],
    capacity: usize,
}

impl Default for Oversampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Oversampler {
    /// Creates an oversampler with zero capacity. Call [`prepare`](Self::prepare)
    /// before processing.
    pub fn new() -> Self {
        Self {
            stages: [ChannelStages::new(), ChannelStages::new()],
            intermediate: Vec::new(),
            oversampled: [Vec::new(), Vec::new()],
            capacity: 0,
        }
    }

    /// Allocates scratch for blocks of up to `max_block` base-rate samples and
    /// clears filter state.
    ///
    /// Buffers are only reallocated when the capacity changes.
    pub fn prepare(&mut self, max_block: usize) {
        if max_block != self.capacity {
            self.intermediate = vec![0.0; max_block * 2];
            self.oversampled = [
                vec![0.0; max_block * OVERSAMPLE_FACTOR],
                vec![0.0; max_block * OVERSAMPLE_FACTOR],
            ];
            self.capacity = max_block;
        }
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "oversampler prepared: capacity {max_block}, latency {:.3} samples",
            self.latency_samples()
        );
    }

    /// Drops scratch buffers. Capacity returns to zero.
    pub fn release(&mut self) {
        self.intermediate = Vec::new();
        self.oversampled = [Vec::new(), Vec::new()];
        self.capacity = 0;
        self.reset();
    }

    /// Clears every filter delay line without touching allocations.
    pub fn reset(&mut self) {
        for ch in &mut self.stages {
            ch.first.reset();
            ch.second.reset();
        }
    }

    /// Flushes subnormal values in all filter registers.
    pub fn flush_denormals(&mut self) {
        for ch in &mut self.stages {
            ch.first.flush_denormals();
            ch.second.flush_denormals();
        }
    }

    /// Returns `true` if every delay line is cleared.
    pub fn is_reset(&self) -> bool {
        self.stages
            .iter()
            .all(|ch| ch.first.is_reset() && ch.second.is_reset())
    }

    /// Prepared capacity in base-rate samples per channel.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oversampling factor (always [`OVERSAMPLE_FACTOR`]).
    pub fn factor(&self) -> usize {
        OVERSAMPLE_FACTOR
    }

    /// Round-trip latency of `process_up` + `process_down` at DC, in base-rate
    /// samples.
    ///
    /// Depends only on the filter coefficients.
    pub fn latency_samples(&self) -> f32 {
        let first = self.stages[0].first.group_delay();
        let second = self.stages[0].second.group_delay();
        // Each stage's up+down pair spans 2·τ − 1 samples at its high rate.
        ((2.0 * first - 1.0) / 2.0 + (2.0 * second - 1.0) / 4.0) as f32
    }

    /// Upsamples a stereo block by 4.
    ///
    /// # Errors
    /// Returns [`CapacityError`] if the block is longer than the prepared
    /// capacity. No state is touched in that case.
    ///
    /// # Panics
    /// Panics if `left` and `right` differ in length.
    pub fn process_up(
        &mut self,
        left: &[f32],
        right: &[f32],
    ) -> Result<UpsampledBlock<'_>, CapacityError> {
        assert_eq!(left.len(), right.len(), "stereo channels differ in length");
        let len = left.len();
        if len > self.capacity {
            return Err(CapacityError {
                requested: len,
                capacity: self.capacity,
            });
        }

        let mid = &mut self.intermediate[..len * 2];
        for ((stages, out), input) in self
            .stages
            .iter_mut()
            .zip(self.oversampled.iter_mut())
            .zip([left, right])
        {
            stages.first.upsample(input, mid);
            stages.second.upsample(mid, &mut out[..len * OVERSAMPLE_FACTOR]);
        }

        Ok(UpsampledBlock {
            oversampler: self,
            len: len * OVERSAMPLE_FACTOR,
        })
    }

    fn downsample_into(&mut self, len: usize, left: &mut [f32], right: &mut [f32]) {
        let base_len = len / OVERSAMPLE_FACTOR;
        let mid = &mut self.intermediate[..base_len * 2];
        for ((stages, input), out) in self
            .stages
            .iter_mut()
            .zip(self.oversampled.iter())
            .zip([left, right])
        {
            stages.second.downsample(&input[..len], mid);
            stages.first.downsample(mid, &mut out[..base_len]);
        }
    }
}

/// An upsampled stereo block awaiting [`process_down`](Self::process_down).
///
/// Holds the oversampler's 4× buffers. Dropping the guard without calling
/// `process_down` leaves the downsampling filters one block behind.
#[must_use = "an upsampled block must be returned with `process_down`"]
#[derive(Debug)]
pub struct UpsampledBlock<'a> {
    oversampler: &'a mut Oversampler,
    len: usize,
}

impl UpsampledBlock<'_> {
    /// Samples per channel at the oversampled rate.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the block holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Mutable access to one oversampled channel.
    ///
    /// # Panics
    /// Panics if `channel >= MAX_CHANNELS`.
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        &mut self.oversampler.oversampled[channel][..self.len]
    }

    /// Mutable access to both oversampled channels.
    pub fn channels_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        let [left, right] = &mut self.oversampler.oversampled;
        (&mut left[..self.len], &mut right[..self.len])
    }

    /// Low-pass filters and decimates the block back into the base-rate buffers.
    ///
    /// # Panics
    /// Panics if either output is shorter than the block given to
    /// [`Oversampler::process_up`].
    pub fn process_down(self, left: &mut [f32], right: &mut [f32]) {
        self.oversampler.downsample_into(self.len, left, right);
    }
}
