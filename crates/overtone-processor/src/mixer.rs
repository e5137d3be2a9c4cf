//! Dry snapshot and wet/dry crossfade.
//!
//! The dry copy is taken before any in-place processing and blended back in
//! after the wet path has been clamped. Both endpoints are exact: `mix == 1.0`
//! leaves the wet samples untouched and `mix == 0.0` copies the dry samples
//! back verbatim.

use overtone_core::wet_dry_mix;

use crate::layout::CHANNELS;

/// Pre-sized stereo copy of a block's input.
#[derive(Debug, Clone, Default)]
pub struct DrySnapshot {
    channels: [Vec<f32>; CHANNELS],
    len: usize,
}

impl DrySnapshot {
    /// Creates an empty snapshot with zero capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes both channels for `max_block` samples.
    pub fn prepare(&mut self, max_block: usize) {
        for ch in &mut self.channels {
            ch.clear();
            ch.resize(max_block, 0.0);
        }
        self.len = 0;
    }

    /// Drops the buffers.
    pub fn release(&mut self) {
        self.channels = [Vec::new(), Vec::new()];
        self.len = 0;
    }

    /// Capacity in samples per channel.
    pub fn capacity(&self) -> usize {
        self.channels[0].len()
    }

    /// Copies the input block.
    ///
    /// # Panics
    /// Panics if the block is longer than the prepared capacity; callers
    /// check capacity first.
    pub fn capture(&mut self, left: &[f32], right: &[f32]) {
        self.len = left.len();
        self.channels[0][..left.len()].copy_from_slice(left);
        self.channels[1][..right.len()].copy_from_slice(right);
    }

    /// Captured samples of `channel`.
    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.channels[channel][..self.len]
    }

    /// Blends the captured dry signal into the wet buffers in place.
    pub fn mix_into(&self, left: &mut [f32], right: &mut [f32], mix: f32) {
        if mix >= 1.0 {
            return;
        }
        for (wet, dry) in [left, right].into_iter().zip(&self.channels) {
            let dry = &dry[..wet.len()];
            if mix <= 0.0 {
                wet.copy_from_slice(dry);
            } else {
                for (w, &d) in wet.iter_mut().zip(dry) {
                    *w = wet_dry_mix(d, *w, mix);
                }
            }
        }
    }
}
