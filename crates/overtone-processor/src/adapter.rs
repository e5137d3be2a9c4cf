//! Double-precision host buffers.
//!
//! Hosts that deliver `f64` audio go through [`DoublePrecisionAdapter`]: it
//! converts into pre-sized `f32` scratch, runs the single-precision pipeline
//! and converts back. Nothing is allocated per block.

use crate::error::ProcessorError;
use crate::layout::CHANNELS;
use crate::params::ParamSource;
use crate::pipeline::HarmonicProcessor;

/// Converts `f64` stereo blocks to and from the `f32` pipeline.
#[derive(Debug, Clone, Default)]
pub struct DoublePrecisionAdapter {
    scratch: [Vec<f32>; CHANNELS],
}

impl DoublePrecisionAdapter {
    /// Creates an adapter with zero capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes scratch for blocks of up to `max_block` samples.
    pub fn prepare(&mut self, max_block: usize) {
        for ch in &mut self.scratch {
            ch.clear();
            ch.resize(max_block, 0.0);
        }
    }

    /// Drops scratch.
    pub fn release(&mut self) {
        self.scratch = [Vec::new(), Vec::new()];
    }

    /// Capacity in samples per channel.
    pub fn capacity(&self) -> usize {
        self.scratch[0].len()
    }

    /// Processes one `f64` stereo block in place through `processor`.
    ///
    /// # Errors
    /// The same errors as [`HarmonicProcessor::process_block`]. A block
    /// larger than this adapter's own capacity is also
    /// [`ProcessorError::BlockTooLarge`].
    pub fn process_block_f64<P: ParamSource>(
        &mut self,
        processor: &mut HarmonicProcessor<P>,
        channels: &mut [&mut [f64]],
    ) -> Result<(), ProcessorError> {
        let got = channels.len();
        let [left, right] = channels else {
            return Err(ProcessorError::ChannelMismatch {
                expected: CHANNELS,
                got,
            });
        };
        if left.len() != right.len() {
            return Err(ProcessorError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        let len = left.len();
        if len > self.capacity() {
            return Err(ProcessorError::BlockTooLarge {
                requested: len,
                capacity: self.capacity(),
            });
        }

        let [scratch_l, scratch_r] = &mut self.scratch;
        let (scratch_l, scratch_r) = (&mut scratch_l[..len], &mut scratch_r[..len]);
        for (dst, src) in scratch_l.iter_mut().zip(left.iter()) {
            *dst = *src as f32;
        }
        for (dst, src) in scratch_r.iter_mut().zip(right.iter()) {
            *dst = *src as f32;
        }

        processor.process_stereo(scratch_l, scratch_r)?;

        for (dst, src) in left.iter_mut().zip(scratch_l.iter()) {
            *dst = f64::from(*src);
        }
        for (dst, src) in right.iter_mut().zip(scratch_r.iter()) {
            *dst = f64::from(*src);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSnapshot;
    use std::sync::Arc;

    #[test]
    fn test_matches_single_precision_path() {
        let params = Arc::new(ParamSnapshot {
            second_harmonic: 0.7,
            third_harmonic: 0.2,
            mix: 0.6,
            oversampling: true,
        });
        let mut p32 = HarmonicProcessor::new(Arc::clone(&params));
        let mut p64 = HarmonicProcessor::new(params);
        p32.prepare(48000.0, 128).unwrap();
        p64.prepare(48000.0, 128).unwrap();
        let mut adapter = DoublePrecisionAdapter::new();
        adapter.prepare(128);

        for block in 0..8 {
            let source: Vec<f32> = (0..128)
                .map(|n| ((block * 128 + n) as f32 * 0.031).sin() * 0.7)
                .collect();
            let mut l32 = source.clone();
            let mut r32 = source.clone();
            let mut l64: Vec<f64> = source.iter().map(|&s| f64::from(s)).collect();
            let mut r64 = l64.clone();

            p32.process_block(&mut [&mut l32, &mut r32]).unwrap();
            adapter
                .process_block_f64(&mut p64, &mut [&mut l64, &mut r64])
                .unwrap();

            for (a, b) in l32.iter().zip(&l64) {
                assert_eq!(f64::from(*a), *b);
            }
        }
    }

    #[test]
    fn test_capacity_and_shape_errors() {
        let mut p = HarmonicProcessor::new(Arc::new(ParamSnapshot::default()));
        p.prepare(48000.0, 64).unwrap();
        let mut adapter = DoublePrecisionAdapter::new();
        adapter.prepare(32);

        let mut l = vec![0.0f64; 48];
        let mut r = vec![0.0f64; 48];
        assert_eq!(
            adapter.process_block_f64(&mut p, &mut [&mut l, &mut r]),
            Err(ProcessorError::BlockTooLarge {
                requested: 48,
                capacity: 32
            })
        );
        assert!(matches!(
            adapter.process_block_f64(&mut p, &mut [&mut l]),
            Err(ProcessorError::ChannelMismatch { .. })
        ));

        adapter.release();
        assert_eq!(adapter.capacity(), 0);
    }
}
