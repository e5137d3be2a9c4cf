//! Offline rendering through a [`HarmonicProcessor`].

use overtone_processor::{HarmonicProcessor, ParamSource};

use crate::{Error, Result, StereoSamples};

/// Process a whole stereo buffer in blocks of `block_size` and return the
/// result. The input is left untouched.
///
/// `processor` must already be prepared for blocks of at least
/// `block_size` samples.
///
/// # Errors
///
/// [`Error::ZeroBlockSize`] for `block_size == 0`, otherwise whatever the
/// processor returns for the first rejected block.
pub fn render_stereo<P: ParamSource>(
    processor: &mut HarmonicProcessor<P>,
    input: &StereoSamples,
    block_size: usize,
) -> Result<StereoSamples> {
    render_stereo_with_progress(processor, input, block_size, |_| {})
}

/// [`render_stereo`] with a callback receiving the number of frames done
/// after every block.
pub fn render_stereo_with_progress<P, F>(
    processor: &mut HarmonicProcessor<P>,
    input: &StereoSamples,
    block_size: usize,
    mut progress: F,
) -> Result<StereoSamples>
where
    P: ParamSource,
    F: FnMut(usize),
{
    if block_size == 0 {
        return Err(Error::ZeroBlockSize);
    }

    let mut output = input.clone();
    let mut done = 0;
    for (left, right) in output
        .left
        .chunks_mut(block_size)
        .zip(output.right.chunks_mut(block_size))
    {
        let len = left.len();
        processor.process_block(&mut [left, right])?;
        done += len;
        progress(done);
    }

    tracing::info!(
        frames = input.len(),
        block_size,
        latency = processor.latency_samples(),
        "offline render complete"
    );
    Ok(output)
}
