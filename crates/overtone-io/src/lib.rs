//! Audio file I/O and offline rendering for overtone.
//!
//! - **WAV file I/O**: [`read_wav_stereo`] and [`write_wav_stereo`]
//! - **Offline rendering**: [`render_stereo`] drives a prepared
//!   [`HarmonicProcessor`](overtone_processor::HarmonicProcessor) over a
//!   whole buffer in fixed-size blocks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use overtone_io::{read_wav_stereo, render_stereo, write_wav_stereo};
//! use overtone_processor::{HarmonicProcessor, ParamSnapshot};
//!
//! let (input, spec) = read_wav_stereo("input.wav")?;
//!
//! let params = ParamSnapshot { second_harmonic: 0.5, ..ParamSnapshot::default() };
//! let mut processor = HarmonicProcessor::new(Arc::new(params));
//! processor.prepare(f64::from(spec.sample_rate), 512)?;
//!
//! let output = render_stereo(&mut processor, &input, 512)?;
//! write_wav_stereo("output.wav", &output, spec)?;
//! # Ok::<(), overtone_io::Error>(())
//! ```

mod render;
mod wav;

pub use render::{render_stereo, render_stereo_with_progress};
pub use wav::{
    StereoSamples, WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The processor rejected a block.
    #[error("processing error: {0}")]
    Processor(#[from] overtone_processor::ProcessorError),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Block size of zero.
    #[error("block size must be at least 1")]
    ZeroBlockSize,

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
