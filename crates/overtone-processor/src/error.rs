//! Error types for the processing pipeline and state record.

use overtone_core::CapacityError;
use thiserror::Error;

/// Broad class of a failure, for callers that only need to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unsupported channel layout or malformed call shape. Reject up front.
    Configuration,
    /// Block larger than the prepared capacity. A caller bug, not recoverable
    /// mid-stream.
    Capacity,
    /// Malformed serialized parameters. Recovered by keeping current values.
    StateCorruption,
}

/// Errors returned by [`HarmonicProcessor`](crate::HarmonicProcessor).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessorError {
    /// Only stereo in / stereo out is supported
    #[error("unsupported bus layout: {inputs} in / {outputs} out (only 2 in / 2 out)")]
    UnsupportedLayout {
        /// Input channel count offered by the host.
        inputs: usize,
        /// Output channel count offered by the host.
        outputs: usize,
    },

    /// Block exceeds the size given to `prepare`
    #[error("block of {requested} samples exceeds prepared capacity of {capacity}")]
    BlockTooLarge {
        /// Samples per channel in the rejected block.
        requested: usize,
        /// Prepared capacity in samples per channel.
        capacity: usize,
    },

    /// Wrong number of channels passed to `process_block`
    #[error("expected {expected} channels, got {got}")]
    ChannelMismatch {
        /// Required channel count.
        expected: usize,
        /// Channel count passed in.
        got: usize,
    },

    /// Stereo channels have different lengths
    #[error("channel lengths differ: left has {left} samples, right has {right}")]
    ChannelLengthMismatch {
        /// Left channel length.
        left: usize,
        /// Right channel length.
        right: usize,
    },

    /// `process_block` called before `prepare`
    #[error("processor is not prepared")]
    NotPrepared,

    /// Sample rate is not finite and positive
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),
}

impl ProcessorError {
    /// Classifies the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProcessorError::BlockTooLarge { .. } => ErrorCategory::Capacity,
            ProcessorError::UnsupportedLayout { .. }
            | ProcessorError::ChannelMismatch { .. }
            | ProcessorError::ChannelLengthMismatch { .. }
            | ProcessorError::NotPrepared
            | ProcessorError::InvalidSampleRate(_) => ErrorCategory::Configuration,
        }
    }
}

impl From<CapacityError> for ProcessorError {
    fn from(err: CapacityError) -> Self {
        ProcessorError::BlockTooLarge {
            requested: err.requested,
            capacity: err.capacity,
        }
    }
}

/// Errors decoding the binary parameter record.
///
/// Whenever one of these is returned, the parameter store was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Buffer shorter than the record
    #[error("state record truncated: expected {expected} bytes, got {got}")]
    Truncated {
        /// Record length in bytes.
        expected: usize,
        /// Bytes supplied.
        got: usize,
    },

    /// A float field decoded to NaN or infinity
    #[error("state field '{field}' is not finite")]
    NonFinite {
        /// String id of the offending parameter.
        field: &'static str,
    },
}

impl StateError {
    /// Always [`ErrorCategory::StateCorruption`].
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::StateCorruption
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_converts() {
        let err: ProcessorError = CapacityError {
            requested: 512,
            capacity: 256,
        }
        .into();
        assert_eq!(
            err,
            ProcessorError::BlockTooLarge {
                requested: 512,
                capacity: 256
            }
        );
        assert_eq!(err.category(), ErrorCategory::Capacity);
    }

    #[test]
    fn test_categories() {
        let layout = ProcessorError::UnsupportedLayout {
            inputs: 1,
            outputs: 2,
        };
        assert_eq!(layout.category(), ErrorCategory::Configuration);
        assert_eq!(
            StateError::Truncated {
                expected: 13,
                got: 4
            }
            .category(),
            ErrorCategory::StateCorruption
        );
    }

    #[test]
    fn test_display_messages() {
        let err = ProcessorError::BlockTooLarge {
            requested: 1024,
            capacity: 512,
        };
        assert_eq!(
            err.to_string(),
            "block of 1024 samples exceeds prepared capacity of 512"
        );
        let err = StateError::NonFinite {
            field: "wetDryMix",
        };
        assert!(err.to_string().contains("wetDryMix"));
    }
}
