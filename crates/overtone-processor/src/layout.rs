//! Bus layout negotiation.
//!
//! The processor supports exactly one layout: stereo in, stereo out. Hosts
//! offer a layout before `prepare`; anything else is refused with
//! [`ProcessorError::UnsupportedLayout`].

use crate::error::ProcessorError;

/// Number of channels processed.
pub const CHANNELS: usize = overtone_core::MAX_CHANNELS;

/// Channel counts of the main input and output buses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusLayout {
    /// Input channel count.
    pub inputs: usize,
    /// Output channel count.
    pub outputs: usize,
}

impl BusLayout {
    /// Stereo in, stereo out.
    pub const STEREO: Self = Self {
        inputs: CHANNELS,
        outputs: CHANNELS,
    };

    /// Creates a layout.
    pub const fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }

    /// Returns `true` for stereo in / stereo out.
    pub const fn is_supported(&self) -> bool {
        self.inputs == CHANNELS && self.outputs == CHANNELS
    }

    /// Accepts the layout or explains why not.
    ///
    /// # Example
    ///
    /// ```rust
    /// use overtone_processor::BusLayout;
    ///
    /// assert!(BusLayout::STEREO.negotiate().is_ok());
    /// assert!(BusLayout::new(1, 2).negotiate().is_err());
    /// ```
    pub fn negotiate(self) -> Result<Self, ProcessorError> {
        if self.is_supported() {
            Ok(self)
        } else {
            tracing::warn!(
                inputs = self.inputs,
                outputs = self.outputs,
                "rejecting unsupported bus layout"
            );
            Err(ProcessorError::UnsupportedLayout {
                inputs: self.inputs,
                outputs: self.outputs,
            })
        }
    }
}

impl Default for BusLayout {
    fn default() -> Self {
        Self::STEREO
    }
}
