//! Construction-time processor settings.

use overtone_core::{DcBlocker, DcSlope};

/// Settings fixed for the lifetime of a [`HarmonicProcessor`](crate::HarmonicProcessor).
///
/// The harmonic generator's own constants (attack, gate, gains) are not
/// configurable; only the DC filter is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorConfig {
    /// DC filter cutoff in Hz.
    pub dc_cutoff_hz: f64,
    /// DC filter order.
    pub dc_slope: DcSlope,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            dc_cutoff_hz: DcBlocker::DEFAULT_CUTOFF_HZ,
            dc_slope: DcSlope::FirstOrder,
        }
    }
}

impl ProcessorConfig {
    /// Sets the DC cutoff.
    pub fn with_dc_cutoff(mut self, hz: f64) -> Self {
        self.dc_cutoff_hz = hz;
        self
    }

    /// Sets the DC filter order.
    pub fn with_dc_slope(mut self, slope: DcSlope) -> Self {
        self.dc_slope = slope;
        self
    }
}
