//! Lock-free parameter store.
//!
//! [`HarmonicParams`] holds the four live control values in atomics: floats
//! as `AtomicU32` bit patterns, the oversampling switch as `AtomicBool`. A
//! control thread writes them at any time; the audio thread reads them through
//! [`ParamSource::snapshot`] exactly once per block, so a block is always
//! processed with one consistent set of values.
//!
//! Share the store between threads with an `Arc`:
//!
//! ```rust
//! use std::sync::Arc;
//! use overtone_processor::{HarmonicParams, ParamSource};
//!
//! let params = Arc::new(HarmonicParams::new());
//! let ui = Arc::clone(&params);
//!
//! ui.set_second_harmonic(0.4);
//! assert_eq!(params.snapshot().second_harmonic, 0.4);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use overtone_core::param_info::{self, PARAM_COUNT};
use overtone_core::{HarmonicGains, ParamDescriptor};

/// Parameter index of the second-harmonic amount.
pub const SECOND_HARMONIC: usize = 0;
/// Parameter index of the third-harmonic amount.
pub const THIRD_HARMONIC: usize = 1;
/// Parameter index of the wet/dry mix.
pub const WET_DRY_MIX: usize = 2;
/// Parameter index of the oversampling switch.
pub const OVERSAMPLING: usize = 3;

/// One block's worth of parameter values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Second-harmonic amount in [0, 1].
    pub second_harmonic: f32,
    /// Third-harmonic amount in [0, 1].
    pub third_harmonic: f32,
    /// Wet/dry mix in [0, 1], 1 = fully wet.
    pub mix: f32,
    /// Whether the nonlinearity runs at 4× rate.
    pub oversampling: bool,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            second_harmonic: ParamDescriptor::second_harmonic().default,
            third_harmonic: ParamDescriptor::third_harmonic().default,
            mix: ParamDescriptor::wet_dry_mix().default,
            oversampling: ParamDescriptor::oversampling().default >= 0.5,
        }
    }
}

impl ParamSnapshot {
    /// Shaper gains for this snapshot.
    pub fn gains(&self) -> HarmonicGains {
        HarmonicGains::from_amounts(self.second_harmonic, self.third_harmonic)
    }

    /// Returns a copy with every float clamped into [0, 1]. NaN becomes 0.
    pub fn sanitized(self) -> Self {
        Self {
            second_harmonic: unit_clamp(self.second_harmonic),
            third_harmonic: unit_clamp(self.third_harmonic),
            mix: unit_clamp(self.mix),
            oversampling: self.oversampling,
        }
    }
}

fn unit_clamp(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Read side of a parameter store, as consumed by the audio thread.
///
/// Implementations must never block.
pub trait ParamSource: Send + Sync {
    /// Second-harmonic amount in [0, 1].
    fn second_harmonic(&self) -> f32;

    /// Third-harmonic amount in [0, 1].
    fn third_harmonic(&self) -> f32;

    /// Wet/dry mix in [0, 1].
    fn wet_dry_mix(&self) -> f32;

    /// Whether oversampling is enabled.
    fn oversampling_enabled(&self) -> bool;

    /// Reads all four values.
    fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            second_harmonic: self.second_harmonic(),
            third_harmonic: self.third_harmonic(),
            mix: self.wet_dry_mix(),
            oversampling: self.oversampling_enabled(),
        }
    }
}

/// A fixed snapshot is itself a (constant) source. Used for offline rendering.
impl ParamSource for ParamSnapshot {
    fn second_harmonic(&self) -> f32 {
        self.second_harmonic
    }

    fn third_harmonic(&self) -> f32 {
        self.third_harmonic
    }

    fn wet_dry_mix(&self) -> f32 {
        self.mix
    }

    fn oversampling_enabled(&self) -> bool {
        self.oversampling
    }

    fn snapshot(&self) -> ParamSnapshot {
        *self
    }
}

/// Atomic parameter store shared between the control and audio threads.
#[derive(Debug)]
pub struct HarmonicParams {
    second_harmonic: AtomicU32,
    third_harmonic: AtomicU32,
    mix: AtomicU32,
    oversampling: AtomicBool,
}

impl Default for HarmonicParams {
    fn default() -> Self {
        Self::new()
    }
}

impl HarmonicParams {
    /// Creates a store at descriptor defaults: no harmonics, fully wet,
    /// oversampling on.
    pub fn new() -> Self {
        Self::from_snapshot(ParamSnapshot::default())
    }

    /// Creates a store holding `snapshot` (sanitized).
    pub fn from_snapshot(snapshot: ParamSnapshot) -> Self {
        let s = snapshot.sanitized();
        Self {
            second_harmonic: AtomicU32::new(s.second_harmonic.to_bits()),
            third_harmonic: AtomicU32::new(s.third_harmonic.to_bits()),
            mix: AtomicU32::new(s.mix.to_bits()),
            oversampling: AtomicBool::new(s.oversampling),
        }
    }

    fn store(cell: &AtomicU32, value: f32) {
        if value.is_nan() {
            return;
        }
        cell.store(value.clamp(0.0, 1.0).to_bits(), Ordering::Release);
    }

    fn load(cell: &AtomicU32) -> f32 {
        f32::from_bits(cell.load(Ordering::Acquire))
    }

    /// Sets the second-harmonic amount. Clamped to [0, 1]; NaN is ignored.
    pub fn set_second_harmonic(&self, value: f32) {
        Self::store(&self.second_harmonic, value);
    }

    /// Sets the third-harmonic amount. Clamped to [0, 1]; NaN is ignored.
    pub fn set_third_harmonic(&self, value: f32) {
        Self::store(&self.third_harmonic, value);
    }

    /// Sets the wet/dry mix. Clamped to [0, 1]; NaN is ignored.
    pub fn set_wet_dry_mix(&self, value: f32) {
        Self::store(&self.mix, value);
    }

    /// Enables or disables oversampling.
    pub fn set_oversampling(&self, enabled: bool) {
        self.oversampling.store(enabled, Ordering::Release);
    }

    /// Writes all four values from a snapshot.
    ///
    /// Each field is stored individually; a concurrent reader may observe a
    /// mix of old and new fields until the next block.
    pub fn apply(&self, snapshot: &ParamSnapshot) {
        self.set_second_harmonic(snapshot.second_harmonic);
        self.set_third_harmonic(snapshot.third_harmonic);
        self.set_wet_dry_mix(snapshot.mix);
        self.set_oversampling(snapshot.oversampling);
    }

    /// Descriptor for parameter `index`.
    pub fn descriptor(index: usize) -> Option<ParamDescriptor> {
        param_info::descriptors().get(index).copied()
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    /// Index of the parameter with the given string id.
    pub fn index_of(string_id: &str) -> Option<usize> {
        param_info::descriptors()
            .iter()
            .position(|d| d.string_id == string_id)
    }

    /// Plain value of parameter `index` (the switch reads as 0.0 / 1.0).
    pub fn get(&self, index: usize) -> Option<f32> {
        match index {
            SECOND_HARMONIC => Some(self.second_harmonic()),
            THIRD_HARMONIC => Some(self.third_harmonic()),
            WET_DRY_MIX => Some(self.wet_dry_mix()),
            OVERSAMPLING => Some(if self.oversampling_enabled() { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Sets parameter `index` from a plain value. Returns `false` for an
    /// unknown index.
    pub fn set(&self, index: usize, value: f32) -> bool {
        match index {
            SECOND_HARMONIC => self.set_second_harmonic(value),
            THIRD_HARMONIC => self.set_third_harmonic(value),
            WET_DRY_MIX => self.set_wet_dry_mix(value),
            OVERSAMPLING => {
                if !value.is_nan() {
                    self.set_oversampling(value >= 0.5);
                }
            }
            _ => return false,
        }
        true
    }

    /// Normalized (host-facing) value of parameter `index`.
    pub fn normalized(&self, index: usize) -> Option<f32> {
        let desc = Self::descriptor(index)?;
        self.get(index).map(|v| desc.normalize(v))
    }

    /// Sets parameter `index` from a normalized value, applying its skew.
    pub fn set_normalized(&self, index: usize, normalized: f32) -> bool {
        if normalized.is_nan() {
            return Self::descriptor(index).is_some();
        }
        match Self::descriptor(index) {
            Some(desc) => self.set(index, desc.denormalize(normalized)),
            None => false,
        }
    }

    /// Sets a parameter by string id (e.g. `"wetDryMix"`).
    pub fn set_by_id(&self, string_id: &str, value: f32) -> bool {
        Self::index_of(string_id).is_some_and(|index| self.set(index, value))
    }
}

impl ParamSource for HarmonicParams {
    fn second_harmonic(&self) -> f32 {
        Self::load(&self.second_harmonic)
    }

    fn third_harmonic(&self) -> f32 {
        Self::load(&self.third_harmonic)
    }

    fn wet_dry_mix(&self) -> f32 {
        Self::load(&self.mix)
    }

    fn oversampling_enabled(&self) -> bool {
        self.oversampling.load(Ordering::Acquire)
    }
}
