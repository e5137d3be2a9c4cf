//! Parameter descriptors for host automation and presets.
//!
//! The harmonic generator exposes four parameters. Each has a
//! [`ParamDescriptor`] carrying display metadata, its plain range, a stable
//! numeric [`ParamId`], a stable string id, and the [`ParamScale`] used when a
//! host works in normalized \[0.0, 1.0\] space.
//!
//! | Index | String id        | Range  | Default | Scale        |
//! |-------|------------------|--------|---------|--------------|
//! | 0     | `secondHarmonic` | 0–1    | 0.0     | Power (skew) |
//! | 1     | `thirdHarmonic`  | 0–1    | 0.0     | Power (skew) |
//! | 2     | `wetDryMix`      | 0–1    | 1.0     | Linear       |
//! | 3     | `oversampling`   | off/on | on      | Stepped      |
//!
//! The harmonic amounts are skewed so that the centre of the normalized range
//! lands on 0.10: most useful settings live in the bottom tenth of the range.
//!
//! This module is fully `no_std` compatible with no heap allocations required.

/// Exponent that puts normalized 0.5 at a plain value of 0.10 on a 0–1 range.
///
/// `0.5^exp = 0.1` → `exp = ln(0.1) / ln(0.5)`.
pub const AMOUNT_SKEW: f32 = 3.321_928;

/// Scaling curve for parameter normalization.
///
/// # Normalization Formulas
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Power(exp)**: `normalized = ((value - min) / (max - min)).powf(1.0 / exp)`
///
/// Reference: JUCE `NormalisableRange` (skew factor).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Linear mapping (default).
    #[default]
    Linear,
    /// Power curve mapping. Exponent > 1.0 gives more resolution at the low end
    /// of the plain range.
    Power(f32),
}

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` must never change for a given parameter: hosts
/// record automation against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags for host communication.
///
/// # Example
///
/// ```rust
/// use overtone_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Parameter can be automated by the host.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter takes discrete values only.
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combines two flag sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Fraction shown as a percentage (plain value 0–1).
    Percent,
    /// On/off switch.
    Toggle,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Percent => "%",
            ParamUnit::Toggle => "",
        }
    }
}

/// Metadata describing one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display.
    pub name: &'static str,
    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,
    /// Unit type for formatting.
    pub unit: ParamUnit,
    /// Minimum plain value.
    pub min: f32,
    /// Maximum plain value.
    pub max: f32,
    /// Value on construction and reset.
    pub default: f32,
    /// Recommended encoder step.
    pub step: f32,
    /// Stable numeric id for automation.
    pub id: ParamId,
    /// Stable string id used in saved state and presets.
    pub string_id: &'static str,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Second-harmonic amount, 0–1, skewed toward low values.
    pub const fn second_harmonic() -> Self {
        Self {
            name: "Second Harmonic",
            short_name: "2nd",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 1.0,
            default: 0.0,
            step: 0.01,
            id: ParamId(100),
            string_id: "secondHarmonic",
            scale: ParamScale::Power(AMOUNT_SKEW),
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Third-harmonic amount, 0–1, skewed toward low values.
    pub const fn third_harmonic() -> Self {
        Self {
            name: "Third Harmonic",
            short_name: "3rd",
            id: ParamId(101),
            string_id: "thirdHarmonic",
            ..Self::second_harmonic()
        }
    }

    /// Wet/dry mix, 0 = dry, 1 = wet.
    pub const fn wet_dry_mix() -> Self {
        Self {
            name: "Wet/Dry Mix",
            short_name: "Mix",
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 1.0,
            default: 1.0,
            step: 0.01,
            id: ParamId(102),
            string_id: "wetDryMix",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Oversampling switch (0 = off, 1 = on).
    pub const fn oversampling() -> Self {
        Self {
            name: "Oversampling",
            short_name: "OS",
            unit: ParamUnit::Toggle,
            min: 0.0,
            max: 1.0,
            default: 1.0,
            step: 1.0,
            id: ParamId(103),
            string_id: "oversampling",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Clamps a value to this parameter's range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Converts a plain value to normalized range (0.0 to 1.0).
    ///
    /// # Example
    ///
    /// ```rust
    /// use overtone_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::second_harmonic();
    /// assert!((desc.normalize(0.1) - 0.5).abs() < 1e-4);
    /// ```
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let linear = ((self.clamp(value) - self.min) / range).clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Linear => linear,
            ParamScale::Power(exp) => libm::powf(linear, 1.0 / exp),
        }
    }

    /// Converts a normalized value (0.0 to 1.0) to the plain range.
    ///
    /// Stepped parameters snap to the nearest step.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        let curved = match self.scale {
            ParamScale::Linear => normalized,
            ParamScale::Power(exp) => libm::powf(normalized, exp),
        };
        let plain = self.min + curved * (self.max - self.min);
        if self.flags.contains(ParamFlags::STEPPED) && self.step > 0.0 {
            self.min + libm::roundf((plain - self.min) / self.step) * self.step
        } else {
            plain
        }
    }
}

/// Number of parameters.
pub const PARAM_COUNT: usize = 4;

/// All descriptors in index order.
pub const fn descriptors() -> [ParamDescriptor; PARAM_COUNT] {
    [
        ParamDescriptor::second_harmonic(),
        ParamDescriptor::third_harmonic(),
        ParamDescriptor::wet_dry_mix(),
        ParamDescriptor::oversampling(),
    ]
}

/// Looks up a descriptor by its string id.
///
/// # Example
///
/// ```rust
/// use overtone_core::param_info::find_by_string_id;
///
/// assert_eq!(find_by_string_id("wetDryMix").map(|d| d.default), Some(1.0));
/// assert!(find_by_string_id("drive").is_none());
/// ```
pub fn find_by_string_id(string_id: &str) -> Option<ParamDescriptor> {
    descriptors().into_iter().find(|d| d.string_id == string_id)
}
