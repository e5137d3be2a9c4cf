//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use overtone_processor::{DcSlope, ParamSnapshot, ProcessorConfig};

use crate::error::ConfigError;

/// A saved harmonic generator setting.
///
/// # TOML Format
///
/// ```toml
/// name = "Warm"
/// description = "Gentle even-order colour"
///
/// [params]
/// second_harmonic = 0.45
/// third_harmonic = 0.1
/// mix = 0.8
/// oversampling = true
///
/// [engine]
/// sample_rate = 48000
/// block_size = 512
/// dc_cutoff_hz = 10.0
/// dc_slope = "first_order"
/// ```
///
/// Every field except `name` may be omitted; missing parameters take the
/// processor defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parameter values.
    #[serde(default)]
    pub params: PresetParams,

    /// Optional engine hints for offline rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineSettings>,
}

/// The four processor parameters as stored in a preset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresetParams {
    /// Second-harmonic amount in [0, 1].
    pub second_harmonic: f32,
    /// Third-harmonic amount in [0, 1].
    pub third_harmonic: f32,
    /// Wet/dry mix in [0, 1].
    pub mix: f32,
    /// Run the nonlinearity at 4x rate.
    pub oversampling: bool,
}

impl Default for PresetParams {
    fn default() -> Self {
        ParamSnapshot::default().into()
    }
}

impl From<ParamSnapshot> for PresetParams {
    fn from(s: ParamSnapshot) -> Self {
        Self {
            second_harmonic: s.second_harmonic,
            third_harmonic: s.third_harmonic,
            mix: s.mix,
            oversampling: s.oversampling,
        }
    }
}

impl From<PresetParams> for ParamSnapshot {
    fn from(p: PresetParams) -> Self {
        Self {
            second_harmonic: p.second_harmonic,
            third_harmonic: p.third_harmonic,
            mix: p.mix,
            oversampling: p.oversampling,
        }
    }
}

/// DC filter slope as written in preset files.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DcSlopeSetting {
    /// 6 dB/octave.
    #[default]
    FirstOrder,
    /// 12 dB/octave Butterworth.
    SecondOrder,
}

impl From<DcSlopeSetting> for DcSlope {
    fn from(s: DcSlopeSetting) -> Self {
        match s {
            DcSlopeSetting::FirstOrder => DcSlope::FirstOrder,
            DcSlopeSetting::SecondOrder => DcSlope::SecondOrder,
        }
    }
}

/// Engine hints. Unset fields fall back to the caller's choice.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineSettings {
    /// Sample rate in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Block size in samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_size: Option<usize>,
    /// DC filter cutoff in Hz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc_cutoff_hz: Option<f64>,
    /// DC filter slope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc_slope: Option<DcSlopeSetting>,
}

impl Preset {
    /// Create a preset with default parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            params: PresetParams::default(),
            engine: None,
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the parameter values.
    pub fn with_params(mut self, params: impl Into<PresetParams>) -> Self {
        self.params = params.into();
        self
    }

    /// Set the engine hints.
    pub fn with_engine(mut self, engine: EngineSettings) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parameter values as a processor snapshot.
    pub fn snapshot(&self) -> ParamSnapshot {
        self.params.into()
    }

    /// DC filter settings, defaults filled in.
    pub fn processor_config(&self) -> ProcessorConfig {
        let mut config = ProcessorConfig::default();
        if let Some(engine) = &self.engine {
            if let Some(cutoff) = engine.dc_cutoff_hz {
                config = config.with_dc_cutoff(cutoff);
            }
            if let Some(slope) = engine.dc_slope {
                config = config.with_dc_slope(slope.into());
            }
        }
        config
    }

    /// Engine sample rate hint.
    pub fn sample_rate(&self) -> Option<u32> {
        self.engine.and_then(|e| e.sample_rate)
    }

    /// Engine block size hint.
    pub fn block_size(&self) -> Option<usize> {
        self.engine.and_then(|e| e.block_size)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
