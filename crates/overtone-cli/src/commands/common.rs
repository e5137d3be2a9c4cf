//! Shared parameter flags.

use anyhow::Context;
use clap::Args;
use overtone_config::{Preset, resolve_preset, validate_param};
use overtone_processor::ParamSnapshot;

/// Parameter selection: an optional preset, then per-parameter overrides.
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// Preset name (factory or user) or path to a preset TOML file
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Second-harmonic amount (0-1)
    #[arg(long)]
    pub second: Option<f32>,

    /// Third-harmonic amount (0-1)
    #[arg(long)]
    pub third: Option<f32>,

    /// Wet/dry mix (0 = dry, 1 = wet)
    #[arg(long)]
    pub mix: Option<f32>,

    /// Run the nonlinearity at the base rate
    #[arg(long)]
    pub no_oversampling: bool,
}

impl ParamArgs {
    /// Resolve into processor parameters, returning the preset used if any.
    pub fn resolve(&self) -> anyhow::Result<(ParamSnapshot, Option<Preset>)> {
        let preset = self
            .preset
            .as_deref()
            .map(|name| resolve_preset(name).with_context(|| format!("loading preset '{name}'")))
            .transpose()?;

        let mut snapshot = preset.as_ref().map(Preset::snapshot).unwrap_or_default();
        for (name, value, slot) in [
            ("second", self.second, &mut snapshot.second_harmonic),
            ("third", self.third, &mut snapshot.third_harmonic),
            ("mix", self.mix, &mut snapshot.mix),
        ] {
            if let Some(value) = value {
                validate_param(name, f64::from(value), 0.0, 1.0)?;
                *slot = value;
            }
        }
        if self.no_oversampling {
            snapshot.oversampling = false;
        }
        Ok((snapshot, preset))
    }
}

/// Peak absolute value of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

/// RMS of a signal.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}
