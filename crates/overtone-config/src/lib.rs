//! Configuration and preset management for the overtone harmonic generator.
//!
//! - **Presets**: Load and save parameter settings as TOML
//! - **Validation**: Range-check every value before it reaches the processor
//! - **Paths**: Platform-specific user preset directory
//! - **Factory Presets**: Built-in starting points
//!
//! # Example
//!
//! ```rust,no_run
//! use overtone_config::{Preset, get_factory_preset, user_presets_dir, validate_preset};
//!
//! let mut preset = get_factory_preset("warm").unwrap();
//! preset.name = "Warmer".to_string();
//! preset.params.second_harmonic = 0.6;
//! validate_preset(&preset).unwrap();
//!
//! preset.save(user_presets_dir().join("warmer.toml")).unwrap();
//! let loaded = Preset::load(user_presets_dir().join("warmer.toml")).unwrap();
//! assert_eq!(loaded, preset);
//! ```

mod error;
mod preset;

/// Platform-specific paths for presets.
pub mod paths;

/// Preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_presets_in, list_user_presets,
    preset_name_from_path, user_config_dir, user_presets_dir,
};
pub use preset::{DcSlopeSetting, EngineSettings, Preset, PresetParams};
pub use validation::{ValidationError, ValidationResult, validate_param, validate_preset};

/// Resolve a preset by factory name, file path or user preset name, then
/// validate it.
///
/// # Errors
///
/// [`ConfigError::PresetNotFound`] if nothing matches, or the load or
/// validation error of the preset that did.
pub fn resolve_preset(name: &str) -> Result<Preset, ConfigError> {
    let preset = match get_factory_preset(name) {
        Some(preset) => preset,
        None => {
            let path = find_preset(name)
                .ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))?;
            Preset::load(path)?
        }
    };
    validate_preset(&preset)?;
    Ok(preset)
}
