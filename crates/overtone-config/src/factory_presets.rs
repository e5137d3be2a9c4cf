//! Factory presets bundled with overtone.
//!
//! Always available without external files. They cover the useful corners
//! of the parameter space and serve as starting points.

use crate::Preset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["init", "warm", "bright", "tape", "parallel_grit"];

/// TOML content for factory presets, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("warm", WARM_PRESET),
    ("bright", BRIGHT_PRESET),
    ("tape", TAPE_PRESET),
    ("parallel_grit", PARALLEL_GRIT_PRESET),
];

/// Processor defaults: no harmonics, fully wet, oversampled.
const INIT_PRESET: &str = r#"
name = "Init"
description = "No added harmonics, fully wet, oversampling on"

[params]
second_harmonic = 0.0
third_harmonic = 0.0
mix = 1.0
oversampling = true
"#;

const WARM_PRESET: &str = r#"
name = "Warm"
description = "Even-order colour for vocals and bass"

[params]
second_harmonic = 0.45
third_harmonic = 0.05
mix = 0.8
oversampling = true
"#;

const BRIGHT_PRESET: &str = r#"
name = "Bright"
description = "Odd-order edge that lifts a mix without EQ"

[params]
second_harmonic = 0.1
third_harmonic = 0.35
mix = 0.7
oversampling = true
"#;

/// Steeper DC filter: the heavy second harmonic leaves more offset behind.
const TAPE_PRESET: &str = r#"
name = "Tape"
description = "Both orders, second dominant, with a steeper DC filter"

[params]
second_harmonic = 0.6
third_harmonic = 0.2
mix = 1.0
oversampling = true

[engine]
dc_cutoff_hz = 15.0
dc_slope = "second_order"
"#;

const PARALLEL_GRIT_PRESET: &str = r#"
name = "Parallel Grit"
description = "Full-strength harmonics blended under the dry signal"

[params]
second_harmonic = 1.0
third_harmonic = 1.0
mix = 0.3
oversampling = true
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use overtone_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {:?}", preset.name, preset.description);
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use overtone_config::get_factory_preset;
///
/// let warm = get_factory_preset("warm").unwrap();
/// assert_eq!(warm.name, "Warm");
/// assert!(get_factory_preset("Parallel Grit").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.to_lowercase() == name_lower)
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|p| p.name.to_lowercase() == name_lower)
}

/// Get the identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory preset (case-insensitive).
///
/// # Example
///
/// ```rust
/// use overtone_config::is_factory_preset;
///
/// assert!(is_factory_preset("tape"));
/// assert!(is_factory_preset("TAPE"));
/// assert!(!is_factory_preset("my_custom_preset"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_preset;
    use overtone_processor::DcSlope;

    #[test]
    fn test_all_factory_presets_parse_and_validate() {
        for (name, toml) in FACTORY_PRESETS_TOML {
            let preset = Preset::from_toml(toml)
                .unwrap_or_else(|e| panic!("factory preset '{name}' should parse: {e}"));
            assert!(preset.description.is_some(), "'{name}' needs a description");
            validate_preset(&preset)
                .unwrap_or_else(|e| panic!("factory preset '{name}' invalid: {e}"));
        }
        assert_eq!(factory_presets().len(), FACTORY_PRESET_NAMES.len());
    }

    #[test]
    fn test_names_match_table() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES.to_vec());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(get_factory_preset("bright").unwrap().name, "Bright");
        assert_eq!(get_factory_preset("PARALLEL_GRIT").unwrap().name, "Parallel Grit");
        assert_eq!(get_factory_preset("parallel grit").unwrap().name, "Parallel Grit");
        assert!(get_factory_preset("nonexistent").is_none());
    }

    #[test]
    fn test_init_matches_processor_defaults() {
        let init = get_factory_preset("init").unwrap();
        assert_eq!(init.snapshot(), overtone_processor::ParamSnapshot::default());
    }

    #[test]
    fn test_tape_uses_second_order_dc() {
        let tape = get_factory_preset("tape").unwrap();
        let config = tape.processor_config();
        assert_eq!(config.dc_slope, DcSlope::SecondOrder);
        assert_eq!(config.dc_cutoff_hz, 15.0);
    }
}
