//! Preset validation.
//!
//! Checks every value a preset carries against the ranges the processor and
//! the offline renderer accept. All problems are collected, not just the
//! first one.
//!
//! # Example
//!
//! ```rust
//! use overtone_config::{Preset, validate_preset};
//!
//! let mut preset = Preset::new("Too hot");
//! preset.params.second_harmonic = 1.5;
//! assert!(validate_preset(&preset).is_err());
//! ```

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::preset::Preset;

/// Accepted engine sample rates in Hz.
pub const SAMPLE_RATE_RANGE: RangeInclusive<u32> = 8000..=384_000;

/// Accepted engine block sizes in samples.
pub const BLOCK_SIZE_RANGE: RangeInclusive<usize> = 16..=16384;

/// Highest accepted DC filter cutoff in Hz. The lower bound is exclusive 0.
pub const MAX_DC_CUTOFF_HZ: f64 = 40.0;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// NaN or infinite value.
    #[error("parameter '{param}' is not a finite number")]
    NotFinite {
        /// Name of the parameter.
        param: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks a float parameter against an inclusive range.
pub fn validate_param(param: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            param: param.to_string(),
        });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Validates every field of a preset.
///
/// Returns the single error directly, or [`ValidationError::Multiple`] when
/// more than one field is wrong.
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let mut check = |result: ValidationResult<()>| {
        if let Err(e) = result {
            errors.push(e);
        }
    };

    let params = &preset.params;
    check(validate_param("second_harmonic", f64::from(params.second_harmonic), 0.0, 1.0));
    check(validate_param("third_harmonic", f64::from(params.third_harmonic), 0.0, 1.0));
    check(validate_param("mix", f64::from(params.mix), 0.0, 1.0));

    if let Some(engine) = &preset.engine {
        if let Some(rate) = engine.sample_rate {
            check(validate_param(
                "sample_rate",
                f64::from(rate),
                f64::from(*SAMPLE_RATE_RANGE.start()),
                f64::from(*SAMPLE_RATE_RANGE.end()),
            ));
        }
        if let Some(block) = engine.block_size {
            check(validate_param(
                "block_size",
                block as f64,
                *BLOCK_SIZE_RANGE.start() as f64,
                *BLOCK_SIZE_RANGE.end() as f64,
            ));
        }
        if let Some(cutoff) = engine.dc_cutoff_hz {
            let result = validate_param("dc_cutoff_hz", cutoff, 0.0, MAX_DC_CUTOFF_HZ);
            check(match result {
                Ok(()) if cutoff <= 0.0 => Err(ValidationError::OutOfRange {
                    param: "dc_cutoff_hz".to_string(),
                    value: cutoff,
                    min: 0.0,
                    max: MAX_DC_CUTOFF_HZ,
                }),
                other => other,
            });
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
