//! Overtone Analysis - spectral measurement of harmonic generator output
//!
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`harmonics`] - Per-harmonic levels, THD and the strongest
//!   non-harmonic (alias/noise) bin, all relative to the fundamental
//!
//! ## Example
//!
//! ```rust
//! use overtone_analysis::{HarmonicAnalyzer, generate_test_tone};
//!
//! let tone = generate_test_tone(48000.0, 375.0, 0.1, 0.5);
//! let report = HarmonicAnalyzer::new(48000.0, 4096).analyze(&tone, 375.0);
//!
//! assert!((report.fundamental_amplitude - 0.5).abs() < 0.01);
//! assert!(report.spur_db < -60.0);
//! ```

pub mod fft;
pub mod harmonics;

pub use fft::{Fft, Window, magnitude_db};
pub use harmonics::{HarmonicAnalyzer, HarmonicReport, generate_test_tone};
