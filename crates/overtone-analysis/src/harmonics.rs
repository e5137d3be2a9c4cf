//! Harmonic level and alias floor measurement
//!
//! [`HarmonicAnalyzer`] windows a block, takes its spectrum and reports each
//! harmonic of a known fundamental relative to the fundamental, plus the
//! strongest bin that is *not* near any harmonic. For a harmonic generator
//! that bin is where aliased partials and noise show up.

use crate::fft::{Fft, Window};
use overtone_core::linear_to_db;

/// Bins either side of a harmonic that belong to its main lobe.
const GUARD_BINS: usize = 6;

/// Bins searched either side of the expected harmonic position.
const SEARCH_BINS: usize = 2;

/// Result of a harmonic analysis
#[derive(Debug, Clone)]
pub struct HarmonicReport {
    /// Fundamental frequency analyzed (Hz)
    pub fundamental_freq: f32,
    /// Fundamental amplitude (linear peak)
    pub fundamental_amplitude: f32,
    /// Levels of harmonics 2, 3, ... in dB relative to the fundamental
    pub harmonic_levels_db: Vec<f32>,
    /// Total harmonic distortion in dB relative to the fundamental
    pub thd_db: f32,
    /// Strongest non-harmonic bin in dB relative to the fundamental
    pub spur_db: f32,
    /// Frequency of that bin (Hz)
    pub spur_freq: f32,
}

impl HarmonicReport {
    /// Level of harmonic `n` (2 = second) in dB re fundamental.
    pub fn level_db(&self, n: usize) -> Option<f32> {
        n.checked_sub(2)
            .and_then(|i| self.harmonic_levels_db.get(i))
            .copied()
    }
}

/// Harmonic analyzer for a signal with a known fundamental
pub struct HarmonicAnalyzer {
    sample_rate: f32,
    fft: Fft,
    window: Window,
    max_harmonics: usize,
}

impl HarmonicAnalyzer {
    /// Create a new analyzer
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    /// * `fft_size` - FFT size (power of 2 recommended)
    pub fn new(sample_rate: f32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft: Fft::new(fft_size),
            window: Window::BlackmanHarris,
            max_harmonics: 8,
        }
    }

    /// Set the window function
    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Set the highest harmonic number reported (at least 2)
    pub fn with_max_harmonics(mut self, max: usize) -> Self {
        self.max_harmonics = max.max(2);
        self
    }

    /// FFT size in samples
    pub fn fft_size(&self) -> usize {
        self.fft.size()
    }

    /// Frequency resolution in Hz
    pub fn bin_width(&self) -> f32 {
        self.sample_rate / self.fft.size() as f32
    }

    /// Analyze the first `fft_size` samples of `signal`.
    ///
    /// Shorter signals are zero-padded. Harmonics at or above Nyquist are
    /// not reported.
    pub fn analyze(&self, signal: &[f32], fundamental_freq: f32) -> HarmonicReport {
        let spectrum = self.fft.amplitude_spectrum(signal, self.window);
        let bin_width = self.bin_width();
        let nyquist = self.sample_rate / 2.0;

        let fundamental_amplitude = peak_near(&spectrum, fundamental_freq / bin_width);
        let reference = fundamental_amplitude.max(1e-10);

        let mut harmonic_levels_db = Vec::with_capacity(self.max_harmonics - 1);
        let mut harmonic_power = 0.0f32;
        for n in 2..=self.max_harmonics {
            let freq = fundamental_freq * n as f32;
            if freq >= nyquist {
                break;
            }
            let amplitude = peak_near(&spectrum, freq / bin_width);
            harmonic_power += amplitude * amplitude;
            harmonic_levels_db.push(linear_to_db(amplitude / reference));
        }

        let (spur_bin, spur_amplitude) =
            strongest_non_harmonic(&spectrum, fundamental_freq / bin_width);

        HarmonicReport {
            fundamental_freq,
            fundamental_amplitude,
            harmonic_levels_db,
            thd_db: linear_to_db(harmonic_power.sqrt() / reference),
            spur_db: linear_to_db(spur_amplitude / reference),
            spur_freq: spur_bin as f32 * bin_width,
        }
    }
}

/// Largest amplitude within a few bins of a (fractional) bin position.
fn peak_near(spectrum: &[f32], bin: f32) -> f32 {
    let centre = bin.round() as usize;
    let lo = centre.saturating_sub(SEARCH_BINS);
    let hi = (centre + SEARCH_BINS).min(spectrum.len().saturating_sub(1));
    spectrum
        .get(lo..=hi)
        .map(|s| s.iter().copied().fold(0.0, f32::max))
        .unwrap_or(0.0)
}

/// Strongest bin outside the main lobes of DC and every harmonic.
fn strongest_non_harmonic(spectrum: &[f32], fundamental_bin: f32) -> (usize, f32) {
    let near_harmonic = |bin: usize| {
        if fundamental_bin <= 0.0 {
            return false;
        }
        let n = (bin as f32 / fundamental_bin).round();
        (bin as f32 - n * fundamental_bin).abs() <= GUARD_BINS as f32
    };

    spectrum
        .iter()
        .enumerate()
        .filter(|&(bin, _)| bin > GUARD_BINS && !near_harmonic(bin))
        .fold((0, 0.0), |best, (bin, &amp)| {
            if amp > best.1 { (bin, amp) } else { best }
        })
}

/// Generate a sine test tone
///
/// # Arguments
/// * `sample_rate` - Sample rate in Hz
/// * `freq` - Frequency in Hz
/// * `duration` - Duration in seconds
/// * `amplitude` - Peak amplitude
///
/// Phase is accumulated in `f64` so long tones stay spectrally clean.
pub fn generate_test_tone(sample_rate: f32, freq: f32, duration: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (f64::from(sample_rate) * f64::from(duration)).round() as usize;
    let omega = std::f64::consts::TAU * f64::from(freq) / f64::from(sample_rate);
    (0..num_samples)
        .map(|i| amplitude * (omega * i as f64).sin() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const SR: f32 = 48000.0;
    const N: usize = 4096;
    // Bin-centred for N = 4096 at 48 kHz (bin 32).
    const F0: f32 = 375.0;

    fn tone_with_harmonics(levels: &[(usize, f32)]) -> Vec<f32> {
        (0..N)
            .map(|i| {
                let phase = 2.0 * PI * F0 * i as f32 / SR;
                levels
                    .iter()
                    .map(|&(n, a)| a * (phase * n as f32).sin())
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_pure_tone() {
        let signal = generate_test_tone(SR, F0, N as f32 / SR, 0.5);
        let report = HarmonicAnalyzer::new(SR, N).analyze(&signal, F0);

        assert!((report.fundamental_amplitude - 0.5).abs() < 0.01);
        assert!(report.thd_db < -80.0, "thd {}", report.thd_db);
        assert!(report.spur_db < -80.0, "spur {}", report.spur_db);
    }

    #[test]
    fn test_second_and_third_levels() {
        let signal = tone_with_harmonics(&[(1, 0.5), (2, 0.05), (3, 0.005)]);
        let report = HarmonicAnalyzer::new(SR, N).analyze(&signal, F0);

        let second = report.level_db(2).unwrap();
        let third = report.level_db(3).unwrap();
        assert!((second + 20.0).abs() < 0.5, "second {second}");
        assert!((third + 40.0).abs() < 0.5, "third {third}");
        assert!(report.spur_db < -80.0);
    }

    #[test]
    fn test_spur_located() {
        // 1234 Hz is far from every multiple of 375 Hz.
        let mut signal = generate_test_tone(SR, F0, N as f32 / SR, 0.5);
        let spur = generate_test_tone(SR, 1234.0, N as f32 / SR, 0.005);
        for (s, p) in signal.iter_mut().zip(&spur) {
            *s += p;
        }
        let report = HarmonicAnalyzer::new(SR, N).analyze(&signal, F0);

        assert!((report.spur_freq - 1234.0).abs() < 2.0 * SR / N as f32);
        assert!(report.spur_db > -45.0 && report.spur_db < -37.0, "{}", report.spur_db);
    }

    #[test]
    fn test_harmonics_stop_at_nyquist() {
        let report = HarmonicAnalyzer::new(SR, N)
            .with_max_harmonics(100)
            .analyze(&[0.0; N], 6000.0);
        assert_eq!(report.harmonic_levels_db.len(), 2);
        assert_eq!(report.level_db(1), None);
    }
}
