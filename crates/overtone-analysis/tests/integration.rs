//! Integration tests for overtone-analysis using synthetic signals.

use std::f64::consts::PI;

use overtone_analysis::{Fft, HarmonicAnalyzer, Window, generate_test_tone, magnitude_db};

/// Sine passed through a memoryless polynomial: x + a2*x^2 + a3*x^3.
fn polynomial_tone(
    freq_hz: f32,
    sample_rate: f32,
    num_samples: usize,
    a2: f32,
    a3: f32,
) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let phase = 2.0 * PI * f64::from(freq_hz) * i as f64 / f64::from(sample_rate);
            let x = 0.5 * phase.sin() as f32;
            x + a2 * x * x + a3 * x * x * x
        })
        .collect()
}

#[test]
fn fft_peak_matches_input_frequency() {
    let fft = Fft::new(8192);
    let signal = generate_test_tone(48000.0, 1000.0, 0.2, 1.0);
    let spectrum = fft.forward(&signal);
    let db = magnitude_db(&spectrum);

    let peak = db
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap();
    let expected = (1000.0f32 * 8192.0 / 48000.0).round() as usize;
    assert!(peak.abs_diff(expected) <= 1, "peak {peak}, expected {expected}");
}

#[test]
fn square_law_shows_up_as_second_harmonic() {
    // 0.1 * (0.5 sin)^2 = 0.0125 - 0.0125 cos(2wt): second harmonic at 0.0125 / 0.5.
    let signal = polynomial_tone(1000.0, 44100.0, 16384, 0.1, 0.0);
    let report = HarmonicAnalyzer::new(44100.0, 16384).analyze(&signal, 1000.0);

    let expected = 20.0 * (0.0125f32 / 0.5).log10();
    let second = report.level_db(2).unwrap();
    assert!((second - expected).abs() < 1.5, "second {second}, expected {expected}");
    assert!(report.level_db(3).unwrap() < -90.0);
    assert!(report.spur_db < -80.0);
}

#[test]
fn cubic_law_shows_up_as_third_harmonic() {
    let signal = polynomial_tone(1000.0, 44100.0, 16384, 0.0, 1.0);
    let report = HarmonicAnalyzer::new(44100.0, 16384)
        .with_window(Window::BlackmanHarris)
        .with_max_harmonics(5)
        .analyze(&signal, 1000.0);

    // (0.5 sin)^3 contributes -0.125/4 sin(3wt); the fundamental grows to 0.59375.
    let expected = 20.0 * (0.03125f32 / 0.59375).log10();
    let third = report.level_db(3).unwrap();
    assert!((third - expected).abs() < 1.0, "third {third}, expected {expected}");
    assert!(report.level_db(2).unwrap() < -90.0);
    assert_eq!(report.harmonic_levels_db.len(), 4);
}
