//! Harmonic analysis command.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use overtone_analysis::{Fft, HarmonicAnalyzer, Window};
use overtone_io::read_wav_stereo;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Channel {
    #[default]
    Left,
    Right,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Fundamental frequency in Hz (detected from the spectrum peak if omitted)
    #[arg(short, long)]
    fundamental: Option<f32>,

    /// FFT size
    #[arg(long, default_value = "16384")]
    fft_size: usize,

    /// Channel to analyze
    #[arg(long, value_enum, default_value_t)]
    channel: Channel,

    /// Highest harmonic number to report
    #[arg(long, default_value = "8")]
    harmonics: usize,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    if !args.fft_size.is_power_of_two() || args.fft_size < 256 {
        anyhow::bail!("FFT size must be a power of two of at least 256");
    }

    let (samples, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let signal = match args.channel {
        Channel::Left => &samples.left,
        Channel::Right => &samples.right,
    };
    if signal.len() < args.fft_size {
        anyhow::bail!(
            "file has {} frames, need at least {} for this FFT size",
            signal.len(),
            args.fft_size
        );
    }

    // Steady-state tail, past any filter settling at the start.
    let block = &signal[signal.len() - args.fft_size..];
    let sample_rate = spec.sample_rate as f32;
    let fundamental = match args.fundamental {
        Some(f) => f,
        None => detect_fundamental(block, sample_rate)
            .context("no spectral peak found; pass --fundamental")?,
    };

    let analyzer =
        HarmonicAnalyzer::new(sample_rate, args.fft_size).with_max_harmonics(args.harmonics);
    let report = analyzer.analyze(block, fundamental);

    println!("File: {} ({:?} channel)", args.input.display(), args.channel);
    println!("Sample rate: {} Hz, FFT size: {}", spec.sample_rate, args.fft_size);
    println!();
    println!(
        "Fundamental: {:.1} Hz, amplitude {:.4}",
        report.fundamental_freq, report.fundamental_amplitude
    );
    println!();
    println!("Harmonics (dB re fundamental):");
    for (i, level) in report.harmonic_levels_db.iter().enumerate() {
        let n = i + 2;
        println!("  H{n:<2} {:>9.1} Hz  {level:>7.1} dB", fundamental * n as f32);
    }
    println!();
    println!("THD:  {:.1} dB", report.thd_db);
    println!("Spur: {:.1} dB at {:.1} Hz", report.spur_db, report.spur_freq);

    Ok(())
}

/// Frequency of the strongest bin above DC.
fn detect_fundamental(block: &[f32], sample_rate: f32) -> Option<f32> {
    let fft = Fft::new(block.len());
    let spectrum = fft.amplitude_spectrum(block, Window::BlackmanHarris);
    let (bin, amp) = spectrum
        .iter()
        .enumerate()
        .skip(1)
        .fold((0, 0.0f32), |best, (bin, &amp)| {
            if amp > best.1 { (bin, amp) } else { best }
        });
    (amp > 0.0).then(|| bin as f32 * sample_rate / block.len() as f32)
}
