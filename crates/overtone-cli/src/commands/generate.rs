//! Test tone generation command.

use std::path::PathBuf;

use clap::Args;
use overtone_analysis::generate_test_tone;
use overtone_io::{StereoSamples, WavSpec, write_wav_stereo};

#[derive(Args)]
pub struct GenerateArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Frequency in Hz
    #[arg(long, default_value = "1000.0")]
    freq: f32,

    /// Peak amplitude (0-1)
    #[arg(long, default_value = "0.5")]
    amplitude: f32,

    /// Duration in seconds
    #[arg(long, default_value = "1.0")]
    duration: f32,

    /// Sample rate
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let nyquist = args.sample_rate as f32 / 2.0;
    if !(args.freq > 0.0 && args.freq < nyquist) {
        anyhow::bail!("frequency must be between 0 and {nyquist} Hz");
    }
    if !(0.0..=1.0).contains(&args.amplitude) {
        anyhow::bail!("amplitude must be between 0 and 1");
    }
    if !(args.duration > 0.0) {
        anyhow::bail!("duration must be positive");
    }

    println!(
        "Generating {:.1} Hz sine, {:.2}s at {} Hz...",
        args.freq, args.duration, args.sample_rate
    );

    let tone = generate_test_tone(
        args.sample_rate as f32,
        args.freq,
        args.duration,
        args.amplitude,
    );
    let spec = WavSpec {
        channels: 2,
        sample_rate: args.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav_stereo(&args.output, &StereoSamples::from_mono(tone), spec)?;

    println!("Saved to {}", args.output.display());
    Ok(())
}
