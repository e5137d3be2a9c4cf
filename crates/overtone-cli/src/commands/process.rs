//! File-based harmonic processing command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use overtone_core::linear_to_db;
use overtone_io::{WavSpec, read_wav_stereo, render_stereo_with_progress, write_wav_stereo};
use overtone_processor::{HarmonicProcessor, ParamSnapshot, ProcessorConfig};

use super::common::{ParamArgs, peak, rms};

/// Block size used when neither the flag nor the preset sets one.
const DEFAULT_BLOCK_SIZE: usize = 512;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    params: ParamArgs,

    /// Processing block size (defaults to the preset's, else 512)
    #[arg(long)]
    block_size: Option<usize>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let (snapshot, preset) = args.params.resolve()?;
    let config = preset
        .as_ref()
        .map(|p| p.processor_config())
        .unwrap_or_default();
    let block_size = args
        .block_size
        .or_else(|| preset.as_ref().and_then(|p| p.block_size()))
        .unwrap_or(DEFAULT_BLOCK_SIZE);

    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    println!(
        "  {} frames, {} Hz, {} ch, {:.2}s",
        input.len(),
        spec.sample_rate,
        spec.channels,
        input.len() as f64 / f64::from(spec.sample_rate)
    );

    if let Some(preset) = &preset {
        println!("Preset: {}", preset.name);
        if let Some(rate) = preset.sample_rate()
            && rate != spec.sample_rate
        {
            tracing::warn!(
                preset_rate = rate,
                file_rate = spec.sample_rate,
                "preset sample rate differs from the input file; using the file's"
            );
        }
    }
    print_settings(&snapshot, &config, block_size);

    let mut processor = HarmonicProcessor::with_config(Arc::new(snapshot), config);
    processor.prepare(f64::from(spec.sample_rate), block_size)?;

    let pb = ProgressBar::new(input.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );
    let output = render_stereo_with_progress(&mut processor, &input, block_size, |done| {
        pb.set_position(done as u64);
    })?;
    pb.finish_and_clear();

    println!("\nStats:");
    for (label, samples) in [("Input", &input), ("Output", &output)] {
        let both: Vec<f32> = samples.left.iter().chain(&samples.right).copied().collect();
        println!(
            "  {label:<7} RMS {:.1} dB, Peak {:.1} dB",
            linear_to_db(rms(&both)),
            linear_to_db(peak(&both))
        );
    }
    println!("  Latency {:.3} samples", processor.latency_samples());

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &output, out_spec)?;
    println!("Done!");

    Ok(())
}

fn print_settings(snapshot: &ParamSnapshot, config: &ProcessorConfig, block_size: usize) {
    println!(
        "Settings: second {:.2}, third {:.2}, mix {:.2}, oversampling {}",
        snapshot.second_harmonic,
        snapshot.third_harmonic,
        snapshot.mix,
        if snapshot.oversampling { "on" } else { "off" }
    );
    println!(
        "          DC filter {:.1} Hz {:?}, block size {block_size}",
        config.dc_cutoff_hz, config.dc_slope
    );
}
