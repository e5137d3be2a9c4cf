//! Overtone CLI - offline harmonic generation, analysis and presets.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "overtone")]
#[command(author, version, about = "Stereo harmonic generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through the harmonic generator
    Process(commands::process::ProcessArgs),

    /// Generate a sine test tone
    Generate(commands::generate::GenerateArgs),

    /// Measure harmonic levels and the alias floor of a WAV file
    Analyze(commands::analyze::AnalyzeArgs),

    /// List and show presets
    Presets(commands::presets::PresetsArgs),

    /// Encode or decode the binary parameter record
    State(commands::state::StateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::State(args) => commands::state::run(args),
    }
}
