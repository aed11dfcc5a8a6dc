//! Sala CLI - measure and analyze room impulse responses.

mod commands;
mod preset;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sala")]
#[command(author, version, about = "Room impulse response analysis toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute ISO 3382 acoustic parameters from an impulse response
    Analyze(commands::analyze::AnalyzeArgs),

    /// Generate a measurement sweep and its inverse filter
    Sweep(commands::sweep::SweepArgs),

    /// Reconstruct an impulse response from a recorded sweep
    Deconvolve(commands::deconvolve::DeconvolveArgs),

    /// Estimate the signal-to-noise ratio of an impulse response
    Snr(commands::snr::SnrArgs),

    /// Display WAV file information
    Info(commands::info::InfoArgs),

    /// Export plot data (waveform, envelope, spectrum, spectrogram, CSD)
    Plot(commands::plot::PlotArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Sweep(args) => commands::sweep::run(args),
        Commands::Deconvolve(args) => commands::deconvolve::run(args),
        Commands::Snr(args) => commands::snr::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Plot(args) => commands::plot::run(args),
    }
}
