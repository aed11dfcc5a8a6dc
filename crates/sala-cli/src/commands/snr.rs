//! Signal-to-noise estimation command.

use anyhow::Context;
use clap::Args;
use sala_analysis::snr::DEFAULT_TAIL_FRACTION;
use sala_analysis::snr_db;
use sala_io::read_wav;
use std::path::PathBuf;

use crate::preset::AnalysisPreset;

#[derive(Args)]
pub struct SnrArgs {
    /// Input impulse response WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Fraction of the IR tail treated as noise
    #[arg(long, default_value_t = DEFAULT_TAIL_FRACTION)]
    tail_fraction: f64,

    /// Optional preset TOML file (its tail fraction replaces the flag)
    #[arg(long)]
    preset: Option<PathBuf>,
}

pub fn run(args: SnrArgs) -> anyhow::Result<()> {
    let tail_fraction = match &args.preset {
        Some(path) => AnalysisPreset::load(path)?.tail_fraction,
        None => args.tail_fraction,
    };

    let (samples, _) = read_wav(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    match snr_db(&samples, tail_fraction)? {
        Some(snr) if snr.is_infinite() => println!("SNR: inf dB (silent noise tail)"),
        Some(snr) => println!("SNR: {snr:.1} dB"),
        None => println!("SNR: not computable (empty or silent impulse response)"),
    }
    Ok(())
}
