//! Impulse response reconstruction command.

use anyhow::{Context, bail};
use clap::Args;
use sala_analysis::sweep::{DEFAULT_DURATION_FACTOR, DEFAULT_START_MARGIN_MS};
use sala_analysis::ir_from_deconvolution;
use sala_io::{read_wav, write_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct DeconvolveArgs {
    /// Recorded sweep WAV file (played through the room)
    #[arg(value_name = "RECORDING")]
    recording: PathBuf,

    /// Inverse filter WAV file (from `sala sweep`)
    #[arg(value_name = "INVERSE")]
    inverse: PathBuf,

    /// Output impulse response WAV file
    #[arg(short, long)]
    output: PathBuf,

    /// Milliseconds kept before the direct sound
    #[arg(long, default_value_t = DEFAULT_START_MARGIN_MS)]
    start_margin_ms: f64,

    /// Multiple of the estimated T60 kept after the direct sound
    #[arg(long, default_value_t = DEFAULT_DURATION_FACTOR)]
    duration_factor: f64,
}

pub fn run(args: DeconvolveArgs) -> anyhow::Result<()> {
    let (recording, rec_info) = read_wav(&args.recording)
        .with_context(|| format!("reading {}", args.recording.display()))?;
    let (inverse, inv_info) = read_wav(&args.inverse)
        .with_context(|| format!("reading {}", args.inverse.display()))?;

    if rec_info.sample_rate != inv_info.sample_rate {
        bail!(
            "sample rate mismatch: recording at {} Hz, inverse filter at {} Hz",
            rec_info.sample_rate,
            inv_info.sample_rate
        );
    }

    let Some(ir) = ir_from_deconvolution(
        &recording,
        &inverse,
        rec_info.sample_rate,
        args.start_margin_ms,
        args.duration_factor,
    ) else {
        bail!("no impulse response could be reconstructed (silent deconvolution result)");
    };

    write_wav(&args.output, &ir.audio_data, ir.fs)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!(
        "Reconstructed {:.2} s impulse response at {} Hz: {}",
        ir.audio_data.len() as f64 / f64::from(ir.fs),
        ir.fs,
        args.output.display()
    );
    Ok(())
}
