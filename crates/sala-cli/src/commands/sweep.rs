//! Measurement sweep generation command.

use anyhow::Context;
use clap::Args;
use sala_analysis::SineSweep;
use sala_io::write_wav;
use std::path::PathBuf;

use crate::preset::AnalysisPreset;

#[derive(Args)]
pub struct SweepArgs {
    /// Output WAV file for the sweep
    #[arg(value_name = "SWEEP_OUT")]
    sweep_out: PathBuf,

    /// Output WAV file for the inverse filter
    #[arg(value_name = "INVERSE_OUT")]
    inverse_out: PathBuf,

    /// Sweep duration in seconds
    #[arg(long, default_value = "10.0")]
    duration: f64,

    /// Start frequency in Hz
    #[arg(long, default_value = "20.0")]
    start: f64,

    /// End frequency in Hz
    #[arg(long, default_value = "20000.0")]
    end: f64,

    /// Sample rate in Hz
    #[arg(long, default_value = "44100")]
    sample_rate: u32,

    /// Optional preset TOML file supplying the sweep settings
    #[arg(long)]
    preset: Option<PathBuf>,
}

pub fn run(args: SweepArgs) -> anyhow::Result<()> {
    let (duration, start, end, sample_rate) = match &args.preset {
        Some(path) => {
            let preset = AnalysisPreset::load(path)?;
            let s = preset.sweep;
            (s.duration_secs, s.start_hz, s.end_hz, s.sample_rate)
        }
        None => (args.duration, args.start, args.end, args.sample_rate),
    };

    let sweep = SineSweep::new(sample_rate, start, end, duration)?;
    let signal = sweep.generate();
    let inverse = sweep.inverse_filter();

    write_wav(&args.sweep_out, &signal, sample_rate)
        .with_context(|| format!("writing {}", args.sweep_out.display()))?;
    write_wav(&args.inverse_out, &inverse, sample_rate)
        .with_context(|| format!("writing {}", args.inverse_out.display()))?;

    println!(
        "Generated {:.1} s sweep ({:.0}-{:.0} Hz at {} Hz): {} + {}",
        duration,
        start,
        end,
        sample_rate,
        args.sweep_out.display(),
        args.inverse_out.display()
    );
    Ok(())
}
