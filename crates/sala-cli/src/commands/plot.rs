//! Plot-data export command.

use anyhow::Context;
use clap::{Args, ValueEnum};
use sala_analysis::graph::{
    DEFAULT_ENVELOPE_FLOOR_DB, DEFAULT_PLOT_POINTS, envelope_db_data, frequency_response,
    waveform_data,
};
use sala_analysis::spectrogram::{cumulative_spectral_decay, spectrogram};
use sala_io::read_wav;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlotKind {
    /// Decimated time-domain waveform
    Waveform,
    /// Peak-normalized envelope in dB
    Envelope,
    /// Octave-smoothed frequency response
    Frequency,
    /// Log-frequency spectrogram
    Spectrogram,
    /// Cumulative spectral decay waterfall
    Csd,
}

#[derive(Args)]
pub struct PlotArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Which data set to export
    #[arg(long, value_enum)]
    kind: PlotKind,

    /// Output JSON file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Points for decimated time-series plots
    #[arg(long, default_value_t = DEFAULT_PLOT_POINTS)]
    points: usize,

    /// Smoothing resolution in bands per octave (frequency / CSD)
    #[arg(long, default_value = "24")]
    bands_per_octave: usize,
}

pub fn run(args: PlotArgs) -> anyhow::Result<()> {
    let (samples, info) = read_wav(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let fs = info.sample_rate;

    let json = match args.kind {
        PlotKind::Waveform => to_json(&waveform_data(&samples, fs, args.points))?,
        PlotKind::Envelope => to_json(&envelope_db_data(
            &samples,
            fs,
            args.points,
            DEFAULT_ENVELOPE_FLOOR_DB,
        ))?,
        PlotKind::Frequency => to_json(&frequency_response(&samples, fs, args.bands_per_octave)?)?,
        PlotKind::Spectrogram => to_json(&spectrogram(&samples, fs)?)?,
        PlotKind::Csd => to_json(&cumulative_spectral_decay(&samples, fs, args.bands_per_octave)?)?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {:?} data to {}", args.kind, path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?)
}
