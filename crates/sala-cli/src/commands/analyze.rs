//! Acoustic parameter analysis command.

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use sala_analysis::{AcousticPipeline, FilterType};
use sala_io::read_wav;
use std::path::PathBuf;
use std::time::Duration;

use crate::preset::AnalysisPreset;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input impulse response WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Band resolution: 1 = octave, 3 = third-octave
    #[arg(long, default_value = "1")]
    filter_type: u8,

    /// Envelope smoothing window in milliseconds
    #[arg(long, default_value = "5")]
    window_ms: u32,

    /// Butterworth prototype order for the band filters
    #[arg(long, default_value = "4")]
    filter_order: usize,

    /// Optional preset TOML file (its values replace the flags above)
    #[arg(long)]
    preset: Option<PathBuf>,

    /// Write the result as JSON to this file instead of a table
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let (mut filter_type, mut window_ms) = (args.filter_type, args.window_ms);
    if let Some(path) = &args.preset {
        let preset = AnalysisPreset::load(path)?;
        tracing::debug!(preset = %preset.name, "loaded analysis preset");
        filter_type = preset.filter_type;
        window_ms = preset.smoothing_window_ms;
    }

    let (samples, info) = read_wav(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let pipeline = AcousticPipeline::with_filter_order(
        info.sample_rate,
        FilterType::from_code(filter_type)?,
        window_ms,
        args.filter_order,
    )?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!(
        "analyzing {} ({} samples at {} Hz)",
        args.input.display(),
        samples.len(),
        info.sample_rate
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = pipeline.run(&samples)?;
    spinner.finish_and_clear();

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {} bands to {}", result.len(), path.display());
        return Ok(());
    }

    println!(
        "{:>6}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        "Band", "EDT", "T60(T20)", "T60(T30)", "C50", "D50"
    );
    println!(
        "{:>6}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
        "[Hz]", "[s]", "[s]", "[s]", "[dB]", "[%]"
    );
    // String keys sort lexicographically; order rows by frequency instead.
    let mut rows: Vec<_> = result.iter().collect();
    rows.sort_by_key(|(band, _)| band.parse::<u32>().unwrap_or(u32::MAX));
    for (band, params) in rows {
        println!(
            "{:>6}  {:>8}  {:>8}  {:>8}  {:>8.2}  {:>8.1}",
            band,
            format_seconds(params.edt),
            format_seconds(params.t60_from_t20),
            format_seconds(params.t60_from_t30),
            params.c50,
            params.d50,
        );
    }
    Ok(())
}

fn format_seconds(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "--".to_string(),
    }
}
