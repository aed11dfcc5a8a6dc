//! WAV file information command.

use anyhow::Context;
use clap::Args;
use sala_io::read_wav_info;
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoArgs {
    /// WAV file to inspect
    #[arg(value_name = "INPUT")]
    input: PathBuf,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = read_wav_info(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    println!("File:        {}", args.input.display());
    println!("Format:      {} ({} bit)", info.format, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample rate: {} Hz", info.sample_rate);
    println!("Frames:      {}", info.num_frames);
    println!("Duration:    {:.3} s", info.duration_secs());
    Ok(())
}
