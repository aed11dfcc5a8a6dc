//! WAV file reading and writing.
//!
//! The analysis side consumes one mono `f64` sequence and a sample rate,
//! so the reader collapses whatever the file contains (PCM or float, any
//! channel count) into that shape. Writing only ever happens for analysis
//! products, which are mono float by construction, so the writer is fixed
//! to 32-bit float and takes just a sample rate.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Sample encoding found in a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Integer PCM samples.
    Pcm,
    /// 32-bit IEEE float samples.
    IeeeFloat,
}

impl From<SampleFormat> for WavFormat {
    fn from(format: SampleFormat) -> Self {
        match format {
            SampleFormat::Int => Self::Pcm,
            SampleFormat::Float => Self::IeeeFloat,
        }
    }
}

impl fmt::Display for WavFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pcm => "PCM",
            Self::IeeeFloat => "IEEE float",
        })
    }
}

/// Header-level description of a WAV file.
///
/// Returned both by [`read_wav_info`] (header only) and by [`read_wav`]
/// alongside the decoded samples, so callers that need the sample rate or
/// want to report what they loaded work from one type.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count as stored in the file (the reader mixes down to mono).
    pub channels: u16,
    /// Stored bit depth.
    pub bits_per_sample: u16,
    /// Sample encoding.
    pub format: WavFormat,
    /// Frames in the file (one frame spans all channels).
    pub num_frames: u64,
}

impl WavInfo {
    fn from_header(header: hound::WavSpec, total_samples: u64) -> Self {
        Self {
            sample_rate: header.sample_rate,
            channels: header.channels,
            bits_per_sample: header.bits_per_sample,
            format: header.sample_format.into(),
            num_frames: total_samples / u64::from(header.channels),
        }
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.num_frames as f64 / f64::from(self.sample_rate)
    }
}

/// Describe a WAV file from its header alone, without decoding samples.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let total_samples = u64::from(reader.len());
    Ok(WavInfo::from_header(reader.spec(), total_samples))
}

/// Load a WAV file as a mono `f64` signal plus its header description.
///
/// Integer PCM is rescaled by its bit depth into `[-1, 1)`; multi-channel
/// audio is averaged into a single channel. A file with no frames is
/// rejected, since every consumer here needs at least one sample.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, WavInfo)> {
    let reader = WavReader::open(path)?;
    let header = reader.spec();
    let info = WavInfo::from_header(header, u64::from(reader.len()));

    let interleaved: Vec<f64> = match header.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (header.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) * scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };
    if interleaved.is_empty() {
        return Err(Error::Empty);
    }

    let channels = usize::from(info.channels);
    let mono = if channels == 1 {
        interleaved
    } else {
        let gain = 1.0 / channels as f64;
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f64>() * gain)
            .collect()
    };

    debug!(
        frames = mono.len(),
        sample_rate = info.sample_rate,
        channels,
        format = %info.format,
        "loaded WAV"
    );
    Ok((mono, info))
}

/// Write a mono signal as a 32-bit float WAV file.
///
/// Samples are narrowed to `f32` on the way out; the analysis side works
/// in `f64` but distribution formats do not.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f64], sample_rate: u32) -> Result<()> {
    let header = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, header)?;
    for &sample in samples {
        writer.write_sample(sample as f32)?;
    }
    writer.finalize()?;
    Ok(())
}
