//! STFT spectrogram and cumulative spectral decay on log-frequency axes.
//!
//! Both analyses slice the impulse response into windowed frames, transform
//! them, and resample the frequency axis logarithmically between 20 Hz and
//! 20 kHz so the data plots naturally on audio axes. Levels are normalized
//! to 0 dB at the global maximum and clipped to a fixed dynamic range.

use rustfft::num_complex::Complex64;
use serde::Serialize;

use crate::error::AnalysisError;
use crate::fft::{Fft, Window, magnitude_db};
use crate::graph::interpolate;

const LOG_FREQ_MIN: f64 = 20.0;
const LOG_FREQ_MAX: f64 = 20000.0;
const SPECTROGRAM_BINS: usize = 512;
const SPECTROGRAM_FLOOR_DB: f64 = -80.0;
const CSD_FFT_SIZE: usize = 8192;
const CSD_BINS: usize = 1024;
const CSD_RANGE_DB: f64 = 60.0;

/// A time-frequency level grid on a logarithmic frequency axis.
///
/// `data[bin][frame]` is the level in dB, normalized so the global maximum
/// sits at 0 dB.
#[derive(Debug, Clone, Serialize)]
pub struct TimeFrequencyGrid {
    /// Levels in dB, indexed `[frequency_bin][time_frame]`.
    #[serde(rename = "Sxx")]
    pub data: Vec<Vec<f64>>,
    /// Logarithmically spaced frequency axis in Hz.
    #[serde(rename = "f")]
    pub frequencies: Vec<f64>,
    /// Frame times in seconds.
    #[serde(rename = "t")]
    pub times: Vec<f64>,
    /// Lowest level in the grid after clipping.
    pub min_db: f64,
    /// Highest level in the grid (0 by construction).
    pub max_db: f64,
}

/// Power spectrogram resampled onto a logarithmic frequency axis.
///
/// Hann-windowed frames of `round(0.046 * fs)` samples at 50% overlap;
/// power is interpolated onto 512 log-spaced bins in [20 Hz, 20 kHz],
/// converted to dB, normalized to 0 dB and clipped at -80 dB. The input
/// must cover at least one analysis window.
pub fn spectrogram(signal: &[f64], sample_rate: u32) -> Result<TimeFrequencyGrid, AnalysisError> {
    let fs = f64::from(sample_rate);
    let window_len = ((0.046 * fs).round() as usize).max(2);
    let hop = (window_len / 2).max(1);
    frame_grid(
        signal,
        sample_rate,
        window_len,
        hop,
        SPECTROGRAM_BINS,
        SPECTROGRAM_FLOOR_DB,
        LevelScale::Power,
        Smoothing::None,
    )
}

/// Cumulative spectral decay: how the spectrum of the tail collapses over
/// time.
///
/// 8192-sample Hann frames at quarter-window hops; each slice is smoothed
/// over `1/bands_per_octave`-octave windows, interpolated onto 1024 log
/// bins, normalized to 0 dB at the global maximum and clipped to -60 dB.
pub fn cumulative_spectral_decay(
    signal: &[f64],
    sample_rate: u32,
    bands_per_octave: usize,
) -> Result<TimeFrequencyGrid, AnalysisError> {
    frame_grid(
        signal,
        sample_rate,
        CSD_FFT_SIZE,
        CSD_FFT_SIZE / 4,
        CSD_BINS,
        -CSD_RANGE_DB,
        LevelScale::Amplitude,
        Smoothing::FractionalOctave(bands_per_octave.max(1)),
    )
}

#[derive(Clone, Copy)]
enum LevelScale {
    /// 10 log10 of squared magnitude.
    Power,
    /// 20 log10 of magnitude.
    Amplitude,
}

#[derive(Clone, Copy)]
enum Smoothing {
    None,
    FractionalOctave(usize),
}

#[allow(clippy::too_many_arguments)]
fn frame_grid(
    signal: &[f64],
    sample_rate: u32,
    window_len: usize,
    hop: usize,
    num_bins: usize,
    floor_db: f64,
    scale: LevelScale,
    smoothing: Smoothing,
) -> Result<TimeFrequencyGrid, AnalysisError> {
    // A meaningful grid needs at least one full window and 100 ms of audio.
    let min_len = window_len.max(sample_rate as usize / 10);
    if signal.len() < min_len {
        return Err(AnalysisError::InputTooShort(min_len));
    }

    let fs = f64::from(sample_rate);
    let fft = Fft::new(window_len);
    let window = Window::Hann.coefficients(window_len);
    let half_bins = window_len / 2 + 1;
    let bin_freqs: Vec<f64> = (0..half_bins).map(|k| k as f64 * fs / window_len as f64).collect();

    let f_max = LOG_FREQ_MAX.min(fs / 2.0);
    let log_freqs: Vec<f64> = (0..num_bins)
        .map(|i| LOG_FREQ_MIN * (f_max / LOG_FREQ_MIN).powf(i as f64 / (num_bins - 1) as f64))
        .collect();

    let num_frames = (signal.len() - window_len) / hop + 1;
    let mut grid = vec![vec![0.0f64; num_frames]; num_bins];
    let mut times = Vec::with_capacity(num_frames);

    for frame in 0..num_frames {
        let start = frame * hop;
        times.push((start + window_len / 2) as f64 / fs);

        let mut buffer: Vec<Complex64> = signal[start..start + window_len]
            .iter()
            .zip(window.iter())
            .map(|(&x, &w)| Complex64::new(x * w, 0.0))
            .collect();
        fft.forward_complex(&mut buffer);

        let slice_db: Vec<f64> = match scale {
            LevelScale::Power => buffer[..half_bins]
                .iter()
                .map(|c| 10.0 * (c.norm_sqr() + 1e-10).log10())
                .collect(),
            LevelScale::Amplitude => magnitude_db(&buffer[..half_bins]),
        };
        let slice_db = match smoothing {
            Smoothing::None => slice_db,
            Smoothing::FractionalOctave(bpo) => {
                fractional_octave_smooth(&slice_db, &bin_freqs, bpo)
            }
        };

        for (bin, &f) in log_freqs.iter().enumerate() {
            grid[bin][frame] = interpolate(f, &bin_freqs, &slice_db);
        }
    }

    // Normalize the whole grid to 0 dB and clip to the dynamic range.
    let max = grid
        .iter()
        .flat_map(|row| row.iter())
        .fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    let mut min = f64::INFINITY;
    for row in &mut grid {
        for v in row.iter_mut() {
            *v = (*v - max).max(floor_db);
            min = min.min(*v);
        }
    }

    Ok(TimeFrequencyGrid {
        data: grid,
        frequencies: log_freqs,
        times,
        min_db: min,
        max_db: 0.0,
    })
}

/// Average dB levels over a `1/fraction`-octave window around each bin.
/// Bins below 20 Hz are copied through unsmoothed.
fn fractional_octave_smooth(spectrum_db: &[f64], frequencies: &[f64], fraction: usize) -> Vec<f64> {
    let half_width = 2.0f64.powf(1.0 / (2.0 * fraction as f64));
    let mut smoothed = spectrum_db.to_vec();
    for (i, &fc) in frequencies.iter().enumerate() {
        if fc < LOG_FREQ_MIN {
            continue;
        }
        let lo = frequencies.partition_point(|&f| f < fc / half_width);
        let hi = frequencies.partition_point(|&f| f <= fc * half_width);
        if hi > lo {
            smoothed[i] = spectrum_db[lo..hi].iter().sum::<f64>() / (hi - lo) as f64;
        }
    }
    smoothed
}
