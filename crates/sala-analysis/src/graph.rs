//! Plot-data shaping: decimated time series and smoothed spectra.
//!
//! These functions produce the arrays a plotting front end consumes; no
//! rendering happens here. They reuse the pipeline primitives (dB scaling,
//! FFT) on top of simple decimation and interpolation.

use sala_core::{next_pow2, to_db};
use serde::Serialize;

use crate::error::AnalysisError;
use crate::fft::{Fft, magnitude_db};

/// Default number of points for decimated time-series plots.
pub const DEFAULT_PLOT_POINTS: usize = 2000;

/// Default floor for envelope plots in dB.
pub const DEFAULT_ENVELOPE_FLOOR_DB: f64 = -70.0;

const MAX_SPECTRUM_FFT: usize = 262144;

/// A plottable time series: time labels in seconds plus values.
#[derive(Debug, Clone, Serialize)]
pub struct PlotSeries {
    /// Time axis in seconds.
    pub labels: Vec<f64>,
    /// Series values (amplitude or dB).
    pub data: Vec<f64>,
}

/// A frequency response restricted to the audible band.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyResponse {
    /// Frequency axis in Hz.
    pub frequencies: Vec<f64>,
    /// Smoothed magnitudes in dB.
    pub magnitudes: Vec<f64>,
}

/// Stride-decimate a waveform to at most `num_points` samples with a linear
/// time axis.
pub fn waveform_data(signal: &[f64], sample_rate: u32, num_points: usize) -> PlotSeries {
    let duration = signal.len() as f64 / f64::from(sample_rate);
    let data = decimate(signal, num_points);
    PlotSeries { labels: linspace(0.0, duration, data.len()), data }
}

/// Decimated peak-normalized envelope in dB, clipped below at `floor_db`.
pub fn envelope_db_data(
    signal: &[f64],
    sample_rate: u32,
    num_points: usize,
    floor_db: f64,
) -> PlotSeries {
    let magnitude: Vec<f64> = signal.iter().map(|&x| x.abs()).collect();
    let clipped: Vec<f64> = to_db(&magnitude).iter().map(|&v| v.max(floor_db)).collect();
    let duration = signal.len() as f64 / f64::from(sample_rate);
    let data = decimate(&clipped, num_points);
    PlotSeries { labels: linspace(0.0, duration, data.len()), data }
}

/// Fractional-octave-smoothed magnitude response over `[20, fs/2]` Hz.
///
/// The spectrum is computed at four times the next power of two of the
/// signal length (capped), RMS-averaged over `1/bands_per_octave`-octave
/// windows on geometrically spaced centers, and interpolated back onto the
/// FFT grid on a log-frequency axis.
pub fn frequency_response(
    signal: &[f64],
    sample_rate: u32,
    bands_per_octave: usize,
) -> Result<FrequencyResponse, AnalysisError> {
    if signal.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    let fs = f64::from(sample_rate);
    let nfft = (next_pow2(signal.len()) * 4).min(MAX_SPECTRUM_FFT);
    let fft = Fft::new(nfft);
    let spectrum = fft.forward(signal);
    let half = &spectrum[..nfft / 2 + 1];

    let frequencies: Vec<f64> = (0..half.len()).map(|k| k as f64 * fs / nfft as f64).collect();
    let mag_db = magnitude_db(half);
    let smoothed = octave_smooth(&frequencies[1..], &mag_db[1..], bands_per_octave.max(1));

    let mut out_f = Vec::new();
    let mut out_m = Vec::new();
    for (i, &f) in frequencies.iter().enumerate().skip(1) {
        if f >= 20.0 && f <= fs / 2.0 {
            out_f.push(f);
            out_m.push(smoothed[i - 1]);
        }
    }
    Ok(FrequencyResponse { frequencies: out_f, magnitudes: out_m })
}

/// RMS smoothing over fractional-octave windows on geometric centers,
/// interpolated back onto the input grid in log frequency.
fn octave_smooth(frequencies: &[f64], mag_db: &[f64], bands_per_octave: usize) -> Vec<f64> {
    let f_max = frequencies.last().copied().unwrap_or(20.0);
    let octaves = (f_max / 20.0).log2().max(0.0);
    let num_centers = ((bands_per_octave as f64 * octaves).ceil() as usize).max(10);
    let half_width = 2.0f64.powf(1.0 / (2.0 * bands_per_octave as f64));

    let centers: Vec<f64> = (0..num_centers)
        .map(|i| 20.0 * (f_max / 20.0).powf(i as f64 / (num_centers - 1) as f64))
        .collect();

    let mag_lin: Vec<f64> = mag_db.iter().map(|&m| 10.0f64.powf(m / 20.0)).collect();
    let centers_db: Vec<f64> = centers
        .iter()
        .map(|&c| {
            let lo = frequencies.partition_point(|&f| f < c / half_width);
            let hi = frequencies.partition_point(|&f| f <= c * half_width);
            let rms = if hi <= lo {
                // No bin falls inside the window: take the nearest one.
                let nearest = frequencies
                    .iter()
                    .enumerate()
                    .min_by(|a, b| (a.1 - c).abs().total_cmp(&(b.1 - c).abs()))
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                mag_lin[nearest]
            } else {
                let window = &mag_lin[lo..hi];
                (window.iter().map(|&v| v * v).sum::<f64>() / window.len() as f64).sqrt()
            };
            20.0 * rms.max(1e-12).log10()
        })
        .collect();

    let log_centers: Vec<f64> = centers.iter().map(|&c| c.log10()).collect();
    frequencies
        .iter()
        .map(|&f| interpolate(f.log10(), &log_centers, &centers_db))
        .collect()
}

/// Piecewise-linear interpolation with clamped ends over an ascending grid.
pub(crate) fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(!xs.is_empty());
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    let hi = xs.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let span = xs[hi] - xs[lo];
    if span == 0.0 {
        return ys[lo];
    }
    let frac = (x - xs[lo]) / span;
    ys[lo] + frac * (ys[hi] - ys[lo])
}

fn decimate(signal: &[f64], num_points: usize) -> Vec<f64> {
    if num_points == 0 || signal.len() <= num_points {
        return signal.to_vec();
    }
    let step = signal.len() / num_points;
    signal.iter().step_by(step.max(1)).copied().collect()
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}
