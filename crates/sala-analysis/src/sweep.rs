//! Exponential sine sweeps and impulse-response reconstruction.
//!
//! The Farina measurement method: play an exponential sweep in the room,
//! record it, and convolve the recording with a matched amplitude-modulated
//! inverse filter. Their linear convolution is a near-ideal delta, so the
//! product in the frequency domain reconstructs the room's impulse
//! response, which is then trimmed around the direct sound.

use rustfft::num_complex::Complex64;
use std::f64::consts::PI;
use tracing::debug;

use sala_core::{linear_regression, next_pow2};

use crate::error::AnalysisError;
use crate::fft::Fft;
use crate::hilbert;

/// Default pre-peak margin kept when trimming a reconstructed IR, in ms.
pub const DEFAULT_START_MARGIN_MS: f64 = 20.0;

/// Default multiple of the estimated T60 kept after the peak.
pub const DEFAULT_DURATION_FACTOR: f64 = 4.0;

/// Exponential sine sweep generator.
#[derive(Debug, Clone, Copy)]
pub struct SineSweep {
    sample_rate: u32,
    start_hz: f64,
    end_hz: f64,
    duration_secs: f64,
}

impl SineSweep {
    /// Create a sweep description.
    ///
    /// Requires `0 < start_hz < end_hz < fs/2` and a positive duration.
    pub fn new(
        sample_rate: u32,
        start_hz: f64,
        end_hz: f64,
        duration_secs: f64,
    ) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate);
        }
        let nyquist = f64::from(sample_rate) / 2.0;
        if !(start_hz > 0.0 && start_hz < end_hz && end_hz < nyquist && duration_secs > 0.0) {
            return Err(AnalysisError::InvalidSweepParameters);
        }
        Ok(Self { sample_rate, start_hz, end_hz, duration_secs })
    }

    /// Number of samples in the sweep.
    pub fn num_samples(&self) -> usize {
        (self.duration_secs * f64::from(self.sample_rate)) as usize
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Generate the sweep, peak-normalized to 1.
    pub fn generate(&self) -> Vec<f64> {
        normalized(self.raw_sweep())
    }

    /// Generate the matched inverse filter, peak-normalized to 1.
    ///
    /// The time-reversed sweep is weighted by the inverse of the sweep's
    /// instantaneous-frequency growth, flattening its energy per octave so
    /// the convolution of the pair is a bandlimited delta.
    pub fn inverse_filter(&self) -> Vec<f64> {
        let sweep = self.raw_sweep();
        let n = sweep.len();
        let (rate, length) = self.exponent();
        let fs = f64::from(self.sample_rate);

        let inverse: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64 / fs;
                let modulation = self.start_hz / ((rate / length) * (t / length).exp());
                modulation * sweep[n - 1 - i]
            })
            .collect();
        normalized(inverse)
    }

    /// Sweep phase constants: `(K, L)` with `sweep(t) = sin(K (e^{t/L}-1))`.
    fn exponent(&self) -> (f64, f64) {
        let octaves = (self.end_hz / self.start_hz).ln();
        let length = self.duration_secs / octaves;
        let rate = 2.0 * PI * self.start_hz * length;
        (rate, length)
    }

    fn raw_sweep(&self) -> Vec<f64> {
        let fs = f64::from(self.sample_rate);
        let (rate, length) = self.exponent();
        (0..self.num_samples())
            .map(|i| {
                let t = i as f64 / fs;
                (rate * ((t / length).exp() - 1.0)).sin()
            })
            .collect()
    }
}

/// A reconstructed impulse response.
#[derive(Debug, Clone)]
pub struct DeconvolvedIr {
    /// Peak-normalized impulse response samples.
    pub audio_data: Vec<f64>,
    /// Sample rate in Hz.
    pub fs: u32,
}

/// Raw frequency-domain deconvolution: the linear convolution of the
/// recording with the inverse filter.
///
/// Returns `None` for empty inputs or an all-zero product.
pub fn deconvolve(recording: &[f64], inverse_filter: &[f64]) -> Option<Vec<f64>> {
    if recording.is_empty() || inverse_filter.is_empty() {
        return None;
    }
    let linear_len = recording.len() + inverse_filter.len() - 1;
    let fft = Fft::new(next_pow2(linear_len));

    let pad = |signal: &[f64]| {
        let mut buffer: Vec<Complex64> =
            signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        buffer.resize(fft.size(), Complex64::new(0.0, 0.0));
        buffer
    };
    let mut spectrum = pad(recording);
    let mut inverse_spectrum = pad(inverse_filter);
    fft.forward_complex(&mut spectrum);
    fft.forward_complex(&mut inverse_spectrum);
    for (a, b) in spectrum.iter_mut().zip(inverse_spectrum.iter()) {
        *a *= *b;
    }
    fft.inverse_complex(&mut spectrum);

    let ir: Vec<f64> = spectrum[..linear_len].iter().map(|c| c.re).collect();
    if ir.iter().all(|&x| x == 0.0) {
        return None;
    }
    Some(ir)
}

/// Reconstruct and trim an impulse response from a recorded sweep.
///
/// The IR is cut `start_margin_ms` before its peak and `duration_factor`
/// times the estimated T60 after it, then peak-normalized. Returns `None`
/// when no usable IR comes out of the deconvolution.
pub fn ir_from_deconvolution(
    recording: &[f64],
    inverse_filter: &[f64],
    sample_rate: u32,
    start_margin_ms: f64,
    duration_factor: f64,
) -> Option<DeconvolvedIr> {
    let fs = f64::from(sample_rate);
    let mut ir = deconvolve(recording, inverse_filter)?;

    let (peak_index, peak_value) = ir
        .iter()
        .enumerate()
        .map(|(i, &x)| (i, x.abs()))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });

    if peak_value < 1e-9 {
        // Too weak to locate a direct sound; hand back the whole thing.
        for x in &mut ir {
            *x /= peak_value;
        }
        return Some(DeconvolvedIr { audio_data: ir, fs: sample_rate });
    }

    let margin = (start_margin_ms * fs / 1000.0).round() as usize;
    let mut start = peak_index.saturating_sub(margin);

    let t60 = tail_t60(&ir[peak_index..], peak_value, sample_rate);
    debug!(peak_index, t60, "trimming deconvolved impulse response");
    let mut end = (peak_index + (t60 * duration_factor * fs).round() as usize).min(ir.len());
    if end <= start {
        start = 0;
        end = ir.len();
    }

    let mut trimmed = ir[start..end].to_vec();
    let max_abs = trimmed.iter().fold(0.0f64, |m, &x| m.max(x.abs()));
    if max_abs > 1e-9 {
        for x in &mut trimmed {
            *x /= max_abs;
        }
    }
    Some(DeconvolvedIr { audio_data: trimmed, fs: sample_rate })
}

/// Estimate the decay time of the post-peak tail from its analytic
/// envelope, fitting the [-35, -5] dB region.
///
/// Falls back to 1 s when fewer than 5% of a second's worth of samples
/// qualify or the fit does not decay; the result is clipped to [0.1, 10] s.
fn tail_t60(tail: &[f64], peak_value: f64, sample_rate: u32) -> f64 {
    let fs = f64::from(sample_rate);
    let envelope = hilbert::envelope(tail);

    let mut times = Vec::new();
    let mut levels = Vec::new();
    for (i, &e) in envelope.iter().enumerate() {
        let db = 20.0 * (e / peak_value + 1e-9).log10();
        if (-35.0..=-5.0).contains(&db) {
            times.push(i as f64 / fs);
            levels.push(db);
        }
    }

    if times.len() > (0.05 * fs) as usize {
        let fit = linear_regression(&times, &levels);
        if fit.slope.is_finite() && fit.slope < 0.0 {
            return (-60.0 / fit.slope).clamp(0.1, 10.0);
        }
    }
    1.0
}

fn normalized(mut signal: Vec<f64>) -> Vec<f64> {
    let peak = signal.iter().fold(0.0f64, |m, &x| m.max(x.abs()));
    if peak > 0.0 {
        for x in &mut signal {
            *x /= peak;
        }
    }
    signal
}
