//! Decay analysis: truncated Schroeder integration and the Lundeby
//! crossover search.
//!
//! Backward-integrating an impulse response that carries a noise floor
//! flattens the decay tail and inflates reverberation estimates. The
//! Lundeby algorithm locates the sample where the decay meets the noise
//! floor; the Schroeder integral is truncated there before any regression
//! runs on it.

use sala_core::{block_rms, linear_regression_in_range, to_db};
use tracing::trace;

/// Default block length for the coarse RMS decay, in milliseconds.
pub const DEFAULT_BLOCK_MS: f64 = 20.0;

const MAX_ITERATIONS: usize = 10;
const CONVERGENCE_SECS: f64 = 1e-3;

/// Schroeder backward integral and the squared power signal it came from.
#[derive(Debug, Clone)]
pub struct SchroederData {
    /// Energy remaining after each sample; zero from the cutoff on.
    pub curve: Vec<f64>,
    /// The squared input samples.
    pub p_squared: Vec<f64>,
}

/// Result of the Lundeby crossover search, in input-signal samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LundebyData {
    /// Sample index where the decay meets the noise floor, in `[1, len]`.
    pub crossover_index: usize,
    /// Sample index from which the tail is noise-dominated, in `[0, len]`.
    pub noise_start_index: usize,
}

/// Backward Schroeder integration of a power signal, truncated at `cutoff`
/// (exclusive; `None` integrates the full signal).
///
/// `S[n] = sum_{m=n..cutoff-1} p[m]^2 * dt` for `n < cutoff`, zero after.
/// Accumulating backward keeps the curve non-increasing by construction.
pub fn schroeder_integral(power: &[f64], fs: f64, cutoff: Option<usize>) -> SchroederData {
    let cutoff = cutoff.unwrap_or(power.len()).min(power.len());
    let dt = 1.0 / fs;
    let p_squared: Vec<f64> = power.iter().map(|&p| p * p).collect();

    let mut curve = vec![0.0; power.len()];
    let mut acc = 0.0;
    for n in (0..cutoff).rev() {
        acc += p_squared[n] * dt;
        curve[n] = acc;
    }
    SchroederData { curve, p_squared }
}

/// Locate the decay/noise crossover of an envelope with the iterative
/// Lundeby procedure.
///
/// The search runs on the dB-scaled Schroeder integral of a coarse
/// block-RMS decay (blocks of `block_ms`). An envelope shorter than one
/// block has nothing to truncate: the crossover is the full length and the
/// noise tail is empty.
pub fn lundeby_crossover(envelope: &[f64], sample_rate: u32, block_ms: f64) -> LundebyData {
    let n = envelope.len();
    let fs = f64::from(sample_rate);
    let block = ((fs * block_ms / 1000.0).round() as usize).max(1);

    let rms = block_rms(envelope, block);
    if rms.is_empty() {
        return LundebyData { crossover_index: n.max(1), noise_start_index: n };
    }

    let fs_rms = fs / block as f64;
    let time: Vec<f64> = (0..rms.len()).map(|k| (k * block) as f64 / fs).collect();
    let decay_db = to_db(&schroeder_integral(&rms, fs_rms, None).curve);

    // Initial noise estimate from the last 10% of the coarse decay.
    let tail_start = (decay_db.len() as f64 * 0.9) as usize;
    let mut noise_level = mean(&decay_db[tail_start..]);

    let fit = linear_regression_in_range(&time, &decay_db, 0.0, noise_level + 7.5);
    let mut slope = fit.slope;
    let mut intercept = fit.intercept;
    let mut crossover_time = level_crossing(noise_level, intercept, slope);
    let mut previous = crossover_time;

    let min_tail = (0.1 * n as f64) as usize;
    let mut noise_start = n;

    for iteration in 0..MAX_ITERATIONS {
        // Re-estimate the noise level from safely past the decay, keeping
        // at least 10% of the signal as tail.
        let noise_start_time = level_crossing(noise_level + 7.5, intercept, slope);
        noise_start = clamp_to_index(noise_start_time * fs, n);
        if n - noise_start < min_tail {
            noise_start = n - min_tail;
        }

        let start_block = (noise_start / block).min(decay_db.len() - 1);
        noise_level = mean(&decay_db[start_block..]);

        let lower = noise_level + 10.0;
        if lower >= -5.0 {
            break;
        }
        let fit = linear_regression_in_range(&time, &decay_db, -5.0, lower);
        slope = fit.slope;
        intercept = fit.intercept;

        crossover_time = level_crossing(noise_level, intercept, slope);
        if (crossover_time - previous).abs() < CONVERGENCE_SECS {
            trace!(iteration, crossover_time, noise_level, "lundeby converged");
            break;
        }
        previous = crossover_time;
    }

    LundebyData {
        crossover_index: clamp_to_index(crossover_time * fs, n).max(1),
        noise_start_index: noise_start,
    }
}

/// Time at which the fitted line reaches `level`; infinite for a flat fit.
fn level_crossing(level: f64, intercept: f64, slope: f64) -> f64 {
    if slope == 0.0 { f64::INFINITY } else { (level - intercept) / slope }
}

/// Round a sample position into `[0, len]`, sending non-finite values to
/// the end.
fn clamp_to_index(position: f64, len: usize) -> usize {
    if position.is_finite() {
        (position.round().max(0.0) as usize).min(len)
    } else {
        len
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
