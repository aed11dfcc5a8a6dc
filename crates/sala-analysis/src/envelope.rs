//! Envelope extraction and smoothing.

use sala_core::moving_average;

use crate::error::AnalysisError;
use crate::hilbert;

/// Default envelope smoothing window in milliseconds.
pub const DEFAULT_SMOOTHING_WINDOW_MS: u32 = 5;

/// Smoothing window length in samples for a window given in milliseconds.
pub fn window_samples(window_ms: u32, sample_rate: u32) -> usize {
    (f64::from(window_ms) * 1e-3 * f64::from(sample_rate)).round() as usize
}

/// Smoothed amplitude envelope of a signal.
///
/// The analytic-signal magnitude is averaged with a centered boxcar of
/// `window` samples; the output has the input length. A window below one
/// sample is rejected.
pub fn smoothed_envelope(signal: &[f64], window: usize) -> Result<Vec<f64>, AnalysisError> {
    let magnitude = hilbert::envelope(signal);
    Ok(moving_average(&magnitude, window)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn window_samples_rounds() {
        assert_eq!(window_samples(5, 44100), 221); // 220.5 rounds up
        assert_eq!(window_samples(20, 48000), 960);
        assert_eq!(window_samples(0, 48000), 0);
    }

    #[test]
    fn envelope_is_nonnegative_and_length_preserving() {
        let fs = 8000.0;
        let signal: Vec<f64> = (0..4000)
            .map(|i| {
                let t = i as f64 / fs;
                (-3.0 * t).exp() * (2.0 * PI * 500.0 * t).sin()
            })
            .collect();
        let env = smoothed_envelope(&signal, 41).unwrap();
        assert_eq!(env.len(), signal.len());
        assert!(env.iter().all(|&e| e >= 0.0));
    }

    #[test]
    fn smoothing_reduces_ripple() {
        let fs = 8000.0;
        let signal: Vec<f64> = (0..4000)
            .map(|i| (2.0 * PI * 500.0 * i as f64 / fs).sin())
            .collect();
        let raw = smoothed_envelope(&signal, 1).unwrap();
        let smooth = smoothed_envelope(&signal, 81).unwrap();

        let variance = |x: &[f64]| {
            let mean = x.iter().sum::<f64>() / x.len() as f64;
            x.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / x.len() as f64
        };
        let mid = 1000..3000;
        assert!(variance(&smooth[mid.clone()]) <= variance(&raw[mid]) + 1e-12);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(smoothed_envelope(&[1.0, 2.0], 0).is_err());
    }

    #[test]
    fn empty_signal_yields_empty_envelope() {
        assert!(smoothed_envelope(&[], 5).unwrap().is_empty());
    }
}
