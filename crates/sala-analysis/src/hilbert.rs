//! Analytic signal via the FFT sign mask.
//!
//! The analytic signal `z(t) = x(t) + i*H{x(t)}` is built directly on the
//! DFT of the input at its exact length: DC stays, positive-frequency bins
//! are doubled, the Nyquist bin (even lengths only) stays, and
//! negative-frequency bins are zeroed. Library Hilbert variants differ in
//! how they treat those two boundary bins, so the mask is spelled out here.

use crate::fft::Fft;
use rustfft::num_complex::Complex64;

/// Compute the analytic signal of a real input.
///
/// The transform runs at the exact input length (no padding), so the
/// envelope has no wrap-around leakage from zero-padded tails.
pub fn analytic_signal(signal: &[f64]) -> Vec<Complex64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let fft = Fft::new(n);
    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    fft.forward_complex(&mut buffer);

    // DC x1, positive bins x2, Nyquist x1 (even n), negative bins zeroed.
    for bin in &mut buffer[1..(n + 1) / 2] {
        *bin *= 2.0;
    }
    for bin in &mut buffer[n / 2 + 1..] {
        *bin = Complex64::new(0.0, 0.0);
    }

    fft.inverse_complex(&mut buffer);
    buffer
}

/// Instantaneous amplitude (magnitude of the analytic signal).
pub fn envelope(signal: &[f64]) -> Vec<f64> {
    analytic_signal(signal).iter().map(|c| c.norm()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * freq * i as f64 / fs).sin()).collect()
    }

    #[test]
    fn analytic_real_part_matches_input() {
        let signal = sine(10.0, 1000.0, 512);
        let analytic = analytic_signal(&signal);
        for (x, z) in signal.iter().zip(analytic.iter()) {
            assert!((x - z.re).abs() < 1e-9, "real part drifted: {} vs {}", x, z.re);
        }
    }

    #[test]
    fn hilbert_of_sine_is_minus_cosine() {
        let fs = 1000.0;
        let n = 512;
        let signal = sine(10.0, fs, n);
        let analytic = analytic_signal(&signal);
        for i in n / 4..3 * n / 4 {
            let expected = -(2.0 * PI * 10.0 * i as f64 / fs).cos();
            assert!(
                (analytic[i].im - expected).abs() < 0.1,
                "imag mismatch at {}: {} vs {}",
                i,
                analytic[i].im,
                expected
            );
        }
    }

    #[test]
    fn envelope_of_pure_tone_is_flat() {
        let n = 512;
        let env = envelope(&sine(10.0, 1000.0, n));
        for (i, &e) in env.iter().enumerate().take(3 * n / 4).skip(n / 4) {
            assert!((e - 1.0).abs() < 0.1, "envelope {} at sample {}", e, i);
        }
    }

    #[test]
    fn envelope_tracks_amplitude_modulation() {
        let fs = 1000.0;
        let n = 1024;
        let signal: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64 / fs;
                let m = 0.5 + 0.5 * (2.0 * PI * 5.0 * t).cos();
                m * (2.0 * PI * 50.0 * t).sin()
            })
            .collect();
        let env = envelope(&signal);
        let mid = &env[n / 4..3 * n / 4];
        let min = mid.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = mid.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(min < 0.3, "modulation floor not tracked: {min}");
        assert!(max > 0.8, "modulation peak not tracked: {max}");
    }

    #[test]
    fn odd_length_is_supported() {
        let signal = sine(10.0, 1000.0, 511);
        let env = envelope(&signal);
        assert_eq!(env.len(), 511);
        assert!(env.iter().all(|&e| e.is_finite()));
    }

    #[test]
    fn trivial_lengths() {
        assert!(analytic_signal(&[]).is_empty());
        let one = analytic_signal(&[2.5]);
        assert_eq!(one.len(), 1);
        assert!((one[0].re - 2.5).abs() < 1e-12);
    }
}
