//! FFT wrapper with windowing functions.

use rustfft::num_complex::Complex64;
use rustfft::{Fft as RustFft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Window function types used by the time-frequency analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Rectangular (no windowing).
    Rectangular,
    /// Hann window (raised cosine).
    Hann,
}

impl Window {
    /// Apply the window in place.
    pub fn apply(&self, buffer: &mut [f64]) {
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                let n = buffer.len();
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample *= 0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos());
                }
            }
        }
    }

    /// Window coefficients of the given length.
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}

/// FFT processor with cached plans for one transform size.
///
/// Every pipeline or deconvolution run owns its own instances, so two
/// concurrent analyses never share planner state.
pub struct Fft {
    fft: Arc<dyn RustFft<f64>>,
    ifft: Arc<dyn RustFft<f64>>,
    size: usize,
}

impl Fft {
    /// Create an FFT processor for the given size. Any size works; powers
    /// of two are fastest.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);
        Self { fft, ifft, size }
    }

    /// Transform size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward FFT of a real signal, zero-padded or truncated to the
    /// transform size. Returns the full complex spectrum.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex64::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex64::new(0.0, 0.0));
        self.fft.process(&mut buffer);
        buffer
    }

    /// In-place forward FFT of a complex buffer of the transform size.
    pub fn forward_complex(&self, buffer: &mut [Complex64]) {
        self.fft.process(buffer);
    }

    /// In-place inverse FFT, normalized by `1 / size`.
    pub fn inverse_complex(&self, buffer: &mut [Complex64]) {
        self.ifft.process(buffer);
        let scale = 1.0 / self.size as f64;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
}

/// Magnitude spectrum in dB with a 1e-10 clip floor.
pub fn magnitude_db(spectrum: &[Complex64]) -> Vec<f64> {
    spectrum
        .iter()
        .map(|c| 20.0 * c.norm().max(1e-10).log10())
        .collect()
}
