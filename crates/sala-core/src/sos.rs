//! Second-order-section IIR filtering and Butterworth band-pass design.
//!
//! The band filter bank needs zero-phase band-pass filtering with scipy-like
//! semantics: design a Butterworth band-pass as cascaded biquad sections,
//! then run the cascade forward and backward over the signal. The design
//! follows the classic analog route: Butterworth low-pass prototype poles,
//! low-pass to band-pass transform, bilinear transform with frequency
//! pre-warping, conjugate pole pairs collapsed into real sections.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::CoreError;

/// One second-order filter section in Direct Form I.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Coefficients are normalized by `a0` on construction.
#[derive(Debug, Clone, Copy)]
pub struct Sos {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,

    // Delay lines: x[n-1], x[n-2], y[n-1], y[n-2].
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Sos {
    /// Create a section from raw transfer-function coefficients.
    pub fn new(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let inv = 1.0 / a0;
        Self {
            b0: b0 * inv,
            b1: b1 * inv,
            b2: b2 * inv,
            a1: a1 * inv,
            a2: a2 * inv,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Process a single sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;
        output
    }

    /// Reset the delay lines without touching the coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Numerator and denominator coefficients `(b0, b1, b2, a1, a2)`.
    pub fn coefficients(&self) -> (f64, f64, f64, f64, f64) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }
}

/// Design a Butterworth band-pass filter as second-order sections.
///
/// `order` is the low-pass prototype order; the resulting band-pass has
/// `2 * order` poles realized as `order` sections. Edges are in Hz and must
/// satisfy `0 < low_hz < high_hz < fs / 2`.
///
/// Matches the transfer function of scipy's
/// `iirfilter(order, [low, high], btype='band', ftype='butter', output='sos')`:
/// sections carry `(z-1)(z+1)` numerators, the overall gain sits on the
/// first section, and sections are ordered by increasing pole radius.
pub fn butterworth_bandpass(
    order: usize,
    low_hz: f64,
    high_hz: f64,
    fs: f64,
) -> Result<Vec<Sos>, CoreError> {
    if order == 0 {
        return Err(CoreError::InvalidFilterOrder);
    }
    if !(low_hz > 0.0 && low_hz < high_hz && high_hz < fs / 2.0) {
        return Err(CoreError::InvalidBandEdges { low: low_hz, high: high_hz, fs });
    }

    // Pre-warp the band edges so the bilinear transform lands them exactly.
    let fs2 = 2.0 * fs;
    let w1 = fs2 * (PI * low_hz / fs).tan();
    let w2 = fs2 * (PI * high_hz / fs).tan();
    let wo_sq = w1 * w2;
    let bw = w2 - w1;

    // Each analog pole pair becomes one digital section; `gain` accumulates
    // the band-pass numerator gain (bw^order) against the bilinear
    // denominator products so it stays O(1) throughout.
    let mut sections: Vec<(f64, f64)> = Vec::with_capacity(order);
    let mut gain = 1.0;
    let mut push_pair = |p1: Complex64, p2: Complex64, gain: &mut f64| {
        let d1 = (fs2 + p1) / (fs2 - p1);
        let d2 = (fs2 + p2) / (fs2 - p2);
        let a1 = -(d1 + d2).re;
        let a2 = (d1 * d2).re;
        *gain *= bw * fs2 / ((fs2 - p1) * (fs2 - p2)).re;
        sections.push((a1, a2));
    };

    // Complex-conjugate prototype pole pairs (upper half plane).
    for k in 0..order / 2 {
        let theta = PI / 2.0 + PI * (2 * k + 1) as f64 / (2 * order) as f64;
        let q = Complex64::from_polar(bw / 2.0, theta);
        let d = (q * q - wo_sq).sqrt();
        // The low-pass to band-pass transform splits each prototype pole in
        // two; their conjugates (from the lower half plane) complete the
        // two digital sections.
        push_pair(q + d, (q + d).conj(), &mut gain);
        push_pair(q - d, (q - d).conj(), &mut gain);
    }
    // Odd orders add the real prototype pole at s = -1.
    if order % 2 == 1 {
        let q = Complex64::new(-bw / 2.0, 0.0);
        let d = (q * q - wo_sq).sqrt();
        push_pair(q + d, q - d, &mut gain);
    }

    // scipy convention: highest-Q poles (largest radius) filter last, the
    // overall gain rides on the first section.
    sections.sort_by(|a, b| a.1.total_cmp(&b.1));

    Ok(sections
        .into_iter()
        .enumerate()
        .map(|(i, (a1, a2))| {
            let k = if i == 0 { gain } else { 1.0 };
            Sos::new(k, 0.0, -k, 1.0, a1, a2)
        })
        .collect())
}

/// Run a section cascade over a signal once, with zeroed initial state.
pub fn sosfilt(sections: &[Sos], input: &[f64]) -> Vec<f64> {
    let mut cascade = sections.to_vec();
    for section in &mut cascade {
        section.clear();
    }
    input
        .iter()
        .map(|&x| {
            let mut v = x;
            for section in &mut cascade {
                v = section.process(v);
            }
            v
        })
        .collect()
}

/// Zero-phase forward-backward filtering over a section cascade.
///
/// The input is extended at both ends by odd reflection to tame the start-up
/// transient, filtered, reversed, filtered again, reversed, and trimmed back
/// to the original length. The effective magnitude response is the square of
/// the cascade's, with zero phase.
pub fn sosfiltfilt(sections: &[Sos], input: &[f64]) -> Vec<f64> {
    let n = input.len();
    if n == 0 || sections.is_empty() {
        return input.to_vec();
    }

    let pad = (3 * (2 * sections.len() + 1)).min(n - 1);
    let mut extended = Vec::with_capacity(n + 2 * pad);
    let first = input[0];
    let last = input[n - 1];
    for i in (1..=pad).rev() {
        extended.push(2.0 * first - input[i]);
    }
    extended.extend_from_slice(input);
    for i in 1..=pad {
        extended.push(2.0 * last - input[n - 1 - i]);
    }

    let mut forward = sosfilt(sections, &extended);
    forward.reverse();
    let mut backward = sosfilt(sections, &forward);
    backward.reverse();

    backward[pad..pad + n].to_vec()
}
