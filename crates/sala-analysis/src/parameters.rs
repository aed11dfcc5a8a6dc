//! ISO 3382 descriptors from decay curves and band signals.

use std::collections::BTreeMap;

use sala_core::{LineFit, linear_regression_in_range};
use serde::Serialize;

/// Per-band acoustic descriptors.
///
/// Decay times are `None` when the corresponding regression found no
/// decaying slope (silence, or a curve that never spans the evaluation
/// range); they serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandParameters {
    /// Early decay time in seconds (fit over [-11, -1] dB).
    #[serde(rename = "EDT")]
    pub edt: Option<f64>,
    /// T60 extrapolated from the T20 range [-25, -5] dB, in seconds.
    #[serde(rename = "T60_from_T20")]
    pub t60_from_t20: Option<f64>,
    /// T60 extrapolated from the T30 range [-35, -5] dB, in seconds.
    #[serde(rename = "T60_from_T30")]
    pub t60_from_t30: Option<f64>,
    /// Clarity (early-to-late energy ratio, 50 ms split) in dB.
    #[serde(rename = "C50")]
    pub c50: f64,
    /// Definition (early-to-total energy ratio, 50 ms window) in percent.
    #[serde(rename = "D50")]
    pub d50: f64,
}

/// Final pipeline output: descriptors keyed by the decimal band center.
pub type AnalysisResult = BTreeMap<String, BandParameters>;

/// Translate a decay-curve fit into a T60-style time.
///
/// `-60 / slope` is only meaningful for a finite negative slope; the
/// sentinel slopes (0 for an empty fit, -inf for a degenerate one) and
/// non-decaying fits are flagged as `None`.
pub fn decay_time(fit: &LineFit) -> Option<f64> {
    (fit.slope.is_finite() && fit.slope < 0.0).then(|| -60.0 / fit.slope)
}

/// Compute the descriptors for one band.
///
/// `curve_db` is the dB-scaled truncated Schroeder curve, `band_signal` the
/// zero-phase filtered impulse response, and `noise_start_index` the
/// Lundeby noise onset used for the clarity noise correction.
pub fn band_parameters(
    curve_db: &[f64],
    band_signal: &[f64],
    noise_start_index: usize,
    sample_rate: u32,
) -> BandParameters {
    let fs = f64::from(sample_rate);
    let time: Vec<f64> = (0..curve_db.len()).map(|i| i as f64 / fs).collect();
    let peak_db = curve_db.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    let normalized: Vec<f64> = curve_db.iter().map(|&v| v - peak_db).collect();

    let edt = linear_regression_in_range(&time, &normalized, -1.0, -11.0);
    let t20 = linear_regression_in_range(&time, &normalized, -5.0, -25.0);
    let t30 = linear_regression_in_range(&time, &normalized, -5.0, -35.0);

    let (c50, d50) = clarity_and_definition(band_signal, noise_start_index, sample_rate);

    BandParameters {
        edt: decay_time(&edt),
        t60_from_t20: decay_time(&t20),
        t60_from_t30: decay_time(&t30),
        c50,
        d50,
    }
}

/// Noise-corrected C50 and D50 on a squared band signal.
///
/// The early window is aligned to the energy peak. When a noise tail exists
/// (`noise_start_index < len`), its mean power is subtracted per-sample
/// from each window; both windows are clamped at 1e-12 and the total is
/// taken as their sum, which pins D50 inside [0, 100] even when the
/// correction over-subtracts.
fn clarity_and_definition(
    band_signal: &[f64],
    noise_start_index: usize,
    sample_rate: u32,
) -> (f64, f64) {
    let p_squared: Vec<f64> = band_signal.iter().map(|&x| x * x).collect();
    let len = p_squared.len();
    if len == 0 {
        // Matches the clamped all-zero case below: equal early/late floors.
        return (0.0, 50.0);
    }

    let noise_power = if noise_start_index < len {
        mean(&p_squared[noise_start_index..])
    } else {
        0.0
    };

    let peak_index = argmax(&p_squared);
    let early_end = (peak_index + (0.050 * f64::from(sample_rate)).round() as usize).min(len);
    let early_len = early_end - peak_index;

    let total_raw: f64 = p_squared.iter().sum();
    let early_raw: f64 = p_squared[peak_index..early_end].iter().sum();
    let late_raw = total_raw - early_raw;

    let early = (early_raw - early_len as f64 * noise_power).max(1e-12);
    let late = (late_raw - (len - early_len) as f64 * noise_power).max(1e-12);

    let c50 = 10.0 * (early / late).log10();
    let d50 = 100.0 * early / (early + late);
    (c50, d50)
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ideal dB decay line reaching -60 dB at `t60` seconds.
    fn linear_decay_db(t60: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| -60.0 * (i as f64 / fs) / t60).collect()
    }

    #[test]
    fn decay_times_recover_linear_decay() {
        let fs = 8000;
        let curve = linear_decay_db(1.5, 8000.0, 16000);
        let signal = vec![0.0; 16000];
        let params = band_parameters(&curve, &signal, 16000, fs);

        for t in [params.edt, params.t60_from_t20, params.t60_from_t30] {
            let t = t.expect("decay time should be present");
            assert!((t - 1.5).abs() < 1e-6, "expected 1.5 s, got {t}");
        }
    }

    #[test]
    fn flat_curve_flags_decay_times() {
        let curve = vec![0.0; 1000];
        let params = band_parameters(&curve, &[1.0; 1000], 1000, 8000);
        assert_eq!(params.edt, None);
        assert_eq!(params.t60_from_t20, None);
        assert_eq!(params.t60_from_t30, None);
    }

    #[test]
    fn decay_time_sentinels() {
        assert_eq!(decay_time(&LineFit { slope: 0.0, intercept: 0.0 }), None);
        assert_eq!(
            decay_time(&LineFit { slope: f64::NEG_INFINITY, intercept: 0.0 }),
            None
        );
        assert_eq!(decay_time(&LineFit { slope: 2.0, intercept: 0.0 }), None);
        let t = decay_time(&LineFit { slope: -30.0, intercept: 0.0 });
        assert_eq!(t, Some(2.0));
    }

    #[test]
    fn impulse_with_silent_tail_has_full_definition() {
        // All energy inside the first 50 ms.
        let fs = 8000;
        let mut signal = vec![0.0; 8000];
        signal[10] = 1.0;
        signal[11] = 0.5;
        let params = band_parameters(&[0.0; 8000], &signal, 8000, fs);
        assert!(params.d50 > 99.9, "D50 = {}", params.d50);
        assert!(params.c50 > 100.0, "C50 = {}", params.c50);
    }

    #[test]
    fn late_energy_lowers_clarity() {
        let fs = 8000;
        // Peak at t = 0, matching energy well past the 50 ms split.
        let mut signal = vec![0.0; 8000];
        signal[0] = 1.0;
        signal[4000] = 1.0;
        let params = band_parameters(&[0.0; 8000], &signal, 8000, fs);
        assert!(params.c50.abs() < 1e-9, "C50 = {}", params.c50);
        assert!((params.d50 - 50.0).abs() < 1e-6, "D50 = {}", params.d50);
    }

    #[test]
    fn d50_stays_bounded_under_noise_correction() {
        let fs = 8000;
        // A noisy tail that makes the correction over-subtract.
        let mut signal = vec![0.1; 8000];
        signal[100] = 1.0;
        let params = band_parameters(&[0.0; 8000], &signal, 4000, fs);
        assert!((0.0..=100.0).contains(&params.d50), "D50 = {}", params.d50);
    }

    #[test]
    fn empty_band_signal_is_inert() {
        let params = band_parameters(&[], &[], 0, 8000);
        assert_eq!(params.edt, None);
        assert_eq!(params.d50, 50.0);
    }

    #[test]
    fn serializes_with_iso_names() {
        let params = BandParameters {
            edt: Some(1.0),
            t60_from_t20: None,
            t60_from_t30: Some(2.0),
            c50: 3.5,
            d50: 80.0,
        };
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"EDT\":1.0"));
        assert!(json.contains("\"T60_from_T20\":null"));
        assert!(json.contains("\"T60_from_T30\":2.0"));
        assert!(json.contains("\"C50\":3.5"));
        assert!(json.contains("\"D50\":80.0"));
    }
}
