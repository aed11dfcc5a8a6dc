//! Peak-normalized decibel conversion.

/// Clip floor applied before taking the logarithm, corresponding to -100 dB.
pub const DB_CLIP_FLOOR: f64 = 1e-10;

/// Convert a signal to a peak-normalized logarithmic scale in dB.
///
/// Each sample is `10 * log10(|x| / max|x|)`, clipped at [`DB_CLIP_FLOOR`]
/// so the result is bounded below by -100 dB. An all-zero input maps to
/// -100 dB everywhere; a non-zero input always has its maximum at exactly
/// 0 dB.
pub fn to_db(signal: &[f64]) -> Vec<f64> {
    let peak = signal.iter().fold(0.0f64, |m, &x| m.max(x.abs()));
    signal
        .iter()
        .map(|&x| {
            let norm = if peak > 0.0 { x.abs() / peak } else { x.abs() };
            10.0 * norm.max(DB_CLIP_FLOOR).log10()
        })
        .collect()
}
