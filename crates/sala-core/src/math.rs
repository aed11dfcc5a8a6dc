//! Small numeric helpers shared across the analysis pipeline.

use crate::error::CoreError;

/// Smallest power of two greater than or equal to `n` (`n = 0` maps to 1).
pub fn next_pow2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Centered same-length moving average with a boxcar kernel of `window`
/// samples.
///
/// Matches a `'same'`-mode convolution with `ones(window) / window`: edge
/// samples average over the part of the kernel that overlaps the signal,
/// divided by the full window length. The output always has the input
/// length, `window = 1` is the identity, and `window = 0` is rejected.
pub fn moving_average(signal: &[f64], window: usize) -> Result<Vec<f64>, CoreError> {
    if window < 1 {
        return Err(CoreError::WindowTooShort);
    }
    if window == 1 || signal.is_empty() {
        return Ok(signal.to_vec());
    }

    let n = signal.len();
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for &x in signal {
        acc += x;
        prefix.push(acc);
    }

    let offset = (window - 1) / 2;
    let scale = 1.0 / window as f64;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let m = i + offset;
        let lo = m.saturating_sub(window - 1);
        let hi = (m + 1).min(n);
        out.push((prefix[hi] - prefix[lo]) * scale);
    }
    Ok(out)
}

/// Root-mean-square over contiguous blocks of `block` samples.
///
/// The trailing partial block is discarded, so an input shorter than one
/// block yields an empty result.
pub fn block_rms(signal: &[f64], block: usize) -> Vec<f64> {
    debug_assert!(block >= 1);
    if block == 0 {
        return Vec::new();
    }
    signal
        .chunks_exact(block)
        .map(|chunk| {
            let mean_sq = chunk.iter().map(|&x| x * x).sum::<f64>() / block as f64;
            mean_sq.sqrt()
        })
        .collect()
}
