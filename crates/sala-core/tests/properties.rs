//! Property-based tests for the sala-core numeric primitives.
//!
//! Exercises filter stability, dB bounds, moving-average bounds and the
//! regression sentinel contract with randomized inputs.

use proptest::prelude::*;
use sala_core::{
    butterworth_bandpass, linear_regression, linear_regression_in_range, moving_average,
    sosfiltfilt, to_db,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Any valid band inside (0, fs/2) yields a stable cascade: zero-phase
    /// filtering of bounded input stays finite.
    #[test]
    fn butterworth_filtfilt_stays_finite(
        low in 50.0f64..2000.0,
        width in 1.1f64..4.0,
        order in 1usize..6,
        input in prop::collection::vec(-1.0f64..=1.0, 64..512),
    ) {
        let fs = 44100.0;
        let high = low * width;
        let sos = butterworth_bandpass(order, low, high, fs).unwrap();
        let output = sosfiltfilt(&sos, &input);
        prop_assert_eq!(output.len(), input.len());
        for &v in &output {
            prop_assert!(v.is_finite(), "non-finite output {} (band {}..{})", v, low, high);
        }
    }

    /// Peak-normalized dB values always lie in [-100, 0].
    #[test]
    fn to_db_is_bounded(signal in prop::collection::vec(-1e6f64..=1e6, 0..256)) {
        for &v in &to_db(&signal) {
            prop_assert!((-100.0..=0.0).contains(&v), "dB value {} out of bounds", v);
        }
    }

    /// A boxcar average never leaves the input's value range (for
    /// windows that fit inside the signal).
    #[test]
    fn moving_average_is_bounded(
        signal in prop::collection::vec(-100.0f64..=100.0, 8..256),
        window in 1usize..8,
    ) {
        let lo = signal.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = signal.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let out = moving_average(&signal, window).unwrap();
        prop_assert_eq!(out.len(), signal.len());
        // Edge samples divide a partial sum by the full window, which can
        // only pull values toward zero; widen the range accordingly.
        let lo = lo.min(0.0) - 1e-9;
        let hi = hi.max(0.0) + 1e-9;
        for &v in &out {
            prop_assert!((lo..=hi).contains(&v), "average {} escaped [{}, {}]", v, lo, hi);
        }
    }

    /// The plain regression never returns NaN: it is either a finite fit or
    /// the -inf degenerate sentinel.
    #[test]
    fn regression_never_returns_nan(
        points in prop::collection::vec((-1e3f64..=1e3, -1e3f64..=1e3), 0..64),
    ) {
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        let fit = linear_regression(&xs, &ys);
        prop_assert!(!fit.slope.is_nan());
        prop_assert!(!fit.intercept.is_nan());
    }

    /// An impossible y-range always produces the -inf sentinel.
    #[test]
    fn empty_mask_is_flagged(
        points in prop::collection::vec((-1e3f64..=1e3, 0.0f64..=1e3), 1..64),
    ) {
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        // All y are non-negative; mask below -1 is empty.
        let fit = linear_regression_in_range(&xs, &ys, -1.0, -10.0);
        prop_assert_eq!(fit.slope, f64::NEG_INFINITY);
    }
}
