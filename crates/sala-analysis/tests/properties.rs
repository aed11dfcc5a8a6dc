//! Property-based tests for the analysis invariants.

use proptest::prelude::*;
use sala_analysis::parameters::band_parameters;
use sala_analysis::{schroeder_integral, snr_db};
use sala_core::to_db;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Envelope smoothing preserves length and never goes negative.
    #[test]
    fn envelope_length_and_sign(
        signal in prop::collection::vec(-1.0f64..=1.0, 32..512),
        window in 1usize..64,
    ) {
        let env = sala_analysis::envelope::smoothed_envelope(&signal, window).unwrap();
        prop_assert_eq!(env.len(), signal.len());
        for &e in &env {
            prop_assert!(e >= 0.0, "negative envelope sample {}", e);
        }
    }

    /// The truncated Schroeder curve is non-negative, non-increasing before
    /// the cutoff and exactly zero after it.
    #[test]
    fn schroeder_monotonicity(
        power in prop::collection::vec(0.0f64..=10.0, 8..256),
        cutoff_frac in 0.0f64..=1.0,
    ) {
        let cutoff = ((power.len() as f64) * cutoff_frac) as usize;
        let data = schroeder_integral(&power, 1000.0, Some(cutoff));
        prop_assert_eq!(data.curve.len(), power.len());
        for n in 0..cutoff.saturating_sub(1) {
            prop_assert!(data.curve[n] >= data.curve[n + 1]);
            prop_assert!(data.curve[n + 1] >= 0.0);
        }
        for n in cutoff..power.len() {
            prop_assert_eq!(data.curve[n], 0.0);
        }
    }

    /// A dB-scaled Schroeder curve of a non-silent signal peaks at 0 dB.
    #[test]
    fn db_curve_normalization(
        power in prop::collection::vec(0.01f64..=10.0, 8..256),
    ) {
        let data = schroeder_integral(&power, 1000.0, None);
        let db = to_db(&data.curve);
        let max = db.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        prop_assert!(max.abs() < 1e-9, "max of dB curve is {}", max);
    }

    /// SNR is invariant under positive scaling.
    #[test]
    fn snr_scale_invariance(
        signal in prop::collection::vec(-1.0f64..=1.0, 64..512),
        scale in 0.01f64..=100.0,
    ) {
        let base = snr_db(&signal, 0.2).unwrap();
        let scaled: Vec<f64> = signal.iter().map(|&x| x * scale).collect();
        let scaled_snr = snr_db(&scaled, 0.2).unwrap();
        match (base, scaled_snr) {
            (Some(a), Some(b)) if a.is_finite() => {
                prop_assert!((a - b).abs() < 1e-6, "{} vs {}", a, b);
            }
            (a, b) => prop_assert_eq!(a, b),
        }
    }

    /// D50 stays inside [0, 100] for arbitrary band signals and noise
    /// onsets, including over-subtracting noise corrections.
    #[test]
    fn d50_bounds(
        signal in prop::collection::vec(-1.0f64..=1.0, 16..512),
        noise_frac in 0.0f64..=1.0,
    ) {
        let noise_start = ((signal.len() as f64) * noise_frac) as usize;
        let params = band_parameters(&[0.0; 8], &signal, noise_start, 8000);
        prop_assert!(
            (0.0..=100.0).contains(&params.d50),
            "D50 = {}",
            params.d50
        );
        prop_assert!(params.d50.is_finite());
        prop_assert!(params.c50.is_finite());
    }
}
