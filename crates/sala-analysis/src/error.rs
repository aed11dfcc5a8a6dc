//! Error types for the analysis pipeline.

use sala_core::CoreError;

/// Errors produced by the analysis layer.
///
/// Quantities that are merely *not computable* for a given input (SNR of
/// silence, decay times without a decaying slope) are reported as `None`
/// values, not as errors; these variants cover genuinely invalid requests.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Error bubbled up from a numeric primitive.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Filter type code other than 1 (octave) or 3 (third-octave).
    #[error("unknown filter type code {0} (expected 1 or 3)")]
    UnknownFilterType(u8),

    /// A sample rate of zero.
    #[error("sample rate must be positive")]
    InvalidSampleRate,

    /// Noise tail fraction outside the open interval (0, 1).
    #[error("noise tail fraction {0} must lie in (0, 1)")]
    InvalidTailFraction(f64),

    /// Sweep parameters that cannot describe a rising log sweep.
    #[error("sweep requires 0 < start < end < fs/2 and a positive duration")]
    InvalidSweepParameters,

    /// An empty input signal where samples are required.
    #[error("input signal is empty")]
    EmptyInput,

    /// Input too short for the requested time-frequency analysis.
    #[error("input shorter than one {0}-sample analysis window")]
    InputTooShort(usize),
}
