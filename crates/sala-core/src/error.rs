//! Error types for the numeric primitives.

/// Errors produced by the primitive layer.
///
/// The regression helpers deliberately never error (they return sentinel
/// slopes instead); only argument validation lives here.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Smoothing window shorter than one sample.
    #[error("smoothing window must cover at least 1 sample")]
    WindowTooShort,

    /// Band edges are not strictly ordered inside (0, fs/2).
    #[error("invalid band edges {low}..{high} Hz at {fs} Hz sample rate")]
    InvalidBandEdges {
        /// Lower cutoff in Hz.
        low: f64,
        /// Upper cutoff in Hz.
        high: f64,
        /// Sample rate in Hz.
        fs: f64,
    },

    /// Filter order of zero.
    #[error("filter order must be at least 1")]
    InvalidFilterOrder,
}
