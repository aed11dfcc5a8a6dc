//! Sala Core - numeric primitives for room-acoustic analysis.
//!
//! This crate provides the low-level building blocks shared by the analysis
//! pipeline:
//!
//! - [`db`] - peak-normalized decibel conversion
//! - [`regression`] - least-squares line fitting with sentinel slopes
//! - [`math`] - next-power-of-two, moving average, block RMS
//! - [`sos`] - Butterworth band-pass design and zero-phase filtering
//!
//! Everything here is a pure function or a small value type: no global
//! state, no allocator tricks, deterministic output for identical input.

pub mod db;
pub mod error;
pub mod math;
pub mod regression;
pub mod sos;

pub use db::to_db;
pub use error::CoreError;
pub use math::{block_rms, moving_average, next_pow2};
pub use regression::{LineFit, linear_regression, linear_regression_in_range};
pub use sos::{Sos, butterworth_bandpass, sosfilt, sosfiltfilt};
