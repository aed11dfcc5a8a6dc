//! Sala Analysis - room-acoustic descriptors from impulse responses.
//!
//! This crate computes the ISO 3382 descriptors (EDT, T20/T30-derived T60,
//! C50, D50) per frequency band from a recorded room impulse response, and
//! covers the measurement side of the workflow:
//!
//! - [`pipeline`] - the four-stage analysis chain (band filter, envelope,
//!   Lundeby/Schroeder decay analysis, parameter regression)
//! - [`bands`] - IEC 61260 octave / third-octave filter bank
//! - [`sweep`] - Farina sweep generation and deconvolution IR capture
//! - [`snr`] - peak-to-tail signal-to-noise estimate
//! - [`graph`] / [`spectrogram`] - plot-data shaping for front ends
//!
//! ## Example
//!
//! ```rust
//! use sala_analysis::{AcousticPipeline, FilterType};
//!
//! let fs = 44100;
//! // A decaying 1 kHz tone standing in for a measured impulse response.
//! let ir: Vec<f64> = (0..fs)
//!     .map(|i| {
//!         let t = f64::from(i) / f64::from(fs);
//!         (-6.0 * t).exp() * (2.0 * std::f64::consts::PI * 1000.0 * t).cos()
//!     })
//!     .collect();
//!
//! let pipeline = AcousticPipeline::new(fs as u32, FilterType::Octave, 25).unwrap();
//! let result = pipeline.run(&ir).unwrap();
//! assert!(result.contains_key("1000"));
//! ```

pub mod bands;
pub mod decay;
pub mod envelope;
pub mod error;
pub mod fft;
pub mod graph;
pub mod hilbert;
pub mod parameters;
pub mod pipeline;
pub mod snr;
pub mod spectrogram;
pub mod sweep;

pub use bands::{Band, FilterBank, FilterType};
pub use decay::{LundebyData, SchroederData, lundeby_crossover, schroeder_integral};
pub use error::AnalysisError;
pub use fft::{Fft, Window};
pub use parameters::{AnalysisResult, BandParameters};
pub use pipeline::{AcousticPipeline, PipelineState, Stage};
pub use snr::snr_db;
pub use sweep::{DeconvolvedIr, SineSweep, deconvolve, ir_from_deconvolution};
