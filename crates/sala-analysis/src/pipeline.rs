//! The four-stage acoustic analysis pipeline.
//!
//! band filter -> envelope smoothing -> decay analysis -> parameters,
//! passed through a typed state record. Each stage is a value implementing
//! [`Stage`]; the orchestrator owns an ordered list of them and nothing
//! else, so two pipelines can run concurrently without sharing any state.

use std::collections::BTreeMap;

use tracing::debug;

use crate::bands::{DEFAULT_FILTER_ORDER, FilterBank, FilterType};
use crate::decay::{DEFAULT_BLOCK_MS, LundebyData, SchroederData, lundeby_crossover, schroeder_integral};
use crate::envelope::{smoothed_envelope, window_samples};
use crate::error::AnalysisError;
use crate::parameters::{AnalysisResult, band_parameters};
use sala_core::{CoreError, to_db};

/// Intermediate data flowing between pipeline stages.
///
/// Fields are filled stage by stage; the per-band maps are keyed by the
/// nominal band center in Hz and stay empty until their stage has run. The
/// state owns every intermediate array and is dropped at the end of a run,
/// leaving the caller only the final [`AnalysisResult`].
#[derive(Debug, Default)]
pub struct PipelineState {
    /// The impulse response under analysis.
    pub impulse_response: Vec<f64>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Zero-phase band-pass filtered copies of the input.
    pub band_signals: BTreeMap<u32, Vec<f64>>,
    /// Smoothed amplitude envelopes per band.
    pub envelopes: BTreeMap<u32, Vec<f64>>,
    /// Truncated Schroeder curves (with squared envelopes) per band.
    pub decay_curves: BTreeMap<u32, SchroederData>,
    /// dB-scaled Schroeder curves, normalized to 0 dB at their maximum.
    pub decay_curves_db: BTreeMap<u32, Vec<f64>>,
    /// Lundeby crossover and noise-onset indices per band.
    pub lundeby: BTreeMap<u32, LundebyData>,
    /// Final descriptors per band.
    pub parameters: AnalysisResult,
}

/// One step of the analysis chain.
pub trait Stage {
    /// Human-readable stage name for diagnostics.
    fn name(&self) -> &'static str;

    /// Consume the state and return it with this stage's fields filled in.
    fn apply(&self, state: PipelineState) -> Result<PipelineState, AnalysisError>;
}

/// Stage 1: split the impulse response into frequency bands.
struct BandFilterStage {
    bank: FilterBank,
}

impl Stage for BandFilterStage {
    fn name(&self) -> &'static str {
        "band-filter"
    }

    fn apply(&self, mut state: PipelineState) -> Result<PipelineState, AnalysisError> {
        state.band_signals = self.bank.apply(&state.impulse_response)?;
        debug!(bands = state.band_signals.len(), "band filtering done");
        Ok(state)
    }
}

/// Stage 2: smoothed amplitude envelope per band.
struct EnvelopeStage {
    window: usize,
}

impl Stage for EnvelopeStage {
    fn name(&self) -> &'static str {
        "envelope"
    }

    fn apply(&self, mut state: PipelineState) -> Result<PipelineState, AnalysisError> {
        let mut envelopes = BTreeMap::new();
        for (&center, signal) in &state.band_signals {
            envelopes.insert(center, smoothed_envelope(signal, self.window)?);
        }
        state.envelopes = envelopes;
        Ok(state)
    }
}

/// Stage 3: Lundeby crossover and truncated Schroeder integration per band.
struct DecayStage {
    block_ms: f64,
}

impl Stage for DecayStage {
    fn name(&self) -> &'static str {
        "decay"
    }

    fn apply(&self, mut state: PipelineState) -> Result<PipelineState, AnalysisError> {
        let fs = state.sample_rate;
        for (&center, envelope) in &state.envelopes {
            let lundeby = lundeby_crossover(envelope, fs, self.block_ms);
            let schroeder =
                schroeder_integral(envelope, f64::from(fs), Some(lundeby.crossover_index));
            let curve_db = to_db(&schroeder.curve);
            debug!(
                band = center,
                crossover = lundeby.crossover_index,
                noise_start = lundeby.noise_start_index,
                "decay analyzed"
            );
            state.decay_curves_db.insert(center, curve_db);
            state.decay_curves.insert(center, schroeder);
            state.lundeby.insert(center, lundeby);
        }
        Ok(state)
    }
}

/// Stage 4: descriptors per band.
struct ParameterStage;

impl Stage for ParameterStage {
    fn name(&self) -> &'static str {
        "parameters"
    }

    fn apply(&self, mut state: PipelineState) -> Result<PipelineState, AnalysisError> {
        let fs = state.sample_rate;
        let mut parameters = AnalysisResult::new();
        for (&center, curve_db) in &state.decay_curves_db {
            let band_signal = &state.band_signals[&center];
            let noise_start = state.lundeby[&center].noise_start_index;
            parameters.insert(
                center.to_string(),
                band_parameters(curve_db, band_signal, noise_start, fs),
            );
        }
        state.parameters = parameters;
        Ok(state)
    }
}

/// Orchestrator for the full analysis chain.
///
/// A pipeline is configured once and can run any number of impulse
/// responses; every run is an independent, deterministic transform.
pub struct AcousticPipeline {
    sample_rate: u32,
    stages: Vec<Box<dyn Stage>>,
}

impl AcousticPipeline {
    /// Create a pipeline with the default filter order and Lundeby block
    /// length.
    ///
    /// `smoothing_window_ms` must cover at least one sample at the given
    /// rate; the sample rate must be positive.
    pub fn new(
        sample_rate: u32,
        filter_type: FilterType,
        smoothing_window_ms: u32,
    ) -> Result<Self, AnalysisError> {
        Self::with_filter_order(sample_rate, filter_type, smoothing_window_ms, DEFAULT_FILTER_ORDER)
    }

    /// Create a pipeline with an explicit band-filter order.
    pub fn with_filter_order(
        sample_rate: u32,
        filter_type: FilterType,
        smoothing_window_ms: u32,
        filter_order: usize,
    ) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate);
        }
        if filter_order == 0 {
            return Err(CoreError::InvalidFilterOrder.into());
        }
        let window = window_samples(smoothing_window_ms, sample_rate);
        if window < 1 {
            return Err(CoreError::WindowTooShort.into());
        }

        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(BandFilterStage {
                bank: FilterBank::new(sample_rate, filter_type, filter_order),
            }),
            Box::new(EnvelopeStage { window }),
            Box::new(DecayStage { block_ms: DEFAULT_BLOCK_MS }),
            Box::new(ParameterStage),
        ];
        Ok(Self { sample_rate, stages })
    }

    /// Sample rate this pipeline was configured for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Run the full chain and return the final per-band descriptors.
    pub fn run(&self, impulse_response: &[f64]) -> Result<AnalysisResult, AnalysisError> {
        self.run_state(impulse_response).map(|state| state.parameters)
    }

    /// Run the full chain and return every intermediate product.
    pub fn run_state(&self, impulse_response: &[f64]) -> Result<PipelineState, AnalysisError> {
        if impulse_response.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let mut state = PipelineState {
            impulse_response: impulse_response.to_vec(),
            sample_rate: self.sample_rate,
            ..PipelineState::default()
        };
        for stage in &self.stages {
            let span = tracing::debug_span!("stage", name = stage.name());
            let _guard = span.enter();
            state = stage.apply(state)?;
        }
        Ok(state)
    }
}
