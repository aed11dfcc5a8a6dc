//! Analysis preset file format.
//!
//! Presets are TOML files bundling the analysis configuration so repeated
//! measurements of the same room use identical settings:
//!
//! ```toml
//! name = "concert-hall"
//! filter_type = 1
//! smoothing_window_ms = 50
//! tail_fraction = 0.2
//!
//! [sweep]
//! duration_secs = 10.0
//! start_hz = 20.0
//! end_hz = 20000.0
//! sample_rate = 48000
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Preset file format.
#[derive(Debug, Deserialize)]
pub struct AnalysisPreset {
    /// Name of the preset.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    #[allow(dead_code)]
    pub description: Option<String>,
    /// Band resolution: 1 = octave, 3 = third-octave.
    #[serde(default = "default_filter_type")]
    pub filter_type: u8,
    /// Envelope smoothing window in milliseconds.
    #[serde(default = "default_smoothing_window_ms")]
    pub smoothing_window_ms: u32,
    /// Fraction of the IR tail treated as noise for SNR estimation.
    #[serde(default = "default_tail_fraction")]
    pub tail_fraction: f64,
    /// Sweep generation defaults.
    #[serde(default)]
    pub sweep: SweepPreset,
}

/// Sweep settings within a preset.
#[derive(Debug, Deserialize)]
pub struct SweepPreset {
    /// Sweep duration in seconds.
    pub duration_secs: f64,
    /// Start frequency in Hz.
    pub start_hz: f64,
    /// End frequency in Hz.
    pub end_hz: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Default for SweepPreset {
    fn default() -> Self {
        Self { duration_secs: 10.0, start_hz: 20.0, end_hz: 20000.0, sample_rate: 44100 }
    }
}

fn default_filter_type() -> u8 {
    1
}

fn default_smoothing_window_ms() -> u32 {
    5
}

fn default_tail_fraction() -> f64 {
    0.2
}

impl AnalysisPreset {
    /// Load a preset from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading preset {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing preset {}", path.display()))
    }
}
