//! IEC 61260 band definitions and the band-pass filter bank.

use std::collections::BTreeMap;

use sala_core::{butterworth_bandpass, sosfiltfilt};

use crate::error::AnalysisError;

/// Nominal octave-band centers in Hz (IEC 61260).
pub const OCTAVE_CENTERS: [u32; 7] = [125, 250, 500, 1000, 2000, 4000, 8000];

/// Nominal third-octave-band centers in Hz (IEC 61260).
pub const THIRD_OCTAVE_CENTERS: [u32; 19] = [
    125, 160, 200, 250, 315, 400, 500, 630, 800, 1000, 1250, 1600, 2000, 2500, 3150, 4000, 5000,
    6300, 8000,
];

/// Default Butterworth prototype order for the band filters.
pub const DEFAULT_FILTER_ORDER: usize = 4;

/// Fractional-octave resolution of the filter bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// Full octave bands (bandwidth factor 1/2).
    Octave,
    /// Third-octave bands (bandwidth factor 1/6).
    ThirdOctave,
}

impl FilterType {
    /// Parse the external `1 | 3` code.
    pub fn from_code(code: u8) -> Result<Self, AnalysisError> {
        match code {
            1 => Ok(Self::Octave),
            3 => Ok(Self::ThirdOctave),
            other => Err(AnalysisError::UnknownFilterType(other)),
        }
    }

    /// External numeric code for this resolution.
    pub fn code(self) -> u8 {
        match self {
            Self::Octave => 1,
            Self::ThirdOctave => 3,
        }
    }

    /// Exponent `b` such that band edges are `fc * 2.powf(-b)` and
    /// `fc * 2.powf(b)`.
    pub fn bandwidth_factor(self) -> f64 {
        match self {
            Self::Octave => 1.0 / 2.0,
            Self::ThirdOctave => 1.0 / 6.0,
        }
    }

    /// Nominal band centers for this resolution.
    pub fn centers(self) -> &'static [u32] {
        match self {
            Self::Octave => &OCTAVE_CENTERS,
            Self::ThirdOctave => &THIRD_OCTAVE_CENTERS,
        }
    }
}

/// One analysis band: nominal center with derived edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Nominal center frequency in Hz.
    pub center_hz: u32,
    /// Lower band edge in Hz.
    pub low_hz: f64,
    /// Upper band edge in Hz.
    pub high_hz: f64,
}

/// Zero-phase Butterworth band-pass filter bank.
///
/// Bands whose upper edge reaches the Nyquist frequency are skipped rather
/// than designed against an unstable edge.
#[derive(Debug, Clone)]
pub struct FilterBank {
    sample_rate: u32,
    filter_type: FilterType,
    order: usize,
}

impl FilterBank {
    /// Create a filter bank for the given sample rate and resolution.
    pub fn new(sample_rate: u32, filter_type: FilterType, order: usize) -> Self {
        Self { sample_rate, filter_type, order }
    }

    /// The bands this bank will emit at its sample rate.
    pub fn bands(&self) -> Vec<Band> {
        let ratio = 2.0f64.powf(self.filter_type.bandwidth_factor());
        let nyquist = self.sample_rate as f64 / 2.0;
        self.filter_type
            .centers()
            .iter()
            .map(|&fc| Band {
                center_hz: fc,
                low_hz: fc as f64 / ratio,
                high_hz: fc as f64 * ratio,
            })
            .filter(|band| band.high_hz < nyquist)
            .collect()
    }

    /// Filter the impulse response into per-band signals.
    ///
    /// Each output signal has the input length; keys are the nominal band
    /// centers in Hz.
    pub fn apply(&self, impulse_response: &[f64]) -> Result<BTreeMap<u32, Vec<f64>>, AnalysisError> {
        let fs = self.sample_rate as f64;
        let mut filtered = BTreeMap::new();
        for band in self.bands() {
            let sos = butterworth_bandpass(self.order, band.low_hz, band.high_hz, fs)?;
            filtered.insert(band.center_hz, sosfiltfilt(&sos, impulse_response));
        }
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| (2.0 * PI * freq * i as f64 / fs).sin()).collect()
    }

    fn rms(x: &[f64]) -> f64 {
        (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
    }

    #[test]
    fn filter_type_codes() {
        assert_eq!(FilterType::from_code(1).unwrap(), FilterType::Octave);
        assert_eq!(FilterType::from_code(3).unwrap(), FilterType::ThirdOctave);
        assert!(matches!(
            FilterType::from_code(2),
            Err(AnalysisError::UnknownFilterType(2))
        ));
        assert_eq!(FilterType::Octave.code(), 1);
        assert_eq!(FilterType::ThirdOctave.code(), 3);
    }

    #[test]
    fn octave_edges_are_half_octave_out() {
        let bank = FilterBank::new(48000, FilterType::Octave, DEFAULT_FILTER_ORDER);
        let bands = bank.bands();
        let b1k = bands.iter().find(|b| b.center_hz == 1000).unwrap();
        assert!((b1k.low_hz - 1000.0 / 2.0f64.sqrt()).abs() < 1e-9);
        assert!((b1k.high_hz - 1000.0 * 2.0f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn nyquist_bands_are_skipped() {
        // At 16 kHz the 8 kHz octave band's upper edge (11.3 kHz) exceeds
        // Nyquist, and so does the 4 kHz band's (5.65 kHz < 8 kHz stays).
        let bank = FilterBank::new(16000, FilterType::Octave, DEFAULT_FILTER_ORDER);
        let centers: Vec<u32> = bank.bands().iter().map(|b| b.center_hz).collect();
        assert_eq!(centers, vec![125, 250, 500, 1000, 2000, 4000]);
    }

    #[test]
    fn full_rate_keeps_all_octave_bands() {
        let bank = FilterBank::new(44100, FilterType::Octave, DEFAULT_FILTER_ORDER);
        assert_eq!(bank.bands().len(), OCTAVE_CENTERS.len());
        let bank = FilterBank::new(44100, FilterType::ThirdOctave, DEFAULT_FILTER_ORDER);
        assert_eq!(bank.bands().len(), THIRD_OCTAVE_CENTERS.len());
    }

    #[test]
    fn band_signals_preserve_length() {
        let bank = FilterBank::new(44100, FilterType::Octave, DEFAULT_FILTER_ORDER);
        let input = sine(1000.0, 44100.0, 4096);
        let filtered = bank.apply(&input).unwrap();
        assert_eq!(filtered.len(), OCTAVE_CENTERS.len());
        for signal in filtered.values() {
            assert_eq!(signal.len(), input.len());
        }
    }

    #[test]
    fn tone_energy_concentrates_in_its_band() {
        let fs = 44100.0;
        let bank = FilterBank::new(44100, FilterType::Octave, DEFAULT_FILTER_ORDER);
        let input = sine(1000.0, fs, 16384);
        let filtered = bank.apply(&input).unwrap();

        let in_band = rms(&filtered[&1000][4096..12288]);
        let off_band = rms(&filtered[&125][4096..12288]);
        assert!(in_band > 0.6, "in-band RMS {in_band}");
        assert!(off_band < 1e-3, "off-band RMS {off_band}");
    }
}
