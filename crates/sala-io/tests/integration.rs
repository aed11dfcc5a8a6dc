//! Integration tests for sala-io WAV reading and writing.

use sala_io::{Error, WavFormat, read_wav, read_wav_info, write_wav};
use tempfile::NamedTempFile;

/// A 440 Hz sine at the given sample rate.
fn sine_wave(sample_rate: u32, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|i| (2.0 * std::f64::consts::PI * 440.0 * i as f64 / f64::from(sample_rate)).sin())
        .collect()
}

#[test]
fn float_roundtrip_preserves_samples() {
    let sr = 48000;
    let samples = sine_wave(sr, 4800);

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, sr).unwrap();

    let (loaded, info) = read_wav(file.path()).unwrap();
    assert_eq!(info.sample_rate, sr);
    assert_eq!(info.channels, 1);
    assert_eq!(info.format, WavFormat::IeeeFloat);
    assert_eq!(loaded.len(), samples.len());
    for (a, b) in samples.iter().zip(loaded.iter()) {
        // Round trip through f32 costs single precision only.
        assert!((a - b).abs() < 1e-6, "sample mismatch: {a} vs {b}");
    }
}

#[test]
fn info_reports_header_without_loading() {
    let sr = 44100;
    let samples = sine_wave(sr, sr as usize / 2);

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, sr).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 1);
    assert_eq!(info.sample_rate, sr);
    assert_eq!(info.bits_per_sample, 32);
    assert_eq!(info.format, WavFormat::IeeeFloat);
    assert_eq!(info.num_frames, samples.len() as u64);
    assert!((info.duration_secs() - 0.5).abs() < 1e-9);
    assert_eq!(info.format.to_string(), "IEEE float");
}

#[test]
fn pcm_files_are_scaled_to_unit_range() {
    let header = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let file = NamedTempFile::new().unwrap();
    let mut writer = hound::WavWriter::create(file.path(), header).unwrap();
    for &v in &[0i16, i16::MAX, i16::MIN, i16::MAX / 2] {
        writer.write_sample(v).unwrap();
    }
    writer.finalize().unwrap();

    let (samples, info) = read_wav(file.path()).unwrap();
    assert_eq!(info.bits_per_sample, 16);
    assert_eq!(info.format, WavFormat::Pcm);
    assert_eq!(samples.len(), 4);
    assert_eq!(samples[0], 0.0);
    assert!((samples[1] - (f64::from(i16::MAX) / 32768.0)).abs() < 1e-9);
    assert!((samples[2] + 1.0).abs() < 1e-9);
    assert!(samples.iter().all(|&s| (-1.0..=1.0).contains(&s)));
}

#[test]
fn stereo_files_are_mixed_down() {
    let header = hound::WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let file = NamedTempFile::new().unwrap();
    let mut writer = hound::WavWriter::create(file.path(), header).unwrap();
    for i in 0..100 {
        writer.write_sample(1.0f32).unwrap(); // left
        writer.write_sample(if i % 2 == 0 { 0.0f32 } else { 0.5 }).unwrap(); // right
    }
    writer.finalize().unwrap();

    let (samples, info) = read_wav(file.path()).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.num_frames, 100);
    assert_eq!(samples.len(), 100);
    assert!((samples[0] - 0.5).abs() < 1e-9);
    assert!((samples[1] - 0.75).abs() < 1e-9);
}

#[test]
fn empty_file_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &[], 48000).unwrap();
    assert!(matches!(read_wav(file.path()), Err(Error::Empty)));
}

#[test]
fn missing_file_is_a_wav_error() {
    assert!(matches!(
        read_wav("/nonexistent/definitely/missing.wav"),
        Err(Error::Wav(_))
    ));
}
