//! Audio file I/O for the sala acoustic analysis toolkit.
//!
//! The analysis pipeline consumes a mono `f64` sequence plus a sample
//! rate; this crate turns WAV files into exactly that and writes analysis
//! products (sweeps, reconstructed impulse responses) back out:
//!
//! - [`read_wav`] - float or integer PCM, mixed down to mono, with its
//!   [`WavInfo`] header description
//! - [`read_wav_info`] - the header description alone
//! - [`write_wav`] - 32-bit float mono output

mod wav;

pub use wav::{WavFormat, WavInfo, read_wav, read_wav_info, write_wav};

/// Error type for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file contains no audio frames.
    #[error("WAV file contains no samples")]
    Empty,
}

/// Result alias for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
