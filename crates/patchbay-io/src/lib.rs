//! Audio file output for patchbay patches.
//!
//! This crate provides:
//!
//! - **WAV sink node**: [`wavout`] writes the top of stack to a WAV file while
//!   passing it through
//! - **WAV reading**: [`read_wav`] and [`read_wav_info`] for inspecting what a
//!   patch rendered
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use patchbay_core::{Patch, PatchConfig};
//! use patchbay_io::wavout;
//!
//! let mut patch = Patch::new(PatchConfig::default())?;
//! // ... build a signal on the stack ...
//! wavout(&mut patch, "out.wav")?;
//! patch.drop()?;
//! patch.run(44100)?;
//! patch.close()?; // finalizes the WAV header
//!
//! let (samples, spec) = patchbay_io::read_wav("out.wav")?;
//! ```

mod wav;
mod wavout;

pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info};
pub use wavout::{Wavout, WavoutPorts, wavout, wavout_with_depth};

/// Error types for audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Only 16- and 24-bit integer and 32-bit float samples are written.
    #[error("unsupported bit depth: {0}")]
    UnsupportedDepth(u16),
}

/// Convenience result type for audio file operations.
pub type Result<T> = std::result::Result<T, Error>;
