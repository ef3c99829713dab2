//! Audio device contracts and signal helpers
//!
//! Devices sit behind small traits so the speech pipeline and the capture
//! session can run against the real hardware adapters (feature `audio-io`)
//! or in-memory fakes.

#[cfg(feature = "audio-io")]
pub mod input;
#[cfg(feature = "audio-io")]
pub mod playback;
pub mod preprocessor;
pub mod resampler;
pub mod wav;

#[cfg(feature = "audio-io")]
pub use input::CpalMicrophone;
#[cfg(feature = "audio-io")]
pub use playback::RodioPlayer;
pub use preprocessor::preprocess_for_recognition;
pub use resampler::{resample_audio, AudioResampler};
pub use wav::write_wav;

use crate::Result;
use std::path::Path;
use std::time::Duration;

/// A mono audio buffer with its sample rate
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSample {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioSample {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Root-mean-square energy of a chunk
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|&s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Audio input device that can be opened for one capture
pub trait Microphone: Send + Sync {
    /// Acquire the device. It stays held until the returned stream is dropped.
    fn open(&self) -> Result<Box<dyn MicrophoneStream>>;
}

/// An open microphone delivering mono chunks
pub trait MicrophoneStream {
    fn sample_rate(&self) -> u32;

    /// Wait up to `timeout` for the next chunk. `Ok(None)` means nothing arrived.
    fn read(&mut self, timeout: Duration) -> Result<Option<Vec<f32>>>;
}

/// Audio output subsystem that plays one artifact at a time
pub trait AudioPlayer: Send + Sync {
    fn load(&self, artifact: &Path) -> Result<()>;

    fn play(&self) -> Result<()>;

    fn is_busy(&self) -> bool;

    /// Stop playback and release anything tied to the loaded artifact
    fn unload(&self);
}
