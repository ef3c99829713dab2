//! One blocking acquisition of a spoken utterance
//!
//! The session opens the microphone, calibrates an energy threshold against
//! ambient noise, waits for speech, records until a pause or the phrase
//! ceiling, then hands the audio to the recognizer. No speech and recognizer
//! failures are kept apart in [`CaptureOutcome`] but callers treat both as
//! "no input".

use crate::audio::{rms, AudioSample, Microphone, MicrophoneStream};
use crate::{EiraError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long each microphone read waits for a chunk
const READ_SLICE: Duration = Duration::from_millis(50);

/// Speech recognition engine
pub trait Recognizer: Send + Sync {
    /// Transcribe a complete utterance. Silence or unintelligible audio may
    /// come back as an empty string.
    fn recognize(&self, sample: &AudioSample) -> Result<String>;
}

/// Configuration for the speech recognizer
#[derive(Clone, Debug)]
pub struct RecognizerConfig {
    /// Path to the ggml Whisper model file
    pub model_path: PathBuf,

    /// Language to transcribe (None for auto-detection)
    pub language: Option<String>,

    /// Number of threads to use for transcription
    pub n_threads: i32,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: Some("en".to_string()),
            n_threads: 4,
        }
    }
}

/// Capture timing and threshold settings
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    /// Ambient noise measurement before listening
    pub calibration: Duration,

    /// Longest phrase recorded once speech has started
    pub phrase_limit: Duration,

    /// Trailing silence that ends a phrase
    pub pause: Duration,

    /// Threshold multiplier over the ambient RMS
    pub energy_multiplier: f32,

    /// Lower bound for the energy threshold
    pub min_energy: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            calibration: Duration::from_secs(1),
            phrase_limit: Duration::from_secs(5),
            pause: Duration::from_millis(800),
            energy_multiplier: 1.5,
            min_energy: 0.01,
        }
    }
}

/// Why a capture produced no text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyReason {
    /// Nothing above the energy threshold before the timeout
    NoSpeech,
    /// Audio was captured but the recognizer returned no words
    Unrecognized,
}

/// Result of one capture
#[derive(Clone, Debug)]
pub enum CaptureOutcome {
    Text(String),
    Empty(EmptyReason),
    Failed(EiraError),
}

impl CaptureOutcome {
    /// Collapse to the caller-visible form: text or nothing
    pub fn into_text(self) -> Option<String> {
        match self {
            CaptureOutcome::Text(text) => Some(text),
            CaptureOutcome::Empty(_) | CaptureOutcome::Failed(_) => None,
        }
    }
}

/// Microphone plus recognizer
pub struct CaptureSession {
    microphone: Arc<dyn Microphone>,
    recognizer: Arc<dyn Recognizer>,
    config: CaptureConfig,
}

impl CaptureSession {
    pub fn new(
        microphone: Arc<dyn Microphone>,
        recognizer: Arc<dyn Recognizer>,
        config: CaptureConfig,
    ) -> Self {
        Self {
            microphone,
            recognizer,
            config,
        }
    }

    /// Capture one utterance, waiting up to `timeout` for speech to begin.
    ///
    /// Blocks the calling thread; run it on a blocking pool. Never panics on
    /// device or recognizer errors.
    pub fn capture_utterance(&self, timeout: Duration) -> CaptureOutcome {
        let sample = {
            let mut stream = match self.microphone.open() {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("Could not open microphone: {}", e);
                    return CaptureOutcome::Failed(e);
                }
            };

            info!("Listening...");
            let recorded = self.record_phrase(stream.as_mut(), timeout);
            // the device is released here, before recognition runs
            drop(stream);

            match recorded {
                Ok(Some(sample)) => sample,
                Ok(None) => return CaptureOutcome::Empty(EmptyReason::NoSpeech),
                Err(e) => {
                    warn!("Capture failed: {}", e);
                    return CaptureOutcome::Failed(e);
                }
            }
        };

        debug!(
            "Captured {:.2}s of audio",
            sample.duration().as_secs_f32()
        );

        match self.recognizer.recognize(&sample) {
            Ok(text) => {
                let text = text.trim().to_lowercase();
                if text.is_empty() {
                    CaptureOutcome::Empty(EmptyReason::Unrecognized)
                } else {
                    info!("You: {}", text);
                    CaptureOutcome::Text(text)
                }
            }
            Err(e) => {
                warn!("Recognition failed: {}", e);
                CaptureOutcome::Failed(e)
            }
        }
    }

    /// Calibrate, wait for onset, record until pause or limit.
    ///
    /// Returns `None` when no speech started before `timeout`.
    fn record_phrase(
        &self,
        stream: &mut dyn MicrophoneStream,
        timeout: Duration,
    ) -> Result<Option<AudioSample>> {
        let sample_rate = stream.sample_rate();
        if sample_rate == 0 {
            return Err(EiraError::AudioDeviceError("stream reported 0 Hz".into()));
        }
        let threshold = self.calibrate(stream)?;
        debug!("Energy threshold set to {:.4}", threshold);

        let seconds = |samples: usize| Duration::from_secs_f64(samples as f64 / sample_rate as f64);

        // Wait for onset, measured in received audio so fakes run instantly
        let mut waited = 0usize;
        let deadline = Instant::now() + timeout;
        let mut phrase = loop {
            if seconds(waited) >= timeout || Instant::now() >= deadline {
                return Ok(None);
            }
            let Some(chunk) = stream.read(READ_SLICE)? else {
                continue;
            };
            if rms(&chunk) > threshold {
                break chunk;
            }
            waited += chunk.len();
        };

        let mut silent = 0usize;
        let phrase_deadline = Instant::now() + self.config.phrase_limit;
        while seconds(phrase.len()) < self.config.phrase_limit && Instant::now() < phrase_deadline {
            let Some(chunk) = stream.read(READ_SLICE)? else {
                continue;
            };
            if rms(&chunk) > threshold {
                silent = 0;
            } else {
                silent += chunk.len();
            }
            phrase.extend_from_slice(&chunk);
            if seconds(silent) >= self.config.pause {
                break;
            }
        }

        let limit = (self.config.phrase_limit.as_secs_f64() * sample_rate as f64) as usize;
        phrase.truncate(limit.max(1));

        Ok(Some(AudioSample::new(phrase, sample_rate)))
    }

    /// Measure ambient energy for the calibration window
    fn calibrate(&self, stream: &mut dyn MicrophoneStream) -> Result<f32> {
        let sample_rate = stream.sample_rate() as f64;
        let needed = (self.config.calibration.as_secs_f64() * sample_rate) as usize;
        let deadline = Instant::now() + self.config.calibration + READ_SLICE;

        let mut ambient = Vec::with_capacity(needed);
        while ambient.len() < needed && Instant::now() < deadline {
            if let Some(chunk) = stream.read(READ_SLICE)? {
                ambient.extend_from_slice(&chunk);
            }
        }

        Ok((rms(&ambient) * self.config.energy_multiplier).max(self.config.min_energy))
    }
}
