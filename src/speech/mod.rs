//! Speech processing: the single-flight gate, synthesis and playback, and
//! voice capture
//!
//! Engines are optional:
//! - VITS text-to-speech via sherpa-rs (feature `sherpa`)
//! - Whisper speech-to-text (feature `whisper`)

pub mod capture;
pub mod gate;
pub mod pipeline;
#[cfg(feature = "sherpa")]
pub mod sherpa;
pub mod tts;
#[cfg(feature = "whisper")]
pub mod whisper;

// Re-export commonly used types
pub use capture::{
    CaptureConfig, CaptureOutcome, CaptureSession, EmptyReason, Recognizer, RecognizerConfig,
};
pub use gate::{GatePermit, SpeechGate};
pub use pipeline::{SkipReason, SpeakOutcome, SpeakReport, SpeechPipeline, SpeechSettings};
#[cfg(feature = "sherpa")]
pub use sherpa::SherpaSynthesizer;
pub use tts::{
    normalize_text_for_tts, Synthesizer, SynthesizerConfig, UnavailableSynthesizer, VoiceParams,
};
#[cfg(feature = "whisper")]
pub use whisper::WhisperRecognizer;
