//! Text-to-speech contract
//!
//! A [`Synthesizer`] renders text into an audio artifact on disk. The
//! pipeline owns the artifact path and its cleanup; engines only write it.

use crate::{EiraError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Fixed voice settings used for every speech request
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceParams {
    /// Speaker (voice) id for multi-speaker models
    pub speaker_id: i32,

    /// Speaking rate change in percent (-10 = ten percent slower)
    pub rate_percent: i32,

    /// Pitch shift in Hz, for engines that support it
    pub pitch_hz: i32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            speaker_id: 0,
            rate_percent: -10,
            pitch_hz: 30,
        }
    }
}

impl VoiceParams {
    /// Speed multiplier derived from the rate (1.0 = normal)
    pub fn speed(&self) -> f32 {
        (1.0 + self.rate_percent as f32 / 100.0).max(0.1)
    }
}

/// Model files for the VITS synthesizer
#[derive(Clone, Debug, Default)]
pub struct SynthesizerConfig {
    /// Path to the ONNX model file
    pub model_path: PathBuf,

    /// Path to the tokens file
    pub tokens_path: PathBuf,

    /// Path to the lexicon file (optional for some models)
    pub lexicon_path: Option<PathBuf>,

    /// Path to the espeak-ng data directory (optional)
    pub data_dir: Option<PathBuf>,
}

impl SynthesizerConfig {
    pub fn new(model_path: impl Into<PathBuf>, tokens_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            tokens_path: tokens_path.into(),
            ..Default::default()
        }
    }

    /// Check that the model files exist
    pub fn validate(&self) -> Result<()> {
        if self.model_path.as_os_str().is_empty() {
            return Err(EiraError::ConfigMissing("TTS model path is required".into()));
        }
        if !self.model_path.exists() {
            return Err(EiraError::ConfigError(format!(
                "TTS model not found: {}",
                self.model_path.display()
            )));
        }
        if !self.tokens_path.exists() {
            return Err(EiraError::ConfigError(format!(
                "TTS tokens file not found: {}",
                self.tokens_path.display()
            )));
        }
        Ok(())
    }
}

/// Speech synthesis engine
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` into an audio file at `artifact`.
    async fn synthesize(&self, text: &str, voice: &VoiceParams, artifact: &Path) -> Result<()>;
}

/// Stand-in used when no engine could be loaded; every request fails
#[derive(Debug, Clone)]
pub struct UnavailableSynthesizer {
    reason: String,
}

impl UnavailableSynthesizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Synthesizer for UnavailableSynthesizer {
    async fn synthesize(&self, _text: &str, _voice: &VoiceParams, _artifact: &Path) -> Result<()> {
        Err(EiraError::SynthesisError(format!(
            "Speech output unavailable: {}",
            self.reason
        )))
    }
}

/// Normalize text for TTS synthesis
///
/// Expands a few abbreviations and symbols and strips characters that VITS
/// tokenizers tend to choke on (markdown, emoji).
pub fn normalize_text_for_tts(text: &str) -> String {
    let mut result = text.to_string();

    let abbreviations = [
        ("Mr.", "Mister"),
        ("Mrs.", "Misses"),
        ("Dr.", "Doctor"),
        ("vs.", "versus"),
        ("etc.", "etcetera"),
        ("e.g.", "for example"),
        ("i.e.", "that is"),
    ];
    for (abbrev, expansion) in abbreviations {
        result = result.replace(abbrev, expansion);
    }

    let symbols = [
        ("&", " and "),
        ("%", " percent"),
        ("@", " at "),
        ("+", " plus "),
        ("=", " equals "),
    ];
    for (symbol, word) in symbols {
        result = result.replace(symbol, word);
    }

    let filtered: String = result
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ".,!?;:'-\"".contains(*c))
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}
