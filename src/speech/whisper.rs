//! Speech recognition with whisper-rs

use crate::audio::{preprocess_for_recognition, AudioSample};
use crate::speech::capture::{Recognizer, RecognizerConfig};
use crate::{EiraError, Result};
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Whisper-backed [`Recognizer`]
pub struct WhisperRecognizer {
    config: RecognizerConfig,
    context: WhisperContext,
}

impl WhisperRecognizer {
    pub fn new(config: RecognizerConfig) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", config.model_path);

        if !config.model_path.exists() {
            return Err(EiraError::ConfigError(format!(
                "Whisper model not found: {:?}",
                config.model_path
            )));
        }

        let path = config
            .model_path
            .to_str()
            .ok_or_else(|| EiraError::ConfigError("Invalid model path".to_string()))?;

        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| {
                EiraError::ConfigError(format!("Failed to load Whisper model: {:?}", e))
            })?;

        info!("Whisper model loaded successfully");

        Ok(Self { config, context })
    }
}

impl Recognizer for WhisperRecognizer {
    fn recognize(&self, sample: &AudioSample) -> Result<String> {
        if sample.is_empty() {
            return Ok(String::new());
        }

        let audio = preprocess_for_recognition(sample)?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.config.n_threads);
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        if let Some(ref lang) = self.config.language {
            params.set_language(Some(lang.as_str()));
        }

        let mut state = self.context.create_state().map_err(|e| {
            EiraError::RecognitionError(format!("Failed to create state: {:?}", e))
        })?;

        state
            .full(params, &audio)
            .map_err(|e| EiraError::RecognitionError(format!("Transcription failed: {:?}", e)))?;

        let num_segments = state.full_n_segments().map_err(|e| {
            EiraError::RecognitionError(format!("Failed to get segments: {:?}", e))
        })?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment = state.full_get_segment_text(i).map_err(|e| {
                EiraError::RecognitionError(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment);
        }

        // Whisper marks silence with bracketed tags like [BLANK_AUDIO]
        let text = strip_annotations(&text);
        debug!("Transcription result: '{}'", text);
        Ok(text)
    }
}

/// Remove bracketed and parenthesized non-speech annotations
fn strip_annotations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
