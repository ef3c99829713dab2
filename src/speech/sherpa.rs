//! VITS text-to-speech via sherpa-rs
//!
//! The engine lives on a dedicated worker thread and is fed through a
//! command channel; each job answers on a oneshot so async callers can await
//! it without blocking the runtime.

use crate::audio::write_wav;
use crate::speech::tts::{normalize_text_for_tts, Synthesizer, SynthesizerConfig, VoiceParams};
use crate::{EiraError, Result};
use async_trait::async_trait;
use crossbeam_channel::{unbounded, Receiver, Sender};
use sherpa_rs::tts::{VitsTts, VitsTtsConfig};
use std::path::{Path, PathBuf};
use std::thread;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// Commands sent to the synthesis worker
enum SynthesisCommand {
    Synthesize {
        text: String,
        voice: VoiceParams,
        artifact: PathBuf,
        reply: oneshot::Sender<Result<()>>,
    },
    Shutdown,
}

/// Handle to the sherpa-rs synthesis worker
pub struct SherpaSynthesizer {
    command_tx: Sender<SynthesisCommand>,
}

impl SherpaSynthesizer {
    /// Validate the model files and start the worker thread
    pub fn start(config: SynthesizerConfig) -> Result<Self> {
        config.validate()?;

        let (command_tx, command_rx) = unbounded();

        thread::Builder::new()
            .name("eira-tts".into())
            .spawn(move || run_worker(config, command_rx))
            .map_err(|e| EiraError::SynthesisError(format!("Failed to spawn TTS worker: {}", e)))?;

        Ok(Self { command_tx })
    }
}

impl Drop for SherpaSynthesizer {
    fn drop(&mut self) {
        let _ = self.command_tx.send(SynthesisCommand::Shutdown);
    }
}

#[async_trait]
impl Synthesizer for SherpaSynthesizer {
    async fn synthesize(&self, text: &str, voice: &VoiceParams, artifact: &Path) -> Result<()> {
        let (reply, response) = oneshot::channel();

        self.command_tx
            .send(SynthesisCommand::Synthesize {
                text: text.to_string(),
                voice: voice.clone(),
                artifact: artifact.to_path_buf(),
                reply,
            })
            .map_err(|e| EiraError::ChannelError(format!("TTS worker is gone: {}", e)))?;

        response
            .await
            .map_err(|_| EiraError::ChannelError("TTS worker dropped the request".into()))?
    }
}

fn run_worker(config: SynthesizerConfig, command_rx: Receiver<SynthesisCommand>) {
    info!("Loading VITS TTS model from: {}", config.model_path.display());

    let path_string = |p: &Option<PathBuf>| {
        p.as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let vits_config = VitsTtsConfig {
        model: config.model_path.to_string_lossy().into_owned(),
        tokens: config.tokens_path.to_string_lossy().into_owned(),
        lexicon: path_string(&config.lexicon_path),
        data_dir: path_string(&config.data_dir),
        length_scale: 1.0,
        noise_scale: 0.667,
        noise_scale_w: 0.8,
        ..Default::default()
    };

    let mut tts = VitsTts::new(vits_config);
    let mut warned_pitch = false;

    info!("TTS worker ready");

    loop {
        match command_rx.recv() {
            Ok(SynthesisCommand::Synthesize {
                text,
                voice,
                artifact,
                reply,
            }) => {
                if voice.pitch_hz != 0 && !warned_pitch {
                    debug!("VITS voices ignore the pitch setting ({} Hz)", voice.pitch_hz);
                    warned_pitch = true;
                }

                let normalized = normalize_text_for_tts(&text);
                let result = if normalized.is_empty() {
                    Err(EiraError::SynthesisError("Nothing speakable in text".into()))
                } else {
                    tts.create(&normalized, voice.speaker_id, voice.speed())
                        .map_err(|e| EiraError::SynthesisError(format!("Synthesis failed: {}", e)))
                        .and_then(|audio| {
                            write_wav(&artifact, &audio.samples, audio.sample_rate as u32)
                        })
                };

                if let Err(e) = &result {
                    warn!("TTS job failed: {}", e);
                }
                let _ = reply.send(result);
            }
            Ok(SynthesisCommand::Shutdown) => {
                info!("TTS worker shutting down");
                break;
            }
            Err(e) => {
                error!("TTS command channel error: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_rejects_missing_model() {
        let config = SynthesizerConfig::new("/nonexistent/model.onnx", "/nonexistent/tokens.txt");
        assert!(SherpaSynthesizer::start(config).is_err());
    }
}
