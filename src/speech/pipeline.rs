//! Synthesis-and-playback pipeline
//!
//! `speak` turns text into audible output while holding the [`SpeechGate`].
//! Each accepted call creates exactly one transient artifact and removes it
//! again on every exit path.

use crate::audio::AudioPlayer;
use crate::speech::gate::SpeechGate;
use crate::speech::tts::{Synthesizer, VoiceParams};
use crate::{EiraError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Fixed speech settings
#[derive(Clone, Debug)]
pub struct SpeechSettings {
    /// Voice parameters used for every request
    pub voice: VoiceParams,

    /// Directory for transient artifacts
    pub artifact_dir: PathBuf,

    /// How often playback completion is polled
    pub poll_interval: Duration,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            voice: VoiceParams::default(),
            artifact_dir: std::env::temp_dir(),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Why a `speak` call did nothing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Text was empty or whitespace
    EmptyText,
    /// Another playback holds the gate
    GateHeld,
}

/// How a `speak` call ended
#[derive(Clone, Debug)]
pub enum SpeakOutcome {
    Spoken,
    Skipped(SkipReason),
    Failed(EiraError),
}

/// Result of one `speak` call, kept for diagnostics
#[derive(Clone, Debug)]
pub struct SpeakReport {
    pub outcome: SpeakOutcome,

    /// Artifact that could not be deleted, if any
    pub leaked_artifact: Option<PathBuf>,
}

impl SpeakReport {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            outcome: SpeakOutcome::Skipped(reason),
            leaked_artifact: None,
        }
    }

    pub fn was_spoken(&self) -> bool {
        matches!(self.outcome, SpeakOutcome::Spoken)
    }
}

/// Deletes the artifact when dropped unless `cleanup` already ran
struct TransientArtifact {
    path: PathBuf,
    cleaned: bool,
}

impl TransientArtifact {
    fn new(dir: &Path) -> Self {
        let name = format!(
            "eira-speech-{}-{}.wav",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4().simple()
        );
        Self {
            path: dir.join(name),
            cleaned: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn cleanup(&mut self) -> Result<()> {
        self.cleaned = true;
        if !self.path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path).map_err(|e| {
            EiraError::IOError(format!("Could not delete {}: {}", self.path.display(), e))
        })
    }
}

impl Drop for TransientArtifact {
    fn drop(&mut self) {
        if !self.cleaned && self.path.exists() {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Text-to-audio pipeline honoring the single-flight gate
pub struct SpeechPipeline {
    gate: SpeechGate,
    synthesizer: Arc<dyn Synthesizer>,
    player: Arc<dyn AudioPlayer>,
    settings: SpeechSettings,
}

impl SpeechPipeline {
    pub fn new(
        synthesizer: Arc<dyn Synthesizer>,
        player: Arc<dyn AudioPlayer>,
        settings: SpeechSettings,
    ) -> Self {
        Self {
            gate: SpeechGate::new(),
            synthesizer,
            player,
            settings,
        }
    }

    /// Whether a playback is in progress
    pub fn is_speaking(&self) -> bool {
        self.gate.is_held()
    }

    /// Speak `text`, or do nothing if it is empty or another playback is active.
    ///
    /// Never fails: synthesis, playback and cleanup errors are logged and
    /// returned in the report.
    pub async fn speak(&self, text: &str) -> SpeakReport {
        let text = text.trim();
        if text.is_empty() {
            return SpeakReport::skipped(SkipReason::EmptyText);
        }

        let Some(_permit) = self.gate.try_lock() else {
            debug!("Speech already in progress, dropping: {}", text);
            return SpeakReport::skipped(SkipReason::GateHeld);
        };

        info!("AI: {}", text);

        let mut artifact = TransientArtifact::new(&self.settings.artifact_dir);
        let played = self.synthesize_and_play(text, artifact.path()).await;

        let player = Arc::clone(&self.player);
        if tokio::task::spawn_blocking(move || player.unload())
            .await
            .is_err()
        {
            warn!("Audio player panicked while unloading");
        }

        let leaked_artifact = match artifact.cleanup() {
            Ok(()) => None,
            Err(e) => {
                warn!("{}", e);
                Some(artifact.path().to_path_buf())
            }
        };

        let outcome = match played {
            Ok(()) => SpeakOutcome::Spoken,
            Err(e) => {
                warn!("Error during speech: {}", e);
                SpeakOutcome::Failed(e)
            }
        };

        SpeakReport {
            outcome,
            leaked_artifact,
        }
    }

    async fn synthesize_and_play(&self, text: &str, artifact: &Path) -> Result<()> {
        self.synthesizer
            .synthesize(text, &self.settings.voice, artifact)
            .await?;

        let player = Arc::clone(&self.player);
        let path = artifact.to_path_buf();
        tokio::task::spawn_blocking(move || {
            player.load(&path)?;
            player.play()
        })
        .await
        .map_err(|e| EiraError::PlaybackError(format!("Playback task failed: {}", e)))??;

        while self.player.is_busy() {
            tokio::time::sleep(self.settings.poll_interval).await;
        }

        Ok(())
    }
}
