//! Shared fakes for the scenario tests

#![allow(dead_code)]

use async_trait::async_trait;
use eira::audio::AudioPlayer;
use eira::clients::{ChatClient, SearchClient, SearchHit};
use eira::desktop::{BrowserLauncher, KeyCombo, ShortcutSender};
use eira::intent::IntentRouter;
use eira::messages::{LogSender, Transcript};
use eira::speech::{SpeechPipeline, SpeechSettings, Synthesizer, VoiceParams};
use eira::{EiraError, Result};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Observable side effects, in the order they happened
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Spoke(String),
    Opened(String),
    Shortcut(KeyCombo),
}

pub type Effects = Arc<Mutex<Vec<Effect>>>;

pub struct RecordingSynth {
    effects: Effects,
    delay: Duration,
}

#[async_trait]
impl Synthesizer for RecordingSynth {
    async fn synthesize(&self, text: &str, _voice: &VoiceParams, artifact: &Path) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        std::fs::write(artifact, b"RIFF")?;
        self.effects.lock().push(Effect::Spoke(text.to_string()));
        Ok(())
    }
}

/// Finishes playback immediately
pub struct InstantPlayer;

impl AudioPlayer for InstantPlayer {
    fn load(&self, artifact: &Path) -> Result<()> {
        if artifact.exists() {
            Ok(())
        } else {
            Err(EiraError::PlaybackError("artifact missing".into()))
        }
    }

    fn play(&self) -> Result<()> {
        Ok(())
    }

    fn is_busy(&self) -> bool {
        false
    }

    fn unload(&self) {}
}

pub struct RecordingBrowser(pub Effects);

impl BrowserLauncher for RecordingBrowser {
    fn open_url(&self, url: &str) -> Result<()> {
        self.0.lock().push(Effect::Opened(url.to_string()));
        Ok(())
    }
}

pub struct RecordingShortcuts(pub Effects);

impl ShortcutSender for RecordingShortcuts {
    fn send_shortcut(&self, combo: &KeyCombo) -> Result<()> {
        self.0.lock().push(Effect::Shortcut(combo.clone()));
        Ok(())
    }
}

/// Chat client with a canned answer per call
pub struct ScriptedChat {
    replies: Mutex<Vec<Result<String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop()
            .unwrap_or_else(|| Err(EiraError::TransportError("no scripted reply".into())))
    }
}

pub struct ScriptedSearch {
    reply: Mutex<Option<Result<Option<SearchHit>>>>,
    pub queries: Mutex<Vec<String>>,
}

impl ScriptedSearch {
    pub fn new(reply: Result<Option<SearchHit>>) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn snippet(text: &str) -> Self {
        Self::new(Ok(Some(SearchHit {
            snippet: Some(text.to_string()),
            ..Default::default()
        })))
    }
}

#[async_trait]
impl SearchClient for ScriptedSearch {
    async fn search(&self, query: &str) -> Result<Option<SearchHit>> {
        self.queries.lock().push(query.to_string());
        self.reply.lock().take().unwrap_or(Ok(None))
    }
}

/// A router wired to recording fakes
pub struct Harness {
    pub effects: Effects,
    pub log: LogSender,
    pub transcript: Transcript,
    pub speech: Arc<SpeechPipeline>,
    pub artifacts: TempDir,
    browser: Arc<RecordingBrowser>,
    shortcuts: Arc<RecordingShortcuts>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_synth_delay(Duration::ZERO)
    }

    pub fn with_synth_delay(delay: Duration) -> Self {
        let effects: Effects = Arc::new(Mutex::new(Vec::new()));
        let artifacts = tempfile::tempdir().expect("tempdir");
        let speech = Arc::new(SpeechPipeline::new(
            Arc::new(RecordingSynth {
                effects: effects.clone(),
                delay,
            }),
            Arc::new(InstantPlayer),
            SpeechSettings {
                artifact_dir: artifacts.path().to_path_buf(),
                poll_interval: Duration::from_millis(5),
                ..Default::default()
            },
        ));
        let (log, transcript) = Transcript::channel(100);

        Self {
            browser: Arc::new(RecordingBrowser(effects.clone())),
            shortcuts: Arc::new(RecordingShortcuts(effects.clone())),
            effects,
            log,
            transcript,
            speech,
            artifacts,
        }
    }

    pub fn router(&self) -> IntentRouter {
        IntentRouter::new(
            self.speech.clone(),
            self.log.clone(),
            self.browser.clone(),
            self.shortcuts.clone(),
        )
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().clone()
    }

    pub fn lines(&mut self) -> Vec<String> {
        self.transcript.drain();
        self.transcript.lines()
    }

    pub fn leftover_artifacts(&self) -> usize {
        std::fs::read_dir(self.artifacts.path())
            .expect("read artifact dir")
            .count()
    }
}

pub fn spoke(text: &str) -> Effect {
    Effect::Spoke(text.to_string())
}
