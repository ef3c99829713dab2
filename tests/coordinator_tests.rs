//! Session coordinator: typed input, voice input and the greeting

mod common;

use common::{spoke, Effect, Harness, ScriptedChat};
use eira::audio::{AudioSample, Microphone, MicrophoneStream};
use eira::integration::SessionCoordinator;
use eira::speech::{CaptureConfig, CaptureSession, Recognizer};
use eira::{EiraError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

const RATE: u32 = 16000;
const CHUNK: usize = 800;

/// Silence for calibration, then a burst of speech
struct ScriptedMic {
    speech_chunks: usize,
}

struct ScriptedStream {
    read: usize,
    speech_chunks: usize,
}

impl Microphone for ScriptedMic {
    fn open(&self) -> Result<Box<dyn MicrophoneStream>> {
        Ok(Box::new(ScriptedStream {
            read: 0,
            speech_chunks: self.speech_chunks,
        }))
    }
}

impl MicrophoneStream for ScriptedStream {
    fn sample_rate(&self) -> u32 {
        RATE
    }

    fn read(&mut self, _timeout: Duration) -> Result<Option<Vec<f32>>> {
        self.read += 1;
        let speaking = self.read > 4 && self.read <= 4 + self.speech_chunks;
        let level = if speaking { 0.3 } else { 0.0 };
        Ok(Some(
            (0..CHUNK)
                .map(|i| if i % 2 == 0 { level } else { -level })
                .collect(),
        ))
    }
}

struct FixedRecognizer(std::result::Result<&'static str, ()>);

impl Recognizer for FixedRecognizer {
    fn recognize(&self, _sample: &AudioSample) -> Result<String> {
        self.0
            .map(str::to_string)
            .map_err(|_| EiraError::RecognitionError("service unavailable".into()))
    }
}

fn capture(speech_chunks: usize, reply: std::result::Result<&'static str, ()>) -> Arc<CaptureSession> {
    Arc::new(CaptureSession::new(
        Arc::new(ScriptedMic { speech_chunks }),
        Arc::new(FixedRecognizer(reply)),
        CaptureConfig {
            calibration: Duration::from_millis(200),
            ..Default::default()
        },
    ))
}

fn coordinator(harness: &Harness) -> SessionCoordinator {
    SessionCoordinator::new(
        Handle::current(),
        Arc::new(harness.router()),
        harness.log.clone(),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn typed_command_is_logged_and_routed() {
    let mut harness = Harness::new();
    let coordinator = coordinator(&harness);

    let task = coordinator.submit_text("open github").expect("accepted");
    let result = task.await.unwrap();

    assert_eq!(result.reply.as_deref(), Some("Opening github"));
    assert_eq!(harness.lines(), vec!["You: open github", "AI: Opening github"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blank_input_is_ignored() {
    let mut harness = Harness::new();
    let coordinator = coordinator(&harness);

    assert!(coordinator.submit_text("   ").is_none());
    assert!(harness.lines().is_empty());
    assert!(harness.effects().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn greeting_is_logged_and_spoken() {
    let mut harness = Harness::new();
    let coordinator = coordinator(&harness);

    let report = coordinator.greet().await.unwrap();

    assert!(report.was_spoken());
    assert_eq!(
        harness.lines(),
        vec!["[System] EIRA AI initialized. Press F2 to speak."]
    );
    assert_eq!(harness.effects(), vec![spoke("I am online and ready.")]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn voice_command_is_captured_and_routed() {
    let mut harness = Harness::new();
    let coordinator = coordinator(&harness)
        .with_capture(capture(10, Ok(" Close Tab ")), Duration::from_secs(2));
    assert!(coordinator.has_voice_input());

    let result = coordinator.start_listening().await.unwrap().expect("routed");

    assert_eq!(result.reply.as_deref(), Some("Closing the tab."));
    assert!(!coordinator.is_listening());
    assert_eq!(
        harness.lines(),
        vec![
            "[System] Listening...",
            "You: close tab",
            "AI: Closing the tab.",
        ]
    );
    assert!(harness
        .effects()
        .iter()
        .any(|e| matches!(e, Effect::Shortcut(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn silence_and_recognition_failure_are_no_ops() {
    let mut harness = Harness::new();

    let silent = coordinator(&harness).with_capture(capture(0, Ok("never")), Duration::from_secs(1));
    assert!(silent.start_listening().await.unwrap().is_none());

    let failing = coordinator(&harness).with_capture(capture(10, Err(())), Duration::from_secs(2));
    assert!(failing.start_listening().await.unwrap().is_none());

    assert_eq!(
        harness.lines(),
        vec!["[System] Listening...", "[System] Listening..."]
    );
    assert!(harness.effects().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn listening_without_microphone_does_nothing() {
    let mut harness = Harness::new();
    let coordinator = coordinator(&harness);

    assert!(!coordinator.has_voice_input());
    assert!(coordinator.start_listening().await.unwrap().is_none());
    assert!(harness.lines().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sources_each_get_a_task() {
    let mut harness = Harness::new();
    let chat = Arc::new(ScriptedChat::new(vec![Ok("Sure.".into())]));
    let router = harness.router().with_chat(chat);
    let coordinator = SessionCoordinator::new(
        Handle::current(),
        Arc::new(router),
        harness.log.clone(),
    )
    .with_capture(capture(10, Ok("open github")), Duration::from_secs(2));

    let voice = coordinator.start_listening();
    let typed = coordinator.submit_text("tell me something").expect("accepted");

    let typed = typed.await.unwrap();
    let voice = voice.await.unwrap().expect("routed");

    assert_eq!(typed.reply.as_deref(), Some("Sure."));
    assert_eq!(voice.reply.as_deref(), Some("Opening github"));
    assert!(harness
        .effects()
        .contains(&Effect::Opened("https://www.github.com".into())));

    let lines = harness.lines();
    assert!(lines.contains(&"You: tell me something".to_string()));
    assert!(lines.contains(&"You: open github".to_string()));
}
