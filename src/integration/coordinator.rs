//! Session coordinator: turns input events into independent units of work
//!
//! Every accepted event (a typed line, a finished voice capture, the startup
//! greeting) becomes one tokio task that runs to completion on its own.
//! Tasks are fire-and-forget: nothing joins them, nothing limits how many run
//! at once, and nothing cancels them. The only cross-task coordination is the
//! speech gate inside the pipeline and the append-only log channel. The
//! returned [`JoinHandle`]s exist for tests and may simply be dropped.

use crate::intent::{Command, IntentResult, IntentRouter};
use crate::messages::LogSender;
use crate::speech::{CaptureOutcome, CaptureSession, SpeakReport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const GREETING_NOTICE: &str = "EIRA AI initialized. Press F2 to speak.";
pub const GREETING_SPEECH: &str = "I am online and ready.";
pub const LISTENING_NOTICE: &str = "Listening...";

/// Accepts commands from any number of input sources
#[derive(Clone)]
pub struct SessionCoordinator {
    runtime: Handle,
    router: Arc<IntentRouter>,
    log: LogSender,
    capture: Option<Arc<CaptureSession>>,
    listen_timeout: Duration,
    /// Captures currently holding the microphone
    active_captures: Arc<AtomicUsize>,
}

impl SessionCoordinator {
    pub fn new(runtime: Handle, router: Arc<IntentRouter>, log: LogSender) -> Self {
        Self {
            runtime,
            router,
            log,
            capture: None,
            listen_timeout: Duration::from_secs(5),
            active_captures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Enable voice input
    pub fn with_capture(mut self, capture: Arc<CaptureSession>, listen_timeout: Duration) -> Self {
        self.capture = Some(capture);
        self.listen_timeout = listen_timeout;
        self
    }

    pub fn has_voice_input(&self) -> bool {
        self.capture.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.active_captures.load(Ordering::Acquire) > 0
    }

    pub fn is_speaking(&self) -> bool {
        self.router.speech().is_speaking()
    }

    /// Log the startup notice and speak the greeting
    pub fn greet(&self) -> JoinHandle<SpeakReport> {
        self.log.system(GREETING_NOTICE);
        let router = self.router.clone();
        self.runtime
            .spawn(async move { router.speech().speak(GREETING_SPEECH).await })
    }

    /// Accept a typed line; blank input is ignored
    pub fn submit_text(&self, text: &str) -> Option<JoinHandle<IntentResult>> {
        if text.trim().is_empty() {
            return None;
        }
        self.log.user(text);
        Some(self.dispatch(Command::typed(text)))
    }

    /// Route a command on its own task
    pub fn dispatch(&self, command: Command) -> JoinHandle<IntentResult> {
        let router = self.router.clone();
        debug!("Dispatching {:?} command", command.source());
        self.runtime
            .spawn(async move { router.route(&command).await })
    }

    /// Capture one utterance and, if anything was said, route it
    pub fn start_listening(&self) -> JoinHandle<Option<IntentResult>> {
        let coordinator = self.clone();
        self.runtime.spawn(async move { coordinator.listen_once().await })
    }

    async fn listen_once(&self) -> Option<IntentResult> {
        let Some(capture) = self.capture.clone() else {
            warn!("Voice input requested but no microphone is configured");
            return None;
        };

        self.log.system(LISTENING_NOTICE);

        let active = self.active_captures.clone();
        let timeout = self.listen_timeout;
        active.fetch_add(1, Ordering::AcqRel);
        let outcome = tokio::task::spawn_blocking(move || capture.capture_utterance(timeout)).await;
        active.fetch_sub(1, Ordering::AcqRel);

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Capture task failed: {}", e);
                return None;
            }
        };

        let text = match outcome {
            CaptureOutcome::Text(text) => text,
            other => {
                info!("No voice command captured: {:?}", other);
                return None;
            }
        };

        self.log.user(&text);
        Some(self.router.route(&Command::voice(text)).await)
    }
}
