//! Conversation log plumbing
//!
//! Background tasks never touch the UI. They enqueue [`LogEntry`] values
//! through a [`LogSender`]; the UI thread owns the [`Transcript`] and drains
//! the queue once per frame, so append order is preserved.

use super::types::LogEntry;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Callback used to wake the UI after an enqueue
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Cloneable handle for appending to the log from any thread
#[derive(Clone)]
pub struct LogSender {
    tx: Sender<LogEntry>,
    waker: Option<Waker>,
}

impl fmt::Debug for LogSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSender")
            .field("has_waker", &self.waker.is_some())
            .finish()
    }
}

impl LogSender {
    /// Attach a waker, typically the UI's repaint request
    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn send(&self, entry: LogEntry) {
        debug!("{}", entry);
        if self.tx.send(entry).is_err() {
            warn!("Transcript is gone, dropping log entry");
            return;
        }
        if let Some(waker) = &self.waker {
            waker();
        }
    }

    pub fn system(&self, text: impl Into<String>) {
        self.send(LogEntry::system(text));
    }

    pub fn user(&self, text: impl Into<String>) {
        self.send(LogEntry::user(text));
    }

    pub fn assistant(&self, text: impl Into<String>) {
        self.send(LogEntry::assistant(text));
    }
}

/// The UI-owned view of the conversation
pub struct Transcript {
    rx: Receiver<LogEntry>,
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

/// Default number of lines kept on screen
pub const DEFAULT_TRANSCRIPT_CAPACITY: usize = 500;

impl Transcript {
    /// Create a transcript together with the sender that feeds it
    pub fn channel(capacity: usize) -> (LogSender, Transcript) {
        let (tx, rx) = unbounded();
        let sender = LogSender { tx, waker: None };
        let transcript = Transcript {
            rx,
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        };
        (sender, transcript)
    }

    /// Move queued entries into the visible log; returns how many arrived
    pub fn drain(&mut self) -> usize {
        let mut added = 0;
        while let Ok(entry) = self.rx.try_recv() {
            if self.entries.len() == self.capacity {
                self.entries.pop_front();
            }
            self.entries.push_back(entry);
            added += 1;
        }
        added
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Rendered lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
