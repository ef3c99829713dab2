//! Single-flight guard for audible output
//!
//! At most one speech playback may be active at any instant. A request that
//! finds the gate held is dropped by its caller, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "speech in progress" flag
#[derive(Clone, Debug, Default)]
pub struct SpeechGate {
    speaking: Arc<AtomicBool>,
}

impl SpeechGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to take the gate without waiting.
    ///
    /// Returns false if another speaker already holds it.
    pub fn try_acquire(&self) -> bool {
        self.speaking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the gate. Safe to call when it is not held.
    pub fn release(&self) {
        self.speaking.store(false, Ordering::Release);
    }

    /// Whether a playback currently holds the gate
    pub fn is_held(&self) -> bool {
        self.speaking.load(Ordering::Acquire)
    }

    /// Scoped acquisition: the returned permit releases the gate when dropped,
    /// including on early return, panic unwinding or a dropped future.
    pub fn try_lock(&self) -> Option<GatePermit> {
        if self.try_acquire() {
            Some(GatePermit { gate: self.clone() })
        } else {
            None
        }
    }
}

/// Proof of holding the [`SpeechGate`]
#[derive(Debug)]
pub struct GatePermit {
    gate: SpeechGate,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.gate.release();
    }
}
