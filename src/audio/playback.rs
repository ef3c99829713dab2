use crate::audio::AudioPlayer;
use crate::{EiraError, Result};
use crossbeam_channel::bounded;
use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, Sink};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Default)]
struct PlayerState {
    loaded: Option<Vec<u8>>,
    worker: Option<JoinHandle<()>>,
}

/// Plays synthesized artifacts on the default output device
///
/// The artifact is read into memory on `load`, so the file is not held open
/// while it plays. Playback runs on its own thread because rodio's output
/// stream cannot leave the thread that created it.
pub struct RodioPlayer {
    state: Mutex<PlayerState>,
    busy: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl RodioPlayer {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PlayerState::default()),
            busy: Arc::new(AtomicBool::new(false)),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer for RodioPlayer {
    fn load(&self, artifact: &Path) -> Result<()> {
        let bytes = std::fs::read(artifact).map_err(|e| {
            EiraError::PlaybackError(format!("Failed to load {}: {}", artifact.display(), e))
        })?;
        debug!("Loaded {} bytes from {}", bytes.len(), artifact.display());
        self.state.lock().loaded = Some(bytes);
        Ok(())
    }

    fn play(&self) -> Result<()> {
        let mut state = self.state.lock();
        let bytes = state
            .loaded
            .take()
            .ok_or_else(|| EiraError::PlaybackError("Nothing loaded".into()))?;

        self.stop.store(false, Ordering::SeqCst);
        self.busy.store(true, Ordering::SeqCst);

        let busy = Arc::clone(&self.busy);
        let stop = Arc::clone(&self.stop);
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let worker = thread::spawn(move || {
            let opened = OutputStream::try_default()
                .map_err(|e| EiraError::AudioDeviceError(format!("No output device: {}", e)))
                .and_then(|(stream, handle)| {
                    let sink = Sink::try_new(&handle).map_err(|e| {
                        EiraError::PlaybackError(format!("Failed to create sink: {}", e))
                    })?;
                    let source = Decoder::new(Cursor::new(bytes)).map_err(|e| {
                        EiraError::PlaybackError(format!("Failed to decode artifact: {}", e))
                    })?;
                    sink.append(source);
                    Ok((stream, sink))
                });

            let (_stream, sink) = match opened {
                Ok(opened) => {
                    let _ = ready_tx.send(Ok(()));
                    opened
                }
                Err(e) => {
                    busy.store(false, Ordering::SeqCst);
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            while !sink.empty() && !stop.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(20));
            }
            sink.stop();
            busy.store(false, Ordering::SeqCst);
        });

        let started = ready_rx.recv().map_err(|e| {
            EiraError::ChannelError(format!("Playback thread exited early: {}", e))
        });

        match started {
            Ok(Ok(())) => {
                state.worker = Some(worker);
                info!("Started audio playback");
                Ok(())
            }
            Ok(Err(e)) | Err(e) => {
                let _ = worker.join();
                self.busy.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn unload(&self) {
        self.stop.store(true, Ordering::SeqCst);
        let mut state = self.state.lock();
        if let Some(worker) = state.worker.take() {
            if worker.join().is_err() {
                warn!("Playback thread panicked");
            }
        }
        state.loaded = None;
        self.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::write_wav;

    #[test]
    fn test_play_without_load_fails() {
        let player = RodioPlayer::new();
        assert!(player.play().is_err());
        assert!(!player.is_busy());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let player = RodioPlayer::new();
        assert!(player.load(Path::new("/nonexistent/eira.wav")).is_err());
    }

    #[test]
    fn test_playback_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beep.wav");
        write_wav(&path, &vec![0.0; 2205], 22050).unwrap();

        let player = RodioPlayer::new();
        player.load(&path).unwrap();
        // This might fail in CI environments without audio devices
        if player.play().is_ok() {
            player.unload();
            assert!(!player.is_busy());
        }
    }
}
