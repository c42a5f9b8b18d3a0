//! Completion cues. The timer signals one `CompletionNotice` per finished
//! session; what becomes of it (sound, desktop alert, nothing) is the
//! notifier's business.

pub mod chime;

use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

use rodio::{OutputStream, Sink};
use serde::Serialize;

use chime::Chime;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Payload for a completed session: mode label, duration, and the
/// notification flags current at completion time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionNotice {
    pub mode_label: String,
    pub duration_minutes: u32,
    pub sound_enabled: bool,
    pub desktop_enabled: bool,
}

pub trait Notifier: Send + Sync {
    fn session_completed(&self, notice: &CompletionNotice);
}

/// Swallows every notice; for hosts that render their own cues and for tests.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn session_completed(&self, _notice: &CompletionNotice) {}
}

enum AudioCommand {
    PlayChime,
    Stop,
}

/// Plays the completion chime on a dedicated audio thread. Desktop delivery
/// (including permission prompting) is left to the host's own `Notifier`;
/// this one logs the text a desktop alert would carry.
pub struct ChimeNotifier {
    tx: Arc<Mutex<Option<Sender<AudioCommand>>>>,
}

impl ChimeNotifier {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>, String> {
        if let Some(tx) = self.tx.lock().map_err(|e| e.to_string())?.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();

        // Spawn dedicated audio thread holding non-Send audio objects
        thread::Builder::new()
            .name("timer-chime".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::PlayChime => {
                            if let Err(err) = ensure_sink(&mut _stream, &mut sink) {
                                log_warn!("chime output unavailable: {err}");
                                continue;
                            }
                            if let Some(ref s) = sink {
                                s.append(Chime::new());
                                s.play();
                            }
                        }
                        AudioCommand::Stop => {
                            if let Some(s_old) = sink.take() {
                                s_old.stop();
                            }
                            _stream = None;
                        }
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        let tx_clone = tx.clone();
        *self.tx.lock().map_err(|e| e.to_string())? = Some(tx);
        Ok(tx_clone)
    }

    pub fn play_chime(&self) -> Result<(), String> {
        let tx = self.ensure_thread()?;
        tx.send(AudioCommand::PlayChime).map_err(|e| e.to_string())
    }

    pub fn stop(&self) -> Result<(), String> {
        if let Ok(Some(tx)) = self.tx.lock().map(|g| g.clone()) {
            let _ = tx.send(AudioCommand::Stop);
        }
        Ok(())
    }
}

impl Default for ChimeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ChimeNotifier {
    fn session_completed(&self, notice: &CompletionNotice) {
        if notice.sound_enabled {
            if let Err(err) = self.play_chime() {
                log_warn!("failed to play completion chime: {err}");
            }
        }

        if notice.desktop_enabled {
            log_info!(
                "SpireWorks Study Timer: {} completed! ({}m)",
                notice.mode_label,
                notice.duration_minutes
            );
        }
    }
}
