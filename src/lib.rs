//! Session-mode study timer: countdown state, mode presets, and auto-chaining
//! between study and break sessions. The host UI drives the
//! [`TimerController`] and re-renders from the snapshots it broadcasts.

pub mod models;
pub mod notify;
pub mod settings;
pub mod timer;
mod utils;

pub use models::SessionRecord;
pub use notify::{ChimeNotifier, CompletionNotice, Notifier, NullNotifier};
pub use settings::{ChainDelays, SettingsStore, TimerSettings};
pub use timer::{TimerController, TimerEvent, TimerMode, TimerSnapshot, TimerState};

/// Initializes logging (reads RUST_LOG env var). Safe to call repeatedly;
/// later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
