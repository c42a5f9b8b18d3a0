use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use chrono::Local;
use log::info;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    notify::{CompletionNotice, Notifier},
    settings::TimerSettings,
};

use super::{
    events::{TimerEvent, TimerSnapshot},
    state::{TickOutcome, TimerMode, TimerState},
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Async wrapper around the countdown state machine. Owns the 1 Hz ticker
/// task and the delayed auto-chain task; both check in with the generation
/// counter so a stale callback never mutates superseded state.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<TimerState>>,
    settings: Arc<Mutex<TimerSettings>>,
    notifier: Arc<dyn Notifier>,
    events: broadcast::Sender<TimerEvent>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    chain: Arc<Mutex<Option<JoinHandle<()>>>>,
    /// Bumped by every state-changing operation; scheduled callbacks compare
    /// their captured value before applying effects.
    generation: Arc<AtomicU64>,
    shutdown: CancellationToken,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(notifier: Arc<dyn Notifier>, settings: TimerSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(TimerState::new())),
            settings: Arc::new(Mutex::new(settings)),
            notifier,
            events,
            ticker: Arc::new(Mutex::new(None)),
            chain: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            shutdown: CancellationToken::new(),
            tick_interval: Duration::from_secs(1),
        }
    }

    /// Render-layer subscription. Every state change, tick, and completion
    /// arrives here as a read-only snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        let state = self.state.lock().await;
        TimerSnapshot::of(&state)
    }

    pub async fn settings(&self) -> TimerSettings {
        self.settings.lock().await.clone()
    }

    /// Selects `mode` with its default preset. Ignored while running.
    pub async fn switch_mode(&self, mode: TimerMode) -> TimerSnapshot {
        let changed = {
            let mut state = self.state.lock().await;
            state.switch_mode(mode)
        };
        if changed {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.emit_state_changed().await;
        }
        self.snapshot().await
    }

    /// Selects a preset duration within the current mode. Ignored while
    /// running or when `minutes` is not one of the mode's presets.
    pub async fn select_preset(&self, minutes: u32) -> TimerSnapshot {
        let changed = {
            let mut state = self.state.lock().await;
            state.select_preset(minutes)
        };
        if changed {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.emit_state_changed().await;
        }
        self.snapshot().await
    }

    /// Starts (or resumes) the countdown and spawns the ticker. Ignored when
    /// already running or when the countdown is exhausted.
    pub async fn start(&self) -> TimerSnapshot {
        let started = {
            let mut state = self.state.lock().await;
            state.start()
        };
        if started {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.spawn_ticker().await;
            self.emit_state_changed().await;
        }
        self.snapshot().await
    }

    /// Stops ticking, keeping `remaining_seconds` for a later resume.
    pub async fn pause(&self) -> TimerSnapshot {
        let paused = {
            let mut state = self.state.lock().await;
            state.pause()
        };
        if paused {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.cancel_ticker().await;
            self.emit_state_changed().await;
        }
        self.snapshot().await
    }

    /// Back to the full duration of the selected preset, idle.
    pub async fn reset(&self) -> TimerSnapshot {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_ticker().await;
        {
            let mut state = self.state.lock().await;
            state.reset();
        }
        self.emit_state_changed().await;
        self.snapshot().await
    }

    /// Forces completion bookkeeping and the auto-chain decision without
    /// waiting for the countdown to expire.
    pub async fn skip(&self) -> TimerSnapshot {
        {
            let mut state = self.state.lock().await;
            state.pause();
        }
        self.cancel_ticker().await;
        self.complete_current().await;
        self.snapshot().await
    }

    pub async fn set_auto_start_break(&self, enabled: bool) {
        self.settings.lock().await.auto_start_break = enabled;
    }

    pub async fn set_auto_start_study(&self, enabled: bool) {
        self.settings.lock().await.auto_start_study = enabled;
    }

    pub async fn set_sound_notifications(&self, enabled: bool) {
        self.settings.lock().await.sound_notifications = enabled;
    }

    pub async fn set_desktop_notifications(&self, enabled: bool) {
        self.settings.lock().await.desktop_notifications = enabled;
    }

    /// Tears the widget down: no further ticks or scheduled auto-chains may
    /// apply after this returns.
    pub async fn shutdown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.shutdown.cancel();
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
        if let Some(handle) = self.chain.lock().await.take() {
            handle.abort();
        }
    }

    /// Completion path shared by natural expiry and `skip()`.
    ///
    /// Boxed rather than an `async fn`: the ticker task awaits this, which
    /// awaits `schedule_chain`, whose chain task awaits `start`, which spawns
    /// the ticker — boxing breaks that cycle of opaque future types.
    fn complete_current(
        &self,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            self.generation.fetch_add(1, Ordering::SeqCst);

            let completion = {
                let mut state = self.state.lock().await;
                state.complete(Local::now())
            };

            info!(
                "{} completed ({}m)",
                completion.record.label, completion.duration_minutes
            );

            let settings = self.settings.lock().await.clone();
            self.notifier.session_completed(&CompletionNotice {
                mode_label: completion.label.to_string(),
                duration_minutes: completion.duration_minutes,
                sound_enabled: settings.sound_notifications,
                desktop_enabled: settings.desktop_notifications,
            });

            self.emit_state_changed().await;
            let _ = self
                .events
                .send(TimerEvent::SessionCompleted(completion.record.clone()));

            let was_study = completion.mode == TimerMode::Study;
            if was_study && settings.auto_start_break {
                self.schedule_chain(TimerMode::ShortBreak, settings.auto_start_study)
                    .await;
            } else if !was_study && settings.auto_start_study {
                self.schedule_chain(TimerMode::Study, true).await;
            } else {
                let mut state = self.state.lock().await;
                state.reset();
                drop(state);
                self.emit_state_changed().await;
            }
        })
    }

    /// Schedules the delayed transition to `next` (optionally auto-starting
    /// it). The task re-checks the generation after every delay so that any
    /// user operation in the window supersedes it.
    async fn schedule_chain(&self, next: TimerMode, then_start: bool) {
        let mut chain_guard = self.chain.lock().await;
        if let Some(handle) = chain_guard.take() {
            handle.abort();
        }

        let delays = self.settings.lock().await.chain_delays.clone();
        let scheduled_gen = self.generation.load(Ordering::SeqCst);
        let ctrl = self.clone();
        let token = self.shutdown.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = time::sleep(delays.mode_switch()) => {}
            }
            if ctrl.generation.load(Ordering::SeqCst) != scheduled_gen {
                return;
            }
            ctrl.switch_mode(next).await;
            if !then_start {
                return;
            }
            let after_switch = ctrl.generation.load(Ordering::SeqCst);
            tokio::select! {
                _ = token.cancelled() => return,
                _ = time::sleep(delays.auto_start()) => {}
            }
            if ctrl.generation.load(Ordering::SeqCst) != after_switch {
                return;
            }
            ctrl.start().await;
        });

        *chain_guard = Some(handle);
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let ctrl = self.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // a fresh tokio interval fires immediately; swallow that tick
            interval.tick().await;
            loop {
                interval.tick().await;

                let outcome = {
                    let mut state = ctrl.state.lock().await;
                    state.tick()
                };

                match outcome {
                    TickOutcome::Ticked => {
                        let snapshot = ctrl.snapshot().await;
                        let _ = ctrl.events.send(TimerEvent::Tick(snapshot));
                    }
                    TickOutcome::Finished => {
                        ctrl.complete_current().await;
                        break;
                    }
                    TickOutcome::Idle => break,
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn emit_state_changed(&self) {
        let state = self.state.lock().await;
        let _ = self
            .events
            .send(TimerEvent::StateChanged(TimerSnapshot::of(&state)));
    }
}
