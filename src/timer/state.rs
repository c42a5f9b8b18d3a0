use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::SessionRecord;

/// Daily study goal shown next to the timer (4 hours).
pub const DAILY_GOAL_SECS: u64 = 4 * 3600;

/// The recent-sessions log keeps only the newest entries.
pub const RECENT_SESSIONS_CAP: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Study,
    ShortBreak,
    LongBreak,
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Study
    }
}

/// Fixed per-mode configuration: allowed whole-minute durations, which one is
/// selected when the mode is entered, and the labels used for display and for
/// the recent-sessions log.
#[derive(Debug, Clone, Copy)]
pub struct ModeConfig {
    pub presets: &'static [u32],
    pub default_index: usize,
    pub label: &'static str,
    pub session_label: &'static str,
}

const STUDY_CONFIG: ModeConfig = ModeConfig {
    presets: &[15, 25, 45, 60],
    default_index: 1,
    label: "Focus Time",
    session_label: "Study Session",
};

const SHORT_BREAK_CONFIG: ModeConfig = ModeConfig {
    presets: &[5, 10, 15],
    default_index: 0,
    label: "Short Break",
    session_label: "Short Break",
};

const LONG_BREAK_CONFIG: ModeConfig = ModeConfig {
    presets: &[15, 20, 30],
    default_index: 0,
    label: "Long Break",
    session_label: "Long Break",
};

impl TimerMode {
    pub fn config(self) -> &'static ModeConfig {
        match self {
            TimerMode::Study => &STUDY_CONFIG,
            TimerMode::ShortBreak => &SHORT_BREAK_CONFIG,
            TimerMode::LongBreak => &LONG_BREAK_CONFIG,
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, TimerMode::Study)
    }
}

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Decremented normally; the session continues.
    Ticked,
    /// The countdown just hit zero; the caller must run completion.
    Finished,
    /// The timer was not running; nothing changed.
    Idle,
}

/// Summary handed back by [`TimerState::complete`], used to drive the
/// completion notification and the auto-chain decision.
#[derive(Debug, Clone)]
pub struct SessionCompletion {
    pub mode: TimerMode,
    pub label: &'static str,
    pub duration_minutes: u32,
    pub total_seconds: u32,
    pub record: SessionRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: TimerMode,
    pub preset_index: usize,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub completed_sessions: u32,
    pub total_study_seconds_today: u64,
    pub current_streak: u32,
    pub recent_sessions: Vec<SessionRecord>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerState {
    /// Fresh timer: Study mode with its default preset selected (25 minutes).
    pub fn new() -> Self {
        let mode = TimerMode::Study;
        let config = mode.config();
        let total = config.presets[config.default_index] * 60;
        Self {
            mode,
            preset_index: config.default_index,
            total_seconds: total,
            remaining_seconds: total,
            is_running: false,
            completed_sessions: 0,
            total_study_seconds_today: 0,
            current_streak: 0,
            recent_sessions: Vec::new(),
        }
    }

    pub fn preset_minutes(&self) -> u32 {
        self.mode.config().presets[self.preset_index]
    }

    /// Switches to `mode` and its default preset. Ignored while running.
    pub fn switch_mode(&mut self, mode: TimerMode) -> bool {
        if self.is_running {
            return false;
        }
        let config = mode.config();
        self.mode = mode;
        self.preset_index = config.default_index;
        self.total_seconds = config.presets[config.default_index] * 60;
        self.remaining_seconds = self.total_seconds;
        true
    }

    /// Selects a preset by minute value. Ignored while running or when the
    /// value is not one of the current mode's presets.
    pub fn select_preset(&mut self, minutes: u32) -> bool {
        if self.is_running {
            return false;
        }
        let Some(index) = self
            .mode
            .config()
            .presets
            .iter()
            .position(|&m| m == minutes)
        else {
            return false;
        };
        self.preset_index = index;
        self.total_seconds = minutes * 60;
        self.remaining_seconds = self.total_seconds;
        true
    }

    /// Begins (or resumes) the countdown. Ignored when already running or
    /// when there is nothing left to count down.
    pub fn start(&mut self) -> bool {
        if self.is_running || self.remaining_seconds == 0 {
            return false;
        }
        self.is_running = true;
        true
    }

    /// Stops ticking; `remaining_seconds` is kept so the session can resume.
    pub fn pause(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.is_running = false;
        true
    }

    /// Back to the full duration of the selected preset, idle.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.remaining_seconds = self.total_seconds;
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }
        if self.remaining_seconds > 1 {
            self.remaining_seconds -= 1;
            TickOutcome::Ticked
        } else {
            self.remaining_seconds = 0;
            TickOutcome::Finished
        }
    }

    /// Completion bookkeeping: study counters, recent-sessions log entry.
    /// Runs when a session reaches zero or is skipped.
    pub fn complete(&mut self, at: DateTime<Local>) -> SessionCompletion {
        self.is_running = false;

        let config = self.mode.config();
        let duration_minutes = self.total_seconds / 60;

        if self.mode == TimerMode::Study {
            self.completed_sessions += 1;
            self.current_streak += 1;
            self.total_study_seconds_today += u64::from(self.total_seconds);
        }

        let record = SessionRecord::new(
            config.session_label,
            at,
            duration_minutes,
            self.mode.is_break(),
        );
        self.recent_sessions.insert(0, record.clone());
        self.recent_sessions.truncate(RECENT_SESSIONS_CAP);

        SessionCompletion {
            mode: self.mode,
            label: config.label,
            duration_minutes,
            total_seconds: self.total_seconds,
            record,
        }
    }

    /// Fraction of the session still remaining, for the progress ring.
    pub fn ring_fill(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        f64::from(self.remaining_seconds) / f64::from(self.total_seconds)
    }

    /// Share of the 4-hour daily goal reached so far, clamped to 100.
    pub fn daily_progress_percent(&self) -> u32 {
        let percent =
            (self.total_study_seconds_today as f64 / DAILY_GOAL_SECS as f64 * 100.0).round();
        (percent as u32).min(100)
    }
}

/// `MM:SS` countdown display.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// `"Xh Ym"` total-study display.
pub fn format_total(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}
