use serde::Serialize;

use crate::models::SessionRecord;

use super::state::TimerState;

/// Read-only view handed to the render layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub remaining_seconds: u32,
    pub total_seconds: u32,
    /// `remaining / total`, drives the circular progress indicator.
    pub ring_fill: f64,
}

impl TimerSnapshot {
    pub(crate) fn of(state: &TimerState) -> Self {
        Self {
            remaining_seconds: state.remaining_seconds,
            total_seconds: state.total_seconds,
            ring_fill: state.ring_fill(),
            state: state.clone(),
        }
    }
}

/// Broadcast to the host UI; every variant carries enough to re-render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "payload")]
pub enum TimerEvent {
    /// One second elapsed on a running countdown.
    Tick(TimerSnapshot),
    /// Mode, preset, or run status changed through an operation.
    StateChanged(TimerSnapshot),
    /// A session reached zero or was skipped.
    SessionCompleted(SessionRecord),
}
