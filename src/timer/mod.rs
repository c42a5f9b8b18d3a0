pub mod controller;
pub mod events;
pub mod state;

pub use controller::TimerController;
pub use events::{TimerEvent, TimerSnapshot};
pub use state::{format_clock, format_total, TickOutcome, TimerMode, TimerState};
