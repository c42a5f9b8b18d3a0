use chrono::Local;
use proptest::prelude::*;

use spireworks_timer::timer::state::{TickOutcome, TimerState};
use spireworks_timer::TimerMode;

#[derive(Debug, Clone)]
enum Op {
    Switch(TimerMode),
    Select(u32),
    Start,
    Pause,
    Reset,
    Tick,
    Complete,
}

fn mode_strategy() -> impl Strategy<Value = TimerMode> {
    prop_oneof![
        Just(TimerMode::Study),
        Just(TimerMode::ShortBreak),
        Just(TimerMode::LongBreak),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        mode_strategy().prop_map(Op::Switch),
        (1u32..=90).prop_map(Op::Select),
        Just(Op::Start),
        Just(Op::Pause),
        Just(Op::Reset),
        Just(Op::Tick),
        Just(Op::Complete),
    ]
}

fn apply(state: &mut TimerState, op: &Op) {
    match op {
        Op::Switch(mode) => {
            state.switch_mode(*mode);
        }
        Op::Select(minutes) => {
            state.select_preset(*minutes);
        }
        Op::Start => {
            state.start();
        }
        Op::Pause => {
            state.pause();
        }
        Op::Reset => state.reset(),
        Op::Tick => {
            // Completion must follow a finishing tick, as the controller does.
            if state.tick() == TickOutcome::Finished {
                state.complete(Local::now());
            }
        }
        Op::Complete => {
            state.complete(Local::now());
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_under_any_operation_sequence(
        ops in proptest::collection::vec(op_strategy(), 1..300),
    ) {
        let mut state = TimerState::new();
        for op in &ops {
            apply(&mut state, op);

            prop_assert!(state.remaining_seconds <= state.total_seconds);
            prop_assert!(state.preset_index < state.mode.config().presets.len());
            prop_assert_eq!(state.total_seconds, state.preset_minutes() * 60);
            prop_assert!(state.recent_sessions.len() <= 5);
            prop_assert!(!state.is_running || state.remaining_seconds > 0);
        }
    }

    #[test]
    fn a_stopped_timer_never_ticks(
        ops in proptest::collection::vec(op_strategy(), 0..100),
        extra_ticks in 1usize..60,
    ) {
        let mut state = TimerState::new();
        for op in &ops {
            apply(&mut state, op);
        }

        state.pause();
        let frozen = state.remaining_seconds;
        for _ in 0..extra_ticks {
            prop_assert_eq!(state.tick(), TickOutcome::Idle);
        }
        prop_assert_eq!(state.remaining_seconds, frozen);
    }

    #[test]
    fn ticking_n_times_decrements_by_exactly_n(
        minutes in prop_oneof![Just(15u32), Just(25), Just(45), Just(60)],
        ticks in 1u32..500,
    ) {
        let mut state = TimerState::new();
        state.select_preset(minutes);
        state.start();

        let mut finishes = 0;
        for _ in 0..ticks {
            if state.tick() == TickOutcome::Finished {
                finishes += 1;
                break;
            }
        }

        if ticks < minutes * 60 {
            prop_assert_eq!(state.remaining_seconds, minutes * 60 - ticks);
            prop_assert_eq!(finishes, 0);
        }
    }
}
