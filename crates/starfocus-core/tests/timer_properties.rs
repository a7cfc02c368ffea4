//! Property tests for the timer state machine.

use proptest::prelude::*;
use starfocus_core::timer::{format_clock, progress_offset, ring_circumference};
use starfocus_core::{Event, ModeDurations, TimerEngine, TimerMode};

#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Pause,
    Reset,
    Tick,
    Switch,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Start),
        1 => Just(Op::Pause),
        1 => Just(Op::Reset),
        // Ticks dominate real sessions.
        6 => Just(Op::Tick),
        1 => Just(Op::Switch),
    ]
}

fn durations() -> impl Strategy<Value = ModeDurations> {
    (1u32..30, 1u32..30, 1u32..30).prop_map(|(f, b, l)| ModeDurations {
        focus_secs: f,
        break_secs: b,
        long_break_secs: l,
    })
}

proptest! {
    #[test]
    fn remaining_stays_within_bounds(d in durations(), ops in prop::collection::vec(op(), 0..300)) {
        let mut engine = TimerEngine::new(d);
        for op in ops {
            let transitions: Vec<_> = match op {
                Op::Start => engine.start().into_iter().collect(),
                Op::Pause => engine.pause().into_iter().collect(),
                Op::Reset => vec![engine.reset()],
                Op::Tick => engine.tick(),
                Op::Switch => vec![engine.switch_mode()],
            };
            for t in &transitions {
                prop_assert!(t.state.remaining_secs <= t.state.total_secs);
                prop_assert!(t.state.total_secs > 0);
            }
            let s = engine.state();
            prop_assert!(s.remaining_secs <= s.total_secs);
            prop_assert_eq!(s.total_secs, d.for_mode(s.mode));
        }
    }

    #[test]
    fn each_completion_switches_exactly_once(d in durations(), ticks in 0usize..200) {
        let mut engine = TimerEngine::new(d);
        let mut completions = 0;
        let mut switches = 0;
        for _ in 0..ticks {
            if !engine.is_running() {
                engine.start();
            }
            for t in engine.tick() {
                match t.event {
                    Event::TimerCompleted { .. } => completions += 1,
                    Event::ModeSwitched { .. } => switches += 1,
                    _ => {}
                }
            }
        }
        prop_assert_eq!(completions, switches);
    }

    #[test]
    fn reset_always_restores_total(d in durations(), ticks in 0usize..60) {
        let mut engine = TimerEngine::new(d);
        engine.start();
        for _ in 0..ticks {
            engine.tick();
        }
        engine.reset();
        let s = engine.state();
        prop_assert_eq!(s.remaining_secs, s.total_secs);
        prop_assert!(!s.running);
    }

    #[test]
    fn clock_round_trips_seconds(secs in 0u32..360_000) {
        let clock = format_clock(secs);
        let (m, s) = clock.split_once(':').unwrap();
        prop_assert!(m.len() >= 2);
        prop_assert_eq!(s.len(), 2);
        prop_assert_eq!(m.parse::<u32>().unwrap() * 60 + s.parse::<u32>().unwrap(), secs);
    }

    #[test]
    fn offset_within_ring(total in 1u32..10_000, frac in 0.0f64..=1.0) {
        let remaining = (total as f64 * frac).floor() as u32;
        let offset = progress_offset(remaining, total);
        prop_assert!(offset >= 0.0);
        prop_assert!(offset <= ring_circumference() + 1e-9);
    }
}

#[test]
fn switch_mode_alternates_configured_totals() {
    let mut engine = TimerEngine::default();
    let mut seen = Vec::new();
    for _ in 0..4 {
        engine.switch_mode();
        seen.push((engine.mode(), engine.total_secs()));
    }
    assert_eq!(
        seen,
        vec![
            (TimerMode::Break, 300),
            (TimerMode::Focus, 1500),
            (TimerMode::Break, 300),
            (TimerMode::Focus, 1500),
        ]
    );
}

#[test]
fn long_break_is_never_used() {
    let mut engine = TimerEngine::default();
    for _ in 0..16 {
        engine.switch_mode();
        assert_ne!(engine.total_secs(), 900);
    }
    assert_eq!(engine.durations().long_break_secs, 900);
}
