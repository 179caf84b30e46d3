//! Tunnel Dash entry point
//!
//! Headless native driver: runs the frame scheduler against no-op
//! surface/sink collaborators with a scripted pilot, then prints a JSON
//! run report. A board port would swap in its display, joystick decode,
//! and streaming hardware behind the same traits.

use std::time::Duration;

use tunnel_dash::audio::SampleBank;
use tunnel_dash::platform::{NullSink, NullSurface, StdClock};
use tunnel_dash::scheduler::FrameLoop;
use tunnel_dash::sim::{Compass, GameEvent, GameMode, GamePhase, SessionState, TickInput};
use tunnel_dash::{RunOptions, RunReport};

fn main() {
    env_logger::init();
    log::info!("Tunnel Dash (headless) starting...");

    let options = RunOptions::from_env();
    let mut frame_loop = FrameLoop::new(
        options.seed,
        NullSurface,
        NullSink,
        SampleBank::default(),
        StdClock::new(),
    );

    let mut rounds = 0u32;
    for _ in 0..options.frames {
        let input = pilot_input(&frame_loop.state, &options);
        let delay_us = frame_loop.frame(&input);

        if frame_loop
            .state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::GameEnded { .. }))
        {
            rounds += 1;
        }

        if options.realtime {
            std::thread::sleep(Duration::from_micros(delay_us));
        }
    }

    let report = RunReport {
        frames: options.frames,
        rounds,
        score: frame_loop.state.score,
        high_score: frame_loop.state.high_score,
        rate_tier: frame_loop.state.rate_tier,
    };
    log::info!(
        "finished: {} rounds, high score {}",
        report.rounds,
        report.high_score
    );
    println!("{}", report.to_json());
}

/// Scripted pilot: picks the requested mode, pulses the confirm button
/// through menu and restart screens, and lets the sim's autopilot fly.
fn pilot_input(state: &SessionState, options: &RunOptions) -> TickInput {
    // Alternate the confirm level so the press/release protocol completes
    // every other frame.
    let pulse = state.frame % 2 == 0;

    match state.phase {
        GamePhase::Menu => {
            let mut input = TickInput {
                confirm: pulse,
                ..Default::default()
            };
            if options.mode == GameMode::Dual {
                input.dir[0] = Some(Compass::South);
            }
            input
        }
        GamePhase::Playing => TickInput {
            autopilot: true,
            ..Default::default()
        },
        GamePhase::GameOver => TickInput {
            confirm: pulse,
            ..Default::default()
        },
    }
}
