//! Per-frame simulation tick
//!
//! One call advances the whole session by one frame and records the
//! events the frame produced. The function is pure with respect to the
//! platform: no I/O, no clock, no allocation beyond the event list.

use super::barrier;
use super::player::{self, Compass};
use super::state::{
    GameEvent, GameMode, GamePhase, OverStage, PlayerId, SessionState,
};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Decoded direction per player; `None` while the stick is centered
    pub dir: [Option<Compass>; 2],
    /// Confirm button level, true while held
    pub confirm: bool,
    /// Demo mode: live players steer toward the next gap centre
    pub autopilot: bool,
}

/// Advance the session state by one frame.
pub fn tick(state: &mut SessionState, input: &TickInput) {
    state.events.clear();
    state.frame += 1;
    let confirm_fired = state.confirm.fired(input.confirm);

    let mut input = *input;
    if input.autopilot && state.phase == GamePhase::Playing {
        for &id in state.live_player_ids() {
            input.dir[id as usize] = autopilot_dir(state, id);
        }
    }

    match state.phase {
        GamePhase::Menu => menu_tick(state, &input, confirm_fired),
        GamePhase::Playing => playing_tick(state, &input),
        GamePhase::GameOver => over_tick(state, confirm_fired),
    }
}

fn menu_tick(state: &mut SessionState, input: &TickInput, confirm_fired: bool) {
    // Either stick's vertical component moves the selection.
    for dir in input.dir.iter().flatten() {
        if dir.vertical() < 0 {
            state.mode = GameMode::Single;
        } else if dir.vertical() > 0 {
            state.mode = GameMode::Dual;
        }
    }

    if confirm_fired {
        if state.needs_reset {
            state.reset_round();
        }
        state.phase = GamePhase::Playing;
        state.events.push(GameEvent::SessionStarted);
    }
}

fn playing_tick(state: &mut SessionState, input: &TickInput) {
    barrier::advance_all(state);

    for &id in state.live_player_ids() {
        let dir = input.dir[id as usize];
        player::apply_movement(state.player_mut(id), dir);
    }

    let mut ended = false;
    for i in 0..BARRIER_SLOTS {
        if !state.barriers[i].is_live() {
            continue;
        }

        // Scoring latch: either live player clearing the trailing edge
        // counts, exactly once per barrier instance.
        if !state.barriers[i].passed
            && state
                .live_player_ids()
                .iter()
                .any(|&id| player::has_passed(state.player(id), &state.barriers[i]))
        {
            state.barriers[i].passed = true;
            state.score += 1;
            state.events.push(GameEvent::BarrierPassed { score: state.score });
        }

        for &id in state.live_player_ids() {
            if player::collides(state.player(id), &state.barriers[i]) {
                ended = true;
                if state.mode == GameMode::Dual {
                    state.winner = Some(other(id));
                }
                state.high_score = state.high_score.max(state.score);
            }
        }
    }

    if ended {
        state.phase = GamePhase::GameOver;
        state.over_stage = OverStage::Cue;
        state.needs_reset = true;
        state.events.push(GameEvent::GameEnded {
            winner: state.winner,
        });
    }
}

fn over_tick(state: &mut SessionState, confirm_fired: bool) {
    match state.over_stage {
        OverStage::Cue => {
            // The scheduler held the previous frame for the cue length, so
            // reaching the next tick means the sting has played out.
            state.over_stage = OverStage::Prompt;
            state.events.push(GameEvent::CueFinished);
        }
        OverStage::Prompt => {
            if confirm_fired {
                state.phase = GamePhase::Menu;
                state.mode = GameMode::Single;
                state.events.push(GameEvent::ReturnedToMenu);
            }
        }
    }
}

fn other(id: PlayerId) -> PlayerId {
    match id {
        PlayerId::One => PlayerId::Two,
        PlayerId::Two => PlayerId::One,
    }
}

/// Steer toward the vertical centre of the nearest upcoming gap. Purely
/// vertical; horizontal station is held.
fn autopilot_dir(state: &SessionState, id: PlayerId) -> Option<Compass> {
    let p = state.player(id);
    let target_y = state
        .barriers
        .iter()
        .filter(|b| b.is_live() && b.trailing_edge() >= p.pos.x)
        .min_by_key(|b| b.x)
        .map(|b| (b.gap_top + (PLAYFIELD_H - b.gap_bottom)) / 2 - PLAYER_SIZE / 2)?;

    let dy = target_y - p.pos.y;
    if dy.abs() < MOVE_STEP {
        None
    } else if dy > 0 {
        Some(Compass::South)
    } else {
        Some(Compass::North)
    }
}
