//! Barrier slot lifecycle
//!
//! Three slots cycle round-robin through a small state machine:
//! `Inactive -> Spawned -> Sliding -> Shrinking -> Exhausted -> Inactive`.
//! Activation of the next slot is a positional test on the current
//! barrier's trailing edge plus its gap, so handoff spacing is immune to
//! frame jitter.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameEvent, SessionState};
use crate::audio::RateTier;
use crate::consts::*;

/// Lifecycle state of one barrier slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Slot is dormant, waiting for its round-robin turn
    Inactive,
    /// Activated; geometry is rolled on the next advance
    Spawned,
    /// Translating right-to-left across the field
    Sliding,
    /// Pinned at the left edge, length being consumed
    Shrinking,
    /// Fully consumed; difficulty scaling applies, then the slot resets
    Exhausted,
}

/// One procedurally generated gap obstacle
#[derive(Debug, Clone, Copy)]
pub struct Barrier {
    pub slot: usize,
    pub state: SlotState,
    /// Leading (left) edge; decreases over time
    pub x: i32,
    /// Horizontal extent; shrinks once `x` reaches the left edge
    pub length: i32,
    /// Solid segment height from the top of the field
    pub gap_top: i32,
    /// Solid segment height from the bottom of the field
    pub gap_bottom: i32,
    /// Clear space trailing this barrier before the next one may appear
    pub gap_length: i32,
    /// Scoring latch; set once when a player clears the trailing edge
    pub passed: bool,
}

impl Barrier {
    fn dormant(slot: usize) -> Self {
        Self {
            slot,
            state: SlotState::Inactive,
            x: PLAYFIELD_W,
            length: 0,
            gap_top: 0,
            gap_bottom: 0,
            gap_length: 0,
            passed: false,
        }
    }

    /// Session-start layout: slot 0 armed, the rest dormant.
    pub fn initial_slots() -> [Barrier; BARRIER_SLOTS] {
        let mut slots = [Self::dormant(0), Self::dormant(1), Self::dormant(2)];
        slots[0].state = SlotState::Spawned;
        slots
    }

    /// Right edge of the solid part.
    pub fn trailing_edge(&self) -> i32 {
        self.x + self.length
    }

    /// Whether players can still pass through or collide with this slot.
    pub fn is_live(&self) -> bool {
        matches!(
            self.state,
            SlotState::Sliding | SlotState::Shrinking | SlotState::Exhausted
        )
    }

    /// Roll fresh geometry at the right edge of the field.
    ///
    /// Invariant: `gap_top + gap_bottom + tunnel_height == PLAYFIELD_H`,
    /// so the passable opening is exactly `tunnel_height` tall.
    fn respawn(&mut self, rng: &mut Pcg32, tunnel_height: i32) {
        let opening = PLAYFIELD_H - tunnel_height;
        self.x = PLAYFIELD_W;
        self.length = BARRIER_LEN_MIN + rng.random_range(0..BARRIER_LEN_SPAN);
        self.gap_top = rng.random_range(0..opening);
        self.gap_bottom = opening - self.gap_top;
        self.gap_length = GAP_LEN_MIN + rng.random_range(0..GAP_LEN_SPAN);
        self.passed = false;
        self.state = SlotState::Sliding;
    }

    fn reset(&mut self) {
        self.x = PLAYFIELD_W;
        self.passed = false;
        self.state = SlotState::Inactive;
    }
}

/// Advance every slot by one frame: spawn geometry, translate, shrink,
/// exhaust (with difficulty scaling), and activate the successor slot.
pub fn advance_all(state: &mut SessionState) {
    let speed = state.speed;

    for i in 0..BARRIER_SLOTS {
        if state.barriers[i].state == SlotState::Spawned {
            let tunnel_height = state.tunnel_height;
            state.barriers[i].respawn(&mut state.rng, tunnel_height);
        }

        match state.barriers[i].state {
            SlotState::Inactive | SlotState::Spawned => continue,
            SlotState::Sliding => {
                state.barriers[i].x -= speed;
                if state.barriers[i].x <= 0 {
                    state.barriers[i].state = SlotState::Shrinking;
                }
            }
            SlotState::Shrinking => {
                state.barriers[i].length -= speed;
                if state.barriers[i].length <= 0 {
                    state.barriers[i].state = SlotState::Exhausted;
                }
            }
            SlotState::Exhausted => {
                state.barriers[i].reset();
                apply_difficulty_scaling(state);
                continue;
            }
        }

        // Positional handoff: once this barrier's trailing edge plus its
        // gap crosses the right-edge activation window, arm the next slot.
        // The window is exactly one frame wide at the current speed.
        let tail =
            state.barriers[i].x + state.barriers[i].length + state.barriers[i].gap_length;
        if tail <= PLAYFIELD_W && tail >= PLAYFIELD_W + 1 - speed {
            let next = (i + 1) % BARRIER_SLOTS;
            if state.barriers[next].state == SlotState::Inactive {
                state.barriers[next].state = SlotState::Spawned;
            }
        }
    }
}

/// Difficulty scaling applied each time a barrier is exhausted. The 15/30
/// rate steps use exact-equality guards so they cannot re-trigger.
fn apply_difficulty_scaling(state: &mut SessionState) {
    if state.score % SPEED_UP_EVERY == 0 {
        state.speed += 1;
    }
    if state.score == RATE_STEP_1_AT {
        state.rate_tier = RateTier::Step1;
        state.events.push(GameEvent::RateStepped(RateTier::Step1));
    }
    if state.score == RATE_STEP_2_AT {
        state.rate_tier = RateTier::Step2;
        state.events.push(GameEvent::RateStepped(RateTier::Step2));
    }
    if state.tunnel_height > TUNNEL_FLOOR {
        state.tunnel_height -= TUNNEL_SHRINK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn playing_state(seed: u64) -> SessionState {
        let mut state = SessionState::new(seed);
        state.phase = crate::sim::GamePhase::Playing;
        state
    }

    #[test]
    fn test_spawn_geometry_bounds() {
        let mut rng = Pcg32::seed_from_u64(99);
        for tunnel_height in [TUNNEL_START, 120, TUNNEL_FLOOR] {
            for _ in 0..200 {
                let mut b = Barrier::dormant(0);
                b.respawn(&mut rng, tunnel_height);
                assert!((BARRIER_LEN_MIN..BARRIER_LEN_MIN + BARRIER_LEN_SPAN).contains(&b.length));
                assert!((GAP_LEN_MIN..GAP_LEN_MIN + GAP_LEN_SPAN).contains(&b.gap_length));
                assert!(b.gap_top >= 0 && b.gap_bottom > 0);
                assert_eq!(b.gap_top + b.gap_bottom + tunnel_height, PLAYFIELD_H);
            }
        }
    }

    #[test]
    fn test_slide_then_shrink_then_exhaust() {
        let mut state = playing_state(1);
        advance_all(&mut state); // spawn roll + first slide step
        assert_eq!(state.barriers[0].state, SlotState::Sliding);
        assert_eq!(state.barriers[0].x, PLAYFIELD_W - BASE_SPEED);

        // Slide to the left edge.
        while state.barriers[0].state == SlotState::Sliding {
            advance_all(&mut state);
        }
        assert_eq!(state.barriers[0].state, SlotState::Shrinking);
        assert!(state.barriers[0].x <= 0);

        // Shrink away. Score one pass so difficulty math sees a cleared
        // barrier, as it always would in play.
        state.score = 1;
        while state.barriers[0].state == SlotState::Shrinking {
            advance_all(&mut state);
        }
        assert_eq!(state.barriers[0].state, SlotState::Exhausted);
        advance_all(&mut state);
        assert_eq!(state.barriers[0].state, SlotState::Inactive);
        assert_eq!(state.barriers[0].x, PLAYFIELD_W);
        assert!(!state.barriers[0].passed);
    }

    #[test]
    fn test_activation_is_round_robin() {
        let mut state = playing_state(2);
        advance_all(&mut state);

        // Park slot 0 so its tail lands exactly in the activation window.
        state.barriers[0].x = PLAYFIELD_W - state.barriers[0].length
            - state.barriers[0].gap_length
            + state.speed;
        advance_all(&mut state);
        assert_ne!(state.barriers[1].state, SlotState::Inactive);
        assert_eq!(state.barriers[2].state, SlotState::Inactive);

        // Same trick on slot 1 arms slot 2, and slot 2 wraps to slot 0.
        state.barriers[0].state = SlotState::Inactive;
        state.barriers[1].x = PLAYFIELD_W - state.barriers[1].length
            - state.barriers[1].gap_length
            + state.speed;
        advance_all(&mut state);
        assert_ne!(state.barriers[2].state, SlotState::Inactive);

        state.barriers[1].state = SlotState::Inactive;
        state.barriers[2].x = PLAYFIELD_W - state.barriers[2].length
            - state.barriers[2].gap_length
            + state.speed;
        advance_all(&mut state);
        assert_ne!(state.barriers[0].state, SlotState::Inactive);
    }

    #[test]
    fn test_activation_threshold_fires_once() {
        let mut state = playing_state(3);
        advance_all(&mut state);
        let b = &state.barriers[0];
        let mut window_hits = 0;
        let mut tail = b.x + b.length + b.gap_length;
        while tail > 0 {
            if tail <= PLAYFIELD_W && tail >= PLAYFIELD_W + 1 - state.speed {
                window_hits += 1;
            }
            tail -= state.speed;
        }
        assert_eq!(window_hits, 1);
    }

    #[test]
    fn test_speed_increments_every_fifth_pass() {
        let mut state = playing_state(4);
        state.score = 5;
        apply_difficulty_scaling(&mut state);
        assert_eq!(state.speed, BASE_SPEED + 1);

        state.score = 6;
        apply_difficulty_scaling(&mut state);
        assert_eq!(state.speed, BASE_SPEED + 1);

        state.score = 10;
        apply_difficulty_scaling(&mut state);
        assert_eq!(state.speed, BASE_SPEED + 2);
    }

    #[test]
    fn test_rate_tier_steps_exactly_once() {
        let mut state = playing_state(5);
        state.score = RATE_STEP_1_AT;
        apply_difficulty_scaling(&mut state);
        assert_eq!(state.rate_tier, RateTier::Step1);
        assert_eq!(
            state.events,
            vec![GameEvent::RateStepped(RateTier::Step1)]
        );

        // Later exhaustions past the threshold must not re-trigger.
        state.events.clear();
        state.score = RATE_STEP_1_AT + 1;
        apply_difficulty_scaling(&mut state);
        assert_eq!(state.rate_tier, RateTier::Step1);
        assert!(state.events.is_empty());

        state.score = RATE_STEP_2_AT;
        apply_difficulty_scaling(&mut state);
        assert_eq!(state.rate_tier, RateTier::Step2);
    }

    #[test]
    fn test_tunnel_height_floors_at_minimum() {
        let mut state = playing_state(6);
        state.score = 1;
        for _ in 0..40 {
            apply_difficulty_scaling(&mut state);
            assert!(state.tunnel_height >= TUNNEL_FLOOR);
        }
        assert_eq!(state.tunnel_height, TUNNEL_FLOOR);
    }
}
