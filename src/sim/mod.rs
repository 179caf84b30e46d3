//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, fixed timestep
//! - Seeded RNG only
//! - No rendering, clock, or platform dependencies
//! - Side effects are reported as `GameEvent`s for the caller to act on

pub mod barrier;
pub mod player;
pub mod state;
pub mod tick;

pub use barrier::{Barrier, SlotState, advance_all};
pub use player::{Compass, apply_movement, collides, has_passed};
pub use state::{
    ConfirmGate, GameEvent, GameMode, GamePhase, OverStage, Player, PlayerId, SessionState,
};
pub use tick::{TickInput, tick};
