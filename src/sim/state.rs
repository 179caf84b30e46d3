//! Session state and core simulation types
//!
//! Everything mutable the game touches across a round lives here. The
//! struct is the single source of truth: resetting a round is a plain
//! field reassignment, never hidden static state.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::barrier::Barrier;
use crate::audio::RateTier;
use crate::consts::*;

/// Player count selected on the menu screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    #[default]
    Single,
    Dual,
}

/// Top-level phase of the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Mode select screen, waiting for the confirm press/release
    Menu,
    /// Active gameplay
    Playing,
    /// Round ended; cue plays, then the screen waits for confirm
    GameOver,
}

/// Sub-state within `GamePhase::GameOver`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverStage {
    /// End-of-game sting is streaming; the scheduler holds this frame
    Cue,
    /// Outcome panel shown, waiting for the confirm press/release
    Prompt,
}

/// Identifies one of the two player slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

/// A player box on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    /// Top-left corner, playfield coordinates
    pub pos: IVec2,
    /// Pupil offset from the last movement direction, rendering only
    pub gaze: IVec2,
}

impl Player {
    pub fn spawn(at: (i32, i32)) -> Self {
        Self {
            pos: IVec2::new(at.0, at.1),
            gaze: IVec2::ZERO,
        }
    }
}

/// Things that happened during a tick that the world outside the sim
/// (audio engine, logging) needs to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Menu -> Playing; the ambient loop starts at the current tier
    SessionStarted,
    /// An obstacle was cleared
    BarrierPassed { score: u32 },
    /// Ambient playback pacing steps up
    RateStepped(RateTier),
    /// A collision ended the round
    GameEnded { winner: Option<PlayerId> },
    /// The end-of-game cue has had its full hold
    CueFinished,
    /// GameOver -> Menu
    ReturnedToMenu,
}

/// Confirm-input latch: level-true-while-held with an explicit
/// wait-for-release, so a button held across a phase transition cannot
/// re-trigger.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmGate {
    held: bool,
}

impl ConfirmGate {
    /// Feed the current level; returns true only on the release edge
    /// that follows a press.
    pub fn fired(&mut self, level: bool) -> bool {
        if level {
            self.held = true;
            false
        } else {
            std::mem::take(&mut self.held)
        }
    }
}

/// Complete game state (deterministic)
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Geometry RNG, seeded once per process
    pub rng: Pcg32,
    pub mode: GameMode,
    pub phase: GamePhase,
    pub over_stage: OverStage,
    /// Obstacles cleared this round
    pub score: u32,
    /// Best score this power cycle (volatile)
    pub high_score: u32,
    /// Barrier slide speed in pixels per frame
    pub speed: i32,
    /// Current vertical opening; shrinks as difficulty rises
    pub tunnel_height: i32,
    pub rate_tier: RateTier,
    /// Survivor of a dual-mode round
    pub winner: Option<PlayerId>,
    pub players: [Player; 2],
    pub barriers: [Barrier; BARRIER_SLOTS],
    /// Tick counter
    pub frame: u64,
    /// Round state must be re-initialized on the next Menu -> Playing
    pub needs_reset: bool,
    pub confirm: ConfirmGate,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
}

impl SessionState {
    /// Create a fresh session sitting on the menu screen.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: GameMode::Single,
            phase: GamePhase::Menu,
            over_stage: OverStage::Cue,
            score: 0,
            high_score: 0,
            speed: BASE_SPEED,
            tunnel_height: TUNNEL_START,
            rate_tier: RateTier::Base,
            winner: None,
            players: [Player::spawn(P1_SPAWN), Player::spawn(P2_SPAWN)],
            barriers: Barrier::initial_slots(),
            frame: 0,
            needs_reset: false,
            confirm: ConfirmGate::default(),
            events: Vec::new(),
        }
    }

    /// Re-initialize round state for a new game. High score, RNG stream,
    /// and selected mode survive.
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.speed = BASE_SPEED;
        self.tunnel_height = TUNNEL_START;
        self.rate_tier = RateTier::Base;
        self.winner = None;
        self.players = [Player::spawn(P1_SPAWN), Player::spawn(P2_SPAWN)];
        self.barriers = Barrier::initial_slots();
        self.needs_reset = false;
    }

    /// Players participating under the current mode.
    pub fn live_player_ids(&self) -> &'static [PlayerId] {
        match self.mode {
            GameMode::Single => &[PlayerId::One],
            GameMode::Dual => &[PlayerId::One, PlayerId::Two],
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id as usize]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id as usize]
    }
}
