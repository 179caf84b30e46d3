//! Host run options and run reporting
//!
//! The headless driver is configured from `TUNNEL_DASH_*` environment
//! variables, falling back to defaults on anything missing or malformed.
//! Gameplay constants live in [`crate::consts`] and are deliberately not
//! configurable.

use serde::{Deserialize, Serialize};

use crate::audio::RateTier;
use crate::sim::GameMode;

/// Options for a headless run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Session RNG seed
    pub seed: u64,
    /// Frames to simulate before reporting
    pub frames: u64,
    /// Player mode the driver selects on the menu
    pub mode: GameMode,
    /// Honor the scheduler's requested delays instead of fast-forwarding
    pub realtime: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: 0xD1CE,
            frames: 3_000,
            mode: GameMode::Single,
            realtime: false,
        }
    }
}

impl RunOptions {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let options = Self {
            seed: parse_u64("TUNNEL_DASH_SEED", env("TUNNEL_DASH_SEED"), defaults.seed),
            frames: parse_u64(
                "TUNNEL_DASH_FRAMES",
                env("TUNNEL_DASH_FRAMES"),
                defaults.frames,
            ),
            mode: parse_mode(env("TUNNEL_DASH_MODE")),
            realtime: parse_bool(env("TUNNEL_DASH_REALTIME")),
        };
        log::info!(
            "run options: seed {}, {} frames, {:?}",
            options.seed,
            options.frames,
            options.mode
        );
        options
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_u64(name: &str, raw: Option<String>, default: u64) -> u64 {
    match raw {
        Some(v) => v.parse().unwrap_or_else(|_| {
            log::warn!("{name}={v:?} is not a number, using {default}");
            default
        }),
        None => default,
    }
}

fn parse_bool(raw: Option<String>) -> bool {
    matches!(raw.as_deref(), Some("1" | "true" | "yes"))
}

fn parse_mode(raw: Option<String>) -> GameMode {
    match raw.as_deref() {
        Some("dual" | "2") => GameMode::Dual,
        Some("single" | "1") | None => GameMode::Single,
        Some(other) => {
            log::warn!("unknown mode {other:?}, using single");
            GameMode::Single
        }
    }
}

/// Summary emitted at the end of a headless run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub frames: u64,
    pub rounds: u32,
    pub score: u32,
    pub high_score: u32,
    pub rate_tier: RateTier,
}

impl RunReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
