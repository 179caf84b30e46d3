//! Draw-call emission
//!
//! Turns sim state into [`Surface`] calls. Drawing is incremental: last
//! frame's geometry is painted over in black before the new frame's
//! geometry is drawn, so the surface never needs a full clear during
//! play.

use crate::consts::*;
use crate::platform::{Color, Surface};
use crate::sim::{
    GameMode, GamePhase, OverStage, Player, PlayerId, SessionState,
};

const PLAYER_COLORS: [Color; 2] = [Color::Red, Color::Cyan];

/// Stateful frame painter; tracks what it drew last frame so it can erase.
pub struct Renderer {
    last_phase: Option<GamePhase>,
    prev_players: [Option<(i32, i32)>; 2],
    prev_barriers: [Option<(i32, i32, i32, i32)>; BARRIER_SLOTS],
    panel_painted: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last_phase: None,
            prev_players: [None; 2],
            prev_barriers: [None; BARRIER_SLOTS],
            panel_painted: false,
        }
    }

    /// Emit one frame of draw calls for the current state.
    pub fn frame(&mut self, surface: &mut impl Surface, state: &SessionState) {
        let entered = self.last_phase != Some(state.phase);
        self.last_phase = Some(state.phase);

        match state.phase {
            GamePhase::Menu => {
                if entered {
                    self.paint_menu_backdrop(surface);
                }
                draw_mode_select(surface, state.mode);
            }
            GamePhase::Playing => {
                if entered {
                    surface.fill_rect(0, 0, PLAYFIELD_W, PLAYFIELD_H, Color::Black);
                    self.prev_players = [None; 2];
                    self.prev_barriers = [None; BARRIER_SLOTS];
                    self.panel_painted = false;
                }
                self.draw_playfield(surface, state);
            }
            GamePhase::GameOver => {
                if entered {
                    draw_dead_eyes(surface, state);
                }
                if state.over_stage == OverStage::Prompt && !self.panel_painted {
                    draw_outcome_panel(surface, state);
                    self.panel_painted = true;
                }
            }
        }
    }

    fn paint_menu_backdrop(&mut self, s: &mut impl Surface) {
        s.fill_rect(0, 0, PLAYFIELD_W, PLAYFIELD_H, Color::Black);
        draw_portrait(s, 185, 75, Color::Red);
        draw_portrait(s, 365, 75, Color::Cyan);

        s.set_cursor(75, 240);
        s.set_text_size(4);
        s.set_text_color(Color::White);
        s.write_text("Select a player mode:");

        s.set_cursor(225, 310);
        s.write_text("1 Player");
        s.set_cursor(225, 360);
        s.write_text("2 Player");

        self.prev_players = [None; 2];
        self.prev_barriers = [None; BARRIER_SLOTS];
        self.panel_painted = false;
    }

    fn draw_playfield(&mut self, s: &mut impl Surface, state: &SessionState) {
        for (i, b) in state.barriers.iter().enumerate() {
            if let Some((x, len, top, bottom)) = self.prev_barriers[i].take() {
                s.draw_rect(x, 0, len, top, Color::Black);
                s.draw_rect(x, PLAYFIELD_H - bottom, len, bottom, Color::Black);
            }
            if b.is_live() {
                s.draw_rect(b.x, 0, b.length, b.gap_top, Color::White);
                s.draw_rect(
                    b.x,
                    PLAYFIELD_H - b.gap_bottom,
                    b.length,
                    b.gap_bottom,
                    Color::White,
                );
                self.prev_barriers[i] = Some((b.x, b.length, b.gap_top, b.gap_bottom));
            }
        }

        for &id in state.live_player_ids() {
            let idx = id as usize;
            if let Some((px, py)) = self.prev_players[idx] {
                s.fill_rect(px, py, PLAYER_SIZE, PLAYER_SIZE, Color::Black);
            }
            let p = state.player(id);
            draw_player_box(s, p, PLAYER_COLORS[idx]);
            self.prev_players[idx] = Some((p.pos.x, p.pos.y));
        }

        draw_hud(s, state.score, state.high_score);
    }
}

/// 30x30 player: colored body, white eyes, pupils offset by the gaze cue.
fn draw_player_box(s: &mut impl Surface, p: &Player, color: Color) {
    let (x, y) = (p.pos.x, p.pos.y);
    s.fill_rect(x, y, PLAYER_SIZE, PLAYER_SIZE, color);
    s.fill_circle(x + 11, y + 11, 5, Color::White);
    s.fill_circle(x + 23, y + 11, 5, Color::White);
    s.fill_circle(x + 11 + p.gaze.x, y + 11 + p.gaze.y, 2, Color::Black);
    s.fill_circle(x + 23 + p.gaze.x, y + 11 + p.gaze.y, 2, Color::Black);
}

/// Oversized menu portrait of a player box.
fn draw_portrait(s: &mut impl Surface, x: i32, y: i32, color: Color) {
    s.fill_rect(x, y, 90, 90, color);
    s.fill_circle(x + 33, y + 33, 15, Color::White);
    s.fill_circle(x + 69, y + 33, 15, Color::White);
    s.fill_circle(x + 33, y + 33, 6, Color::Black);
    s.fill_circle(x + 69, y + 33, 6, Color::Black);
}

/// Selection box around the active mode entry.
fn draw_mode_select(s: &mut impl Surface, mode: GameMode) {
    let (on, off) = match mode {
        GameMode::Single => (300, 350),
        GameMode::Dual => (350, 300),
    };
    s.draw_rect(215, off, 210, 50, Color::Black);
    s.draw_rect(215, on, 210, 50, Color::White);
}

/// Score lines in the top-right corner, over small erase rectangles.
fn draw_hud(s: &mut impl Surface, score: u32, high_score: u32) {
    s.fill_rect(600, 4, 25, 15, Color::Black);
    s.set_cursor(520, 5);
    s.set_text_size(1);
    s.set_text_color(Color::White);
    s.write_text(&format!("Current score: {score}"));

    s.fill_rect(600, 14, 25, 15, Color::Black);
    s.set_cursor(520, 15);
    s.write_text(&format!("   High score: {high_score}"));
}

/// Cross out the losing player's eyes while the sting plays.
fn draw_dead_eyes(s: &mut impl Surface, state: &SessionState) {
    let loser = match state.winner {
        Some(PlayerId::One) => PlayerId::Two,
        Some(PlayerId::Two) | None => PlayerId::One,
    };
    let (x, y) = {
        let p = state.player(loser);
        (p.pos.x, p.pos.y)
    };
    s.fill_circle(x + 11, y + 11, 5, Color::White);
    s.fill_circle(x + 23, y + 11, 5, Color::White);
    s.draw_line(x + 7, y + 7, x + 15, y + 15, Color::Black);
    s.draw_line(x + 15, y + 7, x + 7, y + 15, Color::Black);
    s.draw_line(x + 19, y + 7, x + 27, y + 15, Color::Black);
    s.draw_line(x + 27, y + 7, x + 19, y + 15, Color::Black);
}

/// Centre panel with the round outcome and the return-to-menu prompt.
fn draw_outcome_panel(s: &mut impl Surface, state: &SessionState) {
    s.fill_rect(160, 120, 320, 240, Color::Black);
    s.draw_rect(170, 130, 300, 220, Color::White);

    s.set_text_size(3);
    s.set_text_color(Color::White);
    match (state.mode, state.winner) {
        (GameMode::Single, _) => {
            s.set_cursor(222, 230);
            s.write_text("YOU DIED :(");
        }
        (GameMode::Dual, Some(PlayerId::One)) => {
            s.set_cursor(180, 230);
            s.write_text("PLAYER 2 DIED :(");
        }
        (GameMode::Dual, _) => {
            s.set_cursor(180, 230);
            s.write_text("PLAYER 1 DIED :(");
        }
    }

    s.set_cursor(220, 300);
    s.set_text_size(1);
    s.write_text("Press button to return to menu...");
}
