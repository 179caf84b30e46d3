//! Player movement and gap collision
//!
//! Input arrives already decoded as an 8-way compass direction; the raw
//! line sampling lives with the input collaborator, not here.

use glam::IVec2;

use super::barrier::Barrier;
use super::state::Player;
use crate::consts::*;
use crate::clamp_to_field;

/// Decoded 8-way directional input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Compass {
    pub const ALL: [Compass; 8] = [
        Compass::North,
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];

    /// Unit step per axis in screen coordinates (y grows downward).
    pub fn unit(self) -> IVec2 {
        match self {
            Compass::North => IVec2::new(0, -1),
            Compass::NorthEast => IVec2::new(1, -1),
            Compass::East => IVec2::new(1, 0),
            Compass::SouthEast => IVec2::new(1, 1),
            Compass::South => IVec2::new(0, 1),
            Compass::SouthWest => IVec2::new(-1, 1),
            Compass::West => IVec2::new(-1, 0),
            Compass::NorthWest => IVec2::new(-1, -1),
        }
    }

    /// Sign of the vertical component; the menu uses this for mode select.
    pub fn vertical(self) -> i32 {
        self.unit().y
    }
}

/// Apply one frame of movement: fixed per-axis delta, then clamp into the
/// playfield. The gaze offset tracks the movement direction and is purely
/// a rendering cue.
pub fn apply_movement(player: &mut Player, dir: Option<Compass>) {
    match dir {
        Some(d) => {
            let unit = d.unit();
            player.pos += unit * MOVE_STEP;
            player.gaze = unit * GAZE_STEP;
        }
        None => player.gaze = IVec2::ZERO,
    }
    player.pos.x = clamp_to_field(player.pos.x, PLAYFIELD_W);
    player.pos.y = clamp_to_field(player.pos.y, PLAYFIELD_H);
}

/// Axis-aligned test against a barrier's solid segments: horizontal
/// overlap with the barrier body while the player's vertical span lies
/// outside the gap.
pub fn collides(player: &Player, b: &Barrier) -> bool {
    let horizontal =
        player.pos.x + PLAYER_SIZE >= b.x && player.pos.x <= b.trailing_edge();
    let out_of_gap = player.pos.y <= b.gap_top
        || player.pos.y + PLAYER_SIZE >= PLAYFIELD_H - b.gap_bottom;
    horizontal && out_of_gap
}

/// Whether this player's position is beyond the barrier's trailing edge.
pub fn has_passed(player: &Player, b: &Barrier) -> bool {
    player.pos.x >= b.trailing_edge()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::barrier::SlotState;
    use proptest::prelude::*;

    fn barrier(x: i32, length: i32, gap_top: i32, gap_bottom: i32) -> Barrier {
        Barrier {
            slot: 0,
            state: SlotState::Sliding,
            x,
            length,
            gap_top,
            gap_bottom,
            gap_length: 200,
            passed: false,
        }
    }

    fn player_at(x: i32, y: i32) -> Player {
        Player {
            pos: IVec2::new(x, y),
            gaze: IVec2::ZERO,
        }
    }

    #[test]
    fn test_movement_deltas_and_gaze() {
        let mut p = player_at(300, 200);
        apply_movement(&mut p, Some(Compass::NorthEast));
        assert_eq!(p.pos, IVec2::new(310, 190));
        assert_eq!(p.gaze, IVec2::new(3, -3));

        apply_movement(&mut p, Some(Compass::West));
        assert_eq!(p.pos, IVec2::new(300, 190));
        assert_eq!(p.gaze, IVec2::new(-3, 0));

        apply_movement(&mut p, None);
        assert_eq!(p.pos, IVec2::new(300, 190));
        assert_eq!(p.gaze, IVec2::ZERO);
    }

    #[test]
    fn test_movement_clamps_at_edges() {
        let mut p = player_at(5, 5);
        apply_movement(&mut p, Some(Compass::NorthWest));
        assert_eq!(p.pos, IVec2::ZERO);

        let mut p = player_at(605, 445);
        apply_movement(&mut p, Some(Compass::SouthEast));
        assert_eq!(p.pos, IVec2::new(610, 450));
    }

    #[test]
    fn test_collision_requires_horizontal_overlap() {
        let b = barrier(90, 60, 180, 100);
        // Out of the gap vertically, but well left of the barrier.
        assert!(!collides(&player_at(20, 50), &b));
        // Touching the leading edge counts.
        assert!(collides(&player_at(60, 50), &b));
        // Past the trailing edge does not.
        assert!(!collides(&player_at(151, 50), &b));
    }

    #[test]
    fn test_collision_gap_boundaries() {
        // gap_top 180, gap_bottom 100 on a 480 field: the opening spans
        // (180, 380) exclusive for a 30px box.
        let b = barrier(90, 60, 180, 100);
        assert!(!collides(&player_at(100, 210), &b));
        assert!(collides(&player_at(100, 170), &b));
        // Edge-inclusive on both sides.
        assert!(collides(&player_at(100, 180), &b));
        assert!(collides(&player_at(100, 350), &b));
        assert!(!collides(&player_at(100, 349), &b));
    }

    #[test]
    fn test_pass_is_trailing_edge_test() {
        let b = barrier(60, 40, 180, 100);
        assert!(!has_passed(&player_at(99, 200), &b));
        assert!(has_passed(&player_at(100, 200), &b));
    }

    proptest! {
        /// Positions always satisfy the playfield bounds invariant after
        /// every move, whatever the input sequence.
        #[test]
        fn prop_clamping_invariant(steps in proptest::collection::vec(0u8..9, 0..300)) {
            let mut p = Player::spawn(P1_SPAWN);
            for s in steps {
                let dir = if s == 0 {
                    None
                } else {
                    Some(Compass::ALL[(s - 1) as usize])
                };
                apply_movement(&mut p, dir);
                prop_assert!((0..=PLAYFIELD_W - PLAYER_SIZE).contains(&p.pos.x));
                prop_assert!((0..=PLAYFIELD_H - PLAYER_SIZE).contains(&p.pos.y));
            }
        }
    }
}
