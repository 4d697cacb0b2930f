//! Direction algebra for the cave grid.
//!
//! Nine directions including [`Dir::Still`], plus "doubled" variants for
//! two-cell displacements (used when pushing elements and by the magic
//! wall, which drops its output two cells below the wall). The screen
//! coordinate system has y growing *down*, so [`Dir::cw_90`] rotates
//! clockwise as seen on screen.
//!
//! All rotation helpers are total over the nine basic directions and leave
//! `Still` fixed. Doubled directions are only ever produced by
//! [`Dir::twice`] and consumed as displacements; rotating them is not
//! meaningful and not supported.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dir
// ---------------------------------------------------------------------------

/// A movement direction on the cave grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    /// No movement.
    Still,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    /// Two cells up, and so on for the other doubled variants.
    Up2,
    UpRight2,
    Right2,
    DownRight2,
    Down2,
    DownLeft2,
    Left2,
    UpLeft2,
}

impl Dir {
    /// The x component of the unit (or doubled) displacement.
    pub const fn dx(self) -> i32 {
        match self {
            Dir::Still | Dir::Up | Dir::Down | Dir::Up2 | Dir::Down2 => 0,
            Dir::UpRight | Dir::Right | Dir::DownRight => 1,
            Dir::DownLeft | Dir::Left | Dir::UpLeft => -1,
            Dir::UpRight2 | Dir::Right2 | Dir::DownRight2 => 2,
            Dir::DownLeft2 | Dir::Left2 | Dir::UpLeft2 => -2,
        }
    }

    /// The y component of the unit (or doubled) displacement. Up is negative.
    pub const fn dy(self) -> i32 {
        match self {
            Dir::Still | Dir::Left | Dir::Right | Dir::Left2 | Dir::Right2 => 0,
            Dir::Up | Dir::UpLeft | Dir::UpRight => -1,
            Dir::Down | Dir::DownLeft | Dir::DownRight => 1,
            Dir::Up2 | Dir::UpLeft2 | Dir::UpRight2 => -2,
            Dir::Down2 | Dir::DownLeft2 | Dir::DownRight2 => 2,
        }
    }

    /// Rotate 45 degrees counter-clockwise (on screen).
    pub const fn ccw_45(self) -> Dir {
        match self {
            Dir::Still => Dir::Still,
            Dir::Up => Dir::UpLeft,
            Dir::UpRight => Dir::Up,
            Dir::Right => Dir::UpRight,
            Dir::DownRight => Dir::Right,
            Dir::Down => Dir::DownRight,
            Dir::DownLeft => Dir::Down,
            Dir::Left => Dir::DownLeft,
            Dir::UpLeft => Dir::Left,
            other => other,
        }
    }

    /// Rotate 45 degrees clockwise (on screen).
    pub const fn cw_45(self) -> Dir {
        match self {
            Dir::Still => Dir::Still,
            Dir::Up => Dir::UpRight,
            Dir::UpRight => Dir::Right,
            Dir::Right => Dir::DownRight,
            Dir::DownRight => Dir::Down,
            Dir::Down => Dir::DownLeft,
            Dir::DownLeft => Dir::Left,
            Dir::Left => Dir::UpLeft,
            Dir::UpLeft => Dir::Up,
            other => other,
        }
    }

    /// Rotate 90 degrees counter-clockwise (on screen).
    pub const fn ccw_90(self) -> Dir {
        match self {
            Dir::Still => Dir::Still,
            Dir::Up => Dir::Left,
            Dir::UpRight => Dir::UpLeft,
            Dir::Right => Dir::Up,
            Dir::DownRight => Dir::UpRight,
            Dir::Down => Dir::Right,
            Dir::DownLeft => Dir::DownRight,
            Dir::Left => Dir::Down,
            Dir::UpLeft => Dir::DownLeft,
            other => other,
        }
    }

    /// Rotate 90 degrees clockwise (on screen).
    pub const fn cw_90(self) -> Dir {
        match self {
            Dir::Still => Dir::Still,
            Dir::Up => Dir::Right,
            Dir::UpRight => Dir::DownRight,
            Dir::Right => Dir::Down,
            Dir::DownRight => Dir::DownLeft,
            Dir::Down => Dir::Left,
            Dir::DownLeft => Dir::UpLeft,
            Dir::Left => Dir::Up,
            Dir::UpLeft => Dir::UpRight,
            other => other,
        }
    }

    /// The 180 degrees turn.
    pub const fn opposite(self) -> Dir {
        match self {
            Dir::Still => Dir::Still,
            Dir::Up => Dir::Down,
            Dir::UpRight => Dir::DownLeft,
            Dir::Right => Dir::Left,
            Dir::DownRight => Dir::UpLeft,
            Dir::Down => Dir::Up,
            Dir::DownLeft => Dir::UpRight,
            Dir::Left => Dir::Right,
            Dir::UpLeft => Dir::DownRight,
            other => other,
        }
    }

    /// The doubled displacement, e.g. `Right` becomes `Right2` (dx 2).
    pub const fn twice(self) -> Dir {
        match self {
            Dir::Still => Dir::Still,
            Dir::Up => Dir::Up2,
            Dir::UpRight => Dir::UpRight2,
            Dir::Right => Dir::Right2,
            Dir::DownRight => Dir::DownRight2,
            Dir::Down => Dir::Down2,
            Dir::DownLeft => Dir::DownLeft2,
            Dir::Left => Dir::Left2,
            Dir::UpLeft => Dir::UpLeft2,
            other => other,
        }
    }

    /// True for the four cardinal directions.
    pub const fn is_cardinal(self) -> bool {
        matches!(self, Dir::Up | Dir::Down | Dir::Left | Dir::Right)
    }

    /// Replace a diagonal player move by its horizontal component.
    ///
    /// Engines without diagonal movement give horizontal moves precedence,
    /// so `UpLeft` and `DownLeft` become `Left` (and mirrored for right).
    pub const fn rectify_horizontal(self) -> Dir {
        match self {
            Dir::UpRight | Dir::DownRight => Dir::Right,
            Dir::UpLeft | Dir::DownLeft => Dir::Left,
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: [Dir; 9] = [
        Dir::Still,
        Dir::Up,
        Dir::UpRight,
        Dir::Right,
        Dir::DownRight,
        Dir::Down,
        Dir::DownLeft,
        Dir::Left,
        Dir::UpLeft,
    ];

    #[test]
    fn rotations_are_inverses() {
        for d in BASIC {
            assert_eq!(d.ccw_45().cw_45(), d);
            assert_eq!(d.ccw_90().cw_90(), d);
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        for d in BASIC {
            assert_eq!(d.cw_90().cw_90().cw_90().cw_90(), d);
        }
    }

    #[test]
    fn two_eighths_make_a_quarter() {
        for d in BASIC {
            assert_eq!(d.cw_45().cw_45(), d.cw_90());
            assert_eq!(d.ccw_45().ccw_45(), d.ccw_90());
        }
    }

    #[test]
    fn displacement_vectors() {
        assert_eq!((Dir::Up.dx(), Dir::Up.dy()), (0, -1));
        assert_eq!((Dir::Down.dx(), Dir::Down.dy()), (0, 1));
        assert_eq!((Dir::Left.dx(), Dir::Left.dy()), (-1, 0));
        assert_eq!((Dir::Right.dx(), Dir::Right.dy()), (1, 0));
        assert_eq!((Dir::DownLeft.dx(), Dir::DownLeft.dy()), (-1, 1));
    }

    #[test]
    fn doubling_doubles_the_vector() {
        for d in BASIC {
            assert_eq!(d.twice().dx(), 2 * d.dx());
            assert_eq!(d.twice().dy(), 2 * d.dy());
        }
    }

    #[test]
    fn screen_rotation_orientation() {
        // y grows down, so rotating "down" clockwise must give "left".
        assert_eq!(Dir::Down.cw_90(), Dir::Left);
        assert_eq!(Dir::Down.ccw_90(), Dir::Right);
    }

    #[test]
    fn horizontal_rectification() {
        assert_eq!(Dir::UpLeft.rectify_horizontal(), Dir::Left);
        assert_eq!(Dir::DownRight.rectify_horizontal(), Dir::Right);
        assert_eq!(Dir::Up.rectify_horizontal(), Dir::Up);
    }
}
