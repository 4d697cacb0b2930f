//! Drawing objects: the declarative shapes a cave template is built from.
//!
//! A cave is either a literal map or a sequence of these objects, executed
//! in order over the initial fill when the cave is rendered. Objects live
//! in a plain arena (`Vec<CaveObject>`); the rendered cave's attribution
//! map stores arena indices instead of pointers, so there are no cyclic
//! references to manage.
//!
//! Only the *descriptions* live here. Execution needs the live cave and is
//! implemented by the engine crate.

use serde::{Deserialize, Serialize};

use crate::element::Element;

// ---------------------------------------------------------------------------
// Coord
// ---------------------------------------------------------------------------

/// A cave coordinate. Object coordinates may lie outside the cave; the
/// modular map addressing folds them back in when drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Build a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }
}

// ---------------------------------------------------------------------------
// MazeKind
// ---------------------------------------------------------------------------

/// The three maze flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeKind {
    /// A standard maze: exactly one path between any two cells.
    Perfect,
    /// Dead ends opened up, so the maze contains loops.
    Braid,
    /// A maze whose single path visits every cell (a doubled perfect maze).
    Unicursal,
}

// ---------------------------------------------------------------------------
// CaveObject
// ---------------------------------------------------------------------------

/// One drawing object. `seen_on` selects the levels (1..=5, index 0..5)
/// the object is drawn on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaveObject {
    /// A single element.
    Point {
        seen_on: [bool; 5],
        p: Coord,
        element: Element,
    },
    /// A straight line of elements (Bresenham).
    Line {
        seen_on: [bool; 5],
        p1: Coord,
        p2: Coord,
        element: Element,
    },
    /// The outline of a rectangle.
    Rectangle {
        seen_on: [bool; 5],
        p1: Coord,
        p2: Coord,
        element: Element,
    },
    /// A rectangle outline with a (possibly different) filled inside.
    FillRect {
        seen_on: [bool; 5],
        p1: Coord,
        p2: Coord,
        border: Element,
        fill: Element,
    },
    /// Elements on a regular grid.
    Raster {
        seen_on: [bool; 5],
        p1: Coord,
        p2: Coord,
        dist: Coord,
        element: Element,
    },
    /// Put `put` at `dist` from every occurrence of `search`. Searching
    /// backwards avoids overwriting occurrences before finding them when
    /// the distance vector points down or right.
    Join {
        seen_on: [bool; 5],
        search: Element,
        put: Element,
        dist: Coord,
        backwards: bool,
    },
    /// Classic flood fill replacing `search` with `fill`.
    FloodFill {
        seen_on: [bool; 5],
        start: Coord,
        search: Element,
        fill: Element,
    },
    /// Fill the area enclosed by `border` with `fill`.
    BoundaryFill {
        seen_on: [bool; 5],
        start: Coord,
        border: Element,
        fill: Element,
    },
    /// A generated maze. `horiz` is the percentage preference for
    /// horizontal corridors; a per-level seed of -1 means "random".
    Maze {
        seen_on: [bool; 5],
        p1: Coord,
        p2: Coord,
        wall_width: i32,
        path_width: i32,
        horiz: i32,
        seeds: [i32; 5],
        wall: Element,
        path: Element,
        kind: MazeKind,
    },
    /// Copy the source rectangle to `dest`, optionally mirrored (x) or
    /// flipped (y).
    CopyPaste {
        seen_on: [bool; 5],
        p1: Coord,
        p2: Coord,
        dest: Coord,
        mirror: bool,
        flip: bool,
    },
    /// Fill a rectangle from random bytes compared against up to four
    /// probability thresholds. `c64_random` selects the predictable
    /// generator of the original hardware; `replace_only` restricts the
    /// fill to cells currently holding that element.
    RandomFill {
        seen_on: [bool; 5],
        p1: Coord,
        p2: Coord,
        seeds: [i32; 5],
        initial: Element,
        fills: [(Element, i32); 4],
        replace_only: Option<Element>,
        c64_random: bool,
    },
}

impl CaveObject {
    /// Whether this object is drawn when rendering the given level (1..=5).
    pub fn seen_on_level(&self, level: u8) -> bool {
        let idx = (level as usize).saturating_sub(1).min(4);
        match self {
            CaveObject::Point { seen_on, .. }
            | CaveObject::Line { seen_on, .. }
            | CaveObject::Rectangle { seen_on, .. }
            | CaveObject::FillRect { seen_on, .. }
            | CaveObject::Raster { seen_on, .. }
            | CaveObject::Join { seen_on, .. }
            | CaveObject::FloodFill { seen_on, .. }
            | CaveObject::BoundaryFill { seen_on, .. }
            | CaveObject::Maze { seen_on, .. }
            | CaveObject::CopyPaste { seen_on, .. }
            | CaveObject::RandomFill { seen_on, .. } => seen_on[idx],
        }
    }

    /// Visible on every level, the usual default.
    pub const ALL_LEVELS: [bool; 5] = [true; 5];
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_visibility() {
        let object = CaveObject::Point {
            seen_on: [true, false, true, false, true],
            p: Coord::new(1, 1),
            element: Element::Diamond,
        };
        assert!(object.seen_on_level(1));
        assert!(!object.seen_on_level(2));
        assert!(object.seen_on_level(5));
    }
}
