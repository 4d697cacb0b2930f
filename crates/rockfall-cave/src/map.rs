//! A rectangular cave map with wrap-around addressing.
//!
//! All coordinate arithmetic wraps. Two wrap rules exist, selected per
//! cave: the torus ("perfect") wrap simply takes both coordinates modulo
//! the size, while the line-shift wrap reproduces the original hardware,
//! where memory was linear and stepping past the right edge landed on the
//! leftmost cell of the *next* line.

use serde::{Deserialize, Serialize};

use crate::direction::Dir;

// ---------------------------------------------------------------------------
// WrapKind
// ---------------------------------------------------------------------------

/// How out-of-range coordinates fold back into the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapKind {
    /// Torus wrap: x and y wrap independently.
    #[default]
    Perfect,
    /// Original hardware wrap: crossing a horizontal edge shifts one line.
    LineShift,
}

// ---------------------------------------------------------------------------
// CaveMap
// ---------------------------------------------------------------------------

/// A `w x h` grid of `T` with configurable wrap-around addressing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaveMap<T> {
    w: i32,
    h: i32,
    wrap: WrapKind,
    cells: Vec<T>,
}

impl<T: Clone> CaveMap<T> {
    /// A new map filled with `fill`.
    pub fn new(w: i32, h: i32, fill: T) -> Self {
        assert!(w > 0 && h > 0, "cave dimensions must be positive, got {w}x{h}");
        CaveMap {
            w,
            h,
            wrap: WrapKind::Perfect,
            cells: vec![fill; (w * h) as usize],
        }
    }

    /// Width in cells.
    pub fn width(&self) -> i32 {
        self.w
    }

    /// Height in cells.
    pub fn height(&self) -> i32 {
        self.h
    }

    /// Select the wrap rule used for out-of-range coordinates.
    pub fn set_wrap(&mut self, wrap: WrapKind) {
        self.wrap = wrap;
    }

    /// The wrap rule in effect.
    pub fn wrap(&self) -> WrapKind {
        self.wrap
    }

    /// Fold a coordinate pair into range according to the wrap rule.
    fn fold(&self, mut x: i32, mut y: i32) -> usize {
        match self.wrap {
            WrapKind::Perfect => {
                x = x.rem_euclid(self.w);
                y = y.rem_euclid(self.h);
            }
            WrapKind::LineShift => {
                // Crossing the right edge moves to the next line and vice
                // versa; the resulting y then wraps torus-like.
                while x >= self.w {
                    x -= self.w;
                    y += 1;
                }
                while x < 0 {
                    x += self.w;
                    y -= 1;
                }
                y = y.rem_euclid(self.h);
            }
        }
        (y * self.w + x) as usize
    }

    /// The cell at the (wrapped) coordinates.
    pub fn get(&self, x: i32, y: i32) -> &T {
        &self.cells[self.fold(x, y)]
    }

    /// Mutable access to the cell at the (wrapped) coordinates.
    pub fn get_mut(&mut self, x: i32, y: i32) -> &mut T {
        let idx = self.fold(x, y);
        &mut self.cells[idx]
    }

    /// The cell one step in `dir` from `(x, y)`.
    pub fn get_dir(&self, x: i32, y: i32, dir: Dir) -> &T {
        self.get(x + dir.dx(), y + dir.dy())
    }

    /// Overwrite every cell.
    pub fn fill(&mut self, value: T) {
        for cell in &mut self.cells {
            *cell = value.clone();
        }
    }

    /// Iterate over all cells in row-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &T)> {
        let w = self.w;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, t)| (i as i32 % w, i as i32 / w, t))
    }
}

impl<T: Clone + Copy> CaveMap<T> {
    /// Copy out the cell value (for `Copy` cell types).
    pub fn at(&self, x: i32, y: i32) -> T {
        *self.get(x, y)
    }

    /// Copy out the cell one step in `dir` from `(x, y)`.
    pub fn at_dir(&self, x: i32, y: i32, dir: Dir) -> T {
        *self.get_dir(x, y, dir)
    }

    /// Store a cell value.
    pub fn set(&mut self, x: i32, y: i32, value: T) {
        *self.get_mut(x, y) = value;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_wrap_is_a_torus() {
        let mut map = CaveMap::new(4, 3, 0u8);
        map.set(0, 0, 7);
        assert_eq!(map.at(4, 0), 7);
        assert_eq!(map.at(-4, 3), 7);
        assert_eq!(map.at(8, -3), 7);
    }

    #[test]
    fn lineshift_wrap_advances_a_line() {
        let mut map = CaveMap::new(4, 3, 0u8);
        map.set_wrap(WrapKind::LineShift);
        map.set(0, 1, 9);
        // one step right of the last column of row 0
        assert_eq!(map.at(4, 0), 9);
        // one step left of column 0 of row 2
        map.set(3, 1, 5);
        assert_eq!(map.at(-1, 2), 5);
    }

    #[test]
    fn lineshift_vertical_wrap_is_torus_like() {
        let mut map = CaveMap::new(4, 3, 0u8);
        map.set_wrap(WrapKind::LineShift);
        map.set(2, 0, 3);
        assert_eq!(map.at(2, 3), 3);
        assert_eq!(map.at(2, -3), 3);
    }

    #[test]
    fn directional_access() {
        let mut map = CaveMap::new(4, 4, 0u8);
        map.set(2, 1, 1);
        assert_eq!(map.at_dir(2, 2, Dir::Up), 1);
        assert_eq!(map.at_dir(1, 1, Dir::Right), 1);
        assert_eq!(map.at_dir(3, 3, Dir::DownRight), *map.get(0, 0));
    }

    #[test]
    fn iteration_is_row_major() {
        let mut map = CaveMap::new(3, 2, 0u8);
        map.set(0, 0, 1);
        map.set(2, 1, 2);
        let coords: Vec<(i32, i32, u8)> = map.iter().map(|(x, y, &v)| (x, y, v)).collect();
        assert_eq!(coords[0], (0, 0, 1));
        assert_eq!(coords[5], (2, 1, 2));
        assert_eq!(coords.len(), 6);
    }
}
