//! Executes drawing objects against a cave being rendered.
//!
//! Objects draw through [`CaveRendered::store_rc`], which also records the
//! arena index of the drawing object into the attribution map; the
//! boundary fill depends on that to find its own flood afterwards.
//! Coordinates outside the cave wrap through the modular map addressing,
//! which profi-boulder style caves rely on.

use rockfall_cave::prelude::*;

use crate::rendered::CaveRendered;

impl CaveRendered {
    /// Draw one object (already filtered for level visibility).
    pub(crate) fn draw_object(&mut self, object: &CaveObject, order: u32) {
        match *object {
            CaveObject::Point { p, element, .. } => {
                self.store_rc(p.x, p.y, element, order);
            }
            CaveObject::Line { p1, p2, element, .. } => {
                self.draw_line(p1, p2, element, order);
            }
            CaveObject::Rectangle { p1, p2, element, .. } => {
                let (x1, y1, x2, y2) = ordered(p1, p2);
                for x in x1..=x2 {
                    self.store_rc(x, y1, element, order);
                    self.store_rc(x, y2, element, order);
                }
                for y in y1..=y2 {
                    self.store_rc(x1, y, element, order);
                    self.store_rc(x2, y, element, order);
                }
            }
            CaveObject::FillRect {
                p1,
                p2,
                border,
                fill,
                ..
            } => {
                let (x1, y1, x2, y2) = ordered(p1, p2);
                for y in y1..=y2 {
                    for x in x1..=x2 {
                        let e = if y == y1 || y == y2 || x == x1 || x == x2 {
                            border
                        } else {
                            fill
                        };
                        self.store_rc(x, y, e, order);
                    }
                }
            }
            CaveObject::Raster {
                p1,
                p2,
                dist,
                element,
                ..
            } => {
                let (x1, y1, x2, y2) = ordered(p1, p2);
                let dx = dist.x.max(1);
                let dy = dist.y.max(1);
                let mut y = y1;
                while y <= y2 {
                    let mut x = x1;
                    while x <= x2 {
                        self.store_rc(x, y, element, order);
                        x += dx;
                    }
                    y += dy;
                }
            }
            CaveObject::Join {
                search,
                put,
                dist,
                backwards,
                ..
            } => {
                // The put element can be found again by the forward scan
                // when the distance points down or right; caves that care
                // use the backwards variant.
                let (w, h) = (self.params.w, self.params.h);
                if backwards {
                    for y in (0..h).rev() {
                        for x in (0..w).rev() {
                            if self.get(x, y) == search {
                                self.store_rc(x + dist.x, y + dist.y, put, order);
                            }
                        }
                    }
                } else {
                    for y in 0..h {
                        for x in 0..w {
                            if self.get(x, y) == search {
                                self.store_rc(x + dist.x, y + dist.y, put, order);
                            }
                        }
                    }
                }
            }
            CaveObject::FloodFill {
                start,
                search,
                fill,
                ..
            } => {
                if !self.in_bounds(start) || search == fill {
                    return;
                }
                if self.get(start.x, start.y) != search {
                    return;
                }
                self.flood_fill(start.x, start.y, search, fill, order);
            }
            CaveObject::BoundaryFill {
                start,
                border,
                fill,
                ..
            } => {
                if !self.in_bounds(start) {
                    return;
                }
                // Fill with the border element so the walk cannot come
                // back, then rewrite this object's cells to the fill.
                self.boundary_fill(start.x, start.y, border, order);
                for y in 0..self.params.h {
                    for x in 0..self.params.w {
                        if *self.objects_order().get(x, y) == Some(order) {
                            self.store_rc(x, y, fill, order);
                        }
                    }
                }
            }
            CaveObject::Maze {
                p1,
                p2,
                wall_width,
                path_width,
                horiz,
                seeds,
                wall,
                path,
                kind,
                ..
            } => {
                self.draw_maze(
                    p1, p2, wall_width, path_width, horiz, seeds, wall, path, kind, order,
                );
            }
            CaveObject::CopyPaste {
                p1,
                p2,
                dest,
                mirror,
                flip,
                ..
            } => {
                let (x1, y1, x2, y2) = ordered(p1, p2);
                let (w, h) = (x2 - x1 + 1, y2 - y1 + 1);
                let mut clipboard = Vec::with_capacity((w * h) as usize);
                for y in 0..h {
                    for x in 0..w {
                        clipboard.push(self.get(x + x1, y + y1));
                    }
                }
                for y in 0..h {
                    let ydisp = if flip { h - 1 - y } else { y };
                    for x in 0..w {
                        let xdisp = if mirror { w - 1 - x } else { x };
                        let e = clipboard[(y * w + x) as usize];
                        self.store_rc(dest.x + xdisp, dest.y + ydisp, e, order);
                    }
                }
            }
            CaveObject::RandomFill {
                p1,
                p2,
                seeds,
                initial,
                fills,
                replace_only,
                c64_random,
                ..
            } => {
                self.draw_random_fill(
                    p1,
                    p2,
                    seeds,
                    initial,
                    fills,
                    replace_only,
                    c64_random,
                    order,
                );
            }
        }
    }

    fn in_bounds(&self, p: Coord) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.params.w && p.y < self.params.h
    }

    /// Per-object seed: the object's per-level seed, or a value drawn
    /// from the cave's generator when the seed is -1 ("new each render").
    fn object_seed(&mut self, seeds: [i32; 5]) -> i32 {
        let s = seeds[self.rendered_on as usize];
        if s == -1 {
            (self.rng.next_u32() & 0xffff) as i32
        } else {
            s
        }
    }

    fn draw_line(&mut self, p1: Coord, p2: Coord, element: Element, order: u32) {
        let (mut x1, mut y1, mut x2, mut y2) = (p1.x, p1.y, p2.x, p2.y);
        let steep = (y2 - y1).abs() > (x2 - x1).abs();
        if steep {
            std::mem::swap(&mut x1, &mut y1);
            std::mem::swap(&mut x2, &mut y2);
        }
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
            std::mem::swap(&mut y1, &mut y2);
        }
        let dx = x2 - x1;
        let dy = (y2 - y1).abs();
        let ystep = if y1 < y2 { 1 } else { -1 };
        let mut error = 0;
        let mut y = y1;
        for x in x1..=x2 {
            if steep {
                self.store_rc(y, x, element, order);
            } else {
                self.store_rc(x, y, element, order);
            }
            error += dy;
            if error * 2 >= dx {
                y += ystep;
                error -= dx;
            }
        }
    }

    fn flood_fill(&mut self, x: i32, y: i32, search: Element, fill: Element, order: u32) {
        self.store_rc(x, y, fill, order);
        if x > 0 && self.get(x - 1, y) == search {
            self.flood_fill(x - 1, y, search, fill, order);
        }
        if y > 0 && self.get(x, y - 1) == search {
            self.flood_fill(x, y - 1, search, fill, order);
        }
        if x < self.params.w - 1 && self.get(x + 1, y) == search {
            self.flood_fill(x + 1, y, search, fill, order);
        }
        if y < self.params.h - 1 && self.get(x, y + 1) == search {
            self.flood_fill(x, y + 1, search, fill, order);
        }
    }

    fn boundary_fill(&mut self, x: i32, y: i32, border: Element, order: u32) {
        self.store_rc(x, y, border, order);
        if x > 0 && self.get(x - 1, y) != border {
            self.boundary_fill(x - 1, y, border, order);
        }
        if y > 0 && self.get(x, y - 1) != border {
            self.boundary_fill(x, y - 1, border, order);
        }
        if x < self.params.w - 1 && self.get(x + 1, y) != border {
            self.boundary_fill(x + 1, y, border, order);
        }
        if y < self.params.h - 1 && self.get(x, y + 1) != border {
            self.boundary_fill(x, y + 1, border, order);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_random_fill(
        &mut self,
        p1: Coord,
        p2: Coord,
        seeds: [i32; 5],
        initial: Element,
        fills: [(Element, i32); 4],
        replace_only: Option<Element>,
        c64_random: bool,
        order: u32,
    ) {
        let seed = self.object_seed(seeds);
        let mut rand = GameRng::with_seed(seed as u64);
        let mut c64 = C64Rng::with_seed(seed);

        let (x1, y1, x2, y2) = ordered(p1, p2);
        for y in y1..=y2 {
            for x in x1..=x2 {
                let byte = if c64_random {
                    c64.next_byte() as i32
                } else {
                    rand.int_range(0, 256)
                };
                let mut element = initial;
                for (fill, prob) in fills {
                    if byte < prob {
                        element = fill;
                    }
                }
                if replace_only.is_none() || Some(self.get(x, y)) == replace_only {
                    self.store_rc(x, y, element, order);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_maze(
        &mut self,
        p1: Coord,
        p2: Coord,
        wall_width: i32,
        path_width: i32,
        horiz: i32,
        seeds: [i32; 5],
        wall_element: Element,
        path_element: Element,
        kind: MazeKind,
        order: u32,
    ) {
        let (x1, y1, x2, y2) = ordered(p1, p2);
        let wall = wall_width.max(1);
        let path = path_width.max(1);

        // Number of passages that fit per side:
        // n*path + (n-1)*wall = extent  =>  n = (extent+wall)/(path+wall)
        let mut w = (x2 - x1 + 1 + wall) / (path + wall);
        let mut h = (y2 - y1 + 1 + wall) / (path + wall);
        if kind == MazeKind::Unicursal {
            // Unicursal mazes are generated at half size and doubled.
            w = w / 2 * 2;
            h = h / 2 * 2;
        } else {
            w = 2 * (w - 1) + 1;
            h = 2 * (h - 1) + 1;
        }

        let seed = self.object_seed(seeds);
        let mut rand = GameRng::with_seed(seed as u64);

        // Editors drag-create mazes through zero size; nothing to do then.
        let mut maze = if w >= 1 && h >= 1 {
            let mut m = vec![vec![false; w as usize]; h as usize];
            mazegen(&mut m, &mut rand, 0, 0, horiz);
            m
        } else {
            Vec::new()
        };
        if kind == MazeKind::Braid && !maze.is_empty() {
            braidmaze(&mut maze, &mut rand);
        }
        if kind == MazeKind::Unicursal && !maze.is_empty() {
            let (uni, nw, nh) = unicursalmaze(&maze, w, h);
            maze = uni;
            w = nw;
            h = nh;
        }

        // Copy into the cave: even maze rows/columns are drawn path_width
        // cells wide, odd ones wall_width cells wide.
        let mut yk = y1;
        for y in 0..h {
            let rows = if y % 2 == 0 { path } else { wall };
            for _ in 0..rows {
                let mut xk = x1;
                for x in 0..w {
                    let cols = if x % 2 == 0 { path } else { wall };
                    for _ in 0..cols {
                        let e = if maze[y as usize][x as usize] {
                            path_element
                        } else {
                            wall_element
                        };
                        self.store_rc(xk, yk, e, order);
                        xk += 1;
                    }
                }
                for x in xk..=x2 {
                    self.store_rc(x, yk, wall_element, order);
                }
                yk += 1;
            }
        }
        for y in yk..=y2 {
            for x in x1..=x2 {
                self.store_rc(x, y, wall_element, order);
            }
        }
    }
}

fn ordered(p1: Coord, p2: Coord) -> (i32, i32, i32, i32) {
    let (x1, x2) = if p1.x <= p2.x { (p1.x, p2.x) } else { (p2.x, p1.x) };
    let (y1, y2) = if p1.y <= p2.y { (p1.y, p2.y) } else { (p2.y, p1.y) };
    (x1, y1, x2, y2)
}

// ---------------------------------------------------------------------------
// Maze generation
// ---------------------------------------------------------------------------

/// Recursive maze carve. `true` cells are path. Steps by two: odd cells
/// are the walls between passages.
fn mazegen(maze: &mut [Vec<bool>], rand: &mut GameRng, x: i32, y: i32, horiz: i32) {
    let h = maze.len() as i32;
    let w = maze[0].len() as i32;
    maze[y as usize][x as usize] = true;
    let mut dirmask = 15;
    while dirmask != 0 {
        let mut dir = if rand.int_range(0, 100) < horiz { 2 } else { 0 };
        // if no move possible on the chosen axis, take the other
        if dir == 2 && (dirmask & 12) == 0 {
            dir = 0;
        } else if dir == 0 && (dirmask & 3) == 0 {
            dir = 2;
        }
        dir += rand.int_range(0, 2);

        if dirmask & (1 << dir) != 0 {
            dirmask &= !(1 << dir);
            match dir {
                0 => {
                    // up
                    if y >= 2 && !maze[(y - 2) as usize][x as usize] {
                        maze[(y - 1) as usize][x as usize] = true;
                        mazegen(maze, rand, x, y - 2, horiz);
                    }
                }
                1 => {
                    // down
                    if y < h - 2 && !maze[(y + 2) as usize][x as usize] {
                        maze[(y + 1) as usize][x as usize] = true;
                        mazegen(maze, rand, x, y + 2, horiz);
                    }
                }
                2 => {
                    // left
                    if x >= 2 && !maze[y as usize][(x - 2) as usize] {
                        maze[y as usize][(x - 1) as usize] = true;
                        mazegen(maze, rand, x - 2, y, horiz);
                    }
                }
                3 => {
                    // right
                    if x < w - 2 && !maze[y as usize][(x + 2) as usize] {
                        maze[y as usize][(x + 1) as usize] = true;
                        mazegen(maze, rand, x + 2, y, horiz);
                    }
                }
                _ => unreachable!(),
            }
        }
    }
}

/// Open one wall of every dead end, turning a perfect maze into a braid.
fn braidmaze(maze: &mut [Vec<bool>], rand: &mut GameRng) {
    let h = maze.len() as i32;
    let w = maze[0].len() as i32;
    let mut y = 0;
    while y < h {
        let mut x = 0;
        while x < w {
            let mut closed = 0;
            let mut closed_dirs = [0i32; 4];
            let mut dirs = 0;

            if x < 1 || !maze[y as usize][(x - 1) as usize] {
                closed += 1;
                if x > 0 {
                    closed_dirs[dirs] = 0; // left
                    dirs += 1;
                }
            }
            if y < 1 || !maze[(y - 1) as usize][x as usize] {
                closed += 1;
                if y > 0 {
                    closed_dirs[dirs] = 1; // up
                    dirs += 1;
                }
            }
            if x >= w - 1 || !maze[y as usize][(x + 1) as usize] {
                closed += 1;
                if x < w - 1 {
                    closed_dirs[dirs] = 2; // right
                    dirs += 1;
                }
            }
            if y >= h - 1 || !maze[(y + 1) as usize][x as usize] {
                closed += 1;
                if y < h - 1 {
                    closed_dirs[dirs] = 3; // down
                    dirs += 1;
                }
            }

            // closed from three sides: a dead end. dirs can be 0 for a
            // one-cell maze.
            if closed == 3 && dirs != 0 {
                let dir = closed_dirs[rand.int_range(0, dirs as i32) as usize];
                match dir {
                    0 => maze[y as usize][(x - 1) as usize] = true,
                    1 => maze[(y - 1) as usize][x as usize] = true,
                    2 => maze[y as usize][(x + 1) as usize] = true,
                    3 => maze[(y + 1) as usize][x as usize] = true,
                    _ => unreachable!(),
                }
            }
            x += 2;
        }
        y += 2;
    }
}

/// Double a perfect maze so its single path visits every cell.
fn unicursalmaze(maze: &[Vec<bool>], w: i32, h: i32) -> (Vec<Vec<bool>>, i32, i32) {
    let uw = (w * 2 + 1) as usize;
    let uh = (h * 2 + 1) as usize;
    let mut uni = vec![vec![false; uw]; uh];

    for y in 0..h {
        for x in 0..w {
            if maze[y as usize][x as usize] {
                let (ux, uy) = ((x * 2) as usize, (y * 2) as usize);
                uni[uy][ux] = true;
                uni[uy][ux + 2] = true;
                uni[uy + 2][ux] = true;
                uni[uy + 2][ux + 2] = true;

                if x < 1 || !maze[y as usize][(x - 1) as usize] {
                    uni[uy + 1][ux] = true;
                }
                if y < 1 || !maze[(y - 1) as usize][x as usize] {
                    uni[uy][ux + 1] = true;
                }
                if x >= w - 1 || !maze[y as usize][(x + 1) as usize] {
                    uni[uy + 1][ux + 2] = true;
                }
                if y >= h - 1 || !maze[(y + 1) as usize][x as usize] {
                    uni[uy + 2][ux + 1] = true;
                }
            }
        }
    }
    (uni, w * 2 - 1, h * 2 - 1)
}
