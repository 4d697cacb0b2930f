//! Shared helpers for the engine integration tests.

// not every test binary uses every helper
#![allow(dead_code)]

use rockfall_cave::prelude::*;

/// Build a cave template from ASCII art. Rows must be equally long.
///
/// ```text
///   S steel       W brick        . space        d dirt
///   P player      I inbox        X outbox       x pre-outbox
///   D diamond     O stone        N nut          M magic wall
///   F firefly     B butterfly    A amoeba       L slime
///   / brick sloped up-left       \ brick sloped up-right
///   V voodoo      G ghost        C clock        K sweet
/// ```
pub fn cave_from_ascii(rows: &[&str]) -> CaveStored {
    let h = rows.len() as i32;
    let w = rows[0].chars().count() as i32;
    let mut map = CaveMap::new(w, h, Element::Space);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.chars().count() as i32, w, "ragged cave row {y}");
        for (x, ch) in row.chars().enumerate() {
            let element = match ch {
                'S' => Element::Steel,
                'W' => Element::Brick,
                '.' => Element::Space,
                'd' => Element::Dirt,
                'P' => Element::Player,
                'I' => Element::Inbox,
                'X' => Element::Outbox,
                'x' => Element::PreOutbox,
                'D' => Element::Diamond,
                'O' => Element::Stone,
                'N' => Element::Nut,
                'M' => Element::MagicWall,
                'F' => Element::Firefly1,
                'B' => Element::Butterfly1,
                'A' => Element::Amoeba,
                'L' => Element::Slime,
                '/' => Element::BrickSlopedUpLeft,
                '\\' => Element::BrickSlopedUpRight,
                'V' => Element::Voodoo,
                'G' => Element::Ghost,
                'C' => Element::Clock,
                'K' => Element::Sweet,
                other => panic!("unknown cave character {other:?}"),
            };
            map.set(x as i32, y as i32, element);
        }
    }

    let mut stored = CaveStored::default();
    stored.name = "test cave".to_owned();
    stored.w = w;
    stored.h = h;
    stored.x2 = w - 1;
    stored.y2 = h - 1;
    stored.map = Some(map);
    // hatch on the first tick so tests need no warm-up frames
    stored.level_hatching_delay_frame = [1; 5];
    stored.level_hatching_delay_time = [0; 5];
    stored
}

/// Count cells holding exactly this element.
pub fn count_element(cave: &rockfall_engine::rendered::CaveRendered, e: Element) -> usize {
    cave.map().iter().filter(|&(_, _, &cell)| cell == e).count()
}

/// True if no cell is left in a scanned state.
pub fn no_scanned_cells(cave: &rockfall_engine::rendered::CaveRendered) -> bool {
    cave.map().iter().all(|(_, _, &cell)| !cell.is_scanned())
}
