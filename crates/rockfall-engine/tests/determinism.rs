//! Determinism and engine invariants.

mod common;

use common::{cave_from_ascii, count_element, no_scanned_cells};
use rockfall_cave::prelude::*;
use rockfall_engine::prelude::*;

/// A busy cave exercising most rule families.
fn busy_cave() -> CaveStored {
    let mut stored = cave_from_ascii(&[
        "SSSSSSSSSSSS", //
        "SP.D.O...ddS", //
        "Sd.d.d.d.d.S", //
        "S..D..F...dS", //
        "Sd.d.d.d.B.S", //
        "S...O....d.S", //
        "Sd.A.d.d.ddS", //
        "S....O...d.S", //
        "SSSSSSSSSSSS",
    ]);
    stored.level_diamonds = [2; 5];
    stored
}

const MOVES: [Dir; 8] = [
    Dir::Right,
    Dir::Right,
    Dir::Down,
    Dir::Still,
    Dir::Left,
    Dir::Down,
    Dir::Up,
    Dir::Right,
];

fn run(stored: &CaveStored, seed: i32, ticks: usize) -> (String, i32, i32, PlayerState) {
    let mut cave = CaveRendered::render(stored, 1, seed).unwrap();
    for i in 0..ticks {
        cave.iterate(MOVES[i % MOVES.len()], i % 5 == 0, false);
    }
    (
        cave.state_hash(),
        cave.score(),
        cave.diamonds_collected(),
        cave.player_state(),
    )
}

// -- 1. Determinism ------------------------------------------------------

#[test]
fn identical_runs_reach_identical_states() {
    let stored = busy_cave();
    let a = run(&stored, 42, 200);
    let b = run(&stored, 42, 200);
    assert_eq!(a, b);
}

#[test]
fn different_seeds_usually_differ() {
    // not a strict requirement, but a sanity check that the seed matters
    let stored = busy_cave();
    let a = run(&stored, 1, 100);
    let b = run(&stored, 2, 100);
    // the cave has a literal map, so only RNG-driven rules differ; the
    // state hash covers the RNG, which must at least have diverged
    assert_ne!(a.0, b.0);
}

#[test]
fn checksum_is_stable_across_renders() {
    let stored = busy_cave();
    let a = CaveRendered::render(&stored, 1, 42).unwrap();
    let b = CaveRendered::render(&stored, 1, 42).unwrap();
    assert_eq!(a.checksum(), b.checksum());
    assert_eq!(a.state_hash(), b.state_hash());
}

// -- 2. Scanned-twin cleanliness -----------------------------------------

#[test]
fn no_scanned_cells_survive_a_tick() {
    let stored = busy_cave();
    let mut cave = CaveRendered::render(&stored, 1, 99).unwrap();
    for i in 0..300 {
        cave.iterate(MOVES[i % MOVES.len()], false, false);
        assert!(no_scanned_cells(&cave), "scanned cell left after tick {i}");
    }
}

// -- 3. Gate and magic wall monotonicity ---------------------------------

#[test]
fn gate_stays_open() {
    let stored = busy_cave();
    let mut cave = CaveRendered::render(&stored, 1, 7).unwrap();
    let mut was_open = false;
    for i in 0..400 {
        cave.iterate(MOVES[i % MOVES.len()], false, false);
        if was_open {
            assert!(cave.gate_open(), "gate closed again at tick {i}");
        }
        was_open |= cave.gate_open();
    }
}

#[test]
fn magic_wall_never_goes_backwards() {
    let mut stored = cave_from_ascii(&[
        "SSSSS", //
        "SdOdS", //
        "Sd.dS", //
        "SdMdS", //
        "Sd.dS", //
        "SSSSS",
    ]);
    stored.level_magic_wall_time = [1; 5];
    let mut cave = CaveRendered::render(&stored, 1, 3).unwrap();
    let mut last = cave.magic_wall_state();
    for _ in 0..50 {
        cave.iterate(Dir::Still, false, false);
        let now = cave.magic_wall_state();
        let order = |s| match s {
            MagicWallState::Dormant => 0,
            MagicWallState::Active => 1,
            MagicWallState::Expired => 2,
        };
        assert!(order(now) >= order(last));
        last = now;
    }
    assert_eq!(last, MagicWallState::Expired);
}

// -- 4. Amoeba conservation ----------------------------------------------

#[test]
fn amoeba_without_growth_probability_is_stable() {
    let mut stored = cave_from_ascii(&[
        "SSSSSS", //
        "SddddS", //
        "SdAAdS", //
        "SdAddS", //
        "SddddS", //
        "SSSSSS",
    ]);
    stored.amoeba_growth_prob = 0;
    stored.amoeba_fast_growth_prob = 0;
    stored.level_amoeba_time = [999; 5];

    let mut cave = CaveRendered::render(&stored, 1, 17).unwrap();
    let initial = count_element(&cave, Element::Amoeba);
    assert_eq!(initial, 3);
    for _ in 0..100 {
        cave.iterate(Dir::Still, false, false);
        assert_eq!(count_element(&cave, Element::Amoeba), initial);
    }
    assert_eq!(cave.amoeba_state(), AmoebaState::Awake);
}

// -- 5. Diamond accounting -----------------------------------------------

#[test]
fn no_ghost_diamonds_appear() {
    // a cave with no diamond-birthing elements (no butterflies, no
    // amoeba): diamonds on the map plus collected ones never increase
    let stored = cave_from_ascii(&[
        "SSSSSSSSSS", //
        "SP.D.O..dS", //
        "Sd.d.d.ddS", //
        "S..D...F.S", //
        "Sd.d.O.d.S", //
        "SSSSSSSSSS",
    ]);
    let mut cave = CaveRendered::render(&stored, 1, 23).unwrap();
    let total = |cave: &CaveRendered| {
        count_element(cave, Element::Diamond) as i32
            + count_element(cave, Element::DiamondF) as i32
            + cave.diamonds_collected()
    };
    let initial = total(&cave);
    for i in 0..200 {
        cave.iterate(MOVES[i % MOVES.len()], false, false);
        assert!(total(&cave) <= initial, "diamonds multiplied at tick {i}");
    }
}

// -- 6. Stone roll symmetry ----------------------------------------------

#[test]
fn stone_rolls_left_off_an_up_left_slope() {
    let stored = cave_from_ascii(&[
        "SSSSS", //
        "S.O.S", //
        "S./.S", //
        "S...S", //
        "SSSSS",
    ]);
    let mut cave = CaveRendered::render(&stored, 1, 1).unwrap();
    cave.iterate(Dir::Still, false, false);
    assert_eq!(cave.map().at(1, 1), Element::StoneF);
    assert_eq!(cave.map().at(2, 1), Element::Space);
}

#[test]
fn stone_rolls_right_off_an_up_right_slope() {
    let stored = cave_from_ascii(&[
        "SSSSS", //
        "S.O.S", //
        "S.\\.S", //
        "S...S", //
        "SSSSS",
    ]);
    let mut cave = CaveRendered::render(&stored, 1, 1).unwrap();
    cave.iterate(Dir::Still, false, false);
    assert_eq!(cave.map().at(3, 1), Element::StoneF);
    assert_eq!(cave.map().at(2, 1), Element::Space);
}

// -- 7. Diagonal rectification -------------------------------------------

#[test]
fn diagonals_rectify_to_horizontal() {
    let stored = cave_from_ascii(&[
        "SSSSS", //
        "S.P.S", //
        "S...S", //
        "SSSSS",
    ]);
    let mut cave = CaveRendered::render(&stored, 1, 1).unwrap();
    let applied = cave.iterate(Dir::UpLeft, false, false);
    assert_eq!(applied, Dir::Left);
    assert_eq!(cave.map().at(1, 1), Element::Player);
    assert_eq!(cave.map().at(2, 1), Element::Space);
}

#[test]
fn diagonals_kept_when_enabled() {
    let mut stored = cave_from_ascii(&[
        "SSSSS", //
        "S...S", //
        "S.P.S", //
        "S...S", //
        "SSSSS",
    ]);
    stored.policy.diagonal_movements = true;
    let mut cave = CaveRendered::render(&stored, 1, 1).unwrap();
    let applied = cave.iterate(Dir::UpLeft, false, false);
    assert_eq!(applied, Dir::UpLeft);
    assert_eq!(cave.map().at(1, 1), Element::Player);
}

// -- 8. Time never goes negative -----------------------------------------

#[test]
fn time_is_clamped_at_zero() {
    let mut stored = cave_from_ascii(&[
        "SSSS", //
        "SPdS", //
        "SSSS",
    ]);
    stored.level_time = [2; 5];
    stored.level_speed = [700; 5];
    let mut cave = CaveRendered::render(&stored, 1, 1).unwrap();
    for _ in 0..10 {
        cave.iterate(Dir::Still, false, false);
        assert!(cave.time() >= 0);
    }
    assert_eq!(cave.player_state(), PlayerState::Timeout);
}
