//! End-to-end cave scenarios: small hand-built caves played for a few
//! ticks, checking the externally observable outcome.

mod common;

use common::{cave_from_ascii, count_element, no_scanned_cells};
use rockfall_cave::prelude::*;
use rockfall_engine::prelude::*;

// -- 1. Basic pickup -----------------------------------------------------

#[test]
fn pickup_diamond_and_exit() {
    let mut stored = cave_from_ascii(&[
        "SSSSS", //
        "S.PDX", //
        "SSSSS",
    ]);
    stored.level_diamonds = [1; 5];

    let mut cave = CaveRendered::render(&stored, 1, 7).unwrap();
    cave.iterate(Dir::Right, false, false);
    assert_eq!(cave.diamonds_collected(), 1);
    assert!(cave.gate_open());
    assert_eq!(cave.player_state(), PlayerState::Living);

    cave.iterate(Dir::Right, false, false);
    assert_eq!(cave.player_state(), PlayerState::Exited);
    assert_eq!(cave.score(), stored.diamond_value);
}

#[test]
fn closed_outbox_blocks_the_player() {
    // no diamond collected: the literal outbox stays, but an unopened
    // pre-outbox never becomes walkable
    let stored = cave_from_ascii(&[
        "SSSSS", //
        "S.Px.", //
        "SSSSS",
    ]);
    let mut cave = CaveRendered::render(&stored, 1, 7).unwrap();
    for _ in 0..5 {
        cave.iterate(Dir::Right, false, false);
    }
    assert_eq!(cave.player_state(), PlayerState::Living);
    assert_eq!(cave.map().at(3, 1), Element::PreOutbox);
}

// -- 2. Stone push -------------------------------------------------------

#[test]
fn push_stone_with_certainty() {
    let mut stored = cave_from_ascii(&[
        "SSSSSS", //
        "SPO..S", //
        "SSSSSS",
    ]);
    stored.pushing_stone_prob = PROBABILITY_MAX;

    let mut cave = CaveRendered::render(&stored, 1, 3).unwrap();
    cave.iterate(Dir::Right, false, false);

    assert_eq!(cave.map().at(3, 1), Element::Stone);
    assert_eq!(cave.map().at(2, 1), Element::Player);
    assert_eq!(cave.map().at(1, 1), Element::Space);
}

#[test]
fn push_without_probability_never_moves() {
    let mut stored = cave_from_ascii(&[
        "SSSSSS", //
        "SPO..S", //
        "SSSSSS",
    ]);
    stored.pushing_stone_prob = 0;

    let mut cave = CaveRendered::render(&stored, 1, 3).unwrap();
    for _ in 0..10 {
        cave.iterate(Dir::Right, false, false);
    }
    assert_eq!(cave.map().at(2, 1), Element::Stone);
    assert_eq!(cave.map().at(1, 1), Element::Player);
}

// -- 3. Falling stone crushes a firefly ----------------------------------

#[test]
fn falling_stone_explodes_firefly() {
    // the firefly is boxed in by dirt, so it turns in place until hit
    let stored = cave_from_ascii(&[
        "SSSSS", //
        "SdOdS", //
        "Sd.dS", //
        "SdFdS", //
        "SdddS", //
        "SSSSS",
    ]);
    let mut cave = CaveRendered::render(&stored, 1, 11).unwrap();

    // stone starts falling, falls one cell, then crushes
    cave.iterate(Dir::Still, false, false);
    assert_eq!(cave.map().at(2, 2), Element::StoneF);
    cave.iterate(Dir::Still, false, false);
    // the whole 3x3 around the firefly ignites
    assert_eq!(count_element(&cave, Element::Explode1), 9);

    // let the explosion play out: all stages end in the explosion effect
    for _ in 0..8 {
        cave.iterate(Dir::Still, false, false);
    }
    assert_eq!(count_element(&cave, Element::StoneF), 0);
    assert_eq!(count_element(&cave, Element::Firefly1), 0);
    assert_eq!(cave.map().at(2, 3), Element::Space);
    assert!(no_scanned_cells(&cave));
}

// -- 4. Magic wall -------------------------------------------------------

#[test]
fn magic_wall_turns_stone_to_diamond() {
    let mut stored = cave_from_ascii(&[
        "SSSSS", //
        "SdOdS", //
        "Sd.dS", //
        "SdMdS", //
        "Sd.dS", //
        "Sd.dS", //
        "SSSSS",
    ]);
    stored.level_magic_wall_time = [1; 5];

    let mut cave = CaveRendered::render(&stored, 1, 5).unwrap();
    assert_eq!(cave.magic_wall_state(), MagicWallState::Dormant);

    // fall to just above the wall, then into it
    cave.iterate(Dir::Still, false, false);
    cave.iterate(Dir::Still, false, false);
    assert_eq!(cave.magic_wall_state(), MagicWallState::Active);
    // the converted diamond emerges two cells below the stone, falling
    assert_eq!(cave.map().at(2, 4), Element::DiamondF);
    assert_eq!(count_element(&cave, Element::Stone), 0);
    assert_eq!(count_element(&cave, Element::StoneF), 0);

    // the diamond settles, and one second of milling expires the wall
    let mut seen_diamond = false;
    for _ in 0..20 {
        cave.iterate(Dir::Still, false, false);
        seen_diamond |= cave.map().at(2, 5) == Element::Diamond;
    }
    assert!(seen_diamond);
    assert_eq!(cave.magic_wall_state(), MagicWallState::Expired);
}

#[test]
fn expired_magic_wall_swallows_without_converting() {
    let mut stored = cave_from_ascii(&[
        "SSSSS", //
        "SdOdS", //
        "Sd.dS", //
        "SdMdS", //
        "Sd.dS", //
        "Sd.dS", //
        "SSSSS",
    ]);
    stored.level_magic_wall_time = [0; 5];
    stored.policy.magic_timer_wait_for_hatching = false;

    let mut cave = CaveRendered::render(&stored, 1, 5).unwrap();
    // a zero milling time: active for the tick it is hit, then expired
    for _ in 0..10 {
        cave.iterate(Dir::Still, false, false);
    }
    assert_eq!(cave.magic_wall_state(), MagicWallState::Expired);
}

// -- 5. Timeout ----------------------------------------------------------

#[test]
fn running_out_of_time() {
    let mut stored = cave_from_ascii(&[
        "SSS", //
        "SPS", //
        "SSS",
    ]);
    stored.level_time = [1; 5];
    stored.level_speed = [1000; 5];

    let mut cave = CaveRendered::render(&stored, 1, 1).unwrap();
    // first tick hatches the cave; the second burns the whole second
    cave.iterate(Dir::Still, false, false);
    assert_eq!(cave.player_state(), PlayerState::Living);
    cave.iterate(Dir::Still, false, false);
    assert_eq!(cave.player_state(), PlayerState::Timeout);
    assert_eq!(cave.time(), 0);
    assert_eq!(cave.sound2().sound, Sound::Timeout);
}

// -- 6. Replay revalidation ----------------------------------------------

#[test]
fn replay_reproduces_the_recorded_outcome() {
    let mut stored = cave_from_ascii(&[
        "SSSSSSSSSS", //
        "SP.D.O..dS", //
        "Sd.d.d.ddS", //
        "S..D...F.S", //
        "Sd.d.d.d.S", //
        "S...O....S", //
        "SSSSSSSSSS",
    ]);
    stored.level_diamonds = [2; 5];

    let moves = [
        Dir::Right,
        Dir::Right,
        Dir::Down,
        Dir::Down,
        Dir::Left,
        Dir::Right,
    ];

    let mut cave = CaveRendered::render(&stored, 1, 42).unwrap();
    let mut recorder = ReplayRecorder::new(&cave);
    for i in 0..100 {
        let dir = moves[i % moves.len()];
        let fire = i % 7 == 0;
        let applied = cave.iterate(dir, fire, false);
        recorder.record(applied, fire, false);
    }
    let mut replay = recorder.finish(&cave);
    let recorded_score = replay.recorded.score;

    let report = validate_replay(&stored, &mut replay).unwrap();
    assert!(report.matches(), "replay diverged: {report:?}");
    assert!(!replay.problematic);
    assert_eq!(report.outcome.score, recorded_score);
}

#[test]
fn tampered_replay_is_marked_problematic() {
    let stored = cave_from_ascii(&[
        "SSSSS", //
        "SPdDS", //
        "SSSSS",
    ]);

    let mut cave = CaveRendered::render(&stored, 1, 9).unwrap();
    let mut recorder = ReplayRecorder::new(&cave);
    for _ in 0..3 {
        cave.iterate(Dir::Right, false, false);
        recorder.record(Dir::Right, false, false);
    }
    let mut replay = recorder.finish(&cave);
    // lie about the outcome
    replay.recorded.score += 100;

    let report = validate_replay(&stored, &mut replay).unwrap();
    assert!(!report.matches());
    assert!(replay.problematic);
}
