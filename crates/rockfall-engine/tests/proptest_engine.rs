//! Property tests for the iteration engine.
//!
//! Random seeds and random input sequences against a fixed cave, checking
//! the invariants that must hold after every tick regardless of play.

mod common;

use common::{cave_from_ascii, no_scanned_cells};
use proptest::prelude::*;
use rockfall_cave::prelude::*;
use rockfall_engine::prelude::*;

fn test_cave() -> CaveStored {
    let mut stored = cave_from_ascii(&[
        "SSSSSSSSSS", //
        "SP.D.O..dS", //
        "Sd.d.d.ddS", //
        "S..D..F..S", //
        "Sd.dOd.d.S", //
        "S...A....S", //
        "SSSSSSSSSS",
    ]);
    stored.level_diamonds = [2; 5];
    stored
}

fn dir_strategy() -> impl Strategy<Value = Dir> {
    prop_oneof![
        Just(Dir::Still),
        Just(Dir::Up),
        Just(Dir::Down),
        Just(Dir::Left),
        Just(Dir::Right),
        Just(Dir::UpLeft),
        Just(Dir::UpRight),
        Just(Dir::DownLeft),
        Just(Dir::DownRight),
    ]
}

fn input_strategy() -> impl Strategy<Value = (Dir, bool)> {
    (dir_strategy(), any::<bool>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn two_runs_agree(
        seed in 0i32..65536,
        inputs in prop::collection::vec(input_strategy(), 1..120),
    ) {
        let stored = test_cave();
        let mut a = CaveRendered::render(&stored, 1, seed).unwrap();
        let mut b = CaveRendered::render(&stored, 1, seed).unwrap();
        for &(dir, fire) in &inputs {
            a.iterate(dir, fire, false);
            b.iterate(dir, fire, false);
        }
        prop_assert_eq!(a.state_hash(), b.state_hash());
        prop_assert_eq!(a.score(), b.score());
        prop_assert_eq!(a.diamonds_collected(), b.diamonds_collected());
        prop_assert_eq!(a.player_state(), b.player_state());
    }

    #[test]
    fn invariants_hold_every_tick(
        seed in 0i32..65536,
        inputs in prop::collection::vec(input_strategy(), 1..100),
    ) {
        let stored = test_cave();
        let mut cave = CaveRendered::render(&stored, 1, seed).unwrap();
        let mut gate_was_open = false;
        let mut last_wall = 0u8;
        for &(dir, fire) in &inputs {
            let applied = cave.iterate(dir, fire, false);

            // no scanned twin survives a tick
            prop_assert!(no_scanned_cells(&cave));

            // gate open is terminal until the next render
            if gate_was_open {
                prop_assert!(cave.gate_open());
            }
            gate_was_open |= cave.gate_open();

            // magic wall state only moves forward
            let wall = match cave.magic_wall_state() {
                MagicWallState::Dormant => 0,
                MagicWallState::Active => 1,
                MagicWallState::Expired => 2,
            };
            prop_assert!(wall >= last_wall);
            last_wall = wall;

            // time never goes negative, speed is always positive
            prop_assert!(cave.time() >= 0);
            prop_assert!(cave.speed() > 0);

            // diagonal inputs come back rectified
            prop_assert!(!matches!(
                applied,
                Dir::UpLeft | Dir::UpRight | Dir::DownLeft | Dir::DownRight
            ));
        }
    }

    #[test]
    fn replays_validate_for_any_input(
        seed in 0i32..65536,
        inputs in prop::collection::vec(input_strategy(), 1..80),
    ) {
        let stored = test_cave();
        let mut cave = CaveRendered::render(&stored, 1, seed).unwrap();
        let mut recorder = ReplayRecorder::new(&cave);
        for &(dir, fire) in &inputs {
            let applied = cave.iterate(dir, fire, false);
            recorder.record(applied, fire, false);
        }
        let mut replay = recorder.finish(&cave);
        let report = validate_replay(&stored, &mut replay).unwrap();
        prop_assert!(report.matches());
        prop_assert!(!replay.problematic);
    }
}
