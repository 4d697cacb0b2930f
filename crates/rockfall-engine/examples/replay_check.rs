//! Record a short game on a generated cave, then re-validate the replay.
//!
//! Run with `RUST_LOG=debug` to watch the engine's state transitions and
//! the validator's verdict.

use tracing_subscriber::EnvFilter;

use rockfall_cave::prelude::*;
use rockfall_engine::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // a classic generated cave: dirt with scattered stones and diamonds
    let mut stored = CaveStored::default();
    stored.name = "Replay demo".to_owned();
    stored.level_diamonds = [5; 5];
    stored.random_fill = [
        (Element::Space, 50),
        (Element::Stone, 100),
        (Element::Diamond, 120),
        (Element::Dirt, 0),
    ];
    stored.objects.push(CaveObject::Point {
        seen_on: CaveObject::ALL_LEVELS,
        p: Coord::new(3, 3),
        element: Element::Inbox,
    });
    stored.objects.push(CaveObject::Point {
        seen_on: CaveObject::ALL_LEVELS,
        p: Coord::new(36, 18),
        element: Element::PreOutbox,
    });

    let mut cave = CaveRendered::render(&stored, 1, 1234)?;
    let mut recorder = ReplayRecorder::new(&cave);

    // a scripted little walk
    let script = [
        Dir::Still,
        Dir::Still,
        Dir::Right,
        Dir::Right,
        Dir::Down,
        Dir::Down,
        Dir::Right,
        Dir::Down,
        Dir::Left,
        Dir::Down,
    ];
    for i in 0..200 {
        let dir = script[i % script.len()];
        let applied = cave.iterate(dir, false, false);
        recorder.record(applied, false, false);
        if cave.player_state() == PlayerState::Exited {
            break;
        }
    }

    println!(
        "recorded {} ticks: state={:?} diamonds={} score={}",
        recorder.len(),
        cave.player_state(),
        cave.diamonds_collected(),
        cave.score(),
    );

    let mut replay = recorder.finish(&cave);
    let report = validate_replay(&stored, &mut replay)?;
    println!(
        "replay check: {} ({} ticks, hash {})",
        if report.matches() { "ok" } else { "PROBLEMATIC" },
        report.ticks,
        &report.state_hash[..16],
    );
    Ok(())
}
