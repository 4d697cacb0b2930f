//! Benchmark of the per-tick scan on a busy cave.

use criterion::{criterion_group, criterion_main, Criterion};

use rockfall_cave::prelude::*;
use rockfall_engine::prelude::*;

/// A full-size cave (40x22) with plenty of moving elements.
fn busy_cave() -> CaveStored {
    let mut stored = CaveStored::default();
    stored.name = "bench".to_owned();
    stored.level_diamonds = [20; 5];
    stored.random_fill = [
        (Element::Space, 60),
        (Element::Stone, 110),
        (Element::Diamond, 130),
        (Element::Firefly1, 140),
    ];
    stored.objects.push(CaveObject::Point {
        seen_on: CaveObject::ALL_LEVELS,
        p: Coord::new(2, 2),
        element: Element::Inbox,
    });
    stored.objects.push(CaveObject::Point {
        seen_on: CaveObject::ALL_LEVELS,
        p: Coord::new(37, 19),
        element: Element::PreOutbox,
    });
    stored
}

fn bench_iterate(c: &mut Criterion) {
    let stored = busy_cave();

    c.bench_function("iterate_busy_cave", |b| {
        let mut cave = CaveRendered::render(&stored, 1, 42).unwrap();
        let mut tick = 0u64;
        b.iter(|| {
            let dir = match tick % 4 {
                0 => Dir::Right,
                1 => Dir::Down,
                2 => Dir::Left,
                _ => Dir::Up,
            };
            tick += 1;
            std::hint::black_box(cave.iterate(dir, false, false));
        });
    });

    c.bench_function("render_generated_cave", |b| {
        b.iter(|| std::hint::black_box(CaveRendered::render(&stored, 1, 42).unwrap()));
    });
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
