//! Short-lived particle descriptors emitted on cave events.
//!
//! The engine only *describes* particles; rendering is the caller's
//! business. A [`ParticleSet`] spawns `count` particles scattered around a
//! cave coordinate with randomized positions and velocities, then ages
//! from a life of 1000 ms down to zero under a plain 2-D kinematic model
//! with no collision. Coordinates are in cave cells: `(0, 0)` is the top
//! left corner of the cave, `(1, 1)` the bottom right corner of the top
//! left cell.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::rng::GameRng;

// ---------------------------------------------------------------------------
// Particle
// ---------------------------------------------------------------------------

/// One particle: position and velocity in cave-cell units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub px: f32,
    pub py: f32,
    pub vx: f32,
    pub vy: f32,
}

// ---------------------------------------------------------------------------
// ParticleSet
// ---------------------------------------------------------------------------

/// A set of particles born from a single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSet {
    particles: Vec<Particle>,
    /// Tint for the whole set.
    pub color: Color,
    /// Remaining lifetime in ms, counting down from 1000.
    pub life: i32,
    /// Freshly emitted; the renderer normalizes coordinates once.
    pub is_new: bool,
    /// Particle size in cave-cell units.
    pub size: f32,
    /// Opacity in `0..=1`. Values close to 1 are not recommended.
    pub opacity: f32,
}

impl ParticleSet {
    /// Spawn a new set.
    ///
    /// Particles start uniformly inside the box `center +/- half_extent` and
    /// get a velocity of `base_velocity +/- velocity_spread` (component-wise,
    /// uniform). The RNG is the caller's cosmetic generator; particle
    /// scatter must never consume from the replayed game stream.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rng: &mut GameRng,
        count: usize,
        size: f32,
        opacity: f32,
        x0: f32,
        y0: f32,
        dx0: f32,
        dy0: f32,
        vx0: f32,
        vy0: f32,
        dvx: f32,
        dvy: f32,
        color: Color,
    ) -> Self {
        let mut unit = |spread: f32| {
            // uniform in [-spread, spread]
            let raw = rng.int_range(-10_000, 10_001) as f32 / 10_000.0;
            raw * spread
        };
        let particles = (0..count)
            .map(|_| Particle {
                px: x0 + unit(dx0),
                py: y0 + unit(dy0),
                vx: vx0 + unit(dvx),
                vy: vy0 + unit(dvy),
            })
            .collect();
        ParticleSet {
            particles,
            color,
            life: 1000,
            is_new: true,
            size,
            opacity,
        }
    }

    /// Advance all particles by `dt_ms` milliseconds and age the set.
    pub fn step(&mut self, dt_ms: i32) {
        let dt = dt_ms as f32 / 1000.0;
        for p in &mut self.particles {
            p.px += p.vx * dt;
            p.py += p.vy * dt;
        }
        self.life -= dt_ms;
    }

    /// True once the set has aged out and can be dropped.
    pub fn expired(&self) -> bool {
        self.life <= 0
    }

    /// The particles of the set.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set(rng: &mut GameRng) -> ParticleSet {
        ParticleSet::new(
            rng,
            25,
            0.05,
            0.25,
            3.5,
            2.5,
            0.25,
            0.25,
            0.0,
            0.0,
            2.0,
            2.0,
            Color::DIAMOND_BLUE,
        )
    }

    #[test]
    fn spawns_requested_count_within_box() {
        let mut rng = GameRng::with_seed(1);
        let set = sample_set(&mut rng);
        assert_eq!(set.particles().len(), 25);
        for p in set.particles() {
            assert!((3.25..=3.75).contains(&p.px));
            assert!((2.25..=2.75).contains(&p.py));
            assert!((-2.0..=2.0).contains(&p.vx));
        }
    }

    #[test]
    fn life_counts_down_and_expires() {
        let mut rng = GameRng::with_seed(2);
        let mut set = sample_set(&mut rng);
        assert_eq!(set.life, 1000);
        assert!(!set.expired());
        set.step(400);
        set.step(400);
        assert!(!set.expired());
        set.step(400);
        assert!(set.expired());
    }

    #[test]
    fn kinematics_moves_particles() {
        let mut rng = GameRng::with_seed(3);
        let mut set = ParticleSet::new(
            &mut rng,
            1,
            0.1,
            0.1,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
            -1.0,
            0.0,
            0.0,
            Color::STONE_GRAY,
        );
        set.step(500);
        let p = set.particles()[0];
        assert!((p.px - 0.5).abs() < 1e-5);
        assert!((p.py + 0.5).abs() < 1e-5);
    }
}
