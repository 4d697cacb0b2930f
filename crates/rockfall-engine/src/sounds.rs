//! Per-tick sound arbitration and particle emission.
//!
//! Sounds are requested from inside the scan and compete for three
//! channel slots. A request wins its slot if it has higher precedence, or
//! equal precedence but a position closer to the player. Amoeba and magic
//! wall running together produce the mixed "gritty" sound instead of
//! either of the two.

use rockfall_cave::prelude::*;

use crate::rendered::{CaveRendered, MagicWallState};

impl CaveRendered {
    /// Empty all three sound slots. Called at the start of every tick,
    /// and on timeout, which silences everything but its own sound.
    pub(crate) fn clear_sounds(&mut self) {
        self.sound1 = SoundWithPos::silence();
        self.sound2 = SoundWithPos::silence();
        self.sound3 = SoundWithPos::silence();
    }

    /// Request a sound at a cave position.
    ///
    /// Per-cave sound options can silence element categories entirely;
    /// classic-only mode substitutes or drops non-classic sounds; the
    /// diamond macro sound resolves to a random concrete diamond sample.
    pub(crate) fn sound_play(&mut self, sound: Sound, x: i32, y: i32) {
        let opts = &self.params.sound_options;
        let enabled = match sound {
            Sound::None => false,
            Sound::Water => opts.water_sound,
            Sound::Amoeba => opts.amoeba_sound,
            Sound::MagicWall => opts.magic_wall_sound,
            Sound::Stone => opts.stone_sound,
            Sound::DiamondRandom => opts.diamond_sound,
            Sound::Nut | Sound::NutCrack => opts.nut_sound,
            Sound::Nitro => opts.nitro_sound,
            Sound::FallingWall => opts.falling_wall_sound,
            Sound::ExpandingWall => opts.expanding_wall_sound,
            Sound::BladderSpender => opts.bladder_spender_sound,
            Sound::BladderConvert => opts.bladder_convert_sound,
            Sound::BladderMove => opts.bladder_sound,
            Sound::Slime => opts.slime_sound,
            Sound::Lava => opts.lava_sound,
            Sound::AcidSpread => opts.acid_spread_sound,
            Sound::BiterEat => opts.biter_sound,
            _ => true,
        };
        if !enabled {
            return;
        }

        let mut sound = sound;
        if self.params.sound_options.classic_sounds_only {
            sound = sound.classic_equivalent();
            if sound == Sound::None {
                return;
            }
        }
        if sound == Sound::DiamondRandom {
            // cosmetic choice, not part of replayed state
            let pick = self.aux_rng.int_range(0, 8) as usize;
            sound = Sound::DIAMOND_SOUNDS[pick];
        }

        let slot = match sound.channel() {
            1 => &mut self.sound1,
            2 => &mut self.sound2,
            3 => &mut self.sound3,
            _ => return,
        };

        // amoeba and magic wall together mix into one sound; once mixed,
        // the slot stays mixed (distance checks below still apply).
        let mut sound = sound;
        if (slot.sound == Sound::Amoeba && sound == Sound::MagicWall)
            || (slot.sound == Sound::MagicWall && sound == Sound::Amoeba)
            || slot.sound == Sound::AmoebaMagic
        {
            sound = Sound::AmoebaMagic;
        }

        let dx = x - self.player_x;
        let dy = y - self.player_y;
        let closer = dx * dx + dy * dy < slot.dx * slot.dx + slot.dy * slot.dy;
        if sound.precedence() > slot.sound.precedence()
            || (sound.precedence() == slot.sound.precedence() && closer)
            || sound.precedence() >= slot.sound.precedence() && slot.sound == Sound::None
        {
            *slot = SoundWithPos::new(sound, dx, dy);
        }
    }

    /// Request the sound (and usually the particles) of an element doing
    /// its thing: stones and diamonds falling, water and amoeba ambience,
    /// bladders moving and so on.
    pub(crate) fn sound_of_element(&mut self, element: Element, x: i32, y: i32, particles: bool) {
        use Element::*;
        match element {
            Water => self.sound_play(Sound::Water, x, y),
            Amoeba => self.sound_play(Sound::Amoeba, x, y),
            MagicWall => {
                self.sound_play(Sound::MagicWall, x, y);
                if particles {
                    self.add_particle_set(x, y, MagicWall);
                }
            }
            Stone | StoneF | FlyingStone | FlyingStoneF | MegaStone | MegaStoneF
            | WaitingStone | ChasingStone => {
                self.sound_play(Sound::Stone, x, y);
                if particles {
                    self.add_particle_set(x, y, Stone);
                }
            }
            Diamond | DiamondF | FlyingDiamond | FlyingDiamondF => {
                self.sound_play(Sound::DiamondRandom, x, y);
                if particles {
                    self.add_particle_set(x, y, Diamond);
                }
            }
            Nut | NutF => self.sound_play(Sound::Nut, x, y),
            NitroPack | NitroPackF => self.sound_play(Sound::Nitro, x, y),
            FallingWall | FallingWallF => self.sound_play(Sound::FallingWall, x, y),
            HExpandingWall | VExpandingWall | ExpandingWall | HExpandingSteelWall
            | VExpandingSteelWall | ExpandingSteelWall => {
                self.sound_play(Sound::ExpandingWall, x, y)
            }
            BladderSpender => self.sound_play(Sound::BladderSpender, x, y),
            PreClock1 => self.sound_play(Sound::BladderConvert, x, y),
            Slime => self.sound_play(Sound::Slime, x, y),
            Lava => self.sound_play(Sound::Lava, x, y),
            Acid => self.sound_play(Sound::AcidSpread, x, y),
            Bladder => self.sound_play(Sound::BladderMove, x, y),
            Biter1 | Biter2 | Biter3 | Biter4 => self.sound_play(Sound::BiterEat, x, y),
            DirtBall | DirtBallF | DirtLoose | DirtLooseF => {
                self.sound_play(Sound::DirtBall, x, y)
            }
            _ => {}
        }
    }

    /// Emit the countdown sound for the displayed second. The integer
    /// division makes "zero seconds" cover the last fraction of a second,
    /// and "eight" plays when almost nine seconds remain.
    pub(crate) fn set_seconds_sound(&mut self) {
        let (px, py) = (self.player_x, self.player_y);
        match self.time / self.params.timing_factor {
            8 => self.sound_play(Sound::Timeout1, px, py),
            7 => self.sound_play(Sound::Timeout2, px, py),
            6 => self.sound_play(Sound::Timeout3, px, py),
            5 => self.sound_play(Sound::Timeout4, px, py),
            4 => self.sound_play(Sound::Timeout5, px, py),
            3 => self.sound_play(Sound::Timeout6, px, py),
            2 => self.sound_play(Sound::Timeout7, px, py),
            1 => self.sound_play(Sound::Timeout8, px, py),
            0 => self.sound_play(Sound::Timeout9, px, py),
            _ => {}
        }
    }

    /// Append the particle set for an event at a cave cell.
    ///
    /// Sizes and velocities depend on gravity: stones falling sideways
    /// under rotated gravity scatter perpendicular to their motion, which
    /// is why the gravity components are swapped in some expressions.
    pub(crate) fn add_particle_set(&mut self, x: i32, y: i32, kind: Element) {
        if !self.particle_effects {
            return;
        }
        let gx = self.gravity.dx() as f32;
        let gy = self.gravity.dy() as f32;
        let fx = x as f32;
        let fy = y as f32;
        let rng = &mut self.aux_rng;
        let set = match kind {
            Element::Dirt => ParticleSet::new(
                rng,
                75,
                0.1,
                0.15,
                fx + 0.5,
                fy + 0.5,
                0.5,
                0.5,
                0.0,
                0.0,
                1.0,
                1.0,
                Color::DIRT_BROWN,
            ),
            Element::Stone => ParticleSet::new(
                rng,
                75,
                0.1,
                0.15,
                fx + 0.5 + 0.5 * gx,
                fy + 0.5 + 0.5 * gy,
                0.25 + 0.25 * gy,
                0.25 + 0.25 * gx,
                0.5 * gx,
                0.5 * gy,
                1.0 + gy,
                1.0 + gx,
                Color::STONE_GRAY,
            ),
            Element::Diamond => ParticleSet::new(
                rng,
                25,
                0.05,
                0.25,
                fx + 0.5,
                fy + 0.5,
                0.25,
                0.25,
                0.0,
                0.0,
                2.0,
                2.0,
                Color::DIAMOND_BLUE,
            ),
            Element::Explode1 => ParticleSet::new(
                rng,
                300,
                0.05,
                0.5,
                fx + 0.5,
                fy + 0.5,
                1.0,
                1.0,
                0.0,
                0.0,
                4.0,
                4.0,
                Color::EXPLOSION_YELLOW,
            ),
            Element::PreDia1 => ParticleSet::new(
                rng,
                300,
                0.05,
                0.5,
                fx + 0.5,
                fy + 0.5,
                1.0,
                1.0,
                0.0,
                0.0,
                4.0,
                4.0,
                Color::DIAMOND_BLUE,
            ),
            Element::MagicWall => ParticleSet::new(
                rng,
                25,
                0.01,
                0.25,
                fx + 0.5,
                fy + 0.5,
                0.5,
                0.5,
                0.0,
                0.0,
                1.0 + gx,
                1.0 + gy,
                Color::MAGIC_PURPLE,
            ),
            Element::Lava => ParticleSet::new(
                rng,
                25,
                0.05,
                0.25,
                fx + 0.5,
                fy + 0.5,
                0.5,
                0.5,
                0.0,
                0.0,
                1.0,
                1.0,
                Color::LAVA_RED,
            ),
            _ => return,
        };
        self.particles.push(set);
    }

    /// Age the particle queue by the current frame time and drop expired
    /// sets.
    pub(crate) fn step_particles(&mut self) {
        let dt = self.speed;
        for set in &mut self.particles {
            set.step(dt);
        }
        self.particles.retain(|p| !p.expired());
    }

    /// The magic wall hums while it is milling.
    pub(crate) fn magic_wall_sound(&mut self, x: i32, y: i32) {
        if self.magic_wall_state == MagicWallState::Active {
            self.sound_of_element(Element::MagicWall, x, y, true);
        }
    }
}
