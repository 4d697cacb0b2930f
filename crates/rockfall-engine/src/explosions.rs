//! Explosion shapes.
//!
//! Creatures and players explode into a 3x3 square, bombs into a +,
//! ghosts into an X, voodoo dolls into steel with a time penalty in the
//! middle. Non-explodable cells survive; a voodoo caught in a blast and a
//! nitro pack caught in any explosion get special treatment. Every shape
//! charges the scheduler for the cells it processed and requests its
//! sound.

use rockfall_cave::prelude::*;

use crate::rendered::CaveRendered;

impl CaveRendered {
    /// Change one cell to an explosion element, honoring non-explodable
    /// cells, the voodoo rules, and triggered nitro packs.
    pub(crate) fn cell_explode(&mut self, x: i32, y: i32, explode_to: Element) {
        if self.non_explodable(x, y) {
            return;
        }
        let e = self.get(x, y);

        if self.params.policy.voodoo_any_hurt_kills_player && e == Element::Voodoo {
            self.voodoo_touched = true;
        }
        if e == Element::Voodoo && !self.params.policy.voodoo_disappear_in_explosion {
            // the doll survives, and the player pays for it in time
            self.store(x, y, Element::TimePenalty);
        } else if e == Element::NitroPack || e == Element::NitroPackF {
            // a nitro pack inside an explosion is now triggered
            self.store(x, y, Element::NitroPackExplode);
        } else {
            self.store_no_particle(x, y, explode_to);
        }
    }

    /// 3x3 explosion around `(x, y)`.
    pub(crate) fn creature_explode(&mut self, x: i32, y: i32, explode_to: Element) {
        // processing 3x3 = 9 cells took its time on the original hardware
        self.ckdelay_current += 1200;
        self.sound_play(Sound::Explosion, x, y);
        for yy in y - 1..=y + 1 {
            for xx in x - 1..=x + 1 {
                self.cell_explode(xx, yy, explode_to);
            }
        }
    }

    /// 3x3 nitro explosion; the center is forced, as [`cell_explode`]
    /// would have re-triggered the pack itself.
    ///
    /// [`cell_explode`]: Self::cell_explode
    pub(crate) fn nitro_explode(&mut self, x: i32, y: i32) {
        self.ckdelay_current += 1200;
        self.sound_play(Sound::NitroExplosion, x, y);
        for yy in y - 1..=y + 1 {
            for xx in x - 1..=x + 1 {
                self.cell_explode(xx, yy, Element::NitroExpl1);
            }
        }
        self.store(x, y, Element::NitroExpl1);
    }

    /// The voodoo explodes into 3x3 steel with a time penalty marker in
    /// the middle.
    pub(crate) fn voodoo_explode(&mut self, x: i32, y: i32) {
        if self.params.policy.voodoo_any_hurt_kills_player {
            self.voodoo_touched = true;
        }
        self.ckdelay_current += 1000;
        self.sound_play(Sound::VoodooExplosion, x, y);
        for yy in y - 1..=y + 1 {
            for xx in x - 1..=x + 1 {
                self.store(xx, yy, Element::PreSteel1);
            }
        }
        self.store(x, y, Element::TimePenalty);
    }

    /// Explode one cell, but leave the voodoo alone -- bombs and ghosts
    /// do not harm it.
    pub(crate) fn cell_explode_skip_voodoo(&mut self, x: i32, y: i32, expl: Element) {
        if self.non_explodable(x, y) {
            return;
        }
        let e = self.get(x, y);
        if !self.params.policy.voodoo_disappear_in_explosion && e == Element::Voodoo {
            return;
        }
        if self.params.policy.voodoo_any_hurt_kills_player && e == Element::Voodoo {
            self.voodoo_touched = true;
        }
        self.store(x, y, expl);
    }

    /// X-shaped ghost explosion: center plus the four diagonals.
    pub(crate) fn ghost_explode(&mut self, x: i32, y: i32) {
        self.ckdelay_current += 650;
        self.sound_play(Sound::GhostExplosion, x, y);
        self.cell_explode_skip_voodoo(x, y, Element::GhostExpl1);
        self.cell_explode_skip_voodoo(x - 1, y - 1, Element::GhostExpl1);
        self.cell_explode_skip_voodoo(x + 1, y + 1, Element::GhostExpl1);
        self.cell_explode_skip_voodoo(x - 1, y + 1, Element::GhostExpl1);
        self.cell_explode_skip_voodoo(x + 1, y - 1, Element::GhostExpl1);
    }

    /// +-shaped bomb explosion.
    pub(crate) fn bomb_explode(&mut self, x: i32, y: i32) {
        self.ckdelay_current += 650;
        self.sound_play(Sound::BombExplosion, x, y);
        self.cell_explode_skip_voodoo(x, y, Element::BombExpl1);
        self.cell_explode_skip_voodoo(x - 1, y, Element::BombExpl1);
        self.cell_explode_skip_voodoo(x + 1, y, Element::BombExpl1);
        self.cell_explode_skip_voodoo(x, y + 1, Element::BombExpl1);
        self.cell_explode_skip_voodoo(x, y - 1, Element::BombExpl1);
    }

    /// Explode whatever sits at `(x, y)`, selecting the shape and the
    /// result elements by its kind.
    pub(crate) fn explode(&mut self, x: i32, y: i32) {
        use Element::*;
        let effects = self.params.effects.clone();
        let mut particles_added = false;
        match self.get(x, y) {
            Ghost => self.ghost_explode(x, y),
            BombTick7 => self.bomb_explode(x, y),
            Voodoo => self.voodoo_explode(x, y),
            NitroPack | NitroPackF | NitroPackExplode => self.nitro_explode(x, y),
            Amoeba2 => self.creature_explode(x, y, Amoeba2Expl1),
            FallingWallF => self.creature_explode(x, y, Explode1),
            Butterfly1 | Butterfly2 | Butterfly3 | Butterfly4 => {
                self.add_particle_set(x, y, PreDia1);
                particles_added = true;
                self.creature_explode(x, y, effects.butterfly_explode_to);
            }
            AltButterfly1 | AltButterfly2 | AltButterfly3 | AltButterfly4 => {
                self.add_particle_set(x, y, PreDia1);
                particles_added = true;
                self.creature_explode(x, y, effects.alt_butterfly_explode_to);
            }
            Firefly1 | Firefly2 | Firefly3 | Firefly4 => {
                self.creature_explode(x, y, effects.firefly_explode_to);
            }
            AltFirefly1 | AltFirefly2 | AltFirefly3 | AltFirefly4 => {
                self.creature_explode(x, y, effects.alt_firefly_explode_to);
            }
            Stonefly1 | Stonefly2 | Stonefly3 | Stonefly4 => {
                self.creature_explode(x, y, effects.stonefly_explode_to);
            }
            Dragonfly1 | Dragonfly2 | Dragonfly3 | Dragonfly4 => {
                self.creature_explode(x, y, effects.dragonfly_explode_to);
            }
            Player | PlayerBomb | PlayerGlued | PlayerStirring | PlayerPneumaticLeft
            | PlayerPneumaticRight => {
                self.creature_explode(x, y, Explode1);
            }
            Cow1 | Cow2 | Cow3 | Cow4 | CowEnclosed1 | CowEnclosed2 | CowEnclosed3
            | CowEnclosed4 | CowEnclosed5 | CowEnclosed6 | CowEnclosed7 => {
                self.creature_explode(x, y, Explode1);
            }
            Biter1 | Biter2 | Biter3 | Biter4 => {
                self.creature_explode(x, y, Explode1);
            }
            other => {
                // the scan only calls this for elements that explode; a
                // miss here is an engine defect, not a cave problem
                tracing::error!(element = ?other, x, y, "explode() on non-exploding element");
                self.creature_explode(x, y, Explode1);
            }
        }
        if !particles_added {
            self.add_particle_set(x, y, Explode1);
        }
    }

    /// Explode the neighbor in `dir`.
    pub(crate) fn explode_dir(&mut self, x: i32, y: i32, dir: Dir) {
        self.explode(x + dir.dx(), y + dir.dy());
    }
}
