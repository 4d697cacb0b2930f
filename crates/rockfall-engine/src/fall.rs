//! Falling and rolling.
//!
//! Standing solids try to start falling each tick; falling ones run an
//! ordered list of attempts: crush the voodoo, crack a nut, enter the
//! magic wall, crush whatever explodes by hit, and finally roll off a
//! slope or come to rest. Flying stones and diamonds use the same rules
//! with the fall direction reversed.
//!
//! Rolling direction note: when falling down, "rolling left" is the fall
//! direction rotated *clockwise*, because the screen y axis grows down.

use rockfall_cave::prelude::*;

use crate::rendered::{CaveRendered, MagicWallState};

impl CaveRendered {
    /// Try to make a standing element start falling, or roll off a slope.
    pub(crate) fn do_start_fall(
        &mut self,
        x: i32,
        y: i32,
        falling_direction: Dir,
        falling_element: Element,
    ) {
        if self.gravity_disabled {
            return;
        }
        if self.is_like_space(x, y, falling_direction) {
            // no particles when only starting to fall, but sound yes
            let e = self.get(x, y);
            self.sound_of_element(e, x, y, false);
            self.move_dir(x, y, falling_direction, falling_element);
        } else if self.sloped(x, y, falling_direction, falling_direction.opposite()) {
            if self.sloped(x, y, falling_direction, falling_direction.cw_90())
                && self.is_like_space(x, y, falling_direction.cw_90())
                && self.is_like_space(x, y, falling_direction.cw_45())
            {
                let e = self.get(x, y);
                self.sound_of_element(e, x, y, false);
                self.move_dir(x, y, falling_direction.cw_90(), falling_element);
            } else if self.sloped(x, y, falling_direction, falling_direction.ccw_90())
                && self.is_like_space(x, y, falling_direction.ccw_90())
                && self.is_like_space(x, y, falling_direction.ccw_45())
            {
                let e = self.get(x, y);
                self.sound_of_element(e, x, y, false);
                self.move_dir(x, y, falling_direction.ccw_90(), falling_element);
            }
        }
    }

    /// 1stB-style voodoo: a stone falling onto it explodes it.
    pub(crate) fn do_fall_try_crush_voodoo(&mut self, x: i32, y: i32, fall_dir: Dir) -> bool {
        if self.get_dir(x, y, fall_dir) == Element::Voodoo
            && self.params.policy.voodoo_dies_by_stone
        {
            self.explode_dir(x, y, fall_dir);
            true
        } else {
            false
        }
    }

    /// 1stB-style voodoo: it collects diamonds falling onto it, as if the
    /// player had taken them.
    pub(crate) fn do_fall_try_eat_voodoo(&mut self, x: i32, y: i32, fall_dir: Dir) -> bool {
        if self.get_dir(x, y, fall_dir) == Element::Voodoo
            && self.params.policy.voodoo_collects_diamonds
        {
            self.player_eat_element(Element::Diamond);
            self.store(x, y, Element::Space);
            true
        } else {
            false
        }
    }

    /// Crack a nut under a falling element; the element bounces.
    pub(crate) fn do_fall_try_crack_nut(
        &mut self,
        x: i32,
        y: i32,
        fall_dir: Dir,
        bouncing: Element,
    ) -> bool {
        let under = self.get_dir(x, y, fall_dir);
        if under == Element::Nut || under == Element::NutF {
            let cracked = self.params.effects.nut_turns_to_when_crushed;
            self.store(x, y, bouncing);
            self.store_dir(x, y, fall_dir, cracked);
            self.sound_play(Sound::NutCrack, x, y);
            true
        } else {
            false
        }
    }

    /// Process a falling element hitting a magic wall. A dormant wall
    /// starts milling; an active one drops the converted element two
    /// cells below (if there is room). The element falling in always
    /// disappears.
    pub(crate) fn do_fall_try_magic(
        &mut self,
        x: i32,
        y: i32,
        fall_dir: Dir,
        magic: Element,
    ) -> bool {
        if self.get_dir(x, y, fall_dir) != Element::MagicWall {
            return false;
        }
        self.sound_of_element(Element::Diamond, x, y, false);
        if self.magic_wall_state == MagicWallState::Dormant {
            self.magic_wall_state = MagicWallState::Active;
            tracing::debug!(cave = %self.params.name, "magic wall activated");
        }
        if self.magic_wall_state == MagicWallState::Active
            && self.is_like_space(x, y, fall_dir.twice())
        {
            self.store_dir(x, y, fall_dir.twice(), magic);
        }
        self.store(x, y, Element::Space);
        true
    }

    /// Crush whatever explodes by hit under a falling element.
    pub(crate) fn do_fall_try_crush(&mut self, x: i32, y: i32, fall_dir: Dir) -> bool {
        if self.explodes_by_hit(x, y, fall_dir) {
            self.explode_dir(x, y, fall_dir);
            true
        } else {
            false
        }
    }

    /// Last step for a falling element: fall on, roll off a slope (left
    /// preferred), or come to rest as its bouncing form. This always does
    /// something, so it must be the last attempt in the chain.
    pub(crate) fn do_fall_roll_or_stop(
        &mut self,
        x: i32,
        y: i32,
        fall_dir: Dir,
        bouncing: Element,
    ) {
        if self.is_like_space(x, y, fall_dir) {
            let e = self.get(x, y);
            self.move_dir(x, y, fall_dir, e);
            return;
        }
        if self.sloped(x, y, fall_dir, fall_dir.opposite()) {
            if self.sloped(x, y, fall_dir, fall_dir.cw_90())
                && self.is_like_space(x, y, fall_dir.cw_45())
                && self.is_like_space(x, y, fall_dir.cw_90())
            {
                let e = self.get(x, y);
                self.sound_of_element(e, x, y, true);
                self.move_dir(x, y, fall_dir.cw_90(), e);
            } else if self.sloped(x, y, fall_dir, fall_dir.ccw_90())
                && self.is_like_space(x, y, fall_dir.ccw_45())
                && self.is_like_space(x, y, fall_dir.ccw_90())
            {
                let e = self.get(x, y);
                self.sound_of_element(e, x, y, true);
                self.move_dir(x, y, fall_dir.ccw_90(), e);
            } else {
                let e = self.get(x, y);
                self.sound_of_element(e, x, y, true);
                self.store(x, y, bouncing);
            }
            return;
        }
        let e = self.get(x, y);
        self.sound_of_element(e, x, y, true);
        self.store(x, y, bouncing);
    }
}
