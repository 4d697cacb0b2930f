//! The per-tick cave iteration.
//!
//! One call to [`CaveRendered::iterate`] advances the cave a single tick:
//! pre-scan housekeeping, the row-major scan dispatching on every element,
//! the post-scan passes, the scheduler, and the timer cascade. The scan
//! visits cells from `(0, ymin)` to `(w-1, ymax)`; the scanned-twin
//! mechanism guarantees each element is processed exactly once regardless
//! of how it moves.
//!
//! Call order matters everywhere in here: the two RNGs must be consumed
//! in exactly this order, or recorded replays diverge.

use rockfall_cave::prelude::*;

use crate::rendered::{AmoebaState, CaveRendered, MagicWallState, PlayerState, PLAYER_MEM};

/// Facing tables for four-direction creatures: normal and backwards.
const CREATURE_DIR: [Dir; 4] = [Dir::Left, Dir::Up, Dir::Right, Dir::Down];
const CREATURE_CHDIR: [Dir; 4] = [Dir::Right, Dir::Down, Dir::Left, Dir::Up];

/// Biter facings, in their own order.
const BITER_MOVE: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

fn biter_facing(dir: usize) -> Element {
    [
        Element::Biter1,
        Element::Biter2,
        Element::Biter3,
        Element::Biter4,
    ][dir & 3]
}

/// What a ghost explosion's last stage may leave behind.
const GHOST_EXPLODE_TO: [Element; 16] = [
    Element::Space,
    Element::Space,
    Element::Dirt,
    Element::Dirt,
    Element::Clock,
    Element::Clock,
    Element::PreOutbox,
    Element::Bomb,
    Element::Bomb,
    Element::Player,
    Element::Ghost,
    Element::Bladder,
    Element::Diamond,
    Element::Sweet,
    Element::WaitingStone,
    Element::Biter1,
];

impl CaveRendered {
    /// Advance the cave by one tick.
    ///
    /// Returns the move direction actually applied, which differs from
    /// `player_move` when diagonal movement is disabled; storing the
    /// rectified direction keeps recorded replays tidy.
    pub fn iterate(&mut self, player_move: Dir, player_fire: bool, suicide: bool) -> Dir {
        use Element::*;

        let policy = self.params.policy.clone();
        let effects = self.params.effects.clone();
        let (w, h) = (self.params.w, self.params.h);

        self.clear_sounds();

        let grav_compat = if policy.gravity_affects_all {
            self.gravity
        } else {
            Dir::Down
        };

        // without diagonal movement, horizontal wins
        let player_move = if policy.diagonal_movements {
            player_move
        } else {
            player_move.rectify_horizontal()
        };

        // the scan clears this when it sees the player
        if self.player_seen_ago < 100 {
            self.player_seen_ago += 1;
        }

        if self.pneumatic_hammer_active_delay > 0 {
            self.pneumatic_hammer_active_delay -= 1;
        }

        // inboxes flash with the rhythm of the game, not the display; a
        // player is born only from an open inbox
        self.inbox_flash_toggle = !self.inbox_flash_toggle;
        let mut inbox_toggle = self.inbox_flash_toggle;

        if self.gate_open_flash > 0 {
            self.gate_open_flash -= 1;
        }

        // suicide kills only the active player, and only if he is there
        if suicide
            && self.player_state == PlayerState::Living
            && self.is_player(self.player_x, self.player_y)
        {
            let (px, py) = (self.player_x, self.player_y);
            self.store(px, py, Explode1);
        }

        if policy.hammered_walls_reappear {
            for y in 0..h {
                for x in 0..w {
                    let t = *self.hammered_reappear.get(x, y);
                    if t > 0 {
                        self.hammered_reappear.set(x, y, t - 1);
                        if t - 1 == 0 {
                            self.store(x, y, Brick);
                            self.sound_play(Sound::WallReappear, x, y);
                        }
                    }
                }
            }
        }

        // cleared by any amoeba cell that still has room to grow
        let mut amoeba_found_enclosed = true;
        let mut amoeba_2_found_enclosed = true;
        let mut amoeba_count = 0;
        let mut amoeba_2_count = 0;
        self.ckdelay_current = 0;
        let mut time_decrement_sec = 0;

        let (ymin, ymax) = if policy.border_scan_first_and_last {
            (0, h - 1)
        } else {
            (1, h - 2)
        };

        // ------------------------------------------------------------------
        // the cave scan
        // ------------------------------------------------------------------
        for y in ymin..=ymax {
            for x in 0..w {
                // an element that was moved into a cell ahead of the
                // cursor is skipped and unflipped; it was processed
                if self.is_scanned(x, y) {
                    self.unscan(x, y);
                    continue;
                }

                self.ckdelay_current += self.get(x, y).ckdelay();

                match self.get(x, y) {
                    // ----------------------------------------------------
                    // players
                    // ----------------------------------------------------
                    Player => {
                        if self.kill_player {
                            self.explode(x, y);
                        } else {
                            self.player_seen_ago = 0;
                            // bd4 intermissions have several players; once
                            // one exited, the state must not flip back
                            if self.player_state != PlayerState::Exited {
                                self.player_state = PlayerState::Living;
                            }

                            // starting to hammer: fire held, hammer owned,
                            // free cell beside, solid ground below
                            let mut hammering = false;
                            if player_fire
                                && self.got_pneumatic_hammer
                                && self.is_like_space(x, y, player_move)
                                && !self.is_like_space(x, y, Dir::Down)
                            {
                                if player_move == Dir::Left
                                    && self.can_be_hammered(x, y, Dir::DownLeft)
                                {
                                    self.pneumatic_hammer_active_delay =
                                        self.params.pneumatic_hammer_frame;
                                    self.store_dir(x, y, Dir::Left, PneumaticActiveLeft);
                                    self.store(x, y, PlayerPneumaticLeft);
                                    hammering = true;
                                } else if player_move == Dir::Right
                                    && self.can_be_hammered(x, y, Dir::DownRight)
                                {
                                    self.pneumatic_hammer_active_delay =
                                        self.params.pneumatic_hammer_frame;
                                    self.store_dir(x, y, Dir::Right, PneumaticActiveRight);
                                    self.store(x, y, PlayerPneumaticRight);
                                    hammering = true;
                                }
                            }

                            if !hammering && player_move != Dir::Still {
                                let what = self.get_dir(x, y, player_move);
                                let mut handled = false;

                                if what == Teleporter && self.do_teleporter(x, y, player_move)
                                {
                                    handled = true;
                                }

                                if !handled {
                                    let push = self.do_push(x, y, player_move, player_fire);
                                    let mut remains = if push { Some(Space) } else { None };
                                    if !push {
                                        match what {
                                            Bomb => {
                                                // picking up: he carries it
                                                self.sound_play(Sound::BombCollect, x, y);
                                                self.store_dir(x, y, player_move, Space);
                                                if player_fire {
                                                    self.store(x, y, PlayerBomb);
                                                } else {
                                                    self.move_dir(
                                                        x,
                                                        y,
                                                        player_move,
                                                        PlayerBomb,
                                                    );
                                                }
                                                handled = true;
                                            }
                                            Pot => {
                                                if !player_fire
                                                    && !self.gravity_switch_active
                                                    && self.skeletons_collected
                                                        >= self.params.skeletons_needed_for_pot
                                                {
                                                    self.skeletons_collected -=
                                                        self.params.skeletons_needed_for_pot;
                                                    self.move_dir(
                                                        x,
                                                        y,
                                                        player_move,
                                                        PlayerStirring,
                                                    );
                                                    self.gravity_disabled = true;
                                                }
                                                handled = true;
                                            }
                                            GravitySwitch => {
                                                if self.gravity_switch_active
                                                    && player_move.is_cardinal()
                                                {
                                                    self.sound_play(
                                                        Sound::SwitchGravity,
                                                        x,
                                                        y,
                                                    );
                                                    self.gravity_will_change = self
                                                        .params
                                                        .gravity_change_time
                                                        * self.params.timing_factor;
                                                    self.gravity_next_direction = player_move;
                                                    self.gravity_switch_active = false;
                                                }
                                                handled = true;
                                            }
                                            _ => {
                                                remains = self.player_eat_element(what);
                                            }
                                        }
                                    }

                                    if !handled {
                                        if let Some(mut remains) = remains {
                                            // snapping with fire leaves the
                                            // snap element, not plain space
                                            if remains == Space && player_fire && !push {
                                                remains = effects.snap_element;
                                            }
                                            if remains != Space || player_fire {
                                                self.store_dir(x, y, player_move, remains);
                                            } else {
                                                self.move_dir(x, y, player_move, Player);
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }

                    PlayerBomb => {
                        // simpler: a bomb-carrying player cannot snap-push
                        if self.kill_player {
                            self.explode(x, y);
                        } else {
                            self.player_seen_ago = 0;
                            if self.player_state != PlayerState::Exited {
                                self.player_state = PlayerState::Living;
                            }

                            if player_move != Dir::Still {
                                if player_fire {
                                    // place the bomb into space or dirt
                                    if self.is_like_space(x, y, player_move)
                                        || self.is_like_dirt(x, y, player_move)
                                    {
                                        self.store_dir(x, y, player_move, BombTick1);
                                        self.store(x, y, Player);
                                        self.sound_play(Sound::BombPlace, x, y);
                                    }
                                } else {
                                    let what = self.get_dir(x, y, player_move);
                                    let mut handled = false;
                                    if what == Teleporter
                                        && self.do_teleporter(x, y, player_move)
                                    {
                                        handled = true;
                                    }
                                    if !handled {
                                        let remains = if self.do_push(x, y, player_move, false)
                                        {
                                            Some(Space)
                                        } else {
                                            match what {
                                                GravitySwitch => {
                                                    if self.gravity_switch_active
                                                        && player_move.is_cardinal()
                                                    {
                                                        self.sound_play(
                                                            Sound::SwitchGravity,
                                                            x,
                                                            y,
                                                        );
                                                        self.gravity_will_change = self
                                                            .params
                                                            .gravity_change_time
                                                            * self.params.timing_factor;
                                                        self.gravity_next_direction =
                                                            player_move;
                                                        self.gravity_switch_active = false;
                                                    }
                                                    None
                                                }
                                                _ => self.player_eat_element(what),
                                            }
                                        };
                                        if remains.is_some() {
                                            self.move_dir(x, y, player_move, PlayerBomb);
                                        }
                                    }
                                }
                            }
                        }
                    }

                    PlayerGlued => {
                        if self.kill_player {
                            self.explode(x, y);
                        } else {
                            // held in place; he is alive, nothing more
                            self.player_seen_ago = 0;
                            if self.player_state != PlayerState::Exited {
                                self.player_state = PlayerState::Living;
                            }
                        }
                    }

                    PlayerStirring => {
                        if self.kill_player {
                            self.explode(x, y);
                        } else {
                            self.sound_play(Sound::Stirring, x, y);
                            self.player_seen_ago = 0;
                            if self.player_state != PlayerState::Exited {
                                self.player_state = PlayerState::Living;
                            }
                            if player_fire {
                                // done stirring; gravity is armed again
                                self.gravity_disabled = false;
                                self.store(x, y, Player);
                                self.gravity_switch_active = true;
                            }
                        }
                    }

                    PlayerPneumaticLeft | PlayerPneumaticRight => {
                        if self.kill_player {
                            self.explode(x, y);
                        } else {
                            self.player_seen_ago = 0;
                            if self.player_state != PlayerState::Exited {
                                self.player_state = PlayerState::Living;
                            }
                            if self.pneumatic_hammer_active_delay == 0 {
                                self.store(x, y, Player);
                            }
                        }
                    }

                    PneumaticActiveLeft | PneumaticActiveRight => {
                        if self.pneumatic_hammer_active_delay > 0 {
                            self.sound_play(Sound::PneumaticHammer, x, y);
                        } else {
                            self.store(x, y, Space);
                            // the element being hammered may have exploded
                            // in the meantime; then there is no result
                            let new_elem = self.get_dir(x, y, Dir::Down).hammered_to();
                            if let Some(new_elem) = new_elem {
                                self.store_dir(x, y, Dir::Down, new_elem);
                                if policy.hammered_walls_reappear {
                                    let frame = self.params.hammered_wall_reappear_frame;
                                    self.hammered_reappear.set(x, (y + 1).rem_euclid(h), frame);
                                }
                            }
                        }
                    }

                    // ----------------------------------------------------
                    // stones, diamonds
                    // ----------------------------------------------------
                    Stone => {
                        self.do_start_fall(x, y, self.gravity, effects.stone_falling_effect)
                    }
                    MegaStone => self.do_start_fall(x, y, self.gravity, MegaStoneF),
                    Diamond => {
                        self.do_start_fall(x, y, self.gravity, effects.diamond_falling_effect)
                    }
                    Nut => self.do_start_fall(x, y, self.gravity, NutF),
                    DirtBall => self.do_start_fall(x, y, self.gravity, DirtBallF),
                    DirtLoose => self.do_start_fall(x, y, self.gravity, DirtLooseF),
                    FlyingStone => {
                        self.do_start_fall(x, y, self.gravity.opposite(), FlyingStoneF)
                    }
                    FlyingDiamond => {
                        self.do_start_fall(x, y, self.gravity.opposite(), FlyingDiamondF)
                    }

                    DirtBallF => {
                        if !self.gravity_disabled {
                            self.do_fall_roll_or_stop(x, y, self.gravity, DirtBall);
                        }
                    }
                    DirtLooseF => {
                        if !self.gravity_disabled {
                            self.do_fall_roll_or_stop(x, y, self.gravity, DirtLoose);
                        }
                    }

                    StoneF => {
                        if !self.gravity_disabled {
                            let g = self.gravity;
                            if self.do_fall_try_crush_voodoo(x, y, g) {
                            } else if self.do_fall_try_crack_nut(
                                x,
                                y,
                                g,
                                effects.stone_bouncing_effect,
                            ) {
                            } else if self.do_fall_try_magic(x, y, g, effects.magic_stone_to) {
                            } else if self.do_fall_try_crush(x, y, g) {
                            } else {
                                self.do_fall_roll_or_stop(
                                    x,
                                    y,
                                    g,
                                    effects.stone_bouncing_effect,
                                );
                            }
                        }
                    }

                    MegaStoneF => {
                        if !self.gravity_disabled {
                            let g = self.gravity;
                            if self.do_fall_try_crush_voodoo(x, y, g) {
                            } else if self.do_fall_try_crack_nut(x, y, g, MegaStone) {
                            } else if self.do_fall_try_magic(
                                x,
                                y,
                                g,
                                effects.magic_mega_stone_to,
                            ) {
                            } else if self.do_fall_try_crush(x, y, g) {
                            } else {
                                self.do_fall_roll_or_stop(x, y, g, MegaStone);
                            }
                        }
                    }

                    DiamondF => {
                        if !self.gravity_disabled {
                            let g = self.gravity;
                            if self.do_fall_try_eat_voodoo(x, y, g) {
                            } else if self.do_fall_try_magic(x, y, g, effects.magic_diamond_to)
                            {
                            } else if self.do_fall_try_crush(x, y, g) {
                            } else {
                                self.do_fall_roll_or_stop(
                                    x,
                                    y,
                                    g,
                                    effects.diamond_bouncing_effect,
                                );
                            }
                        }
                    }

                    NutF => {
                        if !self.gravity_disabled {
                            let g = self.gravity;
                            if self.do_fall_try_magic(x, y, g, effects.magic_nut_to) {
                            } else if self.do_fall_try_crush(x, y, g) {
                            } else {
                                self.do_fall_roll_or_stop(x, y, g, Nut);
                            }
                        }
                    }

                    FlyingStoneF => {
                        if !self.gravity_disabled {
                            let fall_dir = self.gravity.opposite();
                            if self.do_fall_try_crush_voodoo(x, y, fall_dir) {
                            } else if self.do_fall_try_crack_nut(x, y, fall_dir, FlyingStone) {
                            } else if self.do_fall_try_magic(
                                x,
                                y,
                                fall_dir,
                                effects.magic_flying_stone_to,
                            ) {
                            } else if self.do_fall_try_crush(x, y, fall_dir) {
                            } else {
                                self.do_fall_roll_or_stop(x, y, fall_dir, FlyingStone);
                            }
                        }
                    }

                    FlyingDiamondF => {
                        if !self.gravity_disabled {
                            let fall_dir = self.gravity.opposite();
                            if self.do_fall_try_eat_voodoo(x, y, fall_dir) {
                            } else if self.do_fall_try_magic(
                                x,
                                y,
                                fall_dir,
                                effects.magic_flying_diamond_to,
                            ) {
                            } else if self.do_fall_try_crush(x, y, fall_dir) {
                            } else {
                                self.do_fall_roll_or_stop(x, y, fall_dir, FlyingDiamond);
                            }
                        }
                    }

                    // ----------------------------------------------------
                    // nitro packs
                    // ----------------------------------------------------
                    NitroPack => self.do_start_fall(x, y, self.gravity, NitroPackF),

                    NitroPackF => {
                        if !self.gravity_disabled {
                            let g = self.gravity;
                            if self.is_like_space(x, y, g) {
                                self.move_dir(x, y, g, NitroPackF);
                            } else if self.do_fall_try_magic(
                                x,
                                y,
                                g,
                                effects.magic_nitro_pack_to,
                            ) {
                            } else if self.is_like_dirt(x, y, g) {
                                // landing on dirt does not set it off
                                self.store(x, y, NitroPack);
                                self.sound_of_element(NitroPack, x, y, true);
                            } else {
                                self.explode(x, y);
                            }
                        }
                    }

                    NitroPackExplode => self.explode(x, y),

                    // ----------------------------------------------------
                    // creatures
                    // ----------------------------------------------------
                    Cow1 | Cow2 | Cow3 | Cow4 => {
                        // a cow with nowhere to go waits out enclosed
                        if !self.is_like_space(x, y, Dir::Up)
                            && !self.is_like_space(x, y, Dir::Down)
                            && !self.is_like_space(x, y, Dir::Left)
                            && !self.is_like_space(x, y, Dir::Right)
                        {
                            self.store(x, y, CowEnclosed1);
                        } else {
                            self.creature_move(x, y);
                        }
                    }

                    CowEnclosed1 | CowEnclosed2 | CowEnclosed3 | CowEnclosed4
                    | CowEnclosed5 | CowEnclosed6 => {
                        if self.is_like_space(x, y, Dir::Up)
                            || self.is_like_space(x, y, Dir::Left)
                            || self.is_like_space(x, y, Dir::Right)
                            || self.is_like_space(x, y, Dir::Down)
                        {
                            self.store(x, y, Cow1);
                        } else {
                            self.next(x, y);
                        }
                    }
                    CowEnclosed7 => {
                        if self.is_like_space(x, y, Dir::Up)
                            || self.is_like_space(x, y, Dir::Left)
                            || self.is_like_space(x, y, Dir::Right)
                            || self.is_like_space(x, y, Dir::Down)
                        {
                            self.store(x, y, Cow1);
                        } else {
                            self.store(x, y, Skeleton);
                        }
                    }

                    Firefly1 | Firefly2 | Firefly3 | Firefly4 | AltFirefly1 | AltFirefly2
                    | AltFirefly3 | AltFirefly4 | Butterfly1 | Butterfly2 | Butterfly3
                    | Butterfly4 | AltButterfly1 | AltButterfly2 | AltButterfly3
                    | AltButterfly4 | Stonefly1 | Stonefly2 | Stonefly3 | Stonefly4 => {
                        if self.touches_voodoo(x, y) {
                            self.voodoo_touched = true;
                        }
                        if self.blows_up_flies(x, y, Dir::Down)
                            || self.blows_up_flies(x, y, Dir::Up)
                            || self.blows_up_flies(x, y, Dir::Left)
                            || self.blows_up_flies(x, y, Dir::Right)
                        {
                            self.explode(x, y);
                        } else {
                            self.creature_move(x, y);
                        }
                    }

                    WaitingStone => {
                        if self.is_like_space(x, y, grav_compat) {
                            // it wakes up and begins the chase
                            self.move_dir(x, y, grav_compat, ChasingStone);
                        } else if self.sloped(x, y, grav_compat, grav_compat.opposite()) {
                            if self.sloped(x, y, grav_compat, grav_compat.cw_90())
                                && self.is_like_space(x, y, grav_compat.cw_90())
                                && self.is_like_space(x, y, grav_compat.cw_45())
                            {
                                self.move_dir(x, y, grav_compat.cw_90(), WaitingStone);
                            } else if self.sloped(x, y, grav_compat, grav_compat.ccw_90())
                                && self.is_like_space(x, y, grav_compat.ccw_90())
                                && self.is_like_space(x, y, grav_compat.ccw_45())
                            {
                                self.move_dir(x, y, grav_compat.ccw_90(), WaitingStone);
                            }
                        }
                    }

                    ChasingStone => self.chasing_stone_move(x, y),

                    Replicator => {
                        if self.replicators_wait_frame == 0
                            && self.replicators_active
                            && !self.gravity_disabled
                        {
                            // copy whatever sits on top to below; players
                            // and still scanned elements are not copied
                            let g = self.gravity;
                            if self.is_like_space(x, y, g)
                                && !self.is_player_dir(x, y, g.opposite())
                                && !self.is_scanned_dir(x, y, g.opposite())
                            {
                                let e = self.get_dir(x, y, g.opposite());
                                self.store_dir(x, y, g, e);
                                self.sound_play(Sound::Replicator, x, y);
                            }
                        }
                    }

                    Biter1 | Biter2 | Biter3 | Biter4 => {
                        if self.biters_wait_frame == 0 {
                            self.biter_move(x, y, effects.biter_eat);
                        }
                    }

                    Dragonfly1 | Dragonfly2 | Dragonfly3 | Dragonfly4 => {
                        if self.touches_voodoo(x, y) {
                            self.voodoo_touched = true;
                        }
                        if self.blows_up_flies(x, y, Dir::Down)
                            || self.blows_up_flies(x, y, Dir::Up)
                            || self.blows_up_flies(x, y, Dir::Left)
                            || self.blows_up_flies(x, y, Dir::Right)
                        {
                            self.explode(x, y);
                        } else if let Some((kind, dir)) = self.get(x, y).creature_info() {
                            // flies straight; turns in place when blocked
                            let mut ccw = self.rotates_ccw(x, y);
                            if self.creatures_backwards {
                                ccw = !ccw;
                            }
                            let moves = if self.creatures_backwards {
                                &CREATURE_CHDIR
                            } else {
                                &CREATURE_DIR
                            };
                            let dirn = if ccw { (dir + 3) & 3 } else { (dir + 1) & 3 };
                            if self.is_like_space(x, y, moves[dir]) {
                                self.move_dir(x, y, moves[dir], kind.facing(dir));
                            } else {
                                self.store(x, y, kind.facing(dirn));
                            }
                        }
                    }

                    Bladder => self.store(x, y, Bladder1),

                    Bladder1 | Bladder2 | Bladder3 | Bladder4 | Bladder5 | Bladder6
                    | Bladder7 | Bladder8 => {
                        self.bladder_move(x, y, grav_compat, effects.bladder_converts_by)
                    }

                    Ghost => {
                        if self.blows_up_flies(x, y, Dir::Down)
                            || self.blows_up_flies(x, y, Dir::Up)
                            || self.blows_up_flies(x, y, Dir::Left)
                            || self.blows_up_flies(x, y, Dir::Right)
                        {
                            self.explode(x, y);
                        } else {
                            // four random attempts to move
                            const DIRS: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];
                            for _ in 0..4 {
                                let random_dir = DIRS[self.rng.int_range(0, 4) as usize];
                                if self.is_like_space(x, y, random_dir) {
                                    self.move_dir(x, y, random_dir, Ghost);
                                    break;
                                }
                            }
                        }
                    }

                    // ----------------------------------------------------
                    // active elements
                    // ----------------------------------------------------
                    Amoeba => {
                        if self.hatched && self.amoeba_state == AmoebaState::Awake {
                            self.sound_of_element(Amoeba, x, y, true);
                        }
                        amoeba_count += 1;
                        match self.amoeba_state {
                            AmoebaState::TooBig => {
                                self.store(x, y, effects.amoeba_too_big_effect)
                            }
                            AmoebaState::Enclosed => {
                                self.store(x, y, effects.amoeba_enclosed_effect)
                            }
                            AmoebaState::Sleeping | AmoebaState::Awake => {
                                // the first cell of this scan that can
                                // still grow wakes the amoeba
                                if amoeba_found_enclosed
                                    && (self.amoeba_eats(x, y, Dir::Up)
                                        || self.amoeba_eats(x, y, Dir::Down)
                                        || self.amoeba_eats(x, y, Dir::Left)
                                        || self.amoeba_eats(x, y, Dir::Right))
                                {
                                    amoeba_found_enclosed = false;
                                    self.amoeba_state = AmoebaState::Awake;
                                }

                                if self.amoeba_state == AmoebaState::Awake
                                    && self.rng.int_range(0, PROBABILITY_MAX)
                                        < self.amoeba_growth_prob
                                {
                                    let dir = match self.rng.int_range(0, 4) {
                                        0 => Dir::Up,
                                        1 => Dir::Down,
                                        2 => Dir::Left,
                                        _ => Dir::Right,
                                    };
                                    if self.amoeba_eats(x, y, dir) {
                                        self.store_dir(x, y, dir, Amoeba);
                                    }
                                }
                            }
                        }
                    }

                    Amoeba2 => {
                        if self.hatched && self.amoeba_2_state == AmoebaState::Awake {
                            self.sound_of_element(Amoeba, x, y, true);
                        }
                        amoeba_2_count += 1;
                        if policy.amoeba_2_explodes_by_amoeba
                            && (self.is_like_element(x, y, Dir::Down, Amoeba)
                                || self.is_like_element(x, y, Dir::Up, Amoeba)
                                || self.is_like_element(x, y, Dir::Left, Amoeba)
                                || self.is_like_element(x, y, Dir::Right, Amoeba))
                        {
                            self.explode(x, y);
                        } else {
                            match self.amoeba_2_state {
                                AmoebaState::TooBig => {
                                    self.store(x, y, effects.amoeba_2_too_big_effect)
                                }
                                AmoebaState::Enclosed => {
                                    self.store(x, y, effects.amoeba_2_enclosed_effect)
                                }
                                AmoebaState::Sleeping | AmoebaState::Awake => {
                                    if amoeba_2_found_enclosed
                                        && (self.amoeba_eats(x, y, Dir::Up)
                                            || self.amoeba_eats(x, y, Dir::Down)
                                            || self.amoeba_eats(x, y, Dir::Left)
                                            || self.amoeba_eats(x, y, Dir::Right))
                                    {
                                        amoeba_2_found_enclosed = false;
                                        self.amoeba_2_state = AmoebaState::Awake;
                                    }

                                    if self.amoeba_2_state == AmoebaState::Awake
                                        && self.rng.int_range(0, PROBABILITY_MAX)
                                            < self.amoeba_2_growth_prob
                                    {
                                        let dir = match self.rng.int_range(0, 4) {
                                            0 => Dir::Up,
                                            1 => Dir::Down,
                                            2 => Dir::Left,
                                            _ => Dir::Right,
                                        };
                                        if self.amoeba_eats(x, y, dir) {
                                            self.store_dir(x, y, dir, Amoeba2);
                                        }
                                    }
                                }
                            }
                        }
                    }

                    Acid => {
                        if self.rng.int_range(0, PROBABILITY_MAX)
                            <= self.params.acid_spread_ratio
                        {
                            self.store(x, y, effects.acid_turns_to);
                            for dir in [Dir::Up, Dir::Down, Dir::Left, Dir::Right] {
                                if self.is_like_element(x, y, dir, effects.acid_eats_this) {
                                    self.store_dir(x, y, dir, Acid);
                                    self.sound_of_element(Acid, x, y, true);
                                }
                            }
                        }
                    }

                    Water => {
                        if !policy.water_does_not_flow_down && self.is_like_space(x, y, Dir::Down)
                        {
                            self.store_dir(x, y, Dir::Down, Water1);
                        }
                        if self.is_like_space(x, y, Dir::Up) {
                            self.store_dir(x, y, Dir::Up, Water1);
                        }
                        if self.is_like_space(x, y, Dir::Left) {
                            self.store_dir(x, y, Dir::Left, Water1);
                        }
                        if self.is_like_space(x, y, Dir::Right) {
                            self.store_dir(x, y, Dir::Right, Water1);
                        }
                    }

                    Water16 => self.store(x, y, Water),

                    HExpandingWall | VExpandingWall | HExpandingSteelWall
                    | VExpandingSteelWall => {
                        let e = self.get(x, y);
                        let horizontal = matches!(e, HExpandingWall | HExpandingSteelWall);
                        // the switch can swap the axis
                        if horizontal != self.expanding_wall_changed {
                            if self.is_like_space(x, y, Dir::Left) {
                                self.store_dir(x, y, Dir::Left, e);
                                self.sound_of_element(e, x, y, true);
                            } else if self.is_like_space(x, y, Dir::Right) {
                                self.store_dir(x, y, Dir::Right, e);
                                self.sound_of_element(e, x, y, true);
                            }
                        } else if self.is_like_space(x, y, Dir::Up) {
                            self.store_dir(x, y, Dir::Up, e);
                            self.sound_of_element(e, x, y, true);
                        } else if self.is_like_space(x, y, Dir::Down) {
                            self.store_dir(x, y, Dir::Down, e);
                            self.sound_of_element(e, x, y, true);
                        }
                    }

                    ExpandingWall | ExpandingSteelWall => {
                        let e = self.get(x, y);
                        for dir in [Dir::Left, Dir::Right, Dir::Up, Dir::Down] {
                            if self.is_like_space(x, y, dir) {
                                self.store_dir(x, y, dir, e);
                                self.sound_of_element(e, x, y, true);
                            }
                        }
                    }

                    Slime => self.slime_move(x, y),

                    FallingWall => {
                        if self.is_like_space(x, y, grav_compat) {
                            // only a player below (through any amount of
                            // space, wrapping included) triggers the fall
                            let mut yy = y + 1;
                            while yy < y + h {
                                let e = self.get(x, yy);
                                if e != Space && e != Lava {
                                    break;
                                }
                                yy += 1;
                            }
                            let below = self.get(x, yy);
                            if below == Player || below == PlayerGlued || below == PlayerBomb {
                                self.move_dir(x, y, grav_compat, FallingWallF);
                                // no sound for the start of the fall
                            }
                        }
                    }

                    FallingWallF => {
                        if self.is_player_dir(x, y, grav_compat) {
                            // the falling wall explodes, not the player
                            self.explode(x, y);
                        } else if self.is_like_space(x, y, grav_compat) {
                            self.move_dir(x, y, grav_compat, FallingWallF);
                        } else {
                            self.sound_of_element(FallingWallF, x, y, true);
                            self.store(x, y, FallingWall);
                        }
                    }

                    // ----------------------------------------------------
                    // conveyor belts
                    // ----------------------------------------------------
                    ConveyorLeft | ConveyorRight => {
                        // belts only work while gravity is vertical
                        if !self.gravity_disabled && self.conveyor_belts_active {
                            let mut left = self.get(x, y) != ConveyorRight;
                            if self.conveyor_belts_direction_changed {
                                left = !left;
                            }
                            let (d_up, d_down) = if left {
                                (Dir::Up.ccw_45(), Dir::Down.ccw_45())
                            } else {
                                (Dir::Up.cw_45(), Dir::Down.cw_45())
                            };

                            // the element on top of the belt
                            let top = self
                                .flags_at(x, y, Dir::Up)
                                .contains(ElementFlags::MOVED_BY_CONVEYOR_TOP);
                            let bottom_above = self
                                .flags_at(x, y, Dir::Up)
                                .contains(ElementFlags::MOVED_BY_CONVEYOR_BOTTOM);
                            if (self.gravity == Dir::Down && top)
                                || (self.gravity == Dir::Up && bottom_above)
                            {
                                if self.is_like_space(x, y, d_up) {
                                    let e = self.get_dir(x, y, Dir::Up);
                                    self.store_dir(x, y, d_up, e);
                                    self.store_dir(x, y, Dir::Up, Space);
                                }
                            }
                            // the element hanging below the belt
                            let top_below = self
                                .flags_at(x, y, Dir::Down)
                                .contains(ElementFlags::MOVED_BY_CONVEYOR_TOP);
                            let bottom = self
                                .flags_at(x, y, Dir::Down)
                                .contains(ElementFlags::MOVED_BY_CONVEYOR_BOTTOM);
                            if (self.gravity == Dir::Up && top_below)
                                || (self.gravity == Dir::Down && bottom)
                            {
                                if self.is_like_space(x, y, d_down) {
                                    let e = self.get_dir(x, y, Dir::Down);
                                    self.store_dir(x, y, d_down, e);
                                    self.store_dir(x, y, Dir::Down, Space);
                                }
                            }
                        }
                    }

                    // ----------------------------------------------------
                    // simple changes and explosion stages
                    // ----------------------------------------------------
                    Explode3 => self.store(x, y, effects.explosion_3_effect),
                    Explode5 => self.store(x, y, effects.explosion_effect),
                    NutCrack4 => self.store(x, y, Diamond),
                    PreDia5 => self.store(x, y, effects.diamond_birth_effect),
                    PreStone4 => self.store(x, y, Stone),
                    NitroExpl4 => self.store(x, y, effects.nitro_explosion_effect),
                    BombExpl4 => self.store(x, y, effects.bomb_explosion_effect),
                    Amoeba2Expl4 => self.store(x, y, effects.amoeba_2_explosion_effect),
                    GhostExpl4 => {
                        let pick = self.rng.int_range(0, GHOST_EXPLODE_TO.len() as i32);
                        self.store(x, y, GHOST_EXPLODE_TO[pick as usize]);
                    }
                    PreSteel4 => self.store(x, y, Steel),
                    PreClock4 => self.store(x, y, Clock),
                    BombTick7 => self.explode(x, y),

                    TrappedDiamond => {
                        if self.diamond_key_collected {
                            self.store(x, y, Diamond);
                        }
                    }

                    PreOutbox => {
                        if self.gate_open {
                            self.store(x, y, Outbox);
                        }
                    }
                    PreInvisOutbox => {
                        if self.gate_open {
                            self.store(x, y, InvisOutbox);
                        }
                    }
                    Inbox => {
                        self.player_seen_ago = 0;
                        if self.hatched && !inbox_toggle {
                            self.store(x, y, PrePlayer1);
                        }
                        inbox_toggle = !inbox_toggle;
                    }
                    PrePlayer1 => {
                        self.player_seen_ago = 0;
                        self.store(x, y, PrePlayer2);
                    }
                    PrePlayer2 => {
                        self.player_seen_ago = 0;
                        self.store(x, y, PrePlayer3);
                    }
                    PrePlayer3 => {
                        self.player_seen_ago = 0;
                        self.store(x, y, Player);
                    }

                    PreDia1 | PreDia2 | PreDia3 | PreDia4 | PreStone1 | PreStone2
                    | PreStone3 | BombTick1 | BombTick2 | BombTick3 | BombTick4 | BombTick5
                    | BombTick6 | PreSteel1 | PreSteel2 | PreSteel3 | BombExpl1 | BombExpl2
                    | BombExpl3 | NutCrack1 | NutCrack2 | NutCrack3 | GhostExpl1
                    | GhostExpl2 | GhostExpl3 | Explode1 | Explode2 | Explode4 | PreClock1
                    | PreClock2 | PreClock3 | NitroExpl1 | NitroExpl2 | NitroExpl3
                    | Amoeba2Expl1 | Amoeba2Expl2 | Amoeba2Expl3 => self.next(x, y),

                    Water1 | Water2 | Water3 | Water4 | Water5 | Water6 | Water7 | Water8
                    | Water9 | Water10 | Water11 | Water12 | Water13 | Water14 | Water15 => {
                        self.sound_play(Sound::Water, x, y);
                        self.next(x, y);
                    }

                    BladderSpender => {
                        if self.is_like_space(x, y, grav_compat.opposite()) {
                            self.store_dir(x, y, grav_compat.opposite(), Bladder);
                            self.store(x, y, PreSteel1);
                            self.sound_of_element(BladderSpender, x, y, true);
                        }
                    }

                    MagicWall => self.magic_wall_sound(x, y),

                    // inanimate elements do nothing
                    _ => {}
                }

                // a handler may have rewritten the current cell as
                // scanned; clear that right away, or a replicator above
                // would refuse to copy it
                if self.is_scanned(x, y) {
                    self.unscan(x, y);
                }
            }
        }

        // ------------------------------------------------------------------
        // postprocessing
        // ------------------------------------------------------------------

        // forget scanned flags and settle time penalties
        for y in 0..h {
            for x in 0..w {
                if self.is_scanned(x, y) {
                    self.unscan(x, y);
                }
                if self.get(x, y) == TimePenalty {
                    self.store(x, y, Gravestone);
                    time_decrement_sec += self.params.time_penalty;
                }
            }
        }

        // explosions in the oldest engine started one stage further in
        if policy.short_explosions {
            for y in 0..h {
                for x in 0..w {
                    if self
                        .get(x, y)
                        .flags()
                        .contains(ElementFlags::EXPLOSION_FIRST_STAGE)
                    {
                        self.next(x, y);
                        if self.is_scanned(x, y) {
                            self.unscan(x, y);
                        }
                    }
                }
            }
        }

        // find the player for scrolling and the chasing stones; without a
        // living player the last known coordinates stay
        if self.player_state == PlayerState::Living {
            if policy.active_is_first_found {
                // 1stb compatibility: scan backwards, first found wins
                for y in (0..h).rev() {
                    for x in (0..w).rev() {
                        if self.is_player(x, y) {
                            self.player_x = x;
                            self.player_y = y;
                        }
                    }
                }
            } else {
                for y in 0..h {
                    for x in 0..w {
                        if self.is_player(x, y) {
                            self.player_x = x;
                            self.player_y = y;
                        }
                    }
                }
            }
        }
        for i in 0..PLAYER_MEM - 1 {
            self.player_mem[i] = self.player_mem[i + 1];
        }
        self.player_mem[PLAYER_MEM - 1] = (self.player_x, self.player_y);

        // ------------------------------------------------------------------
        // scheduling
        // ------------------------------------------------------------------
        self.speed = self.derive_speed();

        // ------------------------------------------------------------------
        // cave variables
        // ------------------------------------------------------------------

        if (self.player_state == PlayerState::Living && self.player_seen_ago > 15)
            || self.kill_player
        {
            self.player_state = PlayerState::Died;
        }
        // a hurt voodoo kills the player on the next scan
        if self.voodoo_touched {
            self.kill_player = true;
        }

        if self.amoeba_state == AmoebaState::Awake {
            if amoeba_count >= self.params.amoeba_max_count {
                self.amoeba_state = AmoebaState::TooBig;
            }
            if amoeba_found_enclosed {
                self.amoeba_state = AmoebaState::Enclosed;
            }
        }
        if policy.magic_wall_stops_amoeba && self.magic_wall_state == MagicWallState::Active {
            self.amoeba_state = AmoebaState::Enclosed;
        }
        if self.amoeba_2_state == AmoebaState::Awake {
            if amoeba_2_count >= self.params.amoeba_2_max_count {
                self.amoeba_2_state = AmoebaState::TooBig;
            }
            if amoeba_2_found_enclosed {
                self.amoeba_2_state = AmoebaState::Enclosed;
            }
        }
        if policy.magic_wall_stops_amoeba && self.magic_wall_state == MagicWallState::Active {
            self.amoeba_2_state = AmoebaState::Enclosed;
        }

        // time penalty for destroyed voodoo dolls
        self.time -= time_decrement_sec * self.params.timing_factor;
        if self.time < 0 {
            self.time = 0;
        }

        // time only runs once the cave has hatched
        if self.hatched {
            let seconds_before = self.time / self.params.timing_factor;
            self.time -= self.speed;
            if self.time <= 0 {
                self.time = 0;
            }
            let seconds_after = self.time / self.params.timing_factor;
            if seconds_before != seconds_after {
                self.set_seconds_sound();
            }
        }

        if self.gravity_will_change > 0 {
            self.gravity_will_change -= self.speed;
            if self.gravity_will_change < 0 {
                self.gravity_will_change = 0;
            }
            if self.gravity_will_change == 0 {
                self.gravity = self.gravity_next_direction;
                if policy.gravity_change_sound {
                    self.sound_play(Sound::GravityChange, self.player_x, self.player_y);
                }
                tracing::debug!(cave = %self.params.name, gravity = ?self.gravity, "gravity changed");
            }
        }

        if self.creatures_direction_will_change > 0 {
            self.creatures_direction_will_change -= self.speed;
            if self.creatures_direction_will_change < 0 {
                self.creatures_direction_will_change = 0;
            }
            if self.creatures_direction_will_change == 0 {
                if policy.creature_direction_auto_change_sound {
                    self.sound_play(Sound::SwitchCreatures, self.player_x, self.player_y);
                }
                self.creatures_backwards = !self.creatures_backwards;
                self.creatures_direction_will_change =
                    self.params.creatures_direction_auto_change_time
                        * self.params.timing_factor;
            }
        }

        if self.magic_wall_state == MagicWallState::Active
            && (self.hatched || !policy.magic_timer_wait_for_hatching)
        {
            self.magic_wall_time -= self.speed;
            if self.magic_wall_time < 0 {
                self.magic_wall_time = 0;
            }
            if self.magic_wall_time == 0 {
                self.magic_wall_state = MagicWallState::Expired;
                tracing::debug!(cave = %self.params.name, "magic wall expired");
            }
        }

        if policy.amoeba_timer_started_immediately
            || (self.amoeba_state == AmoebaState::Awake
                && (self.hatched || !policy.amoeba_timer_wait_for_hatching))
        {
            self.amoeba_time -= self.speed;
            if self.amoeba_time < 0 {
                self.amoeba_time = 0;
            }
            if self.amoeba_time == 0 {
                self.amoeba_growth_prob = self.params.amoeba_fast_growth_prob;
            }
        }
        if policy.amoeba_timer_started_immediately
            || (self.amoeba_2_state == AmoebaState::Awake
                && (self.hatched || !policy.amoeba_timer_wait_for_hatching))
        {
            self.amoeba_2_time -= self.speed;
            if self.amoeba_2_time < 0 {
                self.amoeba_2_time = 0;
            }
            if self.amoeba_2_time == 0 {
                self.amoeba_2_growth_prob = self.params.amoeba_2_fast_growth_prob;
            }
        }

        // hatching: frame countdown for fixed frame times, millisecond
        // countdown for the hardware schedulers
        let mut start_signal = false;
        if self.params.scheduling == Scheduling::Milliseconds {
            if self.hatching_delay_frame > 0 {
                self.hatching_delay_frame -= 1;
                if self.hatching_delay_frame == 0 {
                    start_signal = true;
                }
            }
        } else if self.hatching_delay_time > 0 {
            self.hatching_delay_time -= self.speed;
            if self.hatching_delay_time <= 0 {
                self.hatching_delay_time = 0;
                start_signal = true;
            }
        }

        if start_signal {
            // the cave start signal
            self.hatched = true;
            self.count_diamonds();

            if self.params.creatures_direction_auto_change_time != 0 {
                self.creatures_direction_will_change =
                    self.params.creatures_direction_auto_change_time
                        * self.params.timing_factor;
                if policy.creatures_direction_auto_change_on_start {
                    self.creatures_backwards = !self.creatures_backwards;
                }
            }

            if self.player_state == PlayerState::NotYet {
                self.player_state = PlayerState::Living;
            }
            self.sound_play(Sound::Crack, self.player_x, self.player_y);
            tracing::debug!(cave = %self.params.name, "hatched");
        }

        if self.biters_wait_frame == 0 {
            self.biters_wait_frame = self.biter_delay_frame;
        } else {
            self.biters_wait_frame -= 1;
        }
        if self.replicators_wait_frame == 0 {
            self.replicators_wait_frame = self.params.replicator_delay_frame;
        } else {
            self.replicators_wait_frame -= 1;
        }

        // ------------------------------------------------------------------
        // last thoughts
        // ------------------------------------------------------------------

        if self.player_state == PlayerState::Living && self.time == 0 {
            // only the timeout sound survives the timeout
            self.clear_sounds();
            self.player_state = PlayerState::Timeout;
            self.sound_play(Sound::Timeout, self.player_x, self.player_y);
            tracing::debug!(cave = %self.params.name, "timeout");
        }

        self.step_particles();

        // remembered for the drawing routines; animation follows the
        // game, not the keyboard
        self.last_direction = player_move;
        if matches!(player_move, Dir::Left | Dir::UpLeft | Dir::DownLeft) {
            self.last_horizontal_direction = Dir::Left;
        }
        if matches!(player_move, Dir::Right | Dir::UpRight | Dir::DownRight) {
            self.last_horizontal_direction = Dir::Right;
        }

        player_move
    }

    /// Four-facing creature movement: turn fast and move, go straight, or
    /// turn slowly in place.
    fn creature_move(&mut self, x: i32, y: i32) {
        let Some((kind, dir)) = self.get(x, y).creature_info() else {
            tracing::error!(element = ?self.get(x, y), x, y, "creature move on a non-creature");
            return;
        };
        let mut ccw = self.rotates_ccw(x, y);
        if self.creatures_backwards {
            ccw = !ccw;
        }
        let moves = if self.creatures_backwards {
            &CREATURE_CHDIR
        } else {
            &CREATURE_DIR
        };
        let (dirn, dirp) = if ccw {
            ((dir + 3) & 3, (dir + 1) & 3)
        } else {
            ((dir + 1) & 3, (dir + 3) & 3)
        };

        if self.is_like_space(x, y, moves[dirn]) {
            self.move_dir(x, y, moves[dirn], kind.facing(dirn));
        } else if self.is_like_space(x, y, moves[dir]) {
            self.move_dir(x, y, moves[dir], kind.facing(dir));
        } else {
            self.store(x, y, kind.facing(dirp));
        }
    }

    /// True if any cardinal neighbor is the voodoo.
    fn touches_voodoo(&self, x: i32, y: i32) -> bool {
        self.get_dir(x, y, Dir::Left) == Element::Voodoo
            || self.get_dir(x, y, Dir::Right) == Element::Voodoo
            || self.get_dir(x, y, Dir::Up) == Element::Voodoo
            || self.get_dir(x, y, Dir::Down) == Element::Voodoo
    }

    /// Chasing stones walk toward where the player was sixteen scans ago,
    /// preferring a random axis, falling back to the perpendicular.
    fn chasing_stone_move(&mut self, x: i32, y: i32) {
        use Element::ChasingStone;
        let (px, py) = self.player_mem[0];
        let mut horizontal = self.rng.boolean();
        let mut dont_move = false;
        let mut i = 3;

        loop {
            if horizontal {
                if px == x {
                    i -= 1;
                    horizontal = !horizontal;
                    if i == 2 {
                        continue;
                    }
                } else if px > x && self.is_like_space(x, y, Dir::Right) {
                    self.move_dir(x, y, Dir::Right, ChasingStone);
                    dont_move = true;
                    break;
                } else if px < x && self.is_like_space(x, y, Dir::Left) {
                    self.move_dir(x, y, Dir::Left, ChasingStone);
                    dont_move = true;
                    break;
                } else {
                    i -= 2;
                    if i == 1 {
                        horizontal = !horizontal;
                        continue;
                    }
                }
            } else {
                if py == y {
                    i -= 1;
                    horizontal = !horizontal;
                    if i == 2 {
                        continue;
                    }
                } else if py > y && self.is_like_space(x, y, Dir::Down) {
                    self.move_dir(x, y, Dir::Down, ChasingStone);
                    dont_move = true;
                    break;
                } else if py < y && self.is_like_space(x, y, Dir::Up) {
                    self.move_dir(x, y, Dir::Up, ChasingStone);
                    dont_move = true;
                    break;
                } else {
                    i -= 2;
                    if i == 1 {
                        horizontal = !horizontal;
                        continue;
                    }
                }
            }
            if i != 0 {
                dont_move = true;
            }
            break;
        }

        // blocked on the preferred axis: sidestep around the obstacle
        if !dont_move {
            if horizontal {
                if x >= px {
                    if self.is_like_space(x, y, Dir::Up)
                        && self.is_like_space(x, y, Dir::UpLeft)
                    {
                        self.move_dir(x, y, Dir::Up, ChasingStone);
                    } else if self.is_like_space(x, y, Dir::Down)
                        && self.is_like_space(x, y, Dir::DownLeft)
                    {
                        self.move_dir(x, y, Dir::Down, ChasingStone);
                    }
                } else if self.is_like_space(x, y, Dir::Up)
                    && self.is_like_space(x, y, Dir::UpRight)
                {
                    self.move_dir(x, y, Dir::Up, ChasingStone);
                } else if self.is_like_space(x, y, Dir::Down)
                    && self.is_like_space(x, y, Dir::DownRight)
                {
                    self.move_dir(x, y, Dir::Down, ChasingStone);
                }
            } else if y >= py {
                if self.is_like_space(x, y, Dir::Left)
                    && self.is_like_space(x, y, Dir::UpLeft)
                {
                    self.move_dir(x, y, Dir::Left, ChasingStone);
                } else if self.is_like_space(x, y, Dir::Right)
                    && self.is_like_space(x, y, Dir::UpRight)
                {
                    self.move_dir(x, y, Dir::Right, ChasingStone);
                }
            } else if self.is_like_space(x, y, Dir::Left)
                && self.is_like_space(x, y, Dir::DownLeft)
            {
                self.move_dir(x, y, Dir::Left, ChasingStone);
            } else if self.is_like_space(x, y, Dir::Right)
                && self.is_like_space(x, y, Dir::DownRight)
            {
                self.move_dir(x, y, Dir::Right, ChasingStone);
            }
        }
    }

    /// Biters try, in order of appetite, dirt, their configured food,
    /// space and stones; for each they try ahead, then a fast turn, then
    /// the other turn. A stone is not eaten, only thrown back.
    fn biter_move(&mut self, x: i32, y: i32, biter_eat: Element) {
        use Element::{Space, Stone};
        let biter_try = [Element::Dirt, biter_eat, Space, Stone];
        let dir = match self.get(x, y) {
            Element::Biter1 => 0,
            Element::Biter2 => 1,
            Element::Biter3 => 2,
            _ => 3,
        };
        let dirn = (dir + 3) & 3;
        let dirp = (dir + 1) & 3;
        let mut made_sound_of = None;
        let mut eaten = None;

        for (i, &food) in biter_try.iter().enumerate() {
            if self.is_like_element(x, y, BITER_MOVE[dir], food) {
                self.move_dir(x, y, BITER_MOVE[dir], biter_facing(dir));
                if food != Space {
                    made_sound_of = Some(Element::Biter1);
                }
                eaten = Some(i);
                break;
            } else if self.is_like_element(x, y, BITER_MOVE[dirn], food) {
                self.move_dir(x, y, BITER_MOVE[dirn], biter_facing(dirn));
                if food != Space {
                    made_sound_of = Some(Element::Biter1);
                }
                eaten = Some(i);
                break;
            } else if self.is_like_element(x, y, BITER_MOVE[dirp], food) {
                self.move_dir(x, y, BITER_MOVE[dirp], biter_facing(dirp));
                if food != Space {
                    made_sound_of = Some(Element::Biter1);
                }
                eaten = Some(i);
                break;
            }
        }
        match eaten {
            None => {
                // could not move at all; just turn
                self.store(x, y, biter_facing(dirp));
            }
            Some(i) if biter_try[i] == Stone => {
                // stones are thrown back, not eaten
                self.store(x, y, Stone);
                made_sound_of = Some(Stone);
            }
            Some(_) => {}
        }
        if let Some(e) = made_sound_of {
            self.sound_of_element(e, x, y, true);
        }
    }

    /// Bladders float against gravity through an eight-stage delay, roll
    /// around sloped obstacles, and convert to a clock when touching
    /// their trigger element.
    fn bladder_move(&mut self, x: i32, y: i32, grav_compat: Dir, converts_by: Element) {
        use Element::*;
        let up = grav_compat.opposite();

        if self.is_like_element(x, y, up, converts_by)
            || self.is_like_element(x, y, grav_compat.cw_90(), converts_by)
            || self.is_like_element(x, y, grav_compat.ccw_90(), converts_by)
        {
            self.store(x, y, PreClock1);
            self.sound_of_element(PreClock1, x, y, true);
            return;
        }

        if self.is_like_space(x, y, up) {
            if self.get(x, y) == Bladder8 {
                self.move_dir(x, y, up, Bladder1);
                self.sound_of_element(Bladder, x, y, true);
            } else {
                self.next(x, y);
            }
        } else if self.sloped_for_bladder(x, y, up) && self.sloped(x, y, up, up) {
            if self.sloped(x, y, up, up.ccw_90())
                && self.is_like_space(x, y, up.ccw_90())
                && self.is_like_space(x, y, up.ccw_45())
            {
                // rolling up and to the side
                if self.get(x, y) == Bladder8 {
                    self.move_dir(x, y, up.ccw_90(), Bladder8);
                    self.sound_of_element(Bladder, x, y, true);
                } else {
                    self.next(x, y);
                }
            } else if self.sloped(x, y, up, up.cw_90())
                && self.is_like_space(x, y, up.cw_90())
                && self.is_like_space(x, y, up.cw_45())
            {
                if self.get(x, y) == Bladder8 {
                    self.move_dir(x, y, up.cw_90(), Bladder8);
                    self.sound_of_element(Bladder, x, y, true);
                } else {
                    self.next(x, y);
                }
            }
        } else {
            // nowhere to go; the delay starts over
            self.store(x, y, Bladder1);
        }
    }

    /// Slime lets elements seep through with a per-tick chance: either
    /// the predictable C64 bit mask or the true random permeability.
    fn slime_move(&mut self, x: i32, y: i32) {
        use Element::*;
        let effects = self.params.effects.clone();
        let passes = if self.params.slime_predictable {
            (self.c64_rng.next_byte() as i32 & self.params.slime_permeability_c64) == 0
        } else {
            self.rng.int_range(0, PROBABILITY_MAX) < self.params.slime_permeability
        };
        if !passes {
            return;
        }
        let grav = self.gravity;
        let oppos = self.gravity.opposite();

        if self.is_like_space(x, y, grav) {
            // elements pass downward
            let above = self.get_dir(x, y, oppos);
            let converted = if above == effects.slime_eats_1 {
                Some(effects.slime_converts_1)
            } else if above == effects.slime_eats_2 {
                Some(effects.slime_converts_2)
            } else if above == effects.slime_eats_3 {
                Some(effects.slime_converts_3)
            } else if above == WaitingStone {
                // waiting stones pass through without waking up
                Some(WaitingStone)
            } else if above == ChasingStone {
                Some(ChasingStone)
            } else {
                None
            };
            if let Some(out) = converted {
                self.store_dir(x, y, grav, out);
                self.store_dir(x, y, oppos, Space);
                self.sound_of_element(Slime, x, y, true);
            }
        } else if self.is_like_space(x, y, oppos) {
            // or upward, for the floaters
            let below = self.get_dir(x, y, grav);
            let raised = match below {
                Bladder => Some(Bladder1),
                FlyingStone => Some(FlyingStoneF),
                FlyingDiamond => Some(FlyingDiamondF),
                _ => None,
            };
            if let Some(out) = raised {
                self.store_dir(x, y, grav, Space);
                self.store_dir(x, y, oppos, out);
                self.sound_of_element(Slime, x, y, true);
            }
        }
    }

    /// Derive the next frame time from the scheduling model and the work
    /// the scan performed.
    fn derive_speed(&mut self) -> i32 {
        let ckdelay = self.params.ckdelay;
        let current = self.ckdelay_current;
        let extra = self.ckdelay_extra_for_animation;
        match self.params.scheduling {
            Scheduling::Milliseconds => self.params.speed,
            Scheduling::Bd1 => {
                if !self.params.intermission {
                    (88.0 + 3.66 * ckdelay as f64 + (current + extra) as f64 / 1000.0) as i32
                } else {
                    // intermissions ran quicker; only half the cave was
                    // processed by the original engine
                    (60.0 + 3.66 * ckdelay as f64 + (current + extra) as f64 / 1000.0) as i32
                }
            }
            Scheduling::Bd1Atari => {
                if !self.params.intermission {
                    (74.0 + 3.2 * ckdelay as f64 + current as f64 / 1000.0) as i32
                } else {
                    (65.0 + 2.88 * ckdelay as f64 + current as f64 / 1000.0) as i32
                }
            }
            Scheduling::Bd2 => (60 + (current + extra) / 1000).max(ckdelay * 20),
            Scheduling::Plck => (65 + current / 1000).max(ckdelay * 20),
            Scheduling::Bd2PlckAtari => (40 + current / 1000).max(ckdelay * 20),
            Scheduling::Crdr => {
                // reappearing walls made this engine very slow
                let mut current = current;
                if self.params.policy.hammered_walls_reappear {
                    current += 60_000;
                }
                (130 + current / 1000).max(ckdelay * 20)
            }
        }
    }
}
