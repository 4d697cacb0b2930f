//! Player interactions: eating and activating elements, pushing, and the
//! teleporter.

use rockfall_cave::prelude::*;

use crate::rendered::{CaveRendered, PlayerState};

impl CaveRendered {
    /// The player eats or activates an element: dirt, diamonds, keys,
    /// doors, clocks, sweets, switches, outboxes.
    ///
    /// Returns what remains in the eaten cell: `Some(Space)` lets the
    /// player walk in, another element blocks the move but applies its
    /// effect, and `None` means the element cannot be eaten at all.
    pub(crate) fn player_eat_element(&mut self, element: Element) -> Option<Element> {
        use Element::*;
        let (px, py) = (self.player_x, self.player_y);
        match element {
            DiamondKey => {
                self.diamond_key_collected = true;
                self.sound_play(Sound::DiamondKeyCollect, px, py);
                Some(Space)
            }

            Key1 => {
                self.sound_play(Sound::KeyCollect, px, py);
                self.key1 += 1;
                Some(Space)
            }
            Key2 => {
                self.sound_play(Sound::KeyCollect, px, py);
                self.key2 += 1;
                Some(Space)
            }
            Key3 => {
                self.sound_play(Sound::KeyCollect, px, py);
                self.key3 += 1;
                Some(Space)
            }
            Door1 => {
                if self.key1 == 0 {
                    return Some(element);
                }
                self.sound_play(Sound::DoorOpen, px, py);
                self.key1 -= 1;
                Some(Space)
            }
            Door2 => {
                if self.key2 == 0 {
                    return Some(element);
                }
                self.sound_play(Sound::DoorOpen, px, py);
                self.key2 -= 1;
                Some(Space)
            }
            Door3 => {
                if self.key3 == 0 {
                    return Some(element);
                }
                self.sound_play(Sound::DoorOpen, px, py);
                self.key3 -= 1;
                Some(Space)
            }

            CreatureSwitch => {
                self.sound_play(Sound::SwitchCreatures, px, py);
                self.creatures_backwards = !self.creatures_backwards;
                Some(element)
            }
            ExpandingWallSwitch => {
                self.sound_play(Sound::SwitchExpanding, px, py);
                self.expanding_wall_changed = !self.expanding_wall_changed;
                Some(element)
            }
            BiterSwitch => {
                self.sound_play(Sound::SwitchBiter, px, py);
                self.biter_delay_frame += 1;
                if self.biter_delay_frame == 4 {
                    self.biter_delay_frame = 0;
                }
                Some(element)
            }
            ReplicatorSwitch => {
                self.sound_play(Sound::SwitchReplicator, px, py);
                self.replicators_active = !self.replicators_active;
                Some(element)
            }
            ConveyorSwitch => {
                self.sound_play(Sound::SwitchConveyor, px, py);
                self.conveyor_belts_active = !self.conveyor_belts_active;
                Some(element)
            }
            ConveyorDirSwitch => {
                self.sound_play(Sound::SwitchConveyor, px, py);
                self.conveyor_belts_direction_changed =
                    !self.conveyor_belts_direction_changed;
                Some(element)
            }

            Dirt | Dirt2 | DirtSlopedUpRight | DirtSlopedUpLeft | DirtSlopedDownLeft
            | DirtSlopedDownRight | DirtBall | DirtLoose | SteelEatable | BrickEatable => {
                self.sound_play(Sound::WalkEarth, px, py);
                Some(Space)
            }

            // walking into lava is walking into space; the store into it
            // will silently absorb the player
            Space | Lava => {
                self.sound_play(Sound::WalkEmpty, px, py);
                Some(Space)
            }

            Sweet => {
                self.sound_play(Sound::SweetCollect, px, py);
                self.sweet_eaten = true;
                Some(Space)
            }

            PneumaticHammer => {
                self.sound_play(Sound::PneumaticCollect, px, py);
                self.got_pneumatic_hammer = true;
                Some(Space)
            }

            Clock => {
                self.sound_play(Sound::ClockCollect, px, py);
                let factor = self.params.timing_factor;
                self.time += self.params.time_bonus * factor;
                if self.time > self.params.max_time * factor {
                    self.time -= self.params.max_time * factor;
                }
                // dirt remains, not space
                Some(Dirt)
            }

            Diamond | FlyingDiamond => {
                self.sound_play(Sound::DiamondCollect, px, py);
                self.score += self.diamond_value;
                self.diamonds_collected += 1;
                if self.diamonds_needed == self.diamonds_collected {
                    self.gate_open = true;
                    // extra diamonds are worth more from now on
                    self.diamond_value = self.params.extra_diamond_value;
                    self.gate_open_flash = 1;
                    self.sound_play(Sound::Crack, px, py);
                    tracing::debug!(cave = %self.params.name, "gate open");
                }
                Some(Space)
            }

            Skeleton => {
                self.skeletons_collected += 1;
                for _ in 0..self.params.skeletons_worth_diamonds {
                    self.player_eat_element(Diamond);
                }
                // after the fake diamonds, so this sound wins the slot
                self.sound_play(Sound::SkeletonCollect, px, py);
                Some(Space)
            }

            Outbox | InvisOutbox => {
                self.player_state = PlayerState::Exited;
                tracing::debug!(cave = %self.params.name, "player exited");
                Some(Space)
            }

            _ => None,
        }
    }

    /// Try to push the element the player is walking into.
    ///
    /// Moves the pushed *element* only; moving the player is up to the
    /// caller, since the push may be part of a snap. Returns whether the
    /// push happened.
    pub(crate) fn do_push(&mut self, x: i32, y: i32, player_move: Dir, player_fire: bool) -> bool {
        use Element::*;
        let what = self.get_dir(x, y, player_move);
        let grav_compat = if self.params.policy.gravity_affects_all {
            self.gravity
        } else {
            Dir::Down
        };
        let mut result = false;

        match what {
            WaitingStone | Stone | NitroPack | ChasingStone | MegaStone | FlyingStone
            | Nut => {
                // stones only push orthogonally to gravity
                if player_move == self.gravity.ccw_90() || player_move == self.gravity.cw_90()
                {
                    let prob = match what {
                        WaitingStone => PROBABILITY_MAX, // always light enough
                        ChasingStone => {
                            if self.sweet_eaten {
                                PROBABILITY_MAX
                            } else {
                                0
                            }
                        }
                        MegaStone => {
                            if self.params.policy.mega_stones_pushable_with_sweet
                                && self.sweet_eaten
                            {
                                PROBABILITY_MAX
                            } else {
                                0
                            }
                        }
                        _ => {
                            if self.sweet_eaten {
                                self.params.pushing_stone_prob_sweet
                            } else {
                                self.params.pushing_stone_prob
                            }
                        }
                    };

                    if self.is_like_space(x, y, player_move.twice())
                        && self.rng.int_range(0, PROBABILITY_MAX) < prob
                    {
                        self.sound_of_element(
                            what,
                            x + player_move.dx(),
                            y + player_move.dy(),
                            true,
                        );
                        // a pushed stone "bounces"; everything else is
                        // pushed unchanged
                        let pushed = if what == Stone {
                            self.params.effects.stone_bouncing_effect
                        } else {
                            what
                        };
                        self.store_dir(x, y, player_move.twice(), pushed);
                        result = true;
                    }
                }
            }

            Bladder | Bladder1 | Bladder2 | Bladder3 | Bladder4 | Bladder5 | Bladder6
            | Bladder7 | Bladder8 => {
                // bladders cannot be pushed against gravity. after a
                // push, the delay restarts: always a plain bladder.
                if player_move != grav_compat.opposite() {
                    if player_move == grav_compat {
                        // pushing down: straight, then the two diagonals
                        if self.is_like_space(x, y, player_move.twice()) {
                            self.store_dir(x, y, player_move.twice(), Bladder);
                            result = true;
                        } else if self.is_like_space(x, y, grav_compat.cw_45()) {
                            self.store_dir(x, y, grav_compat.cw_45(), Bladder);
                            result = true;
                        } else if self.is_like_space(x, y, grav_compat.ccw_45()) {
                            self.store_dir(x, y, grav_compat.ccw_45(), Bladder);
                            result = true;
                        }
                    } else if player_move == grav_compat.cw_90() {
                        if self.is_like_space(x, y, player_move.twice()) {
                            self.store_dir(x, y, player_move.twice(), Bladder);
                            result = true;
                        } else if self.is_like_space(x, y, grav_compat.cw_45()) {
                            self.store_dir(x, y, grav_compat.cw_45(), Bladder);
                            result = true;
                        } else if self.is_like_space(x, y, player_move.cw_45()) {
                            self.store_dir(x, y, player_move.cw_45(), Bladder);
                            result = true;
                        }
                    } else if player_move == grav_compat.ccw_90() {
                        if self.is_like_space(x, y, player_move.twice()) {
                            self.store_dir(x, y, player_move.twice(), Bladder);
                            result = true;
                        } else if self.is_like_space(x, y, grav_compat.ccw_45()) {
                            self.store_dir(x, y, grav_compat.ccw_45(), Bladder);
                            result = true;
                        } else if self.is_like_space(x, y, player_move.ccw_45()) {
                            self.store_dir(x, y, player_move.ccw_45(), Bladder);
                            result = true;
                        }
                    }
                    if result {
                        self.sound_of_element(Bladder, x, y, true);
                    }
                }
            }

            Box => {
                // boxes move only while fire is held, but then always
                if player_fire && player_move.is_cardinal() {
                    if self.is_like_space(x, y, player_move.twice()) {
                        self.store_dir(x, y, player_move.twice(), Box);
                        self.sound_play(Sound::BoxPush, x, y);
                        result = true;
                    }
                }
            }

            _ => {}
        }

        result
    }

    /// Crazy Dream-style teleporter. Starting just past the player and
    /// wrapping the whole map in reading order, the first teleporter with
    /// free space on the player's side of it receives the player.
    pub(crate) fn do_teleporter(&mut self, px: i32, py: i32, player_move: Dir) -> bool {
        let (w, h) = (self.params.w, self.params.h);
        let (mut tx, mut ty) = (px, py);
        loop {
            tx += 1;
            if tx >= w {
                tx = 0;
                ty += 1;
                if ty >= h {
                    ty = 0;
                }
            }
            if self.get(tx, ty) == Element::Teleporter
                && self.is_like_space(tx, ty, player_move)
            {
                let player = self.get(px, py);
                self.store_dir(tx, ty, player_move, player);
                self.store(px, py, Element::Space);
                self.sound_play(Sound::Teleporter, tx, ty);
                return true;
            }
            if tx == px && ty == py {
                return false;
            }
        }
    }
}
