//! The live cave: state, rendering, and cell access.
//!
//! A [`CaveRendered`] is created from a [`CaveStored`] template, a level
//! and a seed, and from then on is mutated exclusively by
//! [`iterate`](CaveRendered::iterate). Everything a game needs to read
//! between ticks (player state, score, time, the three sound slots, the
//! particle queue, the map itself) is exposed through accessors; the cave
//! remains a valid snapshot whenever the caller stops iterating.
//!
//! Cell access wraps through the map addressing. Writes during a scan go
//! through [`store`](CaveRendered::store), which converts the element to
//! its scanned twin and makes lava absorb silently, as the rules demand.

use rockfall_cave::prelude::*;

use crate::RenderError;

// ---------------------------------------------------------------------------
// State enums
// ---------------------------------------------------------------------------

/// Player lifecycle within one cave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlayerState {
    /// Not yet born (cave time before hatching).
    NotYet,
    /// Alive and well.
    Living,
    /// Ran out of time.
    Timeout,
    /// Died.
    Died,
    /// Left through an outbox; proceed to the next cave.
    Exited,
}

/// Amoeba lifecycle. `TooBig` and `Enclosed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AmoebaState {
    /// Not yet discovered to be able to grow.
    Sleeping,
    /// Growing.
    Awake,
    /// Grew past the threshold; cells convert to the too-big effect.
    TooBig,
    /// Fully enclosed; cells convert to the enclosed effect.
    Enclosed,
}

/// Magic wall lifecycle: `Dormant -> Active -> Expired`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MagicWallState {
    /// Waiting for the first element to drop in.
    Dormant,
    /// Milling.
    Active,
    /// Ran out of milling time; stays off for this cave.
    Expired,
}

// ---------------------------------------------------------------------------
// CaveRendered
// ---------------------------------------------------------------------------

/// Number of remembered player positions, used by chasing stones.
pub(crate) const PLAYER_MEM: usize = 16;

/// A cave rendered for play.
pub struct CaveRendered {
    /// Immutable parameters resolved for the rendered level.
    pub params: CaveParams,

    // -- maps --------------------------------------------------------------
    pub(crate) map: CaveMap<Element>,
    /// Which drawing object (arena index) last drew each cell. Editor
    /// attribution only; the engine clears it on moves.
    pub(crate) objects_order: CaveMap<Option<u32>>,
    /// Countdown per cell until a hammered wall reappears.
    pub(crate) hammered_reappear: CaveMap<i32>,
    /// The drawing objects the cave was built from.
    pub(crate) objects: Vec<CaveObject>,

    // -- randomness --------------------------------------------------------
    /// The seed the cave was rendered with, kept for replays.
    pub(crate) render_seed: i32,
    pub(crate) rng: GameRng,
    pub(crate) c64_rng: C64Rng,
    /// Cosmetic randomness (particles, random diamond sound). Never part
    /// of replayed state.
    pub(crate) aux_rng: GameRng,
    /// Level the cave was rendered for, 0-based.
    pub(crate) rendered_on: u8,

    // -- timers ------------------------------------------------------------
    pub(crate) speed: i32,
    pub(crate) ckdelay_current: i32,
    pub(crate) ckdelay_extra_for_animation: i32,
    pub(crate) hatching_delay_frame: i32,
    pub(crate) hatching_delay_time: i32,
    pub(crate) time: i32,
    pub(crate) magic_wall_time: i32,
    pub(crate) amoeba_time: i32,
    pub(crate) amoeba_2_time: i32,
    pub(crate) gravity_will_change: i32,
    pub(crate) creatures_direction_will_change: i32,
    pub(crate) pneumatic_hammer_active_delay: i32,
    pub(crate) biters_wait_frame: i32,
    pub(crate) replicators_wait_frame: i32,
    pub(crate) gate_open_flash: i32,

    // -- counters ----------------------------------------------------------
    pub(crate) diamonds_needed: i32,
    pub(crate) diamonds_collected: i32,
    pub(crate) skeletons_collected: i32,
    pub(crate) score: i32,
    pub(crate) key1: i32,
    pub(crate) key2: i32,
    pub(crate) key3: i32,

    // -- flags -------------------------------------------------------------
    pub(crate) hatched: bool,
    pub(crate) gate_open: bool,
    pub(crate) sweet_eaten: bool,
    pub(crate) diamond_key_collected: bool,
    pub(crate) got_pneumatic_hammer: bool,
    pub(crate) gravity_disabled: bool,
    pub(crate) inbox_flash_toggle: bool,
    pub(crate) kill_player: bool,
    pub(crate) voodoo_touched: bool,

    // -- mutable copies of parameters --------------------------------------
    pub(crate) gravity: Dir,
    pub(crate) gravity_next_direction: Dir,
    pub(crate) gravity_switch_active: bool,
    pub(crate) diamond_value: i32,
    pub(crate) creatures_backwards: bool,
    pub(crate) expanding_wall_changed: bool,
    pub(crate) replicators_active: bool,
    pub(crate) conveyor_belts_active: bool,
    pub(crate) conveyor_belts_direction_changed: bool,
    pub(crate) biter_delay_frame: i32,
    pub(crate) amoeba_growth_prob: i32,
    pub(crate) amoeba_2_growth_prob: i32,

    // -- states ------------------------------------------------------------
    pub(crate) player_state: PlayerState,
    pub(crate) amoeba_state: AmoebaState,
    pub(crate) amoeba_2_state: AmoebaState,
    pub(crate) magic_wall_state: MagicWallState,
    pub(crate) player_seen_ago: i32,
    pub(crate) player_x: i32,
    pub(crate) player_y: i32,
    pub(crate) player_mem: [(i32, i32); PLAYER_MEM],
    pub(crate) last_direction: Dir,
    pub(crate) last_horizontal_direction: Dir,

    // -- per-tick outputs --------------------------------------------------
    pub(crate) sound1: SoundWithPos,
    pub(crate) sound2: SoundWithPos,
    pub(crate) sound3: SoundWithPos,
    pub(crate) particles: Vec<ParticleSet>,
    /// Cosmetic particle effects on/off; does not influence the replayed
    /// game state.
    pub particle_effects: bool,
}

impl CaveRendered {
    /// Render a cave template for play.
    ///
    /// `level` is 1..=5. A non-negative `seed` is used as is (modulo
    /// 65536); `seed = -1` takes the template's per-level seed, and if
    /// that is also -1 a fresh random seed is drawn, which is what games
    /// do between attempts.
    ///
    /// # Errors
    ///
    /// Fails if the template geometry is invalid or a literal map does
    /// not match the declared size.
    pub fn render(stored: &CaveStored, level: u8, seed: i32) -> Result<CaveRendered, RenderError> {
        if stored.w < 2 || stored.h < 2 {
            return Err(RenderError::InvalidGeometry {
                w: stored.w,
                h: stored.h,
            });
        }
        if let Some(map) = &stored.map {
            if map.width() != stored.w || map.height() != stored.h {
                return Err(RenderError::MapSizeMismatch {
                    declared: (stored.w, stored.h),
                    actual: (map.width(), map.height()),
                });
            }
        }
        let level = level.clamp(1, 5);
        let params = stored.params_for_level(level);

        let render_seed = if seed >= 0 {
            seed % 65536
        } else {
            let from_level = stored.level_rand[(level - 1) as usize];
            if from_level >= 0 {
                from_level % 65536
            } else {
                GameRng::from_entropy().int_range(0, 65536)
            }
        };

        let wrap = if params.policy.lineshift {
            WrapKind::LineShift
        } else {
            WrapKind::Perfect
        };

        let mut cave = CaveRendered {
            map: {
                let mut m = CaveMap::new(stored.w, stored.h, Element::Space);
                m.set_wrap(wrap);
                m
            },
            objects_order: CaveMap::new(stored.w, stored.h, None),
            hammered_reappear: CaveMap::new(stored.w, stored.h, 0),
            objects: stored.objects.clone(),
            render_seed,
            rng: GameRng::with_seed(render_seed as u64),
            c64_rng: C64Rng::with_seed(render_seed),
            aux_rng: GameRng::from_entropy(),
            rendered_on: level - 1,

            speed: params.speed,
            ckdelay_current: 0,
            ckdelay_extra_for_animation: 0,
            hatching_delay_frame: params.hatching_delay_frame,
            hatching_delay_time: params.hatching_delay_time * 1000,
            time: params.time * params.timing_factor,
            magic_wall_time: params.magic_wall_time * 1000,
            amoeba_time: params.amoeba_time * 1000,
            amoeba_2_time: params.amoeba_2_time * 1000,
            gravity_will_change: 0,
            creatures_direction_will_change: 0,
            pneumatic_hammer_active_delay: 0,
            biters_wait_frame: 0,
            replicators_wait_frame: 0,
            gate_open_flash: 0,

            diamonds_needed: params.diamonds_needed,
            diamonds_collected: 0,
            skeletons_collected: 0,
            score: 0,
            key1: 0,
            key2: 0,
            key3: 0,

            hatched: false,
            gate_open: false,
            sweet_eaten: false,
            diamond_key_collected: false,
            got_pneumatic_hammer: false,
            gravity_disabled: false,
            inbox_flash_toggle: false,
            kill_player: false,
            voodoo_touched: false,

            gravity: params.gravity,
            gravity_next_direction: params.gravity,
            gravity_switch_active: params.gravity_switch_active,
            diamond_value: params.diamond_value,
            creatures_backwards: params.creatures_backwards,
            expanding_wall_changed: params.expanding_wall_changed,
            replicators_active: params.replicators_active,
            conveyor_belts_active: params.conveyor_belts_active,
            conveyor_belts_direction_changed: params.conveyor_belts_direction_changed,
            biter_delay_frame: params.biter_delay_frame,
            amoeba_growth_prob: params.amoeba_growth_prob,
            amoeba_2_growth_prob: params.amoeba_2_growth_prob,

            player_state: PlayerState::NotYet,
            amoeba_state: AmoebaState::Sleeping,
            amoeba_2_state: AmoebaState::Sleeping,
            magic_wall_state: MagicWallState::Dormant,
            player_seen_ago: 0,
            player_x: 0,
            player_y: 0,
            player_mem: [(0, 0); PLAYER_MEM],
            last_direction: Dir::Still,
            last_horizontal_direction: Dir::Still,

            sound1: SoundWithPos::silence(),
            sound2: SoundWithPos::silence(),
            sound3: SoundWithPos::silence(),
            particles: Vec::new(),
            particle_effects: true,

            params,
        };

        cave.create_map(stored, level);
        cave.setup_for_game();
        Ok(cave)
    }

    /// Build the map: copy the literal map, or generate the classic
    /// random fill, then execute the drawing objects of this level.
    fn create_map(&mut self, stored: &CaveStored, level: u8) {
        match &stored.map {
            Some(map) => {
                self.map = map.clone();
                self.map.set_wrap(if self.params.policy.lineshift {
                    WrapKind::LineShift
                } else {
                    WrapKind::Perfect
                });
            }
            None => {
                // Classic generated cave: the predictable generator fills
                // row by row, then a border is drawn around everything.
                let mut c64 = C64Rng::with_seed(self.render_seed);
                for y in 0..stored.h {
                    for x in 0..stored.w {
                        let byte = c64.next_byte() as i32;
                        let mut element = stored.initial_fill;
                        for &(fill, prob) in &stored.random_fill {
                            if byte < prob {
                                element = fill;
                            }
                        }
                        self.map.set(x, y, element);
                    }
                }
                for x in 0..stored.w {
                    self.map.set(x, 0, stored.initial_border);
                    self.map.set(x, stored.h - 1, stored.initial_border);
                }
                for y in 0..stored.h {
                    self.map.set(0, y, stored.initial_border);
                    self.map.set(stored.w - 1, y, stored.initial_border);
                }
            }
        }

        for index in 0..self.objects.len() {
            let object = self.objects[index].clone();
            if object.seen_on_level(level) {
                self.draw_object(&object, index as u32);
            }
        }
    }

    /// Post-render setup: find the player, prime the position memory, and
    /// charge the animation ckdelay surcharge.
    fn setup_for_game(&mut self) {
        for (x, y, &e) in self.map.iter() {
            if e.flags().contains(ElementFlags::PLAYER) || e == Element::Inbox {
                self.player_x = x;
                self.player_y = y;
            }
        }
        self.player_mem = [(self.player_x, self.player_y); PLAYER_MEM];
        self.set_ckdelay_extra_for_animation();
    }

    /// The original hardware spent time animating each element *kind*
    /// present in the cave, about 2.6 ms per kind and frame.
    fn set_ckdelay_extra_for_animation(&mut self) {
        use Element::*;
        let mut firefly = false;
        let mut butterfly = false;
        let mut amoeba = false;
        let mut magic = false;
        for (_, _, &e) in self.map.iter() {
            match e.unscanned_pair() {
                Firefly1 | Firefly2 | Firefly3 | Firefly4 => firefly = true,
                Butterfly1 | Butterfly2 | Butterfly3 | Butterfly4 => butterfly = true,
                Amoeba | Amoeba2 => amoeba = true,
                MagicWall => magic = true,
                _ => {}
            }
        }
        let kinds =
            firefly as i32 + butterfly as i32 + amoeba as i32 + magic as i32;
        self.ckdelay_extra_for_animation = 2600 * kinds;
    }

    /// Count the diamonds on the map. Used at hatching when the cave
    /// declares a negative `diamonds_needed` ("collect all but n").
    pub(crate) fn count_diamonds(&mut self) {
        if self.diamonds_needed >= 0 {
            return;
        }
        let mut count = 0;
        for (_, _, &e) in self.map.iter() {
            if matches!(e.unscanned_pair(), Element::Diamond | Element::FlyingDiamond) {
                count += 1;
            }
        }
        self.diamonds_needed = (count + self.diamonds_needed).max(0);
        tracing::debug!(
            cave = %self.params.name,
            diamonds_needed = self.diamonds_needed,
            "counted diamonds at hatching"
        );
    }

    // -- cell access --------------------------------------------------------

    /// The element at `(x, y)`, wrapped.
    #[inline]
    pub(crate) fn get(&self, x: i32, y: i32) -> Element {
        self.map.at(x, y)
    }

    /// The element one step in `dir` from `(x, y)`.
    #[inline]
    pub(crate) fn get_dir(&self, x: i32, y: i32, dir: Dir) -> Element {
        self.map.at(x + dir.dx(), y + dir.dy())
    }

    #[inline]
    pub(crate) fn flags_at(&self, x: i32, y: i32, dir: Dir) -> ElementFlags {
        self.get_dir(x, y, dir).flags()
    }

    /// True if the neighbor explodes when hit by a falling element.
    #[inline]
    pub(crate) fn explodes_by_hit(&self, x: i32, y: i32, dir: Dir) -> bool {
        self.flags_at(x, y, dir).contains(ElementFlags::EXPLODES_BY_HIT)
    }

    /// True if the cell cannot be destroyed by explosions.
    #[inline]
    pub(crate) fn non_explodable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).flags().contains(ElementFlags::NON_EXPLODABLE)
    }

    /// True if the amoeba can consume the neighbor.
    #[inline]
    pub(crate) fn amoeba_eats(&self, x: i32, y: i32, dir: Dir) -> bool {
        self.flags_at(x, y, dir).contains(ElementFlags::AMOEBA_CONSUMES)
    }

    /// True if the neighbor in `dir` is sloped in direction `slope`.
    pub(crate) fn sloped(&self, x: i32, y: i32, dir: Dir, slope: Dir) -> bool {
        let flags = self.flags_at(x, y, dir);
        match slope {
            Dir::Left => flags.contains(ElementFlags::SLOPED_LEFT),
            Dir::Right => flags.contains(ElementFlags::SLOPED_RIGHT),
            Dir::Up => flags.contains(ElementFlags::SLOPED_UP),
            Dir::Down => flags.contains(ElementFlags::SLOPED_DOWN),
            _ => false,
        }
    }

    /// True if the neighbor acts sloped for bladders.
    #[inline]
    pub(crate) fn sloped_for_bladder(&self, x: i32, y: i32, dir: Dir) -> bool {
        self.flags_at(x, y, dir).contains(ElementFlags::BLADDER_SLOPED)
    }

    /// True if the neighbor blows up flies touching it.
    #[inline]
    pub(crate) fn blows_up_flies(&self, x: i32, y: i32, dir: Dir) -> bool {
        self.flags_at(x, y, dir).contains(ElementFlags::BLOWS_UP_FLIES)
    }

    /// True if the cell holds a counter-clockwise creature.
    #[inline]
    pub(crate) fn rotates_ccw(&self, x: i32, y: i32) -> bool {
        self.get(x, y).flags().contains(ElementFlags::CCW)
    }

    /// True if the cell holds any player variant.
    #[inline]
    pub(crate) fn is_player(&self, x: i32, y: i32) -> bool {
        self.get(x, y).flags().contains(ElementFlags::PLAYER)
    }

    /// True if the neighbor holds any player variant.
    #[inline]
    pub(crate) fn is_player_dir(&self, x: i32, y: i32, dir: Dir) -> bool {
        self.flags_at(x, y, dir).contains(ElementFlags::PLAYER)
    }

    /// True if the neighbor can be broken by the pneumatic hammer.
    #[inline]
    pub(crate) fn can_be_hammered(&self, x: i32, y: i32, dir: Dir) -> bool {
        self.flags_at(x, y, dir).contains(ElementFlags::CAN_BE_HAMMERED)
    }

    #[inline]
    pub(crate) fn is_scanned(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_scanned()
    }

    #[inline]
    pub(crate) fn is_scanned_dir(&self, x: i32, y: i32, dir: Dir) -> bool {
        self.get_dir(x, y, dir).is_scanned()
    }

    /// True if the neighbor is `e` or equivalent to it: all dirt kinds
    /// are one, and lava counts as space so anything may move into it.
    pub(crate) fn is_like_element(&self, x: i32, y: i32, dir: Dir, e: Element) -> bool {
        let mut examined = self.get_dir(x, y, dir);
        let mut wanted = e;
        if examined.flags().contains(ElementFlags::DIRT) {
            examined = Element::Dirt;
        }
        if wanted.flags().contains(ElementFlags::DIRT) {
            wanted = Element::Dirt;
        }
        if examined == Element::Lava {
            examined = Element::Space;
        }
        examined == wanted
    }

    /// True if the neighbor is space, or lava, which absorbs anything
    /// moving into it and must allow every movement space allows.
    #[inline]
    pub(crate) fn is_like_space(&self, x: i32, y: i32, dir: Dir) -> bool {
        let e = self.get_dir(x, y, dir);
        e == Element::Space || e == Element::Lava
    }

    /// True if the neighbor is any dirt kind.
    #[inline]
    pub(crate) fn is_like_dirt(&self, x: i32, y: i32, dir: Dir) -> bool {
        self.flags_at(x, y, dir).contains(ElementFlags::DIRT)
    }

    // -- cell writes --------------------------------------------------------

    /// Store an element during a scan. The target becomes the scanned
    /// twin. Lava absorbs the write: the sound plays, the map keeps its
    /// lava.
    pub(crate) fn store(&mut self, x: i32, y: i32, element: Element) {
        self.store_inner(x, y, element, false);
    }

    /// Like [`store`](Self::store), with dirt-consumption particles
    /// suppressed (explosions emit their own).
    pub(crate) fn store_no_particle(&mut self, x: i32, y: i32, element: Element) {
        self.store_inner(x, y, element, true);
    }

    fn store_inner(&mut self, x: i32, y: i32, element: Element, disable_particle: bool) {
        if self.get(x, y) == Element::Lava {
            self.sound_of_element(Element::Lava, x, y, true);
            return;
        }
        if self.is_like_dirt(x, y, Dir::Still) && !disable_particle {
            self.add_particle_set(x, y, Element::Dirt);
        }
        self.map.set(x, y, element.scanned_pair());
        *self.objects_order.get_mut(x, y) = None;
    }

    /// Store an element one step away.
    pub(crate) fn store_dir(&mut self, x: i32, y: i32, dir: Dir, element: Element) {
        self.store(x + dir.dx(), y + dir.dy(), element);
    }

    /// Store the element one step away and leave space behind.
    pub(crate) fn move_dir(&mut self, x: i32, y: i32, dir: Dir, element: Element) {
        self.store_dir(x, y, dir, element);
        self.store(x, y, Element::Space);
    }

    /// Advance a timed-sequence cell one stage, without scanning it.
    pub(crate) fn next(&mut self, x: i32, y: i32) {
        let e = self.get(x, y);
        self.map.set(x, y, e.next_stage());
    }

    /// Remove the scanned marker from a cell, if set.
    pub(crate) fn unscan(&mut self, x: i32, y: i32) {
        let e = self.get(x, y);
        if e.is_scanned() {
            self.map.set(x, y, e.unscanned_pair());
        }
    }

    /// Store an element while rendering, remembering which drawing object
    /// put it there. This is the only writer of the attribution map.
    pub(crate) fn store_rc(&mut self, x: i32, y: i32, element: Element, order: u32) {
        self.map.set(x, y, element);
        *self.objects_order.get_mut(x, y) = Some(order);
    }

    // -- read accessors -----------------------------------------------------

    /// The element map. Cells never hold scanned twins between ticks.
    pub fn map(&self) -> &CaveMap<Element> {
        &self.map
    }

    /// Which drawing object drew each cell, by arena index.
    pub fn objects_order(&self) -> &CaveMap<Option<u32>> {
        &self.objects_order
    }

    /// The seed this cave was rendered with.
    pub fn render_seed(&self) -> i32 {
        self.render_seed
    }

    /// The level this cave was rendered for, 1..=5.
    pub fn params_level(&self) -> u8 {
        self.rendered_on + 1
    }

    /// Current player state.
    pub fn player_state(&self) -> PlayerState {
        self.player_state
    }

    /// Player coordinates from the last scan.
    pub fn player_pos(&self) -> (i32, i32) {
        (self.player_x, self.player_y)
    }

    /// Diamonds collected so far.
    pub fn diamonds_collected(&self) -> i32 {
        self.diamonds_collected
    }

    /// Diamonds still required to open the gate.
    pub fn diamonds_needed(&self) -> i32 {
        self.diamonds_needed
    }

    /// Score accumulated in this cave.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Remaining cave time in internal milliseconds.
    pub fn time(&self) -> i32 {
        self.time
    }

    /// Remaining time in whole seconds as shown to the player. Rounds up,
    /// so the display only reaches 0 when the time is really out.
    pub fn time_visible(&self) -> i32 {
        (self.time + self.params.timing_factor - 1) / self.params.timing_factor
    }

    /// The wall-clock milliseconds the caller should sleep before the
    /// next tick, derived by the cave's scheduler.
    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// True once enough diamonds were collected.
    pub fn gate_open(&self) -> bool {
        self.gate_open
    }

    /// Magic wall lifecycle state.
    pub fn magic_wall_state(&self) -> MagicWallState {
        self.magic_wall_state
    }

    /// First amoeba lifecycle state.
    pub fn amoeba_state(&self) -> AmoebaState {
        self.amoeba_state
    }

    /// Second amoeba lifecycle state.
    pub fn amoeba_2_state(&self) -> AmoebaState {
        self.amoeba_2_state
    }

    /// Whether hatching has happened and timers run.
    pub fn hatched(&self) -> bool {
        self.hatched
    }

    /// Sound slot of channel 1.
    pub fn sound1(&self) -> SoundWithPos {
        self.sound1
    }

    /// Sound slot of channel 2.
    pub fn sound2(&self) -> SoundWithPos {
        self.sound2
    }

    /// Sound slot of channel 3.
    pub fn sound3(&self) -> SoundWithPos {
        self.sound3
    }

    /// Live particle sets.
    pub fn particles(&self) -> &[ParticleSet] {
        &self.particles
    }

    // -- fingerprints -------------------------------------------------------

    /// The classic Adler-style checksum over the map, as stored in replay
    /// records.
    pub fn checksum(&self) -> u32 {
        let mut a: u32 = 1;
        let mut b: u32 = 0;
        self.checksum_more(&mut a, &mut b);
        (b << 16) | a
    }

    /// Fold this cave's map into a running Adler checksum.
    pub fn checksum_more(&self, a: &mut u32, b: &mut u32) {
        const MOD_ADLER: u32 = 65521;
        for (_, _, &e) in self.map.iter() {
            *a = (*a + e.unscanned_pair() as u32) % MOD_ADLER;
            *b = (*b + *a) % MOD_ADLER;
        }
    }

    /// A full-state fingerprint for divergence reporting: the map plus
    /// the externally observable counters and the deterministic RNG
    /// state.
    pub fn state_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (_, _, &e) in self.map.iter() {
            hasher.update(&(e as u16).to_le_bytes());
        }
        hasher.update(&self.time.to_le_bytes());
        hasher.update(&self.score.to_le_bytes());
        hasher.update(&self.diamonds_collected.to_le_bytes());
        hasher.update(&[self.player_state as u8]);
        let (r1, r2) = self.c64_rng.state();
        hasher.update(&[r1, r2]);
        hasher.finalize().to_hex().to_string()
    }
}
