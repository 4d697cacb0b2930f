//! Cave templates and resolved per-level parameters.
//!
//! A [`CaveStored`] is the editable template: geometry, per-level value
//! arrays, dozens of behavior switches that distinguish the engine
//! dialects, the effect mappings, and either a literal map or a list of
//! drawing objects. Rendering resolves a template plus a level into a
//! [`CaveParams`] -- the flat, immutable parameter block the iteration
//! engine reads. Values that change during play (gravity, the current
//! diamond value, switch states...) are *initialized* from the params and
//! then live in the rendered cave's own state.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::direction::Dir;
use crate::element::Element;
use crate::map::CaveMap;
use crate::object::CaveObject;

/// Probabilities are stored in millionths, like the original's cave data.
pub const PROBABILITY_MAX: i32 = 1_000_000;

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

/// The frame-time derivation model, one per emulated platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scheduling {
    /// A fixed, configured frame time.
    #[default]
    Milliseconds,
    /// C64 BD1 delay-loop timing.
    Bd1,
    /// Atari BD1, slightly faster.
    Bd1Atari,
    /// C64 BD2.
    Bd2,
    /// C64 construction kit.
    Plck,
    /// Atari BD2 / construction kit.
    Bd2PlckAtari,
    /// Crazy Dream 7.
    Crdr,
}

// ---------------------------------------------------------------------------
// EngineKind
// ---------------------------------------------------------------------------

/// The engine dialects a cave can declare. Selecting one applies a preset
/// of scheduling and policy switches; individual switches can still be
/// overridden afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum EngineKind {
    Bd1,
    Bd2,
    Plck,
    FirstB,
    CrazyDream,
    CrazyLight,
}

// ---------------------------------------------------------------------------
// EnginePolicy
// ---------------------------------------------------------------------------

/// The boolean behavior switches that distinguish engine dialects.
/// Grouped so rule functions can take the set immutably. Several of these
/// preserve known quirks of the originals; they are configuration, not
/// bugs to fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePolicy {
    /// Wrapping from the last column advances one line (original hardware).
    pub lineshift: bool,
    /// Scan the first and last map line, or leave a steel frame untouched.
    pub border_scan_first_and_last: bool,
    /// Allow diagonal player movement; otherwise diagonals are rectified
    /// to their horizontal component.
    pub diagonal_movements: bool,
    /// Find the active player by scanning backwards (1stB compatibility).
    pub active_is_first_found: bool,
    /// Explosions skip their first stage (BD1 compatibility).
    pub short_explosions: bool,
    /// Gravity also applies to bladders and falling walls.
    pub gravity_affects_all: bool,
    /// A stone falling on the voodoo explodes it (1stB).
    pub voodoo_dies_by_stone: bool,
    /// The voodoo collects diamonds falling onto it (1stB).
    pub voodoo_collects_diamonds: bool,
    /// Explosions destroy the voodoo; otherwise it survives bombs/ghosts.
    pub voodoo_disappear_in_explosion: bool,
    /// Any harm to the voodoo kills the player.
    pub voodoo_any_hurt_kills_player: bool,
    /// An active magic wall stops amoeba growth for good.
    pub magic_wall_stops_amoeba: bool,
    /// The magic wall timer waits for hatching.
    pub magic_timer_wait_for_hatching: bool,
    /// The amoeba timer runs from cave start, not first growth.
    pub amoeba_timer_started_immediately: bool,
    /// The amoeba timer waits for hatching.
    pub amoeba_timer_wait_for_hatching: bool,
    /// Amoeba 2 explodes when touching the first amoeba.
    pub amoeba_2_explodes_by_amoeba: bool,
    /// Water does not flow downwards (Crazy Dream).
    pub water_does_not_flow_down: bool,
    /// Hammered walls grow back after a delay.
    pub hammered_walls_reappear: bool,
    /// Mega stones can be pushed after eating the sweet.
    pub mega_stones_pushable_with_sweet: bool,
    /// Play a sound when gravity finally changes.
    pub gravity_change_sound: bool,
    /// Play a sound on the automatic creature direction change.
    pub creature_direction_auto_change_sound: bool,
    /// Creatures change direction at the moment of hatching already.
    pub creatures_direction_auto_change_on_start: bool,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        EnginePolicy {
            lineshift: false,
            border_scan_first_and_last: true,
            diagonal_movements: false,
            active_is_first_found: true,
            short_explosions: false,
            gravity_affects_all: true,
            voodoo_dies_by_stone: false,
            voodoo_collects_diamonds: false,
            voodoo_disappear_in_explosion: true,
            voodoo_any_hurt_kills_player: false,
            magic_wall_stops_amoeba: true,
            magic_timer_wait_for_hatching: false,
            amoeba_timer_started_immediately: true,
            amoeba_timer_wait_for_hatching: false,
            amoeba_2_explodes_by_amoeba: true,
            water_does_not_flow_down: false,
            hammered_walls_reappear: false,
            mega_stones_pushable_with_sweet: false,
            gravity_change_sound: true,
            creature_direction_auto_change_sound: false,
            creatures_direction_auto_change_on_start: false,
        }
    }
}

// ---------------------------------------------------------------------------
// EffectTable
// ---------------------------------------------------------------------------

/// Per-cave element mappings: what things fall as, bounce back to, turn
/// into in the magic wall, or leave behind after exploding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct EffectTable {
    pub explosion_effect: Element,
    pub explosion_3_effect: Element,
    pub diamond_birth_effect: Element,
    pub bomb_explosion_effect: Element,
    pub nitro_explosion_effect: Element,
    pub amoeba_2_explosion_effect: Element,

    pub stone_falling_effect: Element,
    pub stone_bouncing_effect: Element,
    pub diamond_falling_effect: Element,
    pub diamond_bouncing_effect: Element,

    pub magic_stone_to: Element,
    pub magic_diamond_to: Element,
    pub magic_mega_stone_to: Element,
    pub magic_nut_to: Element,
    pub magic_nitro_pack_to: Element,
    pub magic_flying_stone_to: Element,
    pub magic_flying_diamond_to: Element,

    pub acid_eats_this: Element,
    pub acid_turns_to: Element,
    pub nut_turns_to_when_crushed: Element,

    pub amoeba_too_big_effect: Element,
    pub amoeba_enclosed_effect: Element,
    pub amoeba_2_too_big_effect: Element,
    pub amoeba_2_enclosed_effect: Element,

    pub firefly_explode_to: Element,
    pub alt_firefly_explode_to: Element,
    pub butterfly_explode_to: Element,
    pub alt_butterfly_explode_to: Element,
    pub stonefly_explode_to: Element,
    pub dragonfly_explode_to: Element,

    pub slime_eats_1: Element,
    pub slime_converts_1: Element,
    pub slime_eats_2: Element,
    pub slime_converts_2: Element,
    pub slime_eats_3: Element,
    pub slime_converts_3: Element,

    pub bladder_converts_by: Element,
    pub biter_eat: Element,
    /// What remains in the snapped cell when the player snaps with fire.
    pub snap_element: Element,
}

impl Default for EffectTable {
    fn default() -> Self {
        use Element::*;
        EffectTable {
            explosion_effect: Space,
            explosion_3_effect: Explode4,
            diamond_birth_effect: Diamond,
            bomb_explosion_effect: Brick,
            nitro_explosion_effect: Space,
            amoeba_2_explosion_effect: Space,

            stone_falling_effect: StoneF,
            stone_bouncing_effect: Stone,
            diamond_falling_effect: DiamondF,
            diamond_bouncing_effect: Diamond,

            magic_stone_to: DiamondF,
            magic_diamond_to: StoneF,
            magic_mega_stone_to: NitroPackF,
            magic_nut_to: NutF,
            magic_nitro_pack_to: MegaStoneF,
            magic_flying_stone_to: FlyingDiamondF,
            magic_flying_diamond_to: FlyingStoneF,

            acid_eats_this: Dirt,
            acid_turns_to: Explode3,
            nut_turns_to_when_crushed: NutCrack1,

            amoeba_too_big_effect: Stone,
            amoeba_enclosed_effect: Diamond,
            amoeba_2_too_big_effect: Stone,
            amoeba_2_enclosed_effect: Diamond,

            firefly_explode_to: Explode1,
            alt_firefly_explode_to: Explode1,
            butterfly_explode_to: PreDia1,
            alt_butterfly_explode_to: PreDia1,
            stonefly_explode_to: PreStone1,
            dragonfly_explode_to: Explode1,

            slime_eats_1: Diamond,
            slime_converts_1: DiamondF,
            slime_eats_2: Stone,
            slime_converts_2: StoneF,
            slime_eats_3: Nut,
            slime_converts_3: NutF,

            bladder_converts_by: Voodoo,
            biter_eat: Diamond,
            snap_element: Space,
        }
    }
}

// ---------------------------------------------------------------------------
// SoundOptions
// ---------------------------------------------------------------------------

/// Per-element sound enables. Some caves silence selected element sounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct SoundOptions {
    pub water_sound: bool,
    pub amoeba_sound: bool,
    pub magic_wall_sound: bool,
    pub stone_sound: bool,
    pub diamond_sound: bool,
    pub nut_sound: bool,
    pub nitro_sound: bool,
    pub falling_wall_sound: bool,
    pub expanding_wall_sound: bool,
    pub bladder_spender_sound: bool,
    pub bladder_convert_sound: bool,
    pub bladder_sound: bool,
    pub slime_sound: bool,
    pub lava_sound: bool,
    pub acid_spread_sound: bool,
    pub biter_sound: bool,
    /// Replace non-classic sounds with their classic equivalent.
    pub classic_sounds_only: bool,
}

impl Default for SoundOptions {
    fn default() -> Self {
        SoundOptions {
            water_sound: true,
            amoeba_sound: true,
            magic_wall_sound: true,
            stone_sound: true,
            diamond_sound: true,
            nut_sound: true,
            nitro_sound: true,
            falling_wall_sound: true,
            expanding_wall_sound: true,
            bladder_spender_sound: true,
            bladder_convert_sound: true,
            bladder_sound: true,
            slime_sound: true,
            lava_sound: true,
            acid_spread_sound: true,
            biter_sound: true,
            classic_sounds_only: false,
        }
    }
}

// ---------------------------------------------------------------------------
// CaveStored
// ---------------------------------------------------------------------------

/// A cave template: everything needed to render any of its five levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaveStored {
    /// Cave name, for diagnostics.
    pub name: String,

    // -- geometry ----------------------------------------------------------
    /// Cave width in cells.
    pub w: i32,
    /// Cave height in cells.
    pub h: i32,
    /// Top left of the visible window.
    pub x1: i32,
    pub y1: i32,
    /// Bottom right of the visible window.
    pub x2: i32,
    pub y2: i32,
    /// Intermissions are small bonus caves with faster scheduling.
    pub intermission: bool,

    // -- timing ------------------------------------------------------------
    /// Frame-time derivation model.
    pub scheduling: Scheduling,
    /// PAL machines had 1200 "milliseconds" per second, NTSC 1000.
    pub pal_timing: bool,

    // -- per-level arrays (index 0 = level 1) ------------------------------
    /// Cave time in seconds.
    pub level_time: [i32; 5],
    /// Points per remaining second.
    pub level_timevalue: [i32; 5],
    /// Diamonds needed; negative means a fraction counted at hatching.
    pub level_diamonds: [i32; 5],
    /// Frame time in ms for [`Scheduling::Milliseconds`].
    pub level_speed: [i32; 5],
    /// The per-level ckdelay knob of the C64 schedulers.
    pub level_ckdelay: [i32; 5],
    /// Hatching delay in frames (milliseconds scheduling).
    pub level_hatching_delay_frame: [i32; 5],
    /// Hatching delay in seconds (C64 schedulings).
    pub level_hatching_delay_time: [i32; 5],
    /// Magic wall milling time in seconds.
    pub level_magic_wall_time: [i32; 5],
    /// Amoeba slow-growth time in seconds.
    pub level_amoeba_time: [i32; 5],
    /// Amoeba cell count threshold.
    pub level_amoeba_threshold: [i32; 5],
    /// Second amoeba slow-growth time in seconds.
    pub level_amoeba_2_time: [i32; 5],
    /// Second amoeba cell count threshold.
    pub level_amoeba_2_threshold: [i32; 5],
    /// Slime permeability in millionths (unpredictable mode).
    pub level_slime_permeability: [i32; 5],
    /// Slime permeability bit mask (predictable C64 mode).
    pub level_slime_permeability_c64: [i32; 5],
    /// Render seed per level; -1 draws a fresh random seed.
    pub level_rand: [i32; 5],

    // -- scoring and time --------------------------------------------------
    /// Score per diamond.
    pub diamond_value: i32,
    /// Score per diamond once the gate is open.
    pub extra_diamond_value: i32,
    /// Seconds gained per clock.
    pub time_bonus: i32,
    /// Seconds lost per destroyed voodoo.
    pub time_penalty: i32,
    /// Cave time wraps above this many seconds (clock collection).
    pub max_time: i32,

    // -- probabilities, in millionths --------------------------------------
    pub amoeba_growth_prob: i32,
    pub amoeba_fast_growth_prob: i32,
    pub amoeba_2_growth_prob: i32,
    pub amoeba_2_fast_growth_prob: i32,
    pub acid_spread_ratio: i32,
    pub pushing_stone_prob: i32,
    pub pushing_stone_prob_sweet: i32,
    /// Use the predictable C64 generator for slime.
    pub slime_predictable: bool,

    // -- switches' initial states ------------------------------------------
    /// Initial gravity.
    pub gravity: Dir,
    /// Seconds between touching a gravity switch and the change.
    pub gravity_change_time: i32,
    /// Whether the gravity switch is armed at cave start.
    pub gravity_switch_active: bool,
    pub creatures_backwards: bool,
    /// Creatures reverse automatically every this many seconds (0 = off).
    pub creatures_direction_auto_change_time: i32,
    pub expanding_wall_changed: bool,
    pub replicators_active: bool,
    pub replicator_delay_frame: i32,
    pub conveyor_belts_active: bool,
    pub conveyor_belts_direction_changed: bool,
    pub biter_delay_frame: i32,

    // -- misc counters -----------------------------------------------------
    /// Frames the pneumatic hammer needs to break a wall.
    pub pneumatic_hammer_frame: i32,
    /// Frames until a hammered wall reappears.
    pub hammered_wall_reappear_frame: i32,
    pub skeletons_needed_for_pot: i32,
    pub skeletons_worth_diamonds: i32,

    // -- behavior switches, effects, sounds --------------------------------
    pub policy: EnginePolicy,
    pub effects: EffectTable,
    pub sound_options: SoundOptions,

    // -- cave content ------------------------------------------------------
    /// Literal map, if the cave has one.
    pub map: Option<CaveMap<Element>>,
    /// Drawing objects, executed in order over the initial fill.
    pub objects: Vec<CaveObject>,
    /// Border element of generated caves.
    pub initial_border: Element,
    /// Fill element of generated caves.
    pub initial_fill: Element,
    /// Random fill elements with thresholds for generated caves.
    pub random_fill: [(Element, i32); 4],

    // -- colors ------------------------------------------------------------
    /// The six per-cave color slots (border, dirt, walls...).
    pub colors: [Color; 6],
}

impl Default for CaveStored {
    fn default() -> Self {
        CaveStored {
            name: String::new(),
            w: 40,
            h: 22,
            x1: 0,
            y1: 0,
            x2: 39,
            y2: 21,
            intermission: false,
            scheduling: Scheduling::Milliseconds,
            pal_timing: false,
            level_time: [999; 5],
            level_timevalue: [1, 2, 3, 4, 5],
            level_diamonds: [10; 5],
            level_speed: [120; 5],
            level_ckdelay: [0; 5],
            level_hatching_delay_frame: [21; 5],
            level_hatching_delay_time: [2; 5],
            level_magic_wall_time: [999; 5],
            level_amoeba_time: [999; 5],
            level_amoeba_threshold: [200; 5],
            level_amoeba_2_time: [999; 5],
            level_amoeba_2_threshold: [200; 5],
            level_slime_permeability: [PROBABILITY_MAX; 5],
            level_slime_permeability_c64: [0; 5],
            level_rand: [0, 1, 2, 3, 4],
            diamond_value: 10,
            extra_diamond_value: 20,
            time_bonus: 30,
            time_penalty: 30,
            max_time: 999,
            amoeba_growth_prob: 31_250,
            amoeba_fast_growth_prob: 250_000,
            amoeba_2_growth_prob: 31_250,
            amoeba_2_fast_growth_prob: 250_000,
            acid_spread_ratio: 31_250,
            pushing_stone_prob: 250_000,
            pushing_stone_prob_sweet: PROBABILITY_MAX,
            slime_predictable: false,
            gravity: Dir::Down,
            gravity_change_time: 10,
            gravity_switch_active: false,
            creatures_backwards: false,
            creatures_direction_auto_change_time: 0,
            expanding_wall_changed: false,
            replicators_active: true,
            replicator_delay_frame: 4,
            conveyor_belts_active: true,
            conveyor_belts_direction_changed: false,
            biter_delay_frame: 0,
            pneumatic_hammer_frame: 5,
            hammered_wall_reappear_frame: 100,
            skeletons_needed_for_pot: 5,
            skeletons_worth_diamonds: 0,
            policy: EnginePolicy::default(),
            effects: EffectTable::default(),
            sound_options: SoundOptions::default(),
            map: None,
            objects: Vec::new(),
            initial_border: Element::Steel,
            initial_fill: Element::Dirt,
            random_fill: [(Element::Dirt, 0); 4],
            colors: [Color::default(); 6],
        }
    }
}

impl CaveStored {
    /// Apply an engine dialect preset. Individual switches can still be
    /// changed afterwards.
    pub fn set_engine_defaults(&mut self, engine: EngineKind) {
        let policy = &mut self.policy;
        match engine {
            EngineKind::Bd1 => {
                self.scheduling = Scheduling::Bd1;
                self.pal_timing = true;
                policy.lineshift = true;
                policy.short_explosions = true;
                policy.active_is_first_found = false;
                policy.magic_wall_stops_amoeba = true;
                policy.amoeba_timer_started_immediately = true;
            }
            EngineKind::Bd2 => {
                self.scheduling = Scheduling::Bd2;
                self.pal_timing = true;
                policy.lineshift = true;
                policy.short_explosions = false;
                policy.active_is_first_found = false;
                policy.amoeba_timer_started_immediately = false;
            }
            EngineKind::Plck => {
                self.scheduling = Scheduling::Plck;
                self.pal_timing = true;
                policy.border_scan_first_and_last = false;
                policy.amoeba_timer_started_immediately = false;
            }
            EngineKind::FirstB => {
                self.scheduling = Scheduling::Plck;
                self.pal_timing = true;
                policy.active_is_first_found = true;
                policy.voodoo_collects_diamonds = true;
                policy.voodoo_dies_by_stone = true;
                policy.voodoo_disappear_in_explosion = false;
                policy.amoeba_timer_started_immediately = false;
            }
            EngineKind::CrazyDream => {
                self.scheduling = Scheduling::Crdr;
                self.pal_timing = true;
                policy.water_does_not_flow_down = true;
                policy.amoeba_timer_started_immediately = false;
            }
            EngineKind::CrazyLight => {
                self.scheduling = Scheduling::Plck;
                self.pal_timing = true;
                policy.border_scan_first_and_last = false;
                policy.amoeba_timer_started_immediately = false;
            }
        }
    }

    /// Resolve the template for one level (1..=5).
    pub fn params_for_level(&self, level: u8) -> CaveParams {
        if !(1..=5).contains(&level) {
            tracing::warn!(cave = %self.name, level, "level out of range, clamping");
        }
        let i = (level as usize).clamp(1, 5) - 1;
        let timing_factor = if self.pal_timing { 1200 } else { 1000 };
        CaveParams {
            name: self.name.clone(),
            w: self.w,
            h: self.h,
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
            intermission: self.intermission,
            scheduling: self.scheduling,
            timing_factor,
            time: self.level_time[i],
            timevalue: self.level_timevalue[i],
            diamonds_needed: self.level_diamonds[i],
            speed: self.level_speed[i],
            ckdelay: self.level_ckdelay[i],
            hatching_delay_frame: self.level_hatching_delay_frame[i],
            hatching_delay_time: self.level_hatching_delay_time[i],
            magic_wall_time: self.level_magic_wall_time[i],
            amoeba_time: self.level_amoeba_time[i],
            amoeba_max_count: self.level_amoeba_threshold[i],
            amoeba_2_time: self.level_amoeba_2_time[i],
            amoeba_2_max_count: self.level_amoeba_2_threshold[i],
            slime_permeability: self.level_slime_permeability[i],
            slime_permeability_c64: self.level_slime_permeability_c64[i],
            diamond_value: self.diamond_value,
            extra_diamond_value: self.extra_diamond_value,
            time_bonus: self.time_bonus,
            time_penalty: self.time_penalty,
            max_time: self.max_time,
            amoeba_growth_prob: self.amoeba_growth_prob,
            amoeba_fast_growth_prob: self.amoeba_fast_growth_prob,
            amoeba_2_growth_prob: self.amoeba_2_growth_prob,
            amoeba_2_fast_growth_prob: self.amoeba_2_fast_growth_prob,
            acid_spread_ratio: self.acid_spread_ratio,
            pushing_stone_prob: self.pushing_stone_prob,
            pushing_stone_prob_sweet: self.pushing_stone_prob_sweet,
            slime_predictable: self.slime_predictable,
            gravity: self.gravity,
            gravity_change_time: self.gravity_change_time,
            gravity_switch_active: self.gravity_switch_active,
            creatures_backwards: self.creatures_backwards,
            creatures_direction_auto_change_time: self.creatures_direction_auto_change_time,
            expanding_wall_changed: self.expanding_wall_changed,
            replicators_active: self.replicators_active,
            replicator_delay_frame: self.replicator_delay_frame,
            conveyor_belts_active: self.conveyor_belts_active,
            conveyor_belts_direction_changed: self.conveyor_belts_direction_changed,
            biter_delay_frame: self.biter_delay_frame,
            pneumatic_hammer_frame: self.pneumatic_hammer_frame,
            hammered_wall_reappear_frame: self.hammered_wall_reappear_frame,
            skeletons_needed_for_pot: self.skeletons_needed_for_pot,
            skeletons_worth_diamonds: self.skeletons_worth_diamonds,
            policy: self.policy.clone(),
            effects: self.effects.clone(),
            sound_options: self.sound_options.clone(),
            colors: self.colors,
        }
    }
}

// ---------------------------------------------------------------------------
// CaveParams
// ---------------------------------------------------------------------------

/// The immutable parameter block of a rendered cave: the template resolved
/// for one level. Mutable game state is initialized from these values but
/// lives in the rendered cave itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct CaveParams {
    pub name: String,

    pub w: i32,
    pub h: i32,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub intermission: bool,

    pub scheduling: Scheduling,
    /// "Milliseconds" per second: 1200 for PAL, 1000 for NTSC.
    pub timing_factor: i32,

    pub time: i32,
    pub timevalue: i32,
    pub diamonds_needed: i32,
    pub speed: i32,
    pub ckdelay: i32,
    pub hatching_delay_frame: i32,
    pub hatching_delay_time: i32,
    pub magic_wall_time: i32,
    pub amoeba_time: i32,
    pub amoeba_max_count: i32,
    pub amoeba_2_time: i32,
    pub amoeba_2_max_count: i32,
    pub slime_permeability: i32,
    pub slime_permeability_c64: i32,

    pub diamond_value: i32,
    pub extra_diamond_value: i32,
    pub time_bonus: i32,
    pub time_penalty: i32,
    pub max_time: i32,

    pub amoeba_growth_prob: i32,
    pub amoeba_fast_growth_prob: i32,
    pub amoeba_2_growth_prob: i32,
    pub amoeba_2_fast_growth_prob: i32,
    pub acid_spread_ratio: i32,
    pub pushing_stone_prob: i32,
    pub pushing_stone_prob_sweet: i32,
    pub slime_predictable: bool,

    pub gravity: Dir,
    pub gravity_change_time: i32,
    pub gravity_switch_active: bool,
    pub creatures_backwards: bool,
    pub creatures_direction_auto_change_time: i32,
    pub expanding_wall_changed: bool,
    pub replicators_active: bool,
    pub replicator_delay_frame: i32,
    pub conveyor_belts_active: bool,
    pub conveyor_belts_direction_changed: bool,
    pub biter_delay_frame: i32,

    pub pneumatic_hammer_frame: i32,
    pub hammered_wall_reappear_frame: i32,
    pub skeletons_needed_for_pot: i32,
    pub skeletons_worth_diamonds: i32,

    pub policy: EnginePolicy,
    pub effects: EffectTable,
    pub sound_options: SoundOptions,
    pub colors: [Color; 6],
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_pick_the_right_level() {
        let mut cave = CaveStored::default();
        cave.level_time = [100, 200, 300, 400, 500];
        cave.level_diamonds = [1, 2, 3, 4, 5];
        let p1 = cave.params_for_level(1);
        let p5 = cave.params_for_level(5);
        assert_eq!(p1.time, 100);
        assert_eq!(p1.diamonds_needed, 1);
        assert_eq!(p5.time, 500);
        assert_eq!(p5.diamonds_needed, 5);
    }

    #[test]
    fn pal_timing_factor() {
        let mut cave = CaveStored::default();
        assert_eq!(cave.params_for_level(1).timing_factor, 1000);
        cave.pal_timing = true;
        assert_eq!(cave.params_for_level(1).timing_factor, 1200);
    }

    #[test]
    fn bd1_preset_flips_the_classic_switches() {
        let mut cave = CaveStored::default();
        cave.set_engine_defaults(EngineKind::Bd1);
        assert_eq!(cave.scheduling, Scheduling::Bd1);
        assert!(cave.policy.lineshift);
        assert!(cave.policy.short_explosions);
    }

    #[test]
    fn first_b_preset_changes_voodoo_rules() {
        let mut cave = CaveStored::default();
        cave.set_engine_defaults(EngineKind::FirstB);
        assert!(cave.policy.voodoo_collects_diamonds);
        assert!(cave.policy.voodoo_dies_by_stone);
        assert!(!cave.policy.voodoo_disappear_in_explosion);
    }

    #[test]
    fn template_survives_json() {
        let mut cave = CaveStored::default();
        cave.name = "round trip".to_owned();
        cave.set_engine_defaults(EngineKind::CrazyDream);
        cave.effects.magic_stone_to = crate::element::Element::Space;
        let json = serde_json::to_string(&cave).unwrap();
        let back: CaveStored = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cave);
    }
}
