//! Sound identifiers and their arbitration properties.
//!
//! The engine never plays audio. During a tick it *requests* sounds; at
//! most one request per channel survives, decided by precedence and, on a
//! tie, by distance to the player. The caller reads the three surviving
//! [`SoundWithPos`] slots after each tick and feeds its mixer.
//!
//! Each sound carries a channel (1..=4), a precedence, a looped flag, a
//! force-restart flag, and optionally a *classic equivalent*: when the
//! caller asks for classic sounds only, non-classic sounds are replaced by
//! their equivalent or dropped.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sound
// ---------------------------------------------------------------------------

/// Every sound the engine can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Sound {
    None,

    // channel 1: falling and collecting
    Stone,
    DirtBall,
    Nitro,
    FallingWall,
    ExpandingWall,
    WallReappear,
    /// Macro sound, resolved to one of the eight diamond sounds.
    DiamondRandom,
    Diamond1,
    Diamond2,
    Diamond3,
    Diamond4,
    Diamond5,
    Diamond6,
    Diamond7,
    Diamond8,
    DiamondCollect,
    SkeletonCollect,
    PneumaticCollect,
    BombCollect,
    ClockCollect,
    SweetCollect,
    KeyCollect,
    DiamondKeyCollect,
    Slime,
    Lava,
    Replicator,
    AcidSpread,
    BladderMove,
    BladderConvert,
    BladderSpender,
    BiterEat,
    Nut,
    NutCrack,

    // channel 2: player actions, explosions, timeouts
    DoorOpen,
    WalkEarth,
    WalkEmpty,
    Stirring,
    BoxPush,
    Teleporter,
    Timeout1,
    Timeout2,
    Timeout3,
    Timeout4,
    Timeout5,
    Timeout6,
    Timeout7,
    Timeout8,
    Timeout9,
    Timeout,
    Explosion,
    BombExplosion,
    GhostExplosion,
    VoodooExplosion,
    NitroExplosion,
    BombPlace,
    Finished,
    SwitchBiter,
    SwitchCreatures,
    SwitchGravity,
    SwitchExpanding,
    SwitchConveyor,
    SwitchReplicator,

    // channel 3: ambient loops
    Amoeba,
    MagicWall,
    /// Amoeba and magic wall running at once make a mixed sound.
    AmoebaMagic,
    Cover,
    PneumaticHammer,
    Water,
    Crack,
    GravityChange,

    // channel 4
    BonusLife,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct SoundFlags: u8 {
        /// Played looped (amoeba, magic wall, water...).
        const LOOPED = 1 << 0;
        /// A classic sound; non-classic ones have a replacement or are dropped.
        const CLASSIC = 1 << 1;
        /// Restart the sample even if the same one is already playing.
        const FORCE = 1 << 2;
        /// A macro resolved to a real sound at request time.
        const FAKE = 1 << 3;
    }
}

/// Channel, precedence, flags and classic replacement of one sound.
struct SoundProperty {
    channel: u8,
    precedence: i32,
    flags: SoundFlags,
    replace: Sound,
}

impl Sound {
    fn property(self) -> SoundProperty {
        use Sound::*;
        const L: SoundFlags = SoundFlags::LOOPED;
        const C: SoundFlags = SoundFlags::CLASSIC;
        const F: SoundFlags = SoundFlags::FORCE;
        const K: SoundFlags = SoundFlags::FAKE;
        let n = SoundFlags::empty();
        let p = |channel, precedence, flags, replace| SoundProperty {
            channel,
            precedence,
            flags,
            replace,
        };
        match self {
            None => p(0, 0, C, None),

            // channel 1. collect sounds beat falling sounds; slime, lava
            // and acid stay quiet under almost everything else.
            Stone => p(1, 10, C, None),
            DirtBall => p(1, 8, n, None),
            Nitro => p(1, 10, n, None),
            FallingWall => p(1, 10, n, Stone),
            ExpandingWall => p(1, 10, n, Stone),
            WallReappear => p(1, 9, n, None),
            DiamondRandom => p(1, 10, C.union(K), None),
            Diamond1 | Diamond2 | Diamond3 | Diamond4 | Diamond5 | Diamond6 | Diamond7
            | Diamond8 => p(1, 10, C, None),
            DiamondCollect => p(1, 100, C, None),
            SkeletonCollect => p(1, 100, n, DiamondCollect),
            PneumaticCollect => p(1, 50, n, DiamondRandom),
            BombCollect => p(1, 50, n, DiamondRandom),
            ClockCollect => p(1, 50, C, None),
            SweetCollect => p(1, 50, n, None),
            KeyCollect => p(1, 50, n, DiamondRandom),
            DiamondKeyCollect => p(1, 50, n, DiamondRandom),
            Slime => p(1, 5, n, None),
            Lava => p(1, 5, n, None),
            Replicator => p(1, 5, n, None),
            AcidSpread => p(1, 3, n, None),
            BladderMove => p(1, 5, n, None),
            BladderConvert => p(1, 8, n, None),
            BladderSpender => p(1, 8, n, None),
            BiterEat => p(1, 3, n, None),
            Nut => p(1, 8, n, None),
            NutCrack => p(1, 12, n, None),

            // channel 2. timeout sounds have increasing precedence so a
            // later second always replaces an earlier one.
            DoorOpen => p(2, 10, C, None),
            WalkEarth => p(2, 10, C, None),
            WalkEmpty => p(2, 10, C, None),
            Stirring => p(2, 10, C, None),
            BoxPush => p(2, 10, n, Stone),
            Teleporter => p(2, 10, n, None),
            Timeout1 => p(2, 20, C, None),
            Timeout2 => p(2, 21, C, None),
            Timeout3 => p(2, 22, C, None),
            Timeout4 => p(2, 23, C, None),
            Timeout5 => p(2, 24, C, None),
            Timeout6 => p(2, 25, C, None),
            Timeout7 => p(2, 26, C, None),
            Timeout8 => p(2, 27, C, None),
            Timeout9 => p(2, 28, C, None),
            Timeout => p(2, 150, F, None),
            Explosion => p(2, 100, C.union(F), None),
            BombExplosion => p(2, 100, F, Explosion),
            GhostExplosion => p(2, 100, F, Explosion),
            VoodooExplosion => p(2, 100, F, Explosion),
            NitroExplosion => p(2, 100, F, Explosion),
            BombPlace => p(2, 10, n, None),
            Finished => p(2, 15, C.union(F).union(L), None),
            SwitchBiter => p(2, 10, n, None),
            SwitchCreatures => p(2, 10, n, None),
            SwitchGravity => p(2, 10, n, None),
            SwitchExpanding => p(2, 10, n, None),
            SwitchConveyor => p(2, 10, n, None),
            SwitchReplicator => p(2, 10, n, None),

            // channel 3
            Amoeba => p(3, 30, C.union(L), None),
            MagicWall => p(3, 30, C.union(L), None),
            AmoebaMagic => p(3, 30, C.union(L), None),
            Cover => p(3, 100, C.union(L), None),
            PneumaticHammer => p(3, 50, C.union(L), None),
            Water => p(3, 20, L, None),
            Crack => p(3, 150, C, None),
            GravityChange => p(3, 60, n, None),

            BonusLife => p(4, 0, n, None),
        }
    }

    /// The channel (1..=4) this sound plays on; 0 for [`Sound::None`].
    pub fn channel(self) -> u8 {
        self.property().channel
    }

    /// Arbitration precedence; larger wins.
    pub fn precedence(self) -> i32 {
        self.property().precedence
    }

    /// True if the sample is played looped.
    pub fn is_looped(self) -> bool {
        self.property().flags.contains(SoundFlags::LOOPED)
    }

    /// True for classic sounds.
    pub fn is_classic(self) -> bool {
        self.property().flags.contains(SoundFlags::CLASSIC)
    }

    /// True if the sample restarts even when already playing.
    pub fn force_start(self) -> bool {
        self.property().flags.contains(SoundFlags::FORCE)
    }

    /// True for macro sounds resolved at request time.
    pub fn is_fake(self) -> bool {
        self.property().flags.contains(SoundFlags::FAKE)
    }

    /// The classic equivalent: classic sounds map to themselves,
    /// non-classic ones to their replacement ([`Sound::None`] drops).
    pub fn classic_equivalent(self) -> Sound {
        if self.is_classic() {
            self
        } else {
            self.property().replace
        }
    }

    /// The eight concrete diamond sounds, picked from for
    /// [`Sound::DiamondRandom`].
    pub const DIAMOND_SOUNDS: [Sound; 8] = [
        Sound::Diamond1,
        Sound::Diamond2,
        Sound::Diamond3,
        Sound::Diamond4,
        Sound::Diamond5,
        Sound::Diamond6,
        Sound::Diamond7,
        Sound::Diamond8,
    ];

    const ALL: &'static [Sound] = &[
        Sound::None,
        Sound::Stone,
        Sound::DirtBall,
        Sound::Nitro,
        Sound::FallingWall,
        Sound::ExpandingWall,
        Sound::WallReappear,
        Sound::DiamondRandom,
        Sound::Diamond1,
        Sound::Diamond2,
        Sound::Diamond3,
        Sound::Diamond4,
        Sound::Diamond5,
        Sound::Diamond6,
        Sound::Diamond7,
        Sound::Diamond8,
        Sound::DiamondCollect,
        Sound::SkeletonCollect,
        Sound::PneumaticCollect,
        Sound::BombCollect,
        Sound::ClockCollect,
        Sound::SweetCollect,
        Sound::KeyCollect,
        Sound::DiamondKeyCollect,
        Sound::Slime,
        Sound::Lava,
        Sound::Replicator,
        Sound::AcidSpread,
        Sound::BladderMove,
        Sound::BladderConvert,
        Sound::BladderSpender,
        Sound::BiterEat,
        Sound::Nut,
        Sound::NutCrack,
        Sound::DoorOpen,
        Sound::WalkEarth,
        Sound::WalkEmpty,
        Sound::Stirring,
        Sound::BoxPush,
        Sound::Teleporter,
        Sound::Timeout1,
        Sound::Timeout2,
        Sound::Timeout3,
        Sound::Timeout4,
        Sound::Timeout5,
        Sound::Timeout6,
        Sound::Timeout7,
        Sound::Timeout8,
        Sound::Timeout9,
        Sound::Timeout,
        Sound::Explosion,
        Sound::BombExplosion,
        Sound::GhostExplosion,
        Sound::VoodooExplosion,
        Sound::NitroExplosion,
        Sound::BombPlace,
        Sound::Finished,
        Sound::SwitchBiter,
        Sound::SwitchCreatures,
        Sound::SwitchGravity,
        Sound::SwitchExpanding,
        Sound::SwitchConveyor,
        Sound::SwitchReplicator,
        Sound::Amoeba,
        Sound::MagicWall,
        Sound::AmoebaMagic,
        Sound::Cover,
        Sound::PneumaticHammer,
        Sound::Water,
        Sound::Crack,
        Sound::GravityChange,
        Sound::BonusLife,
    ];
}

// ---------------------------------------------------------------------------
// SoundWithPos
// ---------------------------------------------------------------------------

/// A sound request with its position relative to the player, so the
/// arbiter can prefer the closer of two equal-precedence requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundWithPos {
    /// The requested sound, [`Sound::None`] if the slot is empty.
    pub sound: Sound,
    /// Horizontal distance from the player at request time.
    pub dx: i32,
    /// Vertical distance from the player at request time.
    pub dy: i32,
}

impl SoundWithPos {
    /// A filled slot.
    pub fn new(sound: Sound, dx: i32, dy: i32) -> Self {
        SoundWithPos { sound, dx, dy }
    }

    /// An empty slot.
    pub fn silence() -> Self {
        SoundWithPos::new(Sound::None, 0, 0)
    }
}

impl Default for SoundWithPos {
    fn default() -> Self {
        SoundWithPos::silence()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // The original checked its sound table at startup; same rules here.

    #[test]
    fn every_sound_has_a_valid_channel() {
        for &s in Sound::ALL {
            if s != Sound::None {
                let ch = s.channel();
                assert!((1..=4).contains(&ch), "{s:?} has channel {ch}");
            }
        }
    }

    #[test]
    fn classic_equivalents_are_classic() {
        for &s in Sound::ALL {
            let eq = s.classic_equivalent();
            assert!(
                eq.is_classic(),
                "{s:?} replacement {eq:?} must itself be classic"
            );
        }
    }

    #[test]
    fn classic_sounds_replace_themselves() {
        assert_eq!(Sound::Stone.classic_equivalent(), Sound::Stone);
        assert_eq!(Sound::FallingWall.classic_equivalent(), Sound::Stone);
        assert_eq!(Sound::SweetCollect.classic_equivalent(), Sound::None);
    }

    #[test]
    fn timeout_precedences_increase() {
        let seconds = [
            Sound::Timeout1,
            Sound::Timeout2,
            Sound::Timeout3,
            Sound::Timeout4,
            Sound::Timeout5,
            Sound::Timeout6,
            Sound::Timeout7,
            Sound::Timeout8,
            Sound::Timeout9,
        ];
        for pair in seconds.windows(2) {
            assert!(pair[0].precedence() < pair[1].precedence());
        }
    }

    #[test]
    fn ambient_loops_are_looped() {
        assert!(Sound::Amoeba.is_looped());
        assert!(Sound::MagicWall.is_looped());
        assert!(Sound::AmoebaMagic.is_looped());
        assert!(!Sound::Stone.is_looped());
    }

    #[test]
    fn diamond_random_is_a_macro() {
        assert!(Sound::DiamondRandom.is_fake());
        for s in Sound::DIAMOND_SOUNDS {
            assert!(!s.is_fake());
            assert_eq!(s.channel(), 1);
        }
    }
}
