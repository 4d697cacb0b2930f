//! The element model: every cell of a cave holds one [`Element`].
//!
//! Related variants are grouped (four facings per creature, numbered
//! animation stages, explosion sequences). Each element exposes a set of
//! engine [`flags`](Element::flags), a *scanned pair* used by the per-tick
//! scan to mark cells already processed, and a `ckdelay` cost in
//! microseconds that models how long the original 8-bit hardware took to
//! process it (the schedulers sum these to derive authentic frame times).
//!
//! The scanned-pair mechanism: when the engine moves or transforms an
//! element during a scan, it stores the *scanned twin* instead. When the
//! scan later encounters a scanned cell it skips and unflips it, so no
//! element is processed twice in one tick. Elements without a twin map to
//! themselves, which is correct for elements only ever written in place.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ElementFlags
// ---------------------------------------------------------------------------

bitflags! {
    /// Engine-relevant properties of an element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ElementFlags: u32 {
        /// Already processed in the current scan.
        const SCANNED = 1 << 0;
        /// Stones and diamonds roll off to the left.
        const SLOPED_LEFT = 1 << 1;
        /// Stones and diamonds roll off to the right.
        const SLOPED_RIGHT = 1 << 2;
        /// Sloped when approached from above.
        const SLOPED_UP = 1 << 3;
        /// Sloped when approached from below.
        const SLOPED_DOWN = 1 << 4;
        /// Acts sloped for bladder movement too (brick yes, diamond no).
        const BLADDER_SLOPED = 1 << 5;
        /// The amoeba can consume this (space and dirt).
        const AMOEBA_CONSUMES = 1 << 6;
        /// Dirt or a dirt equivalent.
        const DIRT = 1 << 7;
        /// Flies explode when touching this.
        const BLOWS_UP_FLIES = 1 << 8;
        /// Explodes when hit by a falling element.
        const EXPLODES_BY_HIT = 1 << 9;
        /// First animation stage of an explosion.
        const EXPLOSION_FIRST_STAGE = 1 << 10;
        /// Cannot be destroyed by any explosion.
        const NON_EXPLODABLE = 1 << 11;
        /// Creature with a default counter-clockwise rotation.
        const CCW = 1 << 12;
        /// Can be broken by the pneumatic hammer.
        const CAN_BE_HAMMERED = 1 << 13;
        /// A player variant.
        const PLAYER = 1 << 14;
        /// Sits on and is moved by a conveyor belt.
        const MOVED_BY_CONVEYOR_TOP = 1 << 15;
        /// Floats upward and is moved by a conveyor belt above it.
        const MOVED_BY_CONVEYOR_BOTTOM = 1 << 16;
    }
}

impl ElementFlags {
    /// Sloped in every direction.
    pub const SLOPED: ElementFlags = ElementFlags::SLOPED_LEFT
        .union(ElementFlags::SLOPED_RIGHT)
        .union(ElementFlags::SLOPED_UP)
        .union(ElementFlags::SLOPED_DOWN);
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// Every element a cave cell can hold, scanned twins included.
///
/// The `...Scanned` variants at the end of the enum are the scanned twins;
/// they never appear on the map after a completed [`iterate`] and are not
/// valid in cave templates.
///
/// [`iterate`]: https://docs.rs/rockfall-engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Element {
    Space,
    Dirt,
    Dirt2,
    DirtSlopedUpRight,
    DirtSlopedUpLeft,
    DirtSlopedDownLeft,
    DirtSlopedDownRight,
    DirtBall,
    DirtLoose,
    DirtGlued,

    Brick,
    BrickSlopedUpRight,
    BrickSlopedUpLeft,
    BrickSlopedDownLeft,
    BrickSlopedDownRight,
    BrickNonSloped,
    BrickEatable,
    Steel,
    SteelSlopedUpRight,
    SteelSlopedUpLeft,
    SteelSlopedDownLeft,
    SteelSlopedDownRight,
    SteelExplodable,
    SteelEatable,

    Stone,
    MegaStone,
    FlyingStone,
    WaitingStone,
    ChasingStone,
    Diamond,
    FlyingDiamond,
    DiamondGlued,
    StoneGlued,
    Nut,

    Lava,
    MagicWall,
    Slime,
    Acid,
    Water,
    Water1,
    Water2,
    Water3,
    Water4,
    Water5,
    Water6,
    Water7,
    Water8,
    Water9,
    Water10,
    Water11,
    Water12,
    Water13,
    Water14,
    Water15,
    Water16,
    Amoeba,
    Amoeba2,

    Sweet,
    Voodoo,
    Box,
    Pot,
    Gravestone,
    Skeleton,
    Clock,
    PneumaticHammer,
    Teleporter,
    TimePenalty,

    Key1,
    Key2,
    Key3,
    Door1,
    Door2,
    Door3,
    DiamondKey,
    TrappedDiamond,

    GravitySwitch,
    CreatureSwitch,
    BiterSwitch,
    ExpandingWallSwitch,
    ReplicatorSwitch,
    ConveyorSwitch,
    ConveyorDirSwitch,
    Replicator,
    ConveyorLeft,
    ConveyorRight,

    FallingWall,
    HExpandingWall,
    VExpandingWall,
    ExpandingWall,
    HExpandingSteelWall,
    VExpandingSteelWall,
    ExpandingSteelWall,

    Bomb,
    NitroPack,
    Ghost,
    BladderSpender,

    Firefly1,
    Firefly2,
    Firefly3,
    Firefly4,
    AltFirefly1,
    AltFirefly2,
    AltFirefly3,
    AltFirefly4,
    Butterfly1,
    Butterfly2,
    Butterfly3,
    Butterfly4,
    AltButterfly1,
    AltButterfly2,
    AltButterfly3,
    AltButterfly4,
    Stonefly1,
    Stonefly2,
    Stonefly3,
    Stonefly4,
    Dragonfly1,
    Dragonfly2,
    Dragonfly3,
    Dragonfly4,
    Biter1,
    Biter2,
    Biter3,
    Biter4,
    Cow1,
    Cow2,
    Cow3,
    Cow4,
    CowEnclosed1,
    CowEnclosed2,
    CowEnclosed3,
    CowEnclosed4,
    CowEnclosed5,
    CowEnclosed6,
    CowEnclosed7,

    Bladder,
    Bladder1,
    Bladder2,
    Bladder3,
    Bladder4,
    Bladder5,
    Bladder6,
    Bladder7,
    Bladder8,

    Inbox,
    PreOutbox,
    Outbox,
    PreInvisOutbox,
    InvisOutbox,
    PrePlayer1,
    PrePlayer2,
    PrePlayer3,
    Player,
    PlayerBomb,
    PlayerGlued,
    PlayerStirring,
    PlayerPneumaticLeft,
    PlayerPneumaticRight,
    PneumaticActiveLeft,
    PneumaticActiveRight,

    StoneF,
    MegaStoneF,
    FlyingStoneF,
    DiamondF,
    FlyingDiamondF,
    NutF,
    DirtBallF,
    DirtLooseF,
    FallingWallF,
    NitroPackF,
    NitroPackExplode,

    PreDia1,
    PreDia2,
    PreDia3,
    PreDia4,
    PreDia5,
    PreStone1,
    PreStone2,
    PreStone3,
    PreStone4,
    PreSteel1,
    PreSteel2,
    PreSteel3,
    PreSteel4,
    PreClock1,
    PreClock2,
    PreClock3,
    PreClock4,
    NutCrack1,
    NutCrack2,
    NutCrack3,
    NutCrack4,
    BombTick1,
    BombTick2,
    BombTick3,
    BombTick4,
    BombTick5,
    BombTick6,
    BombTick7,
    BombExpl1,
    BombExpl2,
    BombExpl3,
    BombExpl4,
    GhostExpl1,
    GhostExpl2,
    GhostExpl3,
    GhostExpl4,
    NitroExpl1,
    NitroExpl2,
    NitroExpl3,
    NitroExpl4,
    Amoeba2Expl1,
    Amoeba2Expl2,
    Amoeba2Expl3,
    Amoeba2Expl4,
    Explode1,
    Explode2,
    Explode3,
    Explode4,
    Explode5,

    // Scanned twins. Only elements the scan can write *ahead of the
    // cursor* need one; everything else pairs with itself.
    StoneScanned,
    MegaStoneScanned,
    FlyingStoneScanned,
    WaitingStoneScanned,
    ChasingStoneScanned,
    DiamondScanned,
    FlyingDiamondScanned,
    NutScanned,
    DirtBallScanned,
    DirtLooseScanned,
    BoxScanned,
    StoneFScanned,
    MegaStoneFScanned,
    FlyingStoneFScanned,
    DiamondFScanned,
    FlyingDiamondFScanned,
    NutFScanned,
    DirtBallFScanned,
    DirtLooseFScanned,
    FallingWallFScanned,
    NitroPackScanned,
    NitroPackFScanned,
    NitroPackExplodeScanned,
    Firefly1Scanned,
    Firefly2Scanned,
    Firefly3Scanned,
    Firefly4Scanned,
    AltFirefly1Scanned,
    AltFirefly2Scanned,
    AltFirefly3Scanned,
    AltFirefly4Scanned,
    Butterfly1Scanned,
    Butterfly2Scanned,
    Butterfly3Scanned,
    Butterfly4Scanned,
    AltButterfly1Scanned,
    AltButterfly2Scanned,
    AltButterfly3Scanned,
    AltButterfly4Scanned,
    Stonefly1Scanned,
    Stonefly2Scanned,
    Stonefly3Scanned,
    Stonefly4Scanned,
    Dragonfly1Scanned,
    Dragonfly2Scanned,
    Dragonfly3Scanned,
    Dragonfly4Scanned,
    Biter1Scanned,
    Biter2Scanned,
    Biter3Scanned,
    Biter4Scanned,
    Cow1Scanned,
    Cow2Scanned,
    Cow3Scanned,
    Cow4Scanned,
    GhostScanned,
    BladderScanned,
    Bladder1Scanned,
    Bladder2Scanned,
    Bladder3Scanned,
    Bladder4Scanned,
    Bladder5Scanned,
    Bladder6Scanned,
    Bladder7Scanned,
    Bladder8Scanned,
    PlayerScanned,
    PlayerBombScanned,
    PlayerGluedScanned,
    PlayerStirringScanned,
    PlayerPneumaticLeftScanned,
    PlayerPneumaticRightScanned,
    PneumaticActiveLeftScanned,
    PneumaticActiveRightScanned,
    AmoebaScanned,
    Amoeba2Scanned,
    Water1Scanned,
    AcidScanned,
    HExpandingWallScanned,
    VExpandingWallScanned,
    ExpandingWallScanned,
    HExpandingSteelWallScanned,
    VExpandingSteelWallScanned,
    ExpandingSteelWallScanned,
    Explode1Scanned,
    Explode2Scanned,
    PreDia1Scanned,
    PreDia2Scanned,
    PreStone1Scanned,
    PreSteel1Scanned,
    PreClock1Scanned,
    NutCrack1Scanned,
    BombTick1Scanned,
    BombExpl1Scanned,
    GhostExpl1Scanned,
    NitroExpl1Scanned,
    Amoeba2Expl1Scanned,
}

// ---------------------------------------------------------------------------
// Creature families
// ---------------------------------------------------------------------------

/// A four-facing creature family. Facing indices are 0..4 in the order
/// left, up, right, down (matching the turn tables of the engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creature {
    Firefly,
    AltFirefly,
    Butterfly,
    AltButterfly,
    Stonefly,
    Dragonfly,
    Cow,
}

impl Creature {
    /// The element for this creature facing the given direction index (0..4).
    pub fn facing(self, dir: usize) -> Element {
        use Element::*;
        let table: [Element; 4] = match self {
            Creature::Firefly => [Firefly1, Firefly2, Firefly3, Firefly4],
            Creature::AltFirefly => [AltFirefly1, AltFirefly2, AltFirefly3, AltFirefly4],
            Creature::Butterfly => [Butterfly1, Butterfly2, Butterfly3, Butterfly4],
            Creature::AltButterfly => {
                [AltButterfly1, AltButterfly2, AltButterfly3, AltButterfly4]
            }
            Creature::Stonefly => [Stonefly1, Stonefly2, Stonefly3, Stonefly4],
            Creature::Dragonfly => [Dragonfly1, Dragonfly2, Dragonfly3, Dragonfly4],
            Creature::Cow => [Cow1, Cow2, Cow3, Cow4],
        };
        table[dir & 3]
    }
}

// ---------------------------------------------------------------------------
// Element impl
// ---------------------------------------------------------------------------

impl Element {
    /// Engine property flags of this element.
    ///
    /// Scanned twins carry *only* [`ElementFlags::SCANNED`]: an element
    /// that already moved this tick is invisible to neighbor checks
    /// (nothing rolls off it, crushes it, or eats it until the next
    /// scan), exactly like on the original hardware.
    pub fn flags(self) -> ElementFlags {
        use Element::*;
        type F = ElementFlags;
        if self.is_scanned() {
            return F::SCANNED;
        }
        match self {
            Space | Lava => F::AMOEBA_CONSUMES,

            Dirt | Dirt2 | DirtGlued => F::DIRT | F::AMOEBA_CONSUMES,
            DirtSlopedUpRight => {
                F::DIRT | F::AMOEBA_CONSUMES | F::SLOPED_UP | F::SLOPED_RIGHT
            }
            DirtSlopedUpLeft => F::DIRT | F::AMOEBA_CONSUMES | F::SLOPED_UP | F::SLOPED_LEFT,
            DirtSlopedDownLeft => {
                F::DIRT | F::AMOEBA_CONSUMES | F::SLOPED_DOWN | F::SLOPED_LEFT
            }
            DirtSlopedDownRight => {
                F::DIRT | F::AMOEBA_CONSUMES | F::SLOPED_DOWN | F::SLOPED_RIGHT
            }
            DirtBall | DirtLoose | DirtBallF | DirtLooseF => {
                F::DIRT | F::SLOPED | F::MOVED_BY_CONVEYOR_TOP
            }

            Brick | BrickEatable => F::SLOPED | F::BLADDER_SLOPED | F::CAN_BE_HAMMERED,
            BrickSlopedUpRight => {
                F::SLOPED_UP | F::SLOPED_RIGHT | F::BLADDER_SLOPED | F::CAN_BE_HAMMERED
            }
            BrickSlopedUpLeft => {
                F::SLOPED_UP | F::SLOPED_LEFT | F::BLADDER_SLOPED | F::CAN_BE_HAMMERED
            }
            BrickSlopedDownLeft => {
                F::SLOPED_DOWN | F::SLOPED_LEFT | F::BLADDER_SLOPED | F::CAN_BE_HAMMERED
            }
            BrickSlopedDownRight => {
                F::SLOPED_DOWN | F::SLOPED_RIGHT | F::BLADDER_SLOPED | F::CAN_BE_HAMMERED
            }
            BrickNonSloped => F::CAN_BE_HAMMERED,

            Steel | SteelEatable => F::NON_EXPLODABLE | F::SLOPED,
            // the one steel wall explosions do destroy
            SteelExplodable => F::SLOPED,
            SteelSlopedUpRight => F::NON_EXPLODABLE | F::SLOPED_UP | F::SLOPED_RIGHT,
            SteelSlopedUpLeft => F::NON_EXPLODABLE | F::SLOPED_UP | F::SLOPED_LEFT,
            SteelSlopedDownLeft => F::NON_EXPLODABLE | F::SLOPED_DOWN | F::SLOPED_LEFT,
            SteelSlopedDownRight => F::NON_EXPLODABLE | F::SLOPED_DOWN | F::SLOPED_RIGHT,

            Stone | StoneGlued | MegaStone | WaitingStone | ChasingStone => {
                F::SLOPED | F::MOVED_BY_CONVEYOR_TOP
            }
            FlyingStone => F::SLOPED | F::MOVED_BY_CONVEYOR_BOTTOM,
            Diamond | DiamondGlued => F::SLOPED | F::MOVED_BY_CONVEYOR_TOP,
            FlyingDiamond => F::SLOPED | F::MOVED_BY_CONVEYOR_BOTTOM,
            Nut => F::SLOPED | F::MOVED_BY_CONVEYOR_TOP,
            StoneF | MegaStoneF | DiamondF | NutF => F::empty(),
            FlyingStoneF | FlyingDiamondF => F::empty(),

            Box => F::MOVED_BY_CONVEYOR_TOP,
            NitroPack => F::SLOPED | F::EXPLODES_BY_HIT | F::MOVED_BY_CONVEYOR_TOP,
            NitroPackF | NitroPackExplode => F::EXPLODES_BY_HIT,

            Amoeba | Amoeba2 => F::BLOWS_UP_FLIES,
            Voodoo => F::BLOWS_UP_FLIES,

            Firefly1 | Firefly2 | Firefly3 | Firefly4 => F::EXPLODES_BY_HIT | F::CCW,
            AltButterfly1 | AltButterfly2 | AltButterfly3 | AltButterfly4 => {
                F::EXPLODES_BY_HIT | F::CCW
            }
            AltFirefly1 | AltFirefly2 | AltFirefly3 | AltFirefly4 | Butterfly1 | Butterfly2
            | Butterfly3 | Butterfly4 | Stonefly1 | Stonefly2 | Stonefly3 | Stonefly4
            | Dragonfly1 | Dragonfly2 | Dragonfly3 | Dragonfly4 | Biter1 | Biter2 | Biter3
            | Biter4 | Ghost | Cow1 | Cow2 | Cow3 | Cow4 | CowEnclosed1 | CowEnclosed2
            | CowEnclosed3 | CowEnclosed4 | CowEnclosed5 | CowEnclosed6 | CowEnclosed7 => {
                F::EXPLODES_BY_HIT
            }

            Bomb | BombTick1 | BombTick2 | BombTick3 | BombTick4 | BombTick5 | BombTick6
            | BombTick7 => F::EXPLODES_BY_HIT,

            Bladder | Bladder1 | Bladder2 | Bladder3 | Bladder4 | Bladder5 | Bladder6
            | Bladder7 | Bladder8 => F::EXPLODES_BY_HIT | F::MOVED_BY_CONVEYOR_BOTTOM,

            Player | PlayerBomb | PlayerGlued | PlayerStirring => {
                F::PLAYER | F::BLOWS_UP_FLIES | F::EXPLODES_BY_HIT | F::CAN_BE_HAMMERED
            }
            PlayerPneumaticLeft | PlayerPneumaticRight => {
                F::PLAYER | F::BLOWS_UP_FLIES | F::EXPLODES_BY_HIT
            }

            Explode1 => F::EXPLOSION_FIRST_STAGE,
            PreDia1 => F::EXPLOSION_FIRST_STAGE,

            Inbox | PreOutbox | PreInvisOutbox | Outbox | InvisOutbox => F::NON_EXPLODABLE,
            GravitySwitch | CreatureSwitch | BiterSwitch | ExpandingWallSwitch
            | ReplicatorSwitch | ConveyorSwitch | ConveyorDirSwitch => F::NON_EXPLODABLE,
            ConveyorLeft | ConveyorRight => F::NON_EXPLODABLE,
            Replicator | BladderSpender => F::NON_EXPLODABLE,
            Door1 | Door2 | Door3 => F::NON_EXPLODABLE,
            TrappedDiamond => F::NON_EXPLODABLE,
            Gravestone => F::NON_EXPLODABLE | F::SLOPED,
            Teleporter => F::NON_EXPLODABLE,

            HExpandingSteelWall | VExpandingSteelWall | ExpandingSteelWall => {
                F::NON_EXPLODABLE | F::SLOPED
            }
            FallingWall | FallingWallF | HExpandingWall | VExpandingWall | ExpandingWall => {
                F::SLOPED
            }

            _ => F::empty(),
        }
    }

    /// True if the element is a scanned twin.
    pub fn is_scanned(self) -> bool {
        self.twin_of().is_some()
    }

    /// The scanned twin if this element has one, `self` otherwise.
    /// Already scanned elements are returned unchanged.
    pub fn scanned_pair(self) -> Element {
        use Element::*;
        match self {
            Stone => StoneScanned,
            MegaStone => MegaStoneScanned,
            FlyingStone => FlyingStoneScanned,
            WaitingStone => WaitingStoneScanned,
            ChasingStone => ChasingStoneScanned,
            Diamond => DiamondScanned,
            FlyingDiamond => FlyingDiamondScanned,
            Nut => NutScanned,
            DirtBall => DirtBallScanned,
            DirtLoose => DirtLooseScanned,
            Box => BoxScanned,
            StoneF => StoneFScanned,
            MegaStoneF => MegaStoneFScanned,
            FlyingStoneF => FlyingStoneFScanned,
            DiamondF => DiamondFScanned,
            FlyingDiamondF => FlyingDiamondFScanned,
            NutF => NutFScanned,
            DirtBallF => DirtBallFScanned,
            DirtLooseF => DirtLooseFScanned,
            FallingWallF => FallingWallFScanned,
            NitroPack => NitroPackScanned,
            NitroPackF => NitroPackFScanned,
            NitroPackExplode => NitroPackExplodeScanned,
            Firefly1 => Firefly1Scanned,
            Firefly2 => Firefly2Scanned,
            Firefly3 => Firefly3Scanned,
            Firefly4 => Firefly4Scanned,
            AltFirefly1 => AltFirefly1Scanned,
            AltFirefly2 => AltFirefly2Scanned,
            AltFirefly3 => AltFirefly3Scanned,
            AltFirefly4 => AltFirefly4Scanned,
            Butterfly1 => Butterfly1Scanned,
            Butterfly2 => Butterfly2Scanned,
            Butterfly3 => Butterfly3Scanned,
            Butterfly4 => Butterfly4Scanned,
            AltButterfly1 => AltButterfly1Scanned,
            AltButterfly2 => AltButterfly2Scanned,
            AltButterfly3 => AltButterfly3Scanned,
            AltButterfly4 => AltButterfly4Scanned,
            Stonefly1 => Stonefly1Scanned,
            Stonefly2 => Stonefly2Scanned,
            Stonefly3 => Stonefly3Scanned,
            Stonefly4 => Stonefly4Scanned,
            Dragonfly1 => Dragonfly1Scanned,
            Dragonfly2 => Dragonfly2Scanned,
            Dragonfly3 => Dragonfly3Scanned,
            Dragonfly4 => Dragonfly4Scanned,
            Biter1 => Biter1Scanned,
            Biter2 => Biter2Scanned,
            Biter3 => Biter3Scanned,
            Biter4 => Biter4Scanned,
            Cow1 => Cow1Scanned,
            Cow2 => Cow2Scanned,
            Cow3 => Cow3Scanned,
            Cow4 => Cow4Scanned,
            Ghost => GhostScanned,
            Bladder => BladderScanned,
            Bladder1 => Bladder1Scanned,
            Bladder2 => Bladder2Scanned,
            Bladder3 => Bladder3Scanned,
            Bladder4 => Bladder4Scanned,
            Bladder5 => Bladder5Scanned,
            Bladder6 => Bladder6Scanned,
            Bladder7 => Bladder7Scanned,
            Bladder8 => Bladder8Scanned,
            Player => PlayerScanned,
            PlayerBomb => PlayerBombScanned,
            PlayerGlued => PlayerGluedScanned,
            PlayerStirring => PlayerStirringScanned,
            PlayerPneumaticLeft => PlayerPneumaticLeftScanned,
            PlayerPneumaticRight => PlayerPneumaticRightScanned,
            PneumaticActiveLeft => PneumaticActiveLeftScanned,
            PneumaticActiveRight => PneumaticActiveRightScanned,
            Amoeba => AmoebaScanned,
            Amoeba2 => Amoeba2Scanned,
            Water1 => Water1Scanned,
            Acid => AcidScanned,
            HExpandingWall => HExpandingWallScanned,
            VExpandingWall => VExpandingWallScanned,
            ExpandingWall => ExpandingWallScanned,
            HExpandingSteelWall => HExpandingSteelWallScanned,
            VExpandingSteelWall => VExpandingSteelWallScanned,
            ExpandingSteelWall => ExpandingSteelWallScanned,
            Explode1 => Explode1Scanned,
            Explode2 => Explode2Scanned,
            PreDia1 => PreDia1Scanned,
            PreDia2 => PreDia2Scanned,
            PreStone1 => PreStone1Scanned,
            PreSteel1 => PreSteel1Scanned,
            PreClock1 => PreClock1Scanned,
            NutCrack1 => NutCrack1Scanned,
            BombTick1 => BombTick1Scanned,
            BombExpl1 => BombExpl1Scanned,
            GhostExpl1 => GhostExpl1Scanned,
            NitroExpl1 => NitroExpl1Scanned,
            Amoeba2Expl1 => Amoeba2Expl1Scanned,
            other => other,
        }
    }

    /// The plain element a scanned twin stands for, or `None` if this is
    /// not a scanned twin.
    pub fn twin_of(self) -> Option<Element> {
        use Element::*;
        Some(match self {
            StoneScanned => Stone,
            MegaStoneScanned => MegaStone,
            FlyingStoneScanned => FlyingStone,
            WaitingStoneScanned => WaitingStone,
            ChasingStoneScanned => ChasingStone,
            DiamondScanned => Diamond,
            FlyingDiamondScanned => FlyingDiamond,
            NutScanned => Nut,
            DirtBallScanned => DirtBall,
            DirtLooseScanned => DirtLoose,
            BoxScanned => Box,
            StoneFScanned => StoneF,
            MegaStoneFScanned => MegaStoneF,
            FlyingStoneFScanned => FlyingStoneF,
            DiamondFScanned => DiamondF,
            FlyingDiamondFScanned => FlyingDiamondF,
            NutFScanned => NutF,
            DirtBallFScanned => DirtBallF,
            DirtLooseFScanned => DirtLooseF,
            FallingWallFScanned => FallingWallF,
            NitroPackScanned => NitroPack,
            NitroPackFScanned => NitroPackF,
            NitroPackExplodeScanned => NitroPackExplode,
            Firefly1Scanned => Firefly1,
            Firefly2Scanned => Firefly2,
            Firefly3Scanned => Firefly3,
            Firefly4Scanned => Firefly4,
            AltFirefly1Scanned => AltFirefly1,
            AltFirefly2Scanned => AltFirefly2,
            AltFirefly3Scanned => AltFirefly3,
            AltFirefly4Scanned => AltFirefly4,
            Butterfly1Scanned => Butterfly1,
            Butterfly2Scanned => Butterfly2,
            Butterfly3Scanned => Butterfly3,
            Butterfly4Scanned => Butterfly4,
            AltButterfly1Scanned => AltButterfly1,
            AltButterfly2Scanned => AltButterfly2,
            AltButterfly3Scanned => AltButterfly3,
            AltButterfly4Scanned => AltButterfly4,
            Stonefly1Scanned => Stonefly1,
            Stonefly2Scanned => Stonefly2,
            Stonefly3Scanned => Stonefly3,
            Stonefly4Scanned => Stonefly4,
            Dragonfly1Scanned => Dragonfly1,
            Dragonfly2Scanned => Dragonfly2,
            Dragonfly3Scanned => Dragonfly3,
            Dragonfly4Scanned => Dragonfly4,
            Biter1Scanned => Biter1,
            Biter2Scanned => Biter2,
            Biter3Scanned => Biter3,
            Biter4Scanned => Biter4,
            Cow1Scanned => Cow1,
            Cow2Scanned => Cow2,
            Cow3Scanned => Cow3,
            Cow4Scanned => Cow4,
            GhostScanned => Ghost,
            BladderScanned => Bladder,
            Bladder1Scanned => Bladder1,
            Bladder2Scanned => Bladder2,
            Bladder3Scanned => Bladder3,
            Bladder4Scanned => Bladder4,
            Bladder5Scanned => Bladder5,
            Bladder6Scanned => Bladder6,
            Bladder7Scanned => Bladder7,
            Bladder8Scanned => Bladder8,
            PlayerScanned => Player,
            PlayerBombScanned => PlayerBomb,
            PlayerGluedScanned => PlayerGlued,
            PlayerStirringScanned => PlayerStirring,
            PlayerPneumaticLeftScanned => PlayerPneumaticLeft,
            PlayerPneumaticRightScanned => PlayerPneumaticRight,
            PneumaticActiveLeftScanned => PneumaticActiveLeft,
            PneumaticActiveRightScanned => PneumaticActiveRight,
            AmoebaScanned => Amoeba,
            Amoeba2Scanned => Amoeba2,
            Water1Scanned => Water1,
            AcidScanned => Acid,
            HExpandingWallScanned => HExpandingWall,
            VExpandingWallScanned => VExpandingWall,
            ExpandingWallScanned => ExpandingWall,
            HExpandingSteelWallScanned => HExpandingSteelWall,
            VExpandingSteelWallScanned => VExpandingSteelWall,
            ExpandingSteelWallScanned => ExpandingSteelWall,
            Explode1Scanned => Explode1,
            Explode2Scanned => Explode2,
            PreDia1Scanned => PreDia1,
            PreDia2Scanned => PreDia2,
            PreStone1Scanned => PreStone1,
            PreSteel1Scanned => PreSteel1,
            PreClock1Scanned => PreClock1,
            NutCrack1Scanned => NutCrack1,
            BombTick1Scanned => BombTick1,
            BombExpl1Scanned => BombExpl1,
            GhostExpl1Scanned => GhostExpl1,
            NitroExpl1Scanned => NitroExpl1,
            Amoeba2Expl1Scanned => Amoeba2Expl1,
            _ => return None,
        })
    }

    /// Remove the scanned marker, if any.
    pub fn unscanned_pair(self) -> Element {
        self.twin_of().unwrap_or(self)
    }

    /// The next stage of a timed sequence (animation delays, explosions,
    /// water cycle, bombs ticking). For elements outside any sequence the
    /// element itself is returned; final stages are handled explicitly by
    /// the engine and never advanced through here.
    pub fn next_stage(self) -> Element {
        use Element::*;
        match self {
            Water1 => Water2,
            Water2 => Water3,
            Water3 => Water4,
            Water4 => Water5,
            Water5 => Water6,
            Water6 => Water7,
            Water7 => Water8,
            Water8 => Water9,
            Water9 => Water10,
            Water10 => Water11,
            Water11 => Water12,
            Water12 => Water13,
            Water13 => Water14,
            Water14 => Water15,
            Water15 => Water16,
            CowEnclosed1 => CowEnclosed2,
            CowEnclosed2 => CowEnclosed3,
            CowEnclosed3 => CowEnclosed4,
            CowEnclosed4 => CowEnclosed5,
            CowEnclosed5 => CowEnclosed6,
            CowEnclosed6 => CowEnclosed7,
            Bladder1 => Bladder2,
            Bladder2 => Bladder3,
            Bladder3 => Bladder4,
            Bladder4 => Bladder5,
            Bladder5 => Bladder6,
            Bladder6 => Bladder7,
            Bladder7 => Bladder8,
            PreDia1 => PreDia2,
            PreDia2 => PreDia3,
            PreDia3 => PreDia4,
            PreDia4 => PreDia5,
            PreStone1 => PreStone2,
            PreStone2 => PreStone3,
            PreStone3 => PreStone4,
            PreSteel1 => PreSteel2,
            PreSteel2 => PreSteel3,
            PreSteel3 => PreSteel4,
            PreClock1 => PreClock2,
            PreClock2 => PreClock3,
            PreClock3 => PreClock4,
            NutCrack1 => NutCrack2,
            NutCrack2 => NutCrack3,
            NutCrack3 => NutCrack4,
            BombTick1 => BombTick2,
            BombTick2 => BombTick3,
            BombTick3 => BombTick4,
            BombTick4 => BombTick5,
            BombTick5 => BombTick6,
            BombTick6 => BombTick7,
            BombExpl1 => BombExpl2,
            BombExpl2 => BombExpl3,
            BombExpl3 => BombExpl4,
            GhostExpl1 => GhostExpl2,
            GhostExpl2 => GhostExpl3,
            GhostExpl3 => GhostExpl4,
            NitroExpl1 => NitroExpl2,
            NitroExpl2 => NitroExpl3,
            NitroExpl3 => NitroExpl4,
            Amoeba2Expl1 => Amoeba2Expl2,
            Amoeba2Expl2 => Amoeba2Expl3,
            Amoeba2Expl3 => Amoeba2Expl4,
            Explode1 => Explode2,
            Explode2 => Explode3,
            Explode3 => Explode4,
            Explode4 => Explode5,
            // Short-explosion advancing happens on freshly written,
            // still scanned first stages.
            Explode1Scanned => Explode2Scanned,
            PreDia1Scanned => PreDia2Scanned,
            other => other,
        }
    }

    /// Processing cost in microseconds on the original hardware, summed
    /// per scan to drive the authentic schedulers. Scanned twins cost
    /// nothing, since the scan skips them.
    pub fn ckdelay(self) -> i32 {
        use Element::*;
        if self.is_scanned() {
            return 0;
        }
        match self {
            Space => 9,
            Dirt | Dirt2 | DirtGlued | DirtSlopedUpRight | DirtSlopedUpLeft
            | DirtSlopedDownLeft | DirtSlopedDownRight => 12,

            Stone | MegaStone | FlyingStone | Diamond | FlyingDiamond | Nut | DirtBall
            | DirtLoose | NitroPack | WaitingStone | ChasingStone => 280,
            StoneF | MegaStoneF | FlyingStoneF | DiamondF | FlyingDiamondF | NutF
            | DirtBallF | DirtLooseF | NitroPackF | NitroPackExplode => 280,

            Firefly1 | Firefly2 | Firefly3 | Firefly4 | AltFirefly1 | AltFirefly2
            | AltFirefly3 | AltFirefly4 | Butterfly1 | Butterfly2 | Butterfly3 | Butterfly4
            | AltButterfly1 | AltButterfly2 | AltButterfly3 | AltButterfly4 | Stonefly1
            | Stonefly2 | Stonefly3 | Stonefly4 | Dragonfly1 | Dragonfly2 | Dragonfly3
            | Dragonfly4 | Ghost | Cow1 | Cow2 | Cow3 | Cow4 | CowEnclosed1 | CowEnclosed2
            | CowEnclosed3 | CowEnclosed4 | CowEnclosed5 | CowEnclosed6 | CowEnclosed7 => 340,
            Biter1 | Biter2 | Biter3 | Biter4 => 350,

            Amoeba | Amoeba2 => 260,
            Slime => 211,
            Acid => 266,
            Water | Water1 | Water2 | Water3 | Water4 | Water5 | Water6 | Water7 | Water8
            | Water9 | Water10 | Water11 | Water12 | Water13 | Water14 | Water15 | Water16 => {
                256
            }
            MagicWall => 200,

            HExpandingWall | VExpandingWall | ExpandingWall | HExpandingSteelWall
            | VExpandingSteelWall | ExpandingSteelWall => 190,
            FallingWall | FallingWallF => 180,
            Replicator | ConveyorLeft | ConveyorRight => 160,

            Bladder | Bladder1 | Bladder2 | Bladder3 | Bladder4 | Bladder5 | Bladder6
            | Bladder7 | Bladder8 => 267,

            Player | PlayerBomb | PlayerGlued | PlayerStirring | PlayerPneumaticLeft
            | PlayerPneumaticRight | PneumaticActiveLeft | PneumaticActiveRight => 130,

            PreDia1 | PreDia2 | PreDia3 | PreDia4 | PreDia5 | PreStone1 | PreStone2
            | PreStone3 | PreStone4 | PreSteel1 | PreSteel2 | PreSteel3 | PreSteel4
            | PreClock1 | PreClock2 | PreClock3 | PreClock4 | NutCrack1 | NutCrack2
            | NutCrack3 | NutCrack4 | BombTick1 | BombTick2 | BombTick3 | BombTick4
            | BombTick5 | BombTick6 | BombTick7 | BombExpl1 | BombExpl2 | BombExpl3
            | BombExpl4 | GhostExpl1 | GhostExpl2 | GhostExpl3 | GhostExpl4 | NitroExpl1
            | NitroExpl2 | NitroExpl3 | NitroExpl4 | Amoeba2Expl1 | Amoeba2Expl2
            | Amoeba2Expl3 | Amoeba2Expl4 | Explode1 | Explode2 | Explode3 | Explode4
            | Explode5 | PrePlayer1 | PrePlayer2 | PrePlayer3 => 180,

            _ => 10,
        }
    }

    /// What remains when this element is broken by the pneumatic hammer.
    /// `None` when the element cannot be hammered (for example because it
    /// exploded while the hammer was working).
    pub fn hammered_to(self) -> Option<Element> {
        use Element::*;
        match self {
            Brick | BrickSlopedUpRight | BrickSlopedUpLeft | BrickSlopedDownLeft
            | BrickSlopedDownRight | BrickNonSloped | BrickEatable => Some(Space),
            Player | PlayerBomb | PlayerGlued | PlayerStirring => Some(Explode1),
            _ => None,
        }
    }

    /// The creature family and facing index (0..4, order left/up/right/
    /// down) for four-facing creatures.
    pub fn creature_info(self) -> Option<(Creature, usize)> {
        use Element::*;
        Some(match self {
            Firefly1 => (Creature::Firefly, 0),
            Firefly2 => (Creature::Firefly, 1),
            Firefly3 => (Creature::Firefly, 2),
            Firefly4 => (Creature::Firefly, 3),
            AltFirefly1 => (Creature::AltFirefly, 0),
            AltFirefly2 => (Creature::AltFirefly, 1),
            AltFirefly3 => (Creature::AltFirefly, 2),
            AltFirefly4 => (Creature::AltFirefly, 3),
            Butterfly1 => (Creature::Butterfly, 0),
            Butterfly2 => (Creature::Butterfly, 1),
            Butterfly3 => (Creature::Butterfly, 2),
            Butterfly4 => (Creature::Butterfly, 3),
            AltButterfly1 => (Creature::AltButterfly, 0),
            AltButterfly2 => (Creature::AltButterfly, 1),
            AltButterfly3 => (Creature::AltButterfly, 2),
            AltButterfly4 => (Creature::AltButterfly, 3),
            Stonefly1 => (Creature::Stonefly, 0),
            Stonefly2 => (Creature::Stonefly, 1),
            Stonefly3 => (Creature::Stonefly, 2),
            Stonefly4 => (Creature::Stonefly, 3),
            Dragonfly1 => (Creature::Dragonfly, 0),
            Dragonfly2 => (Creature::Dragonfly, 1),
            Dragonfly3 => (Creature::Dragonfly, 2),
            Dragonfly4 => (Creature::Dragonfly, 3),
            Cow1 => (Creature::Cow, 0),
            Cow2 => (Creature::Cow, 1),
            Cow3 => (Creature::Cow, 2),
            Cow4 => (Creature::Cow, 3),
            _ => return None,
        })
    }

    /// Every element, scanned twins included. Used by consistency tests
    /// and by diamond counting.
    pub const ALL: &'static [Element] = &ALL_ELEMENTS;
}

use all_elements::ALL_ELEMENTS;

mod all_elements {
    use super::Element;
    use super::Element::*;

    pub const ALL_ELEMENTS: [Element; 316] = [
        Space, Dirt, Dirt2, DirtSlopedUpRight, DirtSlopedUpLeft, DirtSlopedDownLeft,
        DirtSlopedDownRight, DirtBall, DirtLoose, DirtGlued, Brick, BrickSlopedUpRight,
        BrickSlopedUpLeft, BrickSlopedDownLeft, BrickSlopedDownRight, BrickNonSloped,
        BrickEatable, Steel, SteelSlopedUpRight, SteelSlopedUpLeft, SteelSlopedDownLeft,
        SteelSlopedDownRight, SteelExplodable, SteelEatable, Stone, MegaStone, FlyingStone,
        WaitingStone, ChasingStone, Diamond, FlyingDiamond, DiamondGlued, StoneGlued, Nut,
        Lava, MagicWall, Slime, Acid, Water, Water1, Water2, Water3, Water4, Water5, Water6,
        Water7, Water8, Water9, Water10, Water11, Water12, Water13, Water14, Water15,
        Water16, Amoeba, Amoeba2, Sweet, Voodoo, Box, Pot, Gravestone, Skeleton, Clock,
        PneumaticHammer, Teleporter, TimePenalty, Key1, Key2, Key3, Door1, Door2, Door3,
        DiamondKey, TrappedDiamond, GravitySwitch, CreatureSwitch, BiterSwitch,
        ExpandingWallSwitch, ReplicatorSwitch, ConveyorSwitch, ConveyorDirSwitch,
        Replicator, ConveyorLeft, ConveyorRight, FallingWall, HExpandingWall,
        VExpandingWall, ExpandingWall, HExpandingSteelWall, VExpandingSteelWall,
        ExpandingSteelWall, Bomb, NitroPack, Ghost, BladderSpender, Firefly1, Firefly2,
        Firefly3, Firefly4, AltFirefly1, AltFirefly2, AltFirefly3, AltFirefly4, Butterfly1,
        Butterfly2, Butterfly3, Butterfly4, AltButterfly1, AltButterfly2, AltButterfly3,
        AltButterfly4, Stonefly1, Stonefly2, Stonefly3, Stonefly4, Dragonfly1, Dragonfly2,
        Dragonfly3, Dragonfly4, Biter1, Biter2, Biter3, Biter4, Cow1, Cow2, Cow3, Cow4,
        CowEnclosed1, CowEnclosed2, CowEnclosed3, CowEnclosed4, CowEnclosed5, CowEnclosed6,
        CowEnclosed7, Bladder, Bladder1, Bladder2, Bladder3, Bladder4, Bladder5, Bladder6,
        Bladder7, Bladder8, Inbox, PreOutbox, Outbox, PreInvisOutbox, InvisOutbox,
        PrePlayer1, PrePlayer2, PrePlayer3, Player, PlayerBomb, PlayerGlued,
        PlayerStirring, PlayerPneumaticLeft, PlayerPneumaticRight, PneumaticActiveLeft,
        PneumaticActiveRight, StoneF, MegaStoneF, FlyingStoneF, DiamondF, FlyingDiamondF,
        NutF, DirtBallF, DirtLooseF, FallingWallF, NitroPackF, NitroPackExplode, PreDia1,
        PreDia2, PreDia3, PreDia4, PreDia5, PreStone1, PreStone2, PreStone3, PreStone4,
        PreSteel1, PreSteel2, PreSteel3, PreSteel4, PreClock1, PreClock2, PreClock3,
        PreClock4, NutCrack1, NutCrack2, NutCrack3, NutCrack4, BombTick1, BombTick2,
        BombTick3, BombTick4, BombTick5, BombTick6, BombTick7, BombExpl1, BombExpl2,
        BombExpl3, BombExpl4, GhostExpl1, GhostExpl2, GhostExpl3, GhostExpl4, NitroExpl1,
        NitroExpl2, NitroExpl3, NitroExpl4, Amoeba2Expl1, Amoeba2Expl2, Amoeba2Expl3,
        Amoeba2Expl4, Explode1, Explode2, Explode3, Explode4, Explode5, StoneScanned,
        MegaStoneScanned, FlyingStoneScanned, WaitingStoneScanned, ChasingStoneScanned,
        DiamondScanned, FlyingDiamondScanned, NutScanned, DirtBallScanned,
        DirtLooseScanned, BoxScanned, StoneFScanned, MegaStoneFScanned,
        FlyingStoneFScanned, DiamondFScanned, FlyingDiamondFScanned, NutFScanned,
        DirtBallFScanned, DirtLooseFScanned, FallingWallFScanned, NitroPackScanned,
        NitroPackFScanned, NitroPackExplodeScanned, Firefly1Scanned, Firefly2Scanned,
        Firefly3Scanned, Firefly4Scanned, AltFirefly1Scanned, AltFirefly2Scanned,
        AltFirefly3Scanned, AltFirefly4Scanned, Butterfly1Scanned, Butterfly2Scanned,
        Butterfly3Scanned, Butterfly4Scanned, AltButterfly1Scanned, AltButterfly2Scanned,
        AltButterfly3Scanned, AltButterfly4Scanned, Stonefly1Scanned, Stonefly2Scanned,
        Stonefly3Scanned, Stonefly4Scanned, Dragonfly1Scanned, Dragonfly2Scanned,
        Dragonfly3Scanned, Dragonfly4Scanned, Biter1Scanned, Biter2Scanned, Biter3Scanned,
        Biter4Scanned, Cow1Scanned, Cow2Scanned, Cow3Scanned, Cow4Scanned, GhostScanned,
        BladderScanned, Bladder1Scanned, Bladder2Scanned, Bladder3Scanned,
        Bladder4Scanned, Bladder5Scanned, Bladder6Scanned, Bladder7Scanned,
        Bladder8Scanned, PlayerScanned, PlayerBombScanned, PlayerGluedScanned,
        PlayerStirringScanned, PlayerPneumaticLeftScanned, PlayerPneumaticRightScanned,
        PneumaticActiveLeftScanned, PneumaticActiveRightScanned, AmoebaScanned,
        Amoeba2Scanned, Water1Scanned, AcidScanned, HExpandingWallScanned,
        VExpandingWallScanned, ExpandingWallScanned, HExpandingSteelWallScanned,
        VExpandingSteelWallScanned, ExpandingSteelWallScanned, Explode1Scanned,
        Explode2Scanned, PreDia1Scanned, PreDia2Scanned, PreStone1Scanned,
        PreSteel1Scanned, PreClock1Scanned, NutCrack1Scanned, BombTick1Scanned,
        BombExpl1Scanned, GhostExpl1Scanned, NitroExpl1Scanned, Amoeba2Expl1Scanned,
    ];
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // The original engine validated its element database at startup; the
    // same consistency rules are checked here once, at test time.

    #[test]
    fn scanned_pairs_are_symmetric() {
        for &e in Element::ALL {
            let pair = e.scanned_pair();
            if pair != e {
                assert!(!e.is_scanned(), "{e:?} has a twin but is already scanned");
                assert!(pair.is_scanned(), "{pair:?} must be scanned");
                assert_eq!(pair.unscanned_pair(), e, "pair of {e:?} must map back");
            }
        }
    }

    #[test]
    fn scanning_is_idempotent() {
        for &e in Element::ALL {
            assert_eq!(e.scanned_pair().scanned_pair(), e.scanned_pair());
            assert_eq!(e.unscanned_pair().unscanned_pair(), e.unscanned_pair());
        }
    }

    #[test]
    fn scanned_twins_cost_nothing() {
        for &e in Element::ALL {
            if e.is_scanned() {
                assert_eq!(e.ckdelay(), 0, "{e:?} must have zero ckdelay");
            }
        }
    }

    #[test]
    fn scanned_twins_are_bare_markers() {
        for &e in Element::ALL {
            if e.twin_of().is_some() {
                assert_eq!(
                    e.flags(),
                    ElementFlags::SCANNED,
                    "{e:?} must carry only the scanned marker"
                );
            } else {
                assert!(!e.flags().contains(ElementFlags::SCANNED));
            }
        }
    }

    #[test]
    fn all_list_has_no_duplicates() {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for &e in Element::ALL {
            assert!(seen.insert(e), "{e:?} listed twice");
        }
    }

    #[test]
    fn explosion_first_stages_marked() {
        assert!(Element::Explode1
            .flags()
            .contains(ElementFlags::EXPLOSION_FIRST_STAGE));
        assert!(Element::PreDia1
            .flags()
            .contains(ElementFlags::EXPLOSION_FIRST_STAGE));
        assert!(!Element::Explode2
            .flags()
            .contains(ElementFlags::EXPLOSION_FIRST_STAGE));
    }

    #[test]
    fn short_explosion_advance_stays_scanned() {
        assert_eq!(
            Element::Explode1Scanned.next_stage(),
            Element::Explode2Scanned
        );
        assert_eq!(Element::PreDia1Scanned.next_stage(), Element::PreDia2Scanned);
    }

    #[test]
    fn hammered_elements_have_a_result() {
        for &e in Element::ALL {
            if e.flags().contains(ElementFlags::CAN_BE_HAMMERED) {
                assert!(e.hammered_to().is_some(), "{e:?} hammerable without result");
            }
        }
    }

    #[test]
    fn creature_facings_round_trip() {
        for &e in Element::ALL {
            if let Some((kind, dir)) = e.creature_info() {
                assert_eq!(kind.facing(dir), e);
            }
        }
    }

    #[test]
    fn sequences_reach_their_final_stage() {
        // Each timed sequence must terminate at the stage the engine
        // transforms, without skipping or looping.
        let mut e = Element::Explode1;
        for _ in 0..4 {
            e = e.next_stage();
        }
        assert_eq!(e, Element::Explode5);

        let mut e = Element::BombTick1;
        for _ in 0..6 {
            e = e.next_stage();
        }
        assert_eq!(e, Element::BombTick7);

        let mut e = Element::Water1;
        for _ in 0..15 {
            e = e.next_stage();
        }
        assert_eq!(e, Element::Water16);
    }
}
