//! Rockfall cave model -- elements, directions, randomness and templates.
//!
//! This crate is the pure data model of the Rockfall engine: the element
//! enumeration with its property table and scanned twins, the direction
//! algebra, the two random number generators, the wrap-around cave map,
//! sound and particle descriptors, drawing objects, and the cave template
//! with its resolved per-level parameter block.
//!
//! There is no simulation here. The iteration engine lives in the
//! `rockfall-engine` crate and consumes these types.
//!
//! # Quick Start
//!
//! ```
//! use rockfall_cave::prelude::*;
//!
//! let mut cave = CaveStored::default();
//! cave.name = "Example".to_owned();
//! cave.set_engine_defaults(EngineKind::Bd1);
//!
//! let params = cave.params_for_level(1);
//! assert_eq!(params.timing_factor, 1200); // BD1 is a PAL engine
//! ```

#![deny(unsafe_code)]

pub mod color;
pub mod direction;
pub mod element;
pub mod map;
pub mod object;
pub mod particle;
pub mod rng;
pub mod sound;
pub mod stored;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced when validating cave data.
#[derive(Debug, thiserror::Error)]
pub enum CaveError {
    /// A cave template referenced a scanned element, which is only valid
    /// inside a running scan.
    #[error("scanned element {element:?} is not allowed in a cave template")]
    ScannedElementInTemplate {
        /// The offending element.
        element: element::Element,
    },

    /// A template declared an impossible geometry.
    #[error("invalid cave geometry {w}x{h}")]
    InvalidGeometry {
        w: i32,
        h: i32,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::color::Color;
    pub use crate::direction::Dir;
    pub use crate::element::{Creature, Element, ElementFlags};
    pub use crate::map::{CaveMap, WrapKind};
    pub use crate::object::{CaveObject, Coord, MazeKind};
    pub use crate::particle::{Particle, ParticleSet};
    pub use crate::rng::{C64Rng, GameRng};
    pub use crate::sound::{Sound, SoundWithPos};
    pub use crate::stored::{
        CaveParams, CaveStored, EffectTable, EngineKind, EnginePolicy, Scheduling,
        SoundOptions, PROBABILITY_MAX,
    };
    pub use crate::CaveError;
}
