//! Rockfall engine -- deterministic cave iteration for the Boulder Dash
//! family.
//!
//! A cave template ([`CaveStored`](rockfall_cave::stored::CaveStored)) is
//! rendered into a live [`CaveRendered`](rendered::CaveRendered); each
//! call to [`iterate`](rendered::CaveRendered::iterate) advances the
//! simulation by one tick and derives the wall-clock delay the caller
//! should sleep before the next one. Given the same seed and inputs, the
//! engine reproduces a game byte-exactly, which is what makes recorded
//! replays verifiable.
//!
//! The engine produces *descriptors* only: sound requests with precedence
//! on three channels, and particle sets with a plain kinematic model.
//! Rendering and audio are the caller's business.
//!
//! # Quick Start
//!
//! ```
//! use rockfall_cave::prelude::*;
//! use rockfall_engine::prelude::*;
//!
//! let mut stored = CaveStored::default();
//! stored.name = "Example".to_owned();
//! stored.objects.push(CaveObject::Point {
//!     seen_on: CaveObject::ALL_LEVELS,
//!     p: Coord::new(5, 5),
//!     element: Element::Inbox,
//! });
//!
//! let mut cave = CaveRendered::render(&stored, 1, 42).unwrap();
//! let applied = cave.iterate(Dir::Still, false, false);
//! assert_eq!(applied, Dir::Still);
//! assert!(cave.speed() > 0);
//! ```

#![deny(unsafe_code)]

pub mod rendered;
pub mod replay;

mod explosions;
mod fall;
mod iterate;
mod objects;
mod player;
mod sounds;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced when rendering a cave template.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template declared an impossible size.
    #[error("invalid cave geometry {w}x{h}")]
    InvalidGeometry {
        w: i32,
        h: i32,
    },

    /// The literal map does not match the declared cave size.
    #[error("cave map is {actual:?} cells but the template declares {declared:?}")]
    MapSizeMismatch {
        declared: (i32, i32),
        actual: (i32, i32),
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use crate::rendered::{
        AmoebaState, CaveRendered, MagicWallState, PlayerState,
    };
    pub use crate::replay::{
        validate_replay, CaveReplay, ReplayInput, ReplayOutcome, ReplayRecorder, ReplayReport,
    };
    pub use crate::RenderError;
}
