//! Minimal RGB color type.
//!
//! The engine does not render; colors only tag particle descriptors and
//! the six per-cave color slots, for the caller's theme code to interpret.

use serde::{Deserialize, Serialize};

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build a color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    // Default particle tints, roughly the classic C64 palette entries the
    // original themes used for these effects.
    pub const DIRT_BROWN: Color = Color::rgb(0x88, 0x53, 0x2b);
    pub const STONE_GRAY: Color = Color::rgb(0x9a, 0x9a, 0x9a);
    pub const DIAMOND_BLUE: Color = Color::rgb(0x60, 0xa0, 0xff);
    pub const EXPLOSION_YELLOW: Color = Color::rgb(0xff, 0xd0, 0x40);
    pub const MAGIC_PURPLE: Color = Color::rgb(0xb0, 0x60, 0xff);
    pub const LAVA_RED: Color = Color::rgb(0xe0, 0x40, 0x20);
    pub const WALL_GRAY: Color = Color::rgb(0x70, 0x70, 0x70);
}

impl Default for Color {
    fn default() -> Self {
        Color::rgb(0, 0, 0)
    }
}
