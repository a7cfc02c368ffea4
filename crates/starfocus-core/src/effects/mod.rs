//! Cosmetic effects: the starfield backdrop and the trailing cursor ring.

mod cursor;
mod starfield;

pub use cursor::{CursorTrail, PointerPos, DEFAULT_RING_LAG_MS};
pub use starfield::{Star, Starfield, DEFAULT_STAR_COUNT};
