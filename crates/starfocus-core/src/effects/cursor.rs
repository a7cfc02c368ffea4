use serde::{Deserialize, Serialize};

use crate::clock::TaskQueue;

/// Delay before the ring catches up with the dot.
pub const DEFAULT_RING_LAG_MS: u64 = 80;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

/// Custom cursor: a dot that follows the pointer exactly and a ring that
/// follows it after a fixed lag. Every move schedules its own catch-up, so
/// the ring replays the pointer's path rather than jumping to the end.
#[derive(Debug, Clone)]
pub struct CursorTrail {
    lag_ms: u64,
    dot: PointerPos,
    ring: PointerPos,
    hover: bool,
    queue: TaskQueue<PointerPos>,
}

impl CursorTrail {
    pub fn new(lag_ms: u64) -> Self {
        Self {
            lag_ms,
            dot: PointerPos::default(),
            ring: PointerPos::default(),
            hover: false,
            queue: TaskQueue::new(),
        }
    }

    pub fn dot(&self) -> PointerPos {
        self.dot
    }

    pub fn ring(&self) -> PointerPos {
        self.ring
    }

    pub fn hover(&self) -> bool {
        self.hover
    }

    /// Pointer entered or left an interactive element.
    pub fn set_hover(&mut self, hover: bool) {
        self.hover = hover;
    }

    pub fn pointer_moved(&mut self, now_ms: u64, x: f32, y: f32) {
        self.advance_to(now_ms);
        let pos = PointerPos { x, y };
        self.dot = pos;
        self.queue.schedule_after(self.lag_ms, pos);
    }

    /// Apply every ring move due by `now_ms`.
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some((_, pos)) = self.queue.pop_due(now_ms) {
            self.ring = pos;
        }
    }
}

impl Default for CursorTrail {
    fn default() -> Self {
        Self::new(DEFAULT_RING_LAG_MS)
    }
}
