//! Player position and the boundary rule that keeps it on screen.

use skitter_engine::coords::Vec2;

use crate::controls::Direction;

/// The player-controlled sprite.
///
/// `position` is the offset from the window center in logical pixels, +Y up.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Player {
    pub position: Vec2,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves one `step` in `dir`.
    pub fn advance(&mut self, dir: Direction, step: f32) {
        self.position += dir.unit() * step;
        debug_assert!(self.position.is_finite());
    }
}

/// Symmetric per-axis movement limit.
///
/// The valid region is `[-limit, +limit]` on each axis. Leaving it is undone
/// by one `step` per axis per tick, never by snapping to the edge, so a
/// sprite pushed against a wall rocks between `limit - step` and `limit`
/// instead of sticking to it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub limit: f32,
    pub step: f32,
}

impl Bounds {
    pub const fn new(limit: f32, step: f32) -> Self {
        Self { limit, step }
    }

    /// Applies the recoil to each axis independently.
    pub fn clamp(&self, p: &mut Vec2) {
        p.x = self.clamp_axis(p.x);
        p.y = self.clamp_axis(p.y);
    }

    fn clamp_axis(&self, v: f32) -> f32 {
        if v > self.limit {
            v - self.step
        } else if v < -self.limit {
            v + self.step
        } else {
            v
        }
    }
}
