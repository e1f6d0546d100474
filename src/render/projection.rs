//! Distance-to-screen projection for one column, plus the stacked and
//! dropped derivatives used to composite a second horizontal plane (clouds
//! above an open ceiling, water sunk below the floor).
//!
//! Screen rows here are y-up: row 0 is the bottom of the screen, matching
//! the sideways canvas layout.

use crate::geom::{cl, fl};

/// Integer row span after clamping to the screen, `bot..top`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clamped {
    pub bot: i32,
    pub top: i32,
}

impl Clamped {
    fn new(yres: usize, bot: f32, top: f32) -> Self {
        Self {
            bot: if (bot as i32) < 0 { 0 } else { cl(bot) },
            top: if (top as i32) > yres as i32 {
                yres as i32
            } else {
                fl(top)
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub bot: f32,
    pub top: f32,
    pub clamped: Clamped,
    /// World-to-screen scale: the on-screen height of a unit wall.
    pub size: f32,
    pub height: f32,
    pub yres: usize,
    /// Horizon row.
    pub mid: f32,
    /// Accumulated plane shift of stacked/dropped derivatives.
    pub shift: f32,
    /// Stacking depth, +1 per stack, -1 per drop.
    pub level: i32,
}

impl Projection {
    /// Project a wall at perpendicular `distance` for a viewer with vertical
    /// look `yaw` and eye height `height`.
    pub fn new(yres: usize, focal: f32, yaw: f32, distance: f32, height: f32) -> Self {
        // Small distances would overflow f32 through the division; the floor
        // of the clamp is arbitrary.
        let size = focal * yres as f32 / distance.max(1e-5);
        let mid = yaw * yres as f32 / 2.0;
        let bot = mid + (0.0 - height) * size;
        let top = mid + (1.0 - height) * size;
        Self {
            bot,
            top,
            clamped: Clamped::new(yres, bot, top),
            size,
            height,
            yres,
            mid,
            shift: 0.0,
            level: 0,
        }
    }

    /// A second layer sitting on top of this one.
    pub fn stacked(&self, shift: f32) -> Self {
        let bot = self.top - 1.0;
        let top = self.top - 1.0 + self.size * shift;
        Self {
            bot,
            top,
            clamped: Clamped::new(self.yres, bot, top),
            shift: self.shift + shift,
            level: self.level + 1,
            ..*self
        }
    }

    /// A second layer hanging below this one. `shift` is negative for a
    /// sunken plane.
    pub fn dropped(&self, shift: f32) -> Self {
        let top = self.bot + 2.0;
        let bot = self.bot + 2.0 + self.size * shift;
        Self {
            bot,
            top,
            clamped: Clamped::new(self.yres, bot, top),
            shift: self.shift + shift,
            level: self.level - 1,
            ..*self
        }
    }

    /// Fraction of the wall ray at which the ceiling plane shows through
    /// screen row `y`. Multiply the ray by it (clamped to 1) to land on the
    /// sampled world point.
    #[inline]
    pub fn ccast(&self, y: i32) -> f32 {
        (1.0 - self.height + self.shift) * self.size / (y as f32 + 1.0 + self.level as f32 - self.mid)
    }

    /// Floor-plane counterpart of [`Projection::ccast`].
    #[inline]
    pub fn fcast(&self, y: i32) -> f32 {
        (0.0 - self.height + self.shift) * self.size / (y as f32 - 1.0 + self.level as f32 - self.mid)
    }
}
