//! Flows: slowly accumulating offsets that scroll floor and ceiling texture
//! lookups, animating water currents and cloud drift.

use glam::{Vec2, vec2};

use crate::geom::rotate;

#[derive(Clone, Copy, Debug)]
pub struct Flow {
    pub direction: Vec2,
    pub velocity: Vec2,
    /// Accumulated texture offset in world units.
    pub pos: Vec2,
    pub acceleration: f32,
    pub speed: f32,
    /// Plane shift relative to its surface: negative sinks a water surface
    /// below the floor, positive raises a cloud layer above the ceiling.
    pub height: f32,
}

impl Flow {
    pub fn start(height: f32) -> Self {
        Self {
            direction: vec2(1.0, 0.3).normalize(),
            velocity: Vec2::ZERO,
            pos: Vec2::ZERO,
            acceleration: 0.0025,
            speed: 0.03,
            height,
        }
    }

    /// Advance one tick: accelerate toward a slowly wandering heading and
    /// clamp to terminal speed.
    pub fn stream(&mut self, ticks: u32) {
        let swirl = (ticks as f32 * 0.005).sin() * 0.6;
        self.velocity += self.acceleration * rotate(self.direction, swirl);
        if self.velocity.length() > self.speed {
            self.velocity = self.velocity.normalize() * self.speed;
        }
        self.pos += self.velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_is_clamped() {
        let mut flow = Flow::start(-0.15);
        for t in 0..1000 {
            flow.stream(t);
            assert!(flow.velocity.length() <= flow.speed + 1e-6);
        }
    }

    #[test]
    fn offset_accumulates() {
        let mut flow = Flow::start(0.35);
        for t in 0..100 {
            flow.stream(t);
        }
        assert!(flow.pos.length() > 0.0);
    }
}
