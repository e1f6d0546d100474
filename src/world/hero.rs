//! Player view-point and resources.
//!
//! Only yaw is simulated as rotation; looking up and down is a vertical
//! shear (`yaw` in `(0, 2)`) and crouching/standing an eye-height slide
//! (`height` in `(0, 1)`), both consumed directly by the projection.

use glam::{Vec2, vec2};

use crate::geom::Line;
use crate::world::Map;

#[derive(Clone, Copy, Debug)]
pub struct Hero {
    pub pos: Vec2,
    /// Heading in radians, 0 = +x, counter-clockwise.
    pub theta: f32,
    /// Vertical look offset; 1.0 is dead level.
    pub yaw: f32,
    /// Eye height within the wall cube; 0.5 is centred.
    pub height: f32,
    /// Focal plane. `fov.a.x` is the focal length.
    pub fov: Line,
    /// Torch intensity for the inverse-square falloff.
    pub torch: f32,
    /// Interaction radius, also the diffusion reach handed to the field.
    pub aura: f32,
    pub speed: f32,
    pub hps: f32,
    pub hpsmax: i32,
    pub mna: f32,
    pub mnamax: i32,
    pub ftg: f32,
    pub ftgmax: i32,
}

impl Hero {
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            pos,
            theta: 0.0,
            yaw: 1.0,
            height: 0.5,
            fov: Line::new(vec2(1.0, -1.0), vec2(1.0, 1.0)),
            torch: 750.0,
            aura: 12.0,
            speed: 0.1,
            hps: 8.0,
            hpsmax: 10,
            mna: 5.0,
            mnamax: 10,
            ftg: 10.0,
            ftgmax: 10,
        }
    }

    #[inline]
    pub fn focal(&self) -> f32 {
        self.fov.a.x
    }

    pub fn turn(&mut self, delta: f32) {
        self.theta = (self.theta + delta).rem_euclid(std::f32::consts::TAU);
    }

    pub fn look(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta).clamp(0.1, 1.9);
    }

    pub fn lift(&mut self, delta: f32) {
        self.height = (self.height + delta).clamp(0.1, 0.9);
    }

    /// Candidate position after one tick of walking. The caller decides
    /// whether the map accepts it.
    pub fn step(&self, forward: f32, strafe: f32) -> Vec2 {
        let (s, c) = self.theta.sin_cos();
        let dir = vec2(c, s) * self.speed;
        self.pos + dir * forward + vec2(-dir.y, dir.x) * strafe
    }

    /// Walk if the landing cell is passable; moving costs fatigue, standing
    /// still recovers it.
    pub fn walk(&mut self, forward: f32, strafe: f32, map: &Map) {
        if forward == 0.0 && strafe == 0.0 {
            self.ftg = (self.ftg + 0.01).min(self.ftgmax as f32);
            return;
        }
        let next = self.step(forward, strafe);
        if map.passable(next) {
            self.pos = next;
        }
        self.ftg = (self.ftg - 0.02).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_reject_the_walk() {
        let map = Map::demo();
        let mut hero = Hero::spawn(map.spawn());
        let before = hero.pos;
        // March straight west into the boundary.
        hero.theta = std::f32::consts::PI;
        for _ in 0..100 {
            hero.walk(1.0, 0.0, &map);
        }
        assert!(map.passable(hero.pos));
        assert!(hero.pos.x <= before.x);
    }

    #[test]
    fn look_and_lift_stay_in_range() {
        let map = Map::demo();
        let mut hero = Hero::spawn(map.spawn());
        for _ in 0..100 {
            hero.look(0.1);
            hero.lift(0.1);
        }
        assert!(hero.yaw < 2.0);
        assert!(hero.height < 1.0);
        for _ in 0..100 {
            hero.look(-0.1);
            hero.lift(-0.1);
        }
        assert!(hero.yaw > 0.0);
        assert!(hero.height > 0.0);
    }

    #[test]
    fn fatigue_drains_and_recovers() {
        let map = Map::demo();
        let mut hero = Hero::spawn(map.spawn());
        hero.walk(1.0, 0.0, &map);
        assert!(hero.ftg < hero.ftgmax as f32);
        let tired = hero.ftg;
        hero.walk(0.0, 0.0, &map);
        assert!(hero.ftg > tired);
    }
}
