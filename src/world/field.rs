//! Diffusion field: a scalar potential on a sub-grid of the map that lets
//! sprites chase the hero around corners without pathfinding.
//!
//! Each tick the field is cleared, walls are stamped as blockers, and square
//! rings of decreasing value grow outward from the hero. A sprite walks up
//! the gradient; because stamped cells are never overwritten, the gradient
//! bends around walls on its own.

use glam::Vec2;

use crate::geom::fl;
use crate::world::Map;

/// Value stamped into sub-cells covered by a wall. Diffusion only writes
/// zeroed cells, so stamped cells never turn positive.
const BLOCKED: f32 = -1.0;

pub struct Field {
    /// Sub-cells per map tile along each axis.
    pub res: i32,
    pub rows: i32,
    pub cols: i32,
    /// Propagation radius in sub-cells.
    pub aura: i32,
    mesh: Vec<f32>,
}

impl Field {
    /// Build a field over `map` reaching `aura` tiles from its source.
    pub fn new(map: &Map, aura: f32) -> Self {
        let res = 2;
        let mut field = Self {
            res,
            rows: res * map.rows as i32,
            cols: res * map.cols as i32,
            aura: (res as f32 * aura) as i32,
            mesh: vec![0.0; (res * res) as usize * map.rows * map.cols],
        };
        field.reset(map);
        field
    }

    #[inline]
    pub fn on(&self, y: i32, x: i32) -> bool {
        y >= 0 && x >= 0 && y < self.rows && x < self.cols
    }

    #[inline]
    pub fn at(&self, y: i32, x: i32) -> f32 {
        if self.on(y, x) {
            self.mesh[(y * self.cols + x) as usize]
        } else {
            0.0
        }
    }

    #[inline]
    fn set(&mut self, y: i32, x: i32, val: f32) {
        self.mesh[(y * self.cols + x) as usize] = val;
    }

    /// Zero the mesh and stamp every impassable tile's sub-cells.
    pub fn reset(&mut self, map: &Map) {
        self.mesh.fill(0.0);
        for y in 0..map.rows as i32 {
            for x in 0..map.cols as i32 {
                if map.tile(y, x).passable() {
                    continue;
                }
                for j in 0..self.res {
                    for i in 0..self.res {
                        self.set(self.res * y + j, self.res * x + i, BLOCKED);
                    }
                }
            }
        }
    }

    /// Strictly decreasing with ring radius, positive inside the reach.
    fn materialize(&self, w: i32) -> f32 {
        (self.aura - w) as f32
    }

    /// Grow square rings of radius 1..=aura around the source point.
    pub fn diffuse(&mut self, source: Vec2) {
        let y = fl(self.res as f32 * source.y);
        let x = fl(self.res as f32 * source.x);
        for w in 1..=self.aura {
            self.ring(y, x, w);
        }
    }

    fn ring(&mut self, y: i32, x: i32, w: i32) {
        let val = self.materialize(w);
        let (t, b, l, r) = (y - w, y + w, x - w, x + w);
        for j in t..=b {
            for i in l..=r {
                let rim = j == t || j == b || i == l || i == r;
                if rim && self.on(j, i) && self.at(j, i) == 0.0 {
                    self.set(j, i, val);
                }
            }
        }
    }

    /// Steering step for a sprite at `from` pulled toward `to`.
    ///
    /// Zero when already adjacent, out of reach, or when the best neighbor
    /// would land in a wall; otherwise the unit direction of the steepest
    /// uphill neighbor among the eight compass moves.
    pub fn force(&self, from: Vec2, to: Vec2, map: &Map) -> Vec2 {
        const DIRS: [Vec2; 8] = [
            Vec2::new(1.0, 0.0),   // E
            Vec2::new(1.0, 1.0),   // SE
            Vec2::new(0.0, 1.0),   // S
            Vec2::new(-1.0, 1.0),  // SW
            Vec2::new(-1.0, 0.0),  // W
            Vec2::new(-1.0, -1.0), // NW
            Vec2::new(0.0, -1.0),  // N
            Vec2::new(1.0, -1.0),  // NE
        ];
        let dist = (from - to).length();
        if dist < 1.33 || dist > (self.aura / self.res) as f32 {
            return Vec2::ZERO;
        }
        let y = fl(self.res as f32 * from.y);
        let x = fl(self.res as f32 * from.x);
        let here = self.at(y, x);
        let mut best = 0;
        let mut steepest = f32::MIN;
        for (i, dir) in DIRS.iter().enumerate() {
            let n = from + *dir;
            let ny = fl(self.res as f32 * n.y);
            let nx = fl(self.res as f32 * n.x);
            let grad = if self.on(ny, nx) {
                self.at(ny, nx) - here
            } else {
                0.0
            };
            if grad > steepest {
                steepest = grad;
                best = i;
            }
        }
        let step = DIRS[best];
        if map.passable(from + step) {
            step.normalize_or_zero()
        } else {
            Vec2::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn corridor() -> Map {
        // An 11x11 room with one lone pillar between two open halves.
        let zone = "\
###########
###########
###########
###########
###########
###########
###########
###########
###########
###########
###########

###########
#         #
#         #
#         #
#         #
#    #    #
#         #
#         #
#         #
#         #
###########

###########
#111111111#
#111111111#
#111111111#
#111111111#
#111111111#
#111111111#
#111111111#
#111111111#
#111111111#
###########";
        Map::parse(zone).expect("test zone is well formed")
    }

    #[test]
    fn walls_never_turn_positive() {
        let map = corridor();
        let mut field = Field::new(&map, 8.0);
        field.diffuse(vec2(3.5, 5.5));
        for y in 0..map.rows as i32 {
            for x in 0..map.cols as i32 {
                if map.tile(y, x).passable() {
                    continue;
                }
                for j in 0..field.res {
                    for i in 0..field.res {
                        assert!(field.at(field.res * y + j, field.res * x + i) <= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn untouched_cells_stay_zero() {
        let map = corridor();
        let mut field = Field::new(&map, 2.0);
        field.diffuse(vec2(2.5, 2.5));
        // Far corner is well beyond a 2-tile aura.
        assert_eq!(field.at(field.res * 9, field.res * 9), 0.0);
    }

    #[test]
    fn rediffusion_is_idempotent() {
        let map = corridor();
        let mut field = Field::new(&map, 8.0);
        field.diffuse(vec2(3.5, 5.5));
        let snap: Vec<f32> = (0..field.rows)
            .flat_map(|y| (0..field.cols).map(move |x| (y, x)))
            .map(|(y, x)| field.at(y, x))
            .collect();
        field.diffuse(vec2(3.5, 5.5));
        for (i, (y, x)) in (0..field.rows)
            .flat_map(|y| (0..field.cols).map(move |x| (y, x)))
            .enumerate()
        {
            assert_eq!(field.at(y, x), snap[i]);
        }
    }

    #[test]
    fn force_cuts_off_adjacent_and_out_of_reach() {
        let map = corridor();
        let mut field = Field::new(&map, 4.0);
        let hero = vec2(5.5, 5.5);
        field.diffuse(hero);
        assert_eq!(field.force(vec2(6.2, 5.5), hero, &map), Vec2::ZERO);
        assert_eq!(field.force(vec2(9.4, 9.4), hero, &map), Vec2::ZERO);
    }

    #[test]
    fn gradient_routes_around_the_pillar() {
        let map = corridor();
        let mut field = Field::new(&map, 8.0);
        // Hero west of the pillar at (5, 5); sprite east of it.
        let hero = vec2(2.5, 5.5);
        field.diffuse(hero);
        let mut pos = vec2(7.5, 5.5);
        for _ in 0..64 {
            let step = field.force(pos, hero, &map);
            if (pos - hero).length() < 1.4 {
                break;
            }
            assert_ne!(step, Vec2::ZERO, "stalled at {pos}");
            pos += step * 0.5;
            assert!(map.passable(pos), "walked into a wall at {pos}");
        }
        assert!((pos - hero).length() < 1.4, "never reached the hero: {pos}");
    }
}
