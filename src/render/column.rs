//! Per-column rasterizer: wall, floor, and ceiling spans for a range of
//! screen columns, written into the sideways canvas.
//!
//! Each screen column is one contiguous `yres` run of the canvas with row 0
//! at the screen bottom, so the hot top-to-bottom write loop walks memory
//! linearly. The frame driver stands the canvas upright at present time.

use glam::Vec2;
use smallvec::SmallVec;

use crate::geom::{cell, frac, rotate};
use crate::render::cast::cast;
use crate::render::projection::Projection;
use crate::render::{Rgba, illuminate, shade};
use crate::world::{Flow, Hero, Map, TextureBank, Tile};

/// Everything a worker needs to rasterize its column range. Shared state is
/// read-only; each worker owns its canvas slab and depth slice exclusively.
pub struct Raster<'a> {
    pub map: &'a Map,
    pub bank: &'a TextureBank,
    pub hero: Hero,
    pub current: Flow,
    pub clouds: Flow,
    pub xres: usize,
    pub yres: usize,
}

impl Raster<'_> {
    /// Rasterize columns `x0..x0 + zbuff.len()` into `slab` (one `yres` run
    /// per column) and record each column's camera-space hit in `zbuff`.
    pub fn raster(&self, x0: usize, slab: &mut [Rgba], zbuff: &mut [Vec2]) {
        for (i, z) in zbuff.iter_mut().enumerate() {
            let column = &mut slab[i * self.yres..(i + 1) * self.yres];
            *z = self.column(x0 + i, column);
        }
    }

    /// Draw one screen column; returns the camera-space hit point whose x is
    /// the fish-eye-corrected perpendicular distance.
    fn column(&self, x: usize, column: &mut [Rgba]) -> Vec2 {
        let focal = self.hero.focal();
        let pan = 2.0 * x as f32 / self.xres as f32 - 1.0;
        let sigma = pan.atan2(focal);
        let hit = cast(self.hero.pos, sigma + self.hero.theta, self.map);
        let ray = hit.pos - self.hero.pos;
        let corrected = rotate(ray, -self.hero.theta);
        let proj = Projection::new(
            self.yres,
            focal,
            self.hero.yaw,
            corrected.x,
            self.hero.height,
        );

        let wall = self.bank.tile(hit.tile);
        let light = illuminate(self.hero.torch, corrected.x);
        let u = ((wall.w as f32 * hit.offset) as usize).min(wall.w - 1);
        for y in proj.clamped.bot..proj.clamped.top {
            let v = ((proj.top - (y as f32 + 0.5)) / proj.size * wall.h as f32) as usize;
            column[y as usize] = shade(wall.at(u, v), light);
        }

        let cache = self.flooring(column, &proj, ray, corrected.x);
        self.ceiling(column, &proj, ray, corrected.x, &cache);
        corrected
    }

    /// Rows below the wall base. Caches the sampled world point per row so a
    /// symmetric ceiling can reuse it reflected.
    fn flooring(
        &self,
        column: &mut [Rgba],
        proj: &Projection,
        ray: Vec2,
        distance: f32,
    ) -> SmallVec<[Vec2; 256]> {
        let mut cache = SmallVec::new();
        let sunken = proj.dropped(self.current.height);
        for y in 0..proj.clamped.bot {
            let t = proj.fcast(y).min(1.0);
            let p = self.hero.pos + ray * t;
            cache.push(p);
            let (color, d) = match Tile::of(self.floor_code(p)) {
                Tile::Liquid(code) => {
                    // Water sits on the sunken plane and drifts with the
                    // current.
                    let tw = sunken.fcast(y).min(1.0);
                    let pw = self.hero.pos + ray * tw;
                    let tex = self.bank.tile(code);
                    let off = pw - self.current.pos;
                    (tex.sample(frac(off.x), frac(off.y)), tw)
                }
                _ => {
                    let tex = self.bank.tile(self.floor_code(p));
                    (tex.sample(frac(p.x), frac(p.y)), t)
                }
            };
            column[y as usize] = shade(color, illuminate(self.hero.torch, d * distance));
        }
        cache
    }

    /// Rows above the wall top. With a centred, level view the geometry is
    /// the floor's mirror image, so the cached floor points are reused
    /// reflected; otherwise each row is recast through the ceiling plane.
    fn ceiling(
        &self,
        column: &mut [Rgba],
        proj: &Projection,
        ray: Vec2,
        distance: f32,
        cache: &[Vec2],
    ) {
        let raised = proj.stacked(self.clouds.height);
        let span = proj.clamped.top..self.yres as i32;
        let mirrored = self.hero.yaw == 1.0
            && self.hero.height == 0.5
            && cache.len() == span.clone().count();
        for (i, y) in span.enumerate() {
            let (p, t) = if mirrored {
                (cache[cache.len() - 1 - i], proj.ccast(y).min(1.0))
            } else {
                let t = proj.ccast(y).min(1.0);
                (self.hero.pos + ray * t, t)
            };
            match Tile::of(self.ceiling_code(p)) {
                // Open sky: clouds drift on the raised plane, lit by the sky
                // rather than the torch.
                Tile::Empty => {
                    let tc = raised.ccast(y).min(1.0);
                    let pc = self.hero.pos + ray * tc;
                    let tex = self.bank.tile(self.bank.clouds);
                    let off = pc - self.clouds.pos;
                    column[y as usize] = tex.sample(frac(off.x), frac(off.y));
                }
                _ => {
                    let tex = self.bank.tile(self.ceiling_code(p));
                    let color = tex.sample(frac(p.x), frac(p.y));
                    column[y as usize] =
                        shade(color, illuminate(self.hero.torch, t * distance));
                }
            }
        }
    }

    /// Flooring code under `p`; wall cells show their own face instead.
    fn floor_code(&self, p: Vec2) -> u8 {
        let (y, x) = cell(p);
        if self.map.tile(y, x).opaque() {
            self.map.walling(y, x)
        } else {
            self.map.flooring(y, x)
        }
    }

    fn ceiling_code(&self, p: Vec2) -> u8 {
        let (y, x) = cell(p);
        if self.map.tile(y, x).opaque() {
            self.map.walling(y, x)
        } else {
            self.map.ceiling(y, x)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster_frame(xres: usize, yres: usize) -> (Vec<Rgba>, Vec<Vec2>) {
        let map = Map::demo();
        let bank = TextureBank::with_defaults();
        let hero = Hero::spawn(map.spawn());
        let raster = Raster {
            map: &map,
            bank: &bank,
            hero,
            current: Flow::start(-0.15),
            clouds: Flow::start(0.35),
            xres,
            yres,
        };
        let mut canvas = vec![0u32; xres * yres];
        let mut zbuff = vec![Vec2::ZERO; xres];
        raster.raster(0, &mut canvas, &mut zbuff);
        (canvas, zbuff)
    }

    #[test]
    fn every_pixel_and_depth_entry_is_written() {
        let (canvas, zbuff) = raster_frame(64, 36);
        assert!(canvas.iter().all(|&px| px >> 24 == 0xFF));
        assert!(zbuff.iter().all(|z| z.x > 0.0));
    }

    #[test]
    fn depth_is_the_perpendicular_distance() {
        let map = Map::demo();
        let bank = TextureBank::with_defaults();
        let mut hero = Hero::spawn(map.spawn());
        hero.theta = 0.0;
        let raster = Raster {
            map: &map,
            bank: &bank,
            hero,
            current: Flow::start(-0.15),
            clouds: Flow::start(0.35),
            xres: 64,
            yres: 36,
        };
        let mut canvas = vec![0u32; 64 * 36];
        let mut zbuff = vec![Vec2::ZERO; 64];
        raster.raster(0, &mut canvas, &mut zbuff);
        // The centre column looks straight ahead: depth equals the ray length.
        let mid = zbuff[32];
        let hit = cast(hero.pos, 0.0, &map);
        let d = (hit.pos - hero.pos).length();
        assert!((mid.x - d).abs() < d * 0.05, "mid {mid} vs {d}");
    }

    #[test]
    fn torch_darkens_distant_walls() {
        let map = Map::demo();
        let bank = TextureBank::with_defaults();
        let spawn = map.spawn();
        let mut bright_hero = Hero::spawn(spawn);
        bright_hero.torch = 100_000.0;
        let mut dim_hero = Hero::spawn(spawn);
        dim_hero.torch = 10.0;
        let run = |hero: Hero| {
            let raster = Raster {
                map: &map,
                bank: &bank,
                hero,
                current: Flow::start(-0.15),
                clouds: Flow::start(0.35),
                xres: 8,
                yres: 8,
            };
            let mut canvas = vec![0u32; 8 * 8];
            let mut zbuff = vec![Vec2::ZERO; 8];
            raster.raster(0, &mut canvas, &mut zbuff);
            canvas
        };
        let bright: u32 = run(bright_hero).iter().map(|&c| c & 0xFF).sum();
        let dim: u32 = run(dim_hero).iter().map(|&c| c & 0xFF).sum();
        assert!(dim < bright);
    }
}
