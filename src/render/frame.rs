//! Frame driver: fans the column renderer out over worker threads, stands
//! the sideways canvas upright, then composites sprites over it.

use glam::Vec2;
use std::thread;

use crate::render::Rgba;
use crate::render::column::Raster;
use crate::render::sprites::paste;
use crate::world::{Flow, Hero, Map, Sprites, TextureBank};

pub struct Frame {
    pub xres: usize,
    pub yres: usize,
    pub threads: usize,
    /// Sideways canvas: one contiguous `yres` run per screen column, row 0
    /// at the screen bottom.
    canvas: Vec<Rgba>,
    /// Upright, presentable pixels, row-major from the top-left.
    pub buffer: Vec<Rgba>,
    /// Camera-space hit per column; `zbuff[x].x` is the perpendicular wall
    /// distance sprites clip against.
    pub zbuff: Vec<Vec2>,
}

impl Frame {
    pub fn new(xres: usize, yres: usize, threads: usize) -> Self {
        Self {
            xres,
            yres,
            threads: threads.max(1),
            canvas: vec![0; xres * yres],
            buffer: vec![0; xres * yres],
            zbuff: vec![Vec2::ZERO; xres],
        }
    }

    /// Render one complete frame. The depth buffer is fully written before
    /// sprite compositing reads it: the scope join is the barrier.
    pub fn render(
        &mut self,
        hero: &Hero,
        sprites: &mut Sprites,
        map: &Map,
        bank: &TextureBank,
        current: &Flow,
        clouds: &Flow,
        ticks: u32,
    ) {
        let raster = Raster {
            map,
            bank,
            hero: *hero,
            current: *current,
            clouds: *clouds,
            xres: self.xres,
            yres: self.yres,
        };

        // Fixed partition: worker i owns columns i*xres/T .. (i+1)*xres/T,
        // a disjoint slab of the canvas and slice of the depth buffer.
        thread::scope(|scope| {
            let mut canvas = self.canvas.as_mut_slice();
            let mut zbuff = self.zbuff.as_mut_slice();
            let mut x0 = 0;
            for i in 0..self.threads {
                let x1 = (i + 1) * self.xres / self.threads;
                let (slab, rest) = canvas.split_at_mut((x1 - x0) * self.yres);
                let (depth, zrest) = zbuff.split_at_mut(x1 - x0);
                canvas = rest;
                zbuff = zrest;
                let raster = &raster;
                scope.spawn(move || raster.raster(x0, slab, depth));
                x0 = x1;
            }
        });

        self.churn();

        // Sprites are flipped into camera space for the paste and flipped
        // back so world state survives the frame.
        sprites.orient(hero);
        paste(self, sprites, hero, bank, ticks);
        sprites.unorient(hero);
    }

    /// Stand the sideways canvas upright into the presentable buffer. This
    /// is the one place the 90-degree rotation is paid.
    fn churn(&mut self) {
        for x in 0..self.xres {
            let column = &self.canvas[x * self.yres..][..self.yres];
            for (y, &px) in column.iter().enumerate() {
                self.buffer[(self.yres - 1 - y) * self.xres + x] = px;
            }
        }
    }
}
