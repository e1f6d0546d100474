//! Status bars, drawn as flat quads over the finished frame: health, mana,
//! and fatigue stacked in the bottom-left corner.

use crate::render::Rgba;
use crate::render::frame::Frame;
use crate::world::Hero;

const CELL: i32 = 10;
const PAD: i32 = 2;

const WHT: Rgba = 0xFF_DF_EF_D7;
const BLK: Rgba = 0xFF_00_00_00;
const RED: Rgba = 0xFF_D3_45_49;
const YEL: Rgba = 0xFF_DB_D7_5D;
const BLU: Rgba = 0xFF_4A_6F_D3;

/// Bars flicker when their level falls below this fraction of the maximum.
const WARNING: f32 = 0.25;

fn fill(frame: &mut Frame, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(frame.xres as i32);
    let y1 = (y + h).min(frame.yres as i32);
    for row in y0..y1 {
        for col in x0..x1 {
            frame.buffer[row as usize * frame.xres + col as usize] = color;
        }
    }
}

/// One row of `max` cells, `level` of them filled. `position` counts up from
/// the bottom edge.
fn bar(frame: &mut Frame, level: f32, max: i32, position: i32, color: Rgba, ticks: u32) {
    let y = frame.yres as i32 - (CELL + PAD) * (1 + position);
    let low = level < WARNING * max as f32;
    for i in 0..max {
        let x = PAD + (CELL + PAD) * i;
        fill(frame, x, y, CELL, CELL, BLK);
        let filled = level > i as f32;
        // A partial cell shrinks with the fraction left in it.
        let width = if level >= (i + 1) as f32 {
            CELL - 2
        } else {
            ((CELL - 2) as f32 * (level - i as f32)).max(0.0) as i32
        };
        if filled && width > 0 && !(low && ticks % 2 == 0) {
            fill(frame, x + 1, y + 1, width, CELL - 2, color);
        }
        // Glass outline.
        fill(frame, x, y, CELL, 1, WHT);
        fill(frame, x, y + CELL - 1, CELL, 1, WHT);
        fill(frame, x, y, 1, CELL, WHT);
        fill(frame, x + CELL - 1, y, 1, CELL, WHT);
    }
}

pub fn draw(frame: &mut Frame, hero: &Hero, ticks: u32) {
    bar(frame, hero.hps, hero.hpsmax, 2, RED, ticks);
    bar(frame, hero.mna, hero.mnamax, 1, BLU, ticks);
    bar(frame, hero.ftg, hero.ftgmax, 0, YEL, ticks);
}
