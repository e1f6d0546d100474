//! Repository of tile textures and sprite sheets, indexed by tile code.
//!
//! The renderer asks for pixels through this bank only; where art comes from
//! (files, a generator) is the caller's business. Unknown codes resolve to a
//! checkerboard so a half-loaded bank still draws something visible.

use thiserror::Error;

/// Animation frames per sprite sheet row.
pub const FRAMES: usize = 2;
/// Sprite states, one sheet row each.
pub const STATES: usize = 5;

/// CPU-side storage: 32-bit ARGB (0xAARRGGBB) in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u32>,
}

impl Texture {
    pub fn filled(w: usize, h: usize, color: u32) -> Self {
        Self {
            w,
            h,
            pixels: vec![color; w * h],
        }
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u32 {
        self.pixels[y.min(self.h - 1) * self.w + x.min(self.w - 1)]
    }

    /// Sample with normalized coordinates in `[0, 1)`.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let x = (u * self.w as f32) as usize;
        let y = (v * self.h as f32) as usize;
        self.at(x, y)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("code {0:?} already present in bank")]
    Duplicate(char),

    #[error("code {0:?} is outside the tile code range")]
    BadCode(char),

    #[error("sheet for {0:?} does not divide into a {FRAMES}x{STATES} frame grid")]
    BadSheet(char),
}

/// Tile and sprite art keyed by tile code (`code - b' '`).
///
/// Sheets lay out `FRAMES` animation frames horizontally and `STATES` rows
/// vertically, one row per sprite state.
pub struct TextureBank {
    tiles: Vec<Option<Texture>>,
    sheets: Vec<Option<Texture>>,
    fallback: Texture,
    /// Tile code drawn for open-sky ceiling cells.
    pub clouds: u8,
}

const CODES: usize = (b'~' - b' ') as usize + 1;

impl TextureBank {
    /// An empty bank whose every query resolves to the checkerboard.
    pub fn new() -> Self {
        let mut pixels = vec![0u32; 16 * 16];
        for y in 0..16 {
            for x in 0..16 {
                pixels[y * 16 + x] = if (x ^ y) & 1 == 0 {
                    0xFF_90_90_90
                } else {
                    0xFF_30_30_30
                };
            }
        }
        Self {
            tiles: (0..CODES).map(|_| None).collect(),
            sheets: (0..CODES).map(|_| None).collect(),
            fallback: Texture {
                w: 16,
                h: 16,
                pixels,
            },
            clouds: b'*',
        }
    }

    fn slot(code: u8) -> Option<usize> {
        (code >= b' ')
            .then(|| (code - b' ') as usize)
            .filter(|&i| i < CODES)
    }

    pub fn insert_tile(&mut self, code: u8, tex: Texture) -> Result<(), TextureError> {
        let slot = Self::slot(code).ok_or(TextureError::BadCode(code as char))?;
        if self.tiles[slot].is_some() {
            return Err(TextureError::Duplicate(code as char));
        }
        self.tiles[slot] = Some(tex);
        Ok(())
    }

    pub fn insert_sheet(&mut self, code: u8, tex: Texture) -> Result<(), TextureError> {
        let slot = Self::slot(code).ok_or(TextureError::BadCode(code as char))?;
        if tex.w % FRAMES != 0 || tex.h % STATES != 0 {
            return Err(TextureError::BadSheet(code as char));
        }
        if self.sheets[slot].is_some() {
            return Err(TextureError::Duplicate(code as char));
        }
        self.sheets[slot] = Some(tex);
        Ok(())
    }

    /// Tile texture for `code`, or the checkerboard.
    pub fn tile(&self, code: u8) -> &Texture {
        Self::slot(code)
            .and_then(|s| self.tiles[s].as_ref())
            .unwrap_or(&self.fallback)
    }

    /// Sprite sheet for `code`, or the checkerboard.
    pub fn sheet(&self, code: u8) -> &Texture {
        Self::slot(code)
            .and_then(|s| self.sheets[s].as_ref())
            .unwrap_or(&self.fallback)
    }

    /// A bank of generated art, enough to run without asset files: stone and
    /// wood walls, slate floor, water, clouds, and one soldier sheet.
    pub fn with_defaults() -> Self {
        let mut bank = Self::new();
        let inserts = [
            (b'#', gen_stone()),
            (b'1', gen_slate()),
            (b'2', gen_wood()),
            (b'~', gen_water()),
            (b'*', gen_clouds()),
        ];
        for (code, tex) in inserts {
            // new() guarantees empty slots for every code fed here
            let _ = bank.insert_tile(code, tex);
        }
        let _ = bank.insert_sheet(b'a', gen_soldier());
        bank
    }
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::new()
    }
}

/*──────────────────────── generated art ─────────────────────────────*/

const SIDE: usize = 64;

fn argb(r: u32, g: u32, b: u32) -> u32 {
    0xFF_00_00_00 | (r.min(255) << 16) | (g.min(255) << 8) | b.min(255)
}

fn gen_tex(mut f: impl FnMut(usize, usize) -> u32) -> Texture {
    let mut pixels = vec![0u32; SIDE * SIDE];
    for y in 0..SIDE {
        for x in 0..SIDE {
            pixels[y * SIDE + x] = f(x, y);
        }
    }
    Texture {
        w: SIDE,
        h: SIDE,
        pixels,
    }
}

fn gen_stone() -> Texture {
    gen_tex(|x, y| {
        let course = y / 16;
        let mortar = y % 16 == 0 || (x + if course % 2 == 0 { 0 } else { 8 }) % 16 == 0;
        if mortar {
            argb(70, 70, 74)
        } else {
            let n = ((x * 31 + y * 17) % 13) as u32;
            argb(120 + n, 120 + n, 126 + n)
        }
    })
}

fn gen_slate() -> Texture {
    gen_tex(|x, y| {
        if x % 32 == 0 || y % 32 == 0 {
            argb(52, 56, 60)
        } else {
            let n = ((x * 7 + y * 13) % 9) as u32;
            argb(88 + n, 92 + n, 96 + n)
        }
    })
}

fn gen_wood() -> Texture {
    gen_tex(|x, y| {
        let grain = ((y * 5 + x * 2) % 11) as u32;
        if x % 16 == 0 {
            argb(60, 40, 24)
        } else if (x / 16) % 2 == 0 {
            argb(134 + grain, 90 + grain, 48)
        } else {
            argb(112 + grain, 74 + grain, 38)
        }
    })
}

fn gen_water() -> Texture {
    gen_tex(|x, y| {
        let wave = ((x as f32 * 0.3).sin() + (y as f32 * 0.25).cos()) * 14.0;
        argb(20, 60 + wave.abs() as u32, (170.0 + wave) as u32)
    })
}

fn gen_clouds() -> Texture {
    gen_tex(|x, y| {
        let puff = ((x as f32 * 0.2).sin() * (y as f32 * 0.17).sin()).max(0.0);
        let w = (120.0 + puff * 120.0) as u32;
        argb(w, w, (w + 60).min(235))
    })
}

fn gen_soldier() -> Texture {
    let (cw, ch) = (32, 32);
    let w = cw * FRAMES;
    let h = ch * STATES;
    let mut pixels = vec![0u32; w * h];
    // One tinted figure per state row; the second frame bobs a pixel.
    let tints: [(u32, u32, u32); STATES] = [
        (90, 140, 90),
        (150, 90, 90),
        (90, 90, 150),
        (180, 140, 60),
        (80, 80, 80),
    ];
    for (state, &(r, g, b)) in tints.iter().enumerate() {
        for frame in 0..FRAMES {
            let bob = (frame % 2) as i32;
            for y in 0..ch {
                for x in 0..cw {
                    let dx = x as i32 - cw as i32 / 2;
                    let dy = y as i32 - (ch as i32 / 2 + bob);
                    if dx * dx + 2 * dy * dy < 160 {
                        let px = frame * cw + x;
                        let py = state * ch + y;
                        pixels[py * w + px] = argb(r, g, b);
                    }
                }
            }
        }
    }
    Texture { w, h, pixels }
}
