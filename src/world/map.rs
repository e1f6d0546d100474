//! Zone maps: three equally shaped byte grids (ceiling, walling, flooring).
//!
//! A zone file is three text blocks separated by one blank line, in the order
//! ceiling / walling / flooring. `' '` is empty; any other byte is a tile
//! whose code picks its texture. The walling boundary must be fully closed;
//! the ray caster's termination argument leans on it.

use glam::Vec2;
use std::path::Path;
use thiserror::Error;

use crate::geom::cell;

/// Empty / passable tile code.
pub const EMPTY: u8 = b' ';
/// Door tile code. Passable, and rays pass through (an open frame).
pub const DOOR: u8 = b'!';
/// Water tile code. Walkable liquid; the renderer animates it with a flow.
pub const WATER: u8 = b'~';

/// One map cell, decoded from its byte code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Door,
    Liquid(u8),
    Wall(u8),
}

impl Tile {
    pub fn of(code: u8) -> Self {
        match code {
            EMPTY => Tile::Empty,
            DOOR => Tile::Door,
            WATER => Tile::Liquid(WATER),
            c => Tile::Wall(c),
        }
    }

    /// Opaque to rays.
    pub fn opaque(self) -> bool {
        matches!(self, Tile::Wall(_))
    }

    /// Passable for the hero and sprites.
    pub fn passable(self) -> bool {
        match self {
            Tile::Empty | Tile::Door | Tile::Liquid(_) => true,
            Tile::Wall(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("zone wants exactly three grids (ceiling, walling, flooring), got {0}")]
    GridCount(usize),

    #[error("grid {grid} row {row} is {got} columns wide, want {want}")]
    Ragged {
        grid: usize,
        row: usize,
        got: usize,
        want: usize,
    },

    #[error("grids differ in shape")]
    Shape,

    #[error("map is too small ({rows}x{cols})")]
    TooSmall { rows: usize, cols: usize },

    #[error("walling boundary is open at row {y}, column {x}")]
    Open { y: usize, x: usize },
}

pub struct Map {
    pub rows: usize,
    pub cols: usize,
    ceiling: Vec<u8>,
    walling: Vec<u8>,
    flooring: Vec<u8>,
}

/// The built-in 9x9 zone: a walled room with a pillar, a water moat on the
/// flooring, and an open-sky patch in the ceiling.
const DEMO: &str = "\
#########
#########
##   ####
##   ####
#########
#########
#########
#########
#########

#########
##     ##
#       #
#       #
#   #   #
#       #
#       #
##     ##
#########

#########
#1111111#
#1~~~~~1#
#1~222~1#
#1~2#2~1#
#1~222~1#
#1~~~~~1#
#1111111#
#########";

impl Map {
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut grids: Vec<Vec<&str>> = Vec::new();
        let mut block: Vec<&str> = Vec::new();
        for line in text.lines() {
            if line.is_empty() {
                if !block.is_empty() {
                    grids.push(std::mem::take(&mut block));
                }
            } else {
                block.push(line);
            }
        }
        if !block.is_empty() {
            grids.push(block);
        }
        if grids.len() != 3 {
            return Err(MapError::GridCount(grids.len()));
        }

        let rows = grids[0].len();
        let cols = grids[0].first().map_or(0, |r| r.len());
        if rows < 3 || cols < 3 {
            return Err(MapError::TooSmall { rows, cols });
        }
        for (g, grid) in grids.iter().enumerate() {
            if grid.len() != rows {
                return Err(MapError::Shape);
            }
            for (row, line) in grid.iter().enumerate() {
                if line.len() != cols {
                    return Err(MapError::Ragged {
                        grid: g,
                        row,
                        got: line.len(),
                        want: cols,
                    });
                }
            }
        }

        let flatten = |grid: &[&str]| -> Vec<u8> {
            grid.iter().flat_map(|line| line.bytes()).collect()
        };
        let map = Self {
            rows,
            cols,
            ceiling: flatten(&grids[0]),
            walling: flatten(&grids[1]),
            flooring: flatten(&grids[2]),
        };

        for y in 0..rows {
            for x in 0..cols {
                let edge = y == 0 || x == 0 || y == rows - 1 || x == cols - 1;
                if edge && !Tile::of(map.walling[y * cols + x]).opaque() {
                    return Err(MapError::Open { y, x });
                }
            }
        }
        Ok(map)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    pub fn demo() -> Self {
        Self::parse(DEMO).expect("embedded demo zone is well formed")
    }

    /// Centre of the first passable walling cell, row-major scan.
    pub fn spawn(&self) -> Vec2 {
        for y in 0..self.rows {
            for x in 0..self.cols {
                if Tile::of(self.walling[y * self.cols + x]).passable() {
                    return Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                }
            }
        }
        Vec2::new(1.5, 1.5)
    }

    /// Walling code at `(row, col)`. Out of bounds reads as solid stone so a
    /// malformed map still terminates the caster.
    pub fn walling(&self, y: i32, x: i32) -> u8 {
        self.grid(&self.walling, y, x).unwrap_or(b'#')
    }

    pub fn flooring(&self, y: i32, x: i32) -> u8 {
        self.grid(&self.flooring, y, x).unwrap_or(EMPTY)
    }

    pub fn ceiling(&self, y: i32, x: i32) -> u8 {
        self.grid(&self.ceiling, y, x).unwrap_or(EMPTY)
    }

    fn grid(&self, grid: &[u8], y: i32, x: i32) -> Option<u8> {
        if y < 0 || x < 0 || y >= self.rows as i32 || x >= self.cols as i32 {
            None
        } else {
            Some(grid[y as usize * self.cols + x as usize])
        }
    }

    pub fn tile(&self, y: i32, x: i32) -> Tile {
        Tile::of(self.walling(y, x))
    }

    /// True while `p` is somewhere inside the grid rectangle.
    pub fn contains(&self, p: Vec2) -> bool {
        let (y, x) = cell(p);
        y >= 0 && x >= 0 && y < self.rows as i32 && x < self.cols as i32
    }

    /// Whether the hero or a sprite may stand at `p`.
    pub fn passable(&self, p: Vec2) -> bool {
        let (y, x) = cell(p);
        self.tile(y, x).passable()
    }
}
