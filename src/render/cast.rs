//! Grid ray march: from a point and an angle to the first opaque wall face.
//!
//! The ray is stepped from grid line to grid line, always taking the closer
//! of the two candidate crossings for its quadrant, so every landed point has
//! one exactly-integral coordinate. That exactness is what lets the face
//! predicates compare fractional parts against literal 0.0.

use glam::{Vec2, vec2};

use crate::geom::{cl, dec, fl};
use crate::world::{EMPTY, Map};

/// The wall face a ray entered, named for the direction it looks toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    North,
    East,
    South,
    West,
}

#[derive(Clone, Copy, Debug)]
pub struct Hit {
    /// Tile code of the struck wall.
    pub tile: u8,
    /// Horizontal texture coordinate along the face, in `[0, 1]`.
    pub offset: f32,
    /// Landing point, on a grid line.
    pub pos: Vec2,
    pub facing: Face,
}

#[inline]
fn opaque(map: &Map, y: i32, x: i32) -> bool {
    map.tile(y, x).opaque()
}

// The four face predicates. Testing for exact 0.0 is sound because the landed
// coordinate was produced by floor/ceil.
fn facing_north(p: Vec2, map: &Map) -> bool {
    let (y, x) = (fl(p.y), fl(p.x));
    dec(p.y) == 0.0 && opaque(map, y, x) && !opaque(map, y - 1, x)
}

fn facing_east(p: Vec2, map: &Map) -> bool {
    let (y, x) = (fl(p.y), fl(p.x));
    dec(p.x) == 0.0 && !opaque(map, y, x) && opaque(map, y, x - 1)
}

fn facing_south(p: Vec2, map: &Map) -> bool {
    let (y, x) = (fl(p.y), fl(p.x));
    dec(p.y) == 0.0 && !opaque(map, y, x) && opaque(map, y - 1, x)
}

fn facing_west(p: Vec2, map: &Map) -> bool {
    let (y, x) = (fl(p.y), fl(p.x));
    dec(p.x) == 0.0 && opaque(map, y, x) && !opaque(map, y, x - 1)
}

fn face(p: Vec2, map: &Map) -> Option<Face> {
    if facing_north(p, map) {
        Some(Face::North)
    } else if facing_east(p, map) {
        Some(Face::East)
    } else if facing_south(p, map) {
        Some(Face::South)
    } else if facing_west(p, map) {
        Some(Face::West)
    } else {
        None
    }
}

/// Did the march land inside an opaque cell without crossing a clean face
/// (a corner graze)?
fn collision(p: Vec2, map: &Map) -> bool {
    opaque(map, fl(p.y), fl(p.x))
}

fn step_east(cur: Vec2, m: f32, b: f32) -> Vec2 {
    let x = fl(cur.x + 1.0) as f32;
    vec2(x, m * x + b)
}

fn step_west(cur: Vec2, m: f32, b: f32) -> Vec2 {
    let x = cl(cur.x - 1.0) as f32;
    vec2(x, m * x + b)
}

fn step_south(cur: Vec2, m: f32, b: f32) -> Vec2 {
    let y = fl(cur.y + 1.0) as f32;
    vec2((y - b) / m, y)
}

fn step_north(cur: Vec2, m: f32, b: f32) -> Vec2 {
    let y = cl(cur.y - 1.0) as f32;
    vec2((y - b) / m, y)
}

fn closer(cur: Vec2, i: Vec2, j: Vec2) -> Vec2 {
    if (i - cur).length_squared() < (j - cur).length_squared() {
        i
    } else {
        j
    }
}

fn quadrant(radians: f32) -> u8 {
    let (s, c) = radians.sin_cos();
    match (c >= 0.0, s >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

fn make_hit(p: Vec2, map: &Map) -> Hit {
    let (y, x) = (fl(p.y), fl(p.x));
    match face(p, map) {
        Some(Face::North) => Hit {
            tile: map.walling(y, x),
            offset: dec(p.x),
            pos: p,
            facing: Face::North,
        },
        Some(Face::East) => Hit {
            tile: map.walling(y, x - 1),
            offset: 1.0 - dec(p.y),
            pos: p,
            facing: Face::East,
        },
        Some(Face::South) => Hit {
            tile: map.walling(y - 1, x),
            offset: 1.0 - dec(p.x),
            pos: p,
            facing: Face::South,
        },
        Some(Face::West) => Hit {
            tile: map.walling(y, x),
            offset: dec(p.y),
            pos: p,
            facing: Face::West,
        },
        // Corner graze: no clean face, but the cell itself is opaque.
        None => Hit {
            tile: map.walling(y, x),
            offset: dec(p.x),
            pos: p,
            facing: Face::North,
        },
    }
}

/// March a ray from `from` at `radians` to the first opaque cell boundary.
///
/// Termination is guaranteed by the closed map boundary; a step budget of
/// `rows + cols` guards malformed maps, reporting and returning a sentinel
/// hit at the origin instead of spinning.
pub fn cast(from: Vec2, radians: f32, map: &Map) -> Hit {
    let m = radians.tan();
    let b = from.y - m * from.x;
    let q = quadrant(radians);
    let mut cur = from;
    for _ in 0..map.rows + map.cols {
        cur = match q {
            0 => closer(cur, step_east(cur, m, b), step_south(cur, m, b)),
            1 => closer(cur, step_west(cur, m, b), step_south(cur, m, b)),
            2 => closer(cur, step_west(cur, m, b), step_north(cur, m, b)),
            _ => closer(cur, step_east(cur, m, b), step_north(cur, m, b)),
        };
        if !map.contains(cur) {
            break;
        }
        if collision(cur, map) || face(cur, map).is_some() {
            return make_hit(cur, map);
        }
    }
    log::warn!("ray from {from} at {radians} rad overran the map");
    Hit {
        tile: EMPTY,
        offset: 0.0,
        pos: from,
        facing: Face::North,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    /// A 9x9 chamber whose south-east quarter is walled off, leaving open
    /// ground in rows 1..7, columns 1..7 with wall faces at x = 7 and y = 7.
    fn room9() -> Map {
        let walls = "#########\n".repeat(9);
        let open: String = (0..9)
            .map(|y| {
                if y == 0 || y >= 7 {
                    "#########\n".to_string()
                } else {
                    "#      ##\n".to_string()
                }
            })
            .collect();
        let zone = format!("{walls}\n{open}\n{walls}");
        Map::parse(zone.trim_end()).expect("test zone is well formed")
    }

    #[test]
    fn straight_east_hits_the_west_face() {
        let map = room9();
        let hit = cast(vec2(1.5, 4.5), 0.0, &map);
        assert_eq!(hit.facing, Face::West);
        assert_eq!(hit.pos.x, 7.0);
        assert!((hit.offset - 0.5).abs() < 1e-6);
        assert!(((hit.pos - vec2(1.5, 4.5)).length() - 5.5).abs() < 1e-4);
    }

    #[test]
    fn diagonal_hits_whichever_face_comes_first() {
        let map = room9();
        let from = vec2(1.5, 4.5);
        let hit = cast(from, std::f32::consts::FRAC_PI_4, &map);
        // From (1.5, 4.5) heading down-right, the y = 7 face is closer.
        assert_eq!(hit.facing, Face::North);
        assert!((hit.pos.y - 7.0).abs() < 1e-5);
        let want = std::f32::consts::SQRT_2 * 2.5;
        assert!(((hit.pos - from).length() - want).abs() < 1e-4);
    }

    #[test]
    fn corner_pass_is_deterministic() {
        let map = room9();
        let from = vec2(1.5, 4.5);
        // Aimed exactly through the (7, 7) corner.
        let radians = (7.0f32 - 4.5).atan2(7.0 - 1.5);
        let a = cast(from, radians, &map);
        let b = cast(from, radians, &map);
        assert_eq!(a.facing, b.facing);
        assert_eq!(a.pos, b.pos);
        assert!((0.0..=1.0).contains(&a.offset));
    }

    #[test]
    fn axis_aligned_rays_terminate_on_each_wall() {
        let map = room9();
        let from = vec2(3.5, 3.5);
        for (radians, facing) in [
            (0.0, Face::West),
            (FRAC_PI_2, Face::North),
            (PI, Face::East),
            (3.0 * FRAC_PI_2, Face::South),
        ] {
            let hit = cast(from, radians, &map);
            assert_eq!(hit.facing, facing, "radians {radians}");
        }
    }

    #[test]
    fn every_angle_lands_on_a_grid_line_with_unit_offset() {
        let map = Map::demo();
        let from = map.spawn();
        let mut radians = 0.01;
        while radians < TAU {
            let hit = cast(from, radians, &map);
            let on_line = dec(hit.pos.x) == 0.0 || dec(hit.pos.y) == 0.0;
            assert!(on_line, "radians {radians}: {}", hit.pos);
            assert!((0.0..=1.0).contains(&hit.offset), "radians {radians}");
            assert_ne!(hit.tile, EMPTY, "radians {radians}");
            radians += 0.037;
        }
    }

    #[test]
    fn offsets_run_one_way_around_each_face() {
        let map = room9();
        // Two rays striking the x = 7 face above and below the mid row: the
        // west face offset grows with y.
        let low = cast(vec2(1.5, 3.25), 0.0, &map);
        let high = cast(vec2(1.5, 3.75), 0.0, &map);
        assert_eq!(low.facing, Face::West);
        assert!(low.offset < high.offset);
    }
}
