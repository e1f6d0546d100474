//! Billboard sprites and their container.
//!
//! Sprites live in world space. For compositing they are flipped into
//! hero-camera space (`orient`), drawn, and flipped back (`unorient`) so the
//! game state never sees camera coordinates.

use glam::Vec2;

use crate::geom::rotate;
use crate::world::{Hero, Map, texture::STATES};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Idle,
    Chasing,
    Lifted,
    Hurt,
    Dead,
}

impl State {
    /// Sheet row for this state.
    pub fn row(self) -> usize {
        let row = match self {
            State::Idle => 0,
            State::Chasing => 1,
            State::Lifted => 2,
            State::Hurt => 3,
            State::Dead => 4,
        };
        debug_assert!(row < STATES);
        row
    }

    /// States that neither animate nor steer.
    pub fn inert(self) -> bool {
        matches!(self, State::Lifted | State::Hurt | State::Dead)
    }
}

/// Screen-space rectangle, half-open in neither axis; `w <= 0` means empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct Sprite {
    /// Tile code selecting the sprite sheet.
    pub ascii: u8,
    pub pos: Vec2,
    pub state: State,
    /// Additive-blended ghosts and the like.
    pub transparent: bool,
    pub speed: f32,
    /// Last visible clip on screen, kept for targeting.
    pub seen: Rect,
}

impl Sprite {
    pub fn new(ascii: u8, pos: Vec2) -> Self {
        Self {
            ascii,
            pos,
            state: State::Idle,
            transparent: false,
            speed: 0.04,
            seen: Rect::default(),
        }
    }
}

#[derive(Default)]
pub struct Sprites {
    pub sprite: Vec<Sprite>,
}

impl Sprites {
    pub fn new() -> Self {
        Self::default()
    }

    /// A few soldiers scattered over passable ground, one of them a ghost.
    pub fn demo(map: &Map) -> Self {
        let spawn = map.spawn();
        let mut sprite = Vec::new();
        for y in 0..map.rows as i32 {
            for x in 0..map.cols as i32 {
                if sprite.len() == 3 {
                    break;
                }
                let pos = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let far = (pos - spawn).length() >= 3.0;
                if far && map.tile(y, x).passable() {
                    sprite.push(Sprite::new(b'a', pos));
                }
            }
        }
        if let Some(ghost) = sprite.last_mut() {
            ghost.transparent = true;
        }
        Self { sprite }
    }

    /// Flip every sprite into hero-camera space (x = forward, y = lateral)
    /// and order them back-to-front for the painter's pass.
    pub fn orient(&mut self, hero: &Hero) {
        for s in &mut self.sprite {
            s.pos = rotate(s.pos - hero.pos, -hero.theta);
        }
        self.sprite
            .sort_by(|a, b| b.pos.x.total_cmp(&a.pos.x));
    }

    /// Undo [`Sprites::orient`]. The sort order is left as-is.
    pub fn unorient(&mut self, hero: &Hero) {
        for s in &mut self.sprite {
            s.pos = rotate(s.pos, hero.theta) + hero.pos;
        }
    }
}
