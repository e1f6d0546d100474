//! Sprite compositor: billboards projected over the finished wall render,
//! clipped column by column against the depth buffer.
//!
//! Runs after the worker join, on sprites already flipped into camera space
//! (x forward, y lateral) and ordered far-to-near.

use glam::Vec2;

use crate::render::frame::Frame;
use crate::render::{blend_add, illuminate, shade};
use crate::world::{FRAMES, Hero, Rect, STATES, Sprites, State, TextureBank};

/// Shrink `target` to the columns where the sprite stands in front of the
/// walls. Consumes off-screen columns too, so a rect straddling the screen
/// edge clips correctly.
fn clip(target: Rect, pos: Vec2, zbuff: &[Vec2]) -> Rect {
    let xres = zbuff.len() as i32;
    let mut seen = target;

    // Left edge.
    while seen.w > 0 {
        let x = seen.x;
        if (0..xres).contains(&x) && pos.x < zbuff[x as usize].x {
            break;
        }
        seen.w -= 1;
        seen.x += 1;
    }

    // Right edge; the found column is visible, keep it inside the rect.
    while seen.w > 0 {
        let x = seen.x + seen.w;
        if (0..xres).contains(&x) && pos.x < zbuff[x as usize].x {
            seen.w += 1;
            break;
        }
        seen.w -= 1;
    }

    // The probe above runs one past the right edge.
    if seen.x + seen.w > target.x + target.w {
        seen.w = target.x + target.w - seen.x;
    }
    seen
}

pub fn paste(frame: &mut Frame, sprites: &mut Sprites, hero: &Hero, bank: &TextureBank, ticks: u32) {
    let xres = frame.xres as i32;
    let yres = frame.yres as i32;
    let focal = hero.focal();

    for sprite in &mut sprites.sprite {
        sprite.seen = Rect::default();

        // Behind the hero.
        if sprite.pos.x <= 0.0 {
            continue;
        }

        // Rounding the size up to even keeps the billboard from jittering
        // between frames as the centre moves.
        let size = ((focal * frame.xres as f32 / 2.0) / sprite.pos.x) as i32;
        let osize = size + size % 2;
        if osize <= 0 {
            continue;
        }

        // Screen placement accounts for hero yaw and height; lifted sprites
        // hang centred in view instead.
        let lifted = sprite.state == State::Lifted;
        let my = (yres as f32 / 2.0 * if lifted { 1.0 } else { 2.0 - hero.yaw }) as i32;
        let slip = (focal * (xres as f32 / 2.0) * (sprite.pos.y / sprite.pos.x)) as i32;
        let t = (my as f32 - osize as f32 * if lifted { 0.5 } else { 1.0 - hero.height }) as i32;
        let target = Rect {
            x: xres / 2 - osize / 2 + slip,
            y: t,
            w: osize,
            h: osize,
        };

        // Entirely off screen.
        if target.x + target.w < 0 || target.x >= xres {
            continue;
        }

        let seen = clip(target, sprite.pos, &frame.zbuff);
        sprite.seen = seen;
        if seen.w <= 0 {
            continue;
        }

        let sheet = bank.sheet(sprite.ascii);
        let fw = sheet.w / FRAMES;
        let fh = sheet.h / STATES;
        let iu = fw * (ticks as usize % FRAMES);
        let iv = fh * sprite.state.row();
        let light = illuminate(hero.torch, sprite.pos.x);

        for sx in seen.x..seen.x + seen.w {
            if !(0..xres).contains(&sx) {
                continue;
            }
            let u = ((sx - target.x) as usize * fw / target.w as usize).min(fw - 1);
            for sy in target.y.max(0)..(target.y + target.h).min(yres) {
                let v = ((sy - target.y) as usize * fh / target.h as usize).min(fh - 1);
                let texel = sheet.at(iu + u, iv + v);
                // Zero alpha is the sheet's transparent key.
                if texel >> 24 == 0 {
                    continue;
                }
                let lit = shade(texel, light);
                let idx = sy as usize * frame.xres + sx as usize;
                frame.buffer[idx] = if sprite.transparent {
                    blend_add(frame.buffer[idx], lit)
                } else {
                    lit
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Flow, Map, Sprite, TextureBank};
    use glam::vec2;

    /// A corridor with a full-height wall two tiles ahead of the hero.
    fn blocked_world() -> (Map, Hero) {
        let ceil = "#########\n".repeat(9);
        let wall: String = (0..9)
            .map(|y| {
                if y == 0 || y == 8 {
                    "#########\n".to_string()
                } else {
                    "#   #   #\n".to_string()
                }
            })
            .collect();
        let floor: String = (0..9)
            .map(|y| {
                if y == 0 || y == 8 {
                    "#########\n".to_string()
                } else {
                    "#1111111#\n".to_string()
                }
            })
            .collect();
        let zone = format!("{ceil}\n{wall}\n{floor}");
        let map = Map::parse(zone.trim_end()).expect("test zone is well formed");
        let mut hero = Hero::spawn(vec2(1.5, 4.5));
        hero.theta = 0.0;
        (map, hero)
    }

    fn render(map: &Map, hero: &Hero, sprites: &mut Sprites) -> Frame {
        let bank = TextureBank::with_defaults();
        let mut frame = Frame::new(64, 36, 1);
        frame.render(
            hero,
            sprites,
            map,
            &bank,
            &Flow::start(-0.15),
            &Flow::start(0.35),
            0,
        );
        frame
    }

    #[test]
    fn sprite_behind_a_wall_is_fully_clipped() {
        let (map, hero) = blocked_world();
        let mut sprites = Sprites::new();
        // Beyond the wall slab at x = 4, dead ahead.
        sprites.sprite.push(Sprite::new(b'a', vec2(5.5, 4.5)));
        render(&map, &hero, &mut sprites);
        assert!(sprites.sprite[0].seen.w <= 0);
    }

    #[test]
    fn sprite_in_the_open_is_seen() {
        let (map, hero) = blocked_world();
        let mut sprites = Sprites::new();
        sprites.sprite.push(Sprite::new(b'a', vec2(3.0, 4.5)));
        let frame = render(&map, &hero, &mut sprites);
        assert!(sprites.sprite[0].seen.w > 0);
        // And it left pixels behind: the soldier tint shows mid-screen.
        let row = frame.yres / 2;
        let slice = &frame.buffer[row * frame.xres..(row + 1) * frame.xres];
        assert!(slice.iter().any(|&px| (px >> 8 & 0xFF) > (px & 0xFF)));
    }

    #[test]
    fn sprite_behind_the_hero_is_skipped() {
        let (map, hero) = blocked_world();
        let mut sprites = Sprites::new();
        sprites.sprite.push(Sprite::new(b'a', vec2(0.5, 4.5)));
        render(&map, &hero, &mut sprites);
        assert_eq!(sprites.sprite[0].seen, Rect::default());
    }

    #[test]
    fn clip_consumes_offscreen_columns() {
        let zbuff = vec![vec2(10.0, 0.0); 16];
        let target = Rect {
            x: -4,
            y: 0,
            w: 8,
            h: 8,
        };
        let seen = clip(target, vec2(2.0, 0.0), &zbuff);
        assert_eq!(seen.x, 0);
        assert_eq!(seen.w, 4);
    }

    #[test]
    fn clip_empties_when_walls_win() {
        let zbuff = vec![vec2(1.0, 0.0); 16];
        let target = Rect {
            x: 2,
            y: 0,
            w: 8,
            h: 8,
        };
        let seen = clip(target, vec2(5.0, 0.0), &zbuff);
        assert!(seen.w <= 0);
    }
}
