//! Per-tick sprite upkeep: refresh the diffusion field from the hero and
//! walk every live sprite along its gradient.

use glam::Vec2;

use crate::world::{Field, Hero, Map, Sprites, State};

pub fn caretake(sprites: &mut Sprites, hero: &Hero, map: &Map, field: &mut Field) {
    field.reset(map);
    field.diffuse(hero.pos);
    for sprite in &mut sprites.sprite {
        if sprite.state.inert() {
            continue;
        }
        let step = field.force(sprite.pos, hero.pos, map);
        if step == Vec2::ZERO {
            sprite.state = State::Idle;
            continue;
        }
        sprite.state = State::Chasing;
        let next = sprite.pos + step * sprite.speed;
        if map.passable(next) {
            sprite.pos = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Sprite;
    use glam::vec2;

    #[test]
    fn sprites_close_in_on_the_hero() {
        let map = Map::demo();
        let hero = Hero::spawn(vec2(2.5, 2.5));
        let mut field = Field::new(&map, hero.aura);
        let mut sprites = Sprites::new();
        sprites.sprite.push(Sprite::new(b'a', vec2(6.5, 6.5)));
        let start = (sprites.sprite[0].pos - hero.pos).length();
        for _ in 0..200 {
            caretake(&mut sprites, &hero, &map, &mut field);
        }
        let end = (sprites.sprite[0].pos - hero.pos).length();
        assert!(end < start);
        assert!(map.passable(sprites.sprite[0].pos));
    }

    #[test]
    fn chasing_state_follows_the_force() {
        let map = Map::demo();
        let hero = Hero::spawn(vec2(2.5, 2.5));
        let mut field = Field::new(&map, hero.aura);
        let mut sprites = Sprites::new();
        sprites.sprite.push(Sprite::new(b'a', vec2(6.5, 2.5)));
        caretake(&mut sprites, &hero, &map, &mut field);
        assert_eq!(sprites.sprite[0].state, State::Chasing);
    }

    #[test]
    fn dead_sprites_stay_put() {
        let map = Map::demo();
        let hero = Hero::spawn(vec2(2.5, 2.5));
        let mut field = Field::new(&map, hero.aura);
        let mut sprites = Sprites::new();
        let mut corpse = Sprite::new(b'a', vec2(6.5, 6.5));
        corpse.state = State::Dead;
        sprites.sprite.push(corpse);
        for _ in 0..50 {
            caretake(&mut sprites, &hero, &map, &mut field);
        }
        assert_eq!(sprites.sprite[0].pos, vec2(6.5, 6.5));
        assert_eq!(sprites.sprite[0].state, State::Dead);
    }
}
