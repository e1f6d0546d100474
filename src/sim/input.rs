//! Keyboard state folded into one per-tick command.
//!
//! W/A/S/D walk along the gaze, H/L turn, Up/Down tilt the view, Q/E slide
//! the eye height, Escape quits.

use minifb::{Key, Window};

use crate::world::{Hero, Map};

#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32,
    pub strafe: f32,
    pub turn: f32,
    pub look: f32,
    pub lift: f32,
    pub quit: bool,
}

pub fn read_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();
    if win.is_key_down(Key::W) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::S) {
        cmd.forward -= 1.0;
    }
    if win.is_key_down(Key::A) {
        cmd.strafe -= 1.0;
    }
    if win.is_key_down(Key::D) {
        cmd.strafe += 1.0;
    }
    if win.is_key_down(Key::H) {
        cmd.turn -= 1.0;
    }
    if win.is_key_down(Key::L) {
        cmd.turn += 1.0;
    }
    if win.is_key_down(Key::Up) {
        cmd.look += 1.0;
    }
    if win.is_key_down(Key::Down) {
        cmd.look -= 1.0;
    }
    if win.is_key_down(Key::E) {
        cmd.lift += 1.0;
    }
    if win.is_key_down(Key::Q) {
        cmd.lift -= 1.0;
    }
    cmd.quit = win.is_key_down(Key::Escape);
    cmd
}

/// Angular step per tick for turning.
const TURN: f32 = 0.08;
/// Vertical look and eye-height step per tick.
const TILT: f32 = 0.04;

/// Apply one tick of input to the hero, with the map vetoing blocked moves.
pub fn sustain(hero: &mut Hero, cmd: &InputCmd, map: &Map) {
    hero.turn(TURN * cmd.turn);
    hero.look(TILT * cmd.look);
    hero.lift(TILT * cmd.lift);
    hero.walk(cmd.forward, cmd.strafe, map);
}
