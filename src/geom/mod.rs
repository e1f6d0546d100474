//! Small 2-D helpers shared by the caster and the renderers.

use glam::Vec2;

/// Truncation-based floor. The compare-and-subtract correction only fires for
/// negative non-integral inputs, which keeps this a couple of instructions.
#[inline(always)]
pub fn fl(a: f32) -> i32 {
    a as i32 - (a < a as i32 as f32) as i32
}

/// Truncation-based ceil, mirror of [`fl`].
#[inline(always)]
pub fn cl(a: f32) -> i32 {
    a as i32 + (a > a as i32 as f32) as i32
}

/// Fractional part measured from the truncated integer. The caster compares
/// this against exact 0.0 on grid lines.
#[inline(always)]
pub fn dec(a: f32) -> f32 {
    a - a as i32 as f32
}

/// Floor-based fraction, always in `[0, 1)`. For texture lookups whose input
/// may have drifted negative (flow-shifted coordinates).
#[inline(always)]
pub fn frac(a: f32) -> f32 {
    a - fl(a) as f32
}

/// Rotate `v` by `theta` radians about the origin.
#[inline]
pub fn rotate(v: Vec2, theta: f32) -> Vec2 {
    Vec2::from_angle(theta).rotate(v)
}

/// Grid cell containing `p`, as `(row, col)`.
#[inline]
pub fn cell(p: Vec2) -> (i32, i32) {
    (fl(p.y), fl(p.x))
}

/// A pair of world points. The hero's focal plane is one of these.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub a: Vec2,
    pub b: Vec2,
}

impl Line {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Rotate both endpoints about the origin.
    pub fn rotate(self, theta: f32) -> Self {
        Self {
            a: rotate(self.a, theta),
            b: rotate(self.b, theta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn floor_ceil_match_libm_on_both_signs() {
        for &x in &[-2.5f32, -2.0, -0.1, 0.0, 0.1, 2.0, 2.5] {
            assert_eq!(fl(x), x.floor() as i32, "fl({x})");
            assert_eq!(cl(x), x.ceil() as i32, "cl({x})");
        }
    }

    #[test]
    fn frac_is_always_positive() {
        assert!((frac(-1.25) - 0.75).abs() < 1e-6);
        assert!((frac(3.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn quarter_turn() {
        let v = rotate(vec2(1.0, 0.0), FRAC_PI_2);
        assert!((v - vec2(0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn line_rotation_moves_both_ends() {
        let l = Line::new(vec2(1.0, -1.0), vec2(1.0, 1.0)).rotate(FRAC_PI_2);
        assert!((l.a - vec2(1.0, 1.0)).length() < 1e-6);
        assert!((l.b - vec2(-1.0, 1.0)).length() < 1e-6);
    }
}
