//! Software raycaster for grid worlds.
//!
//! A tile map plus a hero viewpoint becomes a perspective-correct frame:
//! rays march the grid to wall faces, columns are rasterized in parallel
//! into a sideways canvas, billboard sprites composite over the result
//! against a per-column depth buffer, and a diffusion field steers sprites
//! toward the hero between frames.

pub mod geom;
pub mod render;
pub mod sim;
pub mod world;
