mod field;
mod flow;
mod hero;
mod map;
mod portals;
mod sprite;
mod texture;

pub use field::Field;
pub use flow::Flow;
pub use hero::Hero;
pub use map::{DOOR, EMPTY, Map, MapError, Tile, WATER};
pub use portals::{Portal, PortalError, Portals};
pub use sprite::{Rect, Sprite, Sprites, State};
pub use texture::{FRAMES, STATES, Texture, TextureBank, TextureError};
