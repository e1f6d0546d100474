mod caretake;
mod input;

pub use caretake::caretake;
pub use input::{InputCmd, read_input, sustain};
