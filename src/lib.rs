pub use util::*;

pub mod util;

pub mod y2024 {
    pub mod d10;
    pub mod d16;
    pub mod d18;
    pub mod d20;
}
