use crate::*;
use ndarray::Array2;
pub use random::*;

mod random;

/// Decides where the mines go on a fresh board.
pub trait MinefieldGenerator {
    /// Returns a `rows x columns` mask with `config.mines` cells set, never including `origin`.
    fn place_mines(&mut self, config: GameConfig, origin: Coord2) -> Array2<bool>;
}

/// How much of the first revealed cell's surroundings is kept free of mines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StartTile {
    /// Only the origin itself is safe.
    #[default]
    SimpleSafe,
    /// The origin and its neighbors are safe, so the first reveal always opens an area.
    AlwaysZero,
}
