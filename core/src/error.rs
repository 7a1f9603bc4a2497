use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Operation not allowed in the current game state")]
    InvalidState,
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Cell is already revealed")]
    CellAlreadyRevealed,
    #[error("Cell is flagged, unflag it before revealing")]
    CellFlagged,
    #[error("Minefield was already generated")]
    AlreadyGenerated,
    #[error("Minefield has not been generated yet")]
    NotGenerated,
    #[error("Invalid board settings")]
    InvalidConfig,
    #[error("Too many mines")]
    TooManyMines,
}

pub type Result<T> = core::result::Result<T, GameError>;
