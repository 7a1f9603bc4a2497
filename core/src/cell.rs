use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2};

/// One square of the board.
///
/// `adjacent_mines` is only meaningful once the board has been generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub adjacent_mines: u8,
}

impl Cell {
    pub const fn is_hidden(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    /// What the player is allowed to see of this cell.
    pub const fn view(self) -> CellView {
        match (self.is_revealed, self.is_flagged, self.is_mine) {
            (true, _, true) => CellView::Mine,
            (true, _, false) => CellView::Open(self.adjacent_mines),
            (false, true, _) => CellView::Flagged,
            (false, false, _) => CellView::Hidden,
        }
    }
}

/// Player-visible state of a cell, as handed to the presentation layer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Open(u8),
    Mine,
}

/// A cell that changed from hidden to revealed during one operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedCell {
    pub row: Coord,
    pub column: Coord,
    pub content: RevealedContent,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealedContent {
    Count(u8),
    Mine,
}

impl RevealedCell {
    pub fn from_cell(coords: Coord2, cell: Cell) -> Self {
        let content = if cell.is_mine {
            RevealedContent::Mine
        } else {
            RevealedContent::Count(cell.adjacent_mines)
        };
        Self {
            row: coords.0,
            column: coords.1,
            content,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.column)
    }
}
