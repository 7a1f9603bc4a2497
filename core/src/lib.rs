//! Minefield generation, reveal logic, and the game-session state machine for a single-player Minesweeper.
//!
//! The presentation layer talks to a [`Minesweeper`] controller, which owns the current [`GameSession`], the
//! injected [`StatsArchive`], and a [`Presenter`] that receives push notifications.

use serde::{Deserialize, Serialize};

pub use archive::*;
pub use board::*;
pub use cell::*;
pub use clock::*;
pub use error::*;
pub use game::*;
pub use generator::*;
pub use presenter::*;
pub use session::*;
pub use types::*;

mod archive;
mod board;
mod cell;
mod clock;
mod error;
mod game;
mod generator;
mod presenter;
mod session;
mod types;

/// Board dimensions and mine count, fixed for the lifetime of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const BEGINNER: Self = Self::new_unchecked(9, 9, 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked(16, 16, 40);
    pub const EXPERT: Self = Self::new_unchecked(16, 30, 99);

    /// Largest accepted number of rows or columns.
    pub const MAX_SIDE: Coord = 1024;

    pub const fn new_unchecked(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    /// Requires a non-empty board of at most [`Self::MAX_SIDE`] per side, with at least one safe cell.
    pub fn new(rows: Coord, columns: Coord, mines: CellCount) -> Result<Self> {
        if !(1..=Self::MAX_SIDE).contains(&rows) || !(1..=Self::MAX_SIDE).contains(&columns) {
            return Err(GameError::InvalidConfig);
        }
        if mines >= mult(rows, columns) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(rows, columns, mines))
    }

    /// Looks up one of the canonical presets by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::BEGINNER),
            "intermediate" => Some(Self::INTERMEDIATE),
            "expert" => Some(Self::EXPERT),
            _ => None,
        }
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.columns)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < self.rows && coords.1 < self.columns {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::BEGINNER
    }
}

/// Result of toggling a flag, so callers can adjust their counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    /// Change to apply to a flags-remaining counter.
    pub const fn flags_left_delta(self) -> i64 {
        match self {
            Self::Flagged => -1,
            Self::Unflagged => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn is_final(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}
