use serde::{Deserialize, Serialize};

use crate::*;

/// Mood of the new-game button.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceState {
    #[default]
    Neutral,
    Won,
    Lost,
}

/// Push notifications from the game to whatever draws it. Every method defaults to doing nothing.
pub trait Presenter {
    fn on_new_game(&mut self, _config: GameConfig) {}

    fn on_time_changed(&mut self, _seconds: u64) {}

    fn on_flags_changed(&mut self, _flags_left: i64) {}

    fn on_flag_toggled(&mut self, _coords: Coord2, _outcome: FlagOutcome) {}

    /// Called once per reveal with every cell that became visible, flood fill and end-of-game uncovering included.
    fn on_cells_revealed(&mut self, _cells: &[RevealedCell]) {}

    fn on_game_finished(&mut self, _outcome: GameOutcome) {}

    fn on_face_state_changed(&mut self, _state: FaceState) {}

    fn on_error(&mut self, _error: &GameError) {}

    fn on_archive_error(&mut self, _error: &ArchiveError) {}
}

/// Presenter that ignores everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}
