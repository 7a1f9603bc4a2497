use minesweeper_core::*;
use std::fmt::Write;

/// Text rendition of the board, kept up to date from the game's notifications.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    config: GameConfig,
    cells: Vec<CellView>,
    seconds: u64,
    flags_left: i64,
    face: FaceState,
    messages: Vec<String>,
}

impl TerminalPresenter {
    fn index(&self, (row, column): Coord2) -> usize {
        usize::from(row) * usize::from(self.config.columns) + usize::from(column)
    }

    pub fn cell(&self, coords: Coord2) -> CellView {
        self.cells[self.index(coords)]
    }

    /// Returns and clears the messages queued since the last call.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Status line with the flag counter, face and timer.
    pub fn header(&self) -> String {
        let face = match self.face {
            FaceState::Neutral => ":)",
            FaceState::Won => "B)",
            FaceState::Lost => "X(",
        };
        format!(
            "Flags {:>4}   {}   Time {:>4}",
            self.flags_left, face, self.seconds
        )
    }

    pub fn render(&self) -> String {
        let mut out = self.header();
        out.push('\n');

        let _ = write!(out, "    ");
        for column in 0..self.config.columns {
            let _ = write!(out, "{}", column % 10);
        }
        let _ = writeln!(out);

        for row in 0..self.config.rows {
            let _ = write!(out, "{:>3} ", row);
            for column in 0..self.config.columns {
                let symbol = match self.cell((row, column)) {
                    CellView::Hidden => '#',
                    CellView::Flagged => 'F',
                    CellView::Open(0) => '.',
                    CellView::Open(count) => char::from(b'0' + count),
                    CellView::Mine => '*',
                };
                out.push(symbol);
            }
            let _ = writeln!(out);
        }
        out
    }
}

impl Presenter for TerminalPresenter {
    fn on_new_game(&mut self, config: GameConfig) {
        self.config = config;
        self.cells = vec![CellView::Hidden; config.total_cells() as usize];
        self.messages.push(format!(
            "New game: {}x{} with {} mines",
            config.rows, config.columns, config.mines
        ));
    }

    fn on_time_changed(&mut self, seconds: u64) {
        self.seconds = seconds;
    }

    fn on_flags_changed(&mut self, flags_left: i64) {
        self.flags_left = flags_left;
    }

    fn on_flag_toggled(&mut self, coords: Coord2, outcome: FlagOutcome) {
        let index = self.index(coords);
        self.cells[index] = match outcome {
            FlagOutcome::Flagged => CellView::Flagged,
            FlagOutcome::Unflagged => CellView::Hidden,
        };
    }

    fn on_cells_revealed(&mut self, cells: &[RevealedCell]) {
        for cell in cells {
            let index = self.index(cell.coords());
            self.cells[index] = match cell.content {
                RevealedContent::Count(count) => CellView::Open(count),
                RevealedContent::Mine => CellView::Mine,
            };
        }
    }

    fn on_game_finished(&mut self, outcome: GameOutcome) {
        let message = match outcome {
            GameOutcome::Won => format!("You won in {} seconds!", self.seconds),
            GameOutcome::Lost => "Boom! You hit a mine.".to_string(),
            GameOutcome::Abandoned => "Game abandoned.".to_string(),
        };
        self.messages.push(message);
    }

    fn on_face_state_changed(&mut self, state: FaceState) {
        self.face = state;
    }

    fn on_error(&mut self, error: &GameError) {
        self.messages.push(error.to_string());
    }

    fn on_archive_error(&mut self, error: &ArchiveError) {
        self.messages
            .push(format!("Your win could not be saved: {}", error));
    }
}
