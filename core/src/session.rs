use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Running
/// - NotStarted -> Finished (abandoned before the first move)
/// - Running -> Finished
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotStarted,
    Running,
    Finished,
}

/// Why a session finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
    Abandoned,
}

/// Everything a single reveal changed.
#[derive(Debug)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    /// Newly visible cells, including the whole board after a loss.
    pub revealed: Vec<RevealedCell>,
    /// Whether this reveal moved the session out of `NotStarted`.
    pub started: bool,
    /// Record handed to the archive when the reveal won the game.
    pub record: Option<ArchivedRecord>,
    /// Set when the record could not be stored. The win stands regardless.
    pub persist_error: Option<ArchiveError>,
}

/// One play-through: owns the board, the flag budget, and the elapsed-time clock.
///
/// Not synchronized; every call, ticks included, has to come from the same control thread.
pub struct GameSession {
    board: Board,
    generator: Box<dyn MinefieldGenerator>,
    clock: Box<dyn Clock>,
    clock_running: bool,
    state: SessionState,
    outcome: Option<GameOutcome>,
    elapsed_secs: u64,
    flags_left: i64,
}

impl GameSession {
    pub fn new(
        config: GameConfig,
        generator: Box<dyn MinefieldGenerator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self::with_board(Board::new(config), generator, clock)
    }

    /// Starts from an existing board, which may already have its mines placed.
    pub fn with_board(
        board: Board,
        generator: Box<dyn MinefieldGenerator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let flags_left = i64::from(board.config().mines) - i64::from(board.flagged_count());
        Self {
            board,
            generator,
            clock,
            clock_running: false,
            state: SessionState::NotStarted,
            outcome: None,
            elapsed_secs: 0,
            flags_left,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.board.config()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Finished
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Mines minus flags placed; negative when the player over-flags.
    pub fn flags_left(&self) -> i64 {
        self.flags_left
    }

    pub fn face(&self) -> FaceState {
        match self.outcome {
            Some(GameOutcome::Won) => FaceState::Won,
            Some(GameOutcome::Lost) => FaceState::Lost,
            Some(GameOutcome::Abandoned) | None => FaceState::Neutral,
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.state != SessionState::NotStarted {
            return Err(GameError::InvalidState);
        }

        self.state = SessionState::Running;
        self.clock.start();
        self.clock_running = true;
        log::debug!("Session started on a {:?} board", self.config());
        Ok(())
    }

    /// Reveals a cell, starting the session and placing the mines first if needed.
    pub fn on_cell_reveal(
        &mut self,
        coords: Coord2,
        archive: &mut dyn StatsArchive,
    ) -> Result<RevealReport> {
        if self.is_finished() {
            return Err(GameError::InvalidState);
        }

        // reject bad clicks before they can start the clock
        let cell = self.board.cell_at(coords)?;
        if cell.is_revealed {
            return Err(GameError::CellAlreadyRevealed);
        }
        if cell.is_flagged {
            return Err(GameError::CellFlagged);
        }

        let started = self.state == SessionState::NotStarted;
        if started {
            self.start()?;
        }
        if !self.board.is_generated() {
            self.board.generate(coords, &mut *self.generator)?;
        }

        let RevealResult {
            outcome,
            mut revealed,
        } = self.board.reveal(coords)?;

        let mut report = RevealReport {
            outcome,
            revealed: Vec::new(),
            started,
            record: None,
            persist_error: None,
        };

        match outcome {
            RevealOutcome::Revealed => {}
            RevealOutcome::HitMine => {
                self.finish_with(GameOutcome::Lost);
                revealed.extend(self.board.reveal_all());
            }
            RevealOutcome::Won => {
                self.finish_with(GameOutcome::Won);
                let record =
                    ArchivedRecord::new(RecordOutcome::Win, self.elapsed_secs, self.config());
                if let Err(err) = archive.append(record.clone()) {
                    log::error!("Could not archive won game: {}", err);
                    report.persist_error = Some(err);
                }
                report.record = Some(record);
            }
        }

        report.revealed = revealed;
        Ok(report)
    }

    /// Toggles a flag and adjusts the flags-left counter. Allowed before the first reveal.
    pub fn on_flag_toggle(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        if self.is_finished() {
            return Err(GameError::InvalidState);
        }

        let outcome = self.board.toggle_flag(coords)?;
        self.flags_left += outcome.flags_left_delta();
        Ok(outcome)
    }

    /// Ends the session if it is still open, e.g. when a new game replaces it. Does nothing when already finished.
    pub fn finish(&mut self) {
        self.finish_with(GameOutcome::Abandoned);
    }

    fn finish_with(&mut self, outcome: GameOutcome) {
        if self.is_finished() {
            return;
        }

        self.state = SessionState::Finished;
        self.outcome = Some(outcome);
        self.stop_clock();
        log::debug!(
            "Session finished: {:?} after {}s",
            outcome,
            self.elapsed_secs
        );
    }

    fn stop_clock(&mut self) {
        if self.clock_running {
            self.clock.stop();
            self.clock_running = false;
        }
    }

    /// Advances elapsed time by one second while running. Returns the new value, or `None` if the tick was ignored.
    pub fn tick(&mut self) -> Option<u64> {
        if self.state == SessionState::Running {
            self.elapsed_secs += 1;
            Some(self.elapsed_secs)
        } else {
            None
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.stop_clock();
    }
}
