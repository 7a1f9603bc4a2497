use crate::*;

/// Options that apply to every game started by a [`Minesweeper`] controller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GameOptions {
    /// Fixed seed for every board; a fresh random seed per game when `None`.
    pub seed: Option<u64>,
    pub start_tile: StartTile,
}

/// Long-lived entry point for the presentation layer.
///
/// Owns the stats archive, the presenter, and the session currently being played. Requesting a new game abandons the
/// current session and replaces it.
pub struct Minesweeper<A, P> {
    options: GameOptions,
    archive: A,
    presenter: P,
    clocks: Box<dyn ClockFactory>,
    session: GameSession,
    generation: u64,
}

impl<A, P> Minesweeper<A, P>
where
    A: StatsArchive,
    P: Presenter,
{
    pub fn new(
        config: GameConfig,
        options: GameOptions,
        archive: A,
        presenter: P,
        mut clocks: Box<dyn ClockFactory>,
    ) -> Self {
        let generation = 0;
        let session = Self::new_session(config, options, clocks.as_mut(), generation);
        let mut game = Self {
            options,
            archive,
            presenter,
            clocks,
            session,
            generation,
        };
        game.announce_new_game();
        game
    }

    fn new_session(
        config: GameConfig,
        options: GameOptions,
        clocks: &mut dyn ClockFactory,
        generation: u64,
    ) -> GameSession {
        let seed = options.seed.unwrap_or_else(rand::random);
        log::debug!("New game #{} with seed {}", generation, seed);
        let generator = RandomMinefieldGenerator::new(seed, options.start_tile);
        GameSession::new(config, Box::new(generator), clocks.create(generation))
    }

    fn announce_new_game(&mut self) {
        self.presenter.on_new_game(self.session.config());
        self.presenter.on_flags_changed(self.session.flags_left());
        self.presenter.on_time_changed(self.session.elapsed_secs());
        self.presenter.on_face_state_changed(self.session.face());
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Identifies the current session; ticks carrying any other value are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let report = match self.session.on_cell_reveal(coords, &mut self.archive) {
            Ok(report) => report,
            Err(err) => {
                log::debug!("Reveal at {:?} rejected: {}", coords, err);
                self.presenter.on_error(&err);
                return Err(err);
            }
        };

        self.presenter.on_cells_revealed(&report.revealed);
        if report.started {
            self.presenter.on_time_changed(self.session.elapsed_secs());
        }

        if let Some(outcome) = self.session.outcome() {
            if let Some(err) = &report.persist_error {
                self.presenter.on_archive_error(err);
            }
            self.presenter.on_game_finished(outcome);
            self.presenter.on_face_state_changed(self.session.face());
        }

        Ok(report.outcome)
    }

    pub fn request_flag_toggle(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        match self.session.on_flag_toggle(coords) {
            Ok(outcome) => {
                self.presenter.on_flag_toggled(coords, outcome);
                self.presenter.on_flags_changed(self.session.flags_left());
                Ok(outcome)
            }
            Err(err) => {
                log::debug!("Flag at {:?} rejected: {}", coords, err);
                self.presenter.on_error(&err);
                Err(err)
            }
        }
    }

    /// Abandons the current session and starts a fresh one with `config`.
    pub fn request_new_game(&mut self, config: GameConfig) {
        let was_running = self.session.state() == SessionState::Running;
        self.session.finish();
        if was_running {
            self.presenter.on_game_finished(GameOutcome::Abandoned);
        }
        self.generation += 1;
        self.session = Self::new_session(
            config,
            self.options,
            self.clocks.as_mut(),
            self.generation,
        );
        self.announce_new_game();
    }

    /// Delivers one clock tick. Ticks from an earlier session are dropped.
    pub fn tick(&mut self, generation: u64) -> Option<u64> {
        if generation != self.generation {
            log::trace!("Dropping stale tick from game #{}", generation);
            return None;
        }

        let seconds = self.session.tick()?;
        self.presenter.on_time_changed(seconds);
        Some(seconds)
    }

    pub fn history(&self) -> core::result::Result<Vec<ArchivedRecord>, ArchiveError> {
        self.archive.load_all()
    }
}
