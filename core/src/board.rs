use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::*;

/// Cells changed by a single reveal, plus what the reveal meant for the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealResult {
    pub outcome: RevealOutcome,
    pub revealed: Vec<RevealedCell>,
}

/// Fixed-size grid of cells. Mines are placed lazily by [`Board::generate`] so the first reveal can be kept safe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
    generated: bool,
    revealed_safe: CellCount,
    flagged: CellCount,
}

impl Board {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            cells: Array2::default(config.size().to_nd_index()),
            generated: false,
            revealed_safe: 0,
            flagged: 0,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.config.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// Number of safe cells the player has uncovered.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_safe
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn is_won(&self) -> bool {
        self.generated && self.revealed_safe == self.safe_cell_count()
    }

    /// Iterates all cells in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, column), &cell)| ((row as Coord, column as Coord), cell))
    }

    /// Places mines around `origin` using `generator` and computes the adjacency counts.
    pub fn generate(
        &mut self,
        origin: Coord2,
        generator: &mut dyn MinefieldGenerator,
    ) -> Result<()> {
        let origin = self.config.validate_coords(origin)?;
        self.check_not_generated()?;

        let mask = generator.place_mines(self.config, origin);
        if mask.dim() != self.cells.dim() {
            return Err(GameError::InvalidConfig);
        }
        self.apply_mine_mask(&mask);
        Ok(())
    }

    /// Places mines at exactly the given coordinates instead of randomly.
    pub fn generate_with_mines(&mut self, mines: &[Coord2]) -> Result<()> {
        self.check_not_generated()?;

        let mut mask: Array2<bool> = Array2::default(self.cells.dim());
        for &coords in mines {
            let coords = self.config.validate_coords(coords)?;
            mask[coords.to_nd_index()] = true;
        }

        let count = mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        if count > self.config.mines {
            return Err(GameError::TooManyMines);
        }
        if count < self.config.mines {
            return Err(GameError::InvalidConfig);
        }

        self.apply_mine_mask(&mask);
        Ok(())
    }

    fn apply_mine_mask(&mut self, mask: &Array2<bool>) {
        for ((row, column), cell) in self.cells.indexed_iter_mut() {
            cell.is_mine = mask[[row, column]];
        }

        let (rows, columns) = self.size();
        for row in 0..rows {
            for column in 0..columns {
                let coords = (row, column);
                let adjacent = mask
                    .iter_neighbors(coords)
                    .filter(|&pos| mask[pos.to_nd_index()])
                    .count() as u8;
                self.cells[coords.to_nd_index()].adjacent_mines = adjacent;
            }
        }

        self.generated = true;
    }

    /// Reveals one cell, flood-filling through zero-count cells.
    ///
    /// Hitting a mine only marks that cell revealed; showing the rest of the board is left to [`Board::reveal_all`].
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        let coords = self.config.validate_coords(coords)?;
        if !self.generated {
            return Err(GameError::NotGenerated);
        }

        let cell = self.cells[coords.to_nd_index()];
        if cell.is_revealed {
            return Err(GameError::CellAlreadyRevealed);
        }
        if cell.is_flagged {
            return Err(GameError::CellFlagged);
        }

        if cell.is_mine {
            let cell = self.mark_revealed(coords);
            log::debug!("Revealed mine at {:?}", coords);
            return Ok(RevealResult {
                outcome: RevealOutcome::HitMine,
                revealed: vec![RevealedCell::from_cell(coords, cell)],
            });
        }

        let mut revealed = vec![RevealedCell::from_cell(coords, self.mark_revealed(coords))];
        log::debug!(
            "Revealed cell at {:?}, mine count: {}",
            coords,
            cell.adjacent_mines
        );

        if cell.adjacent_mines == 0 {
            self.flood_fill(coords, &mut revealed);
        }

        let outcome = if self.is_won() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        };
        Ok(RevealResult { outcome, revealed })
    }

    fn flood_fill(&mut self, origin: Coord2, revealed: &mut Vec<RevealedCell>) {
        let mut visited = HashSet::from([origin]);
        let mut to_visit: VecDeque<_> = self
            .cells
            .iter_neighbors(origin)
            .filter(|&pos| self.cells[pos.to_nd_index()].is_hidden())
            .collect();
        log::trace!(
            "Starting flood-fill from {:?}, initial neighbors: {:?}",
            origin,
            to_visit
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // skip flagged or already revealed cells
            if !self.cells[visit_coords.to_nd_index()].is_hidden() {
                continue;
            }

            let cell = self.mark_revealed(visit_coords);
            revealed.push(RevealedCell::from_cell(visit_coords, cell));
            log::trace!(
                "Flood revealed cell at {:?}, mine count: {}",
                visit_coords,
                cell.adjacent_mines
            );

            if cell.adjacent_mines == 0 {
                to_visit.extend(
                    self.cells
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.cells[pos.to_nd_index()].is_hidden())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn mark_revealed(&mut self, coords: Coord2) -> Cell {
        let cell = &mut self.cells[coords.to_nd_index()];
        cell.is_revealed = true;
        if !cell.is_mine {
            self.revealed_safe += 1;
        }
        *cell
    }

    /// Toggles the flag on an unrevealed cell.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.config.validate_coords(coords)?;
        let cell = &mut self.cells[coords.to_nd_index()];

        if cell.is_revealed {
            return Err(GameError::CellAlreadyRevealed);
        }

        cell.is_flagged = !cell.is_flagged;
        Ok(if cell.is_flagged {
            self.flagged += 1;
            FlagOutcome::Flagged
        } else {
            self.flagged -= 1;
            FlagOutcome::Unflagged
        })
    }

    /// Uncovers the whole board for end-of-game display, returning the cells that changed.
    ///
    /// Flags are cleared on the way; the revealed-safe counter is left alone so a lost game never reads as won.
    pub fn reveal_all(&mut self) -> Vec<RevealedCell> {
        let mut changed = Vec::new();
        for ((row, column), cell) in self.cells.indexed_iter_mut() {
            if cell.is_revealed {
                continue;
            }
            cell.is_revealed = true;
            cell.is_flagged = false;
            changed.push(RevealedCell::from_cell(
                (row as Coord, column as Coord),
                *cell,
            ));
        }
        self.flagged = 0;
        changed
    }

    fn check_not_generated(&self) -> Result<()> {
        if self.generated {
            Err(GameError::AlreadyGenerated)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(config: (Coord, Coord, CellCount), mines: &[Coord2]) -> Board {
        let mut board = Board::new(GameConfig::new(config.0, config.1, config.2).unwrap());
        board.generate_with_mines(mines).unwrap();
        board
    }

    fn revealed_set(result: &RevealResult) -> HashSet<Coord2> {
        result.revealed.iter().map(RevealedCell::coords).collect()
    }

    #[test]
    fn generate_places_exact_mines_and_keeps_origin_safe() {
        for seed in 0..30 {
            let mut board = Board::new(GameConfig::INTERMEDIATE);
            let origin = ((seed % 16) as Coord, (seed * 5 % 16) as Coord);
            let mut generator = RandomMinefieldGenerator::new(seed, StartTile::SimpleSafe);
            board.generate(origin, &mut generator).unwrap();

            let mines = board.iter_cells().filter(|(_, cell)| cell.is_mine).count();
            assert_eq!(mines, 40);
            assert!(!board.cell_at(origin).unwrap().is_mine);
        }
    }

    #[test]
    fn adjacency_matches_brute_force_count() {
        let mut board = Board::new(GameConfig::EXPERT);
        let mut generator = RandomMinefieldGenerator::new(99, StartTile::SimpleSafe);
        board.generate((8, 15), &mut generator).unwrap();

        let (rows, columns) = board.size();
        for ((row, column), cell) in board.iter_cells() {
            let mut expected = 0;
            for d_row in -1i32..=1 {
                for d_column in -1i32..=1 {
                    if d_row == 0 && d_column == 0 {
                        continue;
                    }
                    let r = row as i32 + d_row;
                    let c = column as i32 + d_column;
                    if r < 0 || c < 0 || r >= rows as i32 || c >= columns as i32 {
                        continue;
                    }
                    if board.cell_at((r as Coord, c as Coord)).unwrap().is_mine {
                        expected += 1;
                    }
                }
            }
            assert_eq!(cell.adjacent_mines, expected, "cell {:?}", (row, column));
        }
    }

    #[test]
    fn generate_twice_fails() {
        let mut board = Board::new(GameConfig::BEGINNER);
        let mut generator = RandomMinefieldGenerator::new(1, StartTile::SimpleSafe);
        board.generate((0, 0), &mut generator).unwrap();

        assert_eq!(
            board.generate((0, 0), &mut generator),
            Err(GameError::AlreadyGenerated)
        );
        assert_eq!(
            board.generate_with_mines(&[]),
            Err(GameError::AlreadyGenerated)
        );
    }

    #[test]
    fn generate_rejects_out_of_bounds_origin() {
        let mut board = Board::new(GameConfig::BEGINNER);
        let mut generator = RandomMinefieldGenerator::new(1, StartTile::SimpleSafe);
        assert_eq!(
            board.generate((9, 0), &mut generator),
            Err(GameError::OutOfBounds)
        );
        assert!(!board.is_generated());
    }

    #[test]
    fn generate_with_mines_checks_count() {
        let mut board = Board::new(GameConfig::new(3, 3, 2).unwrap());
        assert_eq!(
            board.generate_with_mines(&[(0, 0)]),
            Err(GameError::InvalidConfig)
        );
        assert_eq!(
            board.generate_with_mines(&[(0, 0), (1, 1), (2, 2)]),
            Err(GameError::TooManyMines)
        );
        assert_eq!(
            board.generate_with_mines(&[(0, 0), (3, 3)]),
            Err(GameError::OutOfBounds)
        );
        assert!(!board.is_generated());
    }

    #[test]
    fn reveal_before_generate_fails() {
        let mut board = Board::new(GameConfig::BEGINNER);
        assert_eq!(board.reveal((0, 0)), Err(GameError::NotGenerated));
        assert!(!board.is_won());
    }

    #[test]
    fn single_cell_board_wins_immediately() {
        let mut board = board((1, 1, 0), &[]);
        let result = board.reveal((0, 0)).unwrap();

        assert_eq!(result.outcome, RevealOutcome::Won);
        assert_eq!(result.revealed.len(), 1);
    }

    #[test]
    fn flood_fill_reveals_whole_board_around_corner_mine() {
        let mut board = board((3, 3, 1), &[(2, 2)]);
        let result = board.reveal((0, 0)).unwrap();

        assert_eq!(result.outcome, RevealOutcome::Won);
        assert_eq!(result.revealed.len(), 8);
        assert!(!revealed_set(&result).contains(&(2, 2)));
        assert_eq!(board.cell_at((1, 1)).unwrap().view(), CellView::Open(1));
        assert_eq!(board.cell_at((2, 2)).unwrap().view(), CellView::Hidden);
        assert_eq!(board.revealed_count(), 8);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // column 2 holds the mines; the zero region is column 0, bordered by column 1
        let mut board = board((4, 5, 4), &[(0, 2), (1, 2), (2, 2), (3, 2)]);
        let result = board.reveal((1, 0)).unwrap();

        let expected: HashSet<Coord2> = (0..4)
            .flat_map(|row| [(row, 0), (row, 1)])
            .collect();
        assert_eq!(result.outcome, RevealOutcome::Revealed);
        assert_eq!(revealed_set(&result), expected);
        assert_eq!(board.cell_at((0, 3)).unwrap().view(), CellView::Hidden);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut board = board((3, 3, 1), &[(2, 2)]);
        board.toggle_flag((0, 2)).unwrap();

        let result = board.reveal((0, 0)).unwrap();

        assert_eq!(result.outcome, RevealOutcome::Revealed);
        assert_eq!(result.revealed.len(), 7);
        assert_eq!(board.cell_at((0, 2)).unwrap().view(), CellView::Flagged);
    }

    #[test]
    fn numbered_cell_does_not_cascade() {
        let mut board = board((3, 3, 1), &[(2, 2)]);
        let result = board.reveal((1, 1)).unwrap();

        assert_eq!(result.outcome, RevealOutcome::Revealed);
        assert_eq!(result.revealed.len(), 1);
        assert_eq!(
            result.revealed[0].content,
            RevealedContent::Count(1)
        );
    }

    #[test]
    fn reveal_mine_only_touches_that_cell() {
        let mut board = board((3, 3, 1), &[(1, 1)]);
        let result = board.reveal((1, 1)).unwrap();

        assert_eq!(result.outcome, RevealOutcome::HitMine);
        assert_eq!(result.revealed.len(), 1);
        assert_eq!(result.revealed[0].content, RevealedContent::Mine);
        assert_eq!(board.revealed_count(), 0);
        assert_eq!(board.cell_at((0, 0)).unwrap().view(), CellView::Hidden);
    }

    #[test]
    fn reveal_rejects_revealed_flagged_and_out_of_bounds() {
        let mut board = board((3, 3, 1), &[(2, 2)]);
        board.reveal((1, 1)).unwrap();
        board.toggle_flag((2, 2)).unwrap();

        assert_eq!(board.reveal((1, 1)), Err(GameError::CellAlreadyRevealed));
        assert_eq!(board.reveal((2, 2)), Err(GameError::CellFlagged));
        assert_eq!(board.reveal((3, 0)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn win_is_declared_only_when_all_safe_cells_are_revealed() {
        let mut board = board((1, 3, 1), &[(0, 1)]);

        assert_eq!(board.reveal((0, 0)).unwrap().outcome, RevealOutcome::Revealed);
        assert!(!board.is_won());
        assert_eq!(board.reveal((0, 2)).unwrap().outcome, RevealOutcome::Won);
        assert!(board.is_won());
    }

    #[test]
    fn densest_board_is_playable() {
        let mut board = Board::new(GameConfig::new(3, 3, 8).unwrap());
        let mut generator = RandomMinefieldGenerator::new(3, StartTile::AlwaysZero);
        board.generate((1, 1), &mut generator).unwrap();

        let result = board.reveal((1, 1)).unwrap();
        assert_eq!(result.outcome, RevealOutcome::Won);
        assert_eq!(board.cell_at((1, 1)).unwrap().adjacent_mines, 8);
    }

    #[test]
    fn toggle_flag_on_revealed_cell_fails_without_changes() {
        let mut board = board((3, 3, 1), &[(2, 2)]);
        board.reveal((1, 1)).unwrap();
        let before = board.clone();

        assert_eq!(
            board.toggle_flag((1, 1)),
            Err(GameError::CellAlreadyRevealed)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn toggle_flag_twice_restores_cell() {
        let mut board = Board::new(GameConfig::BEGINNER);

        assert_eq!(board.toggle_flag((3, 3)), Ok(FlagOutcome::Flagged));
        assert_eq!(board.flagged_count(), 1);
        assert_eq!(board.toggle_flag((3, 3)), Ok(FlagOutcome::Unflagged));
        assert_eq!(board.flagged_count(), 0);
        assert_eq!(board.cell_at((3, 3)).unwrap().view(), CellView::Hidden);
    }

    #[test]
    fn reveal_all_uncovers_everything_without_winning() {
        let mut board = board((2, 2, 1), &[(0, 0)]);
        board.toggle_flag((1, 1)).unwrap();
        board.reveal((0, 0)).unwrap();

        let changed = board.reveal_all();

        assert_eq!(changed.len(), 3);
        assert!(board.iter_cells().all(|(_, cell)| cell.is_revealed && !cell.is_flagged));
        assert_eq!(board.flagged_count(), 0);
        assert!(!board.is_won());
    }
}
