use super::*;
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::index;

/// Generation strategy that keeps the starting cell (and optionally its neighbors) safe, but other than that is
/// purely random.
#[derive(Clone, Debug)]
pub struct RandomMinefieldGenerator {
    rng: SmallRng,
    start_tile: StartTile,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start_tile: StartTile) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            start_tile,
        }
    }

    fn effective_start_tile(&self, config: GameConfig, origin: Coord2) -> StartTile {
        use StartTile::*;

        match self.start_tile {
            SimpleSafe => SimpleSafe,
            AlwaysZero => {
                let protected = NeighborIter::new(origin, config.size()).count() as CellCount + 1;
                if config.mines + protected > config.total_cells() {
                    log::warn!("Cannot make start tile zero, fallback to simple safe");
                    SimpleSafe
                } else {
                    AlwaysZero
                }
            }
        }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn place_mines(&mut self, config: GameConfig, origin: Coord2) -> Array2<bool> {
        let size = config.size();
        let mut mines: Array2<bool> = Array2::default(size.to_nd_index());

        // cells that must stay safe are marked first so they drop out of the candidates
        let mut protected: Array2<bool> = Array2::default(size.to_nd_index());
        protected[origin.to_nd_index()] = true;
        if self.effective_start_tile(config, origin) == StartTile::AlwaysZero {
            for coords in protected.iter_neighbors(origin) {
                protected[coords.to_nd_index()] = true;
            }
        }

        let candidates: Vec<Coord2> = (0..size.0)
            .flat_map(|row| (0..size.1).map(move |column| (row, column)))
            .filter(|&coords| !protected[coords.to_nd_index()])
            .collect();

        let wanted = config.mines as usize;
        let amount = if wanted > candidates.len() {
            log::warn!(
                "Minefield already full, requested {} mines but only {} cells are free",
                wanted,
                candidates.len()
            );
            candidates.len()
        } else {
            wanted
        };

        for picked in index::sample(&mut self.rng, candidates.len(), amount) {
            mines[candidates[picked].to_nd_index()] = true;
        }

        // double check mine count
        let count = mines.iter().filter(|&&is_mine| is_mine).count();
        if count != wanted {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                count,
                wanted
            );
        }
        log::debug!(
            "Placed {} mines on a {}x{} board, origin {:?}",
            count,
            size.0,
            size.1,
            origin
        );
        mines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_mines(mask: &Array2<bool>) -> usize {
        mask.iter().filter(|&&is_mine| is_mine).count()
    }

    #[test]
    fn places_requested_mines_and_keeps_origin_safe() {
        let config = GameConfig::EXPERT;
        for seed in 0..50 {
            let origin = ((seed % 16) as Coord, (seed * 7 % 30) as Coord);
            let mut generator = RandomMinefieldGenerator::new(seed, StartTile::SimpleSafe);
            let mask = generator.place_mines(config, origin);

            assert_eq!(mask.dim(), (16, 30));
            assert_eq!(count_mines(&mask), 99);
            assert!(!mask[origin.to_nd_index()]);
        }
    }

    #[test]
    fn always_zero_clears_the_neighborhood() {
        let config = GameConfig::BEGINNER;
        let origin = (4, 4);
        for seed in 0..20 {
            let mut generator = RandomMinefieldGenerator::new(seed, StartTile::AlwaysZero);
            let mask = generator.place_mines(config, origin);

            assert_eq!(count_mines(&mask), 10);
            assert!(!mask[origin.to_nd_index()]);
            assert!(mask.iter_neighbors(origin).all(|pos| !mask[pos.to_nd_index()]));
        }
    }

    #[test]
    fn always_zero_falls_back_when_board_is_crowded() {
        let config = GameConfig::new(3, 3, 8).unwrap();
        let mut generator = RandomMinefieldGenerator::new(7, StartTile::AlwaysZero);
        let mask = generator.place_mines(config, (1, 1));

        assert_eq!(count_mines(&mask), 8);
        assert!(!mask[[1, 1]]);
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::INTERMEDIATE;
        let a = RandomMinefieldGenerator::new(42, StartTile::SimpleSafe).place_mines(config, (0, 0));
        let b = RandomMinefieldGenerator::new(42, StartTile::SimpleSafe).place_mines(config, (0, 0));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_mines_is_empty() {
        let config = GameConfig::new(4, 4, 0).unwrap();
        let mask = RandomMinefieldGenerator::new(1, StartTile::AlwaysZero).place_mines(config, (2, 2));
        assert_eq!(count_mines(&mask), 0);
    }
}
