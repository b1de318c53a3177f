//! Generation engine with period-1 stability detection.

use crate::grid::Grid;
use crate::rule::next_state;
use life_core::{
    validate_max_generations, validate_size, Cell, EngineConfig, Position, Result, Size,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Conway's Game of Life on a bounded grid.
///
/// Two buffers are kept: the generation on display and the one before it.
/// Advancing writes the next generation into the older buffer (reading only
/// the current one) and swaps them, so no grid is reallocated per step.
#[derive(Debug, Clone)]
pub struct GameOfLife {
    size: Size,
    current: Grid,
    previous: Grid,
    generations: u64,
    max_generations: Option<u64>,
}

impl GameOfLife {
    /// All-dead engine
    pub fn new(size: Size, max_generations: Option<u64>) -> Result<Self> {
        validate_size(size)?;
        validate_max_generations(max_generations)?;

        Ok(Self {
            size,
            current: Grid::new(size),
            previous: Grid::new(size),
            generations: 1,
            max_generations,
        })
    }

    /// Engine whose first generation is drawn from `rng` when `randomize` is set
    pub fn with_rng<R: Rng + ?Sized>(
        size: Size,
        randomize: bool,
        max_generations: Option<u64>,
        rng: &mut R,
    ) -> Result<Self> {
        let mut game = Self::new(size, max_generations)?;
        if randomize {
            game.current = Grid::random(size, rng);
        }
        Ok(game)
    }

    /// Create an engine from configuration, seeding the generator when asked
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(
            config.size(),
            config.randomize,
            config.max_generations,
            &mut rng,
        )
    }

    /// Engine starting from an existing grid
    pub fn from_grid(grid: Grid) -> Result<Self> {
        let mut game = Self::new(grid.size(), None)?;
        game.current = grid;
        Ok(game)
    }

    /// Replace the generation cap, e.g. after loading a grid that carries none
    pub fn with_max_generations(mut self, max_generations: Option<u64>) -> Result<Self> {
        validate_max_generations(max_generations)?;
        self.max_generations = max_generations;
        Ok(self)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    pub fn cols(&self) -> usize {
        self.size.cols
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn previous(&self) -> &Grid {
        &self.previous
    }

    /// Generations produced so far; the initial grid counts as the first
    pub fn generations(&self) -> u64 {
        self.generations
    }

    pub fn max_generations(&self) -> Option<u64> {
        self.max_generations
    }

    pub fn neighbor_count(&self, pos: Position) -> u8 {
        self.current.neighbor_count(pos)
    }

    /// The generation that would follow the current one
    pub fn compute_next_generation(&self) -> Grid {
        let mut next = Grid::new(self.size);
        write_next_generation(&self.current, &mut next);
        next
    }

    /// Advance one generation unless capped or settled.
    ///
    /// Returns whether a step actually happened.
    pub fn step(&mut self) -> bool {
        if self.is_max_generations_exceeded() || !self.is_changing() {
            return false;
        }

        write_next_generation(&self.current, &mut self.previous);
        std::mem::swap(&mut self.current, &mut self.previous);
        self.generations += 1;

        debug!(
            generation = self.generations,
            population = self.current.population(),
            "Advanced generation"
        );

        if self.is_max_generations_exceeded() {
            info!(generation = self.generations, "Generation cap reached");
        } else if !self.is_changing() {
            info!(generation = self.generations, "Grid settled");
        }

        true
    }

    pub fn is_max_generations_exceeded(&self) -> bool {
        self.max_generations
            .is_some_and(|max| self.generations >= max)
    }

    /// Whether the current generation differs from the previous one
    pub fn is_changing(&self) -> bool {
        self.previous != self.current
    }

    /// Flip one cell of the current generation (manual editing)
    pub fn toggle(&mut self, pos: Position) -> Result<Cell> {
        self.current.toggle(pos)
    }

    pub fn set_cell(&mut self, pos: Position, cell: Cell) -> Result<()> {
        self.current.set(pos, cell)
    }

    /// Replace the current generation with random cells. Counters and the
    /// previous generation are left alone.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current = Grid::random(self.size, rng);
        debug!(population = self.current.population(), "Randomized grid");
    }
}

/// Fill `next` from `current`. Both grids must share a shape.
fn write_next_generation(current: &Grid, next: &mut Grid) {
    debug_assert_eq!(current.size(), next.size());
    for (i, cell) in next.cells_mut().iter_mut().enumerate() {
        let pos = current.index_to_pos(i);
        let alive = current.get(pos).unwrap_or_default();
        *cell = next_state(alive, current.neighbor_count(pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_core::Error;
    use proptest::prelude::*;

    fn game_with(size: Size, live: &[(usize, usize)], max: Option<u64>) -> GameOfLife {
        let mut game = GameOfLife::new(size, max).unwrap();
        for &(row, col) in live {
            game.set_cell(Position::new(row, col), Cell::Alive).unwrap();
        }
        game
    }

    fn live(game: &GameOfLife) -> Vec<(usize, usize)> {
        game.current()
            .live_cells()
            .map(|pos| (pos.row, pos.col))
            .collect()
    }

    #[test]
    fn test_construction() {
        let game = GameOfLife::new(Size::new(4, 6), None).unwrap();
        assert_eq!(game.rows(), 4);
        assert_eq!(game.cols(), 6);
        assert_eq!(game.generations(), 1);
        assert_eq!(game.current().population(), 0);
        assert_eq!(game.previous().size(), game.size());
        assert!(!game.is_max_generations_exceeded());
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            GameOfLife::new(Size::new(0, 5), None),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            GameOfLife::new(Size::new(5, 5), Some(0)),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_seeded_construction_is_reproducible() {
        let config = EngineConfig {
            rows: 12,
            cols: 12,
            seed: Some(7),
            ..Default::default()
        };
        let a = GameOfLife::from_config(&config).unwrap();
        let b = GameOfLife::from_config(&config).unwrap();
        assert_eq!(a.current(), b.current());

        let empty = GameOfLife::from_config(&EngineConfig {
            randomize: false,
            ..config
        })
        .unwrap();
        assert_eq!(empty.current().population(), 0);
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut game = game_with(Size::new(5, 5), &[(2, 1), (2, 2), (2, 3)], None);

        assert!(game.step());
        assert_eq!(live(&game), vec![(1, 2), (2, 2), (3, 2)]);
        assert!(game.is_changing());

        assert!(game.step());
        assert_eq!(live(&game), vec![(2, 1), (2, 2), (2, 3)]);
        assert!(game.is_changing());
        assert_eq!(game.generations(), 3);
    }

    #[test]
    fn test_block_settles() {
        let mut game = game_with(Size::new(6, 6), &[(2, 2), (2, 3), (3, 2), (3, 3)], None);
        let start = game.current().clone();

        assert!(game.step());
        assert_eq!(game.current(), &start);
        assert!(!game.is_changing());
        assert_eq!(game.generations(), 2);

        for _ in 0..5 {
            assert!(!game.step());
        }
        assert_eq!(game.current(), &start);
        assert_eq!(game.generations(), 2);
    }

    #[test]
    fn test_generation_cap() {
        let mut game = game_with(Size::new(5, 5), &[(2, 1), (2, 2), (2, 3)], Some(3));

        assert!(game.step());
        assert!(game.step());
        assert_eq!(game.generations(), 3);
        assert!(game.is_max_generations_exceeded());

        let frozen = game.current().clone();
        assert!(!game.step());
        assert_eq!(game.generations(), 3);
        assert_eq!(game.current(), &frozen);
    }

    #[test]
    fn test_cap_applied_after_construction() {
        let game = game_with(Size::new(5, 5), &[(2, 1), (2, 2), (2, 3)], None);
        let mut game = game.with_max_generations(Some(2)).unwrap();
        assert_eq!(game.max_generations(), Some(2));

        assert!(game.step());
        assert!(game.is_max_generations_exceeded());
        assert!(!game.step());
        assert_eq!(game.generations(), 2);

        let game = GameOfLife::new(Size::new(2, 2), None).unwrap();
        assert!(matches!(
            game.with_max_generations(Some(0)),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_grid_never_advances() {
        // An all-dead start equals the all-dead previous buffer
        let mut game = GameOfLife::new(Size::new(3, 3), None).unwrap();
        assert!(!game.is_changing());
        assert!(!game.step());
        assert_eq!(game.generations(), 1);
    }

    #[test]
    fn test_glider_moves() {
        let mut game = game_with(
            Size::new(8, 8),
            &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
            None,
        );
        for _ in 0..4 {
            assert!(game.step());
        }
        assert_eq!(live(&game), vec![(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)]);
    }

    #[test]
    fn test_previous_holds_last_generation() {
        let mut game = game_with(Size::new(5, 5), &[(2, 1), (2, 2), (2, 3)], None);
        let before = game.current().clone();
        let expected = game.compute_next_generation();

        game.step();
        assert_eq!(game.previous(), &before);
        assert_eq!(game.current(), &expected);
    }

    #[test]
    fn test_toggle_and_randomize() {
        let mut game = GameOfLife::new(Size::new(4, 4), Some(10)).unwrap();
        assert_eq!(game.toggle(Position::new(1, 1)).unwrap(), Cell::Alive);
        assert!(game.is_changing());
        assert!(game.toggle(Position::new(4, 0)).is_err());

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        game.randomize(&mut rng);
        assert_eq!(game.generations(), 1);
        assert_eq!(game.previous().population(), 0);
    }

    /// Straightforward recount used to check the engine
    fn naive_count(cells: &[Vec<bool>], row: usize, col: usize) -> u8 {
        let mut count = 0;
        for r in row.saturating_sub(1)..=(row + 1) {
            for c in col.saturating_sub(1)..=(col + 1) {
                if (r, c) == (row, col) || r >= cells.len() || c >= cells[0].len() {
                    continue;
                }
                count += cells[r][c] as u8;
            }
        }
        count
    }

    fn game_from_bools(cells: &[Vec<bool>]) -> GameOfLife {
        let rows: Vec<Vec<Cell>> = cells
            .iter()
            .map(|row| row.iter().map(|&b| Cell::from(b)).collect())
            .collect();
        GameOfLife::from_grid(Grid::from_rows(rows).unwrap()).unwrap()
    }

    fn arb_cells() -> impl Strategy<Value = Vec<Vec<bool>>> {
        (1usize..12, 1usize..12).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(prop::collection::vec(any::<bool>(), cols), rows)
        })
    }

    proptest! {
        #[test]
        fn prop_neighbor_count_matches_recount(cells in arb_cells()) {
            let game = game_from_bools(&cells);
            for row in 0..cells.len() {
                for col in 0..cells[0].len() {
                    prop_assert_eq!(
                        game.neighbor_count(Position::new(row, col)),
                        naive_count(&cells, row, col)
                    );
                }
            }
        }

        #[test]
        fn prop_next_generation_is_pure(cells in arb_cells()) {
            let game = game_from_bools(&cells);
            let first = game.compute_next_generation();
            let second = game.compute_next_generation();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(game.generations(), 1);

            // Matches the rule applied to counts taken from the untouched grid
            for (pos, cell) in first.iter() {
                let was = Cell::from(cells[pos.row][pos.col]);
                prop_assert_eq!(cell, next_state(was, naive_count(&cells, pos.row, pos.col)));
            }
        }

        #[test]
        fn prop_step_matches_compute(cells in arb_cells()) {
            let mut game = game_from_bools(&cells);
            let expected = game.compute_next_generation();
            let advanced = game.step();
            prop_assert_eq!(advanced, cells.iter().flatten().any(|&b| b));
            if advanced {
                prop_assert_eq!(game.current(), &expected);
            }
        }
    }
}
