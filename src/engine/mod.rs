mod grid;
mod rule;

pub use self::grid::{Cell, Grid};
use crate::{Config, Pos2};
use log::debug;
use rand::Rng;

/// A bounded Game of Life session
///
/// Owns the grid, the generation and population counters, and the running
/// flag. `H` is the type of the animation handle handed in by whatever drives
/// the simulation; the engine only stores it.
#[derive(Debug)]
pub struct GameOfLife<H = u64> {
    config: Config,
    grid: Grid,
    /// Scratch grid the next generation is written into before swapping
    back: Grid,
    generation: u64,
    population: usize,
    running: bool,
    animation_id: Option<H>,
}

impl<H> GameOfLife<H> {
    /// Creates an all-dead engine sized `height / cellSize` by `width / cellSize`
    ///
    /// A zero `cellSize` yields an empty 0x0 grid rather than panicking.
    pub fn new(config: Config) -> Self {
        let rows = config.height.checked_div(config.cell_size).unwrap_or(0) as usize;
        let cols = config.width.checked_div(config.cell_size).unwrap_or(0) as usize;
        debug!("creating {rows}x{cols} grid");

        Self {
            config,
            grid: Grid::new(rows, cols),
            back: Grid::new(rows, cols),
            generation: 0,
            population: 0,
            running: false,
            animation_id: None,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    /// Direct access to the live grid, for editing individual cells
    ///
    /// Edits made through this reference bypass bookkeeping: [`population`]
    /// stays stale until the next [`randomize_grid`], [`clear_grid`],
    /// [`add_pattern`] or [`next_generation`] recounts it.
    ///
    /// [`population`]: GameOfLife::population
    /// [`randomize_grid`]: GameOfLife::randomize_grid
    /// [`clear_grid`]: GameOfLife::clear_grid
    /// [`add_pattern`]: GameOfLife::add_pattern
    /// [`next_generation`]: GameOfLife::next_generation
    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// A copy of the configuration this engine was built from
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Fills the grid at random, each cell alive with probability `density`
    ///
    /// `None` uses the configured `initialDensity`. Density is not range
    /// checked: anything `<= 0` clears the grid and anything `>= 1` fills it.
    pub fn randomize_grid(&mut self, density: Option<f64>) {
        self.randomize_grid_with(&mut rand::rng(), density);
    }

    /// [`GameOfLife::randomize_grid`] with a caller-supplied random source
    pub fn randomize_grid_with<R: Rng + ?Sized>(&mut self, rng: &mut R, density: Option<f64>) {
        let density = density.unwrap_or(self.config.initial_density);
        for cell in self.grid.cells_mut() {
            *cell = Cell::from(rng.random::<f64>() < density);
        }
        self.generation = 0;
        self.recount();
        debug!("randomized grid at density {density}: {} alive", self.population);
    }

    pub fn clear_grid(&mut self) {
        self.grid.fill(Cell::Dead);
        self.generation = 0;
        self.population = 0;
    }

    /// Stamps the named pattern with its offsets relative to `(origin_x, origin_y)`
    ///
    /// `x` is the column and `y` the row. Offsets landing outside the grid are
    /// skipped. Returns `false`, leaving the grid untouched, if no pattern has
    /// that name.
    pub fn add_pattern(&mut self, name: &str, origin_x: i32, origin_y: i32) -> bool {
        let Some(pattern) = self.config.patterns.get(name) else {
            debug!("unknown pattern {name:?}");
            return false;
        };

        let origin = Pos2::new(origin_x, origin_y);
        for &offset in &pattern.cells {
            if let Some(pos) = origin.checked_add(offset) {
                self.grid.set_at(pos, Cell::Alive);
            }
        }
        self.recount();
        true
    }

    /// Advances every cell one step against the previous generation
    pub fn next_generation(&mut self) -> &Grid {
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let alive = self.grid.is_alive(row, col);
                let neighbors = self.grid.alive_neighbors(row, col);
                self.back
                    .set(row, col, Cell::from(rule::next_state(alive, neighbors)));
            }
        }
        std::mem::swap(&mut self.grid, &mut self.back);

        self.generation += 1;
        self.recount();
        &self.grid
    }

    fn recount(&mut self) {
        self.population = self.grid.alive_count();
    }

    #[inline]
    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn set_animation_id(&mut self, id: Option<H>) {
        self.animation_id = id;
    }
    #[inline]
    pub fn animation_id(&self) -> Option<&H> {
        self.animation_id.as_ref()
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
    #[inline]
    pub fn population(&self) -> usize {
        self.population
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Pattern;
    use rand::{SeedableRng, rngs::StdRng};

    fn config(width: u32, height: u32, cell_size: u32) -> Config {
        let mut config = Config {
            width,
            height,
            cell_size,
            ..Config::default()
        };
        config.insert_pattern("blinker", Pattern::new([(0, 0), (1, 0), (2, 0)], "period 2"));
        config.insert_pattern(
            "glider",
            Pattern::new([(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)], "moves diagonally"),
        );
        config
    }

    fn game(rows: u32, cols: u32) -> GameOfLife {
        GameOfLife::new(config(cols, rows, 1))
    }

    fn alive(game: &GameOfLife, cells: &[(i32, i32)]) -> bool {
        let mut expected: Vec<Pos2> = cells.iter().copied().map(Pos2::from).collect();
        expected.sort();
        game.grid().alive_positions() == expected
    }

    #[test]
    fn dimensions_come_from_cell_size() {
        let game: GameOfLife = GameOfLife::new(config(505, 230, 10));

        assert_eq!(game.rows(), 23);
        assert_eq!(game.cols(), 50);
        assert_eq!(game.generation(), 0);
        assert_eq!(game.population(), 0);
        assert!(!game.is_running());
        assert_eq!(game.animation_id(), None);
    }

    #[test]
    fn dimensions_never_change() {
        let mut game: GameOfLife = GameOfLife::new(config(120, 70, 10));
        let dims = |game: &GameOfLife| (game.rows(), game.cols());
        assert_eq!(dims(&game), (7, 12));

        game.randomize_grid(Some(0.5));
        assert_eq!(dims(&game), (7, 12));
        game.add_pattern("glider", 10, 5);
        assert_eq!(dims(&game), (7, 12));
        for _ in 0..5 {
            game.next_generation();
            assert_eq!(dims(&game), (7, 12));
            assert_eq!(
                (game.grid().rows(), game.grid().cols()),
                (7, 12)
            );
        }
        game.clear_grid();
        assert_eq!(dims(&game), (7, 12));
    }

    #[test]
    fn degenerate_sizes_are_empty() {
        let small: GameOfLife = GameOfLife::new(config(5, 5, 10));
        assert_eq!((small.rows(), small.cols()), (0, 0));

        let mut zero: GameOfLife = GameOfLife::new(config(100, 100, 0));
        assert_eq!((zero.rows(), zero.cols()), (0, 0));
        zero.next_generation();
        assert_eq!(zero.generation(), 1);
        assert_eq!(zero.population(), 0);
    }

    #[test]
    fn config_is_a_copy() {
        let game = game(4, 4);
        let mut copy = game.config();
        copy.patterns.clear();
        copy.cell_size = 99;

        assert_eq!(game.config().cell_size, 1);
        assert!(game.config().patterns.contains_key("glider"));
    }

    #[test]
    fn clear_resets_everything() {
        let mut game = game(10, 10);
        game.randomize_grid(Some(1.0));
        game.next_generation();

        game.clear_grid();

        assert_eq!(game.grid().alive_count(), 0);
        assert_eq!(game.generation(), 0);
        assert_eq!(game.population(), 0);
    }

    #[test]
    fn randomize_extremes() {
        let mut game = game(20, 20);

        game.randomize_grid(Some(1.0));
        assert_eq!(game.population(), 400);

        game.randomize_grid(Some(0.0));
        assert_eq!(game.population(), 0);

        game.randomize_grid(Some(-0.5));
        assert_eq!(game.population(), 0);

        game.randomize_grid(Some(3.0));
        assert_eq!(game.population(), 400);
    }

    #[test]
    fn randomize_converges_to_density() {
        let mut game = game(100, 100);
        let mut rng = StdRng::seed_from_u64(7);

        for density in [0.1, 0.3, 0.5, 0.8] {
            game.randomize_grid_with(&mut rng, Some(density));
            let fraction = game.population() as f64 / 10_000.0;
            assert!(
                (fraction - density).abs() < 0.05,
                "density {density} produced {fraction}"
            );
            assert_eq!(game.population(), game.grid().alive_count());
        }
    }

    #[test]
    fn randomize_defaults_to_initial_density() {
        let mut cfg = config(100, 100, 1);
        cfg.initial_density = 1.0;
        let mut game: GameOfLife = GameOfLife::new(cfg);

        game.randomize_grid(None);

        assert_eq!(game.population(), 10_000);
    }

    #[test]
    fn randomize_resets_generation() {
        let mut game = game(5, 5);
        game.next_generation();
        game.next_generation();

        game.randomize_grid(Some(0.5));

        assert_eq!(game.generation(), 0);
    }

    #[test]
    fn isolated_cell_dies() {
        let mut game = game(3, 3);
        game.grid_mut().set(1, 1, Cell::Alive);

        game.next_generation();

        assert_eq!(game.grid().alive_count(), 0);
        assert_eq!(game.population(), 0);
    }

    #[test]
    fn blinker_oscillates() {
        let mut game = game(5, 5);
        assert!(game.add_pattern("blinker", 1, 2));
        let start = game.grid().clone();

        game.next_generation();
        assert!(alive(&game, &[(2, 1), (2, 2), (2, 3)]));

        let back = game.next_generation().clone();
        assert_eq!(back, start);
        assert_eq!(game.population(), 3);
    }

    #[test]
    fn block_is_stable_in_a_corner() {
        let mut game = game(4, 4);
        for (row, col) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            game.grid_mut().set(row, col, Cell::Alive);
        }
        let start = game.grid().clone();

        game.next_generation();

        assert_eq!(game.grid(), &start);
    }

    #[test]
    fn glider_translates() {
        let mut game = game(10, 10);
        game.add_pattern("glider", 0, 0);

        for _ in 0..4 {
            game.next_generation();
        }

        assert!(alive(&game, &[(2, 1), (3, 2), (1, 3), (2, 3), (3, 3)]));
        assert_eq!(game.generation(), 4);
    }

    #[test]
    fn generation_counts_every_step() {
        let mut game = game(6, 6);
        game.randomize_grid(Some(0.4));

        for expected in 1..=10 {
            game.next_generation();
            assert_eq!(game.generation(), expected);
            assert_eq!(game.population(), game.grid().alive_count());
        }
    }

    #[test]
    fn unknown_pattern_changes_nothing() {
        let mut game = game(8, 8);
        game.randomize_grid_with(&mut StdRng::seed_from_u64(3), Some(0.5));
        let before = game.grid().clone();
        let population = game.population();

        assert!(!game.add_pattern("unknown", 0, 0));

        assert_eq!(game.grid(), &before);
        assert_eq!(game.population(), population);
    }

    #[test]
    fn pattern_is_clipped_at_edges() {
        let mut game = game(5, 5);

        assert!(game.add_pattern("glider", 3, -1));

        // (1,0) lands above the grid and (2,1) and (2,2) right of it
        assert!(alive(&game, &[(3, 1), (4, 1)]));
        assert_eq!(game.population(), 2);
    }

    #[test]
    fn pattern_fully_outside_still_succeeds() {
        let mut game = game(5, 5);

        assert!(game.add_pattern("blinker", 100, 100));
        assert!(game.add_pattern("blinker", i32::MAX, i32::MAX));
        assert_eq!(game.population(), 0);
    }

    #[test]
    fn pattern_on_wide_grid_uses_columns() {
        let mut game = game(2, 10);

        assert!(game.add_pattern("blinker", 6, 1));

        assert!(alive(&game, &[(6, 1), (7, 1), (8, 1)]));
    }

    #[test]
    fn external_edits_leave_population_stale() {
        let mut game = game(4, 4);
        game.grid_mut().toggle(2, 2);

        assert_eq!(game.population(), 0);
        assert_eq!(game.grid().alive_count(), 1);

        game.add_pattern("blinker", 0, 0);
        assert_eq!(game.population(), 4);
    }

    #[test]
    fn running_flag_and_handle_are_passthrough() {
        let mut game: GameOfLife<&str> = GameOfLife::new(config(10, 10, 1));

        game.set_running(true);
        game.set_animation_id(Some("frame-1"));
        game.clear_grid();

        assert!(game.is_running());
        assert_eq!(game.animation_id(), Some(&"frame-1"));

        game.set_animation_id(None);
        assert_eq!(game.animation_id(), None);
    }
}
