//! Maze generation by randomized depth-first carving.
//!
//! This module contains the [`MazeGenerator`], which carves a perfect maze (a spanning tree over
//! the walkable cells) out of a solid block of walls and then tags the two goal cells: the cell
//! farthest from the start becomes the primary goal, and a random dead end away from the route to
//! it becomes the secondary goal. A carving that offers no such dead end is thrown away and the
//! whole maze is generated again.

use color_eyre::eyre::{bail, Result};
use log::{debug, info, warn};

use crate::{
    grid::{CellKind, Coordinate, Direction, Grid},
    pathfinding,
    random::{RandomSource, RngSource},
};

/// Smallest board size accepted from configuration.
pub const MIN_MAZE_SIZE: usize = 5;

/// Smallest board size able to hold a dead end off the route to the primary goal.
///
/// Sizes 5 and 6 leave a 2x2 carving lattice whose every spanning tree is a single corridor, so
/// smaller requests are widened to this size.
pub const MIN_PLAYABLE_SIZE: usize = 7;

/// Largest board size a maze is generated for.
pub const MAX_MAZE_SIZE: usize = 201;

/// Number of carvings tried before generation gives up.
pub const MAX_GENERATION_ATTEMPTS: usize = 256;

/// Carving state of one cell on the explicit depth-first stack.
struct Frame {
    /// Cell the frame carves from.
    cell: Coordinate,
    /// Directions in the order they are tried.
    order: [Direction; 4],
    /// Index of the next direction to try.
    next: usize,
}

/// Random maze builder.
///
/// The generator owns its [`RandomSource`], so consecutive calls to [`MazeGenerator::generate`]
/// keep drawing from the same stream.
#[derive(Debug)]
pub struct MazeGenerator<R = RngSource> {
    /// Source of carving orders and secondary goal choices.
    random: R,
}

impl MazeGenerator {
    /// Builds a generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(RngSource::from_entropy())
    }

    /// Builds a generator whose mazes are reproducible for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(RngSource::seeded(seed))
    }
}

impl<R: RandomSource> MazeGenerator<R> {
    /// Builds a generator drawing from the given random source.
    pub const fn new(random: R) -> Self {
        Self { random }
    }

    /// Generates a square maze with one primary and one secondary goal.
    ///
    /// The board is `size` cells wide and tall, widened to [`MIN_PLAYABLE_SIZE`] when smaller.
    /// Carving starts at [`Grid::START`] and moves two cells at a time, so walls stay between
    /// corridors; an even size simply leaves its last interior row and column uncarved.
    ///
    /// # Errors
    ///
    /// This function returns an error if `size` exceeds [`MAX_MAZE_SIZE`], or if
    /// [`MAX_GENERATION_ATTEMPTS`] carvings in a row offer no dead end for the secondary goal.
    pub fn generate(&mut self, size: usize) -> Result<Grid> {
        if size > MAX_MAZE_SIZE {
            bail!("maze size {size} exceeds the largest supported size {MAX_MAZE_SIZE}");
        }
        let size = playable_size(size);

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let mut grid = self.carve(size)?;

            if let Some((primary, secondary)) = self.place_goals(&mut grid) {
                info!(
                    "generated {size}x{size} maze in {attempt} attempt(s), primary goal at \
                     {primary}, secondary goal at {secondary}"
                );
                return Ok(grid);
            }

            debug!("attempt {attempt} left no dead end off the goal route, carving again");
        }

        bail!(
            "failed to place a secondary goal on a {size}x{size} maze after \
             {MAX_GENERATION_ATTEMPTS} attempts"
        )
    }

    /// Carves a fresh maze into a solid grid.
    ///
    /// This is the iterative form of the recursive backtracker: every frame on the stack shuffles
    /// its directions once, when its cell is carved, and is popped after trying all four.
    fn carve(&mut self, size: usize) -> Result<Grid> {
        let mut grid = Grid::walled(size, size)?;
        grid.set(Grid::START, CellKind::Open);
        let mut stack = vec![self.frame(Grid::START)];

        while let Some(frame) = stack.last_mut() {
            let Some(&direction) = frame.order.get(frame.next) else {
                let _ = stack.pop();
                continue;
            };
            frame.next += 1;
            let cell = frame.cell;

            let Some(target) = cell.offset(direction, 2) else {
                continue;
            };
            if !is_carvable(&grid, target) {
                continue;
            }

            if let Some(between) = cell.step(direction) {
                grid.set(between, CellKind::Open);
            }
            grid.set(target, CellKind::Open);
            stack.push(self.frame(target));
        }

        Ok(grid)
    }

    /// Builds the stack frame of a freshly carved cell.
    fn frame(&mut self, cell: Coordinate) -> Frame {
        let mut order = Direction::ALL;
        self.random.shuffle_directions(&mut order);

        Frame {
            cell,
            order,
            next: 0,
        }
    }

    /// Tags both goals, returning their coordinates.
    ///
    /// Returns [`None`] when the carving has no open dead end off the route between the start and
    /// the primary goal; the caller then discards the grid.
    fn place_goals(&mut self, grid: &mut Grid) -> Option<(Coordinate, Coordinate)> {
        let primary = pathfinding::farthest_from(grid, Grid::START)?;
        grid.set(primary, CellKind::PrimaryGoal);

        let route = pathfinding::shortest_path(grid, Grid::START, primary);
        let candidates: Vec<Coordinate> = pathfinding::dead_ends(grid)
            .into_iter()
            .filter(|cell| grid.kind_at(*cell) == CellKind::Open && !route.contains(cell))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let secondary = *candidates.get(self.random.choose_index(candidates.len()))?;
        grid.set(secondary, CellKind::SecondaryGoal);

        Some((primary, secondary))
    }
}

/// Returns the board size actually generated for a requested size.
#[must_use]
pub fn playable_size(requested: usize) -> usize {
    if requested < MIN_PLAYABLE_SIZE {
        warn!("maze size {requested} cannot hold both goals, widening to {MIN_PLAYABLE_SIZE}");
        MIN_PLAYABLE_SIZE
    } else {
        requested
    }
}

/// Returns whether carving may reach `target`: an untouched interior cell.
fn is_carvable(grid: &Grid, target: Coordinate) -> bool {
    let (cols, rows) = grid.dimensions();

    target.col > 0
        && target.row > 0
        && target.col + 1 < cols
        && target.row + 1 < rows
        && grid.kind_at(target) == CellKind::Wall
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use proptest::prelude::*;

    use super::*;
    use crate::random::ScriptedSource;

    /// Counts the cells of each kind on a grid.
    fn count(grid: &Grid, kind: CellKind) -> usize {
        grid.coordinates()
            .filter(|&cell| grid.kind_at(cell) == kind)
            .count()
    }

    /// Returns whether the walkable cells form a single connected, acyclic graph.
    fn is_spanning_tree(grid: &Grid) -> bool {
        let walkable = grid.walkable_count();
        let edges = grid
            .coordinates()
            .filter(|&cell| grid.is_walkable(cell))
            .map(|cell| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter_map(|direction| cell.step(direction))
                    .filter(|&neighbor| grid.is_walkable(neighbor))
                    .count()
            })
            .sum::<usize>();

        let mut seen = BTreeSet::from([Grid::START]);
        let mut open = VecDeque::from([Grid::START]);
        while let Some(cell) = open.pop_front() {
            for neighbor in grid.walkable_neighbors(cell) {
                if seen.insert(neighbor) {
                    open.push_back(neighbor);
                }
            }
        }

        seen.len() == walkable && edges + 1 == walkable
    }

    /// Counts the simple paths between two cells by exhaustive depth-first search.
    fn simple_paths(grid: &Grid, from: Coordinate, to: Coordinate) -> usize {
        /// Recursive walk keeping the cells of the current path.
        fn walk(
            grid: &Grid,
            current: Coordinate,
            to: Coordinate,
            visited: &mut BTreeSet<Coordinate>,
        ) -> usize {
            if current == to {
                return 1;
            }
            let mut total = 0;
            let neighbors: Vec<Coordinate> = grid.walkable_neighbors(current).collect();
            for neighbor in neighbors {
                if visited.insert(neighbor) {
                    total += walk(grid, neighbor, to, visited);
                    let _ = visited.remove(&neighbor);
                }
            }
            total
        }

        let mut visited = BTreeSet::from([from]);
        walk(grid, from, to, &mut visited)
    }

    /// Checks every structural guarantee of a generated maze.
    fn assert_well_formed(grid: &Grid) {
        let (cols, rows) = grid.dimensions();
        assert_eq!(cols, rows, "mazes are square");

        for cell in grid.coordinates() {
            if grid.is_border(cell) {
                assert_eq!(grid.kind_at(cell), CellKind::Wall, "border {cell} must be a wall");
            }
        }

        assert_eq!(grid.kind_at(Grid::START), CellKind::Open, "start must stay open");
        assert!(is_spanning_tree(grid), "walkable cells must form a tree:\n{grid}");
        assert_eq!(count(grid, CellKind::PrimaryGoal), 1);
        assert_eq!(count(grid, CellKind::SecondaryGoal), 1);

        let primary = grid
            .find_goal(CellKind::PrimaryGoal)
            .expect("primary goal should exist");
        let secondary = grid
            .find_goal(CellKind::SecondaryGoal)
            .expect("secondary goal should exist");

        assert_eq!(
            grid.walkable_neighbors(secondary).count(),
            1,
            "secondary goal must be a dead end"
        );
        assert!(
            !pathfinding::shortest_path(grid, Grid::START, primary).contains(&secondary),
            "secondary goal must lie off the route to the primary goal"
        );
    }

    /// Carving order producing a snake through every lattice cell of a 7x7 board.
    const SNAKE: [[Direction; 4]; 9] = [Direction::ALL; 9];

    /// Carving orders producing a 7x7 maze with a single side branch.
    fn branching_orders() -> Vec<[Direction; 4]> {
        use Direction::{East as E, North as N, South as S, West as W};

        vec![
            [E, S, N, W],
            [S, E, N, W],
            [E, N, S, W],
            [N, S, E, W],
            [N, E, S, W],
            [W, N, E, S],
            [W, N, E, S],
            [N, E, S, W],
            [N, E, S, W],
        ]
    }

    /// Expected layout of [`branching_orders`].
    const BRANCHING_LAYOUT: &str = "\
#######
#...#S#
###.#.#
#P#...#
#.###.#
#.....#
#######";

    #[test]
    fn test_scripted_carving_gives_exact_layout() {
        let mut generator = MazeGenerator::new(ScriptedSource::new(branching_orders(), vec![]));

        let grid = generator.generate(7).expect("branching script should generate");

        assert_eq!(grid.to_string(), BRANCHING_LAYOUT);
    }

    #[test]
    fn test_snake_carving_is_regenerated() {
        let mut orders = SNAKE.to_vec();
        orders.extend(branching_orders());
        let mut generator = MazeGenerator::new(ScriptedSource::new(orders, vec![]));

        let grid = generator
            .generate(7)
            .expect("second attempt should generate");

        assert_eq!(
            grid.to_string(),
            BRANCHING_LAYOUT,
            "the corridor-only first carving must be discarded"
        );
    }

    #[test]
    fn test_exhausted_attempts_fail() {
        let mut generator = MazeGenerator::new(ScriptedSource::default());

        assert!(
            generator.generate(7).is_err(),
            "a source that always snakes can never place a secondary goal"
        );
    }

    #[test]
    fn test_small_sizes_are_widened() {
        assert_eq!(playable_size(5), MIN_PLAYABLE_SIZE);
        assert_eq!(playable_size(6), MIN_PLAYABLE_SIZE);
        assert_eq!(playable_size(7), 7);
        assert_eq!(playable_size(12), 12);

        let grid = MazeGenerator::seeded(1)
            .generate(5)
            .expect("widened maze should generate");
        assert_eq!(grid.dimensions(), (MIN_PLAYABLE_SIZE, MIN_PLAYABLE_SIZE));
    }

    #[test]
    fn test_oversized_boards_are_refused() {
        let mut generator = MazeGenerator::seeded(1);

        assert!(generator.generate(1 << 33).is_err());
        assert!(generator.generate(usize::MAX).is_err());
        assert!(generator.generate(MAX_MAZE_SIZE + 1).is_err());

        let grid = generator
            .generate(MAX_MAZE_SIZE)
            .expect("largest size should generate");
        assert_eq!(grid.dimensions(), (MAX_MAZE_SIZE, MAX_MAZE_SIZE));
    }

    #[test]
    fn test_listed_sizes_hold_invariants() {
        for size in [5, 8, 12, 20] {
            let mut generator = MazeGenerator::seeded(size as u64);
            for _ in 0..10 {
                let grid = generator.generate(size).expect("maze should generate");
                assert_eq!(grid.dimensions(), (playable_size(size), playable_size(size)));
                assert_well_formed(&grid);
            }
        }
    }

    #[test]
    fn test_even_size_keeps_last_interior_line_solid() {
        let grid = MazeGenerator::seeded(8)
            .generate(8)
            .expect("maze should generate");

        for index in 0..8 {
            assert_eq!(grid.cell_kind(6, index), CellKind::Wall);
            assert_eq!(grid.cell_kind(index, 6), CellKind::Wall);
        }
    }

    #[test]
    fn test_paths_between_open_cells_are_unique() {
        for seed in [21, 22, 23] {
            let grid = MazeGenerator::seeded(seed)
                .generate(9)
                .expect("maze should generate");

            let open: Vec<Coordinate> = grid
                .coordinates()
                .filter(|&cell| grid.is_walkable(cell))
                .collect();
            for &from in &open {
                for &to in &open {
                    assert_eq!(
                        simple_paths(&grid, from, to),
                        1,
                        "exactly one simple path should join {from} and {to}:\n{grid}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let first = MazeGenerator::seeded(1234)
            .generate(12)
            .expect("maze should generate");
        let second = MazeGenerator::seeded(1234)
            .generate(12)
            .expect("maze should generate");

        assert_eq!(first, second);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        #[test]
        fn generated_mazes_are_well_formed(
            seed in any::<u64>(),
            size in 5_usize..=21,
            pairs in prop::collection::vec(any::<(prop::sample::Index, prop::sample::Index)>(), 8),
        ) {
            let grid = MazeGenerator::seeded(seed)
                .generate(size)
                .expect("maze should generate");

            prop_assert_eq!(grid.dimensions(), (playable_size(size), playable_size(size)));
            assert_well_formed(&grid);

            let open: Vec<Coordinate> = grid
                .coordinates()
                .filter(|&cell| grid.is_walkable(cell))
                .collect();
            for (from, to) in pairs {
                let from = *from.get(&open);
                let to = *to.get(&open);
                prop_assert_eq!(simple_paths(&grid, from, to), 1, "{} to {}", from, to);
            }
        }
    }
}
