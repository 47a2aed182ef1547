//! Breadth-first search over the maze grid.
//!
//! This module contains the searches the generator uses to place both goals: the farthest
//! reachable cell from the start, the shortest route between two cells and the list of dead ends.
//! Every search walks the 4-connected walkable cells of a [`Grid`]; walls are never entered.

use std::collections::{HashSet, VecDeque};

use crate::grid::{Coordinate, Grid};

/// Per-cell bookkeeping of a single breadth-first search.
struct Search {
    /// Number of columns of the searched grid, used to index the tables.
    cols: usize,
    /// Step distance from the start, [`None`] for unreached cells.
    distances: Vec<Option<usize>>,
    /// Cell each reached cell was discovered from.
    parents: Vec<Option<Coordinate>>,
}

impl Search {
    /// Runs a breadth-first search from `start`, stopping once `target` is dequeued.
    ///
    /// Passing [`None`] as the target explores every reachable cell.
    fn run(grid: &Grid, start: Coordinate, target: Option<Coordinate>) -> Self {
        let (cols, rows) = grid.dimensions();
        let mut search = Self {
            cols,
            distances: vec![None; cols * rows],
            parents: vec![None; cols * rows],
        };

        if !grid.is_walkable(start) {
            return search;
        }

        search.record(start, 0, None);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if Some(current) == target {
                break;
            }

            let distance = search.distance(current).unwrap_or_default();
            for neighbor in grid.walkable_neighbors(current) {
                if search.distance(neighbor).is_none() {
                    search.record(neighbor, distance + 1, Some(current));
                    queue.push_back(neighbor);
                }
            }
        }

        search
    }

    /// Maps a coordinate to its position in the tables.
    const fn index(&self, coordinate: Coordinate) -> Option<usize> {
        if coordinate.col < self.cols {
            Some(coordinate.row * self.cols + coordinate.col)
        } else {
            None
        }
    }

    /// Returns the step distance of a reached cell.
    fn distance(&self, coordinate: Coordinate) -> Option<usize> {
        self.index(coordinate)
            .and_then(|index| self.distances.get(index))
            .copied()
            .flatten()
    }

    /// Returns the cell a reached cell was discovered from.
    fn parent(&self, coordinate: Coordinate) -> Option<Coordinate> {
        self.index(coordinate)
            .and_then(|index| self.parents.get(index))
            .copied()
            .flatten()
    }

    /// Marks a cell as reached.
    fn record(&mut self, coordinate: Coordinate, distance: usize, parent: Option<Coordinate>) {
        let Some(index) = self.index(coordinate) else {
            return;
        };
        if let Some(slot) = self.distances.get_mut(index) {
            *slot = Some(distance);
        }
        if let Some(slot) = self.parents.get_mut(index) {
            *slot = parent;
        }
    }
}

/// Finds the reachable cell farthest from `start`.
///
/// Ties are broken in row-major scan order: the first cell holding the maximum distance wins.
/// That order only mirrors how the board is scanned and carries no meaning of its own. Returns
/// [`None`] when the start is a wall or has no reachable neighbor.
#[must_use]
pub fn farthest_from(grid: &Grid, start: Coordinate) -> Option<Coordinate> {
    let search = Search::run(grid, start, None);

    let mut best = None;
    let mut best_distance = 0;
    for coordinate in grid.coordinates() {
        if let Some(distance) = search.distance(coordinate) {
            if distance > best_distance {
                best_distance = distance;
                best = Some(coordinate);
            }
        }
    }

    best
}

/// Returns the cells of the shortest route from `start` to `end`, both included, in walking order.
///
/// Returns [`None`] when `end` cannot be reached. On a spanning-tree maze the shortest route is
/// also the only simple route.
#[must_use]
pub fn shortest_route(grid: &Grid, start: Coordinate, end: Coordinate) -> Option<Vec<Coordinate>> {
    let search = Search::run(grid, start, Some(end));
    if search.distance(end).is_none() {
        return None;
    }

    let mut route = vec![end];
    let mut current = end;
    while let Some(parent) = search.parent(current) {
        route.push(parent);
        current = parent;
    }
    route.reverse();

    Some(route)
}

/// Returns the set of cells on the shortest route from `start` to `end`.
///
/// The set is empty when `end` cannot be reached.
#[must_use]
pub fn shortest_path(grid: &Grid, start: Coordinate, end: Coordinate) -> HashSet<Coordinate> {
    shortest_route(grid, start, end)
        .map(|route| route.into_iter().collect())
        .unwrap_or_default()
}

/// Lists every walkable cell with exactly one walkable neighbor, in row-major order.
#[must_use]
pub fn dead_ends(grid: &Grid) -> Vec<Coordinate> {
    grid.coordinates()
        .filter(|&coordinate| {
            grid.is_walkable(coordinate) && grid.walkable_neighbors(coordinate).count() == 1
        })
        .collect()
}
