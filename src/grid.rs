//! Maze grid data model.
//!
//! This module contains the [`Grid`] produced by the maze generator, together with the coordinate,
//! direction and cell types shared by the path finder, the coordinate mapper and the navigation
//! controller. A grid is rectangular, fixed in size at construction and surrounded by walls.

use std::{fmt, str::FromStr};

use color_eyre::eyre::{bail, OptionExt as _, Report, Result};

/// Logical location of a cell on the board.
///
/// Columns grow to the right and rows grow downwards, matching the row-major layout of the cell
/// storage inside [`Grid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    /// Column index of the cell.
    pub col: usize,
    /// Row index of the cell.
    pub row: usize,
}

impl Coordinate {
    /// Builds a coordinate from a column and a row index.
    #[must_use]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Returns the coordinate one step away in the given direction.
    ///
    /// Returns [`None`] when the step would leave the non-negative quadrant; the upper bounds are
    /// checked by the grid itself.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Option<Self> {
        self.offset(direction, 1)
    }

    /// Returns the coordinate `distance` cells away in the given direction.
    #[must_use]
    pub const fn offset(self, direction: Direction, distance: isize) -> Option<Self> {
        let (dx, dy) = direction.delta();
        let Some(col) = self.col.checked_add_signed(dx * distance) else {
            return None;
        };
        let Some(row) = self.row.checked_add_signed(dy * distance) else {
            return None;
        };

        Some(Self { col, row })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.col, self.row)
    }
}

/// Unit step along one of the grid axes.
///
/// The four variants correspond to the step vectors `(0, -1)`, `(0, 1)`, `(-1, 0)` and `(1, 0)`
/// expressed as `(dx, dy)` in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// One row up, `(0, -1)`.
    North,
    /// One row down, `(0, 1)`.
    South,
    /// One column left, `(-1, 0)`.
    West,
    /// One column right, `(1, 0)`.
    East,
}

impl Direction {
    /// All four directions in the order north, east, south, west.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Returns the `(dx, dy)` step vector of the direction.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
        }
    }

    /// Builds a direction from a unit step vector, if it is one.
    #[must_use]
    pub const fn from_delta(dx: isize, dy: isize) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::North),
            (0, 1) => Some(Self::South),
            (-1, 0) => Some(Self::West),
            (1, 0) => Some(Self::East),
            _ => None,
        }
    }
}

/// Kind of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Impassable cell. Every cell starts as a wall before carving.
    #[default]
    Wall,
    /// Walkable blank cell.
    Open,
    /// Walkable cell that wins the game when reached.
    PrimaryGoal,
    /// Walkable cell that loses the game when reached.
    SecondaryGoal,
}

impl CellKind {
    /// Returns whether the player and the path finder may enter a cell of this kind.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Returns the character used for this kind in the ASCII form of a grid.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Open => '.',
            Self::PrimaryGoal => 'P',
            Self::SecondaryGoal => 'S',
        }
    }

    /// Parses a character of the ASCII form of a grid.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Self::Wall),
            '.' => Some(Self::Open),
            'P' => Some(Self::PrimaryGoal),
            'S' => Some(Self::SecondaryGoal),
            _ => None,
        }
    }
}

/// Rectangular maze board.
///
/// The grid is created once per game session by the maze generator and is read-only for every
/// other component. Out-of-bounds queries answer [`CellKind::Wall`], so callers never need to
/// bounds-check before asking whether a cell can be entered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of columns.
    cols: usize,
    /// Number of rows.
    rows: usize,
    /// Cell kinds stored row by row.
    cells: Vec<CellKind>,
}

impl Grid {
    /// Fixed interior cell where carving starts and where the player spawns.
    pub const START: Coordinate = Coordinate::new(1, 1);

    /// Builds a grid of the given dimensions where every cell is a wall.
    ///
    /// # Errors
    ///
    /// This function returns an error if the number of cells overflows a `usize`.
    pub(crate) fn walled(cols: usize, rows: usize) -> Result<Self> {
        let Some(len) = cols.checked_mul(rows) else {
            bail!("a {cols}x{rows} grid holds more cells than fit in memory");
        };

        Ok(Self {
            cols,
            rows,
            cells: vec![CellKind::Wall; len],
        })
    }

    /// Returns the `(cols, rows)` dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Returns the kind of the cell at the given column and row.
    #[must_use]
    pub fn cell_kind(&self, col: usize, row: usize) -> CellKind {
        self.kind_at(Coordinate::new(col, row))
    }

    /// Returns the kind of the cell at the given coordinate, or a wall when out of bounds.
    #[must_use]
    pub fn kind_at(&self, coordinate: Coordinate) -> CellKind {
        self.index(coordinate)
            .and_then(|index| self.cells.get(index))
            .copied()
            .unwrap_or_default()
    }

    /// Returns whether the coordinate lies inside the board.
    #[must_use]
    pub const fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.col < self.cols && coordinate.row < self.rows
    }

    /// Returns whether the cell at the coordinate exists and is not a wall.
    #[must_use]
    pub fn is_walkable(&self, coordinate: Coordinate) -> bool {
        self.kind_at(coordinate).is_walkable()
    }

    /// Returns the first cell of the given kind in row-major order.
    #[must_use]
    pub fn find_goal(&self, kind: CellKind) -> Option<Coordinate> {
        self.coordinates()
            .find(|&coordinate| self.kind_at(coordinate) == kind)
    }

    /// Iterates over every coordinate of the board in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Coordinate::new(col, row)))
    }

    /// Iterates over the walkable 4-neighbors of a coordinate.
    pub fn walkable_neighbors(&self, coordinate: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| coordinate.step(direction))
            .filter(move |&neighbor| self.is_walkable(neighbor))
    }

    /// Returns the number of walkable cells on the board.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|kind| kind.is_walkable()).count()
    }

    /// Returns whether the coordinate lies on the outer ring of the board.
    #[must_use]
    pub const fn is_border(&self, coordinate: Coordinate) -> bool {
        coordinate.col == 0
            || coordinate.row == 0
            || coordinate.col + 1 == self.cols
            || coordinate.row + 1 == self.rows
    }

    /// Overwrites the kind of a cell. Out-of-bounds writes are ignored.
    pub(crate) fn set(&mut self, coordinate: Coordinate, kind: CellKind) {
        if let Some(cell) = self
            .index(coordinate)
            .and_then(|index| self.cells.get_mut(index))
        {
            *cell = kind;
        }
    }

    /// Maps a coordinate to its position in the row-major storage.
    const fn index(&self, coordinate: Coordinate) -> Option<usize> {
        if self.contains(coordinate) {
            Some(coordinate.row * self.cols + coordinate.col)
        } else {
            None
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(formatter)?;
            }
            for col in 0..self.cols {
                write!(formatter, "{}", self.cell_kind(col, row).glyph())?;
            }
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = Report;

    /// Parses the ASCII form of a grid.
    ///
    /// The input must be rectangular, at least 3x3, use only the glyphs of [`CellKind::glyph`],
    /// keep every border cell a wall and hold at most one goal of each kind.
    fn from_str(input: &str) -> Result<Self> {
        let lines: Vec<&str> = input.lines().map(str::trim_end).collect();

        if lines.len() < 3 {
            bail!("a grid needs at least 3 rows, found {}", lines.len());
        }

        let cols = lines
            .first()
            .ok_or_eyre("failed to retrieve first row of grid")?
            .chars()
            .count();
        if cols < 3 {
            bail!("a grid needs at least 3 columns, found {cols}");
        }

        let mut grid = Self::walled(cols, lines.len())?;
        let mut primary_goals = 0_usize;
        let mut secondary_goals = 0_usize;

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                bail!("row {row} is {} cells wide, expected {cols}", line.chars().count());
            }

            for (col, glyph) in line.chars().enumerate() {
                let coordinate = Coordinate::new(col, row);
                let kind = CellKind::from_glyph(glyph)
                    .ok_or_eyre(format!("unknown cell glyph {glyph:?} at {coordinate}"))?;

                if grid.is_border(coordinate) && kind.is_walkable() {
                    bail!("border cell {coordinate} must be a wall");
                }
                match kind {
                    CellKind::PrimaryGoal => primary_goals += 1,
                    CellKind::SecondaryGoal => secondary_goals += 1,
                    CellKind::Wall | CellKind::Open => {}
                }

                grid.set(coordinate, kind);
            }
        }

        if primary_goals > 1 || secondary_goals > 1 {
            bail!("a grid holds at most one goal of each kind");
        }

        Ok(grid)
    }
}
