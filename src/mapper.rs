//! Conversion between grid coordinates and the rotated board frame.
//!
//! The board is drawn turned by [`BOARD_ROTATION`] around its center. This module places grid
//! cells in that frame and maps raw directional input (arrow keys or swipe vectors, expressed in
//! screen axes with `x` to the right and `z` downwards) back onto a grid step, so a board shown
//! diagonally still answers to screen-aligned input.

use std::f64::consts::FRAC_PI_4;

use crate::grid::{Coordinate, Direction, Grid};

/// Fixed angle, in radians, between the drawn board and the logical grid axes.
pub const BOARD_ROTATION: f64 = FRAC_PI_4;

/// Converts a grid index to a floating point value.
#[expect(
    clippy::cast_precision_loss,
    reason = "Grid indices stay far below the 2^52 limit of exact f64 integers."
)]
fn to_f64(value: usize) -> f64 {
    value as f64
}

/// Rotates a planar `(x, z)` vector counter-clockwise by `angle` radians.
#[must_use]
pub fn rotate((x, z): (f64, f64), angle: f64) -> (f64, f64) {
    let (sin, cos) = angle.sin_cos();

    (x.mul_add(cos, -(z * sin)), x.mul_add(sin, z * cos))
}

/// Resolves a raw input vector into a grid step under the given board rotation.
///
/// The vector is first rotated by `-rotation` into the board's own frame and then snapped to its
/// dominant axis. When both axes carry the same magnitude the horizontal step wins. Returns
/// [`None`] for a zero or non-finite vector.
#[must_use]
pub fn resolve_input_direction(raw: (f64, f64), rotation: f64) -> Option<Direction> {
    let (local_x, local_z) = rotate(raw, -rotation);
    if !local_x.is_finite() || !local_z.is_finite() {
        return None;
    }

    if local_x.abs() >= local_z.abs() {
        Direction::from_delta(sign(local_x), 0)
    } else {
        Direction::from_delta(0, sign(local_z))
    }
}

/// Returns `-1`, `0` or `1` following the sign of the value.
fn sign(value: f64) -> isize {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Screen-axis vector of an arrow key, `x` to the right and `z` downwards.
#[must_use]
pub const fn arrow_vector(direction: Direction) -> (f64, f64) {
    match direction {
        Direction::North => (0.0, -1.0),
        Direction::South => (0.0, 1.0),
        Direction::West => (-1.0, 0.0),
        Direction::East => (1.0, 0.0),
    }
}

/// Placement of grid cells on a board centered at the origin.
///
/// Offsets are computed before rotation; [`BoardMapper::to_rotated`] applies the board rotation
/// for callers that draw the board turned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardMapper {
    /// Side length of one cell in world units.
    cell_size: f64,
    /// Half of the distance between the centers of the first and last column.
    half_width: f64,
    /// Half of the distance between the centers of the first and last row.
    half_depth: f64,
    /// Number of columns of the mapped grid.
    cols: usize,
    /// Number of rows of the mapped grid.
    rows: usize,
}

impl BoardMapper {
    /// Builds a mapper for the given grid and cell size.
    #[must_use]
    pub fn new(grid: &Grid, cell_size: f64) -> Self {
        let (cols, rows) = grid.dimensions();

        Self {
            cell_size,
            half_width: to_f64(cols.saturating_sub(1)) * cell_size / 2.0,
            half_depth: to_f64(rows.saturating_sub(1)) * cell_size / 2.0,
            cols,
            rows,
        }
    }

    /// Returns the `(x, z)` offset of a cell center from the board center, before rotation.
    #[must_use]
    pub fn to_world_offset(&self, coordinate: Coordinate) -> (f64, f64) {
        self.to_world_point(to_f64(coordinate.col), to_f64(coordinate.row))
    }

    /// Returns the `(x, z)` offset of a fractional grid position, before rotation.
    ///
    /// This places the player token while it travels between two cells.
    #[must_use]
    pub fn to_world_point(&self, col: f64, row: f64) -> (f64, f64) {
        (
            col.mul_add(self.cell_size, -self.half_width),
            row.mul_add(self.cell_size, -self.half_depth),
        )
    }

    /// Returns the offset of a cell center after applying the board rotation.
    #[must_use]
    pub fn to_rotated(&self, coordinate: Coordinate, rotation: f64) -> (f64, f64) {
        self.to_rotated_point(to_f64(coordinate.col), to_f64(coordinate.row), rotation)
    }

    /// Returns the offset of a fractional grid position after applying the board rotation.
    #[must_use]
    pub fn to_rotated_point(&self, col: f64, row: f64, rotation: f64) -> (f64, f64) {
        rotate(self.to_world_point(col, row), rotation)
    }

    /// Maps an unrotated world offset back onto the nearest cell of the board.
    ///
    /// Returns [`None`] when the offset falls outside the board.
    #[must_use]
    pub fn to_grid(&self, (x, z): (f64, f64)) -> Option<Coordinate> {
        if self.cell_size <= 0.0 {
            return None;
        }

        let col = ((x + self.half_width) / self.cell_size).round();
        let row = ((z + self.half_depth) / self.cell_size).round();
        let cell = Coordinate::new(index_from_f64(col)?, index_from_f64(row)?);

        (cell.col < self.cols && cell.row < self.rows).then_some(cell)
    }

    /// Returns the radius of the circle holding the whole board under any rotation.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        self.half_width.hypot(self.half_depth) + self.cell_size
    }
}

/// Converts a rounded, non-negative floating point value back into a grid index.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is rounded and checked to be a small non-negative number first."
)]
fn index_from_f64(value: f64) -> Option<usize> {
    (value.is_finite() && value >= 0.0 && value <= to_f64(u32::MAX as usize))
        .then_some(value as usize)
}
