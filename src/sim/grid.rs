//! Hex grid geometry and occupancy
//!
//! Offset coordinates: cells are addressed by (col, row), and odd rows are
//! shifted right by one radius so that the rows pack hexagonally. Row 0 is
//! the ceiling.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;

/// Index into the palette
pub type ColorIndex = usize;

/// A cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

impl Cell {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Left/right neighbors, independent of parity
const SIDE_OFFSETS: [(isize, isize); 2] = [(-1, 0), (1, 0)];
/// Diagonal neighbors of an even row
const EVEN_ROW_OFFSETS: [(isize, isize); 4] = [(-1, -1), (0, -1), (-1, 1), (0, 1)];
/// Diagonal neighbors of an odd (right-shifted) row
const ODD_ROW_OFFSETS: [(isize, isize); 4] = [(1, -1), (0, -1), (0, 1), (1, 1)];

/// Bounded hex grid with one optional color per cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexGrid {
    layout: GridConfig,
    /// Left edge of the packed grid, centering it in the play width
    x_origin: f32,
    /// Row-major cells
    cells: Vec<Option<ColorIndex>>,
}

impl HexGrid {
    /// Empty grid centered horizontally within `play_width`
    pub fn new(layout: GridConfig, play_width: f32) -> Self {
        let x_origin = (play_width - layout.packed_width()) / 2.0;
        let cells = vec![None; layout.cols * layout.rows];
        Self {
            layout,
            x_origin,
            cells,
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.layout.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.layout.rows
    }

    #[inline]
    pub fn cell_radius(&self) -> f32 {
        self.layout.cell_radius
    }

    #[inline]
    pub fn row_height(&self) -> f32 {
        self.layout.row_height()
    }

    /// Y of the ceiling line
    #[inline]
    pub fn top(&self) -> f32 {
        self.layout.top
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.row * self.layout.cols + cell.col
    }

    #[inline]
    pub fn in_bounds(&self, col: isize, row: isize) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.cols() && (row as usize) < self.rows()
    }

    /// Clamp arbitrary coordinates to the nearest valid cell
    pub fn clamp_cell(&self, col: isize, row: isize) -> Cell {
        Cell::new(
            col.clamp(0, self.cols() as isize - 1) as usize,
            row.clamp(0, self.rows() as isize - 1) as usize,
        )
    }

    /// Color at a cell (None if empty or out of bounds)
    pub fn get(&self, cell: Cell) -> Option<ColorIndex> {
        if cell.col < self.cols() && cell.row < self.rows() {
            self.cells[self.index(cell)]
        } else {
            None
        }
    }

    #[inline]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.get(cell).is_some()
    }

    /// Set or clear a cell; out-of-bounds writes are clamped
    pub fn set(&mut self, cell: Cell, color: Option<ColorIndex>) {
        let cell = self.clamp_cell(cell.col as isize, cell.row as isize);
        let idx = self.index(cell);
        self.cells[idx] = color;
    }

    /// Row-major view of all cells
    pub fn cells(&self) -> &[Option<ColorIndex>] {
        &self.cells
    }

    /// Every occupied cell with its color, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (Cell, ColorIndex)> + '_ {
        let cols = self.cols();
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.map(|color| (Cell::new(i % cols, i / cols), color)))
    }

    /// Pixel center of a cell
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        let r = self.layout.cell_radius;
        let shift = if cell.row % 2 == 1 { r } else { 0.0 };
        let x = self.x_origin + cell.col as f32 * self.layout.cell_diameter() + r + shift;
        let y = self.layout.top + cell.row as f32 * self.row_height();
        Vec2::new(x, y)
    }

    /// Row estimate from a y coordinate (may be out of range)
    #[inline]
    pub fn estimate_row(&self, y: f32) -> isize {
        ((y - self.layout.top) / self.row_height()).floor() as isize
    }

    /// Inclusive row range around the estimated row, clipped to the grid.
    /// Empty (`start > end`) when the estimate is far outside the grid.
    pub fn row_window(&self, y: f32, below: usize, above: usize) -> (isize, isize) {
        let approx = self.estimate_row(y);
        let start = (approx - below as isize).max(0);
        let end = (approx + above as isize).min(self.rows() as isize - 1);
        (start, end)
    }

    /// Nearest cell center to `pos`, searching only rows near the estimate
    pub fn nearest_cell(&self, pos: Vec2) -> Cell {
        let window = self.layout.row_window;
        let (start, end) = self.row_window(pos.y, window, window);
        let mut best: Option<(Cell, f32)> = None;
        for row in start..=end {
            for col in 0..self.cols() {
                let cell = Cell::new(col, row as usize);
                let dist = self.cell_center(cell).distance_squared(pos);
                if best.is_none_or(|(_, d)| dist < d) {
                    best = Some((cell, dist));
                }
            }
        }
        match best {
            Some((cell, _)) => cell,
            None => self.nearest_cell_exhaustive(pos),
        }
    }

    /// Nearest cell center to `pos` over the whole grid
    pub fn nearest_cell_exhaustive(&self, pos: Vec2) -> Cell {
        let mut best = Cell::new(0, 0);
        let mut best_dist = f32::INFINITY;
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let cell = Cell::new(col, row);
                let dist = self.cell_center(cell).distance_squared(pos);
                if dist < best_dist {
                    best_dist = dist;
                    best = cell;
                }
            }
        }
        best
    }

    /// Place a color at `cell`, or at the first free cell within two rings.
    ///
    /// Scan order is ring 1 then ring 2, columns outer, rows inner. When
    /// nothing is free the target cell is overwritten.
    pub fn place_at(&mut self, cell: Cell, color: ColorIndex) -> Cell {
        let cell = self.clamp_cell(cell.col as isize, cell.row as isize);
        let target = if self.is_occupied(cell) {
            match self.free_cell_near(cell, 2) {
                Some(free) => free,
                None => {
                    log::warn!(
                        "no free cell within 2 rings of ({}, {}), overwriting",
                        cell.col,
                        cell.row
                    );
                    cell
                }
            }
        } else {
            cell
        };
        self.set(target, Some(color));
        target
    }

    fn free_cell_near(&self, cell: Cell, max_ring: isize) -> Option<Cell> {
        let (c, r) = (cell.col as isize, cell.row as isize);
        for ring in 1..=max_ring {
            for dc in -ring..=ring {
                for dr in -ring..=ring {
                    let (nc, nr) = (c + dc, r + dr);
                    if self.in_bounds(nc, nr) {
                        let candidate = Cell::new(nc as usize, nr as usize);
                        if !self.is_occupied(candidate) {
                            return Some(candidate);
                        }
                    }
                }
            }
        }
        None
    }

    /// Up to six adjacent in-bounds cells
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        let diagonals = if cell.row % 2 == 0 {
            &EVEN_ROW_OFFSETS
        } else {
            &ODD_ROW_OFFSETS
        };
        let (c, r) = (cell.col as isize, cell.row as isize);
        SIDE_OFFSETS
            .iter()
            .chain(diagonals.iter())
            .map(|&(dc, dr)| (c + dc, r + dr))
            .filter(|&(nc, nr)| self.in_bounds(nc, nr))
            .map(|(nc, nr)| Cell::new(nc as usize, nr as usize))
            .collect()
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn is_row_occupied(&self, row: usize) -> bool {
        row < self.rows() && (0..self.cols()).any(|col| self.is_occupied(Cell::new(col, row)))
    }

    pub fn is_any_occupied(&self) -> bool {
        self.cells.iter().any(Option::is_some)
    }

    /// True when something reached the bottom row
    pub fn bottom_occupied(&self) -> bool {
        self.is_row_occupied(self.rows() - 1)
    }

    /// Colors currently on the grid
    pub fn active_colors(&self) -> BTreeSet<ColorIndex> {
        self.cells.iter().flatten().copied().collect()
    }

    /// Fill the first `rows` rows with colors from `pick`
    pub fn fill_rows(&mut self, rows: usize, mut pick: impl FnMut() -> ColorIndex) {
        for row in 0..rows.min(self.rows()) {
            for col in 0..self.cols() {
                self.set(Cell::new(col, row), Some(pick()));
            }
        }
    }

    /// Shift every row down by one and fill row 0 from `pick`.
    /// Whatever was in the bottom row is discarded.
    pub fn insert_top_row(&mut self, mut pick: impl FnMut() -> ColorIndex) {
        let cols = self.cols();
        self.cells.rotate_right(cols);
        for col in 0..cols {
            self.cells[col] = Some(pick());
        }
    }
}
