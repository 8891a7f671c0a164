//! Group detection over the hex grid
//!
//! Two breadth-first traversals: same-color groups grown from a cell, and
//! ceiling reachability seeded from every occupied cell of row 0.

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::grid::{Cell, HexGrid};

/// What a resolve removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalResult {
    /// Cells removed as part of the matched group
    pub matched: usize,
    /// Cells removed because they lost their link to the ceiling
    pub dropped: usize,
}

impl RemovalResult {
    #[inline]
    pub fn total(&self) -> usize {
        self.matched + self.dropped
    }

    /// Points earned for this removal
    pub fn points(&self, hit: u64, drop_bonus: u64) -> u64 {
        self.matched as u64 * hit + self.dropped as u64 * drop_bonus
    }
}

/// Cells connected to `origin` through neighbors of the same color.
/// Empty when `origin` is empty.
pub fn same_color_group(grid: &HexGrid, origin: Cell) -> BTreeSet<Cell> {
    let Some(color) = grid.get(origin) else {
        return BTreeSet::new();
    };
    let mut visited = BTreeSet::from([origin]);
    let mut queue = VecDeque::from([origin]);
    while let Some(cell) = queue.pop_front() {
        for next in grid.neighbors(cell) {
            if grid.get(next) == Some(color) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited
}

/// Occupied cells with no chain of occupied neighbors back to row 0
pub fn detached_cells(grid: &HexGrid) -> BTreeSet<Cell> {
    let mut anchored: HashSet<Cell> = HashSet::new();
    let mut queue = VecDeque::new();
    for col in 0..grid.cols() {
        let cell = Cell::new(col, 0);
        if grid.is_occupied(cell) {
            anchored.insert(cell);
            queue.push_back(cell);
        }
    }
    while let Some(cell) = queue.pop_front() {
        for next in grid.neighbors(cell) {
            if grid.is_occupied(next) && anchored.insert(next) {
                queue.push_back(next);
            }
        }
    }
    grid.occupied()
        .map(|(cell, _)| cell)
        .filter(|cell| !anchored.contains(cell))
        .collect()
}

/// Pop the group at `cell` if it has at least `pop_min` members, then drop
/// everything left hanging. Below the threshold nothing is touched.
pub fn resolve(grid: &mut HexGrid, cell: Cell, pop_min: usize) -> RemovalResult {
    let group = same_color_group(grid, cell);
    if group.len() < pop_min {
        return RemovalResult::default();
    }
    remove_cells(grid, &group);

    // Only the post-match grid decides what falls
    let detached = detached_cells(grid);
    remove_cells(grid, &detached);

    RemovalResult {
        matched: group.len(),
        dropped: detached.len(),
    }
}

fn remove_cells<'a>(grid: &mut HexGrid, cells: impl IntoIterator<Item = &'a Cell>) {
    for &cell in cells {
        grid.set(cell, None);
    }
}
