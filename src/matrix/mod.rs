//! Pairwise model matrices
//!
//! A [`PairMatrix`] is a square grid with one cell per ordered (row, column)
//! model pair, addressed through [`ModelSlot`]s from the registry that sized
//! it. Rows are the first model named in a trial, columns the second.

pub mod builder;
pub mod total;

pub use builder::{LevelMatrices, ObservedValue, build_level_matrices};
pub use total::compile_total;

use serde::{Deserialize, Serialize};

use crate::registry::ModelSlot;

/// Raw observations of one cell, in insertion order
pub type Observations = Vec<i64>;

/// Whether (a, b) and (b, a) are aggregated separately or together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Every ordered pair keeps its own cell
    #[default]
    Ordered,
    /// Pairs are folded onto the lower triangle: row index >= column index
    Collapsed,
}

impl OrderPolicy {
    pub fn from_flag(ignore_order: bool) -> Self {
        if ignore_order {
            OrderPolicy::Collapsed
        } else {
            OrderPolicy::Ordered
        }
    }

    /// Map a pair onto the cell that stores it
    pub fn canonicalize(&self, row: ModelSlot, col: ModelSlot) -> (ModelSlot, ModelSlot) {
        match self {
            OrderPolicy::Collapsed if row.index() < col.index() => (col, row),
            _ => (row, col),
        }
    }

    /// True when the cell at (row, col) can hold observations.
    ///
    /// Under [`OrderPolicy::Collapsed`] the cells above the diagonal
    /// (row < col) are structurally empty.
    pub fn is_canonical(&self, row: usize, col: usize) -> bool {
        match self {
            OrderPolicy::Ordered => true,
            OrderPolicy::Collapsed => row >= col,
        }
    }
}

/// Square matrix indexed by model pairs
#[derive(Debug, Clone, PartialEq)]
pub struct PairMatrix<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> PairMatrix<T> {
    /// A `size` x `size` matrix of default cells
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![T::default(); size * size],
        }
    }
}

impl<T> PairMatrix<T> {
    /// Build a matrix by evaluating `f(row, col)` for every position
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                cells.push(f(row, col));
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: ModelSlot, col: ModelSlot) -> &T {
        self.at(row.index(), col.index())
    }

    pub fn get_mut(&mut self, row: ModelSlot, col: ModelSlot) -> &mut T {
        let idx = row.index() * self.size + col.index();
        &mut self.cells[idx]
    }

    /// Cell by raw position; both indices must be below `size()`
    pub fn at(&self, row: usize, col: usize) -> &T {
        &self.cells[row * self.size + col]
    }

    /// Iterate `(row, col, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx / size, idx % size, cell))
    }

    pub fn map<U>(&self, mut f: impl FnMut(usize, usize, &T) -> U) -> PairMatrix<U> {
        PairMatrix::from_fn(self.size, |row, col| f(row, col, self.at(row, col)))
    }
}

impl PairMatrix<Observations> {
    /// Total number of observations across all cells
    pub fn observation_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ModelId, ModelRegistry};

    #[test]
    fn test_collapsed_canonicalize_moves_to_lower_triangle() {
        let registry = ModelRegistry::standard();
        let mac = registry.slot(ModelId::Mac).unwrap();
        let still = registry.slot(ModelId::Still).unwrap();

        let (row, col) = OrderPolicy::Collapsed.canonicalize(mac, still);
        assert_eq!((row.id(), col.id()), (ModelId::Still, ModelId::Mac));

        let (row, col) = OrderPolicy::Collapsed.canonicalize(still, mac);
        assert_eq!((row.id(), col.id()), (ModelId::Still, ModelId::Mac));

        let (row, col) = OrderPolicy::Ordered.canonicalize(mac, still);
        assert_eq!((row.id(), col.id()), (ModelId::Mac, ModelId::Still));
    }

    #[test]
    fn test_is_canonical() {
        assert!(OrderPolicy::Collapsed.is_canonical(3, 3));
        assert!(OrderPolicy::Collapsed.is_canonical(4, 1));
        assert!(!OrderPolicy::Collapsed.is_canonical(1, 4));
        assert!(OrderPolicy::Ordered.is_canonical(1, 4));
    }

    #[test]
    fn test_pair_matrix_addressing() {
        let registry = ModelRegistry::standard();
        let bd = registry.slot(ModelId::Bd).unwrap();
        let up = registry.slot(ModelId::Up).unwrap();

        let mut matrix: PairMatrix<Observations> = PairMatrix::new(registry.len());
        matrix.get_mut(bd, up).push(7);

        assert_eq!(matrix.get(bd, up), &vec![7]);
        assert!(matrix.get(up, bd).is_empty());
        assert_eq!(matrix.at(1, 3), &vec![7]);
        assert_eq!(matrix.observation_count(), 1);
        assert_eq!(matrix.iter().count(), 49);
    }
}
