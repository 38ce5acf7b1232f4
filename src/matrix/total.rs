//! Cross-level merge

use super::{LevelMatrices, Observations, PairMatrix};

/// Merge all level matrices into one.
///
/// Each merged cell is the concatenation, in level order, of the same cell
/// across every level.
pub fn compile_total(matrices: &LevelMatrices, size: usize) -> PairMatrix<Observations> {
    PairMatrix::from_fn(size, |row, col| {
        matrices
            .levels
            .iter()
            .flat_map(|(_, matrix)| matrix.at(row, col).iter().copied())
            .collect()
    })
}
