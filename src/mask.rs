//! Display mask
//!
//! `true` hides a cell. Only the structurally-empty half of an
//! order-collapsed matrix is hidden, so no populated cell is ever masked.

use crate::matrix::{OrderPolicy, PairMatrix};

pub fn build_mask(size: usize, order: OrderPolicy) -> PairMatrix<bool> {
    PairMatrix::from_fn(size, |row, col| !order.is_canonical(row, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{ObservedValue, build_level_matrices};
    use crate::registry::ModelRegistry;
    use crate::trials::{ParseOptions, parse_log_content};

    #[test]
    fn test_collapsed_mask_hides_upper_triangle() {
        let mask = build_mask(7, OrderPolicy::Collapsed);

        assert!(*mask.at(0, 1));
        assert!(*mask.at(2, 6));
        assert!(!mask.at(3, 3));
        assert!(!mask.at(6, 0));
        assert_eq!(mask.iter().filter(|(_, _, hidden)| **hidden).count(), 21);
    }

    #[test]
    fn test_ordered_mask_hides_nothing() {
        let mask = build_mask(8, OrderPolicy::Ordered);
        assert!(mask.iter().all(|(_, _, hidden)| !hidden));
    }

    #[test]
    fn test_mask_never_hides_populated_cells() {
        let registry = ModelRegistry::extended();
        let log = parse_log_content(
            "lvl;mac;still;1;10\nlvl;still;mac;1;20\nlvl;bd;mac1;2;30\nlvl;up;up;3;40\n",
            &registry,
            ParseOptions::default(),
        )
        .unwrap();

        for order in [OrderPolicy::Ordered, OrderPolicy::Collapsed] {
            let matrices =
                build_level_matrices(&log, registry.len(), order, ObservedValue::Outcome);
            let mask = build_mask(registry.len(), order);
            for (_, matrix) in &matrices.levels {
                for (row, col, cell) in matrix.iter() {
                    if !cell.is_empty() {
                        assert!(!mask.at(row, col), "populated ({}, {}) masked", row, col);
                    }
                }
            }
        }
    }
}
